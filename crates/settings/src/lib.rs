#![deny(unsafe_code)]

/// Persisted user preferences: appearance, display name and active tab.
pub mod state;

pub use state::{
    Appearance, ColorScheme, DEFAULT_DISPLAY_NAME, Preferences, PreferencesError,
    PreferencesStore, Tab,
};
