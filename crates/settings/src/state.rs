use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use figment::{
    Figment,
    providers::{Format, Json, Serialized},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use snafu::{ResultExt, Snafu};

pub const DEFAULT_DISPLAY_NAME: &str = "Skipper";
pub const PREFERENCES_DIRECTORY_NAME: &str = "photochat";
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// Color scheme forced by an explicit appearance choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorScheme {
    Light,
    Dark,
}

/// Appearance preference. `System` defers to the platform scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Appearance {
    #[default]
    System,
    Light,
    Dark,
}

impl Appearance {
    /// Stored tag; the system default is the empty string.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::System => "",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn from_tag(value: &str) -> Self {
        let value = value.trim();
        if value.eq_ignore_ascii_case("dark") {
            Self::Dark
        } else if value.eq_ignore_ascii_case("light") {
            Self::Light
        } else {
            Self::System
        }
    }

    pub fn preferred_scheme(&self) -> Option<ColorScheme> {
        match self {
            Self::System => None,
            Self::Light => Some(ColorScheme::Light),
            Self::Dark => Some(ColorScheme::Dark),
        }
    }
}

impl Serialize for Appearance {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for Appearance {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_tag(&value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Timeline,
    #[default]
    Chat,
    Settings,
}

impl Tab {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "timeline" => Some(Self::Timeline),
            "chat" => Some(Self::Chat),
            "settings" => Some(Self::Settings),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub appearance: Appearance,
    #[serde(default = "default_display_name")]
    pub name: String,
    #[serde(default)]
    pub tab: Tab,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            appearance: Appearance::default(),
            name: default_display_name(),
            tab: Tab::default(),
        }
    }
}

impl Preferences {
    pub fn normalized(mut self) -> Self {
        self.name = if self.name.trim().is_empty() {
            default_display_name()
        } else {
            self.name.trim().to_string()
        };
        self
    }
}

/// JSON file holding [`Preferences`], layered over defaults on read.
#[derive(Debug, Clone)]
struct PreferencesFile {
    path: PathBuf,
}

impl PreferencesFile {
    /// Missing or unreadable files yield defaults; preferences never block startup.
    fn read(&self) -> Preferences {
        if !self.path.exists() {
            tracing::info!(path = ?self.path, "no preferences file yet, starting from defaults");
            return Preferences::default();
        }

        Figment::from(Serialized::defaults(Preferences::default()))
            .merge(Json::file(&self.path))
            .extract::<Preferences>()
            .map(Preferences::normalized)
            .unwrap_or_else(|error| {
                tracing::warn!(path = ?self.path, %error, "ignoring malformed preferences file");
                Preferences::default()
            })
    }

    /// Writes to a staged sibling first so readers never observe a half-written file.
    fn write(&self, preferences: &Preferences) -> Result<(), PreferencesError> {
        if let Some(directory) = self.path.parent() {
            std::fs::create_dir_all(directory).context(PrepareDirectorySnafu {
                stage: "prepare-preferences-directory",
                directory,
            })?;
        }

        let encoded = serde_json::to_vec_pretty(preferences).context(EncodeSnafu {
            stage: "encode-preferences",
        })?;

        let staged = self.path.with_extension("json.staged");
        std::fs::write(&staged, encoded).context(StageSnafu {
            stage: "stage-preferences-file",
            staged: &staged,
        })?;
        std::fs::rename(&staged, &self.path).context(PublishSnafu {
            stage: "publish-preferences-file",
            staged: &staged,
            target: &self.path,
        })?;

        tracing::info!(path = ?self.path, "preferences saved");
        Ok(())
    }
}

/// Process-wide preferences backed by a JSON file.
///
/// Readers get cheap `Arc` snapshots. Every change goes through [`PreferencesStore::edit`],
/// which writes the file before publishing the new value.
pub struct PreferencesStore {
    current: ArcSwap<Preferences>,
    file: PreferencesFile,
}

impl PreferencesStore {
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .map(|path| path.join(PREFERENCES_DIRECTORY_NAME))
            .unwrap_or_else(|| PathBuf::from(".photochat"))
            .join(PREFERENCES_FILE_NAME)
    }

    pub fn new(config_path: PathBuf) -> Self {
        let file = PreferencesFile { path: config_path };
        Self {
            current: ArcSwap::from_pointee(file.read()),
            file,
        }
    }

    pub fn load() -> Self {
        Self::new(Self::default_config_path())
    }

    pub fn config_path(&self) -> &Path {
        &self.file.path
    }

    pub fn preferences(&self) -> Arc<Preferences> {
        self.current.load_full()
    }

    /// Applies `change` to a copy of the current preferences, then saves and publishes it.
    ///
    /// Changes that normalize to the current value skip the write.
    pub fn edit(
        &self,
        change: impl FnOnce(&mut Preferences),
    ) -> Result<Arc<Preferences>, PreferencesError> {
        let current = self.preferences();
        let mut next = Preferences::clone(&current);
        change(&mut next);
        let next = next.normalized();
        if next == *current {
            return Ok(current);
        }

        self.file.write(&next)?;
        let next = Arc::new(next);
        self.current.store(Arc::clone(&next));
        Ok(next)
    }

    pub fn replace(&self, preferences: Preferences) -> Result<(), PreferencesError> {
        self.edit(|current| *current = preferences)?;
        Ok(())
    }

    pub fn set_tab(&self, tab: Tab) -> Result<(), PreferencesError> {
        self.edit(|preferences| preferences.tab = tab)?;
        Ok(())
    }

    pub fn set_name(&self, name: impl Into<String>) -> Result<(), PreferencesError> {
        let name = name.into();
        self.edit(|preferences| preferences.name = name)?;
        Ok(())
    }

    pub fn set_appearance(&self, appearance: Appearance) -> Result<(), PreferencesError> {
        self.edit(|preferences| preferences.appearance = appearance)?;
        Ok(())
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum PreferencesError {
    #[snafu(display("cannot create {directory:?} for preferences (`{stage}`): {source}"))]
    PrepareDirectory {
        stage: &'static str,
        directory: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("cannot encode preferences as JSON (`{stage}`): {source}"))]
    Encode {
        stage: &'static str,
        source: serde_json::Error,
    },
    #[snafu(display("cannot stage preferences at {staged:?} (`{stage}`): {source}"))]
    Stage {
        stage: &'static str,
        staged: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("cannot move {staged:?} over {target:?} (`{stage}`): {source}"))]
    Publish {
        stage: &'static str,
        staged: PathBuf,
        target: PathBuf,
        source: std::io::Error,
    },
}

fn default_display_name() -> String {
    DEFAULT_DISPLAY_NAME.to_string()
}
