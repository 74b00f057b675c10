use crate::scramble::{AnimationConfig, Direction, GlyphMode};
use serde::Deserialize;
use std::{
    collections::HashSet,
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

/// The largest supported frame rate.
const MAX_FRAME_RATE: u32 = 240;

#[derive(Clone, Debug, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// The defaults used when starting an animation.
    #[serde(default)]
    pub defaults: AnimationDefaults,

    /// Characters that are never scrambled.
    #[serde(default = "default_whitelist")]
    pub whitelist: Vec<String>,

    /// The number of frames drawn per second.
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,

    /// A seed for the glyph generator, to get the same glyphs on every run.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Config {
    /// Load the config from a path.
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        let config: Self = serde_yaml::from_str(&contents)?;
        config.validate()?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load the config from the given path, falling back to the default location.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigLoadError> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigLoadError::NotFound(path.into()));
                }
                Self::load(path)
            }
            None => match default_config_path() {
                Some(path) => Self::load(&path),
                None => Ok(Self::default()),
            },
        }
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        self.whitelist_chars()?;
        self.defaults.duration()?;
        if !(1..=MAX_FRAME_RATE).contains(&self.frame_rate) {
            return Err(ConfigLoadError::InvalidFrameRate(self.frame_rate));
        }
        Ok(())
    }

    /// The whitelist as a set of characters.
    pub fn whitelist_chars(&self) -> Result<HashSet<char>, ConfigLoadError> {
        parse_whitelist(&self.whitelist)
    }

    /// Build an animation config for the given text using the configured defaults.
    pub fn animation(&self, text: &str) -> Result<AnimationConfig, ConfigLoadError> {
        Ok(AnimationConfig::new(text)
            .duration(self.defaults.duration()?)
            .mode(self.defaults.mode)
            .direction(self.defaults.direction)
            .whitelist(self.whitelist_chars()?))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            defaults: Default::default(),
            whitelist: default_whitelist(),
            frame_rate: default_frame_rate(),
            seed: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct AnimationDefaults {
    /// The animation duration, in seconds.
    #[serde(default = "default_duration")]
    pub duration: f64,

    #[serde(default)]
    pub mode: GlyphMode,

    #[serde(default)]
    pub direction: Direction,
}

impl AnimationDefaults {
    pub fn duration(&self) -> Result<Duration, ConfigLoadError> {
        parse_duration(self.duration)
    }
}

impl Default for AnimationDefaults {
    fn default() -> Self {
        Self { duration: default_duration(), mode: Default::default(), direction: Default::default() }
    }
}

/// Turn a number of seconds into a duration, rejecting anything that isn't strictly positive.
pub fn parse_duration(seconds: f64) -> Result<Duration, ConfigLoadError> {
    match Duration::try_from_secs_f64(seconds) {
        Ok(duration) if !duration.is_zero() => Ok(duration),
        _ => Err(ConfigLoadError::InvalidDuration(seconds)),
    }
}

/// Parse whitelist entries, each of which must be exactly one character.
pub fn parse_whitelist<S: AsRef<str>>(entries: &[S]) -> Result<HashSet<char>, ConfigLoadError> {
    let mut whitelist = HashSet::new();
    for entry in entries {
        let entry = entry.as_ref();
        let mut chars = entry.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => whitelist.insert(c),
            _ => return Err(ConfigLoadError::InvalidWhitelistEntry(entry.to_string())),
        };
    }
    Ok(whitelist)
}

/// The path the config is read from when none is given explicitly.
pub fn default_config_path() -> Option<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "decode-label")?;
    Some(dirs.config_dir().join("config.yaml"))
}

fn default_duration() -> f64 {
    3.0
}

fn default_frame_rate() -> u32 {
    60
}

fn default_whitelist() -> Vec<String> {
    [".", ",", "%"].into_iter().map(String::from).collect()
}

/// An error when loading a config file.
#[derive(thiserror::Error, Debug)]
pub enum ConfigLoadError {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("config file not found: {0:?}")]
    NotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] serde_yaml::Error),

    #[error("whitelist entries must be a single character, got {0:?}")]
    InvalidWhitelistEntry(String),

    #[error("duration must be a positive number of seconds, got {0}")]
    InvalidDuration(f64),

    #[error("frame rate must be between 1 and 240, got {0}")]
    InvalidFrameRate(u32),
}
