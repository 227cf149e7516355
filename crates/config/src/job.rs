// Job configuration
// Loaded from ./deckdiff.toml or ~/.config/deckdiff/config.toml

use std::fs;
use std::path::{Path, PathBuf};

use deckdiff_recon::JobInputs;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const LOCAL_CONFIG_NAME: &str = "deckdiff.toml";

const DEFAULT_INPUT_LOCATION: &str = "data/input/";
const DEFAULT_MASTER_LOCATION: &str = "data/store/";
const DEFAULT_OUTPUT_LOCATION: &str = "data/output/";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfig {
    #[serde(default)]
    pub files: FilesConfig,
}

/// The six job parameters. Names are given without the `.json` extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    pub input_location: String,
    pub input_name: Option<String>,
    pub master_location: String,
    pub master_name: Option<String>,
    pub category_name: Option<String>,
    pub output_location: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            input_location: DEFAULT_INPUT_LOCATION.into(),
            input_name: None,
            master_location: DEFAULT_MASTER_LOCATION.into(),
            master_name: None,
            category_name: None,
            output_location: DEFAULT_OUTPUT_LOCATION.into(),
        }
    }
}

/// Command-line values that replace config file values.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub input_location: Option<String>,
    pub input_name: Option<String>,
    pub master_location: Option<String>,
    pub master_name: Option<String>,
    pub category_name: Option<String>,
    pub output_location: Option<String>,
}

impl JobConfig {
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    /// `./deckdiff.toml` when present, else the per-user config file.
    pub fn default_path() -> PathBuf {
        let local = PathBuf::from(LOCAL_CONFIG_NAME);
        if local.exists() {
            return local;
        }
        Self::user_config_path()
    }

    pub fn user_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("deckdiff")
            .join("config.toml")
    }

    pub fn apply(&mut self, overrides: Overrides) {
        let files = &mut self.files;
        if let Some(v) = overrides.input_location {
            files.input_location = v;
        }
        if overrides.input_name.is_some() {
            files.input_name = overrides.input_name;
        }
        if let Some(v) = overrides.master_location {
            files.master_location = v;
        }
        if overrides.master_name.is_some() {
            files.master_name = overrides.master_name;
        }
        if overrides.category_name.is_some() {
            files.category_name = overrides.category_name;
        }
        if let Some(v) = overrides.output_location {
            files.output_location = v;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let files = &self.files;
        required("input_name", &files.input_name)?;
        required("master_name", &files.master_name)?;
        required("category_name", &files.category_name)?;

        for (key, value) in [
            ("input_name", &files.input_name),
            ("master_name", &files.master_name),
            ("category_name", &files.category_name),
        ] {
            if let Some(v) = value {
                if v.contains('/') || v.contains('\\') {
                    return Err(ConfigError::Validation(format!(
                        "{key} must be a plain name, got '{v}'"
                    )));
                }
            }
        }

        for (key, value) in [
            ("input_location", &files.input_location),
            ("master_location", &files.master_location),
            ("output_location", &files.output_location),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }

        Ok(())
    }

    /// Validate and turn the config into concrete job inputs. Relative
    /// locations are taken relative to `base_dir`.
    pub fn resolve(&self, base_dir: &Path) -> Result<JobInputs, ConfigError> {
        self.validate()?;
        let files = &self.files;
        let name = |v: &Option<String>| v.clone().unwrap_or_default();

        Ok(JobInputs {
            input_file: base_dir
                .join(&files.input_location)
                .join(json_file_name(&name(&files.input_name))),
            master_file: base_dir
                .join(&files.master_location)
                .join(json_file_name(&name(&files.master_name))),
            output_location: base_dir.join(&files.output_location),
            category_name: name(&files.category_name),
        })
    }

    /// Starter config written by `deckdiff init`.
    pub fn template() -> &'static str {
        r#"# deckdiff job configuration
# Relative locations are resolved against the directory of this file.

[files]
input_location = "data/input/"
input_name = "board"          # data/input/board.json
master_location = "data/store/"
master_name = "master"        # data/store/master.json
category_name = "Inbox"       # list name in the board export
output_location = "data/output/"
"#
    }

    /// Write [`JobConfig::template`] to `path`. Refuses to replace an existing file.
    pub fn write_template(path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .and_then(|mut file| std::io::Write::write_all(&mut file, Self::template().as_bytes()))
            .map_err(io_err)
    }
}

fn required(key: &str, value: &Option<String>) -> Result<(), ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(ConfigError::Validation(format!("{key} is required"))),
    }
}

fn json_file_name(name: &str) -> String {
    if name.ends_with(".json") {
        name.to_string()
    } else {
        format!("{name}.json")
    }
}
