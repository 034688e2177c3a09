//! Global daybook configuration.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{APP_NAME, CONFIG_FILE_NAME, DB_FILE_NAME, ENV_PREFIX};
use crate::error::{CalendarError, CalendarResult};
use crate::local::{resolve_timezone, system_timezone};

/// Configuration at ~/.config/daybook/config.toml, overridable through
/// `DAYBOOK_*` environment variables.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaybookConfig {
    /// Database file. Defaults to the per-user data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,

    /// IANA timezone for reading and printing times. Defaults to the system zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl DaybookConfig {
    pub fn config_path() -> CalendarResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalendarError::Config("Could not determine config directory".into()))?
            .join(APP_NAME);

        Ok(config_dir.join(CONFIG_FILE_NAME))
    }

    /// Per-user default database location, e.g. ~/.local/share/daybook/db.
    pub fn default_db_path() -> CalendarResult<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| CalendarError::Config("Could not determine data directory".into()))?
            .join(APP_NAME);

        Ok(data_dir.join(DB_FILE_NAME))
    }

    /// Load the config file (writing a commented default if there is none)
    /// and apply environment overrides.
    pub fn load() -> CalendarResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists()
            && let Err(e) = Self::create_default_config(&config_path)
        {
            tracing::warn!("{}", e);
        }

        Self::load_from(&config_path)
    }

    /// Load from a specific file (missing is fine) plus the environment.
    pub fn load_from(path: &Path) -> CalendarResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()
            .map_err(|e| CalendarError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalendarError::Config(e.to_string()))
    }

    /// The database path with `~` expanded, or the default location.
    pub fn db_path(&self) -> CalendarResult<PathBuf> {
        match &self.db_path {
            Some(path) => Ok(expand_tilde(path)),
            None => Self::default_db_path(),
        }
    }

    /// The configured timezone, or the system timezone if unset.
    pub fn timezone(&self) -> CalendarResult<Tz> {
        match &self.timezone {
            Some(name) => resolve_timezone(name),
            None => Ok(system_timezone()),
        }
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalendarResult<()> {
        let contents = "\
# daybook configuration

# Where your events are stored:
# db_path = \"~/.local/share/daybook/db\"

# Timezone used to read and print times (defaults to the system timezone):
# timezone = \"Europe/Brussels\"
";

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalendarError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalendarError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}
