/// Application name, used for config and data directories.
pub const APP_NAME: &str = "daybook";

/// Schema version stamped into new databases.
pub const SCHEMA_VERSION: i64 = 1;

/// Database file name inside the data directory.
pub const DB_FILE_NAME: &str = "db";

/// Config file name inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Prefix for environment variable overrides (e.g. `DAYBOOK_TIMEZONE`).
pub const ENV_PREFIX: &str = "DAYBOOK";
