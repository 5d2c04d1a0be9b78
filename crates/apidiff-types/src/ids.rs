//! Stable identifiers shared by the report, the config files, and the CLI.

pub const TOOL_NAME: &str = "apidiff";

// Schemas
pub const SCHEMA_EXCLUSIONS_V1: &str = "apidiff.exclusions.v1";
pub const SCHEMA_CONFIG_V1: &str = "apidiff.config.v1";

// Default file names
pub const DEFAULT_CONFIG_FILE: &str = "apidiff.toml";
pub const DEFAULT_EXCLUSIONS_FILE: &str = "apidiff.exclusions.toml";
pub const PACKAGE_META_FILE: &str = "package.json";
pub const PLATFORMS_DIR: &str = "lib";
pub const MODULE_EXTENSION: &str = "json";
