//! INI parsing: `Ini` → `ConfigFile`.
//!
//! The single place where INI key names are mapped to struct fields.

use std::path::PathBuf;

use ini::Ini;

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found.
/// Empty values keep the default.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    if let Some(section) = ini.section(Some("server")) {
        if let Some(v) = non_empty(section.get("root")) {
            config.server.root = Some(expand_tilde(v));
        }
        if let Some(v) = non_empty(section.get("world")) {
            config.server.world = Some(v.to_string());
        }
    }

    if let Some(section) = ini.section(Some("install")) {
        if let Some(v) = non_empty(section.get("auto_activate")) {
            config.install.auto_activate = parse_bool(v).ok_or_else(|| {
                ConfigFileError::InvalidValue {
                    section: "install".to_string(),
                    key: "auto_activate".to_string(),
                    value: v.to_string(),
                    reason: "must be true or false".to_string(),
                }
            })?;
        }
        if let Some(v) = non_empty(section.get("scratch_dir")) {
            if v.contains(['/', '\\']) || v == "." || v == ".." {
                return Err(ConfigFileError::InvalidValue {
                    section: "install".to_string(),
                    key: "scratch_dir".to_string(),
                    value: v.to_string(),
                    reason: "must be a plain folder name inside the server root".to_string(),
                });
            }
            config.install.scratch_dir = v.to_string();
        }
    }

    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = non_empty(section.get("directory")) {
            config.logging.directory = expand_tilde(v);
        }
        if let Some(v) = non_empty(section.get("file")) {
            config.logging.file = v.to_string();
        }
    }

    Ok(config)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Strict boolean: anything unrecognized is an error, not `false`.
pub(super) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<ConfigFile, ConfigFileError> {
        parse_ini(&Ini::load_from_str(text).unwrap())
    }

    #[test]
    fn test_parse_all_sections() {
        let config = parse(
            "[server]\nroot = /srv/bds\nworld = Bedrock level\n\
             [install]\nauto_activate = no\nscratch_dir = .staging\n\
             [logging]\ndirectory = /tmp/logs\nfile = packs.log\n",
        )
        .unwrap();

        assert_eq!(config.server.root, Some(PathBuf::from("/srv/bds")));
        assert_eq!(config.server.world.as_deref(), Some("Bedrock level"));
        assert!(!config.install.auto_activate);
        assert_eq!(config.install.scratch_dir, ".staging");
        assert_eq!(config.logging.directory, PathBuf::from("/tmp/logs"));
        assert_eq!(config.logging.file, "packs.log");
    }

    #[test]
    fn test_empty_values_keep_defaults() {
        let config = parse("[server]\nroot =\n[install]\nauto_activate = \n").unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_invalid_bool() {
        let err = parse("[install]\nauto_activate = maybe\n").unwrap_err();
        match err {
            ConfigFileError::InvalidValue { section, key, value, .. } => {
                assert_eq!(section, "install");
                assert_eq!(key, "auto_activate");
                assert_eq!(value, "maybe");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_scratch_dir_must_be_a_folder_name() {
        assert!(parse("[install]\nscratch_dir = ../outside\n").is_err());
        assert!(parse("[install]\nscratch_dir = ..\n").is_err());
    }

    #[test]
    fn test_parse_bool_values() {
        assert_eq!(parse_bool(" ON "), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("nope"), None);
    }

    #[test]
    fn test_expand_tilde() {
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/logs"), home.join("logs"));
        }
    }
}
