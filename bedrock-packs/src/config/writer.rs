//! INI serialization: `ConfigFile` → commented INI string.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let root = config
        .server
        .root
        .as_deref()
        .map(path_to_string)
        .unwrap_or_default();
    let world = config.server.world.as_deref().unwrap_or("");
    let auto_activate = if config.install.auto_activate {
        "true"
    } else {
        "false"
    };

    format!(
        r#"[server]
; Bedrock Dedicated Server root. Leave empty to detect it from the current
; directory and known panel layouts.
root = {}
; World folder under worlds/. Leave empty to use level-name from
; server.properties.
world = {}

[install]
; Activate packs for the world right after installing them.
auto_activate = {}
; Scratch folder for archive extraction, inside the server root.
scratch_dir = {}

[logging]
directory = {}
file = {}
"#,
        root,
        world,
        auto_activate,
        config.install.scratch_dir,
        path_to_string(&config.logging.directory),
        config.logging.file,
    )
}

fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
