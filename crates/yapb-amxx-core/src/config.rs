//! Bridge configuration.
//!
//! The library location, factory export and version token are fixed; the
//! environment can only redirect the library path and tune logging.

use std::path::{Path, PathBuf};

use yapb_amxx_sdk::{BOT_API_EXPORT, BOT_API_VERSION};

/// Library location relative to the host's mod directory.
pub mod paths {
    /// Addons root inside the mod directory
    pub const ADDONS_DIR: &str = "addons";
    /// Component directory and library file stem
    pub const COMPONENT: &str = "yapb";
    /// Binary directory inside the component directory
    pub const BIN_DIR: &str = "bin";
}

/// Environment variable names.
pub mod env_vars {
    /// Full path of the bot library, replacing the computed one
    pub const LIBRARY: &str = "YAPB_AMXX_LIBRARY";
    /// `tracing` filter directives
    pub const LOG: &str = "YAPB_AMXX_LOG";
    /// Emit JSON log lines when set to `true`
    pub const LOG_JSON: &str = "YAPB_AMXX_LOG_JSON";
}

/// Native library extension for the running platform: `dll`, `so` or `dylib`.
pub fn library_extension() -> &'static str {
    std::env::consts::DLL_EXTENSION
}

/// What the bridge loads and how it asks for the capability table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Component directory and library file stem
    pub component: String,

    /// Factory export name
    pub export_symbol: String,

    /// Version token passed to the factory
    pub version: i32,

    /// Full library path overriding `<mod dir>/addons/<component>/bin/<component>.<ext>`
    pub library_override: Option<PathBuf>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            component: paths::COMPONENT.to_string(),
            export_symbol: BOT_API_EXPORT.to_string(),
            version: BOT_API_VERSION,
            library_override: None,
        }
    }
}

impl BridgeConfig {
    /// Default configuration with the environment override applied.
    pub fn from_env() -> Self {
        let library_override = std::env::var_os(env_vars::LIBRARY)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Self {
            library_override,
            ..Self::default()
        }
    }

    /// Set the version token.
    pub fn with_version(mut self, version: i32) -> Self {
        self.version = version;
        self
    }

    /// Set the factory export name.
    pub fn with_export_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.export_symbol = symbol.into();
        self
    }

    /// Load the library from a fixed path instead of the mod directory.
    pub fn with_library_override(mut self, path: impl Into<PathBuf>) -> Self {
        self.library_override = Some(path.into());
        self
    }

    /// Library path for a host whose mod directory is `mod_dir`.
    pub fn library_path(&self, mod_dir: &Path) -> PathBuf {
        if let Some(path) = &self.library_override {
            return path.clone();
        }

        mod_dir
            .join(paths::ADDONS_DIR)
            .join(&self.component)
            .join(paths::BIN_DIR)
            .join(format!("{}.{}", self.component, library_extension()))
    }
}
