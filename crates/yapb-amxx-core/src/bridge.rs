//! The bridge between the module host and the bot library.
//!
//! # Threading
//!
//! The host calls attach, detach and every native from its single game
//! thread. The process-wide instance sits behind a mutex only because Rust
//! statics must be `Sync`; the lock is never contended. Forwarding functions
//! must not call back into [`yapb`].

use std::path::{Path, PathBuf};
use std::ptr::NonNull;

use once_cell::sync::Lazy;
use parking_lot::{Mutex, MutexGuard};
use yapb_amxx_sdk::BotApi;

use crate::amx::{Amx, Cell, ModuleHost, Params};
use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};
use crate::library::{LibraryHandle, NativeLibrary};
use crate::native::NativeBotApi;
use crate::natives::{self, NativeInfo, BOT_NATIVES};

/// Owns the bot library and the capability table obtained from it.
pub struct Bridge<L: NativeLibrary = LibraryHandle> {
    config: BridgeConfig,
    library: L,
    /// Always cleared before `library` is unloaded
    api: Option<Box<dyn BotApi>>,
    natives_enabled: bool,
    library_path: Option<PathBuf>,
}

impl Bridge<LibraryHandle> {
    /// Create a bridge backed by a real dynamic library handle.
    pub fn new(config: BridgeConfig) -> Self {
        Self::with_library(config, LibraryHandle::new())
    }
}

impl<L: NativeLibrary> Bridge<L> {
    /// Create a bridge over any [`NativeLibrary`] implementation.
    pub fn with_library(config: BridgeConfig, library: L) -> Self {
        Self {
            config,
            library,
            api: None,
            natives_enabled: true,
            library_path: None,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn library(&self) -> &L {
        &self.library
    }

    /// Load the bot library and obtain its capability table.
    ///
    /// On failure the error has already been logged through the host and
    /// the natives disabled; the returned error is informational.
    pub fn load(&mut self, host: &dyn ModuleHost) -> Result<()> {
        match self.try_load(host) {
            Ok(api) => {
                tracing::info!(
                    version = api.bot_version(),
                    path = ?self.library_path,
                    "YaPB bot library loaded"
                );
                self.api = Some(api);
                self.natives_enabled = true;
                Ok(())
            }
            Err(err) => {
                host.log(&format!("ERROR: {err}"));
                tracing::error!(
                    step = err.step(),
                    path = %err.path().display(),
                    error = %err,
                    "Failed to load YaPB bot library"
                );
                self.unload();
                self.disable_natives();
                Err(err)
            }
        }
    }

    fn try_load(&mut self, host: &dyn ModuleHost) -> Result<Box<dyn BotApi>> {
        if self.library.is_loaded() {
            self.unload();
        }

        let path = self.config.library_path(&host.mod_dir());
        if !path.exists() {
            return Err(BridgeError::LibraryNotFound { path });
        }

        self.library.load(&path)?;
        self.library_path = Some(path.clone());

        let symbol = &self.config.export_symbol;
        let factory = self
            .library
            .factory(symbol)
            .ok_or_else(|| BridgeError::ExportMissing {
                path: path.clone(),
                symbol: symbol.clone(),
            })?;

        let version = self.config.version;
        // SAFETY: the export has the `BotApiFactory` signature and the
        // library stays mapped while we call it.
        let raw = unsafe { factory(version) };
        let table = NonNull::new(raw.cast_mut())
            .ok_or_else(|| BridgeError::VersionRejected {
                path: path.clone(),
                version,
            })?;

        // SAFETY: the table belongs to the mapped library, and `unload`
        // drops the wrapper before unmapping it.
        let api = unsafe { NativeBotApi::from_raw(table, version) }
            .map_err(|source| BridgeError::InvalidTable { path, source })?;

        Ok(Box::new(api))
    }

    /// Drop the capability table and unload the library. Idempotent.
    pub fn unload(&mut self) {
        self.api = None;

        if self.library.is_loaded() {
            self.library.unload();
            tracing::debug!(path = ?self.library_path, "YaPB bot library unloaded");
        }
        self.library_path = None;
    }

    /// Route every native to the unavailable stub.
    pub fn disable_natives(&mut self) {
        self.natives_enabled = false;
        tracing::warn!("YaPB natives disabled");
    }

    /// Whether natives forward to the library when a table is held.
    pub fn natives_enabled(&self) -> bool {
        self.natives_enabled
    }

    /// Whether a capability table is currently held.
    pub fn is_loaded(&self) -> bool {
        self.api.is_some()
    }

    /// Path of the loaded library.
    pub fn library_path(&self) -> Option<&Path> {
        self.library_path.as_deref()
    }

    /// The current capability table, if any.
    pub fn api(&self) -> Option<&dyn BotApi> {
        self.api.as_deref()
    }

    pub fn api_mut(&mut self) -> Option<&mut (dyn BotApi + 'static)> {
        self.api.as_deref_mut()
    }

    /// Dispatch one native call.
    pub fn call(&mut self, native: &NativeInfo, amx: &mut dyn Amx, params: Params<'_>) -> Cell {
        if !self.natives_enabled {
            return natives::unavailable(amx);
        }

        match self.api.as_deref_mut() {
            Some(api) => native.forward(api, amx, params),
            None => natives::unavailable(amx),
        }
    }

    /// Register the natives with the host and load the library.
    pub fn attach(&mut self, host: &mut dyn ModuleHost) {
        host.add_natives(BOT_NATIVES);

        if let Err(err) = self.load(&*host) {
            tracing::debug!(step = err.step(), "Attached with natives disabled");
        }
    }

    /// Unload the library.
    pub fn detach(&mut self) {
        self.unload();
    }
}

impl<L: NativeLibrary> Drop for Bridge<L> {
    fn drop(&mut self) {
        self.unload();
    }
}

static BRIDGE: Lazy<Mutex<Bridge>> =
    Lazy::new(|| Mutex::new(Bridge::new(BridgeConfig::from_env())));

/// Lock the process-wide bridge.
pub fn yapb() -> MutexGuard<'static, Bridge> {
    BRIDGE.lock()
}
