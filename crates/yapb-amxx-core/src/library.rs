//! Dynamic library handle.
//!
//! Owns at most one mapped library. All failures come back as values; the
//! bridge decides what to log and how to fall back.

use std::path::{Path, PathBuf};

use libloading::Library;
use yapb_amxx_sdk::BotApiFactory;

use crate::error::{BridgeError, Result};

/// The operations the bridge needs from a dynamic library.
pub trait NativeLibrary {
    /// Map the library at `path`, unloading any library held before.
    fn load(&mut self, path: &Path) -> Result<()>;

    /// Resolve the factory export, `None` if absent or nothing is loaded.
    fn factory(&self, symbol: &str) -> Option<BotApiFactory>;

    /// Release the mapped library. No-op when empty.
    fn unload(&mut self);

    /// Whether a library is currently mapped.
    fn is_loaded(&self) -> bool;
}

/// A dynamic library that is either empty or loaded.
#[derive(Debug, Default)]
pub struct LibraryHandle {
    library: Option<Library>,
    path: Option<PathBuf>,
}

impl LibraryHandle {
    /// Create an empty handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map the library at `path`.
    ///
    /// A previously loaded library is released first, so on failure the
    /// handle is left empty.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.unload();

        // SAFETY: library initialisers run here; the bot library is trusted
        // not to do anything unsound while being mapped.
        let library = unsafe { Library::new(path) }.map_err(|e| BridgeError::LibraryLoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        tracing::debug!(path = %path.display(), "Mapped native library");
        self.library = Some(library);
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Look up an exported symbol and return it as `T`.
    ///
    /// # Safety
    ///
    /// `T` must be the exact type of the exported item (normally an
    /// `extern "C"` function pointer). The returned value must not be used
    /// after this handle is unloaded or dropped.
    pub unsafe fn resolve<T: Copy>(&self, symbol: &str) -> Option<T> {
        let library = self.library.as_ref()?;
        let symbol = unsafe { library.get::<T>(symbol.as_bytes()) }.ok()?;
        Some(*symbol)
    }

    /// Release the mapped library, if any.
    pub fn unload(&mut self) {
        if let Some(library) = self.library.take() {
            if let Err(e) = library.close() {
                tracing::warn!(error = %e, "Failed to close native library");
            } else if let Some(path) = &self.path {
                tracing::debug!(path = %path.display(), "Unmapped native library");
            }
        }
        self.path = None;
    }

    /// Whether a library is currently mapped.
    pub fn is_loaded(&self) -> bool {
        self.library.is_some()
    }

    /// Path of the currently mapped library.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl NativeLibrary for LibraryHandle {
    fn load(&mut self, path: &Path) -> Result<()> {
        LibraryHandle::load(self, path)
    }

    fn factory(&self, symbol: &str) -> Option<BotApiFactory> {
        // SAFETY: the factory export is declared with exactly this signature
        // by every bot library.
        unsafe { self.resolve::<BotApiFactory>(symbol) }
    }

    fn unload(&mut self) {
        LibraryHandle::unload(self)
    }

    fn is_loaded(&self) -> bool {
        LibraryHandle::is_loaded(self)
    }
}
