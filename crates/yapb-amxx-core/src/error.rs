//! Error types for loading the bot library.
//!
//! None of these ever reach the host as a fault: the bridge logs them once
//! and switches the natives to the unavailable stub.

use std::path::PathBuf;

/// Why the bridge could not obtain a capability table.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The library file does not exist.
    #[error("Unable to locate YaPB DLL at: {}", .path.display())]
    LibraryNotFound { path: PathBuf },

    /// The file exists but the OS refused to map it.
    #[error("Unable to open YaPB DLL at: {} ({reason})", .path.display())]
    LibraryLoadFailed { path: PathBuf, reason: String },

    /// The library does not export the factory.
    #[error("Missing YaPB DLL export {}:{symbol}()", .path.display())]
    ExportMissing { path: PathBuf, symbol: String },

    /// The factory returned no table for the requested version.
    #[error(
        "No API returned from YaPB DLL {}. Probably bot api version mismatch (requested version {version}).",
        .path.display()
    )]
    VersionRejected { path: PathBuf, version: i32 },

    /// The factory returned a table the bridge cannot use.
    #[error("Invalid API returned from YaPB DLL {}: {source}", .path.display())]
    InvalidTable {
        path: PathBuf,
        #[source]
        source: TableError,
    },
}

impl BridgeError {
    /// Short name of the load step that failed.
    pub fn step(&self) -> &'static str {
        match self {
            BridgeError::LibraryNotFound { .. } => "locate",
            BridgeError::LibraryLoadFailed { .. } => "open",
            BridgeError::ExportMissing { .. } => "resolve",
            BridgeError::VersionRejected { .. } => "create",
            BridgeError::InvalidTable { .. } => "validate",
        }
    }

    /// Library path involved in the failure.
    pub fn path(&self) -> &PathBuf {
        match self {
            BridgeError::LibraryNotFound { path }
            | BridgeError::LibraryLoadFailed { path, .. }
            | BridgeError::ExportMissing { path, .. }
            | BridgeError::VersionRejected { path, .. }
            | BridgeError::InvalidTable { path, .. } => path,
        }
    }
}

/// Header checks on a capability table returned by the factory.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// The table is smaller than the layout the bridge reads.
    #[error("table is {found} bytes, expected at least {expected}")]
    Truncated { expected: u32, found: u32 },

    /// The table was built for another version token.
    #[error("table version {found} does not match requested version {expected}")]
    VersionMismatch { expected: i32, found: i32 },
}

/// Result type for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;
