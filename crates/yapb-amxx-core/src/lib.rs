//! YaPB AMXX bridge.
//!
//! Loads the YaPB bot library at runtime, obtains its capability table and
//! exposes the `yb_*` script natives. When the library is missing or
//! incompatible the module stays usable: every native raises a
//! "native unavailable" script error instead of taking the server down.
//!
//! The host drives everything through [`module::on_attach`],
//! [`module::on_detach`] and [`natives::NativeInfo::invoke`]. All of them
//! must be called from the host's game thread.

pub mod amx;
pub mod bridge;
pub mod config;
pub mod error;
pub mod library;
pub mod logging;
pub mod module;
pub mod native;
pub mod natives;

pub use amx::{Amx, AmxError, Cell, ModuleHost, Params};
pub use bridge::{yapb, Bridge};
pub use config::BridgeConfig;
pub use error::{BridgeError, Result, TableError};
pub use library::{LibraryHandle, NativeLibrary};
pub use native::NativeBotApi;
pub use natives::{NativeInfo, BOT_NATIVES, UNAVAILABLE_MESSAGE};

/// Re-exports commonly used types.
pub mod prelude {
    pub use crate::amx::{Amx, AmxError, Cell, ModuleHost, Params};
    pub use crate::bridge::{yapb, Bridge};
    pub use crate::config::BridgeConfig;
    pub use crate::error::{BridgeError, Result};
    pub use crate::module::{on_attach, on_detach};
    pub use crate::natives::{NativeInfo, BOT_NATIVES};

    pub use yapb_amxx_sdk::{BotApi, Vec3, INVALID_NODE_INDEX};
}
