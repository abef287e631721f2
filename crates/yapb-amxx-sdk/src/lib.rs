//! YaPB AMXX SDK
//!
//! The contract between the AMXX bridge module and the YaPB native library.
//! The bot library publishes a single factory export which hands out a
//! [`BotApiTable`] for a requested [`BOT_API_VERSION`]; the bridge validates
//! the table and forwards script natives through it.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use yapb_amxx_sdk::prelude::*;
//!
//! #[derive(Default)]
//! struct MyBot;
//!
//! impl BotApi for MyBot {
//!     // ...
//! }
//!
//! export_bot_api!(MyBot);
//! ```

pub mod api;
#[macro_use]
pub mod macros;
pub mod table;

pub use api::{BotApi, NodeFlags, Vec3, INVALID_NODE_INDEX};
pub use table::{BotApiFactory, BotApiTable, ExportedApi};

/// Version token passed to the factory export.
///
/// A native library returns a null table for any token it does not support.
pub const BOT_API_VERSION: i32 = 1;

/// Name of the factory export every native library must provide.
pub const BOT_API_EXPORT: &str = "GetBotAPI";

/// Prelude module with common imports
pub mod prelude {
    pub use crate::api::{BotApi, NodeFlags, Vec3, INVALID_NODE_INDEX};
    pub use crate::table::{BotApiFactory, BotApiTable, ExportedApi};
    pub use crate::{export_bot_api, BOT_API_EXPORT, BOT_API_VERSION};
}
