//! The bridge's view of a capability table returned by the bot library.

use std::ffi::CStr;
use std::ptr::{self, NonNull};

use yapb_amxx_sdk::{BotApi, BotApiTable, Vec3};

use crate::error::TableError;

/// Non-owning [`BotApi`] over a table that lives inside the bot library.
///
/// Must be dropped before the library that produced it is unloaded.
pub struct NativeBotApi {
    table: NonNull<BotApiTable>,
}

// SAFETY: natives run on the host's single game thread; the bridge only
// moves this value between threads while holding its lock.
unsafe impl Send for NativeBotApi {}

impl NativeBotApi {
    /// Wrap a non-null table after checking its header against `version`.
    ///
    /// # Safety
    ///
    /// `table` must point to a table that stays valid, together with its
    /// instance and functions, for the lifetime of the returned value. The
    /// header is read before validation, so it must be at least
    /// `size` + `version` bytes long.
    pub unsafe fn from_raw(table: NonNull<BotApiTable>, version: i32) -> Result<Self, TableError> {
        // Only the header is known to exist until `size` has been checked
        let raw = table.as_ptr();
        let size = unsafe { ptr::addr_of!((*raw).size).read() };
        let found = unsafe { ptr::addr_of!((*raw).version).read() };

        if size < BotApiTable::SIZE {
            return Err(TableError::Truncated {
                expected: BotApiTable::SIZE,
                found: size,
            });
        }
        if found != version {
            return Err(TableError::VersionMismatch {
                expected: version,
                found,
            });
        }

        Ok(Self { table })
    }

    fn table(&self) -> &BotApiTable {
        // SAFETY: validity is the contract of `from_raw`
        unsafe { self.table.as_ref() }
    }
}

// Keeps everything up to the first invalid UTF-8 sequence
fn valid_prefix(bytes: &[u8]) -> &str {
    match std::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => std::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default(),
    }
}

impl BotApi for NativeBotApi {
    fn bot_version(&self) -> &str {
        let t = self.table();
        let raw = unsafe { (t.get_bot_version)(t.instance) };
        if raw.is_null() {
            return "";
        }
        valid_prefix(unsafe { CStr::from_ptr(raw) }.to_bytes())
    }

    fn is_bots_in_game(&self) -> bool {
        let t = self.table();
        unsafe { (t.is_bots_in_game)(t.instance) }
    }

    fn is_bot(&self, index: i32) -> bool {
        let t = self.table();
        unsafe { (t.is_bot)(t.instance, index) }
    }

    fn nearest_node(&self, origin: &Vec3) -> i32 {
        let t = self.table();
        unsafe { (t.get_nearest_node)(t.instance, origin.as_ptr()) }
    }

    fn is_node_valid(&self, node: i32) -> bool {
        let t = self.table();
        unsafe { (t.is_node_valid)(t.instance, node) }
    }

    fn node_origin(&self, node: i32) -> Option<Vec3> {
        let t = self.table();
        let mut origin = [0.0f32; 3];
        let found = unsafe { (t.get_node_origin)(t.instance, node, origin.as_mut_ptr()) };
        found.then_some(origin)
    }

    fn current_node(&self, index: i32) -> i32 {
        let t = self.table();
        unsafe { (t.get_current_node_id)(t.instance, index) }
    }

    fn set_bot_goal(&mut self, index: i32, node: i32) {
        let t = self.table();
        unsafe { (t.set_bot_goal)(t.instance, index, node) }
    }

    fn bot_goal(&self, index: i32) -> i32 {
        let t = self.table();
        unsafe { (t.get_bot_goal)(t.instance, index) }
    }

    fn set_bot_goal_origin(&mut self, index: i32, origin: &Vec3) {
        let t = self.table();
        unsafe { (t.set_bot_goal_origin)(t.instance, index, origin.as_ptr()) }
    }

    fn has_graph(&self) -> bool {
        let t = self.table();
        unsafe { (t.has_graph)(t.instance) }
    }

    fn node_flags(&self, node: i32) -> i32 {
        let t = self.table();
        unsafe { (t.get_node_flags)(t.instance, node) }
    }
}
