//! The bot capability interface.
//!
//! [`BotApi`] is the Rust face of the capability table. The native library
//! implements it for its bot manager, the bridge implements it over the raw
//! table it receives from the factory export, so natives never care which
//! side of the library boundary they are talking to.

use bitflags::bitflags;

/// A world-space coordinate triple.
pub type Vec3 = [f32; 3];

/// Node index reported when there is no node (dead bot, camping, no graph).
pub const INVALID_NODE_INDEX: i32 = -1;

/// Operations exposed by the bot library.
///
/// Indices are player slot indices, nodes are graph node indices. The
/// implementation validates its own inputs: out-of-range indices must be
/// ignored by commands and answered with a neutral value by queries.
pub trait BotApi: Send {
    /// Version string of the bot library.
    fn bot_version(&self) -> &str;

    /// Whether any bot is currently in game.
    fn is_bots_in_game(&self) -> bool;

    /// Whether the player at `index` is a bot.
    fn is_bot(&self, index: i32) -> bool;

    /// Graph node nearest to `origin`.
    fn nearest_node(&self, origin: &Vec3) -> i32;

    /// Whether `node` is a valid graph node index.
    fn is_node_valid(&self, node: i32) -> bool;

    /// Origin of `node`, or `None` if the node does not exist.
    fn node_origin(&self, node: i32) -> Option<Vec3>;

    /// Node the bot at `index` is currently standing on.
    fn current_node(&self, index: i32) -> i32;

    /// Force the goal node of the bot at `index`, interrupting current tasks.
    fn set_bot_goal(&mut self, index: i32, node: i32);

    /// Node the bot at `index` is currently heading to.
    fn bot_goal(&self, index: i32) -> i32;

    /// Force the goal of the bot at `index` to the node nearest `origin`.
    fn set_bot_goal_origin(&mut self, index: i32, origin: &Vec3);

    /// Whether the current map has a graph.
    fn has_graph(&self) -> bool;

    /// Raw flags of `node`; see [`NodeFlags`].
    fn node_flags(&self, node: i32) -> i32;
}

bitflags! {
    /// Flags carried by a graph node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u32 {
        /// Wait for the lift before approaching.
        const LIFT = 1 << 1;
        /// Must crouch to reach.
        const CROUCH = 1 << 2;
        /// Crossing point.
        const CROSSING = 1 << 3;
        /// Mission goal (bomb site, hostages).
        const GOAL = 1 << 4;
        /// Node is on a ladder.
        const LADDER = 1 << 5;
        /// Hostage rescue point.
        const RESCUE = 1 << 6;
        /// Camping point.
        const CAMP = 1 << 7;
        /// Only usable without a hostage in tow.
        const NO_HOSTAGE = 1 << 8;
        /// Reachable with a double jump.
        const DOUBLE_JUMP = 1 << 9;
        /// Inside a narrow space.
        const NARROW = 1 << 10;
        /// Sniper point.
        const SNIPER = 1 << 28;
        /// Terrorist-only point.
        const TERRORIST_ONLY = 1 << 29;
        /// Counter-terrorist-only point.
        const CT_ONLY = 1 << 30;
    }
}

impl NodeFlags {
    /// Decode the raw value returned by [`BotApi::node_flags`], keeping
    /// bits this SDK does not name.
    pub fn from_raw(raw: i32) -> Self {
        Self::from_bits_retain(raw as u32)
    }

    /// Raw value as carried across the table and into scripts.
    pub fn to_raw(self) -> i32 {
        self.bits() as i32
    }
}
