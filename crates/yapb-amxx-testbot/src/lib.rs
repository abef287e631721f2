//! Test Bot Library
//!
//! A tiny stand-in for the YaPB bot library: a fixed four-node graph and a
//! couple of bot slots. Built as a `cdylib` it exports `GetBotAPI` like the
//! real library does; linked as an `rlib` it gives tests an in-process
//! [`BotApi`] implementation.

use yapb_amxx_sdk::prelude::*;

/// Version string reported by the test library.
pub const TEST_BOT_VERSION: &str = "4.4.0-testbot";

/// Highest valid player slot.
pub const MAX_PLAYERS: i32 = 32;

#[derive(Debug, Clone, Copy)]
struct Node {
    origin: Vec3,
    flags: NodeFlags,
}

#[derive(Debug, Clone, Copy)]
struct BotSlot {
    index: i32,
    node: i32,
    goal: i32,
}

/// Bot manager over a fixed in-memory graph.
#[derive(Debug, Clone)]
pub struct TestBot {
    nodes: Vec<Node>,
    bots: Vec<BotSlot>,
}

impl TestBot {
    /// A map with a graph and bots in slots 1 and 3.
    pub fn with_graph() -> Self {
        let nodes = vec![
            Node {
                origin: [0.0, 0.0, 36.0],
                flags: NodeFlags::empty(),
            },
            Node {
                origin: [256.0, 0.0, 36.0],
                flags: NodeFlags::CROUCH,
            },
            Node {
                origin: [256.0, 512.0, 36.0],
                flags: NodeFlags::GOAL | NodeFlags::TERRORIST_ONLY,
            },
            Node {
                origin: [-128.0, 64.5, 100.0],
                flags: NodeFlags::LADDER | NodeFlags::CAMP,
            },
        ];
        let bots = vec![
            BotSlot {
                index: 1,
                node: 0,
                goal: INVALID_NODE_INDEX,
            },
            BotSlot {
                index: 3,
                node: 1,
                goal: 2,
            },
        ];
        Self { nodes, bots }
    }

    /// A map without a graph or bots.
    pub fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            bots: Vec::new(),
        }
    }

    fn node(&self, node: i32) -> Option<&Node> {
        usize::try_from(node).ok().and_then(|i| self.nodes.get(i))
    }

    fn bot(&self, index: i32) -> Option<&BotSlot> {
        self.bots.iter().find(|b| b.index == index)
    }

    fn bot_mut(&mut self, index: i32) -> Option<&mut BotSlot> {
        self.bots.iter_mut().find(|b| b.index == index)
    }
}

impl Default for TestBot {
    fn default() -> Self {
        Self::with_graph()
    }
}

fn distance_squared(a: &Vec3, b: &Vec3) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

impl BotApi for TestBot {
    fn bot_version(&self) -> &str {
        TEST_BOT_VERSION
    }

    fn is_bots_in_game(&self) -> bool {
        !self.bots.is_empty()
    }

    fn is_bot(&self, index: i32) -> bool {
        (1..=MAX_PLAYERS).contains(&index) && self.bot(index).is_some()
    }

    fn nearest_node(&self, origin: &Vec3) -> i32 {
        self.nodes
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                distance_squared(&a.origin, origin).total_cmp(&distance_squared(&b.origin, origin))
            })
            .map_or(INVALID_NODE_INDEX, |(i, _)| i as i32)
    }

    fn is_node_valid(&self, node: i32) -> bool {
        self.node(node).is_some()
    }

    fn node_origin(&self, node: i32) -> Option<Vec3> {
        self.node(node).map(|n| n.origin)
    }

    fn current_node(&self, index: i32) -> i32 {
        self.bot(index).map_or(INVALID_NODE_INDEX, |b| b.node)
    }

    fn set_bot_goal(&mut self, index: i32, node: i32) {
        if !self.is_node_valid(node) {
            return;
        }
        if let Some(bot) = self.bot_mut(index) {
            bot.goal = node;
        }
    }

    fn bot_goal(&self, index: i32) -> i32 {
        self.bot(index).map_or(INVALID_NODE_INDEX, |b| b.goal)
    }

    fn set_bot_goal_origin(&mut self, index: i32, origin: &Vec3) {
        let node = self.nearest_node(origin);
        self.set_bot_goal(index, node);
    }

    fn has_graph(&self) -> bool {
        !self.nodes.is_empty()
    }

    fn node_flags(&self, node: i32) -> i32 {
        self.node(node).map_or(0, |n| n.flags.to_raw())
    }
}

export_bot_api!(TestBot, TestBot::with_graph);
