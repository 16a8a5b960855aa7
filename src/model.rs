//! Core data models for the charity well game.
//! The persisted record, the shop catalogue and the reducer driving them.

use serde::{Deserialize, Serialize};
use std::rc::Rc;
use yew::Reducible;

/// Litres delivered needed for the first achievement.
pub const ACHIEVEMENT_100L: &str = "100L";
/// Litres credited by a delivery when nothing useful is placed.
pub const BASE_DELIVERY_LITRES: u64 = 2;
pub const MISSION_LENGTH_SECS: u64 = 60;
pub const STARTING_FUNDS: u64 = 100;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    #[serde(default)]
    pub water: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopItem {
    pub id: String,
    pub name: String,
    pub cost: u64,
    #[serde(default)]
    pub effect: Effect,
}

impl ShopItem {
    fn new(id: &str, name: &str, cost: u64, water: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cost,
            effect: Effect { water },
        }
    }

    /// Half the cost, rounded up.
    pub fn refund(&self) -> u64 {
        self.cost.div_ceil(2)
    }
}

pub fn shop_catalogue() -> Vec<ShopItem> {
    vec![
        ShopItem::new("bucket", "Bucket", 10, 5),
        ShopItem::new("pump", "Hand Pump", 40, 20),
        ShopItem::new("pipe", "Pipe", 15, 0),
    ]
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedItem {
    /// Zero-based plot index (row-major).
    pub index: usize,
    pub item: ShopItem,
}

/// Avatar position in world pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameState {
    pub funds: u64,
    pub water_delivered: u64,
    pub selected_tool: Option<ShopItem>,
    pub placed_items: Vec<PlacedItem>,
    pub mission_active: bool,
    pub mission_time_left: u64,
    pub achievements: Vec<String>,
    pub player: Player,
    /// Litres delivered since the current mission started.
    pub mission_delivered: u64,
    /// Feedback line shown under the map.
    #[serde(skip)]
    pub status: String,
    /// Bumped whenever a persisted field changes; drives saving.
    #[serde(skip)]
    pub revision: u64,
    /// Set when a mission runs out of time, cleared when the report is closed.
    #[serde(skip)]
    pub mission_report: Option<u64>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            funds: STARTING_FUNDS,
            water_delivered: 0,
            selected_tool: None,
            placed_items: Vec::new(),
            mission_active: false,
            mission_time_left: 0,
            achievements: Vec::new(),
            player: Player::default(),
            mission_delivered: 0,
            status: String::new(),
            revision: 0,
            mission_report: None,
        }
    }
}

impl GameState {
    pub fn placed_at(&self, index: usize) -> Option<&PlacedItem> {
        self.placed_items.iter().find(|p| p.index == index)
    }

    /// Litres one delivery would yield right now.
    pub fn delivery_yield(&self) -> u64 {
        let gained: u64 = self.placed_items.iter().map(|p| p.item.effect.water).sum();
        if gained == 0 { BASE_DELIVERY_LITRES } else { gained }
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.iter().any(|a| a == id)
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum GameAction {
    SelectTool(ShopItem),
    ClickTile { index: usize },
    DeliverWater,
    /// Move the avatar by a delta, clamped to `[0, max]` per axis.
    MovePlayer { dx: f64, dy: f64, max_x: f64, max_y: f64 },
    StartMission,
    TickSecond, // once per real second while the game screen is up
    DismissReport,
    SetStatus(String),
    /// Replace everything with a freshly loaded record.
    Replace(GameState),
    Reset,
}

impl Reducible for GameState {
    type Action = GameAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        use GameAction::*;
        let mut new = (*self).clone();
        match action {
            SelectTool(item) => {
                new.status = format!("Selected: {}. Click a map tile to place it.", item.name);
                new.selected_tool = Some(item);
                new.touch();
            }
            ClickTile { index } => {
                let Some(tool) = new.selected_tool.clone() else {
                    new.status = "Please select a tool from the shop first.".into();
                    return Rc::new(new);
                };
                if let Some(existing) = new.placed_at(index).cloned() {
                    let refund = existing.item.refund();
                    new.funds = new.funds.saturating_add(refund);
                    new.placed_items.retain(|p| p.index != index);
                    new.status = format!(
                        "Removed {} from this plot. Refunded ${}.",
                        existing.item.name, refund
                    );
                    new.touch();
                } else if new.funds < tool.cost {
                    new.status = "You don't have enough funds for that item.".into();
                } else {
                    new.funds -= tool.cost;
                    new.status = format!(
                        "{} placed on Plot {}. Click again to remove (partial refund).",
                        tool.name,
                        index + 1
                    );
                    new.placed_items.push(PlacedItem { index, item: tool });
                    new.touch();
                }
            }
            DeliverWater => {
                let gained = new.delivery_yield();
                let reward = gained / 2;
                new.water_delivered = new.water_delivered.saturating_add(gained);
                new.funds = new.funds.saturating_add(reward);
                if new.mission_active {
                    new.mission_delivered = new.mission_delivered.saturating_add(gained);
                }
                new.status = format!(
                    "Delivered {} L of water to the village. Earned ${}.",
                    gained, reward
                );
                if new.water_delivered >= 100 && !new.has_achievement(ACHIEVEMENT_100L) {
                    new.achievements.push(ACHIEVEMENT_100L.into());
                    new.status.push_str(" Achievement unlocked: 100 L delivered!");
                }
                new.touch();
            }
            MovePlayer { dx, dy, max_x, max_y } => {
                let x = (new.player.x + dx).clamp(0.0, max_x.max(0.0));
                let y = (new.player.y + dy).clamp(0.0, max_y.max(0.0));
                if x == new.player.x && y == new.player.y {
                    return self;
                }
                new.player = Player { x, y };
                new.touch();
            }
            StartMission => {
                if new.mission_active {
                    return self;
                }
                new.mission_active = true;
                new.mission_time_left = MISSION_LENGTH_SECS;
                new.mission_delivered = 0;
                new.mission_report = None;
                new.status = format!(
                    "Mission started. Deliver as much water as you can in {}s.",
                    MISSION_LENGTH_SECS
                );
                new.touch();
            }
            TickSecond => {
                if !new.mission_active {
                    return self;
                }
                new.mission_time_left = new.mission_time_left.saturating_sub(1);
                if new.mission_time_left == 0 {
                    new.mission_active = false;
                    new.mission_report = Some(new.mission_delivered);
                    new.status = "Mission complete.".into();
                }
                new.touch();
            }
            DismissReport => {
                new.mission_report = None;
            }
            SetStatus(s) => {
                new.status = s;
            }
            Replace(loaded) => {
                let revision = new.revision.wrapping_add(1);
                new = loaded;
                new.revision = revision;
            }
            Reset => {
                let revision = new.revision.wrapping_add(1);
                new = GameState::default();
                new.revision = revision;
            }
        }
        Rc::new(new)
    }
}
