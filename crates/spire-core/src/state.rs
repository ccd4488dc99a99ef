//! Game state snapshot
//!
//! One complete report from the game process for the current decision point.
//! Snapshots are plain values: every consumer borrows them and produces new
//! data, nothing mutates a snapshot after it is decoded.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level game mode deciding which actions are meaningful
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScreenType {
    #[default]
    None,
    Combat,
    Map,
    Shop,
    Rest,
    Reward,
    Event,
    GameOver,
    Victory,
    Unknown,
}

impl ScreenType {
    /// All screen types in id order
    pub const ALL: [ScreenType; 10] = [
        ScreenType::None,
        ScreenType::Combat,
        ScreenType::Map,
        ScreenType::Shop,
        ScreenType::Rest,
        ScreenType::Reward,
        ScreenType::Event,
        ScreenType::GameOver,
        ScreenType::Victory,
        ScreenType::Unknown,
    ];

    /// Parse a wire tag; unrecognized tags map to `Unknown`
    pub fn from_wire(tag: &str) -> Self {
        match tag {
            "NONE" | "" => ScreenType::None,
            "COMBAT" => ScreenType::Combat,
            "MAP" => ScreenType::Map,
            "SHOP" => ScreenType::Shop,
            "REST" => ScreenType::Rest,
            "REWARD" => ScreenType::Reward,
            "EVENT" => ScreenType::Event,
            "GAME_OVER" => ScreenType::GameOver,
            "VICTORY" => ScreenType::Victory,
            _ => ScreenType::Unknown,
        }
    }

    /// Wire tag for this screen type
    pub fn as_wire(self) -> &'static str {
        match self {
            ScreenType::None => "NONE",
            ScreenType::Combat => "COMBAT",
            ScreenType::Map => "MAP",
            ScreenType::Shop => "SHOP",
            ScreenType::Rest => "REST",
            ScreenType::Reward => "REWARD",
            ScreenType::Event => "EVENT",
            ScreenType::GameOver => "GAME_OVER",
            ScreenType::Victory => "VICTORY",
            ScreenType::Unknown => "UNKNOWN",
        }
    }

    /// Stable numeric id used in observations
    pub fn id(self) -> u8 {
        match self {
            ScreenType::None => 0,
            ScreenType::Combat => 1,
            ScreenType::Map => 2,
            ScreenType::Shop => 3,
            ScreenType::Rest => 4,
            ScreenType::Reward => 5,
            ScreenType::Event => 6,
            ScreenType::GameOver => 7,
            ScreenType::Victory => 8,
            ScreenType::Unknown => 9,
        }
    }
}

impl fmt::Display for ScreenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// Player scalars
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub hp: i32,
    pub max_hp: i32,
    pub gold: i32,
    pub energy: i32,
    pub block: i32,
    pub floor: i32,
    #[serde(default)]
    pub stance: String,
    #[serde(default)]
    pub relics: Vec<String>,
    #[serde(default)]
    pub powers: Vec<Power>,
}

/// A buff or debuff stack on the player or a monster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Power {
    pub id: String,
    pub amount: i32,
}

/// A monster in the current encounter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonsterState {
    pub id: String,
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    pub block: i32,
    /// Intent category as reported by the game (e.g. `ATTACK_DEBUFF`)
    pub intent: String,
    /// Dead or escaped
    pub is_gone: bool,
    #[serde(default)]
    pub powers: Vec<Power>,
}

/// A card in hand, in the deck, in a shop or in a reward
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardState {
    pub id: String,
    pub name: String,
    pub cost: i32,
    /// Card type category (`ATTACK`, `SKILL`, `POWER`, ...)
    pub card_type: String,
    pub damage: i32,
    pub block: i32,
    pub is_playable: bool,
    pub is_upgraded: bool,
    pub exhaust: bool,
    /// Shop price, zero elsewhere
    #[serde(default)]
    pub price: i32,
}

/// A potion belt slot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PotionState {
    pub id: String,
    pub slot_index: i32,
    pub is_usable: bool,
    pub can_target: bool,
}

/// A purchasable relic or potion
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShopItem {
    pub id: String,
    pub name: String,
    pub price: i32,
}

/// A node of the dungeon map
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapNode {
    pub x: i32,
    pub y: i32,
    pub room_type: String,
    pub is_available: bool,
}

/// Dungeon map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapState {
    pub boss_name: String,
    pub nodes: Vec<MapNode>,
}

impl MapState {
    /// Currently available nodes ordered by ascending x, then y
    pub fn available_nodes(&self) -> Vec<&MapNode> {
        let mut nodes: Vec<&MapNode> = self.nodes.iter().filter(|n| n.is_available).collect();
        nodes.sort_by_key(|n| (n.x, n.y));
        nodes
    }
}

/// Shop inventory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShopState {
    pub cards: Vec<CardState>,
    pub relics: Vec<ShopItem>,
    pub potions: Vec<ShopItem>,
    pub purge_cost: i32,
}

/// Campfire options, in rest-slot order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestOption {
    Rest,
    Smith,
    Lift,
    Toke,
    Dig,
}

impl RestOption {
    pub const ALL: [RestOption; 5] = [
        RestOption::Rest,
        RestOption::Smith,
        RestOption::Lift,
        RestOption::Toke,
        RestOption::Dig,
    ];
}

/// Rest site capabilities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestSiteState {
    pub heal_amount: i32,
    pub has_rest: bool,
    pub has_smith: bool,
    pub has_lift: bool,
    pub has_toke: bool,
    pub has_dig: bool,
}

impl RestSiteState {
    /// Whether the given campfire option is offered
    pub fn has(&self, option: RestOption) -> bool {
        match option {
            RestOption::Rest => self.has_rest,
            RestOption::Smith => self.has_smith,
            RestOption::Lift => self.has_lift,
            RestOption::Toke => self.has_toke,
            RestOption::Dig => self.has_dig,
        }
    }
}

/// One entry on the combat reward screen
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardItem {
    /// `GOLD`, `RELIC`, `POTION`, `CARD`, ...
    pub item_type: String,
    pub amount: i32,
    pub id: String,
    pub is_claimed: bool,
    #[serde(default)]
    pub cards: Vec<CardState>,
}

/// Combat reward screen
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardState {
    pub items: Vec<RewardItem>,
}

/// End-of-run report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub is_done: bool,
    pub victory: bool,
    pub score: i32,
    pub ascension_level: i32,
}

/// Complete snapshot received from the game
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub player: PlayerState,
    pub monsters: Vec<MonsterState>,
    pub hand: Vec<CardState>,
    pub master_deck: Vec<CardState>,
    pub potions: Vec<PotionState>,
    pub screen_type: ScreenType,
    pub map: MapState,
    pub shop: ShopState,
    pub rest_site: RestSiteState,
    pub reward: RewardState,
    pub game_outcome: GameOutcome,
    /// Event class name when `screen_type` is `Event`
    #[serde(default)]
    pub event_id: String,
}

impl GameState {
    /// Monsters still in the fight
    pub fn live_monsters(&self) -> impl Iterator<Item = &MonsterState> {
        self.monsters.iter().filter(|m| !m.is_gone)
    }

    /// Index of the first monster still in the fight
    pub fn first_live_monster(&self) -> Option<usize> {
        self.monsters.iter().position(|m| !m.is_gone)
    }

    /// Total hp of monsters still in the fight
    pub fn live_monster_hp(&self) -> i64 {
        self.live_monsters().map(|m| m.hp as i64).sum()
    }
}
