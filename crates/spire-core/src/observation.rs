//! Fixed-shape observation built from a snapshot
//!
//! Layout:
//! - player scalars (6)
//! - monster table, 5 rows x 6 features
//! - hand table, 10 rows x 10 features
//! - global screen features (2)
//!
//! Entities beyond table capacity are dropped, unused rows stay zero.

use serde::Serialize;

use crate::state::{CardState, GameState, MonsterState, PlayerState, ScreenType};

pub const MONSTER_SLOTS: usize = 5;
pub const MONSTER_FEATURES: usize = 6;
pub const HAND_SLOTS: usize = 10;
pub const CARD_FEATURES: usize = 10;
pub const PLAYER_FEATURES: usize = 6;
pub const GLOBAL_FEATURES: usize = 2;

/// Length of [`Observation::flatten`]
pub const OBS_SIZE: usize = PLAYER_FEATURES
    + MONSTER_SLOTS * MONSTER_FEATURES
    + HAND_SLOTS * CARD_FEATURES
    + GLOBAL_FEATURES;

/// Normalization divisors
pub mod scale {
    pub const HP: f32 = 100.0;
    pub const GOLD: f32 = 2000.0;
    pub const ENERGY: f32 = 10.0;
    pub const BLOCK: f32 = 100.0;
    pub const FLOOR: f32 = 60.0;
    pub const CARD_COST: f32 = 5.0;
    pub const CARD_DAMAGE: f32 = 50.0;
    pub const CARD_BLOCK: f32 = 50.0;
}

/// Player scalars, in `[0, 1]` when normalized
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PlayerObs {
    pub current_hp: f32,
    pub max_hp: f32,
    pub gold: f32,
    pub energy: f32,
    pub block: f32,
    pub floor: f32,
}

/// Screen-level features
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GlobalObs {
    pub is_combat: u8,
    /// [`ScreenType::id`]
    pub screen_type: u8,
}

/// Policy-facing observation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub player: PlayerObs,
    /// `[hp, max_hp, block, intent, reserved, is_gone]`
    pub monsters: [[f32; MONSTER_FEATURES]; MONSTER_SLOTS],
    /// `[cost, damage, block, type, playable, upgraded, exhaust, 0, 0, 0]`
    pub hand: [[f32; CARD_FEATURES]; HAND_SLOTS],
    pub global: GlobalObs,
}

impl Default for Observation {
    fn default() -> Self {
        Self {
            player: PlayerObs::default(),
            monsters: [[0.0; MONSTER_FEATURES]; MONSTER_SLOTS],
            hand: [[0.0; CARD_FEATURES]; HAND_SLOTS],
            global: GlobalObs::default(),
        }
    }
}

impl Observation {
    /// Flat vector: player, monsters (row-major), hand (row-major), global
    pub fn flatten(&self) -> Vec<f32> {
        let p = &self.player;
        let mut data = Vec::with_capacity(OBS_SIZE);
        data.extend_from_slice(&[p.current_hp, p.max_hp, p.gold, p.energy, p.block, p.floor]);
        for row in &self.monsters {
            data.extend_from_slice(row);
        }
        for row in &self.hand {
            data.extend_from_slice(row);
        }
        data.push(self.global.is_combat as f32);
        data.push(self.global.screen_type as f32);
        data
    }
}

/// How a categorical string is matched
#[derive(Debug, Clone, Copy)]
pub enum Pattern {
    Contains(&'static str),
    Exact(&'static str),
}

impl Pattern {
    fn matches(self, category: &str) -> bool {
        match self {
            Pattern::Contains(needle) => category.contains(needle),
            Pattern::Exact(tag) => category == tag,
        }
    }
}

/// Ordered categorical rule; the first matching rule wins
#[derive(Debug, Clone, Copy)]
pub struct BucketRule {
    pub pattern: Pattern,
    pub value: f32,
}

const fn rule(pattern: Pattern, value: f32) -> BucketRule {
    BucketRule { pattern, value }
}

/// Monster intent buckets. `BUFF` precedes `DEBUFF`, so debuff intents land in
/// the buff bucket.
pub const INTENT_BUCKETS: &[BucketRule] = &[
    rule(Pattern::Contains("ATTACK"), 0.2),
    rule(Pattern::Contains("DEFEND"), 0.4),
    rule(Pattern::Contains("BUFF"), 0.6),
    rule(Pattern::Contains("DEBUFF"), 0.8),
];

/// Card type buckets
pub const CARD_TYPE_BUCKETS: &[BucketRule] = &[
    rule(Pattern::Exact("ATTACK"), 0.2),
    rule(Pattern::Exact("SKILL"), 0.4),
    rule(Pattern::Exact("POWER"), 0.6),
];

/// Map a category through an ordered rule list; unmatched categories are 0
pub fn bucket(rules: &[BucketRule], category: &str) -> f32 {
    rules
        .iter()
        .find(|r| r.pattern.matches(category))
        .map(|r| r.value)
        .unwrap_or(0.0)
}

fn flag(value: bool) -> f32 {
    if value { 1.0 } else { 0.0 }
}

fn player_obs(player: &PlayerState, normalize: bool) -> PlayerObs {
    let scaled = |value: i32, divisor: f32| {
        if normalize {
            (value as f32 / divisor).clamp(0.0, 1.0)
        } else {
            value as f32
        }
    };

    PlayerObs {
        current_hp: scaled(player.hp, scale::HP),
        max_hp: scaled(player.max_hp, scale::HP),
        gold: scaled(player.gold, scale::GOLD),
        energy: scaled(player.energy, scale::ENERGY),
        block: scaled(player.block, scale::BLOCK),
        floor: scaled(player.floor, scale::FLOOR),
    }
}

fn monster_row(monster: &MonsterState) -> [f32; MONSTER_FEATURES] {
    [
        monster.hp as f32 / scale::HP,
        monster.max_hp as f32 / scale::HP,
        monster.block as f32 / scale::BLOCK,
        bucket(INTENT_BUCKETS, &monster.intent),
        // Intent damage is not reported by the game yet
        0.0,
        flag(monster.is_gone),
    ]
}

fn card_row(card: &CardState) -> [f32; CARD_FEATURES] {
    [
        card.cost as f32 / scale::CARD_COST,
        card.damage as f32 / scale::CARD_DAMAGE,
        card.block as f32 / scale::CARD_BLOCK,
        bucket(CARD_TYPE_BUCKETS, &card.card_type),
        flag(card.is_playable),
        flag(card.is_upgraded),
        flag(card.exhaust),
        0.0,
        0.0,
        0.0,
    ]
}

/// Project a snapshot into the fixed observation layout
pub fn build_observation(state: &GameState, normalize: bool) -> Observation {
    let mut obs = Observation {
        player: player_obs(&state.player, normalize),
        global: GlobalObs {
            is_combat: (state.screen_type == ScreenType::Combat) as u8,
            screen_type: state.screen_type.id(),
        },
        ..Default::default()
    };

    for (row, monster) in obs.monsters.iter_mut().zip(&state.monsters) {
        *row = monster_row(monster);
    }
    for (row, card) in obs.hand.iter_mut().zip(&state.hand) {
        *row = card_row(card);
    }

    obs
}
