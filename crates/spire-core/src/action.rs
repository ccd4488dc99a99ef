//! Discrete action space and command decoding
//!
//! The policy sees a fixed space of [`ACTION_SPACE_SIZE`] indices split into
//! contiguous ranges. Offsets are part of the external contract: a policy
//! trained against this numbering must keep working, so they never move.
//!
//! Context ranges (hand slot, map choice, shop slot, rest option, reward slot)
//! are resolved against the snapshot at decode time. An index that cannot be
//! resolved decodes to [`ActionType::Wait`] instead of failing, because masks
//! are advisory to the caller.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::state::{GameState, RestOption};

/// Number of discrete actions exposed to the policy
pub const ACTION_SPACE_SIZE: usize = 50;

/// Index reserved for "do nothing"; decodes to `WAIT`
pub const NOOP_ACTION: usize = 49;

pub const MAX_HAND_CARDS: usize = 10;
pub const MAX_MAP_NODES: usize = 5;
pub const MAX_SHOP_CARDS: usize = 7;
pub const MAX_SHOP_RELICS: usize = 3;
pub const MAX_SHOP_POTIONS: usize = 3;
pub const MAX_PURGE_CARDS: usize = 7;
pub const MAX_REST_OPTIONS: usize = 5;
pub const MAX_REWARD_ITEMS: usize = 5;

/// Range offsets into the discrete action space
pub mod offsets {
    pub const PLAY_CARD: usize = 0;
    pub const END_TURN: usize = 10;
    pub const CHOOSE_MAP_NODE: usize = 11;
    pub const BUY_CARD: usize = 16;
    pub const BUY_RELIC: usize = 23;
    pub const BUY_POTION: usize = 26;
    pub const PURGE_CARD: usize = 29;
    pub const LEAVE_SHOP: usize = 36;
    pub const CHOOSE_REST: usize = 37;
    pub const LEAVE_REST: usize = 42;
    pub const CHOOSE_REWARD: usize = 43;
    pub const SKIP_REWARD: usize = 48;
}

/// Command kinds understood by the game process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    PlayCard,
    EndTurn,
    ChooseMapNode,
    ChooseShopCard,
    ChooseShopRelic,
    ChooseShopPotion,
    PurgeCard,
    LeaveShop,
    ChooseRestOption,
    LeaveRest,
    ChooseReward,
    SkipReward,
    Wait,
    /// Restart the run; only sent by the reset path
    Reset,
}

impl ActionType {
    /// Wire tag
    pub fn as_wire(self) -> &'static str {
        match self {
            ActionType::PlayCard => "PLAY_CARD",
            ActionType::EndTurn => "END_TURN",
            ActionType::ChooseMapNode => "CHOOSE_MAP_NODE",
            ActionType::ChooseShopCard => "CHOOSE_SHOP_CARD",
            ActionType::ChooseShopRelic => "CHOOSE_SHOP_RELIC",
            ActionType::ChooseShopPotion => "CHOOSE_SHOP_POTION",
            ActionType::PurgeCard => "PURGE_CARD",
            ActionType::LeaveShop => "LEAVE_SHOP",
            ActionType::ChooseRestOption => "CHOOSE_REST_OPTION",
            ActionType::LeaveRest => "LEAVE_REST",
            ActionType::ChooseReward => "CHOOSE_REWARD",
            ActionType::SkipReward => "SKIP_REWARD",
            ActionType::Wait => "WAIT",
            ActionType::Reset => "RESET",
        }
    }

    /// Parse a wire tag
    pub fn from_wire(tag: &str) -> Option<Self> {
        let action_type = match tag {
            "PLAY_CARD" => ActionType::PlayCard,
            "END_TURN" => ActionType::EndTurn,
            "CHOOSE_MAP_NODE" => ActionType::ChooseMapNode,
            "CHOOSE_SHOP_CARD" => ActionType::ChooseShopCard,
            "CHOOSE_SHOP_RELIC" => ActionType::ChooseShopRelic,
            "CHOOSE_SHOP_POTION" => ActionType::ChooseShopPotion,
            "PURGE_CARD" => ActionType::PurgeCard,
            "LEAVE_SHOP" => ActionType::LeaveShop,
            "CHOOSE_REST_OPTION" => ActionType::ChooseRestOption,
            "LEAVE_REST" => ActionType::LeaveRest,
            "CHOOSE_REWARD" => ActionType::ChooseReward,
            "SKIP_REWARD" => ActionType::SkipReward,
            "WAIT" => ActionType::Wait,
            "RESET" => ActionType::Reset,
            _ => return None,
        };
        Some(action_type)
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// Outbound command, built fresh every step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub action_type: ActionType,
    pub card_index: i32,
    pub target_index: i32,
}

impl Command {
    pub fn new(action_type: ActionType, card_index: i32, target_index: i32) -> Self {
        Self {
            action_type,
            card_index,
            target_index,
        }
    }

    /// Command without parameters
    pub fn bare(action_type: ActionType) -> Self {
        Self::new(action_type, 0, 0)
    }

    pub fn wait() -> Self {
        Self::bare(ActionType::Wait)
    }

    pub fn reset() -> Self {
        Self::bare(ActionType::Reset)
    }

    pub fn is_wait(&self) -> bool {
        self.action_type == ActionType::Wait
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}, {})",
            self.action_type, self.card_index, self.target_index
        )
    }
}

/// Position of an index inside the action layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionSlot {
    PlayCard(usize),
    EndTurn,
    MapNode(usize),
    ShopCard(usize),
    ShopRelic(usize),
    ShopPotion(usize),
    Purge(usize),
    LeaveShop,
    RestOption(usize),
    LeaveRest,
    Reward(usize),
    SkipReward,
    NoOp,
}

impl ActionSlot {
    /// Classify a raw index; anything outside the known ranges is `NoOp`
    pub fn from_index(index: i64) -> Self {
        use offsets::*;

        let Ok(i) = usize::try_from(index) else {
            return ActionSlot::NoOp;
        };
        match i {
            _ if i < END_TURN => ActionSlot::PlayCard(i - PLAY_CARD),
            END_TURN => ActionSlot::EndTurn,
            _ if i < BUY_CARD => ActionSlot::MapNode(i - CHOOSE_MAP_NODE),
            _ if i < BUY_RELIC => ActionSlot::ShopCard(i - BUY_CARD),
            _ if i < BUY_POTION => ActionSlot::ShopRelic(i - BUY_RELIC),
            _ if i < PURGE_CARD => ActionSlot::ShopPotion(i - BUY_POTION),
            _ if i < LEAVE_SHOP => ActionSlot::Purge(i - PURGE_CARD),
            LEAVE_SHOP => ActionSlot::LeaveShop,
            _ if i < LEAVE_REST => ActionSlot::RestOption(i - CHOOSE_REST),
            LEAVE_REST => ActionSlot::LeaveRest,
            _ if i < SKIP_REWARD => ActionSlot::Reward(i - CHOOSE_REWARD),
            SKIP_REWARD => ActionSlot::SkipReward,
            _ => ActionSlot::NoOp,
        }
    }

    /// Inverse of [`ActionSlot::from_index`]
    pub fn index(self) -> usize {
        use offsets::*;

        match self {
            ActionSlot::PlayCard(i) => PLAY_CARD + i,
            ActionSlot::EndTurn => END_TURN,
            ActionSlot::MapNode(i) => CHOOSE_MAP_NODE + i,
            ActionSlot::ShopCard(i) => BUY_CARD + i,
            ActionSlot::ShopRelic(i) => BUY_RELIC + i,
            ActionSlot::ShopPotion(i) => BUY_POTION + i,
            ActionSlot::Purge(i) => PURGE_CARD + i,
            ActionSlot::LeaveShop => LEAVE_SHOP,
            ActionSlot::RestOption(i) => CHOOSE_REST + i,
            ActionSlot::LeaveRest => LEAVE_REST,
            ActionSlot::Reward(i) => CHOOSE_REWARD + i,
            ActionSlot::SkipReward => SKIP_REWARD,
            ActionSlot::NoOp => NOOP_ACTION,
        }
    }

    /// Human-readable name, e.g. `PLAY_CARD_3`
    pub fn name(self) -> String {
        match self {
            ActionSlot::PlayCard(i) => format!("PLAY_CARD_{}", i),
            ActionSlot::EndTurn => "END_TURN".into(),
            ActionSlot::MapNode(i) => format!("CHOOSE_MAP_NODE_{}", i),
            ActionSlot::ShopCard(i) => format!("BUY_CARD_{}", i),
            ActionSlot::ShopRelic(i) => format!("BUY_RELIC_{}", i),
            ActionSlot::ShopPotion(i) => format!("BUY_POTION_{}", i),
            ActionSlot::Purge(i) => format!("PURGE_CARD_{}", i),
            ActionSlot::LeaveShop => "LEAVE_SHOP".into(),
            ActionSlot::RestOption(i) => format!("CHOOSE_REST_{}", i),
            ActionSlot::LeaveRest => "LEAVE_REST".into(),
            ActionSlot::Reward(i) => format!("CHOOSE_REWARD_{}", i),
            ActionSlot::SkipReward => "SKIP_REWARD".into(),
            ActionSlot::NoOp => "WAIT".into(),
        }
    }
}

/// Name of a discrete action index for logs and trajectories
pub fn action_name(index: i64) -> String {
    ActionSlot::from_index(index).name()
}

/// Resolve a discrete action index against the current snapshot
///
/// Pure function of its inputs. Never fails: indices that do not resolve to
/// an entity present in `state` become `WAIT`.
pub fn decode_action(index: i64, state: &GameState) -> Command {
    let slot_param = |i: usize| i as i32;

    match ActionSlot::from_index(index) {
        ActionSlot::PlayCard(i) if i < state.hand.len() => {
            let target = state.first_live_monster().unwrap_or(0);
            Command::new(ActionType::PlayCard, slot_param(i), target as i32)
        }
        ActionSlot::EndTurn => Command::bare(ActionType::EndTurn),
        ActionSlot::MapNode(i) => match state.map.available_nodes().get(i) {
            Some(node) => Command::new(ActionType::ChooseMapNode, node.x, node.y),
            None => Command::wait(),
        },
        ActionSlot::ShopCard(i) if i < state.shop.cards.len() => {
            Command::new(ActionType::ChooseShopCard, slot_param(i), 0)
        }
        ActionSlot::ShopRelic(i) if i < state.shop.relics.len() => {
            Command::new(ActionType::ChooseShopRelic, slot_param(i), 0)
        }
        ActionSlot::ShopPotion(i) if i < state.shop.potions.len() => {
            Command::new(ActionType::ChooseShopPotion, slot_param(i), 0)
        }
        ActionSlot::Purge(i) if i < state.master_deck.len() => {
            Command::new(ActionType::PurgeCard, slot_param(i), 0)
        }
        ActionSlot::LeaveShop => Command::bare(ActionType::LeaveShop),
        // The game reads the rest and reward slot from target_index
        ActionSlot::RestOption(i) if state.rest_site.has(RestOption::ALL[i]) => {
            Command::new(ActionType::ChooseRestOption, 0, slot_param(i))
        }
        ActionSlot::LeaveRest => Command::bare(ActionType::LeaveRest),
        ActionSlot::Reward(i) if i < state.reward.items.len() => {
            Command::new(ActionType::ChooseReward, 0, slot_param(i))
        }
        ActionSlot::SkipReward => Command::bare(ActionType::SkipReward),
        _ => Command::wait(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CardState, MapNode, MonsterState, RewardItem, ScreenType};

    fn map_state(nodes: &[(i32, i32, bool)]) -> GameState {
        let mut state = GameState {
            screen_type: ScreenType::Map,
            ..Default::default()
        };
        state.map.nodes = nodes
            .iter()
            .map(|&(x, y, is_available)| MapNode {
                x,
                y,
                is_available,
                room_type: "MonsterRoom".into(),
            })
            .collect();
        state
    }

    #[test]
    fn test_ranges_cover_space_without_gaps() {
        for index in 0..ACTION_SPACE_SIZE {
            let slot = ActionSlot::from_index(index as i64);
            assert_eq!(slot.index(), index, "slot {:?}", slot);
        }
        assert_eq!(ActionSlot::from_index(NOOP_ACTION as i64), ActionSlot::NoOp);
    }

    #[test]
    fn test_range_boundaries() {
        assert_eq!(ActionSlot::from_index(9), ActionSlot::PlayCard(9));
        assert_eq!(ActionSlot::from_index(10), ActionSlot::EndTurn);
        assert_eq!(ActionSlot::from_index(15), ActionSlot::MapNode(4));
        assert_eq!(ActionSlot::from_index(22), ActionSlot::ShopCard(6));
        assert_eq!(ActionSlot::from_index(25), ActionSlot::ShopRelic(2));
        assert_eq!(ActionSlot::from_index(28), ActionSlot::ShopPotion(2));
        assert_eq!(ActionSlot::from_index(35), ActionSlot::Purge(6));
        assert_eq!(ActionSlot::from_index(36), ActionSlot::LeaveShop);
        assert_eq!(ActionSlot::from_index(41), ActionSlot::RestOption(4));
        assert_eq!(ActionSlot::from_index(42), ActionSlot::LeaveRest);
        assert_eq!(ActionSlot::from_index(47), ActionSlot::Reward(4));
        assert_eq!(ActionSlot::from_index(48), ActionSlot::SkipReward);
    }

    #[test]
    fn test_out_of_range_indices_wait() {
        let state = GameState::default();
        for index in [-1, 49, 50, 1000, i64::MIN, i64::MAX] {
            assert!(decode_action(index, &state).is_wait(), "index {}", index);
        }
    }

    #[test]
    fn test_play_card_targets_first_live_monster() {
        let state = GameState {
            screen_type: ScreenType::Combat,
            hand: vec![CardState::default(); 3],
            monsters: vec![
                MonsterState {
                    is_gone: true,
                    ..Default::default()
                },
                MonsterState {
                    hp: 20,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        assert_eq!(
            decode_action(2, &state),
            Command::new(ActionType::PlayCard, 2, 1)
        );
        assert!(decode_action(3, &state).is_wait());
    }

    #[test]
    fn test_map_choice_resolves_available_nodes() {
        let state = map_state(&[(3, 2, true), (0, 2, false), (1, 2, true)]);

        assert_eq!(
            decode_action(11, &state),
            Command::new(ActionType::ChooseMapNode, 1, 2)
        );
        assert_eq!(
            decode_action(12, &state),
            Command::new(ActionType::ChooseMapNode, 3, 2)
        );
        assert!(decode_action(13, &state).is_wait());
    }

    #[test]
    fn test_reward_and_rest_use_target_index() {
        let mut state = GameState::default();
        state.reward.items = vec![RewardItem::default(), RewardItem::default()];
        state.rest_site.has_smith = true;

        assert_eq!(
            decode_action(44, &state),
            Command::new(ActionType::ChooseReward, 0, 1)
        );
        assert_eq!(
            decode_action(38, &state),
            Command::new(ActionType::ChooseRestOption, 0, 1)
        );
        // Rest is not offered here
        assert!(decode_action(37, &state).is_wait());
    }

    #[test]
    fn test_unconditional_commands() {
        let state = GameState::default();
        assert_eq!(decode_action(10, &state).action_type, ActionType::EndTurn);
        assert_eq!(decode_action(36, &state).action_type, ActionType::LeaveShop);
        assert_eq!(decode_action(42, &state).action_type, ActionType::LeaveRest);
        assert_eq!(decode_action(48, &state).action_type, ActionType::SkipReward);
    }

    #[test]
    fn test_decode_is_deterministic() {
        let state = map_state(&[(4, 1, true), (2, 1, true), (2, 0, true)]);
        for index in 0..ACTION_SPACE_SIZE as i64 {
            assert_eq!(decode_action(index, &state), decode_action(index, &state));
        }
    }

    #[test]
    fn test_action_type_wire_tags() {
        let all = [
            ActionType::PlayCard,
            ActionType::EndTurn,
            ActionType::ChooseMapNode,
            ActionType::ChooseShopCard,
            ActionType::ChooseShopRelic,
            ActionType::ChooseShopPotion,
            ActionType::PurgeCard,
            ActionType::LeaveShop,
            ActionType::ChooseRestOption,
            ActionType::LeaveRest,
            ActionType::ChooseReward,
            ActionType::SkipReward,
            ActionType::Wait,
            ActionType::Reset,
        ];
        for action_type in all {
            assert_eq!(ActionType::from_wire(action_type.as_wire()), Some(action_type));
        }
        assert_eq!(ActionType::from_wire("USE_POTION"), None);
    }

    #[test]
    fn test_action_names() {
        assert_eq!(action_name(3), "PLAY_CARD_3");
        assert_eq!(action_name(37), "CHOOSE_REST_0");
        assert_eq!(action_name(49), "WAIT");
    }
}
