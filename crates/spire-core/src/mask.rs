//! Action mask derived from the current snapshot

use serde::{Serialize, Serializer};

use crate::action::{
    ACTION_SPACE_SIZE, ActionSlot, MAX_HAND_CARDS, MAX_MAP_NODES, MAX_PURGE_CARDS,
    MAX_REST_OPTIONS, MAX_REWARD_ITEMS, MAX_SHOP_CARDS, MAX_SHOP_POTIONS, MAX_SHOP_RELICS,
};
use crate::state::{GameState, RestOption, ScreenType};

/// Legal actions for the current decision point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionMask([bool; ACTION_SPACE_SIZE]);

impl ActionMask {
    /// Mask with every action illegal
    pub fn empty() -> Self {
        Self([false; ACTION_SPACE_SIZE])
    }

    fn allow(&mut self, slot: ActionSlot) {
        self.0[slot.index()] = true;
    }

    /// Whether `index` is legal; out-of-range indices never are
    pub fn is_legal(&self, index: i64) -> bool {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.0.get(i).copied())
            .unwrap_or(false)
    }

    /// Legal indices in ascending order
    pub fn legal_indices(&self) -> Vec<usize> {
        (0..ACTION_SPACE_SIZE).filter(|&i| self.0[i]).collect()
    }

    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&legal| legal).count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    /// 0/1 bytes, the layout maskable policies usually expect
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.iter().map(|&legal| legal as u8).collect()
    }
}

impl Default for ActionMask {
    fn default() -> Self {
        Self::empty()
    }
}

impl Serialize for ActionMask {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_bytes().serialize(serializer)
    }
}

/// Compute the mask for a snapshot
///
/// Depends on `state` only; no memory of earlier masks.
pub fn action_mask(state: &GameState) -> ActionMask {
    let mut mask = ActionMask::empty();
    let gold = state.player.gold;

    match state.screen_type {
        ScreenType::Combat => {
            mask.allow(ActionSlot::EndTurn);
            for (i, card) in state.hand.iter().take(MAX_HAND_CARDS).enumerate() {
                if card.is_playable {
                    mask.allow(ActionSlot::PlayCard(i));
                }
            }
        }
        ScreenType::Map => {
            let available = state.map.available_nodes().len().min(MAX_MAP_NODES);
            for i in 0..available {
                mask.allow(ActionSlot::MapNode(i));
            }
        }
        ScreenType::Shop => {
            mask.allow(ActionSlot::LeaveShop);
            let shop = &state.shop;
            for (i, card) in shop.cards.iter().take(MAX_SHOP_CARDS).enumerate() {
                if gold >= card.price {
                    mask.allow(ActionSlot::ShopCard(i));
                }
            }
            for (i, relic) in shop.relics.iter().take(MAX_SHOP_RELICS).enumerate() {
                if gold >= relic.price {
                    mask.allow(ActionSlot::ShopRelic(i));
                }
            }
            for (i, potion) in shop.potions.iter().take(MAX_SHOP_POTIONS).enumerate() {
                if gold >= potion.price {
                    mask.allow(ActionSlot::ShopPotion(i));
                }
            }
            if gold >= shop.purge_cost {
                let purgeable = state.master_deck.len().min(MAX_PURGE_CARDS);
                for i in 0..purgeable {
                    mask.allow(ActionSlot::Purge(i));
                }
            }
        }
        ScreenType::Rest => {
            mask.allow(ActionSlot::LeaveRest);
            for (i, option) in RestOption::ALL.iter().take(MAX_REST_OPTIONS).enumerate() {
                if state.rest_site.has(*option) {
                    mask.allow(ActionSlot::RestOption(i));
                }
            }
        }
        ScreenType::Reward => {
            mask.allow(ActionSlot::SkipReward);
            let items = state.reward.items.len().min(MAX_REWARD_ITEMS);
            for i in 0..items {
                mask.allow(ActionSlot::Reward(i));
            }
        }
        ScreenType::None
        | ScreenType::Event
        | ScreenType::GameOver
        | ScreenType::Victory
        | ScreenType::Unknown => {}
    }

    mask
}
