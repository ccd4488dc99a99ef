//! Message schema mapping
//!
//! Converts between the protobuf wire messages in [`crate::wire`] and the
//! snapshot/command model in `spire_core`. Decoding is tolerant: fields the
//! game omits keep their zero value, unknown fields are skipped.

use prost::Message;
use spire_core::action::{ActionType, Command};
use spire_core::state::{
    CardState, GameOutcome, GameState, MapNode, MapState, MonsterState, PlayerState, PotionState,
    Power, RestSiteState, RewardItem, RewardState, ScreenType, ShopItem, ShopState,
};
use spire_core::{Result, SpireError};

use crate::wire;

/// Serialize an outbound command
pub fn encode_action(command: &Command) -> Vec<u8> {
    wire::GameAction::from(command).encode_to_vec()
}

/// Parse a command; used by game-side test doubles
pub fn decode_action(bytes: &[u8]) -> Result<Command> {
    let msg = wire::GameAction::decode(bytes)
        .map_err(|e| SpireError::Schema(format!("GameAction: {}", e)))?;
    let action_type = ActionType::from_wire(&msg.action_type).ok_or_else(|| {
        SpireError::Schema(format!("Unknown action type: {:?}", msg.action_type))
    })?;
    Ok(Command::new(action_type, msg.card_index, msg.target_index))
}

/// Parse a game state snapshot
pub fn decode_state(bytes: &[u8]) -> Result<GameState> {
    let msg = wire::GameState::decode(bytes)
        .map_err(|e| SpireError::Schema(format!("GameState: {}", e)))?;
    Ok(msg.into())
}

/// Serialize a snapshot; used by game-side test doubles
pub fn encode_state(state: &GameState) -> Vec<u8> {
    wire::GameState::from(state).encode_to_vec()
}

impl From<&Command> for wire::GameAction {
    fn from(command: &Command) -> Self {
        Self {
            action_type: command.action_type.as_wire().to_string(),
            card_index: command.card_index,
            target_index: command.target_index,
        }
    }
}

// === Game -> Rust ===

impl From<wire::GameState> for GameState {
    fn from(msg: wire::GameState) -> Self {
        let player = msg.player.unwrap_or_default();
        Self {
            player: PlayerState {
                hp: player.hp,
                max_hp: player.max_hp,
                gold: player.gold,
                energy: player.energy,
                block: player.block,
                floor: player.floor,
                stance: player.stance,
                relics: player.relics.into_iter().map(|r| r.id).collect(),
                powers: player.powers.into_iter().map(Power::from).collect(),
            },
            monsters: msg.monsters.into_iter().map(MonsterState::from).collect(),
            hand: msg.hand.into_iter().map(CardState::from).collect(),
            master_deck: msg.master_deck.into_iter().map(CardState::from).collect(),
            potions: msg.potions.into_iter().map(PotionState::from).collect(),
            screen_type: ScreenType::from_wire(&msg.screen_type),
            map: msg.map.map(MapState::from).unwrap_or_default(),
            shop: msg.shop.map(ShopState::from).unwrap_or_default(),
            rest_site: msg.rest_site.map(RestSiteState::from).unwrap_or_default(),
            reward: msg.reward.map(RewardState::from).unwrap_or_default(),
            game_outcome: msg.game_outcome.map(GameOutcome::from).unwrap_or_default(),
            event_id: msg.event.map(|e| e.event_id).unwrap_or_default(),
        }
    }
}

impl From<wire::PowerState> for Power {
    fn from(msg: wire::PowerState) -> Self {
        Self {
            id: msg.id,
            amount: msg.amount,
        }
    }
}

impl From<wire::MonsterState> for MonsterState {
    fn from(msg: wire::MonsterState) -> Self {
        Self {
            id: msg.id,
            name: msg.name,
            hp: msg.hp,
            max_hp: msg.max_hp,
            block: msg.block,
            intent: msg.intent,
            is_gone: msg.is_gone,
            powers: msg.powers.into_iter().map(Power::from).collect(),
        }
    }
}

impl From<wire::CardState> for CardState {
    fn from(msg: wire::CardState) -> Self {
        Self {
            id: msg.id,
            name: msg.name,
            cost: msg.cost,
            card_type: msg.r#type,
            damage: msg.damage,
            block: msg.block,
            is_playable: msg.is_playable,
            is_upgraded: msg.is_upgraded,
            exhaust: msg.exhaust,
            price: msg.price,
        }
    }
}

impl From<wire::PotionState> for PotionState {
    fn from(msg: wire::PotionState) -> Self {
        Self {
            id: msg.id,
            slot_index: msg.slot_index,
            is_usable: msg.is_usable,
            can_target: msg.can_target,
        }
    }
}

impl From<wire::DungeonMapState> for MapState {
    fn from(msg: wire::DungeonMapState) -> Self {
        Self {
            boss_name: msg.boss_name,
            nodes: msg
                .nodes
                .into_iter()
                .map(|n| MapNode {
                    x: n.x,
                    y: n.y,
                    room_type: n.room_type,
                    is_available: n.is_available,
                })
                .collect(),
        }
    }
}

impl From<wire::ShopState> for ShopState {
    fn from(msg: wire::ShopState) -> Self {
        Self {
            cards: msg.cards.into_iter().map(CardState::from).collect(),
            relics: msg
                .relics
                .into_iter()
                .map(|r| ShopItem {
                    id: r.id,
                    name: r.name,
                    price: r.price,
                })
                .collect(),
            potions: msg
                .potions
                .into_iter()
                .map(|p| ShopItem {
                    id: p.id,
                    name: p.name,
                    price: p.price,
                })
                .collect(),
            purge_cost: msg.purge_cost,
        }
    }
}

impl From<wire::RestSiteState> for RestSiteState {
    fn from(msg: wire::RestSiteState) -> Self {
        Self {
            heal_amount: msg.heal_amount,
            has_rest: msg.has_rest,
            has_smith: msg.has_smith,
            has_lift: msg.has_lift,
            has_toke: msg.has_toke,
            has_dig: msg.has_dig,
        }
    }
}

impl From<wire::RewardState> for RewardState {
    fn from(msg: wire::RewardState) -> Self {
        Self {
            items: msg
                .items
                .into_iter()
                .map(|i| RewardItem {
                    item_type: i.r#type,
                    amount: i.amount,
                    id: i.id,
                    is_claimed: i.is_claimed,
                    cards: i.cards.into_iter().map(CardState::from).collect(),
                })
                .collect(),
        }
    }
}

impl From<wire::GameOutcome> for GameOutcome {
    fn from(msg: wire::GameOutcome) -> Self {
        Self {
            is_done: msg.is_done,
            victory: msg.victory,
            score: msg.score,
            ascension_level: msg.ascension_level,
        }
    }
}

// === Rust -> Game (test doubles only) ===

impl From<&GameState> for wire::GameState {
    fn from(state: &GameState) -> Self {
        let p = &state.player;
        Self {
            player: Some(wire::PlayerState {
                hp: p.hp,
                max_hp: p.max_hp,
                gold: p.gold,
                energy: p.energy,
                block: p.block,
                floor: p.floor,
                stance: p.stance.clone(),
                powers: p.powers.iter().map(wire::PowerState::from).collect(),
                relics: p
                    .relics
                    .iter()
                    .map(|id| wire::RelicState {
                        id: id.clone(),
                        ..Default::default()
                    })
                    .collect(),
                orbs: Vec::new(),
            }),
            monsters: state
                .monsters
                .iter()
                .map(|m| wire::MonsterState {
                    id: m.id.clone(),
                    name: m.name.clone(),
                    hp: m.hp,
                    max_hp: m.max_hp,
                    intent: m.intent.clone(),
                    block: m.block,
                    is_gone: m.is_gone,
                    powers: m.powers.iter().map(wire::PowerState::from).collect(),
                })
                .collect(),
            hand: state.hand.iter().map(wire::CardState::from).collect(),
            master_deck: state.master_deck.iter().map(wire::CardState::from).collect(),
            potions: state
                .potions
                .iter()
                .map(|p| wire::PotionState {
                    id: p.id.clone(),
                    slot_index: p.slot_index,
                    is_usable: p.is_usable,
                    can_target: p.can_target,
                    ..Default::default()
                })
                .collect(),
            map: Some(wire::DungeonMapState {
                floor: p.floor,
                boss_name: state.map.boss_name.clone(),
                nodes: state
                    .map
                    .nodes
                    .iter()
                    .map(|n| wire::MapNodeState {
                        x: n.x,
                        y: n.y,
                        room_type: n.room_type.clone(),
                        is_available: n.is_available,
                        children: Vec::new(),
                    })
                    .collect(),
            }),
            screen_type: state.screen_type.as_wire().to_string(),
            game_outcome: Some(wire::GameOutcome {
                is_done: state.game_outcome.is_done,
                victory: state.game_outcome.victory,
                score: state.game_outcome.score,
                ascension_level: state.game_outcome.ascension_level,
            }),
            reward: Some(wire::RewardState {
                items: state
                    .reward
                    .items
                    .iter()
                    .map(|i| wire::RewardItemState {
                        r#type: i.item_type.clone(),
                        amount: i.amount,
                        id: i.id.clone(),
                        is_claimed: i.is_claimed,
                        cards: i.cards.iter().map(wire::CardState::from).collect(),
                    })
                    .collect(),
            }),
            shop: Some(wire::ShopState {
                current_gold: p.gold,
                purge_cost: state.shop.purge_cost,
                cards: state.shop.cards.iter().map(wire::CardState::from).collect(),
                relics: state
                    .shop
                    .relics
                    .iter()
                    .map(|r| wire::RelicState {
                        id: r.id.clone(),
                        name: r.name.clone(),
                        price: r.price,
                        ..Default::default()
                    })
                    .collect(),
                potions: state
                    .shop
                    .potions
                    .iter()
                    .map(|p| wire::PotionState {
                        id: p.id.clone(),
                        name: p.name.clone(),
                        price: p.price,
                        ..Default::default()
                    })
                    .collect(),
            }),
            rest_site: Some(wire::RestSiteState {
                heal_amount: state.rest_site.heal_amount,
                has_rest: state.rest_site.has_rest,
                has_smith: state.rest_site.has_smith,
                has_lift: state.rest_site.has_lift,
                has_toke: state.rest_site.has_toke,
                has_dig: state.rest_site.has_dig,
            }),
            event: Some(wire::EventState {
                event_id: state.event_id.clone(),
            }),
        }
    }
}

impl From<&Power> for wire::PowerState {
    fn from(power: &Power) -> Self {
        Self {
            id: power.id.clone(),
            name: String::new(),
            amount: power.amount,
        }
    }
}

impl From<&CardState> for wire::CardState {
    fn from(card: &CardState) -> Self {
        Self {
            id: card.id.clone(),
            name: card.name.clone(),
            cost: card.cost,
            r#type: card.card_type.clone(),
            damage: card.damage,
            block: card.block,
            is_upgraded: card.is_upgraded,
            exhaust: card.exhaust,
            is_playable: card.is_playable,
            price: card.price,
            ..Default::default()
        }
    }
}
