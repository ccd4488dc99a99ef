//! Protobuf messages exchanged with the game mod
//!
//! Mirrors `proto/sts_state.proto`. Fields the game adds later are skipped by
//! the decoder, fields it omits decode to their zero value.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GameAction {
    #[prost(string, tag = "1")]
    pub action_type: String,
    #[prost(int32, tag = "2")]
    pub card_index: i32,
    #[prost(int32, tag = "3")]
    pub target_index: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GameState {
    #[prost(message, optional, tag = "1")]
    pub player: Option<PlayerState>,
    #[prost(message, repeated, tag = "2")]
    pub monsters: Vec<MonsterState>,
    #[prost(message, repeated, tag = "3")]
    pub hand: Vec<CardState>,
    #[prost(message, repeated, tag = "4")]
    pub master_deck: Vec<CardState>,
    #[prost(message, repeated, tag = "5")]
    pub potions: Vec<PotionState>,
    #[prost(message, optional, tag = "6")]
    pub map: Option<DungeonMapState>,
    #[prost(string, tag = "7")]
    pub screen_type: String,
    #[prost(message, optional, tag = "8")]
    pub game_outcome: Option<GameOutcome>,
    #[prost(message, optional, tag = "9")]
    pub reward: Option<RewardState>,
    #[prost(message, optional, tag = "10")]
    pub shop: Option<ShopState>,
    #[prost(message, optional, tag = "11")]
    pub rest_site: Option<RestSiteState>,
    #[prost(message, optional, tag = "12")]
    pub event: Option<EventState>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PlayerState {
    #[prost(int32, tag = "1")]
    pub hp: i32,
    #[prost(int32, tag = "2")]
    pub max_hp: i32,
    #[prost(int32, tag = "3")]
    pub gold: i32,
    #[prost(int32, tag = "4")]
    pub energy: i32,
    #[prost(int32, tag = "5")]
    pub block: i32,
    #[prost(int32, tag = "6")]
    pub floor: i32,
    #[prost(string, tag = "7")]
    pub stance: String,
    #[prost(message, repeated, tag = "8")]
    pub powers: Vec<PowerState>,
    #[prost(message, repeated, tag = "9")]
    pub relics: Vec<RelicState>,
    #[prost(message, repeated, tag = "10")]
    pub orbs: Vec<OrbState>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PowerState {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(int32, tag = "3")]
    pub amount: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RelicState {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(int32, tag = "3")]
    pub counter: i32,
    #[prost(int32, tag = "4")]
    pub price: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OrbState {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(int32, tag = "3")]
    pub evoke_amount: i32,
    #[prost(int32, tag = "4")]
    pub passive_amount: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CardState {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(int32, tag = "3")]
    pub cost: i32,
    #[prost(string, tag = "4")]
    pub r#type: String,
    #[prost(int32, tag = "5")]
    pub damage: i32,
    #[prost(int32, tag = "6")]
    pub block: i32,
    #[prost(bool, tag = "7")]
    pub is_upgraded: bool,
    #[prost(int32, tag = "8")]
    pub magic_number: i32,
    #[prost(bool, tag = "9")]
    pub exhaust: bool,
    #[prost(bool, tag = "10")]
    pub is_playable: bool,
    #[prost(string, tag = "11")]
    pub target: String,
    #[prost(int32, tag = "12")]
    pub price: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MonsterState {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(int32, tag = "3")]
    pub hp: i32,
    #[prost(int32, tag = "4")]
    pub max_hp: i32,
    #[prost(string, tag = "5")]
    pub intent: String,
    #[prost(int32, tag = "6")]
    pub block: i32,
    #[prost(bool, tag = "7")]
    pub is_gone: bool,
    #[prost(message, repeated, tag = "8")]
    pub powers: Vec<PowerState>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PotionState {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(int32, tag = "3")]
    pub slot_index: i32,
    #[prost(bool, tag = "4")]
    pub is_usable: bool,
    #[prost(bool, tag = "5")]
    pub can_target: bool,
    #[prost(int32, tag = "6")]
    pub price: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DungeonMapState {
    #[prost(int32, tag = "1")]
    pub floor: i32,
    #[prost(string, tag = "2")]
    pub boss_name: String,
    #[prost(message, repeated, tag = "3")]
    pub nodes: Vec<MapNodeState>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MapNodeState {
    #[prost(int32, tag = "1")]
    pub x: i32,
    #[prost(int32, tag = "2")]
    pub y: i32,
    #[prost(string, tag = "3")]
    pub room_type: String,
    #[prost(bool, tag = "4")]
    pub is_available: bool,
    #[prost(message, repeated, tag = "5")]
    pub children: Vec<MapEdgeState>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MapEdgeState {
    #[prost(int32, tag = "1")]
    pub dst_x: i32,
    #[prost(int32, tag = "2")]
    pub dst_y: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GameOutcome {
    #[prost(bool, tag = "1")]
    pub is_done: bool,
    #[prost(bool, tag = "2")]
    pub victory: bool,
    #[prost(int32, tag = "3")]
    pub score: i32,
    #[prost(int32, tag = "4")]
    pub ascension_level: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RewardState {
    #[prost(message, repeated, tag = "1")]
    pub items: Vec<RewardItemState>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RewardItemState {
    #[prost(string, tag = "1")]
    pub r#type: String,
    #[prost(int32, tag = "2")]
    pub amount: i32,
    #[prost(string, tag = "3")]
    pub id: String,
    #[prost(bool, tag = "4")]
    pub is_claimed: bool,
    #[prost(message, repeated, tag = "5")]
    pub cards: Vec<CardState>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ShopState {
    #[prost(int32, tag = "1")]
    pub current_gold: i32,
    #[prost(int32, tag = "2")]
    pub purge_cost: i32,
    #[prost(message, repeated, tag = "3")]
    pub cards: Vec<CardState>,
    #[prost(message, repeated, tag = "4")]
    pub relics: Vec<RelicState>,
    #[prost(message, repeated, tag = "5")]
    pub potions: Vec<PotionState>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RestSiteState {
    #[prost(int32, tag = "1")]
    pub heal_amount: i32,
    #[prost(bool, tag = "2")]
    pub has_rest: bool,
    #[prost(bool, tag = "3")]
    pub has_smith: bool,
    #[prost(bool, tag = "4")]
    pub has_lift: bool,
    #[prost(bool, tag = "5")]
    pub has_toke: bool,
    #[prost(bool, tag = "6")]
    pub has_dig: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EventState {
    #[prost(string, tag = "1")]
    pub event_id: String,
}
