//! Episode controller
//!
//! Owns the bridge and the two snapshots a step needs: the one the policy
//! acted on and the one the game answered with. Everything else (decoding,
//! masks, observations, rewards) is borrowed from `spire_core` as pure
//! functions of those snapshots.

use async_trait::async_trait;
use spire_bridge::SpireBridge;
use spire_core::action::{Command, action_name, decode_action};
use spire_core::{
    GameState, Observation, Result, RewardFunction, ShapedReward, SpireError, action_mask,
    build_observation,
};
use tracing::{debug, info, warn};

use crate::config::EnvConfig;
use crate::environment::{Environment, StepInfo, StepResult};

/// Result of waiting for the game to restart
#[derive(Debug, Clone, PartialEq)]
pub enum ResetOutcome {
    /// A snapshot at floor 0 or 1 arrived
    Ready(GameState),
    /// Retries ran out; carries the last snapshot seen, if any
    TimedOut(Option<GameState>),
}

/// Reinforcement learning environment backed by a live game
pub struct SpireEnv {
    config: EnvConfig,
    bridge: SpireBridge,
    reward_fn: ShapedReward,
    prev: Option<GameState>,
    current: Option<GameState>,
    steps: u32,
}

impl SpireEnv {
    pub fn new(config: EnvConfig) -> Self {
        let bridge = SpireBridge::new(config.bridge.clone());
        Self {
            config,
            bridge,
            reward_fn: ShapedReward::default(),
            prev: None,
            current: None,
            steps: 0,
        }
    }

    /// Replace the reward shaping
    pub fn with_reward(mut self, reward_fn: ShapedReward) -> Self {
        self.reward_fn = reward_fn;
        self
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    /// Snapshot the policy acts on next
    pub fn current_state(&self) -> Option<&GameState> {
        self.current.as_ref()
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Connect if needed; `reset` does this on its own
    pub async fn connect(&mut self) -> Result<()> {
        self.bridge.connect().await
    }

    /// Send RESET and poll until the game reports a fresh run
    ///
    /// Every poll after the first is a WAIT command, so each snapshot is
    /// still the answer to exactly one request. At least one poll is made.
    /// If the game hangs up, polling stops and the last snapshot seen is
    /// returned as `TimedOut`.
    pub async fn request_reset(&mut self) -> Result<ResetOutcome> {
        let mut last = None;
        for attempt in 0..self.config.reset_max_retries.max(1) {
            let command = if attempt == 0 {
                Command::reset()
            } else {
                tokio::time::sleep(self.config.reset_backoff).await;
                Command::wait()
            };

            let state = match self.bridge.exchange(&command).await {
                Ok(Some(state)) => state,
                Ok(None) | Err(SpireError::StreamClosed) => {
                    warn!("Game closed the connection during reset poll {}", attempt + 1);
                    self.bridge.close().await;
                    break;
                }
                Err(e) => return Err(e),
            };

            if state.player.floor <= 1 {
                debug!("Reset ready after {} poll(s)", attempt + 1);
                return Ok(ResetOutcome::Ready(state));
            }
            debug!("Reset poll {}: still on floor {}", attempt + 1, state.player.floor);
            last = Some(state);
        }

        Ok(ResetOutcome::TimedOut(last))
    }

    fn info_for(&self, state: &GameState) -> StepInfo {
        StepInfo {
            action_mask: action_mask(state),
            step: self.steps,
            screen_type: state.screen_type,
            error: None,
            degraded_reset: false,
        }
    }

    fn connection_lost(&self, current: &GameState) -> StepResult {
        let mut info = self.info_for(current);
        info.error = Some("Connection lost".into());
        StepResult {
            observation: build_observation(current, self.config.normalize),
            reward: 0.0,
            reward_components: Default::default(),
            terminated: true,
            truncated: false,
            info,
        }
    }
}

#[async_trait]
impl Environment for SpireEnv {
    async fn reset(&mut self) -> Result<(Observation, StepInfo)> {
        self.bridge.connect().await?;

        let (state, degraded) = match self.request_reset().await? {
            ResetOutcome::Ready(state) => (state, false),
            ResetOutcome::TimedOut(Some(state)) => {
                warn!(
                    "Game did not return to floor 1, starting from floor {}",
                    state.player.floor
                );
                (state, true)
            }
            ResetOutcome::TimedOut(None) => {
                self.bridge.close().await;
                self.prev = None;
                self.current = None;
                return Err(SpireError::ResetFailed("no game state received".into()));
            }
        };

        info!(
            "Episode started: floor={} hp={} screen={}",
            state.player.floor, state.player.hp, state.screen_type
        );

        self.steps = 0;
        let observation = build_observation(&state, self.config.normalize);
        let mut info = self.info_for(&state);
        info.degraded_reset = degraded;

        self.prev = Some(state.clone());
        self.current = Some(state);
        Ok((observation, info))
    }

    async fn step(&mut self, action: i64) -> Result<StepResult> {
        let Some(current) = self.current.take() else {
            return Err(SpireError::EpisodeNotStarted);
        };
        self.steps += 1;

        let mask = action_mask(&current);
        if !mask.is_legal(action) {
            warn!(
                "Action {} ({}) is not legal on {}",
                action,
                action_name(action),
                current.screen_type
            );
        }
        let command = decode_action(action, &current);
        debug!("Step {}: {} -> {}", self.steps, action_name(action), command);

        let next = match self.bridge.exchange(&command).await {
            Ok(Some(next)) => next,
            Ok(None) | Err(SpireError::StreamClosed) => {
                warn!("Game connection lost during step {}", self.steps);
                self.bridge.close().await;
                let result = self.connection_lost(&current);
                self.current = Some(current);
                return Ok(result);
            }
            Err(e) => {
                self.bridge.close().await;
                self.current = Some(current);
                return Err(e);
            }
        };

        let reward = self.reward_fn.compute(&current, &next);
        let terminated = next.game_outcome.is_done;
        let truncated = self.steps >= self.config.max_steps;
        if terminated {
            info!(
                "Episode finished after {} steps: victory={} score={}",
                self.steps, next.game_outcome.victory, next.game_outcome.score
            );
        }

        let result = StepResult {
            observation: build_observation(&next, self.config.normalize),
            reward: reward.value,
            reward_components: reward.components,
            terminated,
            truncated,
            info: self.info_for(&next),
        };

        self.prev = Some(current);
        self.current = Some(next);
        Ok(result)
    }

    fn render(&self) -> Option<String> {
        self.current.as_ref().map(|state| {
            format!(
                "Step: {} | Floor: {} | HP: {} | Screen: {}",
                self.steps, state.player.floor, state.player.hp, state.screen_type
            )
        })
    }

    async fn close(&mut self) {
        self.bridge.close().await;
        self.prev = None;
        self.current = None;
        self.steps = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spire_bridge::BridgeConfig;
    use spire_bridge::frame::{read_frame, write_frame};
    use spire_bridge::protocol::{decode_action as decode_command, encode_state};
    use spire_core::action::{ActionType, NOOP_ACTION, offsets};
    use spire_core::state::{CardState, GameOutcome, MonsterState, ScreenType};
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Answers each command with the next scripted state, then hangs up
    async fn mock_game(states: Vec<GameState>) -> (u16, JoinHandle<Vec<Command>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut states = states.into_iter();
            let mut received = Vec::new();
            while let Some(frame) = read_frame(&mut socket).await.unwrap() {
                received.push(decode_command(&frame).unwrap());
                match states.next() {
                    Some(state) => write_frame(&mut socket, &encode_state(&state)).await.unwrap(),
                    None => break,
                }
            }
            received
        });
        (port, handle)
    }

    fn config(port: u16) -> EnvConfig {
        EnvConfig {
            bridge: BridgeConfig {
                port,
                connect_timeout: Duration::from_secs(5),
                response_timeout: Some(Duration::from_secs(5)),
                ..Default::default()
            },
            reset_backoff: Duration::from_millis(1),
            ..Default::default()
        }
    }

    fn on_floor(floor: i32) -> GameState {
        let mut state = GameState::default();
        state.screen_type = ScreenType::Map;
        state.player.floor = floor;
        state.player.hp = 80;
        state
    }

    fn combat(hp: i32, monster_hp: i32) -> GameState {
        GameState {
            screen_type: ScreenType::Combat,
            monsters: vec![MonsterState {
                hp: monster_hp,
                max_hp: 40,
                intent: "ATTACK".into(),
                ..Default::default()
            }],
            hand: vec![CardState {
                id: "Strike_R".into(),
                cost: 1,
                damage: 6,
                card_type: "ATTACK".into(),
                is_playable: true,
                ..Default::default()
            }],
            ..on_floor_with_hp(1, hp)
        }
    }

    fn on_floor_with_hp(floor: i32, hp: i32) -> GameState {
        let mut state = on_floor(floor);
        state.player.hp = hp;
        state.player.max_hp = 80;
        state.player.energy = 3;
        state
    }

    #[tokio::test]
    async fn test_reset_ready_on_first_snapshot() {
        let (port, server) = mock_game(vec![combat(80, 40)]).await;
        let mut env = SpireEnv::new(config(port));

        let (obs, info) = env.reset().await.unwrap();
        assert_eq!(obs.global.is_combat, 1);
        assert!(!info.degraded_reset);
        assert_eq!(info.step, 0);
        assert!(info.action_mask.is_legal(offsets::END_TURN as i64));
        assert!(info.action_mask.is_legal(0));

        env.close().await;
        assert_eq!(server.await.unwrap(), vec![Command::reset()]);
    }

    #[tokio::test]
    async fn test_reset_polls_until_fresh_run() {
        let (port, server) = mock_game(vec![on_floor(6), on_floor(6), on_floor(0)]).await;
        let mut env = SpireEnv::new(config(port));

        let (_, info) = env.reset().await.unwrap();
        assert!(!info.degraded_reset);
        assert_eq!(env.current_state().unwrap().player.floor, 0);

        env.close().await;
        assert_eq!(
            server.await.unwrap(),
            vec![Command::reset(), Command::wait(), Command::wait()]
        );
    }

    #[tokio::test]
    async fn test_reset_degrades_to_last_snapshot() {
        let (port, server) = mock_game(vec![on_floor(7), on_floor(8)]).await;
        let mut env = SpireEnv::new(EnvConfig {
            reset_max_retries: 2,
            ..config(port)
        });

        let (_, info) = env.reset().await.unwrap();
        assert!(info.degraded_reset);
        assert_eq!(
            env.render().unwrap(),
            "Step: 0 | Floor: 8 | HP: 80 | Screen: MAP"
        );

        env.close().await;
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_reset_without_any_snapshot() {
        let (port, server) = mock_game(vec![]).await;
        let mut env = SpireEnv::new(config(port));

        let err = env.reset().await.unwrap_err();
        assert!(matches!(err, SpireError::ResetFailed(_)), "{:?}", err);
        assert!(env.render().is_none());

        env.close().await;
        assert_eq!(server.await.unwrap(), vec![Command::reset()]);
    }

    #[tokio::test]
    async fn test_reset_hang_up_degrades_to_last_snapshot() {
        // Answers RESET from floor 6, then hangs up on the first WAIT
        let (port, server) = mock_game(vec![on_floor(6)]).await;
        let mut env = SpireEnv::new(config(port));

        let (_, info) = env.reset().await.unwrap();
        assert!(info.degraded_reset);
        assert_eq!(env.current_state().unwrap().player.floor, 6);

        env.close().await;
        assert_eq!(
            server.await.unwrap(),
            vec![Command::reset(), Command::wait()]
        );
    }

    #[tokio::test]
    async fn test_zero_retries_still_reads_reset_reply() {
        let (port, server) = mock_game(vec![on_floor(0), on_floor(0)]).await;
        let mut env = SpireEnv::new(EnvConfig {
            reset_max_retries: 0,
            ..config(port)
        });

        let (_, info) = env.reset().await.unwrap();
        assert!(!info.degraded_reset);

        // The next exchange pairs with its own reply
        let result = env.step(NOOP_ACTION as i64).await.unwrap();
        assert!(result.info.error.is_none());

        env.close().await;
        assert_eq!(
            server.await.unwrap(),
            vec![Command::reset(), Command::wait()]
        );
    }

    #[tokio::test]
    async fn test_step_before_reset() {
        let mut env = SpireEnv::new(EnvConfig::default());
        let err = env.step(0).await.unwrap_err();
        assert!(matches!(err, SpireError::EpisodeNotStarted));
        assert!(!err.is_fatal());
        assert!(env.render().is_none());
    }

    #[tokio::test]
    async fn test_step_plays_card_and_rewards_damage() {
        let (port, server) = mock_game(vec![combat(50, 20), combat(50, 14)]).await;
        let mut env = SpireEnv::new(config(port));
        env.reset().await.unwrap();

        let result = env.step(0).await.unwrap();
        assert!((result.reward - 0.6).abs() < 1e-9, "got {}", result.reward);
        assert!((result.reward_components["monster_hp"] - 0.6).abs() < 1e-9);
        assert!(!result.terminated);
        assert!(!result.truncated);
        assert_eq!(result.info.step, 1);
        assert_eq!(result.info.screen_type, ScreenType::Combat);
        assert_eq!(
            env.render().unwrap(),
            "Step: 1 | Floor: 1 | HP: 50 | Screen: COMBAT"
        );

        env.close().await;
        let commands = server.await.unwrap();
        assert_eq!(commands[1], Command::new(ActionType::PlayCard, 0, 0));
    }

    #[tokio::test]
    async fn test_defeat_terminates() {
        let mut dead = combat(0, 14);
        dead.screen_type = ScreenType::GameOver;
        dead.game_outcome = GameOutcome {
            is_done: true,
            victory: false,
            ..Default::default()
        };
        let (port, server) = mock_game(vec![combat(6, 20), dead]).await;
        let mut env = SpireEnv::new(config(port));
        env.reset().await.unwrap();

        let result = env.step(offsets::END_TURN as i64).await.unwrap();
        assert!(result.terminated);
        assert!(result.reward <= -490.0, "got {}", result.reward);
        assert!(result.info.action_mask.is_empty());

        env.close().await;
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_connection_lost_terminates_without_error() {
        let (port, server) = mock_game(vec![combat(50, 20)]).await;
        let mut env = SpireEnv::new(config(port));
        env.reset().await.unwrap();

        let result = env.step(0).await.unwrap();
        assert!(result.terminated);
        assert_eq!(result.reward, 0.0);
        assert_eq!(result.info.error.as_deref(), Some("Connection lost"));
        assert_eq!(result.observation, build_observation(&combat(50, 20), true));

        server.await.unwrap();
        env.close().await;
    }

    #[tokio::test]
    async fn test_truncation_at_step_limit() {
        let states = vec![combat(50, 20), combat(50, 20), combat(50, 20)];
        let (port, server) = mock_game(states).await;
        let mut env = SpireEnv::new(EnvConfig {
            max_steps: 2,
            ..config(port)
        });
        env.reset().await.unwrap();

        assert!(!env.step(offsets::END_TURN as i64).await.unwrap().truncated);
        let result = env.step(offsets::END_TURN as i64).await.unwrap();
        assert!(result.truncated);
        assert!(!result.terminated);

        env.close().await;
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_illegal_and_noop_actions_send_wait() {
        let states = vec![on_floor(1), on_floor(1), on_floor(1)];
        let (port, server) = mock_game(states).await;
        let mut env = SpireEnv::new(config(port));
        env.reset().await.unwrap();

        // No available nodes: every map slot is unresolvable
        env.step(offsets::CHOOSE_MAP_NODE as i64).await.unwrap();
        env.step(NOOP_ACTION as i64).await.unwrap();

        env.close().await;
        let commands = server.await.unwrap();
        assert_eq!(&commands[1..], &[Command::wait(), Command::wait()]);
    }

    #[tokio::test]
    async fn test_step_timeout_is_fatal() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_frame(&mut socket).await.unwrap();
            write_frame(&mut socket, &encode_state(&combat(50, 20)))
                .await
                .unwrap();
            read_frame(&mut socket).await.unwrap();
            tokio::time::sleep(Duration::from_millis(300)).await;
        });

        let mut cfg = config(port);
        cfg.bridge.response_timeout = Some(Duration::from_millis(50));
        let mut env = SpireEnv::new(cfg);
        env.reset().await.unwrap();

        let err = env.step(0).await.unwrap_err();
        assert!(matches!(err, SpireError::Timeout(_)), "{:?}", err);
        assert!(err.is_fatal());

        env.close().await;
        env.close().await;
        server.await.unwrap();
    }
}
