//! spire-agent: random masked agent for smoke-testing the game bridge
//!
//! Usage: `spire-agent [port] [episodes] [seed]`
//!
//! Connects to the game mod, then plays `episodes` runs choosing uniformly
//! among the legal actions. Every step is printed to stdout as one JSON line;
//! logs go to stderr.

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use spire_core::{ActionMask, NOOP_ACTION, action_name};
use spire_env::{EnvConfig, Environment, SpireEnv};
use std::io::Write;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Args {
    port: Option<u16>,
    episodes: u32,
    seed: u64,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let port = args
        .first()
        .map(|p| p.parse::<u16>().with_context(|| format!("invalid port {:?}", p)))
        .transpose()?;
    let episodes = args
        .get(1)
        .map(|e| e.parse::<u32>().with_context(|| format!("invalid episode count {:?}", e)))
        .transpose()?
        .unwrap_or(1);
    let seed = args
        .get(2)
        .map(|s| s.parse::<u64>().with_context(|| format!("invalid seed {:?}", s)))
        .transpose()?
        .unwrap_or(0);
    Ok(Args {
        port,
        episodes,
        seed,
    })
}

/// Uniform pick among legal actions, the no-op when none are
fn choose_action(mask: &ActionMask, rng: &mut StdRng) -> i64 {
    mask.legal_indices()
        .choose(rng)
        .copied()
        .unwrap_or(NOOP_ACTION) as i64
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&cli)?;

    let mut config = EnvConfig::from_env();
    if let Some(port) = args.port {
        config.bridge.port = port;
    }
    info!(
        "spire-agent starting: {}:{} episodes={} seed={}",
        config.bridge.host, config.bridge.port, args.episodes, args.seed
    );

    let mut env = SpireEnv::new(config);
    let mut rng = StdRng::seed_from_u64(args.seed);
    let stdout = std::io::stdout();

    for episode in 0..args.episodes {
        let (_, mut info) = env.reset().await.context("reset failed")?;
        if info.degraded_reset {
            warn!("Episode {} started from a stale snapshot", episode);
        }

        let mut total = 0.0;
        loop {
            let action = choose_action(&info.action_mask, &mut rng);
            let result = env.step(action).await?;
            total += result.reward;

            let line = serde_json::json!({
                "episode": episode,
                "action": action,
                "action_name": action_name(action),
                "reward": result.reward,
                "reward_components": result.reward_components,
                "terminated": result.terminated,
                "truncated": result.truncated,
                "info": result.info,
            });
            writeln!(stdout.lock(), "{}", line)?;

            if let Some(status) = env.render() {
                info!("{}", status);
            }
            if result.terminated || result.truncated {
                info!(
                    "Episode {} done after {} steps, total reward {:.2}",
                    episode, result.info.step, total
                );
                break;
            }
            info = result.info;
        }
    }

    env.close().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use spire_core::GameState;
    use spire_core::action_mask;
    use spire_core::state::{CardState, ScreenType};

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        assert_eq!(
            parse_args(&[]).unwrap(),
            Args {
                port: None,
                episodes: 1,
                seed: 0,
            }
        );
        assert_eq!(
            parse_args(&strings(&["9100", "5", "7"])).unwrap(),
            Args {
                port: Some(9100),
                episodes: 5,
                seed: 7,
            }
        );
        assert!(parse_args(&strings(&["99999"])).is_err());
    }

    #[test]
    fn test_empty_mask_falls_back_to_noop() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(choose_action(&ActionMask::empty(), &mut rng), NOOP_ACTION as i64);
    }

    #[test]
    fn test_choice_is_legal_and_seeded() {
        let state = GameState {
            screen_type: ScreenType::Combat,
            hand: vec![
                CardState {
                    is_playable: true,
                    ..Default::default()
                },
                CardState {
                    is_playable: false,
                    ..Default::default()
                },
                CardState {
                    is_playable: true,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let mask = action_mask(&state);

        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let action = choose_action(&mask, &mut a);
            assert!(mask.is_legal(action));
            assert_eq!(action, choose_action(&mask, &mut b));
        }
    }
}
