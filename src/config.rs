use std::env;
use std::str::FromStr;
use std::time::Duration;

use log::warn;
use uuid::Uuid;

use crate::blockchain::{DEFAULT_DIFFICULTY, DIFF_MAX, DIFF_MIN};

/// Runtime settings, read from the environment (and `.env` via dotenvy).
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub host: String,
    pub port: u16,
    pub difficulty: usize,
    pub fetch_timeout: Duration,
    /// Peers registered at startup.
    pub peers: Vec<String>,
    /// Identity credited with mining rewards.
    pub node_id: String,
}

impl NodeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup; unset or unparsable values fall
    /// back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = parse_or(&lookup, "PORT", 5000);
        let difficulty = parse_or(&lookup, "DIFFICULTY", DEFAULT_DIFFICULTY);
        let difficulty = if (DIFF_MIN..=DIFF_MAX).contains(&difficulty) {
            difficulty
        } else {
            let clamped = difficulty.clamp(DIFF_MIN, DIFF_MAX);
            warn!(
                "CONFIG - DIFFICULTY={difficulty} outside {DIFF_MIN}..={DIFF_MAX}, using {clamped}"
            );
            clamped
        };
        let fetch_timeout = Duration::from_secs(parse_or(&lookup, "FETCH_TIMEOUT_SECS", 10));
        let peers = lookup("PEERS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        let node_id = lookup("NODE_ID")
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string());

        Self {
            host,
            port,
            difficulty,
            fetch_timeout,
            peers,
            node_id,
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("CONFIG - ignoring unparsable {key}={raw:?}");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::NodeConfig;

    fn config(pairs: &[(&str, &str)]) -> NodeConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        NodeConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let c = config(&[]);
        assert_eq!(c.host, "127.0.0.1");
        assert_eq!(c.port, 5000);
        assert_eq!(c.difficulty, 4);
        assert_eq!(c.fetch_timeout, Duration::from_secs(10));
        assert!(c.peers.is_empty());
        assert_eq!(c.node_id.len(), 32);
        assert!(!c.node_id.contains('-'));
    }

    #[test]
    fn reads_overrides() {
        let c = config(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "5001"),
            ("DIFFICULTY", "2"),
            ("FETCH_TIMEOUT_SECS", "3"),
            ("PEERS", "localhost:5000, http://10.0.0.2:5000 ,,"),
            ("NODE_ID", "miner-1"),
        ]);
        assert_eq!(c.host, "0.0.0.0");
        assert_eq!(c.port, 5001);
        assert_eq!(c.difficulty, 2);
        assert_eq!(c.fetch_timeout, Duration::from_secs(3));
        assert_eq!(c.peers, vec!["localhost:5000", "http://10.0.0.2:5000"]);
        assert_eq!(c.node_id, "miner-1");
    }

    #[test]
    fn bad_numbers_fall_back() {
        let c = config(&[("PORT", "not-a-port"), ("DIFFICULTY", "-1")]);
        assert_eq!(c.port, 5000);
        assert_eq!(c.difficulty, 4);
    }

    #[test]
    fn difficulty_is_clamped_to_digest_width() {
        assert_eq!(config(&[("DIFFICULTY", "65")]).difficulty, 64);
        assert_eq!(config(&[("DIFFICULTY", "1000")]).difficulty, 64);
        assert_eq!(config(&[("DIFFICULTY", "0")]).difficulty, 1);
        assert_eq!(config(&[("DIFFICULTY", "64")]).difficulty, 64);
    }
}
