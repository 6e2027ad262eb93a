use std::collections::BTreeSet;

use log::info;

use crate::error::{LedgerError, Result};

/// Reduce a peer address to its `host:port` network location.
///
/// Accepts a full URL (`http://10.0.0.5:5000/chain`) or a bare location
/// (`10.0.0.5:5000`). Scheme, path, query and fragment are stripped.
pub fn normalize_address(address: &str) -> Result<String> {
    let trimmed = address.trim();
    let rest = match trimmed.split_once("://") {
        Some((_scheme, rest)) => rest,
        None => trimmed,
    };
    let location = rest.split(['/', '?', '#']).next().unwrap_or_default();

    if location.is_empty() || location.chars().any(char::is_whitespace) {
        return Err(LedgerError::InvalidAddress(address.to_string()));
    }
    Ok(location.to_string())
}

/// Known peers, keyed by normalized network location.
#[derive(Debug, Default)]
pub struct PeerRegistry {
    peers: BTreeSet<String>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a peer. Registering a known peer again is a no-op; an
    /// invalid address leaves the registry untouched.
    pub fn register(&mut self, address: &str) -> Result<()> {
        let location = normalize_address(address)?;
        if self.peers.insert(location.clone()) {
            info!("PEERS - registered {location} (total {})", self.peers.len());
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.peers.iter()
    }
}

#[cfg(test)]
impl PeerRegistry {
    fn contains(&self, location: &str) -> bool {
        self.peers.contains(location)
    }

    fn len(&self) -> usize {
        self.peers.len()
    }

    fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}
