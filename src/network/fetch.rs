use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::blockchain::Block;
use crate::error::{LedgerError, Result};

/// A peer's chain as it reports it: the blocks plus the declared length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteChain {
    pub chain: Vec<Block>,
    pub length: usize,
}

/// Fetches the full chain held by a peer.
///
/// Implementations own their timeout; a timeout is reported as
/// [`LedgerError::FetchFailed`] like any other failure.
pub trait ChainFetcher {
    fn fetch_chain(&self, peer: &str) -> impl Future<Output = Result<RemoteChain>>;
}

/// Fetches `GET http://{peer}/chain` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpChainFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpChainFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }
}

impl ChainFetcher for HttpChainFetcher {
    async fn fetch_chain(&self, peer: &str) -> Result<RemoteChain> {
        let url = format!("http://{peer}/chain");
        let failed = |reason: String| LedgerError::FetchFailed {
            peer: peer.to_string(),
            reason,
        };

        let resp = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(failed(format!("HTTP {} from {url}", resp.status())));
        }

        resp.json().await.map_err(|e| failed(e.to_string()))
    }
}

#[cfg(test)]
pub(crate) mod stub {
    use std::collections::HashMap;

    use super::{ChainFetcher, RemoteChain};
    use crate::blockchain::Block;
    use crate::error::{LedgerError, Result};

    /// Serves fixed chains; unknown peers fail as if unreachable.
    #[derive(Debug, Default)]
    pub struct StubFetcher {
        chains: HashMap<String, RemoteChain>,
    }

    impl StubFetcher {
        pub fn with_chain(self, peer: &str, chain: Vec<Block>) -> Self {
            let length = chain.len();
            self.with_declared(peer, chain, length)
        }

        pub fn with_declared(mut self, peer: &str, chain: Vec<Block>, length: usize) -> Self {
            self.chains
                .insert(peer.to_string(), RemoteChain { chain, length });
            self
        }
    }

    impl ChainFetcher for StubFetcher {
        async fn fetch_chain(&self, peer: &str) -> Result<RemoteChain> {
            self.chains
                .get(peer)
                .cloned()
                .ok_or_else(|| LedgerError::FetchFailed {
                    peer: peer.to_string(),
                    reason: "connection refused".into(),
                })
        }
    }
}
