//! Transaction searches run in the background for the TUI.
//!
//! The TUI thread never awaits: a search is spawned onto the runtime and its
//! outcome is picked up by polling, the same way telemetry batches are.

use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, warn};
use wirewatch_adapters::logsearch::LogSearchClient;

use crate::data::search::{self, SearchFailure, SearchParams, SearchResult};

type Outcome = Result<SearchResult, SearchFailure>;

/// Runs at most one transaction search at a time.
#[derive(Debug)]
pub struct SearchTask {
    client: LogSearchClient,
    handle: Handle,
    pending: Option<(String, oneshot::Receiver<Outcome>)>,
}

impl SearchTask {
    /// Searches are spawned onto `handle`.
    pub fn new(client: LogSearchClient, handle: Handle) -> Self {
        Self {
            client,
            handle,
            pending: None,
        }
    }

    /// Start a search, replacing any that is still running.
    ///
    /// Parameters that cannot be searched fail immediately without touching
    /// the backend.
    pub fn start(&mut self, params: SearchParams) -> Result<(), SearchFailure> {
        if params.has_invalid_id() && params.amount.is_none() {
            return Err(SearchFailure::InvalidId);
        }
        if !params.is_enabled() {
            return Err(SearchFailure::Disabled);
        }

        let key = params.search_key();
        debug!("starting transaction search '{}'", key);

        let client = self.client.clone();
        let (tx, rx) = oneshot::channel();
        self.handle.spawn(async move {
            let outcome = search::execute(&client, &params).await;
            // receiver gone means the search was superseded
            let _ = tx.send(outcome);
        });
        self.pending = Some((key, rx));
        Ok(())
    }

    /// Key of the running search, if any.
    pub fn running(&self) -> Option<&str> {
        self.pending.as_ref().map(|(key, _)| key.as_str())
    }

    /// Take the finished search's outcome. Never blocks.
    pub fn poll(&mut self) -> Option<Outcome> {
        let (_, rx) = self.pending.as_mut()?;
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Closed) => {
                warn!("transaction search task ended without a result");
                Err(SearchFailure::Backend("search task ended".to_string()))
            }
        };
        self.pending = None;
        Some(outcome)
    }
}
