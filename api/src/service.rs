use common::models::{ChartRequest, FetchState};
use connectors::ChartDataFetcher;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Owns the chart panel's state and applies fetch results to it.
///
/// Every refresh takes a new generation number. A result is only committed
/// if its generation is still the newest one, so a slow response can never
/// overwrite the outcome of a request started after it.
pub struct ChartService {
    fetcher: Arc<ChartDataFetcher>,
    state: RwLock<FetchState>,
    generation: AtomicU64,
}

impl ChartService {
    pub fn new(fetcher: Arc<ChartDataFetcher>) -> Self {
        Self {
            fetcher,
            state: RwLock::new(FetchState::default()),
            generation: AtomicU64::new(0),
        }
    }

    /// Current chart state
    pub async fn state(&self) -> FetchState {
        self.state.read().await.clone()
    }

    /// Fetch the chart for `request` and return the state afterwards.
    pub async fn refresh(&self, request: &ChartRequest) -> FetchState {
        if request.is_noop() {
            return self.state().await;
        }

        let generation = {
            let mut state = self.state.write().await;
            *state = FetchState::loading();
            self.generation.fetch_add(1, Ordering::SeqCst) + 1
        };

        let Some(result) = self.fetcher.fetch(request).await else {
            return self.state().await;
        };

        let mut state = self.state.write().await;
        if self.generation.load(Ordering::SeqCst) == generation {
            *state = result;
        } else {
            debug!(
                "Discarding superseded chart result for {} (generation {})",
                request.coin_id, generation
            );
        }

        state.clone()
    }
}
