//! Request lifecycle: start (→ Loading), execute (network), complete (→ Success | Error).
//!
//! Starting and completing are split so the TUI can run the network call on a
//! background task while the event loop keeps drawing. Each started request
//! gets a sequence number; only the completion of the most recent one is
//! applied, so a slow earlier response cannot overwrite a newer one.

use std::time::Duration;

use crate::api::RecommendationApi;
use crate::error::{ApiError, ApiResult};
use crate::movie::{Movie, RecommendationSet, TitleTriple};
use crate::state::{RequestKind, RequestState};

#[derive(Debug, Clone)]
enum Call {
    ByTitles(TitleTriple),
    Surprise,
}

/// A request that has moved the state to `Loading` but not yet hit the network.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    seq: u64,
    call: Call,
    timeout: Option<Duration>,
}

/// Outcome of a `PendingRequest`, ready to be applied with `Orchestrator::complete`.
#[derive(Debug, Clone)]
pub struct Completion {
    pub seq: u64,
    pub kind: RequestKind,
    pub result: ApiResult<Vec<Movie>>,
}

impl PendingRequest {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn kind(&self) -> RequestKind {
        match self.call {
            Call::ByTitles(_) => RequestKind::ByTitles,
            Call::Surprise => RequestKind::Surprise,
        }
    }

    /// Perform the network round trip. Never fails: errors are part of the `Completion`.
    pub async fn execute(self, api: &dyn RecommendationApi) -> Completion {
        let kind = self.kind();
        let PendingRequest { seq, call, timeout } = self;

        let round_trip = async {
            match &call {
                Call::ByTitles(titles) => api.recommend(titles).await,
                Call::Surprise => api.surprise().await,
            }
        };

        let result = match timeout {
            Some(limit) => tokio::time::timeout(limit, round_trip)
                .await
                .unwrap_or_else(|_| Err(ApiError::timeout())),
            None => round_trip.await,
        };

        Completion { seq, kind, result }
    }
}

#[derive(Debug, Default)]
pub struct Orchestrator {
    state: RequestState,
    latest_seq: u64,
    timeout: Option<Duration>,
}

impl Orchestrator {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            state: RequestState::Idle,
            latest_seq: 0,
            timeout,
        }
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn start_by_titles(&mut self, titles: TitleTriple) -> PendingRequest {
        self.start(Call::ByTitles(titles))
    }

    pub fn start_surprise(&mut self) -> PendingRequest {
        self.start(Call::Surprise)
    }

    fn start(&mut self, call: Call) -> PendingRequest {
        self.latest_seq += 1;
        let pending = PendingRequest {
            seq: self.latest_seq,
            call,
            timeout: self.timeout,
        };
        // Drops any previous error and results before the call goes out.
        self.state = RequestState::Loading {
            kind: pending.kind(),
            seq: pending.seq,
        };
        tracing::info!(seq = pending.seq, kind = ?pending.kind(), "Request started");
        pending
    }

    /// Apply a finished request. Returns false if it was superseded and ignored.
    pub fn complete(&mut self, completion: Completion) -> bool {
        if completion.seq != self.latest_seq {
            tracing::debug!(
                seq = completion.seq,
                latest = self.latest_seq,
                "Discarding stale response"
            );
            return false;
        }

        self.state = match completion.result {
            Ok(movies) => {
                tracing::info!(seq = completion.seq, count = movies.len(), "Request succeeded");
                RequestState::Success(RecommendationSet {
                    title: completion.kind.heading().to_string(),
                    movies,
                })
            }
            Err(err) => {
                tracing::warn!(seq = completion.seq, error = %err, "Request failed");
                RequestState::Error(err)
            }
        };
        true
    }

    /// Full cycle for the three titles: Loading, round trip, terminal state.
    pub async fn request_by_titles(
        &mut self,
        api: &dyn RecommendationApi,
        titles: TitleTriple,
    ) -> &RequestState {
        let completion = self.start_by_titles(titles).execute(api).await;
        self.complete(completion);
        &self.state
    }

    /// Full cycle for the surprise call.
    pub async fn request_surprise(&mut self, api: &dyn RecommendationApi) -> &RequestState {
        let completion = self.start_surprise().execute(api).await;
        self.complete(completion);
        &self.state
    }
}
