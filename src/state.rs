//! UI-agnostic request state
//!
//! A single tagged union replaces separate loading/error/results flags, so a
//! spinner can never be shown next to an error or stale results.

use crate::error::ApiError;
use crate::movie::{Movie, RecommendationSet};

pub const BY_TITLES_HEADING: &str = "Based on your choices:";
pub const SURPRISE_HEADING: &str = "Surprise!";

/// Which of the two API calls a request is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    ByTitles,
    Surprise,
}

impl RequestKind {
    /// Heading shown above the cards on success.
    pub fn heading(&self) -> &'static str {
        match self {
            RequestKind::ByTitles => BY_TITLES_HEADING,
            RequestKind::Surprise => SURPRISE_HEADING,
        }
    }

    /// Field of the success body holding the movie list.
    pub fn list_field(&self) -> &'static str {
        match self {
            RequestKind::ByTitles => "recommendations",
            RequestKind::Surprise => "surprises",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading {
        kind: RequestKind,
        seq: u64,
    },
    Error(ApiError),
    Success(RecommendationSet),
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading { .. })
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            RequestState::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Current results; empty in every state but `Success`.
    pub fn recommendations(&self) -> &[Movie] {
        match self {
            RequestState::Success(set) => &set.movies,
            _ => &[],
        }
    }

    pub fn heading(&self) -> Option<&str> {
        match self {
            RequestState::Success(set) => Some(&set.title),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_has_no_results_or_error() {
        let state = RequestState::default();
        assert!(!state.is_loading());
        assert!(state.error().is_none());
        assert!(state.recommendations().is_empty());
    }

    #[test]
    fn test_kind_constants() {
        assert_eq!(RequestKind::ByTitles.heading(), "Based on your choices:");
        assert_eq!(RequestKind::Surprise.heading(), "Surprise!");
        assert_eq!(RequestKind::ByTitles.list_field(), "recommendations");
        assert_eq!(RequestKind::Surprise.list_field(), "surprises");
    }
}
