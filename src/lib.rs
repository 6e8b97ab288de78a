pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod handler;
pub mod movie;
pub mod orchestrator;
pub mod state;
pub mod tui;
pub mod ui;
pub mod view;

// Re-export main types for convenience
pub use api::{HttpRecommendationClient, RecommendationApi};
pub use config::Config;
pub use error::{ApiError, ValidationError};
pub use form::{FormAction, InputForm};
pub use movie::{Movie, MovieId, RecommendationSet, TitleTriple};
pub use orchestrator::{Completion, Orchestrator, PendingRequest};
pub use state::{RequestKind, RequestState};
