//! What the screen shows for a given request state, independent of ratatui.
//!
//! `ui` draws a `PageView`; the headless CLI prints one.

use crate::movie::Movie;
use crate::state::RequestState;

pub const NO_POSTER: &str = "No Poster";
pub const LOADING_TEXT: &str = "Fetching recommendations";
pub const EMPTY_PROMPT: &str =
    "Enter movies above or choose \"Surprise Me!\" to get recommendations.";
pub const DEFAULT_HEADING: &str = "Here are your recommendations:";
pub const ERROR_PREFIX: &str = "Oops! ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PosterView<'a> {
    Image { url: &'a str, alt: &'a str },
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieCard<'a> {
    pub key: String,
    pub poster: PosterView<'a>,
    pub title: &'a str,
    /// "(1999)", only when the year is known.
    pub year: Option<String>,
    pub overview: &'a str,
}

impl<'a> MovieCard<'a> {
    pub fn from_movie(movie: &'a Movie) -> Self {
        let poster = match movie.poster() {
            Some(url) => PosterView::Image {
                url,
                alt: &movie.title,
            },
            None => PosterView::Placeholder,
        };
        Self {
            key: movie.display_key(),
            poster,
            title: &movie.title,
            year: movie.release_year.map(|y| format!("({})", y)),
            overview: movie.overview.as_deref().unwrap_or(""),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsView<'a> {
    Loading,
    Prompt,
    Cards {
        heading: &'a str,
        cards: Vec<MovieCard<'a>>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView<'a> {
    pub error: Option<&'a str>,
    pub results: ResultsView<'a>,
}

pub fn page_view(state: &RequestState) -> PageView<'_> {
    match state {
        RequestState::Loading { .. } => PageView {
            error: None,
            results: ResultsView::Loading,
        },
        RequestState::Error(err) => PageView {
            error: Some(err.message()),
            // Results were cleared when the request started
            results: ResultsView::Prompt,
        },
        RequestState::Idle => PageView {
            error: None,
            results: ResultsView::Prompt,
        },
        RequestState::Success(set) if set.movies.is_empty() => PageView {
            error: None,
            results: ResultsView::Prompt,
        },
        RequestState::Success(set) => {
            let heading = if set.title.trim().is_empty() {
                DEFAULT_HEADING
            } else {
                set.title.as_str()
            };
            PageView {
                error: None,
                results: ResultsView::Cards {
                    heading,
                    cards: set.movies.iter().map(MovieCard::from_movie).collect(),
                },
            }
        }
    }
}
