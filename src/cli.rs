//! Command-line entry points. Without a subcommand the TUI starts; the
//! subcommands run a single request and print the result.

use std::process::ExitCode;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use colored::*;

use crate::api::HttpRecommendationClient;
use crate::config::Config;
use crate::movie::TitleTriple;
use crate::orchestrator::Orchestrator;
use crate::view::{page_view, PageView, PosterView, ResultsView, EMPTY_PROMPT, ERROR_PREFIX, NO_POSTER};

#[derive(Parser, Debug)]
#[command(name = "recommender", version)]
#[command(about = "Get movie and series recommendations from three titles you like")]
pub struct Cli {
    /// Base URL of the recommendation API
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds (0 waits forever)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Recommend titles similar to three you like
    Recommend {
        /// Exactly three movie or series titles
        #[arg(num_args = 3, required = true, value_names = ["TITLE1", "TITLE2", "TITLE3"])]
        titles: Vec<String>,
    },
    /// Get a few random well-rated picks
    Surprise,
}

impl Cli {
    /// Command-line flags win over file and environment settings.
    pub fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.base_url {
            config.api_base_url = url.clone();
        }
        if let Some(secs) = self.timeout {
            config.request_timeout_secs = secs;
        }
    }
}

pub async fn run_headless(command: Commands, config: &Config) -> Result<ExitCode> {
    let api = HttpRecommendationClient::new(&config.api_base_url);
    let mut orchestrator = Orchestrator::new(config.request_timeout());

    let state = match command {
        Commands::Recommend { titles } => {
            let titles: [String; 3] = titles
                .try_into()
                .map_err(|_| anyhow!("Expected exactly three titles"))?;
            let titles = TitleTriple::new(titles)?;
            orchestrator.request_by_titles(&api, titles).await
        }
        Commands::Surprise => orchestrator.request_surprise(&api).await,
    };

    let view = page_view(state);
    if let Some(message) = view.error {
        eprintln!("{}{}", ERROR_PREFIX.red().bold(), message.red());
        return Ok(ExitCode::FAILURE);
    }

    print!("{}", format_results(&view));
    Ok(ExitCode::SUCCESS)
}

/// Plain-terminal rendering of the results area, one line per entry.
pub fn format_results(view: &PageView<'_>) -> String {
    let mut lines: Vec<String> = Vec::new();

    match &view.results {
        ResultsView::Loading => {}
        ResultsView::Prompt => lines.push(EMPTY_PROMPT.dimmed().to_string()),
        ResultsView::Cards { heading, cards } => {
            lines.push(String::new());
            lines.push(heading.bold().cyan().to_string());
            lines.push("=".repeat(40).dimmed().to_string());

            for card in cards {
                let year = card.year.as_deref().unwrap_or("");
                lines.push(String::new());
                lines.push(format!("{} {}", card.title.bold().yellow(), year.dimmed()));
                lines.push(match card.poster {
                    PosterView::Image { url, .. } => format!("  Poster: {}", url.blue()),
                    PosterView::Placeholder => format!("  [{}]", NO_POSTER.dimmed()),
                });
                if !card.overview.is_empty() {
                    lines.push(format!("  {}", card.overview));
                }
            }
        }
    }

    lines.into_iter().map(|line| line + "\n").collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movie::{Movie, RecommendationSet};
    use crate::state::{RequestKind, RequestState};

    #[test]
    fn test_recommend_requires_three_titles() {
        assert!(Cli::try_parse_from(["recommender", "recommend", "A", "B"]).is_err());
        assert!(Cli::try_parse_from(["recommender", "recommend", "A", "B", "C", "D"]).is_err());

        let cli = Cli::try_parse_from(["recommender", "recommend", "A", "B", "C"]).unwrap();
        match cli.command {
            Some(Commands::Recommend { titles }) => assert_eq!(titles, ["A", "B", "C"]),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "recommender",
            "surprise",
            "--base-url",
            "http://recs:9000",
            "--timeout",
            "5",
        ])
        .unwrap();
        let mut config = Config::default();
        cli.apply(&mut config);

        assert_eq!(config.api_base_url, "http://recs:9000");
        assert_eq!(config.request_timeout_secs, 5);
        assert!(matches!(cli.command, Some(Commands::Surprise)));
    }

    #[test]
    fn test_no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["recommender"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_format_results_lists_cards() {
        colored::control::set_override(false);

        let mut with_poster = Movie::new("Arrival");
        with_poster.release_year = Some(2016);
        with_poster.poster_url = Some("https://img/arrival.jpg".into());
        with_poster.overview = Some("Linguist meets heptapods.".into());
        let state = RequestState::Success(RecommendationSet {
            title: "Based on your choices:".into(),
            movies: vec![with_poster, Movie::new("Primer")],
        });

        let text = format_results(&page_view(&state));
        assert!(text.contains("Based on your choices:"));
        assert!(text.contains("Arrival (2016)"));
        assert!(text.contains("Poster: https://img/arrival.jpg"));
        assert!(text.contains("Linguist meets heptapods."));
        assert!(text.contains("Primer"));
        assert!(text.contains("[No Poster]"));
    }

    #[test]
    fn test_format_results_empty() {
        colored::control::set_override(false);
        let state = RequestState::Success(RecommendationSet::default());
        assert!(format_results(&page_view(&state)).contains("Enter movies above"));
    }

    #[test]
    fn test_format_results_line_layout() {
        colored::control::set_override(false);
        let state = RequestState::Success(RecommendationSet {
            title: "Surprise!".into(),
            movies: vec![Movie::new("Heat")],
        });

        let text = format_results(&page_view(&state));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec!["", "Surprise!", "=".repeat(40).as_str(), "", "Heat ", "  [No Poster]"]
        );
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_format_results_loading_prints_nothing() {
        let state = RequestState::Loading {
            kind: RequestKind::Surprise,
            seq: 1,
        };
        assert_eq!(format_results(&page_view(&state)), "");
    }
}
