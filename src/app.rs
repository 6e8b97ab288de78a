use std::sync::Arc;
use std::time::Duration;
use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedSender;

use crate::api::RecommendationApi;
use crate::form::{FormAction, InputForm};
use crate::orchestrator::{Completion, Orchestrator, PendingRequest};
use crate::state::RequestState;
use crate::tui::AppEvent;

pub struct App {
    // Core state
    pub should_quit: bool,
    pub form: InputForm,
    pub orchestrator: Orchestrator,

    // Results scrolling, in card rows
    pub results_scroll: u16,
    pub results_rows: u16,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Panel area for mouse hit-testing (updated during render)
    pub results_area: Option<Rect>,

    api: Arc<dyn RecommendationApi>,
    events: UnboundedSender<AppEvent>,
}

impl App {
    pub fn new(
        api: Arc<dyn RecommendationApi>,
        timeout: Option<Duration>,
        events: UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            should_quit: false,
            form: InputForm::new(),
            orchestrator: Orchestrator::new(timeout),
            results_scroll: 0,
            results_rows: 0,
            animation_frame: 0,
            results_area: None,
            api,
            events,
        }
    }

    pub fn state(&self) -> &RequestState {
        self.orchestrator.state()
    }

    /// Enter on whatever has focus.
    pub fn activate(&mut self) {
        if let Some(action) = self.form.activate() {
            self.dispatch(action);
        }
    }

    pub fn surprise(&mut self) {
        let action = self.form.trigger_surprise();
        self.dispatch(action);
    }

    pub fn dispatch(&mut self, action: FormAction) {
        let pending = match action {
            FormAction::Recommend(titles) => self.orchestrator.start_by_titles(titles),
            FormAction::Surprise => self.orchestrator.start_surprise(),
        };
        self.results_scroll = 0;
        self.animation_frame = 0;
        self.spawn_request(pending);
    }

    /// Run the call on a background task; the result comes back as `AppEvent::Completed`.
    fn spawn_request(&self, pending: PendingRequest) {
        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        tokio::spawn(async move {
            let completion = pending.execute(api.as_ref()).await;
            if events.send(AppEvent::Completed(completion)).is_err() {
                tracing::debug!("Event loop closed before response arrived");
            }
        });
    }

    pub fn apply_completion(&mut self, completion: Completion) {
        if self.orchestrator.complete(completion) {
            self.results_scroll = 0;
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.state().is_loading() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn scroll_results_down(&mut self) {
        let max = self.results_rows.saturating_sub(1);
        self.results_scroll = (self.results_scroll + 1).min(max);
    }

    pub fn scroll_results_up(&mut self) {
        self.results_scroll = self.results_scroll.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiResult;
    use crate::movie::{Movie, TitleTriple};
    use tokio::sync::mpsc;

    struct CannedApi;

    #[async_trait::async_trait]
    impl RecommendationApi for CannedApi {
        async fn recommend(&self, titles: &TitleTriple) -> ApiResult<Vec<Movie>> {
            Ok(titles.as_slice().iter().map(|t| Movie::new(format!("Like {}", t))).collect())
        }

        async fn surprise(&self) -> ApiResult<Vec<Movie>> {
            Ok(vec![Movie::new("Paddington 2")])
        }
    }

    fn app() -> (App, mpsc::UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (App::new(Arc::new(CannedApi), None, tx), rx)
    }

    async fn next_completion(rx: &mut mpsc::UnboundedReceiver<AppEvent>) -> Completion {
        match rx.recv().await {
            Some(AppEvent::Completed(completion)) => completion,
            other => panic!("expected completion, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_submit_runs_request_in_background() {
        let (mut app, mut rx) = app();
        app.form.set_field(0, "Alien");
        app.form.set_field(1, "Heat");
        app.form.set_field(2, "Fargo");

        app.activate();
        assert!(app.state().is_loading());

        let completion = next_completion(&mut rx).await;
        app.apply_completion(completion);

        assert!(!app.state().is_loading());
        let titles: Vec<&str> = app.state().recommendations().iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, ["Like Alien", "Like Heat", "Like Fargo"]);
    }

    #[tokio::test]
    async fn test_incomplete_form_starts_nothing() {
        let (mut app, _rx) = app();
        app.form.set_field(0, "Alien");

        app.activate();
        assert_eq!(app.state(), &RequestState::Idle);
        assert!(app.form.validation_message().is_some());
    }

    #[tokio::test]
    async fn test_second_request_wins() {
        let (mut app, mut rx) = app();
        app.form.set_field(0, "Alien");
        app.form.set_field(1, "Heat");
        app.form.set_field(2, "Fargo");

        app.activate();
        app.surprise();

        let mut completions = vec![next_completion(&mut rx).await, next_completion(&mut rx).await];
        // Apply the newest first, then the stale one
        completions.sort_by_key(|c| std::cmp::Reverse(c.seq));
        for completion in completions {
            app.apply_completion(completion);
        }

        assert_eq!(app.state().heading(), Some("Surprise!"));
        assert_eq!(app.state().recommendations()[0].title, "Paddington 2");
    }

    #[tokio::test]
    async fn test_animation_only_ticks_while_loading() {
        let (mut app, _rx) = app();
        app.tick_animation();
        assert_eq!(app.animation_frame, 0);

        app.surprise();
        app.tick_animation();
        app.tick_animation();
        app.tick_animation();
        assert_eq!(app.animation_frame, 0);
        app.tick_animation();
        assert_eq!(app.animation_frame, 1);
    }

    #[tokio::test]
    async fn test_results_scroll_is_clamped() {
        let (mut app, _rx) = app();
        app.results_rows = 2;
        app.scroll_results_down();
        app.scroll_results_down();
        assert_eq!(app.results_scroll, 1);
        app.scroll_results_up();
        app.scroll_results_up();
        assert_eq!(app.results_scroll, 0);
    }
}
