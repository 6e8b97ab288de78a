//! Terminal session and the single event channel the main loop reads from.
//!
//! Three producers feed the channel: terminal input, the animation ticker and
//! finished API calls (through `EventHandler::sender`).

use std::io::{self, Stderr};
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEvent, KeyEventKind,
    MouseEvent,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use futures_util::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::orchestrator::Completion;

pub type Tui = Terminal<CrosstermBackend<Stderr>>;

/// Drives the "Fetching recommendations..." ellipsis.
pub const TICK_RATE: Duration = Duration::from_millis(300);

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    Tick,
    /// A background API call finished
    Completed(Completion),
}

/// Map a raw terminal event to what the app cares about. Key releases and
/// repeats are dropped so each press edits a field once.
pub fn translate(event: Event) -> Option<AppEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
        Event::Mouse(mouse) => Some(AppEvent::Mouse(mouse)),
        Event::Resize(width, height) => Some(AppEvent::Resize(width, height)),
        _ => None,
    }
}

/// Forward terminal input until the stream ends or the loop hangs up.
fn spawn_input_reader(events: UnboundedSender<AppEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut stream = EventStream::new();
        while let Some(next) = stream.next().await {
            let event = match next {
                Ok(raw) => translate(raw),
                Err(e) => {
                    tracing::warn!(error = %e, "Terminal input error");
                    None
                }
            };
            let Some(event) = event else { continue };
            if events.send(event).is_err() {
                break;
            }
        }
        tracing::debug!("Terminal input reader stopped");
    })
}

/// Emit `AppEvent::Tick` every `period` until the receiver is gone.
pub fn spawn_ticker(events: UnboundedSender<AppEvent>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            if events.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    })
}

pub struct EventHandler {
    rx: UnboundedReceiver<AppEvent>,
    tx: UnboundedSender<AppEvent>,
}

impl EventHandler {
    /// Channel with no producers attached yet.
    pub fn detached() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { rx, tx }
    }

    /// Channel fed by terminal input and a ticker running at `tick_rate`.
    pub fn start(tick_rate: Duration) -> Self {
        let handler = Self::detached();
        spawn_input_reader(handler.sender());
        spawn_ticker(handler.sender(), tick_rate);
        handler
    }

    /// For background tasks that report back into the loop.
    pub fn sender(&self) -> UnboundedSender<AppEvent> {
        self.tx.clone()
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }
}

/// Raw mode, alternate screen and mouse capture (wheel scrolls the results).
pub fn enter() -> Result<Tui> {
    enable_raw_mode()?;
    execute!(io::stderr(), EnterAlternateScreen, EnableMouseCapture)?;
    Ok(Terminal::new(CrosstermBackend::new(io::stderr()))?)
}

pub fn leave() -> Result<()> {
    execute!(io::stderr(), DisableMouseCapture, LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
}

/// Put the terminal back before the default hook prints the panic.
pub fn leave_on_panic() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if let Err(e) = leave() {
            eprintln!("failed to restore terminal: {}", e);
        }
        previous(info);
    }));
}
