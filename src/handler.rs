use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use crate::app::App;
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick_animation(),
        AppEvent::Completed(completion) => app.apply_completion(completion),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        // Global keys that work on any focus
        KeyCode::Char('c') if ctrl => app.should_quit = true,
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('s') if ctrl => app.surprise(),

        // Focus
        KeyCode::Tab | KeyCode::Down => app.form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.form.focus_prev(),

        KeyCode::Enter => app.activate(),

        // Results scrolling
        KeyCode::PageDown => app.scroll_results_down(),
        KeyCode::PageUp => app.scroll_results_up(),

        // Editing the focused field
        KeyCode::Backspace => app.form.backspace(),
        KeyCode::Delete => app.form.delete(),
        KeyCode::Left => app.form.cursor_left(),
        KeyCode::Right => app.form.cursor_right(),
        KeyCode::Home => app.form.cursor_home(),
        KeyCode::End => app.form.cursor_end(),
        KeyCode::Char(c) if !ctrl => app.form.insert_char(c),

        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let in_results = app
        .results_area
        .map(|r| point_in_rect(mouse.column, mouse.row, r))
        .unwrap_or(false);
    if !in_results {
        return;
    }

    match mouse.kind {
        MouseEventKind::ScrollDown => app.scroll_results_down(),
        MouseEventKind::ScrollUp => app.scroll_results_up(),
        _ => {}
    }
}
