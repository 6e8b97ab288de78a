use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap,
    },
};
use crate::app::App;
use crate::form::{FormFocus, InputField, FIELD_COUNT, FIELD_LABELS, FIELD_PLACEHOLDERS};
use crate::view::{
    page_view, MovieCard, PosterView, ResultsView, EMPTY_PROMPT, ERROR_PREFIX, LOADING_TEXT,
    NO_POSTER,
};

const FIELD_HEIGHT: u16 = 3;
// Borders + 3 fields + buttons + validation line
const FORM_HEIGHT: u16 = 2 + FIELD_HEIGHT * FIELD_COUNT as u16 + 2;
const ERROR_HEIGHT: u16 = 3;
// Borders + poster box + title + year + 3 overview lines
const CARD_HEIGHT: u16 = 2 + 3 + 1 + 1 + 3;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let has_error = app.state().error().is_some();
    let [header_area, form_area, error_area, results_area, footer_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(FORM_HEIGHT),
        Constraint::Length(if has_error { ERROR_HEIGHT } else { 0 }),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header_area);
    render_form(app, frame, form_area);
    render_results(app, frame, error_area, results_area);
    render_footer(frame, footer_area);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            "Movie Recommender AI",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(Span::styled(
            "Find your next binge-watch!",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn render_form(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Tell us 3 movies/series you like: ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [f1, f2, f3, buttons_area, validation_area] = Layout::vertical([
        Constraint::Length(FIELD_HEIGHT),
        Constraint::Length(FIELD_HEIGHT),
        Constraint::Length(FIELD_HEIGHT),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    for (index, field_area) in [f1, f2, f3].into_iter().enumerate() {
        let focused = app.form.focus == FormFocus::Field(index);
        render_field(frame, field_area, index, &app.form.fields()[index], focused);
    }

    let button = |label: &'static str, focused: bool, color: Color| {
        let style = if focused {
            Style::default().bg(color).fg(Color::Black).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color)
        };
        Span::styled(format!("[ {} ]", label), style)
    };
    let buttons = Line::from(vec![
        button(
            "Get Recommendations",
            app.form.focus == FormFocus::RecommendButton,
            Color::Cyan,
        ),
        Span::raw("  "),
        button(
            "Surprise Me!",
            app.form.focus == FormFocus::SurpriseButton,
            Color::Green,
        ),
    ]);
    frame.render_widget(Paragraph::new(buttons), buttons_area);

    if let Some(message) = app.form.validation_message() {
        frame.render_widget(
            Paragraph::new(Span::styled(message, Style::default().fg(Color::Red))),
            validation_area,
        );
    }
}

fn render_field(frame: &mut Frame, area: Rect, index: usize, field: &InputField, focused: bool) {
    let border_color = if field.invalid {
        Color::Red
    } else if focused {
        Color::Yellow
    } else {
        Color::DarkGray
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {} ", FIELD_LABELS[index]));

    // Horizontal scrolling keeps the cursor visible
    let inner_width = area.width.saturating_sub(2) as usize;
    let scroll_offset = field.cursor.saturating_sub(inner_width.saturating_sub(1));

    let text = if field.value.is_empty() {
        Span::styled(FIELD_PLACEHOLDERS[index], Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(
            field
                .value
                .chars()
                .skip(scroll_offset)
                .take(inner_width)
                .collect::<String>(),
        )
    };
    frame.render_widget(Paragraph::new(text).block(block), area);

    if focused && inner_width > 0 {
        let x = area.x + 1 + (field.cursor - scroll_offset) as u16;
        frame.set_cursor_position((x, area.y + 1));
    }
}

fn render_results(app: &mut App, frame: &mut Frame, error_area: Rect, area: Rect) {
    app.results_area = Some(area);
    let view = page_view(app.orchestrator.state());

    if let Some(message) = view.error {
        let banner = Paragraph::new(Line::from(vec![
            Span::styled(ERROR_PREFIX, Style::default().fg(Color::Red).bold()),
            Span::styled(message, Style::default().fg(Color::Red)),
        ]))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
        frame.render_widget(banner, error_area);
    }

    match view.results {
        ResultsView::Loading => {
            app.results_rows = 0;
            // Animated ellipsis: cycles through ".", "..", "..."
            let dots = ".".repeat((app.animation_frame as usize) + 1);
            let loading = Paragraph::new(Span::styled(
                format!("{}{}", LOADING_TEXT, dots),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ))
            .alignment(Alignment::Center);
            frame.render_widget(loading, padded(area));
        }
        ResultsView::Prompt => {
            app.results_rows = 0;
            let prompt = Paragraph::new(Span::styled(EMPTY_PROMPT, Style::default().fg(Color::DarkGray)))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(prompt, padded(area));
        }
        ResultsView::Cards { heading, cards } => {
            let [heading_area, grid_area] =
                Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(area);

            frame.render_widget(
                Paragraph::new(Span::styled(heading, Style::default().bold()))
                    .alignment(Alignment::Center),
                heading_area,
            );
            app.results_rows = render_grid(frame, grid_area, &cards, &mut app.results_scroll);
        }
    }
}

/// Leaves a blank line above centered messages
fn padded(area: Rect) -> Rect {
    let [_, body] = Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);
    body
}

fn column_count(width: u16) -> usize {
    match width {
        w if w >= 90 => 3,
        w if w >= 60 => 2,
        _ => 1,
    }
}

/// Draws the visible rows of cards starting at `scroll`; returns the total row count.
fn render_grid(frame: &mut Frame, area: Rect, cards: &[MovieCard<'_>], scroll: &mut u16) -> u16 {
    let columns = column_count(area.width);
    let rows = cards.len().div_ceil(columns) as u16;
    *scroll = (*scroll).min(rows.saturating_sub(1));

    let visible_rows = (area.height / CARD_HEIGHT).max(1);

    for (slot, row) in (*scroll..rows).take(visible_rows as usize).enumerate() {
        let y = area.y + slot as u16 * CARD_HEIGHT;
        let height = CARD_HEIGHT.min(area.bottom().saturating_sub(y));
        if height == 0 {
            break;
        }
        let row_area = Rect::new(area.x, y, area.width, height);
        let cells = Layout::horizontal(vec![Constraint::Ratio(1, columns as u32); columns])
            .split(row_area);

        let start = row as usize * columns;
        for (cell, card) in cells.iter().zip(cards.iter().skip(start).take(columns)) {
            render_card(frame, *cell, card);
        }
    }

    if rows > visible_rows {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
        let mut state = ScrollbarState::new(rows as usize).position(*scroll as usize);
        frame.render_stateful_widget(scrollbar, area, &mut state);
    }

    rows
}

fn render_card(frame: &mut Frame, area: Rect, card: &MovieCard<'_>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [poster_area, title_area, year_area, overview_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(inner);

    let poster_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let poster = match card.poster {
        PosterView::Image { url, alt } => Paragraph::new(Line::from(vec![
            Span::styled("▣ ", Style::default().fg(Color::Magenta)),
            Span::styled(url, Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED)),
        ]))
        .block(poster_block.title(format!(" {} ", alt))),
        PosterView::Placeholder => Paragraph::new(Span::styled(
            NO_POSTER,
            Style::default().fg(Color::DarkGray),
        ))
        .alignment(Alignment::Center)
        .block(poster_block),
    };
    frame.render_widget(poster, poster_area);

    frame.render_widget(
        Paragraph::new(Span::styled(card.title, Style::default().bold())),
        title_area,
    );

    if let Some(year) = &card.year {
        frame.render_widget(
            Paragraph::new(Span::styled(year.as_str(), Style::default().fg(Color::DarkGray))),
            year_area,
        );
    }

    frame.render_widget(
        Paragraph::new(card.overview)
            .style(Style::default().fg(Color::Gray))
            .wrap(Wrap { trim: true }),
        overview_area,
    );
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let hints = Line::from(vec![
        Span::styled(" Tab", Style::default().fg(Color::Yellow)),
        Span::raw(" next  "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" submit  "),
        Span::styled("Ctrl+S", Style::default().fg(Color::Yellow)),
        Span::raw(" surprise  "),
        Span::styled("PgUp/PgDn", Style::default().fg(Color::Yellow)),
        Span::raw(" scroll  "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(" quit "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(hints), area);
}
