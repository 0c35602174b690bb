//! Modal overlays: pretty-printed raw payload and the help screen.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::api::models::Event;
use crate::ui::theme::Palette;

/// Centered popup rectangle taking `width_pct` x `height_pct` of the frame.
fn popup_area(frame_area: Rect, width_pct: u16, height_pct: u16) -> Rect {
    let popup_width = (frame_area.width * width_pct) / 100;
    let popup_height = (frame_area.height * height_pct) / 100;
    Rect {
        x: (frame_area.width - popup_width) / 2,
        y: (frame_area.height - popup_height) / 2,
        width: popup_width,
        height: popup_height,
    }
}

/// Scrollable raw-JSON view of the selected event's full payload.
pub fn render_json_overlay(frame: &mut Frame, event: &Event, scroll: u16, palette: &Palette) {
    let area = popup_area(frame.size(), 80, 90);
    frame.render_widget(Clear, area);

    let body = serde_json::to_string_pretty(event)
        .unwrap_or_else(|e| format!("<failed to render payload: {}>", e));

    let title = format!(" Raw payload: {} (↑↓ scroll, Esc close) ", event.resource_display());

    let paragraph = Paragraph::new(body)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent))
                .title(title)
                .title_style(
                    Style::default()
                        .fg(palette.accent)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .style(Style::default().fg(palette.fg))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));

    frame.render_widget(paragraph, area);
}

pub fn render_help(frame: &mut Frame, scroll: u16, palette: &Palette) {
    let area = popup_area(frame.size(), 70, 80);
    frame.render_widget(Clear, area);

    let key = |k: &'static str| Span::styled(format!("  {:<12}", k), Style::default().fg(palette.accent));
    let section = |s: &'static str| {
        Line::from(Span::styled(
            s,
            Style::default()
                .fg(palette.header)
                .add_modifier(Modifier::BOLD),
        ))
    };

    let help_text = vec![
        Line::from(Span::styled(
            "HOOKWATCH HELP",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section("NAVIGATION"),
        Line::from(""),
        Line::from(vec![key("[Tab]"), Span::raw("Next topic")]),
        Line::from(vec![key("[Shift+Tab]"), Span::raw("Previous topic")]),
        Line::from(vec![key("[↑/↓]"), Span::raw("Select row (scroll inside overlays)")]),
        Line::from(vec![key("[n] / [p]"), Span::raw("Next / previous page")]),
        Line::from(vec![key("[l]"), Span::raw("Cycle page size (100/500/1000/5000)")]),
        Line::from(""),
        section("EVENTS"),
        Line::from(""),
        Line::from(vec![key("[/]"), Span::raw("Edit the text filter (Enter/Esc to leave)")]),
        Line::from(vec![key("[Enter]"), Span::raw("Show the raw payload of the selected row")]),
        Line::from(vec![key("[g]"), Span::raw("Generate/refresh the preview of the selected row")]),
        Line::from(vec![key("[o]"), Span::raw("Open the detail page in the browser")]),
        Line::from(vec![key("[r]"), Span::raw("Refetch the current page now")]),
        Line::from(""),
        section("OTHER"),
        Line::from(""),
        Line::from(vec![key("[t]"), Span::raw("Toggle dark/light theme")]),
        Line::from(vec![key("[h] [?]"), Span::raw("Toggle this help screen")]),
        Line::from(vec![key("[q]"), Span::raw("Quit")]),
        Line::from(""),
        Line::from(Span::styled(
            "The table refreshes automatically while the dashboard is open.",
            Style::default().fg(palette.dim),
        )),
        Line::from(Span::styled(
            "Filtering only narrows the fetched page; totals come from the server.",
            Style::default().fg(palette.dim),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press [Esc] or [h] to close",
            Style::default().fg(palette.dim),
        )),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent))
                .title(" HELP ")
                .title_style(
                    Style::default()
                        .fg(palette.accent)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));

    frame.render_widget(paragraph, area);
}
