use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Row, Table, TableState},
    Frame,
};

use crate::api::models::Event;
use crate::state::DashboardState;
use crate::ui::theme::Palette;

pub struct EventsTableView {
    pub table_state: TableState,
}

impl EventsTableView {
    pub fn new() -> Self {
        Self {
            table_state: TableState::default(),
        }
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &DashboardState,
        palette: &Palette,
    ) {
        self.table_state.select(state.selected_row);

        let header_cells = ["#", "User", "Resource", "Received", "Preview", "Action"];
        let header = Row::new(header_cells)
            .style(
                Style::default()
                    .fg(palette.header)
                    .add_modifier(Modifier::BOLD),
            )
            .bottom_margin(1);

        let rows: Vec<Row> = state
            .filtered
            .iter()
            .map(|&idx| {
                let event = &state.events[idx];
                // Absolute position within the server-side result set.
                let position = state.pagination.offset + idx as u64 + 1;

                Row::new(vec![
                    position.to_string(),
                    event.user_display(),
                    event.resource_display().to_string(),
                    event.received_display(),
                    preview_summary(event),
                    action_label(event, state),
                ])
                .style(Style::default().fg(palette.fg))
                .height(1)
            })
            .collect();

        let widths = [
            Constraint::Length(7),  // #
            Constraint::Length(12), // User
            Constraint::Min(24),    // Resource
            Constraint::Length(20), // Received
            Constraint::Min(30),    // Preview
            Constraint::Length(14), // Action
        ];

        let title = match &state.selected_topic {
            Some(topic) => format!(" Events: {} ", topic),
            None => " Events ".to_string(),
        };

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(Style::default().fg(palette.border)),
            )
            .highlight_style(Style::default().bg(palette.highlight_bg))
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(table, area, &mut self.table_state);
    }
}

/// One-line preview cell: title, price, status badge, winner annotation.
fn preview_summary(event: &Event) -> String {
    let Some(preview) = event.preview() else {
        return "-".to_string();
    };
    let Some(title) = preview.title.as_deref() else {
        return "-".to_string();
    };

    let mut parts = vec![truncate(title, 28), preview.price_display()];
    if let Some(status) = preview.status.as_deref() {
        parts.push(format!("[{}]", status));
    }
    if let Some(winner) = preview.winner_display() {
        parts.push(format!("🏆 {}", winner));
    }
    parts.retain(|p| p != "-");
    parts.join("  ")
}

fn action_label(event: &Event, state: &DashboardState) -> String {
    let Some(resource) = event.resource.as_deref() else {
        return "-".to_string();
    };
    if state.is_preview_loading(resource) {
        "⟳ working...".to_string()
    } else if event.has_preview() {
        "refresh [g]".to_string()
    } else {
        "generate [g]".to_string()
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::Preview;

    #[test]
    fn preview_summary_with_full_data() {
        let event = Event {
            resource: Some("/items/MLA1".to_string()),
            preview: Some(Preview {
                title: Some("Wireless Keyboard".to_string()),
                currency_id: Some("ARS".to_string()),
                price: Some(4999.0),
                status: Some("competing".to_string()),
                winner: Some("MLA9".to_string()),
                winner_price: Some(4500.0),
                ..Default::default()
            }),
            ..Default::default()
        };
        let summary = preview_summary(&event);
        assert!(summary.contains("Wireless Keyboard"));
        assert!(summary.contains("ARS 4999"));
        assert!(summary.contains("[competing]"));
        assert!(summary.contains("MLA9 (ARS 4500)"));
    }

    #[test]
    fn preview_summary_without_title_is_dash() {
        let event = Event {
            preview: Some(Preview::default()),
            ..Default::default()
        };
        assert_eq!(preview_summary(&event), "-");
        assert_eq!(preview_summary(&Event::default()), "-");
    }

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate("short", 28), "short");
        assert_eq!(truncate("abcdefgh", 5), "abcd…");
    }
}
