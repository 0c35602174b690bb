use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::state::DashboardState;
use crate::ui::theme::Palette;

/// Topic strip plus the filter box. Topics render as tabs labelled
/// `topic (count)`.
pub struct TopicsView;

impl TopicsView {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        state: &DashboardState,
        palette: &Palette,
        filter_editing: bool,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(area);

        if state.topics.is_empty() {
            let placeholder = Paragraph::new(Line::from(Span::styled(
                "No topics available",
                Style::default().fg(palette.dim),
            )))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Topics ")
                    .border_style(Style::default().fg(palette.border)),
            );
            frame.render_widget(placeholder, chunks[0]);
        } else {
            let titles: Vec<Line> = state
                .topics
                .iter()
                .map(|t| Line::from(format!("{} ({})", t.topic, t.count)))
                .collect();

            let tabs = Tabs::new(titles)
                .select(state.selected_topic_index().unwrap_or(0))
                .style(Style::default().fg(palette.fg))
                .highlight_style(
                    Style::default()
                        .fg(palette.accent)
                        .add_modifier(Modifier::BOLD),
                )
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(" Topics ")
                        .border_style(Style::default().fg(palette.border)),
                );
            frame.render_widget(tabs, chunks[0]);
        }

        // Filter box. A trailing block cursor marks editing mode.
        let filter_text = if filter_editing {
            format!("{}█", state.filter_text)
        } else if state.filter_text.is_empty() {
            "press / to filter".to_string()
        } else {
            state.filter_text.clone()
        };

        let filter_style = if filter_editing {
            Style::default().fg(palette.accent)
        } else if state.filter_text.is_empty() {
            Style::default().fg(palette.dim)
        } else {
            Style::default().fg(palette.fg)
        };

        let filter = Paragraph::new(Line::from(Span::styled(filter_text, filter_style))).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Filter ")
                .border_style(if filter_editing {
                    Style::default().fg(palette.accent)
                } else {
                    Style::default().fg(palette.border)
                }),
        );
        frame.render_widget(filter, chunks[1]);
    }
}
