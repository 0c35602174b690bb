use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::api::client::WebhookApi;
use crate::api::ApiClient;
use crate::events::AppEvent;
use crate::poller::EventPoller;
use crate::prefs::{Prefs, PrefsStore};
use crate::state::{DashboardState, PageApplied};
use crate::tracker::PreviewTracker;
use crate::ui::{detail, EventsTableView, Palette, TopicsView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    Disconnected,
    Connecting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Overlay {
    None,
    Help,
    Json,
}

pub struct App {
    api: Arc<ApiClient>,
    state: DashboardState,
    prefs: Prefs,
    prefs_store: Box<dyn PrefsStore>,
    poller: EventPoller,
    tracker: PreviewTracker,
    tx: mpsc::UnboundedSender<AppEvent>,
    rx: mpsc::UnboundedReceiver<AppEvent>,
    events_table: EventsTableView,
    connection_state: ConnectionState,
    last_update: Option<Instant>,
    refresh_interval_secs: u64,
    error_message: Option<String>,
    should_quit: bool,
    overlay: Overlay,
    overlay_scroll: u16,
    filter_editing: bool,
}

impl App {
    pub fn new(
        api_url: String,
        refresh_interval_secs: u64,
        prefs_store: Box<dyn PrefsStore>,
    ) -> Result<Self> {
        let api = Arc::new(ApiClient::new(api_url, 10)?);
        let prefs = prefs_store.load();
        let state = DashboardState::new(prefs.selected_topic.clone());
        let (tx, rx) = mpsc::unbounded_channel::<AppEvent>();
        let poller = EventPoller::new(
            api.clone() as Arc<dyn WebhookApi>,
            Duration::from_secs(refresh_interval_secs),
        );
        let tracker = PreviewTracker::new(api.clone() as Arc<dyn WebhookApi>);

        Ok(Self {
            api,
            state,
            prefs,
            prefs_store,
            poller,
            tracker,
            tx,
            rx,
            events_table: EventsTableView::new(),
            connection_state: ConnectionState::Connecting,
            last_update: None,
            refresh_interval_secs,
            error_message: None,
            should_quit: false,
            overlay: Overlay::None,
            overlay_scroll: 0,
            filter_editing: false,
        })
    }

    pub async fn run(
        &mut self,
        terminal: &mut ratatui::Terminal<impl ratatui::backend::Backend>,
    ) -> Result<()> {
        // One-shot topics fetch; the event poll starts once a topic resolves.
        self.spawn_topics_fetch();

        loop {
            terminal.draw(|frame| self.render(frame))?;

            // Apply all pending fetch results (non-blocking).
            while let Ok(app_event) = self.rx.try_recv() {
                self.handle_app_event(app_event);
            }

            // Handle keyboard events with short timeout.
            let timeout = Duration::from_millis(50);
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn spawn_topics_fetch(&self) {
        let api = Arc::clone(&self.api) as Arc<dyn WebhookApi>;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.topics().await.map_err(|e| format!("{e:#}"));
            tx.send(AppEvent::TopicsLoaded(result)).ok();
        });
    }

    fn handle_app_event(&mut self, app_event: AppEvent) {
        match app_event {
            AppEvent::TopicsLoaded(Ok(topics)) => {
                tracing::info!(count = topics.len(), "Topics loaded");
                self.state.set_topics(topics);
                self.persist_selected_topic();
                if self.state.selected_topic.is_some() {
                    self.restart_poll();
                } else {
                    // No topics: the table stays a placeholder, nothing polls.
                    self.connection_state = ConnectionState::Connected;
                }
            }
            AppEvent::TopicsLoaded(Err(e)) => {
                tracing::error!(error = %e, "Failed to load topics");
                self.connection_state = ConnectionState::Disconnected;
                self.error_message = Some(format!("Failed to load topics: {}", e));
            }
            AppEvent::PageLoaded {
                limit,
                offset,
                result,
                ..
            } => match result {
                Ok(page) => {
                    let pagination = page.pagination_or(limit, offset);
                    if self.state.apply_page(page.events, pagination) == PageApplied::OffsetSnapped {
                        tracing::debug!(offset = self.state.offset, "Offset snapped after total shrank");
                        self.restart_poll();
                    }
                    self.connection_state = ConnectionState::Connected;
                    self.last_update = Some(Instant::now());
                    self.error_message = None;
                }
                Err(e) => {
                    self.connection_state = ConnectionState::Disconnected;
                    self.error_message = Some(format!("Failed to fetch events: {}", e));
                }
            },
            AppEvent::PreviewDone { resource, error } => {
                self.state.finish_preview(&resource);
                self.tracker.complete(&resource);
                if let Some(e) = error {
                    self.error_message = Some(e);
                }
            }
        }
    }

    /// (Re)start the periodic poll for the current (topic, limit, offset).
    /// The first fetch of a fresh poll is immediate.
    fn restart_poll(&mut self) {
        match self.state.selected_topic.clone() {
            Some(topic) => {
                self.poller
                    .restart(&topic, self.state.limit, self.state.offset, self.tx.clone());
            }
            None => self.poller.stop(),
        }
    }

    fn persist_selected_topic(&mut self) {
        if self.prefs.selected_topic != self.state.selected_topic {
            self.prefs.selected_topic = self.state.selected_topic.clone();
            self.prefs_store.save(&self.prefs);
        }
    }

    fn toggle_theme(&mut self) {
        self.prefs.theme = self.prefs.theme.toggled();
        self.prefs_store.save(&self.prefs);
    }

    fn handle_key(&mut self, key: KeyCode) {
        if self.filter_editing {
            self.handle_filter_key(key);
            return;
        }
        if self.overlay != Overlay::None {
            self.handle_overlay_key(key);
            return;
        }

        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => {
                self.overlay = Overlay::Help;
                self.overlay_scroll = 0;
            }
            KeyCode::Char('/') => {
                self.filter_editing = true;
            }
            KeyCode::Tab => {
                if self.state.cycle_topic(1) {
                    self.persist_selected_topic();
                    self.restart_poll();
                }
            }
            KeyCode::BackTab => {
                if self.state.cycle_topic(-1) {
                    self.persist_selected_topic();
                    self.restart_poll();
                }
            }
            KeyCode::Up => self.state.select_prev(),
            KeyCode::Down => self.state.select_next(),
            KeyCode::Char('n') | KeyCode::Char('N') => {
                if self.state.next_page() {
                    self.restart_poll();
                }
            }
            KeyCode::Char('p') | KeyCode::Char('P') => {
                if self.state.prev_page() {
                    self.restart_poll();
                }
            }
            KeyCode::Char('l') | KeyCode::Char('L') => {
                self.state.cycle_limit();
                self.restart_poll();
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.restart_poll();
            }
            KeyCode::Char('t') | KeyCode::Char('T') => {
                self.toggle_theme();
            }
            KeyCode::Char('g') | KeyCode::Char('G') => {
                self.trigger_preview();
            }
            KeyCode::Char('o') | KeyCode::Char('O') => {
                self.open_detail();
            }
            KeyCode::Enter => {
                if self.state.selected_event().is_some() {
                    self.overlay = Overlay::Json;
                    self.overlay_scroll = 0;
                }
            }
            _ => {}
        }
    }

    fn handle_filter_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::Enter => {
                self.filter_editing = false;
            }
            KeyCode::Backspace => {
                let mut text = self.state.filter_text.clone();
                text.pop();
                self.state.set_filter(text);
            }
            KeyCode::Char(c) => {
                let mut text = self.state.filter_text.clone();
                text.push(c);
                self.state.set_filter(text);
            }
            _ => {}
        }
    }

    fn handle_overlay_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up => self.overlay_scroll = self.overlay_scroll.saturating_sub(1),
            KeyCode::Down => self.overlay_scroll = self.overlay_scroll.saturating_add(1),
            KeyCode::Esc
            | KeyCode::Enter
            | KeyCode::Char('q')
            | KeyCode::Char('h')
            | KeyCode::Char('?') => {
                self.overlay = Overlay::None;
                self.overlay_scroll = 0;
            }
            _ => {}
        }
    }

    /// Kick off preview generation for the selected row's resource. The
    /// loading flag is set here and released only by the completion event
    /// the tracker guarantees to send.
    fn trigger_preview(&mut self) {
        let Some(topic) = self.state.selected_topic.clone() else {
            return;
        };
        let Some(resource) = self
            .state
            .selected_event()
            .and_then(|e| e.resource.clone())
        else {
            return;
        };

        if !self.state.begin_preview(&resource) {
            return;
        }
        let started = self.tracker.trigger(
            &resource,
            &topic,
            self.state.limit,
            self.state.offset,
            self.tx.clone(),
        );
        if !started {
            self.state.finish_preview(&resource);
        }
    }

    fn open_detail(&self) {
        let Some(resource) = self
            .state
            .selected_event()
            .and_then(|e| e.resource.as_deref())
        else {
            return;
        };
        match self.api.render_url(resource) {
            Ok(url) => open_in_browser(&url),
            Err(e) => tracing::warn!(error = %e, "Could not build render URL"),
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let palette = Palette::for_theme(self.prefs.theme);

        // Paint the whole frame so the light theme gets its background.
        frame.render_widget(
            Block::default().style(Style::default().fg(palette.fg).bg(palette.bg)),
            frame.size(),
        );

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Status bar
                Constraint::Length(3), // Topic strip + filter
                Constraint::Min(0),    // Events table
                Constraint::Length(3), // Footer
            ])
            .split(frame.size());

        self.render_status_bar(frame, chunks[0], &palette);
        TopicsView::render(frame, chunks[1], &self.state, &palette, self.filter_editing);
        self.events_table.render(frame, chunks[2], &self.state, &palette);
        self.render_footer(frame, chunks[3], &palette);

        match self.overlay {
            Overlay::Help => detail::render_help(frame, self.overlay_scroll, &palette),
            Overlay::Json => {
                if let Some(selected) = self.state.selected_event() {
                    detail::render_json_overlay(frame, selected, self.overlay_scroll, &palette);
                }
            }
            Overlay::None => {}
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let connection_indicator = match self.connection_state {
            ConnectionState::Connected => {
                Span::styled("● Live", Style::default().fg(palette.good))
            }
            ConnectionState::Disconnected => {
                Span::styled("● Offline", Style::default().fg(palette.bad))
            }
            ConnectionState::Connecting => {
                Span::styled("● Connecting...", Style::default().fg(palette.warn))
            }
        };

        let (first, last, total) = self.state.page_summary();
        let showing = if total == 0 {
            "Showing --".to_string()
        } else {
            format!("Showing {} - {} of {}", first, last, total)
        };

        let page_size = format!("Page size: {}", self.state.limit);

        let update_time = match self.last_update {
            Some(last_update) => format!("Update: {}s", last_update.elapsed().as_secs()),
            None => "Update: --".to_string(),
        };

        let next_refresh = match self.last_update {
            Some(last_update) => {
                let elapsed = last_update.elapsed().as_secs();
                let remaining = self.refresh_interval_secs.saturating_sub(elapsed);
                format!("Next: {}s", remaining)
            }
            None => "Next: --".to_string(),
        };

        let line = Line::from(vec![
            connection_indicator,
            Span::raw("  │  "),
            Span::styled(
                showing,
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  │  "),
            Span::raw(page_size),
            Span::raw("  │  "),
            Span::raw(update_time),
            Span::raw("  │  "),
            Span::raw(next_refresh),
        ]);

        let paragraph = Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" HOOKWATCH ")
                .border_style(Style::default().fg(palette.border)),
        );

        frame.render_widget(paragraph, area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let footer_text = if let Some(ref error) = self.error_message {
            Line::from(vec![
                Span::styled(
                    "ERROR: ",
                    Style::default()
                        .fg(palette.bad)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(error.as_str(), Style::default().fg(palette.bad)),
            ])
        } else if self.filter_editing {
            Line::from(vec![
                Span::styled("Filtering — ", Style::default().fg(palette.accent)),
                Span::raw("type to narrow, "),
                Span::styled("[Enter/Esc] ", Style::default().fg(palette.warn)),
                Span::raw("done"),
            ])
        } else {
            Line::from(vec![
                Span::styled("[Tab] ", Style::default().fg(palette.warn)),
                Span::raw("Topic  "),
                Span::styled("[/] ", Style::default().fg(palette.warn)),
                Span::raw("Filter  "),
                Span::styled("[n/p] ", Style::default().fg(palette.warn)),
                Span::raw("Page  "),
                Span::styled("[g] ", Style::default().fg(palette.warn)),
                Span::raw("Preview  "),
                Span::styled("[o] ", Style::default().fg(palette.warn)),
                Span::raw("Detail  "),
                Span::styled("[h/?] ", Style::default().fg(palette.warn)),
                Span::raw("Help  "),
                Span::styled("[q] ", Style::default().fg(palette.warn)),
                Span::raw("Quit"),
            ])
        };

        let paragraph = Paragraph::new(footer_text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border)),
        );

        frame.render_widget(paragraph, area);
    }
}

/// Open `url` in the system browser, detached. Launch failures are logged
/// and never propagated so the UI never blocks on them.
fn open_in_browser(url: &str) {
    #[cfg(target_os = "windows")]
    let result = std::process::Command::new("cmd")
        .args(["/C", "start", "", url])
        .spawn();
    #[cfg(target_os = "macos")]
    let result = std::process::Command::new("open").arg(url).spawn();
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let result = std::process::Command::new("xdg-open").arg(url).spawn();

    if let Err(e) = result {
        tracing::warn!(url, error = %e, "Failed to open browser");
    }
}
