//! Terminal front end hosting the search box over an in-memory location

use crate::config::Config;
use crate::location::{Location, MemoryLocation};
use crate::utils::logging::LogRingBuffer;
use crate::widgets::{SearchInput, SearchInputAction, SearchInputBuilder};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::cell::Cell;
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const LOG_PANEL_LINES: usize = 50;

pub struct SearchApp {
    search: SearchInput,
    location: MemoryLocation,
    page_param: String,
    refetches: Rc<Cell<usize>>,
    log_buffer: Option<LogRingBuffer>,
    show_log_panel: bool,
    status_message: String,
    should_quit: bool,
}

impl SearchApp {
    pub fn new(config: &Config, log_buffer: Option<LogRingBuffer>) -> Self {
        let mut location = MemoryLocation::new(&config.location.initial_address);

        let refetches = Rc::new(Cell::new(0));
        {
            let refetches = refetches.clone();
            location.subscribe(move |address| {
                refetches.set(refetches.get() + 1);
                debug!(target: "app", "refetch for {}", address);
            });
        }

        let search = SearchInputBuilder::new()
            .config(config.search_box_config())
            .title(config.display.title.clone())
            .show_indicator(config.display.show_debounce_indicator)
            .mount(&location);

        Self {
            search,
            location,
            page_param: config.search.page_param.clone(),
            refetches,
            log_buffer,
            show_log_panel: config.display.show_log_panel,
            status_message: "Type to search - Enter applies now, Esc quits".to_string(),
            should_quit: false,
        }
    }

    pub fn location(&self) -> &MemoryLocation {
        &self.location
    }

    pub fn search(&self) -> &SearchInput {
        &self.search
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Number of times the location notified dependents of a new address
    pub fn refetch_count(&self) -> usize {
        self.refetches.get()
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::ALT) {
            match key.code {
                KeyCode::Left => {
                    if self.location.back() {
                        self.status_message = format!("Back to {}", self.location.href());
                    }
                    return;
                }
                KeyCode::Right => {
                    if self.location.forward() {
                        self.status_message = format!("Forward to {}", self.location.href());
                    }
                    return;
                }
                _ => {}
            }
        }

        if key.code == KeyCode::Char('p') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.next_page();
            return;
        }

        let was_pending = self.search.is_pending();
        match self.search.handle_key(key, now) {
            SearchInputAction::Cancel => {
                if was_pending {
                    self.status_message = "Pending update cancelled".to_string();
                } else {
                    self.should_quit = true;
                }
            }
            SearchInputAction::Confirm(_) => {
                if self.search.flush(&mut self.location).is_some() {
                    self.status_message = format!("Applied {}", self.location.href());
                }
            }
            SearchInputAction::PassThrough => self.should_quit = true,
            SearchInputAction::InputChanged(value) => {
                self.status_message = format!("Typing '{}'", value);
            }
            SearchInputAction::Continue => {}
        }
    }

    /// Run any commit whose debounce window has elapsed
    pub fn tick(&mut self, now: Instant) {
        if self.search.check_debounce(&mut self.location, now).is_some() {
            self.status_message = format!("Updated {}", self.location.href());
        }
    }

    /// Follow a pagination link, which pushes a new history entry
    fn next_page(&mut self) {
        let mut state = self.location.query_state();
        let page = state
            .get(&self.page_param)
            .and_then(|page| page.parse::<u32>().ok())
            .unwrap_or(1)
            .saturating_add(1);
        state.set(&self.page_param, &page.to_string());
        let address = format!("{}?{}", self.location.pathname(), state);
        info!(target: "app", "navigate to {}", address);
        self.location.push(&address);
        self.status_message = format!("Page {}", page);
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|f| self.ui(f))?;

            self.tick(Instant::now());

            if event::poll(POLL_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    // Only handle key press, Windows also reports releases
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    self.handle_key(key, Instant::now());
                }
            }
        }
        Ok(())
    }

    fn ui(&self, f: &mut Frame) {
        let mut constraints = vec![
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ];
        if self.show_log_panel {
            constraints.push(Constraint::Min(3));
        } else {
            constraints.push(Constraint::Min(0));
        }
        constraints.push(Constraint::Length(1));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(f.area());

        self.search.render(f, chunks[0]);

        let address = Paragraph::new(self.location.href())
            .style(Style::default().fg(Color::Cyan))
            .block(Block::default().borders(Borders::ALL).title("Address"));
        f.render_widget(address, chunks[1]);

        let stats = Line::from(vec![
            Span::styled("history ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!(
                "{}/{}",
                self.location.history_index() + 1,
                self.location.history_len()
            )),
            Span::styled("  replaces ", Style::default().fg(Color::DarkGray)),
            Span::raw(self.location.replace_count().to_string()),
            Span::styled("  refetches ", Style::default().fg(Color::DarkGray)),
            Span::raw(self.refetch_count().to_string()),
        ]);
        f.render_widget(Paragraph::new(stats), chunks[2]);

        if self.show_log_panel {
            let height = chunks[3].height.saturating_sub(2) as usize;
            let lines: Vec<Line> = self
                .log_buffer
                .as_ref()
                .map(|buffer| buffer.get_recent(height.min(LOG_PANEL_LINES)))
                .unwrap_or_default()
                .into_iter()
                .map(|entry| Line::from(entry.format_for_display()))
                .collect();
            let logs = Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).title("Log"));
            f.render_widget(logs, chunks[3]);
        }

        let help = Paragraph::new(self.status_message.as_str()).style(
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        );
        f.render_widget(help, chunks[4]);
    }
}

/// Set up the terminal, run the app, and restore the terminal
pub fn run_tui_app(app: &mut SearchApp) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}
