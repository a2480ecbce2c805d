//! Terminal search box bound to the location's query parameters
//!
//! Wraps a `tui_input::Input` for editing and a [`SearchBox`] for the
//! debounced address updates. The text buffer is seeded from the location
//! when mounted and is owned by the widget from then on.

use crate::location::Location;
use crate::query_state::QueryState;
use crate::search_box::{SearchBox, SearchBoxConfig};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::time::Instant;
use tui_input::{backend::crossterm::EventHandler, Input};

/// Result of handling a key in the search input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchInputAction {
    /// Key consumed, text unchanged
    Continue,
    /// Text changed, a commit has been (re)scheduled
    InputChanged(String),
    /// User pressed Enter
    Confirm(String),
    /// User pressed Esc, any pending commit was dropped
    Cancel,
    /// Pass the key through to parent handler
    PassThrough,
}

#[derive(Debug, Clone)]
pub struct SearchInputDisplay {
    pub title: String,
    pub style: Style,
    pub show_debounce_indicator: bool,
}

impl Default for SearchInputDisplay {
    fn default() -> Self {
        Self {
            title: "Search".to_string(),
            style: Style::default().fg(Color::Yellow),
            show_debounce_indicator: true,
        }
    }
}

pub struct SearchInput {
    input: Input,
    search_box: SearchBox,
    display: SearchInputDisplay,
}

impl SearchInput {
    /// Seed the text from the location's current query parameter
    pub fn mount<L: Location + ?Sized>(&mut self, location: &L) {
        self.search_box = SearchBox::mount(location, self.search_box.config().clone());
        self.input = Input::default().with_value(self.search_box.value().to_string());
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    pub fn cursor(&self) -> usize {
        self.input.cursor()
    }

    pub fn is_pending(&self) -> bool {
        self.search_box.is_pending()
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> SearchInputAction {
        match key.code {
            KeyCode::Esc => {
                self.search_box.cancel();
                SearchInputAction::Cancel
            }
            KeyCode::Enter => SearchInputAction::Confirm(self.input.value().to_string()),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                SearchInputAction::PassThrough
            }
            _ => {
                let before = self.input.value().to_string();
                self.input.handle_event(&Event::Key(key));
                let current = self.input.value();

                // Cursor movement and the like do not count as input
                if current != before {
                    self.search_box.on_input_change_at(current, now);
                    SearchInputAction::InputChanged(current.to_string())
                } else {
                    SearchInputAction::Continue
                }
            }
        }
    }

    /// Commit to the location if the debounce window has elapsed.
    /// Call this on every pass of the event loop.
    pub fn check_debounce<L: Location + ?Sized>(
        &mut self,
        location: &mut L,
        now: Instant,
    ) -> Option<QueryState> {
        self.search_box.poll_at(location, now)
    }

    /// Commit any pending text immediately
    pub fn flush<L: Location + ?Sized>(&mut self, location: &mut L) -> Option<QueryState> {
        self.search_box.flush(location)
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let title = if self.display.show_debounce_indicator && self.search_box.is_pending() {
            format!("{} (typing...)", self.display.title)
        } else {
            self.display.title.clone()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(self.display.style);

        // Keep the cursor inside the borders when the text is wider than the box
        let inner_width = area.width.saturating_sub(3) as usize;
        let scroll = self.input.visual_scroll(inner_width);

        let paragraph = if self.input.value().is_empty() {
            Paragraph::new(self.search_box.placeholder().to_string()).style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            Paragraph::new(self.input.value().to_string())
                .style(self.display.style)
                .scroll((0, scroll as u16))
        };

        f.render_widget(paragraph.block(block), area);
        let cursor = self.input.visual_cursor().saturating_sub(scroll) as u16;
        f.set_cursor_position((area.x + cursor + 1, area.y + 1));
    }
}

/// Builder for SearchInput
#[derive(Default)]
pub struct SearchInputBuilder {
    config: SearchBoxConfig,
    display: SearchInputDisplay,
}

impl SearchInputBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: SearchBoxConfig) -> Self {
        self.config = config;
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.config.placeholder = placeholder.into();
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.display.title = title.into();
        self
    }

    pub fn show_indicator(mut self, show: bool) -> Self {
        self.display.show_debounce_indicator = show;
        self
    }

    pub fn build(self) -> SearchInput {
        SearchInput {
            input: Input::default(),
            search_box: SearchBox::new(self.config),
            display: self.display,
        }
    }

    /// Build and seed from the location in one step
    pub fn mount<L: Location + ?Sized>(self, location: &L) -> SearchInput {
        let mut input = self.build();
        input.mount(location);
        input
    }
}
