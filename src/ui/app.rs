//! Application State and Logic
//!
//! This module defines the core application state and event loop for the
//! vinetop explorer. It manages:
//!
//! - The fetched dataset snapshot and the immutable view state
//! - User input handling (search, sorting, filtering, column visibility)
//! - Table selection and navigation
//!
//! The `App` struct is the central state container, and `run_app` is the
//! main event loop that processes user input and redraws the UI. All list
//! derivation is delegated to `view_model`; the loop only mutates state and
//! lets every frame recompute from it.

use crate::data::Dataset;
use crate::view_model::{self, SortField, ViewState};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{backend::CrosstermBackend, widgets::TableState, Terminal};
use std::io::Stdout;

pub type AppResult<T> = Result<T>;

/// Which surface currently owns keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Columns,
}

pub struct App {
    pub dataset: Dataset,
    pub state: ViewState,
    pub mode: InputMode,
    pub running: bool,

    /// Name of the token the highlight panels anchor on.
    pub reference: String,

    /// Raw search input as typed; the lowercased form lives in `state.query`.
    pub search_input: String,

    // Main table selection
    pub table_state: TableState,

    // Column-visibility menu
    pub column_cursor: usize,

    /// Set when the startup fetch failed and the table is empty for that
    /// reason rather than an empty resource.
    pub load_failed: bool,

    /// Local wall-clock time of the fetch, shown in the status bar.
    pub fetched_at: chrono::DateTime<chrono::Local>,
}

impl App {
    pub fn new(dataset: Dataset, reference: String, load_failed: bool) -> Self {
        let mut table_state = TableState::default();
        table_state.select(Some(0));

        Self {
            dataset,
            state: ViewState::default(),
            mode: InputMode::Normal,
            running: true,
            reference,
            search_input: String::new(),
            table_state,
            column_cursor: 0,
            load_failed,
            fetched_at: chrono::Local::now(),
        }
    }

    /// Number of rows the main table currently shows (after filter, sort,
    /// and search).
    pub fn visible_len(&self) -> usize {
        let rows = view_model::displayed(&self.dataset.tokens, &self.state);
        view_model::searched(&rows, &self.state.query).len()
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_len();
        let selected = self.table_state.selected().unwrap_or(0);
        if len == 0 {
            self.table_state.select(Some(0));
        } else if selected >= len {
            self.table_state.select(Some(len - 1));
        }
    }

    pub fn select_next(&mut self) {
        let len = self.visible_len();
        let i = self.table_state.selected().unwrap_or(0);
        if i + 1 < len {
            self.table_state.select(Some(i + 1));
        }
    }

    pub fn select_prev(&mut self) {
        let i = self.table_state.selected().unwrap_or(0);
        if i > 0 {
            self.table_state.select(Some(i - 1));
        }
    }

    pub fn select_first(&mut self) {
        self.table_state.select(Some(0));
    }

    pub fn select_last(&mut self) {
        let len = self.visible_len();
        if len > 0 {
            self.table_state.select(Some(len - 1));
        }
    }

    /// The scroll-to-row affordance: move the selection onto the reference
    /// token if it is currently visible.
    pub fn jump_to_reference(&mut self) {
        let rows = view_model::displayed(&self.dataset.tokens, &self.state);
        let rows = view_model::searched(&rows, &self.state.query);
        if let Some(idx) = rows.iter().position(|t| t.name == self.reference) {
            self.table_state.select(Some(idx));
        }
    }

    pub fn toggle_show_all(&mut self) {
        self.state.toggle_show_all();
        self.clamp_selection();
    }

    /// Sort on the n-th column (0-based; bound to the digit keys 1-7).
    pub fn sort_on_column(&mut self, index: usize) {
        if let Some(field) = SortField::ALL.get(index).copied() {
            self.state.sort_on(field);
            self.clamp_selection();
        }
    }

    // Search mode

    fn search_push(&mut self, c: char) {
        self.search_input.push(c);
        self.state.set_query(&self.search_input);
        self.clamp_selection();
    }

    fn search_pop(&mut self) {
        self.search_input.pop();
        self.state.set_query(&self.search_input);
        self.clamp_selection();
    }

    fn search_clear(&mut self) {
        self.search_input.clear();
        self.state.set_query("");
        self.clamp_selection();
    }

    // Column menu

    fn column_next(&mut self) {
        if self.column_cursor + 1 < SortField::ALL.len() {
            self.column_cursor += 1;
        }
    }

    fn column_prev(&mut self) {
        self.column_cursor = self.column_cursor.saturating_sub(1);
    }

    fn column_toggle(&mut self) {
        let field = SortField::ALL[self.column_cursor];
        self.state.toggle_column(field);
    }

    fn handle_normal_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('/') => {
                self.mode = InputMode::Search;
            }
            KeyCode::Char('a') => {
                self.toggle_show_all();
            }
            KeyCode::Char('c') => {
                self.mode = InputMode::Columns;
            }
            KeyCode::Char('v') => {
                self.jump_to_reference();
            }
            KeyCode::Char(c @ '1'..='7') => {
                let index = c as usize - '1' as usize;
                self.sort_on_column(index);
            }
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            KeyCode::Home => self.select_first(),
            KeyCode::End => self.select_last(),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.search_clear();
                self.mode = InputMode::Normal;
            }
            KeyCode::Enter => {
                self.mode = InputMode::Normal;
            }
            KeyCode::Backspace => self.search_pop(),
            KeyCode::Char(c) => self.search_push(c),
            _ => {}
        }
    }

    fn handle_columns_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc | KeyCode::Char('c') | KeyCode::Char('q') => {
                self.mode = InputMode::Normal;
                self.clamp_selection();
            }
            KeyCode::Down | KeyCode::Char('j') => self.column_next(),
            KeyCode::Up | KeyCode::Char('k') => self.column_prev(),
            KeyCode::Char(' ') | KeyCode::Enter => self.column_toggle(),
            _ => {}
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match self.mode {
            InputMode::Normal => self.handle_normal_key(code),
            InputMode::Search => self.handle_search_key(code),
            InputMode::Columns => self.handle_columns_key(code),
        }
    }
}

pub fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, mut app: App) -> AppResult<()> {
    loop {
        terminal.draw(|f| super::views::draw(f, &mut app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    // Ctrl+C quits from any mode
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        && key.code == KeyCode::Char('c')
                    {
                        app.running = false;
                        continue;
                    }
                    app.handle_key(key.code);
                }
            }
        }

        if !app.running {
            return Ok(());
        }
    }
}
