//! TUI (Terminal User Interface) module for the password solver
//!
//! This module provides an interactive terminal interface using Ratatui.
//!
//! # Architecture
//! - `TuiView`: input handling and rendering, independent of the terminal
//! - `TuiInterface`: owns the terminal and plugs the view into the session loop
//!
//! # State Machine
//! - `EnteringCandidate` → (Ctrl+E) → `Editing` → (Enter accepted / Esc) → back to `EnteringCandidate`
//!
//! Typed text is only cleared once the store reports the submitted change;
//! a rejected word stays in the input bar so it can be corrected.

use crate::candidate::{Candidate, CandidateId};
use crate::session::{SessionError, SessionInterface, UserAction, suggest};
use crate::store::Store;
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io;
use std::time::Duration;

const MAX_INPUT_LENGTH: usize = 16;
const EVENT_POLL_TIMEOUT_MS: u64 = 100;
const ASCII_CONTROL_CHAR_THRESHOLD: u32 = 32;
const INFO_PANEL_WIDTH: u16 = 32;

// Style constants for consistent UI
const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red);
const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const INFO_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const MESSAGE_STYLE: Style = Style::new().fg(Color::Cyan);
const RULED_OUT_STYLE: Style = Style::new().fg(Color::DarkGray);
const POSSIBLE_STYLE: Style = Style::new().fg(Color::White);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuiState {
    EnteringCandidate,
    Editing { id: CandidateId },
}

/// What the last Enter submitted, cleared once the store confirms it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Submitted {
    Add,
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowState {
    Password,
    Possible,
    RuledOut,
}

impl RowState {
    fn of(candidate: &Candidate, store: &Store, only_valid: Option<CandidateId>) -> Self {
        if only_valid == Some(candidate.id()) {
            Self::Password
        } else if candidate.is_valid(store.get_candidates()) {
            Self::Possible
        } else {
            Self::RuledOut
        }
    }

    fn style(self) -> Style {
        match self {
            Self::Password => SUCCESS_STYLE,
            Self::Possible => POSSIBLE_STYLE,
            Self::RuledOut => RULED_OUT_STYLE,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Password => "PASSWORD",
            Self::Possible => "possible",
            Self::RuledOut => "ruled out",
        }
    }
}

/// Input state and rendering of the terminal UI.
#[derive(Debug)]
pub struct TuiView {
    wordbank: Vec<String>,
    input: String,
    state: TuiState,
    selected: usize,
    submitted: Option<Submitted>,
    message: String,
    error_message: String,
    status: String,
}

impl TuiView {
    #[must_use]
    pub fn new(wordbank: Vec<String>) -> Self {
        Self {
            wordbank,
            input: String::new(),
            state: TuiState::EnteringCandidate,
            selected: 0,
            submitted: None,
            message: String::new(),
            error_message: String::new(),
            status: "Ready - type the first candidate".to_string(),
        }
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub fn state(&self) -> TuiState {
        self.state
    }

    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    fn selected_candidate<'s>(&self, store: &'s Store) -> Option<&'s Candidate> {
        store.get_candidates().get(self.selected)
    }

    fn selected_id(&mut self, store: &Store) -> Option<CandidateId> {
        let id = self.selected_candidate(store).map(Candidate::id);
        if id.is_none() {
            self.error_message = "Add a candidate first!".to_string();
        }
        id
    }

    /// Translates one key press into a session action, updating local
    /// input state along the way.
    pub fn handle_key(&mut self, key: KeyEvent, store: &Store) -> Option<UserAction> {
        self.error_message.clear();
        debug_log!(
            "handle_key() - code={:?}, modifiers={:?}, input='{}'",
            key.code,
            key.modifiers,
            self.input
        );

        if key.modifiers.contains(KeyModifiers::ALT) {
            debug_log!("handle_key() - Ignoring key with Alt modifier");
            return None;
        }

        match key.code {
            KeyCode::Esc => self.handle_escape(),
            KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.handle_control(c, store)
            }
            KeyCode::Char(c) if c.is_ascii_alphabetic() => {
                if self.input.chars().count() < MAX_INPUT_LENGTH {
                    self.input.push(c.to_ascii_uppercase());
                } else {
                    self.error_message =
                        format!("Candidates are at most {MAX_INPUT_LENGTH} letters!");
                }
                None
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let matches = c.to_digit(10).map(|d| d as usize);
                self.selected_id(store)
                    .map(|id| UserAction::SetMatches(id, matches))
            }
            KeyCode::Char(' ') => self
                .selected_id(store)
                .map(|id| UserAction::SetMatches(id, None)),
            KeyCode::Char('?') | KeyCode::F(1) => Some(UserAction::Help),
            KeyCode::Char(c) => {
                self.error_message = format!("Only letters are allowed! ('{c}' is not a letter)");
                None
            }
            KeyCode::Backspace => {
                self.input.pop();
                None
            }
            KeyCode::Tab => {
                self.complete_input(store);
                None
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Down => {
                if self.selected + 1 < store.len() {
                    self.selected += 1;
                }
                None
            }
            KeyCode::Left => self.step_matches(store, false),
            KeyCode::Right => self.step_matches(store, true),
            KeyCode::Delete => match self.state {
                TuiState::Editing { .. } => {
                    self.error_message = "Finish or cancel the edit first!".to_string();
                    None
                }
                TuiState::EnteringCandidate => self.selected_id(store).map(UserAction::Remove),
            },
            _ => {
                debug_log!("handle_key() - Ignoring key: {:?}", key.code);
                None
            }
        }
    }

    fn handle_escape(&mut self) -> Option<UserAction> {
        match self.state {
            TuiState::Editing { .. } => {
                info_log!("handle_escape() - Edit cancelled");
                self.state = TuiState::EnteringCandidate;
                self.submitted = None;
                self.input.clear();
                self.status = "Edit cancelled".to_string();
                None
            }
            TuiState::EnteringCandidate => {
                info_log!("handle_escape() - ESC pressed, returning Exit");
                Some(UserAction::Exit)
            }
        }
    }

    fn handle_control(&mut self, c: char, store: &Store) -> Option<UserAction> {
        match c.to_ascii_lowercase() {
            'r' => {
                self.input.clear();
                self.state = TuiState::EnteringCandidate;
                Some(UserAction::Reset)
            }
            'e' => {
                if let Some(candidate) = self.selected_candidate(store) {
                    let id = candidate.id();
                    self.input = candidate.value().to_string();
                    self.state = TuiState::Editing { id };
                    self.status = format!("Editing {} - ENTER to save, ESC to cancel", self.input);
                } else {
                    self.error_message = "Nothing to edit!".to_string();
                }
                None
            }
            'c' => Some(UserAction::Exit),
            _ => None,
        }
    }

    fn submit(&mut self) -> Option<UserAction> {
        if self.input.is_empty() {
            self.error_message = "Type a word first!".to_string();
            return None;
        }
        let value = self.input.clone();
        match self.state {
            TuiState::EnteringCandidate => {
                self.submitted = Some(Submitted::Add);
                Some(UserAction::Add(value))
            }
            TuiState::Editing { id } => {
                self.submitted = Some(Submitted::Edit);
                Some(UserAction::Edit(id, value))
            }
        }
    }

    fn complete_input(&mut self, store: &Store) {
        match suggest(store, &self.wordbank, &self.input).first() {
            Some(word) => self.input = (*word).to_string(),
            None => self.error_message = "No suggestion".to_string(),
        }
    }

    fn step_matches(&mut self, store: &Store, up: bool) -> Option<UserAction> {
        let Some(candidate) = self.selected_candidate(store) else {
            self.error_message = "Add a candidate first!".to_string();
            return None;
        };
        let next = match (candidate.matches(), up) {
            (None, true) => Some(0),
            (Some(m), true) if m < candidate.len() => Some(m + 1),
            (Some(0), false) => None,
            (Some(m), false) => Some(m - 1),
            _ => return None,
        };
        Some(UserAction::SetMatches(candidate.id(), next))
    }

    /// Called after every store notification.
    pub fn on_store_changed(&mut self, store: &Store) {
        match self.submitted.take() {
            Some(Submitted::Add) => {
                self.input.clear();
                self.selected = store.len().saturating_sub(1);
            }
            Some(Submitted::Edit) => {
                self.input.clear();
                self.state = TuiState::EnteringCandidate;
            }
            None => {}
        }
        if let TuiState::Editing { id } = self.state
            && store.candidate(id).is_none()
        {
            debug_log!("on_store_changed() - edited candidate {} is gone", id);
            self.state = TuiState::EnteringCandidate;
            self.input.clear();
        }
        self.selected = self.selected.min(store.len().saturating_sub(1));

        if store.is_empty() {
            self.message.clear();
            self.status = "Ready - type the first candidate".to_string();
        } else {
            let possible = store.valid_candidates().count();
            if store.get_only_valid().is_none() {
                self.message.clear();
            }
            self.status = format!("{} candidates, {} possible", store.len(), possible);
        }
    }

    pub fn on_error(&mut self, error: &SessionError) {
        self.submitted = None;
        self.error_message = format!("Rejected: {error}");
    }

    pub fn on_solution(&mut self, solution: &Candidate) {
        self.message = format!("✓ Password found: {}", solution.value());
    }

    pub fn on_suggestions(&mut self, prefix: &str, words: &[&str]) {
        self.message = if words.is_empty() {
            format!("No suggestions for '{prefix}'")
        } else {
            format!("Suggestions: {}", words.join(", "))
        };
    }

    pub fn on_help(&mut self) {
        self.message = "Type a word + ENTER to add it. Select with UP/DOWN, record matches \
                        with 0-9 or LEFT/RIGHT, SPACE clears. DEL removes, CTRL+E edits, \
                        CTRL+R resets, TAB completes."
            .to_string();
    }

    /// Render the complete UI layout.
    pub fn render(&self, f: &mut Frame, store: &Store) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(3), // Input bar
                Constraint::Min(6),    // Candidates + info
                Constraint::Length(3), // Status line
                Constraint::Length(3), // Instructions
            ])
            .split(f.area());

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(INFO_PANEL_WIDTH)])
            .split(chunks[2]);

        Self::render_title(f, chunks[0]);
        self.render_input(f, chunks[1], store);
        self.render_candidates(f, body[0], store);
        self.render_info(f, body[1], store);
        Self::render_status(f, chunks[3], &self.status);
        Self::render_instructions(f, chunks[4], self.state);
    }

    fn render_title(f: &mut Frame, area: Rect) {
        let title = Paragraph::new("TERMINAL PASSWORD SOLVER")
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    fn render_input(&self, f: &mut Frame, area: Rect, store: &Store) {
        let title = match self.state {
            TuiState::EnteringCandidate => match store.get_fixed_candidate_length() {
                Some(len) => format!("New candidate ({len} letters)"),
                None => "New candidate".to_string(),
            },
            TuiState::Editing { id } => format!("Editing candidate {id}"),
        };
        let line = Line::from(vec![
            Span::raw(" > "),
            Span::styled(self.input.as_str(), Style::default().fg(Color::White)),
            Span::styled("_", Style::default().fg(Color::DarkGray)),
        ]);
        let paragraph =
            Paragraph::new(line).block(Block::default().title(title).borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_candidates(&self, f: &mut Frame, area: Rect, store: &Store) {
        let block = Block::default().title("Candidates").borders(Borders::ALL);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let candidates = store.get_candidates();
        if candidates.is_empty() {
            let hint = Paragraph::new("No candidates yet").style(RULED_OUT_STYLE);
            f.render_widget(hint, inner);
            return;
        }

        // Keep the selected row visible
        let available_rows = usize::from(inner.height);
        let skip_count = (self.selected + 1).saturating_sub(available_rows);

        let only_valid = store.get_only_valid().map(Candidate::id);
        let width = store.get_fixed_candidate_length().unwrap_or_default();
        let lines: Vec<Line> = candidates
            .iter()
            .enumerate()
            .skip(skip_count)
            .map(|(index, candidate)| {
                let row = RowState::of(candidate, store, only_valid);
                let matches = candidate
                    .matches()
                    .map_or_else(|| "-".to_string(), |m| m.to_string());
                let marker = if index == self.selected { ">" } else { " " };
                let mut style = row.style();
                if index == self.selected {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                Line::from(vec![
                    Span::raw(format!("{marker} ")),
                    Span::styled(
                        format!(
                            "{:<width$}  {:>2}/{:<2}  {}",
                            candidate.value(),
                            matches,
                            candidate.len(),
                            row.label()
                        ),
                        style,
                    ),
                ])
            })
            .collect();

        f.render_widget(Paragraph::new(lines), inner);
    }

    fn render_info(&self, f: &mut Frame, area: Rect, store: &Store) {
        let mut lines = Vec::new();

        if !self.input.is_empty() {
            let words = suggest(store, &self.wordbank, &self.input);
            if !words.is_empty() {
                lines.push(Line::from(vec![Span::styled("Suggestions:", INFO_STYLE)]));
                for word in words {
                    lines.push(Line::from(format!("  {word}")));
                }
                lines.push(Line::from(""));
            }
        }

        if !self.message.is_empty() {
            lines.push(Line::from(vec![Span::styled(
                self.message.as_str(),
                MESSAGE_STYLE,
            )]));
        }

        if !self.error_message.is_empty() {
            lines.push(Line::from(vec![Span::styled(
                self.error_message.as_str(),
                ERROR_STYLE,
            )]));
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().title("Information").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_status(f: &mut Frame, area: Rect, status: &str) {
        let status_text = if status.is_empty() { "Ready" } else { status };
        let paragraph = Paragraph::new(status_text)
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(paragraph, area);
    }

    fn render_instructions(f: &mut Frame, area: Rect, state: TuiState) {
        let text = match state {
            TuiState::EnteringCandidate => {
                "ENTER: Add | UP/DOWN: Select | 0-9 LEFT/RIGHT: Matches | DEL: Remove | CTRL+E: Edit | CTRL+R: Reset | ?: Help | ESC: Quit"
            }
            TuiState::Editing { .. } => "Type the new word | ENTER: Save | ESC: Cancel edit",
        };

        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }
}

/// Terminal front end for the session loop.
pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    view: TuiView,
}

impl TuiInterface {
    pub fn new(wordbank: Vec<String>) -> Result<Self, io::Error> {
        info_log!("TuiInterface::new() - Initializing TUI");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        info_log!("Terminal setup complete: raw mode, alternate screen, cursor hidden");

        Ok(Self {
            terminal,
            view: TuiView::new(wordbank),
        })
    }

    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    fn draw(&mut self, store: &Store) -> Result<(), io::Error> {
        let view = &self.view;
        self.terminal.draw(|f| view.render(f, store))?;
        Ok(())
    }

    /// Next key press, if one arrives before the poll timeout.
    fn poll_key() -> Result<Option<KeyEvent>, io::Error> {
        if !event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            return Ok(None);
        }

        match event::read()? {
            // Only Press events, Release and Repeat would double the input
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                // Garbage from escape sequences when alt-tabbing
                if let KeyCode::Char(c) = key.code
                    && (c == '\u{FFFD}' || (c as u32) < ASCII_CONTROL_CHAR_THRESHOLD)
                {
                    debug_log!("poll_key() - Ignoring invalid character: {:?}", c);
                    return Ok(None);
                }
                Ok(Some(key))
            }
            other => {
                debug_log!("poll_key() - Ignoring event: {:?}", other);
                Ok(None)
            }
        }
    }
}

impl SessionInterface for TuiInterface {
    fn read_action(&mut self, store: &Store) -> Option<UserAction> {
        loop {
            if let Err(e) = self.draw(store) {
                debug_log!("read_action() - Draw failed: {}", e);
                return Some(UserAction::Exit);
            }

            match Self::poll_key() {
                Ok(Some(key)) => {
                    if let Some(action) = self.view.handle_key(key, store) {
                        info_log!("read_action() - Action: {:?}", action);
                        return Some(action);
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    debug_log!("read_action() - Input error: {}", e);
                    return Some(UserAction::Exit);
                }
            }
        }
    }

    fn display_store(&mut self, store: &Store) {
        self.view.on_store_changed(store);
    }

    fn display_suggestions(&mut self, prefix: &str, words: &[&str]) {
        self.view.on_suggestions(prefix, words);
    }

    fn display_error(&mut self, error: &SessionError) {
        self.view.on_error(error);
    }

    fn display_solution_found(&mut self, solution: &Candidate) {
        self.view.on_solution(solution);
    }

    fn display_help(&mut self) {
        self.view.on_help();
    }

    fn display_exit_message(&mut self) {
        self.view.status = "Exiting...".to_string();
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
