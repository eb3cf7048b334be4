//! Session state and key handling.
//!
//! The session owns the ledger. Every change replaces the ledger with the new
//! one returned by the engine and recomputes the summary.

use chrono::{Duration, NaiveDateTime};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use timely_core::{Ledger, Summary, parse_time_on};

/// Maximum number of characters in the input field (`HH:MM`).
pub const INPUT_LIMIT: usize = 5;

/// What a key press asks the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Submit,
    RemoveSelected,
    SelectPrevious,
    SelectNext,
    DeleteChar,
    InsertChar(char),
}

impl KeyAction {
    /// Maps a key press to an action, if it has one.
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Some(Self::Quit),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char('q') => Some(Self::Quit),
            KeyCode::Enter => Some(Self::Submit),
            KeyCode::Char('x') => Some(Self::RemoveSelected),
            KeyCode::Up | KeyCode::Char('k') => Some(Self::SelectPrevious),
            KeyCode::Down | KeyCode::Char('j') => Some(Self::SelectNext),
            KeyCode::Backspace => Some(Self::DeleteChar),
            KeyCode::Char(c) if c.is_ascii_digit() || c == ':' => Some(Self::InsertChar(c)),
            _ => None,
        }
    }
}

/// State of one interactive session.
#[derive(Debug, Clone)]
pub struct App {
    ledger: Ledger,
    target: Duration,
    startup: Option<NaiveDateTime>,
    input: String,
    selected: usize,
    summary: Summary,
    quitting: bool,
}

impl App {
    /// Creates a session with an empty ledger.
    pub fn new(target: Duration, now: NaiveDateTime) -> Self {
        let ledger = Ledger::new();
        let summary = Summary::compute(&ledger, target, now);
        Self {
            ledger,
            target,
            startup: None,
            input: String::new(),
            selected: 0,
            summary,
            quitting: false,
        }
    }

    pub const fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub const fn target(&self) -> Duration {
        self.target
    }

    /// Boot time reported by the probe, if any.
    pub const fn startup(&self) -> Option<NaiveDateTime> {
        self.startup
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Index of the highlighted entry; meaningless while the ledger is empty.
    pub const fn selected(&self) -> usize {
        self.selected
    }

    pub const fn summary(&self) -> &Summary {
        &self.summary
    }

    pub const fn is_quitting(&self) -> bool {
        self.quitting
    }

    /// Handles a key press. Returns `true` when the session should end.
    pub fn handle_key(&mut self, key: KeyEvent, now: NaiveDateTime) -> bool {
        if let Some(action) = KeyAction::from_key(key) {
            self.apply(action, now);
        }
        self.quitting
    }

    /// Applies an action at the instant `now`.
    pub fn apply(&mut self, action: KeyAction, now: NaiveDateTime) {
        match action {
            KeyAction::Quit => self.quitting = true,
            KeyAction::Submit => self.submit(now),
            KeyAction::RemoveSelected => self.remove_selected(now),
            KeyAction::SelectPrevious => self.selected = self.selected.saturating_sub(1),
            KeyAction::SelectNext => {
                if self.selected + 1 < self.ledger.len() {
                    self.selected += 1;
                }
            }
            KeyAction::DeleteChar => {
                self.input.pop();
            }
            KeyAction::InsertChar(c) => {
                if self.input.len() < INPUT_LIMIT {
                    self.input.push(c);
                }
            }
        }
    }

    /// Parses the input field as a time on the day of `now` and records it.
    ///
    /// Rejected input only clears the field.
    pub fn submit(&mut self, now: NaiveDateTime) {
        let input = std::mem::take(&mut self.input);
        match parse_time_on(&input, now.date()) {
            Ok(entry) => {
                debug!(%entry, "entry added");
                self.set_ledger(self.ledger.insert(entry), now);
            }
            Err(e) => debug!(error = %e, "input rejected"),
        }
    }

    /// Removes the highlighted entry.
    pub fn remove_selected(&mut self, now: NaiveDateTime) {
        if self.ledger.is_empty() {
            return;
        }
        debug!(index = self.selected, "entry removed");
        self.set_ledger(self.ledger.remove_at(self.selected), now);
    }

    /// Records the probed boot time, seeding the ledger if it is still empty.
    pub fn receive_startup(&mut self, startup: NaiveDateTime, now: NaiveDateTime) {
        self.startup = Some(startup);
        if self.ledger.is_empty() {
            self.set_ledger(self.ledger.insert(startup), now);
        }
    }

    /// Recomputes the summary for the instant `now`.
    pub fn refresh(&mut self, now: NaiveDateTime) {
        self.summary = Summary::compute(&self.ledger, self.target, now);
    }

    fn set_ledger(&mut self, ledger: Ledger, now: NaiveDateTime) {
        self.ledger = ledger;
        self.selected = self.selected.min(self.ledger.len().saturating_sub(1));
        self.refresh(now);
    }
}
