//! Terminal management and the event loop (impure shell).

use std::io::{self, Stdout};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration as StdDuration;

use chrono::{Duration, Local, NaiveDateTime};
use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use thiserror::Error;
use tracing::{debug, info};

use crate::app::App;
use crate::view;

/// Redraw interval; keeps the provisional total moving while idle.
const TICK_INTERVAL: StdDuration = StdDuration::from_millis(500);

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("terminal IO error: {0}")]
    Io(#[from] io::Error),
}

/// An interactive session bound to a terminal.
///
/// Generic over backend to support testing with `TestBackend`.
pub struct Session<B: Backend> {
    terminal: Terminal<B>,
    app: App,
    startup_rx: Option<Receiver<NaiveDateTime>>,
}

impl<B: Backend> Session<B> {
    pub fn new(
        terminal: Terminal<B>,
        target: Duration,
        startup_rx: Option<Receiver<NaiveDateTime>>,
    ) -> Self {
        Self {
            terminal,
            app: App::new(target, now()),
            startup_rx,
        }
    }

    pub const fn app(&self) -> &App {
        &self.app
    }

    pub const fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Picks up a probed boot time, if one arrived, and refreshes the summary.
    pub fn tick(&mut self, now: NaiveDateTime) {
        match self.startup_rx.as_ref().map(Receiver::try_recv) {
            Some(Ok(startup)) => {
                info!(%startup, "boot time received");
                self.app.receive_startup(startup, now);
                self.startup_rx = None;
            }
            Some(Err(TryRecvError::Disconnected)) => {
                debug!("boot time probe finished without a value");
                self.startup_rx = None;
            }
            Some(Err(TryRecvError::Empty)) | None => {}
        }
        self.app.refresh(now);
    }

    /// Forwards a key press to the session. Returns `true` when it should end.
    pub fn handle_key(&mut self, key: KeyEvent, now: NaiveDateTime) -> bool {
        key.kind == KeyEventKind::Press && self.app.handle_key(key, now)
    }

    pub fn draw(&mut self) -> Result<(), TuiError> {
        self.terminal.draw(|frame| view::render(frame, &self.app))?;
        Ok(())
    }

    /// Runs the event loop until the user quits.
    pub fn run(&mut self) -> Result<(), TuiError> {
        self.draw()?;

        loop {
            if event::poll(TICK_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if self.handle_key(key, now()) {
                        return Ok(()); // User quit
                    }
                }
            }
            self.tick(now());
            self.draw()?;
        }
    }
}

impl Session<CrosstermBackend<Stdout>> {
    /// Sets the terminal up in raw mode with an alternate screen.
    pub fn start(
        target: Duration,
        startup_rx: Option<Receiver<NaiveDateTime>>,
    ) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self::new(terminal, target, startup_rx))
    }
}

/// Runs an interactive session and restores the terminal afterwards.
pub fn run(target: Duration, startup_rx: Option<Receiver<NaiveDateTime>>) -> Result<(), TuiError> {
    let result = Session::start(target, startup_rx).and_then(|mut session| session.run());

    // Always restore terminal state
    let restored = restore_terminal();
    first_error(result, restored)
}

/// Keeps the session error when both the session and the restore failed.
fn first_error(
    session: Result<(), TuiError>,
    restored: Result<(), TuiError>,
) -> Result<(), TuiError> {
    session.and(restored)
}

fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::mpsc;

    use chrono::NaiveDate;
    use ratatui::backend::TestBackend;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn session(startup_rx: Option<Receiver<NaiveDateTime>>) -> Session<TestBackend> {
        let terminal = Terminal::new(TestBackend::new(100, 10)).unwrap();
        Session::new(terminal, Duration::hours(8), startup_rx)
    }

    #[test]
    fn tui_error_from_io_error() {
        let err: TuiError = io::Error::other("test error").into();
        assert!(matches!(err, TuiError::Io(_)));
    }

    #[test]
    fn session_error_wins_over_restore_error() {
        let session: Result<(), TuiError> = Err(io::Error::other("draw failed").into());
        let restored: Result<(), TuiError> = Err(io::Error::other("restore failed").into());

        let err = first_error(session, restored).unwrap_err();
        assert_eq!(err.to_string(), "terminal IO error: draw failed");
    }

    #[test]
    fn restore_error_surfaces_after_clean_session() {
        let restored: Result<(), TuiError> = Err(io::Error::other("restore failed").into());

        let err = first_error(Ok(()), restored).unwrap_err();
        assert_eq!(err.to_string(), "terminal IO error: restore failed");
        assert!(first_error(Ok(()), Ok(())).is_ok());
    }

    #[test]
    fn tick_seeds_ledger_with_boot_time() {
        let (tx, rx) = mpsc::channel();
        let mut session = session(Some(rx));

        session.tick(at(9, 0));
        assert!(session.app().ledger().is_empty());

        tx.send(at(7, 45)).unwrap();
        session.tick(at(9, 0));
        assert_eq!(session.app().ledger().entries(), &[at(7, 45)]);
        assert_eq!(session.app().startup(), Some(at(7, 45)));
        assert_eq!(session.app().summary().provisional, Duration::minutes(75));
    }

    #[test]
    fn tick_tolerates_failed_probe() {
        let (tx, rx) = mpsc::channel::<NaiveDateTime>();
        drop(tx);
        let mut session = session(Some(rx));

        session.tick(at(9, 0));
        session.tick(at(9, 1));
        assert!(session.app().ledger().is_empty());
        assert_eq!(session.app().startup(), None);
    }

    #[test]
    fn draw_renders_into_backend() {
        let mut session = session(None);
        session.draw().unwrap();

        let buffer = session.terminal().backend().buffer();
        assert_eq!(buffer[(0, 1)].symbol(), ">");
    }
}
