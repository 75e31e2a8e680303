//! Main TUI application.

use std::io;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::watcher::{FileSystem, SnapshotWatcher, WatchError};

use super::event::{Event, EventHandler};
use super::input::{KeyAction, handle_key};
use super::render::render;
use super::state::AppState;

/// Interactive viewer: polls the watcher on timer ticks and renders the
/// current scene each frame.
///
/// Drawing happens once per event-loop iteration and returns immediately,
/// so an operator interacting with the UI delays discovery of new files by
/// at most one tick.
pub struct App<F: FileSystem> {
    watcher: SnapshotWatcher<F>,
    state: AppState,
    should_quit: bool,
}

impl<F: FileSystem> App<F> {
    pub fn new(watcher: SnapshotWatcher<F>, retain: usize, dir_label: impl Into<String>) -> Self {
        Self {
            watcher,
            state: AppState::new(retain, dir_label),
            should_quit: false,
        }
    }

    /// Runs the TUI until quit. Only a directory-level watcher failure is
    /// escalated as an error.
    pub fn run(mut self, tick_rate: Duration) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let events = EventHandler::new(tick_rate);
        let result = self.main_loop(&mut terminal, &events);

        // Restore the terminal before surfacing any error.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        events: &EventHandler,
    ) -> io::Result<()> {
        // Drain whatever the producer left behind before the first frame.
        self.poll().map_err(io::Error::other)?;

        loop {
            terminal.draw(|frame| render(frame, &self.state))?;

            match events.next() {
                Ok(Event::Tick) => {
                    if !self.state.paused {
                        self.poll().map_err(io::Error::other)?;
                    }
                }
                Ok(Event::Key(key)) => {
                    if handle_key(&mut self.state, key) == KeyAction::Quit {
                        self.should_quit = true;
                    }
                }
                Ok(Event::Resize) => {}
                Err(_) => self.should_quit = true,
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    /// One watcher cycle; new scenes enter the bounded history.
    fn poll(&mut self) -> Result<(), WatchError> {
        for scene in self.watcher.poll_once()? {
            self.state.push_scene(scene);
        }
        self.state.processed_total = self.watcher.processed_count();
        Ok(())
    }
}
