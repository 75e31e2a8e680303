//! Event handling for the TUI.
//!
//! A separate thread multiplexes terminal events and poll-timer ticks into
//! one channel so the main loop has a single blocking receive point.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};

/// Application events.
#[derive(Debug)]
pub enum Event {
    /// Poll-timer tick: time to scan the snapshot directory.
    Tick,
    /// Keyboard input.
    Key(KeyEvent),
    /// Terminal resize.
    Resize,
}

/// Polls for terminal events in a separate thread.
pub struct EventHandler {
    rx: Receiver<Event>,
    /// Kept alive to prevent channel closure.
    _tx: Sender<Event>,
}

impl EventHandler {
    /// Creates a new event handler ticking at the given rate.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let event_tx = tx.clone();

        thread::spawn(move || {
            loop {
                if event::poll(tick_rate).unwrap_or(false) {
                    if let Ok(evt) = event::read() {
                        let event = match evt {
                            CrosstermEvent::Key(key) => Event::Key(key),
                            CrosstermEvent::Resize(_, _) => Event::Resize,
                            _ => continue,
                        };
                        if event_tx.send(event).is_err() {
                            break;
                        }
                    }
                } else if event_tx.send(Event::Tick).is_err() {
                    break;
                }
            }
        });

        Self { rx, _tx: tx }
    }

    /// Receives the next event, blocking until one is available.
    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }
}
