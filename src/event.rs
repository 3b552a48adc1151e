use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

pub const TICK_RATE: Duration = Duration::from_millis(100);

pub enum AppEvent {
    Key(KeyEvent),
    /// No input within one tick; drives the countdown and elapsed time.
    Tick,
    Resize(u16, u16),
}

pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
    _tx: mpsc::Sender<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let _tx = tx.clone();

        thread::spawn(move || {
            loop {
                if event::poll(tick_rate).unwrap_or(false) {
                    let sent = match event::read() {
                        // Some platforms report releases too; only presses type.
                        Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                            tx.send(AppEvent::Key(key))
                        }
                        Ok(Event::Resize(w, h)) => tx.send(AppEvent::Resize(w, h)),
                        _ => Ok(()),
                    };
                    if sent.is_err() {
                        return;
                    }
                } else if tx.send(AppEvent::Tick).is_err() {
                    return;
                }
            }
        });

        Self { rx, _tx }
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}
