//! Terminal input pump.
//!
//! A background task forwards key presses and periodic ticks over an
//! unbounded channel so the app loop can `select!` terminal input
//! against fetch completions.

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error};

#[derive(Debug, Clone)]
pub enum InputEvent {
    Key(KeyEvent),
    Tick,
    Error(String),
}

pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<InputEvent>,
    _task: tokio::task::JoinHandle<()>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let _task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_rate);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if tx.send(InputEvent::Tick).is_err() {
                            debug!("Input channel closed, stopping tick pump");
                            break;
                        }
                    }
                    _ = tokio::time::sleep(Duration::from_millis(1)) => {
                        if let Ok(true) = event::poll(Duration::from_millis(0)) {
                            match event::read() {
                                // Release/repeat events would double every
                                // keystroke on Windows terminals.
                                Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                                    if tx.send(InputEvent::Key(key)).is_err() {
                                        debug!("Input channel closed, stopping input pump");
                                        break;
                                    }
                                }
                                Ok(_) => {}
                                Err(e) => {
                                    error!("Failed to read terminal event: {}", e);
                                    let _ = tx.send(InputEvent::Error(format!(
                                        "Terminal read error: {}",
                                        e
                                    )));
                                }
                            }
                        }
                    }
                }
            }
        });

        Self { rx, _task }
    }

    pub async fn next(&mut self) -> Option<InputEvent> {
        self.rx.recv().await
    }
}
