use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CEvent, KeyEvent};
use tokio::sync::mpsc;

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize,
}

/// Reads the terminal on a plain thread, since crossterm's reader blocks,
/// and forwards input into the async loop.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    pub fn new(poll_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        thread::spawn(move || {
            while !tx.is_closed() {
                match event::poll(poll_rate) {
                    Ok(true) => {}
                    Ok(false) => continue,
                    Err(e) => {
                        log::error!("Terminal poll failed: {}", e);
                        break;
                    }
                }
                let forwarded = match event::read() {
                    Ok(CEvent::Key(key)) => Event::Key(key),
                    Ok(CEvent::Resize(..)) => Event::Resize,
                    Ok(_) => continue,
                    Err(e) => {
                        log::error!("Terminal read failed: {}", e);
                        break;
                    }
                };
                if tx.send(forwarded).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}
