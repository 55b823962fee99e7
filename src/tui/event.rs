//! Input polling.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent};

/// One input event, or a tick when the timeout elapses with no input.
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Block up to `timeout` for the next event.
pub fn next_event(timeout: Duration) -> Result<AppEvent> {
    if event::poll(timeout)? {
        match event::read()? {
            Event::Key(key) => Ok(AppEvent::Key(key)),
            Event::Resize(..) => Ok(AppEvent::Resize),
            _ => Ok(AppEvent::Tick),
        }
    } else {
        Ok(AppEvent::Tick)
    }
}
