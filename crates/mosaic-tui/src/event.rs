use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEvent};
use mosaic_core::config::UiConfig;

use crate::animation::TransitionConfigExt;

/// Event handler for terminal events
pub struct EventHandler {
    tick_rate: Duration,
    /// Poll interval while tiles are moving
    animation_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
            animation_rate: Duration::from_millis(16),
        }
    }

    /// Idle tick from `[ui]`, animation tick from `[ui.transition]`
    pub fn from_config(ui: &UiConfig) -> Self {
        Self {
            tick_rate: Duration::from_millis(ui.tick_rate_ms),
            animation_rate: ui.transition.tick_duration(),
        }
    }

    /// Poll for the next event at the idle tick rate
    pub fn next(&self) -> Result<Option<AppEvent>> {
        self.poll(self.tick_rate)
    }

    /// Poll for the next event at the animation frame rate
    pub fn next_animation(&self) -> Result<Option<AppEvent>> {
        self.poll(self.animation_rate)
    }

    fn poll(&self, timeout: Duration) -> Result<Option<AppEvent>> {
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events, ignore release events
                    // (crossterm 0.27+ sends release events on some systems)
                    if key.kind == KeyEventKind::Press {
                        Ok(Some(AppEvent::Key(key)))
                    } else {
                        Ok(None)
                    }
                }
                Event::Mouse(mouse) => Ok(Some(AppEvent::Mouse(mouse))),
                Event::Resize(w, h) => Ok(Some(AppEvent::Resize(w, h))),
                _ => Ok(None),
            }
        } else {
            Ok(Some(AppEvent::Tick))
        }
    }
}

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// Mouse click, drag or release
    Mouse(MouseEvent),
    /// Terminal was resized
    Resize(u16, u16),
    /// Tick event for periodic updates
    Tick,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_animation_rate() {
        let mut ui = UiConfig::default();
        ui.tick_rate_ms = 100;
        ui.transition.fps = 50;
        let handler = EventHandler::from_config(&ui);
        assert_eq!(handler.tick_rate, Duration::from_millis(100));
        assert_eq!(handler.animation_rate, Duration::from_millis(20));

        ui.transition.fps = 0;
        let fallback = EventHandler::from_config(&ui);
        assert_eq!(fallback.animation_rate, Duration::from_millis(16));
    }
}
