//! Overlay as the logger's display sink

use crate::action::OverlayAction;
use crate::reducer::reduce_overlay;
use crate::state::OverlayState;
use scriptlog::DisplaySink;

/// Owns the overlay state and feeds it actions
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    state: OverlayState,
}

impl Overlay {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: OverlayState::with_capacity(capacity),
        }
    }

    pub fn dispatch(&mut self, action: OverlayAction) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce_overlay(state, &action);
    }

    pub fn state(&self) -> &OverlayState {
        &self.state
    }
}

impl DisplaySink for Overlay {
    fn render(&mut self, lines: &[String]) {
        log::trace!("Overlay received {} lines", lines.len());
        self.dispatch(OverlayAction::LinesUpdated(lines.to_vec()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Vec2;
    use pretty_assertions::assert_eq;
    use scriptlog::{Console, LogArgs, Settings};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_render_replaces_lines() {
        let mut overlay = Overlay::with_capacity(2);
        overlay.render(&["a".to_string(), "b".to_string(), "c".to_string()]);
        assert_eq!(overlay.state().lines, vec!["b", "c"]);
    }

    #[test]
    fn test_console_feeds_overlay() {
        let overlay = Rc::new(RefCell::new(Overlay::default()));
        let settings = Settings::new(|_: &str| {}).with_log_to_screen(true);
        let mut console = Console::new(settings, || {
            "Error\n    at print (scriptlog.js:1:1)\n    at update (game.js:9:2)".to_string()
        })
        .with_sink(Rc::clone(&overlay));

        console.print("hp: 3", LogArgs::new()).unwrap();
        console.print("hp: 2", LogArgs::new()).unwrap();

        assert_eq!(overlay.borrow().state().lines, vec!["hp: 3", "hp: 2"]);
        assert_eq!(
            overlay.borrow().state().display_text(),
            "\n>>>\thp: 3\n>>>\thp: 2"
        );
    }

    #[test]
    fn test_new_lines_bring_back_hidden_panel() {
        let mut overlay = Overlay::default();
        overlay.dispatch(OverlayAction::TouchStart(Vec2::new(0.9, 0.5)));
        overlay.dispatch(OverlayAction::TouchMove(Vec2::new(0.2, 0.5)));
        assert!(!overlay.state().visible);

        overlay.render(&["again".to_string()]);
        assert!(overlay.state().visible);
    }
}
