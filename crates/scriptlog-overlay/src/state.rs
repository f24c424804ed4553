//! Overlay State

use scriptlog::DEFAULT_HISTORY_TAIL;

/// Marker placed before every log line on screen
pub const LINE_PREFIX: &str = "\n>>>\t";

/// Backdrop opacity while the panel is shown
pub const VISIBLE_ALPHA: f32 = 0.9;

/// Backdrop opacity while the panel is swiped away
pub const HIDDEN_ALPHA: f32 = 0.6;

/// Horizontal panel center once swiped away
pub const HIDDEN_X: f32 = -2.0;

/// Horizontal center of the touch strip once the panel is swiped away
pub const HIDDEN_STRIP_X: f32 = -1.9;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Log overlay state
///
/// The panel center uses anchor coordinates: `0.0` is centered, `-1.0..=1.0`
/// spans the screen, positive `y` moves the panel up.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayState {
    /// Newest log lines, at most `capacity`
    pub lines: Vec<String>,
    /// Maximum number of lines kept
    pub capacity: usize,
    pub visible: bool,
    /// Panel center
    pub center: Vec2,
    /// Panel center when the current touch began
    pub drag_start: Vec2,
    /// Where the current touch began
    pub touch_origin: Vec2,
    /// Touch `y` of the previous move event
    pub previous_y: f32,
    /// Vertical velocity applied on every tick
    pub velocity: f32,
    pub touching: bool,
    /// Horizontal center of the touch strip
    pub strip_x: f32,
    pub backdrop_alpha: f32,
}

impl Default for OverlayState {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_TAIL)
    }
}

impl OverlayState {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lines: Vec::new(),
            capacity,
            visible: true,
            center: Vec2::ZERO,
            drag_start: Vec2::ZERO,
            touch_origin: Vec2::ZERO,
            previous_y: 0.0,
            velocity: 0.0,
            touching: false,
            strip_x: 0.0,
            backdrop_alpha: VISIBLE_ALPHA,
        }
    }

    /// Text shown in the panel, empty while hidden
    pub fn display_text(&self) -> String {
        if !self.visible || self.lines.is_empty() {
            return String::new();
        }
        format!("{}{}", LINE_PREFIX, self.lines.join(LINE_PREFIX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display_text_prefixes_every_line() {
        let state = OverlayState {
            lines: vec!["a".to_string(), "b".to_string()],
            ..OverlayState::default()
        };
        assert_eq!(state.display_text(), "\n>>>\ta\n>>>\tb");
    }

    #[test]
    fn test_display_text_empty_when_hidden() {
        let state = OverlayState {
            lines: vec!["a".to_string()],
            visible: false,
            ..OverlayState::default()
        };
        assert_eq!(state.display_text(), "");
    }

    #[test]
    fn test_default_is_visible_and_centered() {
        let state = OverlayState::default();
        assert!(state.visible);
        assert_eq!(state.center, Vec2::ZERO);
        assert_eq!(state.capacity, 500);
    }
}
