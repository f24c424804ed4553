//! Overlay actions
//!
//! Input for the on-screen log panel. Positions are normalized to the screen,
//! `0.0..=1.0` on both axes with `y` growing downwards.

use crate::state::Vec2;

/// Actions for the log overlay
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayAction {
    /// New tail of the log history, oldest first
    LinesUpdated(Vec<String>),
    /// Short touch without movement
    Tap,
    /// Finger down at a position
    TouchStart(Vec2),
    /// Finger moved to a position
    TouchMove(Vec2),
    /// Finger lifted
    TouchEnd,
    /// One frame elapsed
    Tick,
}
