//! Overlay Reducer

use crate::action::OverlayAction;
use crate::state::{OverlayState, HIDDEN_ALPHA, HIDDEN_STRIP_X, HIDDEN_X, VISIBLE_ALPHA};

/// Horizontal travel (leftwards) that dismisses the panel
const SWIPE_THRESHOLD: f32 = 0.3;

/// Drag displacement to panel travel
const DRAG_GAIN: f32 = 2.0;

/// Per-move vertical delta below which the drag carries no inertia
const MIN_FRAME_DELTA: f32 = 0.05;

/// Velocity kept after each tick
const FRICTION: f32 = 0.95;

/// Velocity below which the panel stops
const REST_VELOCITY: f32 = 0.01;

/// Reducer for the log overlay.
pub fn reduce_overlay(mut state: OverlayState, action: &OverlayAction) -> OverlayState {
    match action {
        OverlayAction::LinesUpdated(lines) => {
            let start = lines.len().saturating_sub(state.capacity);
            // Every refresh brings the panel back, centered and at rest
            state = OverlayState {
                lines: lines[start..].to_vec(),
                ..OverlayState::with_capacity(state.capacity)
            };
        }
        OverlayAction::Tap => {
            if !state.visible {
                state.visible = true;
                state.center.x = 0.0;
                state.strip_x = 0.0;
                state.backdrop_alpha = VISIBLE_ALPHA;
            }
        }
        OverlayAction::TouchStart(pos) => {
            state.touching = true;
            state.drag_start = state.center;
            state.touch_origin = *pos;
            state.previous_y = pos.y;
        }
        OverlayAction::TouchMove(pos) => {
            if !state.visible {
                return state;
            }

            let dx = pos.x - state.touch_origin.x;
            let dy = pos.y - state.touch_origin.y;
            let frame_dy = pos.y - state.previous_y;

            if dx < -SWIPE_THRESHOLD && dx.abs() > dy.abs() {
                log::debug!("Overlay swiped away");
                state.visible = false;
                state.center.x = HIDDEN_X;
                state.strip_x = HIDDEN_STRIP_X;
                state.backdrop_alpha = HIDDEN_ALPHA;
                return state;
            }

            state.velocity = (state.touch_origin.y - pos.y) * DRAG_GAIN;
            state.center.y = state.drag_start.y + state.velocity;
            if frame_dy.abs() < MIN_FRAME_DELTA {
                state.velocity = 0.0;
            }
            state.previous_y = pos.y;
        }
        OverlayAction::TouchEnd => {
            state.touching = false;
        }
        OverlayAction::Tick => {
            if !state.visible || state.touching {
                return state;
            }
            state.center.y += state.velocity;
            state.velocity *= FRICTION;
            if state.velocity.abs() < REST_VELOCITY {
                state.velocity = 0.0;
            }
        }
    }
    state
}
