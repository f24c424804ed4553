//! # scriptlog-overlay
//!
//! On-screen panel for the scriptlog history: a swipe to the left hides it,
//! a tap brings it back, and vertical drags scroll it with inertia.
//!
//! Input is mapped to [`OverlayAction`]s by the host and reduced into an
//! [`OverlayState`]; [`OverlayView`] renders that state with ratatui.
//! [`Overlay`] implements [`scriptlog::DisplaySink`] so a `Console` can feed
//! it directly.

pub mod action;
pub mod reducer;
pub mod sink;
pub mod state;
pub mod theme;
pub mod view;

pub use action::OverlayAction;
pub use reducer::reduce_overlay;
pub use sink::Overlay;
pub use state::{OverlayState, Vec2};
pub use theme::{DefaultTheme, OverlayTheme};
pub use view::OverlayView;
