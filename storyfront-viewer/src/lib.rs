//! Host-independent state behind the post grid and the story viewer.

pub mod color;
pub mod detail;
pub mod gesture;
pub mod grid;
pub mod navigator;
pub mod scroll;
pub mod slideshow;
pub mod story;

#[cfg(test)]
mod fixtures;

pub use detail::{Detail, DetailOverlay};
pub use gesture::{Key, Swipe, TapZone, WheelPolicy};
pub use grid::{FetchRequest, Footer, Grid};
pub use navigator::{Command, Navigator, Position, Viewer};
pub use scroll::{HostStyle, ScrollLock, Viewport};
pub use slideshow::{Event, Mark, Outcome, Slideshow};
pub use story::{Backdrop, Story, PLACEHOLDER_IMAGE};
