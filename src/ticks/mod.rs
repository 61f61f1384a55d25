//! Tick placement: edge sampling, sub-pixel location and automatic spacing.
//!
//! # Pipeline
//!
//! 1. [`sample`]: pixel → world along one viewport edge, continuity-corrected
//! 2. [`recommend`]: automatic spacing from the visible span
//! 3. [`locate`]: integer multiples of the spacing, interpolated to sub-pixel
//!    positions

pub mod locator;
pub mod sampler;
pub mod spacing;

pub use locator::{locate, locate_crossings, locate_minor, world_value, Crossing, Tick};
pub use sampler::{fold_latitudes, sample, unwrap_longitudes, AxisSample};
pub use spacing::{check_consistency, recommend, smart_range, Spacing, TickSpacing};
