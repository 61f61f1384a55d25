//! Sexagesimal angles, display patterns and spacing rounding.
//!
//! - [`SexagesimalAngle`]: normalized `(d, m, s)` / `(h, m, s)` value type
//! - [`AnglePattern`]: parsed `dd:mm:ss.ss`-style display pattern
//! - [`nice_spacing`] and friends: pick human-friendly tick spacings

pub mod pattern;
pub mod sexagesimal;
pub mod smart_round;

pub use pattern::{AnglePattern, Precision, Rounded};
pub use sexagesimal::{SexagesimalAngle, Separators};
pub use smart_round::{nice_decimal_spacing, nice_scalar_spacing, nice_spacing};
