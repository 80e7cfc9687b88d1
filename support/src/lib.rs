// A set of helper types shared by the view, text, and gpu crates.

#[macro_use]
pub mod logging;
pub mod error;
pub mod log;
pub mod math;

pub use error::{anyhow, Context, Error, Result};
pub use math::{Affine2, Rect, Vec2};
