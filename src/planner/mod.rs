mod error;
mod interpolate;
mod window;

pub use error::{InterpolationError, PlanError};
pub use interpolate::{interpolate, InterpolatedFix};
pub use window::{BracketCursor, BracketPair, WindowPlanner};
