mod error;
mod extractor;
mod parsing;
mod sample;
mod types;

pub use error::{InputError, ParseError};
pub use extractor::extract;
pub use sample::{GpsSample, TelemetrySeries};
pub use types::{MediaDescriptor, EQUIRECTANGULAR};
