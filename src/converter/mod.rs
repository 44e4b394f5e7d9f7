//! Document → HTML conversion.
//!
//! The converter is an external collaborator: everything downstream only
//! sees the [`Converter`] trait, a black box that either returns a complete
//! HTML page or a [`ConversionError`].
//!
//! - `pandoc` - the real converter, driving the `pandoc` executable
//! - `assets` - embedded template/CSS/Lua written to a temp dir for pandoc
//! - `title` - fallback title detection

mod assets;
mod error;
mod pandoc;
mod title;

use std::path::Path;

pub use error::ConversionError;
pub use pandoc::Pandoc;

/// Renders a source document into a standalone HTML page.
///
/// Implementations must be deterministic: the same input file and
/// environment produce byte-identical output.
pub trait Converter: Send + Sync {
    fn convert(&self, source: &Path) -> Result<Vec<u8>, ConversionError>;
}
