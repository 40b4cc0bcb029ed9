//! PPTX (Office Open XML) document source for presentation font auditing.
//!
//! Reads .pptx files, which are ZIP archives of XML parts, and exposes their
//! slides, layouts, and masters through the `fontaudit-core` source traits.

pub mod error;
pub mod package;
pub mod parser;
pub mod source;

pub use error::{PptxError, Result};
pub use package::Package;
pub use source::{PptxShape, PptxSlide, PptxSource};
