//! Interfaces to the document being audited.
//!
//! A document source enumerates slides; each slide hands out its own shapes
//! and the shapes it inherits from its layout or master. The scanner only ever
//! reads through these traits.

use crate::error::{ShapeError, SourceError};
use crate::types::FontName;
use serde::{Deserialize, Serialize};

/// A presentation whose slides can be enumerated.
pub trait DocumentSource {
    type Slide: SlideHandle;

    /// List the slides in presentation order.
    ///
    /// A failure here is fatal to the scan.
    fn slides(&self) -> Result<Vec<Self::Slide>, SourceError>;
}

/// One slide of a presentation.
pub trait SlideHandle {
    type Shape: ShapeHandle;

    /// Shapes placed directly on the slide.
    fn content_shapes(&self) -> Result<Vec<Self::Shape>, SourceError>;

    /// Shapes defined on the slide's layout or master.
    fn master_shapes(&self) -> Result<Vec<Self::Shape>, SourceError>;
}

/// One shape on a slide, layout, or master.
pub trait ShapeHandle {
    /// Font of the shape's text range, or `None` if the shape has no text
    /// frame or the font cannot be named.
    fn text_font_name(&self) -> Result<Option<FontName>, ShapeError>;

    /// Every font of the shape's text. Sources whose text ranges can mix
    /// fonts override this; the default is the single range font.
    fn text_font_names(&self) -> Result<Vec<FontName>, ShapeError> {
        Ok(self.text_font_name()?.into_iter().collect())
    }

    /// The kind of shape, if the source knows it.
    fn shape_kind(&self) -> Option<ShapeKind>;
}

/// Kind of a shape, as far as font scanning cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeKind {
    GeometricShape,
    TextBox,
    Placeholder,
    #[serde(alias = "image")]
    Picture,
    Group,
    Line,
    Table,
    Other,
}
