//! An in-memory document source.
//!
//! A snapshot is what a host application captures from its live document
//! model: for every slide, the shapes of its content and of its layout, or
//! the failure the host raised while loading them. Snapshots deserialize from
//! the host's JSON (camelCase field names).

use crate::error::{ShapeError, SourceError};
use crate::source::{DocumentSource, ShapeHandle, ShapeKind, SlideHandle};
use crate::types::FontName;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Host error messages that mean the content is off limits to the scanner.
static NOT_ACCESSIBLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)not accessible").unwrap());

/// Host error code for denied access.
const ACCESS_DENIED_CODE: &str = "AccessDenied";

/// A failure reported by the host while loading data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostFailure {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl HostFailure {
    pub fn new(message: impl Into<String>, code: Option<&str>) -> Self {
        Self {
            message: message.into(),
            code: code.map(str::to_string),
        }
    }

    /// Whether the host denied access to the content.
    pub fn is_access_denied(&self) -> bool {
        self.code.as_deref() == Some(ACCESS_DENIED_CODE)
            || NOT_ACCESSIBLE_REGEX.is_match(&self.message)
    }

    /// Classify the failure.
    pub fn to_source_error(&self) -> SourceError {
        if self.is_access_denied() {
            SourceError::AccessDenied(self.message.clone())
        } else {
            SourceError::Other(self.message.clone())
        }
    }
}

/// A captured presentation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationSnapshot {
    #[serde(default)]
    pub slides: Vec<SlideSnapshot>,

    /// Set when the host could not enumerate the slides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<HostFailure>,
}

impl PresentationSnapshot {
    pub fn new(slides: Vec<SlideSnapshot>) -> Self {
        Self { slides, error: None }
    }

    /// A presentation whose slides could not be listed.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            slides: Vec::new(),
            error: Some(HostFailure::new(message, None)),
        }
    }
}

impl DocumentSource for PresentationSnapshot {
    type Slide = SlideSnapshot;

    fn slides(&self) -> Result<Vec<SlideSnapshot>, SourceError> {
        match &self.error {
            Some(failure) => Err(failure.to_source_error()),
            None => Ok(self.slides.clone()),
        }
    }
}

/// One captured slide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideSnapshot {
    #[serde(default)]
    pub content: ScopeSnapshot,
    #[serde(default)]
    pub master: ScopeSnapshot,
}

impl SlideSnapshot {
    /// A slide whose both scopes loaded.
    pub fn new(content: Vec<ShapeSnapshot>, master: Vec<ShapeSnapshot>) -> Self {
        Self::from_scopes(ScopeSnapshot::Shapes(content), ScopeSnapshot::Shapes(master))
    }

    pub fn from_scopes(content: ScopeSnapshot, master: ScopeSnapshot) -> Self {
        Self { content, master }
    }
}

impl SlideHandle for SlideSnapshot {
    type Shape = ShapeSnapshot;

    fn content_shapes(&self) -> Result<Vec<ShapeSnapshot>, SourceError> {
        self.content.to_result()
    }

    fn master_shapes(&self) -> Result<Vec<ShapeSnapshot>, SourceError> {
        self.master.to_result()
    }
}

/// The shapes of one scope, or the failure raised while loading them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScopeSnapshot {
    Shapes(Vec<ShapeSnapshot>),
    Failed { error: HostFailure },
}

impl Default for ScopeSnapshot {
    fn default() -> Self {
        ScopeSnapshot::Shapes(Vec::new())
    }
}

impl ScopeSnapshot {
    pub fn shapes(shapes: Vec<ShapeSnapshot>) -> Self {
        ScopeSnapshot::Shapes(shapes)
    }

    pub fn failed(message: impl Into<String>, code: Option<&str>) -> Self {
        ScopeSnapshot::Failed {
            error: HostFailure::new(message, code),
        }
    }

    fn to_result(&self) -> Result<Vec<ShapeSnapshot>, SourceError> {
        match self {
            ScopeSnapshot::Shapes(shapes) => Ok(shapes.clone()),
            ScopeSnapshot::Failed { error } => Err(error.to_source_error()),
        }
    }
}

/// One captured shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ShapeKind>,

    /// Font of the text range; absent when the shape has no text frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_name: Option<String>,

    /// Further fonts when the text mixes several.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub font_names: Vec<String>,

    /// Set when the host failed to read this shape's text data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ShapeSnapshot {
    /// A text box in the given font.
    pub fn text(font: &str) -> Self {
        Self {
            kind: Some(ShapeKind::TextBox),
            font_name: Some(font.to_string()),
            ..Self::default()
        }
    }

    /// A picture without a text frame.
    pub fn picture() -> Self {
        Self {
            kind: Some(ShapeKind::Picture),
            ..Self::default()
        }
    }

    /// A shape whose text data cannot be read.
    pub fn unreadable(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Give the shape a text range in the given font.
    pub fn with_font(mut self, font: &str) -> Self {
        self.font_name = Some(font.to_string());
        self
    }
}

impl ShapeHandle for ShapeSnapshot {
    fn text_font_name(&self) -> Result<Option<FontName>, ShapeError> {
        if let Some(message) = &self.error {
            return Err(ShapeError(message.clone()));
        }
        Ok(self.font_name.as_deref().map(FontName::from))
    }

    fn text_font_names(&self) -> Result<Vec<FontName>, ShapeError> {
        let mut names: Vec<FontName> = self.text_font_name()?.into_iter().collect();
        names.extend(self.font_names.iter().map(|name| FontName::from(name.as_str())));
        Ok(names)
    }

    fn shape_kind(&self) -> Option<ShapeKind> {
        self.kind
    }
}
