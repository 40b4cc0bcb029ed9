//! Domain types for representing font usage across a presentation.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;
use std::num::NonZeroUsize;

/// 1-based position of a slide within one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlideIndex(NonZeroUsize);

impl SlideIndex {
    /// Create a slide index from a 1-based slide number. Returns `None` for 0.
    pub fn new(number: usize) -> Option<Self> {
        NonZeroUsize::new(number).map(Self)
    }

    /// Create a slide index from a 0-based position in the slide sequence.
    pub fn from_position(position: usize) -> Self {
        Self(NonZeroUsize::MIN.saturating_add(position))
    }

    /// The 1-based slide number.
    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl fmt::Display for SlideIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name of a typeface family, exactly as the document spells it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FontName(String);

impl FontName {
    /// Create a font name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the name carries no visible characters.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for FontName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for FontName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for FontName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FontName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for FontName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Where on a slide a font reference was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// Shapes placed directly on the slide.
    SlideContent,
    /// Shapes inherited from the slide's layout or master.
    MasterContent,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::SlideContent => f.write_str("slide"),
            Scope::MasterContent => f.write_str("layout"),
        }
    }
}

/// A font observed in one scope of one slide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontReference {
    pub font: FontName,
    pub slide: SlideIndex,
    pub scope: Scope,
}

/// Where a missing font was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    /// Used in the content of this slide.
    Slide(SlideIndex),
    /// Only used by layouts or masters, never in any slide's own content.
    MasterOnly,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Slide(index) => write!(f, "{}", index),
            Location::MasterOnly => f.write_str("Master only"),
        }
    }
}

/// A font judged not installed, with everywhere it was detected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedFont {
    /// The font name, as first detected.
    pub name: FontName,

    /// Detection sites in order of first detection.
    pub locations: Vec<Location>,

    /// Whether any slide's layout or master uses this font.
    pub used_in_master: bool,
}

impl ClassifiedFont {
    /// Create an entry with no locations yet.
    pub fn new(name: FontName) -> Self {
        Self {
            name,
            locations: Vec::new(),
            used_in_master: false,
        }
    }

    /// Record a slide whose content uses this font.
    pub fn add_slide(&mut self, slide: SlideIndex) {
        self.locations.push(Location::Slide(slide));
    }

    /// Tag the font as master-only. The tag is recorded once.
    pub fn tag_master_only(&mut self) {
        if !self.is_master_only() {
            self.locations.push(Location::MasterOnly);
        }
    }

    /// Whether the master-only tag is present.
    pub fn is_master_only(&self) -> bool {
        self.locations.contains(&Location::MasterOnly)
    }

    /// Slides whose content uses this font.
    pub fn slides(&self) -> impl Iterator<Item = SlideIndex> + '_ {
        self.locations.iter().filter_map(|location| match location {
            Location::Slide(index) => Some(*index),
            Location::MasterOnly => None,
        })
    }
}

/// Missing fonts in order of first detection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MissingFonts(Vec<ClassifiedFont>);

impl MissingFonts {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a missing font by its reported name.
    pub fn get(&self, name: &str) -> Option<&ClassifiedFont> {
        self.0.iter().find(|font| font.name.as_str() == name)
    }

    /// Whether a font with this reported name is missing.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate in order of first detection.
    pub fn iter(&self) -> std::slice::Iter<'_, ClassifiedFont> {
        self.0.iter()
    }

    /// Reported names in order of first detection.
    pub fn names(&self) -> impl Iterator<Item = &FontName> + '_ {
        self.0.iter().map(|font| &font.name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn push(&mut self, font: ClassifiedFont) -> usize {
        self.0.push(font);
        self.0.len() - 1
    }

    pub(crate) fn at_mut(&mut self, position: usize) -> &mut ClassifiedFont {
        &mut self.0[position]
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, ClassifiedFont> {
        self.0.iter_mut()
    }
}

impl<'a> IntoIterator for &'a MissingFonts {
    type Item = &'a ClassifiedFont;
    type IntoIter = std::slice::Iter<'a, ClassifiedFont>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The result of scanning a presentation. Built fresh on every scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Number of slides the document source listed.
    pub slide_count: usize,

    /// Fonts used in any slide's own content, sorted.
    pub used_slide_fonts: BTreeSet<FontName>,

    /// Fonts used by any slide's layout or master, sorted.
    pub used_master_fonts: BTreeSet<FontName>,

    /// Fonts judged not installed, in order of first detection.
    pub missing_fonts: MissingFonts,

    /// Slides whose content was not accessible, in slide order.
    pub skipped_slides: Vec<SlideIndex>,
}

impl ScanReport {
    /// An empty report for a presentation with the given number of slides.
    pub fn new(slide_count: usize) -> Self {
        Self {
            slide_count,
            ..Self::default()
        }
    }

    /// Whether any font was judged missing.
    pub fn has_missing_fonts(&self) -> bool {
        !self.missing_fonts.is_empty()
    }
}
