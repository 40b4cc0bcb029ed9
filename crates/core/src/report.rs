//! Rendering of scan reports.
//!
//! The rendered report is a list of tagged lines. Joined with newlines they
//! form the textual report:
//!
//! ```text
//! Found 3 slide(s).
//!
//! === FONTS USED IN SLIDES ===
//! Arial, Calibri, Wingdings2
//!
//! === MISSING FONTS ===
//! ❌ Wingdings2  (Slides: 1) (Master Slides)
//! ❌ Bahnschrift  (Slides: Master only) (Master Slides)
//!
//! === SKIPPED SLIDES ===
//! (not accessible to the font scanner)
//! 3
//! ```
//!
//! Presentation layers should work from the line records rather than parse
//! the text; every missing-font line carries its font name.

use crate::types::{ClassifiedFont, FontName, ScanReport};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix of section heading lines.
pub const HEADING_PREFIX: &str = "=== ";

/// Marker starting the line shown when no font is missing.
pub const SUCCESS_MARKER: &str = "✅";

/// Marker starting each missing-font line.
pub const MISSING_MARKER: &str = "❌";

/// Suffix of missing-font lines for fonts used by a layout or master.
pub const MASTER_SLIDES_NOTE: &str = "(Master Slides)";

/// Explanation printed under the skipped-slides heading.
pub const SKIPPED_NOTE: &str = "(not accessible to the font scanner)";

/// Banner printed instead of a report when a scan fails.
pub const FAILURE_BANNER: &str = "⚠️ Error scanning fonts:";

/// One line of a rendered report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ReportLine {
    /// A section heading.
    Heading { text: String },
    /// The line shown when no font is missing.
    Success { text: String },
    /// One missing font. `detail` is the text following the font name.
    MissingFont {
        font: FontName,
        detail: String,
        text: String,
    },
    /// Anything else, including blank separator lines.
    Plain { text: String },
}

impl ReportLine {
    fn heading(title: &str) -> Self {
        ReportLine::Heading {
            text: format!("{}{} ===", HEADING_PREFIX, title),
        }
    }

    fn plain(text: impl Into<String>) -> Self {
        ReportLine::Plain { text: text.into() }
    }

    fn blank() -> Self {
        Self::plain("")
    }

    fn missing(font: &ClassifiedFont) -> Self {
        let locations = font
            .locations
            .iter()
            .map(|location| location.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let mut detail = format!("(Slides: {})", locations);
        if font.used_in_master {
            detail.push(' ');
            detail.push_str(MASTER_SLIDES_NOTE);
        }

        ReportLine::MissingFont {
            font: font.name.clone(),
            text: format!("{} {}  {}", MISSING_MARKER, font.name, detail),
            detail,
        }
    }

    /// The full text of the line.
    pub fn text(&self) -> &str {
        match self {
            ReportLine::Heading { text }
            | ReportLine::Success { text }
            | ReportLine::MissingFont { text, .. }
            | ReportLine::Plain { text } => text,
        }
    }

    /// The font of a missing-font line.
    pub fn missing_font(&self) -> Option<&FontName> {
        match self {
            ReportLine::MissingFont { font, .. } => Some(font),
            _ => None,
        }
    }
}

/// A rendered report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedReport {
    pub lines: Vec<ReportLine>,

    /// Distinct missing fonts in the order they were rendered.
    pub missing_font_names: Vec<FontName>,
}

impl RenderedReport {
    /// The textual report.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(ReportLine::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// All missing font names in one string, for a bulk copy action.
    pub fn copy_all(&self) -> String {
        self.missing_font_names
            .iter()
            .map(FontName::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Lines that describe a missing font.
    pub fn missing_lines(&self) -> impl Iterator<Item = &ReportLine> + '_ {
        self.lines.iter().filter(|line| line.missing_font().is_some())
    }
}

impl fmt::Display for RenderedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// Renders [`ScanReport`]s.
#[derive(Debug, Clone)]
pub struct Reporter {
    /// Whether the report starts with the number of slides scanned.
    slide_count_line: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self {
            slide_count_line: true,
        }
    }
}

impl Reporter {
    /// Create a reporter with the default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether the report starts with the number of slides scanned.
    pub fn with_slide_count_line(mut self, enabled: bool) -> Self {
        self.slide_count_line = enabled;
        self
    }

    /// Render a report.
    ///
    /// Used fonts are listed sorted; missing fonts are listed in the order
    /// they were first detected.
    pub fn render(&self, report: &ScanReport) -> RenderedReport {
        let mut lines = Vec::new();
        let mut missing_font_names: Vec<FontName> = Vec::new();

        if self.slide_count_line {
            lines.push(ReportLine::plain(format!("Found {} slide(s).", report.slide_count)));
            lines.push(ReportLine::blank());
        }

        if !report.used_slide_fonts.is_empty() {
            lines.push(ReportLine::heading("FONTS USED IN SLIDES"));
            let used = report
                .used_slide_fonts
                .iter()
                .map(FontName::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(ReportLine::plain(used));
            lines.push(ReportLine::blank());
        }

        if report.missing_fonts.is_empty() {
            lines.push(ReportLine::Success {
                text: format!("{} No missing fonts detected.", SUCCESS_MARKER),
            });
        } else {
            lines.push(ReportLine::heading("MISSING FONTS"));
            for font in &report.missing_fonts {
                if !missing_font_names.contains(&font.name) {
                    missing_font_names.push(font.name.clone());
                }
                lines.push(ReportLine::missing(font));
            }
        }
        lines.push(ReportLine::blank());

        if !report.skipped_slides.is_empty() {
            lines.push(ReportLine::heading("SKIPPED SLIDES"));
            lines.push(ReportLine::plain(SKIPPED_NOTE));
            let slides = report
                .skipped_slides
                .iter()
                .map(|slide| slide.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(ReportLine::plain(slides));
        }

        RenderedReport {
            lines,
            missing_font_names,
        }
    }
}

/// Text shown in place of a report when a scan fails.
pub fn failure_text(error: &dyn std::error::Error) -> String {
    format!("{}\n\n{}", FAILURE_BANNER, error)
}
