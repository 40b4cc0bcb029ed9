//! Slide-by-slide font scanning.

use crate::classifier::{Classifier, FontLedger, SlideFonts};
use crate::error::{Error, Result, SourceError};
use crate::oracle::{CachedOracle, FontOracle};
use crate::options::AuditOptions;
use crate::source::{DocumentSource, ShapeHandle, ShapeKind, SlideHandle};
use crate::types::{FontName, ScanReport, Scope, SlideIndex};
use log::{debug, error, warn};

/// What reading one slide produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlideRead {
    /// Fonts found in the slide's scopes. Scopes that failed with a
    /// recoverable error contribute nothing.
    Fonts(SlideFonts),
    /// The slide's content was not accessible.
    Skipped(SourceError),
}

/// Walks a document source and builds a [`ScanReport`].
///
/// The scanner holds no state between scans; every call to [`Scanner::scan`]
/// starts from fresh aggregates.
#[derive(Debug, Clone)]
pub struct Scanner<O> {
    oracle: O,
    options: AuditOptions,
}

impl<O: FontOracle> Scanner<O> {
    /// Create a scanner that asks the given oracle about installed fonts.
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            options: AuditOptions::default(),
        }
    }

    /// Replace the scan options.
    pub fn with_options(mut self, options: AuditOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &AuditOptions {
        &self.options
    }

    /// Scan every slide of the source.
    ///
    /// Only a failure to list the slides is returned as an error; per-slide
    /// and per-shape failures end up in the report or the log.
    pub fn scan<S: DocumentSource>(&self, source: &S) -> Result<ScanReport> {
        let slides = source.slides().map_err(Error::Enumeration)?;
        debug!("Found {} slide(s)", slides.len());

        let oracle = CachedOracle::new(&self.oracle).with_matching(self.options.matching);
        let classifier = Classifier::new(self.options.matching, self.options.master_check);
        let mut ledger = FontLedger::new(self.options.matching);

        for (position, slide) in slides.iter().enumerate() {
            let index = SlideIndex::from_position(position);
            match self.read_slide(index, slide) {
                SlideRead::Fonts(fonts) => {
                    let delta = classifier.classify(&ledger, index, &fonts, &oracle);
                    ledger.apply(delta);
                }
                SlideRead::Skipped(reason) => {
                    error!("Slide {}: Skipped - {}", index, reason);
                    ledger.skip(index);
                }
            }
        }

        Ok(ledger.finish(slides.len()))
    }

    /// Read the fonts of both scopes of one slide.
    ///
    /// Both scopes are requested before either is examined. An access denial
    /// on either one skips the whole slide.
    pub fn read_slide<H: SlideHandle>(&self, index: SlideIndex, slide: &H) -> SlideRead {
        let content = slide.content_shapes();
        let master = slide.master_shapes();

        for result in [&content, &master] {
            if let Err(e) = result {
                if e.is_access_denied() {
                    return SlideRead::Skipped(e.clone());
                }
            }
        }

        SlideRead::Fonts(SlideFonts {
            content: self.scope_fonts(index, Scope::SlideContent, content),
            master: self.scope_fonts(index, Scope::MasterContent, master),
        })
    }

    fn scope_fonts<T: ShapeHandle>(
        &self,
        index: SlideIndex,
        scope: Scope,
        shapes: std::result::Result<Vec<T>, SourceError>,
    ) -> Vec<FontName> {
        match shapes {
            Ok(shapes) => extract_fonts(&shapes, self.options.skip_pictures, |e| {
                warn!("Slide {}: {} shape skipped ({})", index, scope, e);
            }),
            Err(e) => {
                warn!("Slide {}: couldn't load {} shapes ({})", index, scope, e);
                Vec::new()
            }
        }
    }
}

/// Distinct font names of the text-bearing shapes, in shape order.
///
/// Shapes without text or with a blank font name contribute nothing. Shapes
/// whose data cannot be read are reported to `on_error` and ignored.
pub fn extract_fonts<T, F>(shapes: &[T], skip_pictures: bool, mut on_error: F) -> Vec<FontName>
where
    T: ShapeHandle,
    F: FnMut(&crate::error::ShapeError),
{
    let mut fonts: Vec<FontName> = Vec::new();

    for shape in shapes {
        if skip_pictures && shape.shape_kind() == Some(ShapeKind::Picture) {
            continue;
        }
        match shape.text_font_names() {
            Ok(names) => {
                for name in names {
                    if !name.is_blank() && !fonts.contains(&name) {
                        fonts.push(name);
                    }
                }
            }
            Err(e) => on_error(&e),
        }
    }

    fonts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShapeError;
    use crate::normalize::FontMatching;
    use crate::oracle::StaticOracle;
    use crate::snapshot::{PresentationSnapshot, ScopeSnapshot, ShapeSnapshot, SlideSnapshot};
    use crate::types::Location;

    fn slide(number: usize) -> SlideIndex {
        SlideIndex::new(number).unwrap()
    }

    /// Three slides: installed and missing content fonts, a master-only
    /// font, and an inaccessible slide.
    fn sample_deck() -> PresentationSnapshot {
        PresentationSnapshot::new(vec![
            SlideSnapshot::new(
                vec![ShapeSnapshot::text("Arial"), ShapeSnapshot::text("Wingdings2")],
                vec![ShapeSnapshot::text("Wingdings2")],
            ),
            SlideSnapshot::new(
                vec![ShapeSnapshot::text("Calibri"), ShapeSnapshot::picture()],
                vec![ShapeSnapshot::text("Bahnschrift")],
            ),
            SlideSnapshot::from_scopes(
                ScopeSnapshot::failed("Slide is not accessible", None),
                ScopeSnapshot::shapes(vec![ShapeSnapshot::text("Calibri")]),
            ),
        ])
    }

    fn sample_oracle() -> StaticOracle {
        StaticOracle::new(["Arial", "Calibri"])
    }

    #[test]
    fn test_empty_presentation() {
        let scanner = Scanner::new(sample_oracle());
        let report = scanner.scan(&PresentationSnapshot::default()).unwrap();

        assert_eq!(report.slide_count, 0);
        assert!(report.used_slide_fonts.is_empty());
        assert!(report.missing_fonts.is_empty());
        assert!(report.skipped_slides.is_empty());
    }

    #[test]
    fn test_three_slide_scenario() {
        let scanner = Scanner::new(sample_oracle());
        let report = scanner.scan(&sample_deck()).unwrap();

        // every content font counts as used, installed or not
        let used: Vec<&str> = report.used_slide_fonts.iter().map(|f| f.as_str()).collect();
        assert_eq!(used, vec!["Arial", "Calibri", "Wingdings2"]);

        let names: Vec<&str> = report.missing_fonts.names().map(|f| f.as_str()).collect();
        assert_eq!(names, vec!["Wingdings2", "Bahnschrift"]);

        let wingdings = report.missing_fonts.get("Wingdings2").unwrap();
        assert_eq!(wingdings.locations, vec![Location::Slide(slide(1))]);
        assert!(wingdings.used_in_master);

        let bahnschrift = report.missing_fonts.get("Bahnschrift").unwrap();
        assert_eq!(bahnschrift.locations, vec![Location::MasterOnly]);
        assert!(bahnschrift.used_in_master);

        assert_eq!(report.skipped_slides, vec![slide(3)]);
    }

    #[test]
    fn test_scan_is_repeatable() {
        let scanner = Scanner::new(sample_oracle());
        let deck = sample_deck();
        assert_eq!(scanner.scan(&deck).unwrap(), scanner.scan(&deck).unwrap());
    }

    #[test]
    fn test_access_denied_on_master_skips_slide() {
        let deck = PresentationSnapshot::new(vec![SlideSnapshot::from_scopes(
            ScopeSnapshot::shapes(vec![ShapeSnapshot::text("Papyrus")]),
            ScopeSnapshot::failed("denied", Some("AccessDenied")),
        )]);
        let report = Scanner::new(sample_oracle()).scan(&deck).unwrap();

        assert_eq!(report.skipped_slides, vec![slide(1)]);
        assert!(report.used_slide_fonts.is_empty());
        assert!(report.missing_fonts.is_empty());
    }

    #[test]
    fn test_generic_scope_error_keeps_other_scope() {
        let deck = PresentationSnapshot::new(vec![
            SlideSnapshot::from_scopes(
                ScopeSnapshot::failed("InvalidArgument", None),
                ScopeSnapshot::shapes(vec![ShapeSnapshot::text("Bahnschrift")]),
            ),
            SlideSnapshot::new(vec![ShapeSnapshot::text("Papyrus")], vec![]),
        ]);
        let report = Scanner::new(sample_oracle()).scan(&deck).unwrap();

        assert!(report.skipped_slides.is_empty());
        assert_eq!(
            report.missing_fonts.get("Bahnschrift").unwrap().locations,
            vec![Location::MasterOnly]
        );
        assert_eq!(
            report.missing_fonts.get("Papyrus").unwrap().locations,
            vec![Location::Slide(slide(2))]
        );
    }

    #[test]
    fn test_unreadable_shape_is_ignored() {
        let deck = PresentationSnapshot::new(vec![SlideSnapshot::new(
            vec![ShapeSnapshot::unreadable("GeneralException"), ShapeSnapshot::text("Papyrus")],
            vec![],
        )]);
        let report = Scanner::new(sample_oracle()).scan(&deck).unwrap();

        assert_eq!(report.missing_fonts.len(), 1);
        assert!(report.missing_fonts.contains("Papyrus"));
    }

    #[test]
    fn test_enumeration_failure_is_fatal() {
        let deck = PresentationSnapshot::unavailable("Presentation is closed");
        let result = Scanner::new(sample_oracle()).scan(&deck);
        assert!(matches!(result, Err(Error::Enumeration(_))));
    }

    #[test]
    fn test_shapes_without_text_contribute_nothing() {
        let shapes =
            vec![ShapeSnapshot::picture(), ShapeSnapshot::default(), ShapeSnapshot::text("")];
        let mut errors = Vec::new();

        for skip_pictures in [true, false] {
            let fonts =
                extract_fonts(&shapes, skip_pictures, |e: &ShapeError| errors.push(e.clone()));
            assert!(fonts.is_empty());
        }
        assert!(errors.is_empty());
    }

    #[test]
    fn test_picture_filter_drops_captioned_pictures() {
        let captioned = ShapeSnapshot::picture().with_font("Papyrus");

        let filtered = extract_fonts(std::slice::from_ref(&captioned), true, |_| {});
        assert!(filtered.is_empty());

        let unfiltered = extract_fonts(std::slice::from_ref(&captioned), false, |_| {});
        assert_eq!(unfiltered, vec![FontName::from("Papyrus")]);
    }

    #[test]
    fn test_fonts_are_distinct_per_scope() {
        let shapes = vec![
            ShapeSnapshot::text("Arial"),
            ShapeSnapshot::text("Calibri"),
            ShapeSnapshot::text("Arial"),
        ];
        let fonts = extract_fonts(&shapes, true, |_| {});
        assert_eq!(fonts, vec![FontName::from("Arial"), FontName::from("Calibri")]);
    }

    #[test]
    fn test_folded_spellings_share_one_answer() {
        let deck = PresentationSnapshot::new(vec![
            SlideSnapshot::new(vec![ShapeSnapshot::text("Papyrus")], vec![]),
            SlideSnapshot::new(vec![ShapeSnapshot::text("PAPYRUS")], vec![]),
        ]);
        let options = AuditOptions::new().with_matching(FontMatching::Folded);

        let report = Scanner::new(StaticOracle::new(["Papyrus"]))
            .with_options(options.clone())
            .scan(&deck)
            .unwrap();
        assert_eq!(report.used_slide_fonts.len(), 1);
        assert!(report.missing_fonts.is_empty());

        // the first spelling decides for the whole family
        let report = Scanner::new(StaticOracle::new(["PAPYRUS"]))
            .with_options(options)
            .scan(&deck)
            .unwrap();
        let papyrus = report.missing_fonts.get("Papyrus").unwrap();
        assert_eq!(papyrus.locations, vec![Location::Slide(slide(1)), Location::Slide(slide(2))]);
        assert!(!report.missing_fonts.contains("PAPYRUS"));
    }
}
