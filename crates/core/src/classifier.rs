//! Classification of the fonts found on each slide.
//!
//! Classifying a slide is a read-only step against the running
//! [`FontLedger`] that yields a [`SlideDelta`]; the ledger is the single
//! writer and folds deltas in slide order.

use crate::normalize::FontMatching;
use crate::oracle::FontOracle;
use crate::options::MasterCheck;
use crate::types::{
    ClassifiedFont, FontName, FontReference, MissingFonts, ScanReport, Scope, SlideIndex,
};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Distinct fonts found in the two scopes of one slide, in detection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideFonts {
    /// Fonts of shapes placed on the slide.
    pub content: Vec<FontName>,

    /// Fonts of shapes on the slide's layout or master.
    pub master: Vec<FontName>,
}

impl SlideFonts {
    /// One reference per font and scope, slide content first.
    pub fn references(&self, slide: SlideIndex) -> impl Iterator<Item = FontReference> + '_ {
        let content = self.content.iter().map(move |font| FontReference {
            font: font.clone(),
            slide,
            scope: Scope::SlideContent,
        });
        let master = self.master.iter().map(move |font| FontReference {
            font: font.clone(),
            slide,
            scope: Scope::MasterContent,
        });
        content.chain(master)
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.master.is_empty()
    }
}

/// What one slide adds to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideDelta {
    pub slide: SlideIndex,

    /// Distinct fonts in this slide's content.
    pub content: Vec<FontName>,

    /// Fonts seen in this slide's layout or master.
    pub master: Vec<FontName>,

    /// Content fonts judged not installed.
    pub missing_in_slide: Vec<FontName>,

    /// Layout or master fonts judged not installed and not shadowed by slide content.
    pub missing_master_only: Vec<FontName>,

    /// Layout or master fonts judged not installed whose shadowing is decided
    /// after the last slide.
    pub deferred_master: Vec<FontName>,
}

impl SlideDelta {
    fn new(slide: SlideIndex) -> Self {
        Self {
            slide,
            content: Vec::new(),
            master: Vec::new(),
            missing_in_slide: Vec::new(),
            missing_master_only: Vec::new(),
            deferred_master: Vec::new(),
        }
    }
}

/// Decides installed / missing-in-slide / missing-in-master-only per font.
#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier {
    matching: FontMatching,
    master_check: MasterCheck,
}

impl Classifier {
    pub fn new(matching: FontMatching, master_check: MasterCheck) -> Self {
        Self {
            matching,
            master_check,
        }
    }

    /// Classify one slide's fonts against the ledger as built so far.
    pub fn classify<O: FontOracle + ?Sized>(
        &self,
        ledger: &FontLedger,
        slide: SlideIndex,
        fonts: &SlideFonts,
        oracle: &O,
    ) -> SlideDelta {
        let mut delta = SlideDelta::new(slide);
        let mut content_keys = HashSet::new();

        for font in &fonts.content {
            let key = self.matching.key(font.as_str()).into_owned();
            if !content_keys.insert(key) {
                continue;
            }
            delta.content.push(font.clone());
            if !oracle.is_installed(font.as_str()) {
                log::debug!("Slide {}: '{}' is not installed", slide, font);
                delta.missing_in_slide.push(font.clone());
            }
        }

        let mut master_keys = HashSet::new();
        for font in &fonts.master {
            let key = self.matching.key(font.as_str()).into_owned();
            if !master_keys.insert(key.clone()) {
                continue;
            }
            delta.master.push(font.clone());
            if oracle.is_installed(font.as_str()) {
                continue;
            }
            match self.master_check {
                MasterCheck::Cumulative => {
                    let shadowed = content_keys.contains(&key) || ledger.used_in_slides(&key);
                    if !shadowed {
                        log::debug!("Slide {}: '{}' is missing from layout only", slide, font);
                        delta.missing_master_only.push(font.clone());
                    }
                }
                MasterCheck::Final => delta.deferred_master.push(font.clone()),
            }
        }

        delta
    }
}

/// The running aggregate of a scan.
#[derive(Debug, Default)]
pub struct FontLedger {
    matching: FontMatching,
    used_slide_fonts: HashMap<String, FontName>,
    used_master_fonts: HashMap<String, FontName>,
    missing_fonts: MissingFonts,
    missing_index: HashMap<String, usize>,
    deferred_master: Vec<(String, FontName)>,
    skipped_slides: Vec<SlideIndex>,
}

impl FontLedger {
    pub fn new(matching: FontMatching) -> Self {
        Self {
            matching,
            ..Self::default()
        }
    }

    /// Whether any slide content folded so far uses the font with this key.
    pub fn used_in_slides(&self, key: &str) -> bool {
        self.used_slide_fonts.contains_key(key)
    }

    /// Fold one slide's classification into the ledger.
    pub fn apply(&mut self, delta: SlideDelta) {
        for font in delta.content {
            let key = self.key_of(&font);
            self.used_slide_fonts.entry(key).or_insert(font);
        }
        for font in delta.master {
            let key = self.key_of(&font);
            self.used_master_fonts.entry(key).or_insert(font);
        }
        for font in delta.missing_in_slide {
            self.entry(font).add_slide(delta.slide);
        }
        for font in delta.missing_master_only {
            self.entry(font).tag_master_only();
        }
        for font in delta.deferred_master {
            let key = self.key_of(&font);
            if !self.deferred_master.iter().any(|(pending, _)| *pending == key) {
                self.deferred_master.push((key, font));
            }
        }
    }

    /// Record a slide whose content could not be accessed.
    pub fn skip(&mut self, slide: SlideIndex) {
        self.skipped_slides.push(slide);
    }

    /// Close the ledger into a report.
    pub fn finish(mut self, slide_count: usize) -> ScanReport {
        for (key, font) in std::mem::take(&mut self.deferred_master) {
            if !self.used_slide_fonts.contains_key(&key) {
                self.entry(font).tag_master_only();
            }
        }

        let matching = self.matching;
        for font in self.missing_fonts.iter_mut() {
            let key = matching.key(font.name.as_str());
            font.used_in_master = self.used_master_fonts.contains_key(&*key);
        }

        ScanReport {
            slide_count,
            used_slide_fonts: self.used_slide_fonts.into_values().collect::<BTreeSet<_>>(),
            used_master_fonts: self.used_master_fonts.into_values().collect::<BTreeSet<_>>(),
            missing_fonts: self.missing_fonts,
            skipped_slides: self.skipped_slides,
        }
    }

    fn key_of(&self, font: &FontName) -> String {
        self.matching.key(font.as_str()).into_owned()
    }

    fn entry(&mut self, font: FontName) -> &mut ClassifiedFont {
        let key = self.key_of(&font);
        let position = match self.missing_index.get(&key) {
            Some(&position) => position,
            None => {
                let position = self.missing_fonts.push(ClassifiedFont::new(font));
                self.missing_index.insert(key, position);
                position
            }
        };
        self.missing_fonts.at_mut(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::StaticOracle;
    use crate::types::Location;

    fn slide(number: usize) -> SlideIndex {
        SlideIndex::new(number).unwrap()
    }

    fn fonts(content: &[&str], master: &[&str]) -> SlideFonts {
        SlideFonts {
            content: content.iter().map(|&f| FontName::from(f)).collect(),
            master: master.iter().map(|&f| FontName::from(f)).collect(),
        }
    }

    fn fold(classifier: Classifier, oracle: &StaticOracle, slides: &[SlideFonts]) -> ScanReport {
        let mut ledger = FontLedger::new(FontMatching::Exact);
        for (position, slide_fonts) in slides.iter().enumerate() {
            let index = SlideIndex::from_position(position);
            let delta = classifier.classify(&ledger, index, slide_fonts, oracle);
            ledger.apply(delta);
        }
        ledger.finish(slides.len())
    }

    #[test]
    fn test_content_font_missing_on_each_slide() {
        let oracle = StaticOracle::new(["Arial"]);
        let report = fold(
            Classifier::default(),
            &oracle,
            &[fonts(&["Arial", "Papyrus"], &[]), fonts(&["Papyrus"], &[])],
        );

        let papyrus = report.missing_fonts.get("Papyrus").unwrap();
        assert_eq!(papyrus.locations, vec![Location::Slide(slide(1)), Location::Slide(slide(2))]);
        assert!(!papyrus.used_in_master);
        assert!(!report.missing_fonts.contains("Arial"));
    }

    #[test]
    fn test_master_only_font_tagged_once() {
        let oracle = StaticOracle::new(["Calibri"]);
        let report = fold(
            Classifier::default(),
            &oracle,
            &[
                fonts(&["Calibri"], &["Bahnschrift"]),
                fonts(&["Calibri"], &["Bahnschrift"]),
                fonts(&[], &["Bahnschrift"]),
            ],
        );

        assert_eq!(report.missing_fonts.len(), 1);
        let bahnschrift = report.missing_fonts.get("Bahnschrift").unwrap();
        assert_eq!(bahnschrift.locations, vec![Location::MasterOnly]);
        assert!(bahnschrift.used_in_master);
    }

    #[test]
    fn test_slide_content_shadows_master_only_tag() {
        let oracle = StaticOracle::default();
        let report =
            fold(Classifier::default(), &oracle, &[fonts(&["Wingdings2"], &["Wingdings2"])]);

        let wingdings = report.missing_fonts.get("Wingdings2").unwrap();
        assert_eq!(wingdings.locations, vec![Location::Slide(slide(1))]);
        assert!(wingdings.used_in_master);
    }

    #[test]
    fn test_cumulative_check_tags_font_used_on_later_slide() {
        let oracle = StaticOracle::default();
        let slides = [fonts(&[], &["Papyrus"]), fonts(&["Papyrus"], &[])];
        let report = fold(Classifier::default(), &oracle, &slides);

        let papyrus = report.missing_fonts.get("Papyrus").unwrap();
        assert_eq!(papyrus.locations, vec![Location::MasterOnly, Location::Slide(slide(2))]);
    }

    #[test]
    fn test_final_check_uses_whole_presentation() {
        let oracle = StaticOracle::default();
        let classifier = Classifier::new(FontMatching::Exact, MasterCheck::Final);
        let slides = [
            fonts(&[], &["Papyrus", "Bahnschrift"]),
            fonts(&["Papyrus"], &[]),
        ];
        let report = fold(classifier, &oracle, &slides);

        let names: Vec<&str> = report.missing_fonts.names().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["Papyrus", "Bahnschrift"]);
        assert_eq!(
            report.missing_fonts.get("Papyrus").unwrap().locations,
            vec![Location::Slide(slide(2))]
        );
        assert_eq!(
            report.missing_fonts.get("Bahnschrift").unwrap().locations,
            vec![Location::MasterOnly]
        );
    }

    #[test]
    fn test_folded_matching_merges_spellings() {
        let oracle = StaticOracle::default();
        let classifier = Classifier::new(FontMatching::Folded, MasterCheck::Cumulative);
        let mut ledger = FontLedger::new(FontMatching::Folded);
        let slide_fonts = fonts(&["Papyrus", "PAPYRUS"], &["papyrus"]);
        let delta = classifier.classify(&ledger, slide(1), &slide_fonts, &oracle);
        ledger.apply(delta);
        let report = ledger.finish(1);

        assert_eq!(report.used_slide_fonts.len(), 1);
        assert_eq!(report.missing_fonts.len(), 1);
        let papyrus = report.missing_fonts.get("Papyrus").unwrap();
        assert_eq!(papyrus.locations, vec![Location::Slide(slide(1))]);
        assert!(papyrus.used_in_master);
    }

    #[test]
    fn test_references_list_content_first() {
        let refs: Vec<FontReference> =
            fonts(&["Arial"], &["Calibri"]).references(slide(2)).collect();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].scope, Scope::SlideContent);
        assert_eq!(refs[1].font.as_str(), "Calibri");
        assert_eq!(refs[1].slide, slide(2));
    }
}
