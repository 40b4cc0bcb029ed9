//! Scan configuration.

use crate::normalize::FontMatching;
use serde::{Deserialize, Serialize};

/// Which slide-content fonts suppress the master-only tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MasterCheck {
    /// Fonts seen in slide content up to and including the current slide.
    /// A font used in content only on a later slide can still be tagged.
    #[default]
    Cumulative,
    /// Fonts seen in slide content anywhere in the presentation. Master-only
    /// entries are decided after the last slide and listed after the others.
    Final,
}

/// Options controlling a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuditOptions {
    /// Drop picture shapes before looking at text.
    pub skip_pictures: bool,

    /// How font names are compared.
    pub matching: FontMatching,

    /// How the master-only tag is decided.
    pub master_check: MasterCheck,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            skip_pictures: true,
            matching: FontMatching::Exact,
            master_check: MasterCheck::Cumulative,
        }
    }
}

impl AuditOptions {
    /// Create options with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether picture shapes are dropped before text extraction.
    pub fn with_picture_filter(mut self, skip_pictures: bool) -> Self {
        self.skip_pictures = skip_pictures;
        self
    }

    /// Set the font name matching policy.
    pub fn with_matching(mut self, matching: FontMatching) -> Self {
        self.matching = matching;
        self
    }

    /// Set how the master-only tag is decided.
    pub fn with_master_check(mut self, master_check: MasterCheck) -> Self {
        self.master_check = master_check;
        self
    }
}
