//! Installed-font detection against the system font database.
//!
//! Fonts are discovered through `fontdb`. Two probe strategies are offered:
//!
//! - [`ProbeStrategy::Resolution`] asks the database whether any face
//!   carries the family name.
//! - [`ProbeStrategy::Metrics`] mimics a text renderer: it measures a probe
//!   string in the named family (falling back to a monospace face when the
//!   family is unknown) and in the monospace face alone, and calls the font
//!   installed when the widths differ. A font whose metrics happen to match
//!   the fallback for the probe string is reported missing.
//!
//! Probe failures surface as [`OracleError`]s; wrap the probe in
//! [`FailOpen`] (see [`system_oracle`]) to treat them as "installed".

use fontaudit_core::{FailOpen, FontProbe, OracleError};
use fontdb::{Database, Family, Query, ID};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// String measured by the metrics strategy.
pub const PROBE_TEXT: &str = "mmmmmmmmmmlli";

/// Pixel size the probe string is measured at.
pub const PROBE_SIZE_PX: f32 = 72.0;

/// How a font is judged installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProbeStrategy {
    /// A face with the family name exists in the database.
    #[default]
    Resolution,
    /// The probe string renders at a different width than the fallback.
    Metrics,
}

impl FromStr for ProbeStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "resolution" => Ok(Self::Resolution),
            "metrics" => Ok(Self::Metrics),
            other => Err(format!(
                "unknown probe strategy '{}' (expected resolution or metrics)",
                other
            )),
        }
    }
}

impl fmt::Display for ProbeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolution => f.write_str("resolution"),
            Self::Metrics => f.write_str("metrics"),
        }
    }
}

/// Probes the fonts known to a `fontdb` database.
pub struct SystemFontProbe {
    db: Database,
    strategy: ProbeStrategy,
    fallback: Option<ID>,
}

impl fmt::Debug for SystemFontProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemFontProbe")
            .field("faces", &self.db.len())
            .field("strategy", &self.strategy)
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl SystemFontProbe {
    /// Load the system fonts.
    pub fn load(strategy: ProbeStrategy) -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        log::debug!("Loaded {} system font face(s)", db.len());
        Self::from_database(db, strategy)
    }

    /// Probe an already populated database.
    pub fn from_database(db: Database, strategy: ProbeStrategy) -> Self {
        let fallback = find_fallback(&db);
        Self { db, strategy, fallback }
    }

    /// Number of font faces known to the probe.
    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    pub fn strategy(&self) -> ProbeStrategy {
        self.strategy
    }

    fn lookup(&self, name: &str) -> Option<ID> {
        let families = [Family::Name(name)];
        self.db.query(&Query {
            families: &families,
            ..Query::default()
        })
    }

    fn probe_width(&self, id: ID) -> Result<f32, OracleError> {
        self.db
            .with_face_data(id, |data, index| measure(data, index, PROBE_TEXT, PROBE_SIZE_PX))
            .ok_or_else(|| OracleError::Probe("font face data unavailable".to_string()))?
    }
}

impl FontProbe for SystemFontProbe {
    fn probe(&self, name: &str) -> Result<bool, OracleError> {
        if self.db.is_empty() {
            return Err(OracleError::NoSurface);
        }

        match self.strategy {
            ProbeStrategy::Resolution => Ok(self.lookup(name).is_some()),
            ProbeStrategy::Metrics => {
                let fallback = self
                    .fallback
                    .ok_or_else(|| OracleError::Probe("no monospace fallback face".to_string()))?;
                let baseline = self.probe_width(fallback)?;
                let applied = self.lookup(name).unwrap_or(fallback);
                let width = self.probe_width(applied)?;
                Ok((width - baseline).abs() > f32::EPSILON)
            }
        }
    }
}

/// The system font oracle: a [`SystemFontProbe`] that fails open.
pub fn system_oracle(strategy: ProbeStrategy) -> FailOpen<SystemFontProbe> {
    FailOpen::new(SystemFontProbe::load(strategy))
}

/// The face a renderer falls back to: the configured monospace family, else
/// any face flagged monospaced.
fn find_fallback(db: &Database) -> Option<ID> {
    db.query(&Query {
        families: &[Family::Monospace],
        ..Query::default()
    })
    .or_else(|| db.faces().find(|face| face.monospaced).map(|face| face.id))
}

/// Advance width of `text` in pixels at `size_px`.
///
/// Characters the face has no glyph for are measured with the `.notdef` glyph.
fn measure(data: &[u8], index: u32, text: &str, size_px: f32) -> Result<f32, OracleError> {
    let face = ttf_parser::Face::parse(data, index).map_err(|e| OracleError::Probe(e.to_string()))?;
    let units_per_em = face.units_per_em();
    if units_per_em == 0 {
        return Err(OracleError::Probe("face has no units per em".to_string()));
    }

    let units: u32 = text
        .chars()
        .map(|c| {
            let glyph = face.glyph_index(c).unwrap_or(ttf_parser::GlyphId(0));
            u32::from(face.glyph_hor_advance(glyph).unwrap_or(0))
        })
        .sum();

    Ok(units as f32 * size_px / f32::from(units_per_em))
}
