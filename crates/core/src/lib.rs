//! Font usage scanning, classification, and reporting for presentation
//! documents.
//!
//! A [`Scanner`] walks a [`DocumentSource`], collects the fonts used by each
//! slide's own content and by its layout or master, and asks a
//! [`FontOracle`] which of them are installed. The resulting [`ScanReport`]
//! is rendered by a [`Reporter`].

pub mod classifier;
pub mod error;
pub mod normalize;
pub mod options;
pub mod oracle;
pub mod report;
pub mod scanner;
pub mod snapshot;
pub mod source;
pub mod types;

pub use classifier::{Classifier, FontLedger, SlideDelta, SlideFonts};
pub use error::{Error, OracleError, Result, ShapeError, SourceError};
pub use normalize::FontMatching;
pub use options::{AuditOptions, MasterCheck};
pub use oracle::{
    AssumeInstalled, CachedOracle, FailOpen, FontOracle, FontProbe, StaticOracle, WithOverrides,
};
pub use report::{RenderedReport, ReportLine, Reporter};
pub use scanner::{Scanner, SlideRead};
pub use snapshot::{HostFailure, PresentationSnapshot, ScopeSnapshot, ShapeSnapshot, SlideSnapshot};
pub use source::{DocumentSource, ShapeHandle, ShapeKind, SlideHandle};
pub use types::{
    ClassifiedFont, FontName, FontReference, Location, MissingFonts, ScanReport, Scope, SlideIndex,
};

/// Scan a source and render the result with default reporter settings.
pub fn audit<S, O>(
    source: &S,
    oracle: O,
    options: AuditOptions,
) -> Result<(ScanReport, RenderedReport)>
where
    S: DocumentSource,
    O: FontOracle,
{
    let report = Scanner::new(oracle).with_options(options).scan(source)?;
    let rendered = Reporter::new().render(&report);
    Ok((report, rendered))
}
