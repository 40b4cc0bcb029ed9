//! WASM bindings for presentation font auditing.
//!
//! The JavaScript host (a document-editing add-in) captures a slide snapshot
//! from its live document model, or hands over the raw bytes of a .pptx file,
//! together with an `isInstalled(fontName) -> boolean` callback. Results come
//! back as plain objects: the scan report and its rendered line records.

use fontaudit_core::report::failure_text;
use fontaudit_core::{
    AuditOptions, DocumentSource, FailOpen, FontOracle, FontProbe, OracleError,
    PresentationSnapshot, RenderedReport, Reporter, ScanReport,
};
use fontaudit_pptx::PptxSource;
use js_sys::Function;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Result of scanning a presentation.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    /// The scan report.
    pub report: ScanReport,
    /// The report rendered as tagged lines, plus the flat missing-font list.
    pub rendered: RenderedReport,
}

/// Font probe that calls back into JavaScript.
struct JsFontProbe {
    callback: Function,
}

impl FontProbe for JsFontProbe {
    fn probe(&self, name: &str) -> Result<bool, OracleError> {
        let value = self
            .callback
            .call1(&JsValue::NULL, &JsValue::from_str(name))
            .map_err(|e| OracleError::Probe(format!("{:?}", e)))?;
        value
            .as_bool()
            .ok_or_else(|| OracleError::Probe("isInstalled did not return a boolean".to_string()))
    }
}

/// Scan a slide snapshot captured by the host.
///
/// # Arguments
/// * `snapshot` - The slides with their content and layout shapes
/// * `is_installed` - `(fontName: string) => boolean`; throwing counts as installed
/// * `options` - Optional scan options object
///
/// # Returns
/// A JavaScript object `{ report, rendered }`, or throws the error text.
#[wasm_bindgen]
pub fn scan_snapshot(
    snapshot: JsValue,
    is_installed: &Function,
    options: JsValue,
) -> Result<JsValue, JsValue> {
    let snapshot: PresentationSnapshot = serde_wasm_bindgen::from_value(snapshot)
        .map_err(|e| JsValue::from_str(&format!("Invalid slide snapshot: {}", e)))?;
    let options = parse_options(options)?;
    let oracle = FailOpen::new(JsFontProbe {
        callback: is_installed.clone(),
    });

    let result = scan_impl(&snapshot, oracle, options).map_err(|e| JsValue::from_str(&e))?;
    to_js(&result)
}

/// Scan the raw bytes of a .pptx file.
#[wasm_bindgen]
pub fn scan_pptx(
    data: &[u8],
    is_installed: &Function,
    options: JsValue,
) -> Result<JsValue, JsValue> {
    let options = parse_options(options)?;
    let oracle = FailOpen::new(JsFontProbe {
        callback: is_installed.clone(),
    });

    let result = scan_pptx_impl(data, oracle, options).map_err(|e| JsValue::from_str(&e))?;
    to_js(&result)
}

/// Render a report object previously returned by a scan.
#[wasm_bindgen]
pub fn render_report(report: JsValue) -> Result<JsValue, JsValue> {
    let report: ScanReport = serde_wasm_bindgen::from_value(report)
        .map_err(|e| JsValue::from_str(&format!("Invalid report: {}", e)))?;
    to_js(&Reporter::new().render(&report))
}

fn parse_options(options: JsValue) -> Result<AuditOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(AuditOptions::default());
    }
    serde_wasm_bindgen::from_value(options)
        .map_err(|e| JsValue::from_str(&format!("Invalid options: {}", e)))
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn scan_impl<S: DocumentSource, O: FontOracle>(
    source: &S,
    oracle: O,
    options: AuditOptions,
) -> Result<ScanResult, String> {
    let (report, rendered) = fontaudit_core::audit(source, oracle, options).map_err(|e| {
        log::error!("Font scan failed: {}", e);
        failure_text(&e)
    })?;
    Ok(ScanResult { report, rendered })
}

fn scan_pptx_impl<O: FontOracle>(
    data: &[u8],
    oracle: O,
    options: AuditOptions,
) -> Result<ScanResult, String> {
    let source = PptxSource::open(Cursor::new(data)).map_err(|e| failure_text(&e))?;
    scan_impl(&source, oracle, options)
}
