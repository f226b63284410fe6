//! Item specifications and result records
//!
//! These types spell out the two external contracts verbatim: the `items`
//! array of the run configuration and the record array of the produced
//! dataset. Field names and enum spellings are wire format, consumed by the
//! downstream review and template-filling tools, and must not drift.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The literal marker stored in `extracted_value` when no value was accepted.
pub const NULL_VALUE: &str = "null";

/// Document format of a configured item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    /// Word-processor document (.docx)
    Word,
    /// Spreadsheet workbook (.xlsx and friends)
    Excel,
    /// Portable Document Format
    Pdf,
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocType::Word => write!(f, "word"),
            DocType::Excel => write!(f, "excel"),
            DocType::Pdf => write!(f, "pdf"),
        }
    }
}

/// One configured extraction task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSpec {
    /// Display key for the extracted value; not required to be unique
    pub data_name: String,

    /// Path relative to the configured root; empty means "not specified"
    #[serde(default)]
    pub file: String,

    /// Document format used to pick the extraction adapter
    #[serde(rename = "type")]
    pub doc_type: DocType,

    /// Keyword hints embedded in the model prompt
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Outcome of a single item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// The model produced an accepted value
    Found,
    /// No value was accepted; `reason` says why
    NotFound,
}

/// Closed set of diagnostic reasons for items that produced no value.
///
/// The serialized spellings are part of the dataset contract. A path that
/// escapes the root is classified as `FileMissing` (the item has no usable
/// file); the distinction survives only in the log stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailReason {
    /// No file configured, path unresolvable, or not a regular file
    #[serde(rename = "file missing or not specified")]
    FileMissing,
    /// The extraction adapter failed or produced blank text
    #[serde(rename = "text extraction failed")]
    ExtractionFailed,
    /// The item has no keyword hints, so the model was never asked
    #[serde(rename = "no keywords configured")]
    NoKeywords,
    /// The model replied, but cleaning rejected every candidate line
    #[serde(rename = "model found no value")]
    ValueNotFound,
}

impl fmt::Display for FailReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailReason::FileMissing => write!(f, "file missing or not specified"),
            FailReason::ExtractionFailed => write!(f, "text extraction failed"),
            FailReason::NoKeywords => write!(f, "no keywords configured"),
            FailReason::ValueNotFound => write!(f, "model found no value"),
        }
    }
}

/// Per-item result record, one per configured item, in config order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Display key copied from the item
    pub data_name: String,

    /// Relative path copied from the item
    pub file: String,

    /// Document format copied from the item
    #[serde(rename = "type")]
    pub doc_type: DocType,

    /// Keyword hints copied from the item
    pub keywords: Vec<String>,

    /// Accepted value, or the literal `"null"` marker
    pub extracted_value: String,

    /// Whether a value was accepted
    pub status: ItemStatus,

    /// Present only when `status` is `NotFound`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailReason>,
}

impl ItemRecord {
    /// Record for an item whose model reply was accepted.
    pub fn found(spec: &ItemSpec, value: impl Into<String>) -> Self {
        Self {
            data_name: spec.data_name.clone(),
            file: spec.file.clone(),
            doc_type: spec.doc_type,
            keywords: spec.keywords.clone(),
            extracted_value: value.into(),
            status: ItemStatus::Found,
            reason: None,
        }
    }

    /// Record for an item that produced no value.
    pub fn not_found(spec: &ItemSpec, reason: FailReason) -> Self {
        Self {
            data_name: spec.data_name.clone(),
            file: spec.file.clone(),
            doc_type: spec.doc_type,
            keywords: spec.keywords.clone(),
            extracted_value: NULL_VALUE.to_string(),
            status: ItemStatus::NotFound,
            reason: Some(reason),
        }
    }
}
