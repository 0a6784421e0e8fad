//! Per-item results and the batch report returned to callers.
//!
//! The wire shape is a flat JSON array: one object per uploaded file, in
//! upload order, optionally followed by one EER object.
//!
//! ```text
//! [
//!   {"filename": "a.wav", "label": "Genuine", "confidence": 0.12, "status": "success"},
//!   {"filename": "b.mp3", "error": "Invalid file format ...", "status": "failed"},
//!   {"EER": "12.50%", "threshold": 0.31}
//! ]
//! ```

use serde::{Deserialize, Serialize};

use crate::metrics::{BatchScores, EerResult};
use crate::model::{Label, ScoreRecord};

// ---------------------------------------------------------------------------
// UploadedFile
// ---------------------------------------------------------------------------

/// One file of a batch, exactly as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

// ---------------------------------------------------------------------------
// ItemResult
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Success,
    Failed,
}

/// Outcome for one uploaded file.
///
/// `label` and `confidence` are present iff `status` is `success`; `error` is
/// present iff it is `failed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemResult {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub status: ItemStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ItemResult {
    pub fn success(filename: impl Into<String>, record: &ScoreRecord) -> Self {
        Self {
            filename: filename.into(),
            label: Some(record.label),
            confidence: Some(record.confidence),
            status: ItemStatus::Success,
            error: None,
        }
    }

    pub fn failed(filename: impl Into<String>, error: impl ToString) -> Self {
        Self {
            filename: filename.into(),
            label: None,
            confidence: None,
            status: ItemStatus::Failed,
            error: Some(error.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ItemStatus::Success
    }
}

// ---------------------------------------------------------------------------
// EerSummary
// ---------------------------------------------------------------------------

/// Trailing entry of a batch that could be evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EerSummary {
    /// EER as a percentage string with two decimals, e.g. `"12.50%"`.
    #[serde(rename = "EER")]
    pub eer: String,
    pub threshold: f64,
}

impl From<&EerResult> for EerSummary {
    fn from(result: &EerResult) -> Self {
        Self {
            eer: format!("{:.2}%", result.percentage()),
            threshold: result.threshold,
        }
    }
}

// ---------------------------------------------------------------------------
// ResponseEntry
// ---------------------------------------------------------------------------

/// One element of the serialized response array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseEntry {
    Item(ItemResult),
    Eer(EerSummary),
}

// ---------------------------------------------------------------------------
// BatchReport
// ---------------------------------------------------------------------------

/// Everything one batch produced.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    /// One result per input, in input order.
    pub items: Vec<ItemResult>,
    /// `None` when either label collection was empty.
    pub eer: Option<EerResult>,
    /// The collected confidences behind `eer`.
    pub scores: BatchScores,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|i| i.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.items.len() - self.succeeded()
    }

    /// Flatten into the response array: items first, then the EER entry.
    pub fn into_entries(self) -> Vec<ResponseEntry> {
        let summary = self.eer.as_ref().map(EerSummary::from);
        self.items
            .into_iter()
            .map(ResponseEntry::Item)
            .chain(summary.map(ResponseEntry::Eer))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::score_logits;
    use serde_json::json;

    #[test]
    fn success_item_serializes_without_error_field() {
        let record = score_logits(&[2.0, 0.0]).unwrap();
        let item = ItemResult::success("a.wav", &record);
        let v = serde_json::to_value(&item).unwrap();
        assert_eq!(v["filename"], "a.wav");
        assert_eq!(v["label"], "Genuine");
        assert_eq!(v["status"], "success");
        assert!((v["confidence"].as_f64().unwrap() - record.confidence).abs() < 1e-12);
        assert!(v.get("error").is_none());
    }

    #[test]
    fn failed_item_serializes_without_label() {
        let item = ItemResult::failed("b.mp3", "Invalid file format");
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({"filename": "b.mp3", "error": "Invalid file format", "status": "failed"})
        );
    }

    #[test]
    fn eer_summary_formats_percentage() {
        let result = crate::metrics::EerEstimator::compute(&[0.5, 0.5], &[0.5, 0.5]).unwrap();
        let summary = EerSummary::from(&result);
        assert_eq!(summary.eer, "50.00%");
        let v = serde_json::to_value(&summary).unwrap();
        assert_eq!(v["EER"], "50.00%");
        assert!(v["threshold"].is_f64());
    }

    #[test]
    fn entries_put_eer_last() {
        let result = crate::metrics::EerEstimator::compute(&[0.1], &[0.4]).unwrap();
        let report = BatchReport {
            items: vec![
                ItemResult::success("a.wav", &score_logits(&[3.0, 0.0]).unwrap()),
                ItemResult::failed("b.txt", "nope"),
            ],
            eer: Some(result),
            scores: BatchScores::new(),
        };
        assert_eq!((report.succeeded(), report.failed()), (1, 1));

        let entries = report.into_entries();
        assert_eq!(entries.len(), 3);
        assert!(matches!(entries[0], ResponseEntry::Item(_)));
        assert!(matches!(entries[2], ResponseEntry::Eer(_)));
    }

    #[test]
    fn entries_without_eer_are_items_only() {
        let report = BatchReport {
            items: vec![ItemResult::failed("x.wav", "bad")],
            eer: None,
            scores: BatchScores::new(),
        };
        assert_eq!(report.into_entries().len(), 1);
    }

    #[test]
    fn entries_deserialize_back_into_their_variants() {
        let v = json!([
            {"filename": "a.wav", "label": "Spoof", "confidence": 0.2, "status": "success"},
            {"EER": "0.00%", "threshold": 0.3}
        ]);
        let entries: Vec<ResponseEntry> = serde_json::from_value(v).unwrap();
        assert!(matches!(&entries[0], ResponseEntry::Item(i) if i.label == Some(Label::Spoof)));
        assert!(matches!(&entries[1], ResponseEntry::Eer(e) if e.eer == "0.00%"));
    }
}
