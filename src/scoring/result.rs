//! Best-effort parsing of the external scoring response.
//!
//! The response schema is owned by the scoring service and is not guaranteed
//! stable.  [`ScoreResult`] therefore models every field as optional and is
//! extracted from untyped JSON — an unrecognised or missing field is simply
//! absent, never a parse error.  `per_word` and `summary` are carried
//! verbatim for display and never influence the verdict.

use serde_json::Value;

// ---------------------------------------------------------------------------
// ScoreResult
// ---------------------------------------------------------------------------

/// Normalised view of one scoring-service response.
///
/// Immutable once constructed; held until the next recording session
/// discards it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreResult {
    /// ASR transcript, from top-level `asr_text` or nested `_meta.asr_text`.
    pub asr_text: Option<String>,

    /// General score, raw scale as received ([0,1] or (1,100]).
    pub score: Option<f64>,

    /// Overall score, raw scale as received.
    pub overall_score: Option<f64>,

    /// Percentage score, raw scale as received.
    pub score_percent: Option<f64>,

    /// Accuracy, raw scale as received.
    pub accuracy: Option<f64>,

    /// Per-word detail payload, display only.
    pub per_word: Option<Value>,

    /// Summary payload, display only.
    pub summary: Option<Value>,

    /// The full response payload as received, forwarded verbatim to the
    /// feedback service.  `Value::Null` when constructed empty.
    pub raw: Value,
}

impl ScoreResult {
    /// Extract a `ScoreResult` from an arbitrary JSON value.
    ///
    /// Never fails: anything that is not an object with recognised fields
    /// yields an empty result.
    pub fn from_value(value: &Value) -> Self {
        let asr_text = value
            .get("asr_text")
            .and_then(Value::as_str)
            .or_else(|| {
                value
                    .get("_meta")
                    .and_then(|m| m.get("asr_text"))
                    .and_then(Value::as_str)
            })
            .map(str::to_owned);

        Self {
            asr_text,
            score: value.get("score").and_then(Value::as_f64),
            overall_score: value.get("overall_score").and_then(Value::as_f64),
            score_percent: value.get("score_percent").and_then(Value::as_f64),
            accuracy: value.get("accuracy").and_then(Value::as_f64),
            per_word: value.get("per_word").cloned(),
            summary: value.get("summary").cloned(),
            raw: value.clone(),
        }
    }

    /// The recognised numeric fields that are present, in the fixed priority
    /// order `score`, `overall_score`, `score_percent`, `accuracy`, each
    /// normalised to `[0, 1]` (values above 1 are treated as percentages and
    /// divided by 100).
    pub fn normalized_scores(&self) -> Vec<f64> {
        [self.score, self.overall_score, self.score_percent, self.accuracy]
            .into_iter()
            .flatten()
            .map(normalize_score)
            .collect()
    }
}

/// Map a raw score to `[0, 1]`: values above 1 are percentage-scaled.
pub fn normalize_score(raw: f64) -> f64 {
    if raw > 1.0 {
        raw / 100.0
    } else {
        raw
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ---- extraction --------------------------------------------------------

    fn assert_no_fields(result: &ScoreResult) {
        assert!(result.asr_text.is_none());
        assert!(result.score.is_none());
        assert!(result.overall_score.is_none());
        assert!(result.score_percent.is_none());
        assert!(result.accuracy.is_none());
        assert!(result.per_word.is_none());
        assert!(result.summary.is_none());
    }

    #[test]
    fn empty_object_yields_empty_result() {
        let result = ScoreResult::from_value(&json!({}));
        assert_no_fields(&result);
        assert_eq!(result.raw, json!({}));
    }

    #[test]
    fn non_object_yields_empty_result() {
        for value in [json!(null), json!(42), json!("text"), json!([1, 2])] {
            assert_no_fields(&ScoreResult::from_value(&value));
        }
    }

    #[test]
    fn top_level_asr_text_is_extracted() {
        let result = ScoreResult::from_value(&json!({ "asr_text": "banana" }));
        assert_eq!(result.asr_text.as_deref(), Some("banana"));
    }

    #[test]
    fn nested_meta_asr_text_is_extracted() {
        let result = ScoreResult::from_value(&json!({ "_meta": { "asr_text": "banana" } }));
        assert_eq!(result.asr_text.as_deref(), Some("banana"));
    }

    #[test]
    fn top_level_asr_text_wins_over_nested() {
        let result = ScoreResult::from_value(&json!({
            "asr_text": "top",
            "_meta": { "asr_text": "nested" }
        }));
        assert_eq!(result.asr_text.as_deref(), Some("top"));
    }

    #[test]
    fn numeric_fields_are_extracted() {
        let result = ScoreResult::from_value(&json!({
            "score": 0.5,
            "overall_score": 85,
            "score_percent": 90.5,
            "accuracy": 0.99
        }));
        assert_eq!(result.score, Some(0.5));
        assert_eq!(result.overall_score, Some(85.0));
        assert_eq!(result.score_percent, Some(90.5));
        assert_eq!(result.accuracy, Some(0.99));
    }

    #[test]
    fn non_numeric_score_is_absent() {
        let result = ScoreResult::from_value(&json!({ "score": "high" }));
        assert!(result.score.is_none());
    }

    #[test]
    fn display_payloads_are_carried_verbatim() {
        let result = ScoreResult::from_value(&json!({
            "per_word": [{ "word": "cat", "ok": true }],
            "summary": { "grade": "A" }
        }));
        assert_eq!(result.per_word, Some(json!([{ "word": "cat", "ok": true }])));
        assert_eq!(result.summary, Some(json!({ "grade": "A" })));
    }

    // ---- normalisation -----------------------------------------------------

    #[test]
    fn fractional_scores_pass_through() {
        assert_eq!(normalize_score(0.0), 0.0);
        assert_eq!(normalize_score(0.7), 0.7);
        assert_eq!(normalize_score(1.0), 1.0);
    }

    #[test]
    fn percent_scores_are_divided_by_100() {
        assert_eq!(normalize_score(85.0), 0.85);
        assert_eq!(normalize_score(100.0), 1.0);
        assert!((normalize_score(1.5) - 0.015).abs() < 1e-12);
    }

    #[test]
    fn normalized_scores_follow_priority_order() {
        let result = ScoreResult::from_value(&json!({
            "accuracy": 0.1,
            "score": 0.4,
            "score_percent": 30
        }));
        // score, (overall_score absent), score_percent, accuracy
        assert_eq!(result.normalized_scores(), vec![0.4, 0.3, 0.1]);
    }

    #[test]
    fn no_numeric_fields_means_empty_scores() {
        let result = ScoreResult::from_value(&json!({ "asr_text": "hi" }));
        assert!(result.normalized_scores().is_empty());
    }
}
