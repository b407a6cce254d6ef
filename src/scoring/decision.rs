//! Correctness decision heuristic.
//!
//! [`decide`] fuses three weak signals into one boolean verdict, any of
//! which is sufficient on its own (logical OR, short-circuit):
//!
//! 1. normalised ASR transcript contains the normalised expected text;
//! 2. any recognised numeric score, normalised to `[0,1]`, reaches 0.7;
//! 3. at least 60 % of the expected words appear in the transcript.
//!
//! This is a heuristic, not a grader.  The product serves young children,
//! so the thresholds deliberately tolerate false positives over false
//! negatives.

use crate::scoring::result::ScoreResult;

/// Minimum normalised numeric score that counts as a pass.
pub const SCORE_THRESHOLD: f64 = 0.7;

/// Minimum fraction of expected words found in the transcript.
pub const WORD_OVERLAP_THRESHOLD: f64 = 0.6;

// ---------------------------------------------------------------------------
// normalize_text
// ---------------------------------------------------------------------------

/// Normalise text for matching: lowercase, punctuation stripped, whitespace
/// collapsed to single spaces, trimmed.
///
/// # Example
///
/// ```rust
/// use voca_speech::scoring::normalize_text;
///
/// assert_eq!(normalize_text("  I said,  \"Banana!\" "), "i said banana");
/// ```
pub fn normalize_text(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// decide
// ---------------------------------------------------------------------------

/// Decide whether `result` counts as a correct utterance of `expected`.
///
/// Returns `false` when no signal is available at all (no transcript, no
/// numeric score) — silence is never a pass.
pub fn decide(result: &ScoreResult, expected: &str) -> bool {
    let expected_norm = normalize_text(expected);
    let asr_norm = result.asr_text.as_deref().map(normalize_text);

    // ── 1. Substring match ───────────────────────────────────────────────
    if let Some(asr) = &asr_norm {
        if !expected_norm.is_empty() && !asr.is_empty() && asr.contains(&expected_norm) {
            log::debug!("decision: substring match on {expected_norm:?}");
            return true;
        }
    }

    // ── 2. Numeric threshold (fixed priority order) ──────────────────────
    for score in result.normalized_scores() {
        if score >= SCORE_THRESHOLD {
            log::debug!("decision: numeric score {score:.2} passes");
            return true;
        }
    }

    // ── 3. Fractional word overlap ───────────────────────────────────────
    if let Some(asr) = &asr_norm {
        let words: Vec<&str> = expected_norm.split_whitespace().collect();
        if !words.is_empty() && !asr.is_empty() {
            let hits = words.iter().filter(|w| asr.contains(**w)).count();
            let fraction = hits as f64 / words.len() as f64;
            if fraction >= WORD_OVERLAP_THRESHOLD {
                log::debug!("decision: word overlap {fraction:.2} passes");
                return true;
            }
        }
    }

    false
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result_from(value: serde_json::Value) -> ScoreResult {
        ScoreResult::from_value(&value)
    }

    // ---- normalize_text ----------------------------------------------------

    #[test]
    fn normalize_lowercases() {
        assert_eq!(normalize_text("BaNaNa"), "banana");
    }

    #[test]
    fn normalize_strips_punctuation() {
        assert_eq!(normalize_text("cat, dog!"), "cat dog");
    }

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize_text("  a \t b\n\nc "), "a b c");
    }

    #[test]
    fn normalize_empty_is_empty() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("!!! ???"), "");
    }

    // ---- spec scenarios ----------------------------------------------------

    #[test]
    fn substring_match_passes() {
        let result = result_from(json!({ "asr_text": "i said banana clearly" }));
        assert!(decide(&result, "banana"));
    }

    #[test]
    fn half_word_overlap_fails() {
        // expected "cat dog", ASR "cat" → overlap 1/2 = 0.5 < 0.6.
        let result = result_from(json!({ "asr_text": "cat" }));
        assert!(!decide(&result, "cat dog"));
    }

    #[test]
    fn percent_score_passes_despite_empty_transcript() {
        // 85 → 0.85 after /100 normalisation → ≥ 0.7.
        let result = result_from(json!({ "asr_text": "", "score": 85 }));
        assert!(decide(&result, "hello"));
    }

    #[test]
    fn no_signals_means_false() {
        assert!(!decide(&ScoreResult::default(), "hello"));
        let result = result_from(json!({ "asr_text": "" }));
        assert!(!decide(&result, "hello"));
    }

    // ---- substring details -------------------------------------------------

    #[test]
    fn substring_match_is_case_and_punctuation_insensitive() {
        let result = result_from(json!({ "asr_text": "I said, BANANA!" }));
        assert!(decide(&result, "banana"));
    }

    #[test]
    fn multiword_expected_matches_as_phrase() {
        let result = result_from(json!({ "asr_text": "the red ball bounced" }));
        assert!(decide(&result, "red ball"));
    }

    #[test]
    fn unrelated_transcript_fails() {
        let result = result_from(json!({ "asr_text": "completely different words" }));
        assert!(!decide(&result, "banana"));
    }

    // ---- numeric threshold -------------------------------------------------

    #[test]
    fn fractional_score_at_threshold_passes() {
        let result = result_from(json!({ "score": 0.7 }));
        assert!(decide(&result, "hello"));
    }

    #[test]
    fn fractional_score_below_threshold_fails() {
        let result = result_from(json!({ "score": 0.69 }));
        assert!(!decide(&result, "hello"));
    }

    #[test]
    fn any_passing_field_is_sufficient() {
        // Highest-priority field fails but accuracy passes.
        let result = result_from(json!({ "score": 0.1, "accuracy": 0.9 }));
        assert!(decide(&result, "hello"));
    }

    #[test]
    fn all_fields_below_threshold_fail() {
        let result = result_from(json!({
            "score": 0.2, "overall_score": 30, "score_percent": 55, "accuracy": 0.6
        }));
        assert!(!decide(&result, "hello"));
    }

    // ---- word overlap ------------------------------------------------------

    #[test]
    fn two_of_three_words_pass() {
        // 2/3 ≈ 0.67 ≥ 0.6.
        let result = result_from(json!({ "asr_text": "big red something" }));
        assert!(decide(&result, "big red ball"));
    }

    #[test]
    fn overlap_counts_substring_occurrences() {
        // "cat" appears inside "cats"; overlap counts substrings, not exact
        // word equality.
        let result = result_from(json!({ "asr_text": "cats dogs" }));
        assert!(decide(&result, "cat dog"));
    }

    #[test]
    fn empty_expected_never_passes_via_overlap() {
        let result = result_from(json!({ "asr_text": "anything at all" }));
        assert!(!decide(&result, "   "));
    }

    // ---- monotonicity ------------------------------------------------------

    /// Improving any single signal from negative to positive, holding the
    /// others fixed, never flips the verdict from true to false.
    #[test]
    fn verdict_is_monotonic_in_each_signal() {
        // Base: all three signals negative.
        let base = result_from(json!({ "asr_text": "xyz", "score": 0.1 }));
        assert!(!decide(&base, "cat dog"));

        // Improve substring signal only.
        let better_sub = result_from(json!({ "asr_text": "cat dog xyz", "score": 0.1 }));
        assert!(decide(&better_sub, "cat dog"));

        // Improve numeric signal only.
        let better_num = result_from(json!({ "asr_text": "xyz", "score": 0.9 }));
        assert!(decide(&better_num, "cat dog"));

        // Improve overlap signal only (no full substring: words reordered).
        let better_overlap = result_from(json!({ "asr_text": "dog then cat", "score": 0.1 }));
        assert!(decide(&better_overlap, "cat dog"));

        // A passing verdict stays passing when another signal also improves.
        let both = result_from(json!({ "asr_text": "cat dog xyz", "score": 0.9 }));
        assert!(decide(&both, "cat dog"));
    }
}
