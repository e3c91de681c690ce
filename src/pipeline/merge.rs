/// Caller-supplied values competing with machine analysis
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerOverrides {
    pub risk_score: Option<i32>,
    pub annotation: Option<String>,
}

/// Final enrichment fields for a new record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedFields {
    pub risk_score: i32,
    pub annotation: String,
}

/// Prefix marking a machine-derived sentiment label in the annotation
pub const SENTIMENT_PREFIX: &str = "Sentiment: ";

/// Pick the stored risk score
///
/// A successful analysis always wins, even over an explicit caller value.
pub fn resolve_risk_score(analysis: Option<i32>, caller: Option<i32>) -> i32 {
    analysis.or(caller).unwrap_or(0)
}

/// Pick the stored annotation
///
/// With a sentiment label the result is `Sentiment: <label>`, followed by
/// ` | <caller text>` when the caller text is non-empty. Without one the
/// caller text is kept as given.
pub fn resolve_annotation(sentiment: Option<&str>, caller: Option<&str>) -> String {
    match (sentiment, caller) {
        (Some(label), Some(note)) if !note.is_empty() => {
            format!("{}{} | {}", SENTIMENT_PREFIX, label, note)
        }
        (Some(label), _) => format!("{}{}", SENTIMENT_PREFIX, label),
        (None, note) => note.unwrap_or_default().to_string(),
    }
}

/// Merge analysis outcomes with caller overrides, field by field
///
/// `None` for an analysis means that call failed (after its retries).
pub fn merge_enrichment(
    risk: Option<i32>,
    sentiment: Option<&str>,
    overrides: &CallerOverrides,
) -> MergedFields {
    MergedFields {
        risk_score: resolve_risk_score(risk, overrides.risk_score),
        annotation: resolve_annotation(sentiment, overrides.annotation.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides(risk_score: Option<i32>, annotation: Option<&str>) -> CallerOverrides {
        CallerOverrides {
            risk_score,
            annotation: annotation.map(String::from),
        }
    }

    #[test]
    fn test_both_succeed_without_overrides() {
        let merged = merge_enrichment(Some(64), Some("positive"), &CallerOverrides::default());
        assert_eq!(merged.risk_score, 64);
        assert_eq!(merged.annotation, "Sentiment: positive");
    }

    #[test]
    fn test_both_succeed_with_overrides() {
        let merged = merge_enrichment(
            Some(88),
            Some("negative"),
            &overrides(Some(10), Some("follow-up needed")),
        );
        assert_eq!(merged.risk_score, 88);
        assert_eq!(merged.annotation, "Sentiment: negative | follow-up needed");
    }

    #[test]
    fn test_both_fail_with_overrides() {
        let merged = merge_enrichment(None, None, &overrides(Some(7), Some("note")));
        assert_eq!(merged.risk_score, 7);
        assert_eq!(merged.annotation, "note");
    }

    #[test]
    fn test_both_fail_without_overrides() {
        let merged = merge_enrichment(None, None, &CallerOverrides::default());
        assert_eq!(merged.risk_score, 0);
        assert_eq!(merged.annotation, "");
    }

    #[test]
    fn test_risk_fails_sentiment_succeeds() {
        let merged = merge_enrichment(None, Some("neutral"), &overrides(Some(30), Some("tired")));
        assert_eq!(merged.risk_score, 30);
        assert_eq!(merged.annotation, "Sentiment: neutral | tired");
    }

    #[test]
    fn test_risk_succeeds_sentiment_fails() {
        let merged = merge_enrichment(Some(15), None, &overrides(None, Some("tired")));
        assert_eq!(merged.risk_score, 15);
        assert_eq!(merged.annotation, "tired");
    }

    #[test]
    fn test_machine_zero_still_wins() {
        assert_eq!(resolve_risk_score(Some(0), Some(55)), 0);
    }

    #[test]
    fn test_empty_caller_note_with_sentiment() {
        assert_eq!(
            resolve_annotation(Some("negative"), Some("")),
            "Sentiment: negative"
        );
    }

    #[test]
    fn test_empty_caller_note_without_sentiment() {
        assert_eq!(resolve_annotation(None, Some("")), "");
    }
}
