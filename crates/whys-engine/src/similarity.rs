//! Textual overlap scoring for duplicate detection.
//!
//! The score is the symmetric ratio `2 * LCS / (|a| + |b|)` over word tokens,
//! where LCS is the longest common subsequence of the two token lists. Tokens
//! are case- and punctuation-insensitive.

use crate::classify::normalize;

/// Score at or above which two texts are treated as duplicates.
pub const DUPLICATE_THRESHOLD: f64 = 0.85;

fn tokens(text: &str) -> Vec<String> {
    normalize(text).split_whitespace().map(str::to_owned).collect()
}

fn lcs_len(a: &[String], b: &[String]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut row = vec![0usize; b.len() + 1];
    for ta in a {
        for (j, tb) in b.iter().enumerate() {
            row[j + 1] = if ta == tb {
                prev[j] + 1
            } else {
                row[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut row);
    }
    prev[b.len()]
}

/// Similarity of two texts in `[0.0, 1.0]`.
///
/// Two texts with no tokens score `1.0`; one empty side scores `0.0`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn similarity(a: &str, b: &str) -> f64 {
    let (ta, tb) = (tokens(a), tokens(b));
    match (ta.is_empty(), tb.is_empty()) {
        (true, true) => 1.0,
        (true, false) | (false, true) => 0.0,
        (false, false) => (2 * lcs_len(&ta, &tb)) as f64 / (ta.len() + tb.len()) as f64,
    }
}

/// Whether `a` and `b` score at or above [`DUPLICATE_THRESHOLD`].
#[must_use]
pub fn is_duplicate(a: &str, b: &str) -> bool {
    SimilarityGate::default().is_duplicate(a, b)
}

/// The closest earlier text to a candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match<'a> {
    pub text: &'a str,
    pub score: f64,
}

/// Duplicate detector with a configurable threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityGate {
    threshold: f64,
}

impl Default for SimilarityGate {
    fn default() -> Self {
        Self::new(DUPLICATE_THRESHOLD)
    }
}

impl SimilarityGate {
    /// Build a gate; `threshold` is clamped to `[0.0, 1.0]`.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    #[must_use]
    pub fn is_duplicate(&self, a: &str, b: &str) -> bool {
        similarity(a, b) >= self.threshold
    }

    /// The highest-scoring entry of `history`, if any.
    pub fn closest<'a, I>(&self, candidate: &str, history: I) -> Option<Match<'a>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        history
            .into_iter()
            .map(|text| Match {
                text,
                score: similarity(candidate, text),
            })
            .fold(None, |best: Option<Match<'a>>, m| match best {
                Some(b) if b.score >= m.score => Some(b),
                _ => Some(m),
            })
    }

    /// The closest entry of `history` that counts as a duplicate.
    pub fn duplicate_of<'a, I>(&self, candidate: &str, history: I) -> Option<Match<'a>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.closest(candidate, history)
            .filter(|m| m.score >= self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn identical_text_is_duplicate() {
        let q = "Why did latency spike?";
        assert!(approx(similarity(q, q), 1.0));
        assert!(is_duplicate(q, q));
    }

    #[test]
    fn case_and_punctuation_are_ignored() {
        assert!(approx(
            similarity("Why did the POOL fill up?", "why did the pool fill up"),
            1.0
        ));
    }

    #[test]
    fn below_threshold_near_boundary() {
        // 4 shared tokens out of 4 + 6: 8 / 10
        let score = similarity(
            "Why did latency spike?",
            "Why did the database latency spike?",
        );
        assert!(approx(score, 0.8));
        assert!(!is_duplicate(
            "Why did latency spike?",
            "Why did the database latency spike?"
        ));
    }

    #[test]
    fn above_threshold_near_boundary() {
        // 5 shared tokens out of 5 + 6: 10 / 11
        let score = similarity(
            "Why did the latency spike?",
            "Why did the database latency spike?",
        );
        assert!(approx(score, 10.0 / 11.0));
        assert!(is_duplicate(
            "Why did the latency spike?",
            "Why did the database latency spike?"
        ));
    }

    #[test]
    fn symmetric() {
        let (a, b) = ("What filled the queue?", "What drained the queue so slowly?");
        assert!(approx(similarity(a, b), similarity(b, a)));
    }

    #[test]
    fn empty_sides() {
        assert!(approx(similarity("", "?!"), 1.0));
        assert!(approx(similarity("", "why"), 0.0));
    }

    #[test]
    fn closest_picks_best_match() {
        let gate = SimilarityGate::default();
        let history = ["Why is the API slow?", "Why did the latency spike?"];
        let best = gate
            .closest("Why did the database latency spike?", history)
            .unwrap();
        assert_eq!(best.text, "Why did the latency spike?");
        assert!(gate
            .duplicate_of("Why did the database latency spike?", history)
            .is_some());
        assert!(gate.closest("anything", []).is_none());
    }

    #[test]
    fn threshold_is_clamped() {
        assert!(approx(SimilarityGate::new(3.0).threshold(), 1.0));
    }
}
