use std::collections::HashMap;
use crate::text::rouge_tokens;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Score {
    pub precision: f64,
    pub recall: f64,
    pub fmeasure: f64,
}

impl Score {
    fn from_ratio(matched: usize, candidate_total: usize, reference_total: usize) -> Self {
        let precision = matched as f64 / candidate_total.max(1) as f64;
        let recall = matched as f64 / reference_total.max(1) as f64;
        let fmeasure = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        Self { precision, recall, fmeasure }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RougeScores {
    pub rouge1: Score,
    pub rouge2: Score,
    pub rouge_l: Score,
}

fn ngram_counts(tokens: &[String], n: usize) -> HashMap<&[String], usize> {
    let mut counts = HashMap::new();
    if n == 0 || tokens.len() < n {
        return counts;
    }
    for gram in tokens.windows(n) {
        *counts.entry(gram).or_insert(0) += 1;
    }
    counts
}

pub fn rouge_n(reference: &[String], candidate: &[String], n: usize) -> Score {
    let reference_counts = ngram_counts(reference, n);
    let candidate_counts = ngram_counts(candidate, n);

    let overlap: usize = candidate_counts
        .iter()
        .map(|(gram, &count)| count.min(reference_counts.get(gram).copied().unwrap_or(0)))
        .sum();
    Score::from_ratio(
        overlap,
        candidate_counts.values().sum(),
        reference_counts.values().sum(),
    )
}

fn lcs_len(a: &[String], b: &[String]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut row = vec![0usize; b.len() + 1];
    for x in a {
        for (j, y) in b.iter().enumerate() {
            row[j + 1] = if x == y { prev[j] + 1 } else { row[j].max(prev[j + 1]) };
        }
        std::mem::swap(&mut prev, &mut row);
    }
    prev[b.len()]
}

pub fn rouge_l(reference: &[String], candidate: &[String]) -> Score {
    if reference.is_empty() || candidate.is_empty() {
        return Score::default();
    }
    Score::from_ratio(lcs_len(reference, candidate), candidate.len(), reference.len())
}

/// rouge1, rouge2 and rougeL of one candidate against one reference.
pub fn score(reference: &str, candidate: &str) -> RougeScores {
    let reference = rouge_tokens(reference);
    let candidate = rouge_tokens(candidate);
    RougeScores {
        rouge1: rouge_n(&reference, &candidate, 1),
        rouge2: rouge_n(&reference, &candidate, 2),
        rouge_l: rouge_l(&reference, &candidate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_identical_text_scores_one() {
        let scores = score("der hund läuft.", "der hund läuft.");
        assert!(close(scores.rouge1.fmeasure, 1.0));
        assert!(close(scores.rouge2.fmeasure, 1.0));
        assert!(close(scores.rouge_l.fmeasure, 1.0));
    }

    #[test]
    fn test_disjoint_text_scores_zero() {
        let scores = score("a", "z");
        assert_eq!(scores, RougeScores::default());
    }

    #[test]
    fn test_partial_overlap() {
        // reference: the cat sat on the mat / candidate: the cat lay on the rug
        let scores = score("the cat sat on the mat", "the cat lay on the rug");
        // unigrams: the x2, cat, on match -> 4 of 6 each side
        assert!(close(scores.rouge1.precision, 4.0 / 6.0));
        assert!(close(scores.rouge1.recall, 4.0 / 6.0));
        // bigrams: "the cat" matches, "on the" matches -> 2 of 5
        assert!(close(scores.rouge2.fmeasure, 2.0 / 5.0));
        // LCS: the cat on the -> 4
        assert!(close(scores.rouge_l.fmeasure, 4.0 / 6.0));
    }

    #[test]
    fn test_repeated_ngrams_are_clipped() {
        let reference = rouge_tokens("the cat");
        let candidate = rouge_tokens("the the the");
        let s = rouge_n(&reference, &candidate, 1);
        assert!(close(s.precision, 1.0 / 3.0));
        assert!(close(s.recall, 1.0 / 2.0));
    }

    #[test]
    fn test_empty_candidate() {
        let scores = score("etwas", "");
        assert_eq!(scores.rouge1.fmeasure, 0.0);
        assert_eq!(scores.rouge_l.fmeasure, 0.0);
    }
}
