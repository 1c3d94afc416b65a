use std::collections::HashMap;

const MAX_ORDER: usize = 4;

fn ngram_counts<'a>(tokens: &'a [&'a str], n: usize) -> HashMap<&'a [&'a str], usize> {
    let mut counts = HashMap::new();
    if tokens.len() >= n {
        for gram in tokens.windows(n) {
            *counts.entry(gram).or_insert(0) += 1;
        }
    }
    counts
}

/// Sentence BLEU with uniform 4-gram weights and no smoothing.
///
/// Any n-gram order without a single match makes the score 0.
pub fn sentence_bleu(reference: &[&str], hypothesis: &[&str]) -> f64 {
    if hypothesis.is_empty() {
        return 0.0;
    }

    let mut log_precision = 0.0;
    for n in 1..=MAX_ORDER {
        let reference_counts = ngram_counts(reference, n);
        let hypothesis_counts = ngram_counts(hypothesis, n);
        let total: usize = hypothesis_counts.values().sum();
        let matched: usize = hypothesis_counts
            .iter()
            .map(|(gram, &count)| count.min(reference_counts.get(gram).copied().unwrap_or(0)))
            .sum();
        if matched == 0 {
            return 0.0;
        }
        log_precision += (matched as f64 / total as f64).ln() / MAX_ORDER as f64;
    }

    brevity_penalty(reference.len(), hypothesis.len()) * log_precision.exp()
}

fn brevity_penalty(reference_len: usize, hypothesis_len: usize) -> f64 {
    if hypothesis_len > reference_len {
        1.0
    } else {
        (1.0 - reference_len as f64 / hypothesis_len as f64).exp()
    }
}
