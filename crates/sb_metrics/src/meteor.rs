use crate::text::TextStemmer;

const ALPHA: f64 = 0.9;
const BETA: f64 = 3.0;
const GAMMA: f64 = 0.5;

type Enumerated = Vec<(usize, String)>;

/// Greedy one-to-one matching, scanning both sides from the end.
///
/// Matched entries are removed from both lists; returns (hypothesis, reference) index pairs.
fn match_enums(hypothesis: &mut Enumerated, reference: &mut Enumerated) -> Vec<(usize, usize)> {
    let mut matches = Vec::new();
    for i in (0..hypothesis.len()).rev() {
        for j in (0..reference.len()).rev() {
            if hypothesis[i].1 == reference[j].1 {
                matches.push((hypothesis[i].0, reference[j].0));
                hypothesis.remove(i);
                reference.remove(j);
                break;
            }
        }
    }
    matches
}

fn align(hypothesis: &[String], reference: &[String], stemmer: &TextStemmer) -> Vec<(usize, usize)> {
    let mut hyp: Enumerated = hypothesis.iter().cloned().enumerate().collect();
    let mut refs: Enumerated = reference.iter().cloned().enumerate().collect();

    let mut matches = match_enums(&mut hyp, &mut refs);

    let mut hyp_stems: Enumerated = hyp.into_iter().map(|(i, w)| (i, stemmer.stem_word(&w))).collect();
    let mut ref_stems: Enumerated = refs.into_iter().map(|(i, w)| (i, stemmer.stem_word(&w))).collect();
    matches.extend(match_enums(&mut hyp_stems, &mut ref_stems));

    matches.sort_by_key(|&(h, _)| h);
    matches
}

/// Number of runs of matches that are contiguous on both sides.
fn count_chunks(matches: &[(usize, usize)]) -> usize {
    if matches.is_empty() {
        return 0;
    }
    1 + matches
        .windows(2)
        .filter(|w| !(w[1].0 == w[0].0 + 1 && w[1].1 == w[0].1 + 1))
        .count()
}

/// METEOR of one tokenized hypothesis against one tokenized reference.
///
/// Alignment uses exact matches, then stem matches; there is no synonym stage.
pub fn meteor(reference: &[String], hypothesis: &[String], stemmer: &TextStemmer) -> f64 {
    let matches = align(hypothesis, reference, stemmer);
    let matched = matches.len();
    if matched == 0 {
        return 0.0;
    }

    let precision = matched as f64 / hypothesis.len() as f64;
    let recall = matched as f64 / reference.len() as f64;
    let fmean = precision * recall / (ALPHA * precision + (1.0 - ALPHA) * recall);
    let fragmentation = count_chunks(&matches) as f64 / matched as f64;
    let penalty = GAMMA * fragmentation.powf(BETA);
    fmean * (1.0 - penalty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{word_tokens, Language};

    fn german() -> TextStemmer {
        TextStemmer::new(Language::German)
    }

    #[test]
    fn test_identical_tokens() {
        let tokens = word_tokens("Der Hund läuft schnell nach Hause.");
        let score = meteor(&tokens, &tokens, &german());
        // seven tokens including the full stop, one chunk
        assert_eq!(tokens.len(), 7);
        let expected = 1.0 - 0.5 * (1.0f64 / 7.0).powi(3);
        assert!((score - expected).abs() < 1e-12);
    }

    #[test]
    fn test_no_matches() {
        assert_eq!(meteor(&word_tokens("A"), &word_tokens("Z"), &german()), 0.0);
        assert_eq!(meteor(&word_tokens("A"), &[], &german()), 0.0);
    }

    #[test]
    fn test_stem_stage_matches_inflections() {
        let reference = word_tokens("Häuser");
        let hypothesis = word_tokens("Haus");
        let score = meteor(&reference, &hypothesis, &german());
        assert!(score > 0.0);
    }

    #[test]
    fn test_chunks() {
        assert_eq!(count_chunks(&[]), 0);
        assert_eq!(count_chunks(&[(0, 0), (1, 1), (2, 2)]), 1);
        assert_eq!(count_chunks(&[(0, 1), (1, 0)]), 2);
        assert_eq!(count_chunks(&[(0, 0), (1, 1), (3, 2)]), 2);
    }

    #[test]
    fn test_word_order_is_penalised() {
        let reference = word_tokens("eins zwei drei vier");
        let ordered = meteor(&reference, &word_tokens("eins zwei drei vier"), &german());
        let shuffled = meteor(&reference, &word_tokens("vier drei zwei eins"), &german());
        assert!(shuffled < ordered);
    }
}
