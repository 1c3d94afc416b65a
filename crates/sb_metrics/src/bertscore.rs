use tracing::debug;
use sb_core::{BertScoreReport, Error, Result};
use crate::embedders::{TokenEmbedder, TokenEmbeddings};

fn normalize(tokens: &mut TokenEmbeddings) {
    for vector in tokens.iter_mut() {
        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
    }
}

fn dot(a: &[f32], b: &[f32]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (*x as f64) * (*y as f64)).sum()
}

/// Mean over `from` tokens of their best cosine match among `to` tokens.
fn greedy_mean(from: &TokenEmbeddings, to: &TokenEmbeddings) -> f64 {
    let total: f64 = from
        .iter()
        .map(|a| to.iter().map(|b| dot(a, b)).fold(f64::NEG_INFINITY, f64::max))
        .sum();
    total / from.len() as f64
}

/// Greedy-matching BERTScore of one pair of normalized token matrices.
pub fn pair_score(candidate: &TokenEmbeddings, reference: &TokenEmbeddings) -> BertScoreReport {
    if candidate.is_empty() || reference.is_empty() {
        return BertScoreReport::default();
    }
    let precision = greedy_mean(candidate, reference);
    let recall = greedy_mean(reference, candidate);
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };
    BertScoreReport { precision, recall, f1 }
}

/// Token embeddings for every text, in input order.
///
/// Blank texts never reach the embedder and come back with no tokens, so the
/// pair they belong to scores 0.
async fn embed_all(embedder: &dyn TokenEmbedder, texts: &[String], batch_size: usize) -> Result<Vec<TokenEmbeddings>> {
    let (indices, non_blank): (Vec<usize>, Vec<String>) = texts
        .iter()
        .enumerate()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(i, text)| (i, text.clone()))
        .unzip();
    if non_blank.len() < texts.len() {
        debug!("{} of {} texts are blank and get no tokens", texts.len() - non_blank.len(), texts.len());
    }

    let mut out: Vec<TokenEmbeddings> = vec![Vec::new(); texts.len()];
    let mut slots = indices.into_iter();
    for batch in non_blank.chunks(batch_size.max(1)) {
        let embedded = embedder.embed_tokens(batch).await?;
        if embedded.len() != batch.len() {
            return Err(Error::Metric(format!(
                "{} returned {} embeddings for {} texts",
                embedder.name(),
                embedded.len(),
                batch.len()
            )));
        }
        for (mut tokens, slot) in embedded.into_iter().zip(slots.by_ref()) {
            normalize(&mut tokens);
            out[slot] = tokens;
        }
    }
    Ok(out)
}

/// Corpus BERTScore: every text is embedded once and the per-pair scores are averaged.
pub async fn bert_score(
    embedder: &dyn TokenEmbedder,
    references: &[String],
    generated: &[String],
    batch_size: usize,
) -> Result<BertScoreReport> {
    let candidates = embed_all(embedder, generated, batch_size).await?;
    let refs = embed_all(embedder, references, batch_size).await?;
    debug!("Embedded {} candidate/reference pairs with {}", candidates.len(), embedder.name());

    let n = candidates.len().max(1) as f64;
    let sum = candidates
        .iter()
        .zip(&refs)
        .map(|(c, r)| pair_score(c, r))
        .fold(BertScoreReport::default(), |acc, s| BertScoreReport {
            precision: acc.precision + s.precision,
            recall: acc.recall + s.recall,
            f1: acc.f1 + s.f1,
        });
    Ok(BertScoreReport {
        precision: sum.precision / n,
        recall: sum.recall / n,
        f1: sum.f1 / n,
    })
}
