use super::html::{class_names, tag_sequence};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimilarityError {
    #[error("document has no markup to compare")]
    NoMarkup,
}

/// Scores how alike two HTML documents are, in `[0, 1]`.
pub trait SimilarityScorer: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> Result<f64, SimilarityError>;
}

/// Weighted mix of tag-structure and class-name overlap.
///
/// `structure_weight * structure + (1 - structure_weight) * style`, where
/// structure is the longest-common-subsequence ratio of the tag sequences and
/// style is the Jaccard index of the class-name sets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StructuralSimilarity {
    pub structure_weight: f64,
}

impl Default for StructuralSimilarity {
    fn default() -> Self {
        Self {
            structure_weight: 0.3,
        }
    }
}

impl SimilarityScorer for StructuralSimilarity {
    fn similarity(&self, a: &str, b: &str) -> Result<f64, SimilarityError> {
        let tags_a = tag_sequence(a);
        let tags_b = tag_sequence(b);
        if tags_a.is_empty() || tags_b.is_empty() {
            return Err(SimilarityError::NoMarkup);
        }
        let structure = lcs_ratio(&tags_a, &tags_b);
        let style = jaccard(&class_names(a), &class_names(b));
        Ok(self.structure_weight * structure + (1.0 - self.structure_weight) * style)
    }
}

fn lcs_ratio(a: &[String], b: &[String]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let mut previous = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];
    for x in a {
        for (j, y) in b.iter().enumerate() {
            current[j + 1] = if x == y {
                previous[j] + 1
            } else {
                previous[j + 1].max(current[j])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }
    2.0 * previous[b.len()] as f64 / total as f64
}

fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let shared = a.intersection(b).count();
    let union = a.union(b).count();
    shared as f64 / union as f64
}
