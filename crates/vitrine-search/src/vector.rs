use serde::Serialize;

/// A sparse weight vector: `(dimension, weight)` pairs sorted by dimension.
///
/// Zero weights are never stored, so an empty vector is the all-zero vector.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SparseVector {
    entries: Vec<(u32, f64)>,
}

impl SparseVector {
    /// Build from arbitrary pairs. Pairs are sorted, duplicate dimensions are
    /// summed and zero weights dropped.
    #[must_use]
    pub fn from_pairs(pairs: impl IntoIterator<Item = (u32, f64)>) -> Self {
        let mut pairs: Vec<(u32, f64)> = pairs.into_iter().collect();
        pairs.sort_by_key(|&(dim, _)| dim);

        let mut entries: Vec<(u32, f64)> = Vec::with_capacity(pairs.len());
        for (dim, weight) in pairs {
            match entries.last_mut() {
                Some((last, acc)) if *last == dim => *acc += weight,
                _ => entries.push((dim, weight)),
            }
        }
        entries.retain(|&(_, weight)| weight != 0.0);

        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[(u32, f64)] {
        &self.entries
    }

    /// Number of stored (non-zero) weights.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, dim: u32) -> f64 {
        self.entries
            .binary_search_by_key(&dim, |&(d, _)| d)
            .map(|i| self.entries[i].1)
            .unwrap_or(0.0)
    }

    /// Euclidean length.
    #[must_use]
    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Scale to unit length. The zero vector stays zero.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, weight) in &mut self.entries {
                *weight /= norm;
            }
        }
        self
    }

    /// Dot product by merging the two sorted entry lists.
    #[must_use]
    pub fn dot(&self, other: &Self) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (da, wa) = self.entries[i];
            let (db, wb) = other.entries[j];
            match da.cmp(&db) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += wa * wb;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    /// `dot(a, b) / (|a| * |b|)`, defined as 0 when either vector is zero.
    #[must_use]
    pub fn cosine(&self, other: &Self) -> f64 {
        let denominator = self.norm() * other.norm();
        if denominator == 0.0 {
            return 0.0;
        }
        self.dot(other) / denominator
    }
}
