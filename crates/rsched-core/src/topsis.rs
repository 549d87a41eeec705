//! TOPSIS multi-criteria ranking.
//!
//! Technique for Order Preference by Similarity to Ideal Solution: every
//! alternative is a point in criteria space. Columns are normalized and
//! weighted, then each alternative is scored by how close it is to the
//! ideal-best point relative to the ideal-worst one.

use crate::error::{SchedulingError, SchedulingResult};

/// A single criterion. Negative input weights mark cost criteria
/// (lower values are better).
#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    name: String,
    weight: f64,
    maximize: bool,
}

impl Criterion {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight: weight.abs(),
            maximize: weight > 0.0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Weight after normalization, in `0.0..=1.0`.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn maximize(&self) -> bool {
        self.maximize
    }
}

/// A fixed set of criteria whose weights sum to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Criteria<const N: usize>([Criterion; N]);

impl<const N: usize> Criteria<N> {
    pub fn new(mut criteria: [Criterion; N]) -> SchedulingResult<Self> {
        if let Some(bad) = criteria.iter().find(|c| !c.weight.is_finite()) {
            return Err(SchedulingError::InvalidCriteria(format!(
                "weight of '{}' is not finite",
                bad.name
            )));
        }

        let total: f64 = criteria.iter().map(|c| c.weight).sum();
        if total == 0.0 {
            return Err(SchedulingError::InvalidCriteria(
                "at least one criterion needs a non-zero weight".to_string(),
            ));
        }

        for criterion in criteria.iter_mut() {
            criterion.weight /= total;
        }
        Ok(Self(criteria))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Criterion> {
        self.0.iter()
    }
}

/// Alternatives as rows, criteria as columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Matrix<const N: usize>(Vec<[f64; N]>);

impl<const N: usize> Matrix<N> {
    pub fn new(rows: Vec<[f64; N]>) -> Self {
        Self(rows)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn column(&self, index: usize) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().map(move |row| row[index])
    }

    /// Divide every column by its L2 norm and scale it by the criterion
    /// weight. A zero column stays zero.
    fn normalize_weighted(&self, criteria: &Criteria<N>) -> Self {
        let mut rows = self.0.clone();
        for (index, criterion) in criteria.iter().enumerate() {
            let norm = l2_norm(self.column(index));
            for row in rows.iter_mut() {
                let normalized = if norm == 0.0 { 0.0 } else { row[index] / norm };
                row[index] = normalized * criterion.weight();
            }
        }
        Self(rows)
    }
}

fn l2_norm(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(0.0, |sum, v| sum + v * v).sqrt()
}

fn distance<const N: usize>(a: &[f64; N], b: &[f64; N]) -> f64 {
    l2_norm(a.iter().zip(b.iter()).map(|(x, y)| x - y))
}

/// Ideal-best and ideal-worst points of a weighted, normalized matrix.
struct IdealAlternatives<const N: usize> {
    best: [f64; N],
    worst: [f64; N],
}

impl<const N: usize> IdealAlternatives<N> {
    fn compute(matrix: &Matrix<N>, criteria: &Criteria<N>) -> Self {
        let mut best = [0.0; N];
        let mut worst = [0.0; N];

        for (index, criterion) in criteria.iter().enumerate() {
            let min = matrix.column(index).fold(f64::INFINITY, f64::min);
            let max = matrix.column(index).fold(f64::NEG_INFINITY, f64::max);
            if criterion.maximize() {
                best[index] = max;
                worst[index] = min;
            } else {
                best[index] = min;
                worst[index] = max;
            }
        }

        Self { best, worst }
    }
}

/// Score every alternative in `0.0..=1.0`, higher is better.
///
/// Scores are returned in row order. When all alternatives coincide with
/// both ideal points they all score `1.0`.
pub fn score_alternatives<const N: usize>(
    matrix: &Matrix<N>,
    criteria: &Criteria<N>,
) -> Vec<f64> {
    if matrix.is_empty() {
        return Vec::new();
    }

    let weighted = matrix.normalize_weighted(criteria);
    let ideal = IdealAlternatives::compute(&weighted, criteria);

    weighted
        .0
        .iter()
        .map(|row| {
            let to_best = distance(row, &ideal.best);
            let to_worst = distance(row, &ideal.worst);
            let total = to_best + to_worst;
            if total == 0.0 { 1.0 } else { to_worst / total }
        })
        .collect()
}
