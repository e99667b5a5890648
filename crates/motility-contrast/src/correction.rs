//! Multiple-comparison correction

use serde::Serialize;

/// Adjustment applied to the p-values of all pairwise tests in one contrast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Correction {
    /// Report raw p-values
    #[default]
    None,
    /// Multiply each p-value by the number of tests, capped at 1
    Bonferroni,
}

impl Correction {
    pub fn adjust(&self, p_values: &[f64]) -> Vec<f64> {
        match self {
            Self::None => p_values.to_vec(),
            Self::Bonferroni => {
                let m = p_values.len() as f64;
                p_values.iter().map(|p| (p * m).min(1.0)).collect()
            }
        }
    }
}
