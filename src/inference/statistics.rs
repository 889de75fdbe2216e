// Copyright (c) 2026 Bountyy Oy. All rights reserved.
//
// Window statistics
//
// Pure functions over a case's sample window. Standard deviation is the
// population form (divide by n), not the sample form.

/// Arithmetic mean. NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation around a precomputed mean.
/// NaN for an empty slice.
pub fn stddev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let variance = values
        .iter()
        .map(|&x| (x - mean).powi(2))
        .sum::<f64>()
        / values.len() as f64;
    variance.sqrt()
}
