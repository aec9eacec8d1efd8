use anyhow::{bail, Result};

/// Gini coefficient: the mean absolute difference over all ordered pairs,
/// divided by twice the mean.
///
/// `G = Σ_i Σ_j |x_i - x_j| / (2 n² mean)`
///
/// Undefined for an empty distribution or one whose mean is zero.
pub fn gini(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        bail!("Gini coefficient is undefined for an empty distribution");
    }
    if values.iter().any(|v| !v.is_finite()) {
        bail!("Gini coefficient is undefined for non-finite values");
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if mean == 0.0 {
        bail!("Gini coefficient is undefined when every value is zero");
    }

    // Each unordered pair once; the full double sum is twice this
    let mut half_abs_diff = 0.0;
    for (i, x) in values.iter().enumerate() {
        for y in &values[i + 1..] {
            half_abs_diff += (x - y).abs();
        }
    }

    Ok(2.0 * half_abs_diff / (2.0 * n * n * mean))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_distribution_is_zero() {
        assert_eq!(gini(&[2.5; 7]).unwrap(), 0.0);
        assert_eq!(gini(&[1.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_single_holder_approaches_one() {
        for n in [2usize, 5, 10, 100, 1000] {
            let mut values = vec![0.0; n - 1];
            values.push(42.0);
            let expected = (n as f64 - 1.0) / n as f64;
            assert!((gini(&values).unwrap() - expected).abs() < 1e-12, "n = {}", n);
        }
    }

    #[test]
    fn test_known_value() {
        // Pairwise |diffs| of [1, 2, 3]: 1 + 2 + 1 = 4, doubled 8; 8 / (2 * 9 * 2)
        assert!((gini(&[1.0, 2.0, 3.0]).unwrap() - 2.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_order_does_not_matter() {
        let a = gini(&[0.3, 1.7, 0.0, 4.2, 2.2]).unwrap();
        let b = gini(&[4.2, 0.0, 2.2, 0.3, 1.7]).unwrap();
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(gini(&[]).is_err());
        assert!(gini(&[0.0, 0.0, 0.0]).is_err());
        assert!(gini(&[1.0, f64::NAN]).is_err());
    }
}
