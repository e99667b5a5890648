//! Utility functions for working with data slices

/// Sort data and return a new vector
///
/// Uses IEEE total ordering, so NaN values are placed at the end.
///
/// # Examples
///
/// ```rust
/// use motility_core::utils::sorted;
///
/// let data = vec![3.0, 1.0, 5.0, 2.0, 4.0];
/// assert_eq!(sorted(&data), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
/// ```
pub fn sorted(data: &[f64]) -> Vec<f64> {
    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Calculate the mean of a slice
///
/// Returns 0.0 for empty slices.
///
/// # Examples
///
/// ```rust
/// use motility_core::utils::mean;
///
/// assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
/// assert_eq!(mean(&[]), 0.0);
/// ```
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let sum: f64 = data.iter().sum();
    sum / data.len() as f64
}

/// Calculate the sample variance (n - 1 denominator)
///
/// Returns 0.0 for slices with less than 2 elements.
pub fn variance(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let m = mean(data);
    data.iter()
        .map(|&x| {
            let diff = x - m;
            diff * diff
        })
        .sum::<f64>()
        / (data.len() - 1) as f64
}

/// Calculate the sample standard deviation
///
/// Returns 0.0 for slices with less than 2 elements.
///
/// # Examples
///
/// ```rust
/// use motility_core::utils::std_dev;
///
/// let data = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let sd = std_dev(&data);
/// assert!((sd - 1.58113883).abs() < 1e-6);
/// ```
pub fn std_dev(data: &[f64]) -> f64 {
    variance(data).sqrt()
}

/// Quantile of already-sorted data by linear interpolation between order
/// statistics (Hyndman-Fan type 7, the numpy default)
///
/// Returns `None` for empty input or `p` outside [0, 1].
pub fn quantile_sorted(sorted_data: &[f64], p: f64) -> Option<f64> {
    if sorted_data.is_empty() || !(0.0..=1.0).contains(&p) {
        return None;
    }
    let h = (sorted_data.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    let frac = h - lo as f64;
    Some(sorted_data[lo] + frac * (sorted_data[hi] - sorted_data[lo]))
}

/// Median of unsorted data
///
/// # Examples
///
/// ```rust
/// use motility_core::utils::median;
///
/// assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
/// assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
/// assert_eq!(median(&[]), None);
/// ```
pub fn median(data: &[f64]) -> Option<f64> {
    quantile_sorted(&sorted(data), 0.5)
}

/// Interquartile range (Q3 - Q1) of unsorted data
pub fn iqr(data: &[f64]) -> Option<f64> {
    let sorted = sorted(data);
    Some(quantile_sorted(&sorted, 0.75)? - quantile_sorted(&sorted, 0.25)?)
}

/// Average ranks (1-based) of the values, ties receiving the mean of the
/// ranks they span
///
/// Returns the ranks in input order together with the tie groups' sizes.
pub fn average_ranks(data: &[f64]) -> (Vec<f64>, Vec<usize>) {
    let mut order: Vec<usize> = (0..data.len()).collect();
    order.sort_by(|&a, &b| data[a].total_cmp(&data[b]));

    let mut ranks = vec![0.0; data.len()];
    let mut ties = Vec::new();
    let mut i = 0;
    while i < order.len() {
        let mut j = i + 1;
        while j < order.len() && data[order[j]] == data[order[i]] {
            j += 1;
        }
        // positions i..j (0-based) share ranks i+1..=j
        let rank = (i + 1 + j) as f64 / 2.0;
        for &idx in &order[i..j] {
            ranks[idx] = rank;
        }
        if j - i > 1 {
            ties.push(j - i);
        }
        i = j;
    }
    (ranks, ties)
}
