//! Gini impurity over binarized (good/bad) labels.

/// Worse than any two-class impurity, used to seed minimum searches.
pub const GINI_SENTINEL: f64 = 0.51;

/// Impurity of a side holding `good` good rows and `bad` bad rows.
///
/// An empty side counts as a perfect separation and has impurity 0.
pub fn gini_impurity(good: usize, bad: usize) -> f64 {
    let total = good + bad;
    if total == 0 {
        return 0.0;
    }
    let p_good = good as f64 / total as f64;
    let p_bad = bad as f64 / total as f64;
    1.0 - p_good * p_good - p_bad * p_bad
}

/// Size-weighted impurity of two sides given their (good, bad) counts.
pub fn weighted_gini_from_counts(left: (usize, usize), right: (usize, usize)) -> f64 {
    let left_total = left.0 + left.1;
    let right_total = right.0 + right.1;
    let total = left_total + right_total;
    if total == 0 {
        return 0.0;
    }
    gini_impurity(left.0, left.1) * (left_total as f64 / total as f64)
        + gini_impurity(right.0, right.1) * (right_total as f64 / total as f64)
}

/// (good, bad) counts of a label slice.
pub fn count_labels(labels: &[bool]) -> (usize, usize) {
    let good = labels.iter().filter(|&&is_good| is_good).count();
    (good, labels.len() - good)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gini_impurity_bounds() {
        for good in 0..12 {
            for bad in 0..12 {
                let gini = gini_impurity(good, bad);
                assert!((0.0..=0.5).contains(&gini));
                let pure = good == 0 || bad == 0;
                assert_eq!(gini == 0.0, pure, "good={good} bad={bad}");
            }
        }
    }

    #[test]
    fn test_gini_impurity_values() {
        assert_relative_eq!(gini_impurity(0, 0), 0.0);
        assert_relative_eq!(gini_impurity(2, 2), 0.5);
        assert_relative_eq!(gini_impurity(1, 3), 0.375, epsilon = 1e-12);
    }

    #[test]
    fn test_weighted_gini_between_children() {
        let labels = [true, false, true, true, false, false, true];
        for row_index in 0..=labels.len() {
            let (left, right) = labels.split_at(row_index);
            let left_gini = gini_impurity(count_labels(left).0, count_labels(left).1);
            let right_gini = gini_impurity(count_labels(right).0, count_labels(right).1);
            let weighted = weighted_gini_from_counts(count_labels(left), count_labels(right));
            assert!(weighted >= left_gini.min(right_gini) - 1e-12);
            assert!(weighted <= left_gini.max(right_gini) + 1e-12);
        }
    }

    #[test]
    fn test_weighted_gini_perfect_split() {
        assert_relative_eq!(weighted_gini_from_counts((2, 0), (0, 2)), 0.0);
        assert_relative_eq!(weighted_gini_from_counts((0, 0), (2, 2)), 0.5);
        assert_relative_eq!(
            weighted_gini_from_counts((1, 0), (1, 2)),
            1.0 / 3.0,
            epsilon = 1e-12
        );
    }
}
