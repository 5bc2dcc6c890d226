use nalgebra::{DMatrix, DVector};

use crate::errors::TreeError;

/// 2x2 counts; row = actual, column = predicted, index 0 = bad, index 1 = good.
pub type ConfusionMatrix = DMatrix<usize>;

/// Metrics over good/bad classifications, where "good" is the positive class.
pub trait ClassificationMetrics {
    /// Computes the confusion matrix based on the true labels and predicted labels.
    ///
    /// # Errors
    ///
    /// Fails if the vectors differ in length or are empty.
    fn confusion_matrix(
        &self,
        y_true: &DVector<bool>,
        y_pred: &DVector<bool>,
    ) -> Result<ConfusionMatrix, TreeError> {
        if y_true.len() != y_pred.len() {
            return Err(TreeError::LengthMismatch(y_true.len(), y_pred.len()));
        }
        if y_true.is_empty() {
            return Err(TreeError::EmptyInput("test"));
        }

        let mut matrix = DMatrix::zeros(2, 2);
        for (&y_t, &y_p) in y_true.iter().zip(y_pred.iter()) {
            matrix[(y_t as usize, y_p as usize)] += 1;
        }

        Ok(matrix)
    }

    /// Fraction of predictions that match the true labels.
    fn accuracy(&self, y_true: &DVector<bool>, y_pred: &DVector<bool>) -> Result<f64, TreeError> {
        let matrix = self.confusion_matrix(y_true, y_pred)?;
        let correct = matrix[(0, 0)] + matrix[(1, 1)];

        Ok(correct as f64 / y_true.len() as f64)
    }

    /// Share of "good" predictions that are actually good. 0 when nothing is predicted good.
    fn precision(&self, y_true: &DVector<bool>, y_pred: &DVector<bool>) -> Result<f64, TreeError> {
        let matrix = self.confusion_matrix(y_true, y_pred)?;
        let tp = matrix[(1, 1)];
        let fp = matrix[(0, 1)];

        if tp + fp == 0 {
            return Ok(0.0);
        }
        Ok(tp as f64 / (tp + fp) as f64)
    }

    /// Share of actually good rows predicted good. 0 when there are no good rows.
    fn recall(&self, y_true: &DVector<bool>, y_pred: &DVector<bool>) -> Result<f64, TreeError> {
        let matrix = self.confusion_matrix(y_true, y_pred)?;
        let tp = matrix[(1, 1)];
        let fn_ = matrix[(1, 0)];

        if tp + fn_ == 0 {
            return Ok(0.0);
        }
        Ok(tp as f64 / (tp + fn_) as f64)
    }

    /// Harmonic mean of precision and recall.
    ///
    /// # Errors
    ///
    /// Fails when precision and recall are both 0.
    fn f1_score(&self, y_true: &DVector<bool>, y_pred: &DVector<bool>) -> Result<f64, TreeError> {
        let precision = self.precision(y_true, y_pred)?;
        let recall = self.recall(y_true, y_pred)?;

        match (precision + recall).abs() < f64::EPSILON {
            true => Err(TreeError::InvalidParameter(
                "f1_score".into(),
                "non-zero precision or recall".into(),
                "0".into(),
            )),
            false => Ok(2.0 * (precision * recall) / (precision + recall)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct MockClassifier;

    impl ClassificationMetrics for MockClassifier {}

    fn labels() -> (DVector<bool>, DVector<bool>) {
        (
            DVector::from_vec(vec![true, false, true, false, true]),
            DVector::from_vec(vec![true, true, false, false, true]),
        )
    }

    #[test]
    fn test_confusion_matrix() {
        let (y_true, y_pred) = labels();
        let result = MockClassifier.confusion_matrix(&y_true, &y_pred).unwrap();

        let expected = DMatrix::from_vec(2, 2, vec![1, 1, 1, 2]);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_confusion_matrix_unequal() {
        let y_true = DVector::from_vec(vec![true, false, true]);
        let y_pred = DVector::from_vec(vec![true, false]);

        let result = MockClassifier.confusion_matrix(&y_true, &y_pred);
        assert_eq!(result.unwrap_err(), TreeError::LengthMismatch(3, 2));
    }

    #[test]
    fn test_confusion_matrix_empty() {
        let empty = DVector::<bool>::from_vec(vec![]);
        let result = MockClassifier.confusion_matrix(&empty, &empty);
        assert_eq!(result.unwrap_err(), TreeError::EmptyInput("test"));
    }

    #[test]
    fn test_accuracy() {
        let (y_true, y_pred) = labels();
        assert_relative_eq!(MockClassifier.accuracy(&y_true, &y_pred).unwrap(), 0.6);
        assert_relative_eq!(MockClassifier.accuracy(&y_true, &y_true).unwrap(), 1.0);
    }

    #[test]
    fn test_precision_and_recall() {
        let (y_true, y_pred) = labels();
        assert_relative_eq!(
            MockClassifier.precision(&y_true, &y_pred).unwrap(),
            2.0 / 3.0
        );
        assert_relative_eq!(MockClassifier.recall(&y_true, &y_pred).unwrap(), 2.0 / 3.0);
    }

    #[test]
    fn test_precision_no_positive_predictions() {
        let y_true = DVector::from_vec(vec![true, true, false]);
        let y_pred = DVector::from_vec(vec![false, false, false]);
        assert_eq!(MockClassifier.precision(&y_true, &y_pred).unwrap(), 0.0);
        assert!(MockClassifier.f1_score(&y_true, &y_pred).is_err());
    }

    #[test]
    fn test_f1_score() {
        let (y_true, y_pred) = labels();
        assert_relative_eq!(
            MockClassifier.f1_score(&y_true, &y_pred).unwrap(),
            2.0 / 3.0,
            epsilon = 1e-12
        );
    }
}
