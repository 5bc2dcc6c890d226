use crate::errors::TreeError;
use nalgebra::{DMatrix, DVector};
use num_traits::{Float, FromPrimitive, Num, ToPrimitive};
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};
use std::cmp::{Ordering, PartialOrd};
use std::fmt::{self, Display};
use std::fmt::{Debug, Formatter};
use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

pub trait DataValue:
    Debug
    + Clone
    + Copy
    + Num
    + FromPrimitive
    + ToPrimitive
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + Send
    + Sync
    + Display
    + 'static
{
}

impl<T> DataValue for T where
    T: Debug
        + Clone
        + Copy
        + Num
        + FromPrimitive
        + ToPrimitive
        + AddAssign
        + SubAssign
        + MulAssign
        + DivAssign
        + Send
        + Sync
        + Display
        + 'static
{
}

pub trait Number: DataValue + PartialOrd {}
impl<T> Number for T where T: DataValue + PartialOrd {}

pub trait RealNumber: Number + Float {}
impl<T> RealNumber for T where T: Number + Float {}

/// Ascending order over all values with every NaN placed after the numbers.
///
/// Missing values are not supported; this only keeps sorting well defined if one slips in.
pub fn total_order<T: RealNumber>(a: &T, b: &T) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) => Ordering::Equal,
    }
}

/// Feature matrix plus the continuous quality label of every row.
///
/// A raw table keeps the label in its last column; [`Dataset::from_table`] separates it.
#[derive(Clone, PartialEq)]
pub struct Dataset<T: RealNumber> {
    pub x: DMatrix<T>,
    pub y: DVector<T>,
}

impl<T: RealNumber> Debug for Dataset<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Dataset {{\n    x: [\n")?;

        for i in 0..self.x.nrows() {
            write!(f, "        [")?;
            for j in 0..self.x.ncols() {
                write!(f, "{:?}, ", self.x[(i, j)])?;
            }
            writeln!(f, "],")?;
        }

        write!(f, "    ],\n    y: [")?;
        for i in 0..self.y.len() {
            write!(f, "{:?}, ", self.y[i])?;
        }
        write!(f, "]\n}}")
    }
}

impl<T: RealNumber> Dataset<T> {
    pub fn new(x: DMatrix<T>, y: DVector<T>) -> Self {
        Self { x, y }
    }

    /// Splits a raw table into features and the label held in its last column.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NoFeatures`] if the table has fewer than two columns.
    pub fn from_table(table: &DMatrix<T>) -> Result<Self, TreeError> {
        let ncols = table.ncols();
        if ncols < 2 {
            return Err(TreeError::NoFeatures(ncols));
        }
        let x = table.columns(0, ncols - 1).clone_owned();
        let y = table.column(ncols - 1).clone_owned();
        Ok(Self::new(x, y))
    }

    /// Fails with [`TreeError::LengthMismatch`] unless `x` has one row per label.
    pub fn check_shape(&self) -> Result<(), TreeError> {
        if self.x.nrows() != self.y.len() {
            return Err(TreeError::LengthMismatch(self.x.nrows(), self.y.len()));
        }
        Ok(())
    }

    pub fn is_not_empty(&self) -> bool {
        !(self.x.is_empty() || self.y.is_empty())
    }

    pub fn nrows(&self) -> usize {
        self.y.len()
    }

    pub fn nfeatures(&self) -> usize {
        self.x.ncols()
    }

    /// Mean of the label column, `None` for an empty dataset.
    pub fn mean_label(&self) -> Option<T> {
        if self.y.is_empty() {
            return None;
        }
        let n = T::from_usize(self.y.len())?;
        Some(self.y.iter().fold(T::zero(), |acc, &v| acc + v) / n)
    }

    /// Labels binarized against `average_quality`: `true` ("good") iff `label > average_quality`.
    pub fn binarized_labels(&self, average_quality: T) -> Vec<bool> {
        self.y.iter().map(|&label| label > average_quality).collect()
    }

    /// First `rows` rows and the remainder. `rows` is clamped to the dataset size.
    pub fn split_at(&self, rows: usize) -> (Self, Self) {
        let rows = rows.min(self.nrows());
        let rest = self.nrows() - rows;
        let head = Self::new(
            self.x.rows(0, rows).clone_owned(),
            self.y.rows(0, rows).clone_owned(),
        );
        let tail = Self::new(
            self.x.rows(rows, rest).clone_owned(),
            self.y.rows(rows, rest).clone_owned(),
        );
        (head, tail)
    }

    /// Copy with rows in a seeded random order.
    pub fn shuffled(&self, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut indices = (0..self.nrows()).collect::<Vec<_>>();
        indices.shuffle(&mut rng);
        self.select(&indices)
    }

    /// Copy with rows sorted ascending by one feature column, NaN last. The sort is stable.
    pub fn sorted_by_feature(&self, feature_index: usize) -> Self {
        let column = self.x.column(feature_index);
        let mut indices = (0..self.nrows()).collect::<Vec<_>>();
        indices.sort_by(|&a, &b| total_order(&column[a], &column[b]));
        self.select(&indices)
    }

    fn select(&self, indices: &[usize]) -> Self {
        Self::new(self.x.select_rows(indices), self.y.select_rows(indices))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn sample() -> Dataset<f64> {
        let x = DMatrix::from_row_slice(4, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        let y = DVector::from_vec(vec![9.0, 10.0, 11.0, 12.0]);
        Dataset::new(x, y)
    }

    #[test]
    fn test_check_shape() {
        assert!(sample().check_shape().is_ok());

        let mismatched = Dataset::new(
            DMatrix::from_row_slice(2, 1, &[1.0, 2.0]),
            DVector::from_vec(vec![1.0, 2.0, 3.0]),
        );
        assert_eq!(
            mismatched.check_shape().unwrap_err(),
            TreeError::LengthMismatch(2, 3)
        );
    }

    #[test]
    fn test_dataset_formatting() {
        let x = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let y = DVector::from_vec(vec![5.0, 6.0]);
        let dataset = Dataset::new(x, y);

        let expected_str = "\
Dataset {
    x: [
        [1.0, 2.0, ],
        [3.0, 4.0, ],
    ],
    y: [5.0, 6.0, ]
}";
        assert_eq!(format!("{:?}", dataset), expected_str);
    }

    #[test]
    fn test_dataset_is_not_empty() {
        assert!(sample().is_not_empty());

        let empty_x = DMatrix::<f64>::from_row_slice(0, 2, &[]);
        let empty_y = DVector::<f64>::from_vec(vec![]);
        let empty_dataset = Dataset::new(empty_x, empty_y);
        assert!(!empty_dataset.is_not_empty());
    }

    #[test]
    fn test_from_table_takes_last_column_as_label() {
        let table = DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let dataset = Dataset::from_table(&table).unwrap();
        assert_eq!(dataset.nfeatures(), 2);
        assert_eq!(dataset.y, DVector::from_vec(vec![3.0, 6.0]));
        assert_eq!(dataset.x.row(1)[0], 4.0);
    }

    #[test]
    fn test_from_table_without_features() {
        let table = DMatrix::from_row_slice(2, 1, &[1.0, 2.0]);
        assert_eq!(
            Dataset::from_table(&table).unwrap_err(),
            TreeError::NoFeatures(1)
        );
    }

    #[test]
    fn test_mean_label() {
        assert_relative_eq!(sample().mean_label().unwrap(), 10.5);
        let (empty, _) = sample().split_at(0);
        assert!(empty.mean_label().is_none());
    }

    #[test]
    fn test_binarized_labels_are_strict() {
        let labels = sample().binarized_labels(10.0);
        assert_eq!(labels, vec![false, false, true, true]);
    }

    #[test]
    fn test_split_at() {
        let (head, tail) = sample().split_at(3);
        assert_eq!(head.nrows(), 3);
        assert_eq!(tail.nrows(), 1);
        assert_eq!(tail.y[0], 12.0);

        let (head, tail) = sample().split_at(10);
        assert_eq!(head.nrows(), 4);
        assert!(!tail.is_not_empty());
    }

    #[test]
    fn test_shuffled_with_seed_is_reproducible() {
        let dataset = sample();
        let first = dataset.shuffled(1000);
        let second = dataset.shuffled(1000);
        assert_eq!(first, second);
        assert_relative_eq!(first.y.sum(), dataset.y.sum());
    }

    #[test]
    fn test_sorted_by_feature() {
        let x = DMatrix::from_row_slice(3, 2, &[3.0, 0.0, 1.0, 5.0, 2.0, 7.0]);
        let y = DVector::from_vec(vec![30.0, 10.0, 20.0]);
        let sorted = Dataset::new(x, y).sorted_by_feature(0);
        assert_eq!(sorted.y, DVector::from_vec(vec![10.0, 20.0, 30.0]));
        assert_eq!(sorted.x.row(0)[1], 5.0);
    }

    #[test]
    fn test_sorted_by_feature_puts_nan_last() {
        let x = DMatrix::from_row_slice(4, 1, &[3.0, f64::NAN, 1.0, 2.0]);
        let y = DVector::from_vec(vec![30.0, 0.0, 10.0, 20.0]);
        let sorted = Dataset::new(x, y).sorted_by_feature(0);
        assert_eq!(sorted.y, DVector::from_vec(vec![10.0, 20.0, 30.0, 0.0]));
        assert!(sorted.x[(3, 0)].is_nan());
    }

    #[test]
    fn test_total_order() {
        assert_eq!(total_order(&1.0, &2.0), Ordering::Less);
        assert_eq!(total_order(&f64::NAN, &2.0), Ordering::Greater);
        assert_eq!(total_order(&2.0, &f64::NAN), Ordering::Less);
        assert_eq!(total_order(&f64::NAN, &f64::NAN), Ordering::Equal);
    }
}
