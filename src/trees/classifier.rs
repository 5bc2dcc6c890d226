//! Decision Tree Classifier
//!
//! Greedy Gini-minimizing tree over a continuous label binarized at its build-set mean.
use super::gini::{count_labels, weighted_gini_from_counts, GINI_SENTINEL};
use super::node::TreeNode;
use crate::{
    data::dataset::{total_order, Dataset, RealNumber},
    errors::TreeError,
    metrics::confusion::ClassificationMetrics,
};
use log::{debug, info, warn};
use nalgebra::{DMatrix, DVector};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{collections::BTreeSet, fs, path::Path};

/// Best threshold found on a single feature column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThresholdSplit<T: RealNumber> {
    pub gini: f64,
    pub threshold: T,
    /// Rows `[0, row_index)` of the column-sorted data fall at or below the threshold.
    pub row_index: usize,
}

/// Split chosen for a node among its free variables.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitData<T: RealNumber> {
    pub feature_index: usize,
    pub gini: f64,
    pub threshold: T,
    pub row_index: usize,
}

/// Decision Tree Classifier
///
/// Rows are "good" when their label is strictly above the mean label of the data the tree was
/// fitted on. Rows with `value <= threshold` go to the left child, both while building and
/// while predicting.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GiniTreeClassifier<T: RealNumber> {
    root: Option<TreeNode<T>>,
    average_quality: Option<T>,
    num_features: usize,
}

impl<T: RealNumber> Default for GiniTreeClassifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RealNumber> ClassificationMetrics for GiniTreeClassifier<T> {}

impl<T: RealNumber> GiniTreeClassifier<T> {
    /// Creates an unfitted classifier.
    pub fn new() -> Self {
        Self {
            root: None,
            average_quality: None,
            num_features: 0,
        }
    }

    /// Root of the fitted tree.
    pub fn root(&self) -> Option<&TreeNode<T>> {
        self.root.as_ref()
    }

    /// Mean label of the build data (avQ), the threshold between "bad" and "good".
    pub fn average_quality(&self) -> Option<T> {
        self.average_quality
    }

    /// Number of feature columns the tree was built on.
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Builds the decision tree from a dataset.
    ///
    /// # Returns
    ///
    /// A string indicating that the tree was built successfully.
    ///
    /// # Errors
    ///
    /// [`TreeError::EmptyInput`] for a dataset without rows, [`TreeError::NoFeatures`] for
    /// one without feature columns and [`TreeError::LengthMismatch`] when the feature matrix
    /// and the label vector have different row counts.
    pub fn fit(&mut self, dataset: &Dataset<T>) -> Result<String, TreeError> {
        dataset.check_shape()?;
        if dataset.nrows() == 0 {
            return Err(TreeError::EmptyInput("build"));
        }
        if dataset.nfeatures() == 0 {
            return Err(TreeError::NoFeatures(1));
        }
        let average_quality = dataset.mean_label().ok_or(TreeError::EmptyInput("build"))?;

        let mut free_vars: BTreeSet<usize> = (0..dataset.nfeatures()).collect();
        let root = match Self::select_split(dataset, &mut free_vars, average_quality) {
            Ok(split) => Self::build_tree(dataset, &free_vars, split, average_quality),
            Err(TreeError::DegenerateSplit) => {
                warn!("No feature has two distinct values, the tree is a single leaf.");
                TreeNode::leaf(Self::majority_label(dataset, average_quality))
            }
            Err(e) => return Err(e),
        };

        info!(
            "Built tree on {} row(s): average quality {}, depth {}, {} leaves.",
            dataset.nrows(),
            average_quality,
            root.depth(),
            root.leaf_count()
        );

        self.root = Some(root);
        self.average_quality = Some(average_quality);
        self.num_features = dataset.nfeatures();
        Ok("Finished building the tree.".into())
    }

    /// Predicts good (`true`) or bad (`false`) for every row of a feature matrix.
    ///
    /// # Errors
    ///
    /// [`TreeError::NotFitted`] before `fit`, [`TreeError::ShapeMismatch`] when rows have fewer
    /// columns than the build data.
    pub fn predict(&self, features: &DMatrix<T>) -> Result<DVector<bool>, TreeError> {
        let root = self.root.as_ref().ok_or(TreeError::NotFitted)?;
        if features.ncols() < self.num_features {
            return Err(TreeError::ShapeMismatch {
                expected: self.num_features,
                found: features.ncols(),
            });
        }
        let predictions: Vec<_> = features
            .row_iter()
            .map(|row| {
                let row: Vec<T> = row.iter().copied().collect();
                root.classify(&row)
            })
            .collect();

        Ok(DVector::from_vec(predictions))
    }

    /// Classifies a single row by walking the tree.
    pub fn classify(&self, row: &[T]) -> Result<bool, TreeError> {
        let root = self.root.as_ref().ok_or(TreeError::NotFitted)?;
        if row.len() < self.num_features {
            return Err(TreeError::ShapeMismatch {
                expected: self.num_features,
                found: row.len(),
            });
        }
        Ok(root.classify(row))
    }

    /// Fraction of test rows whose prediction matches `label > average_quality`.
    ///
    /// The stored build-set average is used, never a statistic of the test rows.
    ///
    /// # Errors
    ///
    /// [`TreeError::EmptyInput`] for a test set without rows, [`TreeError::LengthMismatch`] when
    /// its features and labels have different row counts, plus the errors of [`Self::predict`].
    pub fn measure_accuracy(&self, test: &Dataset<T>) -> Result<f64, TreeError> {
        let average_quality = self.average_quality.ok_or(TreeError::NotFitted)?;
        test.check_shape()?;
        if test.nrows() == 0 {
            return Err(TreeError::EmptyInput("test"));
        }
        let y_true = DVector::from_vec(test.binarized_labels(average_quality));
        let y_pred = self.predict(&test.x)?;
        let accuracy = self.accuracy(&y_true, &y_pred)?;

        info!(
            "Classified {} test row(s) with accuracy {:.4}.",
            test.nrows(),
            accuracy
        );
        Ok(accuracy)
    }

    /// Picks the free variable with the lowest split impurity and removes it from `free_vars`.
    ///
    /// Variables are scanned in ascending index order; on equal impurity the first one wins.
    ///
    /// # Errors
    ///
    /// [`TreeError::DegenerateSplit`] when no free variable has a candidate threshold.
    pub fn select_split(
        dataset: &Dataset<T>,
        free_vars: &mut BTreeSet<usize>,
        average_quality: T,
    ) -> Result<SplitData<T>, TreeError> {
        let mut best: Option<SplitData<T>> = None;

        for &feature_index in free_vars.iter() {
            let Some(split) = Self::best_threshold_for_column(dataset, feature_index, average_quality)
            else {
                continue;
            };
            if best.map_or(true, |b| split.gini < b.gini) {
                best = Some(SplitData {
                    feature_index,
                    gini: split.gini,
                    threshold: split.threshold,
                    row_index: split.row_index,
                });
            }
        }

        let best = best.ok_or(TreeError::DegenerateSplit)?;
        free_vars.remove(&best.feature_index);
        Ok(best)
    }

    /// Lowest weighted impurity over the midpoints of adjacent distinct values of one column.
    ///
    /// Returns `None` if the column has fewer than two distinct values.
    pub fn best_threshold_for_column(
        dataset: &Dataset<T>,
        feature_index: usize,
        average_quality: T,
    ) -> Option<ThresholdSplit<T>> {
        let column = dataset.x.column(feature_index);
        let mut order = (0..dataset.nrows()).collect::<Vec<_>>();
        order.sort_by(|&a, &b| total_order(&column[a], &column[b]));
        let values: Vec<T> = order.iter().map(|&i| column[i]).collect();
        let labels: Vec<bool> = order
            .iter()
            .map(|&i| dataset.y[i] > average_quality)
            .collect();

        let n = values.len();
        let (total_good, total_bad) = count_labels(&labels);
        let mut good_prefix = Vec::with_capacity(n + 1);
        good_prefix.push(0usize);
        for &is_good in &labels {
            let last = good_prefix[good_prefix.len() - 1];
            good_prefix.push(last + is_good as usize);
        }

        let two = T::one() + T::one();
        let mut best_gini = GINI_SENTINEL;
        let mut best: Option<ThresholdSplit<T>> = None;

        for pair in values.windows(2) {
            if pair[0] >= pair[1] {
                continue;
            }
            let threshold = (pair[0] + pair[1]) / two;
            let row_index = values.partition_point(|&v| v <= threshold);
            if row_index == 0 || row_index == n {
                continue;
            }
            let left_good = good_prefix[row_index];
            let left = (left_good, row_index - left_good);
            let right = (total_good - left_good, total_bad - left.1);
            let gini = weighted_gini_from_counts(left, right);
            if gini < best_gini {
                best_gini = gini;
                best = Some(ThresholdSplit {
                    gini,
                    threshold,
                    row_index,
                });
            }
        }
        best
    }

    /// `true` iff strictly more rows are above `average_quality` than at or below it.
    pub fn majority_label(dataset: &Dataset<T>, average_quality: T) -> bool {
        let (good, bad) = count_labels(&dataset.binarized_labels(average_quality));
        good > bad
    }

    fn build_tree(
        dataset: &Dataset<T>,
        free_vars: &BTreeSet<usize>,
        split: SplitData<T>,
        average_quality: T,
    ) -> TreeNode<T> {
        debug!(
            "Split on feature {} at {} (gini {:.4}, {} | {} rows).",
            split.feature_index,
            split.threshold,
            split.gini,
            split.row_index,
            dataset.nrows() - split.row_index
        );
        let sorted = dataset.sorted_by_feature(split.feature_index);
        let (left, right) = sorted.split_at(split.row_index);

        let left_node = Self::build_side(&left, free_vars.clone(), &split, average_quality);
        let right_node = Self::build_side(&right, free_vars.clone(), &split, average_quality);
        TreeNode::split(split.feature_index, split.threshold, left_node, right_node)
    }

    fn build_side(
        subset: &Dataset<T>,
        mut free_vars: BTreeSet<usize>,
        parent: &SplitData<T>,
        average_quality: T,
    ) -> TreeNode<T> {
        if free_vars.len() <= 1 {
            return Self::leaf(subset, average_quality);
        }
        match Self::select_split(subset, &mut free_vars, average_quality) {
            Ok(next) if next.gini <= parent.gini => {
                Self::build_tree(subset, &free_vars, next, average_quality)
            }
            // Either no usable threshold or a split that would raise impurity.
            _ => Self::leaf(subset, average_quality),
        }
    }

    fn leaf(subset: &Dataset<T>, average_quality: T) -> TreeNode<T> {
        let is_good = Self::majority_label(subset, average_quality);
        debug!("Leaf over {} row(s): good = {}.", subset.nrows(), is_good);
        TreeNode::leaf(is_good)
    }
}

impl<T: RealNumber + Serialize + DeserializeOwned> GiniTreeClassifier<T> {
    /// Dump the fitted classifier as a json string.
    pub fn json_dump(&self) -> Result<String, TreeError> {
        serde_json::to_string(self).map_err(|e| TreeError::UnableToWrite(e.to_string()))
    }

    /// Load a classifier from a json string.
    ///
    /// # Errors
    ///
    /// [`TreeError::UnableToRead`] for invalid json, for a tree that splits on a feature index
    /// outside `num_features`, or when only one of the tree and its average quality is present.
    pub fn from_json(json_str: &str) -> Result<Self, TreeError> {
        let model = serde_json::from_str::<Self>(json_str)
            .map_err(|e| TreeError::UnableToRead(e.to_string()))?;

        if model.root.is_some() != model.average_quality.is_some() {
            return Err(TreeError::UnableToRead(
                "tree and average quality must be stored together".into(),
            ));
        }
        if let Some(feature_index) = model.root.as_ref().and_then(TreeNode::max_feature_index) {
            if feature_index >= model.num_features {
                return Err(TreeError::UnableToRead(format!(
                    "split on feature {} of a tree built on {} feature(s)",
                    feature_index, model.num_features
                )));
            }
        }
        Ok(model)
    }

    /// Save the classifier as json to a file.
    pub fn save_tree(&self, path: impl AsRef<Path>) -> Result<(), TreeError> {
        let model = self.json_dump()?;
        fs::write(path, model).map_err(|e| TreeError::UnableToWrite(e.to_string()))
    }

    /// Load a classifier saved with [`Self::save_tree`].
    pub fn load_tree(path: impl AsRef<Path>) -> Result<Self, TreeError> {
        let json_str =
            fs::read_to_string(path).map_err(|e| TreeError::UnableToRead(e.to_string()))?;
        Self::from_json(&json_str)
    }
}
