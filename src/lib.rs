//! # Gini-tree
//!
//! `gini-tree` builds a binary decision tree by recursive Gini-impurity minimization over a
//! table whose last column is a continuous quality score. The score is binarized at its mean
//! over the build rows ("good" when strictly above it), and the tree is scored by the fraction
//! of held-out rows it classifies correctly.
//!
//! ## Example Usage
//!
//! ```rust
//! use gini_tree::data::dataset::Dataset;
//! use gini_tree::trees::classifier::GiniTreeClassifier;
//! use nalgebra::DMatrix;
//!
//! let table = DMatrix::from_row_slice(4, 2, &[1.0, 5.0, 2.0, 5.0, 8.0, 1.0, 9.0, 1.0]);
//! let dataset = Dataset::from_table(&table).unwrap();
//!
//! let mut tree = GiniTreeClassifier::new();
//! tree.fit(&dataset).unwrap();
//!
//! assert_eq!(tree.measure_accuracy(&dataset).unwrap(), 1.0);
//! ```

/// Dataset and table sources
pub mod data;
/// Error type
pub mod errors;
/// Build-and-test pipeline
pub mod evaluation;
/// Functions for evaluating model performance
pub mod metrics;
/// Decision trees
pub mod trees;
