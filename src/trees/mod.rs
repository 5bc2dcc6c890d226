/// Gini decision tree classifier: threshold search, recursive partitioning and evaluation
pub mod classifier;
/// Gini impurity of binarized labels
pub mod gini;
/// Split and leaf nodes
pub mod node;
