use crate::data::dataset::RealNumber;
use serde::{Deserialize, Serialize};

/// Decision tree node
///
/// A split sends a row to `left` when `row[feature_index] <= threshold`, otherwise to `right`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TreeNode<T> {
    Split {
        feature_index: usize,
        threshold: T,
        left: Box<TreeNode<T>>,
        right: Box<TreeNode<T>>,
    },
    Leaf {
        is_good: bool,
    },
}

impl<T: RealNumber> TreeNode<T> {
    pub fn split(feature_index: usize, threshold: T, left: TreeNode<T>, right: TreeNode<T>) -> Self {
        TreeNode::Split {
            feature_index,
            threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn leaf(is_good: bool) -> Self {
        TreeNode::Leaf { is_good }
    }

    /// Number of split nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    pub fn node_count(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Split { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Split { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Follows the row down to a leaf and returns its classification.
    ///
    /// The row must have at least as many columns as the largest `feature_index` in the tree.
    pub fn classify(&self, row: &[T]) -> bool {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { is_good } => return *is_good,
                TreeNode::Split {
                    feature_index,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature_index] <= *threshold {
                        left.as_ref()
                    } else {
                        right.as_ref()
                    };
                }
            }
        }
    }

    /// Largest feature index referenced by a split, `None` for a lone leaf.
    pub fn max_feature_index(&self) -> Option<usize> {
        match self {
            TreeNode::Leaf { .. } => None,
            TreeNode::Split {
                feature_index,
                left,
                right,
                ..
            } => [Some(*feature_index), left.max_feature_index(), right.max_feature_index()]
                .into_iter()
                .flatten()
                .max(),
        }
    }
}
