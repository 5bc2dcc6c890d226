//! Load a table, fit a tree on its build rows and score it on the rest.

/// Evaluation configuration
pub mod params;

use crate::{
    data::{
        dataset::{Dataset, RealNumber},
        source::TableSource,
    },
    errors::TreeError,
    trees::classifier::GiniTreeClassifier,
};
use log::info;
use params::EvaluationConfig;

/// Outcome of one build-and-test run.
#[derive(Clone, Debug, PartialEq)]
pub struct EvaluationReport {
    pub accuracy: f64,
    pub build_rows: usize,
    pub test_rows: usize,
    pub depth: usize,
    pub leaves: usize,
}

/// Runs the whole pipeline and returns the fitted classifier with its report.
///
/// # Errors
///
/// Propagates read/parse errors of the source, [`TreeError::NoFeatures`] for a table with a
/// single column and [`TreeError::EmptyInput`] when either subset has no rows.
pub fn evaluate<T, S>(
    config: &EvaluationConfig<S>,
) -> Result<(GiniTreeClassifier<T>, EvaluationReport), TreeError>
where
    T: RealNumber,
    S: TableSource<T>,
{
    let table = config.source().load()?;
    let mut dataset = Dataset::from_table(&table)?;
    if let Some(seed) = config.shuffle_seed() {
        dataset = dataset.shuffled(seed);
    }
    let (build, test) = dataset.split_at(config.build_row_count());
    if !test.is_not_empty() {
        return Err(TreeError::EmptyInput("test"));
    }

    let mut classifier = GiniTreeClassifier::new();
    classifier.fit(&build)?;
    let accuracy = classifier.measure_accuracy(&test)?;

    let (depth, leaves) = classifier
        .root()
        .map_or((0, 0), |root| (root.depth(), root.leaf_count()));
    let report = EvaluationReport {
        accuracy,
        build_rows: build.nrows(),
        test_rows: test.nrows(),
        depth,
        leaves,
    };
    info!("{:?}", report);
    Ok((classifier, report))
}
