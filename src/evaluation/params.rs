use crate::errors::TreeError;

/// Rows fitted on when nothing else is configured.
pub const DEFAULT_BUILD_ROW_COUNT: usize = 1000;

/// Where the table comes from and how it is divided into build and test rows.
///
/// The first `build_row_count` rows build the tree, the rest test it. With a shuffle seed the
/// rows are put into a seeded random order before dividing.
#[derive(Clone, Debug)]
pub struct EvaluationConfig<S> {
    build_row_count: usize,
    shuffle_seed: Option<u64>,
    source: S,
}

impl<S> EvaluationConfig<S> {
    pub fn new(source: S) -> Self {
        Self {
            build_row_count: DEFAULT_BUILD_ROW_COUNT,
            shuffle_seed: None,
            source,
        }
    }

    /// Creates a configuration with a custom build row count.
    ///
    /// # Errors
    ///
    /// This method will return an error if the build row count is 0.
    pub fn with_params(
        source: S,
        build_row_count: usize,
        shuffle_seed: Option<u64>,
    ) -> Result<Self, TreeError> {
        let mut config = Self::new(source);
        config.set_build_row_count(build_row_count)?;
        config.set_shuffle_seed(shuffle_seed);
        Ok(config)
    }

    pub fn set_build_row_count(&mut self, build_row_count: usize) -> Result<(), TreeError> {
        if build_row_count < 1 {
            return Err(TreeError::InvalidParameter(
                "build_row_count".into(),
                "at least 1".into(),
                build_row_count.to_string(),
            ));
        }
        self.build_row_count = build_row_count;
        Ok(())
    }

    pub fn set_shuffle_seed(&mut self, shuffle_seed: Option<u64>) {
        self.shuffle_seed = shuffle_seed;
    }

    pub fn build_row_count(&self) -> usize {
        self.build_row_count
    }

    pub fn shuffle_seed(&self) -> Option<u64> {
        self.shuffle_seed
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
