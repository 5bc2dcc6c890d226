/// Dataset type and row manipulation utilities
pub mod dataset;
/// Table sources (in-memory and CSV)
pub mod source;
