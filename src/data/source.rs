//! Table sources
//!
//! A table source produces the rectangular numeric table a tree is built and tested on.
//! The last column holds the continuous quality label.
use crate::data::dataset::RealNumber;
use crate::errors::TreeError;
use csv::ReaderBuilder;
use log::debug;
use nalgebra::DMatrix;
use std::path::PathBuf;

/// Anything that can hand over a fixed-width numeric table.
pub trait TableSource<T: RealNumber> {
    /// Returns the table, or fails with a read/parse error.
    fn load(&self) -> Result<DMatrix<T>, TreeError>;
}

impl<T: RealNumber> TableSource<T> for DMatrix<T> {
    fn load(&self) -> Result<DMatrix<T>, TreeError> {
        Ok(self.clone())
    }
}

/// Delimited text file where every field is a number.
#[derive(Clone, Debug)]
pub struct CsvSource {
    path: PathBuf,
    has_headers: bool,
    delimiter: u8,
}

impl CsvSource {
    /// Comma separated file with a header row.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            has_headers: true,
            delimiter: b',',
        }
    }

    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl<T: RealNumber> TableSource<T> for CsvSource {
    fn load(&self) -> Result<DMatrix<T>, TreeError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(self.has_headers)
            .delimiter(self.delimiter)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| TreeError::UnableToRead(e.to_string()))?;

        let mut values = Vec::new();
        let mut width = None;
        let mut nrows = 0;

        for (row, result) in reader.records().enumerate() {
            let record = result.map_err(|e| TreeError::UnableToRead(e.to_string()))?;
            let expected = *width.get_or_insert(record.len());
            if record.len() != expected {
                return Err(TreeError::RaggedTable {
                    row,
                    expected,
                    found: record.len(),
                });
            }
            for field in record.iter() {
                let parsed = field.trim().parse::<f64>().map_err(|e| {
                    TreeError::UnableToRead(format!("row {row}, value {field:?}: {e}"))
                })?;
                let value = T::from_f64(parsed).ok_or_else(|| {
                    TreeError::UnableToRead(format!("row {row}, value {field:?} is out of range"))
                })?;
                values.push(value);
            }
            nrows += 1;
        }

        let ncols = width.unwrap_or(0);
        debug!(
            "Loaded {} row(s) with {} column(s) from {}",
            nrows,
            ncols,
            self.path.display()
        );
        Ok(DMatrix::from_row_slice(nrows, ncols, &values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_in_memory_source() {
        let table = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let loaded: DMatrix<f64> = table.load().unwrap();
        assert_eq!(loaded, table);
    }

    #[test]
    fn test_csv_source_with_headers() {
        let file = write_csv("alcohol,ph,quality\n9.4,3.51,5\n9.8,3.2,6\n");
        let table: DMatrix<f64> = CsvSource::new(file.path()).load().unwrap();
        assert_eq!(table.shape(), (2, 3));
        assert_eq!(table[(1, 2)], 6.0);
    }

    #[test]
    fn test_csv_source_semicolon_without_headers() {
        let file = write_csv("1;2;3\n4;5;6\n7;8;9\n");
        let table: DMatrix<f64> = CsvSource::new(file.path())
            .with_headers(false)
            .with_delimiter(b';')
            .load()
            .unwrap();
        assert_eq!(table.shape(), (3, 3));
        assert_eq!(table[(2, 0)], 7.0);
    }

    #[test]
    fn test_csv_source_rejects_text() {
        let file = write_csv("a,b\n1,red\n");
        let result: Result<DMatrix<f64>, _> = CsvSource::new(file.path()).load();
        assert!(matches!(result, Err(TreeError::UnableToRead(_))));
    }

    #[test]
    fn test_csv_source_rejects_ragged_rows() {
        let file = write_csv("1,2,3\n4,5\n");
        let result: Result<DMatrix<f64>, _> =
            CsvSource::new(file.path()).with_headers(false).load();
        assert_eq!(
            result.unwrap_err(),
            TreeError::RaggedTable {
                row: 1,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn test_csv_source_missing_file() {
        let result: Result<DMatrix<f64>, _> =
            CsvSource::new("/definitely/not/here.csv").load();
        assert!(matches!(result, Err(TreeError::UnableToRead(_))));
    }
}
