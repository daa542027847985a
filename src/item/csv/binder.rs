use std::{
    env,
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use csv::Trim;
use encoding_rs::Encoding;
use log::debug;

use crate::{
    core::{
        normalizer::SeparatorNormalizer,
        separator::Separator,
        staging::{StagingArea, StagingFile},
    },
    error::BinderResult,
    item::csv::{
        csv_reader::{CsvRecordReader, LazyRecords},
        csv_writer::CsvRecordWriter,
        record::CsvRecord,
    },
};

const DEFAULT_STAGING_DIR: &str = "csv-binder-staging";

/// Entry point for marshalling typed records to and from CSV files.
///
/// A binder only holds its configuration, so it can be shared between
/// threads: concurrent calls each work on their own staging files. Calls
/// writing to the same destination path are not coordinated, though.
///
/// Every separator argument is validated before any I/O takes place; an
/// empty separator is rejected with [`BinderError::InvalidArgument`](crate::BinderError::InvalidArgument).
///
/// # Examples
///
/// ```
/// use csv_binder::item::csv::{CsvBinderBuilder, record::CsvRecord};
/// use encoding_rs::UTF_8;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Serialize, Deserialize, PartialEq)]
/// struct Car {
///     year: u16,
///     make: String,
///     model: String,
/// }
///
/// impl CsvRecord for Car {}
///
/// let dir = tempfile::tempdir().unwrap();
/// let binder = CsvBinderBuilder::new()
///     .staging_dir(dir.path().join("staging"))
///     .build();
///
/// let cars = vec![
///     Car { year: 1948, make: "Porsche".into(), model: "356".into() },
///     Car { year: 1967, make: "Ford".into(), model: "Mustang".into() },
/// ];
///
/// let path = dir.path().join("cars.csv");
/// binder.write_records(&cars, &path, UTF_8, "::|").unwrap();
///
/// let read: Vec<Car> = binder.read_records_from_path(&path, UTF_8, "::|").unwrap();
/// assert_eq!(read, cars);
/// ```
#[derive(Debug, Clone)]
pub struct CsvBinder {
    staging: StagingArea,
    trim: Trim,
}

impl CsvBinder {
    /// The directory staging files are created in.
    pub fn staging_dir(&self) -> &Path {
        self.staging.dir()
    }

    /// Writes `records` to `destination` using `separator` between fields.
    ///
    /// The destination is replaced as a whole, or left untouched on failure.
    /// Zero records produce an empty file without a header row.
    pub fn write_records<T: CsvRecord, P: AsRef<Path>>(
        &self,
        records: &[T],
        destination: P,
        encoding: &'static Encoding,
        separator: &str,
    ) -> BinderResult<()> {
        let separator = Separator::new(separator)?;
        CsvRecordWriter::new(&self.staging).write_all(records, destination, encoding, &separator)
    }

    /// Reads every record from `source`.
    ///
    /// Blank lines are ignored; a source without content yields an empty
    /// vector.
    pub fn read_records<T: CsvRecord, R: Read>(
        &self,
        source: R,
        encoding: &'static Encoding,
        separator: &str,
    ) -> BinderResult<Vec<T>> {
        let separator = Separator::new(separator)?;
        CsvRecordReader::new(&self.staging, self.trim).read_all(source, encoding, &separator)
    }

    /// Reads every record from the file at `path`.
    pub fn read_records_from_path<T: CsvRecord, P: AsRef<Path>>(
        &self,
        path: P,
        encoding: &'static Encoding,
        separator: &str,
    ) -> BinderResult<Vec<T>> {
        let separator = Separator::new(separator)?;
        let file = File::open(path.as_ref())?;
        debug!("Reading records from {}", path.as_ref().display());
        CsvRecordReader::new(&self.staging, self.trim).read_all(file, encoding, &separator)
    }

    /// Returns a lazy cursor over a sentinel-separated stream, typically one
    /// opened from the file returned by [`CsvBinder::prepare_processable_file`].
    ///
    /// The stream stays owned by the caller, who closes it once the cursor
    /// is done.
    pub fn read_records_lazy<'a, T: CsvRecord, R: Read>(
        &self,
        normalized: &'a mut R,
        encoding: &'static Encoding,
    ) -> LazyRecords<'a, R, T> {
        LazyRecords::new(normalized, encoding, self.trim)
    }

    /// Rewrites `source` with the sentinel separator so it can be read lazily.
    ///
    /// Returns `Ok(None)` when the source has no non-blank line. The returned
    /// staging file is deleted when dropped.
    pub fn prepare_processable_file<R: Read>(
        &self,
        source: R,
        encoding: &'static Encoding,
        source_separator: &str,
    ) -> BinderResult<Option<StagingFile>> {
        let source_separator = Separator::new(source_separator)?;
        self.normalize(source, encoding, &source_separator, &Separator::sentinel())
    }

    /// [`CsvBinder::prepare_processable_file`] for a file on disk.
    pub fn prepare_processable_path<P: AsRef<Path>>(
        &self,
        path: P,
        encoding: &'static Encoding,
        source_separator: &str,
    ) -> BinderResult<Option<StagingFile>> {
        let source_separator = Separator::new(source_separator)?;
        let file = File::open(path)?;
        self.normalize(file, encoding, &source_separator, &Separator::sentinel())
    }

    /// Replaces every literal occurrence of `source_separator` by
    /// `target_separator` into a new staging file, dropping blank lines.
    ///
    /// Returns `Ok(None)` when the source has no non-blank line.
    pub fn rewrite_separator<R: Read>(
        &self,
        source: R,
        encoding: &'static Encoding,
        source_separator: &str,
        target_separator: &str,
    ) -> BinderResult<Option<StagingFile>> {
        let source_separator = Separator::new(source_separator)?;
        let target_separator = Separator::new(target_separator)?;
        self.normalize(source, encoding, &source_separator, &target_separator)
    }

    /// [`CsvBinder::rewrite_separator`] for a file on disk.
    pub fn rewrite_separator_in_path<P: AsRef<Path>>(
        &self,
        path: P,
        encoding: &'static Encoding,
        source_separator: &str,
        target_separator: &str,
    ) -> BinderResult<Option<StagingFile>> {
        let source_separator = Separator::new(source_separator)?;
        let target_separator = Separator::new(target_separator)?;
        let file = File::open(path)?;
        self.normalize(file, encoding, &source_separator, &target_separator)
    }

    fn normalize<R: Read>(
        &self,
        source: R,
        encoding: &'static Encoding,
        source_separator: &Separator,
        target_separator: &Separator,
    ) -> BinderResult<Option<StagingFile>> {
        SeparatorNormalizer::new(&self.staging).normalize(
            source,
            encoding,
            encoding,
            source_separator,
            target_separator,
        )
    }
}

/// A builder for configuring a [`CsvBinder`].
///
/// # Default Configuration
///
/// - Staging directory: `csv-binder-staging` under the system temp directory
/// - Trimming: none, fields are read exactly as written
///
/// # Examples
///
/// ```
/// use csv::Trim;
/// use csv_binder::item::csv::CsvBinderBuilder;
///
/// let binder = CsvBinderBuilder::new()
///     .staging_dir("/var/tmp/imports")
///     .trim(Trim::All)
///     .build();
///
/// assert_eq!(binder.staging_dir(), std::path::Path::new("/var/tmp/imports"));
/// ```
#[derive(Debug, Clone)]
pub struct CsvBinderBuilder {
    staging_dir: PathBuf,
    trim: Trim,
}

impl Default for CsvBinderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvBinderBuilder {
    pub fn new() -> Self {
        Self {
            staging_dir: env::temp_dir().join(DEFAULT_STAGING_DIR),
            trim: Trim::None,
        }
    }

    /// Sets the directory staging files are created in. It is created on
    /// first use.
    pub fn staging_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.staging_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Sets how whitespace around fields is trimmed when reading.
    pub fn trim(mut self, trim: Trim) -> Self {
        self.trim = trim;
        self
    }

    pub fn build(self) -> CsvBinder {
        CsvBinder {
            staging: StagingArea::new(self.staging_dir),
            trim: self.trim,
        }
    }
}

#[cfg(test)]
mod tests {
    use encoding_rs::UTF_8;

    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::{BinderError, item::csv::record::ColumnBinding};

    #[derive(Serialize, Deserialize)]
    struct Pair(String, String);

    impl CsvRecord for Pair {
        const BINDING: ColumnBinding = ColumnBinding::ByPosition;
    }

    #[test]
    fn empty_separators_are_rejected_before_any_io() {
        let binder = CsvBinderBuilder::new()
            .staging_dir("/nonexistent/never/created")
            .build();

        let read = binder.read_records_from_path::<Pair, _>(
            "/nonexistent/input.csv",
            UTF_8,
            "",
        );
        assert!(matches!(read, Err(BinderError::InvalidArgument(_))));

        let rewrite = binder.rewrite_separator("a,b".as_bytes(), UTF_8, ",", "");
        assert!(matches!(rewrite, Err(BinderError::InvalidArgument(_))));

        let write = binder.write_records::<Pair, _>(&[], "/nonexistent/out.csv", UTF_8, "");
        assert!(matches!(write, Err(BinderError::InvalidArgument(_))));

        assert!(!binder.staging_dir().exists());
    }

    #[test]
    fn builder_defaults_to_the_system_temp_directory() {
        let binder = CsvBinderBuilder::default().build();
        assert!(binder.staging_dir().starts_with(env::temp_dir()));
    }
}
