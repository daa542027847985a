use csv::{DeserializeRecordsIntoIter, Reader, ReaderBuilder, Trim};
use encoding_rs::{Encoding, UTF_8};
use log::debug;
use serde::de::DeserializeOwned;
use std::{
    cell::RefCell,
    io::{BufReader, Read},
};

use crate::{
    core::{
        encoding::{DecodeReader, decode_reader},
        item::{RecordReader, RecordReaderResult},
        normalizer::{NonBlankLines, SeparatorNormalizer},
        separator::{SENTINEL_BYTE, Separator},
        staging::StagingArea,
    },
    error::{BinderError, BinderResult},
    item::csv::record::{ColumnBinding, CsvRecord},
};

/// Configures the CSV engine for one read.
///
/// - Strict parsing (not flexible): every row must have the same number of fields
/// - Headers according to the record's [`ColumnBinding`]
/// - Default CRLF terminator, which accepts both `\n` and `\r\n`
fn engine<R: Read>(source: R, delimiter: u8, binding: ColumnBinding, trim: Trim) -> Reader<R> {
    ReaderBuilder::new()
        .trim(trim)
        .delimiter(delimiter)
        .has_headers(binding.has_headers())
        .flexible(false)
        .from_reader(source)
}

/// Reads whole sources into memory.
///
/// Separators the engine can take as a single byte are used directly; every
/// other separator is first rewritten to the sentinel in a staging file,
/// which is removed once the records are parsed.
pub struct CsvRecordReader<'a> {
    staging: &'a StagingArea,
    trim: Trim,
}

impl<'a> CsvRecordReader<'a> {
    pub fn new(staging: &'a StagingArea, trim: Trim) -> Self {
        Self { staging, trim }
    }

    /// Reads every record of `source`.
    ///
    /// # Returns
    /// - `Ok(records)`, empty when the source has no non-blank line
    /// - `Err(BinderError::Io(_))` on read or staging failures
    /// - `Err(BinderError::Csv(_))` when a row cannot be parsed into `T`
    pub fn read_all<T: CsvRecord, R: Read>(
        &self,
        source: R,
        encoding: &'static Encoding,
        separator: &Separator,
    ) -> BinderResult<Vec<T>> {
        if let Some(delimiter) = separator.as_byte() {
            debug!("Separator {:?} fits the engine, reading without staging", separator);
            let lines = NonBlankLines::new(BufReader::new(decode_reader(source, encoding)));
            return collect(engine(lines, delimiter, T::BINDING, self.trim));
        }

        let staged = SeparatorNormalizer::new(self.staging).normalize(
            source,
            encoding,
            UTF_8,
            separator,
            &Separator::sentinel(),
        )?;

        match staged {
            None => {
                debug!("Source has no content, nothing to parse");
                Ok(Vec::new())
            }
            Some(staged) => {
                let file = BufReader::new(staged.open()?);
                collect(engine(file, SENTINEL_BYTE, T::BINDING, self.trim))
            }
        }
    }
}

fn collect<T: DeserializeOwned, R: Read>(reader: Reader<R>) -> BinderResult<Vec<T>> {
    reader
        .into_deserialize::<T>()
        .map(|record| record.map_err(BinderError::from))
        .collect()
}

/// A lazy, forward-only cursor over the records of a sentinel-separated stream.
///
/// The cursor borrows the stream rather than owning it: the caller opens the
/// stream, keeps it alive while the cursor is in use, and closes it afterwards.
/// Since the borrow outlives every read, reading from a closed stream cannot
/// happen.
///
/// The records can be consumed once, either through [`Iterator`] or through
/// [`RecordReader::read`].
///
/// # Examples
///
/// ```
/// use csv_binder::core::item::RecordReader;
/// use csv_binder::item::csv::{CsvBinderBuilder, record::CsvRecord};
/// use encoding_rs::UTF_8;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Serialize, Deserialize, PartialEq)]
/// struct City {
///     name: String,
///     pop: u32,
/// }
///
/// impl CsvRecord for City {}
///
/// let binder = CsvBinderBuilder::new().build();
/// let mut stream = "name\u{1}pop\nBoston\u{1}4628910\n".as_bytes();
///
/// let cities = binder.read_records_lazy::<City, _>(&mut stream, UTF_8);
/// let boston = cities.read().unwrap().unwrap();
/// assert_eq!(boston.name, "Boston");
/// assert!(cities.read().unwrap().is_none());
/// ```
pub struct LazyRecords<'a, R, T> {
    records: RefCell<DeserializeRecordsIntoIter<DecodeReader<&'a mut R>, T>>,
}

impl<'a, R: Read, T: CsvRecord> LazyRecords<'a, R, T> {
    pub(crate) fn new(stream: &'a mut R, encoding: &'static Encoding, trim: Trim) -> Self {
        let reader = engine(
            decode_reader(stream, encoding),
            SENTINEL_BYTE,
            T::BINDING,
            trim,
        );
        Self {
            records: RefCell::new(reader.into_deserialize()),
        }
    }
}

impl<R: Read, T: DeserializeOwned> Iterator for LazyRecords<'_, R, T> {
    type Item = BinderResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.records
            .get_mut()
            .next()
            .map(|record| record.map_err(BinderError::from))
    }
}

impl<R: Read, T: DeserializeOwned> RecordReader<T> for LazyRecords<'_, R, T> {
    /// Reads the next record.
    ///
    /// # Returns
    /// - `Ok(Some(record))` if a record is successfully read
    /// - `Ok(None)` if there are no more records to read
    /// - `Err(_)` if an error occurs during reading or deserialization
    fn read(&self) -> RecordReaderResult<T> {
        match self.records.borrow_mut().next() {
            Some(Ok(record)) => Ok(Some(record)),
            Some(Err(error)) => Err(error.into()),
            None => Ok(None),
        }
    }
}
