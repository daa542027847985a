use crate::error::BinderError;

/// Result of reading one record: `Ok(None)` once the source is exhausted.
pub type RecordReaderResult<T> = Result<Option<T>, BinderError>;

/// A forward-only cursor over typed records.
pub trait RecordReader<T> {
    fn read(&self) -> RecordReaderResult<T>;
}
