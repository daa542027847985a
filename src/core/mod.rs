/// Cursor abstraction shared by the record readers.
pub mod item;

/// Separator type and the reserved sentinel.
pub mod separator;

/// Uniquely named scratch files with best-effort cleanup.
pub mod staging;

/// Transcoding between source encodings and UTF-8.
pub mod encoding;

/// Literal separator rewriting into staging files.
pub mod normalizer;
