//! CSV support for marshalling typed records with arbitrary separators.
//!
//! The CSV engine only understands single-byte delimiters. This module lets
//! callers use any non-empty string instead, such as `"::|"` or `"§"`, by
//! rewriting separators through staging files around the engine.
//!
//! # Module Architecture
//!
//! 1. **CsvBinder**: the entry point. It owns the configuration (staging
//!    directory, trimming) and exposes every read, write and rewrite operation.
//!
//! 2. **CsvRecordReader** / **LazyRecords**: deserialize records, either all at
//!    once or one at a time from a caller-owned stream.
//!
//! 3. **CsvRecordWriter**: serializes records and publishes the result to the
//!    destination file.
//!
//! 4. **CsvRecord**: the trait a record type implements to declare whether its
//!    columns bind by header name or by position.
//!
//! # Examples
//!
//! ## Lazy reading
//!
//! Large files can be read one record at a time. The source is first
//! rewritten with the sentinel separator, then the caller opens the staging
//! file and keeps it open while iterating.
//!
//! ```
//! use csv_binder::item::csv::{CsvBinderBuilder, record::CsvRecord};
//! use encoding_rs::UTF_8;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct Person {
//!     name: String,
//!     age: u8,
//! }
//!
//! impl CsvRecord for Person {}
//!
//! let dir = tempfile::tempdir().unwrap();
//! let binder = CsvBinderBuilder::new().staging_dir(dir.path()).build();
//!
//! let data = "name||age\n\nAlice||30\nBob||25\n";
//! let staged = binder
//!     .prepare_processable_file(data.as_bytes(), UTF_8, "||")
//!     .unwrap()
//!     .expect("the source has content");
//!
//! let mut stream = staged.open().unwrap();
//! let mut names = Vec::new();
//! for person in binder.read_records_lazy::<Person, _>(&mut stream, UTF_8) {
//!     names.push(person.unwrap().name);
//! }
//! drop(stream);
//!
//! assert_eq!(names, ["Alice", "Bob"]);
//! ```
//!
//! ## Empty sources
//!
//! A source holding only blank lines is not an error:
//!
//! ```
//! use csv_binder::item::csv::CsvBinderBuilder;
//! use encoding_rs::UTF_8;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let binder = CsvBinderBuilder::new().staging_dir(dir.path()).build();
//!
//! let staged = binder.rewrite_separator("\n   \n".as_bytes(), UTF_8, ";", ",").unwrap();
//! assert!(staged.is_none());
//! ```

/// The binder facade and its builder.
pub mod binder;

/// A module providing facilities for reading CSV data records.
pub mod csv_reader;

/// A module providing facilities for writing CSV data records.
pub mod csv_writer;

/// Column binding declared by record types.
pub mod record;

pub use binder::{CsvBinder, CsvBinderBuilder};
