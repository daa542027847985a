#![cfg_attr(docsrs, feature(doc_cfg))]
//#![warn(missing_docs)]

/*!
 # CSV Binder for Rust

 Typed CSV record marshalling with **arbitrary separators**. Records are
 plain serde types; the separator can be any non-empty string, not just the
 single byte the underlying CSV engine understands.

 ## Core Concepts

- **CsvRecord:** A serde type that declares whether its columns bind by header name or by position.
- **Separator:** A non-empty field separator of one or more characters, such as `,`, `\t` or `::|`.
- **Sentinel:** The reserved control character `U+0001` used as the single-byte separator of every intermediate file.
- **Staging file:** A uniquely named scratch file in a configurable directory, removed as soon as it is no longer needed.
- **CsvBinder:** The entry point that reads, writes and rewrites CSV files.

 ## How it works

 Separators the engine can take as a single byte are handed to it directly.
 Every other separator is rewritten line by line: when reading, the source
 separator becomes the sentinel before parsing; when writing, records are
 serialized with the sentinel and the sentinel is rewritten into the
 requested separator before the destination is replaced. Blank lines are
 dropped along the way, and a source with no content is a normal outcome
 (`Ok(None)` or an empty vector), never an error.

 ## Getting Started

```rust
# use serde::{Deserialize, Serialize};
# use csv_binder::{
#     error::BinderError,
#     item::csv::{CsvBinderBuilder, record::CsvRecord},
# };
# use encoding_rs::UTF_8;
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
struct Car {
    year: u16,
    make: String,
    model: String,
    description: String,
}

impl CsvRecord for Car {}

fn main() -> Result<(), BinderError> {
    let dir = tempfile::tempdir()?;
    let binder = CsvBinderBuilder::new()
        .staging_dir(dir.path().join("staging"))
        .build();

    let csv = "year::|make::|model::|description

1948::|Porsche::|356::|Luxury sports car
1967::|Ford::|Mustang fastback 1967::|American car";

    let cars: Vec<Car> = binder.read_records(csv.as_bytes(), UTF_8, "::|")?;
    assert_eq!(cars.len(), 2);

    let output = dir.path().join("cars.csv");
    binder.write_records(&cars, &output, UTF_8, ";")?;

    let again: Vec<Car> = binder.read_records_from_path(&output, UTF_8, ";")?;
    assert_eq!(again, cars);

    Ok(())
}
```

 ## License
 Licensed under either of

 -   Apache License, Version 2.0
     ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
 -   MIT license
     ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)

 at your option.
 */

/// Core building blocks: separators, staging files, encodings and normalization
pub mod core;

/// Error types for binder operations
pub mod error;

#[doc(inline)]
pub use error::*;

/// CSV record readers and writers
pub mod item;
