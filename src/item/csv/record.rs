use serde::{Serialize, de::DeserializeOwned};

/// How the columns of a CSV file map onto the fields of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnBinding {
    /// The first line is a header row; columns are matched to fields by their
    /// serde name.
    #[default]
    ByName,
    /// There is no header row; the *n*-th column binds to the *n*-th field.
    ByPosition,
}

impl ColumnBinding {
    pub(crate) fn has_headers(self) -> bool {
        self == ColumnBinding::ByName
    }
}

/// A record type that can be marshalled to and from CSV.
///
/// The serde derives describe the fields; `BINDING` says whether they are
/// matched by header name (the default) or by position.
///
/// # Examples
///
/// ```
/// use csv_binder::item::csv::record::{ColumnBinding, CsvRecord};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Person {
///     name: String,
///     age: u8,
/// }
///
/// impl CsvRecord for Person {}
///
/// #[derive(Serialize, Deserialize)]
/// struct Point(i32, i32);
///
/// impl CsvRecord for Point {
///     const BINDING: ColumnBinding = ColumnBinding::ByPosition;
/// }
///
/// assert_eq!(Person::BINDING, ColumnBinding::ByName);
/// ```
pub trait CsvRecord: Serialize + DeserializeOwned {
    const BINDING: ColumnBinding = ColumnBinding::ByName;
}
