use std::fmt;

use crate::error::BinderError;

/// The reserved control character used as the canonical single-character
/// separator for every intermediate staging file.
pub const SENTINEL: char = '\u{0001}';

/// [`SENTINEL`] as the single byte handed to the CSV engine.
pub const SENTINEL_BYTE: u8 = 0x01;

/// Platform line terminator written after every normalized line.
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// A field separator of one or more characters.
///
/// A `Separator` can never be empty: construction from an empty string is
/// rejected with [`BinderError::InvalidArgument`].
///
/// # Examples
///
/// ```
/// use csv_binder::core::separator::Separator;
///
/// let comma = Separator::new(",").unwrap();
/// assert_eq!(comma.as_byte(), Some(b','));
///
/// let wide = Separator::new("::|").unwrap();
/// assert_eq!(wide.as_byte(), None);
///
/// assert!(Separator::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Separator(String);

impl Separator {
    pub fn new(value: impl Into<String>) -> Result<Self, BinderError> {
        let value = value.into();
        if value.is_empty() {
            return Err(BinderError::InvalidArgument(
                "separator must not be empty".to_string(),
            ));
        }
        Ok(Self(value))
    }

    /// The sentinel separator.
    pub fn sentinel() -> Self {
        Self(SENTINEL.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_sentinel(&self) -> bool {
        self.0.len() == 1 && self.0.as_bytes()[0] == SENTINEL_BYTE
    }

    /// Returns the separator as a single byte when the CSV engine can take it
    /// directly, i.e. when it is exactly one ASCII character.
    pub fn as_byte(&self) -> Option<u8> {
        match self.0.as_bytes() {
            [byte] if byte.is_ascii() => Some(*byte),
            _ => None,
        }
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_separator_is_rejected() {
        let result = Separator::new(String::new());
        assert!(matches!(result, Err(BinderError::InvalidArgument(_))));
    }

    #[test]
    fn single_ascii_character_maps_to_a_byte() {
        assert_eq!(Separator::new(";").unwrap().as_byte(), Some(b';'));
        assert_eq!(Separator::new("\t").unwrap().as_byte(), Some(b'\t'));
    }

    #[test]
    fn non_ascii_or_multi_character_separators_have_no_byte() {
        assert_eq!(Separator::new("§").unwrap().as_byte(), None);
        assert_eq!(Separator::new("||").unwrap().as_byte(), None);
    }

    #[test]
    fn sentinel_is_recognized() {
        let sentinel = Separator::sentinel();
        assert!(sentinel.is_sentinel());
        assert_eq!(sentinel.as_byte(), Some(SENTINEL_BYTE));
        assert!(!Separator::new(",").unwrap().is_sentinel());
    }
}
