//! # Separator normalization
//!
//! The CSV engine only understands single-byte delimiters. Anything else is
//! handled by rewriting the text first: every literal occurrence of the source
//! separator becomes the target separator, line by line, into a staging file.
//! Both reading and writing go through here, so this is the only place that
//! decides what a separator means.
//!
//! Rules shared by every rewrite:
//!
//! - blank lines (empty or whitespace only) are dropped and never count as content
//! - matching is plain substring matching, so `.`, `*` or `|` have no special meaning
//! - a source with no content yields `Ok(None)` and leaves no staging file behind

use std::{
    borrow::Cow,
    io::{self, BufRead, BufReader, BufWriter, Read, Write},
};

use encoding_rs::Encoding;
use log::debug;

use crate::{
    core::{
        encoding::{decode_reader, encode_line, ensure_writable},
        separator::{LINE_ENDING, SENTINEL, Separator},
        staging::{StagingArea, StagingFile},
    },
    error::BinderError,
};

pub(crate) fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Rewrites separators into staging files.
pub struct SeparatorNormalizer<'a> {
    staging: &'a StagingArea,
}

impl<'a> SeparatorNormalizer<'a> {
    pub fn new(staging: &'a StagingArea) -> Self {
        Self { staging }
    }

    /// Rewrites `input` into a new staging file.
    ///
    /// # Parameters
    /// - `input`: the text to rewrite, in `input_encoding`
    /// - `output_encoding`: encoding of the staging file
    /// - `source`: separator to look for
    /// - `target`: separator written in its place
    ///
    /// # Returns
    /// - `Ok(Some(file))` with the populated staging file, now owned by the caller
    /// - `Ok(None)` if the input holds no non-blank line
    /// - `Err(BinderError::Io(_))` on any read or write failure
    /// - `Err(BinderError::SentinelCollision { .. })` if the input already
    ///   contains the sentinel while rewriting towards it
    ///
    /// The staging file is removed on every path that does not return it.
    pub fn normalize<R: Read>(
        &self,
        input: R,
        input_encoding: &'static Encoding,
        output_encoding: &'static Encoding,
        source: &Separator,
        target: &Separator,
    ) -> Result<Option<StagingFile>, BinderError> {
        ensure_writable(output_encoding)?;

        let (staging, file) = self.staging.create()?;
        let mut writer = BufWriter::new(file);
        let reader = BufReader::new(decode_reader(input, input_encoding));

        let rewrite = source != target;
        let guard_sentinel = rewrite && target.is_sentinel();

        let mut line_number = 0u64;
        let mut written = 0u64;
        for line in reader.lines() {
            let line = line?;
            line_number += 1;

            if is_blank(&line) {
                continue;
            }
            if guard_sentinel && line.contains(SENTINEL) {
                return Err(BinderError::SentinelCollision { line: line_number });
            }

            let line: Cow<'_, str> = if rewrite {
                Cow::Owned(line.replace(source.as_str(), target.as_str()))
            } else {
                Cow::Borrowed(&line)
            };

            writer.write_all(&encode_line(output_encoding, &line)?)?;
            writer.write_all(&encode_line(output_encoding, LINE_ENDING)?)?;
            written += 1;
        }
        writer.flush()?;
        drop(writer);

        debug!(
            "Normalized {} of {} lines from {:?} to {:?}",
            written, line_number, source, target
        );

        if written == 0 {
            // Dropping the handle removes the empty staging file.
            return Ok(None);
        }
        Ok(Some(staging))
    }
}

/// A reader that yields only the non-blank lines of its source.
///
/// Used when the separator can go straight to the CSV engine, so blank lines
/// are dropped without a staging file.
pub struct NonBlankLines<R> {
    inner: R,
    line: String,
    position: usize,
}

impl<R: BufRead> NonBlankLines<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line: String::new(),
            position: 0,
        }
    }
}

impl<R: BufRead> Read for NonBlankLines<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while self.position == self.line.len() {
            self.line.clear();
            self.position = 0;
            if self.inner.read_line(&mut self.line)? == 0 {
                return Ok(0);
            }
            if is_blank(&self.line) {
                self.line.clear();
            }
        }

        let remaining = &self.line.as_bytes()[self.position..];
        let count = remaining.len().min(buf.len());
        buf[..count].copy_from_slice(&remaining[..count]);
        self.position += count;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use encoding_rs::{UTF_8, WINDOWS_1252};
    use tempfile::TempDir;

    use super::*;

    fn sep(value: &str) -> Separator {
        Separator::new(value).unwrap()
    }

    fn staged_files(dir: &TempDir) -> usize {
        fs::read_dir(dir.path()).map(|d| d.count()).unwrap_or(0)
    }

    #[test]
    fn multi_character_separator_becomes_the_target() -> Result<(), BinderError> {
        let dir = TempDir::new()?;
        let area = StagingArea::new(dir.path());
        let normalizer = SeparatorNormalizer::new(&area);

        let input = "a::|b::|c\n\n   \nd::|e::|f\n";
        let staged = normalizer
            .normalize(input.as_bytes(), UTF_8, UTF_8, &sep("::|"), &sep(";"))?
            .expect("content expected");

        let content = fs::read_to_string(staged.path())?;
        assert_eq!(content, format!("a;b;c{0}d;e;f{0}", LINE_ENDING));

        drop(staged);
        assert_eq!(staged_files(&dir), 0);
        Ok(())
    }

    #[test]
    fn pattern_characters_are_matched_literally() -> Result<(), BinderError> {
        let dir = TempDir::new()?;
        let area = StagingArea::new(dir.path());
        let normalizer = SeparatorNormalizer::new(&area);

        let input = "x.*y.*z\nab|c";
        let staged = normalizer
            .normalize(input.as_bytes(), UTF_8, UTF_8, &sep(".*"), &sep("$1"))?
            .expect("content expected");

        let content = fs::read_to_string(staged.path())?;
        assert_eq!(content, format!("x$1y$1z{0}ab|c{0}", LINE_ENDING));
        Ok(())
    }

    #[test]
    fn identical_separators_copy_non_blank_lines() -> Result<(), BinderError> {
        let dir = TempDir::new()?;
        let area = StagingArea::new(dir.path());
        let normalizer = SeparatorNormalizer::new(&area);

        let input = "\r\none,two\r\n\t\r\nthree,four";
        let staged = normalizer
            .normalize(input.as_bytes(), UTF_8, UTF_8, &sep(","), &sep(","))?
            .expect("content expected");

        let content = fs::read_to_string(staged.path())?;
        assert_eq!(content, format!("one,two{0}three,four{0}", LINE_ENDING));
        Ok(())
    }

    #[test]
    fn blank_input_yields_nothing_and_leaves_no_file() -> Result<(), BinderError> {
        let dir = TempDir::new()?;
        let area = StagingArea::new(dir.path());
        let normalizer = SeparatorNormalizer::new(&area);

        for input in ["", "\n", "  \n\t\n\r\n"] {
            let staged =
                normalizer.normalize(input.as_bytes(), UTF_8, UTF_8, &sep("||"), &sep(","))?;
            assert!(staged.is_none());
        }
        assert_eq!(staged_files(&dir), 0);
        Ok(())
    }

    #[test]
    fn sentinel_in_source_is_rejected() -> Result<(), BinderError> {
        let dir = TempDir::new()?;
        let area = StagingArea::new(dir.path());
        let normalizer = SeparatorNormalizer::new(&area);

        let input = "a||b\nc\u{1}d||e";
        let result = normalizer.normalize(
            input.as_bytes(),
            UTF_8,
            UTF_8,
            &sep("||"),
            &Separator::sentinel(),
        );
        assert!(matches!(
            result,
            Err(BinderError::SentinelCollision { line: 2 })
        ));
        assert_eq!(staged_files(&dir), 0);
        Ok(())
    }

    #[test]
    fn output_is_written_in_the_requested_encoding() -> Result<(), BinderError> {
        let dir = TempDir::new()?;
        let area = StagingArea::new(dir.path());
        let normalizer = SeparatorNormalizer::new(&area);

        let staged = normalizer
            .normalize("café##crème".as_bytes(), UTF_8, WINDOWS_1252, &sep("##"), &sep(","))?
            .expect("content expected");

        let mut expected = b"caf\xE9,cr\xE8me".to_vec();
        expected.extend_from_slice(LINE_ENDING.as_bytes());
        assert_eq!(fs::read(staged.path())?, expected);
        Ok(())
    }

    #[test]
    fn non_blank_lines_reader_skips_whitespace_lines() -> io::Result<()> {
        let mut filtered = String::new();
        NonBlankLines::new("a,b\n \n\nc,d\n\t".as_bytes()).read_to_string(&mut filtered)?;
        assert_eq!(filtered, "a,b\nc,d\n");
        Ok(())
    }
}
