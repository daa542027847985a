use std::{
    fs,
    io::{self, BufWriter, Write},
    path::Path,
};

use csv::{QuoteStyle, Terminator, WriterBuilder};
use encoding_rs::{Encoding, UTF_8};
use log::{debug, info};
use tempfile::NamedTempFile;

use crate::{
    core::{
        encoding::ensure_writable,
        normalizer::SeparatorNormalizer,
        separator::{SENTINEL_BYTE, Separator},
        staging::{StagingArea, StagingFile},
    },
    error::{BinderError, BinderResult},
    item::csv::record::CsvRecord,
};

#[cfg(windows)]
const TERMINATOR: Terminator = Terminator::CRLF;
#[cfg(not(windows))]
const TERMINATOR: Terminator = Terminator::Any(b'\n');

/// Watches serialized rows for field content the separator rewrite would
/// corrupt.
///
/// Rows are written with [`QuoteStyle::Necessary`], so every field holding
/// the sentinel, a quote or a line break arrives quoted. A sentinel or line
/// break seen inside quotes is therefore field content, and the first one is
/// remembered together with its line. Escaped quotes (`""`) toggle the state
/// twice and leave it unchanged.
struct FieldGuard<W> {
    inner: W,
    line: u64,
    quoted: bool,
    rejection: Option<BinderError>,
}

impl<W: Write> FieldGuard<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            line: 1,
            quoted: false,
            rejection: None,
        }
    }

    fn reject(&mut self, rejection: BinderError) {
        if self.rejection.is_none() {
            self.rejection = Some(rejection);
        }
    }
}

impl<W: Write> Write for FieldGuard<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        for &byte in &buf[..written] {
            match byte {
                b'"' => self.quoted = !self.quoted,
                SENTINEL_BYTE if self.quoted => {
                    self.reject(BinderError::SentinelCollision { line: self.line })
                }
                b'\n' | b'\r' if self.quoted => {
                    self.reject(BinderError::LineBreakInField { line: self.line })
                }
                b'\n' => self.line += 1,
                _ => {}
            }
        }
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Writes record collections to files with any separator.
///
/// The records are serialized with the sentinel separator into a staging
/// file, the sentinel is rewritten into the requested separator, and the
/// result replaces the destination in one step.
pub struct CsvRecordWriter<'a> {
    staging: &'a StagingArea,
}

impl<'a> CsvRecordWriter<'a> {
    pub fn new(staging: &'a StagingArea) -> Self {
        Self { staging }
    }

    /// Writes `records` to `destination`, replacing whatever was there.
    ///
    /// Zero records leave an empty file at `destination`. No header row is
    /// written in that case, even for name-bound record types.
    ///
    /// On failure the destination is left untouched. Staging files are removed
    /// on every path.
    pub fn write_all<T: CsvRecord, P: AsRef<Path>>(
        &self,
        records: &[T],
        destination: P,
        encoding: &'static Encoding,
        separator: &Separator,
    ) -> BinderResult<()> {
        ensure_writable(encoding)?;
        let destination = destination.as_ref();

        let serialized = self.serialize(records)?;
        let normalized = SeparatorNormalizer::new(self.staging).normalize(
            serialized.open()?,
            UTF_8,
            encoding,
            &Separator::sentinel(),
            separator,
        )?;
        drop(serialized);

        publish(normalized.as_ref(), destination)?;
        info!(
            "Wrote {} records to {}",
            records.len(),
            destination.display()
        );
        Ok(())
    }

    fn serialize<T: CsvRecord>(&self, records: &[T]) -> BinderResult<StagingFile> {
        let (staging, file) = self.staging.create()?;

        let mut writer = WriterBuilder::new()
            .delimiter(SENTINEL_BYTE)
            .quote_style(QuoteStyle::Necessary)
            .terminator(TERMINATOR)
            .has_headers(T::BINDING.has_headers())
            .flexible(false)
            .from_writer(FieldGuard::new(BufWriter::new(file)));

        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        let guard = writer.into_inner().map_err(|error| {
            BinderError::Io(io::Error::new(error.error().kind(), error.error().to_string()))
        })?;
        if let Some(rejection) = guard.rejection {
            return Err(rejection);
        }

        debug!(
            "Serialized {} records into {}",
            records.len(),
            staging.path().display()
        );
        Ok(staging)
    }
}

/// Replaces `destination` with the content of `normalized`, or with an empty
/// file when there is nothing to publish.
///
/// Missing parent directories are created. The bytes are copied next to the
/// destination first, so the staging directory may live on another
/// filesystem, then moved over it in one rename.
fn publish(normalized: Option<&StagingFile>, destination: &Path) -> BinderResult<()> {
    let parent = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut target = NamedTempFile::new_in(parent)?;
    if let Some(staged) = normalized {
        io::copy(&mut staged.open()?, target.as_file_mut())?;
    }
    target.as_file().sync_all()?;

    if let Ok(metadata) = fs::metadata(destination) {
        target.as_file().set_permissions(metadata.permissions())?;
    }

    target
        .persist(destination)
        .map_err(|error| BinderError::Io(error.error))?;

    if normalized.is_none() {
        debug!("Nothing to write, {} is now empty", destination.display());
    }
    Ok(())
}
