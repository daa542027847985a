//! Text encoding at the edges of a conversion.
//!
//! The CSV engine only ever sees UTF-8. Sources are transcoded on the fly by
//! [`decode_reader`]; normalized lines are encoded back with [`encode_line`].

use std::{
    borrow::Cow,
    io::{self, Read},
};

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE};
use encoding_rs_io::{DecodeReaderBytes, DecodeReaderBytesBuilder};

use crate::error::BinderError;

/// A source transcoded into UTF-8.
pub type DecodeReader<R> = DecodeReaderBytes<R, Vec<u8>>;

/// Wraps `inner` so that it yields UTF-8 decoded from `encoding`.
///
/// A byte-order mark matching the declared encoding is removed. Malformed
/// sequences are replaced with U+FFFD.
pub fn decode_reader<R: Read>(inner: R, encoding: &'static Encoding) -> DecodeReader<R> {
    DecodeReaderBytesBuilder::new()
        .encoding(Some(encoding))
        .build(inner)
}

/// Rejects encodings that cannot be written.
///
/// Only `replacement` is left out: it decodes everything to U+FFFD and has
/// no encoder of its own.
pub fn ensure_writable(encoding: &'static Encoding) -> Result<(), BinderError> {
    if encoding.output_encoding() != encoding && !is_utf16(encoding) {
        return Err(BinderError::InvalidArgument(format!(
            "encoding {} cannot be used to write text",
            encoding.name()
        )));
    }
    Ok(())
}

fn is_utf16(encoding: &'static Encoding) -> bool {
    encoding == UTF_16LE || encoding == UTF_16BE
}

/// Encodes one line of text, failing on characters the encoding cannot map.
///
/// `encoding_rs` has no UTF-16 encoder, so UTF-16 code units are produced
/// here, without a byte-order mark.
pub fn encode_line<'a>(encoding: &'static Encoding, line: &'a str) -> io::Result<Cow<'a, [u8]>> {
    if encoding == UTF_16LE {
        return Ok(Cow::Owned(line.encode_utf16().flat_map(u16::to_le_bytes).collect()));
    }
    if encoding == UTF_16BE {
        return Ok(Cow::Owned(line.encode_utf16().flat_map(u16::to_be_bytes).collect()));
    }

    let (bytes, _, had_unmappable) = encoding.encode(line);
    if had_unmappable {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("line contains characters not representable in {}", encoding.name()),
        ));
    }
    Ok(bytes)
}
