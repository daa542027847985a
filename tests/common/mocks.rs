//! Mock version of a byte source such as a network stream.
use mockall::mock;

use std::io::{self, Read};

mock! {
    pub Source {}
    impl Read for Source {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
    }
}

/// A source that yields `data` once, then fails with `message`.
pub fn failing_after(data: &'static [u8], message: &'static str) -> MockSource {
    let mut source = MockSource::new();
    let mut served = false;
    source.expect_read().returning(move |buf| {
        if served {
            return Err(io::Error::other(message));
        }
        served = true;
        let count = data.len().min(buf.len());
        buf[..count].copy_from_slice(&data[..count]);
        Ok(count)
    });
    source
}
