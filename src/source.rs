use std::io;

/// A pull source of raw bytes.
///
/// `Ok(None)` signals the end of the input. Any iterator over
/// `io::Result<u8>`, such as [`std::io::Bytes`], is a byte source.
pub trait ByteSource {
    /// Return the next byte, or `None` once the input is exhausted.
    ///
    /// # Errors
    ///
    /// Whatever error the underlying input reports.
    fn next_byte(&mut self) -> io::Result<Option<u8>>;
}

impl<I> ByteSource for I
where
    I: Iterator<Item = io::Result<u8>>,
{
    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        self.next().transpose()
    }
}
