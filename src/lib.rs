//! Decode UTF-8 characters from a stream of bytes. UTF-8 is defined
//! by the [Unicode Standard](https://home.unicode.org/).
//!
//! [`Utf8Decoder`] pulls bytes from its source only as needed and yields one
//! `char` per call to [`Iterator::next`]. What happens on malformed input is
//! chosen with an [`ErrorPolicy`]:
//!
//! - [`ErrorPolicy::Strict`] returns an [`Error::InvalidEncoding`] carrying the
//!   byte number, after which the decoder is exhausted.
//! - [`ErrorPolicy::Replace`] yields one replacement character (U+FFFD) for
//!   every byte of the invalid sequence.
//! - [`ErrorPolicy::Ignore`] skips the invalid bytes.
//!
//! A byte that breaks off a multi-byte sequence is not lost: it is decoded
//! again as the start of the next character.
//!
//! ```
//! use utf8_stream_decode::{DecoderOptions, ErrorPolicy, Utf8Decoder};
//!
//! let options = DecoderOptions::default().with_error_policy(ErrorPolicy::Replace);
//! let decoded: String = Utf8Decoder::with_options(&b"\xC0\x80ok"[..], options)
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(decoded, "\u{FFFD}\u{FFFD}ok");
//! ```

#![warn(rust_2018_idioms)]
#![warn(clippy::pedantic)]

mod error;
mod options;
mod source;

use std::io::{self, Bytes, Read};
use std::iter::FusedIterator;

use tracing::{debug, trace};

pub use crate::error::{Error, InvalidSequence};
pub use crate::options::{DecoderOptions, ErrorPolicy};
pub use crate::source::ByteSource;

/// The replacement character is returned in case of decoding errors,
/// as recommended by the Unicode standard.
pub const REPLACEMENT_CHARACTER: char = '�';

/// Largest valid Unicode codepoint.
pub const MAX_CODEPOINT: u32 = 0x10_FFFF;

/// Smallest codepoint that needs a sequence of the given length, indexed by
/// length - 2.
const MIN_CODEPOINT: [u32; 5] = [0x80, 0x800, 0x1_0000, 0x20_0000, 0x400_0000];

/// A malformed sequence and the number of bytes it took from the input.
struct Invalid {
    kind: InvalidSequence,
    consumed: usize,
}

enum Fault {
    Invalid(Invalid),
    Io(io::Error),
}

impl From<io::Error> for Fault {
    fn from(e: io::Error) -> Self {
        Fault::Io(e)
    }
}

fn invalid(kind: InvalidSequence, consumed: usize) -> Fault {
    Fault::Invalid(Invalid { kind, consumed })
}

/// A multi-byte sequence whose continuation bytes are still being read.
#[derive(Debug, Clone, Copy)]
struct Partial {
    leading_byte: u8,
    length: usize,
    codepoint: u32,
    /// Bytes of the sequence read so far, the leading byte included.
    consumed: usize,
}

fn is_continuation(byte: u8) -> bool {
    byte & 0b1100_0000 == 0b1000_0000
}

fn is_noncharacter(codepoint: u32) -> bool {
    codepoint >= 0xFFFE || (0xFDD0..=0xFDEF).contains(&codepoint)
}

/// Incremental UTF-8 decoder yielding one `char` per pull from a [`ByteSource`].
pub struct Utf8Decoder<S> {
    source: S,
    options: DecoderOptions,
    byte_position: u64,
    /// A byte that ended a sequence early and starts the next one.
    lookahead: Option<u8>,
    /// Sequence interrupted by an error from the source, resumed on the next call.
    partial: Option<Partial>,
    pending_replacements: usize,
    finished: bool,
}

impl<R: Read> Utf8Decoder<Bytes<R>> {
    /// Decode `input` strictly, rejecting noncharacters.
    pub fn new(input: R) -> Self {
        Self::with_options(input, DecoderOptions::default())
    }

    pub fn with_options(input: R, options: DecoderOptions) -> Self {
        Self::from_source(input.bytes(), options)
    }
}

impl<S: ByteSource> Utf8Decoder<S> {
    pub fn from_source(source: S, options: DecoderOptions) -> Self {
        Self {
            source,
            options,
            byte_position: 0,
            lookahead: None,
            partial: None,
            pending_replacements: 0,
            finished: false,
        }
    }

    #[must_use]
    pub fn options(&self) -> DecoderOptions {
        self.options
    }

    /// Number of bytes taken from the source so far.
    #[must_use]
    pub fn byte_position(&self) -> u64 {
        self.byte_position
    }

    /// Decode up to `count` characters and concatenate them. The result is
    /// shorter than `count` if the input ends first.
    ///
    /// # Errors
    ///
    /// The first error returned by [`Iterator::next`].
    pub fn read_chars(&mut self, count: usize) -> Result<String, Error> {
        self.by_ref().take(count).collect()
    }

    /// Return the byte source. A byte held back for the next character, or
    /// the start of a sequence interrupted by a source error, is dropped.
    pub fn into_inner(self) -> S {
        self.source
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        if let Some(byte) = self.lookahead.take() {
            return Ok(Some(byte));
        }
        let byte = self.source.next_byte()?;
        if byte.is_some() {
            self.byte_position += 1;
        }
        Ok(byte)
    }

    fn push_back(&mut self, byte: u8) {
        assert!(
            self.lookahead.is_none(),
            "lookahead already holds a byte at byte number {}",
            self.byte_position
        );
        trace!(byte, position = self.byte_position, "pushing back byte");
        self.lookahead = Some(byte);
    }

    /// Decode one sequence. `Ok(None)` means the input ended before a leading
    /// byte.
    fn decode_sequence(&mut self) -> Result<Option<char>, Fault> {
        let mut partial = match self.partial.take() {
            Some(partial) => partial,
            None => {
                let Some(leading_byte) = self.read_byte()? else {
                    return Ok(None);
                };
                let length = match leading_byte.leading_ones() {
                    0 => return Ok(Some(char::from(leading_byte))),
                    1 => return Err(invalid(InvalidSequence::UnexpectedContinuationByte, 1)),
                    n @ 2..=6 => n as usize,
                    _ => return Err(invalid(InvalidSequence::ImpossibleLeadingByte, 1)),
                };
                if leading_byte == 0xED {
                    return Err(invalid(InvalidSequence::ReservedLeadingByte, 1));
                }
                Partial {
                    leading_byte,
                    length,
                    codepoint: u32::from(leading_byte & (0x7F >> length)) << (6 * (length - 1)),
                    consumed: 1,
                }
            }
        };

        while partial.consumed < partial.length {
            let byte = match self.read_byte() {
                Ok(Some(byte)) => byte,
                Ok(None) => {
                    return Err(invalid(InvalidSequence::TruncatedSequence, partial.consumed))
                }
                Err(e) => {
                    self.partial = Some(partial);
                    return Err(Fault::Io(e));
                }
            };
            partial.consumed += 1;
            if !is_continuation(byte) {
                self.push_back(byte);
                return Err(invalid(
                    InvalidSequence::NonContinuationInSequence,
                    partial.consumed,
                ));
            }
            partial.codepoint |=
                u32::from(byte & 0b11_1111) << (6 * (partial.length - partial.consumed));
            if partial.length >= 4 && partial.codepoint > MAX_CODEPOINT {
                return Err(invalid(InvalidSequence::CodepointOutOfRange, partial.consumed));
            }
        }

        let Partial {
            leading_byte,
            length,
            codepoint,
            ..
        } = partial;
        if codepoint < MIN_CODEPOINT[length - 2] {
            return Err(invalid(InvalidSequence::OverlongEncoding, length));
        }
        if (leading_byte == 0xE0 && codepoint < 0x800)
            || (leading_byte == 0xF0 && codepoint < 0x1_0000)
        {
            return Err(invalid(InvalidSequence::RedundantLeadingByteEncoding, length));
        }
        if self.options.reject_noncharacters && is_noncharacter(codepoint) {
            return Err(invalid(InvalidSequence::DisallowedNoncharacter, 1));
        }

        // surrogates only follow 0xED, so this holds for everything that got here
        char::from_u32(codepoint)
            .map(Some)
            .ok_or_else(|| invalid(InvalidSequence::CodepointOutOfRange, length))
    }
}

impl<S: ByteSource> Iterator for Utf8Decoder<S> {
    type Item = Result<char, Error>;

    /// Return the next Unicode character, or the error policy's answer to
    /// malformed input.
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if self.pending_replacements > 0 {
            self.pending_replacements -= 1;
            return Some(Ok(REPLACEMENT_CHARACTER));
        }

        loop {
            let Invalid { kind, consumed } = match self.decode_sequence() {
                Ok(Some(c)) => return Some(Ok(c)),
                Ok(None) => {
                    self.finished = true;
                    return None;
                }
                Err(Fault::Io(e)) => return Some(Err(Error::Io(e))),
                Err(Fault::Invalid(invalid)) => invalid,
            };

            let policy = self.options.error_policy;
            debug!(
                position = self.byte_position,
                %kind,
                consumed,
                %policy,
                "invalid UTF-8 sequence"
            );
            match policy {
                ErrorPolicy::Strict => {
                    self.finished = true;
                    return Some(Err(Error::InvalidEncoding {
                        position: self.byte_position,
                        kind,
                    }));
                }
                ErrorPolicy::Replace => {
                    self.pending_replacements += consumed - 1;
                    return Some(Ok(REPLACEMENT_CHARACTER));
                }
                ErrorPolicy::Ignore => {}
            }
        }
    }
}

impl<S: ByteSource> FusedIterator for Utf8Decoder<S> {}
