use thiserror::Error;

/// The kind of malformation found in the input.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidSequence {
    #[error("unexpected continuation byte")]
    UnexpectedContinuationByte,
    #[error("impossible leading byte")]
    ImpossibleLeadingByte,
    /// Leading byte 0xED, which only starts encodings of UTF-16 surrogates.
    #[error("reserved leading byte 0xED")]
    ReservedLeadingByte,
    #[error("input ended inside a multi-byte sequence")]
    TruncatedSequence,
    #[error("non-continuation byte inside a multi-byte sequence")]
    NonContinuationInSequence,
    #[error("codepoint exceeds U+10FFFF")]
    CodepointOutOfRange,
    #[error("overlong encoding")]
    OverlongEncoding,
    #[error("redundant encoding for its leading byte")]
    RedundantLeadingByteEncoding,
    #[error("noncharacter is not allowed")]
    DisallowedNoncharacter,
}

#[derive(Debug, Error)]
pub enum Error {
    /// Invalid input under [`ErrorPolicy::Strict`](crate::ErrorPolicy::Strict).
    /// `position` is the number of bytes consumed when the problem was found.
    #[error("invalid UTF-8 encoding at byte number {position}: {kind}")]
    InvalidEncoding { position: u64, kind: InvalidSequence },
    /// The byte source failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    #[must_use]
    pub fn kind(&self) -> Option<InvalidSequence> {
        match self {
            Self::InvalidEncoding { kind, .. } => Some(*kind),
            Self::Io(_) => None,
        }
    }

    #[must_use]
    pub fn position(&self) -> Option<u64> {
        match self {
            Self::InvalidEncoding { position, .. } => Some(*position),
            Self::Io(_) => None,
        }
    }
}
