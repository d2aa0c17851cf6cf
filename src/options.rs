use std::fmt;

/// How the decoder reacts to an invalid byte sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ErrorPolicy {
    /// Fail with [`Error::InvalidEncoding`](crate::Error::InvalidEncoding).
    /// The decoder yields nothing afterwards.
    #[default]
    Strict,
    /// Emit one replacement character (U+FFFD) for every byte of the
    /// invalid sequence.
    Replace,
    /// Drop the invalid bytes and continue with the next valid character.
    Ignore,
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Strict => "strict",
            Self::Replace => "replace",
            Self::Ignore => "ignore",
        })
    }
}

/// Configuration of a [`Utf8Decoder`](crate::Utf8Decoder), fixed for the
/// lifetime of the decoder.
///
/// # Default
///
/// [`ErrorPolicy::Strict`] with noncharacters rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecoderOptions {
    /// Reaction to invalid input.
    pub error_policy: ErrorPolicy,

    /// Whether decoded values from the noncharacter ranges count as invalid.
    ///
    /// When set, every codepoint from U+FFFE upwards and every codepoint in
    /// U+FDD0..=U+FDEF is rejected.
    ///
    /// # Default
    ///
    /// `true`
    pub reject_noncharacters: bool,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            error_policy: ErrorPolicy::Strict,
            reject_noncharacters: true,
        }
    }
}

impl DecoderOptions {
    #[must_use]
    pub fn with_error_policy(mut self, error_policy: ErrorPolicy) -> Self {
        self.error_policy = error_policy;
        self
    }

    #[must_use]
    pub fn with_reject_noncharacters(mut self, reject_noncharacters: bool) -> Self {
        self.reject_noncharacters = reject_noncharacters;
        self
    }
}
