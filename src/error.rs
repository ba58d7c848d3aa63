use crate::link::LinkKind;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("Malformed chat link envelope: {0}")]
    Malformed(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Truncated {kind} payload: needed {needed} bytes, {available} available")]
    Truncated {
        kind: LinkKind,
        needed: usize,
        available: usize,
    },

    #[error("Wrong link variant: expected {expected} link, found header 0x{found:02X}")]
    WrongVariant { expected: LinkKind, found: u8 },
}

/// Precondition violations when building a link value by hand.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidLink {
    #[error("Item quantity {0} is outside 1..=255")]
    QuantityOutOfRange(u32),

    #[error("Item id {0} does not fit in 24 bits")]
    ItemIdOutOfRange(u32),

    #[error("Header 0x{0:02X} belongs to a known link kind and cannot be used for an unknown link")]
    ReservedHeader(u8),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Header 0x{header:02X} registered twice ({first} and {second})")]
    DuplicateHeader {
        header: u8,
        first: &'static str,
        second: &'static str,
    },

    #[error("No codec registered for link kind {0}")]
    MissingKind(LinkKind),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatLinkError {
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

pub type Result<T> = std::result::Result<T, ChatLinkError>;
