pub mod buffer;
pub mod link;
pub mod variants;
pub mod registry;
pub mod envelope;
pub mod codec;
pub mod error;
pub mod debug;

pub use link::{
    ChatLink, LinkKind, ItemModifiers,
    CoinLink, ItemLink, DialogLink, PointOfInterestLink,
    SkillLink, TraitLink, RecipeLink, OutfitLink, SkinLink,
    UnknownLink,
};

pub use buffer::{
    ByteReader, ByteWriter,
};

pub use variants::{
    LinkPayload, PaddingPolicy,
};

pub use registry::{
    LinkRegistry, VariantCodec,
};

pub use codec::{
    ChatLinkCodec, CodecConfig,
};

pub use error::{
    ChatLinkError, DecodeError, EnvelopeError, InvalidLink, RegistryError, Result,
};

pub use debug::{
    init_debug_mode, is_debug_enabled, is_trace_enabled,
    log_link, trace_encode, trace_decode, trace_decode_error, trace_unknown_header,
    format_hex, link_summary,
};

/// Encodes `link` as a `[&...]` token with the default codec.
pub fn encode(link: &ChatLink) -> String {
    ChatLinkCodec::default().encode(link)
}

/// Decodes a `[&...]` token with the default codec.
pub fn decode(text: &str) -> Result<ChatLink> {
    ChatLinkCodec::default().decode(text)
}

/// Decodes a token that must be of kind `T`.
pub fn decode_as<T: LinkPayload>(text: &str) -> Result<T> {
    ChatLinkCodec::default().decode_as(text)
}
