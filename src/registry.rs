use crate::buffer::{ByteReader, ByteWriter};
use crate::debug;
use crate::error::{DecodeError, RegistryError};
use crate::link::*;
use crate::variants::{LinkPayload, PaddingPolicy};
use ahash::AHashMap;
use std::fmt;
use std::sync::OnceLock;

static REGISTRY: OnceLock<LinkRegistry> = OnceLock::new();

pub type EncodeFn = fn(&ChatLink, &mut ByteWriter);
pub type DecodeFn = fn(&mut ByteReader<'_>, PaddingPolicy) -> Result<ChatLink, DecodeError>;

/// One row of the dispatch table.
#[derive(Clone, Copy)]
pub struct VariantCodec {
    kind: LinkKind,
    encode: EncodeFn,
    decode: DecodeFn,
}

impl VariantCodec {
    pub fn of<T: LinkPayload>() -> Self {
        Self {
            kind: T::KIND,
            encode: encode_payload::<T>,
            decode: decode_payload::<T>,
        }
    }

    pub fn kind(&self) -> LinkKind {
        self.kind
    }

    pub fn header(&self) -> u8 {
        self.kind.header()
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Writes the payload of `link` (without header).
    pub fn encode_into(&self, link: &ChatLink, writer: &mut ByteWriter) {
        (self.encode)(link, writer)
    }

    /// Parses a payload that has already had its header byte stripped.
    pub fn decode(&self, payload: &[u8], policy: PaddingPolicy) -> Result<ChatLink, DecodeError> {
        (self.decode)(&mut ByteReader::new(payload), policy)
    }
}

impl fmt::Debug for VariantCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantCodec")
            .field("kind", &self.kind)
            .field("header", &format_args!("0x{:02X}", self.header()))
            .finish()
    }
}

fn encode_payload<T: LinkPayload>(link: &ChatLink, writer: &mut ByteWriter) {
    debug_assert_eq!(link.kind(), Some(T::KIND));
    if let Some(payload) = T::from_link(link) {
        payload.encode_payload(writer);
    }
}

fn decode_payload<T: LinkPayload>(
    reader: &mut ByteReader<'_>,
    policy: PaddingPolicy,
) -> Result<ChatLink, DecodeError> {
    T::decode_payload(reader, policy).map(Into::into)
}

/// Header byte to codec table. Read-only once built.
pub struct LinkRegistry {
    codecs: Vec<VariantCodec>,
    by_header: AHashMap<u8, usize>,
}

impl LinkRegistry {
    /// Builds a registry holding exactly one codec per [`LinkKind`].
    pub fn new(entries: Vec<VariantCodec>) -> Result<Self, RegistryError> {
        let mut slots: Vec<Option<VariantCodec>> = vec![None; LinkKind::ALL.len()];

        for codec in entries {
            let slot = &mut slots[codec.kind().index()];
            if let Some(existing) = slot {
                return Err(RegistryError::DuplicateHeader {
                    header: codec.header(),
                    first: existing.name(),
                    second: codec.name(),
                });
            }
            *slot = Some(codec);
        }

        let mut codecs = Vec::with_capacity(slots.len());
        for (kind, slot) in LinkKind::ALL.into_iter().zip(slots) {
            codecs.push(slot.ok_or(RegistryError::MissingKind(kind))?);
        }

        let by_header = codecs
            .iter()
            .enumerate()
            .map(|(index, codec)| (codec.header(), index))
            .collect();

        Ok(Self { codecs, by_header })
    }

    pub fn builtin() -> Result<Self, RegistryError> {
        Self::new(vec![
            VariantCodec::of::<CoinLink>(),
            VariantCodec::of::<ItemLink>(),
            VariantCodec::of::<DialogLink>(),
            VariantCodec::of::<PointOfInterestLink>(),
            VariantCodec::of::<SkillLink>(),
            VariantCodec::of::<TraitLink>(),
            VariantCodec::of::<RecipeLink>(),
            VariantCodec::of::<SkinLink>(),
            VariantCodec::of::<OutfitLink>(),
        ])
    }

    /// The process-wide registry, built on first use.
    pub fn global() -> &'static Self {
        REGISTRY.get_or_init(|| match Self::builtin() {
            Ok(registry) => registry,
            Err(e) => panic!("built-in chat link table is inconsistent: {}", e),
        })
    }

    pub fn codec_for(&self, header: u8) -> Option<&VariantCodec> {
        self.by_header.get(&header).map(|&index| &self.codecs[index])
    }

    pub fn codec_for_kind(&self, kind: LinkKind) -> &VariantCodec {
        &self.codecs[kind.index()]
    }

    pub fn codecs(&self) -> &[VariantCodec] {
        &self.codecs
    }

    /// Header byte followed by the payload.
    pub fn encode(&self, link: &ChatLink) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        writer.put_u8(link.header());

        match link {
            ChatLink::Unknown(unknown) => writer.put_slice(unknown.raw_payload()),
            other => {
                if let Some(kind) = other.kind() {
                    self.codec_for_kind(kind).encode_into(other, &mut writer);
                }
            }
        }

        writer.into_vec()
    }

    /// An empty buffer yields a blank unknown link with header 0; an
    /// unregistered header is captured verbatim rather than rejected.
    pub fn decode(&self, bytes: &[u8], policy: PaddingPolicy) -> Result<ChatLink, DecodeError> {
        let Some((&header, payload)) = bytes.split_first() else {
            return Ok(ChatLink::Unknown(UnknownLink::default()));
        };

        match self.codec_for(header) {
            Some(codec) => codec.decode(payload, policy),
            None => {
                debug::trace_unknown_header(header, payload.len());
                Ok(ChatLink::Unknown(UnknownLink::captured(header, payload.to_vec())))
            }
        }
    }

    /// Decodes into a specific kind. An empty buffer yields `T::default()`.
    pub fn decode_as<T: LinkPayload>(&self, bytes: &[u8], policy: PaddingPolicy) -> Result<T, DecodeError> {
        if bytes.is_empty() {
            return Ok(T::default());
        }

        T::try_from(self.decode(bytes, policy)?)
    }
}

impl fmt::Debug for LinkRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.codecs.iter()).finish()
    }
}
