use crate::buffer::{ByteReader, ByteWriter};
use crate::error::DecodeError;
use crate::link::*;

/// How fixed-width fields are read when the payload is shorter than the layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PaddingPolicy {
    /// Right-pad-then-parse: zero-extend the bytes that are present.
    /// Older and hand-trimmed tokens rely on this.
    #[default]
    RightPad,
    /// Fail with [`DecodeError::Truncated`].
    Strict,
}

/// Payload codec for one known link kind. The header byte is not part of
/// the payload; the registry writes and strips it.
pub trait LinkPayload: Sized + Default + Into<ChatLink> + TryFrom<ChatLink, Error = DecodeError> {
    const KIND: LinkKind;

    fn encode_payload(&self, writer: &mut ByteWriter);

    fn decode_payload(reader: &mut ByteReader<'_>, policy: PaddingPolicy) -> Result<Self, DecodeError>;

    fn from_link(link: &ChatLink) -> Option<&Self>;
}

fn read_fixed_u32(
    reader: &mut ByteReader<'_>,
    policy: PaddingPolicy,
    kind: LinkKind,
) -> Result<u32, DecodeError> {
    match policy {
        PaddingPolicy::RightPad => Ok(reader.read_u32_le_padded()),
        PaddingPolicy::Strict => reader.read_u32_le().ok_or_else(|| reader.truncated(kind, 4)),
    }
}

fn wrong_variant(expected: LinkKind, found: &ChatLink) -> DecodeError {
    DecodeError::WrongVariant {
        expected,
        found: found.header(),
    }
}

macro_rules! fixed_width_payload {
    ($link:ident, $variant:ident, $field:ident) => {
        impl LinkPayload for $link {
            const KIND: LinkKind = LinkKind::$variant;

            fn encode_payload(&self, writer: &mut ByteWriter) {
                writer.put_u32_le(self.$field);
            }

            fn decode_payload(
                reader: &mut ByteReader<'_>,
                policy: PaddingPolicy,
            ) -> Result<Self, DecodeError> {
                let $field = read_fixed_u32(reader, policy, Self::KIND)?;
                Ok(Self { $field })
            }

            fn from_link(link: &ChatLink) -> Option<&Self> {
                match link {
                    ChatLink::$variant(payload) => Some(payload),
                    _ => None,
                }
            }
        }

        impl From<$link> for ChatLink {
            fn from(payload: $link) -> Self {
                ChatLink::$variant(payload)
            }
        }

        impl TryFrom<ChatLink> for $link {
            type Error = DecodeError;

            fn try_from(link: ChatLink) -> Result<Self, Self::Error> {
                match link {
                    ChatLink::$variant(payload) => Ok(payload),
                    other => Err(wrong_variant(LinkKind::$variant, &other)),
                }
            }
        }
    };
}

fixed_width_payload!(CoinLink, Coin, quantity);
fixed_width_payload!(PointOfInterestLink, PointOfInterest, poi_id);
fixed_width_payload!(SkillLink, Skill, skill_id);
fixed_width_payload!(TraitLink, Trait, trait_id);
fixed_width_payload!(RecipeLink, Recipe, recipe_id);
fixed_width_payload!(OutfitLink, Outfit, outfit_id);
fixed_width_payload!(SkinLink, Skin, skin_id);

impl LinkPayload for DialogLink {
    const KIND: LinkKind = LinkKind::Dialog;

    fn encode_payload(&self, writer: &mut ByteWriter) {
        writer.put_i32_le(self.dialog_id);
    }

    fn decode_payload(reader: &mut ByteReader<'_>, policy: PaddingPolicy) -> Result<Self, DecodeError> {
        let raw = read_fixed_u32(reader, policy, Self::KIND)?;
        Ok(Self {
            dialog_id: i32::from_le_bytes(raw.to_le_bytes()),
        })
    }

    fn from_link(link: &ChatLink) -> Option<&Self> {
        match link {
            ChatLink::Dialog(payload) => Some(payload),
            _ => None,
        }
    }
}

impl From<DialogLink> for ChatLink {
    fn from(payload: DialogLink) -> Self {
        ChatLink::Dialog(payload)
    }
}

impl TryFrom<ChatLink> for DialogLink {
    type Error = DecodeError;

    fn try_from(link: ChatLink) -> Result<Self, Self::Error> {
        match link {
            ChatLink::Dialog(payload) => Ok(payload),
            other => Err(wrong_variant(LinkKind::Dialog, &other)),
        }
    }
}

/// Layout: quantity (1), item id (3), modifiers (1), then one 4-byte block
/// per set modifier bit in skin, suffix, secondary suffix order.
impl LinkPayload for ItemLink {
    const KIND: LinkKind = LinkKind::Item;

    fn encode_payload(&self, writer: &mut ByteWriter) {
        writer.put_u8(self.quantity());
        writer.put_u24_le(self.item_id());
        writer.put_u8(self.modifiers().bits());

        for block in [self.skin_id(), self.suffix_item_id(), self.secondary_suffix_item_id()]
            .into_iter()
            .flatten()
        {
            writer.put_u32_le(block);
        }
    }

    fn decode_payload(reader: &mut ByteReader<'_>, policy: PaddingPolicy) -> Result<Self, DecodeError> {
        let (quantity, item_id, bits) = match policy {
            PaddingPolicy::RightPad => (
                reader.read_u8_padded(),
                reader.read_u24_le_padded(),
                reader.read_u8_padded(),
            ),
            PaddingPolicy::Strict => {
                let quantity = reader.read_u8().ok_or_else(|| reader.truncated(Self::KIND, 1))?;
                let item_id = reader.read_u24_le().ok_or_else(|| reader.truncated(Self::KIND, 3))?;
                let bits = reader.read_u8().ok_or_else(|| reader.truncated(Self::KIND, 1))?;
                (quantity, item_id, bits)
            }
        };

        let modifiers = ItemModifiers::from_bits_truncate(bits);
        let mut link = ItemLink::from_raw(item_id, quantity);
        link.set_skin(read_modifier_block(reader, modifiers, ItemModifiers::SKIN)?);
        link.set_suffix(read_modifier_block(reader, modifiers, ItemModifiers::SUFFIX)?);
        link.set_secondary_suffix(read_modifier_block(
            reader,
            modifiers,
            ItemModifiers::SECONDARY_SUFFIX,
        )?);

        Ok(link)
    }

    fn from_link(link: &ChatLink) -> Option<&Self> {
        match link {
            ChatLink::Item(payload) => Some(payload),
            _ => None,
        }
    }
}

fn read_modifier_block(
    reader: &mut ByteReader<'_>,
    modifiers: ItemModifiers,
    flag: ItemModifiers,
) -> Result<Option<u32>, DecodeError> {
    if !modifiers.contains(flag) {
        return Ok(None);
    }

    reader
        .read_u32_le()
        .map(Some)
        .ok_or_else(|| reader.truncated(LinkKind::Item, 4))
}

impl From<ItemLink> for ChatLink {
    fn from(payload: ItemLink) -> Self {
        ChatLink::Item(payload)
    }
}

impl TryFrom<ChatLink> for ItemLink {
    type Error = DecodeError;

    fn try_from(link: ChatLink) -> Result<Self, Self::Error> {
        match link {
            ChatLink::Item(payload) => Ok(payload),
            other => Err(wrong_variant(LinkKind::Item, &other)),
        }
    }
}

impl From<UnknownLink> for ChatLink {
    fn from(link: UnknownLink) -> Self {
        ChatLink::Unknown(link)
    }
}
