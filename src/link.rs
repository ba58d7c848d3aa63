use crate::error::InvalidLink;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum LinkKind {
    Coin = 0x01,
    Item = 0x02,
    Dialog = 0x03,
    PointOfInterest = 0x04,
    Skill = 0x07,
    Trait = 0x08,
    Recipe = 0x0A,
    Skin = 0x0B,
    Outfit = 0x0C,
}

impl LinkKind {
    pub const ALL: [LinkKind; 9] = [
        LinkKind::Coin,
        LinkKind::Item,
        LinkKind::Dialog,
        LinkKind::PointOfInterest,
        LinkKind::Skill,
        LinkKind::Trait,
        LinkKind::Recipe,
        LinkKind::Skin,
        LinkKind::Outfit,
    ];

    pub fn header(self) -> u8 {
        self as u8
    }

    /// Position of this kind in [`LinkKind::ALL`].
    pub fn index(self) -> usize {
        match self {
            LinkKind::Coin => 0,
            LinkKind::Item => 1,
            LinkKind::Dialog => 2,
            LinkKind::PointOfInterest => 3,
            LinkKind::Skill => 4,
            LinkKind::Trait => 5,
            LinkKind::Recipe => 6,
            LinkKind::Skin => 7,
            LinkKind::Outfit => 8,
        }
    }

    pub fn from_header(header: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.header() == header)
    }

    pub fn name(self) -> &'static str {
        match self {
            LinkKind::Coin => "Coin",
            LinkKind::Item => "Item",
            LinkKind::Dialog => "Dialog",
            LinkKind::PointOfInterest => "PointOfInterest",
            LinkKind::Skill => "Skill",
            LinkKind::Trait => "Trait",
            LinkKind::Recipe => "Recipe",
            LinkKind::Skin => "Skin",
            LinkKind::Outfit => "Outfit",
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// Item modifier byte. Blocks follow in declaration order, 4 bytes each.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ItemModifiers: u8 {
        const SKIN = 0x80;
        const SUFFIX = 0x40;
        const SECONDARY_SUFFIX = 0x20;
    }
}

/// A decoded or hand-built chat link.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatLink {
    Coin(CoinLink),
    Item(ItemLink),
    Dialog(DialogLink),
    PointOfInterest(PointOfInterestLink),
    Skill(SkillLink),
    Trait(TraitLink),
    Recipe(RecipeLink),
    Outfit(OutfitLink),
    Skin(SkinLink),
    Unknown(UnknownLink),
}

impl ChatLink {
    /// `None` for links whose header is not a known kind.
    pub fn kind(&self) -> Option<LinkKind> {
        match self {
            ChatLink::Coin(_) => Some(LinkKind::Coin),
            ChatLink::Item(_) => Some(LinkKind::Item),
            ChatLink::Dialog(_) => Some(LinkKind::Dialog),
            ChatLink::PointOfInterest(_) => Some(LinkKind::PointOfInterest),
            ChatLink::Skill(_) => Some(LinkKind::Skill),
            ChatLink::Trait(_) => Some(LinkKind::Trait),
            ChatLink::Recipe(_) => Some(LinkKind::Recipe),
            ChatLink::Outfit(_) => Some(LinkKind::Outfit),
            ChatLink::Skin(_) => Some(LinkKind::Skin),
            ChatLink::Unknown(_) => None,
        }
    }

    pub fn header(&self) -> u8 {
        match self {
            ChatLink::Unknown(link) => link.header(),
            other => other.kind().map(LinkKind::header).unwrap_or_default(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ChatLink::Unknown(_))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoinLink {
    /// Total amount in copper.
    pub quantity: u32,
}

impl CoinLink {
    pub const COPPER_PER_SILVER: u32 = 100;
    pub const COPPER_PER_GOLD: u32 = 10_000;

    pub fn new(quantity: u32) -> Self {
        Self { quantity }
    }

    /// Returns `None` if the total overflows `u32`.
    pub fn from_denominations(gold: u32, silver: u32, copper: u32) -> Option<Self> {
        let quantity = gold
            .checked_mul(Self::COPPER_PER_GOLD)?
            .checked_add(silver.checked_mul(Self::COPPER_PER_SILVER)?)?
            .checked_add(copper)?;
        Some(Self { quantity })
    }

    pub fn gold(&self) -> u32 {
        self.quantity / Self::COPPER_PER_GOLD
    }

    pub fn silver(&self) -> u32 {
        self.quantity % Self::COPPER_PER_GOLD / Self::COPPER_PER_SILVER
    }

    pub fn copper(&self) -> u32 {
        self.quantity % Self::COPPER_PER_SILVER
    }
}

/// An item stack with optional skin and upgrade overrides.
///
/// Fields are private so hand-built and deserialized values always satisfy
/// the encode-time bounds. Decoded values keep whatever quantity byte the
/// token carried, including zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ItemLinkFields", into = "ItemLinkFields")]
pub struct ItemLink {
    item_id: u32,
    quantity: u8,
    skin_id: Option<u32>,
    suffix_item_id: Option<u32>,
    secondary_suffix_item_id: Option<u32>,
}

impl ItemLink {
    pub const MAX_ITEM_ID: u32 = 0x00FF_FFFF;

    pub fn new(item_id: u32, quantity: u32) -> Result<Self, InvalidLink> {
        if item_id > Self::MAX_ITEM_ID {
            return Err(InvalidLink::ItemIdOutOfRange(item_id));
        }

        let quantity = match u8::try_from(quantity) {
            Ok(q) if q >= 1 => q,
            _ => return Err(InvalidLink::QuantityOutOfRange(quantity)),
        };

        Ok(Self::from_raw(item_id, quantity))
    }

    pub(crate) fn from_raw(item_id: u32, quantity: u8) -> Self {
        Self {
            item_id,
            quantity,
            skin_id: None,
            suffix_item_id: None,
            secondary_suffix_item_id: None,
        }
    }

    pub fn with_skin(mut self, skin_id: u32) -> Self {
        self.skin_id = Some(skin_id);
        self
    }

    pub fn with_suffix(mut self, suffix_item_id: u32) -> Self {
        self.suffix_item_id = Some(suffix_item_id);
        self
    }

    pub fn with_secondary_suffix(mut self, secondary_suffix_item_id: u32) -> Self {
        self.secondary_suffix_item_id = Some(secondary_suffix_item_id);
        self
    }

    pub(crate) fn set_skin(&mut self, skin_id: Option<u32>) {
        self.skin_id = skin_id;
    }

    pub(crate) fn set_suffix(&mut self, suffix_item_id: Option<u32>) {
        self.suffix_item_id = suffix_item_id;
    }

    pub(crate) fn set_secondary_suffix(&mut self, secondary_suffix_item_id: Option<u32>) {
        self.secondary_suffix_item_id = secondary_suffix_item_id;
    }

    pub fn item_id(&self) -> u32 {
        self.item_id
    }

    pub fn quantity(&self) -> u8 {
        self.quantity
    }

    pub fn skin_id(&self) -> Option<u32> {
        self.skin_id
    }

    pub fn suffix_item_id(&self) -> Option<u32> {
        self.suffix_item_id
    }

    pub fn secondary_suffix_item_id(&self) -> Option<u32> {
        self.secondary_suffix_item_id
    }

    pub fn modifiers(&self) -> ItemModifiers {
        let mut modifiers = ItemModifiers::empty();
        modifiers.set(ItemModifiers::SKIN, self.skin_id.is_some());
        modifiers.set(ItemModifiers::SUFFIX, self.suffix_item_id.is_some());
        modifiers.set(ItemModifiers::SECONDARY_SUFFIX, self.secondary_suffix_item_id.is_some());
        modifiers
    }
}

impl Default for ItemLink {
    fn default() -> Self {
        Self::from_raw(0, 1)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ItemLinkFields {
    item_id: u32,
    quantity: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    skin_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    suffix_item_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    secondary_suffix_item_id: Option<u32>,
}

impl TryFrom<ItemLinkFields> for ItemLink {
    type Error = InvalidLink;

    fn try_from(fields: ItemLinkFields) -> Result<Self, Self::Error> {
        let link = Self::new(fields.item_id, u32::from(fields.quantity))?;

        Ok(Self {
            skin_id: fields.skin_id,
            suffix_item_id: fields.suffix_item_id,
            secondary_suffix_item_id: fields.secondary_suffix_item_id,
            ..link
        })
    }
}

impl From<ItemLink> for ItemLinkFields {
    fn from(link: ItemLink) -> Self {
        Self {
            item_id: link.item_id,
            quantity: link.quantity,
            skin_id: link.skin_id,
            suffix_item_id: link.suffix_item_id,
            secondary_suffix_item_id: link.secondary_suffix_item_id,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DialogLink {
    pub dialog_id: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointOfInterestLink {
    pub poi_id: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillLink {
    pub skill_id: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraitLink {
    pub trait_id: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecipeLink {
    pub recipe_id: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutfitLink {
    pub outfit_id: u32,
}

/// Wardrobe skin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkinLink {
    pub skin_id: u32,
}

/// A link whose header this build does not recognize, kept byte for byte.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "UnknownLinkFields")]
pub struct UnknownLink {
    header: u8,
    raw_payload: Vec<u8>,
}

impl UnknownLink {
    pub fn new(header: u8, raw_payload: Vec<u8>) -> Result<Self, InvalidLink> {
        if LinkKind::from_header(header).is_some() {
            return Err(InvalidLink::ReservedHeader(header));
        }

        Ok(Self::captured(header, raw_payload))
    }

    pub(crate) fn captured(header: u8, raw_payload: Vec<u8>) -> Self {
        Self {
            header,
            raw_payload,
        }
    }

    pub fn header(&self) -> u8 {
        self.header
    }

    pub fn raw_payload(&self) -> &[u8] {
        &self.raw_payload
    }

    pub fn into_raw_payload(self) -> Vec<u8> {
        self.raw_payload
    }
}

#[derive(Debug, Clone, Deserialize)]
struct UnknownLinkFields {
    header: u8,
    raw_payload: Vec<u8>,
}

impl TryFrom<UnknownLinkFields> for UnknownLink {
    type Error = InvalidLink;

    fn try_from(fields: UnknownLinkFields) -> Result<Self, Self::Error> {
        Self::new(fields.header, fields.raw_payload)
    }
}
