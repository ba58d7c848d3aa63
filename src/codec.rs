use crate::debug;
use crate::envelope;
use crate::error::{ChatLinkError, Result};
use crate::link::ChatLink;
use crate::registry::LinkRegistry;
use crate::variants::{LinkPayload, PaddingPolicy};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    pub padding_policy: PaddingPolicy,
    /// Route operations through the `debug` trace hooks.
    pub diagnostics: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            padding_policy: PaddingPolicy::RightPad,
            diagnostics: true,
        }
    }
}

impl CodecConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_padding_policy(mut self, policy: PaddingPolicy) -> Self {
        self.padding_policy = policy;
        self
    }

    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }
}

/// Text token <-> [`ChatLink`] conversion over the global registry.
#[derive(Debug, Clone, Copy)]
pub struct ChatLinkCodec {
    config: CodecConfig,
    registry: &'static LinkRegistry,
}

impl ChatLinkCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self {
            config,
            registry: LinkRegistry::global(),
        }
    }

    /// Rejects short fixed-width payloads instead of zero-padding them.
    pub fn strict() -> Self {
        Self::new(CodecConfig::new().with_padding_policy(PaddingPolicy::Strict))
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn registry(&self) -> &'static LinkRegistry {
        self.registry
    }

    /// Header byte plus payload, without the text envelope.
    pub fn encode_bytes(&self, link: &ChatLink) -> Vec<u8> {
        let start = self.config.diagnostics.then(Instant::now);
        let bytes = self.registry.encode(link);

        if let Some(start) = start {
            debug::log_link("Encoded", link);
            debug::trace_encode(link, &bytes, start.elapsed().as_micros());
        }

        bytes
    }

    pub fn encode(&self, link: &ChatLink) -> String {
        envelope::wrap(&self.encode_bytes(link))
    }

    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<ChatLink> {
        let start = self.config.diagnostics.then(Instant::now);
        let link = self.registry.decode(bytes, self.config.padding_policy)?;

        if let Some(start) = start {
            debug::log_link("Decoded", &link);
            debug::trace_decode(&link, bytes.len(), start.elapsed().as_micros());
        }

        Ok(link)
    }

    pub fn decode(&self, text: &str) -> Result<ChatLink> {
        let result = envelope::unwrap(text)
            .map_err(ChatLinkError::from)
            .and_then(|bytes| self.decode_bytes(&bytes));

        self.trace_failure(result, text)
    }

    /// Decodes a token that must be of kind `T`. `[&]` yields `T::default()`.
    pub fn decode_as<T: LinkPayload>(&self, text: &str) -> Result<T> {
        let result = envelope::unwrap(text)
            .map_err(ChatLinkError::from)
            .and_then(|bytes| {
                if bytes.is_empty() {
                    return Ok(T::default());
                }
                Ok(T::try_from(self.decode_bytes(&bytes)?)?)
            });

        self.trace_failure(result, text)
    }

    fn trace_failure<T>(&self, result: Result<T>, text: &str) -> Result<T> {
        if let Err(e) = &result {
            if self.config.diagnostics {
                debug::trace_decode_error(e, text.len());
            }
        }
        result
    }
}

impl Default for ChatLinkCodec {
    fn default() -> Self {
        Self::new(CodecConfig::default())
    }
}

impl fmt::Display for ChatLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&ChatLinkCodec::default().encode(self))
    }
}

impl FromStr for ChatLink {
    type Err = ChatLinkError;

    fn from_str(s: &str) -> Result<Self> {
        ChatLinkCodec::default().decode(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DecodeError, EnvelopeError};
    use crate::link::*;

    fn sample_links() -> Vec<ChatLink> {
        vec![
            ChatLink::Coin(CoinLink::new(0)),
            ChatLink::Coin(CoinLink::new(u32::MAX)),
            ChatLink::Item(ItemLink::new(28445, 1).unwrap()),
            ChatLink::Item(ItemLink::new(ItemLink::MAX_ITEM_ID, 255).unwrap().with_skin(u32::MAX)),
            ChatLink::Item(
                ItemLink::new(46762, 250)
                    .unwrap()
                    .with_skin(3709)
                    .with_suffix(24615)
                    .with_secondary_suffix(24618),
            ),
            ChatLink::Item(ItemLink::new(46762, 1).unwrap().with_secondary_suffix(24618)),
            ChatLink::Dialog(DialogLink { dialog_id: i32::MIN }),
            ChatLink::Dialog(DialogLink { dialog_id: 42 }),
            ChatLink::PointOfInterest(PointOfInterestLink { poi_id: 56 }),
            ChatLink::Skill(SkillLink { skill_id: 5491 }),
            ChatLink::Trait(TraitLink { trait_id: 1010 }),
            ChatLink::Recipe(RecipeLink { recipe_id: 7 }),
            ChatLink::Outfit(OutfitLink { outfit_id: 1 }),
            ChatLink::Skin(SkinLink { skin_id: 4 }),
            ChatLink::Unknown(UnknownLink::new(0x00, vec![]).unwrap()),
            ChatLink::Unknown(UnknownLink::new(0x0D, vec![0x10, 0x20]).unwrap()),
            ChatLink::Unknown(UnknownLink::new(0xFF, vec![9; 40]).unwrap()),
        ]
    }

    #[test]
    fn test_round_trip() {
        let codec = ChatLinkCodec::default();

        for link in sample_links() {
            let text = codec.encode(&link);
            assert_eq!(codec.decode(&text).unwrap(), link, "token {}", text);
        }
    }

    #[test]
    fn test_round_trip_strict() {
        let codec = ChatLinkCodec::strict();

        for link in sample_links() {
            let text = codec.encode(&link);
            assert_eq!(codec.decode(&text).unwrap(), link, "token {}", text);
        }
    }

    #[test]
    fn test_coin_token() {
        let codec = ChatLinkCodec::default();
        let link = ChatLink::Coin(CoinLink::new(100));

        assert_eq!(codec.encode_bytes(&link), vec![0x01, 0x64, 0x00, 0x00, 0x00]);
        assert_eq!(codec.encode(&link), "[&AWQAAAA=]");
    }

    #[test]
    fn test_item_token() {
        let codec = ChatLinkCodec::default();
        let link = ChatLink::Item(ItemLink::new(28445, 1).unwrap());

        let bytes = codec.encode_bytes(&link);
        assert_eq!(bytes, vec![0x02, 0x01, 0x1D, 0x6F, 0x00, 0x00]);
        assert_eq!(codec.encode(&link), "[&AgEdbwAA]");
    }

    #[test]
    fn test_empty_payload() {
        let codec = ChatLinkCodec::default();

        let link = codec.decode("[&]").unwrap();
        assert_eq!(link, ChatLink::Unknown(UnknownLink::default()));
        assert_eq!(link.header(), 0);

        let skill: SkillLink = codec.decode_as("[&]").unwrap();
        assert_eq!(skill, SkillLink::default());
    }

    #[test]
    fn test_envelope_rejection() {
        let codec = ChatLinkCodec::default();

        for text in ["", "[&]x", "&abc]", "[&AW*AAAA=]", "[&AWQAAAA]"] {
            assert!(
                matches!(codec.decode(text), Err(ChatLinkError::Envelope(EnvelopeError::Malformed(_)))),
                "accepted {:?}",
                text
            );
        }
    }

    #[test]
    fn test_unknown_header_fidelity() {
        let codec = ChatLinkCodec::default();
        let bytes = [0xFF, 0x10, 0x20, 0x30, 0x40, 0x50, 0x60, 0x70];
        let text = envelope::wrap(&bytes);

        let link = codec.decode(&text).unwrap();
        match &link {
            ChatLink::Unknown(unknown) => {
                assert_eq!(unknown.header(), 0xFF);
                assert_eq!(unknown.raw_payload(), &bytes[1..]);
            }
            other => panic!("expected unknown link, got {:?}", other),
        }

        assert_eq!(codec.encode_bytes(&link), bytes.to_vec());
        assert_eq!(codec.encode(&link), text);
    }

    #[test]
    fn test_decode_as() {
        let codec = ChatLinkCodec::default();
        let text = codec.encode(&ChatLink::Recipe(RecipeLink { recipe_id: 7 }));

        let recipe: RecipeLink = codec.decode_as(&text).unwrap();
        assert_eq!(recipe.recipe_id, 7);

        assert_eq!(
            codec.decode_as::<OutfitLink>(&text),
            Err(ChatLinkError::Decode(DecodeError::WrongVariant {
                expected: LinkKind::Outfit,
                found: 0x0A,
            }))
        );
    }

    #[test]
    fn test_decode_as_agrees_with_decode() {
        let traced = ChatLinkCodec::default();
        let quiet = ChatLinkCodec::new(CodecConfig::new().with_diagnostics(false));
        let item = ItemLink::new(46762, 3).unwrap().with_suffix(24615);
        let text = traced.encode(&ChatLink::Item(item));

        for codec in [traced, quiet] {
            assert_eq!(codec.decode(&text).unwrap(), ChatLink::Item(item));
            assert_eq!(codec.decode_as::<ItemLink>(&text).unwrap(), item);
            assert_eq!(codec.decode_as::<CoinLink>("[&]").unwrap(), CoinLink::default());
            assert!(matches!(
                codec.decode_as::<CoinLink>("[&AgEdbwAA"),
                Err(ChatLinkError::Envelope(EnvelopeError::Malformed(_)))
            ));
            assert!(matches!(
                ChatLinkCodec::new(CodecConfig { padding_policy: PaddingPolicy::Strict, ..*codec.config() })
                    .decode_as::<RecipeLink>(&envelope::wrap(&[0x0A, 0x34])),
                Err(ChatLinkError::Decode(DecodeError::Truncated { kind: LinkKind::Recipe, .. }))
            ));
        }
    }

    #[test]
    fn test_quiet_codec_round_trip() {
        let codec = ChatLinkCodec::new(CodecConfig::new().with_diagnostics(false));

        for link in sample_links() {
            let bytes = codec.encode_bytes(&link);
            assert_eq!(bytes, ChatLinkCodec::default().encode_bytes(&link));
            assert_eq!(codec.decode_bytes(&bytes).unwrap(), link);
        }
    }

    #[test]
    fn test_decode_as_unknown_header() {
        let codec = ChatLinkCodec::default();
        let text = envelope::wrap(&[0x0D, 0x01]);

        assert_eq!(
            codec.decode_as::<ItemLink>(&text),
            Err(ChatLinkError::Decode(DecodeError::WrongVariant {
                expected: LinkKind::Item,
                found: 0x0D,
            }))
        );
    }

    #[test]
    fn test_short_recipe_policies() {
        let text = envelope::wrap(&[0x0A, 0x34, 0x12]);

        let lenient = ChatLinkCodec::default().decode(&text).unwrap();
        assert_eq!(lenient, ChatLink::Recipe(RecipeLink { recipe_id: 0x1234 }));

        let strict = ChatLinkCodec::strict().decode(&text);
        assert!(matches!(
            strict,
            Err(ChatLinkError::Decode(DecodeError::Truncated { kind: LinkKind::Recipe, .. }))
        ));
    }

    #[test]
    fn test_item_truncated_token() {
        let text = envelope::wrap(&[0x02, 0x01, 0x1D, 0x6F, 0x00, 0x40, 0x01]);

        assert!(matches!(
            ChatLinkCodec::default().decode(&text),
            Err(ChatLinkError::Decode(DecodeError::Truncated { kind: LinkKind::Item, .. }))
        ));
    }

    #[test]
    fn test_display_and_from_str() {
        let link = ChatLink::Skill(SkillLink { skill_id: 5491 });
        let text = link.to_string();

        assert_eq!(text, ChatLinkCodec::default().encode(&link));
        assert_eq!(text.parse::<ChatLink>().unwrap(), link);
        assert!("not a link".parse::<ChatLink>().is_err());
    }

    #[test]
    fn test_concurrent_decode() {
        let text = ChatLinkCodec::default().encode(&ChatLink::Item(
            ItemLink::new(46762, 1).unwrap().with_skin(3709),
        ));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let text = text.clone();
                std::thread::spawn(move || {
                    let codec = ChatLinkCodec::new(CodecConfig::new().with_diagnostics(false));
                    (0..100)
                        .map(|_| codec.decode(&text).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let expected = ChatLinkCodec::default().decode(&text).unwrap();
        for handle in handles {
            for link in handle.join().unwrap() {
                assert_eq!(link, expected);
            }
        }
    }

    #[test]
    fn test_config_builder() {
        let config = CodecConfig::new()
            .with_padding_policy(PaddingPolicy::Strict)
            .with_diagnostics(false);

        assert_eq!(config.padding_policy, PaddingPolicy::Strict);
        assert!(!config.diagnostics);
        assert_eq!(ChatLinkCodec::new(config).config(), &config);
        assert_eq!(CodecConfig::default().padding_policy, PaddingPolicy::RightPad);
    }
}
