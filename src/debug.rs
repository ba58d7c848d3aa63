use crate::error::ChatLinkError;
use crate::link::{ChatLink, LinkKind};
use std::env;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicBool, Ordering};

static DEBUG_MODE: AtomicBool = AtomicBool::new(false);
static TRACE_MODE: AtomicBool = AtomicBool::new(false);

/// Initialize debug mode from environment variables
///
/// - `CHAT_LINK_DEBUG=1` or `CHAT_LINK_DEBUG_JSON=1`: dump every encoded/decoded link as JSON
/// - `CHAT_LINK_TRACE=1`: one-line human-readable trace of each codec operation
pub fn init_debug_mode() {
    let debug = env::var("CHAT_LINK_DEBUG").is_ok()
        || env::var("CHAT_LINK_DEBUG_JSON").is_ok();

    let trace = env::var("CHAT_LINK_TRACE").is_ok();

    DEBUG_MODE.store(debug, Ordering::Relaxed);
    TRACE_MODE.store(trace, Ordering::Relaxed);

    if debug {
        eprintln!("[CHAT-LINK] Debug mode enabled - links will be logged as JSON");
    }

    if trace {
        eprintln!("[CHAT-LINK] Trace mode enabled - human-readable operation logs");
    }
}

pub fn is_debug_enabled() -> bool {
    DEBUG_MODE.load(Ordering::Relaxed)
}

pub fn is_trace_enabled() -> bool {
    TRACE_MODE.load(Ordering::Relaxed)
}

/// Log a link in JSON format if debug mode is enabled
pub fn log_link(direction: &str, link: &ChatLink) {
    if !is_debug_enabled() {
        return;
    }

    match serde_json::to_string_pretty(link) {
        Ok(json) => {
            eprintln!("\n[CHAT-LINK] {} link:\n{}\n", direction, json);
        }
        Err(e) => {
            eprintln!("[CHAT-LINK] Failed to serialize link to JSON: {}", e);
        }
    }
}

pub fn trace_encode(link: &ChatLink, bytes: &[u8], duration_micros: u128) {
    if !is_trace_enabled() {
        return;
    }

    eprintln!("[CHAT-LINK] Encoded {} into {} bytes [{}] in {}µs",
        link_summary(link), bytes.len(), format_hex(bytes), duration_micros);
}

pub fn trace_decode(link: &ChatLink, size_bytes: usize, duration_micros: u128) {
    if !is_trace_enabled() {
        return;
    }

    eprintln!("[CHAT-LINK] Decoded {} bytes into {} in {}µs",
        size_bytes, link_summary(link), duration_micros);
}

pub fn trace_decode_error(error: &ChatLinkError, input_len: usize) {
    if !is_trace_enabled() {
        return;
    }

    eprintln!("[CHAT-LINK] Rejected {}-char token: {}", input_len, error);
}

pub fn trace_unknown_header(header: u8, payload_len: usize) {
    if !is_trace_enabled() {
        return;
    }

    eprintln!("[CHAT-LINK] Unregistered header 0x{:02X}, keeping {} payload bytes verbatim",
        header, payload_len);
}

/// Space-separated uppercase hex, e.g. `01 64 00 00 00`
pub fn format_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{:02X}", byte);
    }
    out
}

/// Create a short summary of a link
pub fn link_summary(link: &ChatLink) -> String {
    match link {
        ChatLink::Coin(coin) => {
            format!("Coin ({}g {}s {}c)", coin.gold(), coin.silver(), coin.copper())
        }
        ChatLink::Item(item) => {
            let mut summary = format!("Item {} x{}", item.item_id(), item.quantity());
            if let Some(skin) = item.skin_id() {
                let _ = write!(summary, " skin={}", skin);
            }
            if let Some(suffix) = item.suffix_item_id() {
                let _ = write!(summary, " suffix={}", suffix);
            }
            if let Some(suffix) = item.secondary_suffix_item_id() {
                let _ = write!(summary, " suffix2={}", suffix);
            }
            summary
        }
        ChatLink::Dialog(dialog) => format!("{} {}", LinkKind::Dialog, dialog.dialog_id),
        ChatLink::PointOfInterest(poi) => format!("{} {}", LinkKind::PointOfInterest, poi.poi_id),
        ChatLink::Skill(skill) => format!("{} {}", LinkKind::Skill, skill.skill_id),
        ChatLink::Trait(trait_link) => format!("{} {}", LinkKind::Trait, trait_link.trait_id),
        ChatLink::Recipe(recipe) => format!("{} {}", LinkKind::Recipe, recipe.recipe_id),
        ChatLink::Outfit(outfit) => format!("{} {}", LinkKind::Outfit, outfit.outfit_id),
        ChatLink::Skin(skin) => format!("{} {}", LinkKind::Skin, skin.skin_id),
        ChatLink::Unknown(unknown) => {
            format!("Unknown (header 0x{:02X}, {} bytes)", unknown.header(), unknown.raw_payload().len())
        }
    }
}
