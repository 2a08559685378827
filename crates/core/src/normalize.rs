//! Post-processing of generated decks.
//!
//! The generation service is trusted for content but not for
//! bookkeeping: slide ids may be missing or duplicated and image
//! references may be absent. Everything here repairs those gaps before
//! a presentation enters the editing session.

use crate::types::{Presentation, Slide};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Regex to collapse whitespace runs in file stems.
static WHITESPACE_RUN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Regex matching characters that are unsafe in file names.
static UNSAFE_STEM_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[/\\:*?"<>|]"#).unwrap());

/// Fallback stem when the topic normalizes to nothing.
const DEFAULT_FILE_STEM: &str = "presentation";

/// Ensure every slide id is unique and non-empty.
///
/// Missing or colliding ids are replaced with a fallback derived from
/// the creation stamp and the slide's position. The stamp is supplied
/// by the driver so this stays clock-free.
pub fn assign_unique_ids(slides: &mut [Slide], stamp: u64) {
    let mut seen: HashSet<String> = HashSet::with_capacity(slides.len());

    for (index, slide) in slides.iter_mut().enumerate() {
        let trimmed = slide.id.trim();
        let mut id = if trimmed.is_empty() || seen.contains(trimmed) {
            format!("slide-{stamp}-{index}")
        } else {
            trimmed.to_string()
        };

        // The positional fallback itself can collide with an id the
        // generator happened to emit.
        let mut bump = 0usize;
        while seen.contains(&id) {
            bump += 1;
            id = format!("slide-{stamp}-{index}-{bump}");
        }

        seen.insert(id.clone());
        slide.id = id;
    }
}

/// Give every slide without an image a deterministic placeholder URL
/// seeded by its id.
pub fn resolve_image_urls(slides: &mut [Slide]) {
    for slide in slides {
        let missing = slide
            .image_url
            .as_deref()
            .map_or(true, |url| url.trim().is_empty());
        if missing {
            slide.image_url = Some(format!(
                "https://picsum.photos/seed/{}/1920/1080",
                slide.id
            ));
        }
    }
}

/// Derive a filesystem-safe file stem from a deck topic.
///
/// Path-hostile characters are stripped, whitespace runs become a
/// single underscore, and an empty result falls back to a fixed stem.
pub fn safe_file_stem(topic: &str) -> String {
    let stripped = UNSAFE_STEM_REGEX.replace_all(topic, "");
    let stem = WHITESPACE_RUN_REGEX
        .replace_all(stripped.trim(), "_")
        .to_string();

    if stem.is_empty() {
        DEFAULT_FILE_STEM.to_string()
    } else {
        stem
    }
}

/// Apply all post-generation repairs to a freshly generated deck.
pub fn finalize_generated(presentation: &mut Presentation, stamp: u64) {
    assign_unique_ids(&mut presentation.slides, stamp);
    resolve_image_urls(&mut presentation.slides);
}
