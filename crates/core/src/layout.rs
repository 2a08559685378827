//! Layout resolution: the deterministic mapping from a slide onto
//! renderer-agnostic visual regions.
//!
//! Every rendering surface (editor, standalone viewer, PPTX encoder)
//! consumes the output of [`resolve`] instead of reading slide fields
//! directly, so the per-layout rules live in exactly one place.

use crate::types::{Slide, SlideLayout};
use std::fmt;
use std::str::FromStr;

/// Literal shown for a BigNumber slide whose stat is absent or blank.
pub const BIG_NUMBER_DEFAULT: &str = "100%";

/// Which slide field an edit to a region writes back to.
///
/// The string form (`title`, `point:2`, ...) is used as a DOM marker by
/// the interactive surface and parsed back by the edit channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Title,
    Subtitle,
    /// One bullet, addressed by its index in `points`.
    Point(usize),
    VisualDescription,
    SpeakerNotes,
    ImageUrl,
}

impl fmt::Display for EditTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title => f.write_str("title"),
            Self::Subtitle => f.write_str("subtitle"),
            Self::Point(index) => write!(f, "point:{index}"),
            Self::VisualDescription => f.write_str("visualDescription"),
            Self::SpeakerNotes => f.write_str("speakerNotes"),
            Self::ImageUrl => f.write_str("imageUrl"),
        }
    }
}

impl FromStr for EditTarget {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(Self::Title),
            "subtitle" => Ok(Self::Subtitle),
            "visualDescription" => Ok(Self::VisualDescription),
            "speakerNotes" => Ok(Self::SpeakerNotes),
            "imageUrl" => Ok(Self::ImageUrl),
            _ => {
                if let Some(index) = s.strip_prefix("point:") {
                    if let Ok(index) = index.parse() {
                        return Ok(Self::Point(index));
                    }
                }
                Err(crate::Error::InvalidEditTarget(s.to_string()))
            }
        }
    }
}

/// How a resolved title region should be weighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleRole {
    /// Dominant full-size heading (Title, VisualFocus).
    Hero,
    /// Leading heading above body content (BulletPoints, SplitImage).
    Headline,
    /// Quiet caption above a bigger element (BigNumber).
    Caption,
    /// Heading on the accent divider panel (SectionHeader).
    Section,
}

/// Visual style of a resolved bullet list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStyle {
    /// Arrow-glyph bullets, each item independently editable.
    Arrow,
    /// Plain dot bullets.
    Plain,
    /// Framed callout lines without a bullet glyph.
    Callout,
}

/// How a resolved image region is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTreatment {
    /// Bordered square beside the text column.
    Framed,
    /// Full-bleed half with a directional fade toward the text half.
    FadeToText,
    /// Full-slide background under a dark gradient overlay.
    Background,
}

/// The overall visual arrangement the regions are placed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrangement {
    /// Vertically centered column (Title, BigNumber).
    CenteredStack,
    /// Two-thirds text column with a one-third framed visual (BulletPoints).
    TextWithSidecar,
    /// Two equal halves, text left and image right (SplitImage).
    SplitHalves,
    /// Full-bleed accent-colored divider panel (SectionHeader).
    AccentPanel,
    /// Full-bleed image background with overlaid text (VisualFocus).
    FullBleed,
    /// Single-region fallback for an unrecognized layout tag.
    Fallback,
}

/// One item of a resolved bullet list, addressed by its `points` index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub index: usize,
    pub text: String,
}

/// A resolved, renderer-agnostic visual slot bound to slide content.
#[derive(Debug, Clone, PartialEq)]
pub enum Region {
    /// Fixed decorative kicker text ("Presentation", "Section", ...).
    Label { text: &'static str },

    /// The slide title in its layout-specific role.
    Title { text: String, role: TitleRole },

    /// Secondary line under a hero title. Empty text renders as an
    /// empty editable slot, never as a missing region.
    Subtitle { text: String },

    /// Ordered list bound to `points`, each item index-addressed.
    BulletList { style: ListStyle, items: Vec<ListItem> },

    /// The single emphasized stat of a BigNumber slide.
    BigStat { text: String },

    /// Supporting prose bound to the visual description.
    Supporting { text: String },

    /// Image slot. An absent url means the surface's designated
    /// placeholder fill, never a broken reference.
    Image {
        treatment: ImageTreatment,
        url: Option<String>,
        caption: Option<String>,
        generating: bool,
    },

    /// Presenter-only notes hint. Shown by the editor, ignored by the
    /// viewer, routed to the notes channel by the encoder.
    NotesHint { text: String },

    /// Marker region for an unrecognized layout tag.
    FallbackNotice { layout_tag: String, title: String },
}

impl Region {
    /// The slide field an edit to this region writes back to, if the
    /// region is editable as a whole. Bullet lists are addressed
    /// per-item via [`ListItem::index`] instead.
    pub fn edit_target(&self) -> Option<EditTarget> {
        match self {
            Self::Title { .. } => Some(EditTarget::Title),
            Self::Subtitle { .. } => Some(EditTarget::Subtitle),
            Self::BigStat { .. } => Some(EditTarget::Point(0)),
            Self::Supporting { .. } => Some(EditTarget::VisualDescription),
            Self::NotesHint { .. } => Some(EditTarget::SpeakerNotes),
            Self::Label { .. }
            | Self::BulletList { .. }
            | Self::Image { .. }
            | Self::FallbackNotice { .. } => None,
        }
    }
}

/// A slide resolved into its arrangement and ordered regions.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSlide {
    pub slide_id: String,
    pub arrangement: Arrangement,
    pub regions: Vec<Region>,
}

/// Resolve a slide into the ordered regions required to render it.
///
/// Pure and deterministic: the same slide always resolves to the same
/// regions, independent of the rendering surface. Absent optional
/// fields resolve to defined placeholders and an unrecognized layout
/// resolves to the fallback notice; resolution never fails.
pub fn resolve(slide: &Slide) -> ResolvedSlide {
    let (arrangement, mut regions) = match &slide.layout {
        SlideLayout::Title => (
            Arrangement::CenteredStack,
            vec![
                Region::Label { text: "Presentation" },
                Region::Title {
                    text: slide.title.clone(),
                    role: TitleRole::Hero,
                },
                Region::Subtitle {
                    text: slide.subtitle.clone().unwrap_or_default(),
                },
            ],
        ),

        SlideLayout::BulletPoints => (
            Arrangement::TextWithSidecar,
            vec![
                Region::Title {
                    text: slide.title.clone(),
                    role: TitleRole::Headline,
                },
                Region::BulletList {
                    style: ListStyle::Arrow,
                    items: list_items(slide),
                },
                Region::Image {
                    treatment: ImageTreatment::Framed,
                    url: slide.image_url.clone(),
                    caption: Some(slide.visual_description.clone()),
                    generating: slide.is_image_generating,
                },
            ],
        ),

        SlideLayout::BigNumber => (
            Arrangement::CenteredStack,
            vec![
                Region::Title {
                    text: slide.title.clone(),
                    role: TitleRole::Caption,
                },
                Region::BigStat {
                    text: big_stat_text(slide),
                },
                Region::Supporting {
                    text: slide.visual_description.clone(),
                },
            ],
        ),

        SlideLayout::SplitImage => (
            Arrangement::SplitHalves,
            vec![
                Region::Title {
                    text: slide.title.clone(),
                    role: TitleRole::Headline,
                },
                Region::BulletList {
                    style: ListStyle::Plain,
                    items: list_items(slide),
                },
                Region::Image {
                    treatment: ImageTreatment::FadeToText,
                    url: slide.image_url.clone(),
                    caption: None,
                    generating: slide.is_image_generating,
                },
            ],
        ),

        SlideLayout::SectionHeader => (
            Arrangement::AccentPanel,
            vec![
                Region::Label { text: "Section" },
                Region::Title {
                    text: slide.title.clone(),
                    role: TitleRole::Section,
                },
            ],
        ),

        SlideLayout::VisualFocus => (
            Arrangement::FullBleed,
            vec![
                Region::Image {
                    treatment: ImageTreatment::Background,
                    url: slide.image_url.clone(),
                    caption: None,
                    generating: slide.is_image_generating,
                },
                Region::Label { text: "Visual Focus" },
                Region::Title {
                    text: slide.title.clone(),
                    role: TitleRole::Hero,
                },
                Region::BulletList {
                    style: ListStyle::Callout,
                    items: list_items(slide),
                },
            ],
        ),

        SlideLayout::Unknown(tag) => {
            log::warn!("Unrecognized slide layout '{tag}', using fallback rendering");
            (
                Arrangement::Fallback,
                vec![Region::FallbackNotice {
                    layout_tag: tag.clone(),
                    title: slide.title.clone(),
                }],
            )
        }
    };

    regions.push(Region::NotesHint {
        text: slide.speaker_notes.clone(),
    });

    ResolvedSlide {
        slide_id: slide.id.clone(),
        arrangement,
        regions,
    }
}

fn list_items(slide: &Slide) -> Vec<ListItem> {
    slide
        .points
        .iter()
        .enumerate()
        .map(|(index, text)| ListItem {
            index,
            text: text.clone(),
        })
        .collect()
}

fn big_stat_text(slide: &Slide) -> String {
    match slide.points.first() {
        Some(text) if !text.trim().is_empty() => text.clone(),
        _ => BIG_NUMBER_DEFAULT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_slide(layout: SlideLayout) -> Slide {
        // All optional fields absent.
        Slide::new("s1", layout, "Heading")
    }

    #[test]
    fn test_all_layouts_resolve_with_optionals_absent() {
        let layouts = [
            SlideLayout::Title,
            SlideLayout::BulletPoints,
            SlideLayout::BigNumber,
            SlideLayout::SplitImage,
            SlideLayout::SectionHeader,
            SlideLayout::VisualFocus,
        ];

        for layout in layouts {
            let resolved = resolve(&bare_slide(layout.clone()));
            assert!(
                !resolved.regions.is_empty(),
                "layout {} resolved to no regions",
                layout.tag()
            );
            // Every image region degrades to a placeholder, never a
            // missing reference.
            for region in &resolved.regions {
                if let Region::Image { url, .. } = region {
                    assert!(url.is_none(), "bare slide should have no url");
                }
            }
            // The notes hint is always the last region.
            assert!(matches!(
                resolved.regions.last(),
                Some(Region::NotesHint { .. })
            ));
        }
    }

    #[test]
    fn test_title_layout_regions() {
        let mut slide = bare_slide(SlideLayout::Title);
        slide.subtitle = Some("A closer look".to_string());

        let resolved = resolve(&slide);
        assert_eq!(resolved.arrangement, Arrangement::CenteredStack);
        assert_eq!(resolved.regions[0], Region::Label { text: "Presentation" });
        assert_eq!(
            resolved.regions[1],
            Region::Title {
                text: "Heading".to_string(),
                role: TitleRole::Hero
            }
        );
        assert_eq!(
            resolved.regions[2],
            Region::Subtitle {
                text: "A closer look".to_string()
            }
        );
    }

    #[test]
    fn test_absent_subtitle_resolves_to_empty_slot() {
        let resolved = resolve(&bare_slide(SlideLayout::Title));
        assert_eq!(
            resolved.regions[2],
            Region::Subtitle { text: String::new() }
        );
    }

    #[test]
    fn test_bullet_points_items_are_index_addressed() {
        let mut slide = bare_slide(SlideLayout::BulletPoints);
        slide.points = vec!["one".to_string(), "two".to_string()];
        slide.visual_description = "golden shapes".to_string();

        let resolved = resolve(&slide);
        assert_eq!(resolved.arrangement, Arrangement::TextWithSidecar);

        let Region::BulletList { style, items } = &resolved.regions[1] else {
            panic!("expected bullet list");
        };
        assert_eq!(*style, ListStyle::Arrow);
        assert_eq!(items[0], ListItem { index: 0, text: "one".to_string() });
        assert_eq!(items[1], ListItem { index: 1, text: "two".to_string() });

        let Region::Image { caption, .. } = &resolved.regions[2] else {
            panic!("expected image region");
        };
        assert_eq!(caption.as_deref(), Some("golden shapes"));
    }

    #[test]
    fn test_big_number_defaults_when_points_absent() {
        let resolved = resolve(&bare_slide(SlideLayout::BigNumber));
        let Region::BigStat { text } = &resolved.regions[1] else {
            panic!("expected big stat");
        };
        assert_eq!(text, BIG_NUMBER_DEFAULT);
    }

    #[test]
    fn test_big_number_defaults_when_first_point_blank() {
        let mut slide = bare_slide(SlideLayout::BigNumber);
        slide.points = vec!["   ".to_string()];

        let resolved = resolve(&slide);
        let Region::BigStat { text } = &resolved.regions[1] else {
            panic!("expected big stat");
        };
        assert_eq!(text, BIG_NUMBER_DEFAULT);
    }

    #[test]
    fn test_big_number_uses_first_point() {
        let mut slide = bare_slide(SlideLayout::BigNumber);
        slide.title = "Growth".to_string();
        slide.points = vec!["42%".to_string()];

        let resolved = resolve(&slide);
        assert_eq!(
            resolved.regions[0],
            Region::Title {
                text: "Growth".to_string(),
                role: TitleRole::Caption
            }
        );
        assert_eq!(
            resolved.regions[1],
            Region::BigStat { text: "42%".to_string() }
        );
    }

    #[test]
    fn test_visual_focus_callouts_have_no_caption() {
        let mut slide = bare_slide(SlideLayout::VisualFocus);
        slide.points = vec!["a point".to_string()];
        slide.image_url = Some("https://example.com/a.png".to_string());

        let resolved = resolve(&slide);
        assert_eq!(resolved.arrangement, Arrangement::FullBleed);

        let Region::Image { treatment, url, caption, .. } = &resolved.regions[0] else {
            panic!("expected background image first");
        };
        assert_eq!(*treatment, ImageTreatment::Background);
        assert_eq!(url.as_deref(), Some("https://example.com/a.png"));
        assert!(caption.is_none());

        let Region::BulletList { style, .. } = &resolved.regions[3] else {
            panic!("expected callout list");
        };
        assert_eq!(*style, ListStyle::Callout);
    }

    #[test]
    fn test_unknown_layout_resolves_to_fallback() {
        let slide = bare_slide(SlideLayout::Unknown("spiral".to_string()));
        let resolved = resolve(&slide);

        assert_eq!(resolved.arrangement, Arrangement::Fallback);
        assert_eq!(
            resolved.regions[0],
            Region::FallbackNotice {
                layout_tag: "spiral".to_string(),
                title: "Heading".to_string()
            }
        );
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let mut slide = bare_slide(SlideLayout::SplitImage);
        slide.points = vec!["x".to_string(), "y".to_string()];
        slide.image_url = Some("https://example.com/img.png".to_string());

        assert_eq!(resolve(&slide), resolve(&slide));
    }

    #[test]
    fn test_edit_target_string_round_trip() {
        let targets = [
            EditTarget::Title,
            EditTarget::Subtitle,
            EditTarget::Point(3),
            EditTarget::VisualDescription,
            EditTarget::SpeakerNotes,
            EditTarget::ImageUrl,
        ];
        for target in targets {
            let parsed: EditTarget = target.to_string().parse().unwrap();
            assert_eq!(parsed, target);
        }

        assert!("points".parse::<EditTarget>().is_err());
        assert!("point:x".parse::<EditTarget>().is_err());
    }
}
