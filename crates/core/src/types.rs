//! Domain types for the slide deck: the slide schema and the presentation.

use serde::{Deserialize, Serialize};

/// The closed set of visual templates a slide can use.
///
/// Values outside the closed set deserialize into [`SlideLayout::Unknown`]
/// so a single bad tag degrades to the fallback rendering instead of
/// failing the whole deck.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SlideLayout {
    /// Cover slide: headline plus optional subtitle.
    Title,
    /// Text column with an ordered bullet list and a framed side visual.
    BulletPoints,
    /// One emphasized stat under a caption.
    BigNumber,
    /// Half text, half full-bleed image.
    SplitImage,
    /// Accent-colored divider introducing a new topic.
    SectionHeader,
    /// Image-first slide with minimal callout text.
    VisualFocus,
    /// Any tag outside the closed set, preserved for round-tripping.
    Unknown(String),
}

impl SlideLayout {
    /// The wire tag for this layout.
    pub fn tag(&self) -> &str {
        match self {
            Self::Title => "title",
            Self::BulletPoints => "bullet-points",
            Self::BigNumber => "big-number",
            Self::SplitImage => "split-image",
            Self::SectionHeader => "section-header",
            Self::VisualFocus => "visual-focus",
            Self::Unknown(tag) => tag,
        }
    }

    /// All recognized wire tags, in schema order.
    pub fn known_tags() -> [&'static str; 6] {
        [
            "title",
            "bullet-points",
            "big-number",
            "split-image",
            "section-header",
            "visual-focus",
        ]
    }
}

impl From<String> for SlideLayout {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "title" => Self::Title,
            "bullet-points" => Self::BulletPoints,
            "big-number" => Self::BigNumber,
            "split-image" => Self::SplitImage,
            "section-header" => Self::SectionHeader,
            "visual-focus" => Self::VisualFocus,
            _ => Self::Unknown(tag),
        }
    }
}

impl From<SlideLayout> for String {
    fn from(layout: SlideLayout) -> Self {
        layout.tag().to_string()
    }
}

/// A single visual unit of the deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    /// Opaque unique token, stable across edits.
    pub id: String,

    /// Which visual template this slide renders with.
    pub layout: SlideLayout,

    /// Short text whose role depends on the layout (headline, stat
    /// caption, section name).
    pub title: String,

    /// Secondary line, meaningful for the Title layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    /// Ordered short text items: a bullet list for most layouts, or the
    /// emphasized stat as the first element for BigNumber.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub points: Vec<String>,

    /// Free text describing the intended image content. Doubles as a
    /// caption fallback and as the image generation prompt.
    pub visual_description: String,

    /// Presenter-only notes, never rendered on the visible surface.
    pub speaker_notes: String,

    /// Resolved image reference. Absence degrades to the layout's
    /// placeholder fill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Transient render-only flag while a replacement image is pending.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_image_generating: bool,
}

impl Slide {
    /// Create a slide with the given id, layout, and title. Optional
    /// fields start empty.
    pub fn new(id: impl Into<String>, layout: SlideLayout, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            layout,
            title: title.into(),
            subtitle: None,
            points: Vec::new(),
            visual_description: String::new(),
            speaker_notes: String::new(),
            image_url: None,
            is_image_generating: false,
        }
    }
}

/// An ordered sequence of slides plus deck-level metadata.
///
/// Slide order is both the editing navigation order and the exported
/// slide order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    /// Deck title, used in file naming and headers.
    pub topic: String,

    /// Visual theme label. Carried through but currently inert.
    #[serde(default)]
    pub theme: String,

    /// Slides in presentation order.
    pub slides: Vec<Slide>,
}

impl Presentation {
    /// Create an empty presentation with the given topic.
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            theme: String::new(),
            slides: Vec::new(),
        }
    }

    /// Look up a slide by id.
    pub fn slide(&self, id: &str) -> Option<&Slide> {
        self.slides.iter().find(|s| s.id == id)
    }

    /// Look up a slide by id for mutation.
    pub fn slide_mut(&mut self, id: &str) -> Option<&mut Slide> {
        self.slides.iter_mut().find(|s| s.id == id)
    }

    /// Number of slides in the deck.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// A filesystem-safe file stem derived from the topic.
    pub fn file_stem(&self) -> String {
        crate::normalize::safe_file_stem(&self.topic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_round_trips_known_tags() {
        for tag in SlideLayout::known_tags() {
            let layout = SlideLayout::from(tag.to_string());
            assert!(!matches!(layout, SlideLayout::Unknown(_)), "tag {tag}");
            assert_eq!(layout.tag(), tag);
        }
    }

    #[test]
    fn test_layout_preserves_unknown_tag() {
        let layout = SlideLayout::from("zigzag".to_string());
        assert_eq!(layout, SlideLayout::Unknown("zigzag".to_string()));
        assert_eq!(layout.tag(), "zigzag");
        assert_eq!(String::from(layout), "zigzag");
    }

    #[test]
    fn test_slide_deserializes_with_optionals_absent() {
        let json = r#"{
            "id": "s1",
            "layout": "big-number",
            "title": "Growth",
            "visualDescription": "upward arrow chart",
            "speakerNotes": "mention the quarter"
        }"#;

        let slide: Slide = serde_json::from_str(json).unwrap();
        assert_eq!(slide.layout, SlideLayout::BigNumber);
        assert_eq!(slide.subtitle, None);
        assert!(slide.points.is_empty());
        assert_eq!(slide.image_url, None);
        assert!(!slide.is_image_generating);
    }

    #[test]
    fn test_slide_serializes_camel_case() {
        let mut slide = Slide::new("s1", SlideLayout::Title, "Hello");
        slide.visual_description = "abstract shapes".to_string();

        let value = serde_json::to_value(&slide).unwrap();
        assert_eq!(value["layout"], "title");
        assert_eq!(value["visualDescription"], "abstract shapes");
        // Absent optionals stay off the wire.
        assert!(value.get("subtitle").is_none());
        assert!(value.get("imageUrl").is_none());
        assert!(value.get("isImageGenerating").is_none());
    }

    #[test]
    fn test_presentation_slide_lookup() {
        let mut presentation = Presentation::new("Quarterly Results");
        presentation.slides.push(Slide::new("a", SlideLayout::Title, "One"));
        presentation.slides.push(Slide::new("b", SlideLayout::BigNumber, "Two"));

        assert_eq!(presentation.slide("b").unwrap().title, "Two");
        assert!(presentation.slide("c").is_none());

        presentation.slide_mut("a").unwrap().title = "First".to_string();
        assert_eq!(presentation.slides[0].title, "First");
    }
}
