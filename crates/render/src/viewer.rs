//! The standalone viewer document.
//!
//! One self-contained HTML file embedding the presentation data
//! verbatim, every slide pre-rendered in static mode, and a minimal
//! navigation script. Distributable and viewable without the
//! generation pipeline; the only external fetches are referenced
//! images.

use crate::surface::{slide_element, RenderMode};
use askama::Template;
use deck_core::{Error, Presentation, Result};

#[derive(Template)]
#[template(path = "viewer.html")]
struct ViewerTemplate {
    topic: String,
    data_json: String,
    slides: Vec<String>,
    slide_count: usize,
}

/// Render a presentation into the standalone viewer document.
pub fn viewer_document(presentation: &Presentation) -> Result<String> {
    log::debug!(
        "Rendering standalone viewer for '{}' ({} slides)",
        presentation.topic,
        presentation.slide_count()
    );

    // `<` is escaped so the embedded JSON can never close its own
    // script island.
    let data_json = serde_json::to_string(presentation)?.replace('<', "\\u003c");

    let slides: Vec<String> = presentation
        .slides
        .iter()
        .map(|slide| slide_element(slide, RenderMode::Static).to_html())
        .collect();

    let template = ViewerTemplate {
        topic: if presentation.topic.is_empty() {
            "Presentation".to_string()
        } else {
            presentation.topic.clone()
        },
        data_json,
        slide_count: slides.len(),
        slides,
    };

    template
        .render()
        .map_err(|e| Error::TemplateError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{Slide, SlideLayout};

    fn quarterly_results() -> Presentation {
        let mut presentation = Presentation::new("Quarterly Results");
        let mut slide = Slide::new("s1", SlideLayout::BigNumber, "Growth");
        slide.points = vec!["42%".to_string()];
        slide.visual_description = "upward arrow chart".to_string();
        slide.speaker_notes = "lead with the number".to_string();
        presentation.slides.push(slide);
        presentation
    }

    #[test]
    fn test_viewer_embeds_data_and_rendered_slides() {
        let html = viewer_document(&quarterly_results()).unwrap();

        assert!(html.contains("<title>Quarterly Results</title>"));
        assert!(html.contains(r#"<script type="application/json" id="presentation-data">"#));
        // Embedded data is the presentation verbatim.
        assert!(html.contains(r#""topic":"Quarterly Results""#));
        // Pre-rendered static slide with the emphasized stat.
        assert!(html.contains("big-stat"));
        assert!(html.contains("42%"));
        assert!(html.contains("Growth"));
    }

    #[test]
    fn test_viewer_is_not_editable_and_hides_notes() {
        let html = viewer_document(&quarterly_results()).unwrap();
        assert!(!html.contains("data-edit-target"));
        // Notes live in the JSON island but never on the visible surface.
        assert!(!html.contains(r#"class="notes-hint""#));
    }

    #[test]
    fn test_viewer_escapes_script_closers_in_data() {
        let mut presentation = quarterly_results();
        presentation.slides[0].title = "</script><b>x".to_string();

        let html = viewer_document(&presentation).unwrap();
        assert!(html.contains("\\u003c/script>"));
    }

    #[test]
    fn test_viewer_shows_slide_count() {
        let html = viewer_document(&quarterly_results()).unwrap();
        assert!(html.contains("/ 1"));
    }
}
