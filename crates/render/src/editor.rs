//! The interactive editing surface.
//!
//! Produces the editable slide canvas and the sidebar thumbnails. The
//! embedding shell wires the edit markers to input toggling and feeds
//! confirmed values back through the session's edit channel.

use crate::dom::Element;
use crate::surface::{slide_element, RenderMode};
use deck_core::Slide;

/// Build the editable visual tree for the current slide.
///
/// Editable regions carry `data-slide-id` and `data-edit-target`
/// markers; the shell toggles each between its display state and an
/// input, committing on blur or explicit completion.
pub fn render_slide(slide: &Slide) -> Element {
    slide_element(slide, RenderMode::Editable)
}

/// Convenience wrapper returning rendered HTML.
pub fn render_slide_html(slide: &Slide) -> String {
    render_slide(slide).to_html()
}

/// Build one sidebar thumbnail for the slide rail.
pub fn render_thumbnail(slide: &Slide, index: usize, active: bool) -> Element {
    Element::new("div")
        .class("thumbnail")
        .class_if(active, "thumbnail--active")
        .attr("data-slide-id", &slide.id)
        .attr("data-slide-index", index.to_string())
        .child(
            Element::new("span")
                .class("thumbnail__number")
                .text((index + 1).to_string()),
        )
        .child(Element::new("div").class("thumbnail__title").text(&slide.title))
        .child(
            Element::new("div")
                .class("thumbnail__layout")
                .text(slide.layout.tag()),
        )
}

/// Convenience wrapper returning rendered HTML.
pub fn render_thumbnail_html(slide: &Slide, index: usize, active: bool) -> String {
    render_thumbnail(slide, index, active).to_html()
}
