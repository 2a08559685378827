//! The shared DOM builder over resolved regions.
//!
//! Both render surfaces feed from here: the editor requests
//! [`RenderMode::Editable`] (regions carry edit markers and empty
//! slots show a placeholder), the standalone viewer requests
//! [`RenderMode::Static`] (plain content, notes hint omitted).

use crate::dom::Element;
use deck_core::layout::{
    resolve, Arrangement, ImageTreatment, ListItem, ListStyle, Region, TitleRole,
};
use deck_core::{EditTarget, Slide};

/// Which surface the slide element is being built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Interactive editor: edit markers, placeholders, notes hint.
    Editable,
    /// Standalone viewer: content only.
    Static,
}

/// Placeholder shown in an empty editable slot.
const EMPTY_PLACEHOLDER: &str = "Click to edit";

/// Build the visual tree for one slide.
pub fn slide_element(slide: &Slide, mode: RenderMode) -> Element {
    let resolved = resolve(slide);

    let mut root = Element::new("div")
        .class("slide")
        .class(arrangement_class(resolved.arrangement))
        .attr("data-slide-id", &resolved.slide_id)
        .attr("data-layout", slide.layout.tag());

    for region in &resolved.regions {
        if let Some(element) = region_element(region, &resolved.slide_id, mode) {
            root = root.child(element);
        }
    }

    root
}

fn arrangement_class(arrangement: Arrangement) -> &'static str {
    match arrangement {
        Arrangement::CenteredStack => "slide--centered",
        Arrangement::TextWithSidecar => "slide--sidecar",
        Arrangement::SplitHalves => "slide--split",
        Arrangement::AccentPanel => "slide--accent",
        Arrangement::FullBleed => "slide--fullbleed",
        Arrangement::Fallback => "slide--fallback",
    }
}

fn region_element(region: &Region, slide_id: &str, mode: RenderMode) -> Option<Element> {
    let element = match region {
        Region::Label { text } => Element::new("span").class("kicker").text(*text),

        Region::Title { text, role } => editable_text(
            Element::new("h1").class("title").class(title_class(*role)),
            text,
            slide_id,
            region.edit_target(),
            mode,
        ),

        Region::Subtitle { text } => editable_text(
            Element::new("p").class("subtitle"),
            text,
            slide_id,
            region.edit_target(),
            mode,
        ),

        Region::BulletList { style, items } => bullet_list(*style, items, slide_id, mode),

        Region::BigStat { text } => editable_text(
            Element::new("div").class("big-stat"),
            text,
            slide_id,
            region.edit_target(),
            mode,
        ),

        Region::Supporting { text } => editable_text(
            Element::new("p").class("supporting"),
            text,
            slide_id,
            region.edit_target(),
            mode,
        ),

        Region::Image {
            treatment,
            url,
            caption,
            generating,
        } => image_figure(*treatment, url.as_deref(), caption.as_deref(), *generating),

        Region::NotesHint { text } => {
            // Presenter-only; the static surface never shows it.
            if mode == RenderMode::Static {
                return None;
            }
            let notes = Element::new("div")
                .class("notes-hint")
                .child(Element::new("span").class("notes-hint__label").text("Notes:"));
            editable_text(notes, text, slide_id, region.edit_target(), mode)
        }

        Region::FallbackNotice { layout_tag, title } => Element::new("div")
            .class("fallback-notice")
            .child(
                Element::new("span")
                    .class("fallback-notice__tag")
                    .text(format!("Unrecognized layout: {layout_tag}")),
            )
            .child(Element::new("h1").class("title").text(title)),
    };

    Some(element)
}

fn title_class(role: TitleRole) -> &'static str {
    match role {
        TitleRole::Hero => "title--hero",
        TitleRole::Headline => "title--headline",
        TitleRole::Caption => "title--caption",
        TitleRole::Section => "title--section",
    }
}

fn bullet_list(style: ListStyle, items: &[ListItem], slide_id: &str, mode: RenderMode) -> Element {
    let (list_class, item_class) = match style {
        ListStyle::Arrow => ("points--arrow", "point--arrow"),
        ListStyle::Plain => ("points--plain", "point--plain"),
        ListStyle::Callout => ("points--callout", "point--callout"),
    };

    let mut list = Element::new("ul").class("points").class(list_class);
    for item in items {
        let mut li = Element::new("li").class("point").class(item_class);
        if style == ListStyle::Arrow {
            li = li.child(Element::new("span").class("point__glyph").text("\u{27a4}"));
        }
        let body = editable_text(
            Element::new("span").class("point__text"),
            &item.text,
            slide_id,
            Some(EditTarget::Point(item.index)),
            mode,
        );
        list = list.child(li.child(body));
    }
    list
}

fn image_figure(
    treatment: ImageTreatment,
    url: Option<&str>,
    caption: Option<&str>,
    generating: bool,
) -> Element {
    let treatment_class = match treatment {
        ImageTreatment::Framed => "visual--framed",
        ImageTreatment::FadeToText => "visual--fade",
        ImageTreatment::Background => "visual--background",
    };

    let mut figure = Element::new("figure")
        .class("visual")
        .class(treatment_class)
        .class_if(generating, "visual--generating");

    figure = match url {
        Some(url) if !url.is_empty() => figure.child(
            Element::new("img")
                .class("visual__img")
                .attr("src", url)
                .attr("alt", caption.unwrap_or("")),
        ),
        // The designated placeholder fill, never a broken reference.
        _ => figure.child(Element::new("div").class("visual__placeholder")),
    };

    if let Some(caption) = caption {
        figure = figure.child(
            Element::new("figcaption")
                .class("visual__caption")
                .text(caption),
        );
    }

    figure
}

/// Attach text content to an element, with edit markers and an empty
/// placeholder in editable mode.
fn editable_text(
    element: Element,
    text: &str,
    slide_id: &str,
    target: Option<EditTarget>,
    mode: RenderMode,
) -> Element {
    match (mode, target) {
        (RenderMode::Editable, Some(target)) => {
            let element = element
                .class("editable")
                .attr("data-slide-id", slide_id)
                .attr("data-edit-target", target.to_string());
            if text.is_empty() {
                element.child(Element::new("span").class("placeholder").text(EMPTY_PLACEHOLDER))
            } else {
                element.text(text)
            }
        }
        _ => element.text(text),
    }
}
