//! Slide part construction: resolved layout regions re-expressed as
//! PresentationML text boxes, filled rectangles, and pictures.
//!
//! Geometry lives here and nowhere else; which regions exist for a
//! layout is decided by the shared resolver in `deck-core`.

use crate::parts::{
    solid_rect_shape, sp_tree_header, COLOR_ACCENT, COLOR_SURFACE, NS_A, NS_P, NS_R, SLIDE_CX,
    SLIDE_CY, XML_DECL,
};
use crate::xml::escape;
use deck_core::layout::{Arrangement, ListItem, Region, ResolvedSlide, TitleRole};
use std::fmt::Write as _;

const EMU_PER_INCH: f64 = 914_400.0;

const COLOR_BODY: &str = "FFFFFF";
const COLOR_SECONDARY: &str = "CCCCCC";
const COLOR_HINT: &str = "888888";
const COLOR_CALLOUT: &str = "EEEEEE";
const COLOR_PANEL_FILL: &str = "222222";
const COLOR_FRAME_FILL: &str = "333333";

fn emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}

/// Build the full `ppt/slides/slideN.xml` part for one resolved slide.
///
/// `image_rid` is the relationship id of the slide's embedded media
/// part, when one exists; image regions without it fall back to their
/// placeholder fill.
pub(crate) fn slide_part(resolved: &ResolvedSlide, image_rid: Option<&str>) -> String {
    let mut shapes = String::new();
    let mut next_id = 2u32;

    for region in &resolved.regions {
        append_region(&mut shapes, resolved.arrangement, region, &mut next_id, image_rid);
    }

    format!(
        "{XML_DECL}<p:sld xmlns:a=\"{NS_A}\" xmlns:r=\"{NS_R}\" xmlns:p=\"{NS_P}\">\
<p:cSld><p:spTree>{}{shapes}</p:spTree></p:cSld>\
<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>\
</p:sld>",
        sp_tree_header()
    )
}

fn append_region(
    xml: &mut String,
    arrangement: Arrangement,
    region: &Region,
    next_id: &mut u32,
    image_rid: Option<&str>,
) {
    match (arrangement, region) {
        // Notes are routed to the notes part, never the visible surface.
        (_, Region::NotesHint { .. }) => {}

        (Arrangement::CenteredStack, Region::Label { text }) => {
            push_text(xml, next_id, "Kicker", in_box(0.0, 1.7, 13.333, 0.5), text, &TextOpts {
                size: 1400,
                bold: true,
                color: COLOR_ACCENT,
                align: Some("ctr"),
            });
        }
        (Arrangement::CenteredStack, Region::Title { text, role }) => {
            let (rect, size) = match role {
                TitleRole::Caption => (in_box(0.5, 0.8, 12.333, 1.0), 3600),
                _ => (in_box(1.0, 2.4, 11.333, 1.6), 5400),
            };
            push_text(xml, next_id, "Title", rect, text, &TextOpts {
                size,
                bold: true,
                color: COLOR_ACCENT,
                align: Some("ctr"),
            });
        }
        (Arrangement::CenteredStack, Region::Subtitle { text }) => {
            if !text.is_empty() {
                push_text(xml, next_id, "Subtitle", in_box(1.5, 4.2, 10.333, 1.0), text, &TextOpts {
                    size: 2400,
                    bold: false,
                    color: COLOR_SECONDARY,
                    align: Some("ctr"),
                });
            }
        }
        (Arrangement::CenteredStack, Region::BigStat { text }) => {
            push_text(xml, next_id, "Stat", in_box(0.0, 2.3, 13.333, 2.0), text, &TextOpts {
                size: 12000,
                bold: true,
                color: COLOR_ACCENT,
                align: Some("ctr"),
            });
        }
        (Arrangement::CenteredStack, Region::Supporting { text }) => {
            if !text.is_empty() {
                push_text(xml, next_id, "Supporting", in_box(2.667, 5.0, 8.0, 1.2), text, &TextOpts {
                    size: 1800,
                    bold: false,
                    color: COLOR_SECONDARY,
                    align: Some("ctr"),
                });
            }
        }

        (Arrangement::TextWithSidecar, Region::Title { text, .. }) => {
            push_text(xml, next_id, "Title", in_box(0.5, 0.5, 12.333, 1.0), text, &TextOpts {
                size: 3600,
                bold: true,
                color: COLOR_ACCENT,
                align: None,
            });
        }
        (Arrangement::TextWithSidecar, Region::BulletList { items, .. }) => {
            push_bullets(xml, next_id, in_box(0.5, 1.8, 7.5, 5.0), items, 1800, COLOR_BODY, true);
        }
        (Arrangement::TextWithSidecar, Region::Image { url: _, caption, .. }) => {
            let frame = in_box(8.5, 1.8, 4.0, 4.0);
            match image_rid {
                Some(rid) => push_picture(xml, next_id, frame, rid),
                None => {
                    xml.push_str(&solid_rect_shape(
                        bump(next_id),
                        "Visual Frame",
                        frame.0,
                        frame.1,
                        frame.2,
                        frame.3,
                        COLOR_FRAME_FILL,
                        None,
                    ));
                    if let Some(caption) = caption {
                        if !caption.is_empty() {
                            push_text(
                                xml,
                                next_id,
                                "Visual Caption",
                                in_box(8.7, 2.0, 3.6, 3.6),
                                &format!("Visual: {caption}"),
                                &TextOpts {
                                    size: 1000,
                                    bold: false,
                                    color: COLOR_HINT,
                                    align: None,
                                },
                            );
                        }
                    }
                }
            }
        }

        (Arrangement::SplitHalves, Region::Title { text, .. }) => {
            push_text(xml, next_id, "Title", in_box(0.5, 0.5, 5.8, 1.2), text, &TextOpts {
                size: 3600,
                bold: true,
                color: COLOR_ACCENT,
                align: None,
            });
        }
        (Arrangement::SplitHalves, Region::BulletList { items, .. }) => {
            push_bullets(xml, next_id, in_box(0.5, 1.9, 5.8, 5.0), items, 1800, COLOR_BODY, true);
        }
        (Arrangement::SplitHalves, Region::Image { .. }) => {
            let half = in_box(6.667, 0.0, 6.667, 7.5);
            match image_rid {
                Some(rid) => push_picture(xml, next_id, half, rid),
                None => xml.push_str(&solid_rect_shape(
                    bump(next_id),
                    "Visual Half",
                    half.0,
                    half.1,
                    half.2,
                    half.3,
                    COLOR_PANEL_FILL,
                    None,
                )),
            }
        }

        (Arrangement::AccentPanel, Region::Label { text }) => {
            // The panel fill goes in before the first text so it sits
            // behind everything.
            xml.push_str(&solid_rect_shape(
                bump(next_id),
                "Accent Panel",
                0,
                0,
                SLIDE_CX,
                SLIDE_CY,
                COLOR_ACCENT,
                None,
            ));
            push_text(xml, next_id, "Kicker", in_box(0.8, 2.2, 8.0, 0.6), text, &TextOpts {
                size: 2000,
                bold: true,
                color: COLOR_SURFACE,
                align: None,
            });
        }
        (Arrangement::AccentPanel, Region::Title { text, .. }) => {
            push_text(xml, next_id, "Title", in_box(0.8, 2.9, 11.7, 1.8), text, &TextOpts {
                size: 6600,
                bold: true,
                color: COLOR_SURFACE,
                align: None,
            });
        }

        (Arrangement::FullBleed, Region::Image { .. }) => {
            match image_rid {
                Some(rid) => push_picture(xml, next_id, (0, 0, SLIDE_CX, SLIDE_CY), rid),
                None => xml.push_str(&solid_rect_shape(
                    bump(next_id),
                    "Backdrop",
                    0,
                    0,
                    SLIDE_CX,
                    SLIDE_CY,
                    COLOR_PANEL_FILL,
                    None,
                )),
            }
            // Dark scrim anchored to the text side.
            xml.push_str(&solid_rect_shape(
                bump(next_id),
                "Scrim",
                0,
                0,
                emu(8.0),
                SLIDE_CY,
                "000000",
                Some(70),
            ));
        }
        (Arrangement::FullBleed, Region::Label { text }) => {
            push_text(xml, next_id, "Kicker", in_box(0.5, 1.5, 6.0, 0.5), text, &TextOpts {
                size: 1400,
                bold: true,
                color: COLOR_ACCENT,
                align: None,
            });
        }
        (Arrangement::FullBleed, Region::Title { text, .. }) => {
            push_text(xml, next_id, "Title", in_box(0.5, 2.1, 6.6, 1.9), text, &TextOpts {
                size: 4800,
                bold: true,
                color: COLOR_ACCENT,
                align: None,
            });
        }
        (Arrangement::FullBleed, Region::BulletList { items, .. }) => {
            // Callout lines keep the cinematic look: no bullet glyphs.
            push_bullets(xml, next_id, in_box(0.5, 4.2, 6.6, 2.6), items, 2400, COLOR_CALLOUT, false);
        }

        (_, Region::FallbackNotice { layout_tag, title }) => {
            push_text(
                xml,
                next_id,
                "Fallback Tag",
                in_box(0.5, 3.0, 12.333, 0.5),
                &format!("Unrecognized layout: {layout_tag}"),
                &TextOpts {
                    size: 1200,
                    bold: false,
                    color: COLOR_HINT,
                    align: Some("ctr"),
                },
            );
            push_text(xml, next_id, "Title", in_box(0.5, 3.6, 12.333, 1.2), title, &TextOpts {
                size: 3600,
                bold: true,
                color: COLOR_ACCENT,
                align: Some("ctr"),
            });
        }

        // Region kinds a layout never produces for this arrangement.
        _ => {
            log::warn!("Skipping region with no shape mapping: {region:?}");
        }
    }
}

type EmuBox = (i64, i64, i64, i64);

fn in_box(x: f64, y: f64, w: f64, h: f64) -> EmuBox {
    (emu(x), emu(y), emu(w), emu(h))
}

fn bump(next_id: &mut u32) -> u32 {
    let id = *next_id;
    *next_id += 1;
    id
}

struct TextOpts {
    /// Font size in hundredths of a point.
    size: u32,
    bold: bool,
    color: &'static str,
    align: Option<&'static str>,
}

fn push_text(
    xml: &mut String,
    next_id: &mut u32,
    name: &str,
    rect: EmuBox,
    text: &str,
    opts: &TextOpts,
) {
    let paragraphs: Vec<(&str, bool)> = if text.is_empty() {
        vec![("", false)]
    } else {
        text.lines().map(|line| (line, false)).collect()
    };
    push_text_body(xml, next_id, name, rect, &paragraphs, opts);
}

fn push_bullets(
    xml: &mut String,
    next_id: &mut u32,
    rect: EmuBox,
    items: &[ListItem],
    size: u32,
    color: &'static str,
    bullet: bool,
) {
    if items.is_empty() {
        return;
    }
    let paragraphs: Vec<(&str, bool)> = items
        .iter()
        .map(|item| (item.text.as_str(), bullet))
        .collect();
    push_text_body(xml, next_id, "Points", rect, &paragraphs, &TextOpts {
        size,
        bold: false,
        color,
        align: None,
    });
}

fn push_text_body(
    xml: &mut String,
    next_id: &mut u32,
    name: &str,
    (x, y, cx, cy): EmuBox,
    paragraphs: &[(&str, bool)],
    opts: &TextOpts,
) {
    let id = bump(next_id);
    let _ = write!(
        xml,
        "<p:sp>\
<p:nvSpPr><p:cNvPr id=\"{id}\" name=\"{}\"/><p:cNvSpPr txBox=\"1\"/><p:nvPr/></p:nvSpPr>\
<p:spPr>\
<a:xfrm><a:off x=\"{x}\" y=\"{y}\"/><a:ext cx=\"{cx}\" cy=\"{cy}\"/></a:xfrm>\
<a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom>\
<a:noFill/>\
</p:spPr>\
<p:txBody><a:bodyPr wrap=\"square\"><a:normAutofit/></a:bodyPr><a:lstStyle/>",
        escape(name)
    );

    for (text, bullet) in paragraphs {
        let ppr = match (opts.align, *bullet) {
            (Some(align), true) => format!("<a:pPr algn=\"{align}\"><a:buChar char=\"\u{2022}\"/></a:pPr>"),
            (Some(align), false) => format!("<a:pPr algn=\"{align}\"><a:buNone/></a:pPr>"),
            (None, true) => "<a:pPr><a:buChar char=\"\u{2022}\"/></a:pPr>".to_string(),
            (None, false) => "<a:pPr><a:buNone/></a:pPr>".to_string(),
        };
        let bold = if opts.bold { " b=\"1\"" } else { "" };
        let _ = write!(
            xml,
            "<a:p>{ppr}<a:r><a:rPr lang=\"en-US\" sz=\"{}\"{bold}><a:solidFill><a:srgbClr val=\"{}\"/></a:solidFill></a:rPr><a:t>{}</a:t></a:r></a:p>",
            opts.size,
            opts.color,
            escape(text)
        );
    }

    xml.push_str("</p:txBody></p:sp>");
}

fn push_picture(xml: &mut String, next_id: &mut u32, (x, y, cx, cy): EmuBox, rid: &str) {
    let id = bump(next_id);
    let _ = write!(
        xml,
        "<p:pic>\
<p:nvPicPr><p:cNvPr id=\"{id}\" name=\"Picture {id}\"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr>\
<p:blipFill><a:blip r:embed=\"{rid}\"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>\
<p:spPr>\
<a:xfrm><a:off x=\"{x}\" y=\"{y}\"/><a:ext cx=\"{cx}\" cy=\"{cy}\"/></a:xfrm>\
<a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom>\
</p:spPr>\
</p:pic>"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{resolve, Slide, SlideLayout};

    #[test]
    fn test_big_number_slide_has_caption_and_stat() {
        let mut slide = Slide::new("s1", SlideLayout::BigNumber, "Growth");
        slide.points = vec!["42%".to_string()];
        slide.visual_description = "upward arrow chart".to_string();

        let xml = slide_part(&resolve(&slide), None);
        assert!(xml.contains("<a:t>Growth</a:t>"));
        assert!(xml.contains("<a:t>42%</a:t>"));
        assert!(xml.contains("sz=\"12000\""));
    }

    #[test]
    fn test_speaker_notes_never_reach_the_visible_surface() {
        let mut slide = Slide::new("s1", SlideLayout::Title, "Cover");
        slide.speaker_notes = "do not show this".to_string();

        let xml = slide_part(&resolve(&slide), None);
        assert!(!xml.contains("do not show this"));
    }

    #[test]
    fn test_missing_image_renders_placeholder_rect() {
        let mut slide = Slide::new("s1", SlideLayout::BulletPoints, "List");
        slide.points = vec!["a".to_string()];
        slide.visual_description = "a chart".to_string();

        let xml = slide_part(&resolve(&slide), None);
        assert!(!xml.contains("<p:pic>"));
        assert!(xml.contains(COLOR_FRAME_FILL));
        assert!(xml.contains("<a:t>Visual: a chart</a:t>"));
    }

    #[test]
    fn test_embedded_image_renders_picture() {
        let mut slide = Slide::new("s1", SlideLayout::VisualFocus, "Hero");
        slide.image_url = Some("data:image/png;base64,AAAA".to_string());

        let xml = slide_part(&resolve(&slide), Some("rId3"));
        assert!(xml.contains("<p:pic>"));
        assert!(xml.contains("r:embed=\"rId3\""));
        // Scrim still overlays the picture.
        assert!(xml.contains("<a:alpha val=\"70000\"/>"));
    }

    #[test]
    fn test_section_header_panel() {
        let slide = Slide::new("s1", SlideLayout::SectionHeader, "Part Two");
        let xml = slide_part(&resolve(&slide), None);

        assert!(xml.contains("<a:t>Section</a:t>"));
        assert!(xml.contains("<a:t>Part Two</a:t>"));
        assert!(xml.contains(COLOR_ACCENT));
    }

    #[test]
    fn test_unknown_layout_emits_fallback_text() {
        let slide = Slide::new("s1", SlideLayout::Unknown("mosaic".to_string()), "Still here");
        let xml = slide_part(&resolve(&slide), None);

        assert!(xml.contains("<a:t>Unrecognized layout: mosaic</a:t>"));
        assert!(xml.contains("<a:t>Still here</a:t>"));
    }

    #[test]
    fn test_callout_points_have_no_bullet_glyph() {
        let mut slide = Slide::new("s1", SlideLayout::VisualFocus, "Hero");
        slide.points = vec!["calm line".to_string()];

        let xml = slide_part(&resolve(&slide), None);
        let callout_at = xml.find("calm line").unwrap();
        let run = &xml[..callout_at];
        // The paragraph introducing the callout carries buNone.
        assert!(run.rfind("<a:buNone/>").unwrap() > run.rfind("<a:buChar").unwrap_or(0));
    }

    #[test]
    fn test_shape_ids_are_unique() {
        let mut slide = Slide::new("s1", SlideLayout::BulletPoints, "List");
        slide.points = vec!["a".to_string(), "b".to_string()];
        slide.visual_description = "viz".to_string();

        let xml = slide_part(&resolve(&slide), None);
        let mut ids: Vec<&str> = Vec::new();
        for chunk in xml.split("<p:cNvPr id=\"").skip(1) {
            ids.push(chunk.split('"').next().unwrap());
        }
        let unique: std::collections::HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }
}
