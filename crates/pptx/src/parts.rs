//! Builders for the fixed OOXML package parts: content types,
//! relationships, the presentation part, master, layout, themes, and
//! notes parts.
//!
//! Output strings are fully deterministic; nothing here reads the
//! clock or any ambient state.

use crate::xml::escape;
use std::collections::BTreeSet;
use std::fmt::Write as _;

pub(crate) const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";

pub(crate) const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub(crate) const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
pub(crate) const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PKG_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Slide canvas: 13.333 x 7.5 inches (16:9) in EMUs.
pub(crate) const SLIDE_CX: i64 = 12_192_000;
pub(crate) const SLIDE_CY: i64 = 6_858_000;

/// Deck background and accent colors, matching the render surfaces.
pub(crate) const COLOR_SURFACE: &str = "1A1A1A";
pub(crate) const COLOR_ACCENT: &str = "FFD700";

/// `[Content_Types].xml` covering every part the encoder emits.
pub(crate) fn content_types(slide_count: usize, media_extensions: &BTreeSet<&'static str>) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(
        "<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">",
    );
    xml.push_str(
        "<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>",
    );
    xml.push_str("<Default Extension=\"xml\" ContentType=\"application/xml\"/>");
    for extension in media_extensions {
        let content_type = match *extension {
            "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            _ => "image/png",
        };
        let _ = write!(
            xml,
            "<Default Extension=\"{extension}\" ContentType=\"{content_type}\"/>"
        );
    }
    xml.push_str("<Override PartName=\"/ppt/presentation.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml\"/>");
    xml.push_str("<Override PartName=\"/ppt/slideMasters/slideMaster1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml\"/>");
    xml.push_str("<Override PartName=\"/ppt/slideLayouts/slideLayout1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml\"/>");
    xml.push_str("<Override PartName=\"/ppt/notesMasters/notesMaster1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.notesMaster+xml\"/>");
    xml.push_str("<Override PartName=\"/ppt/theme/theme1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.theme+xml\"/>");
    xml.push_str("<Override PartName=\"/ppt/theme/theme2.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.theme+xml\"/>");
    for n in 1..=slide_count {
        let _ = write!(
            xml,
            "<Override PartName=\"/ppt/slides/slide{n}.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slide+xml\"/>"
        );
        let _ = write!(
            xml,
            "<Override PartName=\"/ppt/notesSlides/notesSlide{n}.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.notesSlide+xml\"/>"
        );
    }
    xml.push_str("</Types>");
    xml
}

/// Package-level `_rels/.rels`.
pub(crate) fn root_rels() -> String {
    format!(
        "{XML_DECL}<Relationships xmlns=\"{NS_PKG_REL}\"><Relationship Id=\"rId1\" Type=\"{REL_BASE}/officeDocument\" Target=\"ppt/presentation.xml\"/></Relationships>"
    )
}

/// `ppt/presentation.xml`: master, notes master, and the slide list in
/// array order.
pub(crate) fn presentation(slide_count: usize) -> String {
    let mut xml = format!(
        "{XML_DECL}<p:presentation xmlns:a=\"{NS_A}\" xmlns:r=\"{NS_R}\" xmlns:p=\"{NS_P}\">"
    );
    xml.push_str(
        "<p:sldMasterIdLst><p:sldMasterId id=\"2147483648\" r:id=\"rId1\"/></p:sldMasterIdLst>",
    );
    xml.push_str("<p:notesMasterIdLst><p:notesMasterId r:id=\"rId2\"/></p:notesMasterIdLst>");
    xml.push_str("<p:sldIdLst>");
    for n in 1..=slide_count {
        let _ = write!(
            xml,
            "<p:sldId id=\"{}\" r:id=\"rId{}\"/>",
            255 + n,
            n + 2
        );
    }
    xml.push_str("</p:sldIdLst>");
    let _ = write!(xml, "<p:sldSz cx=\"{SLIDE_CX}\" cy=\"{SLIDE_CY}\"/>");
    xml.push_str("<p:notesSz cx=\"6858000\" cy=\"9144000\"/>");
    xml.push_str("</p:presentation>");
    xml
}

/// `ppt/_rels/presentation.xml.rels`.
pub(crate) fn presentation_rels(slide_count: usize) -> String {
    let mut xml = format!("{XML_DECL}<Relationships xmlns=\"{NS_PKG_REL}\">");
    let _ = write!(
        xml,
        "<Relationship Id=\"rId1\" Type=\"{REL_BASE}/slideMaster\" Target=\"slideMasters/slideMaster1.xml\"/>"
    );
    let _ = write!(
        xml,
        "<Relationship Id=\"rId2\" Type=\"{REL_BASE}/notesMaster\" Target=\"notesMasters/notesMaster1.xml\"/>"
    );
    for n in 1..=slide_count {
        let _ = write!(
            xml,
            "<Relationship Id=\"rId{}\" Type=\"{REL_BASE}/slide\" Target=\"slides/slide{n}.xml\"/>",
            n + 2
        );
    }
    xml.push_str("</Relationships>");
    xml
}

/// `ppt/slideMasters/slideMaster1.xml`: dark background plus the two
/// fixed accent strips every slide inherits.
pub(crate) fn slide_master() -> String {
    let strip_right = solid_rect_shape(
        2,
        "Accent Edge",
        SLIDE_CX - SLIDE_CX * 3 / 100,
        0,
        SLIDE_CX * 3 / 100,
        SLIDE_CY,
        COLOR_ACCENT,
        None,
    );
    let strip_top = solid_rect_shape(3, "Accent Top", 0, 0, SLIDE_CX, 137_160, COLOR_ACCENT, None);

    format!(
        "{XML_DECL}<p:sldMaster xmlns:a=\"{NS_A}\" xmlns:r=\"{NS_R}\" xmlns:p=\"{NS_P}\">\
<p:cSld>\
<p:bg><p:bgPr><a:solidFill><a:srgbClr val=\"{COLOR_SURFACE}\"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>\
<p:spTree>{}{strip_right}{strip_top}</p:spTree>\
</p:cSld>\
<p:clrMap bg1=\"dk1\" tx1=\"lt1\" bg2=\"dk2\" tx2=\"lt2\" accent1=\"accent1\" accent2=\"accent2\" accent3=\"accent3\" accent4=\"accent4\" accent5=\"accent5\" accent6=\"accent6\" hlink=\"hlink\" folHlink=\"folHlink\"/>\
<p:sldLayoutIdLst><p:sldLayoutId id=\"2147483649\" r:id=\"rId1\"/></p:sldLayoutIdLst>\
</p:sldMaster>",
        sp_tree_header()
    )
}

pub(crate) fn slide_master_rels() -> String {
    format!(
        "{XML_DECL}<Relationships xmlns=\"{NS_PKG_REL}\">\
<Relationship Id=\"rId1\" Type=\"{REL_BASE}/slideLayout\" Target=\"../slideLayouts/slideLayout1.xml\"/>\
<Relationship Id=\"rId2\" Type=\"{REL_BASE}/theme\" Target=\"../theme/theme1.xml\"/>\
</Relationships>"
    )
}

/// `ppt/slideLayouts/slideLayout1.xml`: a blank layout; every slide
/// places its own shapes.
pub(crate) fn slide_layout() -> String {
    format!(
        "{XML_DECL}<p:sldLayout xmlns:a=\"{NS_A}\" xmlns:r=\"{NS_R}\" xmlns:p=\"{NS_P}\" type=\"blank\" preserve=\"1\">\
<p:cSld name=\"Blank\"><p:spTree>{}</p:spTree></p:cSld>\
<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>\
</p:sldLayout>",
        sp_tree_header()
    )
}

pub(crate) fn slide_layout_rels() -> String {
    format!(
        "{XML_DECL}<Relationships xmlns=\"{NS_PKG_REL}\">\
<Relationship Id=\"rId1\" Type=\"{REL_BASE}/slideMaster\" Target=\"../slideMasters/slideMaster1.xml\"/>\
</Relationships>"
    )
}

/// `ppt/notesMasters/notesMaster1.xml`.
pub(crate) fn notes_master() -> String {
    format!(
        "{XML_DECL}<p:notesMaster xmlns:a=\"{NS_A}\" xmlns:r=\"{NS_R}\" xmlns:p=\"{NS_P}\">\
<p:cSld><p:spTree>{}</p:spTree></p:cSld>\
<p:clrMap bg1=\"lt1\" tx1=\"dk1\" bg2=\"lt2\" tx2=\"dk2\" accent1=\"accent1\" accent2=\"accent2\" accent3=\"accent3\" accent4=\"accent4\" accent5=\"accent5\" accent6=\"accent6\" hlink=\"hlink\" folHlink=\"folHlink\"/>\
</p:notesMaster>",
        sp_tree_header()
    )
}

pub(crate) fn notes_master_rels() -> String {
    format!(
        "{XML_DECL}<Relationships xmlns=\"{NS_PKG_REL}\">\
<Relationship Id=\"rId1\" Type=\"{REL_BASE}/theme\" Target=\"../theme/theme2.xml\"/>\
</Relationships>"
    )
}

/// `ppt/slides/_rels/slideN.xml.rels`: layout, notes page, and the
/// optional embedded image.
pub(crate) fn slide_rels(slide_number: usize, media_file: Option<&str>) -> String {
    let mut xml = format!("{XML_DECL}<Relationships xmlns=\"{NS_PKG_REL}\">");
    let _ = write!(
        xml,
        "<Relationship Id=\"rId1\" Type=\"{REL_BASE}/slideLayout\" Target=\"../slideLayouts/slideLayout1.xml\"/>"
    );
    let _ = write!(
        xml,
        "<Relationship Id=\"rId2\" Type=\"{REL_BASE}/notesSlide\" Target=\"../notesSlides/notesSlide{slide_number}.xml\"/>"
    );
    if let Some(file) = media_file {
        let _ = write!(
            xml,
            "<Relationship Id=\"rId3\" Type=\"{REL_BASE}/image\" Target=\"../media/{file}\"/>"
        );
    }
    xml.push_str("</Relationships>");
    xml
}

/// `ppt/notesSlides/notesSlideN.xml`: speaker notes attached to the
/// page's notes channel, never to the visible surface.
pub(crate) fn notes_slide(notes: &str) -> String {
    let body = if notes.is_empty() {
        String::new()
    } else {
        notes
            .lines()
            .map(|line| format!("<a:p><a:r><a:rPr lang=\"en-US\"/><a:t>{}</a:t></a:r></a:p>", escape(line)))
            .collect()
    };
    let paragraphs = if body.is_empty() {
        "<a:p><a:endParaRPr lang=\"en-US\"/></a:p>".to_string()
    } else {
        body
    };

    format!(
        "{XML_DECL}<p:notes xmlns:a=\"{NS_A}\" xmlns:r=\"{NS_R}\" xmlns:p=\"{NS_P}\">\
<p:cSld><p:spTree>{}\
<p:sp>\
<p:nvSpPr><p:cNvPr id=\"2\" name=\"Notes\"/><p:cNvSpPr txBox=\"1\"/><p:nvPr/></p:nvSpPr>\
<p:spPr><a:xfrm><a:off x=\"685800\" y=\"4572000\"/><a:ext cx=\"5486400\" cy=\"3657600\"/></a:xfrm><a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></p:spPr>\
<p:txBody><a:bodyPr/><a:lstStyle/>{paragraphs}</p:txBody>\
</p:sp>\
</p:spTree></p:cSld>\
<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>\
</p:notes>",
        sp_tree_header()
    )
}

pub(crate) fn notes_slide_rels(slide_number: usize) -> String {
    format!(
        "{XML_DECL}<Relationships xmlns=\"{NS_PKG_REL}\">\
<Relationship Id=\"rId1\" Type=\"{REL_BASE}/notesMaster\" Target=\"../notesMasters/notesMaster1.xml\"/>\
<Relationship Id=\"rId2\" Type=\"{REL_BASE}/slide\" Target=\"../slides/slide{slide_number}.xml\"/>\
</Relationships>"
    )
}

/// A minimal but complete DrawingML theme.
pub(crate) fn theme(name: &str) -> String {
    format!(
        "{XML_DECL}<a:theme xmlns:a=\"{NS_A}\" name=\"{name}\">\
<a:themeElements>\
<a:clrScheme name=\"{name}\">\
<a:dk1><a:srgbClr val=\"0F0F0F\"/></a:dk1>\
<a:lt1><a:srgbClr val=\"FFFFFF\"/></a:lt1>\
<a:dk2><a:srgbClr val=\"{COLOR_SURFACE}\"/></a:dk2>\
<a:lt2><a:srgbClr val=\"EEEEEE\"/></a:lt2>\
<a:accent1><a:srgbClr val=\"{COLOR_ACCENT}\"/></a:accent1>\
<a:accent2><a:srgbClr val=\"FFE135\"/></a:accent2>\
<a:accent3><a:srgbClr val=\"E6C200\"/></a:accent3>\
<a:accent4><a:srgbClr val=\"2A2A2A\"/></a:accent4>\
<a:accent5><a:srgbClr val=\"9CA3AF\"/></a:accent5>\
<a:accent6><a:srgbClr val=\"333333\"/></a:accent6>\
<a:hlink><a:srgbClr val=\"{COLOR_ACCENT}\"/></a:hlink>\
<a:folHlink><a:srgbClr val=\"E6C200\"/></a:folHlink>\
</a:clrScheme>\
<a:fontScheme name=\"{name}\">\
<a:majorFont><a:latin typeface=\"Arial\"/><a:ea typeface=\"\"/><a:cs typeface=\"\"/></a:majorFont>\
<a:minorFont><a:latin typeface=\"Arial\"/><a:ea typeface=\"\"/><a:cs typeface=\"\"/></a:minorFont>\
</a:fontScheme>\
<a:fmtScheme name=\"{name}\">\
<a:fillStyleLst>\
<a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>\
<a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>\
<a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>\
</a:fillStyleLst>\
<a:lnStyleLst>\
<a:ln w=\"9525\"><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill></a:ln>\
<a:ln w=\"19050\"><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill></a:ln>\
<a:ln w=\"28575\"><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill></a:ln>\
</a:lnStyleLst>\
<a:effectStyleLst>\
<a:effectStyle><a:effectLst/></a:effectStyle>\
<a:effectStyle><a:effectLst/></a:effectStyle>\
<a:effectStyle><a:effectLst/></a:effectStyle>\
</a:effectStyleLst>\
<a:bgFillStyleLst>\
<a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>\
<a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>\
<a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>\
</a:bgFillStyleLst>\
</a:fmtScheme>\
</a:themeElements>\
</a:theme>"
    )
}

/// The fixed non-visual group header every `spTree` starts with.
pub(crate) fn sp_tree_header() -> &'static str {
    "<p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>\
<p:grpSpPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"0\" cy=\"0\"/><a:chOff x=\"0\" y=\"0\"/><a:chExt cx=\"0\" cy=\"0\"/></a:xfrm></p:grpSpPr>"
}

/// A solid-filled borderless rectangle shape.
pub(crate) fn solid_rect_shape(
    id: u32,
    name: &str,
    x: i64,
    y: i64,
    cx: i64,
    cy: i64,
    color: &str,
    alpha_pct: Option<u32>,
) -> String {
    let fill = match alpha_pct {
        Some(alpha) => format!(
            "<a:srgbClr val=\"{color}\"><a:alpha val=\"{}\"/></a:srgbClr>",
            alpha * 1000
        ),
        None => format!("<a:srgbClr val=\"{color}\"/>"),
    };
    format!(
        "<p:sp>\
<p:nvSpPr><p:cNvPr id=\"{id}\" name=\"{}\"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr>\
<p:spPr>\
<a:xfrm><a:off x=\"{x}\" y=\"{y}\"/><a:ext cx=\"{cx}\" cy=\"{cy}\"/></a:xfrm>\
<a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom>\
<a:solidFill>{fill}</a:solidFill>\
<a:ln><a:noFill/></a:ln>\
</p:spPr>\
<p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:endParaRPr lang=\"en-US\"/></a:p></p:txBody>\
</p:sp>",
        escape(name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_types_lists_every_slide() {
        let xml = content_types(2, &BTreeSet::new());
        assert!(xml.contains("/ppt/slides/slide1.xml"));
        assert!(xml.contains("/ppt/slides/slide2.xml"));
        assert!(xml.contains("/ppt/notesSlides/notesSlide2.xml"));
        assert!(!xml.contains("slide3.xml"));
    }

    #[test]
    fn test_content_types_declares_media_defaults() {
        let mut extensions = BTreeSet::new();
        extensions.insert("png");
        extensions.insert("jpeg");
        let xml = content_types(1, &extensions);
        assert!(xml.contains("Extension=\"png\" ContentType=\"image/png\""));
        assert!(xml.contains("Extension=\"jpeg\" ContentType=\"image/jpeg\""));
    }

    #[test]
    fn test_presentation_slide_ids_follow_array_order() {
        let xml = presentation(3);
        assert!(xml.contains("<p:sldId id=\"256\" r:id=\"rId3\"/>"));
        assert!(xml.contains("<p:sldId id=\"257\" r:id=\"rId4\"/>"));
        assert!(xml.contains("<p:sldId id=\"258\" r:id=\"rId5\"/>"));

        let rels = presentation_rels(3);
        assert!(rels.contains("Id=\"rId5\" Type"));
        assert!(rels.contains("Target=\"slides/slide3.xml\""));
    }

    #[test]
    fn test_slide_rels_with_and_without_media() {
        let with = slide_rels(2, Some("image2.png"));
        assert!(with.contains("notesSlide2.xml"));
        assert!(with.contains("../media/image2.png"));

        let without = slide_rels(1, None);
        assert!(!without.contains("media"));
    }

    #[test]
    fn test_notes_slide_escapes_text() {
        let xml = notes_slide("Mention <42%> & pause");
        assert!(xml.contains("Mention &lt;42%&gt; &amp; pause"));
    }

    #[test]
    fn test_notes_slide_empty_notes_still_valid() {
        let xml = notes_slide("");
        assert!(xml.contains("<a:endParaRPr"));
    }

    #[test]
    fn test_alpha_rect() {
        let xml = solid_rect_shape(4, "Overlay", 0, 0, 100, 100, "000000", Some(70));
        assert!(xml.contains("<a:alpha val=\"70000\"/>"));
    }
}
