//! Text drain for existing PPTX decks.
//!
//! Walks `ppt/_rels/presentation.xml.rels` for the slide order, then
//! pulls shape text out of each slide part in reading order
//! (top-to-bottom, left-to-right). Only text survives; geometry and
//! styling are discarded.

use deck_core::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// Extract all slide text from a PPTX archive, one paragraph per line,
/// slides separated by blank lines.
pub fn extract_deck_text<R: Read + Seek>(reader: R) -> Result<String> {
    let mut archive = ZipArchive::new(reader)
        .map_err(|e| Error::ZipError(format!("Failed to open deck archive: {e}")))?;

    let slide_paths = slide_order(&mut archive)?;
    let mut blocks: Vec<String> = Vec::new();

    for path in &slide_paths {
        let xml = read_archive_file(&mut archive, path)?;
        let block = slide_text(&xml);
        if !block.is_empty() {
            blocks.push(block);
        }
    }

    Ok(blocks.join("\n\n"))
}

/// The ordered list of slide part paths from the presentation
/// relationships.
fn slide_order<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
    let rels = read_archive_file(archive, "ppt/_rels/presentation.xml.rels")?;
    let mut slides: Vec<(String, Option<usize>)> = Vec::new();

    let mut reader = Reader::from_str(&rels);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.name().as_ref() == b"Relationship" =>
            {
                let mut rel_type = String::new();
                let mut target = String::new();

                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Type" => rel_type = String::from_utf8_lossy(&attr.value).to_string(),
                        b"Target" => target = String::from_utf8_lossy(&attr.value).to_string(),
                        _ => {}
                    }
                }

                if rel_type.ends_with("/slide") {
                    let order = slide_number(&target);
                    let full_path = if let Some(stripped) = target.strip_prefix('/') {
                        stripped.to_string()
                    } else {
                        format!("ppt/{target}")
                    };
                    slides.push((full_path, order));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing deck relationships: {e}"
                )));
            }
            _ => {}
        }
    }

    slides.sort_by(|a, b| match (a.1, b.1) {
        (Some(na), Some(nb)) => na.cmp(&nb),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.0.cmp(&b.0),
    });

    Ok(slides.into_iter().map(|(path, _)| path).collect())
}

/// Text of one slide part: shapes sorted by position, one paragraph
/// per line.
fn slide_text(xml: &str) -> String {
    let mut shapes: Vec<Shape> = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut current: Option<Shape> = None;
    let mut in_text_body = false;
    let mut in_run_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" => current = Some(Shape::default()),
                b"off" => read_offset(e, &mut current),
                b"txBody" => in_text_body = true,
                b"p" if in_text_body => {
                    if let Some(shape) = current.as_mut() {
                        if !shape.text.is_empty() {
                            shape.text.push('\n');
                        }
                    }
                }
                b"t" if in_text_body => in_run_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => {
                if local_name(e.name().as_ref()) == b"off" {
                    read_offset(e, &mut current);
                }
            }
            Ok(Event::Text(ref e)) => {
                if in_run_text {
                    if let Some(shape) = current.as_mut() {
                        shape.text.push_str(&e.unescape().unwrap_or_default());
                    }
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" => {
                    if let Some(shape) = current.take() {
                        if !shape.text.trim().is_empty() {
                            shapes.push(shape);
                        }
                    }
                    in_text_body = false;
                    in_run_text = false;
                }
                b"txBody" => in_text_body = false,
                b"t" => in_run_text = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                log::warn!("Slide XML error (continuing): {e}");
            }
            _ => {}
        }
    }

    shapes.sort_by(|a, b| {
        (a.y, a.x)
            .partial_cmp(&(b.y, b.x))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    shapes
        .iter()
        .map(|s| s.text.trim())
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Default)]
struct Shape {
    text: String,
    x: f64,
    y: f64,
}

fn read_offset(e: &quick_xml::events::BytesStart<'_>, current: &mut Option<Shape>) {
    let Some(shape) = current.as_mut() else {
        return;
    };
    for attr in e.attributes().flatten() {
        let value = String::from_utf8_lossy(&attr.value);
        match attr.key.as_ref() {
            b"x" => {
                if let Ok(x) = value.parse() {
                    shape.x = x;
                }
            }
            b"y" => {
                if let Ok(y) = value.parse() {
                    shape.y = y;
                }
            }
            _ => {}
        }
    }
}

fn read_archive_file<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<String> {
    let mut file = archive
        .by_name(path)
        .map_err(|e| Error::ZipError(format!("Missing deck part '{path}': {e}")))?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| Error::ZipError(format!("Failed to read '{path}': {e}")))?;
    Ok(content)
}

/// Extract the local name from a potentially namespaced element name.
fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().position(|&b| b == b':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

/// Extract a slide number from a target like "slides/slide3.xml".
fn slide_number(target: &str) -> Option<usize> {
    let stem = target.trim_end_matches(".xml");
    let digits: String = stem
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.chars().rev().collect::<String>().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::FileOptions;
    use zip::ZipWriter;

    fn deck_archive(slides: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options: FileOptions = FileOptions::default();

        let rels: String = slides
            .iter()
            .enumerate()
            .map(|(i, _)| {
                format!(
                    r#"<Relationship Id="rId{n}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide{n}.xml"/>"#,
                    n = i + 1
                )
            })
            .collect();
        writer
            .start_file("ppt/_rels/presentation.xml.rels", options)
            .unwrap();
        writer
            .write_all(format!(r#"<?xml version="1.0"?><Relationships>{rels}</Relationships>"#).as_bytes())
            .unwrap();

        for (i, (_, xml)) in slides.iter().enumerate() {
            writer
                .start_file(format!("ppt/slides/slide{}.xml", i + 1), options)
                .unwrap();
            writer.write_all(xml.as_bytes()).unwrap();
        }

        writer.finish().unwrap().into_inner()
    }

    fn shape(x: u64, y: u64, lines: &[&str]) -> String {
        let paragraphs: String = lines
            .iter()
            .map(|l| format!("<a:p><a:r><a:t>{l}</a:t></a:r></a:p>"))
            .collect();
        format!(
            r#"<p:sp><p:spPr><a:xfrm><a:off x="{x}" y="{y}"/></a:xfrm></p:spPr><p:txBody>{paragraphs}</p:txBody></p:sp>"#
        )
    }

    fn slide_xml(shapes: &[String]) -> String {
        format!(
            r#"<?xml version="1.0"?><p:sld><p:cSld><p:spTree>{}</p:spTree></p:cSld></p:sld>"#,
            shapes.concat()
        )
    }

    #[test]
    fn test_extracts_slides_in_order() {
        let slide1 = slide_xml(&[shape(0, 0, &["Alpha"])]);
        let slide2 = slide_xml(&[shape(0, 0, &["Beta"])]);
        let data = deck_archive(&[("1", &slide1), ("2", &slide2)]);

        let text = extract_deck_text(Cursor::new(data)).unwrap();
        assert_eq!(text, "Alpha\n\nBeta");
    }

    #[test]
    fn test_shapes_sorted_by_position() {
        // Body shape listed before the title, but positioned below it.
        let slide = slide_xml(&[
            shape(100, 2_000_000, &["Body line"]),
            shape(100, 100, &["Title line"]),
        ]);
        let data = deck_archive(&[("1", &slide)]);

        let text = extract_deck_text(Cursor::new(data)).unwrap();
        assert_eq!(text, "Title line\nBody line");
    }

    #[test]
    fn test_multi_paragraph_shape_keeps_line_breaks() {
        let slide = slide_xml(&[shape(0, 0, &["one", "two"])]);
        let data = deck_archive(&[("1", &slide)]);

        let text = extract_deck_text(Cursor::new(data)).unwrap();
        assert_eq!(text, "one\ntwo");
    }

    #[test]
    fn test_not_a_zip_is_an_error() {
        let result = extract_deck_text(Cursor::new(b"plain text".to_vec()));
        assert!(matches!(result, Err(Error::ZipError(_))));
    }

    #[test]
    fn test_slide_number() {
        assert_eq!(slide_number("slides/slide3.xml"), Some(3));
        assert_eq!(slide_number("slides/slide12.xml"), Some(12));
        assert_eq!(slide_number("slides/cover.xml"), None);
    }
}
