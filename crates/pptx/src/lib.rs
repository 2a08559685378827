//! Deterministic PPTX encoder.
//!
//! Each slide of a [`Presentation`] becomes exactly one slide page, in
//! array order, built from the same resolved layout regions the render
//! surfaces consume. Speaker notes attach to each page's notes part.
//! Encoding the same presentation twice yields byte-identical files.

mod media;
mod package;
mod parts;
mod slides;
mod xml;

use deck_core::layout::Region;
use deck_core::{resolve, Presentation, Result};
use media::MediaAsset;
use package::PackageWriter;
use std::collections::BTreeSet;
use std::io::Write;

/// Encoder for the binary slide-deck artifact.
#[derive(Debug, Default)]
pub struct DeckEncoder;

impl DeckEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encode a presentation into PPTX bytes.
    pub fn encode(&self, presentation: &Presentation) -> Result<Vec<u8>> {
        let slide_count = presentation.slides.len();

        // Resolve every slide once; decide media embedding up front so
        // the content types can declare the extensions in use.
        let mut pages: Vec<(deck_core::ResolvedSlide, Option<MediaAsset>)> =
            Vec::with_capacity(slide_count);
        let mut media_extensions: BTreeSet<&'static str> = BTreeSet::new();

        for slide in &presentation.slides {
            let resolved = resolve(slide);
            let asset = image_url(&resolved).and_then(media::decode_data_url);
            if let Some(asset) = &asset {
                media_extensions.insert(asset.extension);
            }
            pages.push((resolved, asset));
        }

        let mut writer = PackageWriter::new();
        writer.add_part(
            "[Content_Types].xml",
            parts::content_types(slide_count, &media_extensions).as_bytes(),
        )?;
        writer.add_part("_rels/.rels", parts::root_rels().as_bytes())?;
        writer.add_part("ppt/presentation.xml", parts::presentation(slide_count).as_bytes())?;
        writer.add_part(
            "ppt/_rels/presentation.xml.rels",
            parts::presentation_rels(slide_count).as_bytes(),
        )?;
        writer.add_part(
            "ppt/slideMasters/slideMaster1.xml",
            parts::slide_master().as_bytes(),
        )?;
        writer.add_part(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            parts::slide_master_rels().as_bytes(),
        )?;
        writer.add_part(
            "ppt/slideLayouts/slideLayout1.xml",
            parts::slide_layout().as_bytes(),
        )?;
        writer.add_part(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            parts::slide_layout_rels().as_bytes(),
        )?;
        writer.add_part("ppt/theme/theme1.xml", parts::theme("Deck").as_bytes())?;
        writer.add_part("ppt/theme/theme2.xml", parts::theme("Deck Notes").as_bytes())?;
        writer.add_part(
            "ppt/notesMasters/notesMaster1.xml",
            parts::notes_master().as_bytes(),
        )?;
        writer.add_part(
            "ppt/notesMasters/_rels/notesMaster1.xml.rels",
            parts::notes_master_rels().as_bytes(),
        )?;

        for (index, (resolved, asset)) in pages.iter().enumerate() {
            let n = index + 1;
            let media_file = asset
                .as_ref()
                .map(|asset| format!("image{n}.{}", asset.extension));
            let image_rid = media_file.as_ref().map(|_| "rId3");

            writer.add_part(
                &format!("ppt/slides/slide{n}.xml"),
                slides::slide_part(resolved, image_rid).as_bytes(),
            )?;
            writer.add_part(
                &format!("ppt/slides/_rels/slide{n}.xml.rels"),
                parts::slide_rels(n, media_file.as_deref()).as_bytes(),
            )?;
            writer.add_part(
                &format!("ppt/notesSlides/notesSlide{n}.xml"),
                parts::notes_slide(notes_text(resolved)).as_bytes(),
            )?;
            writer.add_part(
                &format!("ppt/notesSlides/_rels/notesSlide{n}.xml.rels"),
                parts::notes_slide_rels(n).as_bytes(),
            )?;
            if let (Some(file), Some(asset)) = (&media_file, asset) {
                writer.add_part(&format!("ppt/media/{file}"), &asset.bytes)?;
            }
        }

        writer.finish()
    }

    /// Encode and write the package to any writer.
    pub fn write_to<W: Write>(&self, presentation: &Presentation, mut writer: W) -> Result<()> {
        let bytes = self.encode(presentation)?;
        writer.write_all(&bytes)?;
        Ok(())
    }

    /// The output file name derived from the deck topic.
    pub fn file_name(&self, presentation: &Presentation) -> String {
        format!("{}.pptx", presentation.file_stem())
    }
}

fn image_url(resolved: &deck_core::ResolvedSlide) -> Option<&str> {
    resolved.regions.iter().find_map(|region| match region {
        Region::Image { url, .. } => url.as_deref(),
        _ => None,
    })
}

fn notes_text(resolved: &deck_core::ResolvedSlide) -> &str {
    resolved
        .regions
        .iter()
        .find_map(|region| match region {
            Region::NotesHint { text } => Some(text.as_str()),
            _ => None,
        })
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{Slide, SlideLayout};

    #[test]
    fn test_file_name_from_topic() {
        let encoder = DeckEncoder::new();
        let presentation = Presentation::new("Quarterly Results");
        assert_eq!(encoder.file_name(&presentation), "Quarterly_Results.pptx");

        let empty = Presentation::new("   ");
        assert_eq!(encoder.file_name(&empty), "presentation.pptx");
    }

    #[test]
    fn test_image_url_extraction() {
        let mut slide = Slide::new("s1", SlideLayout::SplitImage, "T");
        slide.image_url = Some("data:image/png;base64,QUJD".to_string());
        let resolved = resolve(&slide);
        assert_eq!(image_url(&resolved), Some("data:image/png;base64,QUJD"));
    }
}
