//! WASM session surface for the deck pipeline.
//!
//! Exposes one [`DeckApp`] per browser session. The JS shell owns the
//! awaits: it calls the free async generation functions, then feeds
//! the terminal resolution back through the ticket-guarded completion
//! operations so a stale result cannot resurrect a discarded session.
//!
//! Exported methods are thin wrappers over `_impl` methods; the impls
//! stay JsValue-free so they can be tested natively.

use deck_core::{EditTarget, GenerationTicket, Phase, Session, SlideEdit};
use deck_gen::{AspectRatio, GeminiClient};
use deck_pptx::DeckEncoder;
use deck_render::{render_slide_html, render_thumbnail_html, viewer_document};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// One editing session, owned by the JS shell.
#[wasm_bindgen]
pub struct DeckApp {
    session: Session,
}

#[wasm_bindgen]
impl DeckApp {
    #[wasm_bindgen(constructor)]
    pub fn new() -> DeckApp {
        DeckApp {
            session: Session::new(),
        }
    }

    /// Extract prompt-ready text from an uploaded document.
    ///
    /// # Arguments
    /// * `data` - The raw bytes of the uploaded file
    /// * `filename` - The original filename (drives format detection)
    pub fn ingest_source(&self, data: &[u8], filename: &str) -> Result<String, JsValue> {
        self.ingest_source_impl(data, filename).map_err(to_js_error)
    }

    /// Enter the processing state; returns the raw generation ticket
    /// the shell must hand back with the terminal resolution.
    pub fn begin_generation(&mut self, stamp: u64, status: &str) -> u64 {
        self.session.begin_generation(stamp, status).raw()
    }

    /// Stale-guarded progress update. Returns false if the ticket no
    /// longer matches the live request.
    pub fn set_status(&mut self, ticket: u64, status: &str) -> bool {
        self.session
            .set_status(GenerationTicket::from_raw(ticket), status)
    }

    /// Feed a successful generation result (presentation JSON) back
    /// into the session. Returns false for a stale ticket.
    pub fn complete_generation(&mut self, ticket: u64, presentation_json: &str) -> bool {
        let result = serde_json::from_str(presentation_json)
            .map_err(|e| deck_core::Error::InvalidGeneration(e.to_string()));
        self.session
            .complete_generation(GenerationTicket::from_raw(ticket), result)
    }

    /// Feed a failed generation back into the session. Returns false
    /// for a stale ticket.
    pub fn fail_generation(&mut self, ticket: u64, message: &str) -> bool {
        self.session.complete_generation(
            GenerationTicket::from_raw(ticket),
            Err(deck_core::Error::GenerationError(message.to_string())),
        )
    }

    /// Current step of the cycle: "upload", "processing", or "editor".
    pub fn phase(&self) -> String {
        match self.session.phase() {
            Phase::AwaitingSource => "upload",
            Phase::Processing => "processing",
            Phase::Editing => "editor",
        }
        .to_string()
    }

    pub fn status(&self) -> String {
        self.session.status().to_string()
    }

    pub fn error(&self) -> Option<String> {
        self.session.last_error().map(str::to_string)
    }

    pub fn clear_error(&mut self) {
        self.session.clear_error();
    }

    /// Discard the session and return to the upload state.
    pub fn reset(&mut self) {
        self.session.reset();
    }

    pub fn topic(&self) -> Option<String> {
        self.session.presentation().map(|p| p.topic.clone())
    }

    pub fn slide_count(&self) -> usize {
        self.session.slide_count()
    }

    pub fn cursor(&self) -> usize {
        self.session.cursor()
    }

    pub fn set_cursor(&mut self, index: usize) {
        self.session.set_cursor(index);
    }

    pub fn next_slide(&mut self) {
        self.session.next_slide();
    }

    pub fn previous_slide(&mut self) {
        self.session.previous_slide();
    }

    pub fn current_slide_id(&self) -> Option<String> {
        self.session.current_slide().map(|slide| slide.id.clone())
    }

    /// Editable HTML for the slide under the cursor.
    pub fn current_slide_html(&self) -> Option<String> {
        self.session.current_slide().map(render_slide_html)
    }

    /// The slide under the cursor as a structured JS object.
    pub fn current_slide_data(&self) -> Result<JsValue, JsValue> {
        match self.session.current_slide() {
            Some(slide) => serde_wasm_bindgen::to_value(slide)
                .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}"))),
            None => Ok(JsValue::NULL),
        }
    }

    /// Sidebar thumbnail HTML for every slide, in deck order.
    pub fn thumbnails_html(&self) -> String {
        let Some(presentation) = self.session.presentation() else {
            return String::new();
        };
        presentation
            .slides
            .iter()
            .enumerate()
            .map(|(index, slide)| {
                render_thumbnail_html(slide, index, index == self.session.cursor())
            })
            .collect()
    }

    /// Apply one confirmed edit from the shell's input toggling.
    ///
    /// # Arguments
    /// * `slide_id` - The slide's `data-slide-id` marker
    /// * `target` - The region's `data-edit-target` marker
    /// * `value` - The confirmed input value
    pub fn apply_edit(&mut self, slide_id: &str, target: &str, value: &str) -> Result<(), JsValue> {
        self.apply_edit_impl(slide_id, target, value)
            .map_err(to_js_error)
    }

    /// Flag a slide's visual as pending while the shell awaits a new
    /// image; the completing `imageUrl` edit clears it.
    pub fn mark_image_generating(&mut self, slide_id: &str) -> Result<(), JsValue> {
        self.session
            .mark_image_generating(slide_id)
            .map_err(to_js_error)
    }

    /// The image-generation prompt for a slide (its visual description).
    pub fn image_prompt(&self, slide_id: &str) -> Option<String> {
        self.session
            .presentation()?
            .slide(slide_id)
            .map(|slide| slide.visual_description.clone())
    }

    /// Encode the held presentation into PPTX bytes.
    pub fn export_pptx(&self) -> Result<Vec<u8>, JsValue> {
        self.export_pptx_impl().map_err(to_js_error)
    }

    /// The download name for the PPTX artifact.
    pub fn export_file_name(&self) -> Option<String> {
        self.session
            .presentation()
            .map(|p| DeckEncoder::new().file_name(p))
    }

    /// The self-contained standalone viewer document.
    pub fn export_viewer_html(&self) -> Result<String, JsValue> {
        self.export_viewer_html_impl().map_err(to_js_error)
    }

    /// The presentation serialized as pretty JSON, for interchange and
    /// debugging.
    pub fn export_data_json(&self) -> Result<String, JsValue> {
        self.export_data_json_impl().map_err(to_js_error)
    }
}

impl DeckApp {
    fn ingest_source_impl(&self, data: &[u8], filename: &str) -> deck_core::Result<String> {
        deck_source::extract_text(data, filename)
    }

    fn apply_edit_impl(
        &mut self,
        slide_id: &str,
        target: &str,
        value: &str,
    ) -> deck_core::Result<()> {
        let target: EditTarget = target.parse()?;
        self.session
            .apply_edit(slide_id, SlideEdit::for_target(target, value.to_string()))
    }

    fn export_pptx_impl(&self) -> deck_core::Result<Vec<u8>> {
        let presentation = self
            .session
            .presentation()
            .ok_or(deck_core::Error::NotEditing)?;
        DeckEncoder::new().encode(presentation)
    }

    fn export_viewer_html_impl(&self) -> deck_core::Result<String> {
        let presentation = self
            .session
            .presentation()
            .ok_or(deck_core::Error::NotEditing)?;
        viewer_document(presentation)
    }

    fn export_data_json_impl(&self) -> deck_core::Result<String> {
        let presentation = self
            .session
            .presentation()
            .ok_or(deck_core::Error::NotEditing)?;
        Ok(serde_json::to_string_pretty(presentation)?)
    }
}

impl Default for DeckApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate a structured deck from extracted text.
///
/// Returns the presentation as a JSON string the shell feeds into
/// [`DeckApp::complete_generation`]; rejections go to
/// [`DeckApp::fail_generation`].
#[wasm_bindgen]
pub async fn generate_deck_json(api_key: String, text: String) -> Result<String, JsValue> {
    let presentation = generate_deck_json_impl(api_key, text)
        .await
        .map_err(to_js_error)?;
    Ok(presentation)
}

async fn generate_deck_json_impl(api_key: String, text: String) -> deck_core::Result<String> {
    let client = GeminiClient::new(api_key)?;
    let presentation = client.generate_deck(&text).await?;
    Ok(serde_json::to_string(&presentation)?)
}

/// Render an image prompt into a `data:image/...;base64,` URL.
#[wasm_bindgen]
pub async fn generate_image_data_url(
    api_key: String,
    prompt: String,
    aspect_ratio: String,
) -> Result<String, JsValue> {
    let client = GeminiClient::new(api_key).map_err(to_js_error)?;
    let aspect = match aspect_ratio.as_str() {
        "1:1" => AspectRatio::Square,
        "3:4" => AspectRatio::Portrait,
        _ => AspectRatio::Widescreen,
    };
    client
        .generate_image(&prompt, aspect)
        .await
        .map_err(to_js_error)
}

fn to_js_error(err: deck_core::Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}
