//! Client for the slide-generation collaborator (the Google
//! generative-language API).
//!
//! Two calls are exposed: [`GeminiClient::generate_deck`], which turns
//! extracted document text into a structured [`Presentation`], and
//! [`GeminiClient::generate_image`], which renders a slide's visual
//! description into a data URL. The client returns the parsed deck
//! as-is; id and image normalization is the session controller's duty.

mod protocol;

use deck_core::{Error, Presentation, Result, SlideLayout};
use protocol::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, ImageConfig, Part,
};

/// Model used for deck structuring.
pub const TEXT_MODEL: &str = "gemini-2.5-flash";

/// Model used for image generation.
pub const IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Character budget applied to extracted text before submission.
pub const INPUT_CHAR_BUDGET: usize = 30_000;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variable holding the generation credential.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

const SYSTEM_PROMPT: &str = "\
You are an expert presentation architect and visual storyteller.
Your goal is to transform raw text into a bold, professional,
high-contrast, persuasive presentation structure.

Tasks:
1. Analyze the core message of the text.
2. Break it down into 5-8 logical slides.
3. For each slide, select the best layout:
   - 'title': For the main cover.
   - 'bullet-points': For lists and features.
   - 'big-number': For stats and data focus.
   - 'split-image': For conceptual comparison.
   - 'visual-focus': For highly visual storytelling where the image is the hero and text is minimal.
   - 'section-header': To introduce new topics.
4. Write punchy, concise content. Max 5 bullet points per slide.
5. Create a 'visualDescription' for an AI image generator (e.g., \"Abstract 3D golden isometric shapes on black background\").
6. Write professional 'speakerNotes'.

Return strictly JSON.";

/// Requested shape of a generated image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AspectRatio {
    /// 16:9, matching the slide canvas.
    #[default]
    Widescreen,
    /// 1:1, for the framed sidecar visual.
    Square,
    /// 3:4 portrait.
    Portrait,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Widescreen => "16:9",
            Self::Square => "1:1",
            Self::Portrait => "3:4",
        }
    }
}

/// Client for the generation service.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: String,
    http: reqwest::Client,
}

impl GeminiClient {
    /// Create a client with an explicit credential. An empty key is
    /// rejected up front; generation is impossible without it.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::MissingApiKey);
        }
        Ok(Self {
            api_key,
            http: reqwest::Client::new(),
        })
    }

    /// Create a client from the `GEMINI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_VAR).map_err(|_| Error::MissingApiKey)?;
        Self::new(api_key)
    }

    /// Generate a structured presentation from extracted document text.
    ///
    /// The input is truncated to [`INPUT_CHAR_BUDGET`] characters
    /// before submission. An empty or schema-violating response is an
    /// error; no partial deck is ever returned.
    pub async fn generate_deck(&self, text: &str) -> Result<Presentation> {
        let request = deck_request(text);
        let response = self.post_generate(TEXT_MODEL, &request).await?;
        parse_deck_response(&response)
    }

    /// Render an image prompt into a `data:image/...;base64,` URL.
    pub async fn generate_image(&self, prompt: &str, aspect: AspectRatio) -> Result<String> {
        let request = image_request(prompt, aspect);
        let response = self.post_generate(IMAGE_MODEL, &request).await?;
        parse_image_response(&response)
    }

    async fn post_generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = format!("{API_BASE}/models/{model}:generateContent");
        log::debug!("Posting generation request to {model}");

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await
            .map_err(|e| Error::GenerationError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::GenerationError(format!(
                "HTTP {status}: {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| Error::GenerationError(format!("Unreadable response: {e}")))
    }
}

fn deck_request(text: &str) -> GenerateContentRequest {
    let prompt = format!(
        "Create a presentation from this text:\n\n{}",
        truncate_to_budget(text, INPUT_CHAR_BUDGET)
    );

    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![Part::text(prompt)],
        }],
        system_instruction: Some(Content {
            parts: vec![Part::text(SYSTEM_PROMPT)],
        }),
        generation_config: Some(GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(deck_response_schema()),
            image_config: None,
        }),
    }
}

fn image_request(prompt: &str, aspect: AspectRatio) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![Part::text(prompt)],
        }],
        system_instruction: None,
        generation_config: Some(GenerationConfig {
            response_mime_type: None,
            response_schema: None,
            image_config: Some(ImageConfig {
                aspect_ratio: aspect.as_str().to_string(),
            }),
        }),
    }
}

/// JSON schema constraining the structured deck response.
fn deck_response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "topic": { "type": "STRING", "description": "The main topic/title of the presentation" },
            "theme": { "type": "STRING", "description": "The visual theme name" },
            "slides": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "STRING" },
                        "layout": { "type": "STRING", "enum": SlideLayout::known_tags() },
                        "title": { "type": "STRING" },
                        "subtitle": { "type": "STRING" },
                        "points": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "visualDescription": { "type": "STRING" },
                        "speakerNotes": { "type": "STRING" }
                    },
                    "required": ["id", "layout", "title", "visualDescription", "speakerNotes"]
                }
            }
        },
        "required": ["topic", "slides"]
    })
}

fn parse_deck_response(response: &GenerateContentResponse) -> Result<Presentation> {
    let json_text = response.first_text().ok_or(Error::EmptyGeneration)?;
    let presentation: Presentation =
        serde_json::from_str(json_text).map_err(|e| Error::InvalidGeneration(e.to_string()))?;

    if presentation.slides.is_empty() {
        return Err(Error::EmptyGeneration);
    }
    Ok(presentation)
}

fn parse_image_response(response: &GenerateContentResponse) -> Result<String> {
    let inline = response.first_inline_data().ok_or(Error::EmptyGeneration)?;
    let mime = if inline.mime_type.is_empty() {
        "image/png"
    } else {
        &inline.mime_type
    };
    Ok(format!("data:{mime};base64,{}", inline.data))
}

/// Truncate to at most `budget` bytes without splitting a character.
fn truncate_to_budget(text: &str, budget: usize) -> &str {
    if text.len() <= budget {
        return text;
    }
    let mut end = budget;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_api_key_is_rejected() {
        assert!(matches!(GeminiClient::new(""), Err(Error::MissingApiKey)));
        assert!(matches!(GeminiClient::new("  "), Err(Error::MissingApiKey)));
        assert!(GeminiClient::new("k-123").is_ok());
    }

    #[test]
    fn test_truncate_to_budget_respects_char_boundaries() {
        assert_eq!(truncate_to_budget("hello", 10), "hello");
        assert_eq!(truncate_to_budget("hello", 3), "hel");

        // 'é' is two bytes; a budget landing mid-char backs off.
        let text = "aé";
        assert_eq!(truncate_to_budget(text, 2), "a");
        assert_eq!(truncate_to_budget(text, 3), "aé");
    }

    #[test]
    fn test_deck_request_body_shape() {
        let request = deck_request("Some source text");
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(
            body["contents"][0]["parts"][0]["text"],
            "Create a presentation from this text:\n\nSome source text"
        );
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        let layouts = &body["generationConfig"]["responseSchema"]["properties"]["slides"]["items"]
            ["properties"]["layout"]["enum"];
        assert_eq!(layouts.as_array().unwrap().len(), 6);
        assert!(body["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("presentation architect"));
    }

    #[test]
    fn test_deck_request_truncates_input() {
        let long_text = "x".repeat(INPUT_CHAR_BUDGET + 500);
        let request = deck_request(&long_text);
        let body = serde_json::to_value(&request).unwrap();
        let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.len() < long_text.len());
    }

    #[test]
    fn test_image_request_body_shape() {
        let request = image_request("golden shapes", AspectRatio::Square);
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["contents"][0]["parts"][0]["text"], "golden shapes");
        assert_eq!(body["generationConfig"]["imageConfig"]["aspectRatio"], "1:1");
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn test_parse_deck_response() {
        let deck_json = serde_json::json!({
            "topic": "Quarterly Results",
            "theme": "dark",
            "slides": [{
                "id": "s1",
                "layout": "big-number",
                "title": "Growth",
                "points": ["42%"],
                "visualDescription": "upward arrow chart",
                "speakerNotes": "lead with the number"
            }]
        });
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": deck_json.to_string() }] } }]
        }))
        .unwrap();

        let presentation = parse_deck_response(&response).unwrap();
        assert_eq!(presentation.topic, "Quarterly Results");
        assert_eq!(presentation.slides.len(), 1);
        assert_eq!(presentation.slides[0].layout, SlideLayout::BigNumber);
    }

    #[test]
    fn test_parse_deck_response_empty_candidates() {
        let response: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({ "candidates": [] })).unwrap();
        assert!(matches!(
            parse_deck_response(&response),
            Err(Error::EmptyGeneration)
        ));
    }

    #[test]
    fn test_parse_deck_response_malformed_json() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "not json" }] } }]
        }))
        .unwrap();
        assert!(matches!(
            parse_deck_response(&response),
            Err(Error::InvalidGeneration(_))
        ));
    }

    #[test]
    fn test_parse_deck_response_no_slides() {
        let deck_json = serde_json::json!({ "topic": "T", "slides": [] });
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": deck_json.to_string() }] } }]
        }))
        .unwrap();
        assert!(matches!(
            parse_deck_response(&response),
            Err(Error::EmptyGeneration)
        ));
    }

    #[test]
    fn test_parse_image_response() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{ "content": { "parts": [
                { "text": "here is your image" },
                { "inlineData": { "mimeType": "image/png", "data": "QUJD" } }
            ] } }]
        }))
        .unwrap();

        let url = parse_image_response(&response).unwrap();
        assert_eq!(url, "data:image/png;base64,QUJD");
    }

    #[test]
    fn test_parse_image_response_without_image() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "no image" }] } }]
        }))
        .unwrap();
        assert!(matches!(
            parse_image_response(&response),
            Err(Error::EmptyGeneration)
        ));
    }
}
