//! Gemini generateContent のワイヤー型
//!
//! HTTP送信は CLI 側 (reqwest) が行う。ここではリクエスト組み立てと
//! レスポンスからのテキスト・参照元抽出だけを扱う。

use crate::prompts::build_listing_prompt;
use crate::schema::listing_schema;
use crate::types::{ImageInput, ManualInput, SearchSource, UserSettings};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 既定の思考トークン予算
pub const DEFAULT_THINKING_BUDGET: i32 = 2048;

/// Gemini APIリクエスト
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Part {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

/// 検索グラウンディング用ツール
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub google_search: GoogleSearch,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GoogleSearch {}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_config: Option<ThinkingConfig>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThinkingConfig {
    pub thinking_budget: i32,
}

/// Gemini APIレスポンス
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<ResponseContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
    /// 思考パート（出力本文ではない）
    #[serde(default)]
    pub thought: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroundingChunk {
    #[serde(default)]
    pub web: Option<WebChunk>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebChunk {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl GenerateContentResponse {
    /// 先頭候補の本文テキスト（思考パートを除いて連結）
    ///
    /// 本文が空なら None
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;

        let text: String = parts
            .iter()
            .filter(|p| !p.thought)
            .filter_map(|p| p.text.as_deref())
            .collect();

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// 先頭候補のグラウンディング参照元（URIとタイトルが揃っているもののみ）
    pub fn verified_sources(&self) -> Vec<SearchSource> {
        self.candidates
            .first()
            .and_then(|c| c.grounding_metadata.as_ref())
            .map(|meta| {
                meta.grounding_chunks
                    .iter()
                    .filter_map(|chunk| chunk.web.as_ref())
                    .filter_map(|web| match (web.uri.as_deref(), web.title.as_deref()) {
                        (Some(uri), Some(title)) if !uri.is_empty() && !title.is_empty() => {
                            Some(SearchSource {
                                title: title.to_string(),
                                uri: uri.to_string(),
                            })
                        }
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// 出品ドラフト用リクエストを組み立てる
///
/// 画像を順番に inlineData パートとして並べ、最後にプロンプトを置く。
pub fn build_listing_request(
    images: &[ImageInput],
    manual: Option<&ManualInput>,
    settings: Option<&UserSettings>,
    thinking_budget: i32,
) -> GenerateContentRequest {
    let mut parts: Vec<Part> = images
        .iter()
        .map(|img| Part::InlineData {
            inline_data: InlineData {
                mime_type: img.mime_type.clone(),
                data: img.base64.clone(),
            },
        })
        .collect();

    parts.push(Part::Text {
        text: build_listing_prompt(manual, settings),
    });

    GenerateContentRequest {
        contents: vec![Content { parts }],
        tools: vec![Tool::default()],
        generation_config: GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: Some(listing_schema()),
            thinking_config: Some(ThinkingConfig { thinking_budget }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn image(data: &str) -> ImageInput {
        ImageInput {
            base64: data.to_string(),
            mime_type: "image/jpeg".to_string(),
        }
    }

    #[test]
    fn test_request_images_before_prompt() {
        let request = build_listing_request(&[image("AAA"), image("BBB")], None, None, 2048);
        let parts = &request.contents[0].parts;

        assert_eq!(parts.len(), 3);
        assert!(matches!(&parts[0], Part::InlineData { inline_data } if inline_data.data == "AAA"));
        assert!(matches!(&parts[1], Part::InlineData { inline_data } if inline_data.data == "BBB"));
        assert!(matches!(&parts[2], Part::Text { .. }));
    }

    #[test]
    fn test_request_text_only() {
        let request = build_listing_request(&[], None, None, 2048);
        assert_eq!(request.contents[0].parts.len(), 1);
    }

    #[test]
    fn test_request_wire_format() {
        let request = build_listing_request(&[image("AAA")], None, None, 1024);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["contents"][0]["parts"][0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(value["contents"][0]["parts"][0]["inlineData"]["data"], "AAA");
        assert!(value["contents"][0]["parts"][1]["text"].is_string());
        assert_eq!(value["tools"][0], json!({ "googleSearch": {} }));
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(value["generationConfig"]["thinkingConfig"]["thinkingBudget"], 1024);
        assert_eq!(value["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn test_response_text_skips_thoughts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "thinking...", "thought": true },
                    { "text": "{\"title\":" },
                    { "text": "\"Lamp\"}" }
                ]}
            }]
        }))
        .unwrap();

        assert_eq!(response.text().as_deref(), Some("{\"title\":\"Lamp\"}"));
    }

    #[test]
    fn test_response_text_empty() {
        let response = GenerateContentResponse::default();
        assert!(response.text().is_none());

        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": "  " }] } }]
        }))
        .unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn test_verified_sources_filters_incomplete_chunks() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{}" }] },
                "groundingMetadata": { "groundingChunks": [
                    { "web": { "uri": "https://www.ebay.co.uk/sch/1", "title": "eBay sold" } },
                    { "web": { "uri": "https://example.com" } },
                    { "web": { "uri": "", "title": "empty" } },
                    {}
                ]}
            }]
        }))
        .unwrap();

        let sources = response.verified_sources();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].title, "eBay sold");
        assert_eq!(sources[0].uri, "https://www.ebay.co.uk/sch/1");
    }
}
