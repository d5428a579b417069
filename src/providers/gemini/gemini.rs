use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::json;

use crate::completion::{CompletionProvider, ModelInfo, ProviderError};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const API_KEY_HEADER: &str = "x-goog-api-key";
const MODELS_PAGE_SIZE: u32 = 1000;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelEntry>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelEntry {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Client for the Gemini `generativelanguage` REST API.
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(api_key: String, base_url: &str) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(concat!("pyp-extractor/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn send(&self, request: RequestBuilder, context: &str) -> Result<String, ProviderError> {
        let response = request.header(API_KEY_HEADER, &self.api_key).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: truncate_preview(&body, 1000),
            });
        }
        debug!("{} returned {} bytes", context, body.len());
        Ok(body)
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    async fn list_models(&self) -> Result<Vec<ModelInfo>, ProviderError> {
        let url = format!("{}/v1beta/models", self.base_url);
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .query(&[("pageSize", MODELS_PAGE_SIZE.to_string())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let body = self.send(request, "list models").await?;
            let page: ListModelsResponse =
                serde_json::from_str(&body).map_err(|e| ProviderError::Parse(e.to_string()))?;

            models.extend(page.models.into_iter().map(|entry| ModelInfo {
                name: entry.name,
                supported_actions: entry.supported_generation_methods,
            }));

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(models)
    }

    async fn complete(&self, model: &str, prompt: &str) -> Result<String, ProviderError> {
        let url = format!("{}/v1beta/{}:generateContent", self.base_url, model_path(model));
        let request = self.client.post(&url).json(&json!({
            "contents": [
                { "parts": [ { "text": prompt } ] }
            ]
        }));

        let body = self.send(request, "generate content").await?;
        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Parse(e.to_string()))?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(text)
    }
}

/// Catalog names come back as `models/<id>`; bare ids are accepted too.
fn model_path(model: &str) -> String {
    if model.starts_with("models/") || model.starts_with("tunedModels/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}

fn truncate_preview(input: &str, max: usize) -> String {
    if input.len() <= max {
        return input.to_string();
    }
    let mut end = max;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    let mut out = input[..end].to_string();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[test]
    fn test_model_path() {
        assert_eq!(model_path("gemini-1.5-flash"), "models/gemini-1.5-flash");
        assert_eq!(model_path("models/gemini-2.0-flash"), "models/gemini-2.0-flash");
    }

    #[test]
    fn test_truncate_preview() {
        assert_eq!(truncate_preview("short", 10), "short");
        assert_eq!(truncate_preview("ééé", 3), "é...");
    }

    #[tokio::test]
    async fn test_list_models_follows_pages() {
        let mut server = Server::new_async().await;
        let first = server
            .mock("GET", "/v1beta/models")
            .match_header("x-goog-api-key", "test-key")
            .match_query(Matcher::Regex("^pageSize=1000$".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "models": [
                        { "name": "models/embedding-001", "supportedGenerationMethods": ["embedContent"] }
                    ],
                    "nextPageToken": "page-2"
                })
                .to_string(),
            )
            .create_async()
            .await;
        let second = server
            .mock("GET", "/v1beta/models")
            .match_query(Matcher::UrlEncoded("pageToken".to_string(), "page-2".to_string()))
            .with_status(200)
            .with_body(
                json!({
                    "models": [
                        { "name": "models/gemini-2.0-flash", "supportedGenerationMethods": ["generateContent", "countTokens"] }
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let provider = GeminiProvider::new("test-key".to_string(), &server.url()).unwrap();
        let models = provider.list_models().await.unwrap();

        first.assert_async().await;
        second.assert_async().await;
        assert_eq!(models.len(), 2);
        assert_eq!(models[1].name, "models/gemini-2.0-flash");
        assert!(models[1].supports("generateContent"));
        assert!(!models[0].supports("generateContent"));
    }

    #[tokio::test]
    async fn test_complete_joins_candidate_parts() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-1.5-flash:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::PartialJson(json!({
                "contents": [ { "parts": [ { "text": "Extract all questions" } ] } ]
            })))
            .with_status(200)
            .with_body(
                json!({
                    "candidates": [
                        { "content": { "parts": [ { "text": "1 (a) Convert " }, { "text": "45 to binary." } ] } }
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let provider = GeminiProvider::new("test-key".to_string(), &server.url()).unwrap();
        let text = provider
            .complete("gemini-1.5-flash", "Extract all questions")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(text, "1 (a) Convert 45 to binary.");
    }

    #[tokio::test]
    async fn test_complete_surfaces_status_errors() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/v1beta/models/gemini-1.5-flash:generateContent")
            .with_status(429)
            .with_body(r#"{"error":{"message":"Resource has been exhausted"}}"#)
            .create_async()
            .await;

        let provider = GeminiProvider::new("test-key".to_string(), &server.url()).unwrap();
        let err = provider.complete("gemini-1.5-flash", "prompt").await.unwrap_err();

        match err {
            ProviderError::Status { status, body } => {
                assert_eq!(status, 429);
                assert!(body.contains("exhausted"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_complete_without_candidates_is_empty_response() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/v1beta/models/gemini-1.5-flash:generateContent")
            .with_status(200)
            .with_body(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#)
            .create_async()
            .await;

        let provider = GeminiProvider::new("test-key".to_string(), &server.url()).unwrap();
        let err = provider.complete("gemini-1.5-flash", "prompt").await.unwrap_err();
        assert!(matches!(err, ProviderError::EmptyResponse));
    }
}
