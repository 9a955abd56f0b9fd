//! An assistant backed by the Gemini API, grounded with Google Maps

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::assistant::{Coordinates, LocationInfo};
use crate::error::CollaboratorError;
use crate::traits::Assistant;
use crate::Task;

const API_KEY_HEADER: &str = "x-goog-api-key";


/// Asks a Gemini model, with the Google Maps tool enabled
pub struct GeminiAssistant {
    http: reqwest::Client,
    api_key: Option<String>,
    endpoint: Url,
}

impl GeminiAssistant {
    /// Create an assistant. This does not start a connection.
    ///
    /// The endpoint, the model and the timeout are read from the [`config`](crate::config) module.
    /// Without an API key, every call fails (and callers get fallback values).
    pub fn new(api_key: Option<String>) -> Result<Self, CollaboratorError> {
        let timeout = *crate::config::REQUEST_TIMEOUT.lock().unwrap();
        let model = crate::config::MODEL_NAME.lock().unwrap().clone();
        let base = crate::config::API_BASE_URL.lock().unwrap().clone();

        let endpoint = base.join(&format!("models/{}:generateContent", model))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self { http, api_key, endpoint })
    }

    /// Create an assistant with the API key found in the environment
    pub fn from_env() -> Result<Self, CollaboratorError> {
        Self::new(crate::config::api_key_from_env())
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn generate(&self, request: &GenerateContentRequest) -> Result<GenerateContentResponse, CollaboratorError> {
        let api_key = self.api_key.as_deref().ok_or(CollaboratorError::MissingApiKey)?;
        let body = serde_json::to_string(request)?;

        let response = self.http
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, api_key)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if status.is_success() == false {
            return Err(CollaboratorError::Status { status: status.as_u16(), body: text });
        }
        log::debug!("Assistant answered {} bytes", text.len());

        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl Assistant for GeminiAssistant {
    async fn lookup_location(&self, location: &str, near: Option<Coordinates>) -> Result<LocationInfo, CollaboratorError> {
        let request = GenerateContentRequest::with_maps(location_prompt(location), near);
        let response = self.generate(&request).await?;
        location_info_from(location, &response)
    }

    async fn plan_route(&self, tasks: &[Task]) -> Result<String, CollaboratorError> {
        let request = GenerateContentRequest::with_maps(route_prompt(tasks), None);
        let response = self.generate(&request).await?;
        response.text().ok_or(CollaboratorError::EmptyResponse)
    }
}


pub(crate) fn location_prompt(location: &str) -> String {
    format!("Find the exact position and the Google Maps links for: {}. Give useful details on how to get there.", location)
}

pub(crate) fn route_prompt(tasks: &[Task]) -> String {
    let task_list: Vec<String> = tasks.iter()
        .map(|t| format!("{} at {} ({})", t.title(), t.location(), t.category()))
        .collect();

    format!("I have the following appointments today:\n{}\n\n\
        Act as an expert logistics assistant. Analyze these activities and suggest the best order to minimize travel and save time. \
        Take the categories (Work, Home, Courses, Training) into account. \
        Give a structured answer with practical suggestions and a recommended order.",
        task_list.join("\n"))
}

/// The answer text, and the first Google Maps link it is grounded on (or a plain maps search)
fn location_info_from(location: &str, response: &GenerateContentResponse) -> Result<LocationInfo, CollaboratorError> {
    let details = response.text().ok_or(CollaboratorError::EmptyResponse)?;
    let maps_url = match response.first_maps_uri() {
        Some(url) => url,
        None => {
            log::debug!("No maps link in the answer for {:?}, using a search link", location);
            crate::maps::search_url(location)
        },
    };
    Ok(LocationInfo { details, maps_url })
}


#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_config: Option<ToolConfig>,
}

impl GenerateContentRequest {
    fn with_maps(prompt: String, near: Option<Coordinates>) -> Self {
        Self {
            contents: vec![Content { parts: vec![Part { text: Some(prompt) }] }],
            tools: vec![Tool { google_maps: GoogleMaps {} }],
            tool_config: near.map(|pos| ToolConfig {
                retrieval_config: RetrievalConfig { lat_lng: pos },
            }),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    google_maps: GoogleMaps,
}

#[derive(Debug, Serialize)]
struct GoogleMaps {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolConfig {
    retrieval_config: RetrievalConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RetrievalConfig {
    lat_lng: Coordinates,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Content,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Default, Deserialize)]
struct GroundingChunk {
    #[serde(default)]
    maps: Option<MapsChunk>,
}

#[derive(Debug, Default, Deserialize)]
struct MapsChunk {
    #[serde(default)]
    uri: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, `None` if there are none
    fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let text: String = candidate.content.parts.iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    fn first_maps_uri(&self) -> Option<Url> {
        let metadata = self.candidates.first()?.grounding_metadata.as_ref()?;
        metadata.grounding_chunks.iter()
            .filter_map(|chunk| chunk.maps.as_ref()?.uri.as_deref())
            .find_map(|uri| match Url::parse(uri) {
                Ok(url) => Some(url),
                Err(err) => {
                    log::warn!("Ignoring invalid maps link {:?}: {}", uri, err);
                    None
                }
            })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, TaskDraft};

    static GROUNDED_ANSWER: &str = r#"{
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [
                    { "text": "The Duomo is in the city center. " },
                    { "text": "Take the M1 metro line." }
                ]
            },
            "groundingMetadata": {
                "groundingChunks": [
                    { "web": { "uri": "https://example.com" } },
                    { "maps": { "uri": "https://maps.google.com/?cid=1234", "title": "Duomo di Milano" } }
                ]
            }
        }]
    }"#;

    #[test]
    fn parse_grounded_answer() {
        let response: GenerateContentResponse = serde_json::from_str(GROUNDED_ANSWER).unwrap();
        let info = location_info_from("Duomo", &response).unwrap();
        assert_eq!(info.details, "The Duomo is in the city center. Take the M1 metro line.");
        assert_eq!(info.maps_url.as_str(), "https://maps.google.com/?cid=1234");
    }

    #[test]
    fn answer_without_maps_link() {
        let response: GenerateContentResponse = serde_json::from_str(r#"{"candidates": [{"content": {"parts": [{"text": "Somewhere"}]}}]}"#).unwrap();
        let info = location_info_from("Duomo", &response).unwrap();
        assert_eq!(info.details, "Somewhere");
        assert_eq!(info.maps_url, crate::maps::search_url("Duomo"));
    }

    #[test]
    fn answer_without_text() {
        let response: GenerateContentResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(matches!(location_info_from("Duomo", &response), Err(CollaboratorError::EmptyResponse)));
        assert_eq!(response.text(), None);
    }

    #[test]
    fn request_body() {
        let request = GenerateContentRequest::with_maps("hello".to_string(), Some(Coordinates::new(45.46, 9.19)));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert!(json["tools"][0]["googleMaps"].is_object());
        assert_eq!(json["toolConfig"]["retrievalConfig"]["latLng"]["latitude"], 45.46);
        assert_eq!(json["toolConfig"]["retrievalConfig"]["latLng"]["longitude"], 9.19);

        let unbiased = GenerateContentRequest::with_maps("hello".to_string(), None);
        let json = serde_json::to_value(&unbiased).unwrap();
        assert!(json.get("toolConfig").is_none());
    }

    #[test]
    fn route_prompt_lists_every_task() {
        let tasks = vec![
            Task::new(TaskDraft::new("Standup", "Office", Category::Work)),
            Task::new(TaskDraft::new("Swim", "Pool", Category::Training)),
        ];
        let prompt = route_prompt(&tasks);
        assert!(prompt.contains("Standup at Office (Work)\nSwim at Pool (Training)\n"));
        assert!(location_prompt("Pool").contains("Pool"));
    }

    #[test]
    fn endpoint_uses_the_configured_model() {
        let assistant = GeminiAssistant::new(None).unwrap();
        assert!(assistant.endpoint().as_str().ends_with(":generateContent"));
        assert!(assistant.endpoint().as_str().starts_with("https://generativelanguage.googleapis.com/v1beta/models/"));
    }

    #[tokio::test]
    async fn missing_api_key_falls_back() {
        let assistant = GeminiAssistant::new(None).unwrap();
        let err = assistant.lookup_location("Duomo", None).await.unwrap_err();
        assert!(matches!(err, CollaboratorError::MissingApiKey));

        let info = assistant.enrich_location("Duomo", None).await;
        assert_eq!(info, LocationInfo::fallback("Duomo"));
    }
}
