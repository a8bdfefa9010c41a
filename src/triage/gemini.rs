use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use super::types::LlmClient;
use super::LlmError;

/// Google Generative Language REST endpoint.
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// HTTP client for the Gemini generateContent API.
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GeminiClient {
    /// Create a client with the given API key and per-request timeout.
    pub fn new(api_key: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: GEMINI_BASE_URL.to_string(),
            api_key: api_key.to_string(),
            client,
            timeout_secs,
        }
    }

    /// Point the client at a different API origin (tests).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn post_generate(&self, model: &str, body: &GenerateRequest) -> Result<String, LlmError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );

        let response = self.client.post(&url).json(body).send().map_err(|e| {
            if e.is_connect() {
                LlmError::Connection(self.base_url.clone())
            } else if e.is_timeout() {
                LlmError::Timeout(self.timeout_secs)
            } else {
                LlmError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| LlmError::ResponseDecoding(e.to_string()))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| LlmError::ResponseDecoding("response carried no candidates".into()))
    }
}

/// Request body for models/{model}:generateContent
#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

/// One content part: either prompt text or an inline image.
#[derive(Serialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            inline_data: None,
        }
    }

    fn jpeg(data: &str) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: "image/jpeg".into(),
                data: data.to_string(),
            }),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

/// Response body from models/{model}:generateContent
#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Deserialize)]
struct TextPart {
    #[serde(default)]
    text: String,
}

impl LlmClient for GeminiClient {
    fn generate(&self, model: &str, prompt: &str) -> Result<String, LlmError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part::text(prompt)],
            }],
        };
        self.post_generate(model, &body)
    }

    fn generate_with_frames(
        &self,
        model: &str,
        prompt: &str,
        frames: &[String],
    ) -> Result<String, LlmError> {
        let mut parts = vec![Part::text(prompt)];
        parts.extend(frames.iter().map(|f| Part::jpeg(f)));

        let body = GenerateRequest {
            contents: vec![Content { parts }],
        };
        self.post_generate(model, &body)
    }
}

/// Mock LLM client for testing. Scripted replies are consumed in order;
/// once the script is empty the default reply applies (a fixed answer, or
/// an unreachable-endpoint error when constructed with `unreachable`).
pub struct MockLlmClient {
    script: Mutex<VecDeque<Result<String, LlmError>>>,
    default_reply: Option<String>,
    calls: AtomicUsize,
    models: Mutex<Vec<String>>,
}

impl MockLlmClient {
    /// Always answers with the same response.
    pub fn new(response: &str) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default_reply: Some(response.to_string()),
            calls: AtomicUsize::new(0),
            models: Mutex::new(Vec::new()),
        }
    }

    /// Always fails as if the endpoint were down.
    pub fn unreachable() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default_reply: None,
            calls: AtomicUsize::new(0),
            models: Mutex::new(Vec::new()),
        }
    }

    /// Queue replies consumed one per call before the default applies.
    pub fn with_script(self, replies: Vec<Result<String, LlmError>>) -> Self {
        Self {
            script: Mutex::new(replies.into()),
            ..self
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Model names in call order, for chain-order assertions.
    pub fn models_called(&self) -> Vec<String> {
        self.models.lock().unwrap().clone()
    }

    fn next_reply(&self, model: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.models.lock().unwrap().push(model.to_string());

        if let Some(reply) = self.script.lock().unwrap().pop_front() {
            return reply;
        }
        match &self.default_reply {
            Some(text) => Ok(text.clone()),
            None => Err(LlmError::Connection(GEMINI_BASE_URL.to_string())),
        }
    }
}

impl LlmClient for MockLlmClient {
    fn generate(&self, model: &str, _prompt: &str) -> Result<String, LlmError> {
        self.next_reply(model)
    }

    fn generate_with_frames(
        &self,
        model: &str,
        _prompt: &str,
        _frames: &[String],
    ) -> Result<String, LlmError> {
        self.next_reply(model)
    }
}
