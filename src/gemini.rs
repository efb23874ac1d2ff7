//! Gemini HTTP adapter for externally planned routes.
//!
//! One blocking `generateContent` call per plan attempt, no retries. The
//! response is untrusted input: its payload is schema-validated once, right
//! after decoding, and either accepted whole or discarded in favor of the
//! local solver.

use serde::{Deserialize, Serialize};

use crate::route::{Cell, Product, RouteResult, RouteSource, RouteStep};
use crate::traits::RouteProvider;

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(rename = "credential")]
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiRouteProvider {
    config: GeminiConfig,
    client: reqwest::blocking::Client,
}

impl GeminiRouteProvider {
    pub fn new(config: GeminiConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl RouteProvider for GeminiRouteProvider {
    fn plan(&self, cells: &[Cell], products: &[Product]) -> Option<RouteResult> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.endpoint, self.config.model, self.config.api_key
        );

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(cells, products),
                }],
            }],
        };

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<GenerateContentResponse>());

        let response = match response {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(error = %err, "external route provider call failed");
                return None;
            }
        };

        let text = response.first_text()?;
        parse_route_payload(&text)
    }
}

/// Prompt asking for the route as bare JSON, with the grid and shopping list
/// inlined.
fn build_prompt(cells: &[Cell], products: &[Product]) -> String {
    let cells_json = serde_json::to_string(cells).unwrap_or_else(|_| String::from("[]"));
    let product_list = products
        .iter()
        .map(|p| format!("{}({})", p.name, p.cell_id))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Given a store grid (cells with x,y) and a list of products with their cellId, \
         output ONLY JSON: {{steps:[{{order:number,cellId:string,products:string[]}}],totalDistance:number}}. \
         Minimize walking (Manhattan). Cells: {cells_json} Products: {product_list}"
    )
}

/// Decodes and validates the provider's text payload.
///
/// Accepts only a JSON object with a non-empty `steps` list; anything else is
/// `None`. `totalDistance` is trusted as-is when present and defaults to zero
/// when absent. `order` values from the provider are discarded (reassigned by
/// the post-processor downstream).
pub fn parse_route_payload(text: &str) -> Option<RouteResult> {
    let payload: ProviderPayload = match serde_json::from_str(strip_code_fence(text)) {
        Ok(payload) => payload,
        Err(err) => {
            tracing::debug!(error = %err, "external route payload did not decode");
            return None;
        }
    };

    if payload.steps.is_empty() {
        tracing::debug!("external route payload had no steps");
        return None;
    }

    let steps = payload
        .steps
        .into_iter()
        .map(|step| RouteStep {
            order: 0,
            cell_id: step.cell_id,
            products: step.products,
        })
        .collect();

    Some(RouteResult {
        steps,
        total_distance: payload.total_distance.unwrap_or(0.0),
        source: RouteSource::External,
    })
}

/// Models routinely wrap their JSON in a Markdown code fence; peel it off
/// before decoding.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderPayload {
    #[serde(default)]
    steps: Vec<ProviderStep>,
    #[serde(default)]
    total_distance: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderStep {
    cell_id: String,
    #[serde(default)]
    products: Vec<String>,
}
