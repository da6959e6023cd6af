//! In-process studio service.
//!
//! Serves the rendering/persistence routes without a network hop:
//! - `POST /api/generate-midi` renders an SMF and returns it base64-encoded
//! - `POST /api/save-composition` keeps the composition in memory
//! - `GET /api/load-composition?id=` returns a saved entry or the sample
//! - `GET /health` reports service status
//!
//! Bad input is answered with `success: false` and an error text, never with
//! a transport error.

use super::backend::{
    Backend, BackendError, BackendRequest, Method, GENERATE_PATH, HEALTH_PATH, LOAD_PATH,
    SAVE_PATH,
};
use super::messages::{
    GenerateReply, GenerateRequest, HealthReply, LoadReply, SaveReply, SaveRequest,
};
use super::render::render_smf;
use crate::session::DEFAULT_TEMPO;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;

/// Composition served when no saved entry matches.
pub const SAMPLE_COMPOSITION: &str = "C4 E4 G4 C5 | E4 G4 C5 E5";

/// Name of the sample composition.
const SAMPLE_NAME: &str = "Sample Composition";

/// Service name reported by the health route.
const SERVICE_NAME: &str = "Music Composer API";

/// A composition kept by the studio.
#[derive(Debug, Clone)]
struct StoredComposition {
    name: String,
    composition: String,
    tempo: u32,
}

/// Local stand-in for the rendering/persistence service.
#[derive(Debug, Default)]
pub struct LocalStudio {
    saved: Mutex<HashMap<String, StoredComposition>>,
}

impl LocalStudio {
    /// Creates a studio with nothing saved.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of saved compositions.
    pub fn saved_count(&self) -> usize {
        self.saved.lock().map(|saved| saved.len()).unwrap_or(0)
    }

    fn generate_midi(&self, body: Option<&str>, now: DateTime<Local>) -> GenerateReply {
        let request: GenerateRequest = match parse_body(body) {
            Ok(request) => request,
            Err(e) => return GenerateReply::failure(e),
        };

        match render_smf(&request.composition, request.tempo) {
            Ok(bytes) => GenerateReply {
                success: true,
                message: Some("MIDI generated successfully".to_string()),
                midi_data: Some(BASE64.encode(&bytes)),
                filename: Some(format!(
                    "composition_{}.mid",
                    now.format("%Y%m%d_%H%M%S")
                )),
                error: None,
            },
            Err(e) => {
                tracing::warn!(error = %e, "render failed");
                GenerateReply::failure(e.to_string())
            }
        }
    }

    fn save_composition(&self, body: Option<&str>, now: DateTime<Local>) -> SaveReply {
        let request: SaveRequest = match parse_body(body) {
            Ok(request) => request,
            Err(e) => return SaveReply::failure(e),
        };

        let id = format!("comp_{:.6}", now.timestamp_micros() as f64 / 1_000_000.0);
        let Ok(mut saved) = self.saved.lock() else {
            return SaveReply::failure("storage unavailable");
        };
        saved.insert(
            id.clone(),
            StoredComposition {
                name: request.name,
                composition: request.composition,
                tempo: DEFAULT_TEMPO,
            },
        );
        tracing::info!(id = %id, "composition stored");

        SaveReply {
            success: true,
            message: Some("Composition saved successfully".to_string()),
            id: Some(id),
            error: None,
        }
    }

    fn load_composition(&self, id: Option<&str>) -> LoadReply {
        let stored = id.and_then(|id| {
            self.saved
                .lock()
                .ok()
                .and_then(|saved| saved.get(id).cloned())
        });

        let stored = stored.unwrap_or_else(|| StoredComposition {
            name: SAMPLE_NAME.to_string(),
            composition: SAMPLE_COMPOSITION.to_string(),
            tempo: DEFAULT_TEMPO,
        });

        LoadReply {
            success: true,
            composition: Some(stored.composition),
            name: Some(stored.name),
            tempo: Some(stored.tempo),
            error: None,
        }
    }

    fn route(&self, request: &BackendRequest) -> Result<String, BackendError> {
        let now = Local::now();
        match (request.method, request.path.as_str()) {
            (Method::Post, GENERATE_PATH) => {
                encode(&self.generate_midi(request.body.as_deref(), now))
            }
            (Method::Post, SAVE_PATH) => {
                encode(&self.save_composition(request.body.as_deref(), now))
            }
            (Method::Get, LOAD_PATH) => encode(&self.load_composition(request.query_value("id"))),
            (Method::Get, HEALTH_PATH) => encode(&HealthReply {
                status: "healthy".to_string(),
                service: SERVICE_NAME.to_string(),
            }),
            (method, path) => Err(BackendError::NotFound {
                method,
                path: path.to_string(),
            }),
        }
    }
}

/// Parses a JSON request body, describing any problem as text.
fn parse_body<T: serde::de::DeserializeOwned>(body: Option<&str>) -> Result<T, String> {
    let body = body.ok_or_else(|| "missing request body".to_string())?;
    serde_json::from_str(body).map_err(|e| e.to_string())
}

fn encode<T: Serialize>(reply: &T) -> Result<String, BackendError> {
    Ok(serde_json::to_string(reply)?)
}

impl Backend for LocalStudio {
    async fn call(&self, request: &BackendRequest) -> Result<String, BackendError> {
        tracing::debug!(method = %request.method, path = %request.path, "local studio request");
        self.route(request)
    }
}
