//! Render/persistence gateway.
//!
//! Translates session state into backend requests and backend replies into
//! session updates and status messages. Generate, save and load all follow
//! the same shape:
//!
//! 1. Check the pre-condition; on failure report and send nothing
//! 2. Send the request and await the reply
//! 3. Branch on the reply's `success` flag, separately from transport faults
//! 4. Update the session and post a status message
//!
//! All three share [`GatewayError`], so callers can treat them uniformly.

mod backend;
mod error;
mod http;
mod local;
mod messages;
mod render;
mod studio;

pub use backend::{
    Backend, BackendError, BackendRequest, Method, GENERATE_PATH, HEALTH_PATH, LOAD_PATH,
    SAVE_PATH,
};
pub use error::GatewayError;
pub use http::HttpBackend;
pub use local::{LocalStudio, SAMPLE_COMPOSITION};
pub use messages::{
    GenerateReply, GenerateRequest, HealthReply, LoadReply, SaveReply, SaveRequest,
};
pub use render::{render_smf, RenderError};
pub use studio::Studio;

use crate::session::{DownloadArtifact, Session};
use crate::status::StatusNotifier;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Confirmation of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReceipt {
    /// Name the composition was saved under.
    pub name: String,
    /// Identifier assigned by the service, if it returned one.
    pub id: Option<String>,
}

/// Gateway between a session and a backend.
pub struct Gateway<B> {
    backend: B,
    status: StatusNotifier,
}

impl<B: Backend> Gateway<B> {
    /// Creates a gateway reporting to `status`.
    pub fn new(backend: B, status: StatusNotifier) -> Self {
        Self { backend, status }
    }

    /// Returns the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Requests a MIDI rendering of the session's composition.
    ///
    /// On success the returned filename becomes the session's download
    /// artifact. A blank composition is rejected without a request.
    pub async fn generate(&self, session: &mut Session) -> Result<DownloadArtifact, GatewayError> {
        if session.composition.is_blank() {
            return Err(self.fail(GatewayError::Validation(
                "Please enter a composition first".to_string(),
            )));
        }

        self.status.success("Generating MIDI file...");
        let request = GenerateRequest {
            composition: session.composition.text().to_string(),
            tempo: session.tempo,
        };

        let result = self
            .post::<_, GenerateReply>(GENERATE_PATH, &request)
            .await
            .and_then(|reply| {
                if !reply.success {
                    return Err(GatewayError::rejected(reply.error));
                }
                let filename = reply
                    .filename
                    .ok_or_else(|| GatewayError::missing_field("filename"))?;
                Ok(DownloadArtifact { filename })
            });

        match result {
            Ok(artifact) => {
                tracing::info!(filename = %artifact.filename, "MIDI generated");
                session.artifact = Some(artifact.clone());
                self.status.success("MIDI generated successfully!");
                Ok(artifact)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Saves the session's composition under `name`.
    ///
    /// `None` or an empty name means the user declined to name it: nothing
    /// is sent, nothing is reported, and `Ok(None)` is returned.
    pub async fn save(
        &self,
        session: &Session,
        name: Option<&str>,
    ) -> Result<Option<SaveReceipt>, GatewayError> {
        let Some(name) = name.filter(|name| !name.is_empty()) else {
            tracing::debug!("save declined");
            return Ok(None);
        };

        if session.composition.is_blank() {
            return Err(self.fail(GatewayError::Validation(
                "Cannot save empty composition".to_string(),
            )));
        }

        let request = SaveRequest {
            composition: session.composition.text().to_string(),
            name: name.to_string(),
        };

        let result = self
            .post::<_, SaveReply>(SAVE_PATH, &request)
            .await
            .and_then(|reply| {
                if reply.success {
                    Ok(reply.id)
                } else {
                    Err(GatewayError::rejected(reply.error))
                }
            });

        match result {
            Ok(id) => {
                tracing::info!(name, ?id, "composition saved");
                self.status.success("Composition saved successfully!");
                Ok(Some(SaveReceipt {
                    name: name.to_string(),
                    id,
                }))
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Loads composition `id`, replacing the session's text and tempo.
    ///
    /// The caret moves to the end of the loaded text. On any failure the
    /// session is left untouched.
    pub async fn load(&self, session: &mut Session, id: &str) -> Result<(), GatewayError> {
        let request = BackendRequest::get(LOAD_PATH).with_query("id", id);

        let result = self
            .send::<LoadReply>(request)
            .await
            .and_then(|reply| {
                if !reply.success {
                    return Err(GatewayError::rejected(reply.error));
                }
                let composition = reply
                    .composition
                    .ok_or_else(|| GatewayError::missing_field("composition"))?;
                let tempo = reply
                    .tempo
                    .ok_or_else(|| GatewayError::missing_field("tempo"))?;
                if tempo == 0 {
                    return Err(GatewayError::Network(
                        "malformed reply: tempo must be positive".to_string(),
                    ));
                }
                Ok((composition, tempo))
            });

        match result {
            Ok((composition, tempo)) => {
                tracing::info!(id, tempo, "composition loaded");
                session.replace(composition, tempo);
                self.status.success("Composition loaded successfully!");
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Queries the service health route. Posts no status.
    pub async fn health(&self) -> Result<HealthReply, GatewayError> {
        self.send(BackendRequest::get(HEALTH_PATH)).await
    }

    async fn post<Req, Rep>(&self, path: &str, body: &Req) -> Result<Rep, GatewayError>
    where
        Req: Serialize,
        Rep: DeserializeOwned,
    {
        let body = serde_json::to_string(body)?;
        self.send(BackendRequest::post(path, body)).await
    }

    async fn send<Rep: DeserializeOwned>(&self, request: BackendRequest) -> Result<Rep, GatewayError> {
        tracing::debug!(method = %request.method, path = %request.path, "dispatching");
        let raw = self.backend.call(&request).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Reports a failure on the status slot and hands it back.
    fn fail(&self, e: GatewayError) -> GatewayError {
        tracing::warn!(error = %e, "gateway request failed");
        self.status.error(e.to_string());
        e
    }
}
