// src/speech.rs

use crate::config::SpeechConfig;
use crate::errors::ServerError;
use reqwest::blocking::Client;
use serde::Serialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const OUTPUT_FORMAT: &str = "mp3_44100_128";

#[derive(Serialize)]
struct TtsPayload<'a> {
    text: &'a str,
    model_id: &'a str,
    output_format: &'a str,
}

/// Proxy for the ElevenLabs streaming text-to-speech endpoint.
pub struct SpeechClient {
    cfg: SpeechConfig,
    client: Client,
}

impl SpeechClient {
    pub fn new(cfg: &SpeechConfig) -> Result<Self, ServerError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ServerError::Config(format!("speech client: {e}")))?;

        Ok(Self {
            cfg: cfg.clone(),
            client,
        })
    }

    /// Synthesize `text` to MP3 bytes.
    pub fn synthesize(&self, text: &str) -> Result<Vec<u8>, ServerError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ServerError::BadRequest("text required".into()));
        }
        if self.cfg.api_key.is_empty() || self.cfg.voice_id.is_empty() {
            return Err(ServerError::BadRequest(
                "ELEVEN_API_KEY and ELEVEN_VOICE_ID must be set".into(),
            ));
        }

        let url = format!(
            "{}/v1/text-to-speech/{}/stream",
            self.cfg.base_url, self.cfg.voice_id
        );
        let payload = TtsPayload {
            text,
            model_id: &self.cfg.model_id,
            output_format: OUTPUT_FORMAT,
        };

        let resp = self
            .client
            .post(&url)
            .header("xi-api-key", &self.cfg.api_key)
            .header("Content-Type", "application/json")
            .header("Accept", "audio/mpeg")
            .json(&payload)
            .send()
            .map_err(|e| ServerError::Upstream(format!("tts request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().unwrap_or_else(|_| "(no body)".to_string());
            return Err(ServerError::Upstream(format!(
                "tts API error: {status} - {body}"
            )));
        }

        resp.bytes()
            .map(|b| b.to_vec())
            .map_err(|e| ServerError::Upstream(format!("tts body unreadable: {e}")))
    }
}
