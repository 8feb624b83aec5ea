use serde::{Deserialize, Serialize};

/// Request for `Transcribe`: a URL to some audio (WAV and MP3 are commonly supported).
#[derive(Serialize, Deserialize, Default, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TranscribeRequest {
    pub model: String,
    pub audio_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl TranscribeRequest {
    pub fn new(model: impl Into<String>, audio_url: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            audio_url: audio_url.into(),
            language: None,
        }
    }
}

/// A single transcribed word with its position in the audio, in seconds.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TranscribedWord {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub start: f32,
    #[serde(default)]
    pub end: f32,
}

/// Response for `Transcribe`.
#[derive(Serialize, Deserialize, Default, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TranscribeResponse {
    /// The full transcription as one block of text.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub words: Vec<TranscribedWord>,
}
