use serde::{Deserialize, Serialize};

/// Request for `Embed`: one or more input strings to turn into vectors.
#[derive(Serialize, Deserialize, Default, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EmbedRequest {
    pub model: String,
    pub input: Vec<String>,
}

impl EmbedRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            input: Vec::new(),
        }
    }

    pub fn add_input(mut self, input: impl Into<String>) -> Self {
        self.input.push(input.into());
        self
    }
}

#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Embedding {
    #[serde(default)]
    pub embedding: Vec<f32>,
}

/// Response for `Embed`. Embeddings are returned in input order.
#[derive(Serialize, Deserialize, Default, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EmbedResponse {
    #[serde(default)]
    pub embeddings: Vec<Embedding>,
}
