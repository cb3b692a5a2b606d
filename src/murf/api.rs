use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest<'a> {
    pub voice_id: &'a str,
    pub text: &'a str,
    pub format: &'static str,
    pub channel_type: &'static str,
    pub sample_rate: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub audio_file: Option<String>,
}
