use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub video_url: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateClipsRequest {
    pub video_url: Option<String>,
    #[serde(default)]
    pub video_topic: String,
    #[serde(default = "default_max_clips")]
    pub max_clips: u32,
    #[serde(default = "default_target_audience")]
    pub target_audience: String,
    #[serde(default = "default_tone")]
    pub tone: String,
    #[serde(default = "default_min_duration")]
    pub min_duration: u32,
    #[serde(default = "default_max_duration")]
    pub max_duration: u32,
}

fn default_max_clips() -> u32 {
    5
}

fn default_target_audience() -> String {
    "general".to_string()
}

fn default_tone() -> String {
    "friendly".to_string()
}

fn default_min_duration() -> u32 {
    30
}

fn default_max_duration() -> u32 {
    120
}

/// Normalized video metadata from the YouTube Data API.
#[derive(Serialize, Debug, Clone)]
pub struct VideoInfo {
    pub title: String,
    pub description: String,
    #[serde(rename = "duration")]
    pub duration_seconds: u64,
    pub channel_title: String,
    pub published_at: String,
}

/// A single AI-suggested clip, parsed from Gemini's structured output.
///
/// The attached response schema only requires title, subtitle, description
/// and hashtags; the timing fields come from the prompt's example shape and
/// are defaulted when the model leaves them out.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ClipSuggestion {
    #[serde(rename = "startTime", default)]
    pub start_time_seconds: u64,
    #[serde(rename = "duration", default)]
    pub duration_seconds: u64,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub reason: String,
}

#[derive(Serialize, Debug)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub topic: String,
    pub message: String,
    pub video_info: VideoSummary,
}

/// Abbreviated video info returned by the analyze endpoint.
#[derive(Serialize, Debug)]
pub struct VideoSummary {
    pub title: String,
    pub duration: u64,
    pub channel: String,
}

#[derive(Serialize, Debug)]
pub struct GenerateClipsResponse {
    pub success: bool,
    pub video_info: VideoInfo,
    pub clips: Vec<ClipSuggestion>,
    pub message: String,
}

/// Gemini returns either a bare array (matching the response schema) or an
/// object with a `clips` key (matching the prompt's example). Accept both.
#[derive(Deserialize)]
#[serde(untagged)]
enum ClipsPayload {
    Wrapped { clips: Vec<ClipSuggestion> },
    Bare(Vec<ClipSuggestion>),
}

pub fn parse_clip_suggestions(text: &str) -> Result<Vec<ClipSuggestion>, serde_json::Error> {
    serde_json::from_str::<ClipsPayload>(text).map(|payload| match payload {
        ClipsPayload::Wrapped { clips } => clips,
        ClipsPayload::Bare(clips) => clips,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clips_request_defaults() {
        let request: GenerateClipsRequest =
            serde_json::from_str(r#"{"videoUrl": "https://youtu.be/abc"}"#).unwrap();
        assert_eq!(request.video_url.as_deref(), Some("https://youtu.be/abc"));
        assert_eq!(request.video_topic, "");
        assert_eq!(request.max_clips, 5);
        assert_eq!(request.target_audience, "general");
        assert_eq!(request.tone, "friendly");
        assert_eq!(request.min_duration, 30);
        assert_eq!(request.max_duration, 120);
    }

    #[test]
    fn parses_wrapped_clips_object() {
        let text = r##"{
            "clips": [{
                "startTime": 42,
                "duration": 60,
                "title": "Big reveal",
                "subtitle": "You won't believe it",
                "description": "The moment everything changes.",
                "hashtags": ["#reveal", "#shorts"],
                "reason": "High emotional peak"
            }]
        }"##;
        let clips = parse_clip_suggestions(text).unwrap();
        assert_eq!(clips.len(), 1);
        assert_eq!(clips[0].start_time_seconds, 42);
        assert_eq!(clips[0].duration_seconds, 60);
        assert_eq!(clips[0].title, "Big reveal");
        assert_eq!(clips[0].hashtags, vec!["#reveal", "#shorts"]);
    }

    #[test]
    fn parses_bare_array_with_schema_fields_only() {
        let text = r##"[{
            "title": "Opening hook",
            "subtitle": "First 30 seconds",
            "description": "Strong opening statement.",
            "hashtags": ["#hook"]
        }]"##;
        let clips = parse_clip_suggestions(text).unwrap();
        assert_eq!(clips.len(), 1);
        assert_eq!(clips[0].start_time_seconds, 0);
        assert_eq!(clips[0].duration_seconds, 0);
        assert_eq!(clips[0].reason, "");
    }

    #[test]
    fn rejects_non_clip_json() {
        assert!(parse_clip_suggestions("not json at all").is_err());
        assert!(parse_clip_suggestions(r#"{"unexpected": true}"#).is_err());
    }
}
