use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::gemini::GeminiClient;
use crate::models::{
    parse_clip_suggestions, AnalyzeRequest, AnalyzeResponse, GenerateClipsRequest,
    GenerateClipsResponse, VideoInfo, VideoSummary,
};
use crate::youtube::{extract_video_id, YouTubeClient};

/// Shared application state: provider clients built once at startup and
/// injected into the handlers.
#[derive(Clone)]
pub struct AppState {
    pub youtube: Arc<YouTubeClient>,
    pub gemini: Arc<GeminiClient>,
    pub analyze_model: String,
    pub clips_model: String,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            youtube: Arc::new(YouTubeClient::with_base_url(
                &config.youtube_api_key,
                &config.youtube_base_url,
            )),
            gemini: Arc::new(GeminiClient::with_base_url(
                &config.gemini_api_key,
                &config.gemini_base_url,
            )),
            analyze_model: config.analyze_model.clone(),
            clips_model: config.clips_model.clone(),
        }
    }
}

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/", post(analyze_video).options(preflight))
        .route("/analyze-video", post(analyze_video).options(preflight))
        .route(
            "/generate-video-clips",
            post(generate_video_clips).options(preflight),
        )
        .fallback(endpoint_not_found)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .with_state(state)
}

// Pre-flight probe: empty success with permissive CORS headers, no business
// logic involved.
async fn preflight() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
            (header::ACCESS_CONTROL_MAX_AGE, "3600"),
        ],
    )
}

async fn endpoint_not_found() -> ApiError {
    ApiError::not_found("Endpoint not found")
}

/// `POST /analyze-video`: resolve the video and ask Gemini for its topic.
async fn analyze_video(
    State(state): State<AppState>,
    body: Option<Json<AnalyzeRequest>>,
) -> ApiResult<Json<AnalyzeResponse>> {
    let video_url = body
        .and_then(|Json(request)| request.video_url)
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| ApiError::validation("videoUrl is required"))?;

    let video_id = extract_video_id(&video_url)
        .ok_or_else(|| ApiError::validation("not a valid YouTube URL"))?;
    let video_info = state.youtube.fetch_video_info(video_id).await?;

    let prompt = analyze_prompt(&video_info);
    let topic = state
        .gemini
        .generate(&prompt, false, &state.analyze_model)
        .await?;
    let topic = topic.trim().to_string();

    tracing::info!(video_id, "analyzed video");

    Ok(Json(AnalyzeResponse {
        success: true,
        message: format!("Analysis complete. Video topic: {topic}"),
        video_info: VideoSummary {
            title: video_info.title,
            duration: video_info.duration_seconds,
            channel: video_info.channel_title,
        },
        topic,
    }))
}

/// `POST /generate-video-clips`: resolve the video and ask Gemini for
/// schema-constrained clip suggestions.
async fn generate_video_clips(
    State(state): State<AppState>,
    body: Option<Json<GenerateClipsRequest>>,
) -> ApiResult<Json<GenerateClipsResponse>> {
    let Some(Json(request)) = body else {
        return Err(ApiError::validation("request body is required"));
    };
    let video_url = request
        .video_url
        .as_deref()
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| ApiError::validation("videoUrl is required"))?;

    let video_id = extract_video_id(video_url)
        .ok_or_else(|| ApiError::validation("not a valid YouTube URL"))?;
    let video_info = state.youtube.fetch_video_info(video_id).await?;

    let prompt = clips_prompt(&video_info, &request);
    let text = state
        .gemini
        .generate(&prompt, true, &state.clips_model)
        .await?;

    let clips = parse_clip_suggestions(&text)
        .map_err(|e| ApiError::parse(format!("clip suggestions were not valid JSON: {e}")))?;

    tracing::info!(video_id, count = clips.len(), "generated clip suggestions");

    Ok(Json(GenerateClipsResponse {
        success: true,
        message: format!("Generated {} clip suggestions", clips.len()),
        video_info,
        clips,
    }))
}

fn analyze_prompt(info: &VideoInfo) -> String {
    format!(
        "Analyze the content of the following YouTube video and extract its main \
         theme or topic as a short phrase.\n\n\
         Video title: {}\n\
         Video description: {}...\n\
         Channel name: {}\n\
         Video length: {} seconds\n\n\
         Answer with a short phrase such as \"Kitten growth diary\", \
         \"Kyoto sightseeing guide\" or \"Introduction to programming\".",
        info.title,
        truncate_chars(&info.description, 500),
        info.channel_title,
        info.duration_seconds,
    )
}

// Example shape shown to the model; the hard constraint is the response
// schema attached in structured mode.
const CLIPS_JSON_FORMAT: &str = r#"{
  "clips": [
    {
      "startTime": <start time in seconds>,
      "duration": <length in seconds>,
      "title": "catchy title",
      "subtitle": "subtitle",
      "description": "description in two or three sentences",
      "hashtags": ["hashtag1", "hashtag2", "hashtag3"],
      "reason": "why this clip was chosen"
    }
  ]
}"#;

fn clips_prompt(info: &VideoInfo, request: &GenerateClipsRequest) -> String {
    format!(
        "Analyze the following YouTube video and identify the best moments for \
         producing short clips for social media.\n\n\
         Video information:\n\
         - Title: {}\n\
         - Description: {}...\n\
         - Length: {} seconds\n\
         - Channel: {}\n\
         - Topic: {}\n\n\
         Requirements:\n\
         - Number of clips: {}\n\
         - Target audience: {}\n\
         - Tone: {}\n\
         - Clip length: {}-{} seconds\n\n\
         Respond in the following JSON format:\n{CLIPS_JSON_FORMAT}",
        info.title,
        truncate_chars(&info.description, 1000),
        info.duration_seconds,
        info.channel_title,
        request.video_topic,
        request.max_clips,
        request.target_audience,
        request.tone,
        request.min_duration,
        request.max_duration,
    )
}

// Truncation on a character boundary; descriptions are arbitrary UTF-8.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
