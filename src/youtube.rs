//! YouTube URL parsing and metadata lookup.

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::models::VideoInfo;

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

static VIDEO_ID_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([^&\n?#]+)")
            .unwrap(),
        Regex::new(r"youtube\.com/v/([^&\n?#]+)").unwrap(),
    ]
});

/// Pull the video identifier out of a YouTube URL, trying the known URL
/// shapes in order. Returns `None` when nothing matches.
pub fn extract_video_id(url: &str) -> Option<&str> {
    VIDEO_ID_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(url))
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

// Matches the remainder after the "PT" marker: optional hour, minute and
// second components, integers only.
static DURATION_COMPONENTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?$").unwrap());

/// Convert an ISO-8601 duration string like "PT1H2M10S" into total seconds.
///
/// A string without the "PT" marker yields zero. Anything after the marker
/// that is not integer H/M/S components (including fractional seconds) is a
/// parse error rather than a silent zero.
pub fn parse_iso8601_duration(raw: &str) -> ApiResult<u64> {
    let Some(rest) = raw.strip_prefix("PT") else {
        return Ok(0);
    };

    let captures = DURATION_COMPONENTS
        .captures(rest)
        .ok_or_else(|| ApiError::parse(format!("unrecognized duration string: {raw:?}")))?;

    let component = |index: usize| -> ApiResult<u64> {
        match captures.get(index) {
            Some(m) => m
                .as_str()
                .parse::<u32>()
                .map(u64::from)
                .map_err(|e| ApiError::parse(format!("invalid duration component in {raw:?}: {e}"))),
            None => Ok(0),
        }
    };

    Ok(component(1)? * 3600 + component(2)? * 60 + component(3)?)
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    items: Option<Vec<ApiVideo>>,
}

#[derive(Debug, Deserialize)]
struct ApiVideo {
    snippet: Option<ApiSnippet>,
    #[serde(rename = "contentDetails")]
    content_details: Option<ApiContentDetails>,
}

#[derive(Debug, Deserialize)]
struct ApiSnippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "channelTitle", default)]
    channel_title: String,
    #[serde(rename = "publishedAt", default)]
    published_at: String,
}

#[derive(Debug, Deserialize)]
struct ApiContentDetails {
    duration: String,
}

/// Thin client for the YouTube Data API v3 `videos.list` endpoint.
pub struct YouTubeClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl YouTubeClient {
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    /// Look up a video by ID and map the snippet and content details into a
    /// normalized [`VideoInfo`].
    pub async fn fetch_video_info(&self, video_id: &str) -> ApiResult<VideoInfo> {
        let url = format!("{}/videos", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("part", "snippet,contentDetails"),
                ("id", video_id),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::provider(format!(
                "YouTube API returned {status}: {body}"
            )));
        }

        let listing: VideoListResponse = response.json().await?;
        let video = listing
            .items
            .into_iter()
            .flatten()
            .next()
            .ok_or_else(|| ApiError::not_found(format!("no video found for id {video_id}")))?;

        let snippet = video
            .snippet
            .ok_or_else(|| ApiError::provider("video response missing snippet"))?;
        let details = video
            .content_details
            .ok_or_else(|| ApiError::provider("video response missing content details"))?;

        Ok(VideoInfo {
            title: snippet.title,
            description: snippet.description,
            duration_seconds: parse_iso8601_duration(&details.duration)?,
            channel_title: snippet.channel_title,
            published_at: snippet.published_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_id_from_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=abc123"),
            Some("abc123")
        );
    }

    #[test]
    fn extracts_id_from_short_url() {
        assert_eq!(
            extract_video_id("https://youtu.be/xyz789"),
            Some("xyz789")
        );
    }

    #[test]
    fn extracts_id_from_embed_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn extracts_id_from_v_url() {
        assert_eq!(
            extract_video_id("https://youtube.com/v/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn strips_query_parameters_from_id() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=abc123&t=42s"),
            Some("abc123")
        );
    }

    #[test]
    fn rejects_non_youtube_input() {
        assert_eq!(extract_video_id("not a url"), None);
        assert_eq!(extract_video_id("https://vimeo.com/12345"), None);
    }

    #[test]
    fn parses_full_duration() {
        assert_eq!(parse_iso8601_duration("PT1H2M10S").unwrap(), 3722);
    }

    #[test]
    fn parses_seconds_only() {
        assert_eq!(parse_iso8601_duration("PT45S").unwrap(), 45);
    }

    #[test]
    fn parses_hours_and_seconds() {
        assert_eq!(parse_iso8601_duration("PT2H5S").unwrap(), 7205);
    }

    #[test]
    fn bare_marker_is_zero() {
        assert_eq!(parse_iso8601_duration("PT").unwrap(), 0);
    }

    #[test]
    fn missing_marker_is_zero() {
        assert_eq!(parse_iso8601_duration("1H2M").unwrap(), 0);
        assert_eq!(parse_iso8601_duration("").unwrap(), 0);
    }

    #[test]
    fn malformed_segment_is_an_error() {
        assert!(parse_iso8601_duration("PTxS").is_err());
        assert!(parse_iso8601_duration("PT1H2X").is_err());
    }

    #[test]
    fn fractional_seconds_are_rejected() {
        assert!(parse_iso8601_duration("PT1.5S").is_err());
    }
}
