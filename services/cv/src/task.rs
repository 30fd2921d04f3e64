use crate::constants::{REQ_KEY_AVATAR_VIDEO, REQ_KEY_CREATE_ROLE};
use serde::Serialize;

/// One job creation payload for the signed visual service.
///
/// The `req_key` routes the job to a pipeline; the inputs are publicly
/// fetchable URLs, staged by the caller.
#[derive(Debug, Clone, Serialize)]
pub struct TaskRequest {
    /// Service routing key selecting the pipeline to run.
    pub req_key: String,
    /// URL of the input image.
    pub image_url: String,
    /// URL of the driving audio, required for animation jobs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

impl TaskRequest {
    /// Create a request with an explicit routing key.
    pub fn new(req_key: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            req_key: req_key.into(),
            image_url: image_url.into(),
            audio_url: None,
        }
    }

    /// Role identification: confirm the image carries a usable subject.
    pub fn create_role(image_url: impl Into<String>) -> Self {
        Self::new(REQ_KEY_CREATE_ROLE, image_url)
    }

    /// Avatar video generation: animate the subject with the given audio.
    pub fn avatar_video(image_url: impl Into<String>, audio_url: impl Into<String>) -> Self {
        let mut task = Self::new(REQ_KEY_AVATAR_VIDEO, image_url);
        task.audio_url = Some(audio_url.into());
        task
    }

    /// Set the driving audio URL.
    pub fn with_audio_url(mut self, audio_url: impl Into<String>) -> Self {
        self.audio_url = Some(audio_url.into());
        self
    }

    /// Whether this job identifies a role instead of rendering a video.
    pub(crate) fn is_role_task(&self) -> bool {
        self.req_key == REQ_KEY_CREATE_ROLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_without_empty_audio() {
        let task = TaskRequest::create_role("https://example.com/face.png");
        let json = serde_json::to_string(&task).expect("must serialize");
        assert_eq!(
            json,
            r#"{"req_key":"realman_avatar_picture_create_role_omni","image_url":"https://example.com/face.png"}"#
        );
    }

    #[test]
    fn test_serializes_with_audio() {
        let task = TaskRequest::avatar_video(
            "https://example.com/face.png",
            "https://example.com/voice.wav",
        );
        let json = serde_json::to_string(&task).expect("must serialize");
        assert!(json.contains(r#""audio_url":"https://example.com/voice.wav""#));
        assert!(!task.is_role_task());
    }
}
