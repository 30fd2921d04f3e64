use serde::Serialize;

/// One job creation payload for the token service family.
///
/// A job is a model identifier plus an ordered content list: a text prompt
/// followed by one or two frame images.
#[derive(Debug, Clone, Serialize)]
pub struct TaskRequest {
    /// Model identifier to run.
    pub model: String,
    /// Ordered content parts describing the job.
    pub content: Vec<ContentPart>,
}

impl TaskRequest {
    /// Image-to-video generation from a prompt and a first frame.
    ///
    /// Render options are folded into the prompt text the way the service
    /// expects them.
    pub fn image_to_video(
        model: impl Into<String>,
        prompt: &str,
        options: &RenderOptions,
        first_frame_url: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            content: vec![
                ContentPart::text(options.format_prompt(prompt)),
                ContentPart::image_url(first_frame_url),
            ],
        }
    }

    /// Append an end frame image.
    pub fn with_end_frame(mut self, url: impl Into<String>) -> Self {
        self.content.push(ContentPart::image_url(url));
        self
    }

    /// Append an arbitrary content part.
    pub fn with_content(mut self, part: ContentPart) -> Self {
        self.content.push(part);
        self
    }
}

/// One entry of a job's content list.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Text prompt, with render flags folded in.
    Text {
        /// Prompt text.
        text: String,
    },
    /// Reference to an input image.
    ImageUrl {
        /// The image location.
        image_url: ImageUrl,
        /// Optional role tag, like `first_frame` or `last_frame`.
        #[serde(skip_serializing_if = "Option::is_none")]
        role: Option<String>,
    },
}

impl ContentPart {
    /// Create a text part.
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    /// Create an image part.
    pub fn image_url(url: impl Into<String>) -> Self {
        ContentPart::ImageUrl {
            image_url: ImageUrl { url: url.into() },
            role: None,
        }
    }

    /// Tag an image part with a role.
    pub fn with_role(self, role: impl Into<String>) -> Self {
        match self {
            ContentPart::ImageUrl { image_url, .. } => ContentPart::ImageUrl {
                image_url,
                role: Some(role.into()),
            },
            part => part,
        }
    }
}

/// Wrapper object the wire format uses for image locations.
#[derive(Debug, Clone, Serialize)]
pub struct ImageUrl {
    /// The image URL.
    pub url: String,
}

/// Render parameters folded into the prompt text as `--flag value` pairs.
///
/// The service reads these flags from the text part rather than from
/// dedicated fields; a negative seed means "let the service pick one" and
/// is omitted.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Output resolution, like `1080p`.
    pub resolution: Option<String>,
    /// Clip duration in seconds.
    pub duration_secs: Option<u32>,
    /// Keep the camera fixed.
    pub camera_fixed: Option<bool>,
    /// Seed; negative values are omitted.
    pub seed: Option<i64>,
}

impl RenderOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output resolution.
    pub fn with_resolution(mut self, resolution: impl Into<String>) -> Self {
        self.resolution = Some(resolution.into());
        self
    }

    /// Set the clip duration in seconds.
    pub fn with_duration_secs(mut self, duration_secs: u32) -> Self {
        self.duration_secs = Some(duration_secs);
        self
    }

    /// Set the camera-fixed flag.
    pub fn with_camera_fixed(mut self, camera_fixed: bool) -> Self {
        self.camera_fixed = Some(camera_fixed);
        self
    }

    /// Set the seed.
    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Fold the options into the prompt text.
    pub fn format_prompt(&self, prompt: &str) -> String {
        let mut text = prompt.trim().to_string();

        if let Some(resolution) = &self.resolution {
            text.push_str(&format!(" --resolution {resolution}"));
        }
        if let Some(duration) = self.duration_secs {
            text.push_str(&format!(" --duration {duration}"));
        }
        if let Some(camera_fixed) = self.camera_fixed {
            text.push_str(&format!(" --camerafixed {camera_fixed}"));
        }
        if let Some(seed) = self.seed {
            if seed >= 0 {
                text.push_str(&format!(" --seed {seed}"));
            }
        }

        text.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_prompt_with_all_flags() {
        let options = RenderOptions::new()
            .with_resolution("1080p")
            .with_duration_secs(5)
            .with_camera_fixed(false)
            .with_seed(42);

        assert_eq!(
            options.format_prompt("a fox jumps over a frozen lake"),
            "a fox jumps over a frozen lake --resolution 1080p --duration 5 --camerafixed false --seed 42"
        );
    }

    #[test]
    fn test_format_prompt_omits_negative_seed() {
        let options = RenderOptions::new().with_resolution("720p").with_seed(-1);

        assert_eq!(
            options.format_prompt("city timelapse"),
            "city timelapse --resolution 720p"
        );
    }

    #[test]
    fn test_format_prompt_empty_prompt() {
        let options = RenderOptions::new().with_duration_secs(10);
        assert_eq!(options.format_prompt(""), "--duration 10");
    }

    #[test]
    fn test_task_request_wire_shape() {
        let task = TaskRequest::image_to_video(
            "gen-video-pro",
            "a fox",
            &RenderOptions::new(),
            "https://example.com/first.png",
        )
        .with_end_frame("https://example.com/last.png");

        let json = serde_json::to_value(&task).expect("must serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "model": "gen-video-pro",
                "content": [
                    {"type": "text", "text": "a fox"},
                    {"type": "image_url", "image_url": {"url": "https://example.com/first.png"}},
                    {"type": "image_url", "image_url": {"url": "https://example.com/last.png"}},
                ]
            })
        );
    }

    #[test]
    fn test_content_part_role_tag() {
        let part = ContentPart::image_url("https://example.com/last.png").with_role("last_frame");
        let json = serde_json::to_value(&part).expect("must serialize");
        assert_eq!(json["role"], "last_frame");
    }
}
