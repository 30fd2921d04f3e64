//! Constants shared across the token service family.

// Env values used by credential providers.
/// Environment variable carrying the API key.
pub const ARK_API_KEY: &str = "ARK_API_KEY";
/// Environment variable pointing at an API key file.
pub const ARK_API_KEY_FILE: &str = "ARK_API_KEY_FILE";

/// Default API endpoint for the content generation service.
pub const DEFAULT_ENDPOINT: &str = "https://ark.cn-beijing.volces.com/api/v3";

/// Path of the job collection under the endpoint.
pub const TASKS_PATH: &str = "/contents/generations/tasks";

pub(crate) const CONTENT_TYPE_JSON: &str = "application/json";
