//! Constants shared across the signed service family.

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

// Headers used by the signing scheme.
pub(crate) const X_DATE: &str = "x-date";
pub(crate) const CONTENT_TYPE_JSON: &str = "application/json";

// Env values used by credential providers.
/// Environment variable carrying the access key id.
pub const VOLC_ACCESS_KEY_ID: &str = "VOLC_ACCESS_KEY_ID";
/// Environment variable carrying the secret access key.
pub const VOLC_SECRET_ACCESS_KEY: &str = "VOLC_SECRET_ACCESS_KEY";
/// Environment variable pointing at a key file.
pub const VOLC_KEY_FILE: &str = "VOLC_KEY_FILE";

// Key file line prefixes.
pub(crate) const KEY_FILE_ACCESS_KEY: &str = "AccessKeyId:";
pub(crate) const KEY_FILE_SECRET_KEY: &str = "SecretAccessKey:";

/// Default API endpoint for the visual generation service.
pub const DEFAULT_ENDPOINT: &str = "https://visual.volcengineapi.com";
/// Default signing region.
pub const DEFAULT_REGION: &str = "cn-north-1";
/// Service name bound into the signing scope.
pub const SIGNING_SERVICE: &str = "cv";

/// Action selecting job creation.
pub const SUBMIT_ACTION: &str = "CVSubmitTask";
/// Action selecting status retrieval.
pub const RESULT_ACTION: &str = "CVGetResult";
/// API version sent with every action.
pub const API_VERSION: &str = "2022-08-31";

/// Routing key for role identification jobs.
pub const REQ_KEY_CREATE_ROLE: &str = "realman_avatar_picture_create_role_omni";
/// Routing key for avatar video generation jobs.
pub const REQ_KEY_AVATAR_VIDEO: &str = "realman_avatar_picture_omni_v2";

/// AsciiSet for canonical query encoding.
///
/// Every byte except the unreserved characters 'A'-'Z', 'a'-'z', '0'-'9',
/// '-', '.', '_' and '~' is escaped; space encodes as `%20`, never `+`.
pub static QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
