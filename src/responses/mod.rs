pub mod audio;
pub mod cors;
pub mod errors;
pub mod etag;
pub mod json;

pub use errors::{error_to_response, ResultResp};

// Normal JSON responses
pub use audio::audio_response;
pub use cors::{apply_cors, preflight_response};
pub use json::{json_response, json_response_with_etag};
