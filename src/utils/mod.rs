pub mod json;
pub mod session;

pub use json::JsonBody;
pub use session::{OAuthSessionState, store_oauth_state, take_oauth_state};
