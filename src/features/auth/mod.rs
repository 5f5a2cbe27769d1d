mod error_conversions;
pub(crate) mod error_responses;
pub mod extractor;
pub mod google;
pub mod jwt;
pub mod password;

pub use extractor::CurrentUser;
pub use google::{GoogleOAuth, GoogleUser, PendingAuthorization};
pub use jwt::{DEFAULT_TOKEN_TTL_MINUTES, TokenIssuer};
