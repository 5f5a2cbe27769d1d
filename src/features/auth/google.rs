//! Google sign-in through the OAuth 2.0 authorization code flow with PKCE.
//!
//! [`GoogleOAuth::authorize_url`] produces the redirect target together with
//! the CSRF state and PKCE verifier; the caller keeps both in the session.
//! [`GoogleOAuth::exchange_code`] trades the code for an access token and
//! reads the user's profile from the userinfo endpoint.

use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use serde::Deserialize;

use crate::config::GoogleSettings;
use crate::data::models::AuthError;

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// Profile returned by Google's userinfo endpoint.
#[derive(Debug, Deserialize)]
pub struct GoogleUser {
    pub email: String,
    #[serde(default)]
    pub verified_email: bool,
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// Authorization request waiting for its callback.
pub struct PendingAuthorization {
    pub url: String,
    pub csrf_state: String,
    pub pkce_verifier: String,
}

/// OAuth client type with auth URL and token URL set.
type ConfiguredClient = oauth2::Client<
    oauth2::basic::BasicErrorResponse,
    oauth2::basic::BasicTokenResponse,
    oauth2::basic::BasicTokenIntrospectionResponse,
    oauth2::StandardRevocableToken,
    oauth2::basic::BasicRevocationErrorResponse,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

pub struct GoogleOAuth {
    client: ConfiguredClient,
    http: reqwest::Client,
}

impl GoogleOAuth {
    pub fn new(settings: &GoogleSettings) -> Result<Self, AuthError> {
        let invalid = |e: oauth2::url::ParseError| AuthError::OAuthProvider(e.to_string());

        let client = BasicClient::new(ClientId::new(settings.client_id.clone()))
            .set_client_secret(ClientSecret::new(settings.client_secret.clone()))
            .set_auth_uri(AuthUrl::new(AUTH_URL.to_string()).map_err(invalid)?)
            .set_token_uri(TokenUrl::new(TOKEN_URL.to_string()).map_err(invalid)?)
            .set_redirect_uri(RedirectUrl::new(settings.redirect_uri.clone()).map_err(invalid)?);

        // The token endpoint must not be followed through redirects.
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| AuthError::OAuthProvider(e.to_string()))?;

        Ok(Self { client, http })
    }

    pub fn authorize_url(&self) -> PendingAuthorization {
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let (url, csrf_state) = self
            .client
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new("openid".to_string()))
            .add_scope(Scope::new("email".to_string()))
            .add_scope(Scope::new("profile".to_string()))
            .set_pkce_challenge(pkce_challenge)
            .url();

        PendingAuthorization {
            url: url.to_string(),
            csrf_state: csrf_state.secret().clone(),
            pkce_verifier: pkce_verifier.secret().clone(),
        }
    }

    pub async fn exchange_code(
        &self,
        code: &str,
        pkce_verifier: String,
    ) -> Result<GoogleUser, AuthError> {
        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .set_pkce_verifier(PkceCodeVerifier::new(pkce_verifier))
            .request_async(&self.http)
            .await
            .map_err(|e| AuthError::OAuthProvider(format!("Token exchange failed: {}", e)))?;

        let profile: GoogleUser = self
            .http
            .get(USERINFO_URL)
            .bearer_auth(token.access_token().secret())
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| AuthError::OAuthProvider(e.to_string()))?
            .json()
            .await
            .map_err(|e| AuthError::OAuthProvider(e.to_string()))?;

        if !profile.verified_email {
            log::warn!("Google account {} has an unverified email", profile.email);
            return Err(AuthError::OAuthProvider("Email address is not verified".into()));
        }

        Ok(profile)
    }
}
