//! Mock JWKS endpoint backed by wiremock.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path the identity provider publishes its key set under.
pub const JWKS_PATH: &str = "/.well-known/jwks.json";

/// Serve `keys` as a JWKS document at [`JWKS_PATH`].
pub async fn mount_jwks(server: &MockServer, keys: &[serde_json::Value]) {
    Mock::given(method("GET"))
        .and(path(JWKS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "keys": keys })))
        .mount(server)
        .await;
}

/// Full JWKS URL on a mock server.
pub fn jwks_url(server: &MockServer) -> String {
    format!("{}{JWKS_PATH}", server.uri())
}
