use serde::{Deserialize, Serialize};

/// Payload of a bearer token issued by the identity provider. The subject is
/// an opaque identifier (e.g. `auth0|abc123`) used to scope all data access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user ID
    pub exp: usize,  // expires at (unix timestamp)
    pub iat: usize,  // issued at (unix timestamp)
    pub iss: String, // issuer
    pub aud: String, // audience
}
