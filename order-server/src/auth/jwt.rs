//! JWT verification service
//!
//! Verifies actor tokens issued by the identity collaborator. Claims
//! carry the actor's role, scopes, and the set of restaurants the actor
//! may act for; the tenant resolver checks claimed restaurant ids
//! against that set.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Shared secret (at least 32 bytes)
    pub secret: String,
    /// Token issuer
    pub issuer: String,
    /// Token audience
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: load_jwt_secret(),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "identity-service".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "order-server".to_string()),
        }
    }
}

/// Load the JWT secret from the environment
///
/// Development builds generate a random throwaway secret when
/// `JWT_SECRET` is missing; production builds refuse to start.
fn load_jwt_secret() -> String {
    match std::env::var("JWT_SECRET") {
        Ok(secret) if secret.len() >= 32 => secret,
        Ok(_) => {
            #[cfg(debug_assertions)]
            {
                tracing::warn!("JWT_SECRET is too short, generating a temporary key");
                generate_secure_secret()
            }
            #[cfg(not(debug_assertions))]
            {
                panic!("JWT_SECRET must be at least 32 characters long");
            }
        }
        Err(_) => {
            #[cfg(debug_assertions)]
            {
                tracing::warn!("JWT_SECRET not set, generating a temporary key for development");
                generate_secure_secret()
            }
            #[cfg(not(debug_assertions))]
            {
                panic!("JWT_SECRET environment variable must be set in production");
            }
        }
    }
}

/// Generate a printable random secret (development only)
#[cfg(debug_assertions)]
fn generate_secure_secret() -> String {
    use ring::rand::{SecureRandom, SystemRandom};

    const ALPHABET: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";
    let rng = SystemRandom::new();
    let mut bytes = [0u8; 48];
    if rng.fill(&mut bytes).is_err() {
        // SystemRandom failure leaves no safe fallback for a signing key
        panic!("Failed to generate JWT secret from system RNG");
    }
    bytes
        .iter()
        .map(|b| ALPHABET[(*b as usize) % ALPHABET.len()] as char)
        .collect()
}

/// JWT claims stored in the token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Actor id (subject)
    pub sub: String,
    /// Display name
    pub name: String,
    /// Role name
    pub role: String,
    /// Scope list (comma separated), e.g. `orders:submit,orders:kitchen`
    pub scopes: String,
    /// Permitted restaurant ids (comma separated)
    pub restaurants: String,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued-at timestamp
    pub iat: i64,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
}

/// JWT errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    ExpiredToken,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("token generation failed: {0}")]
    GenerationFailed(String),
}

/// JWT verification service
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    /// Create a service with the default (env-driven) configuration
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    /// Create a service with an explicit configuration
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Verify and decode a token
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Issue a token (dev tooling and tests; production issuance lives
    /// in the identity collaborator)
    pub fn generate_token(
        &self,
        actor_id: &str,
        name: &str,
        role: &str,
        scopes: &[String],
        restaurants: &[String],
        ttl_minutes: i64,
    ) -> Result<String, JwtError> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: actor_id.to_string(),
            name: name.to_string(),
            role: role.to_string(),
            scopes: scopes.join(","),
            restaurants: restaurants.join(","),
            exp: (now + chrono::Duration::minutes(ttl_minutes)).timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Extract the bearer token from an Authorization header value
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// The authenticated actor behind the current request
///
/// Created by the auth extractor from verified [`Claims`] and passed to
/// handlers. Carries everything authorization checks need; identity
/// verification itself happened at token issuance.
#[derive(Debug, Clone)]
pub struct CurrentActor {
    /// Actor id
    pub id: String,
    /// Display name
    pub name: String,
    /// Role name
    pub role: String,
    /// Scope list
    pub scopes: Vec<String>,
    /// Permitted restaurant ids
    pub restaurants: Vec<String>,
}

impl From<Claims> for CurrentActor {
    fn from(claims: Claims) -> Self {
        let split = |s: &str| -> Vec<String> {
            if s.is_empty() {
                vec![]
            } else {
                s.split(',').map(|p| p.trim().to_string()).collect()
            }
        };
        Self {
            id: claims.sub,
            name: claims.name,
            role: claims.role,
            scopes: split(&claims.scopes),
            restaurants: split(&claims.restaurants),
        }
    }
}

impl CurrentActor {
    /// Whether the actor has the admin role (all scopes)
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    /// Check a scope, with wildcard support
    ///
    /// `orders:*` matches `orders:kitchen`, `orders:cancel`, etc.
    pub fn has_scope(&self, scope: &str) -> bool {
        if self.is_admin() {
            return true;
        }
        self.scopes.iter().any(|s| {
            if s == scope {
                return true;
            }
            if let Some(prefix) = s.strip_suffix(":*") {
                scope.starts_with(&format!("{}:", prefix))
            } else {
                false
            }
        })
    }

    /// Whether the actor may act for the given restaurant
    pub fn permits_restaurant(&self, restaurant_id: &str) -> bool {
        self.restaurants.iter().any(|r| r == restaurant_id)
    }
}
