use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Claims carried by a staff session token.
///
/// Tokens are minted by the identity provider in front of this API; both
/// sides share the secret and this claims shape.
#[derive(Debug, Serialize, Deserialize)]
pub struct StaffClaims {
    /// Staff member identifier.
    pub sub: String,
    /// Expiration timestamp.
    pub exp: usize,
}

/// Sign a staff session token. Used by tests and by deployments where the
/// identity provider delegates minting to this binary.
pub fn sign(staff_id: &str, secret: &str) -> Result<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::days(7))
        .expect("valid timestamp")
        .timestamp();

    let claims = StaffClaims {
        sub: staff_id.to_owned(),
        exp: expiration as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Verify and decode a staff session token.
pub fn verify(token: &str, secret: &str) -> Result<StaffClaims> {
    let token_data = decode::<StaffClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_verify_round_trip() {
        let token = sign("staff-1", "test secret").unwrap();
        let claims = verify(&token, "test secret").unwrap();
        assert_eq!(claims.sub, "staff-1");
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let token = sign("staff-1", "test secret").unwrap();
        assert!(verify(&token, "other secret").is_err());
    }

    #[test]
    fn verify_rejects_garbage() {
        assert!(verify("not-a-token", "test secret").is_err());
    }
}
