use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};

// Argon2id parameters for 50-150ms target latency
const ARGON2_M_COST: u32 = 19456; // 19 MB
const ARGON2_T_COST: u32 = 2;
const ARGON2_P_COST: u32 = 1;

/// Payload of the session cookie.
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: String, // user id
    exp: i64,
    iat: i64,
}

fn argon2() -> Result<Argon2<'static>, argon2::password_hash::Error> {
    let params = argon2::Params::new(ARGON2_M_COST, ARGON2_T_COST, ARGON2_P_COST, None)
        .map_err(argon2::password_hash::Error::from)?;
    Ok(Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params))
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = argon2()?.hash_password(password.as_bytes(), &salt)?;
    Ok(password_hash.to_string())
}

/// `Ok(false)` for a wrong password, `Err` only when `hash` is not a PHC string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    Ok(argon2()?
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub fn generate_token(
    user_id: i64,
    secret: &str,
    ttl_secs: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp();
    let claims = SessionClaims {
        sub: user_id.to_string(),
        exp: now + ttl_secs,
        iat: now,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
}

/// Returns the user id carried by a valid, unexpired token.
pub fn validate_token(token: &str, secret: &str) -> Result<i64, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 60;

    let token_data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )?;

    token_data
        .claims
        .sub
        .parse()
        .map_err(|_| jsonwebtoken::errors::ErrorKind::InvalidSubject.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_never_stores_cleartext() {
        let password = "rahasia_123";
        let hash = hash_password(password).unwrap();

        assert_ne!(hash, password);
        assert!(!hash.contains(password));
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_hash_password_is_salted() {
        let hash1 = hash_password("same_password").unwrap();
        let hash2 = hash_password("same_password").unwrap();

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password_correct_and_wrong() {
        let hash = hash_password("correct_password").unwrap();

        assert!(verify_password("correct_password", &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_verify_password_invalid_hash_format() {
        assert!(verify_password("password", "not_a_valid_hash").is_err());
    }

    #[test]
    fn test_verify_password_with_unicode() {
        let hash = hash_password("kata-sandi-ñ-密码").unwrap();
        assert!(verify_password("kata-sandi-ñ-密码", &hash).unwrap());
    }

    #[test]
    fn test_token_carries_user_id() {
        let token = generate_token(42, "secret", 3600).unwrap();

        assert_eq!(token.split('.').count(), 3);
        assert_eq!(validate_token(&token, "secret").unwrap(), 42);
    }

    #[test]
    fn test_validate_token_rejects_wrong_secret() {
        let token = generate_token(7, "correct_secret", 3600).unwrap();
        assert!(validate_token(&token, "wrong_secret").is_err());
    }

    #[test]
    fn test_validate_token_rejects_garbage() {
        assert!(validate_token("invalid.token.here", "secret").is_err());
    }

    #[test]
    fn test_validate_token_rejects_expired() {
        // Past expiry by more than the leeway
        let token = generate_token(7, "secret", -120).unwrap();
        assert!(validate_token(&token, "secret").is_err());
    }
}
