//! Session token issuance and verification
//!
//! Tokens are compact HS256 JWTs carrying `user_id`, `exp` and `iat`.
//! Verification is a pure function of the token bytes, the server secret and
//! the clock: nothing is stored server-side and there is no revocation.
//!
//! The checks run in a fixed order so that each failure has one reason:
//!
//! 1. shape: three non-empty base64url segments, else [`TokenError::Malformed`]
//! 2. HMAC over the raw `header.payload` text, else [`TokenError::BadSignature`]
//! 3. header and payload decoding, else [`TokenError::Malformed`]
//! 4. `user_id` and `exp` present and integral, else `MissingClaim` / `InvalidClaim`
//! 5. `now < exp`, else [`TokenError::Expired`]

use super::error::TokenError;
use chrono::{DateTime, Utc};
use jsonwebtoken::{
    crypto, decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Session token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated user
    pub user_id: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp); informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

/// Payload as found on the wire, before integer validation
#[derive(Deserialize)]
struct RawClaims {
    user_id: Option<Value>,
    exp: Option<Value>,
    iat: Option<Value>,
}

/// Signing keys derived once from the server secret
#[derive(Clone)]
struct SigningKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl SigningKeys {
    fn new(secret: &[u8]) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret)),
            decoding: Arc::new(DecodingKey::from_secret(secret)),
        }
    }
}

/// Issues and verifies session tokens
///
/// Holds the secret-derived keys and the token lifetime, both fixed at
/// construction. Cloning shares the keys, so one instance can be handed to
/// every request task.
#[derive(Clone)]
pub struct TokenService {
    keys: SigningKeys,
    lifetime: Duration,
    lifetime_secs: i64,
    validation: Arc<Validation>,
}

impl TokenService {
    /// Create a token service from the raw server secret
    ///
    /// Call this once at startup and store it in `AppState`.
    pub fn new(secret: &[u8], lifetime: Duration) -> Self {
        // Expiry is enforced below without leeway
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();

        Self {
            keys: SigningKeys::new(secret),
            lifetime,
            lifetime_secs: i64::try_from(lifetime.as_secs()).unwrap_or(i64::MAX),
            validation: Arc::new(validation),
        }
    }

    /// Configured token lifetime
    #[inline]
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issue a token for a user, expiring one lifetime from now
    #[inline]
    pub fn issue_token(&self, user_id: i64) -> Result<String, TokenError> {
        self.issue_token_at(user_id, Utc::now())
    }

    /// Issue a token as if the current time were `now`
    ///
    /// Both `iat` and `exp` are whole seconds truncated from `now`, so the
    /// token is never accepted at or after issuance plus the lifetime.
    pub fn issue_token_at(&self, user_id: i64, now: DateTime<Utc>) -> Result<String, TokenError> {
        let issued_at = now.timestamp();

        let claims = Claims {
            user_id,
            exp: issued_at.saturating_add(self.lifetime_secs),
            iat: Some(issued_at),
        };

        encode(&Header::new(ALGORITHM), &claims, &self.keys.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify a token and return the user id it asserts
    ///
    /// The id is not checked against the user store.
    #[inline]
    pub fn verify_token(&self, token: &str) -> Result<i64, TokenError> {
        self.verify_token_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`
    #[inline]
    pub fn verify_token_at(&self, token: &str, now: DateTime<Utc>) -> Result<i64, TokenError> {
        self.decode_claims_at(token, now).map(|claims| claims.user_id)
    }

    /// Verify a token and return all of its validated claims
    pub fn decode_claims_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let (message, signature) = split_compact(token)?;

        let signature_ok =
            crypto::verify(signature, message.as_bytes(), &self.keys.decoding, ALGORITHM)
                .map_err(|_| TokenError::Malformed)?;
        if !signature_ok {
            return Err(TokenError::BadSignature);
        }

        let raw = decode::<RawClaims>(token, &self.keys.decoding, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed,
            })?
            .claims;

        let claims = Claims {
            user_id: integer_claim("user_id", raw.user_id)?,
            exp: integer_claim("exp", raw.exp)?,
            iat: raw.iat.as_ref().and_then(Value::as_i64),
        };

        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

/// Split a compact token into its signed message and signature segment
fn split_compact(token: &str) -> Result<(&str, &str), TokenError> {
    let mut segments = token.split('.');
    match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(header), Some(payload), Some(signature), None)
            if is_base64url(header) && is_base64url(payload) && is_base64url(signature) =>
        {
            let message_len = header.len() + 1 + payload.len();
            Ok((&token[..message_len], signature))
        }
        _ => Err(TokenError::Malformed),
    }
}

fn is_base64url(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Read a claim that must be an integer within `i64` range
///
/// Floats (even `42.0`), strings and out-of-range numbers are rejected
/// rather than coerced.
fn integer_claim(name: &'static str, value: Option<Value>) -> Result<i64, TokenError> {
    match value {
        None | Some(Value::Null) => Err(TokenError::MissingClaim(name)),
        Some(Value::Number(number)) => number.as_i64().ok_or(TokenError::InvalidClaim(name)),
        Some(_) => Err(TokenError::InvalidClaim(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    const SECRET: &[u8] = b"test-secret";

    fn create_test_service() -> TokenService {
        TokenService::new(SECRET, Duration::from_secs(3600))
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    /// Sign an arbitrary payload with the test secret
    fn sign_payload(payload: &Value) -> String {
        encode(&Header::new(ALGORITHM), payload, &EncodingKey::from_secret(SECRET)).unwrap()
    }

    #[test]
    fn test_issue_and_verify() {
        let service = create_test_service();

        let token = service.issue_token(42).unwrap();
        assert_eq!(service.verify_token(&token), Ok(42));
    }

    #[test]
    fn test_user_id_beyond_32_bits() {
        let service = create_test_service();

        let token = service.issue_token(9_999_999_999).unwrap();
        assert_eq!(service.verify_token(&token), Ok(9_999_999_999));
    }

    #[test]
    fn test_claims_carry_expiry_and_issue_time() {
        let service = create_test_service();
        let now = at(1_700_000_000);

        let token = service.issue_token_at(7, now).unwrap();
        let claims = service.decode_claims_at(&token, now).unwrap();

        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.exp, 1_700_000_000 + 3600);
        assert_eq!(claims.iat, Some(1_700_000_000));
    }

    #[test]
    fn test_fractional_issue_time_truncates_expiry() {
        let service = create_test_service();
        let now = Utc.timestamp_opt(1_700_000_000, 999_000_000).unwrap();

        let token = service.issue_token_at(7, now).unwrap();
        let claims = service.decode_claims_at(&token, now).unwrap();

        assert_eq!(claims.exp, 1_700_000_000 + 3600);
        assert_eq!(claims.iat, Some(1_700_000_000));
    }

    #[test]
    fn test_expired_just_after_lifetime_from_fractional_issue() {
        let service = TokenService::new(SECRET, Duration::from_secs(60));
        let issued = Utc.timestamp_opt(1_000, 200_000_000).unwrap();
        let token = service.issue_token_at(7, issued).unwrap();

        let after_lifetime = Utc.timestamp_opt(1_060, 500_000_000).unwrap();
        assert_eq!(
            service.verify_token_at(&token, after_lifetime),
            Err(TokenError::Expired)
        );
        assert_eq!(
            service.verify_token_at(&token, Utc.timestamp_opt(1_059, 900_000_000).unwrap()),
            Ok(7)
        );
    }

    #[test]
    fn test_token_expires_exactly_at_exp() {
        let service = TokenService::new(SECRET, Duration::from_secs(60));
        let issued = 1_700_000_000;
        let token = service.issue_token_at(1, at(issued)).unwrap();

        assert_eq!(service.verify_token_at(&token, at(issued + 59)), Ok(1));
        assert_eq!(
            service.verify_token_at(&token, at(issued + 60)),
            Err(TokenError::Expired)
        );
        assert_eq!(
            service.verify_token_at(&token, at(issued + 86_400)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_token_expires_after_sleeping_past_lifetime() {
        let service = TokenService::new(b"secret", Duration::from_secs(1));

        let issued = Utc::now();
        let token = service.issue_token_at(42, issued).unwrap();
        assert_eq!(service.verify_token_at(&token, issued), Ok(42));

        std::thread::sleep(Duration::from_secs(2));

        assert_eq!(service.verify_token(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_tokens_for_same_user_expire_independently() {
        let service = TokenService::new(SECRET, Duration::from_secs(60));
        let early = service.issue_token_at(5, at(1_000)).unwrap();
        let late = service.issue_token_at(5, at(1_030)).unwrap();

        assert_eq!(service.verify_token_at(&early, at(1_060)), Err(TokenError::Expired));
        assert_eq!(service.verify_token_at(&late, at(1_060)), Ok(5));
    }

    #[test]
    fn test_wrong_secret_is_bad_signature() {
        let issuer = TokenService::new(b"secret-one", Duration::from_secs(3600));
        let verifier = TokenService::new(b"secret-two", Duration::from_secs(3600));

        let token = issuer.issue_token(1).unwrap();
        assert_eq!(verifier.verify_token(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_every_single_character_flip_is_bad_signature() {
        let service = create_test_service();
        let token = service.issue_token(123).unwrap();

        for (index, original) in token.char_indices() {
            if original == '.' {
                continue;
            }
            let replacement = if original == 'A' { 'B' } else { 'A' };
            let mut tampered = token.clone();
            tampered.replace_range(index..index + 1, &replacement.to_string());

            assert_eq!(
                service.verify_token(&tampered),
                Err(TokenError::BadSignature),
                "flip at byte {} was not caught",
                index
            );
        }
    }

    #[test]
    fn test_token_is_header_safe() {
        let service = create_test_service();
        let token = service.issue_token(i64::MIN).unwrap();

        assert_eq!(token.matches('.').count(), 2);
        assert!(token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b'.'));
    }

    #[rstest]
    #[case("")]
    #[case("invalid")]
    #[case("invalid.token")]
    #[case("a.b.c.d")]
    #[case("a..c")]
    #[case(".b.c")]
    #[case("a.b.")]
    #[case("a b.c.d")]
    #[case("Bearer x.y.z")]
    #[case("aGVhZGVy.cGF5bG9hZA==.c2ln")]
    fn test_malformed_tokens(#[case] token: &str) {
        let service = create_test_service();
        assert_eq!(service.verify_token(token), Err(TokenError::Malformed));
    }

    #[test]
    fn test_random_segments_are_bad_signature() {
        let service = create_test_service();
        let result = service.verify_token("invalid.token.here");
        assert_eq!(result, Err(TokenError::BadSignature));
    }

    #[test]
    fn test_signed_garbage_payload_is_malformed() {
        let service = create_test_service();
        let token = sign_payload(&json!("not an object"));
        assert_eq!(service.verify_token(&token), Err(TokenError::Malformed));
    }

    #[rstest]
    #[case(json!({"exp": 4_000_000_000i64}), TokenError::MissingClaim("user_id"))]
    #[case(json!({"user_id": null, "exp": 4_000_000_000i64}), TokenError::MissingClaim("user_id"))]
    #[case(json!({"user_id": 1}), TokenError::MissingClaim("exp"))]
    #[case(json!({"user_id": 42.0, "exp": 4_000_000_000i64}), TokenError::InvalidClaim("user_id"))]
    #[case(json!({"user_id": 42.5, "exp": 4_000_000_000i64}), TokenError::InvalidClaim("user_id"))]
    #[case(json!({"user_id": "42", "exp": 4_000_000_000i64}), TokenError::InvalidClaim("user_id"))]
    #[case(
        json!({"user_id": u64::MAX, "exp": 4_000_000_000i64}),
        TokenError::InvalidClaim("user_id")
    )]
    #[case(json!({"user_id": 1, "exp": "tomorrow"}), TokenError::InvalidClaim("exp"))]
    #[case(json!({"user_id": 1, "exp": 1.5e9}), TokenError::InvalidClaim("exp"))]
    fn test_claim_validation(#[case] payload: Value, #[case] expected: TokenError) {
        let service = create_test_service();
        let token = sign_payload(&payload);
        assert_eq!(service.verify_token_at(&token, at(1_700_000_000)), Err(expected));
    }

    #[test]
    fn test_extra_claims_are_tolerated() {
        let service = create_test_service();
        let token = sign_payload(&json!({
            "user_id": 77,
            "exp": 4_000_000_000i64,
            "aud": "someone-else",
            "role": "admin",
            "iat": "not a number"
        }));

        assert_eq!(service.verify_token_at(&token, at(1_700_000_000)), Ok(77));
    }

    #[test]
    fn test_other_algorithm_is_rejected() {
        let service = create_test_service();
        let token = encode(
            &Header::new(Algorithm::HS512),
            &json!({"user_id": 1, "exp": 4_000_000_000i64}),
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert!(service.verify_token(&token).is_err());
    }

    #[test]
    fn test_service_is_clone_cheap() {
        let service = create_test_service();
        let cloned = service.clone(); // Should be cheap due to Arc

        let token = service.issue_token(3).unwrap();
        assert_eq!(cloned.verify_token(&token), Ok(3));
        assert_eq!(cloned.lifetime(), Duration::from_secs(3600));
    }

    #[test]
    fn test_concurrent_use_without_locking() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TokenService>();

        let service = create_test_service();
        let handles: Vec<_> = (0..8i64)
            .map(|worker| {
                let service = service.clone();
                std::thread::spawn(move || {
                    for n in 0..50i64 {
                        let user_id = worker * 1_000 + n;
                        let token = service.issue_token(user_id).unwrap();
                        assert_eq!(service.verify_token(&token), Ok(user_id));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }

    proptest! {
        #[test]
        fn prop_round_trip_any_user_id(
            user_id in any::<i64>(),
            lifetime_secs in 1u64..10_000_000,
            issued in 0i64..4_000_000_000
        ) {
            let service = TokenService::new(SECRET, Duration::from_secs(lifetime_secs));
            let token = service.issue_token_at(user_id, at(issued)).unwrap();

            prop_assert_eq!(service.verify_token_at(&token, at(issued)), Ok(user_id));
        }

        #[test]
        fn prop_expired_after_lifetime(
            user_id in any::<i64>(),
            lifetime_secs in 1u64..100_000,
            extra in 0i64..100_000
        ) {
            let service = TokenService::new(SECRET, Duration::from_secs(lifetime_secs));
            let issued = 1_700_000_000;
            let token = service.issue_token_at(user_id, at(issued)).unwrap();
            let later = issued + lifetime_secs as i64 + extra;

            prop_assert_eq!(service.verify_token_at(&token, at(later)), Err(TokenError::Expired));
        }

        #[test]
        fn prop_distinct_secrets_do_not_verify(
            // Zero bytes are excluded: HMAC pads short keys with zeros
            first in proptest::collection::vec(1u8..=255, 1..64),
            second in proptest::collection::vec(1u8..=255, 1..64)
        ) {
            prop_assume!(first != second);
            let issuer = TokenService::new(&first, Duration::from_secs(60));
            let verifier = TokenService::new(&second, Duration::from_secs(60));
            let token = issuer.issue_token(1).unwrap();

            prop_assert_eq!(verifier.verify_token(&token), Err(TokenError::BadSignature));
        }
    }
}
