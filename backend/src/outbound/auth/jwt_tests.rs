//! Tests for the jsonwebtoken verifier.

use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;

const SECRET: &str = "test-secret-with-enough-entropy";

fn settings(issuer: Option<&str>, audience: Option<&str>) -> JwtSettings {
    JwtSettings {
        key: JwtKey::Hs256 {
            secret: SECRET.to_owned(),
        },
        issuer: issuer.map(str::to_owned),
        audience: audience.map(str::to_owned),
        leeway_secs: 0,
    }
}

fn sign(claims: &Value, secret: &str) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("token encodes")
}

fn in_one_hour() -> i64 {
    Utc::now().timestamp() + 3_600
}

#[fixture]
fn verifier() -> JwtTokenVerifier {
    JwtTokenVerifier::new(settings(Some("https://issuer.test"), Some("karte")))
        .expect("verifier builds")
}

#[rstest]
fn valid_token_yields_subject(verifier: JwtTokenVerifier) {
    let token = sign(
        &json!({
            "sub": "auth0|abc",
            "iss": "https://issuer.test",
            "aud": "karte",
            "exp": in_one_hour(),
        }),
        SECRET,
    );

    let subject = verifier.verify(&token).expect("token verifies");
    assert_eq!(subject.as_ref(), "auth0|abc");
}

#[rstest]
fn wrong_secret_is_an_invalid_signature(verifier: JwtTokenVerifier) {
    let token = sign(
        &json!({
            "sub": "auth0|abc",
            "iss": "https://issuer.test",
            "aud": "karte",
            "exp": in_one_hour(),
        }),
        "another-secret",
    );

    assert_eq!(
        verifier.verify(&token),
        Err(TokenVerificationError::InvalidSignature)
    );
}

#[rstest]
fn expired_token_is_rejected(verifier: JwtTokenVerifier) {
    let token = sign(
        &json!({
            "sub": "auth0|abc",
            "iss": "https://issuer.test",
            "aud": "karte",
            "exp": Utc::now().timestamp() - 600,
        }),
        SECRET,
    );

    assert_eq!(verifier.verify(&token), Err(TokenVerificationError::Expired));
}

#[rstest]
#[case::issuer(json!({"sub": "s", "iss": "https://other.test", "aud": "karte"}))]
#[case::audience(json!({"sub": "s", "iss": "https://issuer.test", "aud": "elsewhere"}))]
#[case::subject(json!({"iss": "https://issuer.test", "aud": "karte"}))]
#[case::blank_subject(json!({"sub": "  ", "iss": "https://issuer.test", "aud": "karte"}))]
fn claim_mismatches_are_invalid_claims(verifier: JwtTokenVerifier, #[case] mut claims: Value) {
    claims["exp"] = json!(in_one_hour());
    let token = sign(&claims, SECRET);

    assert!(matches!(
        verifier.verify(&token),
        Err(TokenVerificationError::InvalidClaims { .. })
    ));
}

#[rstest]
fn garbage_is_malformed(verifier: JwtTokenVerifier) {
    assert_eq!(
        verifier.verify("not-a-jwt"),
        Err(TokenVerificationError::Malformed)
    );
}

#[rstest]
fn unconfigured_issuer_and_audience_are_not_checked() {
    let verifier = JwtTokenVerifier::new(settings(None, None)).expect("verifier builds");
    let token = sign(
        &json!({"sub": "s", "iss": "anyone", "aud": "anything", "exp": in_one_hour()}),
        SECRET,
    );

    assert!(verifier.verify(&token).is_ok());
}

#[rstest]
fn empty_secret_is_refused() {
    let mut settings = settings(None, None);
    settings.key = JwtKey::Hs256 {
        secret: " ".to_owned(),
    };
    assert_eq!(
        JwtTokenVerifier::new(settings).err(),
        Some(JwtSetupError::EmptySecret)
    );
}

#[rstest]
fn unreadable_pem_is_refused() {
    let settings = JwtSettings {
        key: JwtKey::Rs256 {
            public_key_pem: "not a pem".to_owned(),
        },
        issuer: None,
        audience: None,
        leeway_secs: 0,
    };
    assert!(matches!(
        JwtTokenVerifier::new(settings),
        Err(JwtSetupError::InvalidPublicKey { .. })
    ));
}
