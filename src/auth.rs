use std::future::{ready, Ready};

use actix_web::http::header::HeaderMap;
use actix_web::{dev, FromRequest, HttpRequest};
use chrono::LocalResult::Single;
use chrono::{DateTime, Duration, TimeZone, Utc};
use hmac::{Hmac, Mac};
use jwt::{SignWithKey, VerifyWithKey};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::errors::AuthenticationError;
use crate::model::{User, UserRole};

static JWT_KEY: Lazy<Hmac<Sha256>> = Lazy::new(|| {
    Hmac::new_from_slice(
        std::env::var("JWT_SECRET")
            .expect("A JWT_SECRET is mandatory")
            .as_bytes(),
    )
    .unwrap()
});

/// Represent an authenticated user, extracted from a JWT Bearer token
#[derive(Debug, Deserialize, Serialize)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub login: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn from_user(user: &User) -> Self {
        AuthenticatedUser {
            id: user.id,
            login: user.username.clone(),
            role: user.role.clone(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// JWT claims
#[derive(Debug, Deserialize, Serialize)]
struct Claims {
    user: AuthenticatedUser,
    exp: i64,
}

impl FromRequest for AuthenticatedUser {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        ready(extract_authenticated_user(req))
    }
}

/// Extract the authenticated user from the request
fn extract_authenticated_user(req: &HttpRequest) -> Result<AuthenticatedUser, AuthenticationError> {
    let header_value = extract_value_authentication_header(req.headers())?;

    let mut split_header = header_value.split_whitespace();
    let scheme = split_header.next().unwrap_or_default();
    let token = split_header.next().ok_or_else(|| {
        AuthenticationError::Unauthorized("Invalid Authorization header value".into())
    })?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthenticationError::UnknownAuthScheme);
    }

    verify_jwt(token)
}

/// Extract the authentication string from the header
fn extract_value_authentication_header(headers: &HeaderMap) -> Result<&str, AuthenticationError> {
    let token: &str = match headers.get("Authorization") {
        None => {
            return Err(AuthenticationError::Unauthorized(
                "Missing Authorization header value".into(),
            ))
        }
        Some(header) => header.to_str().map_err(|x| {
            AuthenticationError::Unauthorized(format!("Invalid Authentication header value: {}", x))
        })?,
    };

    Ok(token)
}

/// Generate a JWT for the given user
pub fn get_jwt(user: &User) -> Result<String, AuthenticationError> {
    let utc: DateTime<Utc> = Utc::now() + Duration::minutes(15);
    let authenticated_user = AuthenticatedUser::from_user(user);

    let claims = Claims {
        user: authenticated_user,
        exp: utc.timestamp(),
    };

    Ok(claims.sign_with_key(&(*JWT_KEY))?)
}

/// The login embedded in a refresh token of the form `user.{login}.{uuid}`.
/// The login itself may contain dots, so only the fixed prefix and the
/// trailing uuid are stripped.
pub fn extract_login_from_refresh_token(token: &str) -> &str {
    token
        .strip_prefix("user.")
        .and_then(|rest| rest.rsplit_once('.'))
        .map(|(login, _uuid)| login)
        .unwrap_or_default()
}

fn verify_jwt(token: &str) -> Result<AuthenticatedUser, AuthenticationError> {
    let claims: Claims = token.verify_with_key(&(*JWT_KEY))?;

    let date = if let Single(t) = Utc.timestamp_opt(claims.exp, 0) {
        t
    } else {
        return Err(AuthenticationError::ExpiredToken);
    };

    if date.lt(&Utc::now()) {
        return Err(AuthenticationError::ExpiredToken);
    }
    Ok(claims.user)
}

#[cfg(test)]
mod tests {
    use speculoos::prelude::*;

    use super::*;

    fn some_user() -> User {
        User {
            id: 42,
            username: String::from("major-tom"),
            password: String::from("whatever"),
            role: UserRole::Basic,
        }
    }

    #[test]
    fn jwt_round_trip() {
        std::env::set_var("JWT_SECRET", "ground-control");

        let token = get_jwt(&some_user()).unwrap();
        let user = verify_jwt(&token).unwrap();

        assert_that!(user.id).is_equal_to(42);
        assert_that!(user.login).is_equal_to(String::from("major-tom"));
        assert_that!(user.is_admin()).is_false();
    }

    #[test]
    fn expired_jwt_is_rejected() {
        std::env::set_var("JWT_SECRET", "ground-control");

        let claims = Claims {
            user: AuthenticatedUser::from_user(&some_user()),
            exp: (Utc::now() - Duration::minutes(1)).timestamp(),
        };
        let token = claims.sign_with_key(&(*JWT_KEY)).unwrap();

        assert!(matches!(
            verify_jwt(&token),
            Err(AuthenticationError::ExpiredToken)
        ));
    }

    #[test]
    fn tampered_jwt_is_rejected() {
        std::env::set_var("JWT_SECRET", "ground-control");

        let mut token = get_jwt(&some_user()).unwrap();
        token.push('a');

        assert!(matches!(
            verify_jwt(&token),
            Err(AuthenticationError::InvalidJwt(_))
        ));
    }

    #[test]
    fn refresh_token_login_extraction() {
        let login = extract_login_from_refresh_token("user.major-tom.some-uuid");

        assert_that!(login).is_equal_to("major-tom");
    }

    #[test]
    fn refresh_token_login_extraction_keeps_dots_in_the_login() {
        let login = extract_login_from_refresh_token("user.john.doe.0c6f2a44-some-uuid");

        assert_that!(login).is_equal_to("john.doe");
    }

    #[test]
    fn malformed_refresh_token_yields_no_login() {
        assert_that!(extract_login_from_refresh_token("garbage")).is_equal_to("");
        assert_that!(extract_login_from_refresh_token("user.")).is_equal_to("");
    }
}
