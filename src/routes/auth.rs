use actix_web::{post, web, HttpResponse};
use anyhow::{anyhow, Context};
use deadpool_redis::{redis::cmd, Pool};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth;
use crate::common::password::verify_password;
use crate::common::users::get_user_by_username;
use crate::errors::AuthenticationError;
use crate::model::User;
use crate::routes::ApiError;
use crate::startup::AppState;

/// Refresh tokens live for 5 days
const REFRESH_TOKEN_TTL_SECONDS: usize = 60 * 60 * 24 * 5;

#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    login: String,
    password: Secret<String>,
}

#[derive(Deserialize, Debug)]
pub struct RefreshRequest {
    token: Secret<String>,
}

#[post("/auth/login")]
#[tracing::instrument(skip(login, app_state, redis_pool), fields(login = %login.login))]
pub async fn login(
    login: web::Json<LoginRequest>,
    app_state: web::Data<AppState>,
    redis_pool: web::Data<Pool>,
) -> Result<HttpResponse, ApiError> {
    let user = check_and_get_user(&app_state, &login.login, &login.password).await?;

    let access_token = auth::get_jwt(&user)?;
    let refresh_token = format!("user.{}.{}", &user.username, Uuid::new_v4());

    let mut redis = redis_pool.get().await?;
    cmd("SETEX")
        .arg(&refresh_token)
        .arg(REFRESH_TOKEN_TTL_SECONDS)
        .arg(1)
        .query_async::<_, ()>(&mut redis)
        .await?;

    Ok(HttpResponse::Ok()
        .json(json!({"access_token": access_token, "refresh_token": refresh_token})))
}

#[post("/auth/refresh")]
#[tracing::instrument(skip_all)]
pub async fn refresh_auth(
    refresh_token: web::Json<RefreshRequest>,
    app_state: web::Data<AppState>,
    redis_pool: web::Data<Pool>,
) -> Result<HttpResponse, ApiError> {
    let mut redis = redis_pool.get().await?;

    let token = refresh_token.token.expose_secret();
    let token_exists = cmd("EXISTS")
        .arg(token)
        .query_async::<_, bool>(&mut redis)
        .await?;

    if token_exists {
        let user_login = auth::extract_login_from_refresh_token(token);
        let user = get_user_by_username(&app_state.db, user_login)
            .await
            .context("Could not get user")?
            .ok_or_else(|| anyhow!("Unknown user"))?;
        /* Create a new JWT */
        let access_token = auth::get_jwt(&user)?;

        Ok(HttpResponse::Ok().json(json!({ "access_token": access_token })))
    } else {
        Ok(HttpResponse::Unauthorized().finish())
    }
}

/// Retrieve a user and check its credentials
async fn check_and_get_user(
    app_state: &AppState,
    username: &str,
    password: &Secret<String>,
) -> Result<User, ApiError> {
    let user = get_user_by_username(&app_state.db, username)
        .await?
        .ok_or_else(|| {
            ApiError::AuthenticationError(AuthenticationError::Unauthorized(
                "Invalid credentials".into(),
            ))
        })?;

    if !verify_password(&user.password, password) {
        return Err(ApiError::AuthenticationError(
            AuthenticationError::Unauthorized("Invalid credentials".into()),
        ));
    }

    Ok(user)
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(login);
    cfg.service(refresh_auth);
}

#[cfg(test)]
mod tests {
    use secrecy::Secret;
    use speculoos::prelude::*;
    use sqlx::PgPool;

    use crate::common::users::create_user;
    use crate::model::UserRole;

    use super::*;

    #[sqlx::test]
    async fn credentials_are_verified_against_the_stored_user(pool: PgPool) {
        create_user(
            &pool,
            "major-tom",
            &Secret::new(String::from("ground-control")),
            UserRole::Basic,
        )
        .await
        .unwrap();
        let app_state = AppState { db: pool };

        let user = check_and_get_user(
            &app_state,
            "major-tom",
            &Secret::new(String::from("ground-control")),
        )
        .await
        .unwrap();
        assert_that!(user.username).is_equal_to(String::from("major-tom"));

        let wrong_password = check_and_get_user(
            &app_state,
            "major-tom",
            &Secret::new(String::from("space-oddity")),
        )
        .await;
        assert!(matches!(
            wrong_password,
            Err(ApiError::AuthenticationError(_))
        ));

        let unknown_user = check_and_get_user(
            &app_state,
            "ziggy",
            &Secret::new(String::from("ground-control")),
        )
        .await;
        assert!(matches!(
            unknown_user,
            Err(ApiError::AuthenticationError(_))
        ));
    }
}
