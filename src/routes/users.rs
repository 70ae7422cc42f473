use std::env;

use actix_web::{get, post, web, HttpResponse};
use secrecy::Secret;
use serde::Deserialize;
use serde_json::json;

use crate::auth::AuthenticatedUser;
use crate::common::users;
use crate::errors::AuthenticationError;
use crate::model::{PageParameters, UserRole};
use crate::routes::ApiError;
use crate::startup::AppState;

#[derive(Debug, Deserialize)]
pub struct NewUserRequest {
    username: String,
    password: Secret<String>,
    role: UserRole,
}

#[post("/users")]
#[tracing::instrument(skip(app_state, new_user))]
async fn new_user(
    new_user: web::Json<NewUserRequest>,
    app_state: web::Data<AppState>,
    user: Option<AuthenticatedUser>,
) -> Result<HttpResponse, ApiError> {
    let admin = user.map(|x| x.is_admin()).unwrap_or(false);
    let allow_account_creation = env::var("ALLOW_ACCOUNT_CREATION")
        .map(|x| x.parse().unwrap_or_default())
        .unwrap_or_default();

    if allow_account_creation || admin {
        let data = new_user.into_inner();

        if data.role == UserRole::Admin && !admin {
            tracing::debug!("Tried to create a new admin with a non admin user");
            return Ok(HttpResponse::Unauthorized().finish());
        }

        let user =
            users::create_user(&app_state.db, &data.username, &data.password, data.role).await?;

        Ok(HttpResponse::Created().json(json!({"id": user.id})))
    } else {
        tracing::debug!("User creation attempt while it's disabled or creator is not admin");
        Ok(HttpResponse::Unauthorized().finish())
    }
}

#[get("/users")]
#[tracing::instrument(skip(app_state))]
async fn list_users(
    app_state: web::Data<AppState>,
    page: web::Query<PageParameters>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    if user.is_admin() {
        let users = users::list_users(&app_state.db, page.get_page(), page.get_size()).await?;

        Ok(HttpResponse::Ok().json(users))
    } else {
        Err(ApiError::AuthenticationError(
            AuthenticationError::Forbidden("no".into()),
        ))
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(new_user).service(list_users);
}
