use actix_web::{get, post, web, HttpResponse};
use serde_json::json;

use crate::auth::AuthenticatedUser;
use crate::common::articles::get_article;
use crate::common::favorites::{insert_favorite, list_favorites_of_user};
use crate::model::PageParameters;
use crate::routes::ApiError;
use crate::startup::AppState;

#[post("/articles/{article_id}/favorite")]
#[tracing::instrument(skip(app_state))]
pub async fn favorite_article(
    article_id: web::Path<i32>,
    app_state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let article_id = article_id.into_inner();

    let article = get_article(&app_state.db, article_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("article".into(), article_id))?;

    // Idempotent: the unique constraint swallows duplicates and races
    let created = insert_favorite(&app_state.db, user.id, article.id).await?;

    if created {
        Ok(HttpResponse::Created()
            .json(json!({"status": "created", "article_id": article.id})))
    } else {
        Ok(HttpResponse::Ok()
            .json(json!({"status": "already exists", "article_id": article.id})))
    }
}

#[get("/favorites")]
#[tracing::instrument(skip(app_state))]
pub async fn get_favorites(
    page: web::Query<PageParameters>,
    app_state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let favorites =
        list_favorites_of_user(&app_state.db, user.id, page.get_page(), page.get_size()).await?;

    Ok(HttpResponse::Ok().json(favorites))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(favorite_article).service(get_favorites);
}
