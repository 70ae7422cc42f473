use actix_web::{get, web, HttpResponse};

use crate::common::articles::monthly_report;
use crate::model::MonthlyReport;
use crate::routes::ApiError;
use crate::startup::AppState;

/// Public aggregate: per-month article count and most frequent news site.
#[get("/reports/monthly")]
#[tracing::instrument(skip(app_state))]
pub async fn get_monthly_report(
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let reports: Vec<MonthlyReport> = monthly_report(&app_state.db)
        .await?
        .into_iter()
        .map(MonthlyReport::from)
        .collect();

    Ok(HttpResponse::Ok().json(reports))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_monthly_report);
}
