use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

#[derive(thiserror::Error, Debug)]
pub enum AuthenticationError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("Invalid JWT")]
    InvalidJwt(#[from] jwt::Error),
    #[error("JWT Token is expired. Please renew it")]
    ExpiredToken,
    #[error("Unsupported authentication scheme, only JWT Bearer is supported")]
    UnknownAuthScheme,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ResponseError for AuthenticationError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthenticationError::Unauthorized(_)
            | AuthenticationError::InvalidJwt(_)
            | AuthenticationError::ExpiredToken => StatusCode::UNAUTHORIZED,
            AuthenticationError::Forbidden(_) => StatusCode::FORBIDDEN,
            AuthenticationError::UnknownAuthScheme => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).finish()
    }
}
