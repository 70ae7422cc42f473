#[derive(thiserror::Error, Debug)]
pub enum FeedError {
    #[error("Non OK Http status returned: {0}")]
    NonOkStatus(u16),
    #[error("Error while reading response: {0}")]
    ReadResponseError(#[from] reqwest::Error),
    #[error("Error while building request: {0}")]
    HttpError(#[from] reqwest_middleware::Error),
    #[error("Error while decoding response: {0}")]
    DecodeError(#[from] serde_json::Error),
}
