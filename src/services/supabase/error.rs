use thiserror::Error;

/// Failures talking to Supabase.
///
/// Kept separate from `AppError` so the client can be reused outside of HTTP handlers;
/// `AppError: From<SupabaseError>` decides what the caller sees.
#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("supabase transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("supabase responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected supabase response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("supabase returned no rows")]
    EmptyResponse,
    #[error("{resource} not found")]
    NotFound { resource: &'static str },
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("SERVICE_ROLE_KEY is not configured")]
    ServiceRoleMissing,
    #[error("invalid supabase url: {0}")]
    Url(#[from] url::ParseError),
}

pub type SupabaseResult<T> = Result<T, SupabaseError>;
