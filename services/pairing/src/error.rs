use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Pairing service domain error variants.
///
/// Validation rejections (4xx) are typed values the pairing path always
/// returns instead of panicking; `Internal` covers store/network failure and
/// is the only variant whose cause is logged.
#[derive(Debug, thiserror::Error)]
pub enum PairingServiceError {
    #[error("user not found")]
    UserNotFound,
    #[error("no active invite code")]
    NoActiveCode,
    #[error("invalid or already used invite code")]
    InvalidCode,
    #[error("expired invite code")]
    ExpiredCode,
    #[error("cannot use your own invite code")]
    OwnCode,
    #[error("code creator is already paired")]
    CreatorAlreadyPaired,
    #[error("already paired")]
    AlreadyPaired,
    #[error("not currently paired")]
    NotPaired,
    #[error("invalid nickname")]
    InvalidNickname,
    #[error("missing data")]
    MissingData,
    #[error("invite code generation failed")]
    CodeGeneration,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl PairingServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::NoActiveCode => "NO_ACTIVE_CODE",
            Self::InvalidCode => "INVALID_CODE",
            Self::ExpiredCode => "EXPIRED_CODE",
            Self::OwnCode => "OWN_CODE",
            Self::CreatorAlreadyPaired => "CREATOR_ALREADY_PAIRED",
            Self::AlreadyPaired => "ALREADY_PAIRED",
            Self::NotPaired => "NOT_PAIRED",
            Self::InvalidNickname => "INVALID_NICKNAME",
            Self::MissingData => "MISSING_DATA",
            Self::CodeGeneration => "CODE_GENERATION_FAILED",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for PairingServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::UserNotFound | Self::NoActiveCode | Self::NotPaired => StatusCode::NOT_FOUND,
            Self::InvalidCode | Self::ExpiredCode | Self::OwnCode => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::CreatorAlreadyPaired | Self::AlreadyPaired => StatusCode::CONFLICT,
            Self::InvalidNickname | Self::MissingData => StatusCode::BAD_REQUEST,
            Self::CodeGeneration | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only — tower-http TraceLayer already records method/uri/status for all
        // requests. 4xx are expected client errors; logging them here would be noise.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
