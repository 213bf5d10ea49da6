use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::domain::errors::DomainError;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// HTTP-facing error. Each variant maps to exactly one `(status, code)` pair.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found")]
    NotFound,

    #[error("order already exists")]
    AlreadyExists,

    #[error("{message}")]
    BadRequest { code: &'static str, message: String },

    #[error("{0}")]
    NotEligible(String),

    #[error("{0}")]
    ChargeService(String),

    #[error("{0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        let message = e.to_string();
        match e {
            DomainError::NotFound => AppError::NotFound,
            DomainError::AlreadyExists => AppError::AlreadyExists,
            DomainError::InvalidEmail => AppError::BadRequest {
                code: "invalid_email",
                message,
            },
            DomainError::InvalidLineItems(_) => AppError::BadRequest {
                code: "invalid_line_items",
                message,
            },
            DomainError::InvalidTotal => AppError::BadRequest {
                code: "invalid_total",
                message,
            },
            DomainError::InvalidStatus(_) => AppError::BadRequest {
                code: "invalid_status",
                message,
            },
            DomainError::InvalidInput(_) => AppError::BadRequest {
                code: "invalid_json",
                message,
            },
            DomainError::NotEligible(_) => AppError::NotEligible(message),
            DomainError::ChargeService(msg) => AppError::ChargeService(msg),
            DomainError::Internal(_) => AppError::Internal(message),
        }
    }
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound => "order_not_found",
            AppError::AlreadyExists => "order_already_exists",
            AppError::BadRequest { code, .. } => *code,
            AppError::NotEligible(_) => "order_not_eligible",
            AppError::ChargeService(_) => "charge_service_error",
            AppError::Internal(_) => "internal_error",
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::AlreadyExists | AppError::NotEligible(_) => StatusCode::CONFLICT,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::ChargeService(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            code: self.code().to_string(),
            message: self.to_string(),
        })
    }
}
