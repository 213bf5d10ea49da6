use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("order not found")]
    NotFound,
    #[error("order already exists")]
    AlreadyExists,
    #[error("invalid customerEmail")]
    InvalidEmail,
    #[error("invalid line items: {0}")]
    InvalidLineItems(String),
    #[error("an order's total cannot be less than 0")]
    InvalidTotal,
    #[error("unknown value for status: {0:?}")]
    InvalidStatus(String),
    #[error("order not eligible: {0}")]
    NotEligible(String),
    #[error("{0}")]
    ChargeService(String),
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("order not found")]
    NotFound,
    #[error("order already exists")]
    AlreadyExists,
    #[error("storage failure: {0}")]
    Internal(String),
}

impl From<StoreError> for DomainError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => DomainError::NotFound,
            StoreError::AlreadyExists => DomainError::AlreadyExists,
            StoreError::Internal(msg) => DomainError::Internal(msg),
        }
    }
}

#[derive(Debug, Error)]
pub enum ChargeError {
    #[error("error making charge request: {0}")]
    Transport(String),
    #[error("charge rejected: {status} {body}")]
    Rejected { status: u16, body: String },
    #[error("charge request exceeded the request deadline")]
    DeadlineExceeded,
}
