use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthzError {
    #[error("invalid permission name {0:?}")]
    InvalidPermission(String),
    #[error("wildcard permission can only be granted by the static role table")]
    ReservedWildcard,
    #[error("invalid principal payload: {0}")]
    InvalidPrincipal(#[from] serde_json::Error),
    #[error("permission {permission} denied")]
    Denied { permission: String },
}

pub type AuthzResult<T> = Result<T, AuthzError>;
