//! Error type shared by frame and circle services.

use crate::model::circle::CircleId;
use crate::model::filter::UsageError;
use crate::model::frame::FrameId;
use crate::repo::store::RepoError;
use crate::service::admission::Rejection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors from region service operations.
#[derive(Debug)]
pub enum ServiceError {
    /// Candidate failed admission; nothing was written.
    Rejected(Rejection),
    FrameNotFound(FrameId),
    CircleNotFound(CircleId),
    /// Frame still owns circles and cannot be deleted.
    FrameInUse(FrameId),
    /// Caller broke a query contract.
    Usage(UsageError),
    /// Repository-level failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected(rejection) => write!(f, "{rejection}"),
            Self::FrameNotFound(id) => write!(f, "Couldn't find Frame with 'id'={id}"),
            Self::CircleNotFound(id) => write!(f, "Couldn't find Circle with 'id'={id}"),
            Self::FrameInUse(_) => write!(
                f,
                "This frame cannot be deleted because it is still referenced by other records (e.g., circles). Please delete associated records first."
            ),
            Self::Usage(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Rejected(rejection) => Some(rejection),
            Self::Usage(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::FrameNotFound(id) => Self::FrameNotFound(id),
            RepoError::CircleNotFound(id) => Self::CircleNotFound(id),
            RepoError::FrameReferenced(id) => Self::FrameInUse(id),
            other => Self::Repo(other),
        }
    }
}

impl From<Rejection> for ServiceError {
    fn from(value: Rejection) -> Self {
        Self::Rejected(value)
    }
}

impl From<UsageError> for ServiceError {
    fn from(value: UsageError) -> Self {
        Self::Usage(value)
    }
}
