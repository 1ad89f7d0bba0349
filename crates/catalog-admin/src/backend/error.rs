use list_framework::EndpointError;

/// Errors produced by the in-memory backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("{field} is required")]
    Missing { field: &'static str },
    #[error("{0}")]
    Invalid(String),
    #[error("{0:?} already exists")]
    Conflict(String),
    #[error("{resource} is read-only")]
    ReadOnly { resource: &'static str },
    #[error("{0} not found")]
    NotFound(String),
    #[error("Backend closed")]
    ActorClosed,
    #[error("Backend dropped response channel")]
    ActorDropped,
}

/// How the dashboard sees a backend failure: validation problems as HTTP-style rejections,
/// unknown ids as `NotFound`, a dead backend as a transport failure.
impl From<BackendError> for EndpointError {
    fn from(e: BackendError) -> Self {
        match e {
            BackendError::Missing { .. } | BackendError::Invalid(_) => EndpointError::Rejected {
                status: 422,
                message: e.to_string(),
            },
            BackendError::Conflict(_) => EndpointError::Rejected {
                status: 409,
                message: e.to_string(),
            },
            BackendError::ReadOnly { .. } => EndpointError::Rejected {
                status: 405,
                message: e.to_string(),
            },
            BackendError::NotFound(id) => EndpointError::NotFound(id),
            BackendError::ActorClosed | BackendError::ActorDropped => {
                EndpointError::Transport(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_to_endpoint_errors() {
        assert_eq!(
            EndpointError::from(BackendError::Missing { field: "name" }),
            EndpointError::Rejected {
                status: 422,
                message: "name is required".into()
            }
        );
        assert_eq!(
            EndpointError::from(BackendError::Conflict("nike".into())).to_string(),
            "rejected (409): \"nike\" already exists"
        );
        assert_eq!(
            EndpointError::from(BackendError::NotFound("brand_7".into())),
            EndpointError::NotFound("brand_7".into())
        );
        assert!(matches!(
            EndpointError::from(BackendError::ActorClosed),
            EndpointError::Transport(_)
        ));
    }
}
