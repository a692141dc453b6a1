use thiserror::Error;

/// Failure modes shared by the backend store collaborators.
///
/// HTTP layers map `NotFound` to 404 and everything else to 500; providers
/// retry 500s on their own schedule.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Backend(String),
}
