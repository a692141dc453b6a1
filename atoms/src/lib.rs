pub mod agents;
pub mod error;
pub mod media;
pub mod notifications;
pub mod payments;
pub mod voice;

pub use error::StoreError;
