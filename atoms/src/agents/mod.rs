pub mod model;
pub mod service;

pub use model::Agent;
pub use service::*;
