// Re-export model types, store trait and handlers
pub mod http;
pub mod model;
pub mod service;
pub mod signature;
pub mod store;

pub use model::{ChargeEvent, ChargeEventData, Payment, PaymentStatus};
pub use http::*;
pub use service::*;
pub use store::*;
