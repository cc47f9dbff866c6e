pub mod client;
pub mod config;
pub mod error;
pub mod label;
pub mod session;
pub mod types;

pub use client::{CarrierClient, CreatedWaybill};
pub use config::{CarrierConfig, SubscriptionKey};
pub use error::{CarrierError, ErrorKind};
pub use session::{Session, Token, WaybillId};
pub use types::{County, Locality};
