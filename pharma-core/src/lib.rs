pub mod error;
pub mod identity;
pub mod query;
pub mod catalog;
pub mod payment;

pub use error::{CoreError, CoreResult, ErrorKind};
pub use identity::{Requester, SystemRole};
pub use query::{ListQuery, OrderScope};
