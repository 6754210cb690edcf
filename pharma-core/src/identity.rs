use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};

pub const ADMIN_IDENTITY: &str = "admin";
pub const PAYMENT_SERVICE_IDENTITY: &str = "payment_service";

/// Internal services that are allowed to act on orders.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SystemRole {
    PaymentService,
}

/// Who is making a request, resolved once from the opaque caller string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requester {
    Admin,
    System(SystemRole),
    Customer(Uuid),
}

impl Requester {
    /// Resolve an opaque caller identity. Anything that is not a known role
    /// must be a customer id.
    pub fn resolve(raw: &str) -> CoreResult<Self> {
        let raw = raw.trim();
        match raw {
            ADMIN_IDENTITY => Ok(Requester::Admin),
            PAYMENT_SERVICE_IDENTITY => Ok(Requester::System(SystemRole::PaymentService)),
            _ => Uuid::parse_str(raw)
                .map(Requester::Customer)
                .map_err(|_| CoreError::Authorization(format!("unrecognized caller identity '{}'", raw))),
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Requester::Admin)
    }

    /// Admin bypass, otherwise the caller must be exactly this customer.
    pub fn can_access_customer(&self, customer_id: Uuid) -> bool {
        match self {
            Requester::Admin => true,
            Requester::Customer(id) => *id == customer_id,
            Requester::System(_) => false,
        }
    }

    pub fn ensure_customer_access(&self, customer_id: Uuid) -> CoreResult<()> {
        if self.can_access_customer(customer_id) {
            Ok(())
        } else {
            Err(CoreError::Authorization("access denied".to_string()))
        }
    }

    pub fn ensure_admin(&self) -> CoreResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(CoreError::Authorization("admin role required".to_string()))
        }
    }
}

impl std::fmt::Display for Requester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Requester::Admin => f.write_str(ADMIN_IDENTITY),
            Requester::System(SystemRole::PaymentService) => f.write_str(PAYMENT_SERVICE_IDENTITY),
            Requester::Customer(id) => write!(f, "{}", id),
        }
    }
}
