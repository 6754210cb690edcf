use pharma_core::{CoreError, CoreResult, Requester, SystemRole};
use uuid::Uuid;

use crate::models::OrderStatus;

/// Forward edges of the order lifecycle.
pub fn allowed_targets(from: OrderStatus) -> &'static [OrderStatus] {
    match from {
        OrderStatus::PaymentPending => &[OrderStatus::Approved, OrderStatus::Paid, OrderStatus::Cancelled],
        OrderStatus::Approved => &[OrderStatus::Paid, OrderStatus::Shipped, OrderStatus::Cancelled],
        OrderStatus::Paid => &[OrderStatus::Shipped, OrderStatus::Cancelled],
        OrderStatus::Shipped => &[OrderStatus::Completed],
        OrderStatus::Completed | OrderStatus::Cancelled => &[],
    }
}

pub fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
    allowed_targets(from).contains(&to)
}

/// Decide whether `requester` may move an order owned by `owner` from
/// `current` to `target`.
///
/// Terminal orders never move. Admin may set any status on a live order.
/// The payment service may only mark orders paid, and a customer may only
/// cancel their own order before it ships. Non-admin requests must also
/// follow a forward edge of the lifecycle.
pub fn authorize_transition(
    requester: &Requester,
    owner: Uuid,
    current: OrderStatus,
    target: OrderStatus,
) -> CoreResult<()> {
    if current.is_terminal() {
        return Err(CoreError::Conflict(format!(
            "order is already {} and cannot change status",
            current
        )));
    }

    match requester {
        Requester::Admin => return Ok(()),
        Requester::System(SystemRole::PaymentService) if target == OrderStatus::Paid => {}
        Requester::Customer(id)
            if *id == owner && target == OrderStatus::Cancelled && current != OrderStatus::Shipped => {}
        _ => {
            return Err(CoreError::Authorization(format!(
                "{} may not set order status to {}",
                requester, target
            )))
        }
    }

    if !can_transition(current, target) {
        return Err(CoreError::Conflict(format!(
            "illegal status transition from {} to {}",
            current, target
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pharma_core::ErrorKind;

    const LIVE: [OrderStatus; 4] = [
        OrderStatus::PaymentPending,
        OrderStatus::Approved,
        OrderStatus::Paid,
        OrderStatus::Shipped,
    ];

    fn kind(result: CoreResult<()>) -> Option<ErrorKind> {
        result.err().map(|e| e.kind())
    }

    #[test]
    fn test_terminal_states_always_deny() {
        let owner = Uuid::new_v4();
        let requesters = [
            Requester::Admin,
            Requester::System(SystemRole::PaymentService),
            Requester::Customer(owner),
            Requester::Customer(Uuid::new_v4()),
        ];

        for current in [OrderStatus::Completed, OrderStatus::Cancelled] {
            for requester in &requesters {
                for target in OrderStatus::ALL {
                    assert_eq!(
                        kind(authorize_transition(requester, owner, current, target)),
                        Some(ErrorKind::Conflict),
                        "{} {} -> {}",
                        requester,
                        current,
                        target
                    );
                }
            }
        }
    }

    #[test]
    fn test_admin_may_set_any_status_on_live_order() {
        let owner = Uuid::new_v4();
        for current in LIVE {
            for target in OrderStatus::ALL {
                assert!(authorize_transition(&Requester::Admin, owner, current, target).is_ok());
            }
        }
    }

    #[test]
    fn test_payment_service_only_marks_paid() {
        let owner = Uuid::new_v4();
        let payment = Requester::System(SystemRole::PaymentService);

        for current in LIVE {
            for target in OrderStatus::ALL {
                let outcome = kind(authorize_transition(&payment, owner, current, target));
                let expected = if target != OrderStatus::Paid {
                    Some(ErrorKind::Authorization)
                } else if can_transition(current, target) {
                    None
                } else {
                    Some(ErrorKind::Conflict)
                };
                assert_eq!(outcome, expected, "{} -> {}", current, target);
            }
        }
    }

    #[test]
    fn test_payment_service_cannot_ship() {
        let payment = Requester::System(SystemRole::PaymentService);
        let result = authorize_transition(&payment, Uuid::new_v4(), OrderStatus::Paid, OrderStatus::Shipped);
        assert_eq!(kind(result), Some(ErrorKind::Authorization));
    }

    #[test]
    fn test_customer_cancels_own_order_before_shipping() {
        let owner = Uuid::new_v4();
        let customer = Requester::Customer(owner);

        for current in [OrderStatus::PaymentPending, OrderStatus::Approved, OrderStatus::Paid] {
            assert!(authorize_transition(&customer, owner, current, OrderStatus::Cancelled).is_ok());
            assert_eq!(
                kind(authorize_transition(&customer, owner, current, OrderStatus::Completed)),
                Some(ErrorKind::Authorization)
            );
        }
    }

    #[test]
    fn test_shipped_order_cancel_customer_denied_admin_permitted() {
        let owner = Uuid::new_v4();
        let denied = authorize_transition(
            &Requester::Customer(owner),
            owner,
            OrderStatus::Shipped,
            OrderStatus::Cancelled,
        );
        assert_eq!(kind(denied), Some(ErrorKind::Authorization));

        let permitted = authorize_transition(&Requester::Admin, owner, OrderStatus::Shipped, OrderStatus::Cancelled);
        assert!(permitted.is_ok());
    }

    #[test]
    fn test_other_customer_is_denied() {
        let owner = Uuid::new_v4();
        let stranger = Requester::Customer(Uuid::new_v4());
        let result = authorize_transition(&stranger, owner, OrderStatus::PaymentPending, OrderStatus::Cancelled);
        assert_eq!(kind(result), Some(ErrorKind::Authorization));
    }

    #[test]
    fn test_transition_table() {
        assert!(can_transition(OrderStatus::PaymentPending, OrderStatus::Approved));
        assert!(can_transition(OrderStatus::Approved, OrderStatus::Shipped));
        assert!(can_transition(OrderStatus::Shipped, OrderStatus::Completed));
        assert!(!can_transition(OrderStatus::Shipped, OrderStatus::Cancelled));
        assert!(!can_transition(OrderStatus::Paid, OrderStatus::PaymentPending));
        assert!(allowed_targets(OrderStatus::Completed).is_empty());
    }
}
