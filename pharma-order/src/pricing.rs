use rust_decimal::Decimal;

/// Orders with a subtotal strictly above this ship free.
pub fn free_shipping_threshold() -> Decimal {
    Decimal::new(4000, 2)
}

pub fn flat_shipping_fee() -> Decimal {
    Decimal::new(1000, 2)
}

/// Shipping charged for an order with the given item subtotal.
pub fn shipping_cost(subtotal: Decimal) -> Decimal {
    if subtotal > free_shipping_threshold() {
        Decimal::ZERO
    } else {
        flat_shipping_fee()
    }
}
