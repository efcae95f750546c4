//! Integer money arithmetic
//!
//! All amounts are `i64` minor-currency units. Arithmetic is checked so
//! a hostile payload cannot overflow its way past totals reconciliation;
//! `None` means the amounts do not represent a computable order.

use shared::order::Cents;

/// Sum a sequence of amounts, checked
pub fn checked_sum<I: IntoIterator<Item = Cents>>(amounts: I) -> Option<Cents> {
    amounts
        .into_iter()
        .try_fold(0_i64, |acc, amount| acc.checked_add(amount))
}

/// Line total: unit price * quantity + modifier deltas, checked
///
/// Modifier deltas apply once per line. A negative line total (discount
/// deltas exceeding the base amount) is rejected here rather than
/// producing a negative line.
pub fn checked_line_total(
    unit_price: Cents,
    quantity: i32,
    modifier_deltas: &[Cents],
) -> Option<Cents> {
    if quantity <= 0 {
        return None;
    }
    let base = unit_price.checked_mul(quantity as i64)?;
    let total = modifier_deltas
        .iter()
        .try_fold(base, |acc, delta| acc.checked_add(*delta))?;
    if total < 0 {
        return None;
    }
    Some(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total_with_modifiers() {
        // qty 2 @ 500 with a +100 modifier: 500*2 + 100
        assert_eq!(checked_line_total(500, 2, &[100]), Some(1100));
        assert_eq!(checked_line_total(500, 2, &[]), Some(1000));
        assert_eq!(checked_line_total(500, 1, &[-100, 50]), Some(450));
    }

    #[test]
    fn test_negative_line_total_rejected() {
        assert_eq!(checked_line_total(100, 1, &[-200]), None);
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        assert_eq!(checked_line_total(100, 0, &[]), None);
        assert_eq!(checked_line_total(100, -1, &[]), None);
    }

    #[test]
    fn test_overflow_detected() {
        assert_eq!(checked_line_total(i64::MAX, 2, &[]), None);
        assert_eq!(checked_line_total(i64::MAX, 1, &[1]), None);
        assert_eq!(checked_sum([i64::MAX, 1]), None);
    }

    #[test]
    fn test_checked_sum() {
        assert_eq!(checked_sum([1100, 88, 0]), Some(1188));
        assert_eq!(checked_sum([]), Some(0));
    }
}
