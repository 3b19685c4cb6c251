// Urgency classification - selects which items require attention.

use super::currency;
use super::ledger::AcknowledgmentLedger;
use super::model::{UrgencyReport, WorkItem};

/// Reference-currency amount above which an item is urgent. Exceeding the
/// threshold triggers, reaching it does not.
pub const URGENT_AMOUNT_THRESHOLD_USD: f64 = 500.0;

/// Scan the collection for items requiring attention. Pure function of its
/// inputs: identical arguments always yield an identical report, so the
/// timer-driven re-evaluation can call it freely.
pub fn classify(
    items: &[WorkItem],
    threshold_usd: f64,
    acknowledged: &AcknowledgmentLedger,
) -> UrgencyReport {
    let mut urgent_items = Vec::new();
    let mut high_priority_count = 0;
    let mut large_amount_count = 0;

    for item in items {
        if !item.is_eligible() || acknowledged.contains(&item.id) {
            continue;
        }

        let large_amount = item
            .amount
            .is_some_and(|amount| currency::to_reference(amount, &item.currency) > threshold_usd);
        let high_priority = item.is_high_priority();

        if !large_amount && !high_priority {
            continue;
        }

        // An item can satisfy both triggers; the counts are independent,
        // not a partition of the urgent set.
        if high_priority {
            high_priority_count += 1;
        }
        if large_amount {
            large_amount_count += 1;
        }
        urgent_items.push(item.clone());
    }

    UrgencyReport {
        requires_attention: !urgent_items.is_empty(),
        urgent_items,
        high_priority_count,
        large_amount_count,
    }
}
