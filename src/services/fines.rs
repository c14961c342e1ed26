//! Fine computation policy
//!
//! Pure functions, no persistence: the circulation engine calls these at
//! return time, and reporting uses the overdue derivation. Lateness is a
//! calendar-day ceiling of the elapsed wall-clock duration, so a return one
//! second past the due date already counts as one day late.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::models::{Transaction, TransactionStatus};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Whole days late, rounded up; zero when returned on or before the due date
pub fn days_late(due_date: DateTime<Utc>, return_date: DateTime<Utc>) -> i64 {
    let late = return_date.signed_duration_since(due_date);
    let millis = late.num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
}

/// Fine owed for a return, computed once and immutable thereafter.
///
/// Zero when the return is on time; otherwise days late times the per-day
/// rate, with no upper cap.
pub fn compute_fine(
    due_date: DateTime<Utc>,
    return_date: DateTime<Utc>,
    fine_per_day: Decimal,
) -> Decimal {
    Decimal::from(days_late(due_date, return_date)) * fine_per_day
}

/// Whether a transaction is overdue as of `now`.
///
/// Overdue is a derived view of an ACTIVE transaction past its due date, not
/// a stored status.
pub fn is_overdue(transaction: &Transaction, now: DateTime<Utc>) -> bool {
    transaction.status == TransactionStatus::Active && transaction.due_date < now
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn on_time_return_owes_nothing() {
        assert_eq!(
            compute_fine(date(2024, 1, 1), date(2024, 1, 1), dec!(0.5)),
            dec!(0)
        );
    }

    #[test]
    fn early_return_owes_nothing() {
        assert_eq!(
            compute_fine(date(2024, 1, 10), date(2024, 1, 3), dec!(0.5)),
            dec!(0)
        );
    }

    #[test]
    fn one_day_late() {
        assert_eq!(
            compute_fine(date(2024, 1, 1), date(2024, 1, 2), dec!(0.5)),
            dec!(0.5)
        );
    }

    #[test]
    fn three_days_late() {
        assert_eq!(
            compute_fine(date(2024, 1, 1), date(2024, 1, 4), dec!(0.5)),
            dec!(1.5)
        );
    }

    #[test]
    fn one_second_late_counts_as_a_full_day() {
        let due = date(2024, 1, 1);
        assert_eq!(days_late(due, due + Duration::seconds(1)), 1);
        assert_eq!(
            compute_fine(due, due + Duration::seconds(1), dec!(0.5)),
            dec!(0.5)
        );
    }

    #[test]
    fn sub_millisecond_lateness_is_not_late() {
        let due = date(2024, 1, 1);
        assert_eq!(days_late(due, due + Duration::microseconds(500)), 0);
    }

    #[test]
    fn partial_second_day_rounds_up() {
        let due = date(2024, 1, 1);
        let returned = due + Duration::days(1) + Duration::hours(3);
        assert_eq!(days_late(due, returned), 2);
    }

    #[test]
    fn overdue_is_derived_from_active_status_and_due_date() {
        let now = date(2024, 6, 1);
        let mut txn = Transaction {
            id: 1,
            user_id: 7,
            copy_id: 3,
            checkout_date: now - Duration::days(20),
            due_date: now - Duration::days(6),
            return_date: None,
            status: TransactionStatus::Active,
        };
        assert!(is_overdue(&txn, now));

        // A closed transaction is never overdue regardless of the dates.
        txn.status = TransactionStatus::Returned;
        assert!(!is_overdue(&txn, now));

        txn.status = TransactionStatus::Active;
        txn.due_date = now + Duration::days(1);
        assert!(!is_overdue(&txn, now));
    }
}
