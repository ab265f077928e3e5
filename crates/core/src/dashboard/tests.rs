//! Tests for the dashboard summary.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use tally_shared::DashboardConfig;
use tally_shared::types::{ExpenseId, IncomeId, UserId};

use super::{
    DashboardError, DashboardService, ExpenseRecord, GroupTotal, InMemoryStore, IncomeRecord,
    RecordKind, RecordStore, Transaction,
    service::{merge_recent, rank_groups, window_start},
};

// ============================================================================
// Fixtures
// ============================================================================

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
}

fn expense(user_id: UserId, amount: Decimal, category: &str, date: DateTime<Utc>) -> Transaction {
    ExpenseRecord {
        id: ExpenseId::new(),
        user_id,
        amount,
        date,
        icon: None,
        category: category.to_string(),
    }
    .into()
}

fn income(user_id: UserId, amount: Decimal, source: &str, date: DateTime<Utc>) -> Transaction {
    IncomeRecord {
        id: IncomeId::new(),
        user_id,
        amount,
        date,
        icon: Some("💼".to_string()),
        source: source.to_string(),
    }
    .into()
}

fn service_with(store: impl RecordStore + 'static) -> DashboardService {
    DashboardService::new(Arc::new(store), DashboardConfig::default())
}

fn group(key: &str, total: Decimal, count: u64) -> GroupTotal {
    GroupTotal {
        key: key.to_string(),
        total,
        count,
    }
}

/// Store wrapper that counts every read.
struct CountingStore {
    inner: InMemoryStore,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl RecordStore for CountingStore {
    async fn total(&self, kind: RecordKind, user_id: UserId) -> Result<Decimal, DashboardError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.total(kind, user_id).await
    }

    async fn group_totals(
        &self,
        kind: RecordKind,
        user_id: UserId,
    ) -> Result<Vec<GroupTotal>, DashboardError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.group_totals(kind, user_id).await
    }

    async fn recent(
        &self,
        kind: RecordKind,
        user_id: UserId,
        limit: u64,
    ) -> Result<Vec<Transaction>, DashboardError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.recent(kind, user_id, limit).await
    }

    async fn since(
        &self,
        kind: RecordKind,
        user_id: UserId,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, DashboardError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.since(kind, user_id, cutoff).await
    }
}

/// Store whose window query fails.
struct BrokenWindowStore(InMemoryStore);

#[async_trait]
impl RecordStore for BrokenWindowStore {
    async fn total(&self, kind: RecordKind, user_id: UserId) -> Result<Decimal, DashboardError> {
        self.0.total(kind, user_id).await
    }

    async fn group_totals(
        &self,
        kind: RecordKind,
        user_id: UserId,
    ) -> Result<Vec<GroupTotal>, DashboardError> {
        self.0.group_totals(kind, user_id).await
    }

    async fn recent(
        &self,
        kind: RecordKind,
        user_id: UserId,
        limit: u64,
    ) -> Result<Vec<Transaction>, DashboardError> {
        self.0.recent(kind, user_id, limit).await
    }

    async fn since(
        &self,
        _kind: RecordKind,
        _user_id: UserId,
        _cutoff: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, DashboardError> {
        Err(DashboardError::Store("connection reset by peer".to_string()))
    }
}

// ============================================================================
// Summary Scenarios
// ============================================================================

#[tokio::test]
async fn test_user_without_records_gets_zeroed_report() {
    let user = UserId::new();
    let other = UserId::new();
    let store = InMemoryStore::with_records([expense(other, dec!(99), "food", now())]);

    let report = service_with(store).summarize(Some(user), now()).await.unwrap();

    assert_eq!(report.total_income, Decimal::ZERO);
    assert_eq!(report.total_expense, Decimal::ZERO);
    assert_eq!(report.balance, Decimal::ZERO);
    assert!(report.expenses_by_category.is_empty());
    assert!(report.income_by_source.is_empty());
    assert_eq!(report.last_30_days_expenses.total, Decimal::ZERO);
    assert!(report.last_30_days_expenses.transactions.is_empty());
    assert_eq!(report.last_60_days_income.total, Decimal::ZERO);
    assert!(report.last_60_days_income.transactions.is_empty());
    assert!(report.recent_transactions.is_empty());
}

#[tokio::test]
async fn test_expenses_grouped_by_category_largest_first() {
    let user = UserId::new();
    let store = InMemoryStore::with_records([
        expense(user, dec!(10), "food", now() - Duration::days(1)),
        expense(user, dec!(20), "food", now() - Duration::days(2)),
        expense(user, dec!(5), "transport", now() - Duration::days(3)),
    ]);

    let report = service_with(store).summarize(Some(user), now()).await.unwrap();

    assert_eq!(
        report.expenses_by_category,
        vec![group("food", dec!(30), 2), group("transport", dec!(5), 1)]
    );
    assert_eq!(report.total_expense, dec!(35));
    assert_eq!(report.balance, dec!(-35));
}

#[tokio::test]
async fn test_income_grouped_by_source() {
    let user = UserId::new();
    let store = InMemoryStore::with_records([
        income(user, dec!(1500), "salary", now() - Duration::days(3)),
        income(user, dec!(200), "freelance", now() - Duration::days(10)),
        income(user, dec!(300), "freelance", now() - Duration::days(20)),
    ]);

    let report = service_with(store).summarize(Some(user), now()).await.unwrap();

    assert_eq!(
        report.income_by_source,
        vec![group("salary", dec!(1500), 1), group("freelance", dec!(500), 2)]
    );
    assert_eq!(report.total_income, dec!(2000));
    assert_eq!(report.balance, dec!(2000));
}

#[tokio::test]
async fn test_eleven_recent_expenses_are_capped_at_ten() {
    let user = UserId::new();
    let store = InMemoryStore::with_records(
        (0..11).map(|i| expense(user, dec!(1), "food", now() - Duration::minutes(i))),
    );

    let report = service_with(store).summarize(Some(user), now()).await.unwrap();

    assert_eq!(report.recent_transactions.len(), 10);
    assert!(
        report
            .recent_transactions
            .iter()
            .all(|t| t.kind() == RecordKind::Expense)
    );
    assert_eq!(report.recent_transactions[0].date(), now());
    assert_eq!(
        report.recent_transactions[9].date(),
        now() - Duration::minutes(9)
    );
    // The window list is not capped.
    assert_eq!(report.last_30_days_expenses.transactions.len(), 11);
    assert_eq!(report.last_30_days_expenses.total, dec!(11));
}

#[tokio::test]
async fn test_recent_transactions_interleave_both_kinds() {
    let user = UserId::new();
    let store = InMemoryStore::with_records([
        expense(user, dec!(12), "food", now() - Duration::hours(1)),
        income(user, dec!(100), "salary", now() - Duration::hours(2)),
        expense(user, dec!(7), "transport", now() - Duration::hours(3)),
        income(user, dec!(40), "gift", now() - Duration::hours(4)),
    ]);

    let report = service_with(store).summarize(Some(user), now()).await.unwrap();

    let kinds: Vec<RecordKind> = report
        .recent_transactions
        .iter()
        .map(Transaction::kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            RecordKind::Expense,
            RecordKind::Income,
            RecordKind::Expense,
            RecordKind::Income
        ]
    );
    assert_eq!(report.recent_transactions[1].group_key(), "salary");
    assert_eq!(report.recent_transactions[1].icon(), Some("💼"));
}

#[tokio::test]
async fn test_windows_use_their_own_lengths() {
    let user = UserId::new();
    let store = InMemoryStore::with_records([
        expense(user, dec!(50), "rent", now() - Duration::days(29)),
        expense(user, dec!(70), "rent", now() - Duration::days(45)),
        income(user, dec!(800), "salary", now() - Duration::days(45)),
        income(user, dec!(900), "salary", now() - Duration::days(61)),
    ]);

    let report = service_with(store).summarize(Some(user), now()).await.unwrap();

    assert_eq!(report.last_30_days_expenses.total, dec!(50));
    assert_eq!(report.last_30_days_expenses.transactions.len(), 1);
    assert_eq!(report.last_60_days_income.total, dec!(800));
    assert_eq!(report.last_60_days_income.transactions.len(), 1);
    assert_eq!(report.total_expense, dec!(120));
    assert_eq!(report.total_income, dec!(1700));
}

#[rstest]
#[case::exactly_on_boundary(0, true)]
#[case::one_second_inside(-1, true)]
#[case::one_second_outside(1, false)]
#[tokio::test]
async fn test_expense_window_boundary_is_inclusive(
    #[case] seconds_past_boundary: i64,
    #[case] included: bool,
) {
    let user = UserId::new();
    let date = now() - Duration::days(30) - Duration::seconds(seconds_past_boundary);
    let store = InMemoryStore::with_records([expense(user, dec!(42.50), "food", date)]);

    let report = service_with(store).summarize(Some(user), now()).await.unwrap();

    let expected = if included { dec!(42.50) } else { Decimal::ZERO };
    assert_eq!(report.last_30_days_expenses.total, expected);
    assert_eq!(
        report.last_30_days_expenses.transactions.len(),
        usize::from(included)
    );
}

#[rstest]
#[case::exactly_on_boundary(0, true)]
#[case::one_second_inside(-1, true)]
#[case::one_second_outside(1, false)]
#[tokio::test]
async fn test_income_window_boundary_is_inclusive(
    #[case] seconds_past_boundary: i64,
    #[case] included: bool,
) {
    let user = UserId::new();
    let date = now() - Duration::days(60) - Duration::seconds(seconds_past_boundary);
    let store = InMemoryStore::with_records([income(user, dec!(1250), "salary", date)]);

    let report = service_with(store).summarize(Some(user), now()).await.unwrap();

    let expected = if included { dec!(1250) } else { Decimal::ZERO };
    assert_eq!(report.last_60_days_income.total, expected);
    assert_eq!(
        report.last_60_days_income.transactions.len(),
        usize::from(included)
    );
}

#[rstest]
#[case::zero(0)]
#[case::negative(-30)]
#[case::before_earliest_date(100_000_000)]
fn test_window_start_rejects_unusable_windows(#[case] days: i64) {
    assert!(matches!(
        window_start(now(), days),
        Err(DashboardError::Window(d)) if d == days
    ));
}

#[test]
fn test_window_start_subtracts_days() {
    assert_eq!(window_start(now(), 30).unwrap(), now() - Duration::days(30));
}

#[rstest]
#[case::expense_window_overflows(100_000_000, 60)]
#[case::income_window_negative(30, -1)]
#[tokio::test]
async fn test_unusable_window_fails_without_store_reads(
    #[case] expense_window_days: i64,
    #[case] income_window_days: i64,
) {
    let calls = Arc::new(AtomicUsize::new(0));
    let store = CountingStore {
        inner: InMemoryStore::new(),
        calls: Arc::clone(&calls),
    };
    let config = DashboardConfig {
        expense_window_days,
        income_window_days,
        ..DashboardConfig::default()
    };

    let result = DashboardService::new(Arc::new(store), config)
        .summarize(Some(UserId::new()), now())
        .await;

    assert!(matches!(result, Err(DashboardError::Window(_))));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_user_is_rejected_before_any_store_read() {
    let calls = Arc::new(AtomicUsize::new(0));
    let store = CountingStore {
        inner: InMemoryStore::new(),
        calls: Arc::clone(&calls),
    };

    let result = service_with(store).summarize(None, now()).await;

    assert!(matches!(result, Err(DashboardError::Unauthenticated)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_authenticated_summary_issues_eight_reads() {
    let calls = Arc::new(AtomicUsize::new(0));
    let store = CountingStore {
        inner: InMemoryStore::new(),
        calls: Arc::clone(&calls),
    };

    service_with(store)
        .summarize(Some(UserId::new()), now())
        .await
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 8);
}

#[tokio::test]
async fn test_store_failure_aborts_whole_summary() {
    let user = UserId::new();
    let store = BrokenWindowStore(InMemoryStore::with_records([expense(
        user,
        dec!(10),
        "food",
        now(),
    )]));

    let err = service_with(store)
        .summarize(Some(user), now())
        .await
        .unwrap_err();

    assert!(matches!(err, DashboardError::Store(ref msg) if msg == "connection reset by peer"));
}

#[tokio::test]
async fn test_custom_recent_limit() {
    let user = UserId::new();
    let store = InMemoryStore::with_records(
        (0..5).map(|i| income(user, dec!(3), "salary", now() - Duration::days(i))),
    );
    let config = DashboardConfig {
        recent_limit: 3,
        ..DashboardConfig::default()
    };

    let report = DashboardService::new(Arc::new(store), config)
        .summarize(Some(user), now())
        .await
        .unwrap();

    assert_eq!(report.recent_transactions.len(), 3);
    assert_eq!(report.last_60_days_income.transactions.len(), 5);
}

// ============================================================================
// Pure Helpers
// ============================================================================

#[test]
fn test_rank_groups_breaks_ties_by_key() {
    let ranked = rank_groups(vec![
        group("travel", dec!(10), 1),
        group("books", dec!(10), 2),
        group("rent", dec!(900), 1),
        group("coffee", dec!(10), 5),
    ]);

    let keys: Vec<&str> = ranked.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(keys, vec!["rent", "books", "coffee", "travel"]);
}

#[test]
fn test_merge_recent_keeps_expense_first_on_equal_dates() {
    let user = UserId::new();
    let merged = merge_recent(
        vec![expense(user, dec!(1), "food", now())],
        vec![income(user, dec!(2), "salary", now())],
        10,
    );

    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].kind(), RecordKind::Expense);
    assert_eq!(merged[1].kind(), RecordKind::Income);
}

#[test]
fn test_in_memory_store_insert() {
    let store = InMemoryStore::new();
    assert!(store.is_empty().unwrap());

    store
        .insert(ExpenseRecord {
            id: ExpenseId::new(),
            user_id: UserId::new(),
            amount: dec!(5),
            date: now(),
            icon: None,
            category: "food".to_string(),
        })
        .unwrap();

    assert_eq!(store.len().unwrap(), 1);
}

// ============================================================================
// Property Tests
// ============================================================================

const CATEGORIES: [&str; 4] = ["food", "rent", "transport", "fun"];

/// (is_expense, cents, minutes_ago, category index)
fn record_strategy() -> impl Strategy<Value = (bool, i64, i64, usize)> {
    (
        any::<bool>(),
        0i64..10_000_000i64,
        0i64..(120 * 24 * 60),
        0usize..CATEGORIES.len(),
    )
}

fn build_records(user: UserId, specs: &[(bool, i64, i64, usize)]) -> Vec<Transaction> {
    specs
        .iter()
        .map(|&(is_expense, cents, minutes_ago, idx)| {
            let amount = Decimal::new(cents, 2);
            let date = now() - Duration::minutes(minutes_ago);
            if is_expense {
                expense(user, amount, CATEGORIES[idx], date)
            } else {
                income(user, amount, CATEGORIES[idx], date)
            }
        })
        .collect()
}

fn summarize_blocking(records: Vec<Transaction>, user: UserId) -> super::DashboardReport {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(service_with(InMemoryStore::with_records(records)).summarize(Some(user), now()))
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Balance is exactly income minus expense, and totals match the records.
    #[test]
    fn prop_balance_identity(specs in prop::collection::vec(record_strategy(), 0..40)) {
        let user = UserId::new();
        let records = build_records(user, &specs);
        let expected_expense: Decimal = records
            .iter()
            .filter(|r| r.kind() == RecordKind::Expense)
            .map(Transaction::amount)
            .sum();
        let expected_income: Decimal = records
            .iter()
            .filter(|r| r.kind() == RecordKind::Income)
            .map(Transaction::amount)
            .sum();

        let report = summarize_blocking(records, user);

        prop_assert_eq!(report.total_expense, expected_expense);
        prop_assert_eq!(report.total_income, expected_income);
        prop_assert_eq!(report.balance, report.total_income - report.total_expense);
    }

    /// Group counts add up to the number of records, and groups are ranked.
    #[test]
    fn prop_group_counts_cover_all_records(specs in prop::collection::vec(record_strategy(), 0..40)) {
        let user = UserId::new();
        let records = build_records(user, &specs);
        let expense_count = records.iter().filter(|r| r.kind() == RecordKind::Expense).count();

        let report = summarize_blocking(records, user);

        let counted: u64 = report.expenses_by_category.iter().map(|g| g.count).sum();
        prop_assert_eq!(counted, expense_count as u64);
        let grouped_total: Decimal = report.expenses_by_category.iter().map(|g| g.total).sum();
        prop_assert_eq!(grouped_total, report.total_expense);
        for pair in report.expenses_by_category.windows(2) {
            prop_assert!(
                pair[0].total > pair[1].total
                    || (pair[0].total == pair[1].total && pair[0].key < pair[1].key)
            );
        }
    }

    /// Recent list has min(10, n) entries and is newest first.
    #[test]
    fn prop_recent_transactions_sorted_and_sized(specs in prop::collection::vec(record_strategy(), 0..40)) {
        let user = UserId::new();
        let records = build_records(user, &specs);
        let total = records.len();

        let report = summarize_blocking(records, user);

        prop_assert_eq!(report.recent_transactions.len(), total.min(10));
        for pair in report.recent_transactions.windows(2) {
            prop_assert!(pair[0].date() >= pair[1].date());
        }
    }

    /// Window totals equal the sum over records at or after the cutoff.
    #[test]
    fn prop_window_totals_match_cutoff(specs in prop::collection::vec(record_strategy(), 0..40)) {
        let user = UserId::new();
        let records = build_records(user, &specs);
        let expense_cutoff = now() - Duration::days(30);
        let income_cutoff = now() - Duration::days(60);
        let expected_expense: Decimal = records
            .iter()
            .filter(|r| r.kind() == RecordKind::Expense && r.date() >= expense_cutoff)
            .map(Transaction::amount)
            .sum();
        let expected_income: Decimal = records
            .iter()
            .filter(|r| r.kind() == RecordKind::Income && r.date() >= income_cutoff)
            .map(Transaction::amount)
            .sum();

        let report = summarize_blocking(records, user);

        prop_assert_eq!(report.last_30_days_expenses.total, expected_expense);
        prop_assert_eq!(report.last_60_days_income.total, expected_income);
        for pair in report.last_30_days_expenses.transactions.windows(2) {
            prop_assert!(pair[0].date() >= pair[1].date());
        }
    }
}
