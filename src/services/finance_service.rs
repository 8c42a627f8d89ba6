// src/services/finance_service.rs

use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use rust_decimal::Decimal;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    common::{error::AppError, qr},
    db::{FamilyRepository, FinanceRepository},
    models::finance::{
        CreateTransactionPayload, FinancialSummary, NewTransaction, Transaction, TransactionKind,
        TransactionList,
    },
};

// Marca dos lançamentos de registro gerados pela leitura de QR nos eventos
static EVENT_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bevents?\b|நிகழ்வு").expect("padrão EVENT_TAG inválido")
});

pub const EVENT_CATEGORY: &str = "Event";

/// Lançamento de valor zero marcado como evento: não entra nas somas.
pub fn is_event_entry(tx: &Transaction) -> bool {
    if !tx.amount.is_zero() {
        return false;
    }
    EVENT_TAG.is_match(&tx.description) || EVENT_TAG.is_match(&tx.category)
}

/// Os cards do caixa. Contribuições contam como entrada.
pub fn summarize(transactions: &[Transaction]) -> FinancialSummary {
    let mut summary = FinancialSummary::default();

    for tx in transactions.iter().filter(|tx| !is_event_entry(tx)) {
        match tx.kind {
            TransactionKind::Expense => summary.total_expense += tx.amount,
            TransactionKind::Income => summary.total_income += tx.amount,
            TransactionKind::Subscription => {
                summary.total_income += tx.amount;
                summary.total_subscription += tx.amount;
            }
        }
    }

    summary.balance = summary.total_income - summary.total_expense;
    summary
}

/// Quanto a família já pagou (contribuições e entradas vinculadas).
pub fn total_paid(payments: &[Transaction]) -> Decimal {
    payments
        .iter()
        .filter(|tx| tx.kind.counts_as_income() && !is_event_entry(tx))
        .map(|tx| tx.amount)
        .sum()
}

#[derive(Clone)]
pub struct FinanceService {
    repo: FinanceRepository,
    family_repo: FamilyRepository,
}

impl FinanceService {
    pub fn new(repo: FinanceRepository, family_repo: FamilyRepository) -> Self {
        Self { repo, family_repo }
    }

    /// Resumo sempre sobre todos os lançamentos; a lista respeita o filtro.
    pub async fn list(
        &self,
        conn: &mut PgConnection,
        masjid_id: Uuid,
        q: Option<&str>,
    ) -> Result<TransactionList, AppError> {
        let all = self.repo.list_transactions(&mut *conn, masjid_id, None).await?;
        let summary = summarize(&all);

        let transactions = match q.map(str::trim).filter(|s| !s.is_empty()) {
            Some(q) => self.repo.list_transactions(&mut *conn, masjid_id, Some(q)).await?,
            None => all,
        };

        Ok(TransactionList { summary, transactions })
    }

    pub async fn summary(&self, conn: &mut PgConnection, masjid_id: Uuid) -> Result<FinancialSummary, AppError> {
        let all = self.repo.list_transactions(conn, masjid_id, None).await?;
        Ok(summarize(&all))
    }

    pub async fn create(
        &self,
        conn: &mut PgConnection,
        masjid_id: Uuid,
        payload: &CreateTransactionPayload,
    ) -> Result<Transaction, AppError> {
        // 1. Família pelo id ou pelo QR lido
        let family_id = match (payload.family_id, payload.family_qr.as_deref()) {
            (Some(id), _) => Some(id),
            (None, Some(raw)) => Some(qr::decode_family(raw)?),
            (None, None) => None,
        };

        // 2. A família precisa ser desta mesquita
        if let Some(id) = family_id {
            self.family_repo.find_family(&mut *conn, masjid_id, id).await?;
        }

        let new = NewTransaction {
            amount: payload.amount,
            description: payload.description.trim().to_string(),
            category: payload.category.trim().to_string(),
            kind: payload.kind,
            date: payload.date.unwrap_or_else(|| Utc::now().date_naive()),
            family_id,
            employee_id: None,
        };

        self.repo.create_transaction(&mut *conn, masjid_id, &new).await
    }

    pub async fn delete(&self, conn: &mut PgConnection, masjid_id: Uuid, transaction_id: Uuid) -> Result<(), AppError> {
        self.repo.delete_transaction(conn, masjid_id, transaction_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(kind: TransactionKind, amount: i64, description: &str, category: &str) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            masjid_id: Uuid::nil(),
            amount: Decimal::from(amount),
            description: description.into(),
            category: category.into(),
            kind,
            date: NaiveDate::from_ymd_opt(2026, 2, 25).unwrap(),
            family_id: None,
            employee_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn balance_is_income_minus_expense() {
        let rows = vec![
            tx(TransactionKind::Income, 1000, "Friday collection", "Donation"),
            tx(TransactionKind::Subscription, 500, "FAM-001 monthly", "Subscription"),
            tx(TransactionKind::Expense, 300, "Electricity", "Utilities"),
        ];
        let s = summarize(&rows);

        assert_eq!(s.total_income, Decimal::from(1500));
        assert_eq!(s.total_subscription, Decimal::from(500));
        assert_eq!(s.total_expense, Decimal::from(300));
        assert_eq!(s.balance, s.total_income - s.total_expense);
    }

    #[test]
    fn zero_amount_event_rows_are_excluded() {
        let rows = vec![
            tx(TransactionKind::Income, 0, "Event: Ramadan Ration - FAM-001", EVENT_CATEGORY),
            tx(TransactionKind::Income, 0, "நிகழ்வு வருகை", "Other"),
            tx(TransactionKind::Income, 200, "Sadaqah", "Donation"),
        ];
        assert!(is_event_entry(&rows[0]));
        assert!(is_event_entry(&rows[1]));
        assert_eq!(summarize(&rows).total_income, Decimal::from(200));
    }

    #[test]
    fn event_tag_with_amount_still_counts() {
        let row = tx(TransactionKind::Income, 50, "Event sponsorship", "Event");
        assert!(!is_event_entry(&row));
        assert_eq!(summarize(&[row]).balance, Decimal::from(50));
    }

    #[test]
    fn tag_needs_a_word_boundary() {
        // "prevention" contém "event" no meio da palavra
        let row = tx(TransactionKind::Expense, 0, "Prevention kit", "Health");
        assert!(!is_event_entry(&row));
    }

    #[test]
    fn words_starting_with_event_are_not_tags() {
        let row = tx(TransactionKind::Income, 0, "Eventually settled", "Other");
        assert!(!is_event_entry(&row));
        let plural = tx(TransactionKind::Income, 0, "Events desk", "Other");
        assert!(is_event_entry(&plural));
    }

    #[test]
    fn empty_list_is_all_zero() {
        assert_eq!(summarize(&[]), FinancialSummary::default());
    }

    #[test]
    fn paid_ignores_expenses() {
        let rows = vec![
            tx(TransactionKind::Subscription, 500, "Jan", "Subscription"),
            tx(TransactionKind::Income, 250, "Extra", "Donation"),
            tx(TransactionKind::Expense, 100, "Refund", "Other"),
        ];
        assert_eq!(total_paid(&rows), Decimal::from(750));
    }
}
