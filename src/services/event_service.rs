// src/services/event_service.rs

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{Acquire, PgConnection};
use uuid::Uuid;

use crate::{
    common::{error::AppError, qr},
    db::{EventRepository, FamilyRepository, FinanceRepository},
    models::{
        event::{
            AttendanceView, CreateEventPayload, Event, EventAttendance, EventDetail, EventSummary,
            ScanOutcome, ScanPayload,
        },
        finance::{NewTransaction, TransactionKind},
    },
    services::finance_service::EVENT_CATEGORY,
};

/// O que uma leitura de QR precisa gravar.
#[derive(Debug)]
struct ScanPlan {
    mark_received: bool,
    log_entry: Option<NewTransaction>,
}

// Linha já recebida não é marcada nem registrada de novo
fn plan_scan(
    event: &Event,
    row: Option<&EventAttendance>,
    log_transaction: bool,
    today: NaiveDate,
) -> Result<ScanPlan, AppError> {
    let row = row.ok_or(AppError::NotFound("attendance"))?;

    if row.received {
        return Ok(ScanPlan { mark_received: false, log_entry: None });
    }

    let log_entry = log_transaction.then(|| NewTransaction {
        amount: Decimal::ZERO,
        description: format!("Event: {} - {}", event.name, row.family_code),
        category: EVENT_CATEGORY.to_string(),
        kind: TransactionKind::Income,
        date: today,
        family_id: Some(row.family_id),
        employee_id: None,
    });

    Ok(ScanPlan { mark_received: true, log_entry })
}

#[derive(Clone)]
pub struct EventService {
    repo: EventRepository,
    family_repo: FamilyRepository,
    finance_repo: FinanceRepository,
}

impl EventService {
    pub fn new(repo: EventRepository, family_repo: FamilyRepository, finance_repo: FinanceRepository) -> Self {
        Self { repo, family_repo, finance_repo }
    }

    pub async fn list(&self, conn: &mut PgConnection, masjid_id: Uuid) -> Result<Vec<EventSummary>, AppError> {
        self.repo.list_events(conn, masjid_id).await
    }

    /// Cria o evento e já abre uma linha de presença para cada família.
    pub async fn create(
        &self,
        conn: &mut PgConnection,
        masjid_id: Uuid,
        payload: &CreateEventPayload,
    ) -> Result<Event, AppError> {
        // 1. Transação (vira savepoint dentro da transação da requisição)
        let mut tx = conn.begin().await?;

        // 2. Evento
        let event = self.repo.create_event(&mut *tx, masjid_id, &payload.name, payload.date).await?;

        // 3. Presenças
        let seeded = self.repo.seed_attendance(&mut *tx, masjid_id, event.id).await?;

        tx.commit().await?;

        tracing::info!(event_id = %event.id, families = seeded, "Evento criado com presenças");
        Ok(event)
    }

    /// Evento com a lista de presença. Os contadores ignoram o filtro `q`.
    pub async fn detail(
        &self,
        conn: &mut PgConnection,
        masjid_id: Uuid,
        event_id: Uuid,
        q: Option<&str>,
    ) -> Result<EventDetail, AppError> {
        let event = self.repo.find_event(&mut *conn, masjid_id, event_id).await?;
        let all = self.repo.list_attendance(&mut *conn, masjid_id, event_id, None).await?;

        let received_count = all.iter().filter(|a| a.received).count();
        let pending_count = all.len() - received_count;

        let rows = match q.map(str::trim).filter(|s| !s.is_empty()) {
            Some(q) => self.repo.list_attendance(&mut *conn, masjid_id, event_id, Some(q)).await?,
            None => all,
        };

        Ok(EventDetail {
            event,
            received_count,
            pending_count,
            attendance: rows.into_iter().map(AttendanceView::from).collect(),
        })
    }

    pub async fn delete(&self, conn: &mut PgConnection, masjid_id: Uuid, event_id: Uuid) -> Result<(), AppError> {
        self.repo.delete_event(conn, masjid_id, event_id).await
    }

    /// Leitura do QR na entrega. Ler de novo não duplica nada.
    pub async fn scan(
        &self,
        conn: &mut PgConnection,
        masjid_id: Uuid,
        event_id: Uuid,
        payload: &ScanPayload,
    ) -> Result<ScanOutcome, AppError> {
        let family_id = qr::decode_family(&payload.payload)?;

        let mut tx = conn.begin().await?;

        let event = self.repo.find_event(&mut *tx, masjid_id, event_id).await?;

        // 1. A família precisa existir e ter linha neste evento
        self.family_repo.find_family(&mut *tx, masjid_id, family_id).await?;
        let row = self.repo.lock_attendance(&mut *tx, masjid_id, event_id, family_id).await?;
        let plan = plan_scan(&event, row.as_ref(), payload.log_transaction, Utc::now().date_naive())?;
        let row = row.ok_or(AppError::NotFound("attendance"))?;

        // 2. Marca como recebido
        if plan.mark_received {
            self.repo.set_received(&mut *tx, masjid_id, event_id, row.id, true).await?;
        }

        // 3. Registro de valor zero no caixa (fica fora das somas)
        let mut logged_transaction_id = None;
        if let Some(entry) = &plan.log_entry {
            let logged = self.finance_repo.create_transaction(&mut *tx, masjid_id, entry).await?;
            logged_transaction_id = Some(logged.id);
        }

        tx.commit().await?;

        Ok(ScanOutcome {
            family_id,
            family_code: row.family_code,
            head_name: row.head_name,
            already_received: !plan.mark_received,
            logged_transaction_id,
        })
    }

    /// Marcação manual na lista (o botão de cada linha).
    pub async fn set_attendance(
        &self,
        conn: &mut PgConnection,
        masjid_id: Uuid,
        event_id: Uuid,
        attendance_id: Uuid,
        received: bool,
    ) -> Result<AttendanceView, AppError> {
        let row = self
            .repo
            .set_received(conn, masjid_id, event_id, attendance_id, received)
            .await?;
        Ok(AttendanceView::from(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::finance::Transaction,
        services::finance_service::{is_event_entry, summarize},
    };

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    fn event() -> Event {
        Event {
            id: Uuid::new_v4(),
            masjid_id: Uuid::new_v4(),
            name: "Ramadan Ration".into(),
            date: today(),
            created_at: Utc::now(),
        }
    }

    fn attendance(received: bool) -> EventAttendance {
        EventAttendance {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            family_id: Uuid::new_v4(),
            family_code: "FAM-001".into(),
            head_name: "Abdul Rahman".into(),
            received,
            received_at: received.then(Utc::now),
        }
    }

    // O lançamento como ele volta do banco
    fn stored(entry: NewTransaction) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            masjid_id: Uuid::nil(),
            amount: entry.amount,
            description: entry.description,
            category: entry.category,
            kind: entry.kind,
            date: entry.date,
            family_id: entry.family_id,
            employee_id: entry.employee_id,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn pending_row_is_marked_and_logged() {
        let row = attendance(false);
        let plan = plan_scan(&event(), Some(&row), true, today()).unwrap();

        assert!(plan.mark_received);
        let entry = plan.log_entry.unwrap();
        assert_eq!(entry.amount, Decimal::ZERO);
        assert_eq!(entry.category, EVENT_CATEGORY);
        assert_eq!(entry.description, "Event: Ramadan Ration - FAM-001");
        assert_eq!(entry.family_id, Some(row.family_id));
        assert_eq!(entry.date, today());
    }

    #[test]
    fn logged_entry_stays_out_of_the_totals() {
        let plan = plan_scan(&event(), Some(&attendance(false)), true, today()).unwrap();
        let row = stored(plan.log_entry.unwrap());

        assert!(is_event_entry(&row));
        assert_eq!(summarize(&[row]).total_income, Decimal::ZERO);
    }

    #[test]
    fn scan_without_log_only_marks() {
        let plan = plan_scan(&event(), Some(&attendance(false)), false, today()).unwrap();
        assert!(plan.mark_received);
        assert!(plan.log_entry.is_none());
    }

    #[test]
    fn second_scan_writes_nothing() {
        let plan = plan_scan(&event(), Some(&attendance(true)), true, today()).unwrap();
        assert!(!plan.mark_received);
        assert!(plan.log_entry.is_none());
    }

    #[test]
    fn family_without_row_is_not_found() {
        let result = plan_scan(&event(), None, true, today());
        assert!(matches!(result, Err(AppError::NotFound("attendance"))));
    }
}
