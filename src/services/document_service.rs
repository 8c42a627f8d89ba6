// src/services/document_service.rs

use chrono::Utc;
use genpdf::{elements, fonts, style, Alignment, Element};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    common::{error::AppError, qr},
    db::{EventRepository, FamilyRepository, FinanceRepository, MasjidRepository},
    models::{
        event::{EventAttendance, EventSummary},
        family::Family,
        finance::{Transaction, TransactionKind},
        report::ReportQuery,
        settings::MasjidSettings,
    },
    services::finance_service::summarize,
};

// =============================================================================
//  COLUNAS
// =============================================================================

/// Uma coluna selecionável de relatório, ligada ao tipo da linha.
pub trait ReportColumn: Copy + PartialEq + 'static {
    type Row;

    const ALL: &'static [Self];
    const DEFAULT: &'static [Self];

    /// Nome aceito no parâmetro `columns`.
    fn key(self) -> &'static str;
    fn header(self) -> &'static str;
    fn cell(self, row: &Self::Row) -> String;

    /// Peso da coluna na largura da tabela.
    fn weight(self) -> usize {
        2
    }
}

/// Lê a lista `a,b,c`. Nome desconhecido é erro; lista vazia usa o padrão.
pub fn parse_columns<C: ReportColumn>(raw: Option<&str>) -> Result<Vec<C>, AppError> {
    let mut columns: Vec<C> = Vec::new();

    for name in raw.unwrap_or_default().split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let column = C::ALL
            .iter()
            .copied()
            .find(|c| c.key().eq_ignore_ascii_case(name))
            .ok_or_else(|| AppError::InvalidColumn(name.to_string()))?;

        if !columns.contains(&column) {
            columns.push(column);
        }
    }

    if columns.is_empty() {
        columns.extend_from_slice(C::DEFAULT);
    }
    Ok(columns)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FamilyColumn {
    Code,
    Head,
    Address,
    Phone,
    Subscription,
    Widow,
}

impl ReportColumn for FamilyColumn {
    type Row = Family;

    const ALL: &'static [Self] = &[
        Self::Code,
        Self::Head,
        Self::Address,
        Self::Phone,
        Self::Subscription,
        Self::Widow,
    ];
    const DEFAULT: &'static [Self] = &[Self::Code, Self::Head, Self::Phone, Self::Subscription];

    fn key(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Head => "head",
            Self::Address => "address",
            Self::Phone => "phone",
            Self::Subscription => "subscription",
            Self::Widow => "widow",
        }
    }

    fn header(self) -> &'static str {
        match self {
            Self::Code => "Family Code",
            Self::Head => "Head of Family",
            Self::Address => "Address",
            Self::Phone => "Phone",
            Self::Subscription => "Subscription",
            Self::Widow => "Widow Head",
        }
    }

    fn cell(self, row: &Family) -> String {
        match self {
            Self::Code => row.family_code.clone(),
            Self::Head => row.head_name.clone(),
            Self::Address => row.address.clone().unwrap_or_default(),
            Self::Phone => row.phone.clone().unwrap_or_default(),
            Self::Subscription => format!("{:.2}", row.subscription_amount),
            Self::Widow => (if row.is_widow_head { "Yes" } else { "No" }).to_string(),
        }
    }

    fn weight(self) -> usize {
        match self {
            Self::Address | Self::Head => 3,
            Self::Widow => 1,
            _ => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionColumn {
    Date,
    Description,
    Category,
    Type,
    Amount,
}

impl ReportColumn for TransactionColumn {
    type Row = Transaction;

    const ALL: &'static [Self] = &[Self::Date, Self::Description, Self::Category, Self::Type, Self::Amount];
    const DEFAULT: &'static [Self] = Self::ALL;

    fn key(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Description => "description",
            Self::Category => "category",
            Self::Type => "type",
            Self::Amount => "amount",
        }
    }

    fn header(self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Description => "Description",
            Self::Category => "Category",
            Self::Type => "Type",
            Self::Amount => "Amount",
        }
    }

    fn cell(self, row: &Transaction) -> String {
        match self {
            Self::Date => row.date.format("%Y-%m-%d").to_string(),
            Self::Description => row.description.clone(),
            Self::Category => row.category.clone(),
            Self::Type => {
                let label = match row.kind {
                    TransactionKind::Income => "Income",
                    TransactionKind::Expense => "Expense",
                    TransactionKind::Subscription => "Subscription",
                };
                label.to_string()
            }
            Self::Amount => format!("{:.2}", row.amount),
        }
    }

    fn weight(self) -> usize {
        match self {
            Self::Description => 4,
            _ => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventColumn {
    Name,
    Date,
    Families,
    Received,
    Pending,
}

impl ReportColumn for EventColumn {
    type Row = EventSummary;

    const ALL: &'static [Self] = &[Self::Name, Self::Date, Self::Families, Self::Received, Self::Pending];
    const DEFAULT: &'static [Self] = Self::ALL;

    fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Date => "date",
            Self::Families => "families",
            Self::Received => "received",
            Self::Pending => "pending",
        }
    }

    fn header(self) -> &'static str {
        match self {
            Self::Name => "Event",
            Self::Date => "Date",
            Self::Families => "Families",
            Self::Received => "Received",
            Self::Pending => "Pending",
        }
    }

    fn cell(self, row: &EventSummary) -> String {
        match self {
            Self::Name => row.name.clone(),
            Self::Date => row.date.format("%Y-%m-%d").to_string(),
            Self::Families => row.total_families.to_string(),
            Self::Received => row.received_count.to_string(),
            Self::Pending => (row.total_families - row.received_count).to_string(),
        }
    }

    fn weight(self) -> usize {
        match self {
            Self::Name => 4,
            _ => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceColumn {
    Code,
    Head,
    Status,
    ReceivedAt,
}

impl ReportColumn for AttendanceColumn {
    type Row = EventAttendance;

    const ALL: &'static [Self] = &[Self::Code, Self::Head, Self::Status, Self::ReceivedAt];
    const DEFAULT: &'static [Self] = &[Self::Code, Self::Head, Self::Status];

    fn key(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Head => "head",
            Self::Status => "status",
            Self::ReceivedAt => "received_at",
        }
    }

    fn header(self) -> &'static str {
        match self {
            Self::Code => "Family Code",
            Self::Head => "Head of Family",
            Self::Status => "Status",
            Self::ReceivedAt => "Received At",
        }
    }

    fn cell(self, row: &EventAttendance) -> String {
        match self {
            Self::Code => row.family_code.clone(),
            Self::Head => row.head_name.clone(),
            Self::Status => row.status().label().to_string(),
            Self::ReceivedAt => row
                .received_at
                .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        }
    }

    fn weight(self) -> usize {
        match self {
            Self::Head => 4,
            _ => 2,
        }
    }
}

// =============================================================================
//  PDF
// =============================================================================

fn pdf_error(e: genpdf::error::Error) -> AppError {
    AppError::InternalServerError(anyhow::Error::msg(e.to_string()))
}

pub(crate) fn load_fonts(dir: &str, family: &str) -> Result<fonts::FontFamily<fonts::FontData>, AppError> {
    fonts::from_files(dir, family, None).map_err(|e| {
        tracing::error!("Falha ao carregar a fonte {} em {}: {}", family, dir, e);
        AppError::FontNotFound(format!("{}/{}", dir, family))
    })
}

fn table<C: ReportColumn>(columns: &[C], rows: &[C::Row]) -> Result<elements::TableLayout, AppError> {
    let mut table = elements::TableLayout::new(columns.iter().map(|c| c.weight()).collect());
    table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

    let style_bold = style::Style::new().bold();
    columns
        .iter()
        .fold(table.row(), |row, c| row.element(elements::Paragraph::new(c.header()).styled(style_bold)))
        .push()
        .map_err(pdf_error)?;

    for r in rows {
        columns
            .iter()
            .fold(table.row(), |row, c| row.element(elements::Paragraph::new(c.cell(r))))
            .push()
            .map_err(pdf_error)?;
    }

    Ok(table)
}

fn render(doc: genpdf::Document) -> Result<Vec<u8>, AppError> {
    let mut buffer = Vec::new();
    doc.render(&mut buffer).map_err(pdf_error)?;
    Ok(buffer)
}

#[derive(Clone)]
pub struct DocumentService {
    family_repo: FamilyRepository,
    finance_repo: FinanceRepository,
    event_repo: EventRepository,
    masjid_repo: MasjidRepository,
    fonts_dir: String,
    font_family: String,
}

impl DocumentService {
    pub fn new(
        family_repo: FamilyRepository,
        finance_repo: FinanceRepository,
        event_repo: EventRepository,
        masjid_repo: MasjidRepository,
        fonts_dir: String,
        font_family: String,
    ) -> Self {
        Self { family_repo, finance_repo, event_repo, masjid_repo, fonts_dir, font_family }
    }

    // Cabeçalho com o nome da mesquita, comum a todos os documentos
    fn document(&self, masjid: &MasjidSettings, title: &str) -> Result<genpdf::Document, AppError> {
        let font_family = load_fonts(&self.fonts_dir, &self.font_family)?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(title);
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        doc.push(elements::Paragraph::new(masjid.name.clone()).styled(style::Style::new().bold().with_font_size(18)));
        if let Some(tagline) = &masjid.tagline {
            doc.push(elements::Paragraph::new(tagline.clone()).styled(style::Style::new().italic().with_font_size(10)));
        }
        doc.push(elements::Break::new(1.5));

        doc.push(elements::Paragraph::new(title).styled(style::Style::new().bold().with_font_size(14)));
        doc.push(
            elements::Paragraph::new(format!("Generated: {}", Utc::now().format("%Y-%m-%d %H:%M UTC")))
                .styled(style::Style::new().with_font_size(8)),
        );
        doc.push(elements::Break::new(1));

        Ok(doc)
    }

    pub async fn families_report(
        &self,
        conn: &mut PgConnection,
        masjid_id: Uuid,
        query: &ReportQuery,
    ) -> Result<Vec<u8>, AppError> {
        let columns = parse_columns::<FamilyColumn>(query.columns.as_deref())?;

        let families = self.family_repo.list_families(&mut *conn, masjid_id, query.q.as_deref()).await?;
        let masjid = self.masjid_repo.get_settings(masjid_id).await?;

        let mut doc = self.document(&masjid, "Families")?;
        doc.push(table(&columns, &families)?);
        doc.push(elements::Break::new(1));
        doc.push(elements::Paragraph::new(format!("Total families: {}", families.len())));

        render(doc)
    }

    pub async fn transactions_report(
        &self,
        conn: &mut PgConnection,
        masjid_id: Uuid,
        query: &ReportQuery,
    ) -> Result<Vec<u8>, AppError> {
        let columns = parse_columns::<TransactionColumn>(query.columns.as_deref())?;

        let transactions = self
            .finance_repo
            .list_transactions(&mut *conn, masjid_id, query.q.as_deref())
            .await?;
        let masjid = self.masjid_repo.get_settings(masjid_id).await?;

        // Os totais acompanham as linhas impressas
        let summary = summarize(&transactions);

        let mut doc = self.document(&masjid, "Accounts")?;
        doc.push(table(&columns, &transactions)?);
        doc.push(elements::Break::new(1.5));

        let style_bold = style::Style::new().bold();
        for (label, value) in [
            ("Total income", summary.total_income),
            ("Total expense", summary.total_expense),
            ("Balance", summary.balance),
        ] {
            let mut line = elements::Paragraph::new(format!("{}: {:.2}", label, value));
            line.set_alignment(Alignment::Right);
            doc.push(line.styled(style_bold));
        }

        render(doc)
    }

    pub async fn events_report(
        &self,
        conn: &mut PgConnection,
        masjid_id: Uuid,
        query: &ReportQuery,
    ) -> Result<Vec<u8>, AppError> {
        let columns = parse_columns::<EventColumn>(query.columns.as_deref())?;

        let events = self.event_repo.list_events(&mut *conn, masjid_id).await?;
        let masjid = self.masjid_repo.get_settings(masjid_id).await?;

        let mut doc = self.document(&masjid, "Events")?;
        doc.push(table(&columns, &events)?);

        render(doc)
    }

    pub async fn attendance_report(
        &self,
        conn: &mut PgConnection,
        masjid_id: Uuid,
        event_id: Uuid,
        query: &ReportQuery,
    ) -> Result<Vec<u8>, AppError> {
        let columns = parse_columns::<AttendanceColumn>(query.columns.as_deref())?;

        let event = self.event_repo.find_event(&mut *conn, masjid_id, event_id).await?;
        let rows = self
            .event_repo
            .list_attendance(&mut *conn, masjid_id, event_id, query.q.as_deref())
            .await?;
        let masjid = self.masjid_repo.get_settings(masjid_id).await?;

        let received = rows.iter().filter(|r| r.received).count();

        let mut doc = self.document(&masjid, &format!("{} ({})", event.name, event.date.format("%Y-%m-%d")))?;
        doc.push(elements::Paragraph::new(format!(
            "Received: {}    Pending: {}",
            received,
            rows.len() - received
        )));
        doc.push(elements::Break::new(1));
        doc.push(table(&columns, &rows)?);

        render(doc)
    }

    /// Cartão da família com o QR impresso, para ser lido nas entregas.
    pub async fn family_card(&self, conn: &mut PgConnection, masjid_id: Uuid, family_id: Uuid) -> Result<Vec<u8>, AppError> {
        let family = self.family_repo.find_family(&mut *conn, masjid_id, family_id).await?;
        let masjid = self.masjid_repo.get_settings(masjid_id).await?;

        let payload = qr::encode_family(family.id);
        let image = qr::render_image(&payload)?;

        let mut doc = self.document(&masjid, "Family Card")?;

        doc.push(elements::Paragraph::new(family.family_code.clone()).styled(style::Style::new().bold().with_font_size(16)));
        doc.push(elements::Paragraph::new(family.head_name.clone()));
        if let Some(address) = &family.address {
            doc.push(elements::Paragraph::new(address.clone()));
        }
        doc.push(elements::Break::new(1));

        let pdf_image = elements::Image::from_dynamic_image(image)
            .map_err(pdf_error)?
            .with_alignment(Alignment::Center)
            .with_scale(genpdf::Scale::new(1.5, 1.5));
        doc.push(pdf_image);

        doc.push(elements::Break::new(0.5));
        let mut caption = elements::Paragraph::new(payload);
        caption.set_alignment(Alignment::Center);
        doc.push(caption.styled(style::Style::new().with_font_size(7)));

        render(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn family() -> Family {
        Family {
            id: Uuid::new_v4(),
            masjid_id: Uuid::nil(),
            family_code: "FAM-007".into(),
            head_name: "Mohamed Rizwan".into(),
            address: None,
            phone: Some("0771234567".into()),
            subscription_amount: Decimal::new(150050, 2),
            is_widow_head: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn empty_selection_uses_defaults() {
        assert_eq!(parse_columns::<FamilyColumn>(None).unwrap(), FamilyColumn::DEFAULT);
        assert_eq!(parse_columns::<FamilyColumn>(Some(" , ")).unwrap(), FamilyColumn::DEFAULT);
    }

    #[test]
    fn keeps_requested_order_without_duplicates() {
        let cols = parse_columns::<FamilyColumn>(Some("widow, CODE,code,head")).unwrap();
        assert_eq!(cols, vec![FamilyColumn::Widow, FamilyColumn::Code, FamilyColumn::Head]);
    }

    #[test]
    fn unknown_column_is_rejected() {
        let err = parse_columns::<TransactionColumn>(Some("date,balance")).unwrap_err();
        assert!(matches!(err, AppError::InvalidColumn(name) if name == "balance"));
    }

    #[test]
    fn family_cells() {
        let f = family();
        assert_eq!(FamilyColumn::Subscription.cell(&f), "1500.50");
        assert_eq!(FamilyColumn::Widow.cell(&f), "Yes");
        assert_eq!(FamilyColumn::Address.cell(&f), "");
    }

    #[test]
    fn attendance_cells_derive_status() {
        let row = EventAttendance {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            family_id: Uuid::new_v4(),
            family_code: "FAM-001".into(),
            head_name: "Abdul Cader".into(),
            received: false,
            received_at: None,
        };
        assert_eq!(AttendanceColumn::Status.cell(&row), "Pending");
        assert_eq!(AttendanceColumn::ReceivedAt.cell(&row), "");
    }

    #[test]
    fn event_pending_is_derived() {
        let row = EventSummary {
            id: Uuid::new_v4(),
            name: "Ramadan Ration".into(),
            date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            total_families: 40,
            received_count: 31,
        };
        assert_eq!(EventColumn::Pending.cell(&row), "9");
    }

    #[test]
    fn missing_font_is_reported() {
        let err = load_fonts("./does-not-exist", "Roboto").unwrap_err();
        assert!(matches!(err, AppError::FontNotFound(_)));
    }
}
