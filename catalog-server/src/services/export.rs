//! Product export (JSON or CSV)

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::error::AppResult;
use shared::models::Product;
use shared::util::millis_to_rfc3339;

use crate::audit::{AuditAction, AuditService, RequestMeta};
use crate::core::ServerState;
use crate::db::repository::{CategoryRepository, ProductRepository};

/// CSV column order
pub const CSV_COLUMNS: [&str; 10] = [
    "id",
    "name",
    "description",
    "category_name",
    "price",
    "quantity",
    "status",
    "tags",
    "created_at",
    "views",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    /// `csv` selects CSV, anything else is JSON
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()) {
            Some(s) if s == "csv" => Self::Csv,
            _ => Self::Json,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

/// One exported product joined with its category name
#[derive(Debug, Clone, Serialize)]
pub struct ExportRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category_name: String,
    pub price: f64,
    pub quantity: i64,
    pub status: String,
    pub tags: Vec<String>,
    pub created_at: String,
    pub views: i64,
}

/// JSON export body
#[derive(Debug, Clone, Serialize)]
pub struct JsonExport {
    pub data: Vec<ExportRow>,
    pub count: usize,
    pub exported_at: String,
    pub format: &'static str,
}

pub enum Export {
    Json(JsonExport),
    Csv { filename: String, body: String },
}

/// `products_<YYYYmmdd_HHMMSS>.csv`
pub fn csv_filename(at: DateTime<Utc>) -> String {
    format!("products_{}.csv", at.format("%Y%m%d_%H%M%S"))
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render rows as CSV; the header is always present
pub fn render_csv(rows: &[ExportRow]) -> String {
    let mut out = CSV_COLUMNS.join(",");
    out.push_str("\r\n");
    for row in rows {
        let fields = [
            csv_field(&row.id),
            csv_field(&row.name),
            csv_field(&row.description),
            csv_field(&row.category_name),
            row.price.to_string(),
            row.quantity.to_string(),
            csv_field(&row.status),
            csv_field(&row.tags.join(";")),
            csv_field(&row.created_at),
            row.views.to_string(),
        ];
        out.push_str(&fields.join(","));
        out.push_str("\r\n");
    }
    out
}

fn to_row(product: Product, category_name: String) -> ExportRow {
    ExportRow {
        id: product.id,
        name: product.name,
        description: product.description,
        category_name,
        price: product.price,
        quantity: product.quantity,
        status: product.status.to_string(),
        tags: product.tags,
        created_at: millis_to_rfc3339(product.created_at),
        views: product.views,
    }
}

#[derive(Clone)]
pub struct ExportService {
    products: ProductRepository,
    categories: CategoryRepository,
    audit: AuditService,
}

impl ExportService {
    pub fn from_state(state: &ServerState) -> AppResult<Self> {
        let db = state.storage()?;
        Ok(Self {
            products: ProductRepository::new(db.clone()),
            categories: CategoryRepository::new(db.clone()),
            audit: state.audit.clone(),
        })
    }

    /// Products with their category name; orphaned products are left out
    async fn rows(&self) -> AppResult<Vec<ExportRow>> {
        let products = self.products.find_all().await?;
        let mut keys: Vec<String> = products.iter().map(|p| p.category_id.clone()).collect();
        keys.sort();
        keys.dedup();
        let categories = self.categories.find_many(&keys).await?;

        Ok(products
            .into_iter()
            .filter_map(|p| {
                let name = categories.get(&p.category_id)?.name.clone();
                Some(to_row(p, name))
            })
            .collect())
    }

    pub async fn export(&self, format: ExportFormat, meta: &RequestMeta) -> AppResult<Export> {
        let rows = self.rows().await?;
        let now = Utc::now();

        tracing::info!(format = format.as_str(), count = rows.len(), "Exporting products");

        self.audit.record(
            AuditAction::Read,
            "export",
            None,
            serde_json::json!({ "format": format.as_str(), "count": rows.len() }),
            meta,
        );

        Ok(match format {
            ExportFormat::Csv => Export::Csv {
                filename: csv_filename(now),
                body: render_csv(&rows),
            },
            ExportFormat::Json => Export::Json(JsonExport {
                count: rows.len(),
                data: rows,
                exported_at: now.to_rfc3339(),
                format: format.as_str(),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row() -> ExportRow {
        ExportRow {
            id: "abc".into(),
            name: "Claw Hammer".into(),
            description: "Forged, \"heavy\" steel".into(),
            category_name: "Tools".into(),
            price: 19.5,
            quantity: 3,
            status: "active".into(),
            tags: vec!["steel".into(), "hand".into()],
            created_at: "2024-01-02T03:04:05+00:00".into(),
            views: 7,
        }
    }

    #[test]
    fn test_empty_export_keeps_header() {
        assert_eq!(
            render_csv(&[]),
            "id,name,description,category_name,price,quantity,status,tags,created_at,views\r\n"
        );
    }

    #[test]
    fn test_csv_quotes_and_joins_tags() {
        let csv = render_csv(&[row()]);
        let line = csv.lines().nth(1).unwrap();
        assert_eq!(
            line,
            "abc,Claw Hammer,\"Forged, \"\"heavy\"\" steel\",Tools,19.5,3,active,steel;hand,2024-01-02T03:04:05+00:00,7"
        );
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(ExportFormat::parse(None), ExportFormat::Json);
        assert_eq!(ExportFormat::parse(Some("CSV")), ExportFormat::Csv);
        assert_eq!(ExportFormat::parse(Some("xml")), ExportFormat::Json);
    }

    #[test]
    fn test_filename() {
        let at = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        assert_eq!(csv_filename(at), "products_20240506_070809.csv");
    }
}
