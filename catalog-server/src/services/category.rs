//! Category Service

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    Category, CategoryCreate, CategoryWithCount, DEFAULT_CATEGORY_COLOR, DEFAULT_CATEGORY_ICON,
};
use shared::util::{new_record_key, now_millis};

use crate::analytics::{AnalyticsService, actions};
use crate::audit::{AuditAction, AuditService, RequestMeta};
use crate::catalog::validation::validate_category_name;
use crate::core::ServerState;
use crate::db::repository::{CategoryDocument, CategoryRepository, RepoError};

#[derive(Clone)]
pub struct CategoryService {
    categories: CategoryRepository,
    audit: AuditService,
    analytics: AnalyticsService,
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl CategoryService {
    pub fn from_state(state: &ServerState) -> AppResult<Self> {
        let db = state.storage()?;
        Ok(Self {
            categories: CategoryRepository::new(db.clone()),
            audit: state.audit.clone(),
            analytics: state.analytics.clone(),
        })
    }

    /// All categories by name, each with its product count
    pub async fn list(&self, meta: &RequestMeta) -> AppResult<Vec<CategoryWithCount>> {
        let categories = self.categories.find_all().await?;
        let counts = self.categories.product_counts().await?;

        let result: Vec<CategoryWithCount> = categories
            .into_iter()
            .map(|category| CategoryWithCount {
                product_count: counts.get(&category.id).copied().unwrap_or(0),
                category,
            })
            .collect();

        self.audit.record(
            AuditAction::Read,
            "categories",
            None,
            serde_json::json!({ "count": result.len() }),
            meta,
        );
        Ok(result)
    }

    pub async fn create(&self, payload: CategoryCreate, meta: &RequestMeta) -> AppResult<Category> {
        let name = validate_category_name(&payload.name)?;
        let now = now_millis();
        let doc = CategoryDocument {
            name,
            description: payload
                .description
                .map(|d| d.trim().to_string())
                .unwrap_or_default(),
            color: or_default(payload.color, DEFAULT_CATEGORY_COLOR),
            icon: or_default(payload.icon, DEFAULT_CATEGORY_ICON),
            created_at: now,
            updated_at: now,
        };

        let category = self
            .categories
            .create(&new_record_key(), doc)
            .await
            .map_err(|e| match e {
                RepoError::Duplicate(_) => AppError::new(ErrorCode::CategoryNameExists)
                    .with_detail("name", payload.name.trim()),
                other => other.into(),
            })?;

        tracing::info!(id = %category.id, name = %category.name, "Category created");

        self.audit.record(
            AuditAction::Create,
            "category",
            Some(category.id.clone()),
            serde_json::to_value(&category).unwrap_or_default(),
            meta,
        );
        self.analytics.record(actions::CATEGORY_CREATED, None);
        Ok(category)
    }
}
