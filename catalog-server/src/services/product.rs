//! Product Service
//!
//! Product CRUD, list and bulk ingestion on top of the repositories.
//! Every operation leaves one audit entry; writes also bump the daily
//! analytics counters. Both side effects are queued, never awaited.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    BulkCreateRequest, BulkCreateResponse, BulkItemError, Category, CategorySummary, Product,
    ProductInput, ProductStatus, normalize_tags,
};
use shared::pagination::Pagination;
use shared::util::{new_record_key, now_millis, parse_record_key};

use crate::analytics::{AnalyticsService, actions};
use crate::audit::{AuditAction, AuditService, RequestMeta};
use crate::catalog::filter::AppliedFilters;
use crate::catalog::validation::validation_error;
use crate::catalog::{ListQuery, ProductFilter, validate_product};
use crate::core::ServerState;
use crate::db::repository::product::search_text;
use crate::db::repository::{CategoryRepository, ProductDocument, ProductPatch, ProductRepository};

/// Upper bound on candidates per bulk request
pub const MAX_BULK_PRODUCTS: usize = 100;

/// `GET /api/products` body
#[derive(Debug, Clone, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<Product>,
    pub pagination: Pagination,
    pub filters: AppliedFilters,
}

/// `DELETE /api/products/{id}` body
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Clone)]
pub struct ProductService {
    products: ProductRepository,
    categories: CategoryRepository,
    audit: AuditService,
    analytics: AnalyticsService,
    default_limit: u32,
}

fn product_not_found() -> AppError {
    AppError::new(ErrorCode::ProductNotFound)
}

fn category_not_found() -> AppError {
    AppError::new(ErrorCode::CategoryNotFound)
}

fn missing_field(field: &str) -> AppError {
    AppError::with_message(
        ErrorCode::RequiredField,
        format!("Missing required field: {field}"),
    )
    .with_detail(field, "required")
}

fn invalid_category_id(raw: &str) -> AppError {
    AppError::invalid_reference("Invalid category ID").with_detail("category_id", raw)
}

/// Product keys that cannot exist are simply not found
fn product_key(raw: &str) -> AppResult<String> {
    parse_record_key(raw).ok_or_else(product_not_found)
}

fn parse_status(raw: Option<&str>) -> ProductStatus {
    raw.and_then(|s| s.parse().ok()).unwrap_or_default()
}

/// Fields of a create candidate once presence and rules have passed
struct ValidCandidate {
    category_key: String,
    doc: ProductDocument,
}

/// Presence and rule checks shared by create and bulk create
///
/// On failure returns the field errors; the category is only checked for
/// being well-formed here, existence is resolved by the caller.
fn check_candidate(input: ProductInput, now: i64) -> Result<ValidCandidate, CandidateError> {
    if let Some(field) = input.missing_required_field() {
        return Err(CandidateError::Missing(field));
    }

    let errors = validate_product(&input);
    if !errors.is_empty() {
        return Err(CandidateError::Invalid(errors));
    }

    let raw_category = input.category_id.unwrap_or_default();
    let category_key = parse_record_key(&raw_category)
        .ok_or(CandidateError::BadCategory(raw_category))?;

    let name = input.name.unwrap_or_default().trim().to_string();
    let description = input.description.unwrap_or_default().trim().to_string();
    let tags = normalize_tags(input.tags.unwrap_or_default());

    Ok(ValidCandidate {
        doc: ProductDocument {
            id: None,
            search_text: search_text(&name, &description, &tags),
            name,
            description,
            category_id: category_key.clone(),
            price: input.price.unwrap_or_default(),
            quantity: input.quantity.unwrap_or_default(),
            tags,
            status: parse_status(input.status.as_deref()),
            created_at: now,
            updated_at: now,
            views: 0,
            last_viewed: None,
        },
        category_key,
    })
}

enum CandidateError {
    Missing(&'static str),
    Invalid(BTreeMap<String, String>),
    BadCategory(String),
}

impl CandidateError {
    fn into_app_error(self) -> AppError {
        match self {
            Self::Missing(field) => missing_field(field),
            Self::Invalid(errors) => validation_error(errors),
            Self::BadCategory(raw) => invalid_category_id(&raw),
        }
    }

    fn into_field_errors(self) -> BTreeMap<String, String> {
        match self {
            Self::Missing(field) => BTreeMap::from([(
                "general".to_string(),
                format!("Missing required field: {field}"),
            )]),
            Self::Invalid(errors) => errors,
            Self::BadCategory(_) => BTreeMap::from([(
                "category_id".to_string(),
                "Invalid category ID".to_string(),
            )]),
        }
    }
}

impl ProductService {
    pub fn from_state(state: &ServerState) -> AppResult<Self> {
        let db = state.storage()?;
        Ok(Self {
            products: ProductRepository::new(db.clone()),
            categories: CategoryRepository::new(db.clone()),
            audit: state.audit.clone(),
            analytics: state.analytics.clone(),
            default_limit: state.config.items_per_page,
        })
    }

    /// Inline category summaries, one lookup for the whole page
    async fn attach_categories(&self, products: &mut [Product]) -> AppResult<()> {
        let keys: Vec<String> = products
            .iter()
            .map(|p| p.category_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let categories = self.categories.find_many(&keys).await?;
        for product in products.iter_mut() {
            product.category = categories.get(&product.category_id).map(CategorySummary::from);
        }
        Ok(())
    }

    async fn attach_category(&self, product: &mut Product) -> AppResult<()> {
        product.category = self
            .categories
            .find_by_id(&product.category_id)
            .await?
            .as_ref()
            .map(CategorySummary::from);
        Ok(())
    }

    /// Resolve a raw category reference to an existing category
    async fn resolve_category(&self, raw: &str) -> AppResult<Category> {
        let key = parse_record_key(raw).ok_or_else(|| invalid_category_id(raw))?;
        self.categories
            .find_by_id(&key)
            .await?
            .ok_or_else(category_not_found)
    }

    /// Filtered, sorted page of products
    pub async fn list(&self, query: &ListQuery, meta: &RequestMeta) -> AppResult<ProductListResponse> {
        let filter = ProductFilter::from_query(query, self.default_limit)?;
        let (mut products, total) = self.products.find_page(&filter).await?;
        self.attach_categories(&mut products).await?;

        tracing::debug!(
            page = filter.page,
            limit = filter.limit,
            total,
            returned = products.len(),
            "Listed products"
        );

        self.audit.record(
            AuditAction::Read,
            "products",
            None,
            serde_json::json!({
                "filters": filter.applied,
                "count": products.len(),
            }),
            meta,
        );

        Ok(ProductListResponse {
            products,
            pagination: Pagination::new(filter.page, filter.limit, total),
            filters: filter.applied,
        })
    }

    /// Fetch one product, counting the view
    pub async fn get(&self, id: &str, meta: &RequestMeta) -> AppResult<Product> {
        let key = product_key(id)?;
        let mut product = self
            .products
            .record_view(&key, now_millis())
            .await?
            .ok_or_else(product_not_found)?;
        self.attach_category(&mut product).await?;

        self.audit.record(
            AuditAction::Read,
            "product",
            Some(key),
            serde_json::Value::Null,
            meta,
        );
        Ok(product)
    }

    pub async fn create(&self, input: ProductInput, meta: &RequestMeta) -> AppResult<Product> {
        let candidate =
            check_candidate(input, now_millis()).map_err(CandidateError::into_app_error)?;

        let category = self
            .categories
            .find_by_id(&candidate.category_key)
            .await?
            .ok_or_else(category_not_found)?;

        let key = new_record_key();
        let mut product = self.products.create(&key, candidate.doc).await?;
        product.category = Some(CategorySummary::from(&category));

        tracing::info!(id = %product.id, name = %product.name, "Product created");

        self.audit.record(
            AuditAction::Create,
            "product",
            Some(product.id.clone()),
            serde_json::to_value(&product).unwrap_or_default(),
            meta,
        );
        self.analytics.record(
            actions::PRODUCT_CREATED,
            Some(serde_json::json!({
                "category": category.name,
                "price": product.price,
            })),
        );
        Ok(product)
    }

    /// Partial update; only present fields are checked and applied
    pub async fn update(
        &self,
        id: &str,
        input: ProductInput,
        meta: &RequestMeta,
    ) -> AppResult<Product> {
        let key = product_key(id)?;
        let existing = self
            .products
            .find_by_id(&key)
            .await?
            .ok_or_else(product_not_found)?;

        let errors = validate_product(&input);
        if !errors.is_empty() {
            return Err(validation_error(errors));
        }

        let category = match input.category_id.as_deref() {
            Some(raw) => Some(self.resolve_category(raw).await?),
            None => None,
        };

        let name = input.name.map(|n| n.trim().to_string());
        let description = input.description.map(|d| d.trim().to_string());
        let tags = input.tags.map(normalize_tags);

        let patch = ProductPatch {
            search_text: Some(search_text(
                name.as_deref().unwrap_or(&existing.name),
                description.as_deref().unwrap_or(&existing.description),
                tags.as_deref().unwrap_or(&existing.tags),
            )),
            name,
            description,
            category_id: category.as_ref().map(|c| c.id.clone()),
            price: input.price,
            quantity: input.quantity,
            tags,
            status: input.status.as_deref().map(|s| parse_status(Some(s))),
            updated_at: now_millis(),
        };
        let changes = serde_json::to_value(&patch).unwrap_or_default();

        let mut product = self
            .products
            .update(&key, patch)
            .await?
            .ok_or_else(product_not_found)?;
        match &category {
            Some(category) => product.category = Some(CategorySummary::from(category)),
            None => self.attach_category(&mut product).await?,
        }

        tracing::info!(id = %key, "Product updated");

        self.audit
            .record(AuditAction::Update, "product", Some(key), changes, meta);
        self.analytics.record(actions::PRODUCT_UPDATED, None);
        Ok(product)
    }

    pub async fn delete(&self, id: &str, meta: &RequestMeta) -> AppResult<MessageResponse> {
        let key = product_key(id)?;
        let existing = self
            .products
            .find_by_id(&key)
            .await?
            .ok_or_else(product_not_found)?;

        self.products.delete(&key).await?;

        tracing::info!(id = %key, name = %existing.name, "Product deleted");

        self.audit.record(
            AuditAction::Delete,
            "product",
            Some(key),
            serde_json::json!({ "name": existing.name }),
            meta,
        );
        self.analytics.record(actions::PRODUCT_DELETED, None);

        Ok(MessageResponse {
            message: "Product deleted successfully".to_string(),
        })
    }

    /// Validate every candidate independently and insert the good ones in
    /// one batch
    pub async fn bulk_create(
        &self,
        request: BulkCreateRequest,
        meta: &RequestMeta,
    ) -> AppResult<BulkCreateResponse> {
        let total_attempted = request.products.len();
        if total_attempted == 0 {
            return Err(AppError::validation("No products provided"));
        }
        if total_attempted > MAX_BULK_PRODUCTS {
            return Err(AppError::with_message(
                ErrorCode::BulkLimitExceeded,
                format!("Maximum {MAX_BULK_PRODUCTS} products allowed per bulk operation"),
            )
            .with_detail("total_attempted", total_attempted));
        }

        let now = now_millis();
        let mut errors: Vec<BulkItemError> = Vec::new();
        let mut candidates: Vec<(usize, ValidCandidate)> = Vec::new();

        for (index, raw) in request.products.into_iter().enumerate() {
            let input = match serde_json::from_value::<ProductInput>(raw) {
                Ok(input) => input,
                Err(e) => {
                    errors.push(BulkItemError {
                        index,
                        errors: BTreeMap::from([(
                            "general".to_string(),
                            format!("Invalid product data: {e}"),
                        )]),
                    });
                    continue;
                }
            };
            match check_candidate(input, now) {
                Ok(candidate) => candidates.push((index, candidate)),
                Err(e) => errors.push(BulkItemError {
                    index,
                    errors: e.into_field_errors(),
                }),
            }
        }

        let keys: Vec<String> = candidates
            .iter()
            .map(|(_, c)| c.category_key.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let categories: HashMap<String, Category> = self.categories.find_many(&keys).await?;

        let mut docs = Vec::with_capacity(candidates.len());
        for (index, candidate) in candidates {
            if !categories.contains_key(&candidate.category_key) {
                errors.push(BulkItemError {
                    index,
                    errors: BTreeMap::from([(
                        "category_id".to_string(),
                        "Category not found".to_string(),
                    )]),
                });
                continue;
            }
            let mut doc = candidate.doc;
            doc.id = Some(new_record_key());
            docs.push(doc);
        }
        errors.sort_by_key(|e| e.index);

        let successful = self.products.insert_many(docs).await?;

        tracing::info!(
            total_attempted,
            successful,
            rejected = errors.len(),
            "Bulk product create completed"
        );

        self.audit.record(
            AuditAction::BulkCreate,
            "products",
            None,
            serde_json::json!({
                "total_attempted": total_attempted,
                "successful": successful,
                "errors": errors.len(),
            }),
            meta,
        );
        self.analytics.record(
            actions::BULK_PRODUCTS_CREATED,
            Some(serde_json::json!({ "count": successful })),
        );

        Ok(BulkCreateResponse {
            message: "Bulk operation completed".to_string(),
            successful,
            errors,
            total_attempted,
        })
    }
}
