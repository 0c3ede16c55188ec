use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use bson::Document;
use serde::{Deserialize, Serialize};
use tripdesk_db::models::{Supplier, capabilities};
use tripdesk_services::dao::base::PaginationParams;
use tripdesk_services::dao::supplier::NewSupplier;
use validator::Validate;

use crate::routes::offer::parse_id;
use crate::{
    error::ApiError,
    extractors::auth::AuthUser,
    response::{ApiResponse, PagedResponse, ok, paged},
    state::AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSupplierRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub code: String,
    pub contact_name: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub payment_terms: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSupplierRequest {
    pub name: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub payment_terms: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SupplierResponse {
    pub id: String,
    pub name: String,
    pub code: String,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub payment_terms: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
}

impl From<Supplier> for SupplierResponse {
    fn from(supplier: Supplier) -> Self {
        Self {
            id: supplier.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: supplier.name,
            code: supplier.code,
            contact_name: supplier.contact_name,
            contact_email: supplier.contact_email,
            contact_phone: supplier.contact_phone,
            payment_terms: supplier.payment_terms,
            notes: supplier.notes,
            is_active: supplier.is_active,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListSuppliersQuery {
    pub q: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListSuppliersQuery>,
) -> Result<Json<PagedResponse<SupplierResponse>>, ApiError> {
    auth.require(capabilities::VIEW_REPORTS)?;
    let result = state
        .suppliers
        .list(query.q.as_deref(), &query.pagination)
        .await?;
    Ok(paged(result.map(SupplierResponse::from)))
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateSupplierRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SupplierResponse>>), ApiError> {
    auth.require(capabilities::MANAGE_SUPPLIERS)?;
    body.validate()?;

    let supplier = state
        .suppliers
        .create(
            NewSupplier {
                name: body.name,
                code: body.code,
                contact_name: body.contact_name,
                contact_email: body.contact_email,
                contact_phone: body.contact_phone,
                payment_terms: body.payment_terms,
                notes: body.notes,
            },
            auth.user_id,
        )
        .await?;
    Ok((StatusCode::CREATED, ok(supplier.into())))
}

pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(supplier_id): Path<String>,
) -> Result<Json<ApiResponse<SupplierResponse>>, ApiError> {
    auth.require(capabilities::VIEW_REPORTS)?;
    let id = parse_id(&supplier_id)?;
    let supplier = state.suppliers.base.find_by_id(id).await?;
    Ok(ok(supplier.into()))
}

pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(supplier_id): Path<String>,
    Json(body): Json<UpdateSupplierRequest>,
) -> Result<Json<ApiResponse<SupplierResponse>>, ApiError> {
    auth.require(capabilities::MANAGE_SUPPLIERS)?;
    let id = parse_id(&supplier_id)?;

    let mut set = Document::new();
    if let Some(name) = body.name {
        set.insert("name", name);
    }
    if let Some(contact_name) = body.contact_name {
        set.insert("contact_name", contact_name);
    }
    if let Some(contact_email) = body.contact_email {
        set.insert("contact_email", contact_email);
    }
    if let Some(contact_phone) = body.contact_phone {
        set.insert("contact_phone", contact_phone);
    }
    if let Some(payment_terms) = body.payment_terms {
        set.insert("payment_terms", payment_terms);
    }
    if let Some(notes) = body.notes {
        set.insert("notes", notes);
    }
    if set.is_empty() {
        return Err(ApiError::BadRequest("Nothing to update".to_string()));
    }

    let supplier = state.suppliers.update(id, set, auth.user_id).await?;
    Ok(ok(supplier.into()))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(supplier_id): Path<String>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    auth.require(capabilities::MANAGE_SUPPLIERS)?;
    let id = parse_id(&supplier_id)?;
    let deactivated = state.suppliers.deactivate(id, auth.user_id).await?;
    Ok(ok(deactivated))
}
