use crate::{ApiError, AppState, API_URL_HEADER, CORRELATION_HEADER, TOUCHPOINT_HEADER};
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use diversity_core::service::{parse_patch, parse_resource};
use diversity_core::{
    Diversity, DiversityPatch, DiversityResult, RequestContext, ResourceId, ValidationFailure,
};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn parse_id(raw: &str) -> DiversityResult<ResourceId> {
    Ok(ResourceId::parse(raw)?)
}

fn request_context(headers: &HeaderMap) -> DiversityResult<RequestContext> {
    RequestContext::new(
        header(headers, TOUCHPOINT_HEADER),
        header(headers, API_URL_HEADER),
        header(headers, CORRELATION_HEADER),
    )
}

fn request_span(ctx: &RequestContext, verb: &'static str) -> tracing::Span {
    tracing::info_span!(
        "diversity_request",
        verb,
        correlation_id = %ctx.correlation_id(),
        touchpoint = %ctx.touchpoint()
    )
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for load balancers and monitoring.
#[axum::debug_handler]
pub async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Diversity REST API is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/customers/{customer_id}/diversitydetails",
    params(
        ("customer_id" = String, Path, description = "Customer id (UUID)"),
        ("TouchpointId" = String, Header, description = "Caller touchpoint id"),
        ("DssCorrelationId" = Option<String>, Header, description = "Correlation id (UUID)")
    ),
    responses(
        (status = 200, description = "Diversity records for the customer", body = [Diversity]),
        (status = 204, description = "Customer or records not found"),
        (status = 400, description = "Invalid customer id or touchpoint")
    )
)]
/// List the diversity records of a customer
///
/// # Returns
/// * `200` with the records
/// * `204` when the customer does not exist or has no record
#[axum::debug_handler]
pub async fn list_diversity(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let ctx = request_context(&headers)?;
    let customer_id = parse_id(&customer_id)?;

    request_span(&ctx, "get").in_scope(|| {
        let records = state.service.list(&customer_id)?;
        if records.is_empty() {
            tracing::info!(customer_id = %customer_id, "no diversity records found");
            return Ok(StatusCode::NO_CONTENT.into_response());
        }
        Ok(Json(records).into_response())
    })
}

#[utoipa::path(
    get,
    path = "/customers/{customer_id}/diversitydetails/{diversity_id}",
    params(
        ("customer_id" = String, Path, description = "Customer id (UUID)"),
        ("diversity_id" = String, Path, description = "Diversity record id (UUID)"),
        ("TouchpointId" = String, Header, description = "Caller touchpoint id"),
        ("DssCorrelationId" = Option<String>, Header, description = "Correlation id (UUID)")
    ),
    responses(
        (status = 200, description = "The diversity record", body = Diversity),
        (status = 204, description = "Customer or record not found"),
        (status = 400, description = "Invalid id or touchpoint")
    )
)]
/// Fetch one diversity record
#[axum::debug_handler]
pub async fn get_diversity(
    State(state): State<AppState>,
    Path((customer_id, diversity_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let ctx = request_context(&headers)?;
    let customer_id = parse_id(&customer_id)?;
    let diversity_id = parse_id(&diversity_id)?;

    request_span(&ctx, "get_by_id").in_scope(|| {
        match state.service.get_by_id(&customer_id, &diversity_id)? {
            Some(record) => Ok(Json(record).into_response()),
            None => Ok(StatusCode::NO_CONTENT.into_response()),
        }
    })
}

#[utoipa::path(
    post,
    path = "/customers/{customer_id}/diversitydetails",
    request_body = Diversity,
    params(
        ("customer_id" = String, Path, description = "Customer id (UUID)"),
        ("TouchpointId" = String, Header, description = "Caller touchpoint id"),
        ("apimurl" = Option<String>, Header, description = "Base URL for links in change events"),
        ("DssCorrelationId" = Option<String>, Header, description = "Correlation id (UUID)")
    ),
    responses(
        (status = 201, description = "Diversity record created", body = Diversity),
        (status = 204, description = "Customer not found"),
        (status = 400, description = "Invalid customer id or touchpoint"),
        (status = 403, description = "Customer is read only"),
        (status = 409, description = "Customer already has a diversity record"),
        (status = 422, description = "Malformed body or validation failures", body = [ValidationFailure])
    )
)]
/// Create a customer's diversity record
///
/// The body is parsed by hand so that a malformed payload maps to `422` rather than
/// axum's JSON rejection codes.
#[axum::debug_handler]
pub async fn create_diversity(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    headers: HeaderMap,
    body: String,
) -> Result<Response, ApiError> {
    let ctx = request_context(&headers)?;
    let customer_id = parse_id(&customer_id)?;

    request_span(&ctx, "post").in_scope(|| {
        let resource = parse_resource(&body)?;
        let created = state.service.create(&ctx, customer_id, resource)?;
        Ok((StatusCode::CREATED, Json(created)).into_response())
    })
}

#[utoipa::path(
    patch,
    path = "/customers/{customer_id}/diversitydetails/{diversity_id}",
    request_body = DiversityPatch,
    params(
        ("customer_id" = String, Path, description = "Customer id (UUID)"),
        ("diversity_id" = String, Path, description = "Diversity record id (UUID)"),
        ("TouchpointId" = String, Header, description = "Caller touchpoint id"),
        ("apimurl" = Option<String>, Header, description = "Base URL for links in change events"),
        ("DssCorrelationId" = Option<String>, Header, description = "Correlation id (UUID)")
    ),
    responses(
        (status = 200, description = "Diversity record updated", body = Diversity),
        (status = 204, description = "Customer not found"),
        (status = 400, description = "Invalid id or touchpoint"),
        (status = 403, description = "Customer is read only"),
        (status = 404, description = "Diversity record not found"),
        (status = 422, description = "Malformed body or validation failures", body = [ValidationFailure]),
        (status = 500, description = "Stored record could not be merged")
    )
)]
/// Apply a sparse patch to a diversity record
#[axum::debug_handler]
pub async fn patch_diversity(
    State(state): State<AppState>,
    Path((customer_id, diversity_id)): Path<(String, String)>,
    headers: HeaderMap,
    body: String,
) -> Result<Response, ApiError> {
    let ctx = request_context(&headers)?;
    let customer_id = parse_id(&customer_id)?;
    let diversity_id = parse_id(&diversity_id)?;

    request_span(&ctx, "patch").in_scope(|| {
        let patch: DiversityPatch = parse_patch(&body)?;
        let updated: Diversity = state
            .service
            .patch(&ctx, customer_id, diversity_id, patch)?;
        Ok(Json(updated).into_response())
    })
}
