//! HTTP handlers for cost estimation

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::{get, post},
};
use utoipa::OpenApi;

use crate::error::PricingResult;
use crate::models::{
    BatchCalculationRequest, BatchItemError, BatchItemResult, BatchResult, CalculationRequest,
    CalculationResult, CostBreakdown, ServiceDescriptor,
};
use crate::service::CostEstimator;

const TAG: &str = "pricing";

/// OpenAPI documentation for the cost estimation API
#[derive(OpenApi)]
#[openapi(
    paths(calculate, calculate_batch, list_services, get_service),
    components(schemas(
        CalculationRequest,
        CalculationResult,
        CostBreakdown,
        BatchCalculationRequest,
        BatchResult,
        BatchItemResult,
        BatchItemError,
        ServiceDescriptor,
    )),
    tags((name = TAG, description = "Cloud cost estimation endpoints"))
)]
pub struct ApiDoc;

/// Create the cost estimation router
pub fn router(estimator: CostEstimator) -> Router {
    Router::new()
        .route("/calculate", post(calculate))
        .route("/calculate/batch", post(calculate_batch))
        .route("/services", get(list_services))
        .route("/services/{service_code}", get(get_service))
        .with_state(estimator)
}

/// Estimate the cost of one service configuration
#[utoipa::path(
    post,
    path = "/calculate",
    tag = TAG,
    request_body = CalculationRequest,
    responses(
        (status = 200, description = "Cost estimate", body = CalculationResult),
        (status = 400, description = "Malformed body, invalid configuration or unknown rate key"),
        (status = 404, description = "No pricing data for the service and region"),
        (status = 501, description = "Service is not supported"),
        (status = 500, description = "Internal server error")
    )
)]
async fn calculate(
    State(estimator): State<CostEstimator>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> PricingResult<Json<CalculationResult>> {
    let Json(request) = payload?;
    let result = estimator.calculate_request(request).await?;
    Ok(Json(result))
}

/// Estimate several configurations; failures are reported per item
#[utoipa::path(
    post,
    path = "/calculate/batch",
    tag = TAG,
    request_body = BatchCalculationRequest,
    responses(
        (status = 200, description = "Per-item results and totals", body = BatchResult),
        (status = 400, description = "Request body is not a valid batch")
    )
)]
async fn calculate_batch(
    State(estimator): State<CostEstimator>,
    payload: Result<Json<BatchCalculationRequest>, JsonRejection>,
) -> PricingResult<Json<BatchResult>> {
    let Json(request) = payload?;
    Ok(Json(estimator.calculate_batch(request.items).await))
}

/// List supported services
#[utoipa::path(
    get,
    path = "/services",
    tag = TAG,
    responses(
        (status = 200, description = "Supported services", body = Vec<ServiceDescriptor>)
    )
)]
async fn list_services(State(estimator): State<CostEstimator>) -> Json<Vec<ServiceDescriptor>> {
    Json(estimator.describe_supported_services())
}

/// Describe one supported service
#[utoipa::path(
    get,
    path = "/services/{service_code}",
    tag = TAG,
    params(
        ("service_code" = String, Path, description = "Service code, e.g. AmazonEC2")
    ),
    responses(
        (status = 200, description = "Service descriptor", body = ServiceDescriptor),
        (status = 501, description = "Service is not supported")
    )
)]
async fn get_service(
    State(estimator): State<CostEstimator>,
    Path(service_code): Path<String>,
) -> PricingResult<Json<ServiceDescriptor>> {
    Ok(Json(estimator.describe_service(&service_code)?))
}
