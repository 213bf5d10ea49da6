use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::RequestContext;
use crate::domain::order::{LineItem, NewOrder, Order};
use crate::errors::{AppError, ErrorBody};
use crate::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// Optional caller-chosen id. Generated when absent or empty.
    #[serde(default)]
    pub id: Option<String>,
    pub customer_email: String,
    pub line_items: Vec<LineItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub order: Order,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListOrdersResponse {
    pub orders: Vec<Order>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListOrdersParams {
    /// One of `pending`, `charged`, `fulfilled`, `cancelled`. Omit for all orders.
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChargeOrderRequest {
    #[serde(default)]
    pub card_token: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChargeOrderResponse {
    pub charged_cents: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderResponse {
    pub message: String,
    pub order_id: String,
    /// Present only when the cancellation refunded a non-zero charge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refunded_cents: Option<i64>,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /healthz
#[utoipa::path(
    get,
    path = "/healthz",
    responses((status = 200, description = "Service is up")),
    tag = "health"
)]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}

/// GET /orders
///
/// Lists orders, optionally restricted to one status. Always returns an array,
/// empty when nothing matches.
#[utoipa::path(
    get,
    path = "/orders",
    responses(
        (status = 200, description = "Matching orders", body = ListOrdersResponse),
        (status = 400, description = "Unknown status value", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    state: web::Data<AppState>,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let orders = state.orders.list_orders(&query.status)?;
    Ok(HttpResponse::Ok().json(ListOrdersResponse { orders }))
}

/// POST /orders
///
/// Creates a new order in the `pending` status.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Invalid email, line items, total or JSON", body = ErrorBody),
        (status = 409, description = "An order with this id already exists", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody),
    ),
    tag = "orders"
)]
pub async fn create_order(
    state: web::Data<AppState>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let order = state.orders.create_order(NewOrder {
        id: body.id,
        customer_email: body.customer_email,
        line_items: body.line_items,
    })?;
    Ok(HttpResponse::Created().json(OrderResponse { order }))
}

/// GET /orders/{id}
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = String, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found", body = ErrorBody),
    ),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let order = state.orders.get_order(&path.into_inner())?;
    Ok(HttpResponse::Ok().json(OrderResponse { order }))
}

/// POST /orders/{id}/charge
///
/// Charges a pending order's total to the supplied card token. An unknown id
/// answers 404 even when the body is missing or malformed.
#[utoipa::path(
    post,
    path = "/orders/{id}/charge",
    params(("id" = String, Path, description = "Order id")),
    request_body = ChargeOrderRequest,
    responses(
        (status = 200, description = "Order charged", body = ChargeOrderResponse),
        (status = 400, description = "Malformed JSON body", body = ErrorBody),
        (status = 404, description = "Order not found", body = ErrorBody),
        (status = 409, description = "Order is not pending", body = ErrorBody),
        (status = 500, description = "Charge service or storage failure", body = ErrorBody),
    ),
    tag = "orders"
)]
pub async fn charge_order(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: Result<web::Json<ChargeOrderRequest>, actix_web::Error>,
) -> actix_web::Result<HttpResponse> {
    let id = path.into_inner();
    state.orders.get_order(&id).map_err(AppError::from)?;
    let body = body?;

    let ctx = RequestContext::with_timeout(state.request_timeout);
    let charged_cents = state
        .orders
        .charge_order(&ctx, &id, &body.card_token)
        .await
        .map_err(AppError::from)?;
    Ok(HttpResponse::Ok().json(ChargeOrderResponse { charged_cents }))
}

/// POST /orders/{id}/cancel
///
/// Cancels a pending or charged order. Charged orders are refunded first.
#[utoipa::path(
    post,
    path = "/orders/{id}/cancel",
    params(("id" = String, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order cancelled", body = CancelOrderResponse),
        (status = 404, description = "Order not found", body = ErrorBody),
        (status = 409, description = "Order is fulfilled or already cancelled", body = ErrorBody),
        (status = 500, description = "Refund or storage failure", body = ErrorBody),
    ),
    tag = "orders"
)]
pub async fn cancel_order(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let ctx = RequestContext::with_timeout(state.request_timeout);
    let cancellation = state.orders.cancel_order(&ctx, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(CancelOrderResponse {
        message: "order cancelled successfully".to_string(),
        order_id: cancellation.order_id,
        refunded_cents: (cancellation.was_refunded && cancellation.refunded_cents > 0)
            .then_some(cancellation.refunded_cents),
    }))
}
