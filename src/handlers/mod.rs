pub mod orders;

use actix_web::HttpResponse;
use utoipa::OpenApi;

use crate::domain::order::{LineItem, Order};
use crate::errors::ErrorBody;

#[derive(OpenApi)]
#[openapi(
    paths(
        orders::health_check,
        orders::list_orders,
        orders::create_order,
        orders::get_order,
        orders::charge_order,
        orders::cancel_order,
    ),
    components(schemas(
        Order,
        LineItem,
        ErrorBody,
        orders::CreateOrderRequest,
        orders::OrderResponse,
        orders::ListOrdersResponse,
        orders::ChargeOrderRequest,
        orders::ChargeOrderResponse,
        orders::CancelOrderResponse,
    )),
    tags(
        (name = "orders", description = "Order lifecycle"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;

/// GET /api-docs/openapi.json
pub async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
