//! HTTP contract tests: status codes, error codes and body shapes of every route.

mod common;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use order_up::configure;
use serde_json::{json, Value};

use common::{app_state, RecordingCharges};

macro_rules! app {
    ($charges:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(app_state($charges)))
                .configure(configure),
        )
        .await
    };
}

fn widget_body() -> Value {
    json!({
        "customerEmail": "buyer@example.com",
        "lineItems": [{ "description": "Widget", "unitPriceCents": 1000, "quantity": 2 }]
    })
}

#[actix_web::test]
async fn healthz_returns_empty_200() {
    let app = app!(Arc::default());

    let resp = test::call_service(&app, test::TestRequest::get().uri("/healthz").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(test::read_body(resp).await.is_empty());
}

#[actix_web::test]
async fn create_get_charge_cancel_flow() {
    let charges = Arc::new(RecordingCharges::default());
    let app = app!(charges.clone());

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/orders")
            .set_json(widget_body())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let id = created["order"]["id"].as_str().unwrap().to_string();
    assert_eq!(created["order"]["status"], 0);
    assert_eq!(created["order"]["customerEmail"], "buyer@example.com");

    let fetched: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/orders/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(fetched["order"], created["order"]);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/orders/{id}/charge"))
            .set_json(json!({ "cardToken": "tok_visa" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let charged: Value = test::read_body_json(resp).await;
    assert_eq!(charged, json!({ "chargedCents": 2000 }));

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/orders/{id}/cancel"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cancelled: Value = test::read_body_json(resp).await;
    assert_eq!(
        cancelled,
        json!({
            "message": "order cancelled successfully",
            "orderId": id,
            "refundedCents": 2000
        })
    );

    assert_eq!(
        charges.calls(),
        vec![("tok_visa".to_string(), 2000), (String::new(), -2000)]
    );

    let fetched: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/orders/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(fetched["order"]["status"], 3);
}

#[actix_web::test]
async fn cancel_pending_omits_refund() {
    let charges = Arc::new(RecordingCharges::default());
    let app = app!(charges.clone());

    let created: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/orders")
            .set_json(widget_body())
            .to_request(),
    )
    .await;
    let id = created["order"]["id"].as_str().unwrap();

    let cancelled: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri(&format!("/orders/{id}/cancel"))
            .to_request(),
    )
    .await;

    assert!(cancelled.get("refundedCents").is_none());
    assert_eq!(cancelled["orderId"], id);
    assert!(charges.calls().is_empty());
}

#[actix_web::test]
async fn cancel_zero_total_charged_order_omits_refund() {
    let charges = Arc::new(RecordingCharges::default());
    let app = app!(charges.clone());

    let created: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/orders")
            .set_json(json!({
                "customerEmail": "buyer@example.com",
                "lineItems": [
                    { "description": "Widget", "unitPriceCents": 1000, "quantity": 1 },
                    { "description": "Voucher", "unitPriceCents": -1000, "quantity": 1 }
                ]
            }))
            .to_request(),
    )
    .await;
    let id = created["order"]["id"].as_str().unwrap();

    let charged: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri(&format!("/orders/{id}/charge"))
            .set_json(json!({ "cardToken": "tok" }))
            .to_request(),
    )
    .await;
    assert_eq!(charged, json!({ "chargedCents": 0 }));

    let cancelled: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri(&format!("/orders/{id}/cancel"))
            .to_request(),
    )
    .await;

    assert!(cancelled.get("refundedCents").is_none());
    assert_eq!(
        charges.calls(),
        vec![("tok".to_string(), 0), (String::new(), 0)]
    );
}

/// Call the service and return the status plus the `{code, message}` error body.
macro_rules! error_of {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service($app, $req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        assert!(body["message"].is_string(), "error body must carry a message");
        (status, body)
    }};
}

#[actix_web::test]
async fn create_order_validation_codes() {
    let app = app!(Arc::default());

    let cases = [
        (
            json!({ "customerEmail": "nobody", "lineItems": [{ "description": "x", "unitPriceCents": 1, "quantity": 1 }] }),
            "invalid_email",
        ),
        (
            json!({ "customerEmail": "a@b.c", "lineItems": [] }),
            "invalid_line_items",
        ),
        (
            json!({ "customerEmail": "a@b.c", "lineItems": [{ "description": "x", "unitPriceCents": 1, "quantity": 0 }] }),
            "invalid_line_items",
        ),
        (
            json!({ "customerEmail": "a@b.c", "lineItems": [{ "description": "coupon", "unitPriceCents": -1, "quantity": 1 }] }),
            "invalid_total",
        ),
        (json!({ "customerEmail": 5 }), "invalid_json"),
    ];

    for (body, code) in cases {
        let (status, err) = error_of!(
            &app,
            test::TestRequest::post()
                .uri("/orders")
                .set_json(body)
                .to_request()
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["code"], code);
    }

    let listed: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/orders").to_request(),
    )
    .await;
    assert_eq!(listed, json!({ "orders": [] }));
}

#[actix_web::test]
async fn malformed_json_is_invalid_json() {
    let app = app!(Arc::default());

    let (status, err) = error_of!(
        &app,
        test::TestRequest::post()
            .uri("/orders")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request()
    );

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "invalid_json");
}

#[actix_web::test]
async fn duplicate_caller_id_is_conflict() {
    let app = app!(Arc::default());
    let mut body = widget_body();
    body["id"] = json!("order-42");

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/orders")
            .set_json(body.clone())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let (status, err) = error_of!(
        &app,
        test::TestRequest::post()
            .uri("/orders")
            .set_json(body)
            .to_request()
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["code"], "order_already_exists");
}

#[actix_web::test]
async fn unknown_order_is_404_everywhere() {
    let app = app!(Arc::default());

    let requests = [
        test::TestRequest::get().uri("/orders/missing").to_request(),
        test::TestRequest::post()
            .uri("/orders/missing/charge")
            .set_json(json!({ "cardToken": "tok" }))
            .to_request(),
        test::TestRequest::post()
            .uri("/orders/missing/cancel")
            .to_request(),
    ];

    for req in requests {
        let (status, err) = error_of!(&app, req);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(err["code"], "order_not_found");
    }
}

#[actix_web::test]
async fn charge_resolves_order_before_reading_body() {
    let charges = Arc::new(RecordingCharges::default());
    let app = app!(charges.clone());

    let (status, err) = error_of!(
        &app,
        test::TestRequest::post()
            .uri("/orders/missing/charge")
            .to_request()
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["code"], "order_not_found");

    let created: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/orders")
            .set_json(widget_body())
            .to_request(),
    )
    .await;
    let id = created["order"]["id"].as_str().unwrap();

    let (status, err) = error_of!(
        &app,
        test::TestRequest::post()
            .uri(&format!("/orders/{id}/charge"))
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request()
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "invalid_json");
    assert!(charges.calls().is_empty());
}

#[actix_web::test]
async fn second_charge_is_not_eligible() {
    let app = app!(Arc::default());
    let created: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/orders")
            .set_json(widget_body())
            .to_request(),
    )
    .await;
    let id = created["order"]["id"].as_str().unwrap();
    let charge = || {
        test::TestRequest::post()
            .uri(&format!("/orders/{id}/charge"))
            .set_json(json!({ "cardToken": "tok" }))
            .to_request()
    };

    assert_eq!(
        test::call_service(&app, charge()).await.status(),
        StatusCode::OK
    );
    let (status, err) = error_of!(&app, charge());
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["code"], "order_not_eligible");
}

#[actix_web::test]
async fn charge_service_failure_is_500_and_order_stays_pending() {
    let charges = Arc::new(RecordingCharges::default());
    charges.fail_with("card declined");
    let app = app!(charges.clone());

    let created: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/orders")
            .set_json(widget_body())
            .to_request(),
    )
    .await;
    let id = created["order"]["id"].as_str().unwrap();

    let (status, err) = error_of!(
        &app,
        test::TestRequest::post()
            .uri(&format!("/orders/{id}/charge"))
            .set_json(json!({ "cardToken": "tok" }))
            .to_request()
    );
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err["code"], "charge_service_error");
    assert!(err["message"].as_str().unwrap().contains("card declined"));

    let fetched: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/orders/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(fetched["order"]["status"], 0);
}

#[actix_web::test]
async fn list_filters_and_rejects_unknown_status() {
    let app = app!(Arc::default());

    let mut ids = Vec::new();
    for _ in 0..3 {
        let created: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/orders")
                .set_json(widget_body())
                .to_request(),
        )
        .await;
        ids.push(created["order"]["id"].as_str().unwrap().to_string());
    }
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/orders/{}/charge", ids[0]))
            .set_json(json!({ "cardToken": "tok" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let all: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/orders").to_request(),
    )
    .await;
    assert_eq!(all["orders"].as_array().unwrap().len(), 3);

    let charged: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/orders?status=charged")
            .to_request(),
    )
    .await;
    let charged = charged["orders"].as_array().unwrap();
    assert_eq!(charged.len(), 1);
    assert_eq!(charged[0]["id"], ids[0].as_str());

    let fulfilled: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/orders?status=fulfilled")
            .to_request(),
    )
    .await;
    assert_eq!(fulfilled, json!({ "orders": [] }));

    let (status, err) = error_of!(
        &app,
        test::TestRequest::get()
            .uri("/orders?status=shipped")
            .to_request()
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "invalid_status");
}

#[actix_web::test]
async fn openapi_document_lists_routes() {
    let app = app!(Arc::default());

    let doc: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api-docs/openapi.json")
            .to_request(),
    )
    .await;

    for path in [
        "/healthz",
        "/orders",
        "/orders/{id}",
        "/orders/{id}/charge",
        "/orders/{id}/cancel",
    ] {
        assert!(doc["paths"].get(path).is_some(), "missing {path}");
    }
}
