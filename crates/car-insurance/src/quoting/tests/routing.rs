use super::common::*;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

fn json_request(method: Method, uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::to_vec(payload).expect("payload encodes"),
        ))
        .expect("request builds")
}

async fn post_budget(router: axum::Router, payload: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(json_request(
            Method::POST,
            "/api/v1/insurance/budget",
            &payload,
        ))
        .await
        .expect("route executes");
    let status = response.status();
    (status, read_json_body(response).await)
}

#[tokio::test]
async fn valid_budget_is_created() {
    let (router, seeded) = seeded_router();

    let (status, body) = post_budget(
        router,
        json!({
            "carId": seeded.car_with_main_driver.0,
            "customerId": seeded.customer.id.0,
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["carId"], json!(seeded.car_with_main_driver.0));
    assert_eq!(body["customerId"], json!(seeded.customer.id.0));
    assert!(body["id"].is_i64());
}

#[tokio::test]
async fn negative_customer_id_is_a_bad_request() {
    let (router, seeded) = seeded_router();

    let (status, body) = post_budget(
        router,
        json!({ "carId": seeded.car_with_main_driver.0, "customerId": -1 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("BUSINESS_RULE_VIOLATION"));
    assert_eq!(body["reason"], json!("customer_not_found"));
}

#[tokio::test]
async fn null_car_id_is_a_bad_request() {
    let (router, seeded) = seeded_router();

    let (status, body) =
        post_budget(router, json!({ "carId": null, "customerId": seeded.customer.id.0 })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["reason"], json!("request_malformed"));
}

#[tokio::test]
async fn date_failures_are_bad_requests() {
    let scenarios = [
        (json!("2025-99-99"), Value::Null, "invalid_start_date"),
        (json!("2025-01-01"), json!("invalid-date-format"), "invalid_end_date"),
        (json!("2025-06-01"), json!("2025-05-01"), "end_before_start"),
        (json!("2020-01-01"), json!("2026-01-01"), "start_in_past"),
        (json!("2025-05-01"), json!("2028-05-01"), "range_too_long"),
        (Value::Null, json!("2026-01-01"), "request_malformed"),
        (json!("2025-05-01T00:00:00+99:99"), json!("2026-05-01"), "invalid_start_date"),
        (json!("2025-13-01"), json!("2026-01-01"), "invalid_start_date"),
        (json!("2025-02-30"), json!("2026-01-01"), "invalid_start_date"),
        (json!("2025-5-1"), json!("2026-01-01"), "invalid_start_date"),
        (json!("2025-05-01"), json!("+2026-01-01"), "invalid_end_date"),
    ];

    for (start, end, reason) in scenarios {
        let (router, seeded) = seeded_router();
        let mut payload = json!({
            "carId": seeded.car_with_main_driver.0,
            "customerId": seeded.customer.id.0,
        });
        if !start.is_null() {
            payload["startDate"] = start.clone();
        }
        if !end.is_null() {
            payload["endDate"] = end.clone();
        }

        let (status, body) = post_budget(router, payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{start} -> {end}");
        assert_eq!(body["code"], json!("VALIDATION_ERROR"));
        assert_eq!(body["reason"], json!(reason), "{start} -> {end}");
    }
}

#[tokio::test]
async fn car_without_main_driver_has_its_own_error() {
    let (router, seeded) = seeded_router();

    let (status, body) = post_budget(
        router,
        json!({
            "carId": seeded.car_without_main_driver.0,
            "customerId": seeded.customer.id.0,
        }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], json!("NO_MAIN_DRIVER_REGISTERED"));
}

#[tokio::test]
async fn undecodable_payloads_are_bad_requests() {
    let (router, _) = seeded_router();

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/insurance/budget")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{ not json"))
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, body) = post_budget(router, json!({ "carId": "one", "customerId": 1 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("REQUEST_MALFORMED"));
}

#[tokio::test]
async fn update_route_changes_dates_and_rejects_unknown_budgets() {
    let (router, seeded) = seeded_router();

    let (status, created) = post_budget(
        router.clone(),
        json!({
            "carId": seeded.car_with_main_driver.0,
            "customerId": seeded.customer.id.0,
            "startDate": "2025-02-01",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let response = router
        .clone()
        .oneshot(json_request(
            Method::PUT,
            "/api/v1/insurance/budget",
            &json!({
                "budgetId": created["id"],
                "startDate": "2025-03-01",
                "endDate": "2026-03-01",
            }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let updated = read_json_body(response).await;
    assert_eq!(updated["startDate"], json!("2025-03-01"));
    assert_eq!(updated["endDate"], json!("2026-03-01"));

    let response = router
        .oneshot(json_request(
            Method::PUT,
            "/api/v1/insurance/budget",
            &json!({ "budgetId": 999_999, "carId": seeded.car_with_main_driver.0 }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(body["reason"], json!("budget_not_found"));
}

#[tokio::test]
async fn budget_lookup_route_returns_not_found_for_unknown_ids() {
    let (router, _) = seeded_router();

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/v1/insurance/budget/123456")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn registration_routes_build_a_quotable_car() {
    let (router, _) = seeded_router();

    let send = |method: Method, uri: &str, payload: Value| {
        let router = router.clone();
        let request = json_request(method, uri, &payload);
        async move {
            let response = router.oneshot(request).await.expect("route executes");
            let status = response.status();
            (status, read_json_body(response).await)
        }
    };

    let (status, driver) = send(
        Method::POST,
        "/api/v1/drivers",
        json!({ "name": "Ana", "document": "32165498700", "birthdate": "1992-07-04" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, customer) = send(
        Method::POST,
        "/api/v1/customers",
        json!({ "name": "Ana Souza", "driverId": driver["id"] }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, car) = send(
        Method::POST,
        "/api/v1/cars",
        json!({
            "manufacturer": "Fiat",
            "model": "Argo",
            "releaseYear": 2022,
            "fipeValue": "78500.00",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let car_id = car["id"].as_i64().expect("car id");
    let (status, _) = send(
        Method::POST,
        &format!("/api/v1/cars/{car_id}/drivers"),
        json!({ "driverId": driver["id"], "mainDriver": true }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        Method::POST,
        "/api/v1/insurance/budget",
        json!({ "carId": car_id, "customerId": customer["id"] }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let customer_id = customer["id"].as_i64().expect("customer id");
    let (status, renamed) = send(
        Method::PUT,
        &format!("/api/v1/customers/{customer_id}"),
        json!({ "name": "Ana S. Souza" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["name"], json!("Ana S. Souza"));
    assert_eq!(renamed["driverId"], driver["id"]);
}
