//! Record API integration tests: place hierarchy, tour plan joins and catalog,
//! bookings, reviews and quotes.
//!
//! Run with: `cargo test -p wayfarer-api --test records_test`

mod helpers;

use axum::http::StatusCode;
use axum_test::multipart::MultipartForm;
use helpers::fixtures::{address_form, place_form, tour_plan_form};
use helpers::{api_path, setup_test_app, TestApp};
use serde_json::{json, Value};

async fn create(app: &TestApp, path: &str, form: MultipartForm) -> Value {
    let response = app.client().post(&api_path(path)).multipart(form).await;
    assert_eq!(response.status_code(), StatusCode::CREATED, "{}", response.text());
    response.json()
}

fn id(record: &Value) -> String {
    record["id"].as_str().expect("record id").to_string()
}

#[tokio::test]
async fn test_health_and_openapi() {
    let app = setup_test_app().await;
    let health = app.client().get("/health").await;
    health.assert_status_ok();
    assert_eq!(health.json::<Value>()["database"], "healthy");

    let spec = app.client().get("/api/openapi.json").await;
    spec.assert_status_ok();
    assert!(spec.json::<Value>()["paths"]["/api/v1/places/{id}/sub-places"].is_object());

    let version = app.client().get(&api_path("")).await;
    assert_eq!(version.json::<Value>()["apiVersion"], "v1");
}

#[tokio::test]
async fn test_sub_place_hierarchy() {
    let app = setup_test_app().await;
    let address = create(&app, "/addresses", address_form("Rajasthan", "Jaipur")).await;
    let city = create(&app, "/places", place_form("Jaipur", &id(&address))).await;
    assert_eq!(city["type"], "city");

    let sub = create(
        &app,
        "/places",
        place_form("Amber Fort", &id(&address))
            .add_text("type", "sub_place")
            .add_text("parentPlace", id(&city)),
    )
    .await;

    let parent: Value = app
        .client()
        .get(&api_path(&format!("/places/{}", id(&city))))
        .await
        .json();
    assert_eq!(parent["subPlaces"], json!([id(&sub)]));

    let children: Value = app
        .client()
        .get(&api_path(&format!("/places/{}/sub-places", id(&city))))
        .await
        .json();
    assert_eq!(children.as_array().map(Vec::len), Some(1));

    let cities: Value = app.client().get(&api_path("/places/cities")).await.json();
    assert_eq!(cities.as_array().map(Vec::len), Some(1));

    // a sub-place is not a city
    let not_city = app
        .client()
        .get(&api_path(&format!("/places/{}/sub-places", id(&sub))))
        .await;
    assert_eq!(not_city.status_code(), StatusCode::NOT_FOUND);

    // changing the parent is rejected
    let moved = app
        .client()
        .put(&api_path(&format!("/places/{}", id(&sub))))
        .multipart(MultipartForm::new().add_text("parentPlace", id(&sub)))
        .await;
    assert_eq!(moved.status_code(), StatusCode::BAD_REQUEST);

    // city delete leaves the sub-place in place
    app.client()
        .delete(&api_path(&format!("/places/{}", id(&city))))
        .await
        .assert_status_ok();
    app.client()
        .get(&api_path(&format!("/places/{}", id(&sub))))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_sub_place_requires_city_parent() {
    let app = setup_test_app().await;
    let address = create(&app, "/addresses", address_form("Goa", "Panaji")).await;

    let orphan = app
        .client()
        .post(&api_path("/places"))
        .multipart(place_form("Fort Aguada", &id(&address)).add_text("type", "sub_place"))
        .await;
    assert_eq!(orphan.status_code(), StatusCode::BAD_REQUEST);

    let unknown_state = app
        .client()
        .post(&api_path("/places"))
        .multipart(place_form("Panaji", "00000000-0000-4000-8000-000000000000"))
        .await;
    assert_eq!(unknown_state.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tour_plan_views_and_lookups() {
    let app = setup_test_app().await;
    let address = create(&app, "/addresses", address_form("Rajasthan", "Jaipur")).await;
    let theme = create(&app, "/themes", MultipartForm::new().add_text("name", "heritage")).await;
    let plan = create(
        &app,
        "/tour-plans",
        tour_plan_form("raj01", &id(&address))
            .add_text("baseFare", "15000")
            .add_text("themeIds", id(&theme))
            .add_text("inclusions", "Hotel")
            .add_text("inclusions", "Breakfast")
            .add_text(
                "itinerary",
                r#"[{"day": 1, "title": "Arrival", "places": []}]"#,
            ),
    )
    .await;
    assert_eq!(plan["inclusions"], json!(["Hotel", "Breakfast"]));

    let view: Value = app
        .client()
        .get(&api_path(&format!("/tour-plans/{}", id(&plan))))
        .await
        .json();
    assert_eq!(view["addressDetails"]["state"], "Rajasthan");
    assert_eq!(view["themes"][0]["name"], "HERITAGE");
    assert_eq!(view["itinerary"][0]["title"], "Arrival");

    let by_code: Value = app
        .client()
        .get(&api_path("/tour-plans/tour-code/Raj01"))
        .await
        .json();
    assert_eq!(by_code["id"], plan["id"]);

    let by_state: Value = app
        .client()
        .get(&api_path("/tour-plans/state/rajasthan"))
        .await
        .json();
    assert_eq!(by_state.as_array().map(Vec::len), Some(1));

    let unknown_state = app.client().get(&api_path("/tour-plans/state/Kerala")).await;
    assert_eq!(unknown_state.status_code(), StatusCode::NOT_FOUND);

    let catalog: Value = app.client().get(&api_path("/tour-plans/catalog")).await.json();
    assert_eq!(catalog["trendingCategories"][0]["state"], "Rajasthan");
    assert_eq!(catalog["data"].as_array().map(Vec::len), Some(7));

    let filtered: Value = app
        .client()
        .get(&api_path("/tour-plans"))
        .add_query_param("tourCode", "RAJ01")
        .await
        .json();
    assert_eq!(filtered.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_tour_plan_rejects_unknown_address() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .post(&api_path("/tour-plans"))
        .multipart(tour_plan_form("X1", "00000000-0000-4000-8000-000000000000"))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_booking_and_review_flow() {
    let app = setup_test_app().await;
    let address = create(&app, "/addresses", address_form("Goa", "Panaji")).await;
    let plan = create(&app, "/tour-plans", tour_plan_form("GOA1", &id(&address))).await;

    let booking = app
        .client()
        .post(&api_path("/bookings"))
        .json(&json!({
            "packageId": id(&plan),
            "price": 12000,
            "adultCount": 2,
            "date": "2026-12-20",
            "username": "Asha",
            "email": "asha@example.com",
            "phoneNumber": "9876543210"
        }))
        .await;
    assert_eq!(booking.status_code(), StatusCode::CREATED);
    let booking: Value = booking.json();
    assert!(booking["orderId"].as_str().is_some_and(|o| o.starts_with("ORD-")));

    let review = app
        .client()
        .post(&api_path("/reviews"))
        .json(&json!({
            "tourRating": 5,
            "recommend": true,
            "name": "Asha",
            "email": "asha@example.com",
            "bookingId": id(&booking),
            "packageId": id(&plan)
        }))
        .await;
    assert_eq!(review.status_code(), StatusCode::CREATED);
    let review: Value = review.json();

    let page: Value = app
        .client()
        .get(&api_path("/reviews"))
        .add_query_param("page", 1)
        .add_query_param("limit", 5)
        .await
        .json();
    assert_eq!(page["total"], 1);
    assert_eq!(page["reviews"][0]["tourPlanTitle"], "Tour GOA1");

    let for_plan: Value = app
        .client()
        .get(&api_path(&format!("/reviews/tour-plan/{}", id(&plan))))
        .await
        .json();
    assert_eq!(for_plan.as_array().map(Vec::len), Some(1));

    app.client()
        .delete(&api_path(&format!("/reviews/{}", id(&review))))
        .await
        .assert_status_ok();
    let stored: Value = app
        .client()
        .get(&api_path(&format!("/tour-plans/{}", id(&plan))))
        .await
        .json();
    assert_eq!(stored["reviews"], json!([]));
}

#[tokio::test]
async fn test_quote_status_update() {
    let app = setup_test_app().await;
    let quote: Value = app
        .client()
        .post(&api_path("/quotes"))
        .json(&json!({
            "email": "dev@example.com",
            "phone": "9876543210",
            "destination": "Ladakh",
            "startDate": "2026-07-01",
            "duration": "7 days"
        }))
        .await
        .json();
    assert_eq!(quote["status"], "pending");

    let updated = app
        .client()
        .patch(&api_path(&format!("/quotes/{}/status", id(&quote))))
        .json(&json!({ "status": "completed" }))
        .await;
    updated.assert_status_ok();
    assert_eq!(updated.json::<Value>()["status"], "completed");

    let bad = app
        .client()
        .patch(&api_path(&format!("/quotes/{}/status", id(&quote))))
        .json(&json!({ "status": "archived" }))
        .await;
    assert_eq!(bad.status_code(), StatusCode::BAD_REQUEST);
    assert!(bad.json::<Value>()["code"].is_string());
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let app = setup_test_app().await;
    let missing = "00000000-0000-4000-8000-000000000000";
    for path in [
        "/addresses",
        "/places",
        "/themes",
        "/tour-plans",
        "/bookings",
        "/reviews",
        "/quotes",
    ] {
        let response = app
            .client()
            .delete(&api_path(&format!("{}/{}", path, missing)))
            .await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND, "{}", path);
    }
}
