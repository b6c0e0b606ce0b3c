//! Entity-scoped media over HTTP: upload, resolve, folder sharing and reaping.
//!
//! Run with: `cargo test -p wayfarer-api --test media_test`

mod helpers;

use axum::http::StatusCode;
use helpers::fixtures::{
    address_form, create_minimal_png, image_part, place_form, split_stored, tour_plan_form,
};
use helpers::{api_path, setup_test_app, setup_test_app_with};
use serde_json::Value;

async fn create_address(app: &helpers::TestApp, state: &str, city: &str, image: &[u8]) -> Value {
    let response = app
        .client()
        .post(&api_path("/addresses"))
        .multipart(address_form(state, city).add_part("images", image_part("photo.jpg", image.to_vec())))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    response.json::<Value>()
}

fn images(record: &Value) -> Vec<String> {
    record["images"]
        .as_array()
        .expect("images array")
        .iter()
        .map(|v| v.as_str().expect("stored path").to_string())
        .collect()
}

#[tokio::test]
async fn test_address_images_resolve_to_uploaded_bytes() {
    let app = setup_test_app().await;
    let png = create_minimal_png();

    let response = app
        .client()
        .post(&api_path("/addresses"))
        .multipart(
            address_form("Tamil Nadu", "Chennai")
                .add_part("images", image_part("marina.png", png.clone()))
                .add_part("images", image_part("temple.jpg", b"jpeg-bytes".to_vec())),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let address: Value = response.json();

    let stored = images(&address);
    assert_eq!(stored.len(), 2);
    for path in &stored {
        let (segment, _) = split_stored(path);
        assert_eq!(segment, "Tamil_Nadu");
    }

    let (_, first) = split_stored(&stored[0]);
    let file = app
        .client()
        .get(&api_path("/addresses/images"))
        .add_query_param("state", "Tamil Nadu")
        .add_query_param("fileName", first)
        .await;
    assert_eq!(file.status_code(), StatusCode::OK);
    assert_eq!(file.as_bytes().to_vec(), png);
    assert_eq!(file.header("content-type"), "image/png");

    let (_, second) = split_stored(&stored[1]);
    let file = app
        .client()
        .get(&api_path("/addresses/images"))
        .add_query_param("state", "Tamil Nadu")
        .add_query_param("fileName", second)
        .await;
    assert_eq!(file.as_bytes().to_vec(), b"jpeg-bytes".to_vec());
}

#[tokio::test]
async fn test_shared_state_folder_reaped_with_last_address() {
    let app = setup_test_app().await;
    let a1 = create_address(&app, "Goa", "Panaji", b"first").await;
    let a2 = create_address(&app, "Goa", "Margao", b"second").await;
    let goa = app.folder("addresses", "Goa");
    assert!(goa.is_dir());

    let response = app
        .client()
        .delete(&api_path(&format!("/addresses/{}", a1["id"].as_str().unwrap())))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["id"], a1["id"]);
    assert!(goa.is_dir());

    let (_, sibling) = split_stored(&images(&a2)[0]);
    let file = app
        .client()
        .get(&api_path("/addresses/images"))
        .add_query_param("state", "Goa")
        .add_query_param("fileName", sibling)
        .await;
    assert_eq!(file.status_code(), StatusCode::OK);
    assert_eq!(file.as_bytes().to_vec(), b"second".to_vec());

    app.client()
        .delete(&api_path(&format!("/addresses/{}", a2["id"].as_str().unwrap())))
        .await
        .assert_status_ok();
    assert!(!goa.exists());
}

#[tokio::test]
async fn test_colliding_uploads_are_all_retrievable() {
    let app = setup_test_app().await;
    let a1 = create_address(&app, "Kerala", "Kochi", b"one").await;
    let a2 = create_address(&app, "Kerala", "Munnar", b"two").await;

    let response = app
        .client()
        .post(&api_path("/addresses"))
        .multipart(
            address_form("Kerala", "Alleppey")
                .add_part("images", image_part("same.jpg", b"three".to_vec()))
                .add_part("images", image_part("same.jpg", b"four".to_vec())),
        )
        .await;
    let a3: Value = response.json();

    let mut all: Vec<String> = images(&a1);
    all.extend(images(&a2));
    all.extend(images(&a3));
    let mut unique = all.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 4);

    let mut contents = Vec::new();
    for path in &all {
        let (_, name) = split_stored(path);
        let file = app
            .client()
            .get(&api_path("/addresses/images"))
            .add_query_param("state", "Kerala")
            .add_query_param("fileName", &name)
            .await;
        assert_eq!(file.status_code(), StatusCode::OK);
        contents.push(file.as_bytes().to_vec());
    }
    assert_eq!(
        contents,
        vec![
            b"one".to_vec(),
            b"two".to_vec(),
            b"three".to_vec(),
            b"four".to_vec()
        ]
    );
}

#[tokio::test]
async fn test_missing_file_under_existing_folder_is_not_found() {
    let app = setup_test_app().await;
    create_address(&app, "Goa", "Panaji", b"x").await;

    let response = app
        .client()
        .get(&api_path("/addresses/images"))
        .add_query_param("state", "Goa")
        .add_query_param("fileName", "nope.jpg")
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert!(body["code"].is_string());
}

#[tokio::test]
async fn test_image_lookup_rejects_missing_and_traversing_params() {
    let app = setup_test_app().await;
    create_address(&app, "Goa", "Panaji", b"x").await;

    let missing = app
        .client()
        .get(&api_path("/addresses/images"))
        .add_query_param("state", "Goa")
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

    let blank = app
        .client()
        .get(&api_path("/addresses/images"))
        .add_query_param("state", "  ")
        .add_query_param("fileName", "x.jpg")
        .await;
    assert_eq!(blank.status_code(), StatusCode::NOT_FOUND);

    let traversal = app
        .client()
        .get(&api_path("/addresses/images"))
        .add_query_param("state", "../addresses")
        .add_query_param("fileName", "../../Cargo.toml")
        .await;
    assert_eq!(traversal.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_place_and_tour_plan_images_use_their_own_roots() {
    let app = setup_test_app().await;
    let address = create_address(&app, "Rajasthan", "Jaipur", b"fort").await;
    let address_id = address["id"].as_str().unwrap();

    let place: Value = app
        .client()
        .post(&api_path("/places"))
        .multipart(
            place_form("Hawa Mahal", address_id)
                .add_part("images", image_part("palace.jpg", b"palace".to_vec())),
        )
        .await
        .json();
    let (segment, name) = split_stored(&images(&place)[0]);
    assert_eq!(segment, "Hawa_Mahal");
    assert!(name.ends_with("-palace.jpg"));
    let file = app
        .client()
        .get(&api_path("/places/images"))
        .add_query_param("placeName", "Hawa Mahal")
        .add_query_param("fileName", &name)
        .await;
    assert_eq!(file.as_bytes().to_vec(), b"palace".to_vec());

    let plan: Value = app
        .client()
        .post(&api_path("/tour-plans"))
        .multipart(
            tour_plan_form("raj01", address_id)
                .add_part("images", image_part("day1.jpg", b"day one".to_vec())),
        )
        .await
        .json();
    assert_eq!(plan["tourCode"], "RAJ01");
    let (segment, name) = split_stored(&images(&plan)[0]);
    assert_eq!(segment, "RAJ01");
    assert!(name.starts_with("images-"));
    let file = app
        .client()
        .get(&api_path("/tour-plans/images"))
        .add_query_param("tourCode", "raj01")
        .add_query_param("fileName", &name)
        .await;
    assert_eq!(file.status_code(), StatusCode::OK);
    assert_eq!(file.as_bytes().to_vec(), b"day one".to_vec());

    // same name, different root
    let wrong_root = app
        .client()
        .get(&api_path("/places/images"))
        .add_query_param("placeName", "RAJ01")
        .add_query_param("fileName", &name)
        .await;
    assert_eq!(wrong_root.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_theme_image_resolves_by_any_case() {
    let app = setup_test_app().await;
    let theme: Value = app
        .client()
        .post(&api_path("/themes"))
        .multipart(
            axum_test::multipart::MultipartForm::new()
                .add_text("name", "beach")
                .add_part("images", image_part("sand.png", create_minimal_png())),
        )
        .await
        .json();
    assert_eq!(theme["name"], "BEACH");

    let (_, name) = split_stored(&images(&theme)[0]);
    let file = app
        .client()
        .get(&api_path("/themes/images"))
        .add_query_param("themeName", "Beach")
        .add_query_param("fileName", &name)
        .await;
    assert_eq!(file.status_code(), StatusCode::OK);

    app.client()
        .delete(&api_path(&format!("/themes/{}", theme["id"].as_str().unwrap())))
        .await
        .assert_status_ok();
    assert!(!app.folder("themes", "BEACH").exists());
}

#[tokio::test]
async fn test_disallowed_content_type_rejected() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .post(&api_path("/addresses"))
        .multipart(
            address_form("Goa", "Panaji").add_part(
                "images",
                axum_test::multipart::Part::bytes(b"%PDF-1.4".to_vec())
                    .file_name("brochure.pdf")
                    .mime_type("application/pdf"),
            ),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(!app.folder("addresses", "Goa").exists());
}

#[tokio::test]
async fn test_oversized_file_rejected() {
    let app = setup_test_app_with(|config| config.max_file_size_bytes = 8).await;
    let response = app
        .client()
        .post(&api_path("/addresses"))
        .multipart(
            address_form("Goa", "Panaji").add_part("images", image_part("big.jpg", vec![7u8; 64])),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_invalid_coordinates_rejected_without_touching_storage() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .post(&api_path("/addresses"))
        .multipart(
            address_form("Goa", "Panaji")
                .add_text("coordinates", "[123.0, 73.8]")
                .add_part("images", image_part("photo.jpg", b"x".to_vec())),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(!app.folder("addresses", "Goa").exists());
}
