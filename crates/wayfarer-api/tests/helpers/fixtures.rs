//! Test fixtures: image bytes and multipart forms for each record type.

use axum_test::multipart::{MultipartForm, Part};

/// Minimal valid 1x1 PNG bytes.
pub fn create_minimal_png() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00, 0x90,
        0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, 0x08, 0xD7, 0x63, 0xF8,
        0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x18, 0xDD, 0x8D, 0x89, 0x00, 0x00, 0x00,
        0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ]
}

/// An `images` file part.
pub fn image_part(file_name: &str, bytes: Vec<u8>) -> Part {
    let mime = if file_name.ends_with(".png") {
        "image/png"
    } else {
        "image/jpeg"
    };
    Part::bytes(bytes).file_name(file_name).mime_type(mime)
}

pub fn address_form(state: &str, city: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("country", "India")
        .add_text("state", state)
        .add_text("city", city)
}

pub fn place_form(name: &str, state_id: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("name", name)
        .add_text("placeTitle", format!("{} title", name))
        .add_text("idealTripDuration", "2 days")
        .add_text("state", state_id)
}

pub fn tour_plan_form(code: &str, address_id: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("tourCode", code)
        .add_text("title", format!("Tour {}", code))
        .add_text("addressId", address_id)
}

/// Stored path (`segment/name`) split into `(segment, file name)`.
pub fn split_stored(path: &str) -> (String, String) {
    let (segment, name) = path.split_once('/').expect("stored path has a segment");
    (segment.to_string(), name.to_string())
}
