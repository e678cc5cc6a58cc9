use anyhow::Result;
use appliance_listing::core::{DocumentStore, Geocoder, ObjectStorage, UserDirectory};
use appliance_listing::{
    Category, Coordinates, HttpObjectStorage, ImageRef, Listing, ListingError, NominatimGeocoder,
    RestDocumentStore,
};
use httpmock::prelude::*;
use tempfile::TempDir;

fn sample_listing() -> Listing {
    Listing {
        name: "Hedge trimmer".to_string(),
        description: "Cordless".to_string(),
        images: vec!["https://cdn.test/images/trimmer.jpg".to_string()],
        category: Category::Garden,
        address: "Meir 1, Antwerpen".to_string(),
        latitude: 51.2189,
        longitude: 4.4051,
        user_id: "u-42".to_string(),
        price_per_day: 12,
    }
}

fn write_image(dir: &TempDir, name: &str) -> ImageRef {
    let path = dir.path().join(name);
    std::fs::write(&path, b"\xFF\xD8\xFFfake-jpeg").unwrap();
    ImageRef::new(path)
}

#[tokio::test]
async fn test_rest_store_insert_returns_generated_id() -> Result<()> {
    let server = MockServer::start_async().await;
    let insert_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/collections/myAppliances/documents")
                .header("authorization", "Bearer token-123")
                .body_contains("\"pricePerDay\":12")
                .body_contains("\"userId\":\"u-42\"");
            then.status(201)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"id": "abc123"}));
        })
        .await;

    let store = RestDocumentStore::new(server.url("/v1"))
        .with_api_token(Some("token-123".to_string()));
    let id = store.insert("myAppliances", &sample_listing()).await?;

    insert_mock.assert_async().await;
    assert_eq!(id, "abc123");
    Ok(())
}

#[tokio::test]
async fn test_rest_store_insert_failure_is_metadata_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/collections/myAppliances/documents");
            then.status(503).body("backend unavailable");
        })
        .await;

    let store = RestDocumentStore::new(server.base_url());
    let err = store
        .insert("myAppliances", &sample_listing())
        .await
        .unwrap_err();

    match err {
        ListingError::MetadataWriteError { message } => {
            assert!(message.contains("503"));
            assert!(message.contains("backend unavailable"));
        }
        other => panic!("expected MetadataWriteError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_home_location_reads_string_coordinates() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/collections/users/documents/u-42");
            then.status(200)
                .json_body(serde_json::json!({"name": "An", "lat": "51.2301", "lon": "4.4161"}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/collections/users/documents/ghost");
            then.status(404);
        })
        .await;

    let store = RestDocumentStore::new(server.base_url());

    let location = store.home_location("u-42").await?;
    assert_eq!(location, Some(Coordinates::new(51.2301, 4.4161)));
    assert_eq!(store.home_location("ghost").await?, None);
    Ok(())
}

#[tokio::test]
async fn test_http_storage_prefers_download_url() -> Result<()> {
    let dir = TempDir::new()?;
    let image = write_image(&dir, "trimmer.jpg");

    let server = MockServer::start_async().await;
    let upload_mock = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/o/images/trimmer.jpg")
                .header("content-type", "image/jpeg");
            then.status(200).json_body(
                serde_json::json!({"downloadUrl": "https://cdn.test/images/trimmer.jpg?token=x"}),
            );
        })
        .await;

    let storage = HttpObjectStorage::new(server.url("/o"));
    let url = storage.upload(&image, "images/trimmer.jpg").await?;

    upload_mock.assert_async().await;
    assert_eq!(url, "https://cdn.test/images/trimmer.jpg?token=x");
    Ok(())
}

#[tokio::test]
async fn test_http_storage_falls_back_to_public_base() -> Result<()> {
    let dir = TempDir::new()?;
    let image = write_image(&dir, "mixer.png");

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(PUT).path("/images/mixer.png");
            then.status(204);
        })
        .await;

    let storage = HttpObjectStorage::new(server.base_url())
        .with_public_base_url(Some("https://cdn.test".to_string()));
    let url = storage.upload(&image, "images/mixer.png").await?;

    assert_eq!(url, "https://cdn.test/images/mixer.png");
    Ok(())
}

#[tokio::test]
async fn test_http_storage_reports_failing_image() {
    let dir = TempDir::new().unwrap();
    let image = write_image(&dir, "drill.jpg");

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(PUT).path("/images/drill.jpg");
            then.status(403).body("forbidden");
        })
        .await;

    let storage = HttpObjectStorage::new(server.base_url());
    let err = storage.upload(&image, "images/drill.jpg").await.unwrap_err();
    match err {
        ListingError::ImageUploadError { image, message } => {
            assert!(image.ends_with("drill.jpg"));
            assert!(message.contains("403"));
        }
        other => panic!("expected ImageUploadError, got {:?}", other),
    }

    let missing = ImageRef::new(dir.path().join("missing.jpg"));
    let err = storage.upload(&missing, "images/missing.jpg").await.unwrap_err();
    assert!(err.to_string().contains("cannot read file"));
}

#[tokio::test]
async fn test_nominatim_forward_and_reverse() -> Result<()> {
    let server = MockServer::start_async().await;
    let search_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/search")
                .query_param("q", "Meir 1")
                .query_param("format", "json")
                .header("user-agent", "rental-tests");
            then.status(200)
                .json_body(serde_json::json!([{"lat": "51.2189", "lon": "4.4051", "display_name": "Meir"}]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/reverse").query_param("format", "json");
            then.status(200)
                .json_body(serde_json::json!({"display_name": "Meir 1, 2000 Antwerpen, België"}));
        })
        .await;

    let geocoder = NominatimGeocoder::new(server.base_url(), "rental-tests");

    let coordinates = geocoder.forward("Meir 1").await?;
    search_mock.assert_async().await;
    assert_eq!(coordinates, Some(Coordinates::new(51.2189, 4.4051)));

    let address = geocoder.reverse(Coordinates::new(51.2189, 4.4051)).await?;
    assert_eq!(address.as_deref(), Some("Meir 1, 2000 Antwerpen, België"));
    Ok(())
}

#[tokio::test]
async fn test_nominatim_not_found_and_server_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/search").query_param("q", "Atlantis");
            then.status(200).json_body(serde_json::json!([]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/reverse");
            then.status(200).json_body(serde_json::json!({"error": "Unable to geocode"}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/search").query_param("q", "Broken");
            then.status(500);
        })
        .await;

    let geocoder = NominatimGeocoder::new(server.base_url(), "rental-tests");

    assert_eq!(geocoder.forward("Atlantis").await.unwrap(), None);
    assert_eq!(geocoder.reverse(Coordinates::new(1.0, 1.0)).await.unwrap(), None);

    let err = geocoder.forward("Broken").await.unwrap_err();
    assert!(matches!(err, ListingError::GeocodingError { .. }));
}
