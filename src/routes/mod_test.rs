use super::*;

#[test]
fn record_errors_map_to_statuses() {
    assert_eq!(record_error_to_status(RecordError::NotFound("machine M1".into())), StatusCode::NOT_FOUND);
    assert_eq!(record_error_to_status(RecordError::Invalid("name is required".into())), StatusCode::BAD_REQUEST);
    assert_eq!(
        record_error_to_status(RecordError::Database(sqlx::Error::PoolTimedOut)),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn csv_errors_map_to_statuses() {
    assert_eq!(csv_error_to_status(CsvError::UnknownDataset("x".into())), StatusCode::NOT_FOUND);
    assert_eq!(csv_error_to_status(CsvError::Fetch("timeout".into())), StatusCode::BAD_GATEWAY);
    assert_eq!(
        csv_error_to_status(CsvError::Status { status: 403, url: "https://x".into() }),
        StatusCode::BAD_GATEWAY
    );
    assert_eq!(csv_error_to_status(CsvError::HttpClientBuild("tls".into())), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn import_errors_delegate_to_source_mapping() {
    assert_eq!(import_error_to_status(ImportError::Csv(CsvError::Fetch("x".into()))), StatusCode::BAD_GATEWAY);
    assert_eq!(
        import_error_to_status(ImportError::Record(RecordError::Invalid("x".into()))),
        StatusCode::BAD_REQUEST
    );
}

#[test]
fn voice_errors_map_to_statuses() {
    assert_eq!(
        voice_error_to_status(VoiceError::Api { status: 500, body: String::new() }),
        StatusCode::BAD_GATEWAY
    );
    assert_eq!(voice_error_to_status(VoiceError::Request("reset".into())), StatusCode::BAD_GATEWAY);
    assert_eq!(voice_error_to_status(VoiceError::HttpClientBuild("tls".into())), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn healthz_is_ok() {
    assert_eq!(healthz().await, StatusCode::OK);
}

#[tokio::test]
async fn router_builds_with_test_state() {
    let _router = app(crate::state::test_helpers::test_app_state());
}
