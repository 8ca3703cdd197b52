//! HTTP transmission tests against a mock aggregator.

use axum::http::{Method, StatusCode};
use waitfile_worker::config::{TransmitConfig, UploadMethod};
use waitfile_worker::transmit::{build_client, HttpTransmitter, Transmit};
use waitfile_worker::worker::Artifact;
use waitfile_worker::TransmitError;

mod common;

fn transmitter(method: UploadMethod) -> HttpTransmitter {
    HttpTransmitter::from_config(&TransmitConfig::default(), method).unwrap()
}

#[tokio::test]
async fn test_put_streams_file_with_content_type() {
    let aggregator = common::start_aggregator(StatusCode::OK).await;
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_result(dir.path(), "results.tar.gz", b"gzipped tarball bytes");

    let url = aggregator.url("/api/v1/results/global/e2e");
    let artifact = Artifact::open(path).await.unwrap();
    transmitter(UploadMethod::Put)
        .transmit(&url, artifact)
        .await
        .unwrap();

    let uploads = aggregator.uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].method, Method::PUT);
    assert_eq!(uploads[0].path, "/api/v1/results/global/e2e");
    assert_eq!(uploads[0].content_type.as_deref(), Some("application/gzip"));
    assert_eq!(uploads[0].body, b"gzipped tarball bytes");
}

#[tokio::test]
async fn test_post_method() {
    let aggregator = common::start_aggregator(StatusCode::OK).await;
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_result(dir.path(), "report.json", b"{\"passed\":true}");

    let artifact = Artifact::open(path).await.unwrap();
    transmitter(UploadMethod::Post)
        .transmit(&aggregator.url("/results"), artifact)
        .await
        .unwrap();

    let uploads = aggregator.uploads();
    assert_eq!(uploads[0].method, Method::POST);
    assert_eq!(uploads[0].content_type.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn test_unknown_extension_sends_no_content_type() {
    let aggregator = common::start_aggregator(StatusCode::OK).await;
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_result(dir.path(), "results.unknownext", b"raw");

    let artifact = Artifact::open(path).await.unwrap();
    transmitter(UploadMethod::Put)
        .transmit(&aggregator.url("/results"), artifact)
        .await
        .unwrap();

    let uploads = aggregator.uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].content_type, None);
    assert_eq!(uploads[0].body, b"raw");
}

#[tokio::test]
async fn test_empty_file_is_sent() {
    let aggregator = common::start_aggregator(StatusCode::OK).await;
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_result(dir.path(), "empty.txt", b"");

    let artifact = Artifact::open(path).await.unwrap();
    assert!(artifact.is_empty());
    transmitter(UploadMethod::Put)
        .transmit(&aggregator.url("/results"), artifact)
        .await
        .unwrap();

    let uploads = aggregator.uploads();
    assert!(uploads[0].body.is_empty());
    assert_eq!(uploads[0].content_type.as_deref(), Some("text/plain; charset=utf-8"));
}

#[tokio::test]
async fn test_non_success_status_is_error() {
    let aggregator = common::start_aggregator(StatusCode::CONFLICT).await;
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_result(dir.path(), "results.tar.gz", b"tarball");

    let url = aggregator.url("/api/v1/results/global/e2e");
    let artifact = Artifact::open(path).await.unwrap();
    let err = transmitter(UploadMethod::Put)
        .transmit(&url, artifact)
        .await
        .unwrap_err();

    match err {
        TransmitError::UnexpectedStatus { url: u, status, body } => {
            assert_eq!(u, url);
            assert_eq!(status.as_u16(), 409);
            assert_eq!(body, "rejected by aggregator");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(aggregator.uploads().len(), 1);
}

#[tokio::test]
async fn test_connection_refused_is_request_error() {
    let addr = common::unused_addr().await;
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_result(dir.path(), "results.tar.gz", b"tarball");

    let url = url::Url::parse(&format!("http://{addr}/results")).unwrap();
    let artifact = Artifact::open(path).await.unwrap();
    let client = build_client(&TransmitConfig::default()).unwrap();
    let err = HttpTransmitter::new(client, UploadMethod::Put)
        .transmit(&url, artifact)
        .await
        .unwrap_err();

    assert!(matches!(err, TransmitError::Request { .. }));
    assert!(err.to_string().contains(&addr.to_string()));
}
