mod common;

use common::FakeTransport;
use http::Method;
use safedocs_client::error::ApiError;
use safedocs_client::models::document::{DocumentFilters, DocumentUpdate, UploadRequest};
use safedocs_client::services::documents::DocumentService;
use safedocs_client::transport::ApiResult;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

fn document_json(id: Uuid, title: &str) -> Value {
    json!({
        "id": id,
        "owner_id": "0e4cb7a8-6a06-4be2-8f2c-666666666666",
        "title": title,
        "doc_type": "contract",
        "created_at": "2026-01-15T10:00:00Z"
    })
}

#[tokio::test]
async fn list_builds_the_filtered_query_string() {
    let transport = Arc::new(FakeTransport::new());
    let id = Uuid::new_v4();
    transport.respond(
        Method::GET,
        "/documentos?page=2&limit=25&type=contract&search=renov%C3%A1cion",
        ApiResult::ok_data(json!({ "documents": [document_json(id, "Contrato 2026")] }), Some(200)),
    );
    let service = DocumentService::new(transport);

    let filters = DocumentFilters {
        doc_type: Some("contract".to_string()),
        search: Some("renovácion".to_string()),
    };
    let documents = service.list(&filters, 2, 25).await.unwrap();

    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].id, id);
}

#[tokio::test]
async fn upload_sends_metadata_fields_alongside_the_file() {
    let transport = Arc::new(FakeTransport::new());
    let id = Uuid::new_v4();
    transport.respond(
        Method::POST,
        "/documentos/upload",
        ApiResult::ok_data(document_json(id, "Q2 report"), Some(201)),
    );
    let service = DocumentService::new(transport.clone());

    let document = service
        .upload(UploadRequest {
            file_name: "report.pdf".to_string(),
            bytes: b"%PDF-1.7 ...".to_vec(),
            title: "Q2 report".to_string(),
            tags: vec!["finance".to_string(), "2026".to_string()],
        })
        .await
        .unwrap();

    assert_eq!(document.id, id);

    let sent = transport.requests_to(Method::POST, "/documentos/upload");
    let body = sent[0].body.as_ref().unwrap();
    assert_eq!(body["file_name"], json!("report.pdf"));
    assert_eq!(
        body["fields"],
        json!([["title", "Q2 report"], ["tags", "[\"finance\",\"2026\"]"]])
    );
}

#[tokio::test]
async fn upload_with_empty_file_fails_before_any_network_dispatch() {
    let transport = Arc::new(FakeTransport::new());
    let service = DocumentService::new(transport.clone());

    let err = service
        .upload(UploadRequest {
            file_name: "empty.pdf".to_string(),
            bytes: Vec::new(),
            title: "Nothing".to_string(),
            tags: vec![],
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Validation(_)));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn update_patches_only_the_present_fields() {
    let transport = Arc::new(FakeTransport::new());
    let id = Uuid::new_v4();
    let endpoint = format!("/documentos/{}", id);
    transport.respond(
        Method::PATCH,
        &endpoint,
        ApiResult::ok_data(document_json(id, "Renamed"), Some(200)),
    );
    let service = DocumentService::new(transport.clone());

    let update = DocumentUpdate {
        title: Some("Renamed".to_string()),
        ..Default::default()
    };
    let document = service.update(id, &update).await.unwrap();

    assert_eq!(document.title, "Renamed");
    let sent = transport.requests_to(Method::PATCH, &endpoint);
    assert_eq!(sent[0].body, Some(json!({ "title": "Renamed" })));
}

#[tokio::test]
async fn delete_surfaces_the_server_failure() {
    let transport = Arc::new(FakeTransport::new());
    let id = Uuid::new_v4();
    transport.respond(
        Method::DELETE,
        &format!("/documentos/{}", id),
        ApiResult::fail("document not found", Some(404)),
    );
    let service = DocumentService::new(transport);

    let err = service.delete(id).await.unwrap_err();
    assert_eq!(err.to_string(), "document not found");
}

#[tokio::test]
async fn verify_reads_the_full_report() {
    let transport = Arc::new(FakeTransport::new());
    let id = Uuid::new_v4();
    transport.respond(
        Method::POST,
        &format!("/documentos/{}/verify", id),
        ApiResult::ok_data(
            json!({
                "documentId": id,
                "isValid": true,
                "message": "Checksum matches"
            }),
            Some(200),
        ),
    );
    let service = DocumentService::new(transport);

    let report = service.verify(id).await.unwrap();

    assert!(report.is_valid);
    assert_eq!(report.message, "Checksum matches");
}

#[tokio::test]
async fn verify_synthesizes_a_report_from_a_bare_verdict() {
    let transport = Arc::new(FakeTransport::new());
    let id = Uuid::new_v4();
    transport.respond(
        Method::POST,
        &format!("/documentos/{}/verify", id),
        ApiResult::ok_data(json!({ "isValid": false }), Some(200)),
    );
    let service = DocumentService::new(transport);

    let report = service.verify(id).await.unwrap();

    assert_eq!(report.document_id, id);
    assert!(!report.is_valid);
    assert_eq!(report.message, "Verification completed");
}
