//! Workflow tests against the mock service.

use serde_json::json;

use inferview::{
    AnalysisResult, AnalysisService, CandidateFile, MockService, NotificationLevel,
    ProcessResponse, ResultState, ResultWorkflow, SemanticCategory, ServiceError, UploadState,
    UploadWorkflow, WorkflowError, present,
};

fn csv_file() -> CandidateFile {
    CandidateFile::new("t.csv", Some("text/csv".to_string()), "a,b\n1,true\n")
}

fn sample_analysis(id: &str) -> AnalysisResult {
    let mut result = AnalysisResult::from_value(json!({
        "file_name": "t.csv",
        "upload_time": "2024-01-01T00:00:00Z",
        "columns": ["a", "b"],
        "dtypes": {"a": "int64", "b": "bool"},
        "data": [{"a": 1, "b": true}]
    }))
    .expect("valid analysis");
    result.id = id.to_string();
    result
}

// =============================================================================
// Upload Workflow
// =============================================================================

#[tokio::test]
async fn test_non_csv_never_reaches_service() {
    let service = MockService::new().with_process_response(ProcessResponse::with_id("x"));
    let mut upload = UploadWorkflow::new();

    let err = upload
        .select_file(CandidateFile::new("photo.png", Some("image/png".into()), b"\x89PNG".to_vec()))
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Validation(_)));
    assert_eq!(upload.state(), &UploadState::Idle);

    assert_eq!(
        upload.submit(&service).await.unwrap_err(),
        WorkflowError::NoFileSelected
    );
    assert_eq!(service.process_calls(), 0);
}

#[tokio::test]
async fn test_submit_success() {
    let service = MockService::new().with_process_response(ProcessResponse::with_id("abc123"));
    let mut upload = UploadWorkflow::new();

    upload.select_file(csv_file()).unwrap();
    upload.submit(&service).await.unwrap();

    assert_eq!(upload.succeeded_id(), Some("abc123"));
    assert_eq!(service.process_calls(), 1);
    assert_eq!(service.uploaded_files(), vec!["t.csv"]);
}

#[tokio::test]
async fn test_duplicate_submit_issues_one_request() {
    let service = MockService::new().with_process_response(ProcessResponse::with_id("abc123"));
    let mut upload = UploadWorkflow::new();
    upload.select_file(csv_file()).unwrap();

    let ticket = upload.begin_submit().unwrap().expect("first submit starts");
    // Second click while the request is outstanding.
    assert!(upload.begin_submit().unwrap().is_none());
    upload.submit(&service).await.unwrap();

    let outcome = service.process(ticket.candidate()).await;
    assert!(upload.complete_submit(ticket, outcome));

    assert_eq!(service.process_calls(), 1);
    assert_eq!(upload.succeeded_id(), Some("abc123"));
}

#[tokio::test]
async fn test_failed_upload_can_retry() {
    let failing = MockService::new().with_process_error(ServiceError::Network(
        "connection refused".to_string(),
    ));
    let mut upload = UploadWorkflow::new();
    upload.select_file(csv_file()).unwrap();
    upload.submit(&failing).await.unwrap();

    match upload.state() {
        UploadState::Failed { message, .. } => {
            assert_eq!(
                message,
                "No response from server. Please check your connection."
            );
        }
        other => panic!("expected Failed, got {:?}", other),
    }
    let notes = upload.drain_notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Error);

    let working = MockService::new().with_process_response(ProcessResponse::with_id("retry-ok"));
    upload.submit(&working).await.unwrap();
    assert_eq!(upload.succeeded_id(), Some("retry-ok"));
    assert_eq!(working.uploaded_files(), vec!["t.csv"]);
}

#[tokio::test]
async fn test_success_requires_reselect() {
    let service = MockService::new().with_process_response(ProcessResponse::with_id("abc"));
    let mut upload = UploadWorkflow::new();
    upload.select_file(csv_file()).unwrap();
    upload.submit(&service).await.unwrap();

    assert_eq!(
        upload.submit(&service).await.unwrap_err(),
        WorkflowError::NoFileSelected
    );
    assert_eq!(service.process_calls(), 1);
}

// =============================================================================
// Result Workflow
// =============================================================================

#[tokio::test]
async fn test_load_missing_id_is_not_found() {
    let service = MockService::new();
    let mut results = ResultWorkflow::new();

    let state = results.load("missing-id", &service).await;
    assert_eq!(
        state,
        &ResultState::NotFound {
            id: "missing-id".to_string()
        }
    );
    assert_eq!(service.fetch_calls(), 1);
}

#[tokio::test]
async fn test_load_server_error_is_failed() {
    let service = MockService::new().with_fetch_error(
        "abc",
        ServiceError::Http {
            status: 503,
            body: Some(json!({"message": "Database unavailable"})),
        },
    );
    let mut results = ResultWorkflow::new();
    results.load("abc", &service).await;

    assert_eq!(results.error_message(), Some("Database unavailable"));
    assert_eq!(results.drain_notifications()[0].text, "Database unavailable");
}

#[tokio::test]
async fn test_malformed_response_uses_generic_message() {
    let service = MockService::new().with_fetch_error(
        "abc",
        ServiceError::MalformedResponse("missing field `dtypes`".to_string()),
    );
    let mut results = ResultWorkflow::new();
    results.load("abc", &service).await;

    assert_eq!(results.error_message(), Some("Failed to load analysis results"));
}

#[tokio::test]
async fn test_blank_id_makes_no_request() {
    let service = MockService::new();
    let mut results = ResultWorkflow::new();
    results.load("  ", &service).await;

    assert_eq!(results.state().name(), "not_found");
    assert_eq!(service.fetch_calls(), 0);
}

#[tokio::test]
async fn test_reload_with_new_id_discards_previous() {
    let service = MockService::new()
        .with_analysis(sample_analysis("one"))
        .with_fetch_error("two", ServiceError::Http { status: 500, body: None });
    let mut results = ResultWorkflow::new();

    results.load("one", &service).await;
    assert!(results.result().is_some());

    results.load("two", &service).await;
    assert!(results.result().is_none());
    assert_eq!(results.state().name(), "failed");
    assert_eq!(service.fetch_calls(), 2);
}

// =============================================================================
// Upload then Show
// =============================================================================

#[tokio::test]
async fn test_upload_then_show() {
    let service = MockService::new()
        .with_process_response(ProcessResponse::with_id("abc123"))
        .with_analysis(sample_analysis("abc123"));

    let mut upload = UploadWorkflow::new();
    upload.select_file(csv_file()).unwrap();
    upload.submit(&service).await.unwrap();
    let id = upload.succeeded_id().expect("upload succeeded").to_string();

    let mut results = ResultWorkflow::new();
    results.load(&id, &service).await;
    let view = present(results.result().expect("loaded"));

    assert_eq!(view.columns[0].category, SemanticCategory::Integer);
    assert_eq!(view.columns[1].category, SemanticCategory::Boolean);
    assert_eq!(view.rows[0]["a"], "1");
    assert_eq!(view.rows[0]["b"], "Yes");
}
