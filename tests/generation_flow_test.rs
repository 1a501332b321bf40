use httpmock::prelude::*;
use perdiem_docgen::adapters::files::GraphDriveClient;
use perdiem_docgen::adapters::identity::IdentityClient;
use perdiem_docgen::adapters::payhawk::PayhawkClient;
use perdiem_docgen::config::{CustomFieldIds, FileStoreConfig, IdentityConfig, PayhawkConfig};
use perdiem_docgen::utils::error::DocGenError;
use perdiem_docgen::{DocumentGenerator, FieldExtractor, GenerationOutcome};
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

fn template_docx() -> Vec<u8> {
    let mut writer = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    writer
        .start_file::<_, ()>("word/document.xml", FileOptions::default())
        .unwrap();
    writer
        .write_all(
            b"<w:document><w:t>Order {expense_id}: {destination}, \
              {from_date} - {to_date}, {trip_total_amount}</w:t></w:document>",
        )
        .unwrap();
    writer.finish().unwrap().into_inner()
}

fn generator(
    server: &MockServer,
    custom_fields: CustomFieldIds,
    regenerate: bool,
) -> DocumentGenerator<PayhawkClient, GraphDriveClient> {
    let payhawk = PayhawkClient::new(&PayhawkConfig {
        api_base_url: server.url(""),
        account_id: "acc1".to_string(),
        api_key: "test-key".to_string(),
    });
    let identity = IdentityClient::new(&IdentityConfig {
        token_url: server.url("/token"),
        client_id: "client-1".to_string(),
        client_secret: "client-secret".to_string(),
        scope: "https://graph.microsoft.com/.default".to_string(),
    });
    let store = GraphDriveClient::new(
        &FileStoreConfig {
            graph_base_url: server.url(""),
            drive_id: "d1".to_string(),
            template_file_id: "tpl1".to_string(),
            target_folder_id: "folder1".to_string(),
        },
        identity,
    );
    DocumentGenerator::new(payhawk, store, FieldExtractor::new(custom_fields), regenerate)
}

fn per_diem_expense_json() -> serde_json::Value {
    serde_json::json!({
        "id": 42,
        "type": "perDiem",
        "createdAt": "2024-01-22T10:30:00Z",
        "createdBy": {"id": "emp-1"},
        "perDiem": {
            "stops": [
                {"date": "2024-01-01", "address": "Sofia"},
                {"date": "2024-01-03", "address": "Varna"}
            ]
        },
        "reconciliation": {
            "totalAmount": 150,
            "customFields": [
                {"id": "cf-team", "selectedValues": [{"label": "Platform"}, {"label": "Engineering"}]}
            ]
        },
        "document": {"files": [{"id": "receipt-1"}]}
    })
}

#[tokio::test]
async fn test_full_generation_flow() {
    let server = MockServer::start();

    let expense_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/accounts/acc1/expenses/42")
            .header("X-Payhawk-ApiKey", "test-key");
        then.status(200).json_body(per_diem_expense_json());
    });
    let workflow_mock = server.mock(|when, then| {
        when.method(GET).path("/accounts/acc1/expenses/42/workflow");
        then.status(200)
            .json_body(serde_json::json!({"approvedBy": {"id": "emp-2"}}));
    });
    let creator_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/accounts/acc1/users/emp-1/reimbursement-details");
        then.status(200)
            .json_body(serde_json::json!({"accountHolder": "Иван Иванов"}));
    });
    let approver_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/accounts/acc1/users/emp-2/reimbursement-details");
        then.status(200)
            .json_body(serde_json::json!({"accountHolder": "Мария Петрова"}));
    });

    let token_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/token")
            .body_contains("grant_type=client_credentials");
        then.status(200)
            .json_body(serde_json::json!({"access_token": "test-token", "expires_in": 3599}));
    });

    let copy_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/drives/d1/items/tpl1/copy")
            .header("authorization", "Bearer test-token")
            .body_contains("Per_Diem_For_Expense_42.docx");
        then.status(202)
            .header("Location", server.url("/drives/d1/items/NEW99?monitor=1"));
    });
    // Registered before the plain content mock so the format=pdf request
    // never falls through to it.
    let export_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/drives/d1/items/NEW99/content")
            .query_param("format", "pdf");
        then.status(200).body("%PDF-1.7 fake pdf bytes");
    });
    let fetch_mock = server.mock(|when, then| {
        when.method(GET).path("/drives/d1/items/NEW99/content");
        then.status(200).body(template_docx());
    });
    let put_mock = server.mock(|when, then| {
        when.method(PUT).path("/drives/d1/items/NEW99/content");
        then.status(200);
    });

    let upload_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/accounts/acc1/expenses/42/files")
            .header("X-Payhawk-ApiKey", "test-key")
            .body_contains("%PDF-1.7 fake pdf bytes");
        then.status(201);
    });

    let custom_fields = CustomFieldIds {
        team: "cf-team".to_string(),
        ..CustomFieldIds::default()
    };
    let generator = generator(&server, custom_fields, false);

    let outcome = generator.generate(42).await.unwrap();
    assert_eq!(
        outcome,
        GenerationOutcome::Generated {
            file_name: "Per_Diem_For_Expense_42.pdf".to_string()
        }
    );

    expense_mock.assert();
    workflow_mock.assert();
    creator_mock.assert();
    approver_mock.assert();
    copy_mock.assert();
    fetch_mock.assert();
    put_mock.assert();
    export_mock.assert();
    upload_mock.assert();
    // One fresh token per file-store call: copy, fetch, put, export.
    token_mock.assert_hits(4);
}

#[tokio::test]
async fn test_non_per_diem_short_circuits() {
    let server = MockServer::start();

    let expense_mock = server.mock(|when, then| {
        when.method(GET).path("/accounts/acc1/expenses/42");
        then.status(200).json_body(serde_json::json!({
            "id": 42,
            "type": "travel",
            "createdAt": "2024-01-22T10:30:00Z",
            "createdBy": {"id": "emp-1"},
            "reconciliation": {"totalAmount": 10}
        }));
    });
    let workflow_mock = server.mock(|when, then| {
        when.method(GET).path("/accounts/acc1/expenses/42/workflow");
        then.status(200).json_body(serde_json::json!({}));
    });
    let directory_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/accounts/acc1/users/emp-1/reimbursement-details");
        then.status(200)
            .json_body(serde_json::json!({"accountHolder": "Иван Иванов"}));
    });

    let generator = generator(&server, CustomFieldIds::default(), false);

    let outcome = generator.generate(42).await.unwrap();
    assert_eq!(outcome, GenerationOutcome::NotApplicable);
    assert_eq!(outcome.status_message(), "Expense is not a per-diem.");

    expense_mock.assert();
    // The workflow fetch and name resolution never happen.
    workflow_mock.assert_hits(0);
    directory_mock.assert_hits(0);
}

#[tokio::test]
async fn test_existing_form_skips_generation() {
    let server = MockServer::start();

    let mut expense = per_diem_expense_json();
    expense["document"]["files"] = serde_json::json!([
        {"id": "receipt-1"},
        {"id": "generated-form-1"}
    ]);

    let expense_mock = server.mock(|when, then| {
        when.method(GET).path("/accounts/acc1/expenses/42");
        then.status(200).json_body(expense);
    });
    let workflow_mock = server.mock(|when, then| {
        when.method(GET).path("/accounts/acc1/expenses/42/workflow");
        then.status(200).json_body(serde_json::json!({}));
    });

    let generator = generator(&server, CustomFieldIds::default(), false);

    let outcome = generator.generate(42).await.unwrap();
    assert_eq!(outcome, GenerationOutcome::AlreadyGenerated);

    expense_mock.assert();
    workflow_mock.assert_hits(0);
}

#[tokio::test]
async fn test_regenerate_flag_replaces_existing_form() {
    let server = MockServer::start();

    let mut expense = per_diem_expense_json();
    expense["document"]["files"] = serde_json::json!([
        {"id": "receipt-1"},
        {"id": "generated-form-1"}
    ]);

    server.mock(|when, then| {
        when.method(GET).path("/accounts/acc1/expenses/42");
        then.status(200).json_body(expense);
    });
    server.mock(|when, then| {
        when.method(GET).path("/accounts/acc1/expenses/42/workflow");
        then.status(200).json_body(serde_json::json!({}));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/accounts/acc1/users/emp-1/reimbursement-details");
        then.status(200)
            .json_body(serde_json::json!({"accountHolder": "Иван Иванов"}));
    });
    server.mock(|when, then| {
        when.method(POST).path("/token");
        then.status(200)
            .json_body(serde_json::json!({"access_token": "test-token", "expires_in": 3599}));
    });
    let copy_mock = server.mock(|when, then| {
        when.method(POST).path("/drives/d1/items/tpl1/copy");
        then.status(202)
            .header("Location", server.url("/drives/d1/items/NEW99?monitor=1"));
    });
    let export_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/drives/d1/items/NEW99/content")
            .query_param("format", "pdf");
        then.status(200).body("%PDF-1.7 fake pdf bytes");
    });
    server.mock(|when, then| {
        when.method(GET).path("/drives/d1/items/NEW99/content");
        then.status(200).body(template_docx());
    });
    server.mock(|when, then| {
        when.method(PUT).path("/drives/d1/items/NEW99/content");
        then.status(200);
    });
    let upload_mock = server.mock(|when, then| {
        when.method(POST).path("/accounts/acc1/expenses/42/files");
        then.status(201);
    });

    // Same two-file expense the skip test uses, but with regeneration
    // enabled the existing form no longer gates the run.
    let generator = generator(&server, CustomFieldIds::default(), true);

    let outcome = generator.generate(42).await.unwrap();
    assert_eq!(
        outcome,
        GenerationOutcome::Generated {
            file_name: "Per_Diem_For_Expense_42.pdf".to_string()
        }
    );

    copy_mock.assert();
    export_mock.assert();
    upload_mock.assert();
}

#[tokio::test]
async fn test_upstream_failure_propagates() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/accounts/acc1/expenses/42");
        then.status(500).body("internal error");
    });

    let generator = generator(&server, CustomFieldIds::default(), false);

    let err = generator.generate(42).await.unwrap_err();
    assert!(matches!(
        err,
        DocGenError::UpstreamStatus {
            service: "payhawk",
            status: 500,
            ..
        }
    ));
}
