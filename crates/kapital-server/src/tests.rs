//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use kapital_core::db::Database;
use kapital_core::models::{AccountType, NewAccount, NewRecord, RecordType};
use tower::ServiceExt;

fn setup_test_app() -> Router {
    let db = Database::in_memory().unwrap();
    create_router(db, None, ServerConfig::default())
}

fn setup_test_app_with_account() -> (Router, i64) {
    let db = Database::in_memory().unwrap();
    let account = db
        .create_account(&NewAccount {
            name: "Sparekonto".to_string(),
            account_type: AccountType::Savings,
        })
        .unwrap();
    db.create_record(&NewRecord {
        account_id: account.id,
        record_type: RecordType::Deposit,
        amount: 10_000_000,
        description: Some("Startkapital".to_string()),
        date: None,
    })
    .unwrap();
    (
        create_router(db, None, ServerConfig::default()),
        account.id,
    )
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get_body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn detail_fields(json: &serde_json::Value) -> Vec<String> {
    json["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap().to_string())
        .collect()
}

// ========== Health ==========

#[tokio::test]
async fn test_health() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    let json = get_body_json(response).await;
    assert_eq!(json["status"], "ok");
}

// ========== Account API Tests ==========

#[tokio::test]
async fn test_list_accounts_empty() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/accounts")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_account() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "name": "  Buffer  ",
        "account_type": "CHECKING"
    });
    let response = app
        .oneshot(json_request("POST", "/api/accounts", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["name"], "Buffer");
    assert_eq!(json["account_type"], "CHECKING");
    assert_eq!(json["total_amount"], 0);
    assert!(json["id"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_create_account_accepts_type_alias() {
    let app = setup_test_app();

    let body = serde_json::json!({ "name": "Aksjesparekonto", "type": "stock_savings" });
    let response = app
        .oneshot(json_request("POST", "/api/accounts", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["account_type"], "STOCK_SAVINGS");
}

#[tokio::test]
async fn test_create_account_validation_lists_every_field() {
    let app = setup_test_app();

    let body = serde_json::json!({ "name": "   ", "account_type": "PIGGY_BANK" });
    let response = app
        .oneshot(json_request("POST", "/api/accounts", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Validation failed");
    let fields = detail_fields(&json);
    assert!(fields.contains(&"name".to_string()));
    assert!(fields.contains(&"account_type".to_string()));
}

#[tokio::test]
async fn test_create_account_invalid_json() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/accounts")
                .header("content-type", "application/json")
                .body(Body::from("{\"name\": "))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Invalid JSON");
}

#[tokio::test]
async fn test_upsert_account_replaces_existing() {
    let (app, account_id) = setup_test_app_with_account();

    let body = serde_json::json!({
        "id": account_id,
        "name": "Fond",
        "account_type": "INVESTMENT"
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/accounts", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["id"], account_id);
    assert_eq!(json["name"], "Fond");
    assert_eq!(json["total_amount"], 10_000_000);

    let response = app.oneshot(get("/api/accounts")).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_get_account_with_balance() {
    let (app, account_id) = setup_test_app_with_account();

    let response = app
        .oneshot(get(&format!("/api/accounts/{}", account_id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["name"], "Sparekonto");
    assert_eq!(json["total_amount"], 10_000_000);
}

#[tokio::test]
async fn test_get_account_not_found() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/accounts/99999")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Account 99999 not found");
}

#[tokio::test]
async fn test_update_account() {
    let (app, account_id) = setup_test_app_with_account();

    let body = serde_json::json!({ "name": "Bufferkonto" });
    let response = app
        .oneshot(json_request(
            "PATCH",
            &format!("/api/accounts/{}", account_id),
            body,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["name"], "Bufferkonto");
    assert_eq!(json["account_type"], "SAVINGS");
}

#[tokio::test]
async fn test_update_account_not_found() {
    let app = setup_test_app();

    let body = serde_json::json!({ "name": "Ghost" });
    let response = app
        .oneshot(json_request("PATCH", "/api/accounts/424242", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_account_removes_records() {
    let (app, account_id) = setup_test_app_with_account();

    let response = app
        .clone()
        .oneshot(delete(&format!("/api/accounts/{}", account_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["success"], true);

    let response = app.clone().oneshot(get("/api/records")).await.unwrap();
    let json = get_body_json(response).await;
    assert!(json.as_array().unwrap().is_empty());

    // Second delete is a 404
    let response = app
        .oneshot(delete(&format!("/api/accounts/{}", account_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== Record API Tests ==========

#[tokio::test]
async fn test_create_record_updates_account_total() {
    let (app, account_id) = setup_test_app_with_account();

    let body = serde_json::json!({
        "account_id": account_id,
        "type": "WITHDRAWAL",
        "amount": 2_500_000,
        "date": "2024-03-01"
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/records", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["record_type"], "WITHDRAWAL");
    assert_eq!(json["amount"], 2_500_000);
    assert!(json["date"].as_str().unwrap().starts_with("2024-03-01"));

    let response = app
        .oneshot(get(&format!("/api/accounts/{}", account_id)))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["total_amount"], 7_500_000);
}

#[tokio::test]
async fn test_create_record_unknown_account() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "account_id": 777,
        "record_type": "DEPOSIT",
        "amount": 100
    });
    let response = app
        .oneshot(json_request("POST", "/api/records", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Validation failed");
    assert_eq!(detail_fields(&json), vec!["account_id".to_string()]);
}

#[tokio::test]
async fn test_create_record_negative_amount() {
    let (app, account_id) = setup_test_app_with_account();

    let body = serde_json::json!({
        "account_id": account_id,
        "record_type": "DEPOSIT",
        "amount": -5
    });
    let response = app
        .oneshot(json_request("POST", "/api/records", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert_eq!(detail_fields(&json), vec!["amount".to_string()]);
    assert_eq!(json["details"][0]["message"], "must not be negative");
}

#[tokio::test]
async fn test_create_record_oversized_amount() {
    let (app, account_id) = setup_test_app_with_account();

    let body = serde_json::json!({
        "account_id": account_id,
        "record_type": "DEPOSIT",
        "amount": i64::MAX
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/records", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert_eq!(detail_fields(&json), vec!["amount".to_string()]);
    assert_eq!(
        json["details"][0]["message"],
        "must be at most 10000000000000.00"
    );

    let response = app.oneshot(get("/api/accounts")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json[0]["total_amount"], 10_000_000);
}

#[tokio::test]
async fn test_create_record_bad_date() {
    let (app, account_id) = setup_test_app_with_account();

    let body = serde_json::json!({
        "account_id": account_id,
        "record_type": "DEPOSIT",
        "amount": 100,
        "date": "01/03/2024"
    });
    let response = app
        .oneshot(json_request("POST", "/api/records", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert_eq!(detail_fields(&json), vec!["date".to_string()]);
}

#[tokio::test]
async fn test_list_records_by_account() {
    let (app, account_id) = setup_test_app_with_account();

    let body = serde_json::json!({ "name": "Annen", "account_type": "CHECKING" });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/accounts", body))
        .await
        .unwrap();
    let other_id = get_body_json(response).await["id"].as_i64().unwrap();

    let body = serde_json::json!({
        "account_id": other_id,
        "record_type": "DEPOSIT",
        "amount": 500
    });
    app.clone()
        .oneshot(json_request("POST", "/api/records", body))
        .await
        .unwrap();

    let response = app.clone().oneshot(get("/api/records")).await.unwrap();
    assert_eq!(get_body_json(response).await.as_array().unwrap().len(), 2);

    let response = app
        .oneshot(get(&format!("/api/records?account_id={}", account_id)))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    let records = json.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["account_id"], account_id);
}

#[tokio::test]
async fn test_update_record_clears_description() {
    let (app, _) = setup_test_app_with_account();

    let response = app.clone().oneshot(get("/api/records")).await.unwrap();
    let record_id = get_body_json(response).await[0]["id"].as_i64().unwrap();

    let body = serde_json::json!({ "description": null, "amount": 12_000_000 });
    let response = app
        .oneshot(json_request(
            "PATCH",
            &format!("/api/records/{}", record_id),
            body,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert!(json["description"].is_null());
    assert_eq!(json["amount"], 12_000_000);
}

#[tokio::test]
async fn test_delete_record_not_found() {
    let app = setup_test_app();

    let response = app.oneshot(delete("/api/records/31337")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Record 31337 not found");
}

// ========== Debt and Income API Tests ==========

#[tokio::test]
async fn test_debt_crud() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "name": "Lånekassen",
        "debt_type": "STUDENT_LOAN",
        "amount": 35_000_000
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/debts", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let id = get_body_json(response).await["id"].as_i64().unwrap();

    let body = serde_json::json!({ "amount": 34_000_000 });
    let response = app
        .clone()
        .oneshot(json_request("PATCH", &format!("/api/debts/{}", id), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(get_body_json(response).await["amount"], 34_000_000);

    let response = app
        .clone()
        .oneshot(delete(&format!("/api/debts/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get(&format!("/api/debts/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_debt_missing_fields() {
    let app = setup_test_app();

    let response = app
        .oneshot(json_request("POST", "/api/debts", serde_json::json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    let fields = detail_fields(&json);
    assert_eq!(fields.len(), 3);
    assert!(json["details"]
        .as_array()
        .unwrap()
        .iter()
        .all(|d| d["message"] == "is required"));
}

#[tokio::test]
async fn test_income_crud() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "name": "Lønn",
        "amount": 5_500_000,
        "frequency": "MONTHLY"
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/incomes", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["frequency"], "MONTHLY");
    let id = json["id"].as_i64().unwrap();

    let body = serde_json::json!({ "frequency": "FORTNIGHTLY" });
    let response = app
        .clone()
        .oneshot(json_request("PATCH", &format!("/api/incomes/{}", id), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.oneshot(get("/api/incomes")).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["frequency"], "MONTHLY");
}

// ========== Settings API Tests ==========

#[tokio::test]
async fn test_get_default_settings() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/settings")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["currency"], "NOK");
    assert_eq!(json["currency_display"], "SYMBOL");
    assert_eq!(json["capital_goal"], 100_000_000);
    assert!(json["sifo_living_expense"].is_null());
}

#[tokio::test]
async fn test_patch_settings_keeps_other_fields() {
    let app = setup_test_app();

    let body = serde_json::json!({ "capital_goal": 250_000_000, "currency": " sek " });
    let response = app
        .clone()
        .oneshot(json_request("PATCH", "/api/settings", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = serde_json::json!({ "sifo_living_expense": 1_200_000 });
    let response = app
        .clone()
        .oneshot(json_request("PATCH", "/api/settings", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/api/settings")).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["capital_goal"], 250_000_000);
    assert_eq!(json["currency"], "SEK");
    assert_eq!(json["sifo_living_expense"], 1_200_000);
}

#[tokio::test]
async fn test_post_settings_resets_omitted_fields() {
    let app = setup_test_app();

    let body = serde_json::json!({ "capital_goal": 1 });
    app.clone()
        .oneshot(json_request("PATCH", "/api/settings", body))
        .await
        .unwrap();

    let body = serde_json::json!({ "currency_display": "code" });
    let response = app
        .oneshot(json_request("POST", "/api/settings", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["currency_display"], "CODE");
    assert_eq!(json["capital_goal"], 100_000_000);
}

#[tokio::test]
async fn test_settings_validation() {
    let app = setup_test_app();

    let body = serde_json::json!({ "ltv_ratio_bp": 12_000, "loan_term_years": 0 });
    let response = app
        .oneshot(json_request("PATCH", "/api/settings", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    let fields = detail_fields(&json);
    assert!(fields.contains(&"ltv_ratio_bp".to_string()));
    assert!(fields.contains(&"loan_term_years".to_string()));
}

#[tokio::test]
async fn test_settings_rejects_oversized_rates() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "interest_rate_bp": u32::MAX,
        "stress_test_rate_bp": 1,
        "debt_ratio_bp": 200_000
    });
    let response = app
        .clone()
        .oneshot(json_request("PATCH", "/api/settings", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    let fields = detail_fields(&json);
    assert!(fields.contains(&"interest_rate_bp".to_string()));
    assert!(fields.contains(&"debt_ratio_bp".to_string()));
    assert!(!fields.contains(&"stress_test_rate_bp".to_string()));

    let response = app.oneshot(get("/api/affordability")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_reset_settings() {
    let app = setup_test_app();

    let body = serde_json::json!({ "capital_goal": 5 });
    app.clone()
        .oneshot(json_request("PATCH", "/api/settings", body))
        .await
        .unwrap();

    let response = app.clone().oneshot(delete("/api/settings")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(get_body_json(response).await["success"], true);

    let response = app.oneshot(get("/api/settings")).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["capital_goal"], 100_000_000);
}

// ========== Aggregate API Tests ==========

#[tokio::test]
async fn test_dashboard_empty() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/dashboard")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["total_capital"], 0.0);
    assert_eq!(json["weekly_history"].as_array().unwrap().len(), 10);
    assert_eq!(json["goal"]["goal"], 1_000_000.0);
}

#[tokio::test]
async fn test_dashboard_in_major_units() {
    let (app, _) = setup_test_app_with_account();

    let body = serde_json::json!({
        "name": "Billån",
        "debt_type": "CONSUMER_LOAN",
        "amount": 2_000_000
    });
    app.clone()
        .oneshot(json_request("POST", "/api/debts", body))
        .await
        .unwrap();

    let response = app.oneshot(get("/api/dashboard")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["total_capital"], 100_000.0);
    assert_eq!(json["total_debt"], 20_000.0);
    assert_eq!(json["net_worth"], 80_000.0);
    assert_eq!(json["accounts"][0]["balance"], 100_000.0);
    assert_eq!(json["goal"]["progress_percentage"], 10);
}

#[tokio::test]
async fn test_affordability_without_income() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/affordability")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["max_loan"], 0.0);
    assert_eq!(json["annual_income"], 0.0);
}

// ========== Export API Tests ==========

#[tokio::test]
async fn test_export_records_csv() {
    let (app, _) = setup_test_app_with_account();

    let response = app.oneshot(get("/api/export/records")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    assert!(response
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .contains("records.csv"));

    let text = get_body_text(response).await;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "date,account,type,amount,signed_amount,description");
    assert!(lines[1].contains("Sparekonto,DEPOSIT,100000.00,100000.00,Startkapital"));
}

#[tokio::test]
async fn test_export_records_json() {
    let (app, account_id) = setup_test_app_with_account();

    let response = app
        .oneshot(get(&format!(
            "/api/export/records?format=json&account_id={}",
            account_id
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["account"], "Sparekonto");
    assert_eq!(rows[0]["amount"], 100_000.0);
}

#[tokio::test]
async fn test_export_records_invalid_params() {
    let app = setup_test_app();

    let response = app
        .clone()
        .oneshot(get("/api/export/records?format=xml"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(get("/api/export/records?from=yesterday"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Invalid 'from' date format (use YYYY-MM-DD)");
}
