//! End-to-end HTTP tests: vet signup through clinic creation, pet
//! registration, and the appointment lifecycle, all through the router.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use vetclinic_api::api_router;
use vetclinic_core::Database;

fn json_request(method: &str, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(t) = token {
        builder = builder.header("Authorization", format!("Bearer {t}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Register a vet, open their clinic, and return (vet token, vet id,
/// clinic id).
async fn setup_clinic(app: &Router) -> (String, String, String) {
    let (status, json) = send(
        app,
        json_request(
            "POST",
            "/vets/register",
            None,
            serde_json::json!({
                "firstName": "Ada",
                "lastName": "Wong",
                "email": "ada@example.com",
                "veterinaryId": "VET-1001"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "vet signup failed: {json}");
    let vet_id = json["vet"]["id"].as_str().unwrap().to_string();

    let (status, json) = send(
        app,
        json_request(
            "POST",
            "/sessions",
            None,
            serde_json::json!({ "kind": "veterinarian", "id": vet_id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = json["token"].as_str().unwrap().to_string();

    let (status, json) = send(
        app,
        json_request(
            "POST",
            "/clinics",
            Some(&token),
            serde_json::json!({
                "name": "Happy Paws",
                "address": "1 Main St",
                "phoneNumber": "555-0100"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "clinic creation failed: {json}");
    let clinic_id = json["clinic"]["id"].as_str().unwrap().to_string();

    (token, vet_id, clinic_id)
}

async fn owner_token(app: &Router, owner_id: &str) -> String {
    let (status, json) = send(
        app,
        json_request(
            "POST",
            "/sessions",
            None,
            serde_json::json!({ "kind": "owner", "id": owner_id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    json["token"].as_str().unwrap().to_string()
}

/// Submit a pet as the owner and approve it as the vet; returns the pet id.
async fn approved_pet(app: &Router, owner: &str, vet: &str, clinic_id: &str) -> String {
    let (status, json) = send(
        app,
        json_request(
            "POST",
            "/pets",
            Some(owner),
            serde_json::json!({
                "name": "Max",
                "species": "canine",
                "clinicId": clinic_id
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "pet submit failed: {json}");
    let pet_id = json["pet"]["id"].as_str().unwrap().to_string();
    assert_eq!(json["pet"]["registrationStatus"], "pending");

    let (status, json) = send(
        app,
        json_request(
            "PATCH",
            &format!("/pets/{pet_id}/approve"),
            Some(vet),
            serde_json::json!({}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "approve failed: {json}");
    assert_eq!(json["pet"]["registrationStatus"], "approved");

    pet_id
}

#[tokio::test]
async fn pet_registration_flow() {
    let app = api_router(Database::open_in_memory().unwrap());
    let (vet_token, _, clinic_id) = setup_clinic(&app).await;
    let owner = owner_token(&app, "owner-1").await;

    // Missing species → 400 naming the field
    let (status, json) = send(
        &app,
        json_request(
            "POST",
            "/pets",
            Some(&owner),
            serde_json::json!({ "name": "Max", "species": "", "clinicId": clinic_id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "VALIDATION");
    assert!(json["error"]["message"].as_str().unwrap().contains("species"));

    let pet_id = approved_pet(&app, &owner, &vet_token, &clinic_id).await;

    // Second approval → 409 INVALID_STATE
    let (status, json) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/pets/{pet_id}/approve"),
            Some(&vet_token),
            serde_json::json!({}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"]["code"], "INVALID_STATE");

    // Owners cannot approve
    let (status, _) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/pets/{pet_id}/approve"),
            Some(&owner),
            serde_json::json!({}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Pending queue is clinic-scoped off the vet's token
    let (status, json) = send(&app, get_request("/pets/clinic/pending", &vet_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["pendingPets"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn rejection_stores_reason() {
    let app = api_router(Database::open_in_memory().unwrap());
    let (vet_token, _, clinic_id) = setup_clinic(&app).await;
    let owner = owner_token(&app, "owner-1").await;

    let (_, json) = send(
        &app,
        json_request(
            "POST",
            "/pets",
            Some(&owner),
            serde_json::json!({ "name": "Rex", "species": "canine", "clinicId": clinic_id }),
        ),
    )
    .await;
    let pet_id = json["pet"]["id"].as_str().unwrap().to_string();

    let (status, json) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/pets/{pet_id}/reject"),
            Some(&vet_token),
            serde_json::json!({ "reason": "incomplete records" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["pet"]["registrationStatus"], "rejected");
    assert_eq!(json["pet"]["rejectionReason"], "incomplete records");
}

#[tokio::test]
async fn appointment_lifecycle_over_http() {
    let app = api_router(Database::open_in_memory().unwrap());
    let (vet_token, vet_id, clinic_id) = setup_clinic(&app).await;
    let owner = owner_token(&app, "owner-1").await;
    let pet_id = approved_pet(&app, &owner, &vet_token, &clinic_id).await;

    // A slot safely in the future so the "cannot complete a future visit"
    // check below stays meaningful regardless of when the test runs.
    let slot = (chrono::Utc::now() + chrono::Duration::days(30))
        .to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    let book_body = serde_json::json!({
        "petId": pet_id,
        "clinicId": clinic_id,
        "vetId": vet_id,
        "dateTime": slot,
        "reason": "annual checkup"
    });

    let (status, json) = send(
        &app,
        json_request("POST", "/appointments/book", Some(&owner), book_body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "book failed: {json}");
    assert_eq!(json["appointment"]["status"], "booked");
    let appt_id = json["appointment"]["id"].as_str().unwrap().to_string();

    // Same vet, same instant → 409 CONFLICT
    let (status, json) = send(
        &app,
        json_request("POST", "/appointments/book", Some(&owner), book_body),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"]["code"], "CONFLICT");

    // Owner cannot confirm; the clinic can
    let (status, _) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/appointments/{appt_id}/confirm"),
            Some(&owner),
            serde_json::json!({}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, json) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/appointments/{appt_id}/confirm"),
            Some(&vet_token),
            serde_json::json!({}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["appointment"]["status"], "confirmed");

    // Future visit cannot be completed
    let (status, json) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/appointments/{appt_id}/complete"),
            Some(&vet_token),
            serde_json::json!({}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"]["code"], "INVALID_STATE");

    // Cancel without a reason → 400; with one → canceled
    let (status, _) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/appointments/{appt_id}/cancel"),
            Some(&owner),
            serde_json::json!({ "reason": "" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/appointments/{appt_id}/cancel"),
            Some(&owner),
            serde_json::json!({ "reason": "schedule clash" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["appointment"]["status"], "canceled");
    assert_eq!(json["appointment"]["cancellationReason"], "schedule clash");

    // Owner listing carries stats over the unfiltered set
    let (status, json) = send(
        &app,
        get_request("/appointments/owner/my-appointments", &owner),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stats"]["total"], 1);
    assert_eq!(json["stats"]["canceled"], 1);
    assert_eq!(json["appointments"].as_array().unwrap().len(), 1);

    let (status, json) = send(
        &app,
        get_request("/appointments/owner/my-appointments?filter=upcoming", &owner),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["appointments"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn staff_management_over_http() {
    let app = api_router(Database::open_in_memory().unwrap());
    let (vet_token, vet_id, clinic_id) = setup_clinic(&app).await;

    // Add a second vet with a colliding license → 409
    let (status, json) = send(
        &app,
        json_request(
            "POST",
            "/clinics/staff",
            Some(&vet_token),
            serde_json::json!({
                "clinicId": clinic_id,
                "staffType": "veterinarian",
                "firstName": "Bo",
                "lastName": "Chen",
                "email": "bo@example.com",
                "veterinaryId": "VET-1001"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT, "{json}");
    assert_eq!(json["error"]["code"], "CONFLICT");

    // Unique license succeeds
    let (status, json) = send(
        &app,
        json_request(
            "POST",
            "/clinics/staff",
            Some(&vet_token),
            serde_json::json!({
                "clinicId": clinic_id,
                "staffType": "veterinarian",
                "firstName": "Bo",
                "lastName": "Chen",
                "email": "bo@example.com",
                "veterinaryId": "VET-2002"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{json}");
    let second_vet = json["staff"]["id"].as_str().unwrap().to_string();

    // Support staff through the same route
    let (status, json) = send(
        &app,
        json_request(
            "POST",
            "/clinics/staff",
            Some(&vet_token),
            serde_json::json!({
                "clinicId": clinic_id,
                "staffType": "support",
                "firstName": "Kim",
                "lastName": "Ito",
                "email": "kim@example.com",
                "role": "receptionist"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["staff"]["role"], "receptionist");

    // The Primary vet can never be deactivated
    let (status, json) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/vets/{vet_id}/deactivate"),
            Some(&vet_token),
            serde_json::json!({}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"]["code"], "FORBIDDEN");

    // A non-primary vet can
    let (status, _) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/vets/{second_vet}/deactivate"),
            Some(&vet_token),
            serde_json::json!({}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
