mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use common::{create_conference, create_location, id_of, setup, IMAGE_URL};

// ============================================================================
// State API Tests
// ============================================================================

#[tokio::test]
async fn test_list_states() {
    let server = setup();

    let response = server.get("/api/states").await;
    response.assert_status_ok();

    let body: Value = response.json();
    let states = body["states"].as_array().unwrap();
    assert_eq!(states.len(), 51);
    assert_eq!(states[0], json!({"name": "Alabama", "abbreviation": "AL"}));
}

// ============================================================================
// Location API Tests
// ============================================================================

#[tokio::test]
async fn test_create_location_returns_detail() {
    let server = setup();

    let location = create_location(&server, "Convention Center", "Philadelphia").await;

    assert!(location["href"].as_str().unwrap().starts_with("/api/locations/"));
    assert_eq!(location["name"], "Convention Center");
    assert_eq!(location["city"], "Philadelphia");
    assert_eq!(location["room_count"], 8);
    assert_eq!(location["state"], "PA");
    assert_eq!(location["image_url"], IMAGE_URL);
    assert_eq!(location["conferences"], json!([]));
}

#[tokio::test]
async fn test_create_location_with_unknown_state() {
    let server = setup();

    let response = server
        .post("/api/locations")
        .json(&json!({
            "name": "Somewhere",
            "city": "Philadelphia",
            "room_count": 1,
            "state": "ZZ",
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({"message": "Invalid state abbreviation"}));
}

#[tokio::test]
async fn test_state_abbreviation_is_case_insensitive() {
    let server = setup();

    let response = server
        .post("/api/locations")
        .json(&json!({
            "name": "Hall",
            "city": "Pittsburgh",
            "room_count": 2,
            "state": "pa",
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let location: Value = response.json();
    assert_eq!(location["state"], "PA");
}

#[tokio::test]
async fn test_failed_image_search_leaves_image_null() {
    let server = setup();

    let location = create_location(&server, "Ghost Hall", "Nowhere").await;

    assert_eq!(location["image_url"], Value::Null);
}

#[tokio::test]
async fn test_list_locations_ordered_by_name() {
    let server = setup();
    create_location(&server, "Zeta Hall", "Philadelphia").await;
    create_location(&server, "Alpha Hall", "Philadelphia").await;

    let response = server.get("/api/locations").await;
    response.assert_status_ok();

    let body: Value = response.json();
    let names: Vec<&str> = body["locations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Alpha Hall", "Zeta Hall"]);
    assert_eq!(
        body["locations"][0].as_object().unwrap().keys().collect::<Vec<_>>(),
        ["href", "name"]
    );
}

#[tokio::test]
async fn test_location_detail_lists_its_conferences() {
    let server = setup();
    let location = create_location(&server, "Convention Center", "Philadelphia").await;
    let location_id = id_of(&location);
    let conference = create_conference(&server, &location_id, "RustConf").await;

    let response = server.get(&format!("/api/locations/{location_id}")).await;
    response.assert_status_ok();

    let detail: Value = response.json();
    assert_eq!(
        detail["conferences"],
        json!([{ "href": conference["href"], "name": "RustConf" }])
    );
}

#[tokio::test]
async fn test_update_location() {
    let server = setup();
    let location = create_location(&server, "Convention Center", "Philadelphia").await;
    let location_id = id_of(&location);

    let response = server
        .put(&format!("/api/locations/{location_id}"))
        .json(&json!({"name": "Renamed Center", "state": "NJ"}))
        .await;
    response.assert_status_ok();

    let updated: Value = response.json();
    assert_eq!(updated["name"], "Renamed Center");
    assert_eq!(updated["city"], "Philadelphia");
    assert_eq!(updated["state"], "NJ");
    assert_eq!(updated["image_url"], IMAGE_URL);
}

#[tokio::test]
async fn test_moving_location_to_unknown_city_clears_image() {
    let server = setup();
    let location = create_location(&server, "Convention Center", "Philadelphia").await;
    assert_eq!(location["image_url"], IMAGE_URL);

    let response = server
        .put(&format!("/api/locations/{}", id_of(&location)))
        .json(&json!({"city": "Nowhere"}))
        .await;
    response.assert_status_ok();

    let updated: Value = response.json();
    assert_eq!(updated["city"], "Nowhere");
    assert_eq!(updated["image_url"], Value::Null);
}

#[tokio::test]
async fn test_update_location_with_unknown_state() {
    let server = setup();
    let location = create_location(&server, "Convention Center", "Philadelphia").await;

    let response = server
        .put(&format!("/api/locations/{}", id_of(&location)))
        .json(&json!({"state": "XX"}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({"message": "Invalid state abbreviation"}));
}

#[tokio::test]
async fn test_get_missing_location() {
    let server = setup();

    let response = server.get(&format!("/api/locations/{}", Uuid::new_v4())).await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_delete_location() {
    let server = setup();
    let location = create_location(&server, "Convention Center", "Philadelphia").await;
    let path = format!("/api/locations/{}", id_of(&location));

    let response = server.delete(&path).await;
    response.assert_status_ok();
    response.assert_json(&json!({"deleted": true}));

    let response = server.delete(&path).await;
    response.assert_json(&json!({"deleted": false}));

    server.get(&path).await.assert_status_not_found();
}

// ============================================================================
// Conference API Tests
// ============================================================================

#[tokio::test]
async fn test_create_conference_returns_detail() {
    let server = setup();
    let location = create_location(&server, "Convention Center", "Philadelphia").await;

    let conference = create_conference(&server, &id_of(&location), "RustConf").await;

    assert_eq!(
        conference.as_object().unwrap().keys().collect::<Vec<_>>(),
        [
            "href",
            "name",
            "starts",
            "ends",
            "description",
            "created",
            "updated",
            "max_presentations",
            "max_attendees",
            "location"
        ]
    );
    assert_eq!(conference["starts"], "2025-05-01T09:00:00+00:00");
    assert_eq!(
        conference["location"],
        json!({ "href": location["href"], "name": "Convention Center" })
    );
}

#[tokio::test]
async fn test_create_conference_with_unknown_location() {
    let server = setup();

    let response = server
        .post("/api/conferences")
        .json(&json!({
            "name": "Lost",
            "starts": "2025-05-01T09:00:00Z",
            "ends": "2025-05-01T17:00:00Z",
            "description": "",
            "max_presentations": 1,
            "max_attendees": 1,
            "location": Uuid::new_v4(),
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({"message": "Invalid location id"}));
}

#[tokio::test]
async fn test_get_conference_with_weather() {
    let server = setup();
    let location = create_location(&server, "Convention Center", "Philadelphia").await;
    let conference = create_conference(&server, &id_of(&location), "RustConf").await;

    let response = server
        .get(&format!("/api/conferences/{}", id_of(&conference)))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["conference"], conference);
    assert_eq!(
        body["weather"],
        json!({"main": "Clear", "description": "clear sky"})
    );
}

#[tokio::test]
async fn test_get_conference_without_coordinates_has_null_weather() {
    let server = setup();
    let location = create_location(&server, "Steel Hall", "Pittsburgh").await;
    let conference = create_conference(&server, &id_of(&location), "PyCon").await;

    let response = server
        .get(&format!("/api/conferences/{}", id_of(&conference)))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["conference"]["name"], "PyCon");
    assert_eq!(body["weather"], Value::Null);
}

#[tokio::test]
async fn test_list_conferences_ordered_by_start() {
    let server = setup();
    let location = create_location(&server, "Convention Center", "Philadelphia").await;
    let location_id = id_of(&location);
    create_conference(&server, &location_id, "Beta").await;
    create_conference(&server, &location_id, "Alpha").await;

    let response = server.get("/api/conferences").await;
    response.assert_status_ok();

    let body: Value = response.json();
    let names: Vec<&str> = body["conferences"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    // Same start time, so name breaks the tie.
    assert_eq!(names, ["Alpha", "Beta"]);
}

#[tokio::test]
async fn test_update_conference() {
    let server = setup();
    let location = create_location(&server, "Convention Center", "Philadelphia").await;
    let conference = create_conference(&server, &id_of(&location), "RustConf").await;
    let path = format!("/api/conferences/{}", id_of(&conference));

    let response = server
        .put(&path)
        .json(&json!({"max_attendees": 1200, "description": "Bigger"}))
        .await;
    response.assert_status_ok();

    let updated: Value = response.json();
    assert_eq!(updated["max_attendees"], 1200);
    assert_eq!(updated["description"], "Bigger");
    assert_eq!(updated["name"], "RustConf");

    let response = server
        .put(&path)
        .json(&json!({"location": Uuid::new_v4()}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({"message": "Invalid location id"}));
}

#[tokio::test]
async fn test_delete_conference() {
    let server = setup();
    let location = create_location(&server, "Convention Center", "Philadelphia").await;
    let conference = create_conference(&server, &id_of(&location), "RustConf").await;
    let path = format!("/api/conferences/{}", id_of(&conference));

    server.delete(&path).await.assert_json(&json!({"deleted": true}));
    server.get(&path).await.assert_status_not_found();
}

// ============================================================================
// Attendee API Tests
// ============================================================================

#[tokio::test]
async fn test_attendee_lifecycle() {
    let server = setup();
    let location = create_location(&server, "Convention Center", "Philadelphia").await;
    let conference = create_conference(&server, &id_of(&location), "RustConf").await;
    let conference_id = id_of(&conference);

    let response = server
        .post(&format!("/api/conferences/{conference_id}/attendees"))
        .json(&json!({
            "email": "ada@example.com",
            "name": "Ada Lovelace",
            "company_name": "Analytical Engines",
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let attendee: Value = response.json();
    assert_eq!(attendee["email"], "ada@example.com");
    assert_eq!(
        attendee["conference"],
        json!({ "href": conference["href"], "name": "RustConf" })
    );

    let response = server
        .get(&format!("/api/conferences/{conference_id}/attendees"))
        .await;
    response.assert_status_ok();
    response.assert_json(&json!({
        "attendees": [{ "href": attendee["href"], "name": "Ada Lovelace" }]
    }));

    let path = format!("/api/attendees/{}", id_of(&attendee));
    let response = server.put(&path).json(&json!({"name": "Ada King"})).await;
    response.assert_status_ok();
    let updated: Value = response.json();
    assert_eq!(updated["name"], "Ada King");
    assert_eq!(updated["company_name"], "Analytical Engines");

    server.delete(&path).await.assert_json(&json!({"deleted": true}));
    server.get(&path).await.assert_status_not_found();
}

#[tokio::test]
async fn test_update_attendee_clears_company_name() {
    let server = setup();
    let location = create_location(&server, "Convention Center", "Philadelphia").await;
    let conference = create_conference(&server, &id_of(&location), "RustConf").await;

    let response = server
        .post(&format!("/api/conferences/{}/attendees", id_of(&conference)))
        .json(&json!({
            "email": "ada@example.com",
            "name": "Ada Lovelace",
            "company_name": "Analytical Engines",
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let path = format!("/api/attendees/{}", id_of(&response.json::<Value>()));

    let response = server.put(&path).json(&json!({"email": "ada@example.org"})).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["company_name"], "Analytical Engines");

    let response = server.put(&path).json(&json!({"company_name": null})).await;
    response.assert_status_ok();
    let updated: Value = response.json();
    assert_eq!(updated["company_name"], Value::Null);
    assert_eq!(updated["email"], "ada@example.org");
}

#[tokio::test]
async fn test_create_attendee_for_unknown_conference() {
    let server = setup();

    let response = server
        .post(&format!("/api/conferences/{}/attendees", Uuid::new_v4()))
        .json(&json!({"email": "a@example.com", "name": "A", "company_name": null}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({"message": "Invalid conference id"}));
}

// ============================================================================
// Presentation API Tests
// ============================================================================

#[tokio::test]
async fn test_presentation_review_flow() {
    let server = setup();
    let location = create_location(&server, "Convention Center", "Philadelphia").await;
    let conference = create_conference(&server, &id_of(&location), "RustConf").await;
    let conference_id = id_of(&conference);

    let response = server
        .post(&format!("/api/conferences/{conference_id}/presentations"))
        .json(&json!({
            "presenter_name": "Grace Hopper",
            "company_name": null,
            "presenter_email": "grace@example.com",
            "title": "Compilers for Everyone",
            "synopsis": "Why machines should read English",
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let presentation: Value = response.json();
    assert_eq!(presentation["status"], "SUBMITTED");
    assert_eq!(presentation["company_name"], Value::Null);

    let path = format!("/api/presentations/{}", id_of(&presentation));
    let response = server.put(&format!("{path}/approval")).await;
    response.assert_status_ok();
    let approved: Value = response.json();
    assert_eq!(approved["status"], "APPROVED");

    let response = server
        .get(&format!("/api/conferences/{conference_id}/presentations"))
        .await;
    response.assert_json(&json!({
        "presentations": [{
            "href": presentation["href"],
            "title": "Compilers for Everyone",
            "status": "APPROVED",
        }]
    }));

    let response = server.put(&format!("{path}/rejection")).await;
    let rejected: Value = response.json();
    assert_eq!(rejected["status"], "REJECTED");

    server.delete(&path).await.assert_json(&json!({"deleted": true}));
    server
        .put(&format!("{path}/approval"))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_deleting_conference_removes_its_presentations() {
    let server = setup();
    let location = create_location(&server, "Convention Center", "Philadelphia").await;
    let conference = create_conference(&server, &id_of(&location), "RustConf").await;
    let conference_id = id_of(&conference);

    let response = server
        .post(&format!("/api/conferences/{conference_id}/presentations"))
        .json(&json!({
            "presenter_name": "Grace Hopper",
            "company_name": "Navy",
            "presenter_email": "grace@example.com",
            "title": "COBOL",
            "synopsis": "Business languages",
        }))
        .await;
    let presentation: Value = response.json();

    server
        .delete(&format!("/api/conferences/{conference_id}"))
        .await
        .assert_status_ok();
    server
        .get(&format!("/api/presentations/{}", id_of(&presentation)))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let server = setup();

    let response = server.get("/api-docs/openapi.json").await;
    response.assert_status_ok();

    let doc: Value = response.json();
    assert!(doc["paths"]["/api/conferences/{id}"].is_object());
    assert!(doc["paths"]["/api/presentations/{id}/approval"].is_object());
}
