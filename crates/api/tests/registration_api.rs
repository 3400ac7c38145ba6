//! End-to-end registration flows against a real Postgres.
//!
//! Run with `DATABASE_URL` pointing at a scratch server and `--ignored`.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, put_json};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn create(app: axum::Router, uri: &str, body: Value) -> Value {
    let response = post_json(app, uri, body).await;
    assert_eq!(response.status(), StatusCode::CREATED, "POST {uri}");
    body_json(response).await["data"].clone()
}

fn isrc(designation: &str) -> Value {
    json!({ "country": "BR", "registrant": "ABC", "year": "23", "designation": designation })
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "needs a live Postgres via DATABASE_URL"]
async fn lifecycle_follows_registration_and_release(pool: PgPool) {
    let app = common::build_test_app(pool);

    let project = create(app.clone(), "/api/v1/projects", json!({ "name": "Album" })).await;
    let project_id = project["id"].as_i64().unwrap();
    let lifecycle_uri = format!("/api/v1/projects/{project_id}/lifecycle");

    let json = body_json(get(app.clone(), &lifecycle_uri).await).await;
    assert_eq!(json["data"]["tag"], "draft");

    let work = create(
        app.clone(),
        "/api/v1/works",
        json!({ "project_id": project_id, "title": "Song" }),
    )
    .await;
    create(
        app.clone(),
        "/api/v1/phonograms",
        json!({ "work_id": work["id"], "title": "Song (master)", "isrc": isrc("00001") }),
    )
    .await;

    let json = body_json(get(app.clone(), &lifecycle_uri).await).await;
    assert_eq!(json["data"]["tag"], "pending_release");
    assert_eq!(json["data"]["label"], "Pending Release");

    create(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/releases"),
        json!({ "title": "Single", "status": "released" }),
    )
    .await;

    let json = body_json(get(app.clone(), &lifecycle_uri).await).await;
    assert_eq!(json["data"]["tag"], "released");

    let json = body_json(get(app, "/api/v1/projects/lifecycle-summary").await).await;
    assert_eq!(json["data"]["total"], 1);
    assert_eq!(json["data"]["counts"]["released"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "needs a live Postgres via DATABASE_URL"]
async fn lifecycle_summary_groups_rows_per_project(pool: PgPool) {
    let app = common::build_test_app(pool);

    let project = |name: &str, status: &str| json!({ "name": name, "status": status });

    // Draft: nothing registered.
    create(app.clone(), "/api/v1/projects", project("Empty", "draft")).await;

    // Pending release: work plus linked phonogram.
    let registered = create(app.clone(), "/api/v1/projects", project("Done", "completed")).await;
    let registered_work = create(
        app.clone(),
        "/api/v1/works",
        json!({ "project_id": registered["id"], "title": "Song" }),
    )
    .await;
    create(
        app.clone(),
        "/api/v1/phonograms",
        json!({ "work_id": registered_work["id"], "title": "Master", "isrc": isrc("00010") }),
    )
    .await;

    // In progress: its own work has no phonogram; the other project's
    // phonogram must not count for it.
    let busy = create(app.clone(), "/api/v1/projects", project("Busy", "in_progress")).await;
    create(
        app.clone(),
        "/api/v1/works",
        json!({ "project_id": busy["id"], "title": "Demo" }),
    )
    .await;

    // Released: any released release wins over an earlier planned one.
    let out = create(app.clone(), "/api/v1/projects", project("Out", "draft")).await;
    let releases_uri = format!("/api/v1/projects/{}/releases", out["id"]);
    create(app.clone(), &releases_uri, json!({ "title": "EP", "status": "planned" })).await;
    create(app.clone(), &releases_uri, json!({ "title": "LP", "status": "released" })).await;

    let response = get(app, "/api/v1/projects/lifecycle-summary").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 4);
    let counts = &json["data"]["counts"];
    assert_eq!(counts["draft"], 1);
    assert_eq!(counts["pending_release"], 1);
    assert_eq!(counts["in_progress"], 1);
    assert_eq!(counts["released"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "needs a live Postgres via DATABASE_URL"]
async fn phonogram_identifier_and_work_link_rules(pool: PgPool) {
    let app = common::build_test_app(pool);

    let work_a = create(app.clone(), "/api/v1/works", json!({ "title": "A" })).await;
    let work_b = create(app.clone(), "/api/v1/works", json!({ "title": "B" })).await;

    let phonogram = create(
        app.clone(),
        "/api/v1/phonograms",
        json!({ "work_id": work_a["id"], "title": "A (master)", "isrc": isrc("00001") }),
    )
    .await;
    assert_eq!(phonogram["isrc"], "BR-ABC-23-00001");
    assert_eq!(phonogram["isrc_parts"]["designation"], "00001");
    let uri = format!("/api/v1/phonograms/{}", phonogram["id"]);

    // Duplicate identifier.
    let response = post_json(
        app.clone(),
        "/api/v1/phonograms",
        json!({ "work_id": work_b["id"], "title": "B (master)", "isrc": isrc("00001") }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Moving to another work is refused; restating the same work is fine.
    let response = put_json(app.clone(), &uri, json!({ "work_id": work_b["id"] })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["field"], "work_id");

    let response = put_json(
        app.clone(),
        &uri,
        json!({ "work_id": work_a["id"], "title": "A (remaster)" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Blank parts clear the stored identifier.
    let blank = json!({ "country": "BR", "registrant": "", "year": "", "designation": "" });
    let response = put_json(app.clone(), &uri, json!({ "isrc": blank })).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["isrc"], Value::Null);
    assert_eq!(json["data"]["title"], "A (remaster)");

    let response = delete(app, &uri).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "needs a live Postgres via DATABASE_URL"]
async fn participants_save_over_cap_with_warning(pool: PgPool) {
    let app = common::build_test_app(pool);

    let work = create(app.clone(), "/api/v1/works", json!({ "title": "W" })).await;
    let phonogram = create(
        app.clone(),
        "/api/v1/phonograms",
        json!({ "work_id": work["id"], "title": "P" }),
    )
    .await;
    let uri = format!("/api/v1/phonograms/{}/participants", phonogram["id"]);

    let response = put_json(
        app.clone(),
        &uri,
        json!({ "participants": [
            { "name": "Band", "role": "performer", "percentage": "45" },
            { "name": "Label", "role": "phonographic_producer", "percentage": "41.70" },
        ] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["notice"]["severity"], "warning");
    assert_eq!(json["data"]["summary"]["check"]["category"], "performers");

    let json = body_json(get(app, &uri).await).await;
    assert_eq!(json["data"]["participants"].as_array().unwrap().len(), 2);
    assert_eq!(json["data"]["participants"][0]["name"], "Band");
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "needs a live Postgres via DATABASE_URL"]
async fn export_lines_carry_work_title_and_totals(pool: PgPool) {
    let app = common::build_test_app(pool);

    let work = create(app.clone(), "/api/v1/works", json!({ "title": "Night Song" })).await;
    let phonogram = create(
        app.clone(),
        "/api/v1/phonograms",
        json!({ "work_id": work["id"], "title": "Night Song (master)", "isrc": isrc("00042") }),
    )
    .await;
    create(
        app.clone(),
        "/api/v1/phonograms",
        json!({ "work_id": work["id"], "title": "Night Song (live)" }),
    )
    .await;

    let participants_uri = format!("/api/v1/phonograms/{}/participants", phonogram["id"]);
    let response = put_json(
        app.clone(),
        &participants_uri,
        json!({ "participants": [
            { "name": "Label", "role": "phonographic_producer", "percentage": "41.7" },
            { "name": "Singer", "role": "performer", "percentage": "20" },
            { "name": "Drums", "role": "musician", "percentage": "8.33" },
        ] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let uri = format!("/api/v1/phonograms/export?work_id={}", work["id"]);
    let json = body_json(get(app.clone(), &uri).await).await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);

    let master = rows
        .iter()
        .find(|r| r["title"] == "Night Song (master)")
        .unwrap();
    assert_eq!(master["work_title"], "Night Song");
    assert_eq!(master["isrc"], "BR-ABC-23-00042");
    assert_eq!(master["producers_total"], "41.70");
    assert_eq!(master["performers_total"], "20.00");
    assert_eq!(master["musicians_total"], "8.33");

    let live = rows.iter().find(|r| r["title"] == "Night Song (live)").unwrap();
    assert_eq!(live["isrc"], "");
    assert_eq!(live["producers_total"], "0.00");

    let json = body_json(get(app, &format!("{participants_uri}/export")).await).await;
    let lines = json["data"].as_array().unwrap();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["phonogram_title"], "Night Song (master)");
    assert_eq!(lines[0]["isrc"], "BR-ABC-23-00042");
    assert_eq!(lines[0]["role"], "phonographic_producer");
    assert_eq!(lines[0]["percentage"], "41.70");
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "needs a live Postgres via DATABASE_URL"]
async fn bulk_delete_reports_each_item(pool: PgPool) {
    let app = common::build_test_app(pool);

    let work = create(app.clone(), "/api/v1/works", json!({ "title": "W" })).await;
    create(
        app.clone(),
        "/api/v1/phonograms",
        json!({ "work_id": work["id"], "title": "P" }),
    )
    .await;

    let response = post_json(
        app.clone(),
        "/api/v1/works/bulk-delete",
        json!({ "ids": [work["id"], 999_999] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::MULTI_STATUS);
    let json = body_json(response).await;
    assert_eq!(json["data"]["succeeded"], json!([work["id"]]));
    assert_eq!(json["data"]["failed"][0]["id"], 999_999);
    assert_eq!(json["notice"]["description"], "1 deleted, 1 failed");

    let response = get(app, &format!("/api/v1/works/{}", work["id"])).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "needs a live Postgres via DATABASE_URL"]
async fn reconcile_report_persists_divergences(pool: PgPool) {
    let app = common::build_test_app(pool);

    for _ in 0..3 {
        create(
            app.clone(),
            "/api/v1/detections",
            json!({ "title": "X", "artist": "Y", "detected_at": "2024-03-10T12:00:00Z" }),
        )
        .await;
    }
    let report = create(
        app.clone(),
        "/api/v1/society-reports",
        json!({
            "society": "ECAD",
            "period_start": "2024-03-01T00:00:00Z",
            "period_end": "2024-03-31T23:59:59Z",
            "entries": [{ "title": "x", "artist": " y ", "play_count": 5 }],
        }),
    )
    .await;
    let report_id = report["id"].as_i64().unwrap();

    let response = post_json(
        app.clone(),
        &format!("/api/v1/society-reports/{report_id}/reconcile"),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["report"]["matched_records"], 1);
    let divergence = &json["data"]["divergences"][0];
    assert_eq!(divergence["divergence_type"], "count_mismatch");
    assert_eq!(divergence["detected_count"], 3);
    assert_eq!(divergence["society_count"], 5);

    let status_uri = format!("/api/v1/divergences/{}/status", divergence["id"]);
    let response = put_json(
        app.clone(),
        &status_uri,
        json!({ "status": "resolved", "resolution_note": "society corrected" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["data"]["resolved_at"].is_string());

    // Resolved is terminal.
    let response = put_json(app.clone(), &status_uri, json!({ "status": "open" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // A second run keeps the resolved row and does not reopen it.
    let response = post_json(
        app.clone(),
        &format!("/api/v1/society-reports/{report_id}/reconcile"),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let rerun = body_json(response).await;
    assert_eq!(rerun["data"]["divergences"].as_array().unwrap().len(), 0);

    let divergences_uri = format!("/api/v1/society-reports/{report_id}/divergences");
    let json = body_json(get(app, &divergences_uri).await).await;
    let statuses: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, vec!["resolved"]);
}
