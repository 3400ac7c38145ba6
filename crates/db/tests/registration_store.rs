//! Repository behaviour against a real Postgres.
//!
//! Run with `DATABASE_URL` pointing at a scratch server and `--ignored`.

use chrono::{TimeZone, Utc};
use rightsdesk_core::reconciliation::{
    Divergence, DivergenceStatus, DivergenceType, ReconciliationSummary,
};
use rightsdesk_core::shares::{Participant, ParticipantRole};
use rightsdesk_db::models::detection::CreateDetection;
use rightsdesk_db::models::phonogram::{CreatePhonogram, UpdatePhonogram};
use rightsdesk_db::models::project::CreateProject;
use rightsdesk_db::models::release::CreateRelease;
use rightsdesk_db::models::society_report::{CreateReportEntry, CreateSocietyReport};
use rightsdesk_db::models::work::{CreateWork, WorkAuthorInput};
use rightsdesk_db::repositories::{
    DetectionRepo, DivergenceRepo, PhonogramRepo, ProjectRepo, ReleaseRepo, SocietyReportRepo,
    WorkAuthorRepo, WorkRepo,
};
use rust_decimal::Decimal;
use sqlx::PgPool;

fn new_work(title: &str, project_id: Option<i64>) -> CreateWork {
    CreateWork {
        project_id,
        title: title.to_string(),
        iswc: None,
        status: None,
    }
}

fn new_phonogram(work_id: i64, isrc: Option<&str>) -> CreatePhonogram {
    CreatePhonogram {
        work_id,
        title: "Master".to_string(),
        isrc: isrc.map(str::to_string),
        status: None,
    }
}

// -- projects and releases ---------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a live Postgres via DATABASE_URL"]
async fn project_defaults_and_releases(pool: PgPool) {
    let project = ProjectRepo::create(
        &pool,
        &CreateProject {
            name: "Album".to_string(),
            artist_name: Some("Band".to_string()),
            status: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(project.status, "draft");

    let release = ReleaseRepo::create(
        &pool,
        project.id,
        &CreateRelease {
            title: "Single".to_string(),
            status: None,
            release_date: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(release.status, "planned");

    assert!(ProjectRepo::delete(&pool, project.id).await.unwrap());
    assert!(ReleaseRepo::find_by_id(&pool, release.id).await.unwrap().is_none());
}

// -- works and phonograms ----------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a live Postgres via DATABASE_URL"]
async fn cascading_work_delete_removes_phonograms(pool: PgPool) {
    let work = WorkRepo::create(&pool, &new_work("Song", None)).await.unwrap();
    PhonogramRepo::create(&pool, &new_phonogram(work.id, Some("BR-ABC-23-00001")))
        .await
        .unwrap();
    PhonogramRepo::create(&pool, &new_phonogram(work.id, None))
        .await
        .unwrap();

    assert_eq!(WorkRepo::delete_cascading(&pool, work.id).await.unwrap(), Some(2));
    assert!(PhonogramRepo::list_by_work(&pool, work.id).await.unwrap().is_empty());
    assert_eq!(WorkRepo::delete_cascading(&pool, work.id).await.unwrap(), None);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a live Postgres via DATABASE_URL"]
async fn plain_work_delete_is_blocked_by_phonograms(pool: PgPool) {
    let work = WorkRepo::create(&pool, &new_work("Song", None)).await.unwrap();
    PhonogramRepo::create(&pool, &new_phonogram(work.id, None))
        .await
        .unwrap();

    let err = sqlx::query("DELETE FROM works WHERE id = $1")
        .bind(work.id)
        .execute(&pool)
        .await
        .unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.code().as_deref(), Some("23503"));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a live Postgres via DATABASE_URL"]
async fn duplicate_isrc_violates_unique_constraint(pool: PgPool) {
    let work = WorkRepo::create(&pool, &new_work("Song", None)).await.unwrap();
    PhonogramRepo::create(&pool, &new_phonogram(work.id, Some("BR-ABC-23-00001")))
        .await
        .unwrap();

    let err = PhonogramRepo::create(&pool, &new_phonogram(work.id, Some("BR-ABC-23-00001")))
        .await
        .unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.constraint(), Some("uq_phonograms_isrc"));

    // NULL identifiers never collide.
    PhonogramRepo::create(&pool, &new_phonogram(work.id, None)).await.unwrap();
    PhonogramRepo::create(&pool, &new_phonogram(work.id, None)).await.unwrap();
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a live Postgres via DATABASE_URL"]
async fn update_can_clear_isrc(pool: PgPool) {
    let work = WorkRepo::create(&pool, &new_work("Song", None)).await.unwrap();
    let phonogram = PhonogramRepo::create(&pool, &new_phonogram(work.id, Some("BR-ABC-23-00001")))
        .await
        .unwrap();

    let untouched = PhonogramRepo::update(&pool, phonogram.id, &UpdatePhonogram::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(untouched.isrc.as_deref(), Some("BR-ABC-23-00001"));

    let cleared = PhonogramRepo::update(
        &pool,
        phonogram.id,
        &UpdatePhonogram {
            clear_isrc: true,
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(cleared.isrc, None);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a live Postgres via DATABASE_URL"]
async fn list_by_work_ids_filters_to_given_works(pool: PgPool) {
    let a = WorkRepo::create(&pool, &new_work("A", None)).await.unwrap();
    let b = WorkRepo::create(&pool, &new_work("B", None)).await.unwrap();
    PhonogramRepo::create(&pool, &new_phonogram(a.id, None)).await.unwrap();
    PhonogramRepo::create(&pool, &new_phonogram(b.id, None)).await.unwrap();

    let found = PhonogramRepo::list_by_work_ids(&pool, &[a.id]).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].work_id, a.id);
    assert!(PhonogramRepo::list_by_work_ids(&pool, &[]).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a live Postgres via DATABASE_URL"]
async fn participants_and_authors_are_replaced_in_order(pool: PgPool) {
    let work = WorkRepo::create(&pool, &new_work("Song", None)).await.unwrap();
    let phonogram = PhonogramRepo::create(&pool, &new_phonogram(work.id, None))
        .await
        .unwrap();

    let first = vec![Participant::new("Old", ParticipantRole::Musician, Decimal::new(10, 0))];
    PhonogramRepo::replace_participants(&pool, phonogram.id, &first).await.unwrap();

    let second = vec![
        Participant::new("Label", ParticipantRole::PhonographicProducer, Decimal::new(4170, 2)),
        Participant::new("Singer", ParticipantRole::Performer, Decimal::new(205, 1)),
    ];
    PhonogramRepo::replace_participants(&pool, phonogram.id, &second).await.unwrap();

    let stored: Vec<Participant> = PhonogramRepo::list_participants(&pool, phonogram.id)
        .await
        .unwrap()
        .iter()
        .map(|row| row.to_participant().unwrap())
        .collect();
    assert_eq!(stored, second);

    let authors = WorkAuthorRepo::replace_for_work(
        &pool,
        work.id,
        &[WorkAuthorInput {
            name: "Composer".to_string(),
            role: "composer".to_string(),
            percentage: Decimal::ONE_HUNDRED,
        }],
    )
    .await
    .unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(WorkAuthorRepo::list_by_work(&pool, work.id).await.unwrap().len(), 1);
}

// -- reconciliation ----------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a live Postgres via DATABASE_URL"]
async fn report_entries_detections_and_divergences(pool: PgPool) {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2024, 3, 31, 23, 59, 59).unwrap();

    let inside = DetectionRepo::create(
        &pool,
        &CreateDetection {
            title: "X".to_string(),
            artist: "Y".to_string(),
            station: "FM 1".to_string(),
            detected_at: Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap(),
            confidence: None,
            status: None,
            play_count: None,
            value: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(inside.play_count, 1);
    assert_eq!(inside.status, "detected");

    DetectionRepo::create(
        &pool,
        &CreateDetection {
            title: "X".to_string(),
            artist: "Y".to_string(),
            station: String::new(),
            detected_at: Utc.with_ymd_and_hms(2024, 4, 2, 12, 0, 0).unwrap(),
            confidence: Some(0.9),
            status: None,
            play_count: Some(2),
            value: None,
        },
    )
    .await
    .unwrap();

    let in_period = DetectionRepo::list_in_period(&pool, start, end).await.unwrap();
    assert_eq!(in_period.len(), 1);
    assert_eq!(in_period[0].id, inside.id);

    let report = SocietyReportRepo::create(
        &pool,
        &CreateSocietyReport {
            society: "ECAD".to_string(),
            period_start: start,
            period_end: end,
            entries: vec![CreateReportEntry {
                title: "x".to_string(),
                artist: "y".to_string(),
                play_count: 5,
                value: Some(Decimal::new(1250, 2)),
                window_start: None,
                window_end: None,
            }],
        },
    )
    .await
    .unwrap();
    assert_eq!(report.total_records, 1);
    assert!(report.reconciled_at.is_none());
    assert_eq!(SocietyReportRepo::list_entries(&pool, report.id).await.unwrap().len(), 1);

    let divergence = Divergence {
        divergence_type: DivergenceType::CountMismatch,
        title: "x".to_string(),
        artist: "y".to_string(),
        detected_count: 1,
        society_count: 5,
        detected_value: None,
        society_value: Some(Decimal::new(1250, 2)),
        status: DivergenceStatus::Open,
    };
    let stored = DivergenceRepo::replace_open_for_report(&pool, report.id, &[divergence.clone()])
        .await
        .unwrap();
    assert_eq!(stored[0].divergence_type, "count_mismatch");

    let resolved = DivergenceRepo::update_status(
        &pool,
        stored[0].id,
        DivergenceStatus::Resolved,
        Some("confirmed with society"),
    )
    .await
    .unwrap()
    .unwrap();
    assert!(resolved.resolved_at.is_some());
    assert_eq!(resolved.resolution_note.as_deref(), Some("confirmed with society"));

    // Re-running with the same finding (differently cased) keeps the resolved
    // row instead of reopening it; a new finding is still inserted.
    let mut rerun = divergence.clone();
    rerun.title = " X ".to_string();
    let missing = Divergence {
        divergence_type: DivergenceType::NotDetected,
        title: "other".to_string(),
        detected_count: 0,
        ..divergence
    };
    let inserted = DivergenceRepo::replace_open_for_report(&pool, report.id, &[rerun, missing])
        .await
        .unwrap();
    assert_eq!(inserted.len(), 1);
    assert_eq!(inserted[0].divergence_type, "not_detected");

    let all = DivergenceRepo::list_by_report(&pool, report.id).await.unwrap();
    assert_eq!(all.len(), 2);
    let count_rows: Vec<_> = all
        .iter()
        .filter(|d| d.divergence_type == "count_mismatch")
        .collect();
    assert_eq!(count_rows.len(), 1);
    assert_eq!(count_rows[0].status, "resolved");

    let summary = ReconciliationSummary {
        total_records: 1,
        matched_records: 1,
        divergent_records: 1,
        skipped_detections: 0,
        match_rate: 1.0,
    };
    let report = SocietyReportRepo::record_summary(&pool, report.id, &summary)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(report.divergent_records, 1);
    assert!(report.reconciled_at.is_some());
}
