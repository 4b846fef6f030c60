//! End-to-end report exports through the public router
//!
//! Drives the HTTP API against a seeded SQLite database and checks the exact
//! bytes each export produces.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use axum::http::StatusCode;
use common::*;
use org_reports::api::{AppState, create_router};
use org_reports::{ArchiveBuilder, ArchiveEntry, ArchiveError, Config, Error, ReportFormat};
use std::sync::Arc;

const MEMBERS_CSV: &str = "\
ID,Name,Email,Phone,Alt. phone,Balance
1,Núria,member1@example.org,600 000 001,,0:30
2,Joan,member2@example.org,600 000 002,93 000 0000,1:15
";

const OFFERS_CSV: &str = "\
Title,Member,Tags,Description
GARDENING,,,
Watering plants,Núria (1),neighbourhood,\"Balconies, terraces\"
Pruning,Joan (2),neighbourhood,Fruit trees
COOKING,,,
Paella lessons,Joan (2),neighbourhood,
";

const INQUIRIES_CSV: &str = "\
Title,Member,Tags,Description
COOKING,,,
Sourdough starter,Núria (1),neighbourhood,
";

const TRANSFERS_CSV: &str = "\
Date,From,To,Reason,Amount
2024-01-01,Banc de Temps,Núria (1),Exchange,2:00
2024-01-02,Núria (1),Joan (2),Exchange,1:30
2024-01-03,Joan (2),Pere (3),Exchange,0:15
";

fn router(bank: &TimeBank) -> axum::Router {
    create_router(AppState::new(bank.db.clone(), Arc::new(Config::default())))
}

#[tokio::test]
async fn member_export_matches_expected_csv() {
    let bank = seed_time_bank().await;

    let response = get(
        router(&bank),
        "/reports/user_list?format=csv",
        Some(&bank.token),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_value(&response, "content-type"), "text/csv");
    assert!(
        header_value(&response, "content-disposition")
            .starts_with("attachment; filename=\"banc-de-temps_members_")
    );
    assert_eq!(
        String::from_utf8(body_bytes(response).await).unwrap(),
        MEMBERS_CSV
    );
}

#[tokio::test]
async fn post_exports_group_by_category() {
    let bank = seed_time_bank().await;

    let offers = get(router(&bank), "/reports/post_list?type=offer", Some(&bank.token)).await;
    assert_eq!(
        String::from_utf8(body_bytes(offers).await).unwrap(),
        OFFERS_CSV
    );

    let inquiries = get(
        router(&bank),
        "/reports/post_list?type=inquiry",
        Some(&bank.token),
    )
    .await;
    assert_eq!(
        String::from_utf8(body_bytes(inquiries).await).unwrap(),
        INQUIRIES_CSV
    );
}

#[tokio::test]
async fn transfer_export_lists_every_transfer() {
    let bank = seed_time_bank().await;

    let response = get(router(&bank), "/reports/transfer_list", Some(&bank.token)).await;

    assert_eq!(
        String::from_utf8(body_bytes(response).await).unwrap(),
        TRANSFERS_CSV
    );
}

#[tokio::test]
async fn pdf_exports_are_deterministic() {
    let bank = seed_time_bank().await;

    let first = body_bytes(
        get(
            router(&bank),
            "/reports/post_list?type=offer&format=pdf",
            Some(&bank.token),
        )
        .await,
    )
    .await;
    let second = body_bytes(
        get(
            router(&bank),
            "/reports/post_list?type=offer&format=pdf",
            Some(&bank.token),
        )
        .await,
    )
    .await;

    assert!(first.starts_with(b"%PDF-1.4"));
    assert_eq!(first, second);
    let text = String::from_utf8_lossy(&first);
    assert!(text.contains("(Banc de Temps - Offers) Tj"));
    assert!(text.contains("(GARDENING) Tj"));
}

#[tokio::test]
async fn archive_bundles_the_four_csv_exports() {
    let bank = seed_time_bank().await;

    let response = get(router(&bank), "/reports/all_list", Some(&bank.token)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_value(&response, "content-type"), "application/zip");
    assert!(
        header_value(&response, "content-disposition")
            .starts_with("attachment; filename=\"banc-de-temps_")
    );

    let entries = zip_entries(body_bytes(response).await);
    assert_eq!(
        entries,
        vec![
            ("Inquiries.csv".to_string(), INQUIRIES_CSV.to_string()),
            ("Offers.csv".to_string(), OFFERS_CSV.to_string()),
            ("Member.csv".to_string(), MEMBERS_CSV.to_string()),
            ("Transfer.csv".to_string(), TRANSFERS_CSV.to_string()),
        ]
    );
}

struct BrokenArchiver;

impl ArchiveBuilder for BrokenArchiver {
    fn build(&self, entries: &[ArchiveEntry]) -> org_reports::Result<Vec<u8>> {
        Err(Error::Archive(ArchiveError::EntryFailed {
            entry: entries
                .first()
                .map(|e| e.name.clone())
                .unwrap_or_default(),
            reason: "write refused".to_string(),
        }))
    }
}

#[tokio::test]
async fn archive_failure_redirects_to_listing() {
    let bank = seed_time_bank().await;
    let state = AppState::new(bank.db.clone(), Arc::new(Config::default()))
        .with_archiver(Arc::new(BrokenArchiver));

    let response = get(create_router(state), "/reports/all_list", Some(&bank.token)).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(header_value(&response, "location"), "/reports");
}

#[tokio::test]
async fn configured_default_format_applies_to_every_export() {
    let bank = seed_time_bank().await;
    let mut config = Config::default();
    config.reports.default_format = ReportFormat::Pdf;
    let app = create_router(AppState::new(bank.db.clone(), Arc::new(config)));

    for uri in [
        "/reports/user_list",
        "/reports/post_list",
        "/reports/transfer_list",
    ] {
        let response = get(app.clone(), uri, Some(&bank.token)).await;
        assert_eq!(
            header_value(&response, "content-type"),
            "application/pdf",
            "{uri}"
        );
    }

    // An explicit format still wins
    let response = get(app, "/reports/user_list?format=csv", Some(&bank.token)).await;
    assert_eq!(header_value(&response, "content-type"), "text/csv");
}

#[tokio::test]
async fn requests_without_a_valid_key_are_rejected() {
    let bank = seed_time_bank().await;

    let missing = get(router(&bank), "/reports/user_list", None).await;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let wrong = get(router(&bank), "/reports/user_list", Some("nope")).await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = serde_json::from_slice(&body_bytes(wrong).await).unwrap();
    assert_eq!(body["error"]["code"], "unauthorized");
    assert_eq!(body["error"]["message"], "Invalid API key");
}

#[tokio::test]
async fn config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{ "reports": { "default_format": "pdf" }, "api": { "swagger_ui": false } }"#,
    )
    .unwrap();

    let config = Config::from_json_file(&path).unwrap();

    assert_eq!(config.reports.default_format, ReportFormat::Pdf);
    assert!(!config.server.api.swagger_ui);
    assert!(config.server.api.cors_enabled);
}
