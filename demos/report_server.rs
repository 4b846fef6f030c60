//! Report server demo
//!
//! Seeds a small time bank into a fresh database, issues an API key for one
//! of its members, then serves the report endpoints until Ctrl+C.
//!
//! Usage: `cargo run --example report_server [config.json]`
//!
//! After starting, you can:
//! - View Swagger UI at http://localhost:6790/swagger-ui
//! - List reports via GET http://localhost:6790/reports
//! - Download every export at once via GET http://localhost:6790/reports/all_list

use org_reports::db::{NewMember, NewPost, NewTransfer, NewUser};
use org_reports::{Config, Database, PostKind, run_with_shutdown};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = match std::env::args().nth(1) {
        Some(path) => Config::from_json_file(std::path::Path::new(&path))?,
        None => Config::default(),
    };

    // Always start from a throwaway database so the demo data is predictable
    let data_dir = tempfile::tempdir()?;
    config.persistence.database_path = data_dir.path().join("demo.db");

    let token = seed(&config).await?;
    let base = format!("http://{}", config.server.api.bind_address);

    println!("Starting org-reports server");
    println!("Swagger UI: {base}/swagger-ui");
    println!("API key:    {token}");
    println!();
    println!("Example commands:");
    println!("  curl -H 'X-Api-Key: {token}' {base}/reports");
    println!("  curl -OJ -H 'X-Api-Key: {token}' '{base}/reports/user_list?format=pdf'");
    println!("  curl -OJ -H 'X-Api-Key: {token}' '{base}/reports/post_list?type=inquiry'");
    println!("  curl -OJ -H 'X-Api-Key: {token}' {base}/reports/all_list");
    println!();
    println!("Press Ctrl+C to stop");

    run_with_shutdown(config).await?;
    Ok(())
}

/// Populate the demo organization and return an API key for its first member
async fn seed(config: &Config) -> Result<String, Box<dyn std::error::Error>> {
    let db = Database::new(config.database_path()).await?;
    let org = db.insert_organization("Riverside Time Bank").await?;

    let mut members = Vec::new();
    for (uid, name, phone) in [
        (1, "maria", Some("555-0101")),
        (2, "tomas", None),
        (3, "aisha", Some("555-0103")),
    ] {
        let user = db
            .insert_user(&NewUser {
                username: name.to_string(),
                email: format!("{name}@riverside.example"),
                phone: phone.map(str::to_string),
                alt_phone: None,
            })
            .await?;
        members.push(
            db.insert_member(&NewMember {
                organization_id: org,
                user_id: user,
                member_uid: uid,
                active: true,
            })
            .await?,
        );
    }

    let repairs = db.insert_category("Home repairs").await?;
    let lessons = db.insert_category("Lessons").await?;
    let posts = [
        (members[0], repairs, PostKind::Offer, "Fixing bicycles", vec!["tools"]),
        (members[1], lessons, PostKind::Offer, "Guitar for beginners", vec!["music", "evenings"]),
        (members[2], lessons, PostKind::Inquiry, "Conversational French", vec!["languages"]),
        (members[2], repairs, PostKind::Inquiry, "Hanging shelves", vec![]),
    ];
    for (member, category, kind, title, tags) in posts {
        db.insert_post(&NewPost {
            organization_id: org,
            member_id: member,
            category_id: category,
            kind,
            title: title.to_string(),
            description: None,
            tags: tags.into_iter().map(str::to_string).collect(),
        })
        .await?;
    }

    let now = chrono::Utc::now().timestamp();
    for (source, destination, amount_secs, reason) in [
        (None, Some(members[0]), 3 * 3600, "Welcome hours"),
        (Some(members[1]), Some(members[0]), 5400, "Bicycle tune-up"),
        (Some(members[2]), Some(members[1]), 3600, "Guitar lesson"),
    ] {
        db.insert_transfer(&NewTransfer {
            organization_id: org,
            source_member_id: source,
            destination_member_id: destination,
            amount_secs,
            reason: Some(reason.to_string()),
            created_at: now,
        })
        .await?;
    }

    let token = db.issue_api_token(members[0]).await?;
    db.close().await;
    Ok(token)
}
