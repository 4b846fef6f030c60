//! Seeded databases for integration tests

use org_reports::db::{NewMember, NewPost, NewTransfer, NewUser};
use org_reports::{Database, Organization, PostKind};
use std::sync::Arc;
use tempfile::TempDir;

/// A seeded time bank with one token-holding member
pub struct TimeBank {
    pub db: Arc<Database>,
    pub organization: Organization,
    pub token: String,
    _temp_dir: TempDir,
}

/// Seed a small time bank
///
/// Members: Núria (1, active, holds the token), Joan (2, active), Pere (3, inactive).
/// Posts: two gardening offers and one cooking offer, one inquiry, and an offer
/// by the inactive member.
pub async fn seed_time_bank() -> TimeBank {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::new(&temp_dir.path().join("reports.db"))
        .await
        .unwrap();

    let org = db.insert_organization("Banc de Temps").await.unwrap();

    let mut members = Vec::new();
    for (uid, name, active) in [(1, "Núria", true), (2, "Joan", true), (3, "Pere", false)] {
        let user = db
            .insert_user(&NewUser {
                username: name.to_string(),
                email: format!("member{uid}@example.org"),
                phone: Some(format!("600 000 00{uid}")),
                alt_phone: (uid == 2).then(|| "93 000 0000".to_string()),
            })
            .await
            .unwrap();
        members.push(
            db.insert_member(&NewMember {
                organization_id: org,
                user_id: user,
                member_uid: uid,
                active,
            })
            .await
            .unwrap(),
        );
    }

    let gardening = db.insert_category("Gardening").await.unwrap();
    let cooking = db.insert_category("Cooking").await.unwrap();

    for (member, category, kind, title, description) in [
        (members[0], gardening, PostKind::Offer, "Watering plants", Some("Balconies, terraces")),
        (members[1], cooking, PostKind::Offer, "Paella lessons", None),
        (members[1], gardening, PostKind::Offer, "Pruning", Some("Fruit trees")),
        (members[0], cooking, PostKind::Inquiry, "Sourdough starter", None),
        (members[2], gardening, PostKind::Offer, "Composting", None),
    ] {
        db.insert_post(&NewPost {
            organization_id: org,
            member_id: member,
            category_id: category,
            kind,
            title: title.to_string(),
            description: description.map(str::to_string),
            tags: vec!["neighbourhood".to_string()],
        })
        .await
        .unwrap();
    }

    for (source, destination, amount_secs, created_at) in [
        (None, Some(members[0]), 7200, 1_704_067_200),
        (Some(members[0]), Some(members[1]), 5400, 1_704_153_600),
        (Some(members[1]), Some(members[2]), 900, 1_704_240_000),
    ] {
        db.insert_transfer(&NewTransfer {
            organization_id: org,
            source_member_id: source,
            destination_member_id: destination,
            amount_secs,
            reason: Some("Exchange".to_string()),
            created_at,
        })
        .await
        .unwrap();
    }

    let token = db.issue_api_token(members[0]).await.unwrap();
    let organization = db.get_organization(org).await.unwrap().unwrap();

    TimeBank {
        db: Arc::new(db),
        organization,
        token,
        _temp_dir: temp_dir,
    }
}
