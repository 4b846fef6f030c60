//! Shared test fixture: two organizations with active, inactive and foreign members.

use crate::db::{Database, NewMember, NewPost, NewTransfer, NewUser};
use crate::types::{CategoryId, MemberId, Organization, OrganizationId, PostId, PostKind};
use std::sync::Arc;
use tempfile::tempdir;

/// Seeded database plus the IDs tests assert against
#[allow(dead_code)]
pub(crate) struct Fixture {
    pub db: Arc<Database>,
    pub organization: Organization,
    pub other_organization: Organization,
    pub member1: MemberId,
    pub member2: MemberId,
    pub inactive_member: MemberId,
    pub another_member: MemberId,
    pub category: CategoryId,
    /// Offers by member1 and member2, the only offers a report may show
    pub active_offers: Vec<PostId>,
    /// API token issued for member1
    pub token: String,
    _temp_dir: tempfile::TempDir,
}

async fn add_member(
    db: &Database,
    organization_id: OrganizationId,
    member_uid: i64,
    username: &str,
    active: bool,
) -> MemberId {
    let user_id = db
        .insert_user(&NewUser {
            username: username.to_string(),
            email: format!("{}@example.com", username.to_lowercase()),
            phone: Some(format!("555-010{member_uid}")),
            alt_phone: None,
        })
        .await
        .unwrap();

    db.insert_member(&NewMember {
        organization_id,
        user_id,
        member_uid,
        active,
    })
    .await
    .unwrap()
}

async fn add_post(
    db: &Database,
    organization_id: OrganizationId,
    member_id: MemberId,
    category_id: CategoryId,
    kind: PostKind,
    title: &str,
) -> PostId {
    db.insert_post(&NewPost {
        organization_id,
        member_id,
        category_id,
        kind,
        title: title.to_string(),
        description: Some(format!("{title}, weekends only")),
        tags: vec!["outdoors".to_string(), "weekly".to_string()],
    })
    .await
    .unwrap()
}

/// Create a temporary database and seed the standard fixture
pub(crate) async fn seed_fixture() -> Fixture {
    let temp_dir = tempdir().unwrap();
    let db = Database::new(&temp_dir.path().join("test.db"))
        .await
        .unwrap();

    let org_id = db.insert_organization("Test Organization").await.unwrap();
    let other_org_id = db.insert_organization("Another Organization").await.unwrap();

    let member1 = add_member(&db, org_id, 1, "Alice", true).await;
    let member2 = add_member(&db, org_id, 2, "Bob", true).await;
    let inactive_member = add_member(&db, org_id, 3, "Carol", false).await;
    let another_member = add_member(&db, other_org_id, 1, "Dave", true).await;

    let category = db.insert_category("Gardening").await.unwrap();
    let cooking = db.insert_category("Cooking").await.unwrap();

    let mut active_offers = Vec::new();
    for (member, title) in [(member1, "Lawn mowing"), (member2, "Hedge trimming")] {
        active_offers.push(add_post(&db, org_id, member, category, PostKind::Offer, title).await);
    }
    add_post(
        &db,
        other_org_id,
        another_member,
        category,
        PostKind::Offer,
        "Tree planting",
    )
    .await;
    add_post(
        &db,
        org_id,
        inactive_member,
        category,
        PostKind::Offer,
        "Weeding",
    )
    .await;
    add_post(&db, org_id, member1, cooking, PostKind::Inquiry, "Bread baking").await;

    for transfer in [
        NewTransfer {
            organization_id: org_id,
            source_member_id: None,
            destination_member_id: Some(member1),
            amount_secs: 3600,
            reason: Some("Welcome hours".to_string()),
            created_at: 1_700_000_000,
        },
        NewTransfer {
            organization_id: org_id,
            source_member_id: Some(member1),
            destination_member_id: Some(member2),
            amount_secs: 1800,
            reason: Some("Lawn mowing".to_string()),
            created_at: 1_700_086_400,
        },
        NewTransfer {
            organization_id: other_org_id,
            source_member_id: None,
            destination_member_id: Some(another_member),
            amount_secs: 600,
            reason: None,
            created_at: 1_700_000_000,
        },
    ] {
        db.insert_transfer(&transfer).await.unwrap();
    }

    let token = db.issue_api_token(member1).await.unwrap();
    let organization = db.get_organization(org_id).await.unwrap().unwrap();
    let other_organization = db.get_organization(other_org_id).await.unwrap().unwrap();

    Fixture {
        db: Arc::new(db),
        organization,
        other_organization,
        member1,
        member2,
        inactive_member,
        another_member,
        category,
        active_offers,
        token,
        _temp_dir: temp_dir,
    }
}
