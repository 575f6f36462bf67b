mod common;

use common::TestApp;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set};
use serde_json::json;
use uuid::Uuid;

use estate_photo_kit::entities::project::Entity as Project;
use estate_photo_kit::entities::workspace::Entity as Workspace;
use estate_photo_kit::entities::{user, workspace_member};
use estate_photo_kit::services::provisioning::{self, BusinessProfile};
use estate_photo_kit::services::quota;

async fn insert_user(db: &DatabaseConnection, email: &str, name: Option<&str>) -> user::Model {
    let now = chrono::Utc::now().naive_utc();
    user::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set("not-a-real-hash".to_string()),
        name: Set(name.map(|n| n.to_string())),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("insert user")
}

fn company(name: &str) -> BusinessProfile {
    BusinessProfile {
        first_name: None,
        last_name: None,
        company_name: Some(name.to_string()),
        organization_number: None,
    }
}

#[tokio::test]
async fn provisioning_is_idempotent_per_user() {
    let app = TestApp::start().await;
    let user = insert_user(&app.db, "kari@example.com", Some("Kari")).await;

    let first = provisioning::provision_workspace(&app.db, &user, None)
        .await
        .expect("first provision");
    assert!(first.created);
    assert_eq!(first.workspace.name, "Kari's Workspace");
    assert_eq!(
        first.default_project.as_ref().expect("default project").name,
        "My First Project"
    );

    let second = provisioning::provision_workspace(&app.db, &user, None)
        .await
        .expect("second provision");
    assert!(!second.created);
    assert_eq!(second.workspace.id, first.workspace.id);
    assert!(second.default_project.is_none());

    let workspaces = Workspace::find().count(&app.db).await.expect("count");
    assert_eq!(workspaces, 1);
    let members = workspace_member::Entity::find()
        .count(&app.db)
        .await
        .expect("count");
    assert_eq!(members, 1);
    let projects = Project::find().count(&app.db).await.expect("count");
    assert_eq!(projects, 1);
}

#[tokio::test]
async fn same_company_name_gets_distinct_slugs() {
    let app = TestApp::start().await;
    let kari = insert_user(&app.db, "kari@acme.no", None).await;
    let ola = insert_user(&app.db, "ola@acme.no", None).await;

    let profile = company("Acme AS");
    let first = provisioning::provision_workspace(&app.db, &kari, Some(&profile))
        .await
        .expect("provision kari");
    let second = provisioning::provision_workspace(&app.db, &ola, Some(&profile))
        .await
        .expect("provision ola");

    assert_eq!(first.workspace.name, "Acme AS");
    assert_eq!(second.workspace.name, "Acme AS");
    assert!(first.workspace.slug.starts_with("acme-as-"));
    assert!(second.workspace.slug.starts_with("acme-as-"));
    assert_ne!(first.workspace.slug, second.workspace.slug);
}

#[tokio::test]
async fn workspace_view_recreates_missing_default_project() {
    let app = TestApp::start().await;
    let signup = app.signup("kari@example.com", "password123", None).await;
    let token = signup["access_token"].as_str().expect("token");

    Project::delete_many()
        .exec(&app.db)
        .await
        .expect("delete projects");

    let ws = app.get_json("/workspace", token).await;
    assert_eq!(ws["projectCount"], json!(1));
    assert!(ws["defaultProjectId"].is_string());

    let recreated = Project::find().one(&app.db).await.expect("query");
    assert_eq!(recreated.expect("project").name, "My First Project");

    // A second read reuses the recreated project instead of stacking more
    let ws = app.get_json("/workspace", token).await;
    assert_eq!(ws["projectCount"], json!(1));
}

#[tokio::test]
async fn concurrent_consumption_never_exceeds_the_limit() {
    let app = TestApp::start().await;
    let user = insert_user(&app.db, "kari@example.com", None).await;
    let provisioned = provisioning::provision_workspace(&app.db, &user, None)
        .await
        .expect("provision");
    let workspace_id = provisioned.workspace.id;
    assert_eq!(provisioned.workspace.monthly_edit_limit, 10);

    let mut handles = Vec::new();
    for _ in 0..25 {
        let db = app.db.clone();
        handles.push(tokio::spawn(async move {
            quota::consume_one(&db, workspace_id).await
        }));
    }

    let mut consumed = 0;
    for handle in handles {
        if handle.await.expect("join").expect("consume") {
            consumed += 1;
        }
    }
    assert_eq!(consumed, 10);

    let workspace = Workspace::find_by_id(workspace_id)
        .one(&app.db)
        .await
        .expect("query")
        .expect("workspace");
    assert_eq!(workspace.current_month_edits, 10);
}

#[tokio::test]
async fn reset_month_zeroes_counters() {
    let app = TestApp::start().await;
    let kari = insert_user(&app.db, "kari@example.com", None).await;
    let ola = insert_user(&app.db, "ola@example.com", None).await;
    let first = provisioning::provision_workspace(&app.db, &kari, Some(&company("Acme AS")))
        .await
        .expect("provision");
    let second = provisioning::provision_workspace(&app.db, &ola, None)
        .await
        .expect("provision");

    for _ in 0..3 {
        quota::consume_one(&app.db, first.workspace.id)
            .await
            .expect("consume");
    }
    quota::consume_one(&app.db, second.workspace.id)
        .await
        .expect("consume");

    // Scoped reset touches only the named workspace
    let reset = quota::reset_month(&app.db, Some(&first.workspace.slug))
        .await
        .expect("reset");
    assert_eq!(reset, 1);
    let untouched = Workspace::find_by_id(second.workspace.id)
        .one(&app.db)
        .await
        .expect("query")
        .expect("workspace");
    assert_eq!(untouched.current_month_edits, 1);

    let reset_all = quota::reset_month(&app.db, None).await.expect("reset all");
    assert_eq!(reset_all, 2);
    let counts: Vec<i32> = Workspace::find()
        .all(&app.db)
        .await
        .expect("query")
        .into_iter()
        .map(|w| w.current_month_edits)
        .collect();
    assert!(counts.iter().all(|c| *c == 0));
}
