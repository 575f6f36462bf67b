use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait};
use sea_orm::{ConnectionTrait, DatabaseConnection};
use serde::Deserialize;
use uuid::Uuid;

use crate::entities::project::{self, Entity as Project, ProjectStatus};
use crate::entities::user;
use crate::entities::workspace::{self, SubscriptionTier};
use crate::entities::workspace_member::{self, MemberRole};
use crate::error::AppError;
use crate::services::membership;

pub const FREE_TIER_MONTHLY_EDITS: i32 = 10;
pub const DEFAULT_PROJECT_NAME: &str = "My First Project";
pub const DEFAULT_PROJECT_DESCRIPTION: &str = "Default project for organizing your photo edits";

/// Optional business details collected at signup. All fields feed the
/// workspace billing columns and the user's display name.
#[derive(Deserialize, Clone, Debug, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BusinessProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company_name: Option<String>,
    pub organization_number: Option<String>,
}

pub struct ProvisionedWorkspace {
    pub workspace: workspace::Model,
    pub member: workspace_member::Model,
    pub default_project: Option<project::Model>,
    pub created: bool,
}

/// Derives the workspace name from the signup payload: company name first,
/// then a possessive of the user's name, then a generic fallback.
pub fn workspace_name_for(user_name: Option<&str>, business: Option<&BusinessProfile>) -> String {
    if let Some(company) = business
        .and_then(|b| b.company_name.as_deref())
        .filter(|c| !c.trim().is_empty())
    {
        return company.trim().to_string();
    }

    match user_name.filter(|n| !n.trim().is_empty()) {
        Some(name) => format!("{}'s Workspace", name.trim()),
        None => "My Workspace".to_string(),
    }
}

/// URL-safe slug: lowercased name with non-alphanumeric runs collapsed to a
/// single dash, suffixed with the last six hex chars of the owner's id so two
/// users with the same company name never collide.
pub fn generate_slug(name: &str, user_id: Uuid) -> String {
    let mut base = String::with_capacity(name.len());
    let mut last_dash = false;
    for ch in name.to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            base.push(ch);
            last_dash = false;
        } else if !last_dash {
            base.push('-');
            last_dash = true;
        }
    }
    let base = base.trim_matches('-');

    let hex = user_id.simple().to_string();
    let suffix = &hex[hex.len() - 6..];

    if base.is_empty() {
        format!("workspace-{}", suffix)
    } else {
        format!("{}-{}", base, suffix)
    }
}

/// Creates the user's workspace, OWNER membership, and default project in one
/// transaction. Safe to call again for the same user: an existing membership
/// short-circuits without touching the database.
pub async fn provision_workspace(
    db: &DatabaseConnection,
    user: &user::Model,
    business: Option<&BusinessProfile>,
) -> Result<ProvisionedWorkspace, AppError> {
    if let Some((workspace, member)) = membership::workspace_for_user(db, user.id).await? {
        return Ok(ProvisionedWorkspace {
            workspace,
            member,
            default_project: None,
            created: false,
        });
    }

    let name = workspace_name_for(user.name.as_deref(), business);
    let slug = generate_slug(&name, user.id);
    let now = chrono::Utc::now().naive_utc();

    let txn = db.begin().await?;

    let workspace = workspace::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.clone()),
        slug: Set(slug),
        owner_id: Set(user.id),
        billing_email: Set(Some(user.email.clone())),
        company_name: Set(Some(
            business
                .and_then(|b| b.company_name.clone())
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| name.clone()),
        )),
        vat_number: Set(business.and_then(|b| b.organization_number.clone())),
        subscription_tier: Set(SubscriptionTier::Free),
        monthly_edit_limit: Set(FREE_TIER_MONTHLY_EDITS),
        current_month_edits: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await?;

    let member = workspace_member::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.id),
        workspace_id: Set(workspace.id),
        role: Set(MemberRole::Owner),
        created_at: Set(now),
    }
    .insert(&txn)
    .await?;

    let default_project = project::ActiveModel {
        id: Set(Uuid::new_v4()),
        workspace_id: Set(workspace.id),
        created_by: Set(user.id),
        name: Set(DEFAULT_PROJECT_NAME.to_string()),
        description: Set(Some(DEFAULT_PROJECT_DESCRIPTION.to_string())),
        status: Set(ProjectStatus::Active),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await?;

    if let Some(display_name) = business.and_then(full_name) {
        let mut active: user::ActiveModel = user.clone().into();
        active.name = Set(Some(display_name));
        active.updated_at = Set(now);
        active.update(&txn).await?;
    }

    txn.commit().await?;

    println!(
        "Provisioning | workspace '{}' created for {}",
        workspace.name, user.email
    );

    Ok(ProvisionedWorkspace {
        workspace,
        member,
        default_project: Some(default_project),
        created: true,
    })
}

fn full_name(business: &BusinessProfile) -> Option<String> {
    let first = business.first_name.as_deref().unwrap_or("").trim();
    let last = business.last_name.as_deref().unwrap_or("").trim();
    if first.is_empty() && last.is_empty() {
        return None;
    }
    Some(format!("{} {}", first, last).trim().to_string())
}

/// Returns the workspace's oldest project, creating the default one if the
/// workspace somehow has none. Keeps GET /workspace usable even after every
/// project was archived away by hand.
pub async fn ensure_default_project<C: ConnectionTrait>(
    db: &C,
    workspace: &workspace::Model,
    user_id: Uuid,
) -> Result<project::Model, AppError> {
    let existing = Project::find()
        .filter(project::Column::WorkspaceId.eq(workspace.id))
        .order_by_asc(project::Column::CreatedAt)
        .one(db)
        .await?;

    if let Some(found) = existing {
        return Ok(found);
    }

    let now = chrono::Utc::now().naive_utc();
    let created = project::ActiveModel {
        id: Set(Uuid::new_v4()),
        workspace_id: Set(workspace.id),
        created_by: Set(user_id),
        name: Set(DEFAULT_PROJECT_NAME.to_string()),
        description: Set(Some(DEFAULT_PROJECT_DESCRIPTION.to_string())),
        status: Set(ProjectStatus::Active),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn business(company: Option<&str>, org: Option<&str>) -> BusinessProfile {
        BusinessProfile {
            first_name: None,
            last_name: None,
            company_name: company.map(|s| s.to_string()),
            organization_number: org.map(|s| s.to_string()),
        }
    }

    #[test]
    fn company_name_wins_over_user_name() {
        let b = business(Some("Nordvik Eiendom"), None);
        assert_eq!(
            workspace_name_for(Some("Kari"), Some(&b)),
            "Nordvik Eiendom"
        );
    }

    #[test]
    fn falls_back_to_possessive_then_generic() {
        assert_eq!(workspace_name_for(Some("Kari"), None), "Kari's Workspace");
        assert_eq!(workspace_name_for(None, None), "My Workspace");
        let empty = business(Some("   "), None);
        assert_eq!(workspace_name_for(None, Some(&empty)), "My Workspace");
    }

    #[test]
    fn slug_is_lowercase_dashed_with_suffix() {
        let id = Uuid::parse_str("0191b2c3-d4e5-7f80-9102-3456789abcde").unwrap();
        let slug = generate_slug("Nordvik & Partners AS", id);
        assert_eq!(slug, "nordvik-partners-as-9abcde");
    }

    #[test]
    fn slug_trims_edge_dashes() {
        let id = Uuid::parse_str("0191b2c3-d4e5-7f80-9102-3456789abcde").unwrap();
        assert_eq!(generate_slug("  Åpen Hus!  ", id), "pen-hus-9abcde");
        assert_eq!(generate_slug("!!!", id), "workspace-9abcde");
    }

    #[test]
    fn same_name_different_users_get_distinct_slugs() {
        let a = Uuid::parse_str("00000000-0000-0000-0000-000000111111").unwrap();
        let b = Uuid::parse_str("00000000-0000-0000-0000-000000222222").unwrap();
        let slug_a = generate_slug("Acme", a);
        let slug_b = generate_slug("Acme", b);
        assert_ne!(slug_a, slug_b);
        assert!(slug_a.starts_with("acme-"));
        assert!(slug_b.starts_with("acme-"));
    }

    #[test]
    fn full_name_joins_and_trims() {
        let b = BusinessProfile {
            first_name: Some("Ola ".to_string()),
            last_name: Some(" Nordmann".to_string()),
            company_name: None,
            organization_number: None,
        };
        assert_eq!(full_name(&b), Some("Ola Nordmann".to_string()));

        let only_first = BusinessProfile {
            first_name: Some("Ola".to_string()),
            last_name: None,
            company_name: None,
            organization_number: None,
        };
        assert_eq!(full_name(&only_first), Some("Ola".to_string()));

        let neither = business(None, None);
        assert_eq!(full_name(&neither), None);
    }
}
