use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::workspace::{self, Entity as Workspace};
use crate::error::AppError;

#[derive(Serialize, Clone, Copy, Debug, utoipa::ToSchema)]
pub struct QuotaInfo {
    pub used: i32,
    pub limit: i32,
    pub remaining: i32,
}

impl QuotaInfo {
    pub fn of(workspace: &workspace::Model) -> Self {
        Self {
            used: workspace.current_month_edits,
            limit: workspace.monthly_edit_limit,
            remaining: workspace.monthly_edit_limit - workspace.current_month_edits,
        }
    }

    pub fn has_remaining(&self) -> bool {
        self.remaining > 0
    }
}

/// Consumes one edit unit for the workspace. The increment is a single
/// conditional UPDATE guarded by the limit, so concurrent consumers can never
/// push `current_month_edits` past `monthly_edit_limit`. Returns false when
/// the limit was already reached.
pub async fn consume_one<C: ConnectionTrait>(db: &C, workspace_id: Uuid) -> Result<bool, AppError> {
    let result = Workspace::update_many()
        .col_expr(
            workspace::Column::CurrentMonthEdits,
            Expr::col(workspace::Column::CurrentMonthEdits).add(1),
        )
        .col_expr(
            workspace::Column::UpdatedAt,
            Expr::value(chrono::Utc::now().naive_utc()),
        )
        .filter(workspace::Column::Id.eq(workspace_id))
        .filter(
            Expr::col(workspace::Column::CurrentMonthEdits)
                .lt(Expr::col(workspace::Column::MonthlyEditLimit)),
        )
        .exec(db)
        .await?;

    Ok(result.rows_affected > 0)
}

/// Zeroes the monthly counter. Billing-period rollover is driven externally
/// (the reset_quotas binary), never from the request path.
pub async fn reset_month<C: ConnectionTrait>(
    db: &C,
    slug: Option<&str>,
) -> Result<u64, AppError> {
    let mut update = Workspace::update_many()
        .col_expr(workspace::Column::CurrentMonthEdits, Expr::value(0))
        .col_expr(
            workspace::Column::UpdatedAt,
            Expr::value(chrono::Utc::now().naive_utc()),
        );

    if let Some(slug) = slug {
        update = update.filter(workspace::Column::Slug.eq(slug));
    }

    let result = update.exec(db).await?;
    Ok(result.rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workspace_with(used: i32, limit: i32) -> workspace::Model {
        let now = chrono::Utc::now().naive_utc();
        workspace::Model {
            id: Uuid::new_v4(),
            name: "Test".to_string(),
            slug: "test-abc123".to_string(),
            owner_id: Uuid::new_v4(),
            billing_email: None,
            company_name: None,
            vat_number: None,
            subscription_tier: workspace::SubscriptionTier::Free,
            monthly_edit_limit: limit,
            current_month_edits: used,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn remaining_is_limit_minus_used() {
        let quota = QuotaInfo::of(&workspace_with(3, 10));
        assert_eq!(quota.used, 3);
        assert_eq!(quota.limit, 10);
        assert_eq!(quota.remaining, 7);
        assert!(quota.has_remaining());
    }

    #[test]
    fn exhausted_quota_has_nothing_remaining() {
        let quota = QuotaInfo::of(&workspace_with(10, 10));
        assert_eq!(quota.remaining, 0);
        assert!(!quota.has_remaining());
    }
}
