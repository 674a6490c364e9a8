//! Category CRUD actions. Admin only.

use portal::{guard, CategoryDraft, CategoryId};

use crate::outcome::{fold, ActionOutcome, Deps, ADMIN_CATEGORIES, DASHBOARD};

/// Creates a category from a form draft.
#[tracing::instrument(skip_all)]
pub async fn create_category(
    deps: &Deps,
    token: &str,
    draft: CategoryDraft,
) -> ActionOutcome<CategoryId> {
    fold(async {
        guard::require_admin(deps.verifier.as_ref(), token).await?;
        let input = draft.parse()?;
        let id = deps.categories.create(input).await?;
        tracing::info!(category = %id, "category created");
        Ok((id, deps.invalidate(&[ADMIN_CATEGORIES, DASHBOARD])))
    }
    .await)
}

/// Replaces a category's payload.
#[tracing::instrument(skip_all, fields(category = %category_id))]
pub async fn update_category(
    deps: &Deps,
    token: &str,
    category_id: &CategoryId,
    draft: CategoryDraft,
) -> ActionOutcome<()> {
    fold(async {
        guard::require_admin(deps.verifier.as_ref(), token).await?;
        let input = draft.parse()?;
        deps.categories.update(category_id, input).await?;
        tracing::info!("category updated");
        Ok(((), deps.invalidate(&[ADMIN_CATEGORIES, DASHBOARD])))
    }
    .await)
}

/// Deletes a category document.
///
/// Apps filed under the category are left in place; they simply sort last on
/// the dashboard until re-filed.
#[tracing::instrument(skip_all, fields(category = %category_id))]
pub async fn delete_category(
    deps: &Deps,
    token: &str,
    category_id: &CategoryId,
) -> ActionOutcome<()> {
    fold(async {
        guard::require_admin(deps.verifier.as_ref(), token).await?;
        deps.categories.delete(category_id).await?;
        tracing::info!("category deleted");
        Ok(((), deps.invalidate(&[ADMIN_CATEGORIES, DASHBOARD])))
    }
    .await)
}
