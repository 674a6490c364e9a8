//! Seed action: loads the stock categories, sample apps, and default settings.
//!
//! Idempotent for categories and settings (stable ids, merge writes); the
//! sample apps get fresh ids each run, so re-seeding a populated portal
//! duplicates them — same behavior the portal has always had.

use portal::{guard, AppInput, CategoryId, CategoryInput, SettingsInput, Timestamp};

use crate::outcome::{fold, ActionError, ActionOutcome, Deps, DASHBOARD};

struct SeedCategory {
    id: &'static str,
    name: &'static str,
    sort_order: i64,
}

const SEED_CATEGORIES: &[SeedCategory] = &[
    SeedCategory { id: "productivity", name: "Productivity", sort_order: 1 },
    SeedCategory { id: "development", name: "Development", sort_order: 2 },
    SeedCategory { id: "finance", name: "Finance", sort_order: 3 },
    SeedCategory { id: "hr", name: "HR & People", sort_order: 4 },
];

struct SeedApp {
    name: &'static str,
    url: &'static str,
    description: &'static str,
    icon_url: &'static str,
    category_id: &'static str,
    tags: &'static [&'static str],
}

const SEED_APPS: &[SeedApp] = &[
    SeedApp {
        name: "Jira",
        url: "https://jira.atlassian.com",
        description: "Issue tracking and project management.",
        icon_url: "https://cdn.example.com/icons/jira.png",
        category_id: "productivity",
        tags: &["Project Management", "Agile"],
    },
    SeedApp {
        name: "Slack",
        url: "https://slack.com",
        description: "Team communication and collaboration.",
        icon_url: "https://cdn.example.com/icons/slack.png",
        category_id: "productivity",
        tags: &["Communication", "Chat"],
    },
    SeedApp {
        name: "GitHub",
        url: "https://github.com",
        description: "Code hosting and version control.",
        icon_url: "https://cdn.example.com/icons/github.png",
        category_id: "development",
        tags: &["Git", "Code"],
    },
    SeedApp {
        name: "Workday",
        url: "https://workday.com",
        description: "Finance and HR management system.",
        icon_url: "https://cdn.example.com/icons/workday.png",
        category_id: "hr",
        tags: &["HR", "Finance"],
    },
];

/// Writes the seed data. Admin only.
#[tracing::instrument(skip_all)]
pub async fn seed_data(deps: &Deps, token: &str) -> ActionOutcome<()> {
    fold(async {
        guard::require_admin(deps.verifier.as_ref(), token).await?;

        for cat in SEED_CATEGORIES {
            let id = CategoryId::new(cat.id).ok_or_else(|| {
                ActionError::Store(portal::StoreError::Backend {
                    message: format!("invalid seed category id {:?}", cat.id),
                })
            })?;
            deps.categories
                .upsert(
                    &id,
                    CategoryInput {
                        name: cat.name.to_string(),
                        sort_order: cat.sort_order,
                        is_active: true,
                    },
                )
                .await?;
        }

        let now = Timestamp::now();
        for app in SEED_APPS {
            let category_id = CategoryId::new(app.category_id).ok_or_else(|| {
                ActionError::Store(portal::StoreError::Backend {
                    message: format!("invalid seed category id {:?}", app.category_id),
                })
            })?;
            deps.apps
                .create(
                    AppInput {
                        name: app.name.to_string(),
                        url: app.url.to_string(),
                        description: Some(app.description.to_string()),
                        icon_url: Some(app.icon_url.to_string()),
                        category_id,
                        tags: app.tags.iter().map(|t| t.to_string()).collect(),
                    },
                    now,
                )
                .await?;
        }

        deps.settings
            .merge(SettingsInput {
                portal_name: "VPortal".to_string(),
                logo_url: None,
            })
            .await?;

        tracing::info!(
            categories = SEED_CATEGORIES.len(),
            apps = SEED_APPS.len(),
            "seed data written"
        );
        Ok(((), deps.invalidate(&[DASHBOARD])))
    }
    .await)
}
