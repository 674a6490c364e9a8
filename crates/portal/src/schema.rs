//! Input schemas: parse loosely typed client drafts into validated records.
//!
//! Every mutating boundary accepts a `*Draft` — the shape a form submits,
//! strings and all — and parses it into a validated `*Input` or a structured
//! list of [`FieldError`]s. All fields are checked on every parse; errors
//! accumulate rather than stopping at the first failure, so a form can surface
//! every problem at once.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::CategoryId;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// The draft field the failure relates to (e.g. `"url"`).
    pub field: String,
    /// Human-readable message suitable for inline form display.
    pub message: String,
}

impl FieldError {
    /// Creates a [`FieldError`] for `field` with `message`.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn require_absolute_url(field: &str, value: &str, errors: &mut Vec<FieldError>) {
    if Url::parse(value).is_err() {
        errors.push(FieldError::new(field, "Must be a valid URL"));
    }
}

/// Validates an optional URL field where the empty string means "unset"
/// (HTML forms submit empty inputs rather than omitting them).
fn optional_url(field: &str, value: Option<&str>, errors: &mut Vec<FieldError>) -> Option<String> {
    match value {
        None => None,
        Some(v) if v.is_empty() => None,
        Some(v) => {
            require_absolute_url(field, v, errors);
            Some(v.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Apps
// ---------------------------------------------------------------------------

/// The client-shaped app form payload.
///
/// `tags` arrives as one comma-separated string, exactly as the form field
/// submits it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppDraft {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
    pub category_id: String,
    #[serde(default)]
    pub tags: String,
}

/// A validated app payload, ready to be written as a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInput {
    pub name: String,
    pub url: String,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub category_id: CategoryId,
    pub tags: Vec<String>,
}

impl AppDraft {
    /// Parses the draft, accumulating every field failure.
    pub fn parse(self) -> Result<AppInput, Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.name.is_empty() {
            errors.push(FieldError::new("name", "Name is required"));
        }
        require_absolute_url("url", &self.url, &mut errors);
        let icon_url = optional_url("icon_url", self.icon_url.as_deref(), &mut errors);

        let category_id = CategoryId::new(self.category_id.clone());
        if category_id.is_none() {
            errors.push(FieldError::new("category_id", "Category is required"));
        }

        let tags: Vec<String> = self
            .tags
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        match category_id {
            Some(category_id) if errors.is_empty() => Ok(AppInput {
                name: self.name,
                url: self.url,
                description: self.description.filter(|d| !d.is_empty()),
                icon_url,
                category_id,
                tags,
            }),
            _ => Err(errors),
        }
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Sort order as submitted by the category form: a number, a numeric string,
/// or absent (defaults to 0).
///
/// The form layer historically submitted this field as text, so numeric
/// strings are coerced here rather than rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(untagged)]
pub enum SortOrderDraft {
    #[default]
    Missing,
    Number(i64),
    Text(String),
}

impl SortOrderDraft {
    fn coerce(&self, errors: &mut Vec<FieldError>) -> i64 {
        match self {
            SortOrderDraft::Missing => 0,
            SortOrderDraft::Number(n) => *n,
            SortOrderDraft::Text(s) => match s.trim().parse() {
                Ok(n) => n,
                Err(_) => {
                    errors.push(FieldError::new("sort_order", "Must be a number"));
                    0
                }
            },
        }
    }
}

/// The client-shaped category form payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryDraft {
    pub name: String,
    #[serde(default)]
    pub sort_order: SortOrderDraft,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// A validated category payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInput {
    pub name: String,
    pub sort_order: i64,
    pub is_active: bool,
}

impl CategoryDraft {
    /// Parses the draft, accumulating every field failure.
    pub fn parse(self) -> Result<CategoryInput, Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.name.is_empty() {
            errors.push(FieldError::new("name", "Name is required"));
        }
        let sort_order = self.sort_order.coerce(&mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(CategoryInput {
            name: self.name,
            sort_order,
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// The client-shaped settings form payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsDraft {
    pub portal_name: String,
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// A validated settings payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsInput {
    pub portal_name: String,
    pub logo_url: Option<String>,
}

impl SettingsDraft {
    /// Parses the draft, accumulating every field failure.
    pub fn parse(self) -> Result<SettingsInput, Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.portal_name.is_empty() {
            errors.push(FieldError::new("portal_name", "Portal Name is required"));
        }
        let logo_url = optional_url("logo_url", self.logo_url.as_deref(), &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(SettingsInput {
            portal_name: self.portal_name,
            logo_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_app_draft() -> AppDraft {
        AppDraft {
            name: "Jira".into(),
            url: "https://jira.example.com".into(),
            description: Some("Issue tracking".into()),
            icon_url: Some(String::new()),
            category_id: "productivity".into(),
            tags: "Project Management, Agile, ,".into(),
        }
    }

    #[test]
    fn valid_app_draft_parses() {
        let input = valid_app_draft().parse().unwrap();
        assert_eq!(input.name, "Jira");
        assert_eq!(input.tags, vec!["Project Management", "Agile"]);
        // Empty icon_url field means unset, not invalid.
        assert_eq!(input.icon_url, None);
        assert_eq!(input.category_id.as_str(), "productivity");
    }

    #[test]
    fn app_draft_errors_accumulate() {
        let draft = AppDraft {
            name: String::new(),
            url: "not a url".into(),
            category_id: String::new(),
            ..valid_app_draft()
        };
        let errors = draft.parse().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "url", "category_id"]);
    }

    #[test]
    fn app_icon_url_must_be_valid_when_present() {
        let draft = AppDraft {
            icon_url: Some("nope".into()),
            ..valid_app_draft()
        };
        let errors = draft.parse().unwrap_err();
        assert_eq!(errors, vec![FieldError::new("icon_url", "Must be a valid URL")]);
    }

    #[test]
    fn category_sort_order_coerces_numeric_strings() {
        let draft = CategoryDraft {
            name: "Finance".into(),
            sort_order: SortOrderDraft::Text(" 3 ".into()),
            is_active: None,
        };
        let input = draft.parse().unwrap();
        assert_eq!(input.sort_order, 3);
        assert!(input.is_active);
    }

    #[test]
    fn category_sort_order_defaults_to_zero() {
        let input = CategoryDraft {
            name: "HR".into(),
            ..Default::default()
        }
        .parse()
        .unwrap();
        assert_eq!(input.sort_order, 0);
    }

    #[test]
    fn category_rejects_non_numeric_sort_order() {
        let draft = CategoryDraft {
            name: "HR".into(),
            sort_order: SortOrderDraft::Text("first".into()),
            is_active: None,
        };
        let errors = draft.parse().unwrap_err();
        assert_eq!(errors[0].field, "sort_order");
    }

    #[test]
    fn settings_requires_portal_name() {
        let errors = SettingsDraft::default().parse().unwrap_err();
        assert_eq!(errors[0].field, "portal_name");
    }

    #[test]
    fn settings_accepts_empty_logo_url() {
        let input = SettingsDraft {
            portal_name: "VPortal".into(),
            logo_url: Some(String::new()),
        }
        .parse()
        .unwrap();
        assert_eq!(input.logo_url, None);
    }
}
