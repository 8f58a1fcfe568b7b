// ── Hub Atoms: Types ───────────────────────────────────────────────────────
// Plain data records shared by every layer. No I/O here; the store maps rows
// into these and the HTTP layer serializes them as-is.

use crate::atoms::constants::*;
use crate::atoms::error::{HubError, HubResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Taxonomy ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
}

impl Role {
    pub fn is_owner(&self) -> bool {
        self.id == OWNER_ROLE_ID
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
}

// ── Tools ──────────────────────────────────────────────────────────────────

/// Lifecycle label shown next to a tool. Independent of approval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    #[default]
    Active,
    Beta,
    Deprecated,
}

impl ToolStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolStatus::Active => "active",
            ToolStatus::Beta => "beta",
            ToolStatus::Deprecated => "deprecated",
        }
    }
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolStatus {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(ToolStatus::Active),
            "beta" => Ok(ToolStatus::Beta),
            "deprecated" => Ok(ToolStatus::Deprecated),
            other => Err(HubError::validation(format!("unknown tool status '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    pub id: String,
    pub name: String,
    pub description: String,
    pub url: String,
    pub icon: String,
    pub status: ToolStatus,
    pub is_approved: bool,
    /// Submitting user. `None` for tools created outside the API (admin CLI).
    pub created_by: Option<String>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    pub created_at: String,
    pub updated_at: String,
}

impl Tool {
    pub fn has_role(&self, role_id: &str) -> bool {
        self.roles.iter().any(|r| r.id == role_id)
    }

    pub fn is_submitted_by(&self, user_id: &str) -> bool {
        self.created_by.as_deref() == Some(user_id)
    }
}

/// Create / update payload for a tool. Associations are given by id and
/// replace the existing set wholesale on update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub status: ToolStatus,
    #[serde(default)]
    pub category_ids: Vec<String>,
    #[serde(default)]
    pub role_ids: Vec<String>,
    #[serde(default)]
    pub tag_ids: Vec<String>,
}

pub const DEFAULT_TOOL_ICON: &str = "🤖";

impl ToolInput {
    /// Trim fields, apply defaults and check limits. Association ids are
    /// deduplicated here; their existence is checked by the store.
    pub fn normalized(mut self) -> HubResult<Self> {
        self.name = required("name", &self.name, MAX_NAME_LEN)?;
        self.description = bounded("description", &self.description, MAX_DESCRIPTION_LEN)?;
        self.url = required("url", &self.url, MAX_URL_LEN)?;
        if !(self.url.starts_with("https://") || self.url.starts_with("http://")) {
            return Err(HubError::validation("url must start with http:// or https://"));
        }
        self.icon = bounded("icon", &self.icon, MAX_ICON_LEN)?;
        if self.icon.is_empty() {
            self.icon = DEFAULT_TOOL_ICON.into();
        }
        dedup(&mut self.category_ids);
        dedup(&mut self.role_ids);
        dedup(&mut self.tag_ids);
        Ok(self)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl CategoryInput {
    pub fn normalized(self) -> HubResult<Self> {
        Ok(CategoryInput {
            name: required("name", &self.name, MAX_NAME_LEN)?,
            description: bounded("description", &self.description, MAX_DESCRIPTION_LEN)?,
        })
    }
}

/// Payload for records that carry only a name (roles, tags).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NameInput {
    pub name: String,
}

impl NameInput {
    pub fn normalized(self) -> HubResult<Self> {
        Ok(NameInput { name: required("name", &self.name, MAX_NAME_LEN)? })
    }
}

// ── Users ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Option<Role>,
    pub created_at: String,
}

impl User {
    pub fn role_id(&self) -> Option<&str> {
        self.role.as_ref().map(|r| r.id.as_str())
    }

    pub fn is_owner(&self) -> bool {
        self.role.as_ref().is_some_and(Role::is_owner)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserInput {
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role_id: Option<String>,
}

impl UserInput {
    pub fn normalized(self) -> HubResult<Self> {
        let email = required("email", &self.email, MAX_EMAIL_LEN)?.to_lowercase();
        let valid = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !valid || email.contains(char::is_whitespace) {
            return Err(HubError::validation(format!("invalid email '{email}'")));
        }
        let name = bounded("name", &self.name, MAX_NAME_LEN)?;
        let role_id = self.role_id.map(|r| r.trim().to_string()).filter(|r| !r.is_empty());
        Ok(UserInput { email, name, role_id })
    }
}

// ── Listing / admin ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Re-wrap the items of a page, keeping its counters.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category_id: String,
    pub name: String,
    pub tools: u64,
}

/// Counters for the admin panel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HubStats {
    pub tools_total: u64,
    pub tools_approved: u64,
    pub tools_pending: u64,
    pub users: u64,
    pub categories: u64,
    pub roles: u64,
    pub tags: u64,
    pub tools_per_category: Vec<CategoryCount>,
}

// ── Field helpers ──────────────────────────────────────────────────────────

fn required(field: &str, value: &str, max: usize) -> HubResult<String> {
    let v = bounded(field, value, max)?;
    if v.is_empty() {
        return Err(HubError::validation(format!("{field} must not be empty")));
    }
    Ok(v)
}

fn bounded(field: &str, value: &str, max: usize) -> HubResult<String> {
    let v = value.trim();
    if v.chars().count() > max {
        return Err(HubError::validation(format!("{field} exceeds {max} characters")));
    }
    Ok(v.to_string())
}

fn dedup(ids: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    ids.retain(|id| seen.insert(id.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> ToolInput {
        ToolInput {
            name: "  ChatGPT ".into(),
            url: "https://chat.openai.com".into(),
            ..Default::default()
        }
    }

    #[test]
    fn normalized_trims_and_defaults_icon() {
        let t = input().normalized().unwrap();
        assert_eq!(t.name, "ChatGPT");
        assert_eq!(t.icon, DEFAULT_TOOL_ICON);
        assert_eq!(t.status, ToolStatus::Active);
    }

    #[test]
    fn normalized_rejects_blank_name_and_bad_url() {
        let mut t = input();
        t.name = "   ".into();
        assert!(matches!(t.normalized(), Err(HubError::Validation(_))));

        let mut t = input();
        t.url = "ftp://files".into();
        assert!(matches!(t.normalized(), Err(HubError::Validation(_))));
    }

    #[test]
    fn normalized_dedups_association_ids() {
        let mut t = input();
        t.role_ids = vec!["a".into(), "b".into(), "a".into()];
        let t = t.normalized().unwrap();
        assert_eq!(t.role_ids, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn name_limit_counts_chars_not_bytes() {
        let n = NameInput { name: "é".repeat(MAX_NAME_LEN) };
        assert!(n.normalized().is_ok());
        let n = NameInput { name: "é".repeat(MAX_NAME_LEN + 1) };
        assert!(n.normalized().is_err());
    }

    #[test]
    fn user_input_lowercases_email() {
        let u = UserInput { email: " Ana@SoftArt.io ".into(), ..Default::default() }
            .normalized()
            .unwrap();
        assert_eq!(u.email, "ana@softart.io");
        assert!(UserInput { email: "nope".into(), ..Default::default() }.normalized().is_err());
    }

    #[test]
    fn tool_status_parses_and_serializes_lowercase() {
        assert_eq!("Beta".parse::<ToolStatus>().unwrap(), ToolStatus::Beta);
        assert!("retired".parse::<ToolStatus>().is_err());
        assert_eq!(serde_json::to_string(&ToolStatus::Deprecated).unwrap(), "\"deprecated\"");
    }
}
