// SoftArt AI HUB — Catalog search
//
// Text search, taxonomy filters and pagination over the tools a viewer can
// see. Runs in memory on the list loaded from the store; the catalog is an
// internal directory of at most a few hundred tools.

use crate::access::{visible_tools, Viewer};
use crate::atoms::constants::{DEFAULT_PER_PAGE, MAX_PER_PAGE};
use crate::atoms::types::{Page, Tool};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalFilter {
    /// Whatever the viewer can see.
    #[default]
    All,
    Approved,
    Pending,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolQuery {
    /// Free text matched against name, description and tag names.
    #[serde(default)]
    pub q: Option<String>,
    /// Category id or name.
    #[serde(default)]
    pub category: Option<String>,
    /// Tag id or name.
    #[serde(default)]
    pub tag: Option<String>,
    /// Role id or name.
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub status: ApprovalFilter,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

impl ToolQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> u32 {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE)
    }
}

/// Trimmed, non-empty filter value.
fn term(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn id_or_name(id: &str, name: &str, wanted: &str) -> bool {
    id == wanted || name.to_lowercase() == wanted.to_lowercase()
}

/// True when `tool` passes every filter in `query` (pagination excluded).
pub fn matches(tool: &Tool, query: &ToolQuery) -> bool {
    match query.status {
        ApprovalFilter::All => {}
        ApprovalFilter::Approved if !tool.is_approved => return false,
        ApprovalFilter::Pending if tool.is_approved => return false,
        _ => {}
    }

    if let Some(q) = term(&query.q) {
        let needle = q.to_lowercase();
        let hit = tool.name.to_lowercase().contains(&needle)
            || tool.description.to_lowercase().contains(&needle)
            || tool.tags.iter().any(|t| t.name.to_lowercase().contains(&needle));
        if !hit {
            return false;
        }
    }

    if let Some(c) = term(&query.category) {
        if !tool.categories.iter().any(|x| id_or_name(&x.id, &x.name, c)) {
            return false;
        }
    }
    if let Some(t) = term(&query.tag) {
        if !tool.tags.iter().any(|x| id_or_name(&x.id, &x.name, t)) {
            return false;
        }
    }
    if let Some(r) = term(&query.role) {
        if !tool.roles.iter().any(|x| id_or_name(&x.id, &x.name, r)) {
            return false;
        }
    }
    true
}

/// Slice `items` into the requested page. A page past the end is empty but
/// keeps the correct totals.
pub fn paginate<T>(items: Vec<T>, page: u32, per_page: u32) -> Page<T> {
    let page = page.max(1);
    let per_page = per_page.clamp(1, MAX_PER_PAGE);
    let total = items.len();
    let total_pages = total.div_ceil(per_page as usize) as u32;
    let start = (page as usize - 1).saturating_mul(per_page as usize);
    let items = items.into_iter().skip(start).take(per_page as usize).collect();
    Page { items, total, page, per_page, total_pages }
}

/// Visibility, then filters, then name order, then pagination.
pub fn search(viewer: &Viewer, tools: Vec<Tool>, query: &ToolQuery) -> Page<Tool> {
    let mut hits: Vec<Tool> = visible_tools(viewer, tools)
        .into_iter()
        .filter(|t| matches(t, query))
        .collect();
    hits.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.id.cmp(&b.id))
    });
    paginate(hits, query.page(), query.per_page())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::constants::OWNER_ROLE_ID;
    use crate::atoms::types::{Category, Role, Tag, ToolStatus};

    fn tool(id: &str, name: &str, approved: bool) -> Tool {
        Tool {
            id: id.into(),
            name: name.into(),
            description: format!("{name} description"),
            url: "https://x.example".into(),
            icon: "🤖".into(),
            status: ToolStatus::Active,
            is_approved: approved,
            created_by: None,
            categories: vec![],
            roles: vec![],
            tags: vec![],
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn owner() -> Viewer {
        Viewer::new("o", Some(OWNER_ROLE_ID.into()))
    }

    #[test]
    fn text_search_hits_name_description_and_tags() {
        let mut a = tool("1", "Whisper", true);
        a.tags = vec![Tag { id: "t1".into(), name: "speech".into() }];
        let b = tool("2", "DALL-E", true);
        let tools = vec![a, b];

        let q = ToolQuery { q: Some("  SPEECH ".into()), ..Default::default() };
        let page = search(&owner(), tools.clone(), &q);
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].name, "Whisper");

        let q = ToolQuery { q: Some("dall".into()), ..Default::default() };
        assert_eq!(search(&owner(), tools.clone(), &q).items[0].id, "2");

        let q = ToolQuery { q: Some("   ".into()), ..Default::default() };
        assert_eq!(search(&owner(), tools, &q).total, 2);
    }

    #[test]
    fn taxonomy_filters_match_id_or_name() {
        let mut a = tool("1", "A", true);
        a.categories = vec![Category { id: "c1".into(), name: "Writing".into(), description: String::new() }];
        a.roles = vec![Role { id: "r1".into(), name: "Backend Developer".into() }];
        let b = tool("2", "B", true);

        for q in [
            ToolQuery { category: Some("c1".into()), ..Default::default() },
            ToolQuery { category: Some("writing".into()), ..Default::default() },
            ToolQuery { role: Some("backend developer".into()), ..Default::default() },
        ] {
            let page = search(&owner(), vec![a.clone(), b.clone()], &q);
            assert_eq!(page.total, 1, "query {q:?}");
            assert_eq!(page.items[0].id, "1");
        }
    }

    #[test]
    fn approval_filter() {
        let tools = vec![tool("1", "A", true), tool("2", "B", false)];
        let q = ToolQuery { status: ApprovalFilter::Pending, ..Default::default() };
        let page = search(&owner(), tools.clone(), &q);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, "2");

        let q = ToolQuery { status: ApprovalFilter::Approved, ..Default::default() };
        assert_eq!(search(&owner(), tools, &q).items[0].id, "1");
    }

    #[test]
    fn results_sorted_by_name_case_insensitive() {
        let tools = vec![tool("1", "zeta", true), tool("2", "Alpha", true), tool("3", "beta", true)];
        let names: Vec<_> = search(&owner(), tools, &ToolQuery::default())
            .items
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "beta", "zeta"]);
    }

    #[test]
    fn visibility_applies_before_filters() {
        let tools = vec![tool("1", "A", true), tool("2", "B", false)];
        let viewer = Viewer::new("dev", None);
        let page = search(&viewer, tools, &ToolQuery::default());
        assert_eq!(page.total, 1);
    }

    #[test]
    fn pagination_bounds() {
        let items: Vec<u32> = (1..=25).collect();
        let p = paginate(items.clone(), 3, 10);
        assert_eq!(p.items, vec![21, 22, 23, 24, 25]);
        assert_eq!(p.total, 25);
        assert_eq!(p.total_pages, 3);

        let p = paginate(items.clone(), 9, 10);
        assert!(p.items.is_empty());
        assert_eq!(p.total_pages, 3);

        let p = paginate(items, 0, 0);
        assert_eq!(p.page, 1);
        assert_eq!(p.per_page, 1);

        let p = paginate(Vec::<u32>::new(), 1, 12);
        assert_eq!(p.total_pages, 0);
    }

    #[test]
    fn per_page_defaults_and_clamps() {
        assert_eq!(ToolQuery::default().per_page(), DEFAULT_PER_PAGE);
        let q = ToolQuery { per_page: Some(10_000), ..Default::default() };
        assert_eq!(q.per_page(), MAX_PER_PAGE);
    }
}
