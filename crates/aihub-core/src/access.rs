// SoftArt AI HUB — Role-based tool visibility
//
// Decides, for one authenticated user, which tools they may see and what they
// may do with each. Pure functions over loaded records; no I/O.
//
// Rules:
//   • Owner sees every tool, approved or pending, and may do anything.
//   • Others see approved tools that are open to everyone (no roles) or list
//     their role, plus every tool they submitted themselves.
//   • A submitter may edit or delete their own tool while it is pending.
//   • A tool the viewer cannot see is reported as NotFound, so a 403 never
//     confirms that a hidden tool exists.

use crate::atoms::constants::OWNER_ROLE_ID;
use crate::atoms::error::{HubError, HubResult};
use crate::atoms::types::{Tool, User};
use serde::{Deserialize, Serialize};

/// The identity access checks run against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: String,
    pub role_id: Option<String>,
}

impl Viewer {
    pub fn new(user_id: impl Into<String>, role_id: Option<String>) -> Self {
        Viewer { user_id: user_id.into(), role_id }
    }

    pub fn is_owner(&self) -> bool {
        self.role_id.as_deref() == Some(OWNER_ROLE_ID)
    }
}

impl From<&User> for Viewer {
    fn from(user: &User) -> Self {
        Viewer::new(user.id.clone(), user.role_id().map(str::to_string))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolPermissions {
    pub view: bool,
    pub edit: bool,
    pub delete: bool,
    pub approve: bool,
}

/// Approved and open to everyone or to the viewer's role.
fn published_for(viewer: &Viewer, tool: &Tool) -> bool {
    if !tool.is_approved {
        return false;
    }
    if tool.roles.is_empty() {
        return true;
    }
    viewer.role_id.as_deref().is_some_and(|role| tool.has_role(role))
}

pub fn can_view(viewer: &Viewer, tool: &Tool) -> bool {
    viewer.is_owner() || tool.is_submitted_by(&viewer.user_id) || published_for(viewer, tool)
}

pub fn permissions(viewer: &Viewer, tool: &Tool) -> ToolPermissions {
    if viewer.is_owner() {
        return ToolPermissions { view: true, edit: true, delete: true, approve: true };
    }
    let own_pending = tool.is_submitted_by(&viewer.user_id) && !tool.is_approved;
    ToolPermissions {
        view: can_view(viewer, tool),
        edit: own_pending,
        delete: own_pending,
        approve: false,
    }
}

/// Keep only the tools `viewer` may see, preserving order.
pub fn visible_tools(viewer: &Viewer, tools: Vec<Tool>) -> Vec<Tool> {
    tools.into_iter().filter(|t| can_view(viewer, t)).collect()
}

/// Any authenticated user may submit a tool.
pub fn can_create_tool(_viewer: &Viewer) -> bool {
    true
}

/// New tools from the Owner are published immediately; everyone else's wait
/// for review.
pub fn approved_on_create(viewer: &Viewer) -> bool {
    viewer.is_owner()
}

pub fn require_owner(viewer: &Viewer, action: &str) -> HubResult<()> {
    if viewer.is_owner() {
        Ok(())
    } else {
        Err(HubError::forbidden(format!("only the Owner may {action}")))
    }
}

/// Hidden tools → NotFound; visible but not editable → Forbidden.
pub fn authorize_edit(viewer: &Viewer, tool: &Tool) -> HubResult<()> {
    let perms = permissions(viewer, tool);
    if !perms.view {
        return Err(HubError::not_found("Tool", tool.id.clone()));
    }
    if !perms.edit {
        return Err(HubError::forbidden("tool can only be edited by the Owner or, while pending, its submitter"));
    }
    Ok(())
}

pub fn authorize_delete(viewer: &Viewer, tool: &Tool) -> HubResult<()> {
    let perms = permissions(viewer, tool);
    if !perms.view {
        return Err(HubError::not_found("Tool", tool.id.clone()));
    }
    if !perms.delete {
        return Err(HubError::forbidden("tool can only be deleted by the Owner or, while pending, its submitter"));
    }
    Ok(())
}

pub fn authorize_view(viewer: &Viewer, tool: &Tool) -> HubResult<()> {
    if can_view(viewer, tool) {
        Ok(())
    } else {
        Err(HubError::not_found("Tool", tool.id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::types::{Role, ToolStatus};

    const DEV: &str = "role-dev";
    const PM: &str = "role-pm";

    fn tool(id: &str, approved: bool, roles: &[&str], created_by: Option<&str>) -> Tool {
        Tool {
            id: id.into(),
            name: id.into(),
            description: String::new(),
            url: "https://x.example".into(),
            icon: "🤖".into(),
            status: ToolStatus::Active,
            is_approved: approved,
            created_by: created_by.map(Into::into),
            categories: vec![],
            roles: roles.iter().map(|r| Role { id: (*r).into(), name: (*r).into() }).collect(),
            tags: vec![],
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn owner() -> Viewer {
        Viewer::new("u-owner", Some(OWNER_ROLE_ID.into()))
    }

    fn dev() -> Viewer {
        Viewer::new("u-dev", Some(DEV.into()))
    }

    fn nobody() -> Viewer {
        Viewer::new("u-none", None)
    }

    #[test]
    fn owner_sees_everything() {
        let o = owner();
        assert!(can_view(&o, &tool("t", false, &[PM], Some("someone"))));
        assert_eq!(
            permissions(&o, &tool("t", true, &[], None)),
            ToolPermissions { view: true, edit: true, delete: true, approve: true }
        );
    }

    #[test]
    fn open_approved_tool_visible_to_all() {
        let t = tool("t", true, &[], None);
        assert!(can_view(&dev(), &t));
        assert!(can_view(&nobody(), &t));
    }

    #[test]
    fn role_gated_tool_requires_matching_role() {
        let t = tool("t", true, &[PM], None);
        assert!(!can_view(&dev(), &t));
        assert!(!can_view(&nobody(), &t));
        assert!(can_view(&Viewer::new("u-pm", Some(PM.into())), &t));

        let t = tool("t", true, &[PM, DEV], None);
        assert!(can_view(&dev(), &t));
    }

    #[test]
    fn pending_tool_hidden_except_from_submitter() {
        let t = tool("t", false, &[], Some("u-dev"));
        assert!(can_view(&dev(), &t));
        assert!(!can_view(&nobody(), &t));
    }

    #[test]
    fn submitter_sees_own_tool_even_outside_role() {
        let t = tool("t", true, &[PM], Some("u-dev"));
        assert!(can_view(&dev(), &t));
    }

    #[test]
    fn submitter_edits_only_while_pending() {
        let d = dev();
        let pending = tool("t", false, &[], Some("u-dev"));
        let p = permissions(&d, &pending);
        assert!(p.edit && p.delete && !p.approve);
        assert!(authorize_edit(&d, &pending).is_ok());

        let approved = tool("t", true, &[], Some("u-dev"));
        let p = permissions(&d, &approved);
        assert!(p.view && !p.edit && !p.delete);
        assert!(matches!(authorize_delete(&d, &approved), Err(HubError::Forbidden(_))));
    }

    #[test]
    fn hidden_tool_reports_not_found() {
        let t = tool("t", false, &[], Some("someone-else"));
        assert!(matches!(authorize_edit(&dev(), &t), Err(HubError::NotFound { .. })));
        assert!(matches!(authorize_view(&dev(), &t), Err(HubError::NotFound { .. })));
    }

    #[test]
    fn visible_tools_filters_and_keeps_order() {
        let tools = vec![
            tool("a", true, &[], None),
            tool("b", true, &[PM], None),
            tool("c", false, &[], None),
            tool("d", true, &[DEV], None),
        ];
        let ids: Vec<_> = visible_tools(&dev(), tools).into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["a", "d"]);
    }

    #[test]
    fn owner_gate() {
        assert!(require_owner(&owner(), "approve tools").is_ok());
        assert!(matches!(require_owner(&dev(), "approve tools"), Err(HubError::Forbidden(_))));
        assert!(approved_on_create(&owner()));
        assert!(!approved_on_create(&dev()));
        assert!(can_create_tool(&nobody()));
    }
}
