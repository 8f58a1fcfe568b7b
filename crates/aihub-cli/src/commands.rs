// Subcommand dispatch. Every command opens the store, performs one action
// and prints the result.

use crate::{CategoryCmd, Cli, Command, NamedCmd, ToolCmd, UserCmd};
use aihub_core::atoms::types::{CategoryInput, NameInput, Tool, ToolInput, UserInput};
use aihub_core::store::{self, HubStore};
use log::info;
use serde::Serialize;

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let path = cli.db.clone().unwrap_or_else(store::default_db_path);
    let store = HubStore::open(&path)?;
    info!("[cli] Using catalog at {:?}", path);
    let out = Output { json: cli.json };

    match cli.command {
        Command::Roles(cmd) => match cmd {
            NamedCmd::List => out.rows(&store.list_roles()?, |r| vec![r.id.clone(), r.name.clone()]),
            NamedCmd::Add { name } => {
                info!("[cli] Adding role '{}'", name.trim());
                out.one(&store.create_role(&NameInput { name }.normalized()?)?)
            }
            NamedCmd::Remove { id } => {
                info!("[cli] Removing role {}", id);
                out.done(store.delete_role(&id)?, "role removed")
            }
        },
        Command::Categories(cmd) => match cmd {
            CategoryCmd::List => out.rows(&store.list_categories()?, |c| {
                vec![c.id.clone(), c.name.clone(), c.description.clone()]
            }),
            CategoryCmd::Add { name, description } => {
                let input = CategoryInput { name, description }.normalized()?;
                info!("[cli] Adding category '{}'", input.name);
                out.one(&store.create_category(&input)?)
            }
            CategoryCmd::Remove { id } => {
                info!("[cli] Removing category {}", id);
                out.done(store.delete_category(&id)?, "category removed")
            }
        },
        Command::Tags(cmd) => match cmd {
            NamedCmd::List => out.rows(&store.list_tags()?, |t| vec![t.id.clone(), t.name.clone()]),
            NamedCmd::Add { name } => {
                info!("[cli] Adding tag '{}'", name.trim());
                out.one(&store.create_tag(&NameInput { name }.normalized()?)?)
            }
            NamedCmd::Remove { id } => {
                info!("[cli] Removing tag {}", id);
                out.done(store.delete_tag(&id)?, "tag removed")
            }
        },
        Command::Users(cmd) => match cmd {
            UserCmd::List => out.rows(&store.list_users()?, |u| {
                let role = u.role.as_ref().map(|r| r.name.clone()).unwrap_or_else(|| "-".into());
                vec![u.id.clone(), u.email.clone(), u.name.clone(), role]
            }),
            UserCmd::Add { email, name, role } => {
                let input = UserInput { email, name, role_id: role }.normalized()?;
                info!("[cli] Adding user {}", input.email);
                out.one(&store.create_user(&input)?)
            }
            UserCmd::SetRole { user_id, role } => {
                info!("[cli] Setting role of {} → {}", user_id, role.as_deref().unwrap_or("none"));
                out.one(&store.set_user_role(&user_id, role.as_deref())?)
            }
            UserCmd::Remove { user_id } => {
                info!("[cli] Removing user {}", user_id);
                out.done(store.delete_user(&user_id)?, "user removed")
            }
        },
        Command::Tools(cmd) => match cmd {
            ToolCmd::List { pending } => {
                let tools: Vec<Tool> = store
                    .list_tools()?
                    .into_iter()
                    .filter(|t| !pending || !t.is_approved)
                    .collect();
                out.rows(&tools, tool_row)
            }
            ToolCmd::Add { name, url, description, icon, roles, categories, tags } => {
                let input = ToolInput {
                    name,
                    description,
                    url,
                    icon,
                    role_ids: roles,
                    category_ids: categories,
                    tag_ids: tags,
                    ..Default::default()
                }
                .normalized()?;
                info!("[cli] Adding tool '{}'", input.name);
                out.one(&store.create_tool(&input, None, true)?)
            }
            ToolCmd::Approve { id } => {
                info!("[cli] Approving tool {}", id);
                out.one(&store.set_tool_approval(&id, true)?)
            }
            ToolCmd::Unapprove { id } => {
                info!("[cli] Unapproving tool {}", id);
                out.one(&store.set_tool_approval(&id, false)?)
            }
            ToolCmd::Remove { id } => {
                info!("[cli] Removing tool {}", id);
                out.done(store.delete_tool(&id)?, "tool removed")
            }
        },
        Command::Stats => {
            let stats = store.stats()?;
            if out.json {
                return out.one(&stats);
            }
            println!("tools      {} ({} approved, {} pending)", stats.tools_total, stats.tools_approved, stats.tools_pending);
            println!("users      {}", stats.users);
            println!("roles      {}", stats.roles);
            println!("categories {}", stats.categories);
            println!("tags       {}", stats.tags);
            for c in &stats.tools_per_category {
                println!("  {:<24} {}", c.name, c.tools);
            }
            Ok(())
        }
    }
}

fn tool_row(t: &Tool) -> Vec<String> {
    let state = if t.is_approved { "approved" } else { "pending" };
    let roles = if t.roles.is_empty() {
        "everyone".to_string()
    } else {
        t.roles.iter().map(|r| r.name.as_str()).collect::<Vec<_>>().join(",")
    };
    vec![t.id.clone(), format!("{} {}", t.icon, t.name), state.into(), t.status.to_string(), roles]
}

struct Output {
    json: bool,
}

impl Output {
    fn one<T: Serialize>(&self, value: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    fn rows<T: Serialize>(&self, items: &[T], row: impl Fn(&T) -> Vec<String>) -> anyhow::Result<()> {
        if self.json {
            return self.one(&items);
        }
        print!("{}", format_table(&items.iter().map(row).collect::<Vec<_>>()));
        Ok(())
    }

    fn done(&self, _: (), message: &str) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::json!({ "ok": true }));
        } else {
            println!("{message}");
        }
        Ok(())
    }
}

/// Left-aligned columns separated by two spaces.
fn format_table(rows: &[Vec<String>]) -> String {
    let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..cols)
        .map(|i| rows.iter().filter_map(|r| r.get(i)).map(|c| c.chars().count()).max().unwrap_or(0))
        .collect();

    let mut out = String::new();
    for row in rows {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_aligns_columns() {
        let rows = vec![
            vec!["a".to_string(), "first".to_string()],
            vec!["long-id".to_string(), "x".to_string()],
        ];
        assert_eq!(format_table(&rows), "a        first\nlong-id  x\n");
    }

    #[test]
    fn empty_table_prints_nothing() {
        assert_eq!(format_table(&[]), "");
    }
}
