// aihub-admin — terminal administration for the SoftArt AI HUB catalog.
// Works directly on the SQLite file, acting as the Owner.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "aihub-admin", version, about = "Administer the SoftArt AI HUB catalog")]
pub struct Cli {
    /// Catalog database (default: <data_dir>/softart-hub/aihub.db)
    #[arg(long, env = "AIHUB_DB", global = true)]
    pub db: Option<PathBuf>,

    /// Print JSON instead of aligned text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage roles
    #[command(subcommand)]
    Roles(NamedCmd),
    /// Manage categories
    #[command(subcommand)]
    Categories(CategoryCmd),
    /// Manage tags
    #[command(subcommand)]
    Tags(NamedCmd),
    /// Manage users
    #[command(subcommand)]
    Users(UserCmd),
    /// Manage tools and approvals
    #[command(subcommand)]
    Tools(ToolCmd),
    /// Show catalog counters
    Stats,
}

#[derive(Subcommand, Debug)]
pub enum NamedCmd {
    List,
    Add { name: String },
    Remove { id: String },
}

#[derive(Subcommand, Debug)]
pub enum CategoryCmd {
    List,
    Add {
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    Remove { id: String },
}

#[derive(Subcommand, Debug)]
pub enum UserCmd {
    List,
    Add {
        email: String,
        #[arg(short, long, default_value = "")]
        name: String,
        /// Role id to assign
        #[arg(short, long)]
        role: Option<String>,
    },
    /// Assign a role; omit --role to clear it
    SetRole {
        user_id: String,
        #[arg(short, long)]
        role: Option<String>,
    },
    Remove { user_id: String },
}

#[derive(Subcommand, Debug)]
pub enum ToolCmd {
    List {
        /// Only tools awaiting approval
        #[arg(long)]
        pending: bool,
    },
    /// Add a published tool (no submitter)
    Add {
        name: String,
        url: String,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(short, long, default_value = "")]
        icon: String,
        /// Role ids that may see the tool (repeatable); none = everyone
        #[arg(long = "role")]
        roles: Vec<String>,
        #[arg(long = "category")]
        categories: Vec<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    Approve { id: String },
    Unapprove { id: String },
    Remove { id: String },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    commands::run(cli)
}
