mod announcement;
mod debug;
mod error;
mod input;
mod notifications;

use std::path::PathBuf;
use std::process;

use bulletin_rs::{Bulletin, Config};
use clap::{Parser, Subcommand};

use crate::error::CliResult;

#[derive(Parser)]
#[command(author, version, about = "Publish the website's announcement and notifications.")]
enum Cli {
    /// List, add, or delete notifications
    #[command(subcommand)]
    Notifications(NotificationsCmd),

    /// Show, publish, or hide the announcement popup
    #[command(subcommand)]
    Announcement(AnnouncementCmd),

    /// Print which repository and branch are edited, and where logs go
    #[command(name = "whereami")]
    WhereAmI,
}

#[derive(Subcommand)]
pub enum NotificationsCmd {
    /// Print every notification, newest first
    List,

    /// Publish a new notification at the top of the list
    Add {
        #[arg(long)]
        title_en: String,
        /// Defaults to the English title
        #[arg(long, default_value = "")]
        title_ka: String,
        #[arg(long)]
        date: String,
        /// A document to attach, usually a pdf
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Remove a notification by id
    Delete {
        id: i64,
        /// Don't ask for confirmation
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum AnnouncementCmd {
    /// Print the announcement the website is showing
    Show,

    /// Replace the announcement
    Publish {
        #[arg(long)]
        subtitle_en: String,
        #[arg(long, default_value = "")]
        subtitle_ka: String,
        #[arg(long, default_value = "")]
        description_en: String,
        #[arg(long, default_value = "")]
        description_ka: String,
        /// Publish it hidden
        #[arg(long)]
        inactive: bool,
        /// An image to show, may be repeated
        #[arg(long = "image", required = true)]
        images: Vec<PathBuf>,
    },

    /// Show the announcement on the website
    Activate,

    /// Hide the announcement without deleting it
    Deactivate,
}

pub async fn bulletin() -> CliResult<Bulletin> {
    Ok(Bulletin::init(Config::cli_config("cli")).await?)
}

fn main() {
    let result = match Cli::parse() {
        Cli::Notifications(cmd) => notifications::run(cmd),
        Cli::Announcement(cmd) => announcement::run(cmd),
        Cli::WhereAmI => debug::whereami(),
    };

    if let Err(err) = result {
        eprintln!("{err}");
        process::exit(1);
    }
}
