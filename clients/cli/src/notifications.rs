use bulletin_rs::model::record::Notification;
use bulletin_rs::screen::notifications::{NotificationsEvent, NotificationsScreen};
use bulletin_rs::screen::Outcome;
use bulletin_rs::Bulletin;
use colored::Colorize;

use crate::error::{CliError, CliResult};
use crate::{bulletin, input, NotificationsCmd};

pub fn run(cmd: NotificationsCmd) -> CliResult<()> {
    match cmd {
        NotificationsCmd::List => list(),
        NotificationsCmd::Add { title_en, title_ka, date, file } => {
            let mut events = vec![
                NotificationsEvent::SetTitleEn(title_en),
                NotificationsEvent::SetTitleKa(title_ka),
                NotificationsEvent::SetDate(date),
            ];
            if let Some(path) = file {
                events.push(NotificationsEvent::Attach(input::asset(&path)?));
            }
            add(events)
        }
        NotificationsCmd::Delete { id, yes } => delete(id, yes),
    }
}

async fn refreshed(bulletin: &Bulletin) -> CliResult<NotificationsScreen> {
    let mut screen = NotificationsScreen::default();
    if let Outcome::RefreshFailed(kind) =
        screen.update(bulletin, NotificationsEvent::Refresh).await?
    {
        return Err(kind.into());
    }
    Ok(screen)
}

fn print(notification: &Notification) {
    let mut line = format!(
        "{}  {}  {}",
        notification.id.to_string().dimmed(),
        notification.date,
        notification.title.en.bold()
    );
    if notification.title.ka != notification.title.en {
        line.push_str(&format!(" / {}", notification.title.ka));
    }
    println!("{line}");
    if notification.has_attachment() {
        println!("    {}", notification.file_url.blue());
    }
}

#[tokio::main]
async fn list() -> CliResult<()> {
    let bulletin = bulletin().await?;
    let screen = refreshed(&bulletin).await?;

    if screen.notifications.is_empty() {
        println!("No notifications");
    }
    screen.notifications.iter().for_each(print);
    Ok(())
}

#[tokio::main]
async fn add(events: Vec<NotificationsEvent>) -> CliResult<()> {
    let bulletin = bulletin().await?;
    let mut screen = NotificationsScreen::default();
    for event in events {
        screen.update(&bulletin, event).await?;
    }

    match screen.update(&bulletin, NotificationsEvent::Add).await? {
        Outcome::Added(notification) => {
            println!("{}", "Notification added".green());
            print(&notification);
            Ok(())
        }
        outcome => Err(CliError::new(format!("unexpected outcome: {outcome:?}"))),
    }
}

#[tokio::main]
async fn delete(id: i64, yes: bool) -> CliResult<()> {
    let bulletin = bulletin().await?;
    let mut screen = refreshed(&bulletin).await?;

    let prompt = match screen.notifications.iter().find(|n| n.id == id) {
        Some(notification) => format!("Delete \"{}\"?", notification.title.en),
        None => return Err(bulletin_rs::BulletinErrKind::RecordNotFound(id).into()),
    };
    let confirmed = input::confirm(prompt, yes)?;

    match screen.update(&bulletin, NotificationsEvent::Delete { id, confirmed }).await? {
        Outcome::Deleted(notification) => {
            println!("{} {}", "Deleted".green(), notification.title.en);
        }
        Outcome::Cancelled => println!("Nothing deleted"),
        outcome => return Err(CliError::new(format!("unexpected outcome: {outcome:?}"))),
    }
    Ok(())
}
