use bulletin_rs::model::record::{Announcement, Localized};
use bulletin_rs::screen::announcement::{AnnouncementEvent, AnnouncementScreen};
use bulletin_rs::screen::Outcome;
use bulletin_rs::Bulletin;
use colored::Colorize;

use crate::error::{CliError, CliResult};
use crate::{bulletin, input, AnnouncementCmd};

pub fn run(cmd: AnnouncementCmd) -> CliResult<()> {
    match cmd {
        AnnouncementCmd::Show => show(),
        AnnouncementCmd::Publish {
            subtitle_en,
            subtitle_ka,
            description_en,
            description_ka,
            inactive,
            images,
        } => {
            let mut events = vec![
                AnnouncementEvent::SetSubtitleEn(subtitle_en),
                AnnouncementEvent::SetSubtitleKa(subtitle_ka),
                AnnouncementEvent::SetDescriptionEn(description_en),
                AnnouncementEvent::SetDescriptionKa(description_ka),
                AnnouncementEvent::SetActive(!inactive),
            ];
            for path in images {
                events.push(AnnouncementEvent::AddImage(input::asset(&path)?));
            }
            publish(events)
        }
        AnnouncementCmd::Activate => set_live_active(true),
        AnnouncementCmd::Deactivate => set_live_active(false),
    }
}

fn print_localized(label: &str, text: &Localized) {
    if text.en.is_empty() && text.ka.is_empty() {
        return;
    }
    println!("{label}: {}", text.en);
    if !text.ka.is_empty() {
        println!("{:width$}  {}", "", text.ka, width = label.len());
    }
}

fn print(bulletin: &Bulletin, announcement: &Announcement) {
    let status = if announcement.active { "shown".green() } else { "hidden".yellow() };
    println!("Status: {status}");
    print_localized("Title", &announcement.title);
    print_localized("Subtitle", &announcement.subtitle);
    print_localized("Description", &announcement.description);
    for image in &announcement.images {
        println!("Image: {}", bulletin.image_preview_url(image).blue());
    }
}

#[tokio::main]
async fn show() -> CliResult<()> {
    let bulletin = bulletin().await?;
    let mut screen = AnnouncementScreen::default();
    if let Outcome::RefreshFailed(kind) =
        screen.update(&bulletin, AnnouncementEvent::Refresh).await?
    {
        return Err(kind.into());
    }

    match &screen.live {
        Some(announcement) => print(&bulletin, announcement),
        None => println!("No announcement has been published"),
    }
    Ok(())
}

#[tokio::main]
async fn publish(events: Vec<AnnouncementEvent>) -> CliResult<()> {
    let bulletin = bulletin().await?;
    let mut screen = AnnouncementScreen::default();
    for event in events {
        screen.update(&bulletin, event).await?;
    }

    match screen.update(&bulletin, AnnouncementEvent::Publish).await? {
        Outcome::Published(announcement) => {
            println!("{}", "Published, the website will update in a few minutes".green());
            print(&bulletin, &announcement);
            Ok(())
        }
        outcome => Err(CliError::new(format!("unexpected outcome: {outcome:?}"))),
    }
}

#[tokio::main]
async fn set_live_active(active: bool) -> CliResult<()> {
    let bulletin = bulletin().await?;
    let mut screen = AnnouncementScreen::default();

    match screen.update(&bulletin, AnnouncementEvent::SetLiveActive(active)).await? {
        Outcome::Toggled(announcement) => {
            print(&bulletin, &announcement);
            Ok(())
        }
        outcome => Err(CliError::new(format!("unexpected outcome: {outcome:?}"))),
    }
}
