use std::io;
use std::path::Path;

use bulletin_rs::model::asset::UploadedAsset;
use dialoguer::Confirm;
use is_terminal::IsTerminal;

use crate::error::{CliError, CliResult};

pub fn asset(path: &Path) -> CliResult<UploadedAsset> {
    UploadedAsset::from_disk(path)
        .map_err(|err| CliError::new(format!("reading {}: {err}", path.display())))
}

/// `true` without asking when `yes` was passed. Refuses, rather than assuming, when there is
/// nobody at a terminal to ask.
pub fn confirm(prompt: impl Into<String>, yes: bool) -> CliResult<bool> {
    if yes {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::new("not an interactive terminal, pass --yes to confirm"));
    }

    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}
