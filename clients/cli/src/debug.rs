use bulletin_rs::service::logging::LOG_FILE;
use bulletin_rs::Config;

use crate::error::CliResult;

pub fn whereami() -> CliResult<()> {
    let config = Config::cli_config("cli");
    println!("Repository: {}", config.store.repository);
    println!("Branch: {}", config.store.branch);
    println!("Website: {}", config.site.site_url);
    println!("Logs: {}/{LOG_FILE}", config.writeable_path);
    Ok(())
}
