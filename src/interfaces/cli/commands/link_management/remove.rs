//! Remove link command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::LinkService;

pub async fn remove_link(links: &LinkService, slug: String) -> Result<(), CliError> {
    let link = links.get_link_by_slug(&slug).await?;
    links.delete_link(link.id).await?;

    println!(
        "{} Deleted QR link: {} (scan history kept)",
        "✓".bold().green(),
        link.slug.cyan()
    );

    Ok(())
}
