//! Add link command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::{CreateLinkRequest, LinkService};

pub async fn add_link(
    links: &LinkService,
    slug: String,
    destination: String,
    description: Option<String>,
) -> Result<(), CliError> {
    let link = links
        .create_link(CreateLinkRequest {
            slug,
            destination,
            description,
            admin_id: Some("cli".to_string()),
        })
        .await?;

    println!(
        "{} Added QR link #{}: {} -> {}",
        "✓".bold().green(),
        link.id,
        link.slug.cyan(),
        link.destination.blue().underline()
    );

    Ok(())
}
