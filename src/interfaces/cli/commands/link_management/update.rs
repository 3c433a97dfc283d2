//! Update link command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::{LinkService, UpdateLinkRequest};

pub async fn update_link(
    links: &LinkService,
    slug: String,
    new_slug: Option<String>,
    destination: Option<String>,
    description: Option<String>,
) -> Result<(), CliError> {
    if new_slug.is_none() && destination.is_none() && description.is_none() {
        return Err(CliError::ParseError(
            "Nothing to update: pass --destination, --new-slug or --description".to_string(),
        ));
    }

    let current = links.get_link_by_slug(&slug).await?;
    let updated = links
        .update_link(
            current.id,
            UpdateLinkRequest {
                slug: new_slug,
                destination,
                description,
            },
        )
        .await?;

    println!(
        "{} Updated QR link #{}: {} -> {}",
        "✓".bold().green(),
        updated.id,
        updated.slug.cyan(),
        updated.destination.blue().underline()
    );
    if updated.slug != current.slug {
        println!(
            "  {} printed codes for '{}' will stop resolving",
            "⚠".bold().yellow(),
            current.slug.yellow()
        );
    }

    Ok(())
}
