//! List links command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::LinkService;

pub async fn list_links(links: &LinkService) -> Result<(), CliError> {
    let rows = links
        .list_links()
        .await
        .map_err(|e| CliError::CommandError(format!("Failed to load links: {}", e)))?;

    if rows.is_empty() {
        println!("{} No QR links found", "ℹ".bold().blue());
        return Ok(());
    }

    println!("{}", "QR link list:".bold().green());
    println!();
    for row in &rows {
        let mut info_parts = vec![format!(
            "#{} {} -> {}",
            row.link.id,
            row.link.slug.cyan(),
            row.link.destination.blue().underline()
        )];

        if let Some(ref description) = row.link.description {
            info_parts.push(format!("({})", description).dimmed().to_string());
        }

        info_parts.push(
            format!("(scans: {})", row.scans)
                .dimmed()
                .cyan()
                .to_string(),
        );

        println!("  {}", info_parts.join(" "));
    }
    println!();
    println!(
        "{} Total {} QR links",
        "ℹ".bold().blue(),
        rows.len().to_string().green()
    );

    Ok(())
}
