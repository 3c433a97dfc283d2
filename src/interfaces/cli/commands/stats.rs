//! Stats command

use colored::Colorize;

use crate::analytics::LinkStats;
use crate::interfaces::cli::CliError;
use crate::services::{LinkService, StatsService};

fn print_table(title: &str, rows: &[(String, u64)]) {
    println!("{}", title.bold());
    if rows.is_empty() {
        println!("  {}", "(none)".dimmed());
        return;
    }
    for (label, count) in rows {
        println!("  {:<24} {}", label, count.to_string().green());
    }
}

fn print_stats(stats: &LinkStats) {
    println!(
        "{} {}   {} {}",
        "Total scans:".bold(),
        stats.total.to_string().green(),
        "Last 7 days:".bold(),
        stats.last_7_days.to_string().green()
    );
    println!();
    print_table("Countries", &stats.countries);
    println!();
    print_table("Devices", &stats.devices);
    println!();
    print_table("Daily", &stats.daily);
}

pub async fn show_stats(
    links: &LinkService,
    stats: &StatsService,
    slug: String,
) -> Result<(), CliError> {
    let link = links.get_link_by_slug(&slug).await?;
    let report = stats.link_stats(link.id).await?;

    println!(
        "{} {} -> {}",
        "Stats for".bold().green(),
        link.slug.cyan(),
        link.destination.blue().underline()
    );
    println!();
    print_stats(&report);

    Ok(())
}
