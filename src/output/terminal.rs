// Colored terminal output for verdicts and provenance records.
//
// main.rs display code delegates here so the CLI commands stay short.

use colored::Colorize;

use crate::db::models::SocialLinkRecord;
use crate::registry::{VerificationResult, VerificationStatus};

/// Links longer than this are shortened in tables.
const LINK_DISPLAY_CHARS: usize = 60;

/// Display a verification verdict for one token.
pub fn display_verdict(token_mint: &str, result: &VerificationResult) {
    println!(
        "\n{}",
        format!("=== Socials check for {token_mint} ===").bold()
    );
    println!("  Status: {}", colorize_status(result.status));

    if result.duplicate_links.is_empty() {
        println!("  No links previously claimed by another token.");
        return;
    }

    println!(
        "\n  {} link(s) first claimed elsewhere:",
        result.duplicate_links.len()
    );
    for (platform, owner) in &result.duplicate_links {
        println!("    {} {:<10} first seen in {}", "!".red().bold(), platform, owner.bold());
    }
}

/// Display the provenance record for a single link.
pub fn display_record(record: &SocialLinkRecord) {
    println!(
        "\n{}",
        format!(
            "=== {} ===",
            super::truncate_chars(&record.normalized_link, LINK_DISPLAY_CHARS)
        )
        .bold()
    );
    println!("  Platform:   {}", record.platform_type);
    println!("  First seen: {}", record.first_seen_at.to_rfc3339());
    println!("  Owner:      {}", record.first_seen_in_token.bold());
}

/// Display the links a token holds as first claimant.
pub fn display_token_links(token_mint: &str, records: &[SocialLinkRecord]) {
    println!("\n{}", format!("=== Links first claimed by {token_mint} ===").bold());
    if records.is_empty() {
        println!("  None.");
        return;
    }
    for record in records {
        println!(
            "  {:<10} {}  {}",
            record.platform_type,
            super::truncate_chars(&record.normalized_link, LINK_DISPLAY_CHARS),
            record.first_seen_at.format("%Y-%m-%d %H:%M:%S").to_string().dimmed()
        );
    }
    println!("\n  {} link(s)", records.len());
}

/// Colorize a verification status.
fn colorize_status(status: VerificationStatus) -> colored::ColoredString {
    match status {
        VerificationStatus::Clean => status.as_str().green().bold(),
        VerificationStatus::CopyCat => status.as_str().red().bold(),
    }
}
