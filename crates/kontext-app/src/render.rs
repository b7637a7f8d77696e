use crossterm::style::Stylize;
use kontext_core::{BatchReport, CleanReport, CleanupReport, Listing, MergeReport};

const RULE_WIDTH: usize = 50;

pub fn batch(report: &BatchReport) -> String {
    let mut out = String::new();
    for ctx in &report.added {
        out.push_str(&format!("{} {} ({})\n", "✓".green(), ctx.name.as_str().bold(), ctx.server));
    }
    for failed in &report.failed {
        out.push_str(&format!("{} {}: {}\n", "×".red(), failed.name, failed.reason));
    }
    out.push_str(&format!("Added {} contexts, {} failed\n", report.added.len(), report.failed.len()));
    if let Some(current) = report.current_context() {
        out.push_str(&format!("Current context: {}\n", current.cyan()));
    }
    out
}

pub fn listing(listing: &Listing) -> String {
    let mut out = format!("{}\n", format!("===== Active Contexts ({}) =====", listing.contexts.len()).cyan());
    if listing.contexts.is_empty() {
        out.push_str(&format!("{}\n", "No contexts found.".yellow()));
    }

    for ctx in &listing.contexts {
        let marker = if ctx.current { "●".green() } else { "○".dark_grey() };
        let server = match &ctx.server {
            Some(server) => format!("({server})"),
            None => "(missing)".red().to_string(),
        };
        let user = if ctx.credential_present { String::new() } else { format!(" {}", "(missing)".red()) };
        out.push_str(&format!("\n{marker} {}\n", ctx.name.as_str().bold()));
        out.push_str(&format!("  ├─ {} {} {server}\n", "Cluster:".yellow(), ctx.cluster));
        out.push_str(&format!("  └─ {} {}{user}\n", "User:".yellow(), ctx.credential));
    }

    if !listing.has_orphans() {
        out.push_str(&format!("\n{}\n", "===== No Orphaned Resources =====".cyan()));
        out.push_str(&format!("{}\n", "All resources are properly referenced.".green()));
        return out;
    }

    out.push_str(&format!("\n{}\n", "===== Orphaned Resources =====".cyan()));
    if !listing.orphan_clusters.is_empty() {
        out.push_str(&format!("\n{}\n", format!("Unused Clusters ({}):", listing.orphan_clusters.len()).red()));
        for cluster in &listing.orphan_clusters {
            out.push_str(&format!("  × {} ({})\n", cluster.name, cluster.server));
        }
    }
    if !listing.orphan_credentials.is_empty() {
        out.push_str(&format!("\n{}\n", format!("Unused Users ({}):", listing.orphan_credentials.len()).red()));
        for name in &listing.orphan_credentials {
            out.push_str(&format!("  × {name}\n"));
        }
    }
    out
}

pub fn merge(report: &MergeReport) -> String {
    let mut out = batch(&report.batch);
    if !report.skipped_certificate.is_empty() {
        out.push_str(&format!(
            "{} Skipped {} certificate-based contexts: {}\n",
            "!".yellow(),
            report.skipped_certificate.len(),
            report.skipped_certificate.join(", ")
        ));
    }
    if !report.skipped_unresolved.is_empty() {
        out.push_str(&format!(
            "{} Skipped {} contexts with missing cluster or user: {}\n",
            "!".yellow(),
            report.skipped_unresolved.len(),
            report.skipped_unresolved.join(", ")
        ));
    }
    out
}

/// Per-item lines followed by a summary block.
pub fn cleanup(op: &str, report: &CleanupReport) -> String {
    if !report.persisted {
        return format!("{}\n", format!("[{op}] No invalid or orphaned resources found. Kubeconfig is healthy.").green());
    }

    let mut out = String::new();
    for name in &report.removed_contexts {
        out.push_str(&format!("{}\n", format!("  ✓ Removed context: {name}").red()));
    }
    if report.current_reset {
        out.push_str(&format!("{}\n", "  ✓ Cleared current context setting".red()));
    }
    for name in &report.removed.clusters {
        out.push_str(&format!("{}\n", format!("  ✓ Removed orphaned cluster: {name}").yellow()));
    }
    for name in &report.removed.credentials {
        out.push_str(&format!("{}\n", format!("  ✓ Removed orphaned user: {name}").yellow()));
    }

    let mut summary = format!("\n{op} Summary:\n");
    summary.push_str(&format!("  ✓ Removed contexts: {}\n", report.removed_contexts.len()));
    if report.current_reset {
        summary.push_str("  ✓ Current context reset\n");
    }
    summary.push_str(&format!("  ✓ Removed clusters: {}\n", report.removed.clusters.len()));
    summary.push_str(&format!("  ✓ Removed users: {}\n", report.removed.credentials.len()));
    if let Some(backup) = &report.backup {
        summary.push_str(&format!("  ✓ Backup saved at: {}\n", backup.display()));
    }
    summary.push_str(&"=".repeat(RULE_WIDTH));
    out.push_str(&format!("{}\n", summary.cyan()));
    out
}

pub fn clean(report: &CleanReport) -> String {
    let mut out = String::new();
    for invalid in &report.invalid {
        out.push_str(&format!("{} {}: {}\n", "×".red(), invalid.name, invalid.reason));
    }
    out.push_str(&cleanup("Clean", &report.cleanup));
    out
}

#[cfg(test)]
mod tests;
