use std::path::PathBuf;

use kontext_core::ops::{ContextEntry, FailedContext, OrphanCluster};
use kontext_core::{ContextConfig, InvalidContext, InvalidReason, Orphans};

use super::*;

fn entry(name: &str, server: Option<&str>, credential_present: bool, current: bool) -> ContextEntry {
    ContextEntry {
        name: name.into(),
        cluster: format!("{name}-cluster"),
        server: server.map(str::to_string),
        credential: format!("{name}-user"),
        credential_present,
        current,
    }
}

#[test]
fn batch_lists_added_and_failed() {
    let report = BatchReport {
        added: vec![
            ContextConfig::new("acp", "https://acp/global", "t"),
            ContextConfig::new("acp-edge", "https://acp/edge", "t"),
        ],
        failed: vec![FailedContext { name: "acp-ops".into(), reason: "user \"acp-ops\" already exists".into() }],
    };
    let out = batch(&report);
    assert!(out.contains("https://acp/edge"));
    assert!(out.contains("acp-ops"));
    assert!(out.contains("Added 2 contexts, 1 failed"));
    assert!(out.contains("acp-edge"));
}

#[test]
fn listing_marks_missing_references() {
    let view = Listing {
        current_context: "a".into(),
        contexts: vec![entry("a", Some("https://a"), true, true), entry("b", None, false, false)],
        orphan_clusters: vec![OrphanCluster { name: "cl3".into(), server: "https://cl3".into() }],
        orphan_credentials: vec![],
    };
    let out = listing(&view);
    assert!(out.contains("Active Contexts (2)"));
    assert!(out.contains("(https://a)"));
    assert_eq!(out.matches("(missing)").count(), 2);
    assert!(out.contains("Unused Clusters (1):"));
    assert!(out.contains("× cl3 (https://cl3)"));
    assert!(!out.contains("Unused Users"));
}

#[test]
fn empty_listing_is_healthy() {
    let out = listing(&Listing::default());
    assert!(out.contains("No contexts found."));
    assert!(out.contains("All resources are properly referenced."));
}

#[test]
fn merge_reports_skips() {
    let report = MergeReport {
        batch: BatchReport { added: vec![ContextConfig::new("prod-east", "https://east", "t")], failed: vec![] },
        skipped_certificate: vec!["west".into()],
        skipped_unresolved: vec![],
    };
    let out = merge(&report);
    assert!(out.contains("Skipped 1 certificate-based contexts: west"));
    assert!(!out.contains("missing cluster or user"));
}

#[test]
fn cleanup_summary_includes_backup() {
    let report = CleanupReport {
        removed_contexts: vec!["a".into()],
        current_reset: true,
        removed: Orphans { clusters: vec![], credentials: vec!["a-user".into()] },
        backup: Some(PathBuf::from("/home/me/.kube/config.backup-20260101-120000")),
        persisted: true,
    };
    let out = cleanup("Delete", &report);
    assert!(out.contains("Removed context: a"));
    assert!(out.contains("Removed orphaned user: a-user"));
    assert!(out.contains("Current context reset"));
    assert!(out.contains("Backup saved at: /home/me/.kube/config.backup-20260101-120000"));
}

#[test]
fn clean_without_changes_reports_healthy() {
    let out = clean(&CleanReport::default());
    assert!(out.contains("[Clean] No invalid or orphaned resources found"));
}

#[test]
fn clean_lists_invalid_contexts_with_reason() {
    let report = CleanReport {
        invalid: vec![InvalidContext { name: "a".into(), reason: InvalidReason::MissingCluster("gone".into()) }],
        cleanup: CleanupReport { removed_contexts: vec!["a".into()], persisted: true, ..Default::default() },
    };
    let out = clean(&report);
    assert!(out.contains("a: cluster \"gone\" is missing"));
    assert!(out.contains("Clean Summary:"));
}

#[test]
fn reports_are_newline_terminated_lines() {
    let report = BatchReport { added: vec![ContextConfig::new("dev", "https://dev", "t")], failed: vec![] };
    let out = batch(&report);
    assert_eq!(out.lines().count(), 3);
    assert!(out.ends_with('\n'));

    let report = CleanupReport { removed_contexts: vec!["a".into()], persisted: true, ..Default::default() };
    let out = cleanup("Delete", &report);
    assert!(out.contains(&"=".repeat(50)));
    assert!(out.ends_with('\n'));
}
