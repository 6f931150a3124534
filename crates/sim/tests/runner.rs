//! Report-based runs of both suites against shared reference servers.

mod common;

use std::sync::Arc;

use protocheck_harness::{ConformanceReport, Outcome, SuiteConfig};
use protocheck_sim::{InMemoryMailbox, InMemorySharePoint, Quirk, ServerProfile};

async fn run_contacts(server: &InMemoryMailbox, config: SuiteConfig) -> ConformanceReport {
    protocheck_oxwscont::run_conformance_suite(
        || async move { server.session() },
        Arc::new(config),
        None,
    )
    .await
}

async fn run_webs(server: &InMemorySharePoint, filter: Option<&str>) -> ConformanceReport {
    protocheck_webss::run_conformance_suite(
        || async move { server.session() },
        Arc::new(common::webs_config()),
        filter,
    )
    .await
}

fn failed(report: &ConformanceReport, name: &str) -> bool {
    report
        .result(name)
        .is_some_and(|r| r.outcome == Outcome::Failed)
}

fn failures(report: &ConformanceReport) -> Vec<String> {
    report
        .results
        .iter()
        .filter(|r| r.outcome == Outcome::Failed)
        .map(|r| format!("{}: {}", r.name, r.message.as_deref().unwrap_or("")))
        .collect()
}

#[tokio::test]
async fn contacts_suite_passes_and_cleans_up() {
    let server = common::mailbox(ServerProfile::reference());
    let report = run_contacts(&server, common::contacts_config()).await;

    assert_eq!(report.total, protocheck_oxwscont::SCENARIOS.len());
    assert!(failures(&report).is_empty(), "{:?}", failures(&report));
    assert_eq!(report.inconclusive, 0);
    assert_eq!(server.item_count().await, 0);
    assert!(report.requirements().values().all(|satisfied| *satisfied));
}

#[tokio::test]
async fn webs_suite_passes_and_cleans_up() {
    let server = common::sharepoint(ServerProfile::reference());
    let report = run_webs(&server, None).await;

    assert_eq!(report.total, protocheck_webss::SCENARIOS.len());
    assert!(failures(&report).is_empty(), "{:?}", failures(&report));
    assert!(server.custom_content_types().await.is_empty());
    assert_eq!(server.column_names().await, vec!["Title"]);
    assert!(server.customized_css().await.is_empty());
}

#[tokio::test]
async fn legacy_servers_leave_newer_scenarios_inconclusive() {
    let config = common::contacts_2010_config();
    let mailbox = InMemoryMailbox::new(&config, ServerProfile::legacy()).unwrap();
    let report = run_contacts(&mailbox, config).await;
    assert!(failures(&report).is_empty(), "{:?}", failures(&report));
    for name in [
        "s01_tc10_has_picture_is_read_only",
        "s01_tc12_abch_person_item",
        "s07_tc01_set_user_photo",
        "s07_tc04_photo_of_unknown_mailbox",
    ] {
        assert_eq!(report.result(name).unwrap().outcome, Outcome::Inconclusive, "{}", name);
    }
}

#[tokio::test]
async fn sp2013_layer_moves_the_customized_page() {
    let config = common::webs_sp2013_config();
    let server = InMemorySharePoint::new(&config, ServerProfile::reference()).unwrap();
    let shared = &server;
    let report = protocheck_webss::run_conformance_suite(
        || async move { shared.session() },
        Arc::new(config),
        None,
    )
    .await;
    assert!(failures(&report).is_empty(), "{:?}", failures(&report));
    assert!(report
        .results
        .iter()
        .filter(|r| r.category == "s05_object_ids")
        .all(|r| r.outcome == Outcome::Inconclusive));
    assert!(server.customized_css().await.is_empty());
}

#[tokio::test]
async fn update_responses_are_checked_without_the_update_flag() {
    let without_flag = "[requirements.\"MS-WEBSS\"]\nR1038 = false\n";
    let config = common::webs_config()
        .layer(SuiteConfig::from_toml_str(without_flag, "no-update-flag").unwrap());
    let server = InMemorySharePoint::new(&config, ServerProfile::reference()).unwrap();
    let shared = &server;
    let report = protocheck_webss::run_conformance_suite(
        || async move { shared.session() },
        Arc::new(config),
        Some("s01_tc18"),
    )
    .await;

    assert_eq!(report.total, 1);
    let result = report.result("s01_tc18_update_method_results").unwrap();
    assert_eq!(result.outcome, Outcome::Passed, "{:?}", result.message);
    let captured: Vec<String> = result
        .captures
        .iter()
        .map(|c| c.requirement.to_string())
        .collect();
    for id in ["MS-WEBSS_R555", "MS-WEBSS_R529", "MS-WEBSS_R530", "MS-WEBSS_R565"] {
        assert!(captured.iter().any(|c| c == id), "{} missing from {:?}", id, captured);
    }
    assert!(!captured.iter().any(|c| c == "MS-WEBSS_R1038"));
}

#[tokio::test]
async fn filter_selects_scenarios() {
    let server = common::sharepoint(ServerProfile::reference());
    let report = run_webs(&server, Some("s08_css")).await;
    assert_eq!(report.total, 10);
    assert!(report.results.iter().all(|r| r.category == "s08_css"));
}

#[tokio::test]
async fn quirky_mailbox_is_reported() {
    let server = common::mailbox(ServerProfile::quirky());
    let report = run_contacts(&server, common::contacts_config()).await;

    assert!(failed(&report, "s01_tc01_contact_with_required_elements"));
    assert!(failed(&report, "s01_tc09_create_in_drafts_folder"));
    assert!(failed(&report, "s01_tc11_create_in_inbox_folder"));
    assert!(report.failed >= 3);
}

#[tokio::test]
async fn quirky_site_collection_is_reported() {
    let server = common::sharepoint(ServerProfile::quirky());
    let report = run_webs(&server, None).await;

    assert!(failed(&report, "s01_tc04_version_increments_on_update"));
    for name in [
        "s01_tc08_display_name_too_long",
        "s01_tc09_display_name_begins_with_whitespace",
        "s01_tc10_display_name_ends_with_period",
        "s01_tc11_display_name_ends_with_whitespace",
        "s01_tc12_display_name_invalid_characters",
        "s01_tc13_display_name_double_period",
    ] {
        assert!(failed(&report, name), "{} should fail", name);
    }
    let unauthenticated: Vec<_> = report
        .results
        .iter()
        .filter(|r| r.name.contains("unauthenticated"))
        .collect();
    assert_eq!(unauthenticated.len(), 14);
    assert!(unauthenticated.iter().all(|r| r.outcome == Outcome::Failed));
}

#[tokio::test]
async fn single_quirk_fails_only_its_scenarios() {
    let server = common::sharepoint(
        ServerProfile::reference().with_quirk(Quirk::StaleContentTypeVersions),
    );
    let report = run_webs(&server, None).await;
    assert_eq!(failures(&report).len(), 1, "{:?}", failures(&report));
    assert!(failed(&report, "s01_tc04_version_increments_on_update"));
}
