//! The `oxwscont_conformance_tests!` macro and the report-based runner.
//!
//! The macro generates one `#[tokio::test]` function per scenario for any
//! [`ContactsAdapter`] implementation:
//!
//! ```rust,ignore
//! use protocheck_oxwscont::oxwscont_conformance_tests;
//!
//! oxwscont_conformance_tests!(MyAdapter::connect(), load_config());
//! ```
//!
//! Each generated test is named `conformance_sNN_tcNN_<description>` and can
//! be run with `cargo test conformance_`. [`run_conformance_suite`] runs the
//! same scenarios and returns a [`ConformanceReport`] instead of panicking.

use std::future::Future;
use std::sync::Arc;

use protocheck_harness::{ConformanceReport, Scenario, SuiteConfig, TestResult};

use crate::adapter::ContactsAdapter;
use crate::base::{ContactsSuite, DOC};
use crate::tests::{s01_create_get_delete, s02_update, s03_copy, s04_move, s07_user_photo};

/// Generate conformance tests for a contacts adapter.
///
/// `$adapter_expr` and `$config_expr` (a `SuiteConfig`) are evaluated fresh
/// for each test, so tests share no state and can run in any order.
#[macro_export]
macro_rules! oxwscont_conformance_tests {
    (@case $fn_name:ident, $case:literal, $scenario:path, $adapter_expr:expr, $config_expr:expr) => {
        #[tokio::test]
        async fn $fn_name() {
            let mut suite = $crate::base::ContactsSuite::new(
                $adapter_expr,
                ::std::sync::Arc::new($config_expr),
            );
            suite.begin($case).await;
            let result = $scenario(&mut suite).await;
            let (result, _) = suite.finish(result).await;
            $crate::harness::assert_scenario($case, result);
        }
    };
    ($adapter_expr:expr, $config_expr:expr) => {
        $crate::oxwscont_conformance_tests!(@case conformance_s01_tc01_contact_with_required_elements, "S01_TC01",
            $crate::tests::s01_create_get_delete::test_s01_tc01_contact_with_required_elements, $adapter_expr, $config_expr);
        $crate::oxwscont_conformance_tests!(@case conformance_s01_tc02_contact_with_all_elements, "S01_TC02",
            $crate::tests::s01_create_get_delete::test_s01_tc02_contact_with_all_elements, $adapter_expr, $config_expr);
        $crate::oxwscont_conformance_tests!(@case conformance_s01_tc03_email_address_keys, "S01_TC03",
            $crate::tests::s01_create_get_delete::test_s01_tc03_email_address_keys, $adapter_expr, $config_expr);
        $crate::oxwscont_conformance_tests!(@case conformance_s01_tc04_file_as_mappings, "S01_TC04",
            $crate::tests::s01_create_get_delete::test_s01_tc04_file_as_mappings, $adapter_expr, $config_expr);
        $crate::oxwscont_conformance_tests!(@case conformance_s01_tc05_im_address_keys, "S01_TC05",
            $crate::tests::s01_create_get_delete::test_s01_tc05_im_address_keys, $adapter_expr, $config_expr);
        $crate::oxwscont_conformance_tests!(@case conformance_s01_tc06_phone_number_keys, "S01_TC06",
            $crate::tests::s01_create_get_delete::test_s01_tc06_phone_number_keys, $adapter_expr, $config_expr);
        $crate::oxwscont_conformance_tests!(@case conformance_s01_tc07_postal_address_index, "S01_TC07",
            $crate::tests::s01_create_get_delete::test_s01_tc07_postal_address_index, $adapter_expr, $config_expr);
        $crate::oxwscont_conformance_tests!(@case conformance_s01_tc08_physical_address_keys, "S01_TC08",
            $crate::tests::s01_create_get_delete::test_s01_tc08_physical_address_keys, $adapter_expr, $config_expr);
        $crate::oxwscont_conformance_tests!(@case conformance_s01_tc09_create_in_drafts_folder, "S01_TC09",
            $crate::tests::s01_create_get_delete::test_s01_tc09_create_in_drafts_folder, $adapter_expr, $config_expr);
        $crate::oxwscont_conformance_tests!(@case conformance_s01_tc10_has_picture_is_read_only, "S01_TC10",
            $crate::tests::s01_create_get_delete::test_s01_tc10_has_picture_is_read_only, $adapter_expr, $config_expr);
        $crate::oxwscont_conformance_tests!(@case conformance_s01_tc11_create_in_inbox_folder, "S01_TC11",
            $crate::tests::s01_create_get_delete::test_s01_tc11_create_in_inbox_folder, $adapter_expr, $config_expr);
        $crate::oxwscont_conformance_tests!(@case conformance_s01_tc12_abch_person_item, "S01_TC12",
            $crate::tests::s01_create_get_delete::test_s01_tc12_abch_person_item, $adapter_expr, $config_expr);
        $crate::oxwscont_conformance_tests!(@case conformance_s01_tc13_batch_partial_failure, "S01_TC13",
            $crate::tests::s01_create_get_delete::test_s01_tc13_batch_partial_failure, $adapter_expr, $config_expr);
        $crate::oxwscont_conformance_tests!(@case conformance_s02_tc01_update_contact_fields, "S02_TC01",
            $crate::tests::s02_update::test_s02_tc01_update_contact_fields, $adapter_expr, $config_expr);
        $crate::oxwscont_conformance_tests!(@case conformance_s02_tc02_update_batch_partial_failure, "S02_TC02",
            $crate::tests::s02_update::test_s02_tc02_update_batch_partial_failure, $adapter_expr, $config_expr);
        $crate::oxwscont_conformance_tests!(@case conformance_s03_tc01_copy_contact, "S03_TC01",
            $crate::tests::s03_copy::test_s03_tc01_copy_contact, $adapter_expr, $config_expr);
        $crate::oxwscont_conformance_tests!(@case conformance_s04_tc01_move_contact, "S04_TC01",
            $crate::tests::s04_move::test_s04_tc01_move_contact, $adapter_expr, $config_expr);
        $crate::oxwscont_conformance_tests!(@case conformance_s07_tc01_set_user_photo, "S07_TC01",
            $crate::tests::s07_user_photo::test_s07_tc01_set_user_photo, $adapter_expr, $config_expr);
        $crate::oxwscont_conformance_tests!(@case conformance_s07_tc02_user_photo_sizes, "S07_TC02",
            $crate::tests::s07_user_photo::test_s07_tc02_user_photo_sizes, $adapter_expr, $config_expr);
        $crate::oxwscont_conformance_tests!(@case conformance_s07_tc03_change_user_photo, "S07_TC03",
            $crate::tests::s07_user_photo::test_s07_tc03_change_user_photo, $adapter_expr, $config_expr);
        $crate::oxwscont_conformance_tests!(@case conformance_s07_tc04_photo_of_unknown_mailbox, "S07_TC04",
            $crate::tests::s07_user_photo::test_s07_tc04_photo_of_unknown_mailbox, $adapter_expr, $config_expr);
    };
}

macro_rules! scenario {
    ($case:literal, $category:literal, $name:literal) => {
        Scenario {
            case: $case,
            category: $category,
            name: $name,
        }
    };
}

/// Every scenario in run order.
pub const SCENARIOS: &[Scenario] = &[
    scenario!("S01_TC01", "s01_create_get_delete", "s01_tc01_contact_with_required_elements"),
    scenario!("S01_TC02", "s01_create_get_delete", "s01_tc02_contact_with_all_elements"),
    scenario!("S01_TC03", "s01_create_get_delete", "s01_tc03_email_address_keys"),
    scenario!("S01_TC04", "s01_create_get_delete", "s01_tc04_file_as_mappings"),
    scenario!("S01_TC05", "s01_create_get_delete", "s01_tc05_im_address_keys"),
    scenario!("S01_TC06", "s01_create_get_delete", "s01_tc06_phone_number_keys"),
    scenario!("S01_TC07", "s01_create_get_delete", "s01_tc07_postal_address_index"),
    scenario!("S01_TC08", "s01_create_get_delete", "s01_tc08_physical_address_keys"),
    scenario!("S01_TC09", "s01_create_get_delete", "s01_tc09_create_in_drafts_folder"),
    scenario!("S01_TC10", "s01_create_get_delete", "s01_tc10_has_picture_is_read_only"),
    scenario!("S01_TC11", "s01_create_get_delete", "s01_tc11_create_in_inbox_folder"),
    scenario!("S01_TC12", "s01_create_get_delete", "s01_tc12_abch_person_item"),
    scenario!("S01_TC13", "s01_create_get_delete", "s01_tc13_batch_partial_failure"),
    scenario!("S02_TC01", "s02_update", "s02_tc01_update_contact_fields"),
    scenario!("S02_TC02", "s02_update", "s02_tc02_update_batch_partial_failure"),
    scenario!("S03_TC01", "s03_copy", "s03_tc01_copy_contact"),
    scenario!("S04_TC01", "s04_move", "s04_tc01_move_contact"),
    scenario!("S07_TC01", "s07_user_photo", "s07_tc01_set_user_photo"),
    scenario!("S07_TC02", "s07_user_photo", "s07_tc02_user_photo_sizes"),
    scenario!("S07_TC03", "s07_user_photo", "s07_tc03_change_user_photo"),
    scenario!("S07_TC04", "s07_user_photo", "s07_tc04_photo_of_unknown_mailbox"),
];

/// Run every scenario (or those `filter` selects) against adapters built by
/// `factory`, one fresh adapter per scenario.
pub async fn run_conformance_suite<A, F, Fut>(
    factory: F,
    config: Arc<SuiteConfig>,
    filter: Option<&str>,
) -> ConformanceReport
where
    A: ContactsAdapter,
    F: Fn() -> Fut,
    Fut: Future<Output = A>,
{
    let mut results = Vec::new();
    let mut scenarios = SCENARIOS.iter();

    macro_rules! run {
        ($scenario_fn:path) => {
            if let Some(scenario) = scenarios.next() {
                if scenario.matches(filter) {
                    let mut suite = ContactsSuite::new(factory().await, config.clone());
                    suite.begin(scenario.case).await;
                    let result = $scenario_fn(&mut suite).await;
                    let (result, captures) = suite.finish(result).await;
                    results.push(TestResult::from_result(
                        scenario.category,
                        scenario.name,
                        result,
                        captures,
                    ));
                }
            }
        };
    }

    run!(s01_create_get_delete::test_s01_tc01_contact_with_required_elements);
    run!(s01_create_get_delete::test_s01_tc02_contact_with_all_elements);
    run!(s01_create_get_delete::test_s01_tc03_email_address_keys);
    run!(s01_create_get_delete::test_s01_tc04_file_as_mappings);
    run!(s01_create_get_delete::test_s01_tc05_im_address_keys);
    run!(s01_create_get_delete::test_s01_tc06_phone_number_keys);
    run!(s01_create_get_delete::test_s01_tc07_postal_address_index);
    run!(s01_create_get_delete::test_s01_tc08_physical_address_keys);
    run!(s01_create_get_delete::test_s01_tc09_create_in_drafts_folder);
    run!(s01_create_get_delete::test_s01_tc10_has_picture_is_read_only);
    run!(s01_create_get_delete::test_s01_tc11_create_in_inbox_folder);
    run!(s01_create_get_delete::test_s01_tc12_abch_person_item);
    run!(s01_create_get_delete::test_s01_tc13_batch_partial_failure);
    run!(s02_update::test_s02_tc01_update_contact_fields);
    run!(s02_update::test_s02_tc02_update_batch_partial_failure);
    run!(s03_copy::test_s03_tc01_copy_contact);
    run!(s04_move::test_s04_tc01_move_contact);
    run!(s07_user_photo::test_s07_tc01_set_user_photo);
    run!(s07_user_photo::test_s07_tc02_user_photo_sizes);
    run!(s07_user_photo::test_s07_tc03_change_user_photo);
    run!(s07_user_photo::test_s07_tc04_photo_of_unknown_mailbox);

    ConformanceReport::from_results(DOC, results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_table_is_unique_and_ordered() {
        let mut cases: Vec<&str> = SCENARIOS.iter().map(|s| s.case).collect();
        let listed = cases.clone();
        cases.sort_unstable();
        cases.dedup();
        assert_eq!(cases, listed);
        assert_eq!(SCENARIOS.len(), 21);
    }

    #[test]
    fn names_carry_their_case_id() {
        for scenario in SCENARIOS {
            assert!(
                scenario.name.starts_with(&scenario.case.to_ascii_lowercase()),
                "{}",
                scenario.name
            );
        }
    }
}
