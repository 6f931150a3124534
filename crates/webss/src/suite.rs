//! The `webss_conformance_tests!` macro and the report-based runner.
//!
//! The macro generates one `#[tokio::test]` function per scenario for any
//! [`WebsServer`] implementation:
//!
//! ```rust,ignore
//! use protocheck_webss::webss_conformance_tests;
//!
//! webss_conformance_tests!(MyServer::connect(), load_config());
//! ```
//!
//! [`run_conformance_suite`] runs the same scenarios and returns a
//! [`ConformanceReport`].

use std::future::Future;
use std::sync::Arc;

use protocheck_harness::{ConformanceReport, Scenario, SuiteConfig, TestResult};

use crate::adapter::WebsServer;
use crate::base::{WebsSuite, DOC};
use crate::tests::{
    s01_content_types, s02_xml_documents, s03_features, s04_files, s05_object_ids,
    s06_pages, s07_columns, s08_css, s09_webs,
};

/// Generate conformance tests for an MS-WEBSS server binding.
///
/// `$adapter_expr` and `$config_expr` (a `SuiteConfig`) are evaluated fresh
/// for each test.
#[macro_export]
macro_rules! webss_conformance_tests {
    (@case $fn_name:ident, $case:literal, $scenario:path, $adapter_expr:expr, $config_expr:expr) => {
        #[tokio::test]
        async fn $fn_name() {
            let mut suite = $crate::base::WebsSuite::new(
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
        $crate::webss_conformance_tests!(@case conformance_s01_tc01_create_content_type, "S01_TC01",
            $crate::tests::s01_content_types::test_s01_tc01_create_content_type, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s01_tc02_delete_content_type, "S01_TC02",
            $crate::tests::s01_content_types::test_s01_tc02_delete_content_type, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s01_tc03_content_type_elements, "S01_TC03",
            $crate::tests::s01_content_types::test_s01_tc03_content_type_elements, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s01_tc04_version_increments_on_update, "S01_TC04",
            $crate::tests::s01_content_types::test_s01_tc04_version_increments_on_update, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s01_tc05_update_with_unknown_delete_field, "S01_TC05",
            $crate::tests::s01_content_types::test_s01_tc05_update_with_unknown_delete_field, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s01_tc06_update_returns_list_properties, "S01_TC06",
            $crate::tests::s01_content_types::test_s01_tc06_update_returns_list_properties, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s01_tc07_invalid_parent_type, "S01_TC07",
            $crate::tests::s01_content_types::test_s01_tc07_invalid_parent_type, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s01_tc08_display_name_too_long, "S01_TC08",
            $crate::tests::s01_content_types::test_s01_tc08_display_name_too_long, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s01_tc09_display_name_begins_with_whitespace, "S01_TC09",
            $crate::tests::s01_content_types::test_s01_tc09_display_name_begins_with_whitespace, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s01_tc10_display_name_ends_with_period, "S01_TC10",
            $crate::tests::s01_content_types::test_s01_tc10_display_name_ends_with_period, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s01_tc11_display_name_ends_with_whitespace, "S01_TC11",
            $crate::tests::s01_content_types::test_s01_tc11_display_name_ends_with_whitespace, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s01_tc12_display_name_invalid_characters, "S01_TC12",
            $crate::tests::s01_content_types::test_s01_tc12_display_name_invalid_characters, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s01_tc13_display_name_double_period, "S01_TC13",
            $crate::tests::s01_content_types::test_s01_tc13_display_name_double_period, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s01_tc14_get_content_type_without_id, "S01_TC14",
            $crate::tests::s01_content_types::test_s01_tc14_get_content_type_without_id, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s01_tc15_get_unknown_content_type, "S01_TC15",
            $crate::tests::s01_content_types::test_s01_tc15_get_unknown_content_type, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s01_tc16_update_unknown_content_type, "S01_TC16",
            $crate::tests::s01_content_types::test_s01_tc16_update_unknown_content_type, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s01_tc17_duplicate_display_name, "S01_TC17",
            $crate::tests::s01_content_types::test_s01_tc17_duplicate_display_name, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s01_tc18_update_method_results, "S01_TC18",
            $crate::tests::s01_content_types::test_s01_tc18_update_method_results, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s01_tc19_delete_invalid_id, "S01_TC19",
            $crate::tests::s01_content_types::test_s01_tc19_delete_invalid_id, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s01_tc20_delete_read_only, "S01_TC20",
            $crate::tests::s01_content_types::test_s01_tc20_delete_read_only, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s01_tc21_unauthenticated, "S01_TC21",
            $crate::tests::s01_content_types::test_s01_tc21_unauthenticated, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s01_tc22_invalid_parent_and_name, "S01_TC22",
            $crate::tests::s01_content_types::test_s01_tc22_invalid_parent_and_name, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s02_tc01_remove_with_empty_content_type_id, "S02_TC01",
            $crate::tests::s02_xml_documents::test_s02_tc01_remove_with_empty_content_type_id, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s02_tc02_update_unauthenticated, "S02_TC02",
            $crate::tests::s02_xml_documents::test_s02_tc02_update_unauthenticated, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s02_tc03_update_unknown_content_type, "S02_TC03",
            $crate::tests::s02_xml_documents::test_s02_tc03_update_unknown_content_type, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s02_tc04_update_malformed_document, "S02_TC04",
            $crate::tests::s02_xml_documents::test_s02_tc04_update_malformed_document, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s02_tc05_remove_unauthenticated, "S02_TC05",
            $crate::tests::s02_xml_documents::test_s02_tc05_remove_unauthenticated, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s02_tc06_remove_xml_document, "S02_TC06",
            $crate::tests::s02_xml_documents::test_s02_tc06_remove_xml_document, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s02_tc07_update_xml_document, "S02_TC07",
            $crate::tests::s02_xml_documents::test_s02_tc07_update_xml_document, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s03_tc01_activated_features, "S03_TC01",
            $crate::tests::s03_features::test_s03_tc01_activated_features, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s03_tc02_list_templates, "S03_TC02",
            $crate::tests::s03_features::test_s03_tc02_list_templates, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s03_tc03_unauthenticated, "S03_TC03",
            $crate::tests::s03_features::test_s03_tc03_unauthenticated, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s04_tc01_revert_all_file_content_streams, "S04_TC01",
            $crate::tests::s04_files::test_s04_tc01_revert_all_file_content_streams, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s04_tc02_revert_file_content_stream, "S04_TC02",
            $crate::tests::s04_files::test_s04_tc02_revert_file_content_stream, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s04_tc03_invalid_page_url, "S04_TC03",
            $crate::tests::s04_files::test_s04_tc03_invalid_page_url, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s04_tc04_invalid_site_url, "S04_TC04",
            $crate::tests::s04_files::test_s04_tc04_invalid_site_url, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s04_tc05_parent_site_page, "S04_TC05",
            $crate::tests::s04_files::test_s04_tc05_parent_site_page, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s04_tc06_empty_url, "S04_TC06",
            $crate::tests::s04_files::test_s04_tc06_empty_url, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s04_tc07_missing_url, "S04_TC07",
            $crate::tests::s04_files::test_s04_tc07_missing_url, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s04_tc08_not_part_of_site_definition, "S04_TC08",
            $crate::tests::s04_files::test_s04_tc08_not_part_of_site_definition, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s04_tc09_not_a_page_of_context_site, "S04_TC09",
            $crate::tests::s04_files::test_s04_tc09_not_a_page_of_context_site, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s04_tc10_revert_all_unauthenticated, "S04_TC10",
            $crate::tests::s04_files::test_s04_tc10_revert_all_unauthenticated, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s04_tc11_revert_file_unauthenticated, "S04_TC11",
            $crate::tests::s04_files::test_s04_tc11_revert_file_unauthenticated, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s05_tc01_list_url, "S05_TC01",
            $crate::tests::s05_object_ids::test_s05_tc01_list_url, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s05_tc02_list_item_url, "S05_TC02",
            $crate::tests::s05_object_ids::test_s05_tc02_list_item_url, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s05_tc03_no_list_related_url, "S05_TC03",
            $crate::tests::s05_object_ids::test_s05_tc03_no_list_related_url, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s05_tc04_invalid_url, "S05_TC04",
            $crate::tests::s05_object_ids::test_s05_tc04_invalid_url, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s05_tc05_unauthenticated, "S05_TC05",
            $crate::tests::s05_object_ids::test_s05_tc05_unauthenticated, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s06_tc01_customized_page_status, "S06_TC01",
            $crate::tests::s06_pages::test_s06_tc01_customized_page_status, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s06_tc02_web_url_from_page_url, "S06_TC02",
            $crate::tests::s06_pages::test_s06_tc02_web_url_from_page_url, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s06_tc03_web_url_from_invalid_page_url, "S06_TC03",
            $crate::tests::s06_pages::test_s06_tc03_web_url_from_invalid_page_url, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s07_tc01_invalid_field_definition, "S07_TC01",
            $crate::tests::s07_columns::test_s07_tc01_invalid_field_definition, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s07_tc02_get_columns_with_invalid_column, "S07_TC02",
            $crate::tests::s07_columns::test_s07_tc02_get_columns_with_invalid_column, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s07_tc03_all_fields_valid, "S07_TC03",
            $crate::tests::s07_columns::test_s07_tc03_all_fields_valid, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s07_tc04_no_matching_name, "S07_TC04",
            $crate::tests::s07_columns::test_s07_tc04_no_matching_name, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s07_tc05_get_columns_unauthenticated, "S07_TC05",
            $crate::tests::s07_columns::test_s07_tc05_get_columns_unauthenticated, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s07_tc06_update_columns_unauthenticated, "S07_TC06",
            $crate::tests::s07_columns::test_s07_tc06_update_columns_unauthenticated, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s07_tc07_multiple_new_methods, "S07_TC07",
            $crate::tests::s07_columns::test_s07_tc07_multiple_new_methods, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s07_tc08_multiple_update_methods, "S07_TC08",
            $crate::tests::s07_columns::test_s07_tc08_multiple_update_methods, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s07_tc09_multiple_delete_methods, "S07_TC09",
            $crate::tests::s07_columns::test_s07_tc09_multiple_delete_methods, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s07_tc10_existing_column, "S07_TC10",
            $crate::tests::s07_columns::test_s07_tc10_existing_column, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s07_tc11_nonexistent_column, "S07_TC11",
            $crate::tests::s07_columns::test_s07_tc11_nonexistent_column, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s07_tc12_invalid_guid, "S07_TC12",
            $crate::tests::s07_columns::test_s07_tc12_invalid_guid, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s07_tc13_no_name_or_display_name, "S07_TC13",
            $crate::tests::s07_columns::test_s07_tc13_no_name_or_display_name, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s08_tc01_customize_css_unauthenticated, "S08_TC01",
            $crate::tests::s08_css::test_s08_tc01_customize_css_unauthenticated, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s08_tc02_revert_nonexistent_css, "S08_TC02",
            $crate::tests::s08_css::test_s08_tc02_revert_nonexistent_css, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s08_tc03_customize_blank_css, "S08_TC03",
            $crate::tests::s08_css::test_s08_tc03_customize_blank_css, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s08_tc04_customize_css_without_extension, "S08_TC04",
            $crate::tests::s08_css::test_s08_tc04_customize_css_without_extension, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s08_tc05_customize_nonexistent_css, "S08_TC05",
            $crate::tests::s08_css::test_s08_tc05_customize_nonexistent_css, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s08_tc06_customize_css_with_asterisk, "S08_TC06",
            $crate::tests::s08_css::test_s08_tc06_customize_css_with_asterisk, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s08_tc07_revert_css_unauthenticated, "S08_TC07",
            $crate::tests::s08_css::test_s08_tc07_revert_css_unauthenticated, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s08_tc08_revert_css, "S08_TC08",
            $crate::tests::s08_css::test_s08_tc08_revert_css, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s08_tc09_revert_blank_css, "S08_TC09",
            $crate::tests::s08_css::test_s08_tc09_revert_blank_css, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s08_tc10_css_file_name_must_match, "S08_TC10",
            $crate::tests::s08_css::test_s08_tc10_css_file_name_must_match, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s09_tc01_get_web_unauthenticated, "S09_TC01",
            $crate::tests::s09_webs::test_s09_tc01_get_web_unauthenticated, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s09_tc02_get_web, "S09_TC02",
            $crate::tests::s09_webs::test_s09_tc02_get_web, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s09_tc03_get_web_invalid_url, "S09_TC03",
            $crate::tests::s09_webs::test_s09_tc03_get_web_invalid_url, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s09_tc04_get_web_without_url, "S09_TC04",
            $crate::tests::s09_webs::test_s09_tc04_get_web_without_url, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s09_tc05_get_web_collection_unauthenticated, "S09_TC05",
            $crate::tests::s09_webs::test_s09_tc05_get_web_collection_unauthenticated, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s09_tc06_get_web_collection, "S09_TC06",
            $crate::tests::s09_webs::test_s09_tc06_get_web_collection, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s09_tc07_get_all_sub_webs_unauthenticated, "S09_TC07",
            $crate::tests::s09_webs::test_s09_tc07_get_all_sub_webs_unauthenticated, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s09_tc08_get_all_sub_web_collection, "S09_TC08",
            $crate::tests::s09_webs::test_s09_tc08_get_all_sub_web_collection, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s09_tc09_web_definition, "S09_TC09",
            $crate::tests::s09_webs::test_s09_tc09_web_definition, $adapter_expr, $config_expr);
        $crate::webss_conformance_tests!(@case conformance_s09_tc10_get_web_response, "S09_TC10",
            $crate::tests::s09_webs::test_s09_tc10_get_web_response, $adapter_expr, $config_expr);
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
    scenario!("S01_TC01", "s01_content_types", "s01_tc01_create_content_type"),
    scenario!("S01_TC02", "s01_content_types", "s01_tc02_delete_content_type"),
    scenario!("S01_TC03", "s01_content_types", "s01_tc03_content_type_elements"),
    scenario!("S01_TC04", "s01_content_types", "s01_tc04_version_increments_on_update"),
    scenario!("S01_TC05", "s01_content_types", "s01_tc05_update_with_unknown_delete_field"),
    scenario!("S01_TC06", "s01_content_types", "s01_tc06_update_returns_list_properties"),
    scenario!("S01_TC07", "s01_content_types", "s01_tc07_invalid_parent_type"),
    scenario!("S01_TC08", "s01_content_types", "s01_tc08_display_name_too_long"),
    scenario!("S01_TC09", "s01_content_types", "s01_tc09_display_name_begins_with_whitespace"),
    scenario!("S01_TC10", "s01_content_types", "s01_tc10_display_name_ends_with_period"),
    scenario!("S01_TC11", "s01_content_types", "s01_tc11_display_name_ends_with_whitespace"),
    scenario!("S01_TC12", "s01_content_types", "s01_tc12_display_name_invalid_characters"),
    scenario!("S01_TC13", "s01_content_types", "s01_tc13_display_name_double_period"),
    scenario!("S01_TC14", "s01_content_types", "s01_tc14_get_content_type_without_id"),
    scenario!("S01_TC15", "s01_content_types", "s01_tc15_get_unknown_content_type"),
    scenario!("S01_TC16", "s01_content_types", "s01_tc16_update_unknown_content_type"),
    scenario!("S01_TC17", "s01_content_types", "s01_tc17_duplicate_display_name"),
    scenario!("S01_TC18", "s01_content_types", "s01_tc18_update_method_results"),
    scenario!("S01_TC19", "s01_content_types", "s01_tc19_delete_invalid_id"),
    scenario!("S01_TC20", "s01_content_types", "s01_tc20_delete_read_only"),
    scenario!("S01_TC21", "s01_content_types", "s01_tc21_unauthenticated"),
    scenario!("S01_TC22", "s01_content_types", "s01_tc22_invalid_parent_and_name"),
    scenario!("S02_TC01", "s02_xml_documents", "s02_tc01_remove_with_empty_content_type_id"),
    scenario!("S02_TC02", "s02_xml_documents", "s02_tc02_update_unauthenticated"),
    scenario!("S02_TC03", "s02_xml_documents", "s02_tc03_update_unknown_content_type"),
    scenario!("S02_TC04", "s02_xml_documents", "s02_tc04_update_malformed_document"),
    scenario!("S02_TC05", "s02_xml_documents", "s02_tc05_remove_unauthenticated"),
    scenario!("S02_TC06", "s02_xml_documents", "s02_tc06_remove_xml_document"),
    scenario!("S02_TC07", "s02_xml_documents", "s02_tc07_update_xml_document"),
    scenario!("S03_TC01", "s03_features", "s03_tc01_activated_features"),
    scenario!("S03_TC02", "s03_features", "s03_tc02_list_templates"),
    scenario!("S03_TC03", "s03_features", "s03_tc03_unauthenticated"),
    scenario!("S04_TC01", "s04_files", "s04_tc01_revert_all_file_content_streams"),
    scenario!("S04_TC02", "s04_files", "s04_tc02_revert_file_content_stream"),
    scenario!("S04_TC03", "s04_files", "s04_tc03_invalid_page_url"),
    scenario!("S04_TC04", "s04_files", "s04_tc04_invalid_site_url"),
    scenario!("S04_TC05", "s04_files", "s04_tc05_parent_site_page"),
    scenario!("S04_TC06", "s04_files", "s04_tc06_empty_url"),
    scenario!("S04_TC07", "s04_files", "s04_tc07_missing_url"),
    scenario!("S04_TC08", "s04_files", "s04_tc08_not_part_of_site_definition"),
    scenario!("S04_TC09", "s04_files", "s04_tc09_not_a_page_of_context_site"),
    scenario!("S04_TC10", "s04_files", "s04_tc10_revert_all_unauthenticated"),
    scenario!("S04_TC11", "s04_files", "s04_tc11_revert_file_unauthenticated"),
    scenario!("S05_TC01", "s05_object_ids", "s05_tc01_list_url"),
    scenario!("S05_TC02", "s05_object_ids", "s05_tc02_list_item_url"),
    scenario!("S05_TC03", "s05_object_ids", "s05_tc03_no_list_related_url"),
    scenario!("S05_TC04", "s05_object_ids", "s05_tc04_invalid_url"),
    scenario!("S05_TC05", "s05_object_ids", "s05_tc05_unauthenticated"),
    scenario!("S06_TC01", "s06_pages", "s06_tc01_customized_page_status"),
    scenario!("S06_TC02", "s06_pages", "s06_tc02_web_url_from_page_url"),
    scenario!("S06_TC03", "s06_pages", "s06_tc03_web_url_from_invalid_page_url"),
    scenario!("S07_TC01", "s07_columns", "s07_tc01_invalid_field_definition"),
    scenario!("S07_TC02", "s07_columns", "s07_tc02_get_columns_with_invalid_column"),
    scenario!("S07_TC03", "s07_columns", "s07_tc03_all_fields_valid"),
    scenario!("S07_TC04", "s07_columns", "s07_tc04_no_matching_name"),
    scenario!("S07_TC05", "s07_columns", "s07_tc05_get_columns_unauthenticated"),
    scenario!("S07_TC06", "s07_columns", "s07_tc06_update_columns_unauthenticated"),
    scenario!("S07_TC07", "s07_columns", "s07_tc07_multiple_new_methods"),
    scenario!("S07_TC08", "s07_columns", "s07_tc08_multiple_update_methods"),
    scenario!("S07_TC09", "s07_columns", "s07_tc09_multiple_delete_methods"),
    scenario!("S07_TC10", "s07_columns", "s07_tc10_existing_column"),
    scenario!("S07_TC11", "s07_columns", "s07_tc11_nonexistent_column"),
    scenario!("S07_TC12", "s07_columns", "s07_tc12_invalid_guid"),
    scenario!("S07_TC13", "s07_columns", "s07_tc13_no_name_or_display_name"),
    scenario!("S08_TC01", "s08_css", "s08_tc01_customize_css_unauthenticated"),
    scenario!("S08_TC02", "s08_css", "s08_tc02_revert_nonexistent_css"),
    scenario!("S08_TC03", "s08_css", "s08_tc03_customize_blank_css"),
    scenario!("S08_TC04", "s08_css", "s08_tc04_customize_css_without_extension"),
    scenario!("S08_TC05", "s08_css", "s08_tc05_customize_nonexistent_css"),
    scenario!("S08_TC06", "s08_css", "s08_tc06_customize_css_with_asterisk"),
    scenario!("S08_TC07", "s08_css", "s08_tc07_revert_css_unauthenticated"),
    scenario!("S08_TC08", "s08_css", "s08_tc08_revert_css"),
    scenario!("S08_TC09", "s08_css", "s08_tc09_revert_blank_css"),
    scenario!("S08_TC10", "s08_css", "s08_tc10_css_file_name_must_match"),
    scenario!("S09_TC01", "s09_webs", "s09_tc01_get_web_unauthenticated"),
    scenario!("S09_TC02", "s09_webs", "s09_tc02_get_web"),
    scenario!("S09_TC03", "s09_webs", "s09_tc03_get_web_invalid_url"),
    scenario!("S09_TC04", "s09_webs", "s09_tc04_get_web_without_url"),
    scenario!("S09_TC05", "s09_webs", "s09_tc05_get_web_collection_unauthenticated"),
    scenario!("S09_TC06", "s09_webs", "s09_tc06_get_web_collection"),
    scenario!("S09_TC07", "s09_webs", "s09_tc07_get_all_sub_webs_unauthenticated"),
    scenario!("S09_TC08", "s09_webs", "s09_tc08_get_all_sub_web_collection"),
    scenario!("S09_TC09", "s09_webs", "s09_tc09_web_definition"),
    scenario!("S09_TC10", "s09_webs", "s09_tc10_get_web_response"),
];

/// Run every scenario (or those `filter` selects) against servers built by
/// `factory`, one fresh binding per scenario.
pub async fn run_conformance_suite<A, F, Fut>(
    factory: F,
    config: Arc<SuiteConfig>,
    filter: Option<&str>,
) -> ConformanceReport
where
    A: WebsServer,
    F: Fn() -> Fut,
    Fut: Future<Output = A>,
{
    let mut results = Vec::new();
    let mut scenarios = SCENARIOS.iter();

    macro_rules! run {
        ($scenario_fn:path) => {
            if let Some(scenario) = scenarios.next() {
                if scenario.matches(filter) {
                    let mut suite = WebsSuite::new(factory().await, config.clone());
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

    run!(s01_content_types::test_s01_tc01_create_content_type);
    run!(s01_content_types::test_s01_tc02_delete_content_type);
    run!(s01_content_types::test_s01_tc03_content_type_elements);
    run!(s01_content_types::test_s01_tc04_version_increments_on_update);
    run!(s01_content_types::test_s01_tc05_update_with_unknown_delete_field);
    run!(s01_content_types::test_s01_tc06_update_returns_list_properties);
    run!(s01_content_types::test_s01_tc07_invalid_parent_type);
    run!(s01_content_types::test_s01_tc08_display_name_too_long);
    run!(s01_content_types::test_s01_tc09_display_name_begins_with_whitespace);
    run!(s01_content_types::test_s01_tc10_display_name_ends_with_period);
    run!(s01_content_types::test_s01_tc11_display_name_ends_with_whitespace);
    run!(s01_content_types::test_s01_tc12_display_name_invalid_characters);
    run!(s01_content_types::test_s01_tc13_display_name_double_period);
    run!(s01_content_types::test_s01_tc14_get_content_type_without_id);
    run!(s01_content_types::test_s01_tc15_get_unknown_content_type);
    run!(s01_content_types::test_s01_tc16_update_unknown_content_type);
    run!(s01_content_types::test_s01_tc17_duplicate_display_name);
    run!(s01_content_types::test_s01_tc18_update_method_results);
    run!(s01_content_types::test_s01_tc19_delete_invalid_id);
    run!(s01_content_types::test_s01_tc20_delete_read_only);
    run!(s01_content_types::test_s01_tc21_unauthenticated);
    run!(s01_content_types::test_s01_tc22_invalid_parent_and_name);
    run!(s02_xml_documents::test_s02_tc01_remove_with_empty_content_type_id);
    run!(s02_xml_documents::test_s02_tc02_update_unauthenticated);
    run!(s02_xml_documents::test_s02_tc03_update_unknown_content_type);
    run!(s02_xml_documents::test_s02_tc04_update_malformed_document);
    run!(s02_xml_documents::test_s02_tc05_remove_unauthenticated);
    run!(s02_xml_documents::test_s02_tc06_remove_xml_document);
    run!(s02_xml_documents::test_s02_tc07_update_xml_document);
    run!(s03_features::test_s03_tc01_activated_features);
    run!(s03_features::test_s03_tc02_list_templates);
    run!(s03_features::test_s03_tc03_unauthenticated);
    run!(s04_files::test_s04_tc01_revert_all_file_content_streams);
    run!(s04_files::test_s04_tc02_revert_file_content_stream);
    run!(s04_files::test_s04_tc03_invalid_page_url);
    run!(s04_files::test_s04_tc04_invalid_site_url);
    run!(s04_files::test_s04_tc05_parent_site_page);
    run!(s04_files::test_s04_tc06_empty_url);
    run!(s04_files::test_s04_tc07_missing_url);
    run!(s04_files::test_s04_tc08_not_part_of_site_definition);
    run!(s04_files::test_s04_tc09_not_a_page_of_context_site);
    run!(s04_files::test_s04_tc10_revert_all_unauthenticated);
    run!(s04_files::test_s04_tc11_revert_file_unauthenticated);
    run!(s05_object_ids::test_s05_tc01_list_url);
    run!(s05_object_ids::test_s05_tc02_list_item_url);
    run!(s05_object_ids::test_s05_tc03_no_list_related_url);
    run!(s05_object_ids::test_s05_tc04_invalid_url);
    run!(s05_object_ids::test_s05_tc05_unauthenticated);
    run!(s06_pages::test_s06_tc01_customized_page_status);
    run!(s06_pages::test_s06_tc02_web_url_from_page_url);
    run!(s06_pages::test_s06_tc03_web_url_from_invalid_page_url);
    run!(s07_columns::test_s07_tc01_invalid_field_definition);
    run!(s07_columns::test_s07_tc02_get_columns_with_invalid_column);
    run!(s07_columns::test_s07_tc03_all_fields_valid);
    run!(s07_columns::test_s07_tc04_no_matching_name);
    run!(s07_columns::test_s07_tc05_get_columns_unauthenticated);
    run!(s07_columns::test_s07_tc06_update_columns_unauthenticated);
    run!(s07_columns::test_s07_tc07_multiple_new_methods);
    run!(s07_columns::test_s07_tc08_multiple_update_methods);
    run!(s07_columns::test_s07_tc09_multiple_delete_methods);
    run!(s07_columns::test_s07_tc10_existing_column);
    run!(s07_columns::test_s07_tc11_nonexistent_column);
    run!(s07_columns::test_s07_tc12_invalid_guid);
    run!(s07_columns::test_s07_tc13_no_name_or_display_name);
    run!(s08_css::test_s08_tc01_customize_css_unauthenticated);
    run!(s08_css::test_s08_tc02_revert_nonexistent_css);
    run!(s08_css::test_s08_tc03_customize_blank_css);
    run!(s08_css::test_s08_tc04_customize_css_without_extension);
    run!(s08_css::test_s08_tc05_customize_nonexistent_css);
    run!(s08_css::test_s08_tc06_customize_css_with_asterisk);
    run!(s08_css::test_s08_tc07_revert_css_unauthenticated);
    run!(s08_css::test_s08_tc08_revert_css);
    run!(s08_css::test_s08_tc09_revert_blank_css);
    run!(s08_css::test_s08_tc10_css_file_name_must_match);
    run!(s09_webs::test_s09_tc01_get_web_unauthenticated);
    run!(s09_webs::test_s09_tc02_get_web);
    run!(s09_webs::test_s09_tc03_get_web_invalid_url);
    run!(s09_webs::test_s09_tc04_get_web_without_url);
    run!(s09_webs::test_s09_tc05_get_web_collection_unauthenticated);
    run!(s09_webs::test_s09_tc06_get_web_collection);
    run!(s09_webs::test_s09_tc07_get_all_sub_webs_unauthenticated);
    run!(s09_webs::test_s09_tc08_get_all_sub_web_collection);
    run!(s09_webs::test_s09_tc09_web_definition);
    run!(s09_webs::test_s09_tc10_get_web_response);

    ConformanceReport::from_results(DOC, results)
}
