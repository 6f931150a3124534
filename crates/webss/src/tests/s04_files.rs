//! S04: RevertFileContentStream and RevertAllFileContentStreams.

use protocheck_harness::names::random_string;
use protocheck_harness::{
    FaultExpectation, ScenarioResult, SoapFault, TestFailure, HTTP_UNAUTHORIZED,
};

use crate::adapter::WebsServer;
use crate::base::WebsSuite;
use crate::fixtures;
use crate::types::error_codes;

const REVERT_ALL_SUPPORTED: u32 = 1034;
const REVERT_FILE_SUPPORTED: u32 = 1036;
const EMPTY_URL_CODE: u32 = 1065;
const NOT_IN_SITE_DEFINITION_CODE: u32 = 1066;
const NOT_ON_CONTEXT_SITE_CODE: u32 = 1064;

const R439: &str = "[In RevertFileContentStream] If there is any problem in performing the operation, the protocol server MUST return appropriate error code and error string.";

/// S04_TC01: every customized page on the site can be reverted at once.
pub async fn test_s04_tc01_revert_all_file_content_streams<A: WebsServer>(
    suite: &mut WebsSuite<A>,
) -> ScenarioResult {
    suite.site.assert_true(
        suite.site.is_requirement_enabled(REVERT_ALL_SUPPORTED)?,
        "This operation RevertAllFileContentStreams failed.",
    )?;
    suite.revert_all_file_content_streams().await?;
    suite.site.capture(
        REVERT_ALL_SUPPORTED,
        "[In Appendix B: Product Behavior] Implementation does support this[RevertAllFileContentStreams] operation.(<20>Windows SharePoint Services 3.0 and above follow this behavior.)",
    )
}

/// S04_TC02: a page from the site definition can be reverted.
pub async fn test_s04_tc02_revert_file_content_stream<A: WebsServer>(
    suite: &mut WebsSuite<A>,
) -> ScenarioResult {
    suite.site.assume_enabled(REVERT_FILE_SUPPORTED)?;
    let url = suite.site.property("RevertFileContentStream_ValidFileUrl")?;
    suite.revert_file_content_stream(&url).await?;
    suite.site.capture(
        REVERT_FILE_SUPPORTED,
        "[In Appendix B: Product Behavior] Implementation does support this[RevertFileContentStream] operation.(<22>Windows SharePoint Services 3.0 and above follow this behavior.)",
    )
}

/// S04_TC03: a URL that names no page faults.
pub async fn test_s04_tc03_invalid_page_url<A: WebsServer>(
    suite: &mut WebsSuite<A>,
) -> ScenarioResult {
    let url = fixtures::invalid_url(&suite.site, &format!("{}.aspx", random_string(10)))?;
    let fault = revert_expecting_fault(suite, Some(&url)).await?;
    suite.capture_fault_detail(&fault)?;
    suite.site.capture(
        726,
        "[In RevertFileContentStreamResponse] A SOAP fault MUST be returned if the protocol server encounters the following error condition while running this operation[RevertFileContentStream]: Occurs when an invalid URL for the page is passed in.",
    )
}

/// S04_TC04: a URL under a site that does not exist faults.
pub async fn test_s04_tc04_invalid_site_url<A: WebsServer>(
    suite: &mut WebsSuite<A>,
) -> ScenarioResult {
    let url = fixtures::invalid_url(&suite.site, &format!("{}/default.aspx", random_string(10)))?;
    revert_expecting_fault(suite, Some(&url)).await?;
    suite.site.capture(
        453,
        "[In RevertFileContentStreamResponse] A SOAP fault MUST be returned if the protocol server encounters the following error condition while running this operation: ] Occurs when the site referred by the fileUrl is not a valid site.",
    )
}

/// S04_TC05: a page of the parent site is out of reach of the context
/// site.
pub async fn test_s04_tc05_parent_site_page<A: WebsServer>(
    suite: &mut WebsSuite<A>,
) -> ScenarioResult {
    let url = fixtures::parent_site_page_url(&suite.site)?;
    revert_expecting_fault(suite, Some(&url)).await?;
    suite.site.capture(
        454,
        "[In RevertFileContentStreamResponse]A SOAP fault MUST be returned if the protocol server encounters the following error condition while running this operation: Occurs when a valid URL is passed in that refers to a page on the parent site of the context site.",
    )
}

/// S04_TC06: an empty URL faults with both error code and error string.
pub async fn test_s04_tc06_empty_url<A: WebsServer>(suite: &mut WebsSuite<A>) -> ScenarioResult {
    let fault = revert_expecting_fault(suite, Some("")).await?;
    suite
        .site
        .assert_some(fault.detail.as_ref(), "The SOAP fault detail")?;
    let complete = fault.has_code_and_string();
    suite.site.assert_true(
        complete,
        "The errorcode and errorstring elements should exist in the SOAPFaultDetails complex type element.",
    )?;
    suite.site.capture_if_true(complete, 439, R439)?;
    suite.site.capture_if_true(
        complete,
        440,
        "[In RevertFileContentStream] Error code(s) specific to this operation[RevertFileContentStream] are defined in the RevertFileContentStreamSoapOut message.",
    )?;
    suite.capture_fault_code(
        &fault,
        error_codes::BLANK_OR_MISSING,
        EMPTY_URL_CODE,
        "[In RevertFileContentStreamResponse] If the protocol server encounters the error condition: Occurs when an empty URL is passed in or no fileUrl element is supplied, while running this operation[RevertFileContentStream], a SOAP fault MUST be returned that contains the error code 0x82000001 in the following table for the specified error condition.",
    )
}

/// S04_TC07: omitting the URL altogether faults the same way.
pub async fn test_s04_tc07_missing_url<A: WebsServer>(suite: &mut WebsSuite<A>) -> ScenarioResult {
    let fault = revert_expecting_fault(suite, None).await?;
    suite
        .site
        .assert_some(fault.detail.as_ref(), "The SOAP fault detail")?;
    let complete = fault.has_code_and_string();
    suite.site.assert_true(
        complete,
        "The errorcode and errorstring elements should exist in the SOAPFaultDetails complex type element.",
    )?;
    suite.site.capture_if_true(complete, 439, R439)
}

/// S04_TC08: an uploaded document was never part of the site definition.
pub async fn test_s04_tc08_not_part_of_site_definition<A: WebsServer>(
    suite: &mut WebsSuite<A>,
) -> ScenarioResult {
    let url = fixtures::uploaded_document_url(&suite.site)?;
    let fault = revert_expecting_fault(suite, Some(&url)).await?;
    let detail = suite
        .site
        .assert_some(fault.detail.clone(), "The SOAP fault detail")?;
    suite.capture_fault_code(
        &fault,
        error_codes::NO_EXTENSION,
        NOT_IN_SITE_DEFINITION_CODE,
        "[In RevertFileContentStreamResponse] If the protocol server encounters the error condition: Occurs when the page to be converted is not part of the site definition, while running this operation[RevertFileContentStream], a SOAP fault MUST be returned that contains the error code 0x80131600 in the following table for the specified error condition.",
    )?;
    let either = detail.error_code.is_some() || detail.error_string.is_some();
    suite.site.assert_true(
        either,
        "The errorcode element or errorstring element should exist in the SOAPFaultDetails complex type element.",
    )?;
    suite.site.capture_if_true(either, 439, R439)
}

/// S04_TC09: a URL that is not a page of the context site.
pub async fn test_s04_tc09_not_a_page_of_context_site<A: WebsServer>(
    suite: &mut WebsSuite<A>,
) -> ScenarioResult {
    suite.site.assume_enabled(NOT_ON_CONTEXT_SITE_CODE)?;
    let fault = revert_expecting_fault(suite, Some(&random_string(10))).await?;
    let detail = suite
        .site
        .assert_some(fault.detail.as_ref(), "The SOAP fault detail")?;
    let mentions_code = detail
        .error_code
        .iter()
        .chain(detail.error_string.iter())
        .any(|text| text.contains(error_codes::FILE_NOT_FOUND));
    suite.site.capture_if_true(
        mentions_code,
        NOT_ON_CONTEXT_SITE_CODE,
        "[In RevertFileContentStreamResponse] If the protocol server encounters the error condition: Occurs when a valid URL is passed in that does NOT refer to a page on the context site, while running this operation[RevertFileContentStream], a SOAP fault MUST be returned that contains the error code 0x80070002 in the following table for the specified error condition.",
    )
}

/// S04_TC10: RevertAllFileContentStreams answers an unauthenticated caller
/// with HTTP 401.
pub async fn test_s04_tc10_revert_all_unauthenticated<A: WebsServer>(
    suite: &mut WebsSuite<A>,
) -> ScenarioResult {
    suite.sign_out().await;
    let status = suite
        .adapter
        .revert_all_file_content_streams()
        .await
        .expect_http_status("RevertAllFileContentStreams")?;
    suite.site.capture_if_equal(
        HTTP_UNAUTHORIZED,
        status,
        1083,
        "[In Message Processing Events and Sequencing Rules] If the user is not authorized to perform the operation[RevertAllFileContentStreams], the protocol server MUST return an HTTP 401 error as specified in [RFC2616] section 10.4.",
    )
}

/// S04_TC11: RevertFileContentStream answers an unauthenticated caller
/// with HTTP 401.
pub async fn test_s04_tc11_revert_file_unauthenticated<A: WebsServer>(
    suite: &mut WebsSuite<A>,
) -> ScenarioResult {
    let url = suite.site.property("RevertFileContentStream_ValidFileUrl")?;
    suite.sign_out().await;
    let status = suite
        .adapter
        .revert_file_content_stream(Some(&url))
        .await
        .expect_http_status("RevertFileContentStream")?;
    suite.site.capture_if_equal(
        HTTP_UNAUTHORIZED,
        status,
        1085,
        "[In Message Processing Events and Sequencing Rules] If the user is not authorized to perform the operation[RevertFileContentStream], the protocol server MUST return an HTTP 401 error as specified in [RFC2616] section 10.4.",
    )
}

async fn revert_expecting_fault<A: WebsServer>(
    suite: &mut WebsSuite<A>,
    file_url: Option<&str>,
) -> Result<SoapFault, TestFailure> {
    suite
        .adapter
        .revert_file_content_stream(file_url)
        .await
        .expect_soap_fault("RevertFileContentStream")
}
