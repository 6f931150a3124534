//! S09: GetWeb, GetWebCollection and GetAllSubWebCollection.

use protocheck_harness::names::random_string;
use protocheck_harness::{
    FaultExpectation, ScenarioResult, SoapFault, TestFailure, HTTP_UNAUTHORIZED,
};

use crate::adapter::WebsServer;
use crate::base::WebsSuite;
use crate::types::{error_codes, WebDefinition};

const R1042: &str = "[In Transport] Protocol server faults MUST be returned SOAP faults as specified either in [SOAP1.1] section 4.4, SOAP Fault, or in [SOAP1.2-1/2007] section 5.4, SOAP Fault.";

/// S09_TC01: GetWeb answers an unauthenticated caller with HTTP 401.
pub async fn test_s09_tc01_get_web_unauthenticated<A: WebsServer>(
    suite: &mut WebsSuite<A>,
) -> ScenarioResult {
    let url = suite.site.property("SubSiteUrl")?;
    suite.sign_out().await;
    let status = suite
        .adapter
        .get_web(Some(&url))
        .await
        .expect_http_status("GetWeb")?;
    suite.site.capture_if_equal(
        HTTP_UNAUTHORIZED,
        status,
        1080,
        "[In Message Processing Events and Sequencing Rules] If the user is not authorized to perform the operation[GetWeb], the protocol server MUST return an HTTP 401 error as specified in [RFC2616] section 10.4.",
    )
}

/// S09_TC02: GetWeb returns the configured properties of the test site.
pub async fn test_s09_tc02_get_web<A: WebsServer>(suite: &mut WebsSuite<A>) -> ScenarioResult {
    let url = suite.site.property("SubSiteUrl")?;
    let web = suite.get_web(&url).await?;
    let expected = expected_web(suite, &url)?;

    let title = same(&web.title, &expected.title);
    let address = same(&web.url, &expected.url);
    let description = same_opt(&web.description, &expected.description);
    let language = same_opt(&web.language, &expected.language);
    suite
        .site
        .assert_true(title, format!("The title should be {}.", expected.title))?;
    suite
        .site
        .assert_true(address, format!("The URL should be {}.", expected.url))?;
    suite.site.assert_true(description, "The description should match TestSiteDescription.")?;
    suite.site.assert_true(language, "The language should match TestSiteLanguage.")?;

    // Theme is optional; its presence is not checked.
    let all = title && address && description && language;
    suite.site.capture_if_true(
        all,
        347,
        "[In GetWeb] If the operation succeeds, the protocol server MUST return the title, URL, description, language, and theme properties of the specified site.",
    )?;
    suite.site.capture_if_true(
        all,
        950,
        "[In Messages] [Message] GetWebSoapOut [Description] The response to the request for the title, URL, description, language, and theme of the specified site (2).",
    )?;
    suite.site.capture_if_true(
        all,
        353,
        "[In GetWebSoapOut] This[GetWebSoapOut] message is the response containing the title, URL, description, language, and theme of the specified site.",
    )
}

/// S09_TC03: a URL that names no site.
pub async fn test_s09_tc03_get_web_invalid_url<A: WebsServer>(
    suite: &mut WebsSuite<A>,
) -> ScenarioResult {
    let fault = get_web_expecting_fault(suite, Some(&random_string(10))).await?;
    suite.site.capture(1042, R1042)?;
    suite.site.capture(
        350,
        "[In GetWeb] Errors specific to this operation[GetWeb] are defined with GetWebSoapOut message.",
    )?;
    capture_code_and_string(suite, &fault)?;
    if suite.site.is_requirement_enabled(743)? {
        suite.site.assert_equal(
            Some(error_codes::BLANK_OR_MISSING.to_string()),
            fault.error_code(),
            "The SoapErrorCode",
        )?;
        suite.capture_fault_code(
            &fault,
            error_codes::BLANK_OR_MISSING,
            743,
            "[In GetWebResponse] Implementation does encounter the following error condition when running this operation, a SOAP fault with the error code 0x82000001 does be returned: Occurs when an invalid URL is passed in the site.",
        )?;
    }
    Ok(())
}

/// S09_TC04: no webUrl element at all.
pub async fn test_s09_tc04_get_web_without_url<A: WebsServer>(
    suite: &mut WebsSuite<A>,
) -> ScenarioResult {
    let fault = get_web_expecting_fault(suite, None).await?;
    suite.site.capture(1042, R1042)?;
    capture_code_and_string(suite, &fault)?;
    if suite.site.is_requirement_enabled(744)? {
        suite.site.assert_equal(
            Some(error_codes::BLANK_OR_MISSING.to_string()),
            fault.error_code(),
            "The SoapErrorCode",
        )?;
        suite.capture_fault_code(
            &fault,
            error_codes::BLANK_OR_MISSING,
            744,
            "[In GetWebResponse]Implementation does encounter the following error condition when running this operation, a SOAP fault with the error code 0x82000001 does be returned: Occurs when no webUrl element is supplied for the site.",
        )?;
    }
    Ok(())
}

/// S09_TC05: GetWebCollection answers an unauthenticated caller with HTTP
/// 401.
pub async fn test_s09_tc05_get_web_collection_unauthenticated<A: WebsServer>(
    suite: &mut WebsSuite<A>,
) -> ScenarioResult {
    suite.sign_out().await;
    let status = suite
        .adapter
        .get_web_collection()
        .await
        .expect_http_status("GetWebCollection")?;
    suite.site.capture_if_equal(
        HTTP_UNAUTHORIZED,
        status,
        1081,
        "[In Message Processing Events and Sequencing Rules] If the user is not authorized to perform the operation[GetWebCollection], the protocol server MUST return an HTTP 401 error as specified in [RFC2616] section 10.4.",
    )
}

/// S09_TC06: the test site is an immediate child of the context site.
pub async fn test_s09_tc06_get_web_collection<A: WebsServer>(
    suite: &mut WebsSuite<A>,
) -> ScenarioResult {
    let url = suite.site.property("SubSiteUrl")?;
    let title = suite.site.property("TestSiteTitle")?;
    let webs = suite.get_web_collection().await?;
    let found = webs
        .iter()
        .any(|w| same(&w.url, &url) && same(&w.title, &title));
    suite
        .site
        .assert_true(found, "It does not return expected Title or Url.")?;
    suite.site.capture_if_true(
        found,
        368,
        "[In GetWebCollection] If the operation succeeds, it MUST return the Title and URL properties of all immediate child sites of the context site.",
    )?;
    suite.site.capture_if_true(
        found,
        373,
        "[In GetWebCollectionSoapOut] This message[GetWebCollectionSoapOut] is the response containing the Title and URL properties of all immediate child sites of the context site.",
    )
}

/// S09_TC07: GetAllSubWebCollection answers an unauthenticated caller with
/// HTTP 401.
pub async fn test_s09_tc07_get_all_sub_webs_unauthenticated<A: WebsServer>(
    suite: &mut WebsSuite<A>,
) -> ScenarioResult {
    suite.sign_out().await;
    let status = suite
        .adapter
        .get_all_sub_web_collection()
        .await
        .expect_http_status("GetAllSubWebCollection")?;
    suite.site.capture_if_equal(
        HTTP_UNAUTHORIZED,
        status,
        1073,
        "[In Message Processing Events and Sequencing Rules] If the user is not authorized to perform the operation[GetAllSubWebCollection], the protocol server MUST return an HTTP 401 error as specified in [RFC2616] section 10.4.",
    )
}

/// S09_TC08: every site of the collection, the test site among them.
pub async fn test_s09_tc08_get_all_sub_web_collection<A: WebsServer>(
    suite: &mut WebsSuite<A>,
) -> ScenarioResult {
    let url = suite.site.property("SubSiteUrl")?;
    let webs = suite.get_all_sub_web_collection().await?;
    suite.site.assert_true(
        webs.iter().any(|w| same(&w.url, &url)),
        "GetAllSubWebCollection should list the test site.",
    )
}

/// S09_TC09: each WebDefinition attribute carries the site's value.
pub async fn test_s09_tc09_web_definition<A: WebsServer>(
    suite: &mut WebsSuite<A>,
) -> ScenarioResult {
    let url = suite.site.property("SubSiteUrl")?;
    let web = suite.get_web(&url).await?;
    let expected = expected_web(suite, &url)?;
    suite.site.capture_if_true(
        same(&web.title, &expected.title),
        857,
        "[In WebDefinition] Title: Specifies the title of the site.",
    )?;
    suite.site.capture_if_true(
        same(&web.url, &expected.url),
        693,
        "[In WebDefinition] Url: Specifies the absolute URL of the site.",
    )?;
    suite.site.capture_if_true(
        same_opt(&web.description, &expected.description),
        694,
        "[In WebDefinition] Description: Specifies the description of the site.",
    )?;
    suite.site.capture_if_equal(
        expected.language,
        web.language,
        695,
        "[In WebDefinition] Language: Specifies the language code identifier (LCID) for the language of the site.",
    )
}

/// S09_TC10: the GetWeb result wraps a Web element.
pub async fn test_s09_tc10_get_web_response<A: WebsServer>(
    suite: &mut WebsSuite<A>,
) -> ScenarioResult {
    let url = suite.site.property("SubSiteUrl")?;
    let web = suite.get_web(&url).await?;
    let present = !web.url.is_empty();
    suite.site.capture_if_true(
        present,
        361,
        "[In GetWebResponse] GetWebResult: An XML element that contains a Web element.",
    )?;
    suite.site.capture_if_true(
        present,
        362,
        "[In GetWebResponse] Web: The structure of this element is defined in WebDefinition (section 2.2.4.2).",
    )
}

// ── Helpers ──────────────────────────────────────────────────────────────

/// The test site as configured.
fn expected_web<A: WebsServer>(
    suite: &WebsSuite<A>,
    url: &str,
) -> Result<WebDefinition, TestFailure> {
    Ok(WebDefinition {
        title: suite.site.property("TestSiteTitle")?,
        url: url.to_string(),
        description: Some(suite.site.property("TestSiteDescription")?),
        language: Some(suite.site.property("TestSiteLanguage")?),
        theme: None,
    })
}

fn same(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

fn same_opt(a: &Option<String>, b: &Option<String>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => same(a, b),
        (None, None) => true,
        _ => false,
    }
}

fn capture_code_and_string<A: WebsServer>(
    suite: &mut WebsSuite<A>,
    fault: &SoapFault,
) -> ScenarioResult {
    if fault.has_code_and_string() {
        suite.site.capture(
            349,
            "[In GetWeb] If there is any problem in performing the operation, the protocol server MUST return the appropriate error code and error string.",
        )?;
    }
    Ok(())
}

async fn get_web_expecting_fault<A: WebsServer>(
    suite: &mut WebsSuite<A>,
    web_url: Option<&str>,
) -> Result<SoapFault, TestFailure> {
    suite
        .adapter
        .get_web(web_url)
        .await
        .expect_soap_fault("GetWeb")
}
