//! The tagged error channel every adapter operation returns.
//!
//! A protocol call either yields its typed payload or one of three fault
//! shapes: a per-item response code lifted to the whole call, a SOAP fault
//! carrying a code and error string, or a bare HTTP status (401 for an
//! unauthenticated caller). Scenarios pattern-match on these instead of
//! catching exceptions.

use std::fmt;

use crate::TestFailure;

pub const HTTP_UNAUTHORIZED: u16 = 401;

/// The `detail` element of a SOAP fault.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FaultDetail {
    pub error_string: Option<String>,
    pub error_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapFault {
    /// `soap:Client` or `soap:Server`.
    pub code: String,
    pub reason: String,
    pub detail: Option<FaultDetail>,
}

impl SoapFault {
    pub fn client(reason: impl Into<String>) -> Self {
        Self {
            code: "soap:Client".to_string(),
            reason: reason.into(),
            detail: None,
        }
    }

    pub fn server(reason: impl Into<String>) -> Self {
        Self {
            code: "soap:Server".to_string(),
            reason: reason.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, error_string: impl Into<String>, error_code: Option<&str>) -> Self {
        self.detail = Some(FaultDetail {
            error_string: Some(error_string.into()),
            error_code: error_code.map(str::to_string),
        });
        self
    }

    pub fn error_string(&self) -> Option<&str> {
        self.detail.as_ref()?.error_string.as_deref()
    }

    /// The server error code: the `errorcode` element when present, else the
    /// first `0x…` token in the error string, else in the reason.
    pub fn error_code(&self) -> Option<String> {
        if let Some(code) = self
            .detail
            .as_ref()
            .and_then(|d| d.error_code.as_deref())
            .filter(|c| !c.is_empty())
        {
            return Some(code.to_string());
        }
        self.error_string()
            .and_then(extract_error_code)
            .or_else(|| extract_error_code(&self.reason))
            .map(str::to_string)
    }

    /// Both `errorcode` and `errorstring` are present and non-empty.
    pub fn has_code_and_string(&self) -> bool {
        match &self.detail {
            Some(d) => {
                d.error_code.as_deref().is_some_and(|c| !c.is_empty())
                    && d.error_string.as_deref().is_some_and(|s| !s.is_empty())
            }
            None => false,
        }
    }
}

impl fmt::Display for SoapFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.reason)?;
        if let Some(code) = self.error_code() {
            write!(f, " ({})", code)?;
        }
        Ok(())
    }
}

/// Find the first `0x`-prefixed hexadecimal token in `text`.
pub fn extract_error_code(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut from = 0;
    while let Some(pos) = text[from..].find("0x") {
        let start = from + pos;
        let digits = bytes[start + 2..]
            .iter()
            .take_while(|b| b.is_ascii_hexdigit())
            .count();
        if digits > 0 {
            return Some(&text[start..start + 2 + digits]);
        }
        from = start + 2;
    }
    None
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolFault {
    /// A non-success response code in a single-item response.
    #[error("response code {code}")]
    Item {
        code: String,
        message: Option<String>,
    },

    #[error("SOAP fault {0}")]
    Soap(SoapFault),

    #[error("HTTP status {status}")]
    Http { status: u16 },
}

impl ProtocolFault {
    pub fn unauthorized() -> Self {
        Self::Http {
            status: HTTP_UNAUTHORIZED,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Item { .. } => "a response code",
            Self::Soap(_) => "a SOAP fault",
            Self::Http { .. } => "an HTTP status",
        }
    }
}

impl From<SoapFault> for ProtocolFault {
    fn from(fault: SoapFault) -> Self {
        Self::Soap(fault)
    }
}

/// Negative-path helpers for `Result<T, ProtocolFault>`.
///
/// A success where a fault was expected, or a fault of the wrong shape, is an
/// assertion failure.
pub trait FaultExpectation {
    fn expect_soap_fault(self, operation: &str) -> Result<SoapFault, TestFailure>;
    fn expect_http_status(self, operation: &str) -> Result<u16, TestFailure>;
    fn expect_item_error(self, operation: &str) -> Result<String, TestFailure>;
}

impl<T> FaultExpectation for Result<T, ProtocolFault> {
    fn expect_soap_fault(self, operation: &str) -> Result<SoapFault, TestFailure> {
        match self {
            Err(ProtocolFault::Soap(fault)) => Ok(fault),
            Err(other) => Err(wrong_kind(operation, "a SOAP fault", &other)),
            Ok(_) => Err(TestFailure::assertion(format!(
                "The expected SOAP fault is not returned for the {} operation.",
                operation
            ))),
        }
    }

    fn expect_http_status(self, operation: &str) -> Result<u16, TestFailure> {
        match self {
            Err(ProtocolFault::Http { status }) => Ok(status),
            Err(other) => Err(wrong_kind(operation, "an HTTP status", &other)),
            Ok(_) => Err(TestFailure::assertion(format!(
                "The expected http status code is not returned for the {} operation.",
                operation
            ))),
        }
    }

    fn expect_item_error(self, operation: &str) -> Result<String, TestFailure> {
        match self {
            Err(ProtocolFault::Item { code, .. }) => Ok(code),
            Err(other) => Err(wrong_kind(operation, "a response code", &other)),
            Ok(_) => Err(TestFailure::assertion(format!(
                "The expected error response code is not returned for the {} operation.",
                operation
            ))),
        }
    }
}

fn wrong_kind(operation: &str, expected: &str, got: &ProtocolFault) -> TestFailure {
    TestFailure::assertion(format!(
        "{} operation: expected {}, got {} ({})",
        operation,
        expected,
        got.kind(),
        got
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_hex_token() {
        assert_eq!(
            extract_error_code("Error 0x80070002 file not found"),
            Some("0x80070002")
        );
        assert_eq!(extract_error_code("0x82000001"), Some("0x82000001"));
        assert_eq!(extract_error_code("bad 0x then 0x8000FFFF"), Some("0x8000FFFF"));
        assert_eq!(extract_error_code("no code here"), None);
    }

    #[test]
    fn error_code_prefers_detail_element() {
        let fault = SoapFault::server("Exception of type 0x11111111")
            .with_detail("Invalid URL 0x22222222", Some("0x82000001"));
        assert_eq!(fault.error_code().as_deref(), Some("0x82000001"));
        assert!(fault.has_code_and_string());
    }

    #[test]
    fn error_code_falls_back_to_string_then_reason() {
        let fault = SoapFault::server("reason").with_detail("failed: 0x80131600", None);
        assert_eq!(fault.error_code().as_deref(), Some("0x80131600"));
        assert!(!fault.has_code_and_string());

        let bare = SoapFault::client("Exception 0x81020073 thrown");
        assert_eq!(bare.error_code().as_deref(), Some("0x81020073"));
    }

    #[test]
    fn expect_soap_fault_rejects_success() {
        let ok: Result<(), ProtocolFault> = Ok(());
        let err = ok.expect_soap_fault("GetWeb").unwrap_err();
        assert!(err.to_string().contains("GetWeb"));
    }

    #[test]
    fn expect_http_status_rejects_other_fault_kinds() {
        let soap: Result<(), ProtocolFault> = Err(SoapFault::client("x").into());
        let err = soap.expect_http_status("GetColumns").unwrap_err();
        assert!(err.to_string().contains("expected an HTTP status"));

        let http: Result<(), ProtocolFault> = Err(ProtocolFault::unauthorized());
        assert_eq!(http.expect_http_status("GetColumns").unwrap(), 401);
    }

    #[test]
    fn expect_item_error_returns_code() {
        let item: Result<(), ProtocolFault> = Err(ProtocolFault::Item {
            code: "ErrorInvalidPropertySet".into(),
            message: None,
        });
        assert_eq!(
            item.expect_item_error("CreateItem").unwrap(),
            "ErrorInvalidPropertySet"
        );
    }
}
