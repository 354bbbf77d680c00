use std::fmt;

/// Fixed message shown when no response reached the console.
pub const LINK_FAILURE_MESSAGE: &str = "UPLINK FAILURE: DATA SYNC INTERRUPTED";

/// Message shown when the service answered with a body we could not decode.
pub const DECODE_FAULT_MESSAGE: &str = "PAYLOAD FAULT: RESPONSE COULD NOT BE DECODED";

/// Failures of a single decision query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The service answered with a non-success HTTP status.
    ServiceFault(u16),
    /// No response reached us (DNS, connection refused, timeout).
    LinkFailure(String),
    /// The response body could not be decoded into the expected shape.
    DecodeFault(String),
}

impl RequestError {
    /// Message surfaced in the error banner.
    ///
    /// `ServiceFault` embeds the status code; `LinkFailure` always uses the
    /// fixed connectivity message regardless of the transport detail.
    pub fn user_message(&self) -> String {
        match self {
            RequestError::ServiceFault(status) => format!("TERMINAL FAULT: {}", status),
            RequestError::LinkFailure(_) => LINK_FAILURE_MESSAGE.to_string(),
            RequestError::DecodeFault(_) => DECODE_FAULT_MESSAGE.to_string(),
        }
    }
}

impl fmt::Display for RequestError {
    /// Formats the error for logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::ServiceFault(status) => {
                write!(f, "Decision service returned status {}", status)
            }
            RequestError::LinkFailure(msg) => write!(f, "Decision service unreachable: {}", msg),
            RequestError::DecodeFault(msg) => {
                write!(f, "Failed to decode decision response: {}", msg)
            }
        }
    }
}

impl std::error::Error for RequestError {}

impl From<reqwest::Error> for RequestError {
    /// Classifies a `reqwest::Error` into the request taxonomy.
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RequestError::DecodeFault(err.to_string())
        } else if let Some(status) = err.status() {
            RequestError::ServiceFault(status.as_u16())
        } else {
            RequestError::LinkFailure(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RequestError {
    fn from(err: serde_json::Error) -> Self {
        RequestError::DecodeFault(err.to_string())
    }
}
