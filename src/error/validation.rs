use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid header format: '{value}'. Expected 'Key: Value'")]
    InvalidHeaderFormat { value: String },
    #[error("Invalid boolean '{value}'. Expected true/false, yes/no, on/off, or 1/0.")]
    InvalidBoolean { value: String },
    #[error("Invalid variable '{value}'. Expected 'key=value'")]
    InvalidVarFormat { value: String },
    #[error("Invalid request '{value}'. Expected 'METHOD PATH [JSON-BODY]'")]
    InvalidRequestFormat { value: String },
    #[error("Invalid JSON body in request '{value}': {source}")]
    InvalidRequestBody {
        value: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration must be > 0.")]
    DurationZero,
    #[error("Invalid TLS version '{value}'. Use 1.0, 1.1, 1.2, or 1.3.")]
    InvalidTlsVersion { value: String },
    #[error("Invalid number: {source}")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Value must be >= {min}.")]
    ValueTooSmall { min: u64 },
    #[error("Missing base URL (set --base-url or base_url in the probe file).")]
    MissingBaseUrl,
    #[error("No requests to probe (use --request or [[requests]] in the probe file).")]
    NoRequests,
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
