use thiserror::Error;

/// Errors returned by propagation and blob codec operations.
///
/// These are usage errors: they are handed back to the caller and never
/// logged or retried inside the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The propagation root was not a reference to a value.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A storage scan received a value that is not a byte sequence.
    #[error("scan source was not string/bytes (got {found})")]
    TypeMismatch {
        /// Kind of the rejected storage value
        found: &'static str,
    },

    /// JSON unmarshal was attempted into an absent blob.
    #[error("unmarshal JSON on nil blob")]
    NilTarget,

    /// Encoding or decoding a snapshot failed.
    #[error("snapshot encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns true for errors caused by how the API was called rather
    /// than by the data passed through it.
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::InvalidArgument(_) | Error::NilTarget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            Error::InvalidArgument("not a pointer value").to_string(),
            "invalid argument: not a pointer value"
        );
        assert_eq!(
            Error::TypeMismatch { found: "integer" }.to_string(),
            "scan source was not string/bytes (got integer)"
        );
        assert_eq!(Error::NilTarget.to_string(), "unmarshal JSON on nil blob");
    }

    #[test]
    fn json_errors_convert() {
        let err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: Error = err.into();
        assert!(matches!(err, Error::Json(_)));
        assert!(!err.is_usage());
    }

    #[test]
    fn usage_errors() {
        assert!(Error::NilTarget.is_usage());
        assert!(Error::InvalidArgument("x").is_usage());
        assert!(!Error::TypeMismatch { found: "bool" }.is_usage());
    }
}
