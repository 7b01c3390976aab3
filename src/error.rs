use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the collision engine and its collaborators.
///
/// "No collision" is never an error: predictions report it as `f64::INFINITY`.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid user or API parameter (e.g. non-positive mass, non-finite limit).
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// Numerical or geometric issue (e.g. coincident centers at contact).
    #[error("numerical error: {0}")]
    MathError(String),

    /// Malformed particle stream.
    #[error("parse error in record {record}: {msg}")]
    Parse { record: usize, msg: String },

    /// Operation not allowed in the simulation's current phase.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Propagated I/O errors from particle readers.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_is_informative() {
        let e = Error::InvalidParam("mass must be finite and > 0".to_string());
        let msg = format!("{e}");
        assert!(msg.contains("invalid parameter"));
        assert!(msg.contains("mass"));
    }

    #[test]
    fn parse_error_names_record() {
        let e = Error::Parse {
            record: 3,
            msg: "missing field `vy`".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("record 3"));
        assert!(msg.contains("vy"));
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let e: Error = io.into();
        assert!(matches!(e, Error::Io(_)));
    }
}
