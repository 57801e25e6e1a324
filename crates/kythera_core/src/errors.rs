//! Runtime error taxonomy shared by the compiler and the runtime.
//!
//! Generated programs have no error channel, so the runtime reports language-level failures by panicking with a
//! canonical `"<Kind>: <message>"` string. Keeping the kinds and the formatting here means diagnostics in tests and
//! the panics raised by `kythera_runtime` stay aligned.

use std::fmt;

/// Kind of a runtime failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An operation received a value of the wrong runtime type.
    TypeError,
    /// Integer or float division (or modulo) by zero.
    ZeroDivisionError,
    /// List index outside `0..len`.
    IndexError,
    /// Object member that does not exist.
    KeyError,
    /// A dynamic cast the cast matrix does not allow.
    CastError,
}

impl ErrorKind {
    /// Canonical spelling used as the message prefix.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::TypeError => "TypeError",
            ErrorKind::ZeroDivisionError => "ZeroDivisionError",
            ErrorKind::IndexError => "IndexError",
            ErrorKind::KeyError => "KeyError",
            ErrorKind::CastError => "CastError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A runtime error with its canonical message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KytheraError {
    pub kind: ErrorKind,
    pub message: String,
}

impl KytheraError {
    pub fn with_message(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// `ZeroDivisionError: integer division by zero`
    pub fn int_zero_division() -> Self {
        Self::with_message(ErrorKind::ZeroDivisionError, "integer division by zero")
    }

    /// `ZeroDivisionError: float division by zero`
    pub fn float_zero_division() -> Self {
        Self::with_message(ErrorKind::ZeroDivisionError, "float division by zero")
    }

    pub fn index_out_of_range(index: i64, len: usize) -> Self {
        Self::with_message(
            ErrorKind::IndexError,
            format!("list index {index} out of range for length {len}"),
        )
    }

    pub fn missing_member(name: &str) -> Self {
        Self::with_message(ErrorKind::KeyError, format!("object has no member '{name}'"))
    }

    pub fn unsupported_operand(op: &str, left: &str, right: &str) -> Self {
        Self::with_message(
            ErrorKind::TypeError,
            format!("unsupported operand types for {op}: '{left}' and '{right}'"),
        )
    }

    pub fn invalid_cast(from: &str, to: &str) -> Self {
        Self::with_message(ErrorKind::CastError, format!("cannot cast '{from}' to '{to}'"))
    }
}

impl fmt::Display for KytheraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for KytheraError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_formatting() {
        assert_eq!(
            KytheraError::int_zero_division().to_string(),
            "ZeroDivisionError: integer division by zero"
        );
        assert_eq!(
            KytheraError::missing_member("a").to_string(),
            "KeyError: object has no member 'a'"
        );
    }
}
