//! Runtime error helpers for Kythera-generated Rust code.
//!
//! The semantic core (`kythera_core`) owns the canonical error taxonomy and formatting (`KytheraError`).
//! The runtime provides convenience helpers to *raise* those errors as panics, keeping the compiler/runtime
//! user-facing text aligned.

use core::fmt;

use kythera_core::errors::{ErrorKind, KytheraError};

/// Raise a runtime error (implemented as a panic) with canonical formatting.
#[cold]
#[track_caller]
pub fn raise(err: impl fmt::Display) -> ! {
    panic!("{err}");
}

/// Raise a canonical `Kind: ...` error without allocating an intermediate `String`.
#[cold]
#[track_caller]
pub fn raise_kind_fmt(kind: ErrorKind, msg: fmt::Arguments<'_>) -> ! {
    panic!("{}: {}", kind.as_str(), msg);
}

/// Raise a `TypeError` with a canonical `TypeError: ...` prefix.
#[cold]
#[track_caller]
pub fn raise_type_error(msg: &str) -> ! {
    raise(KytheraError::with_message(ErrorKind::TypeError, msg))
}

/// Raise an `IndexError` for `index` in a list of length `len`.
#[cold]
#[track_caller]
pub fn raise_index_error(index: i64, len: usize) -> ! {
    raise(KytheraError::index_out_of_range(index, len))
}

/// Raise a `KeyError` for a missing object member.
#[cold]
#[track_caller]
pub fn raise_key_error(name: &str) -> ! {
    raise(KytheraError::missing_member(name))
}

/// Raise `ZeroDivisionError: integer division by zero`.
#[cold]
#[track_caller]
pub fn raise_int_zero_division() -> ! {
    raise(KytheraError::int_zero_division())
}

/// Raise `ZeroDivisionError: float division by zero`.
#[cold]
#[track_caller]
pub fn raise_float_zero_division() -> ! {
    raise(KytheraError::float_zero_division())
}

/// Raise a `CastError` naming both types.
#[cold]
#[track_caller]
pub fn raise_cast_error(from: &str, to: &str) -> ! {
    raise(KytheraError::invalid_cast(from, to))
}

/// Raise a `TypeError` for an operator applied to unsupported operands.
#[cold]
#[track_caller]
pub fn raise_unsupported_operand(op: &str, left: &str, right: &str) -> ! {
    raise(KytheraError::unsupported_operand(op, left, right))
}
