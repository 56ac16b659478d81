//! Crate-wide error type.
//!
//! Mirrors the error kinds enumerated in the measurement/framework contracts:
//! one enum variant per failure category, each carrying a human-readable
//! message, plus a stack of operation names appended as the error unwinds
//! through framework code.

use std::fmt;

use thiserror::Error;

/// All error kinds a `pixelforge` operation can fail with.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PfError {
    #[error("image has not been forged: {0}")]
    NotForged(String),
    #[error("wrong data type: {0}")]
    WrongDataType(String),
    #[error("image is not scalar: {0}")]
    NotScalar(String),
    #[error("image is not binary: {0}")]
    NotBinary(String),
    #[error("dimensionality not supported: {0}")]
    DimensionalityNotSupported(String),
    #[error("parameter out of range: {0}")]
    ParameterOutOfRange(String),
    #[error("array parameter has the wrong length: {0}")]
    ArrayParameterWrongLength(String),
    #[error("array parameter is empty: {0}")]
    ArrayParameterEmpty(String),
    #[error("sizes don't match: {0}")]
    SizesDontMatch(String),
    #[error("index out of range: {0}")]
    IndexOutOfRange(String),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("invalid flag: {0}")]
    InvalidFlag(String),
    #[error("illegal dimension: {0}")]
    IllegalDimension(String),
    #[error("data type not supported: {0}")]
    DataTypeNotSupported(String),
    #[error("not implemented: {0}")]
    NotImplemented(String),
    #[error("feature already present: {0}")]
    FeatureAlreadyPresent(String),
    #[error("feature not present: {0}")]
    FeatureNotPresent(String),
    #[error("object already present: {0}")]
    ObjectAlreadyPresent(String),
    #[error("object not present: {0}")]
    ObjectNotPresent(String),
    #[error("measurement not forged: {0}")]
    MeasurementNotForged(String),
    #[error("measurement already forged: {0}")]
    MeasurementForged(String),
}

/// A `PfError` plus the stack of operation names it propagated through.
///
/// Framework wrappers push their own name onto the stack on the way out via
/// [`ResultExt::context`], reproducing a diagnostic call trail without
/// paying for exceptions or backtraces.
#[derive(Debug, Clone, PartialEq)]
pub struct Traced {
    pub error: PfError,
    pub stack: Vec<&'static str>,
}

impl fmt::Display for Traced {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;
        if !self.stack.is_empty() {
            write!(f, " (in ")?;
            for (i, frame) in self.stack.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{frame}")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl std::error::Error for Traced {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl From<PfError> for Traced {
    fn from(error: PfError) -> Self {
        Traced { error, stack: Vec::new() }
    }
}

/// Crate-wide result alias. Framework-level entry points return this so the
/// operation-name stack is available to callers debugging a failure that
/// crossed several layers of dispatch.
pub type PfResult<T> = Result<T, Traced>;

/// Extension trait for annotating a `Result` with the name of the operation
/// that is about to (possibly) fail, appended innermost-first.
pub trait ResultExt<T> {
    fn context(self, op: &'static str) -> PfResult<T>;
}

impl<T> ResultExt<T> for PfResult<T> {
    fn context(self, op: &'static str) -> PfResult<T> {
        self.map_err(|mut traced| {
            traced.stack.push(op);
            traced
        })
    }
}

impl<T> ResultExt<T> for Result<T, PfError> {
    fn context(self, op: &'static str) -> PfResult<T> {
        self.map_err(|error| Traced { error, stack: vec![op] })
    }
}
