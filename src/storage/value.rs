//! Scalar values returned by the live store

use std::fmt;

use rusqlite::types::ValueRef;
use serde::Serialize;

/// A single scalar result value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
    Null,
}

/// One result row.
pub type Row = Vec<Scalar>;

impl Scalar {
    /// Interprets the value as a non-negative row count.
    ///
    /// Integer-valued reals are accepted since some drivers report
    /// aggregates as floating point.
    pub fn as_count(&self) -> Option<u64> {
        match self {
            Scalar::Integer(v) if *v >= 0 => Some(*v as u64),
            Scalar::Real(v) if *v >= 0.0 && v.fract() == 0.0 => Some(*v as u64),
            Scalar::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl From<ValueRef<'_>> for Scalar {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Scalar::Null,
            ValueRef::Integer(v) => Scalar::Integer(v),
            ValueRef::Real(v) => Scalar::Real(v),
            ValueRef::Text(bytes) => Scalar::Text(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(bytes) => Scalar::Blob(bytes.to_vec()),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Integer(v) => write!(f, "{}", v),
            Scalar::Real(v) => write!(f, "{}", v),
            Scalar::Text(v) => write!(f, "{}", v),
            Scalar::Blob(v) => write!(f, "<{} bytes>", v.len()),
            Scalar::Null => write!(f, "NULL"),
        }
    }
}
