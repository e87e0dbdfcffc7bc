//! Row values and their fixed-width encoding.

use crate::error::{Result, StorageError};
use crate::types::{DbType, INT_SIZE, STRING_LENGTH};
use std::cmp::Ordering;
use std::fmt;

/// Comparison operator applied by [`DbValue::eval_pred`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolOp {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    /// SQL `LIKE`: `%` matches any run of bytes, `_` exactly one. Strings only.
    Like,
}

impl BoolOp {
    fn holds(self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => ordering == Ordering::Equal,
            Self::Neq => ordering != Ordering::Equal,
            Self::Lt => ordering == Ordering::Less,
            Self::Lte => ordering != Ordering::Greater,
            Self::Gt => ordering == Ordering::Greater,
            Self::Gte => ordering != Ordering::Less,
            Self::Like => false,
        }
    }
}

impl fmt::Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Eq => "=",
            Self::Neq => "<>",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Like => "LIKE",
        };
        f.write_str(s)
    }
}

/// A single field value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DbValue {
    Int(i64),
    String(String),
}

impl DbValue {
    /// The field type this value stores as
    pub fn db_type(&self) -> DbType {
        match self {
            Self::Int(_) => DbType::Int,
            Self::String(_) => DbType::String,
        }
    }

    /// Evaluate `self op other`.
    ///
    /// Ints compare numerically, strings by byte order. Both sides must be
    /// the same kind.
    pub fn eval_pred(&self, other: &DbValue, op: BoolOp) -> Result<bool> {
        match (self, other) {
            (Self::Int(_), Self::Int(_)) if op == BoolOp::Like => Err(StorageError::incompatible(
                "LIKE is not defined for int values",
            )),
            (Self::Int(a), Self::Int(b)) => Ok(op.holds(a.cmp(b))),
            (Self::String(a), Self::String(b)) if op == BoolOp::Like => {
                Ok(like_match(a.as_bytes(), b.as_bytes()))
            }
            (Self::String(a), Self::String(b)) => Ok(op.holds(a.as_bytes().cmp(b.as_bytes()))),
            _ => Err(StorageError::incompatible(format!(
                "cannot compare {} {} {}",
                self.db_type(),
                op,
                other.db_type()
            ))),
        }
    }

    /// Append the fixed-width encoding of this value to `buf`.
    ///
    /// Ints are 8 bytes little-endian; strings are their bytes zero-padded
    /// to `STRING_LENGTH`.
    pub(crate) fn write_to(&self, buf: &mut Vec<u8>) -> Result<()> {
        match self {
            Self::Int(v) => buf.extend_from_slice(&v.to_le_bytes()),
            Self::String(s) => {
                let bytes = s.as_bytes();
                if bytes.len() > STRING_LENGTH {
                    return Err(StorageError::ValueTooLarge {
                        size: bytes.len(),
                        max: STRING_LENGTH,
                    });
                }
                buf.extend_from_slice(bytes);
                buf.resize(buf.len() + STRING_LENGTH - bytes.len(), 0);
            }
        }
        Ok(())
    }

    /// Decode one value of type `ftype` from the front of `bytes`.
    ///
    /// The caller guarantees `bytes` holds at least the type's width.
    pub(crate) fn read_from(bytes: &[u8], ftype: DbType) -> Result<Self> {
        match ftype {
            DbType::Int => {
                let mut raw = [0u8; INT_SIZE];
                raw.copy_from_slice(&bytes[..INT_SIZE]);
                Ok(Self::Int(i64::from_le_bytes(raw)))
            }
            DbType::String => {
                let raw = &bytes[..STRING_LENGTH];
                let end = raw.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
                let s = std::str::from_utf8(&raw[..end])
                    .map_err(|_| StorageError::corruption("string field is not valid UTF-8"))?;
                Ok(Self::String(s.to_owned()))
            }
            DbType::Unknown => Err(StorageError::incompatible(
                "cannot decode a field of unknown type",
            )),
        }
    }
}

impl fmt::Display for DbValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<i64> for DbValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for DbValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for DbValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

/// Match `value` against a LIKE `pattern`
fn like_match(value: &[u8], pattern: &[u8]) -> bool {
    let (mut v, mut p) = (0, 0);
    // Last `%` seen and the value position it is currently absorbing up to
    let mut backtrack: Option<(usize, usize)> = None;

    while v < value.len() {
        if p < pattern.len() && pattern[p] == b'%' {
            backtrack = Some((p, v));
            p += 1;
        } else if p < pattern.len() && (pattern[p] == b'_' || pattern[p] == value[v]) {
            v += 1;
            p += 1;
        } else if let Some((star, absorbed)) = backtrack {
            p = star + 1;
            v = absorbed + 1;
            backtrack = Some((star, v));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&c| c == b'%')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_predicates() {
        let a = DbValue::Int(3);
        let b = DbValue::Int(7);
        assert!(a.eval_pred(&b, BoolOp::Lt).unwrap());
        assert!(a.eval_pred(&b, BoolOp::Lte).unwrap());
        assert!(a.eval_pred(&b, BoolOp::Neq).unwrap());
        assert!(!a.eval_pred(&b, BoolOp::Gt).unwrap());
        assert!(b.eval_pred(&a, BoolOp::Gte).unwrap());
        assert!(a.eval_pred(&DbValue::Int(3), BoolOp::Eq).unwrap());
        assert!(DbValue::Int(-1).eval_pred(&DbValue::Int(0), BoolOp::Lt).unwrap());
    }

    #[test]
    fn test_string_predicates() {
        let a = DbValue::from("apple");
        let b = DbValue::from("banana");
        assert!(a.eval_pred(&b, BoolOp::Lt).unwrap());
        assert!(DbValue::from("ab").eval_pred(&DbValue::from("abc"), BoolOp::Lt).unwrap());
        assert!(a.eval_pred(&DbValue::from("apple"), BoolOp::Eq).unwrap());
        assert!(!a.eval_pred(&b, BoolOp::Gte).unwrap());
    }

    #[test]
    fn test_like() {
        let v = DbValue::from("massachusetts");
        assert!(v.eval_pred(&DbValue::from("mass%"), BoolOp::Like).unwrap());
        assert!(v.eval_pred(&DbValue::from("%chu%"), BoolOp::Like).unwrap());
        assert!(v.eval_pred(&DbValue::from("m_ss%s"), BoolOp::Like).unwrap());
        assert!(v.eval_pred(&DbValue::from("%"), BoolOp::Like).unwrap());
        assert!(!v.eval_pred(&DbValue::from("mass"), BoolOp::Like).unwrap());
        assert!(!v.eval_pred(&DbValue::from("%x%"), BoolOp::Like).unwrap());
        assert!(DbValue::from("").eval_pred(&DbValue::from("%%"), BoolOp::Like).unwrap());
    }

    #[test]
    fn test_mismatched_kinds() {
        let err = DbValue::Int(1).eval_pred(&DbValue::from("1"), BoolOp::Eq);
        assert!(matches!(err, Err(StorageError::IncompatibleTypes(_))));
        let err = DbValue::Int(1).eval_pred(&DbValue::Int(1), BoolOp::Like);
        assert!(matches!(err, Err(StorageError::IncompatibleTypes(_))));
    }

    #[test]
    fn test_string_encoding_pads_and_trims() {
        let mut buf = Vec::new();
        DbValue::from("mit").write_to(&mut buf).unwrap();
        assert_eq!(buf.len(), STRING_LENGTH);
        assert_eq!(&buf[..3], b"mit");
        assert!(buf[3..].iter().all(|&b| b == 0));

        let decoded = DbValue::read_from(&buf, DbType::String).unwrap();
        assert_eq!(decoded, DbValue::from("mit"));
    }

    #[test]
    fn test_string_too_long() {
        let mut buf = Vec::new();
        let long = "x".repeat(STRING_LENGTH + 1);
        let err = DbValue::String(long).write_to(&mut buf);
        assert!(matches!(err, Err(StorageError::ValueTooLarge { .. })));
    }
}
