//! Tuples: schema-tagged rows and their fixed-width codec.
//!
//! A tuple serializes to exactly `desc.bytes_per_tuple()` bytes, each field
//! written in descriptor order:
//! ```text
//! Int     8 bytes, little-endian i64
//! String  STRING_LENGTH bytes, content then zero padding
//! ```
//! The record ID is never part of the encoded form.

mod expr;
mod value;

pub use expr::{ConstExpr, Expr, FieldExpr};
pub use value::{BoolOp, DbValue};

use crate::error::{Result, StorageError};
use crate::schema::{format_row, FieldType, TupleDesc};
use crate::types::{DbType, RecordId, STRING_LENGTH};
use std::cmp::Ordering;

/// Serialized bytes of a tuple, usable as a hash or ordered map key.
///
/// Tuples with the same field layout and field bytes produce equal keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TupleKey(Vec<u8>);

impl TupleKey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// A row of values described by a [`TupleDesc`]
#[derive(Debug, Clone)]
pub struct Tuple {
    desc: TupleDesc,
    values: Vec<DbValue>,
    rid: Option<RecordId>,
}

impl Tuple {
    /// Create a tuple, checking arity and that every value matches its field type.
    ///
    /// Fields of `Unknown` type accept either kind. Strings longer than
    /// `STRING_LENGTH` bytes are rejected, so every tuple built here can be
    /// encoded.
    pub fn new(desc: TupleDesc, values: Vec<DbValue>) -> Result<Self> {
        if desc.len() != values.len() {
            return Err(StorageError::invalid_operation(format!(
                "descriptor has {} fields but {} values were given",
                desc.len(),
                values.len()
            )));
        }
        for (field, value) in desc.fields().iter().zip(&values) {
            check_kind(field, value)?;
        }
        Ok(Self {
            desc,
            values,
            rid: None,
        })
    }

    /// The tuple's descriptor
    pub fn desc(&self) -> &TupleDesc {
        &self.desc
    }

    /// Field values in descriptor order
    pub fn values(&self) -> &[DbValue] {
        &self.values
    }

    /// Value at position `index`
    pub fn value(&self, index: usize) -> Option<&DbValue> {
        self.values.get(index)
    }

    /// Where the tuple is stored, if it has been placed in a page
    pub fn rid(&self) -> Option<RecordId> {
        self.rid
    }

    /// Set or clear the record ID
    pub fn set_rid(&mut self, rid: Option<RecordId>) {
        self.rid = rid;
    }

    /// Append the encoded tuple to `buf`.
    ///
    /// Writes exactly `desc.bytes_per_tuple()` bytes or fails without a
    /// usable result.
    pub fn write_to(&self, buf: &mut Vec<u8>) -> Result<()> {
        for (field, value) in self.desc.fields().iter().zip(&self.values) {
            if field.ftype == DbType::Unknown {
                return Err(StorageError::incompatible(format!(
                    "field {} has unknown type and cannot be stored",
                    field.display_name()
                )));
            }
            check_kind(field, value)?;
            value.write_to(buf)?;
        }
        Ok(())
    }

    /// Encode into a fresh buffer
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.desc.bytes_per_tuple()?);
        self.write_to(&mut buf)?;
        Ok(buf)
    }

    /// Decode a tuple laid out by `desc` from the front of `bytes`.
    ///
    /// Trailing bytes beyond the tuple width are ignored. The result has no
    /// record ID.
    pub fn read_from(bytes: &[u8], desc: &TupleDesc) -> Result<Self> {
        let needed = desc.bytes_per_tuple()?;
        if bytes.len() < needed {
            return Err(StorageError::Truncated {
                needed,
                available: bytes.len(),
            });
        }

        let mut values = Vec::with_capacity(desc.len());
        let mut offset = 0;
        for field in desc.fields() {
            values.push(DbValue::read_from(&bytes[offset..], field.ftype)?);
            // Width is known: bytes_per_tuple succeeded above
            offset += field.ftype.width().unwrap_or_default();
        }

        Ok(Self {
            desc: desc.clone(),
            values,
            rid: None,
        })
    }

    /// New tuple holding only `fields`, in the requested order.
    ///
    /// Each field is resolved against this tuple's descriptor by the rules
    /// of [`TupleDesc::resolve`]; the result's descriptor is `fields` itself.
    pub fn project(&self, fields: &[FieldType]) -> Result<Tuple> {
        let values = fields
            .iter()
            .map(|field| {
                let index = self.desc.resolve(field)?;
                Ok(self.values[index].clone())
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Tuple {
            desc: TupleDesc::new(fields.to_vec()),
            values,
            rid: None,
        })
    }

    /// Order `self` against `other` by the value of `expr` on each.
    ///
    /// Int results compare numerically and string results by byte order.
    pub fn compare(&self, other: &Tuple, expr: &dyn Expr) -> Result<Ordering> {
        let left = expr.eval(self)?;
        let right = expr.eval(other)?;

        match (expr.expr_type().ftype, &left, &right) {
            (DbType::Int, DbValue::Int(a), DbValue::Int(b)) => Ok(a.cmp(b)),
            (DbType::String, DbValue::String(a), DbValue::String(b)) => {
                Ok(a.as_bytes().cmp(b.as_bytes()))
            }
            (ftype, _, _) => Err(StorageError::incompatible(format!(
                "cannot order by {} expression over {} and {} values",
                ftype,
                left.db_type(),
                right.db_type()
            ))),
        }
    }

    /// Concatenate two tuples, descriptor and values.
    ///
    /// A missing side yields the other side unchanged, so join chains can be
    /// folded from `None`.
    pub fn merge(left: Option<Tuple>, right: Option<Tuple>) -> Option<Tuple> {
        match (left, right) {
            (None, right) => right,
            (left, None) => left,
            (Some(left), Some(right)) => {
                let desc = left.desc.merge(&right.desc);
                let mut values = left.values;
                values.extend(right.values);
                Some(Tuple {
                    desc,
                    values,
                    rid: None,
                })
            }
        }
    }

    /// Content key for grouping and deduplication
    pub fn key(&self) -> Result<TupleKey> {
        self.to_bytes().map(TupleKey)
    }

    /// Values as one line of output, aligned in columns or comma separated
    pub fn pretty_string(&self, aligned: bool) -> String {
        let cells: Vec<String> = self.values.iter().map(DbValue::to_string).collect();
        format_row(&cells, aligned)
    }
}

/// Equal when descriptors and all values are equal; record IDs are ignored
impl PartialEq for Tuple {
    fn eq(&self, other: &Self) -> bool {
        self.desc == other.desc && self.values == other.values
    }
}

impl Eq for Tuple {}

fn check_kind(field: &FieldType, value: &DbValue) -> Result<()> {
    if field.ftype != DbType::Unknown && field.ftype != value.db_type() {
        return Err(StorageError::incompatible(format!(
            "field {} is {} but value is {}",
            field.display_name(),
            field.ftype,
            value.db_type()
        )));
    }
    if let DbValue::String(v) = value {
        if v.len() > STRING_LENGTH {
            return Err(StorageError::ValueTooLarge {
                size: v.len(),
                max: STRING_LENGTH,
            });
        }
    }
    Ok(())
}
