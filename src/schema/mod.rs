//! Schema descriptors.
//!
//! A [`TupleDesc`] is the ordered list of fields that fixes a tuple's binary
//! layout: field `i` of every tuple occupies a fixed byte range determined
//! only by the types of fields `0..i`.

mod display;

pub(crate) use display::format_row;

use crate::error::{Result, StorageError};
use crate::types::DbType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name, table qualifier and type of one field.
///
/// The qualifier may be empty when a query did not name the table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldType {
    pub name: String,
    #[serde(default)]
    pub qualifier: String,
    pub ftype: DbType,
}

impl FieldType {
    /// Create a field with a table qualifier
    pub fn new(name: impl Into<String>, qualifier: impl Into<String>, ftype: DbType) -> Self {
        Self {
            name: name.into(),
            qualifier: qualifier.into(),
            ftype,
        }
    }

    /// Create a field without a table qualifier
    pub fn unqualified(name: impl Into<String>, ftype: DbType) -> Self {
        Self::new(name, "", ftype)
    }

    /// Display name, `qualifier.name` when qualified
    pub fn display_name(&self) -> String {
        if self.qualifier.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.qualifier, self.name)
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.display_name(), self.ftype)
    }
}

/// Ordered field list describing a tuple.
///
/// Equality is structural: same length and pairwise identical fields.
/// Every operation returns a new descriptor, so clones never share storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TupleDesc {
    fields: Vec<FieldType>,
}

impl TupleDesc {
    /// Create a descriptor from fields, in layout order
    pub fn new(fields: Vec<FieldType>) -> Self {
        Self { fields }
    }

    /// The fields in layout order
    pub fn fields(&self) -> &[FieldType] {
        &self.fields
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the descriptor has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Serialized width of one tuple: 8 bytes per int, `STRING_LENGTH` per string.
    ///
    /// Fails for descriptors that still contain `Unknown` fields.
    pub fn bytes_per_tuple(&self) -> Result<usize> {
        self.fields.iter().try_fold(0, |size, field| {
            field.ftype.width().map(|w| size + w).ok_or_else(|| {
                StorageError::incompatible(format!(
                    "field {} has no storage width",
                    field.display_name()
                ))
            })
        })
    }

    /// Find the index of the field best matching `target`.
    ///
    /// A candidate has the same name and the same type (any type if the target
    /// is `Unknown`). An unqualified target with several candidates is
    /// ambiguous. A qualified target prefers a candidate with the same
    /// qualifier and otherwise takes the first candidate.
    pub fn resolve(&self, target: &FieldType) -> Result<usize> {
        let mut best: Option<usize> = None;

        for (i, field) in self.fields.iter().enumerate() {
            if field.name != target.name
                || (field.ftype != target.ftype && target.ftype != DbType::Unknown)
            {
                continue;
            }
            if target.qualifier.is_empty() && best.is_some() {
                return Err(StorageError::AmbiguousName(target.name.clone()));
            }
            if field.qualifier == target.qualifier || best.is_none() {
                best = Some(i);
            }
        }

        best.ok_or_else(|| StorageError::FieldNotFound(target.display_name()))
    }

    /// Copy of this descriptor with every field qualified by `alias`
    pub fn with_alias(&self, alias: &str) -> Self {
        let fields = self
            .fields
            .iter()
            .map(|f| FieldType::new(f.name.clone(), alias, f.ftype))
            .collect();
        Self { fields }
    }

    /// Fields of `self` followed by fields of `other`
    pub fn merge(&self, other: &TupleDesc) -> Self {
        let mut fields = Vec::with_capacity(self.len() + other.len());
        fields.extend_from_slice(&self.fields);
        fields.extend_from_slice(&other.fields);
        Self { fields }
    }

    /// Column header line for result output.
    ///
    /// `aligned` pads each name into a fixed-width column; otherwise names
    /// are comma separated.
    pub fn header_string(&self, aligned: bool) -> String {
        let names: Vec<String> = self.fields.iter().map(FieldType::display_name).collect();
        format_row(&names, aligned)
    }
}

impl From<Vec<FieldType>> for TupleDesc {
    fn from(fields: Vec<FieldType>) -> Self {
        Self::new(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::STRING_LENGTH;

    fn people() -> TupleDesc {
        TupleDesc::new(vec![
            FieldType::new("id", "t", DbType::Int),
            FieldType::new("name", "t", DbType::String),
        ])
    }

    #[test]
    fn test_bytes_per_tuple() {
        assert_eq!(people().bytes_per_tuple().unwrap(), 8 + STRING_LENGTH);
        assert_eq!(TupleDesc::default().bytes_per_tuple().unwrap(), 0);

        let unknown = TupleDesc::new(vec![FieldType::unqualified("x", DbType::Unknown)]);
        assert!(matches!(
            unknown.bytes_per_tuple(),
            Err(StorageError::IncompatibleTypes(_))
        ));
    }

    #[test]
    fn test_resolve_by_name_and_type() {
        let desc = people();
        assert_eq!(desc.resolve(&FieldType::new("name", "t", DbType::String)).unwrap(), 1);
        assert_eq!(desc.resolve(&FieldType::unqualified("id", DbType::Unknown)).unwrap(), 0);

        // Same name, wrong type
        assert!(matches!(
            desc.resolve(&FieldType::unqualified("id", DbType::String)),
            Err(StorageError::FieldNotFound(_))
        ));
        assert!(matches!(
            desc.resolve(&FieldType::unqualified("age", DbType::Int)),
            Err(StorageError::FieldNotFound(_))
        ));
    }

    #[test]
    fn test_resolve_ambiguous_and_qualified() {
        let desc = TupleDesc::new(vec![
            FieldType::new("name", "a", DbType::String),
            FieldType::new("name", "b", DbType::String),
        ]);

        assert!(matches!(
            desc.resolve(&FieldType::unqualified("name", DbType::String)),
            Err(StorageError::AmbiguousName(_))
        ));
        assert_eq!(desc.resolve(&FieldType::new("name", "b", DbType::String)).unwrap(), 1);
        assert_eq!(desc.resolve(&FieldType::new("name", "a", DbType::String)).unwrap(), 0);
        // No qualifier match falls back to the first name match
        assert_eq!(desc.resolve(&FieldType::new("name", "c", DbType::String)).unwrap(), 0);
    }

    #[test]
    fn test_with_alias_leaves_original() {
        let desc = people();
        let aliased = desc.with_alias("p");

        assert!(aliased.fields().iter().all(|f| f.qualifier == "p"));
        assert!(desc.fields().iter().all(|f| f.qualifier == "t"));
        assert_ne!(desc, aliased);
    }

    #[test]
    fn test_merge_and_equality() {
        let left = people();
        let right = TupleDesc::new(vec![FieldType::new("age", "u", DbType::Int)]);
        let merged = left.merge(&right);

        assert_eq!(merged.len(), 3);
        assert_eq!(&merged.fields()[..2], left.fields());
        assert_eq!(merged.fields()[2], right.fields()[0]);
        assert_eq!(left.len(), 2);

        assert_eq!(left.clone(), left);
        assert_ne!(left, TupleDesc::new(left.fields()[..1].to_vec()));
    }

    #[test]
    fn test_header_string() {
        let desc = people();
        assert_eq!(desc.header_string(false), "t.id,t.name");
        assert!(desc.header_string(true).contains("t.name"));
        assert_eq!(TupleDesc::default().header_string(true), "");
    }

    #[test]
    fn test_descriptor_serde() {
        let desc = people();
        let json = serde_json::to_string(&desc).unwrap();
        assert!(json.contains("\"ftype\":\"int\""));
        let back: TupleDesc = serde_json::from_str(&json).unwrap();
        assert_eq!(back, desc);
    }
}
