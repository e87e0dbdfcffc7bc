//! Expression evaluation used to order tuples.

use super::{DbValue, Tuple};
use crate::error::Result;
use crate::schema::FieldType;

/// Something that produces a value from a tuple, with a statically known type.
///
/// Query operators supply richer implementations; the record layer only
/// needs this to order tuples in [`Tuple::compare`].
pub trait Expr {
    /// Evaluate against `tuple`
    fn eval(&self, tuple: &Tuple) -> Result<DbValue>;

    /// Declared result type
    fn expr_type(&self) -> FieldType;
}

/// Extracts one field, resolved by name as in projection
#[derive(Debug, Clone)]
pub struct FieldExpr {
    field: FieldType,
}

impl FieldExpr {
    pub fn new(field: FieldType) -> Self {
        Self { field }
    }
}

impl Expr for FieldExpr {
    fn eval(&self, tuple: &Tuple) -> Result<DbValue> {
        let index = tuple.desc().resolve(&self.field)?;
        Ok(tuple.values()[index].clone())
    }

    fn expr_type(&self) -> FieldType {
        self.field.clone()
    }
}

/// Evaluates to the same value for every tuple
#[derive(Debug, Clone)]
pub struct ConstExpr {
    value: DbValue,
    field: FieldType,
}

impl ConstExpr {
    pub fn new(value: DbValue) -> Self {
        let field = FieldType::unqualified("const", value.db_type());
        Self { value, field }
    }
}

impl Expr for ConstExpr {
    fn eval(&self, _tuple: &Tuple) -> Result<DbValue> {
        Ok(self.value.clone())
    }

    fn expr_type(&self) -> FieldType {
        self.field.clone()
    }
}
