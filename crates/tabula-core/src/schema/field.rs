use super::ModelId;
use crate::value::Type;
use crate::Value;
use std::fmt;

#[derive(Debug, Clone)]
pub struct Field {
    /// Uniquely identifies the field within the containing model.
    pub id: FieldId,

    /// The field name
    pub name: FieldName,

    /// Column or relation
    pub ty: FieldTy,

    /// True if the field is part of the primary key
    pub primary_key: bool,

    /// Value assigned when a record is instantiated
    pub default: Option<Value>,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct FieldId {
    pub model: ModelId,
    pub index: usize,
}

#[derive(Debug, Clone)]
pub struct FieldName {
    /// Attribute name, as seen on records and on the wire
    pub app_name: String,

    /// Underlying column name when it differs from the attribute name
    pub column_name: Option<String>,
}

impl FieldName {
    pub fn column_name(&self) -> &str {
        self.column_name.as_ref().unwrap_or(&self.app_name)
    }
}

#[derive(Clone)]
pub enum FieldTy {
    Primitive(FieldPrimitive),
    BelongsTo(BelongsTo),
    HasMany(HasMany),
    HasOne(HasOne),
}

#[derive(Debug, Clone)]
pub struct FieldPrimitive {
    /// The column's basic type
    pub ty: Type,

    /// Set when the column references another model's primary key
    pub foreign_key: Option<ForeignKey>,
}

#[derive(Debug, Clone)]
pub struct ForeignKey {
    /// Model whose primary key the column holds
    pub target: ModelId,

    /// The `BelongsTo` relation loaded through this key, if one was declared
    pub relation: Option<FieldId>,
}

#[derive(Debug, Clone)]
pub struct BelongsTo {
    pub target: ModelId,

    /// The column holding the target's key
    pub foreign_key: FieldId,
}

#[derive(Debug, Clone)]
pub struct HasMany {
    pub target: ModelId,
}

#[derive(Debug, Clone)]
pub struct HasOne {
    pub target: ModelId,
}

impl Field {
    /// The attribute name.
    pub fn name(&self) -> &str {
        &self.name.app_name
    }

    pub fn is_column(&self) -> bool {
        self.ty.is_primitive()
    }

    /// The column type, for primitive fields.
    pub fn column_ty(&self) -> Option<&Type> {
        self.ty.as_primitive().map(|primitive| &primitive.ty)
    }

    pub fn foreign_key(&self) -> Option<&ForeignKey> {
        self.ty
            .as_primitive()
            .and_then(|primitive| primitive.foreign_key.as_ref())
    }
}

impl FieldTy {
    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Primitive(..))
    }

    pub fn as_primitive(&self) -> Option<&FieldPrimitive> {
        match self {
            Self::Primitive(primitive) => Some(primitive),
            _ => None,
        }
    }

    pub fn as_primitive_mut(&mut self) -> Option<&mut FieldPrimitive> {
        match self {
            Self::Primitive(primitive) => Some(primitive),
            _ => None,
        }
    }

    pub fn is_has_many(&self) -> bool {
        matches!(self, Self::HasMany(..))
    }

    pub fn as_belongs_to(&self) -> Option<&BelongsTo> {
        match self {
            Self::BelongsTo(belongs_to) => Some(belongs_to),
            _ => None,
        }
    }
}

impl fmt::Debug for FieldTy {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(ty) => ty.fmt(fmt),
            Self::BelongsTo(ty) => ty.fmt(fmt),
            Self::HasMany(ty) => ty.fmt(fmt),
            Self::HasOne(ty) => ty.fmt(fmt),
        }
    }
}

impl FieldId {
    pub(crate) fn placeholder() -> Self {
        Self {
            model: ModelId::placeholder(),
            index: usize::MAX,
        }
    }

    /// The same field index on another model. Inherited fields keep their
    /// index in every descendant.
    pub(crate) fn rebase(self, model: ModelId) -> Self {
        Self {
            model,
            index: self.index,
        }
    }
}

impl From<&Self> for FieldId {
    fn from(val: &Self) -> Self {
        *val
    }
}

impl From<&Field> for FieldId {
    fn from(val: &Field) -> Self {
        val.id
    }
}

impl fmt::Debug for FieldId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "FieldId({}/{})", self.model.0, self.index)
    }
}
