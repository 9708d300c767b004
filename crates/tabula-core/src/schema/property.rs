use crate::value::{Record, Type, Value};
use std::{fmt, sync::Arc};

/// A computed, read-only attribute. Properties are never derived as
/// serializer fields; they are dumped only when a field is declared for them.
#[derive(Clone)]
pub struct Property {
    pub name: String,
    pub ty: Type,
    compute: Arc<dyn Fn(&Record) -> Value + Send + Sync>,
}

impl Property {
    pub fn new(
        name: impl Into<String>,
        ty: impl Into<Type>,
        compute: impl Fn(&Record) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            compute: Arc::new(compute),
        }
    }

    pub fn compute(&self, record: &Record) -> Value {
        (self.compute)(record)
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .finish()
    }
}
