use super::{Codec, DateCodec, DateTimeCodec, DefaultCodec, EnumCodec};
use crate::Type;

use std::{fmt, sync::Arc};

type Predicate = dyn Fn(&Type) -> bool + Send + Sync;
type Factory = dyn Fn(&Type) -> Arc<dyn Codec> + Send + Sync;

/// Ordered `(predicate, factory)` rules choosing the default codec for a
/// column type. The first matching rule wins; [`DefaultCodec`] is the
/// fallback.
#[derive(Clone)]
pub struct CodecTable {
    rules: Vec<Rule>,
}

#[derive(Clone)]
struct Rule {
    predicate: Arc<Predicate>,
    factory: Arc<Factory>,
}

impl CodecTable {
    /// Date-time, then date, then enum.
    pub fn standard() -> Self {
        Self::empty()
            .push(Type::is_date_time, |_| Arc::new(DateTimeCodec))
            .push(Type::is_date, |_| Arc::new(DateCodec))
            .push(Type::is_enum, |ty| match ty.as_enum() {
                Some(ty_enum) => Arc::new(EnumCodec::new(ty_enum.clone())),
                None => Arc::new(DefaultCodec::new(ty.clone())),
            })
    }

    /// A table with no rules. Every column gets a [`DefaultCodec`].
    pub fn empty() -> Self {
        Self { rules: vec![] }
    }

    /// Adds a rule after the existing ones.
    pub fn push(
        mut self,
        predicate: impl Fn(&Type) -> bool + Send + Sync + 'static,
        factory: impl Fn(&Type) -> Arc<dyn Codec> + Send + Sync + 'static,
    ) -> Self {
        self.rules.push(Rule::new(predicate, factory));
        self
    }

    /// Adds a rule ahead of the existing ones.
    pub fn prepend(
        mut self,
        predicate: impl Fn(&Type) -> bool + Send + Sync + 'static,
        factory: impl Fn(&Type) -> Arc<dyn Codec> + Send + Sync + 'static,
    ) -> Self {
        self.rules.insert(0, Rule::new(predicate, factory));
        self
    }

    pub fn resolve(&self, ty: &Type) -> Arc<dyn Codec> {
        self.rules
            .iter()
            .find(|rule| (rule.predicate)(ty))
            .map(|rule| (rule.factory)(ty))
            .unwrap_or_else(|| Arc::new(DefaultCodec::new(ty.clone())))
    }
}

impl Rule {
    fn new(
        predicate: impl Fn(&Type) -> bool + Send + Sync + 'static,
        factory: impl Fn(&Type) -> Arc<dyn Codec> + Send + Sync + 'static,
    ) -> Self {
        Self {
            predicate: Arc::new(predicate),
            factory: Arc::new(factory),
        }
    }
}

impl Default for CodecTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for CodecTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecTable")
            .field("rules", &self.rules.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{value::TypeEnum, Cx, Json, Value};

    #[test]
    fn standard_rules_in_order() {
        let table = CodecTable::standard();
        let status = TypeEnum::new("Status").variant("ON", "on");

        assert!(format!("{:?}", table.resolve(&Type::DateTime)).contains("DateTimeCodec"));
        assert!(format!("{:?}", table.resolve(&Type::Date)).contains("DateCodec"));
        assert!(format!("{:?}", table.resolve(&status.into())).contains("EnumCodec"));
        assert!(format!("{:?}", table.resolve(&Type::String)).contains("DefaultCodec"));
    }

    #[test]
    fn prepended_rule_wins() {
        #[derive(Debug)]
        struct Upper;

        impl Codec for Upper {
            fn dump(&self, value: &Value) -> crate::Result<Json> {
                Ok(Json::from(value.as_str().unwrap_or_default().to_uppercase()))
            }

            fn load(&self, json: &Json, _cx: &mut Cx<'_>) -> crate::Result<Value> {
                Ok(Value::from(json.as_str().unwrap_or_default().to_lowercase()))
            }
        }

        let table = CodecTable::standard().prepend(|ty| *ty == Type::String, |_| Arc::new(Upper));
        let codec = table.resolve(&Type::String);

        assert_eq!(codec.dump(&Value::from("abc")).unwrap(), Json::from("ABC"));
        assert!(format!("{:?}", table.resolve(&Type::I64)).contains("DefaultCodec"));
    }
}
