use super::Value;

/// A member of an enumerated type: the programmer-facing variant name and the
/// value that is persisted for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueEnum {
    pub variant: String,
    pub value: Box<Value>,
}

impl ValueEnum {
    pub fn new(variant: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            variant: variant.into(),
            value: Box::new(value.into()),
        }
    }
}
