use std::fmt;

/// A non-fatal diagnostic. Processing continues with a best-effort result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The input carried a key the serializer has no field for. The key is
    /// skipped.
    UnknownField { model: String, field: String },

    /// The record has no attribute for a dumped field. `null` is written in
    /// its place.
    MissingAttribute { model: String, field: String },

    /// Fewer records were found than keys were requested.
    UnresolvedKeys {
        model: String,
        field: String,
        requested: usize,
        found: usize,
    },

    /// A date was loaded from input carrying a non-zero time of day.
    TimeDiscarded { input: String },
}

impl Warning {
    pub(crate) fn log(&self) {
        match self {
            Self::UnknownField { model, field } => {
                tracing::warn!(%model, %field, "unknown field in input; skipped");
            }
            Self::MissingAttribute { model, field } => {
                tracing::warn!(%model, %field, "record has no such attribute; dumped as null");
            }
            Self::UnresolvedKeys {
                model,
                field,
                requested,
                found,
            } => {
                tracing::warn!(%model, %field, requested, found, "not all primary keys found");
            }
            Self::TimeDiscarded { input } => {
                tracing::warn!(%input, "time of day discarded while loading a date");
            }
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownField { model, field } => {
                write!(f, "unknown field `{field}` for `{model}`")
            }
            Self::MissingAttribute { model, field } => {
                write!(f, "`{model}` has no attribute `{field}`")
            }
            Self::UnresolvedKeys { model, field, .. } => {
                write!(f, "not all primary keys found for '{model}.{field}'")
            }
            Self::TimeDiscarded { input } => {
                write!(f, "time of day in '{input}' discarded for a date")
            }
        }
    }
}
