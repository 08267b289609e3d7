//! Static descriptors for the content collections the console manages.
//!
//! Every admin form edits one record in one collection; the descriptors here
//! are all that distinguishes the collections server-side. CRUD itself is
//! generic (see `repository`).

use serde_json::{Map, Value};

use crate::error::AppError;

/// Value kind a field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A string. Required text fields must be non-blank.
    Text,
    /// A JSON number.
    Number,
    /// An ordered list of strings.
    TextList,
}

impl FieldKind {
    fn describe(&self) -> &'static str {
        match self {
            Self::Text => "a string",
            Self::Number => "a number",
            Self::TextList => "a list of strings",
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Text => value.is_string(),
            Self::Number => value.is_number(),
            Self::TextList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

const fn req(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        required: true,
    }
}

const fn opt(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        required: false,
    }
}

/// Descriptor for one content collection.
#[derive(Debug, Clone, Copy)]
pub struct EntitySchema {
    /// Route segment and stored discriminator.
    pub collection: &'static str,
    /// Namespace prefix for uploaded asset paths.
    pub asset_prefix: &'static str,
    pub fields: &'static [FieldSpec],
}

use FieldKind::{Number, Text, TextList};

/// All collections the console manages.
pub const CATALOG: &[EntitySchema] = &[
    EntitySchema {
        collection: "advisors",
        asset_prefix: "advisors",
        fields: &[
            req("name", Text),
            opt("organization", Text),
            opt("role", Text),
            opt("bio", Text),
        ],
    },
    EntitySchema {
        collection: "experts",
        asset_prefix: "experts",
        fields: &[
            req("name", Text),
            opt("specialty", Text),
            opt("career", TextList),
        ],
    },
    EntitySchema {
        collection: "facilities",
        asset_prefix: "facilities",
        fields: &[req("name", Text), opt("summary", Text), opt("floor", Text)],
    },
    EntitySchema {
        collection: "history",
        asset_prefix: "history",
        fields: &[
            req("year", Number),
            opt("month", Number),
            req("description", Text),
        ],
    },
    EntitySchema {
        collection: "programs",
        asset_prefix: "programs",
        fields: &[
            req("title", Text),
            opt("summary", Text),
            opt("audience", Text),
            opt("sessions", TextList),
        ],
    },
    EntitySchema {
        collection: "posts",
        asset_prefix: "posts",
        fields: &[req("title", Text), req("body", Text), opt("category", Text)],
    },
    EntitySchema {
        collection: "center-info",
        asset_prefix: "center-info",
        fields: &[req("title", Text), req("body", Text)],
    },
    EntitySchema {
        collection: "vision",
        asset_prefix: "vision",
        fields: &[
            req("title", Text),
            opt("statement", Text),
            opt("goals", TextList),
        ],
    },
    EntitySchema {
        collection: "locations",
        asset_prefix: "locations",
        fields: &[
            req("name", Text),
            req("address", Text),
            opt("phone", Text),
            opt("directions", TextList),
        ],
    },
];

impl EntitySchema {
    /// Look up a collection by its route segment.
    pub fn lookup(collection: &str) -> Option<&'static EntitySchema> {
        CATALOG.iter().find(|s| s.collection == collection)
    }

    fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validate a full field payload for `create`. Checks run before any
    /// store I/O: unknown fields are rejected, required fields must be
    /// present and non-blank, and every value must match its declared kind.
    pub fn validate_create(&self, fields: &Map<String, Value>) -> Result<(), AppError> {
        self.check_known_and_typed(fields)?;

        for spec in self.fields.iter().filter(|f| f.required) {
            match fields.get(spec.name) {
                None | Some(Value::Null) => {
                    return Err(AppError::Validation(format!(
                        "Field '{}' is required",
                        spec.name
                    )));
                }
                Some(value) => {
                    if is_blank(spec, value) {
                        return Err(AppError::Validation(format!(
                            "Field '{}' must not be blank",
                            spec.name
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Validate a partial field payload for `update`. Absent fields stay
    /// untouched; `null` clears an optional field but is rejected for a
    /// required one.
    pub fn validate_partial(&self, fields: &Map<String, Value>) -> Result<(), AppError> {
        self.check_known_and_typed(fields)?;

        for (name, value) in fields {
            let Some(spec) = self.field(name) else {
                continue;
            };
            if spec.required && (value.is_null() || is_blank(spec, value)) {
                return Err(AppError::Validation(format!(
                    "Field '{name}' is required and cannot be cleared"
                )));
            }
        }

        Ok(())
    }

    fn check_known_and_typed(&self, fields: &Map<String, Value>) -> Result<(), AppError> {
        for (name, value) in fields {
            let Some(spec) = self.field(name) else {
                return Err(AppError::Validation(format!(
                    "Unknown field '{name}' for collection '{}'",
                    self.collection
                )));
            };
            if !value.is_null() && !spec.kind.accepts(value) {
                return Err(AppError::Validation(format!(
                    "Field '{name}' must be {}",
                    spec.kind.describe()
                )));
            }
        }
        Ok(())
    }
}

fn is_blank(spec: &FieldSpec, value: &Value) -> bool {
    match spec.kind {
        FieldKind::Text => value.as_str().is_some_and(|s| s.trim().is_empty()),
        FieldKind::Number => false,
        FieldKind::TextList => value.as_array().is_some_and(|items| items.is_empty()),
    }
}

/// Apply a validated partial payload on top of stored fields.
///
/// Absent keys are untouched; `null` removes the key; anything else
/// replaces it.
pub fn merge_fields(existing: &Value, patch: &Map<String, Value>) -> Value {
    let mut merged = existing.as_object().cloned().unwrap_or_default();
    for (name, value) in patch {
        if value.is_null() {
            merged.remove(name);
        } else {
            merged.insert(name.clone(), value.clone());
        }
    }
    Value::Object(merged)
}
