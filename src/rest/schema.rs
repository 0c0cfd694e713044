//! Resource type descriptors.
//!
//! A [`ResourceType`] names a remote collection and declares the fields its
//! records carry. Descriptors are plain `static` values, so a relation field
//! can point at any other descriptor, including its own:
//!
//! ```rust
//! use drf_consumer::rest::{FieldDef, ResourceType};
//!
//! static GROUP_FIELDS: [FieldDef; 1] = [FieldDef::string("label")];
//! static GROUP: ResourceType = ResourceType::new("group", &GROUP_FIELDS);
//!
//! static USER_FIELDS: [FieldDef; 4] = [
//!     FieldDef::string("name"),
//!     FieldDef::int("age"),
//!     FieldDef::relation("group", &GROUP),
//!     FieldDef::string("password").private(),
//! ];
//! static USER: ResourceType = ResourceType::new("user", &USER_FIELDS);
//!
//! assert!(USER.validate().is_ok());
//! assert_eq!(USER.public_fields().count(), 3);
//! ```
//!
//! The `id` field is implicit: every type carries an integer `id`, whether
//! or not it is listed.

use std::collections::HashSet;
use std::fmt;

use crate::rest::ResourceError;

/// Field names starting with this prefix are never sent to the API.
pub const RESERVED_PREFIX: &str = "_";

/// Name of the implicit identifier field.
pub const ID_FIELD: &str = "id";

/// The declared kind of a field, which drives coercion of incoming values.
#[derive(Clone, Copy)]
pub enum FieldKind {
    /// Signed integer.
    Int,
    /// Floating point number.
    Float,
    /// Text.
    Str,
    /// Boolean.
    Bool,
    /// Any JSON value, stored as received.
    Json,
    /// A reference to a record of another resource type: either a bare id
    /// or a nested instance.
    Relation(&'static ResourceType),
}

impl FieldKind {
    /// Returns the kind name used in diagnostics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "string",
            Self::Bool => "bool",
            Self::Json => "json",
            Self::Relation(_) => "relation",
        }
    }

    /// Returns the related type for relation kinds.
    #[must_use]
    pub const fn related(&self) -> Option<&'static ResourceType> {
        match self {
            Self::Relation(ty) => Some(*ty),
            _ => None,
        }
    }
}

// Relations compare and print by type name; descriptors may reference
// themselves, so walking into the related type would never terminate.
impl PartialEq for FieldKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Relation(a), Self::Relation(b)) => a.name == b.name,
            (Self::Int, Self::Int)
            | (Self::Float, Self::Float)
            | (Self::Str, Self::Str)
            | (Self::Bool, Self::Bool)
            | (Self::Json, Self::Json) => true,
            _ => false,
        }
    }
}

impl Eq for FieldKind {}

impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Relation(ty) => f.debug_tuple("Relation").field(&ty.name).finish(),
            other => f.write_str(match other {
                Self::Int => "Int",
                Self::Float => "Float",
                Self::Str => "Str",
                Self::Bool => "Bool",
                _ => "Json",
            }),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Relation(ty) => write!(f, "relation({})", ty.name),
            other => f.write_str(other.as_str()),
        }
    }
}

/// A declared field of a resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    name: &'static str,
    kind: FieldKind,
    private: bool,
}

impl FieldDef {
    /// Declares a field of the given kind.
    #[must_use]
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            private: false,
        }
    }

    /// Declares an integer field.
    #[must_use]
    pub const fn int(name: &'static str) -> Self {
        Self::new(name, FieldKind::Int)
    }

    /// Declares a float field.
    #[must_use]
    pub const fn float(name: &'static str) -> Self {
        Self::new(name, FieldKind::Float)
    }

    /// Declares a text field.
    #[must_use]
    pub const fn string(name: &'static str) -> Self {
        Self::new(name, FieldKind::Str)
    }

    /// Declares a boolean field.
    #[must_use]
    pub const fn boolean(name: &'static str) -> Self {
        Self::new(name, FieldKind::Bool)
    }

    /// Declares a raw JSON field.
    #[must_use]
    pub const fn json(name: &'static str) -> Self {
        Self::new(name, FieldKind::Json)
    }

    /// Declares a relation to records of `related`.
    #[must_use]
    pub const fn relation(name: &'static str, related: &'static ResourceType) -> Self {
        Self::new(name, FieldKind::Relation(related))
    }

    /// Marks the field as private: it is hydrated but never sent.
    #[must_use]
    pub const fn private(mut self) -> Self {
        self.private = true;
        self
    }

    /// Returns the field name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the declared kind.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Returns `true` if the field was declared private.
    #[must_use]
    pub const fn is_private(&self) -> bool {
        self.private
    }

    /// Returns `true` if the field belongs in outgoing payloads.
    #[must_use]
    pub fn is_public(&self) -> bool {
        !self.private && !self.name.starts_with(RESERVED_PREFIX)
    }
}

/// Describes a remote collection: its URL name and its declared fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceType {
    name: &'static str,
    fields: &'static [FieldDef],
}

impl ResourceType {
    /// Creates a descriptor. Call [`validate`](Self::validate) (or construct
    /// an instance, which validates) before relying on it.
    #[must_use]
    pub const fn new(name: &'static str, fields: &'static [FieldDef]) -> Self {
        Self { name, fields }
    }

    /// Returns the collection name used in URLs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the declared fields, in declaration order.
    #[must_use]
    pub const fn fields(&self) -> &'static [FieldDef] {
        self.fields
    }

    /// Looks up a declared field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Returns the kind of a field, counting the implicit `id`.
    ///
    /// Returns `None` for undeclared names.
    #[must_use]
    pub fn kind_of(&self, name: &str) -> Option<FieldKind> {
        match self.field(name) {
            Some(field) => Some(field.kind),
            None if name == ID_FIELD => Some(FieldKind::Int),
            None => None,
        }
    }

    /// Returns `true` if `name` is declared or is the implicit `id`.
    #[must_use]
    pub fn declares(&self, name: &str) -> bool {
        self.kind_of(name).is_some()
    }

    /// Iterates over the declared fields that belong in outgoing payloads,
    /// skipping an explicit `id` declaration.
    pub fn public_fields(&self) -> impl Iterator<Item = &'static FieldDef> {
        self.fields
            .iter()
            .filter(|field| field.name != ID_FIELD && field.is_public())
    }

    /// Checks the descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidResourceType`] if:
    /// - the name is empty or contains `/`, `?` or `&`
    /// - a field name is empty or declared twice
    /// - an explicit `id` field is not [`FieldKind::Int`]
    pub fn validate(&self) -> Result<(), ResourceError> {
        validate_resource_name(self.name)?;

        let mut seen = HashSet::new();
        for field in self.fields {
            if field.name.trim().is_empty() {
                return Err(self.invalid("field with an empty name"));
            }
            if !seen.insert(field.name) {
                return Err(self.invalid(format!("field '{}' declared twice", field.name)));
            }
            if field.name == ID_FIELD && field.kind != FieldKind::Int {
                return Err(self.invalid(format!(
                    "field 'id' must be int, not {}",
                    field.kind
                )));
            }
        }

        Ok(())
    }

    fn invalid(&self, reason: impl Into<String>) -> ResourceError {
        ResourceError::InvalidResourceType {
            name: self.name.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Checks a collection name for use as a URL path segment.
///
/// # Errors
///
/// Returns [`ResourceError::InvalidResourceType`] if the name is empty or
/// contains `/`, `?` or `&`.
pub fn validate_resource_name(name: &str) -> Result<(), ResourceError> {
    let reason = if name.trim().is_empty() {
        "empty name"
    } else if name.contains(['/', '?', '&']) {
        "name must not contain '/', '?' or '&'"
    } else {
        return Ok(());
    };

    Err(ResourceError::InvalidResourceType {
        name: name.to_string(),
        reason: reason.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    static GROUP_FIELDS: [FieldDef; 1] = [FieldDef::string("label")];
    static GROUP: ResourceType = ResourceType::new("group", &GROUP_FIELDS);

    static USER_FIELDS: [FieldDef; 5] = [
        FieldDef::string("name"),
        FieldDef::float("score"),
        FieldDef::relation("group", &GROUP),
        FieldDef::string("token").private(),
        FieldDef::json("_cache"),
    ];
    static USER: ResourceType = ResourceType::new("user", &USER_FIELDS);

    static NODE_FIELDS: [FieldDef; 1] = [FieldDef::relation("parent", &NODE)];
    static NODE: ResourceType = ResourceType::new("node", &NODE_FIELDS);

    #[test]
    fn test_valid_descriptor() {
        assert!(USER.validate().is_ok());
        assert!(GROUP.validate().is_ok());
        assert_eq!(USER.name(), "user");
        assert_eq!(USER.to_string(), "user");
    }

    #[test]
    fn test_self_referencing_descriptor() {
        assert!(NODE.validate().is_ok());
        assert_eq!(NODE.kind_of("parent").and_then(|k| k.related()), Some(&NODE));
        assert_eq!(format!("{:?}", NODE.fields()[0].kind()), "Relation(\"node\")");
    }

    #[test]
    fn test_implicit_id_is_int() {
        assert_eq!(USER.kind_of("id"), Some(FieldKind::Int));
        assert!(USER.declares("id"));
        assert!(USER.field("id").is_none());
        assert!(!USER.declares("unknown"));
    }

    #[test]
    fn test_public_fields_skip_private_and_reserved() {
        let names: Vec<_> = USER.public_fields().map(FieldDef::name).collect();
        assert_eq!(names, vec!["name", "score", "group"]);
        assert!(USER.field("token").unwrap().is_private());
        assert!(!USER.field("_cache").unwrap().is_public());
    }

    #[test]
    fn test_rejects_bad_names() {
        for name in ["", "   ", "user/1", "user?x", "a&b"] {
            let ty = ResourceType::new(name, &[]);
            let err = ty.validate().unwrap_err();
            assert!(matches!(err, ResourceError::InvalidResourceType { .. }));
            assert!(err.is_local());
        }
    }

    #[test]
    fn test_rejects_bad_fields() {
        static EMPTY: [FieldDef; 1] = [FieldDef::int("")];
        static DUPLICATE: [FieldDef; 2] = [FieldDef::int("age"), FieldDef::string("age")];
        static BAD_ID: [FieldDef; 1] = [FieldDef::string("id")];
        static GOOD_ID: [FieldDef; 1] = [FieldDef::int("id")];

        assert!(ResourceType::new("x", &EMPTY).validate().is_err());
        let err = ResourceType::new("x", &DUPLICATE).validate().unwrap_err();
        assert!(err.to_string().contains("declared twice"));
        let err = ResourceType::new("x", &BAD_ID).validate().unwrap_err();
        assert!(err.to_string().contains("must be int"));
        assert!(ResourceType::new("x", &GOOD_ID).validate().is_ok());
    }

    #[test]
    fn test_kind_equality_and_display() {
        assert_eq!(FieldKind::Relation(&GROUP), FieldKind::Relation(&GROUP));
        assert_ne!(FieldKind::Relation(&GROUP), FieldKind::Relation(&USER));
        assert_ne!(FieldKind::Int, FieldKind::Float);
        assert_eq!(FieldKind::Relation(&GROUP).to_string(), "relation(group)");
        assert_eq!(FieldKind::Str.to_string(), "string");
    }
}
