//! Method shapes and signatures.
//!
//! Host operations carry no stable names across releases, so candidates are
//! found by *shape*: return type, parameter types and modifiers. A
//! [`MethodShape`] is the query, a [`MethodSignature`] is what each enumerated
//! candidate reports about itself.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies the host type whose members are enumerated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeHandle(String);

impl TypeHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A type appearing in a method signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum TypeRef {
    /// No return value.
    Void,
    /// The host's state blob type.
    StateBlob,
    /// Anything else, by host type name.
    Other(String),
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Void => f.write_str("void"),
            TypeRef::StateBlob => f.write_str("StateBlob"),
            TypeRef::Other(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Protected,
    Package,
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => f.write_str("public"),
            Visibility::Protected => f.write_str("protected"),
            Visibility::Package => f.write_str("package"),
            Visibility::Private => f.write_str("private"),
        }
    }
}

/// What an enumerated candidate reports about itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodSignature {
    /// Host-side member name. Informational only; never used for matching.
    pub name: String,
    pub return_type: TypeRef,
    pub params: Vec<TypeRef>,
    pub visibility: Visibility,
    pub is_static: bool,
}

impl MethodSignature {
    /// A public instance method.
    pub fn public(name: impl Into<String>, return_type: TypeRef, params: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            return_type,
            params,
            visibility: Visibility::Public,
            is_static: false,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Whether the method hands back a state blob rather than writing into its argument.
    pub fn returns_blob(&self) -> bool {
        self.return_type == TypeRef::StateBlob
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.visibility)?;
        if self.is_static {
            write!(f, "static ")?;
        }
        write!(f, "{} {}(", self.return_type, self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, ")")
    }
}

/// A query for candidate operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodShape {
    pub return_type: TypeRef,
    pub param_types: Vec<TypeRef>,
    pub must_be_public: bool,
    pub must_not_be_static: bool,
}

impl MethodShape {
    /// `public void m(StateBlob)`, the older calling convention.
    pub fn void_procedure() -> Self {
        Self {
            return_type: TypeRef::Void,
            param_types: vec![TypeRef::StateBlob],
            must_be_public: true,
            must_not_be_static: true,
        }
    }

    /// `public StateBlob m(StateBlob)`, the newer save convention.
    pub fn returning_blob() -> Self {
        Self {
            return_type: TypeRef::StateBlob,
            param_types: vec![TypeRef::StateBlob],
            must_be_public: true,
            must_not_be_static: true,
        }
    }

    pub fn matches(&self, signature: &MethodSignature) -> bool {
        if self.must_be_public && signature.visibility != Visibility::Public {
            return false;
        }
        if self.must_not_be_static && signature.is_static {
            return false;
        }
        signature.return_type == self.return_type && signature.params == self.param_types
    }
}

impl fmt::Display for MethodShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.must_be_public {
            write!(f, "public ")?;
        }
        write!(f, "{} _(", self.return_type)?;
        for (i, param) in self.param_types.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_void_shape_matches_public_instance_method() {
        let sig = MethodSignature::public("a", TypeRef::Void, vec![TypeRef::StateBlob]);
        assert!(MethodShape::void_procedure().matches(&sig));
        assert!(!MethodShape::returning_blob().matches(&sig));
    }

    #[test]
    fn test_shape_rejects_static_and_non_public() {
        let sig = MethodSignature::public("b", TypeRef::Void, vec![TypeRef::StateBlob]);
        assert!(!MethodShape::void_procedure().matches(&sig.clone().as_static()));
        assert!(!MethodShape::void_procedure()
            .matches(&sig.with_visibility(Visibility::Protected)));
    }

    #[test]
    fn test_shape_requires_exact_params() {
        let two = MethodSignature::public(
            "c",
            TypeRef::Void,
            vec![TypeRef::StateBlob, TypeRef::StateBlob],
        );
        let other = MethodSignature::public(
            "d",
            TypeRef::Void,
            vec![TypeRef::Other("World".into())],
        );
        assert!(!MethodShape::void_procedure().matches(&two));
        assert!(!MethodShape::void_procedure().matches(&other));
    }

    #[test]
    fn test_signature_display() {
        let sig = MethodSignature::public("e", TypeRef::StateBlob, vec![TypeRef::StateBlob]);
        assert_eq!(sig.to_string(), "public StateBlob e(StateBlob)");
        assert!(sig.returns_blob());
    }
}
