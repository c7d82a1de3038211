//! The type algebra (spec.md §3, §4.1): primitives, arrays, variants, generic
//! type variables, variadic parameter groups and lambda (operator signature)
//! types.
mod display;
mod unify;

#[cfg(test)]
mod tests;

pub use unify::{match_types, substitute, Bindings, MatchError};

/// A primitive, non-structured type (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Null,
    String,
    Number,
    Boolean,
    Color,
    Object,
    /// The top type: any value at all.
    Value,
}

/// One parameter slot in a [`Type::Lambda`] signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamSpec {
    /// A single fixed parameter.
    Single(Type),
    /// A variadic group, repeated as a block to cover the actual argument
    /// count. May appear at most once per lambda, and only as the trailing
    /// element (spec.md §3 invariants).
    NArgs {
        min: Option<usize>,
        max: Option<usize>,
        items: Vec<Type>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Primitive(Primitive),
    Array {
        item_type: Box<Type>,
        length: Option<usize>,
    },
    /// The value satisfies any one member. Non-empty by construction; see
    /// [`Type::variant`].
    Variant(Vec<Type>),
    /// A generic type variable. Only meaningful inside a lambda signature.
    Typename(String),
    Lambda {
        result: Box<Type>,
        params: Vec<ParamSpec>,
    },
}

impl Type {
    pub fn null() -> Type {
        Type::Primitive(Primitive::Null)
    }

    pub fn string() -> Type {
        Type::Primitive(Primitive::String)
    }

    pub fn number() -> Type {
        Type::Primitive(Primitive::Number)
    }

    pub fn boolean() -> Type {
        Type::Primitive(Primitive::Boolean)
    }

    pub fn color() -> Type {
        Type::Primitive(Primitive::Color)
    }

    pub fn object() -> Type {
        Type::Primitive(Primitive::Object)
    }

    pub fn value() -> Type {
        Type::Primitive(Primitive::Value)
    }

    pub fn array(item_type: Type, length: Option<usize>) -> Type {
        Type::Array {
            item_type: Box::new(item_type),
            length,
        }
    }

    /// Build a variant type. Panics on an empty member list: spec.md §3
    /// requires a non-empty set of members, and an empty variant can never
    /// be constructed from well-formed operator signatures.
    pub fn variant(members: Vec<Type>) -> Type {
        assert!(
            !members.is_empty(),
            "Variant must have at least one member type"
        );
        Type::Variant(members)
    }

    pub fn typename(name: impl Into<String>) -> Type {
        Type::Typename(name.into())
    }

    pub fn lambda(result: Type, params: Vec<ParamSpec>) -> Type {
        Type::Lambda {
            result: Box::new(result),
            params,
        }
    }

    /// If this is a [`Type::Lambda`], its result type; otherwise `self`
    /// unchanged. Used to read the value type a specialized call (or a bare
    /// literal) produces when evaluated (spec.md §4.5).
    pub fn lambda_result(&self) -> Type {
        match self {
            Type::Lambda { result, .. } => (**result).clone(),
            other => other.clone(),
        }
    }

    /// True if this is a [`Type::Lambda`].
    pub fn is_lambda(&self) -> bool {
        matches!(self, Type::Lambda { .. })
    }

    /// True if this type (or, for compound types, any member/item) is or
    /// contains a [`Type::Typename`].
    pub fn contains_typename(&self) -> bool {
        match self {
            Type::Typename(_) => true,
            Type::Primitive(_) => false,
            Type::Array { item_type, .. } => item_type.contains_typename(),
            Type::Variant(members) => members.iter().any(Type::contains_typename),
            Type::Lambda { result, params } => {
                result.contains_typename()
                    || params.iter().any(|p| match p {
                        ParamSpec::Single(t) => t.contains_typename(),
                        ParamSpec::NArgs { items, .. } => items.iter().any(Type::contains_typename),
                    })
            }
        }
    }
}
