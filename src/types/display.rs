//! Stable, human-readable rendering of [`Type`]s for diagnostic messages
//! (spec.md §4.1 `toString`).
//!
//! Grounded on `src/typechecker/variabletype.rs::VariableType`'s `Display`
//! impl in the teacher: a plain match over the variants building a `String`.
use std::fmt::{self, Display};

use super::{ParamSpec, Primitive, Type};

impl Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Primitive::Null => "Null",
            Primitive::String => "String",
            Primitive::Number => "Number",
            Primitive::Boolean => "Boolean",
            Primitive::Color => "Color",
            Primitive::Object => "Object",
            Primitive::Value => "Value",
        };
        f.write_str(name)
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(p) => write!(f, "{p}"),
            Type::Array { item_type, length } => match length {
                Some(len) => write!(f, "Array<{item_type}, {len}>"),
                None => write!(f, "Array<{item_type}>"),
            },
            Type::Variant(members) => {
                let rendered: Vec<String> = members.iter().map(Type::to_string).collect();
                write!(f, "{}", rendered.join(" | "))
            }
            Type::Typename(name) => write!(f, "{name}"),
            Type::Lambda { result, params } => {
                let rendered: Vec<String> = params.iter().map(ParamSpec::to_string).collect();
                write!(f, "({}) => {result}", rendered.join(", "))
            }
        }
    }
}

impl Display for ParamSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamSpec::Single(t) => write!(f, "{t}"),
            ParamSpec::NArgs { min, max, items } => {
                let rendered: Vec<String> = items.iter().map(Type::to_string).collect();
                let bound = match (min, max) {
                    (Some(min), Some(max)) => format!("{min}..{max}"),
                    (Some(min), None) => format!("{min}.."),
                    (None, Some(max)) => format!("..{max}"),
                    (None, None) => "..".to_owned(),
                };
                write!(f, "({})[{bound}]", rendered.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_array_with_length() {
        let ty = Type::array(Type::number(), Some(4));
        assert_eq!(ty.to_string(), "Array<Number, 4>");
    }

    #[test]
    fn renders_array_without_length() {
        let ty = Type::array(Type::number(), None);
        assert_eq!(ty.to_string(), "Array<Number>");
    }

    #[test]
    fn renders_primitive() {
        assert_eq!(Type::color().to_string(), "Color");
    }

    #[test]
    fn renders_lambda() {
        let ty = Type::lambda(
            Type::number(),
            vec![
                ParamSpec::Single(Type::number()),
                ParamSpec::Single(Type::number()),
            ],
        );
        assert_eq!(ty.to_string(), "(Number, Number) => Number");
    }

    #[test]
    fn renders_variant() {
        let ty = Type::variant(vec![Type::number(), Type::string()]);
        assert_eq!(ty.to_string(), "Number | String");
    }
}
