use super::*;
use std::collections::HashMap;

#[test]
fn value_matches_anything() {
    let bindings = Bindings::new();
    assert!(match_types(&Type::value(), &Type::number(), &bindings).is_ok());
    assert!(match_types(&Type::value(), &Type::color(), &bindings).is_ok());
}

#[test]
fn primitive_mismatch_is_error() {
    let bindings = Bindings::new();
    let err = match_types(&Type::number(), &Type::string(), &bindings).unwrap_err();
    assert_eq!(err.message(), "expected Number, got String");
}

#[test]
fn typename_binds_on_first_use() {
    let bindings = Bindings::new();
    let next = match_types(&Type::typename("T"), &Type::number(), &bindings).unwrap();
    assert_eq!(next.get("T"), Some(&Type::number()));
}

#[test]
fn typename_is_consistent_across_uses() {
    let bindings = Bindings::new();
    let bound = match_types(&Type::typename("T"), &Type::number(), &bindings).unwrap();
    // A second use of T against a different actual type must fail.
    assert!(match_types(&Type::typename("T"), &Type::string(), &bound).is_err());
    // The same actual type succeeds.
    assert!(match_types(&Type::typename("T"), &Type::number(), &bound).is_ok());
}

#[test]
fn variant_tries_members_in_order_and_accumulates_reasons() {
    let expected = Type::variant(vec![Type::number(), Type::color()]);
    let bindings = Bindings::new();
    let err = match_types(&expected, &Type::string(), &bindings).unwrap_err();
    assert_eq!(err.reasons.len(), 2);

    assert!(match_types(&expected, &Type::color(), &bindings).is_ok());
}

#[test]
fn array_length_mismatch_is_error() {
    let expected = Type::array(Type::number(), Some(4));
    let actual = Type::array(Type::number(), Some(3));
    let bindings = Bindings::new();
    assert!(match_types(&expected, &actual, &bindings).is_err());
}

#[test]
fn array_without_length_matches_any_length() {
    let expected = Type::array(Type::number(), None);
    let actual = Type::array(Type::number(), Some(3));
    let bindings = Bindings::new();
    assert!(match_types(&expected, &actual, &bindings).is_ok());
}

#[test]
fn array_item_type_mismatch_is_error() {
    let expected = Type::array(Type::number(), None);
    let actual = Type::array(Type::string(), None);
    let bindings = Bindings::new();
    assert!(match_types(&expected, &actual, &bindings).is_err());
}

#[test]
fn substitute_replaces_bound_typenames_and_leaves_unbound() {
    let mut bindings = Bindings::new();
    bindings.insert("T".to_owned(), Type::number());

    let ty = Type::lambda(
        Type::typename("T"),
        vec![
            ParamSpec::Single(Type::typename("T")),
            ParamSpec::Single(Type::typename("U")),
        ],
    );

    let specialized = substitute(&ty, &bindings);
    match specialized {
        Type::Lambda { result, params } => {
            assert_eq!(*result, Type::number());
            assert_eq!(params[0], ParamSpec::Single(Type::number()));
            assert_eq!(params[1], ParamSpec::Single(Type::typename("U")));
        }
        _ => panic!("expected lambda"),
    }
}

#[test]
fn contains_typename_detects_nested_variable() {
    let ty = Type::array(Type::typename("T"), None);
    assert!(ty.contains_typename());
    assert!(!Type::number().contains_typename());
}

#[test]
fn substitute_through_array_and_variant() {
    let mut bindings = HashMap::new();
    bindings.insert("T".to_owned(), Type::color());

    let ty = Type::variant(vec![Type::array(Type::typename("T"), None), Type::boolean()]);
    let specialized = substitute(&ty, &bindings);
    assert_eq!(
        specialized,
        Type::variant(vec![Type::array(Type::color(), None), Type::boolean()])
    );
}
