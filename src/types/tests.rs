use super::*;
use proptest::prelude::*;

fn vec2() -> Type {
    Type::Structure(StructType::new(
        "Vec2",
        vec![Field::new("x", Type::INT), Field::new("y", Type::INT)],
    ))
}

fn vec3() -> Type {
    Type::Structure(StructType::new(
        "Vec3",
        vec![
            Field::new("x", Type::INT),
            Field::new("y", Type::INT),
            Field::new("z", Type::INT),
        ],
    ))
}

#[test]
fn test_primitive_equality() {
    assert!(Type::INT.equals(&Type::INT));
    assert!(!Type::INT.equals(&Type::FLOAT));
    assert!(!Type::STRING.equals(&Type::CHAR));
}

#[test]
fn test_struct_equality_is_directional() {
    assert!(vec2().equals(&vec3()));
    assert!(!vec3().equals(&vec2()));
}

#[test]
fn test_struct_field_type_must_match() {
    let float_point = Type::Structure(StructType::new(
        "FPoint",
        vec![Field::new("x", Type::FLOAT), Field::new("y", Type::FLOAT)],
    ));
    assert!(!vec2().equals(&float_point));
}

#[test]
fn test_struct_names_are_ignored() {
    let other = Type::Structure(StructType::new(
        "Pair",
        vec![Field::new("y", Type::INT), Field::new("x", Type::INT)],
    ));
    assert!(vec2().equals(&other));
    assert!(other.equals(&vec2()));
}

#[test]
fn test_array_equality() {
    assert!(Type::array(Type::INT).equals(&Type::array(Type::INT)));
    assert!(!Type::array(Type::INT).equals(&Type::array(Type::CHAR)));
    assert!(!Type::array(Type::INT).equals(&Type::INT));
}

#[test]
fn test_any_accepts_everything() {
    assert!(Type::Any.equals(&Type::INT));
    assert!(Type::Any.equals(&vec2()));
    assert!(Type::Any.equals(&Type::Nothing));
    assert!(Type::INT.equals(&Type::Any));
}

#[test]
fn test_empty_types_never_equal() {
    assert!(!Type::Nothing.equals(&Type::Nothing));
    assert!(!Type::Undefined.equals(&Type::Undefined));
    assert!(!Type::Nothing.equals(&Type::Undefined));
    assert!(!Type::Nothing.equals(&Type::Any));
    assert!(!Type::INT.equals(&Type::Nothing));
}

#[test]
fn test_result_equality_follows_payload() {
    assert!(Type::result(Type::CHAR).equals(&Type::result(Type::CHAR)));
    assert!(!Type::result(Type::CHAR).equals(&Type::result(Type::INT)));
    assert!(Type::result(vec2()).equals(&Type::result(vec3())));
}

#[test]
fn test_primitive_tag() {
    assert_eq!(Type::BOOL.primitive_tag(), Primitive::Bool);
    assert_eq!(vec2().primitive_tag(), Primitive::Struct);
    assert_eq!(Type::array(Type::INT).primitive_tag(), Primitive::Array);
    assert_eq!(Type::Undefined.primitive_tag(), Primitive::Undefined);
}

#[test]
fn test_display_and_describe() {
    assert_eq!(vec2().to_string(), "Structure Vec2");
    assert_eq!(Type::array(Type::INT).to_string(), "Array of Int");
    insta::assert_snapshot!(vec2().describe(), @"Structure Vec2 { x: Int, y: Int }");
    insta::assert_snapshot!(
        Type::result(Type::CHAR).describe(),
        @"Structure CharResult { value: Char, ok: Bool, err: String }"
    );
}

#[test]
fn test_builtin_names() {
    assert!(matches!(Type::builtin("INT"), Some(Type::Primitive(PrimKind::Int))));
    assert!(matches!(Type::builtin("str"), Some(Type::Primitive(PrimKind::String))));
    assert!(matches!(Type::builtin("a"), Some(Type::Any)));
    assert!(Type::builtin("vec2").is_none());
}

fn arb_prim() -> impl Strategy<Value = Type> {
    prop_oneof![
        Just(Type::BOOL),
        Just(Type::CHAR),
        Just(Type::INT),
        Just(Type::FLOAT),
        Just(Type::STRING),
    ]
}

fn arb_fields() -> impl Strategy<Value = Vec<Field>> {
    prop::collection::btree_map("[a-e]", arb_prim(), 0..5).prop_map(|m| {
        m.into_iter()
            .map(|(name, ty)| Field::new(name, ty))
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_struct_contains_its_prefix(fields in arb_fields(), extra in arb_fields()) {
        let small = StructType::new("A", fields.clone());
        let mut wide_fields = fields;
        for f in extra {
            if small.field(&f.name).is_none() {
                wide_fields.push(f);
            }
        }
        let wide = Type::Structure(StructType::new("B", wide_fields));
        prop_assert!(Type::Structure(small).equals(&wide));
    }

    #[test]
    fn prop_primitive_equality_is_reflexive(ty in arb_prim()) {
        prop_assert!(ty.equals(&ty));
        prop_assert!(Type::array(ty.clone()).equals(&Type::array(ty)));
    }
}
