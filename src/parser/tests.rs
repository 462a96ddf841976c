use super::*;
use crate::types::Type;
use std::path::PathBuf;

fn parse(source: &str) -> Program {
    let result = parse_source(source, &PathBuf::from("test.skol"));
    match result {
        Ok(program) => program,
        Err(bag) => panic!("Parse error: {:?}", bag.diagnostics()),
    }
}

fn parse_err(source: &str) -> Vec<String> {
    match parse_source(source, &PathBuf::from("test.skol")) {
        Ok(_) => panic!("expected a parse error"),
        Err(bag) => bag.diagnostics().iter().map(|d| d.code.clone()).collect(),
    }
}

#[test]
fn test_parse_empty_program() {
    assert!(parse("").is_empty());
    assert!(parse("// only a comment\n").is_empty());
}

#[test]
fn test_parse_greeting() {
    let program = parse(
        r#"%greeting: "Hello, World!"
$main (
    print! greeting
)
"#,
    );
    assert_eq!(program.len(), 2);
    let global = &program.vars["greeting"];
    assert!(global.declared.is_none());
    assert!(matches!(&global.value.node, Node::String(s) if s == "Hello, World!"));

    let (main, _) = &program.funcs["main"];
    assert!(matches!(main.ret, Type::Nothing));
    assert_eq!(main.body.len(), 1);
    let Node::FuncCall { name, args } = &main.body[0].node else {
        panic!("expected a call, got {:?}", main.body[0].node);
    };
    assert_eq!(name, "print");
    assert!(matches!(&args[0].node, Node::Selector(sel) if sel.to_string() == "greeting"));
}

#[test]
fn test_parse_variable_forms() {
    let program = parse("%a: 1\n%b/float\n%c/string: \"x\"\n");
    assert!(program.vars["a"].declared.is_none());
    assert_eq!(program.typedefs["b"].ty.to_string(), "Float");
    assert_eq!(
        program.vars["c"].declared.as_ref().map(|t| t.to_string()),
        Some("String".to_string())
    );
}

#[test]
fn test_parse_function_with_params_and_return() {
    let program = parse("$add/int a/int b/int (\n  >add! a b\n)\n");
    let (def, span) = &program.funcs["add"];
    assert_eq!(span.start_line, 1);
    assert_eq!(def.params.len(), 2);
    assert_eq!(def.params[1].name, "b");
    assert_eq!(def.ret.to_string(), "Int");
    assert!(matches!(def.body[0].node, Node::Return(_)));
}

#[test]
fn test_shorthand_function_body() {
    let program = parse("$double/int n/int: mul! n 2\n$shout msg/string: print! msg\n");
    let (double, _) = &program.funcs["double"];
    assert!(matches!(double.body[0].node, Node::Return(_)));
    let (shout, _) = &program.funcs["shout"];
    assert!(matches!(shout.body[0].node, Node::FuncCall { .. }));
}

#[test]
fn test_parse_extern() {
    let program = parse("$puts/int s/string ?\"c_puts\"\n$exit code/int ?\n");
    let (puts, _) = &program.externs["puts"];
    assert_eq!(puts.name, "c_puts");
    assert_eq!(puts.params.len(), 1);
    let (exit, _) = &program.externs["exit"];
    assert_eq!(exit.name, "exit");
    assert!(matches!(exit.ret, Type::Nothing));
}

#[test]
fn test_forward_call_uses_prescanned_arity() {
    let program = parse("$b/int: a! 1 2\n$a/int x/int y/int: add! x y\n");
    let (b, _) = &program.funcs["b"];
    let Node::Return(value) = &b.body[0].node else {
        panic!("expected a return");
    };
    assert!(matches!(&value.node, Node::FuncCall { name, args } if name == "a" && args.len() == 2));
}

#[test]
fn test_parse_struct_definition_and_literals() {
    let program = parse(
        "@Vec2(x/int y/int)\n%origin: @Vec2 0 0\n%unit: @Vec2(1 1)\n%xs: [Vec2](origin unit)\n",
    );
    assert_eq!(program.structs["Vec2"].0.fields.len(), 2);
    assert!(matches!(&program.vars["origin"].value.node, Node::Struct(lit) if lit.args.len() == 2));
    assert!(matches!(&program.vars["unit"].value.node, Node::Struct(lit) if lit.ty.name == "Vec2"));
    let Node::Array(lit) = &program.vars["xs"].value.node else {
        panic!("expected an array literal");
    };
    assert_eq!(lit.elem.to_string(), "Structure Vec2");
}

#[test]
fn test_array_element_inference() {
    let program = parse("%xs: [](1 2 3)\n%ys: [[int]]()\n");
    let Node::Array(lit) = &program.vars["xs"].value.node else {
        panic!("expected an array literal");
    };
    assert_eq!(lit.elem.to_string(), "Int");
    assert_eq!(lit.elems.len(), 3);
    assert_eq!(program.vars["ys"].value.node.literal_type().map(|t| t.to_string()), Some("Array of Array of Int".to_string()));
}

#[test]
fn test_parse_selector_chain() {
    let program = parse("@P(name/string)\n%ps: [P]()\n%i: 0\n%c: ps#(i)#@P#name#0\n");
    let Node::Selector(sel) = &program.vars["c"].value.node else {
        panic!("expected a selector");
    };
    assert_eq!(sel.to_string(), "ps#(i)#@Structure P#name#0");
    assert_eq!(sel.path().len(), 5);
    assert_eq!(sel.kind(), NodeKind::IndexConst);
}

#[test]
fn test_constants_are_inlined() {
    let program = parse("#limit: 10\n%max: limit\n");
    assert!(matches!(program.vars["max"].value.node, Node::Int(10)));
}

#[test]
fn test_constant_after_selector_is_not_a_field() {
    let program = parse("%a: 1\n$main (\n  %b: a\n  #c: 2\n  print! str! c\n)\n");
    let (main, _) = &program.funcs["main"];
    assert_eq!(main.body.len(), 2);
    let Node::FuncCall { args, .. } = &main.body[1].node else {
        panic!("expected a call");
    };
    assert!(matches!(&args[0].node, Node::FuncCall { args, .. } if matches!(args[0].node, Node::Int(2))));
}

#[test]
fn test_parse_if_chain_and_while() {
    let program = parse(
        r#"$main (
    %n: 3
    ?gt! n 2 (print! "big")
    :?eq! n 2 (print! "two")
    :(print! "small")
    *gt! n 0 (%n: sub! n 1)
)
"#,
    );
    let (main, _) = &program.funcs["main"];
    assert_eq!(main.body.len(), 3);
    let Node::If(if_node) = &main.body[1].node else {
        panic!("expected an if");
    };
    assert_eq!(if_node.other.len(), 1);
    assert!(if_node.else_block.is_some());
    assert!(matches!(main.body[2].node, Node::While { .. }));
}

#[test]
fn test_bool_literals() {
    let program = parse("%yes: *\n%no: /\n");
    assert!(matches!(program.vars["yes"].value.node, Node::Bool(true)));
    assert!(matches!(program.vars["no"].value.node, Node::Bool(false)));
}

#[test]
fn test_local_names_do_not_leak_inward() {
    // `_helper` belongs to the body of `outer` and is invisible inside `inner`
    assert_eq!(
        parse_err("$outer (\n  $_helper: print! \"\"\n  $inner (_helper!)\n)\n"),
        vec!["E0011"]
    );
}

#[test]
fn test_statement_at_top_level_is_rejected() {
    assert_eq!(parse_err("print! \"hi\"\n"), vec!["E0009"]);
}

#[test]
fn test_unknown_function() {
    assert_eq!(parse_err("$main (nope! 1)\n"), vec!["E0011"]);
}

#[test]
fn test_unknown_type() {
    assert_eq!(parse_err("%a/Widget\n"), vec!["E1010"]);
}

#[test]
fn test_variable_needs_type_or_value() {
    assert_eq!(parse_err("%a\n%b: 1\n"), vec!["E0012"]);
}

#[test]
fn test_function_needs_body() {
    assert_eq!(parse_err("$main"), vec!["E0013"]);
}

#[test]
fn test_constant_redefined() {
    assert_eq!(parse_err("#a: 1\n#a: 2\n"), vec!["E0010"]);
}

#[test]
fn test_empty_array_needs_element_type() {
    assert_eq!(parse_err("%xs: []()\n"), vec!["E0014"]);
}

#[test]
fn test_unclosed_block() {
    assert_eq!(parse_err("$main (print! \"hi\"\n"), vec!["E0004"]);
}

#[test]
fn test_recovery_reports_each_item() {
    let codes = parse_err("%a: ~\n%b: 99999999999\n$main (print! \"fine\")\n");
    assert_eq!(codes, vec!["E0001", "E0003"]);
}

#[test]
fn test_parse_file_missing() {
    let bag = parse_file(&PathBuf::from("/definitely/not/here.skol")).unwrap_err();
    assert_eq!(bag.diagnostics()[0].code, "E0100");
}
