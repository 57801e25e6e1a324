#[cfg(test)]
/// Parser unit tests.
///
/// These tests cover the expression grammar, scoping, the parse-time type checks and the two-phase
/// resolution of self-references in object literals.
mod tests {
    use super::*;
    use crate::lexer;

    fn parse_str(source: &str) -> Result<Program, CompileError> {
        let tokens = lexer::lex(source)?;
        parse(&tokens)
    }

    fn parse_err(source: &str) -> CompileError {
        match parse_str(source) {
            Ok(program) => panic!("expected an error for {source:?}, got {program:?}"),
            Err(e) => e,
        }
    }

    /// Type of the value bound by the `index`-th top-level `let`.
    fn let_type(program: &Program, index: usize) -> TypeNode {
        match &program.statements[index].kind {
            NodeKind::Let { value, .. } => value.expr_type().unwrap().clone(),
            other => panic!("expected let, got {other:?}"),
        }
    }

    fn member(ty: &TypeNode, name: &str) -> TypeNode {
        match ty {
            TypeNode::Object(s) => s.get(name).cloned().unwrap_or_else(|| panic!("no member {name} in {ty}")),
            other => panic!("expected object type, got {other}"),
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        let program = parse_str("let a = 2 + 3 * 4\n").unwrap();
        let NodeKind::Let { value, .. } = &program.statements[0].kind else {
            panic!("expected let");
        };
        match &value.kind {
            NodeKind::Binary { op, left, right } => {
                assert_eq!(*op, OperatorId::Plus);
                assert_eq!(left.kind, NodeKind::Literal(Literal::Int(2)));
                assert!(matches!(right.kind, NodeKind::Binary { op: OperatorId::Star, .. }));
            }
            other => panic!("expected binary, got {other:?}"),
        }
    }

    #[test]
    fn test_parentheses_override_precedence() {
        let program = parse_str("(2 + 3) * 4\n").unwrap();
        match &program.statements[0].kind {
            NodeKind::Binary { op, left, .. } => {
                assert_eq!(*op, OperatorId::Star);
                assert!(matches!(left.kind, NodeKind::Binary { op: OperatorId::Plus, .. }));
            }
            other => panic!("expected binary, got {other:?}"),
        }
    }

    #[test]
    fn test_same_precedence_is_left_associative() {
        let program = parse_str("10 - 4 - 3\n").unwrap();
        match &program.statements[0].kind {
            NodeKind::Binary { op, left, right } => {
                assert_eq!(*op, OperatorId::Minus);
                assert!(matches!(left.kind, NodeKind::Binary { op: OperatorId::Minus, .. }));
                assert_eq!(right.kind, NodeKind::Literal(Literal::Int(3)));
            }
            other => panic!("expected binary, got {other:?}"),
        }
    }

    #[test]
    fn test_assignment_is_right_associative() {
        let program = parse_str("let a = 1\nlet b = 2\na = b = 3\n").unwrap();
        match &program.statements[2].kind {
            NodeKind::Assign { left, right, .. } => {
                assert_eq!(left.kind, NodeKind::Identifier("a".into()));
                assert!(matches!(right.kind, NodeKind::Assign { .. }));
            }
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn test_comparison_yields_bool() {
        let program = parse_str("let a = 1 < 2 && 3 >= 2\n").unwrap();
        assert_eq!(let_type(&program, 0), TypeNode::bool());
    }

    #[test]
    fn test_string_concatenation_is_str() {
        let program = parse_str("let s = \"a\" + \"b\"\n").unwrap();
        assert_eq!(let_type(&program, 0), TypeNode::str());
    }

    #[test]
    fn test_mixed_operand_types_are_rejected() {
        let err = parse_err("let a = 1 + \"x\"\n");
        assert_eq!(err.kind, ErrorKind::Type);
    }

    #[test]
    fn test_bang_requires_bool() {
        let err = parse_err("let a = !1\n");
        assert_eq!(err.kind, ErrorKind::Type);
        let program = parse_str("let a = !true\n").unwrap();
        assert_eq!(let_type(&program, 0), TypeNode::bool());
    }

    #[test]
    fn test_cast_has_destination_type() {
        let program = parse_str("let f = 1 as float\n").unwrap();
        assert_eq!(let_type(&program, 0), TypeNode::float());
    }

    #[test]
    fn test_list_literal_takes_first_element_type() {
        let program = parse_str("let l = [1, 2, 3,]\nlet x = l[0]\nlet e = []\n").unwrap();
        assert_eq!(let_type(&program, 0), TypeNode::list(TypeNode::int()));
        assert_eq!(let_type(&program, 1), TypeNode::int());
        assert_eq!(let_type(&program, 2), TypeNode::list(TypeNode::Any));
    }

    #[test]
    fn test_list_index_must_be_int() {
        let err = parse_err("let l = [1]\nl[\"a\"]\n");
        assert_eq!(err.kind, ErrorKind::Type);
    }

    #[test]
    fn test_function_call_checks_arity_and_returns() {
        let program = parse_str("let f = <int x, int y,> int { return x + y }\nlet r = f(1, 2)\n").unwrap();
        assert_eq!(
            let_type(&program, 0),
            TypeNode::function(vec![TypeNode::int(), TypeNode::int()], TypeNode::int())
        );
        assert_eq!(let_type(&program, 1), TypeNode::int());

        let err = parse_err("let f = <int x> int { return x }\nf(1, 2)\n");
        assert_eq!(err.kind, ErrorKind::Type);
        assert!(err.message.contains("expects 1 argument"), "got: {}", err.message);
    }

    #[test]
    fn test_return_type_mismatch_is_type_error() {
        let err = parse_err("let f = <> int { return \"no\" }\n");
        assert_eq!(err.kind, ErrorKind::Type);
    }

    #[test]
    fn test_type_keyword_in_expression_is_type_literal() {
        let program = parse_str("let t = fn<int, str[]> bool\n").unwrap();
        assert_eq!(let_type(&program, 0), TypeNode::type_());
        let NodeKind::Let { value, .. } = &program.statements[0].kind else {
            panic!("expected let");
        };
        assert_eq!(
            value.kind,
            NodeKind::Literal(Literal::Type(TypeNode::function(
                vec![TypeNode::int(), TypeNode::list(TypeNode::str())],
                TypeNode::bool()
            )))
        );
    }

    #[test]
    fn test_null_in_expression_is_the_value() {
        let program = parse_str("let n = null\n").unwrap();
        assert_eq!(let_type(&program, 0), TypeNode::null());
    }

    // ========================================================================
    // Statements and scope
    // ========================================================================

    #[test]
    fn test_missing_terminator_is_syntax_error() {
        let err = parse_err("let a = 1 let b = 2\n");
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert!(err.message.contains("end of statement"), "got: {}", err.message);
    }

    #[test]
    fn test_explicit_semicolons_separate_statements() {
        let program = parse_str("let a = 1; let b = a; b").unwrap();
        assert_eq!(program.statements.len(), 3);
    }

    #[test]
    fn test_reassigning_with_other_type_is_type_error() {
        let err = parse_err("let a = 1; a = \"x\"\n");
        assert_eq!(err.kind, ErrorKind::Type);
    }

    #[test]
    fn test_compound_assignment_requires_numeric_target() {
        let program = parse_str("let a = 1\na += 2\n").unwrap();
        assert_eq!(program.statements.len(), 2);
        let err = parse_err("let b = true\nb -= false\n");
        assert_eq!(err.kind, ErrorKind::Type);
    }

    #[test]
    fn test_undeclared_identifier_is_scope_error() {
        let err = parse_err("b + 1\n");
        assert_eq!(err.kind, ErrorKind::Scope);
        assert!(err.message.contains("'b' is not declared"));
    }

    #[test]
    fn test_binding_is_not_visible_in_its_own_initializer() {
        let err = parse_err("let a = a\n");
        assert_eq!(err.kind, ErrorKind::Scope);
    }

    #[test]
    fn test_redeclaration_in_same_frame_is_scope_error() {
        let err = parse_err("let a = 1\nlet a = 2\n");
        assert_eq!(err.kind, ErrorKind::Scope);
    }

    #[test]
    fn test_block_declarations_do_not_escape() {
        parse_str("let a = 1\nif true { let a = 2 }\n").unwrap();
        let err = parse_err("if true { let x = 1 }\nx\n");
        assert_eq!(err.kind, ErrorKind::Scope);
    }

    #[test]
    fn test_else_if_chain() {
        let source = "let a = 1\nif a == 1 { a = 2 } else if a == 2 { a = 3 } else { a = 4 }\n";
        let program = parse_str(source).unwrap();
        match &program.statements[1].kind {
            NodeKind::If { else_body, .. } => {
                let else_body = else_body.as_ref().unwrap();
                assert_eq!(else_body.len(), 1);
                assert!(matches!(else_body[0].kind, NodeKind::If { else_body: Some(_), .. }));
            }
            other => panic!("expected if, got {other:?}"),
        }
    }

    #[test]
    fn test_condition_must_be_bool() {
        let err = parse_err("while 1 { }\n");
        assert_eq!(err.kind, ErrorKind::Type);
    }

    #[test]
    fn test_multi_line_block() {
        let source = "let n = 0\nwhile n < 10 {\n  n += 1\n  n = n * 1\n}\n";
        let program = parse_str(source).unwrap();
        match &program.statements[1].kind {
            NodeKind::While { body, .. } => assert_eq!(body.len(), 2),
            other => panic!("expected while, got {other:?}"),
        }
    }

    #[test]
    fn test_return_outside_function_is_scope_error() {
        let err = parse_err("return 1\n");
        assert_eq!(err.kind, ErrorKind::Scope);
    }

    #[test]
    fn test_statement_keyword_in_expression_is_syntax_error() {
        let err = parse_err("let a = let b = 1\n");
        assert_eq!(err.kind, ErrorKind::Syntax);
    }

    #[test]
    fn test_reserved_keyword_is_syntax_error() {
        let err = parse_err("break\n");
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert_eq!(err.message, "'break' is a reserved keyword");
    }

    #[test]
    fn test_reserved_keyword_as_binding_name_is_named() {
        let err = parse_err("let each = 1\n");
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert_eq!(err.message, "'each' is a reserved keyword and cannot be used as a name");

        let err = parse_err("let f = <int import> int {\n  return 1\n}\n");
        assert!(err.message.starts_with("'import' is a reserved keyword"), "{}", err.message);

        // Keywords in use keep the generic message.
        let err = parse_err("let while = 1\n");
        assert!(err.message.contains("identifier"), "{}", err.message);
    }

    #[test]
    fn test_this_outside_object_is_scope_error() {
        let err = parse_err("let a = this\n");
        assert_eq!(err.kind, ErrorKind::Scope);
    }

    // ========================================================================
    // Types
    // ========================================================================

    #[test]
    fn test_named_type_from_type_binding() {
        let program = parse_str("let T = int\nlet x = new T\n").unwrap();
        assert_eq!(let_type(&program, 1), TypeNode::Named("T".into()));
    }

    #[test]
    fn test_named_type_requires_type_binding() {
        let err = parse_err("let a = 1\nlet x = new a\n");
        assert_eq!(err.kind, ErrorKind::Type);
    }

    #[test]
    fn test_derived_type_from_typeof() {
        let program = parse_str("let a = 1\nlet x = new typeof a\n").unwrap();
        assert!(matches!(let_type(&program, 1), TypeNode::Derived(_)));
    }

    #[test]
    fn test_new_object_type() {
        let program = parse_str("let o = new obj{int a, str b,}\n").unwrap();
        let ty = let_type(&program, 0);
        assert_eq!(member(&ty, "a"), TypeNode::int());
        assert_eq!(member(&ty, "b"), TypeNode::str());
    }

    #[test]
    fn test_duplicate_object_type_member_is_scope_error() {
        let err = parse_err("let t = obj{int a, str a,}\n");
        assert_eq!(err.kind, ErrorKind::Scope);
    }

    // ========================================================================
    // Object literals
    // ========================================================================

    #[test]
    fn test_object_literal_members() {
        let program = parse_str("let o = { a = 1, b = \"x\", }\nlet y = o.b\n").unwrap();
        let ty = let_type(&program, 0);
        assert_eq!(member(&ty, "a"), TypeNode::int());
        assert_eq!(let_type(&program, 1), TypeNode::str());
    }

    #[test]
    fn test_object_entry_requires_trailing_comma() {
        let err = parse_err("let o = { a = 1 }\n");
        assert_eq!(err.kind, ErrorKind::Syntax);
    }

    #[test]
    fn test_duplicate_object_member_is_scope_error() {
        let err = parse_err("let o = { a = 1, a = 2, }\n");
        assert_eq!(err.kind, ErrorKind::Scope);
    }

    #[test]
    fn test_member_used_before_its_definition() {
        let program = parse_str("let o = { c = <>int{ return this.a + 10 }, a = 5, }\nlet r = o.c()\n").unwrap();
        let ty = let_type(&program, 0);
        assert_eq!(member(&ty, "c"), TypeNode::function(vec![], TypeNode::int()));
        assert_eq!(let_type(&program, 1), TypeNode::int());

        // The deferred nodes inside the method body were rewritten to concrete types.
        let NodeKind::Let { value, .. } = &program.statements[0].kind else {
            panic!("expected let");
        };
        let NodeKind::Literal(Literal::Object(fields)) = &value.kind else {
            panic!("expected object literal");
        };
        let NodeKind::Literal(Literal::Function(func)) = &fields[0].value.kind else {
            panic!("expected function literal");
        };
        let NodeKind::Return(returned) = &func.body[0].kind else {
            panic!("expected return");
        };
        assert_eq!(returned.ty, Some(TypeNode::int()));
    }

    #[test]
    fn test_deferred_call_through_sibling_method() {
        let source = "let o = { a = 1, f = <>int{ return this.g() }, g = <>int{ return this.a }, }\n";
        let program = parse_str(source).unwrap();
        assert_eq!(member(&let_type(&program, 0), "f"), TypeNode::function(vec![], TypeNode::int()));
    }

    #[test]
    fn test_unknown_self_member_is_type_error() {
        let err = parse_err("let o = { f = <>int{ return this.zz }, }\n");
        assert_eq!(err.kind, ErrorKind::Type);
        assert!(err.message.contains("'zz'"), "got: {}", err.message);
    }

    #[test]
    fn test_nested_object_refers_to_outer_object() {
        let program = parse_str("let o = { a = 1, b = { c = this.a, }, }\n").unwrap();
        let b = member(&let_type(&program, 0), "b");
        assert_eq!(member(&b, "c"), TypeNode::int());
    }

    #[test]
    fn test_self_dependent_member_type_is_rejected() {
        let err = parse_err("let o = { x = { y = this.x, }, }\n");
        assert_eq!(err.kind, ErrorKind::Type);
        assert!(err.message.contains("depends on its own type"), "got: {}", err.message);
    }

    #[test]
    fn test_access_assignment_binds_this_to_target() {
        let source = "let o = { a = 1, f = <>int{ return 0 }, }\no.f = <>int{ return this.a }\n";
        let program = parse_str(source).unwrap();
        assert_eq!(program.statements.len(), 2);
    }

    // ========================================================================
    // Persistent scope
    // ========================================================================

    #[test]
    fn test_parse_with_scope_keeps_declarations() {
        let mut scope = Scope::new();
        parse_with_scope(&lexer::lex("let a = 1\n").unwrap(), &mut scope).unwrap();
        let program = parse_with_scope(&lexer::lex("let b = a + 1\n").unwrap(), &mut scope).unwrap();
        assert_eq!(let_type(&program, 0), TypeNode::int());
        assert!(scope.has("b"));
    }

    #[test]
    fn test_parse_with_scope_rolls_back_failed_unit() {
        let mut scope = Scope::new();
        parse_with_scope(&lexer::lex("let a = 1\n").unwrap(), &mut scope).unwrap();
        let err = parse_with_scope(&lexer::lex("let b = 2\nlet c = zz\n").unwrap(), &mut scope).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Scope);
        assert!(scope.has("a"));
        assert!(!scope.has("b"));
        assert_eq!(scope.depth(), 1);
    }
}
