// In src/parser/test.rs

use super::ast::{self, BinOp, ExprKind, Literal, Statement, TypeSpecKind};
use super::parse;
use crate::lexer::lex;
use crate::reporter::CompilerError;

/// 辅助函数：解析必须成功，返回 AST。
fn parse_ok(src: &str) -> ast::Program {
    let (tokens, lex_errors) = lex(src);
    assert!(lex_errors.is_empty(), "lexing failed: {:?}", lex_errors);
    let (program, errors) = parse(src.len(), tokens);
    assert!(errors.is_empty(), "parsing failed: {:?}", errors);
    program.expect("no errors were reported but no AST was produced")
}

/// 辅助函数：解析必须失败，返回错误列表。
fn parse_err(src: &str) -> Vec<CompilerError> {
    let (tokens, lex_errors) = lex(src);
    assert!(lex_errors.is_empty(), "lexing failed: {:?}", lex_errors);
    let (program, errors) = parse(src.len(), tokens);
    assert!(program.is_none(), "parsing succeeded unexpectedly");
    assert!(!errors.is_empty());
    errors
}

#[test]
fn test_minimal_function() {
    let program = parse_ok("func main() endfunc");
    assert_eq!(program.functions.len(), 1);
    let func = &program.functions[0];
    assert_eq!(func.name.name, "main");
    assert!(func.params.is_empty());
    assert!(func.ret.is_none());
    assert!(func.decls.is_empty());
    assert!(func.body.is_empty());
}

#[test]
fn test_assignment_and_write() {
    let program = parse_ok("func main() var x:int; x = 2+3; write x; endfunc");
    let func = &program.functions[0];
    assert_eq!(func.decls.len(), 1);
    assert_eq!(func.decls[0].names[0].name, "x");
    assert_eq!(func.body.len(), 2);

    match &func.body[0] {
        Statement::Assign { left, right, .. } => {
            assert_eq!(left.ident.name, "x");
            assert!(left.index.is_none());
            match &right.kind {
                ExprKind::Binary { op, .. } => assert_eq!(*op, BinOp::Add),
                other => panic!("expected a binary expression, got {:?}", other),
            }
        }
        other => panic!("expected an assignment, got {:?}", other),
    }
    assert!(matches!(&func.body[1], Statement::WriteExpr { .. }));
}

#[test]
fn test_mixed_variable_declaration_groups() {
    // 一条 var 声明里可以出现多个“名字组 : 类型”
    let program = parse_ok("func main() var f:float, i,j:int; endfunc");
    let func = &program.functions[0];
    assert_eq!(func.decls.len(), 2);
    assert_eq!(func.decls[0].names.len(), 1);
    assert!(matches!(
        func.decls[0].ty.kind,
        TypeSpecKind::Basic(ast::BasicType::Float)
    ));
    assert_eq!(func.decls[1].names.len(), 2);
    assert!(matches!(
        func.decls[1].ty.kind,
        TypeSpecKind::Basic(ast::BasicType::Int)
    ));
}

#[test]
fn test_array_parameter_and_return_type() {
    let program = parse_ok(
        "func sum(a: array[3] of int): int var s,i:int; return s; endfunc \
         func main() endfunc",
    );
    assert_eq!(program.functions.len(), 2);
    let sum = &program.functions[0];
    assert_eq!(sum.params.len(), 1);
    match &sum.params[0].ty.kind {
        TypeSpecKind::Array { size, elem } => {
            assert_eq!(*size, 3);
            assert_eq!(*elem, ast::BasicType::Int);
        }
        other => panic!("expected an array type, got {:?}", other),
    }
    assert!(sum.ret.is_some());
}

#[test]
fn test_operator_precedence() {
    // 1+2*3 必须解析为 1+(2*3)
    let program = parse_ok("func main() var x:int; x = 1+2*3; endfunc");
    let func = &program.functions[0];
    let right = match &func.body[0] {
        Statement::Assign { right, .. } => right,
        other => panic!("expected an assignment, got {:?}", other),
    };
    match &right.kind {
        ExprKind::Binary { op, left, right } => {
            assert_eq!(*op, BinOp::Add);
            assert!(matches!(left.kind, ExprKind::Literal(Literal::Int(_))));
            assert!(matches!(right.kind, ExprKind::Binary { op: BinOp::Mul, .. }));
        }
        other => panic!("expected addition at the top, got {:?}", other),
    }
}

#[test]
fn test_left_associativity() {
    // 1-2-3 必须解析为 (1-2)-3
    let program = parse_ok("func main() var x:int; x = 1-2-3; endfunc");
    let func = &program.functions[0];
    let right = match &func.body[0] {
        Statement::Assign { right, .. } => right,
        other => panic!("expected an assignment, got {:?}", other),
    };
    match &right.kind {
        ExprKind::Binary { op, left, .. } => {
            assert_eq!(*op, BinOp::Sub);
            assert!(matches!(left.kind, ExprKind::Binary { op: BinOp::Sub, .. }));
        }
        other => panic!("expected subtraction at the top, got {:?}", other),
    }
}

#[test]
fn test_if_else_and_while() {
    let program = parse_ok(
        "func main() var i:int; \
         if i < 3 then i = 1; else i = 2; endif \
         while i < 3 do i = i + 1; endwhile \
         endfunc",
    );
    let func = &program.functions[0];
    assert_eq!(func.body.len(), 2);
    match &func.body[0] {
        Statement::If {
            then_branch,
            else_branch,
            ..
        } => {
            assert_eq!(then_branch.len(), 1);
            assert_eq!(else_branch.as_ref().map(|b| b.len()), Some(1));
        }
        other => panic!("expected an if statement, got {:?}", other),
    }
    assert!(matches!(&func.body[1], Statement::While { .. }));
}

#[test]
fn test_call_statement_and_expression() {
    let program = parse_ok(
        "func main() var x:int; f(1, x); x = g() + 1; read x; write \"done\"; return; endfunc",
    );
    let func = &program.functions[0];
    assert!(matches!(&func.body[0], Statement::ProcCall { call, .. } if call.args.len() == 2));
    assert!(matches!(&func.body[2], Statement::Read { .. }));
    match &func.body[3] {
        Statement::WriteString { text, .. } => assert_eq!(text, "\"done\""),
        other => panic!("expected a write-string, got {:?}", other),
    }
    assert!(matches!(&func.body[4], Statement::Return { value: None, .. }));
}

#[test]
fn test_node_ids_are_unique() {
    let program = parse_ok("func main() var x:int; x = x + 1; endfunc");
    let mut seen = std::collections::HashSet::new();
    assert!(seen.insert(program.id));
    let func = &program.functions[0];
    assert!(seen.insert(func.id));
    assert!(seen.insert(func.decls[0].id));
    if let Statement::Assign { left, right, .. } = &func.body[0] {
        assert!(seen.insert(left.id));
        assert!(seen.insert(right.id));
    }
}

#[test]
fn test_missing_semicolon_is_an_error() {
    let errors = parse_err("func main() var x:int; x = 1 endfunc");
    assert!(errors
        .iter()
        .any(|e| matches!(e, CompilerError::Parsing(_))));
}

#[test]
fn test_unterminated_function_is_an_error() {
    let errors = parse_err("func main() var x:int; x = 1;");
    assert!(errors
        .iter()
        .any(|e| matches!(e, CompilerError::Parsing(_))));
}
