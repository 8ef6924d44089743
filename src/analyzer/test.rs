// In src/analyzer/test.rs

use crate::analyzer::{Analysis, Analyzer};
use crate::diagnostics::DiagnosticBag;
use crate::lexer::lex;
use crate::parser::{ast, parse};

// 一个通用的设置函数，负责词法和语法分析
fn setup(src: &str) -> ast::Program {
    let (tokens, lex_errors) = lex(src);
    assert!(lex_errors.is_empty(), "lexing failed: {:?}", lex_errors);

    let (program, parse_errors) = parse(src.len(), tokens);
    assert!(parse_errors.is_empty(), "parsing failed: {:?}", parse_errors);

    program.expect("parsing succeeded with no errors, but no AST was produced")
}

/// 辅助函数：用于测试应该通过分析的代码。
/// 如果分析报出任何诊断，它会 panic 并显示错误码，让测试失败。
fn analyze_ok(src: &str) -> (ast::Program, Analysis) {
    let program = setup(src);
    let mut diagnostics = DiagnosticBag::new(src);
    let analysis = Analyzer::new(&mut diagnostics).analyze(&program);
    match analysis {
        Some(analysis) => (program, analysis),
        None => {
            let codes: Vec<&str> = diagnostics.iter().map(|d| d.code()).collect();
            panic!("analysis failed unexpectedly with codes {:?} for:\n{}", codes, src);
        }
    }
}

/// 辅助函数：用于测试应该产生语义错误的代码。
/// 返回按报出顺序排列的错误码列表。
fn analyze_err(src: &str) -> Vec<String> {
    let program = setup(src);
    let mut diagnostics = DiagnosticBag::new(src);
    let analysis = Analyzer::new(&mut diagnostics).analyze(&program);
    assert!(
        analysis.is_none(),
        "analysis succeeded unexpectedly for source:\n{}",
        src
    );
    diagnostics.iter().map(|d| d.code().to_string()).collect()
}

/// 在函数体里找第 i 条语句的赋值右侧表达式。
fn assign_right(function: &ast::Function, i: usize) -> &ast::Expression {
    match &function.body[i] {
        ast::Statement::Assign { right, .. } => right,
        other => panic!("expected an assignment, got {:?}", other),
    }
}

#[cfg(test)]
mod expressions {
    use super::*;

    #[test]
    fn test_integer_addition_is_int_and_not_lvalue() {
        let (program, analysis) =
            analyze_ok("func main() var x:int; x = 2 + 3; endfunc");
        let right = assign_right(&program.functions[0], 0);

        assert_eq!(
            analysis.decor.get_type(right.id),
            Some(analysis.types.integer())
        );
        assert_eq!(analysis.decor.get_is_lvalue(right.id), Some(false));
    }

    #[test]
    fn test_float_wins_in_mixed_arithmetic() {
        let (program, analysis) =
            analyze_ok("func main() var f:float, i:int; i = 3; f = i + 0.5; endfunc");
        let right = assign_right(&program.functions[0], 1);

        assert_eq!(
            analysis.decor.get_type(right.id),
            Some(analysis.types.float())
        );
    }

    #[test]
    fn test_comparison_is_bool() {
        let (program, analysis) =
            analyze_ok("func main() var b:bool; b = 10 > 5; endfunc");
        let right = assign_right(&program.functions[0], 0);

        assert_eq!(
            analysis.decor.get_type(right.id),
            Some(analysis.types.boolean())
        );
    }

    #[test]
    fn test_identifier_is_lvalue_function_is_not() {
        let (program, analysis) = analyze_ok(
            "func f(): int return 1; endfunc \
             func main() var x:int; x = x; x = f(); endfunc",
        );
        let main = &program.functions[1];
        // `x = x;` 的右侧是变量引用，应为左值
        let right = assign_right(main, 0);
        assert_eq!(analysis.decor.get_is_lvalue(right.id), Some(true));
        // `f()` 是调用结果，不是左值
        let call = assign_right(main, 1);
        assert_eq!(analysis.decor.get_is_lvalue(call.id), Some(false));
    }

    #[test]
    fn test_array_access_yields_element_type() {
        let (program, analysis) = analyze_ok(
            "func main() var a:array[3] of float; var x:float; x = a[0]; endfunc",
        );
        let right = assign_right(&program.functions[0], 0);
        assert_eq!(
            analysis.decor.get_type(right.id),
            Some(analysis.types.float())
        );
        assert_eq!(analysis.decor.get_is_lvalue(right.id), Some(true));
    }
}

#[cfg(test)]
mod statements {
    use super::*;

    #[test]
    fn test_valid_if_and_while() {
        let _ = analyze_ok(
            "func main() var i:int; \
             if i < 3 then i = 1; else i = 2; endif \
             while i < 3 do i = i + 1; endwhile \
             endfunc",
        );
    }

    #[test]
    fn test_int_into_float_assignment_is_legal() {
        let _ = analyze_ok("func main() var f:float; f = 3; endfunc");
    }

    #[test]
    fn test_int_into_float_return_is_legal() {
        let _ = analyze_ok(
            "func half(): float return 1; endfunc func main() var f:float; f = half(); endfunc",
        );
    }

    #[test]
    fn test_whole_array_assignment_same_shape() {
        let _ = analyze_ok(
            "func main() var a,b:array[3] of int; a = b; endfunc",
        );
    }

    #[test]
    fn test_read_and_write_basics() {
        let _ = analyze_ok(
            "func main() var x:int; var c:char; read x; read c; write x; write c; \
             write \"ok\"; endfunc",
        );
    }

    #[test]
    fn test_call_with_int_argument_for_float_parameter() {
        let _ = analyze_ok(
            "func p(f: float) endfunc func main() p(1); endfunc",
        );
    }
}

#[cfg(test)]
mod errors {
    use super::*;

    #[test]
    fn test_incompatible_assignment_surfaces_once() {
        // 类型错误只在检测到它的赋值处报一次，不级联
        let codes = analyze_err("func main() var b:bool; b = 1+2; endfunc");
        assert_eq!(codes, vec!["E0202"]);
    }

    #[test]
    fn test_undeclared_identifier_reports_once() {
        let codes = analyze_err("func main() x = 1; endfunc");
        assert_eq!(codes, vec!["E0201"]);
    }

    #[test]
    fn test_unary_over_errored_operand_does_not_cascade() {
        // `-q` 的操作数是 Error，一元节点也必须是 Error，
        // 否则赋值会在同一子树上再报一次
        let codes = analyze_err("func main() var b:bool; b = -q; endfunc");
        assert_eq!(codes, vec!["E0201"]);
        let codes = analyze_err("func main() var b:bool; b = not q; endfunc");
        assert_eq!(codes, vec!["E0201"]);
    }

    #[test]
    fn test_duplicate_variable() {
        let codes = analyze_err("func main() var x:int; var x:float; endfunc");
        assert_eq!(codes, vec!["E0200"]);
    }

    #[test]
    fn test_duplicate_parameter() {
        let codes = analyze_err("func f(a:int, a:float) endfunc func main() endfunc");
        assert_eq!(codes, vec!["E0200"]);
    }

    #[test]
    fn test_duplicate_function() {
        let codes = analyze_err("func f() endfunc func f() endfunc func main() endfunc");
        assert_eq!(codes, vec!["E0200"]);
    }

    #[test]
    fn test_if_condition_must_be_boolean() {
        let codes = analyze_err("func main() if 123 then endif endfunc");
        assert_eq!(codes, vec!["E0204"]);
    }

    #[test]
    fn test_while_condition_must_be_boolean() {
        let codes = analyze_err("func main() var i:int; while i do endwhile endfunc");
        assert_eq!(codes, vec!["E0204"]);
    }

    #[test]
    fn test_assignment_to_function_name() {
        // 函数名不是左值；函数类型也不可拷贝，所以两个诊断都会出现
        let codes = analyze_err("func f() endfunc func main() f = 1; endfunc");
        assert!(codes.contains(&"E0203".to_string()));
    }

    #[test]
    fn test_read_target_must_be_referenceable() {
        let codes = analyze_err("func main() read main; endfunc");
        assert_eq!(codes, vec!["E0206"]);
    }

    #[test]
    fn test_write_requires_basic_type() {
        let codes = analyze_err(
            "func main() var a:array[3] of int; write a; endfunc",
        );
        assert_eq!(codes, vec!["E0205"]);
    }

    #[test]
    fn test_incompatible_return() {
        // main 没有返回类型，返回 int 是错误
        let codes = analyze_err("func main() return 1; endfunc");
        assert_eq!(codes, vec!["E0207"]);
    }

    #[test]
    fn test_no_main_properly_declared() {
        let codes = analyze_err("func foo() endfunc");
        assert_eq!(codes, vec!["E0208"]);
    }

    #[test]
    fn test_main_with_parameters_is_not_proper() {
        let codes = analyze_err("func main(x:int) endfunc");
        assert_eq!(codes, vec!["E0208"]);
    }

    #[test]
    fn test_not_callable() {
        let codes = analyze_err("func main() var x:int; x(); endfunc");
        assert_eq!(codes, vec!["E0209"]);
    }

    #[test]
    fn test_void_call_used_as_value() {
        let codes = analyze_err(
            "func p() endfunc func main() var x:int; x = p(); endfunc",
        );
        assert_eq!(codes, vec!["E0210"]);
    }

    #[test]
    fn test_wrong_number_of_parameters() {
        let codes = analyze_err(
            "func f(a:int) endfunc func main() f(1, 2); endfunc",
        );
        assert_eq!(codes, vec!["E0211"]);
    }

    #[test]
    fn test_incompatible_parameter() {
        let codes = analyze_err(
            "func f(b:bool) endfunc func main() f(1); endfunc",
        );
        assert_eq!(codes, vec!["E0212"]);
    }

    #[test]
    fn test_array_access_on_non_array() {
        let codes = analyze_err("func main() var x:int; x[1] = 2; endfunc");
        assert_eq!(codes, vec!["E0213"]);
    }

    #[test]
    fn test_array_index_must_be_integer() {
        let codes = analyze_err(
            "func main() var a:array[3] of int; a[true] = 1; endfunc",
        );
        assert_eq!(codes, vec!["E0214"]);
    }

    #[test]
    fn test_modulo_rejects_float_operands() {
        let codes = analyze_err("func main() var x:int; x = 1.0 % 2; endfunc");
        assert_eq!(codes, vec!["E0215"]);
    }

    #[test]
    fn test_logical_operator_requires_booleans() {
        let codes = analyze_err("func main() var b:bool; b = 1 and 2; endfunc");
        assert_eq!(codes, vec!["E0215"]);
    }

    #[test]
    fn test_ordered_comparison_rejects_booleans() {
        let codes = analyze_err("func main() var b:bool; b = true < false; endfunc");
        assert_eq!(codes, vec!["E0215"]);
    }

    #[test]
    fn test_array_shapes_must_match_in_assignment() {
        let codes = analyze_err(
            "func main() var a:array[3] of int; var b:array[4] of int; a = b; endfunc",
        );
        assert_eq!(codes, vec!["E0202"]);
    }
}

#[cfg(test)]
mod laws {
    use super::*;
    use crate::analyzer::types::TypeTable;

    #[test]
    fn test_copyable_matches_assignment_diagnostics() {
        let mut types = TypeTable::new();
        let int = types.integer();
        let float = types.float();
        let boolean = types.boolean();
        let character = types.character();
        let arr3 = types.array(3, int);
        let arr3b = types.array(3, int);
        let arr4 = types.array(4, int);
        let arr3f = types.array(3, float);
        let func = types.function(vec![int], int);

        assert!(types.copyable(int, int));
        assert!(types.copyable(float, int));
        assert!(!types.copyable(int, float));
        assert!(types.copyable(boolean, boolean));
        assert!(!types.copyable(character, int));
        // 数组要求元素类型和大小都一致；驻留使这变成 id 相等
        assert_eq!(arr3, arr3b);
        assert!(types.copyable(arr3, arr3b));
        assert!(!types.copyable(arr3, arr4));
        assert!(!types.copyable(arr3, arr3f));
        // 函数类型永远不可拷贝
        assert!(!types.copyable(func, func));
    }

    #[test]
    fn test_comparable() {
        use crate::parser::ast::BinOp;
        let mut types = TypeTable::new();
        let int = types.integer();
        let float = types.float();
        let boolean = types.boolean();
        let character = types.character();
        let arr = types.array(2, int);

        // 相等性：同类型标量，加上 int/float 混用
        assert!(types.comparable(int, int, BinOp::Eq));
        assert!(types.comparable(int, float, BinOp::Ne));
        assert!(types.comparable(boolean, boolean, BinOp::Eq));
        assert!(types.comparable(character, character, BinOp::Ne));
        assert!(!types.comparable(boolean, int, BinOp::Eq));
        assert!(!types.comparable(arr, arr, BinOp::Eq));
        // 有序比较：数值对和字符对
        assert!(types.comparable(int, float, BinOp::Lt));
        assert!(types.comparable(character, character, BinOp::Le));
        assert!(!types.comparable(boolean, boolean, BinOp::Lt));
    }

    #[test]
    fn test_symbol_pass_is_deterministic() {
        // 同一棵树分析两次，作用域编号和节点类型完全一致
        let src = "func f(a: array[3] of int): int return a[0]; endfunc \
                   func main() var x:int; var b:array[3] of int; x = f(b); endfunc";

        let (program_a, analysis_a) = analyze_ok(src);
        let (program_b, analysis_b) = analyze_ok(src);

        assert_eq!(
            analysis_a.decor.get_scope(program_a.id),
            analysis_b.decor.get_scope(program_b.id)
        );
        for (fa, fb) in program_a
            .functions
            .iter()
            .zip(program_b.functions.iter())
        {
            assert_eq!(
                analysis_a.decor.get_scope(fa.id),
                analysis_b.decor.get_scope(fb.id)
            );
            assert_eq!(
                analysis_a.decor.get_type(fa.id),
                analysis_b.decor.get_type(fb.id)
            );
        }
    }
}
