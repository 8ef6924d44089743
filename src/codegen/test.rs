// In src/codegen/test.rs

use super::{codegen, Instruction, TacProgram};
use crate::analyzer::{Analysis, Analyzer};
use crate::diagnostics::DiagnosticBag;
use crate::lexer::lex;
use crate::parser::{ast, parse};

// --- Test Harness ---

/// 完整跑一遍“词法 → 解析 → 语义分析”。任何一步失败都 panic，
/// 这在测试里是可接受的。
fn build(source: &str) -> (ast::Program, Analysis) {
    let (tokens, lex_errors) = lex(source);
    assert!(lex_errors.is_empty(), "lexing failed: {:?}", lex_errors);

    let (program, parse_errors) = parse(source.len(), tokens);
    assert!(parse_errors.is_empty(), "parsing failed: {:?}", parse_errors);
    let program = program.expect("parsing succeeded but produced no AST");

    let mut diagnostics = DiagnosticBag::new(source);
    let analysis = Analyzer::new(&mut diagnostics).analyze(&program);
    match analysis {
        Some(analysis) => (program, analysis),
        None => {
            let codes: Vec<&str> = diagnostics.iter().map(|d| d.code()).collect();
            panic!("analysis failed with codes {:?} for:\n{}", codes, source);
        }
    }
}

/// 编译到结构化的目标程序。
fn codegen_program(source: &str) -> TacProgram {
    let (program, mut analysis) = build(source);
    codegen(&program, &mut analysis)
}

/// 编译到文本形式。大多数断言直接在文本上做。
fn codegen_test_harness(source: &str) -> String {
    codegen_program(source).to_string()
}

/// 断言 `earlier` 在 `later` 之前出现在文本里。
fn assert_ordered(text: &str, earlier: &str, later: &str) {
    let a = text
        .find(earlier)
        .unwrap_or_else(|| panic!("`{}` not found in:\n{}", earlier, text));
    let b = text
        .find(later)
        .unwrap_or_else(|| panic!("`{}` not found in:\n{}", later, text));
    assert!(
        a < b,
        "`{}` should come before `{}` in:\n{}",
        earlier,
        later,
        text
    );
}

// --- Test Cases ---

#[test]
fn test_hello_integer() {
    // x = 2+3; write x; 应当出现整数加法和整数输出
    let text = codegen_test_harness("func main() var x:int; x = 2+3; write x; endfunc");

    assert!(text.contains("subroutine main"));
    assert!(text.contains("var x : int : 1"));
    assert_ordered(&text, "iload %T0, 2", "iload %T1, 3");
    assert_ordered(&text, "add %T2, %T0, %T1", "iload x, %T2");
    assert_ordered(&text, "iload x, %T2", "writei x");
}

#[test]
fn test_every_subroutine_ends_with_return() {
    let program = codegen_program(
        "func f(): int return 2; endfunc \
         func g() endfunc \
         func main() g(); endfunc",
    );
    assert_eq!(program.subroutines().len(), 3);
    for subroutine in program.subroutines() {
        let last = subroutine.body().iter().last();
        assert_eq!(
            last,
            Some(&Instruction::Return),
            "subroutine {} does not end with return",
            subroutine.name
        );
    }
}

#[test]
fn test_float_coercion_in_mixed_addition() {
    // i+0.5 的整数侧要有 float 转换，之后才是 fadd；
    // 赋值目标是 float，用 fload 存储
    let text = codegen_test_harness(
        "func main() var f:float, i:int; i = 3; f = i + 0.5; write f; endfunc",
    );

    assert_ordered(&text, "float %T", "fadd ");
    assert!(text.contains("fload f, "));
    assert!(text.contains("writef f"));
}

#[test]
fn test_int_literal_into_float_variable() {
    let text = codegen_test_harness("func main() var f:float; f = 3; endfunc");
    // 右侧是 int，左侧是 float：先转换再存
    assert_ordered(&text, "iload %T0, 3", "float %T1, %T0");
    assert!(text.contains("fload f, %T1"));
}

#[test]
fn test_array_parameter_is_by_reference() {
    let text = codegen_test_harness(
        "func sum(a: array[3] of int): int \
           var s,i:int; \
           s = 0; i = 0; \
           while i < 3 do s = s + a[i]; i = i + 1; endwhile \
           return s; \
         endfunc \
         func main() \
           var v:array[3] of int; var r:int; \
           v[0] = 1; v[1] = 2; v[2] = 3; \
           r = sum(v); \
           write r; \
         endfunc",
    );

    // 形参带 byref 标记，_result 在最前面
    assert_ordered(&text, "param _result : int", "param a : int byref");
    // 通过形参读元素：先 load 基地址，再 loadx
    assert_ordered(&text, "load %T", "loadx %T");
    // 局部数组作实参要取地址
    assert!(text.contains("aload %T"));
    // sum 的调用协议
    assert_ordered(&text, "push", "call sum");
    assert_ordered(&text, "call sum", "pop %T");
}

#[test]
fn test_paired_if_labels_share_a_number() {
    let text = codegen_test_harness(
        "func main() var b:bool; var x:int; \
         if b then x = 1; else x = 2; endif \
         if b then x = 3; else x = 4; endif \
         endfunc",
    );

    // 第一个 if 得到 else0/endif0，第二个 else1/endif1
    assert_ordered(&text, "fjump b, else0", "label else0:");
    assert_ordered(&text, "ujump endif0", "label endif0:");
    assert_ordered(&text, "label endif0:", "fjump b, else1");
    assert_ordered(&text, "label else1:", "label endif1:");
}

#[test]
fn test_if_without_else_jumps_to_endif() {
    let text = codegen_test_harness(
        "func main() var b:bool; var x:int; if b then x = 1; endif endfunc",
    );
    assert_ordered(&text, "fjump b, endif0", "label endif0:");
    assert!(!text.contains("else0"));
}

#[test]
fn test_while_label_shape() {
    let text = codegen_test_harness(
        "func main() var i:int; while i < 3 do i = i + 1; endwhile endfunc",
    );

    assert_ordered(&text, "label while0:", "fjump %T");
    assert_ordered(&text, "fjump %T1, endwhile0", "ujump while0");
    assert_ordered(&text, "ujump while0", "label endwhile0:");
}

#[test]
fn test_if_and_while_counters_are_independent() {
    let text = codegen_test_harness(
        "func main() var b:bool; var i:int; \
         while b do i = 1; endwhile \
         if b then i = 2; endif \
         endfunc",
    );
    // 两个计数器各自从 0 开始
    assert!(text.contains("label while0:"));
    assert!(text.contains("label endif0:"));
}

#[test]
fn test_modulo_is_three_instruction_sequence() {
    // q = a/b; m = b*q; r = a-m
    let text = codegen_test_harness(
        "func main() var x,a,b:int; x = a % b; endfunc",
    );
    assert_ordered(&text, "div %T1, a, b", "mul %T2, b, %T1");
    assert_ordered(&text, "mul %T2, b, %T1", "sub %T0, a, %T2");
    assert!(text.contains("iload x, %T0"));
}

#[test]
fn test_not_equal_is_eq_then_not() {
    let text = codegen_test_harness(
        "func main() var b:bool; var x,y:int; b = x != y; endfunc",
    );
    assert_ordered(&text, "eq %T0, x, y", "not %T0, %T0");
}

#[test]
fn test_greater_than_swaps_operands() {
    let text = codegen_test_harness(
        "func main() var b:bool; var x,y:int; b = x > y; b = x >= y; endfunc",
    );
    assert!(text.contains("lt %T0, y, x"));
    assert!(text.contains("le %T1, y, x"));
}

#[test]
fn test_float_comparison_converts_into_fresh_temp() {
    let text = codegen_test_harness(
        "func main() var b:bool; var i:int; b = i < 1.5; endfunc",
    );
    // 整数侧转换进新的临时，原地不被改写
    assert_ordered(&text, "fload %T0, 1.5", "float %T1, i");
    assert!(text.contains("flt %T2, %T1, %T0"));
}

#[test]
fn test_logical_operators_evaluate_both_sides() {
    let text = codegen_test_harness(
        "func main() var a,b,c:bool; c = a and b; c = a or b; endfunc",
    );
    assert!(text.contains("and %T0, a, b"));
    assert!(text.contains("or %T1, a, b"));
}

#[test]
fn test_boolean_literals_load_one_and_zero() {
    let text = codegen_test_harness(
        "func main() var b:bool; b = true; b = false; endfunc",
    );
    assert!(text.contains("iload %T0, 1"));
    assert!(text.contains("iload %T1, 0"));
}

#[test]
fn test_call_protocol_for_value_returning_function() {
    let text = codegen_test_harness(
        "func f(x:int): int return x; endfunc \
         func main() var y:int; y = f(1); endfunc",
    );

    // 结果槽 → 实参压栈 → call → 实参弹栈 → 结果弹进临时
    let main_part = &text[text.find("subroutine main").unwrap()..];
    assert_ordered(main_part, "push\n", "push %T0");
    assert_ordered(main_part, "push %T0", "call f");
    assert_ordered(main_part, "call f", "pop\n");
    assert_ordered(main_part, "pop\n", "pop %T1");
    assert!(main_part.contains("iload y, %T1"));
}

#[test]
fn test_procedure_call_has_no_result_slot() {
    let text = codegen_test_harness(
        "func p(x:int) endfunc \
         func main() p(7); endfunc",
    );
    let main_part = &text[text.find("subroutine main").unwrap()..];
    // 只有实参的一次 push / pop，没有结果槽，也没有 pop 进临时
    assert!(main_part.contains("push %T0"));
    assert!(!main_part.contains("pop %T"));
}

#[test]
fn test_int_argument_coerced_for_float_parameter() {
    let text = codegen_test_harness(
        "func p(f: float) endfunc func main() p(1); endfunc",
    );
    assert_ordered(&text, "iload %T0, 1", "float %T1, %T0");
    assert!(text.contains("push %T1"));
}

#[test]
fn test_forwarding_array_parameter_needs_no_aload() {
    // 形参本身已经持有地址，直接转发
    let text = codegen_test_harness(
        "func g(a: array[2] of int) endfunc \
         func f(a: array[2] of int) g(a); endfunc \
         func main() endfunc",
    );
    let f_part = &text[text.find("subroutine f").unwrap()..text.find("subroutine main").unwrap()];
    assert!(!f_part.contains("aload"));
    assert!(f_part.contains("push a"));
}

#[test]
fn test_read_scalar_and_element() {
    let text = codegen_test_harness(
        "func main() var x:float; var a:array[3] of int; \
         read x; read a[0]; endfunc",
    );
    assert!(text.contains("readf x"));
    // 元素目标：读进临时再 xload
    assert_ordered(&text, "readi %T1", "xload a, %T0, %T1");
}

#[test]
fn test_write_string_is_verbatim() {
    let text = codegen_test_harness(r#"func main() write "hi\n"; endfunc"#);
    assert!(text.contains(r#"writes "hi\n""#));
}

#[test]
fn test_write_char_expression() {
    let text = codegen_test_harness("func main() var c:char; c = 'a'; write c; endfunc");
    assert!(text.contains("chload %T0, a"));
    assert!(text.contains("chload c, %T0"));
    assert!(text.contains("writec c"));
}

#[test]
fn test_whole_array_copy_is_unrolled_element_loop() {
    let text = codegen_test_harness(
        "func main() var a,b:array[2] of int; a = b; endfunc",
    );
    // 每个元素一组 iload/loadx/xload，复用同一对临时
    assert_ordered(&text, "iload %T0, 0", "loadx %T1, b, %T0");
    assert_ordered(&text, "loadx %T1, b, %T0", "xload a, %T0, %T1");
    assert_ordered(&text, "xload a, %T0, %T1", "iload %T0, 1");
}

#[test]
fn test_element_to_element_assignment() {
    let text = codegen_test_harness(
        "func main() var a,b:array[3] of int; a[0] = b[1]; endfunc",
    );
    // 右元素先取成右值，再 xload 进左元素
    assert_ordered(&text, "loadx %T", "xload a, ");
}

#[test]
fn test_return_coerces_int_into_float_result() {
    let text = codegen_test_harness(
        "func half(): float return 1; endfunc \
         func main() var f:float; f = half(); endfunc",
    );
    assert_ordered(&text, "float %T1, %T0", "load _result, %T1");
    assert_ordered(&text, "load _result, %T1", "return");
}

#[test]
fn test_counters_reset_at_function_entry() {
    let text = codegen_test_harness(
        "func f(): int return 1+2; endfunc \
         func main() var x:int; x = 3+4; endfunc",
    );
    // 两个函数都从 %T0 开始编号
    let f_part = &text[text.find("subroutine f").unwrap()..text.find("subroutine main").unwrap()];
    let main_part = &text[text.find("subroutine main").unwrap()..];
    assert!(f_part.contains("iload %T0, 1"));
    assert!(main_part.contains("iload %T0, 3"));
}

#[test]
fn test_unary_operators() {
    let text = codegen_test_harness(
        "func main() var x:int; var f:float; var b:bool; \
         x = -x; f = -f; b = not b; x = +x; endfunc",
    );
    assert!(text.contains("neg %T0, x"));
    assert!(text.contains("fneg %T1, f"));
    assert!(text.contains("not %T2, b"));
    // 一元加是恒等：直接存回
    assert!(text.contains("iload x, x"));
}

#[test]
fn test_parameter_array_element_as_left_value() {
    // 通过按引用形参写元素：先 load 基地址再 xload
    let text = codegen_test_harness(
        "func clear(a: array[2] of int) a[0] = 0; endfunc \
         func main() endfunc",
    );
    assert_ordered(&text, "load %T2, a", "xload %T2, %T0, %T1");
}
