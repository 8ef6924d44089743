pub mod analyzer;
pub mod codegen;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod reporter;
mod utils;

pub use utils::Span;

use diagnostics::DiagnosticBag;

/// 编译一段 Asl 源代码，返回发射的三地址码程序文本。
///
/// 整条管线：词法分析 → 解析 → 符号收集 → 类型检查 → 代码生成。
/// 所有阶段的诊断都进入 `diagnostics`；任何一个阶段出错就返回 None，
/// 不生成任何代码。调用方负责在失败时打印诊断背包。
pub fn compile(source: &str, diagnostics: &mut DiagnosticBag) -> Option<String> {
    // 1. 词法分析
    let (tokens, lexer_errors) = lexer::lex(source);
    for error in &lexer_errors {
        diagnostics.report(error.into());
    }

    // 2. 解析
    // 即使有词法错误，也把 tokens 交给解析器，它可能会发现更多问题。
    let (ast, parser_errors) = parser::parse(source.len(), tokens);
    for error in &parser_errors {
        diagnostics.report(error.into());
    }

    // 词法或语法出过错的树不进入语义分析
    if diagnostics.has_errors() {
        return None;
    }
    let ast = ast?;

    // 3. 语义分析（符号收集 + 类型检查）
    let analyzer = analyzer::Analyzer::new(diagnostics);
    let mut analysis = analyzer.analyze(&ast)?;

    // 4. 代码生成。只有零诊断的树才走到这里。
    let tac = codegen::codegen(&ast, &mut analysis);
    Some(tac.to_string())
}
