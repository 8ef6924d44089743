pub mod ast;
mod main;

#[cfg(test)]
mod test;

use crate::lexer::Token;
use crate::reporter::CompilerError;
use crate::utils::Span;
use main::Parser;

/// 解析一个 Token 流。
///
/// 返回 AST（若无语法错误）和收集到的所有解析错误。
/// 带语法错误的树不会交给语义分析，所以出错时 AST 为 `None`。
pub fn parse(
    source_len: usize,
    tokens: Vec<(Token, Span)>,
) -> (Option<ast::Program>, Vec<CompilerError>) {
    Parser::new(source_len, &tokens).parse()
}
