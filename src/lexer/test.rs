// In src/lexer/test.rs

use super::{lex, Token};

/// 辅助函数：词法分析必须无错误，只返回 Token 流。
fn lex_ok(src: &str) -> Vec<Token> {
    let (tokens, errors) = lex(src);
    assert!(errors.is_empty(), "unexpected lexer errors: {:?}", errors);
    tokens.into_iter().map(|(t, _)| t).collect()
}

#[test]
fn test_keywords_and_identifier() {
    let tokens = lex_ok("func main() endfunc");
    assert_eq!(
        tokens,
        vec![
            Token::Func,
            Token::Ident("main".to_string()),
            Token::LParen,
            Token::RParen,
            Token::EndFunc,
        ]
    );
}

#[test]
fn test_declaration_tokens() {
    let tokens = lex_ok("var x : array[10] of int;");
    assert_eq!(
        tokens,
        vec![
            Token::Var,
            Token::Ident("x".to_string()),
            Token::Colon,
            Token::Array,
            Token::LBracket,
            Token::IntVal("10".to_string()),
            Token::RBracket,
            Token::Of,
            Token::Int,
            Token::Semicolon,
        ]
    );
}

#[test]
fn test_operators() {
    let tokens = lex_ok("= == != < <= > >= + - * / %");
    assert_eq!(
        tokens,
        vec![
            Token::Assign,
            Token::Eq,
            Token::NotEq,
            Token::Lt,
            Token::Lte,
            Token::Gt,
            Token::Gte,
            Token::Plus,
            Token::Minus,
            Token::Star,
            Token::Slash,
            Token::Percent,
        ]
    );
}

#[test]
fn test_literals() {
    // 浮点字面量优先于整数匹配；字符串保留原文（含引号）
    let tokens = lex_ok(r#"3 3.5 true false 'a' '\n' "hi\n""#);
    assert_eq!(
        tokens,
        vec![
            Token::IntVal("3".to_string()),
            Token::FloatVal("3.5".to_string()),
            Token::Boolean(true),
            Token::Boolean(false),
            Token::CharVal('a'),
            Token::CharVal('\n'),
            Token::StringVal("\"hi\\n\"".to_string()),
        ]
    );
}

#[test]
fn test_comments_are_skipped() {
    let tokens = lex_ok("x // comment until end of line\n/* block\ncomment */ y");
    assert_eq!(
        tokens,
        vec![Token::Ident("x".to_string()), Token::Ident("y".to_string())]
    );
}

#[test]
fn test_keywords_are_not_identifiers() {
    // `whilex` 是标识符，`while` 是关键字
    let tokens = lex_ok("while whilex");
    assert_eq!(
        tokens,
        vec![Token::While, Token::Ident("whilex".to_string())]
    );
}

#[test]
fn test_unrecognized_character() {
    let (tokens, errors) = lex("x ? y");
    assert_eq!(tokens.len(), 2);
    assert_eq!(errors.len(), 1);
}
