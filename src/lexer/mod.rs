// 导入logos分词库
use logos::Logos;
// 导入错误处理模组
use crate::reporter::{CompilerError, LexerError};
// 导入定位处理
use crate::utils::Span;
use std::fmt;

// 声明单元测试模块
#[cfg(test)]
mod test;

// logos 解析时需要使用的错误类型
#[derive(Debug, Default, Clone, PartialEq)]
pub enum LexingError {
    /// 使用 `#[default]` 来指定当 logos 需要创建一个默认错误实例时
    /// 应该使用哪个变体。
    #[default]
    InvalidToken,
}

/// 词素定义
#[derive(Logos, Debug, PartialEq, Clone)]
// 当 logos 遇到无法识别的字符时，它会报告一个"LexingError"。
#[logos(error = LexingError)]
// 跳过空白
#[logos(skip r"[ \t\r\n\f]+")]
// 跳过单行注释
#[logos(skip r"//[^\n]*")]
// 跳过块注释
#[logos(skip r"/\*([^*]|\*[^/])*\*/")]
pub enum Token {
    // 结构关键字
    #[token("func")]
    Func,
    #[token("endfunc")]
    EndFunc,
    #[token("var")]
    Var,

    // 类型关键字
    #[token("int")]
    Int,
    #[token("float")]
    Float,
    #[token("bool")]
    Bool,
    #[token("char")]
    Char,
    #[token("array")]
    Array,
    #[token("of")]
    Of,

    // 语句关键字
    #[token("if")]
    If,
    #[token("then")]
    Then,
    #[token("else")]
    Else,
    #[token("endif")]
    EndIf,
    #[token("while")]
    While,
    #[token("do")]
    Do,
    #[token("endwhile")]
    EndWhile,
    #[token("read")]
    Read,
    #[token("write")]
    Write,
    #[token("return")]
    Return,

    // 逻辑运算关键字
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("not")]
    Not,

    // 布尔字面量
    #[token("true", |_| true)]
    #[token("false", |_| false)]
    Boolean(bool),

    // 浮点数字面量
    // logos 会优先尝试匹配这个更具体的规则，然后再尝试匹配整数。
    // 从而和下面的整数匹配区分
    #[regex(r"[0-9]+\.[0-9]+", |lex| lex.slice().to_string())]
    FloatVal(String),

    // 整数字面量
    // 和上面一样，先保留原文
    #[regex("[0-9]+", |lex| lex.slice().to_string())]
    IntVal(String),

    // 字符字面量
    #[regex(r"'([^'\\]|\\.)'", lex_char_literal)]
    CharVal(char),

    // 字符串字面量
    // 原文（含引号和转义）被原样保留，后端 writes 指令需要逐字输出它。
    #[regex(r#""([^"\\]|\\.)*""#, |lex| lex.slice().to_string())]
    StringVal(String),

    // 标识符
    // 函数名，变量名等
    #[regex("[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    // 运算符号
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("=")]
    Assign,
    #[token("==")]
    Eq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    Lte,
    #[token(">=")]
    Gte,

    // 连接符号
    #[token(":")]
    Colon,

    // 分割符号
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
}

// Implement Display for Token to make it easier to print them out in parser errors.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// 字符字面量的辅助解析函数
// 去除首尾引号并处理转义字符。
fn lex_char_literal(lex: &mut logos::Lexer<Token>) -> Option<char> {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];

    let mut chars = inner.chars();
    let first = chars.next()?;

    if first == '\\' {
        match chars.next() {
            Some('n') => Some('\n'),
            Some('t') => Some('\t'),
            Some('r') => Some('\r'),
            Some('\\') => Some('\\'),
            Some('\'') => Some('\''),
            Some('0') => Some('\0'),
            // 无法识别的转义序列，按原样保留被转义的字符
            Some(other) => Some(other),
            None => None,
        }
    } else {
        Some(first)
    }
}

/// 对源代码进行词法分析，返回一个 Token 向量和所有词法错误。
pub fn lex(source: &str) -> (Vec<(Token, Span)>, Vec<CompilerError>) {
    let mut tokens = Vec::new();
    let mut errors: Vec<CompilerError> = Vec::new();

    // lexer.spanned() 会产生 (Result<Token, LexingError>, Range<usize>)
    let lexer = Token::lexer(source).spanned();

    for (result, span) in lexer {
        match result {
            // 正常的 Token
            Ok(token) => tokens.push((token, span.into())),

            // logos 遇到了一个错误
            Err(_lexing_error) => {
                // LexingError 本身不包含无效字符的信息，
                // 需要从 `source` 和 `span` 中提取。
                let slice = &source[span.clone()];
                let unrecognized_char = slice.chars().next().unwrap_or_default();

                let error = LexerError::UnrecognizedToken {
                    unrecognized_char,
                    span: Span::from(span).into(),
                };
                errors.push(error.into());
            }
        }
    }

    (tokens, errors)
}
