//! 这个模块是整个编译器错误处理系统的核心。
//! 它使用 `thiserror` 和 `miette` 来定义所有结构化的诊断信息。

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// 顶层的编译器错误枚举。
/// 词法、语法和语义阶段的错误都会被包含在这里。
#[derive(Debug, Error, Diagnostic)]
pub enum CompilerError {
    /// 词法分析阶段的错误
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lexical(#[from] LexerError),

    /// 语法分析阶段的错误
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parsing(#[from] ParserError),

    /// 语义分析阶段的错误
    #[error(transparent)]
    #[diagnostic(transparent)]
    Semantic(#[from] SemanticError),
}

/// 词法分析器可能产生的所有错误的集合
#[derive(Debug, Error, Diagnostic)]
pub enum LexerError {
    #[error("unrecognized character '{unrecognized_char}'")]
    #[diagnostic(code(E0000))]
    UnrecognizedToken {
        unrecognized_char: char,
        #[label("this character is not part of the language")]
        span: SourceSpan,
    },
}

/// 语法分析器可能产生的所有错误的集合。
#[derive(Debug, Error, Diagnostic)]
pub enum ParserError {
    #[error("syntax error: expected {expected}, found {found}")]
    #[diagnostic(code(E0100))]
    UnexpectedToken {
        expected: String,
        found: String,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("syntax error: unexpected end of input, expected {expected}")]
    #[diagnostic(code(E0101))]
    UnexpectedEof {
        expected: String,
        #[label("input ends here")]
        span: SourceSpan,
    },
}

/// 语义分析器可能产生的所有错误的集合。
/// 每个变体对应一种固定措辞的诊断；span 指向引发错误的语法节点。
#[derive(Debug, Error, Diagnostic)]
pub enum SemanticError {
    #[error("duplicate declaration of '{name}'")]
    #[diagnostic(code(E0200))]
    DuplicateDeclaration {
        name: String,
        #[label("already declared in this scope")]
        span: SourceSpan,
    },

    #[error("undeclared identifier '{name}'")]
    #[diagnostic(code(E0201))]
    UndeclaredIdent {
        name: String,
        #[label("not found in any enclosing scope")]
        span: SourceSpan,
    },

    #[error("incompatible types in assignment: `{left}` = `{right}`")]
    #[diagnostic(code(E0202))]
    IncompatibleAssignment {
        left: String,
        right: String,
        #[label("the value type cannot be stored here")]
        span: SourceSpan,
    },

    #[error("left-hand side of assignment is not referenceable")]
    #[diagnostic(code(E0203))]
    NonReferenceableLeftExpr {
        #[label("this expression does not denote a storage location")]
        span: SourceSpan,
    },

    #[error("condition of `{construct}` must be `bool`, found `{found}`")]
    #[diagnostic(code(E0204))]
    BooleanRequired {
        construct: &'static str,
        found: String,
        #[label("this condition is not boolean")]
        span: SourceSpan,
    },

    #[error("`{operation}` requires a basic type, found `{found}`")]
    #[diagnostic(code(E0205))]
    ReadWriteRequireBasic {
        operation: &'static str,
        found: String,
        #[label("only int, float, bool and char can be used here")]
        span: SourceSpan,
    },

    #[error("target of `read` is not referenceable")]
    #[diagnostic(code(E0206))]
    NonReferenceableReadTarget {
        #[label("this expression does not denote a storage location")]
        span: SourceSpan,
    },

    #[error("incompatible `return`: function returns `{expected}`, found `{found}`")]
    #[diagnostic(code(E0207))]
    IncompatibleReturn {
        expected: String,
        found: String,
        #[label("this value cannot be returned here")]
        span: SourceSpan,
    },

    #[error("no `main` function properly declared")]
    #[diagnostic(code(E0208))]
    NoMainProperlyDeclared {
        #[label("the program needs a `main` with no parameters and no return type")]
        span: SourceSpan,
    },

    #[error("'{name}' is not callable")]
    #[diagnostic(code(E0209))]
    NotCallable {
        name: String,
        #[label("only functions can be called")]
        span: SourceSpan,
    },

    #[error("'{name}' does not return a value and cannot be used as an expression")]
    #[diagnostic(code(E0210))]
    NotAFunction {
        name: String,
        #[label("this call produces no value")]
        span: SourceSpan,
    },

    #[error("wrong number of parameters in call to '{name}': expected {expected}, found {found}")]
    #[diagnostic(code(E0211))]
    WrongNumberOfParameters {
        name: String,
        expected: usize,
        found: usize,
        #[label("this call has the wrong number of arguments")]
        span: SourceSpan,
    },

    #[error("incompatible parameter #{index} in call to '{name}': expected `{expected}`, found `{found}`")]
    #[diagnostic(code(E0212))]
    IncompatibleParameter {
        name: String,
        index: usize,
        expected: String,
        found: String,
        #[label("this argument has the wrong type")]
        span: SourceSpan,
    },

    #[error("array access on non-array type `{found}`")]
    #[diagnostic(code(E0213))]
    NonArrayInArrayAccess {
        found: String,
        #[label("this is not an array")]
        span: SourceSpan,
    },

    #[error("array index must be `int`, found `{found}`")]
    #[diagnostic(code(E0214))]
    NonIntegerIndex {
        found: String,
        #[label("this index is not an integer")]
        span: SourceSpan,
    },

    #[error("incompatible operands for operator `{op}`")]
    #[diagnostic(code(E0215))]
    IncompatibleOperator {
        op: String,
        #[label("the operand types do not fit this operator")]
        span: SourceSpan,
    },
}
