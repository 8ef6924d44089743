// src/diagnostics/codes.rs

use crate::diagnostics::DiagnosticLevel;

/// Represents a specific error code with its associated information.
/// This struct serves as the single source of truth for all compiler diagnostics.
#[derive(Debug, Clone)]
pub struct ErrorCode {
    pub code: &'static str,
    pub level: DiagnosticLevel,
    pub message: &'static str,
    pub explanation: &'static str,
}

/*
E00xx: 词法分析 (Lexical Analysis) 错误。

E01xx: 语法分析 (Parsing / Syntax) 错误。

E02xx: 语义分析 (Semantic Analysis) 错误。
*/
// --- E00xx: Lexical Analysis Errors ---

pub const E0000_UNRECOGNIZED_CHAR: ErrorCode = ErrorCode {
    code: "E0000",
    level: DiagnosticLevel::Error,
    message: "Unrecognized character",
    explanation: "The compiler encountered a character that is not part of the Asl language definition. \
                  This can happen due to typos or trying to use unsupported symbols.",
};

// --- E01xx: Syntax Analysis (Parsing) Errors ---

pub const E0100_SYNTAX_ERROR: ErrorCode = ErrorCode {
    code: "E0100",
    level: DiagnosticLevel::Error,
    message: "Syntax error",
    explanation: "The arrangement of tokens does not match any known grammar rule in Asl. \
                  Check for missing semicolons, a missing `endfunc`/`endif`/`endwhile`, or an incomplete expression.",
};

pub const E0101_UNEXPECTED_EOF: ErrorCode = ErrorCode {
    code: "E0101",
    level: DiagnosticLevel::Error,
    message: "Unexpected end of input",
    explanation: "The source file ended in the middle of a construct. A function body, statement or \
                  expression is left unfinished.",
};

// --- E02xx: Semantic Analysis Errors ---

pub const E0200_DUPLICATE_DECLARATION: ErrorCode = ErrorCode {
    code: "E0200",
    level: DiagnosticLevel::Error,
    message: "Duplicate declaration",
    explanation: "A variable, parameter or function with this name has already been declared in the \
                  current scope. Each identifier must be unique within its scope.",
};

pub const E0201_UNDECLARED_IDENT: ErrorCode = ErrorCode {
    code: "E0201",
    level: DiagnosticLevel::Error,
    message: "Undeclared identifier",
    explanation: "The compiler could not find a declaration for this identifier in the current scope \
                  or the global scope. Make sure it is declared before use and check for typos.",
};

pub const E0202_INCOMPATIBLE_ASSIGNMENT: ErrorCode = ErrorCode {
    code: "E0202",
    level: DiagnosticLevel::Error,
    message: "Incompatible assignment",
    explanation: "The type of the right-hand side cannot be stored into the left-hand side. The only \
                  implicit conversion Asl performs is int into float; arrays must match in element type and size.",
};

pub const E0203_NON_REFERENCEABLE_LEFT: ErrorCode = ErrorCode {
    code: "E0203",
    level: DiagnosticLevel::Error,
    message: "Left-hand side is not referenceable",
    explanation: "The expression on the left of `=` must denote a storage location: a variable, a \
                  parameter or an array element. Literals, operators and function names cannot be assigned to.",
};

pub const E0204_BOOLEAN_REQUIRED: ErrorCode = ErrorCode {
    code: "E0204",
    level: DiagnosticLevel::Error,
    message: "Boolean condition required",
    explanation: "The condition of an `if` or `while` must have type `bool`.",
};

pub const E0205_READ_WRITE_REQUIRE_BASIC: ErrorCode = ErrorCode {
    code: "E0205",
    level: DiagnosticLevel::Error,
    message: "read/write require a basic type",
    explanation: "`read` and `write` operate on the basic types int, float, bool and char. Whole arrays \
                  cannot be read or written in one statement.",
};

pub const E0206_NON_REFERENCEABLE_READ: ErrorCode = ErrorCode {
    code: "E0206",
    level: DiagnosticLevel::Error,
    message: "read target is not referenceable",
    explanation: "The target of a `read` must denote a storage location where the value can be placed.",
};

pub const E0207_INCOMPATIBLE_RETURN: ErrorCode = ErrorCode {
    code: "E0207",
    level: DiagnosticLevel::Error,
    message: "Incompatible return",
    explanation: "The type of the returned expression cannot be stored into the declared return type of \
                  the enclosing function. A `return;` with no value is only legal in a function with no return type.",
};

pub const E0208_NO_MAIN: ErrorCode = ErrorCode {
    code: "E0208",
    level: DiagnosticLevel::Error,
    message: "No main properly declared",
    explanation: "Every Asl program needs a function named `main` in the global scope, taking no \
                  parameters and returning no value. It is the entry point of the emitted program.",
};

pub const E0209_NOT_CALLABLE: ErrorCode = ErrorCode {
    code: "E0209",
    level: DiagnosticLevel::Error,
    message: "Not callable",
    explanation: "The identifier being used with parentheses `()` is not a function. It might be a \
                  variable or a parameter.",
};

pub const E0210_NOT_A_FUNCTION: ErrorCode = ErrorCode {
    code: "E0210",
    level: DiagnosticLevel::Error,
    message: "Procedure used as a value",
    explanation: "A call to a function without a return type produces no value and can only appear as a \
                  statement, never inside an expression.",
};

pub const E0211_WRONG_NUMBER_OF_PARAMETERS: ErrorCode = ErrorCode {
    code: "E0211",
    level: DiagnosticLevel::Error,
    message: "Wrong number of parameters",
    explanation: "The number of arguments in the call does not match the number of parameters in the \
                  function's declaration.",
};

pub const E0212_INCOMPATIBLE_PARAMETER: ErrorCode = ErrorCode {
    code: "E0212",
    level: DiagnosticLevel::Error,
    message: "Incompatible parameter",
    explanation: "An argument's type cannot be stored into the corresponding declared parameter type.",
};

pub const E0213_NON_ARRAY_ACCESS: ErrorCode = ErrorCode {
    code: "E0213",
    level: DiagnosticLevel::Error,
    message: "Array access on a non-array",
    explanation: "Only identifiers declared with an `array[N] of ...` type can be indexed with `[...]`.",
};

pub const E0214_NON_INTEGER_INDEX: ErrorCode = ErrorCode {
    code: "E0214",
    level: DiagnosticLevel::Error,
    message: "Non-integer array index",
    explanation: "The expression between `[` and `]` must have type `int`.",
};

pub const E0215_INCOMPATIBLE_OPERATOR: ErrorCode = ErrorCode {
    code: "E0215",
    level: DiagnosticLevel::Error,
    message: "Incompatible operator",
    explanation: "The operand types do not fit this operator. Arithmetic needs numeric operands (`%` needs \
                  integers), logical operators need booleans, and comparisons need two compatible scalars.",
};
