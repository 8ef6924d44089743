// src/analyzer/semantic_error.rs
//
// 语义错误到可渲染 Diagnostic 的转换表。
// 固定措辞在 reporter::SemanticError 的 #[error] 字符串里，
// 这里只负责挑选错误码和主标签。

use crate::diagnostics::{codes, Diagnostic, Label};
use crate::reporter::SemanticError;
use crate::utils::Span;

impl From<&SemanticError> for Diagnostic {
    fn from(error: &SemanticError) -> Self {
        use SemanticError::*;

        let (code, span, label) = match error {
            DuplicateDeclaration { span, .. } => (
                &codes::E0200_DUPLICATE_DECLARATION,
                span,
                "already declared in this scope",
            ),
            UndeclaredIdent { span, .. } => (
                &codes::E0201_UNDECLARED_IDENT,
                span,
                "not found in any enclosing scope",
            ),
            IncompatibleAssignment { span, .. } => (
                &codes::E0202_INCOMPATIBLE_ASSIGNMENT,
                span,
                "the value type cannot be stored here",
            ),
            NonReferenceableLeftExpr { span } => (
                &codes::E0203_NON_REFERENCEABLE_LEFT,
                span,
                "this expression does not denote a storage location",
            ),
            BooleanRequired { span, .. } => (
                &codes::E0204_BOOLEAN_REQUIRED,
                span,
                "this condition is not boolean",
            ),
            ReadWriteRequireBasic { span, .. } => (
                &codes::E0205_READ_WRITE_REQUIRE_BASIC,
                span,
                "only basic types can be used here",
            ),
            NonReferenceableReadTarget { span } => (
                &codes::E0206_NON_REFERENCEABLE_READ,
                span,
                "this expression does not denote a storage location",
            ),
            IncompatibleReturn { span, .. } => (
                &codes::E0207_INCOMPATIBLE_RETURN,
                span,
                "this value cannot be returned here",
            ),
            NoMainProperlyDeclared { span } => (
                &codes::E0208_NO_MAIN,
                span,
                "this program has no proper `main`",
            ),
            NotCallable { span, .. } => (
                &codes::E0209_NOT_CALLABLE,
                span,
                "only functions can be called",
            ),
            NotAFunction { span, .. } => (
                &codes::E0210_NOT_A_FUNCTION,
                span,
                "this call produces no value",
            ),
            WrongNumberOfParameters { span, .. } => (
                &codes::E0211_WRONG_NUMBER_OF_PARAMETERS,
                span,
                "wrong number of arguments in this call",
            ),
            IncompatibleParameter { span, .. } => (
                &codes::E0212_INCOMPATIBLE_PARAMETER,
                span,
                "this argument has the wrong type",
            ),
            NonArrayInArrayAccess { span, .. } => (
                &codes::E0213_NON_ARRAY_ACCESS,
                span,
                "this is not an array",
            ),
            NonIntegerIndex { span, .. } => (
                &codes::E0214_NON_INTEGER_INDEX,
                span,
                "this index is not an integer",
            ),
            IncompatibleOperator { span, .. } => (
                &codes::E0215_INCOMPATIBLE_OPERATOR,
                span,
                "the operand types do not fit this operator",
            ),
        };

        Diagnostic::error(code, Label::new(Span::from(*span), label))
            .with_dynamic_message(error.to_string())
    }
}
