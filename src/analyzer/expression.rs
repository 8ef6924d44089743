// In src/analyzer/expression.rs
//
// PASS 2 的表达式规则。每个规则给自己的节点挂上类型和左值标记；
// 操作数已经是 Error 的地方不再产生新的诊断，避免连锁报错。

use super::symbols::SymbolKind;
use super::types::TypeId;
use super::Analyzer;
use crate::parser::ast::{self, BinOp, UnaryOp};
use crate::reporter::SemanticError;
use crate::utils::Span;

impl<'a> Analyzer<'a> {
    /// 检查一个表达式，返回其类型。类型和左值标记同时写进旁挂属性表。
    pub(crate) fn check_expression(&mut self, expr: &ast::Expression) -> TypeId {
        let (ty, is_lvalue) = match &expr.kind {
            ast::ExprKind::Literal(literal) => (self.literal_type(literal), false),
            ast::ExprKind::Ident(ident) => self.check_ident(ident),
            ast::ExprKind::Paren(inner) => (self.check_expression(inner), false),
            ast::ExprKind::ArrayAccess { base, index } => self.check_array_access(base, index),
            ast::ExprKind::Call(call) => self.check_call_expr(call, expr.span),
            ast::ExprKind::Unary { op, operand } => self.check_unary(*op, operand, expr.span),
            ast::ExprKind::Binary { op, left, right } => {
                self.check_binary(*op, left, right, expr.span)
            }
        };

        self.decor.put_type(expr.id, ty);
        self.decor.put_is_lvalue(expr.id, is_lvalue);
        ty
    }

    fn literal_type(&self, literal: &ast::Literal) -> TypeId {
        match literal {
            ast::Literal::Int(_) => self.types.integer(),
            ast::Literal::Float(_) => self.types.float(),
            ast::Literal::Bool(_) => self.types.boolean(),
            ast::Literal::Char(_) => self.types.character(),
        }
    }

    /// 标识符规则。未声明的名字得到 Error 类型，但左值标记设为 true，
    /// 这样赋值和 read 的后续规则不会在同一处再报一次错。
    fn check_ident(&mut self, ident: &ast::Ident) -> (TypeId, bool) {
        match self.symbols.find_in_stack(&ident.name) {
            Some(symbol) => {
                let ty = symbol.ty;
                let is_lvalue = symbol.kind != SymbolKind::Function;
                (ty, is_lvalue)
            }
            None => {
                self.error(SemanticError::UndeclaredIdent {
                    name: ident.name.clone(),
                    span: ident.span.into(),
                });
                (self.types.error(), true)
            }
        }
    }

    fn check_unary(
        &mut self,
        op: UnaryOp,
        operand: &ast::Expression,
        span: Span,
    ) -> (TypeId, bool) {
        let t1 = self.check_expression(operand);

        // Error 沿子树向上传播，不在同一处再生成新类型
        if self.types.is_error(t1) {
            return (t1, false);
        }

        let result = match op {
            UnaryOp::Not => {
                if !self.types.is_boolean(t1) {
                    self.error(SemanticError::IncompatibleOperator {
                        op: op.to_string(),
                        span: span.into(),
                    });
                }
                self.types.boolean()
            }
            UnaryOp::Plus | UnaryOp::Minus => {
                if !self.types.is_numeric(t1) {
                    self.error(SemanticError::IncompatibleOperator {
                        op: op.to_string(),
                        span: span.into(),
                    });
                }
                if self.types.is_float(t1) {
                    self.types.float()
                } else {
                    self.types.integer()
                }
            }
        };

        (result, false)
    }

    fn check_binary(
        &mut self,
        op: BinOp,
        left: &ast::Expression,
        right: &ast::Expression,
        span: Span,
    ) -> (TypeId, bool) {
        let t1 = self.check_expression(left);
        let t2 = self.check_expression(right);

        let result = if op == BinOp::Mod {
            // 取模只接受整数操作数
            if (!self.types.is_error(t1) && !self.types.is_integer(t1))
                || (!self.types.is_error(t2) && !self.types.is_integer(t2))
            {
                self.error(SemanticError::IncompatibleOperator {
                    op: op.to_string(),
                    span: span.into(),
                });
            }
            self.types.integer()
        } else if op.is_arithmetic() {
            if (!self.types.is_error(t1) && !self.types.is_numeric(t1))
                || (!self.types.is_error(t2) && !self.types.is_numeric(t2))
            {
                self.error(SemanticError::IncompatibleOperator {
                    op: op.to_string(),
                    span: span.into(),
                });
            }
            // float 赢过 int
            if self.types.is_float(t1) || self.types.is_float(t2) {
                self.types.float()
            } else {
                self.types.integer()
            }
        } else if op.is_relational() {
            if !self.types.is_error(t1)
                && !self.types.is_error(t2)
                && !self.types.comparable(t1, t2, op)
            {
                self.error(SemanticError::IncompatibleOperator {
                    op: op.to_string(),
                    span: span.into(),
                });
            }
            self.types.boolean()
        } else {
            // and / or
            if (!self.types.is_error(t1) && !self.types.is_boolean(t1))
                || (!self.types.is_error(t2) && !self.types.is_boolean(t2))
            {
                self.error(SemanticError::IncompatibleOperator {
                    op: op.to_string(),
                    span: span.into(),
                });
            }
            self.types.boolean()
        };

        (result, false)
    }

    /// 数组访问规则。结果是元素类型；只有底座确实是数组时才是左值。
    fn check_array_access(
        &mut self,
        base: &ast::Ident,
        index: &ast::Expression,
    ) -> (TypeId, bool) {
        let base_type = match self.symbols.find_in_stack(&base.name) {
            Some(symbol) => symbol.ty,
            None => {
                self.error(SemanticError::UndeclaredIdent {
                    name: base.name.clone(),
                    span: base.span.into(),
                });
                self.types.error()
            }
        };

        if !self.types.is_error(base_type) && !self.types.is_array(base_type) {
            self.error(SemanticError::NonArrayInArrayAccess {
                found: self.types.display(base_type),
                span: base.span.into(),
            });
        }

        let index_type = self.check_expression(index);
        if !self.types.is_error(index_type) && !self.types.is_integer(index_type) {
            self.error(SemanticError::NonIntegerIndex {
                found: self.types.display(index_type),
                span: index.span.into(),
            });
        }

        if self.types.is_array(base_type) {
            (self.types.array_elem(base_type), true)
        } else {
            (self.types.error(), false)
        }
    }

    /// 调用出现在表达式位置：过程（无返回值）不能当值用。
    fn check_call_expr(&mut self, call: &ast::CallExpr, span: Span) -> (TypeId, bool) {
        let ret = self.check_call(call);
        if self.types.is_void(ret) {
            self.error(SemanticError::NotAFunction {
                name: call.callee.name.clone(),
                span: span.into(),
            });
            (self.types.error(), false)
        } else {
            (ret, false)
        }
    }

    /// 调用的共通检查：被调用者必须是函数，实参个数和类型必须匹配。
    /// 返回调用结果的类型（出错时为 Error，过程调用为 Void）。
    /// 语句位置（过程调用）和表达式位置都经过这里。
    pub(crate) fn check_call(&mut self, call: &ast::CallExpr) -> TypeId {
        let callee_type = match self.symbols.find_in_stack(&call.callee.name) {
            Some(symbol) => symbol.ty,
            None => {
                self.error(SemanticError::UndeclaredIdent {
                    name: call.callee.name.clone(),
                    span: call.callee.span.into(),
                });
                self.types.error()
            }
        };

        if !self.types.is_function(callee_type) && !self.types.is_error(callee_type) {
            self.error(SemanticError::NotCallable {
                name: call.callee.name.clone(),
                span: call.callee.span.into(),
            });
        }

        // 实参无论如何都要检查一遍，它们自己的错误不应被吞掉
        let arg_types: Vec<TypeId> = call
            .args
            .iter()
            .map(|arg| self.check_expression(arg))
            .collect();

        if !self.types.is_function(callee_type) {
            return self.types.error();
        }

        let arity = self.types.func_arity(callee_type);
        if call.args.len() != arity {
            self.error(SemanticError::WrongNumberOfParameters {
                name: call.callee.name.clone(),
                expected: arity,
                found: call.args.len(),
                span: call.callee.span.into(),
            });
        } else {
            for (i, (arg, &arg_type)) in call.args.iter().zip(arg_types.iter()).enumerate() {
                let param_type = self.types.func_param(callee_type, i);
                if !self.types.is_error(arg_type) && !self.types.copyable(param_type, arg_type) {
                    self.error(SemanticError::IncompatibleParameter {
                        name: call.callee.name.clone(),
                        index: i + 1,
                        expected: self.types.display(param_type),
                        found: self.types.display(arg_type),
                        span: arg.span.into(),
                    });
                }
            }
        }

        self.types.func_ret(callee_type)
    }
}
