// In src/analyzer/statement.rs
//
// PASS 2 的程序、函数和语句规则。

use super::types::TypeId;
use super::Analyzer;
use crate::parser::ast;
use crate::reporter::SemanticError;

impl<'a> Analyzer<'a> {
    /// 程序规则：重新进入全局作用域，检查每个函数，最后确认入口存在。
    pub(crate) fn check_program(&mut self, program: &ast::Program) {
        let sc = self
            .decor
            .get_scope(program.id)
            .expect("the symbol pass decorates the program node with its scope");
        self.symbols.push_existing_scope(sc);

        for function in &program.functions {
            self.check_function(function);
        }

        if !self.symbols.has_proper_main(&self.types) {
            self.error(SemanticError::NoMainProperlyDeclared {
                span: program.span.into(),
            });
        }

        self.symbols.pop_scope();
    }

    fn check_function(&mut self, function: &ast::Function) {
        let sc = self
            .decor
            .get_scope(function.id)
            .expect("the symbol pass decorates every function node with its scope");
        self.symbols.push_existing_scope(sc);
        self.current_function = Some(self.type_decor(function.id));

        self.check_statements(&function.body);

        self.current_function = None;
        self.symbols.pop_scope();
    }

    fn check_statements(&mut self, statements: &[ast::Statement]) {
        for statement in statements {
            self.check_statement(statement);
        }
    }

    fn check_statement(&mut self, statement: &ast::Statement) {
        match statement {
            ast::Statement::Assign { left, right, span } => {
                let t1 = self.check_left_expr(left);
                let t2 = self.check_expression(right);

                if !self.types.is_error(t1)
                    && !self.types.is_error(t2)
                    && !self.types.copyable(t1, t2)
                {
                    self.error(SemanticError::IncompatibleAssignment {
                        left: self.types.display(t1),
                        right: self.types.display(t2),
                        span: (*span).into(),
                    });
                }

                let left_is_lvalue = self.decor.get_is_lvalue(left.id).unwrap_or(false);
                if !self.types.is_error(t1) && !left_is_lvalue {
                    self.error(SemanticError::NonReferenceableLeftExpr {
                        span: left.span.into(),
                    });
                }
            }

            ast::Statement::If {
                cond,
                then_branch,
                else_branch,
                ..
            } => {
                let t = self.check_expression(cond);
                if !self.types.is_error(t) && !self.types.is_boolean(t) {
                    self.error(SemanticError::BooleanRequired {
                        construct: "if",
                        found: self.types.display(t),
                        span: cond.span.into(),
                    });
                }
                self.check_statements(then_branch);
                if let Some(else_branch) = else_branch {
                    self.check_statements(else_branch);
                }
            }

            ast::Statement::While { cond, body, .. } => {
                let t = self.check_expression(cond);
                if !self.types.is_error(t) && !self.types.is_boolean(t) {
                    self.error(SemanticError::BooleanRequired {
                        construct: "while",
                        found: self.types.display(t),
                        span: cond.span.into(),
                    });
                }
                self.check_statements(body);
            }

            ast::Statement::ProcCall { call, .. } => {
                // 诊断全部来自调用的共通检查
                self.check_call(call);
            }

            ast::Statement::Read { target, .. } => {
                let t = self.check_left_expr(target);
                if !self.types.is_error(t)
                    && !self.types.is_primitive(t)
                    && !self.types.is_function(t)
                {
                    self.error(SemanticError::ReadWriteRequireBasic {
                        operation: "read",
                        found: self.types.display(t),
                        span: target.span.into(),
                    });
                }
                let is_lvalue = self.decor.get_is_lvalue(target.id).unwrap_or(false);
                if !self.types.is_error(t) && !is_lvalue {
                    self.error(SemanticError::NonReferenceableReadTarget {
                        span: target.span.into(),
                    });
                }
            }

            ast::Statement::WriteExpr { expr, .. } => {
                let t = self.check_expression(expr);
                if !self.types.is_error(t) && !self.types.is_primitive(t) {
                    self.error(SemanticError::ReadWriteRequireBasic {
                        operation: "write",
                        found: self.types.display(t),
                        span: expr.span.into(),
                    });
                }
            }

            ast::Statement::WriteString { .. } => {}

            ast::Statement::Return { value, span } => {
                let value_type = match value {
                    Some(expr) => self.check_expression(expr),
                    None => self.types.void(),
                };

                let func_type = self
                    .current_function
                    .expect("return statements only occur inside a function");
                let ret_type = self.types.func_ret(func_type);

                // 兼容方向：返回值要能存进声明的返回类型
                if !self.types.is_error(value_type)
                    && !self.types.is_error(ret_type)
                    && !self.types.copyable(ret_type, value_type)
                {
                    self.error(SemanticError::IncompatibleReturn {
                        expected: self.types.display(ret_type),
                        found: self.types.display(value_type),
                        span: (*span).into(),
                    });
                }
            }
        }
    }

    /// 赋值和 read 的目标规则。和数组访问表达式一样，
    /// 结果类型和左值标记都挂在 left_expr 节点上。
    pub(crate) fn check_left_expr(&mut self, left: &ast::LeftExpr) -> TypeId {
        let (base_type, base_is_lvalue) = match self.symbols.find_in_stack(&left.ident.name) {
            Some(symbol) => {
                let ty = symbol.ty;
                let is_lvalue = !self.symbols.is_function(&left.ident.name);
                (ty, is_lvalue)
            }
            None => {
                self.error(SemanticError::UndeclaredIdent {
                    name: left.ident.name.clone(),
                    span: left.ident.span.into(),
                });
                // 左值标记设为 true，抑制同一处的后续诊断
                (self.types.error(), true)
            }
        };

        let (ty, is_lvalue) = match &left.index {
            Some(index) => {
                if !self.types.is_error(base_type) && !self.types.is_array(base_type) {
                    self.error(SemanticError::NonArrayInArrayAccess {
                        found: self.types.display(base_type),
                        span: left.ident.span.into(),
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
            None => (base_type, base_is_lvalue),
        };

        self.decor.put_type(left.id, ty);
        self.decor.put_is_lvalue(left.id, is_lvalue);
        ty
    }
}
