//! Asl 语言的解析器实现。
//! 该版本采用递归下降和普拉特解析（用于表达式）的技术，
//! 将 Token 流转换为抽象语法树 (AST)。

use super::ast::*;
use crate::lexer::Token;
use crate::reporter::{CompilerError, ParserError};
use crate::utils::Span;
use std::mem;

// --- 1. 主解析器结构体 ---

/// 解析器结构体，持有解析过程所需的全部状态。
pub struct Parser<'a> {
    /// 从 Lexer 获取的 Token 流的引用。
    tokens: &'a [(Token, Span)],
    /// 收集到的所有解析错误。
    errors: Vec<CompilerError>,
    /// 指向当前待处理 Token 的指针（在 tokens 切片中的索引）。
    current: usize,
    /// 节点句柄分配器；每个需要旁挂属性的节点拿一个单调递增的 id。
    next_id: u32,
    /// 输入末尾的位置，EOF 错误指向这里。
    eof_span: Span,
}

impl<'a> Parser<'a> {
    pub fn new(source_len: usize, tokens: &'a [(Token, Span)]) -> Self {
        Parser {
            tokens,
            errors: Vec::new(),
            current: 0,
            next_id: 0,
            eof_span: Span::new(source_len, source_len),
        }
    }

    /// 消耗解析器并启动整个解析过程。
    pub fn parse(mut self) -> (Option<Program>, Vec<CompilerError>) {
        let program = self.parse_program();
        if self.errors.is_empty() {
            (Some(program), self.errors)
        } else {
            // 带语法错误的树不会交给后续的分析遍
            (None, self.errors)
        }
    }

    // --- 2. Token 流操作 ---

    fn fresh_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.current).map(|(t, _)| t)
    }

    fn peek_next(&self) -> Option<&Token> {
        self.tokens.get(self.current + 1).map(|(t, _)| t)
    }

    fn peek_span(&self) -> Span {
        self.tokens
            .get(self.current)
            .map(|(_, s)| *s)
            .unwrap_or(self.eof_span)
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len()
    }

    /// 检查当前 Token 是否与 `kind` 是同一变体（忽略载荷）。
    fn check(&self, kind: &Token) -> bool {
        match self.peek() {
            Some(t) => mem::discriminant(t) == mem::discriminant(kind),
            None => false,
        }
    }

    /// 如果当前 Token 是指定变体，则消费它并返回 `true`。
    fn match_token(&mut self, kind: &Token) -> bool {
        if self.check(kind) {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// 消费一个指定变体的 Token，如果不是预期变体则报告错误。
    fn expect(&mut self, kind: &Token, expected: &str) -> Result<Span, ()> {
        if self.check(kind) {
            let span = self.peek_span();
            self.current += 1;
            Ok(span)
        } else {
            self.error_expected(expected);
            Err(())
        }
    }

    /// 消费一个标识符 Token。
    fn expect_ident(&mut self, expected: &str) -> Result<Ident, ()> {
        match self.peek() {
            Some(Token::Ident(name)) => {
                let name = name.clone();
                let span = self.peek_span();
                self.current += 1;
                Ok(Ident { name, span })
            }
            _ => {
                self.error_expected(expected);
                Err(())
            }
        }
    }

    // --- 3. 错误报告与恢复 ---

    fn error_expected(&mut self, expected: &str) {
        let error = match self.peek() {
            Some(found) => ParserError::UnexpectedToken {
                expected: expected.to_string(),
                found: format!("{}", found),
                span: self.peek_span().into(),
            },
            None => ParserError::UnexpectedEof {
                expected: expected.to_string(),
                span: self.eof_span.into(),
            },
        };
        self.errors.push(error.into());
    }

    /// 同步，用于错误恢复。丢弃 Token 直到一个安全的“同步点”，以便继续解析
    /// 并在一次运行里报告尽可能多的语法错误。
    fn synchronize(&mut self) {
        while let Some(token) = self.peek() {
            match token {
                Token::Semicolon => {
                    self.current += 1;
                    return;
                }
                Token::Func
                | Token::EndFunc
                | Token::Var
                | Token::If
                | Token::Else
                | Token::EndIf
                | Token::While
                | Token::EndWhile
                | Token::Read
                | Token::Write
                | Token::Return => return,
                _ => {
                    self.current += 1;
                }
            }
        }
    }

    // --- 4. 顶层结构 ---

    /// program ::= function+ EOF
    fn parse_program(&mut self) -> Program {
        let id = self.fresh_id();
        let start = self.peek_span();
        let mut functions = Vec::new();

        if self.is_at_end() {
            self.error_expected("a `func` definition");
        }

        while !self.is_at_end() {
            if self.check(&Token::Func) {
                if let Ok(function) = self.parse_function() {
                    functions.push(function);
                } else {
                    // 函数内部出错：跳到下一个 `func`，继续收集错误
                    while !self.is_at_end() && !self.check(&Token::Func) {
                        self.current += 1;
                    }
                }
            } else {
                self.error_expected("a `func` definition");
                self.current += 1;
            }
        }

        let span = start.join(self.eof_span);
        Program {
            id,
            functions,
            span,
        }
    }

    /// function ::= 'func' ID '(' parameters? ')' (':' basic_type)?
    ///              declarations statements 'endfunc'
    fn parse_function(&mut self) -> Result<Function, ()> {
        let id = self.fresh_id();
        let start = self.expect(&Token::Func, "`func`")?;
        let name = self.expect_ident("a function name")?;

        self.expect(&Token::LParen, "`(`")?;
        let mut params = Vec::new();
        if !self.check(&Token::RParen) {
            loop {
                params.push(self.parse_parameter()?);
                if !self.match_token(&Token::Comma) {
                    break;
                }
            }
        }
        self.expect(&Token::RParen, "`)`")?;

        let ret = if self.match_token(&Token::Colon) {
            Some(self.parse_basic_type_spec()?)
        } else {
            None
        };

        let mut decls = Vec::new();
        while self.check(&Token::Var) {
            decls.extend(self.parse_variable_decl()?);
        }

        let body = self.parse_statements();
        let end = self.expect(&Token::EndFunc, "`endfunc`")?;

        Ok(Function {
            id,
            name,
            params,
            ret,
            decls,
            body,
            span: start.join(end),
        })
    }

    /// parameter ::= ID ':' type
    fn parse_parameter(&mut self) -> Result<Parameter, ()> {
        let id = self.fresh_id();
        let name = self.expect_ident("a parameter name")?;
        self.expect(&Token::Colon, "`:`")?;
        let ty = self.parse_type_spec()?;
        Ok(Parameter { id, name, ty })
    }

    /// variable_decl ::= 'var' ID (',' ID)* ':' type (',' ID (',' ID)* ':' type)* ';'
    ///
    /// 每个“名字组 : 类型”展开成一个独立的 VarDecl。
    fn parse_variable_decl(&mut self) -> Result<Vec<VarDecl>, ()> {
        let start = self.expect(&Token::Var, "`var`")?;
        let mut decls = Vec::new();

        loop {
            let id = self.fresh_id();
            let mut names = vec![self.expect_ident("a variable name")?];
            while self.check(&Token::Comma) {
                // 名字组内的逗号只出现在 `:` 之前
                self.current += 1;
                names.push(self.expect_ident("a variable name")?);
            }
            self.expect(&Token::Colon, "`:`")?;
            let ty = self.parse_type_spec()?;
            let span = start.join(ty.span);
            decls.push(VarDecl {
                id,
                names,
                ty,
                span,
            });

            if !self.match_token(&Token::Comma) {
                break;
            }
        }

        self.expect(&Token::Semicolon, "`;`")?;
        Ok(decls)
    }

    // --- 5. 类型标注 ---

    /// type ::= 'array' '[' INTVAL ']' 'of' basic_type | basic_type
    fn parse_type_spec(&mut self) -> Result<TypeSpec, ()> {
        if self.check(&Token::Array) {
            let id = self.fresh_id();
            let start = self.peek_span();
            self.current += 1;
            self.expect(&Token::LBracket, "`[`")?;
            let size = self.parse_array_size()?;
            self.expect(&Token::RBracket, "`]`")?;
            self.expect(&Token::Of, "`of`")?;
            let (elem, end) = self.parse_basic_type()?;
            Ok(TypeSpec {
                id,
                kind: TypeSpecKind::Array { size, elem },
                span: start.join(end),
            })
        } else {
            self.parse_basic_type_spec()
        }
    }

    fn parse_basic_type_spec(&mut self) -> Result<TypeSpec, ()> {
        let id = self.fresh_id();
        let (basic, span) = self.parse_basic_type()?;
        Ok(TypeSpec {
            id,
            kind: TypeSpecKind::Basic(basic),
            span,
        })
    }

    fn parse_basic_type(&mut self) -> Result<(BasicType, Span), ()> {
        let basic = match self.peek() {
            Some(Token::Int) => BasicType::Int,
            Some(Token::Float) => BasicType::Float,
            Some(Token::Bool) => BasicType::Bool,
            Some(Token::Char) => BasicType::Char,
            _ => {
                self.error_expected("a basic type (`int`, `float`, `bool` or `char`)");
                return Err(());
            }
        };
        let span = self.peek_span();
        self.current += 1;
        Ok((basic, span))
    }

    fn parse_array_size(&mut self) -> Result<usize, ()> {
        match self.peek() {
            Some(Token::IntVal(text)) => match text.parse::<usize>() {
                Ok(size) => {
                    self.current += 1;
                    Ok(size)
                }
                Err(_) => {
                    self.error_expected("a representable array size");
                    Err(())
                }
            },
            _ => {
                self.error_expected("an integer array size");
                Err(())
            }
        }
    }

    // --- 6. 语句 ---

    /// 解析一段语句序列，直到遇到块结束关键字或输入结束。
    fn parse_statements(&mut self) -> Vec<Statement> {
        let mut statements = Vec::new();
        loop {
            match self.peek() {
                None
                | Some(Token::EndFunc)
                | Some(Token::Else)
                | Some(Token::EndIf)
                | Some(Token::EndWhile) => break,
                _ => match self.parse_statement() {
                    Ok(statement) => statements.push(statement),
                    Err(()) => self.synchronize(),
                },
            }
        }
        statements
    }

    fn parse_statement(&mut self) -> Result<Statement, ()> {
        match self.peek() {
            Some(Token::If) => self.parse_if_statement(),
            Some(Token::While) => self.parse_while_statement(),
            Some(Token::Read) => self.parse_read_statement(),
            Some(Token::Write) => self.parse_write_statement(),
            Some(Token::Return) => self.parse_return_statement(),
            Some(Token::Ident(_)) => {
                // 向前看一个 Token 来区分过程调用和赋值
                if matches!(self.peek_next(), Some(Token::LParen)) {
                    self.parse_proc_call_statement()
                } else {
                    self.parse_assign_statement()
                }
            }
            _ => {
                self.error_expected("a statement");
                Err(())
            }
        }
    }

    fn parse_assign_statement(&mut self) -> Result<Statement, ()> {
        let left = self.parse_left_expr()?;
        self.expect(&Token::Assign, "`=`")?;
        let right = self.parse_expression(0)?;
        let end = self.expect(&Token::Semicolon, "`;`")?;
        let span = left.span.join(end);
        Ok(Statement::Assign { left, right, span })
    }

    fn parse_if_statement(&mut self) -> Result<Statement, ()> {
        let start = self.expect(&Token::If, "`if`")?;
        let cond = self.parse_expression(0)?;
        self.expect(&Token::Then, "`then`")?;
        let then_branch = self.parse_statements();
        let else_branch = if self.match_token(&Token::Else) {
            Some(self.parse_statements())
        } else {
            None
        };
        let end = self.expect(&Token::EndIf, "`endif`")?;
        Ok(Statement::If {
            cond,
            then_branch,
            else_branch,
            span: start.join(end),
        })
    }

    fn parse_while_statement(&mut self) -> Result<Statement, ()> {
        let start = self.expect(&Token::While, "`while`")?;
        let cond = self.parse_expression(0)?;
        self.expect(&Token::Do, "`do`")?;
        let body = self.parse_statements();
        let end = self.expect(&Token::EndWhile, "`endwhile`")?;
        Ok(Statement::While {
            cond,
            body,
            span: start.join(end),
        })
    }

    fn parse_proc_call_statement(&mut self) -> Result<Statement, ()> {
        let callee = self.expect_ident("a function name")?;
        let start = callee.span;
        let call = self.parse_call_arguments(callee)?;
        let end = self.expect(&Token::Semicolon, "`;`")?;
        Ok(Statement::ProcCall {
            call,
            span: start.join(end),
        })
    }

    fn parse_read_statement(&mut self) -> Result<Statement, ()> {
        let start = self.expect(&Token::Read, "`read`")?;
        let target = self.parse_left_expr()?;
        let end = self.expect(&Token::Semicolon, "`;`")?;
        Ok(Statement::Read {
            target,
            span: start.join(end),
        })
    }

    fn parse_write_statement(&mut self) -> Result<Statement, ()> {
        let start = self.expect(&Token::Write, "`write`")?;
        if let Some(Token::StringVal(text)) = self.peek() {
            let text = text.clone();
            self.current += 1;
            let end = self.expect(&Token::Semicolon, "`;`")?;
            return Ok(Statement::WriteString {
                text,
                span: start.join(end),
            });
        }
        let expr = self.parse_expression(0)?;
        let end = self.expect(&Token::Semicolon, "`;`")?;
        Ok(Statement::WriteExpr {
            expr,
            span: start.join(end),
        })
    }

    fn parse_return_statement(&mut self) -> Result<Statement, ()> {
        let start = self.expect(&Token::Return, "`return`")?;
        let value = if self.check(&Token::Semicolon) {
            None
        } else {
            Some(self.parse_expression(0)?)
        };
        let end = self.expect(&Token::Semicolon, "`;`")?;
        Ok(Statement::Return {
            value,
            span: start.join(end),
        })
    }

    /// left_expr ::= ID ('[' expr ']')?
    fn parse_left_expr(&mut self) -> Result<LeftExpr, ()> {
        let id = self.fresh_id();
        let ident = self.expect_ident("an identifier")?;
        let mut span = ident.span;
        let index = if self.match_token(&Token::LBracket) {
            let index = self.parse_expression(0)?;
            let end = self.expect(&Token::RBracket, "`]`")?;
            span = span.join(end);
            Some(index)
        } else {
            None
        };
        Ok(LeftExpr {
            id,
            ident,
            index,
            span,
        })
    }

    // --- 7. 表达式（普拉特解析） ---

    fn parse_expression(&mut self, min_bp: u8) -> Result<Expression, ()> {
        let mut lhs = if let Some(op) = self.peek().and_then(prefix_op) {
            // 前缀表达式
            let id = self.fresh_id();
            let op_span = self.peek_span();
            self.current += 1;
            let ((), r_bp) = prefix_binding_power();
            let operand = self.parse_expression(r_bp)?;
            let span = op_span.join(operand.span);
            Expression {
                id,
                kind: ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                span,
            }
        } else {
            self.parse_atom()?
        };

        loop {
            let op = match self.peek().and_then(infix_op) {
                Some(op) => op,
                None => break,
            };
            let (l_bp, r_bp) = infix_binding_power(op);
            if l_bp < min_bp {
                break;
            }
            self.current += 1;

            let rhs = self.parse_expression(r_bp)?;
            let id = self.fresh_id();
            let span = lhs.span.join(rhs.span);
            lhs = Expression {
                id,
                kind: ExprKind::Binary {
                    op,
                    left: Box::new(lhs),
                    right: Box::new(rhs),
                },
                span,
            };
        }

        Ok(lhs)
    }

    /// 原子表达式：字面量、标识符、数组访问、函数调用、括号表达式。
    fn parse_atom(&mut self) -> Result<Expression, ()> {
        let span = self.peek_span();
        match self.peek().cloned() {
            Some(Token::IntVal(text)) => {
                self.current += 1;
                Ok(self.literal(Literal::Int(text), span))
            }
            Some(Token::FloatVal(text)) => {
                self.current += 1;
                Ok(self.literal(Literal::Float(text), span))
            }
            Some(Token::Boolean(value)) => {
                self.current += 1;
                Ok(self.literal(Literal::Bool(value), span))
            }
            Some(Token::CharVal(value)) => {
                self.current += 1;
                Ok(self.literal(Literal::Char(value), span))
            }
            Some(Token::LParen) => {
                let id = self.fresh_id();
                self.current += 1;
                let inner = self.parse_expression(0)?;
                let end = self.expect(&Token::RParen, "`)`")?;
                Ok(Expression {
                    id,
                    kind: ExprKind::Paren(Box::new(inner)),
                    span: span.join(end),
                })
            }
            Some(Token::Ident(_)) => {
                let id = self.fresh_id();
                let ident = self.expect_ident("an identifier")?;
                if self.check(&Token::LParen) {
                    // 函数调用
                    let call = self.parse_call_arguments(ident)?;
                    let end_span = self.tokens[self.current - 1].1;
                    Ok(Expression {
                        id,
                        kind: ExprKind::Call(call),
                        span: span.join(end_span),
                    })
                } else if self.match_token(&Token::LBracket) {
                    // 数组访问
                    let index = self.parse_expression(0)?;
                    let end = self.expect(&Token::RBracket, "`]`")?;
                    Ok(Expression {
                        id,
                        kind: ExprKind::ArrayAccess {
                            base: ident,
                            index: Box::new(index),
                        },
                        span: span.join(end),
                    })
                } else {
                    Ok(Expression {
                        id,
                        kind: ExprKind::Ident(ident),
                        span,
                    })
                }
            }
            _ => {
                self.error_expected("an expression");
                Err(())
            }
        }
    }

    /// 解析 `(' expr (',' expr)* ')'` 形式的实参表。
    fn parse_call_arguments(&mut self, callee: Ident) -> Result<CallExpr, ()> {
        self.expect(&Token::LParen, "`(`")?;
        let mut args = Vec::new();
        if !self.check(&Token::RParen) {
            loop {
                args.push(self.parse_expression(0)?);
                if !self.match_token(&Token::Comma) {
                    break;
                }
            }
        }
        self.expect(&Token::RParen, "`)`")?;
        Ok(CallExpr { callee, args })
    }

    fn literal(&mut self, literal: Literal, span: Span) -> Expression {
        Expression {
            id: self.fresh_id(),
            kind: ExprKind::Literal(literal),
            span,
        }
    }
}

// --- 8. 普拉特解析辅助函数 ---

/// 前缀运算符的绑定力。
fn prefix_binding_power() -> ((), u8) {
    ((), 11)
}

fn prefix_op(token: &Token) -> Option<UnaryOp> {
    match token {
        Token::Not => Some(UnaryOp::Not),
        Token::Plus => Some(UnaryOp::Plus),
        Token::Minus => Some(UnaryOp::Minus),
        _ => None,
    }
}

fn infix_op(token: &Token) -> Option<BinOp> {
    match token {
        Token::Star => Some(BinOp::Mul),
        Token::Slash => Some(BinOp::Div),
        Token::Percent => Some(BinOp::Mod),
        Token::Plus => Some(BinOp::Add),
        Token::Minus => Some(BinOp::Sub),
        Token::Eq => Some(BinOp::Eq),
        Token::NotEq => Some(BinOp::Ne),
        Token::Lt => Some(BinOp::Lt),
        Token::Lte => Some(BinOp::Le),
        Token::Gt => Some(BinOp::Gt),
        Token::Gte => Some(BinOp::Ge),
        Token::And => Some(BinOp::And),
        Token::Or => Some(BinOp::Or),
        _ => None,
    }
}

/// 中缀运算符的绑定力，左小右大保证左结合。
fn infix_binding_power(op: BinOp) -> (u8, u8) {
    match op {
        BinOp::Or => (1, 2),
        BinOp::And => (3, 4),
        BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => (5, 6),
        BinOp::Add | BinOp::Sub => (7, 8),
        BinOp::Mul | BinOp::Div | BinOp::Mod => (9, 10),
    }
}
