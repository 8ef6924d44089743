// In src/codegen/expression.rs
//
// 表达式的自底向上降级。每个规则返回一组 CodeAttribs：
// 持有值（或数组底座）的地址、可选的下标地址，以及让两者生效的代码。
// 数组访问在访问点故意不解引用——父节点决定它当左值还是右值用。

use super::instruction::{InstrList, Instruction};
use super::CodeGen;
use crate::parser::ast;

/// 表达式降级的三元组结果。
///
/// `addr` 是持有值的符号或临时名（数组访问时是底座名），
/// `offs` 为空或持有元素下标的地址，`code` 是让它们生效的指令。
#[derive(Debug, Clone)]
pub(super) struct CodeAttribs {
    pub addr: String,
    pub offs: String,
    pub code: InstrList,
}

impl CodeAttribs {
    pub fn new(addr: impl Into<String>, offs: impl Into<String>, code: InstrList) -> Self {
        CodeAttribs {
            addr: addr.into(),
            offs: offs.into(),
            code,
        }
    }
}

impl<'a> CodeGen<'a> {
    pub(super) fn gen_expression(&mut self, expr: &ast::Expression) -> CodeAttribs {
        match &expr.kind {
            ast::ExprKind::Literal(literal) => self.gen_literal(literal),
            ast::ExprKind::Ident(ident) => {
                CodeAttribs::new(ident.name.clone(), "", InstrList::new())
            }
            ast::ExprKind::Paren(inner) => self.gen_expression(inner),
            ast::ExprKind::ArrayAccess { base, index } => self.gen_array_access(base, index),
            ast::ExprKind::Unary { op, operand } => self.gen_unary(*op, operand),
            ast::ExprKind::Binary { op, left, right } => self.gen_binary(*op, left, right),
            ast::ExprKind::Call(call) => self.gen_call(call),
        }
    }

    fn gen_literal(&mut self, literal: &ast::Literal) -> CodeAttribs {
        let temp = self.counters.new_temp();
        let instruction = match literal {
            ast::Literal::Int(text) => Instruction::Iload(temp.clone(), text.clone()),
            ast::Literal::Float(text) => Instruction::Fload(temp.clone(), text.clone()),
            ast::Literal::Char(value) => Instruction::Chload(temp.clone(), value.to_string()),
            // 布尔值用整数 1/0 表示
            ast::Literal::Bool(true) => Instruction::Iload(temp.clone(), "1".to_string()),
            ast::Literal::Bool(false) => Instruction::Iload(temp.clone(), "0".to_string()),
        };
        CodeAttribs::new(temp, "", instruction.into())
    }

    /// 数组访问：发射底座和下标的代码，但不做解引用。
    fn gen_array_access(&mut self, base: &ast::Ident, index: &ast::Expression) -> CodeAttribs {
        let index_attribs = self.gen_expression(index);
        let (index_addr, index_code) = self.rvalue(index_attribs);
        CodeAttribs::new(base.name.clone(), index_addr, index_code)
    }

    fn gen_unary(&mut self, op: ast::UnaryOp, operand: &ast::Expression) -> CodeAttribs {
        let attribs = self.gen_expression(operand);
        let (addr, mut code) = self.rvalue(attribs);
        let operand_type = self.expr_type(operand.id);

        match op {
            // 一元加是恒等变换
            ast::UnaryOp::Plus => CodeAttribs::new(addr, "", code),
            ast::UnaryOp::Not => {
                let temp = self.counters.new_temp();
                code.push(Instruction::Not(temp.clone(), addr));
                CodeAttribs::new(temp, "", code)
            }
            ast::UnaryOp::Minus => {
                let temp = self.counters.new_temp();
                if self.analysis.types.is_float(operand_type) {
                    code.push(Instruction::Fneg(temp.clone(), addr));
                } else {
                    code.push(Instruction::Neg(temp.clone(), addr));
                }
                CodeAttribs::new(temp, "", code)
            }
        }
    }

    fn gen_binary(
        &mut self,
        op: ast::BinOp,
        left: &ast::Expression,
        right: &ast::Expression,
    ) -> CodeAttribs {
        if op.is_relational() {
            self.gen_relational(op, left, right)
        } else if op.is_logical() {
            self.gen_logical(op, left, right)
        } else {
            self.gen_arithmetic(op, left, right)
        }
    }

    fn gen_arithmetic(
        &mut self,
        op: ast::BinOp,
        left: &ast::Expression,
        right: &ast::Expression,
    ) -> CodeAttribs {
        let left_attribs = self.gen_expression(left);
        let (mut addr1, code1) = self.rvalue(left_attribs);
        let right_attribs = self.gen_expression(right);
        let (mut addr2, code2) = self.rvalue(right_attribs);
        let mut code = code1.then(code2);

        let t1 = self.expr_type(left.id);
        let t2 = self.expr_type(right.id);

        if self.analysis.types.is_integer(t1) && self.analysis.types.is_integer(t2) {
            // 整数算术
            let temp = self.counters.new_temp();
            match op {
                ast::BinOp::Mul => code.push(Instruction::Mul(temp.clone(), addr1, addr2)),
                ast::BinOp::Div => code.push(Instruction::Div(temp.clone(), addr1, addr2)),
                ast::BinOp::Add => code.push(Instruction::Add(temp.clone(), addr1, addr2)),
                ast::BinOp::Sub => code.push(Instruction::Sub(temp.clone(), addr1, addr2)),
                ast::BinOp::Mod => {
                    // 没有取模指令：q = a/b; r = a - b*q
                    let quotient = self.counters.new_temp();
                    let product = self.counters.new_temp();
                    code.push(Instruction::Div(
                        quotient.clone(),
                        addr1.clone(),
                        addr2.clone(),
                    ));
                    code.push(Instruction::Mul(product.clone(), addr2, quotient));
                    code.push(Instruction::Sub(temp.clone(), addr1, product));
                }
                _ => unreachable!("not an arithmetic operator: {}", op),
            }
            CodeAttribs::new(temp, "", code)
        } else {
            // 混合算术：整数侧先转成浮点的新临时
            if self.analysis.types.is_integer(t1) {
                let converted = self.counters.new_temp();
                code.push(Instruction::Float(converted.clone(), addr1));
                addr1 = converted;
            }
            if self.analysis.types.is_integer(t2) {
                let converted = self.counters.new_temp();
                code.push(Instruction::Float(converted.clone(), addr2));
                addr2 = converted;
            }

            let temp = self.counters.new_temp();
            match op {
                ast::BinOp::Mul => code.push(Instruction::Fmul(temp.clone(), addr1, addr2)),
                ast::BinOp::Div => code.push(Instruction::Fdiv(temp.clone(), addr1, addr2)),
                ast::BinOp::Add => code.push(Instruction::Fadd(temp.clone(), addr1, addr2)),
                ast::BinOp::Sub => code.push(Instruction::Fsub(temp.clone(), addr1, addr2)),
                // 类型检查只放行整数操作数的取模
                _ => unreachable!("float operands cannot reach operator {}", op),
            }
            CodeAttribs::new(temp, "", code)
        }
    }

    fn gen_relational(
        &mut self,
        op: ast::BinOp,
        left: &ast::Expression,
        right: &ast::Expression,
    ) -> CodeAttribs {
        let left_attribs = self.gen_expression(left);
        let (mut addr1, code1) = self.rvalue(left_attribs);
        let right_attribs = self.gen_expression(right);
        let (mut addr2, code2) = self.rvalue(right_attribs);
        let mut code = code1.then(code2);

        let t1 = self.expr_type(left.id);
        let t2 = self.expr_type(right.id);

        let float_compare =
            self.analysis.types.is_float(t1) || self.analysis.types.is_float(t2);

        if float_compare {
            // 非浮点侧转换进新的临时，比较指令不改写操作数
            if !self.analysis.types.is_float(t1) {
                let converted = self.counters.new_temp();
                code.push(Instruction::Float(converted.clone(), addr1));
                addr1 = converted;
            }
            if !self.analysis.types.is_float(t2) {
                let converted = self.counters.new_temp();
                code.push(Instruction::Float(converted.clone(), addr2));
                addr2 = converted;
            }
        }

        let temp = self.counters.new_temp();
        match (op, float_compare) {
            (ast::BinOp::Eq, false) => code.push(Instruction::Eq(temp.clone(), addr1, addr2)),
            (ast::BinOp::Eq, true) => code.push(Instruction::Feq(temp.clone(), addr1, addr2)),
            // `!=` 没有专用指令：先 eq 再 not
            (ast::BinOp::Ne, false) => {
                code.push(Instruction::Eq(temp.clone(), addr1, addr2));
                code.push(Instruction::Not(temp.clone(), temp.clone()));
            }
            (ast::BinOp::Ne, true) => {
                code.push(Instruction::Feq(temp.clone(), addr1, addr2));
                code.push(Instruction::Not(temp.clone(), temp.clone()));
            }
            (ast::BinOp::Lt, false) => code.push(Instruction::Lt(temp.clone(), addr1, addr2)),
            (ast::BinOp::Lt, true) => code.push(Instruction::Flt(temp.clone(), addr1, addr2)),
            (ast::BinOp::Le, false) => code.push(Instruction::Le(temp.clone(), addr1, addr2)),
            (ast::BinOp::Le, true) => code.push(Instruction::Fle(temp.clone(), addr1, addr2)),
            // `>` 和 `>=` 交换操作数复用 lt / le
            (ast::BinOp::Gt, false) => code.push(Instruction::Lt(temp.clone(), addr2, addr1)),
            (ast::BinOp::Gt, true) => code.push(Instruction::Flt(temp.clone(), addr2, addr1)),
            (ast::BinOp::Ge, false) => code.push(Instruction::Le(temp.clone(), addr2, addr1)),
            (ast::BinOp::Ge, true) => code.push(Instruction::Fle(temp.clone(), addr2, addr1)),
            _ => unreachable!("not a relational operator: {}", op),
        }
        CodeAttribs::new(temp, "", code)
    }

    /// and / or：两侧都求值，用整数表示上的 and/or 指令合并。
    fn gen_logical(
        &mut self,
        op: ast::BinOp,
        left: &ast::Expression,
        right: &ast::Expression,
    ) -> CodeAttribs {
        let left_attribs = self.gen_expression(left);
        let (addr1, code1) = self.rvalue(left_attribs);
        let right_attribs = self.gen_expression(right);
        let (addr2, code2) = self.rvalue(right_attribs);
        let mut code = code1.then(code2);

        let temp = self.counters.new_temp();
        match op {
            ast::BinOp::And => code.push(Instruction::And(temp.clone(), addr1, addr2)),
            ast::BinOp::Or => code.push(Instruction::Or(temp.clone(), addr1, addr2)),
            _ => unreachable!("not a logical operator: {}", op),
        }
        CodeAttribs::new(temp, "", code)
    }

    /// 调用协议：先给返回值留槽（非过程），实参从左到右求值并压栈，
    /// call 之后每个实参一个 pop，最后把返回值弹进新的临时。
    pub(super) fn gen_call(&mut self, call: &ast::CallExpr) -> CodeAttribs {
        let callee_type = self
            .analysis
            .symbols
            .find_in_stack(&call.callee.name)
            .expect("the type pass resolved the callee")
            .ty;
        let ret_type = self.analysis.types.func_ret(callee_type);
        let returns_value = !self.analysis.types.is_void(ret_type);

        let mut code = InstrList::new();
        if returns_value {
            // 给返回值留槽
            code.push(Instruction::Push(None));
        }

        let mut push_code = InstrList::new();
        let mut pop_code = InstrList::new();

        for (i, arg) in call.args.iter().enumerate() {
            let attribs = self.gen_expression(arg);
            // 数组元素实参先取成右值再参与协议
            let (mut addr, arg_code) = self.rvalue(attribs);
            code = code.then(arg_code);

            let arg_type = self.expr_type(arg.id);
            let param_type = self.analysis.types.func_param(callee_type, i);

            if self.analysis.types.is_integer(arg_type)
                && self.analysis.types.is_float(param_type)
            {
                let converted = self.counters.new_temp();
                code.push(Instruction::Float(converted.clone(), addr));
                addr = converted;
            } else if self.analysis.types.is_array(param_type)
                && self.analysis.symbols.is_local(&addr)
            {
                // 局部数组要取基地址；数组形参本身已经持有地址
                let reference = self.counters.new_temp();
                code.push(Instruction::Aload(reference.clone(), addr));
                addr = reference;
            }

            push_code.push(Instruction::Push(Some(addr)));
            pop_code.push(Instruction::Pop(None));
        }

        code = code
            .then(push_code)
            .then(Instruction::Call(call.callee.name.clone()))
            .then(pop_code);

        if returns_value {
            let temp = self.counters.new_temp();
            code.push(Instruction::Pop(Some(temp.clone())));
            CodeAttribs::new(temp, "", code)
        } else {
            CodeAttribs::new("", "", code)
        }
    }

    /// 右值强转：需要值而手里是 `{addr, offs}` 形式的数组访问时，
    /// 用 loadx 取出元素；底座是按引用形参时先 load 出基地址。
    pub(super) fn rvalue(&mut self, attribs: CodeAttribs) -> (String, InstrList) {
        if attribs.offs.is_empty() {
            return (attribs.addr, attribs.code);
        }

        let mut code = attribs.code;
        let temp = self.counters.new_temp();
        if self.analysis.symbols.is_parameter(&attribs.addr) {
            let base = self.counters.new_temp();
            code.push(Instruction::Load(base.clone(), attribs.addr));
            code.push(Instruction::Loadx(temp.clone(), base, attribs.offs));
        } else {
            code.push(Instruction::Loadx(
                temp.clone(),
                attribs.addr,
                attribs.offs,
            ));
        }
        (temp, code)
    }

    /// 左值一侧的底座物化：按引用形参先把基地址 load 进临时，
    /// 局部数组直接用名字。
    pub(super) fn materialize_base(&mut self, addr: String) -> (String, InstrList) {
        if self.analysis.symbols.is_parameter(&addr) {
            let temp = self.counters.new_temp();
            let code = Instruction::Load(temp.clone(), addr).into();
            (temp, code)
        } else {
            (addr, InstrList::new())
        }
    }
}
