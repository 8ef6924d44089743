// In src/codegen/statement.rs
//
// 语句的降级：赋值的全部形态（标量、元素、整数组拷贝）、
// if/while 的配对标签、read/write、return 和过程调用。

use super::expression::CodeAttribs;
use super::instruction::{InstrList, Instruction};
use super::CodeGen;
use crate::parser::ast;

impl<'a> CodeGen<'a> {
    pub(super) fn gen_statements(&mut self, statements: &[ast::Statement]) -> InstrList {
        let mut code = InstrList::new();
        for statement in statements {
            code = code.then(self.gen_statement(statement));
        }
        code
    }

    pub(super) fn gen_statement(&mut self, statement: &ast::Statement) -> InstrList {
        match statement {
            ast::Statement::Assign { left, right, .. } => self.gen_assign(left, right),
            ast::Statement::If {
                cond,
                then_branch,
                else_branch,
                ..
            } => self.gen_if(cond, then_branch, else_branch.as_deref()),
            ast::Statement::While { cond, body, .. } => self.gen_while(cond, body),
            ast::Statement::ProcCall { call, .. } => self.gen_call(call).code,
            ast::Statement::Read { target, .. } => self.gen_read(target),
            ast::Statement::WriteExpr { expr, .. } => self.gen_write_expr(expr),
            ast::Statement::WriteString { text, .. } => {
                Instruction::Writes(text.clone()).into()
            }
            ast::Statement::Return { value, .. } => self.gen_return(value.as_ref()),
        }
    }

    /// 赋值按（左边是否带下标 × 右边是否带下标）展开，
    /// 外加两边都是完整数组名的逐元素拷贝。
    fn gen_assign(&mut self, left: &ast::LeftExpr, right: &ast::Expression) -> InstrList {
        let left_attribs = self.gen_left_expr(left);
        let right_attribs = self.gen_expression(right);

        let left_type = self
            .analysis
            .decor
            .get_type(left.id)
            .expect("the type pass decorates every left expression");
        let right_type = self.expr_type(right.id);

        // 整数组 ← 整数组：两边都是名字，逐元素搬运
        if self.analysis.types.is_array(left_type) {
            return self.gen_array_copy(left_attribs, right_attribs, left_type);
        }

        let needs_float = self.analysis.types.is_float(left_type)
            && self.analysis.types.is_integer(right_type);

        match (left_attribs.offs.is_empty(), right_attribs.offs.is_empty()) {
            // 标量 ← 标量
            (true, true) => {
                let mut code = left_attribs.code.then(right_attribs.code);
                let mut value = right_attribs.addr;
                if needs_float {
                    let converted = self.counters.new_temp();
                    code.push(Instruction::Float(converted.clone(), value));
                    value = converted;
                }
                code.push(self.store_scalar(left_type, left_attribs.addr, value));
                code
            }

            // 标量 ← 元素
            (true, false) => {
                if needs_float {
                    // 元素先取出来转换，再存进目标
                    let (value, value_code) = self.rvalue(right_attribs);
                    let mut code = left_attribs.code.then(value_code);
                    let converted = self.counters.new_temp();
                    code.push(Instruction::Float(converted.clone(), value));
                    code.push(self.store_scalar(left_type, left_attribs.addr, converted));
                    code
                } else {
                    // 直接 loadx 到目标
                    let mut code = left_attribs.code.then(right_attribs.code);
                    let (base, base_code) = self.materialize_base(right_attribs.addr);
                    code = code.then(base_code);
                    code.push(Instruction::Loadx(
                        left_attribs.addr,
                        base,
                        right_attribs.offs,
                    ));
                    code
                }
            }

            // 元素 ← 标量 / 元素 ← 元素：右边先成为右值，再 xload 进目标
            (false, _) => {
                let (mut value, value_code) = self.rvalue(right_attribs);
                let mut code = left_attribs.code.then(value_code);
                if needs_float {
                    let converted = self.counters.new_temp();
                    code.push(Instruction::Float(converted.clone(), value));
                    value = converted;
                }
                let (base, base_code) = self.materialize_base(left_attribs.addr);
                code = code.then(base_code);
                code.push(Instruction::Xload(base, left_attribs.offs, value));
                code
            }
        }
    }

    /// 整数组拷贝：物化两边的底座（按引用形参要先 load），
    /// 然后 N 次 `iload 下标; loadx 取元素; xload 存元素`，复用两个临时。
    fn gen_array_copy(
        &mut self,
        left_attribs: CodeAttribs,
        right_attribs: CodeAttribs,
        array_type: crate::analyzer::types::TypeId,
    ) -> InstrList {
        let mut code = left_attribs.code.then(right_attribs.code);

        let (dst, dst_code) = self.materialize_base(left_attribs.addr);
        code = code.then(dst_code);
        let (src, src_code) = self.materialize_base(right_attribs.addr);
        code = code.then(src_code);

        let size = self.analysis.types.array_size(array_type);
        let offset = self.counters.new_temp();
        let element = self.counters.new_temp();
        for i in 0..size {
            code.push(Instruction::Iload(offset.clone(), i.to_string()));
            code.push(Instruction::Loadx(
                element.clone(),
                src.clone(),
                offset.clone(),
            ));
            code.push(Instruction::Xload(
                dst.clone(),
                offset.clone(),
                element.clone(),
            ));
        }
        code
    }

    fn gen_if(
        &mut self,
        cond: &ast::Expression,
        then_branch: &[ast::Statement],
        else_branch: Option<&[ast::Statement]>,
    ) -> InstrList {
        let cond_attribs = self.gen_expression(cond);
        let (cond_addr, cond_code) = self.rvalue(cond_attribs);
        let then_code = self.gen_statements(then_branch);

        let n = self.counters.new_if();
        let label_endif = format!("endif{}", n);

        match else_branch {
            None => cond_code
                .then(Instruction::Fjump(cond_addr, label_endif.clone()))
                .then(then_code)
                .then(Instruction::Label(label_endif)),
            Some(else_branch) => {
                let label_else = format!("else{}", n);
                let else_code = self.gen_statements(else_branch);
                cond_code
                    .then(Instruction::Fjump(cond_addr, label_else.clone()))
                    .then(then_code)
                    .then(Instruction::Ujump(label_endif.clone()))
                    .then(Instruction::Label(label_else))
                    .then(else_code)
                    .then(Instruction::Label(label_endif))
            }
        }
    }

    fn gen_while(&mut self, cond: &ast::Expression, body: &[ast::Statement]) -> InstrList {
        let cond_attribs = self.gen_expression(cond);
        let (cond_addr, cond_code) = self.rvalue(cond_attribs);
        let body_code = self.gen_statements(body);

        let n = self.counters.new_while();
        let label_while = format!("while{}", n);
        let label_endwhile = format!("endwhile{}", n);

        InstrList::from(Instruction::Label(label_while.clone()))
            .then(cond_code)
            .then(Instruction::Fjump(cond_addr, label_endwhile.clone()))
            .then(body_code)
            .then(Instruction::Ujump(label_while))
            .then(Instruction::Label(label_endwhile))
    }

    /// read：目标是数组元素时先读进临时再 xload，否则直接读进左值。
    fn gen_read(&mut self, target: &ast::LeftExpr) -> InstrList {
        let attribs = self.gen_left_expr(target);
        let target_type = self
            .analysis
            .decor
            .get_type(target.id)
            .expect("the type pass decorates every read target");

        let mut code = attribs.code;
        if attribs.offs.is_empty() {
            code.push(self.read_instruction(target_type, attribs.addr));
        } else {
            let temp = self.counters.new_temp();
            code.push(self.read_instruction(target_type, temp.clone()));
            let (base, base_code) = self.materialize_base(attribs.addr);
            code = code.then(base_code);
            code.push(Instruction::Xload(base, attribs.offs, temp));
        }
        code
    }

    fn gen_write_expr(&mut self, expr: &ast::Expression) -> InstrList {
        let attribs = self.gen_expression(expr);
        let (addr, mut code) = self.rvalue(attribs);
        let expr_type = self.expr_type(expr.id);

        if self.analysis.types.is_float(expr_type) {
            code.push(Instruction::Writef(addr));
        } else if self.analysis.types.is_character(expr_type) {
            code.push(Instruction::Writec(addr));
        } else {
            code.push(Instruction::Writei(addr));
        }
        code
    }

    fn gen_return(&mut self, value: Option<&ast::Expression>) -> InstrList {
        match value {
            None => Instruction::Return.into(),
            Some(expr) => {
                let attribs = self.gen_expression(expr);
                let (mut addr, mut code) = self.rvalue(attribs);
                let value_type = self.expr_type(expr.id);

                let func_type = self
                    .current_function
                    .expect("return statements only occur inside a function");
                let ret_type = self.analysis.types.func_ret(func_type);

                // 整数值流进浮点返回槽时插入转换
                if self.analysis.types.is_float(ret_type)
                    && self.analysis.types.is_integer(value_type)
                {
                    let converted = self.counters.new_temp();
                    code.push(Instruction::Float(converted.clone(), addr));
                    addr = converted;
                }

                code.push(Instruction::Load("_result".to_string(), addr));
                code.push(Instruction::Return);
                code
            }
        }
    }

    /// 赋值和 read 的目标。数组访问和表达式一侧一样不解引用。
    fn gen_left_expr(&mut self, left: &ast::LeftExpr) -> CodeAttribs {
        match &left.index {
            Some(index) => {
                let index_attribs = self.gen_expression(index);
                let (index_addr, index_code) = self.rvalue(index_attribs);
                CodeAttribs::new(left.ident.name.clone(), index_addr, index_code)
            }
            None => CodeAttribs::new(left.ident.name.clone(), "", InstrList::new()),
        }
    }

    /// read 指令按目标类型挑选。布尔按整数读入。
    fn read_instruction(
        &self,
        target_type: crate::analyzer::types::TypeId,
        dst: String,
    ) -> Instruction {
        if self.analysis.types.is_float(target_type) {
            Instruction::Readf(dst)
        } else if self.analysis.types.is_character(target_type) {
            Instruction::Readc(dst)
        } else {
            Instruction::Readi(dst)
        }
    }

    /// 标量存储：目的地类型挑选装载指令。
    fn store_scalar(
        &self,
        left_type: crate::analyzer::types::TypeId,
        dst: String,
        src: String,
    ) -> Instruction {
        if self.analysis.types.is_float(left_type) {
            Instruction::Fload(dst, src)
        } else if self.analysis.types.is_character(left_type) {
            Instruction::Chload(dst, src)
        } else {
            Instruction::Iload(dst, src)
        }
    }
}
