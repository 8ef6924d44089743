// In src/codegen/function.rs
//
// 函数到子程序的装配：`_result` 形参、按引用的数组形参、
// 带大小的局部变量表，以及以无条件 return 收尾的指令体。

use super::instruction::{InstrList, Instruction, Subroutine};
use super::CodeGen;
use crate::parser::ast;

impl<'a> CodeGen<'a> {
    pub(super) fn gen_function(&mut self, function: &ast::Function) -> Subroutine {
        let sc = self
            .analysis
            .decor
            .get_scope(function.id)
            .expect("the symbol pass decorates every function node with its scope");
        self.analysis.symbols.push_existing_scope(sc);
        self.counters.reset();

        let func_type = self
            .analysis
            .decor
            .get_type(function.id)
            .expect("the symbol pass decorates every function node with its signature");
        self.current_function = Some(func_type);

        let mut subroutine = Subroutine::new(&function.name.name);

        // 有返回值的函数先拿到 _result 形参
        let ret_type = self.analysis.types.func_ret(func_type);
        if !self.analysis.types.is_void(ret_type) {
            subroutine.add_param("_result", self.analysis.types.repr(ret_type), false);
        }

        // 形参：数组按引用传递，拼写用元素类型
        for param in &function.params {
            let param_type = self
                .analysis
                .decor
                .get_type(param.id)
                .expect("the symbol pass decorates every parameter node");
            let by_ref = self.analysis.types.is_array(param_type);
            subroutine.add_param(
                &param.name.name,
                self.analysis.types.repr(param_type),
                by_ref,
            );
        }

        // 局部变量：数组占 N × 元素大小 个单元
        for decl in &function.decls {
            let decl_type = self
                .analysis
                .decor
                .get_type(decl.id)
                .expect("the symbol pass decorates every declaration node");
            let repr = self.analysis.types.repr(decl_type);
            let size = self.analysis.types.size_of(decl_type);
            for name in &decl.names {
                subroutine.add_local(&name.name, repr, size);
            }
        }

        // 语句体，最后拼上一条无条件 return
        let mut code = InstrList::new();
        for statement in &function.body {
            code = code.then(self.gen_statement(statement));
        }
        code = code.then(Instruction::Return);
        subroutine.set_instructions(code);

        self.current_function = None;
        self.analysis.symbols.pop_scope();
        subroutine
    }
}
