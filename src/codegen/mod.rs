// In src/codegen/mod.rs

// 1. 声明所有子模块
mod expression;
mod function;
pub mod instruction;
mod statement;

#[cfg(test)]
mod test;

// 2. 导入依赖
use crate::analyzer::Analysis;
use crate::parser::ast;
pub use instruction::{CodeCounters, InstrList, Instruction, Subroutine, TacProgram};

/// 代码生成器。
///
/// 只在类型检查没有产生任何诊断时运行：此时每个表达式节点都带着
/// 非 Error 的类型和左值标记，每个函数节点都带着作用域和签名。
/// 生成器借用分析产物（类型目录、符号表、旁挂属性）和只读的语法树，
/// 自底向上合成指令序列。
pub struct CodeGen<'a> {
    pub(crate) analysis: &'a mut Analysis,
    /// 当前函数的新名字来源，进入函数时复位。
    pub(crate) counters: CodeCounters,
    /// 当前函数的签名类型，return 语句需要它。
    pub(crate) current_function: Option<crate::analyzer::types::TypeId>,
}

impl<'a> CodeGen<'a> {
    pub fn new(analysis: &'a mut Analysis) -> Self {
        Self {
            analysis,
            counters: CodeCounters::default(),
            current_function: None,
        }
    }

    /// 程序规则：重新进入全局作用域，把每个函数变成一个子程序。
    pub fn run(mut self, program: &ast::Program) -> TacProgram {
        let mut tac = TacProgram::new();

        let sc = self
            .analysis
            .decor
            .get_scope(program.id)
            .expect("the symbol pass decorates the program node with its scope");
        self.analysis.symbols.push_existing_scope(sc);

        for function in &program.functions {
            let subroutine = self.gen_function(function);
            tac.add_subroutine(subroutine);
        }

        self.analysis.symbols.pop_scope();
        tac
    }

    /// 读取表达式节点在类型检查时挂上的类型。
    pub(crate) fn expr_type(
        &self,
        node: ast::NodeId,
    ) -> crate::analyzer::types::TypeId {
        self.analysis
            .decor
            .get_type(node)
            .expect("the type pass decorates every expression node")
    }
}

/// 顶层代码生成函数。
pub fn codegen(program: &ast::Program, analysis: &mut Analysis) -> TacProgram {
    CodeGen::new(analysis).run(program)
}
