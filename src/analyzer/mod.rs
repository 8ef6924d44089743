// In src/analyzer/mod.rs

// 1. 声明所有模块
pub mod decoration;
mod expression;
mod semantic_error;
mod statement;
mod symbol_pass;
pub mod symbols;
pub mod types;

#[cfg(test)]
mod test;

// 2. 导入依赖
use crate::diagnostics::DiagnosticBag;
use crate::parser::ast;
use crate::reporter::SemanticError;
use decoration::TreeDecoration;
use symbols::SymTable;
use types::{TypeId, TypeTable};

/// 语义分析的产物：类型目录、符号表和修饰完的语法树属性。
/// 代码生成遍只消费这三样东西（外加只读的语法树本身）。
pub struct Analysis {
    pub types: TypeTable,
    pub symbols: SymTable,
    pub decor: TreeDecoration,
}

/// 语义分析器。两遍扫描共享同一套存储：
/// 第一遍收集作用域和函数签名，第二遍做类型检查并给表达式挂上
/// 类型和左值标记。
pub struct Analyzer<'a> {
    pub(crate) types: TypeTable,
    pub(crate) symbols: SymTable,
    pub(crate) decor: TreeDecoration,
    // Analyzer 需要持有 diagnostics 的可变借用
    pub(crate) diagnostics: &'a mut DiagnosticBag,
    /// 当前正在检查的函数的签名类型（Function）。
    pub(crate) current_function: Option<TypeId>,
}

impl<'a> Analyzer<'a> {
    pub fn new(diagnostics: &'a mut DiagnosticBag) -> Self {
        Self {
            types: TypeTable::new(),
            symbols: SymTable::new(),
            decor: TreeDecoration::new(),
            diagnostics,
            current_function: None,
        }
    }

    /// 运行两遍语义分析。
    ///
    /// 诊断全部进入 DiagnosticBag；只要出现过任何错误就返回 None，
    /// 这样带错误的树永远不会交给代码生成。
    pub fn analyze(mut self, program: &ast::Program) -> Option<Analysis> {
        // PASS 1: 符号收集与类型构建
        symbol_pass::run(&mut self, program);

        // PASS 2: 类型检查与树修饰
        self.check_program(program);

        if self.diagnostics.has_errors() {
            None
        } else {
            Some(Analysis {
                types: self.types,
                symbols: self.symbols,
                decor: self.decor,
            })
        }
    }

    pub(crate) fn error(&mut self, error: SemanticError) {
        self.diagnostics.report((&error).into());
    }

    /// 读取某个节点在第一遍挂上的类型。
    pub(crate) fn type_decor(&self, node: ast::NodeId) -> TypeId {
        self.decor
            .get_type(node)
            .expect("node was not decorated with a type by the symbol pass")
    }
}
