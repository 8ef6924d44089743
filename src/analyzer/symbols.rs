// src/analyzer/symbols.rs

use super::types::{TypeId, TypeTable};

/// 全局作用域的名字。它只保存函数符号。
pub const GLOBAL_SCOPE_NAME: &str = "@global";

/// 作用域的稳定编号。符号收集遍把编号挂在 Program / Function 节点上，
/// 后面的遍用 `push_existing_scope` 按编号重新进入同一个作用域。
pub type ScopeId = usize;

/// 符号的种类。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    LocalVar,
    Parameter,
    Function,
}

/// 符号表中存储的符号信息。
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub ty: TypeId,
}

/// 代表一个独立的作用域：全局作用域，或某个函数的局部作用域。
/// 符号保持声明顺序（参数在前，局部变量在后）。
#[derive(Debug)]
pub struct Scope {
    pub name: String,
    symbols: Vec<Symbol>,
}

impl Scope {
    fn find(&self, name: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.name == name)
    }
}

/// 符号表。所有创建过的作用域都被永久保存（以便按编号重新进入），
/// 另有一个栈记录当前活跃的作用域链。查找从栈顶向栈底进行。
#[derive(Debug, Default)]
pub struct SymTable {
    scopes: Vec<Scope>,
    stack: Vec<ScopeId>,
}

impl SymTable {
    pub fn new() -> Self {
        SymTable::default()
    }

    /// 创建一个新的作用域并进入它，返回其编号。
    pub fn push_new_scope(&mut self, name: &str) -> ScopeId {
        let id = self.scopes.len();
        self.scopes.push(Scope {
            name: name.to_string(),
            symbols: Vec::new(),
        });
        self.stack.push(id);
        id
    }

    /// 重新进入一个已经创建过的作用域。
    pub fn push_existing_scope(&mut self, id: ScopeId) {
        assert!(id < self.scopes.len(), "unknown scope id {}", id);
        self.stack.push(id);
    }

    /// 离开当前作用域。
    pub fn pop_scope(&mut self) {
        self.stack
            .pop()
            .expect("pop_scope called with an empty scope stack");
    }

    fn current(&self) -> &Scope {
        let id = *self
            .stack
            .last()
            .expect("the scope stack should never be empty here");
        &self.scopes[id]
    }

    fn current_mut(&mut self) -> &mut Scope {
        let id = *self
            .stack
            .last()
            .expect("the scope stack should never be empty here");
        &mut self.scopes[id]
    }

    // --- 添加符号（调用方负责先用 find_in_current 查重） ---

    pub fn add_local(&mut self, name: &str, ty: TypeId) {
        self.current_mut().symbols.push(Symbol {
            name: name.to_string(),
            kind: SymbolKind::LocalVar,
            ty,
        });
    }

    pub fn add_parameter(&mut self, name: &str, ty: TypeId) {
        self.current_mut().symbols.push(Symbol {
            name: name.to_string(),
            kind: SymbolKind::Parameter,
            ty,
        });
    }

    pub fn add_function(&mut self, name: &str, fn_type: TypeId) {
        self.current_mut().symbols.push(Symbol {
            name: name.to_string(),
            kind: SymbolKind::Function,
            ty: fn_type,
        });
    }

    // --- 查找 ---

    /// 只在当前作用域中查找。
    pub fn find_in_current(&self, name: &str) -> Option<&Symbol> {
        self.current().find(name)
    }

    /// 沿着作用域栈从内到外查找。
    pub fn find_in_stack(&self, name: &str) -> Option<&Symbol> {
        for &id in self.stack.iter().rev() {
            if let Some(symbol) = self.scopes[id].find(name) {
                return Some(symbol);
            }
        }
        None
    }

    pub fn is_function(&self, name: &str) -> bool {
        matches!(
            self.find_in_stack(name),
            Some(Symbol {
                kind: SymbolKind::Function,
                ..
            })
        )
    }

    pub fn is_parameter(&self, name: &str) -> bool {
        matches!(
            self.find_in_stack(name),
            Some(Symbol {
                kind: SymbolKind::Parameter,
                ..
            })
        )
    }

    pub fn is_local(&self, name: &str) -> bool {
        matches!(
            self.find_in_stack(name),
            Some(Symbol {
                kind: SymbolKind::LocalVar,
                ..
            })
        )
    }

    /// 程序是否声明了一个合法的入口：全局作用域里名为 `main`、
    /// 没有参数、没有返回值的函数。
    pub fn has_proper_main(&self, types: &TypeTable) -> bool {
        let global = match self.scopes.iter().find(|s| s.name == GLOBAL_SCOPE_NAME) {
            Some(scope) => scope,
            None => return false,
        };
        match global.find("main") {
            Some(symbol) if symbol.kind == SymbolKind::Function => {
                types.is_function(symbol.ty)
                    && types.func_arity(symbol.ty) == 0
                    && types.is_void(types.func_ret(symbol.ty))
            }
            _ => false,
        }
    }
}
