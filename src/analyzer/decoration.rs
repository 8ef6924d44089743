// src/analyzer/decoration.rs

use super::symbols::ScopeId;
use super::types::TypeId;
use crate::parser::ast::NodeId;
use std::collections::HashMap;

/// 一个节点的全部旁挂属性。三个槽都是可选的：
/// 作用域只挂在 Program 和 Function 上，类型挂在表达式、
/// 声明和函数节点上，左值标记只挂在表达式上。
#[derive(Debug, Clone, Copy, Default)]
pub struct Decor {
    pub scope: Option<ScopeId>,
    pub ty: Option<TypeId>,
    pub is_lvalue: Option<bool>,
}

/// 语法树的旁挂属性表。
///
/// 树本身来自解析器并保持只读；各分析遍需要的额外属性都写进这张
/// 以 `NodeId` 为键的表里，后写的遍可以覆盖先写的值。
#[derive(Debug, Default)]
pub struct TreeDecoration {
    map: HashMap<NodeId, Decor>,
}

impl TreeDecoration {
    pub fn new() -> Self {
        TreeDecoration::default()
    }

    pub fn put_scope(&mut self, node: NodeId, scope: ScopeId) {
        self.map.entry(node).or_default().scope = Some(scope);
    }

    pub fn get_scope(&self, node: NodeId) -> Option<ScopeId> {
        self.map.get(&node).and_then(|d| d.scope)
    }

    pub fn put_type(&mut self, node: NodeId, ty: TypeId) {
        self.map.entry(node).or_default().ty = Some(ty);
    }

    pub fn get_type(&self, node: NodeId) -> Option<TypeId> {
        self.map.get(&node).and_then(|d| d.ty)
    }

    pub fn put_is_lvalue(&mut self, node: NodeId, is_lvalue: bool) {
        self.map.entry(node).or_default().is_lvalue = Some(is_lvalue);
    }

    pub fn get_is_lvalue(&self, node: NodeId) -> Option<bool> {
        self.map.get(&node).and_then(|d| d.is_lvalue)
    }

    pub fn get(&self, node: NodeId) -> Option<&Decor> {
        self.map.get(&node)
    }
}
