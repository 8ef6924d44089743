//! src/analyzer/types.rs
//!
//! 编译器的核心类型系统：类型目录 `TypeTable`。
//!
//! 类型描述符按结构驻留（intern）在目录里，外界只拿到不透明的 `TypeId`。
//! 驻留保证了结构相等等价于 id 相等，所以树的旁挂属性、符号表和
//! 代码生成器都只需要存储和比较一个 Copy 的小句柄。

use crate::parser::ast::BinOp;
use std::collections::HashMap;

/// 一个类型描述符。数组元素和函数签名通过 `TypeId` 间接引用，
/// 使描述符本身保持可哈希、可驻留。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// 错误类型：由出错的节点注入，用于抑制父节点上的连锁诊断。
    Error,
    /// 空类型，用于没有返回值的函数。
    Void,
    Integer,
    Float,
    Boolean,
    Character,
    /// 固定大小的一维数组。
    Array { size: usize, elem: TypeId },
    /// 函数签名。
    Function { params: Vec<TypeId>, ret: TypeId },
}

/// 类型目录中一个驻留类型的不透明句柄。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(u32);

// 六个标量在 new() 里按固定顺序预先驻留
const ERROR: TypeId = TypeId(0);
const VOID: TypeId = TypeId(1);
const INTEGER: TypeId = TypeId(2);
const FLOAT: TypeId = TypeId(3);
const BOOLEAN: TypeId = TypeId(4);
const CHARACTER: TypeId = TypeId(5);

/// 类型目录。
#[derive(Debug)]
pub struct TypeTable {
    types: Vec<Type>,
    interned: HashMap<Type, TypeId>,
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeTable {
    pub fn new() -> Self {
        let mut table = TypeTable {
            types: Vec::new(),
            interned: HashMap::new(),
        };
        // 顺序必须与上面的常量一致
        table.intern(Type::Error);
        table.intern(Type::Void);
        table.intern(Type::Integer);
        table.intern(Type::Float);
        table.intern(Type::Boolean);
        table.intern(Type::Character);
        table
    }

    fn intern(&mut self, ty: Type) -> TypeId {
        if let Some(&id) = self.interned.get(&ty) {
            return id;
        }
        let id = TypeId(self.types.len() as u32);
        self.types.push(ty.clone());
        self.interned.insert(ty, id);
        id
    }

    fn get(&self, id: TypeId) -> &Type {
        &self.types[id.0 as usize]
    }

    // --- 构造函数 ---

    pub fn error(&self) -> TypeId {
        ERROR
    }

    pub fn void(&self) -> TypeId {
        VOID
    }

    pub fn integer(&self) -> TypeId {
        INTEGER
    }

    pub fn float(&self) -> TypeId {
        FLOAT
    }

    pub fn boolean(&self) -> TypeId {
        BOOLEAN
    }

    pub fn character(&self) -> TypeId {
        CHARACTER
    }

    pub fn array(&mut self, size: usize, elem: TypeId) -> TypeId {
        self.intern(Type::Array { size, elem })
    }

    pub fn function(&mut self, params: Vec<TypeId>, ret: TypeId) -> TypeId {
        self.intern(Type::Function { params, ret })
    }

    // --- 谓词 ---

    pub fn is_error(&self, t: TypeId) -> bool {
        t == ERROR
    }

    pub fn is_void(&self, t: TypeId) -> bool {
        t == VOID
    }

    pub fn is_integer(&self, t: TypeId) -> bool {
        t == INTEGER
    }

    pub fn is_float(&self, t: TypeId) -> bool {
        t == FLOAT
    }

    pub fn is_boolean(&self, t: TypeId) -> bool {
        t == BOOLEAN
    }

    pub fn is_character(&self, t: TypeId) -> bool {
        t == CHARACTER
    }

    /// 基本类型：int / float / bool / char。
    pub fn is_primitive(&self, t: TypeId) -> bool {
        matches!(
            self.get(t),
            Type::Integer | Type::Float | Type::Boolean | Type::Character
        )
    }

    pub fn is_numeric(&self, t: TypeId) -> bool {
        matches!(self.get(t), Type::Integer | Type::Float)
    }

    pub fn is_array(&self, t: TypeId) -> bool {
        matches!(self.get(t), Type::Array { .. })
    }

    pub fn is_function(&self, t: TypeId) -> bool {
        matches!(self.get(t), Type::Function { .. })
    }

    /// `src` 类型的值能否存进 `dst` 类型的存储位置。
    ///
    /// 同一类型总是可以（驻留使结构相等即 id 相等，数组因此要求
    /// 元素类型和大小都一致）；此外只有 int 到 float 的隐式放宽。
    /// 函数类型永远不可拷贝。调用方负责先排除 Error。
    pub fn copyable(&self, dst: TypeId, src: TypeId) -> bool {
        if self.is_function(dst) || self.is_function(src) {
            return false;
        }
        if dst == src {
            return true;
        }
        self.is_float(dst) && self.is_integer(src)
    }

    /// 两个类型能否用比较运算符 `op` 连接。
    ///
    /// `==`/`!=` 接受任意两个同类型的标量，以及 int 与 float 混用；
    /// 有序比较只接受数值对（同样允许 int/float 混用）和字符对。
    pub fn comparable(&self, a: TypeId, b: TypeId, op: BinOp) -> bool {
        if self.is_numeric(a) && self.is_numeric(b) {
            return true;
        }
        if op.is_equality() {
            a == b && self.is_primitive(a)
        } else {
            self.is_character(a) && self.is_character(b)
        }
    }

    // --- 访问器（只在对应谓词成立时调用） ---

    pub fn array_elem(&self, t: TypeId) -> TypeId {
        match self.get(t) {
            Type::Array { elem, .. } => *elem,
            other => unreachable!("array_elem on non-array type {:?}", other),
        }
    }

    pub fn array_size(&self, t: TypeId) -> usize {
        match self.get(t) {
            Type::Array { size, .. } => *size,
            other => unreachable!("array_size on non-array type {:?}", other),
        }
    }

    pub fn func_params(&self, t: TypeId) -> &[TypeId] {
        match self.get(t) {
            Type::Function { params, .. } => params,
            other => unreachable!("func_params on non-function type {:?}", other),
        }
    }

    pub fn func_param(&self, t: TypeId, i: usize) -> TypeId {
        self.func_params(t)[i]
    }

    pub fn func_ret(&self, t: TypeId) -> TypeId {
        match self.get(t) {
            Type::Function { ret, .. } => *ret,
            other => unreachable!("func_ret on non-function type {:?}", other),
        }
    }

    pub fn func_arity(&self, t: TypeId) -> usize {
        self.func_params(t).len()
    }

    /// 类型占据的虚拟机存储单元数。
    pub fn size_of(&self, t: TypeId) -> usize {
        match self.get(t) {
            Type::Integer | Type::Float | Type::Boolean | Type::Character => 1,
            Type::Array { size, elem } => size * self.size_of(*elem),
            Type::Function { .. } => 0,
            other => unreachable!("size_of on type {:?}", other),
        }
    }

    /// 虚拟机使用的类型拼写。数组使用其元素的拼写
    /// （数组参数按引用传递，变量槽里只放基本类型的值）。
    pub fn repr(&self, t: TypeId) -> &'static str {
        match self.get(t) {
            Type::Integer => "int",
            Type::Float => "float",
            Type::Boolean => "bool",
            Type::Character => "char",
            Type::Array { elem, .. } => self.repr(*elem),
            other => unreachable!("no VM spelling for type {:?}", other),
        }
    }

    /// 诊断里使用的人类可读类型名。
    pub fn display(&self, t: TypeId) -> String {
        match self.get(t) {
            Type::Error => "<error>".to_string(),
            Type::Void => "void".to_string(),
            Type::Integer => "int".to_string(),
            Type::Float => "float".to_string(),
            Type::Boolean => "bool".to_string(),
            Type::Character => "char".to_string(),
            Type::Array { size, elem } => {
                format!("array[{}] of {}", size, self.display(*elem))
            }
            Type::Function { params, ret } => {
                let params: Vec<String> = params.iter().map(|p| self.display(*p)).collect();
                format!("func({}) : {}", params.join(", "), self.display(*ret))
            }
        }
    }
}
