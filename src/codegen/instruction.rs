//! src/codegen/instruction.rs
//!
//! 三地址码的指令模型：指令集、指令串接代数、子程序与目标程序，
//! 以及每个函数独立的临时名/标签计数器。
//!
//! 文本格式即虚拟机的输入语言：助记符小写，操作数形如
//! `dst, src1[, src2]`，标签独占一行写作 `label 名字:`。

use std::fmt;

/// 一条三地址指令。操作数一律是文本地址：
/// 符号名、`%` 开头的临时名、字面量原文或标签名。
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    // 整数算术
    Add(String, String, String),
    Sub(String, String, String),
    Mul(String, String, String),
    Div(String, String, String),
    // 浮点算术
    Fadd(String, String, String),
    Fsub(String, String, String),
    Fmul(String, String, String),
    Fdiv(String, String, String),
    // 一元运算
    Neg(String, String),
    Fneg(String, String),
    Not(String, String),
    // 逻辑运算（布尔按整数表示）
    And(String, String, String),
    Or(String, String, String),
    // 比较
    Eq(String, String, String),
    Lt(String, String, String),
    Le(String, String, String),
    Feq(String, String, String),
    Flt(String, String, String),
    Fle(String, String, String),
    // 整数到浮点的转换
    Float(String, String),
    // 装载（字面量或单元到单元的拷贝）
    Iload(String, String),
    Fload(String, String),
    Chload(String, String),
    Load(String, String),
    // 下标访问：dst = base[off] / base[off] = src
    Loadx(String, String, String),
    Xload(String, String, String),
    // 取局部数组的基地址（构造按引用实参）
    Aload(String, String),
    // I/O
    Readi(String),
    Readf(String),
    Readc(String),
    Writei(String),
    Writef(String),
    Writec(String),
    Writes(String),
    // 控制流
    Ujump(String),
    Fjump(String, String),
    Label(String),
    // 调用协议
    Push(Option<String>),
    Pop(Option<String>),
    Call(String),
    Return,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;
        match self {
            Add(d, a, b) => write!(f, "add {}, {}, {}", d, a, b),
            Sub(d, a, b) => write!(f, "sub {}, {}, {}", d, a, b),
            Mul(d, a, b) => write!(f, "mul {}, {}, {}", d, a, b),
            Div(d, a, b) => write!(f, "div {}, {}, {}", d, a, b),
            Fadd(d, a, b) => write!(f, "fadd {}, {}, {}", d, a, b),
            Fsub(d, a, b) => write!(f, "fsub {}, {}, {}", d, a, b),
            Fmul(d, a, b) => write!(f, "fmul {}, {}, {}", d, a, b),
            Fdiv(d, a, b) => write!(f, "fdiv {}, {}, {}", d, a, b),
            Neg(d, s) => write!(f, "neg {}, {}", d, s),
            Fneg(d, s) => write!(f, "fneg {}, {}", d, s),
            Not(d, s) => write!(f, "not {}, {}", d, s),
            And(d, a, b) => write!(f, "and {}, {}, {}", d, a, b),
            Or(d, a, b) => write!(f, "or {}, {}, {}", d, a, b),
            Eq(d, a, b) => write!(f, "eq {}, {}, {}", d, a, b),
            Lt(d, a, b) => write!(f, "lt {}, {}, {}", d, a, b),
            Le(d, a, b) => write!(f, "le {}, {}, {}", d, a, b),
            Feq(d, a, b) => write!(f, "feq {}, {}, {}", d, a, b),
            Flt(d, a, b) => write!(f, "flt {}, {}, {}", d, a, b),
            Fle(d, a, b) => write!(f, "fle {}, {}, {}", d, a, b),
            Float(d, s) => write!(f, "float {}, {}", d, s),
            Iload(d, s) => write!(f, "iload {}, {}", d, s),
            Fload(d, s) => write!(f, "fload {}, {}", d, s),
            Chload(d, s) => write!(f, "chload {}, {}", d, s),
            Load(d, s) => write!(f, "load {}, {}", d, s),
            Loadx(d, b, o) => write!(f, "loadx {}, {}, {}", d, b, o),
            Xload(b, o, s) => write!(f, "xload {}, {}, {}", b, o, s),
            Aload(d, s) => write!(f, "aload {}, {}", d, s),
            Readi(d) => write!(f, "readi {}", d),
            Readf(d) => write!(f, "readf {}", d),
            Readc(d) => write!(f, "readc {}", d),
            Writei(s) => write!(f, "writei {}", s),
            Writef(s) => write!(f, "writef {}", s),
            Writec(s) => write!(f, "writec {}", s),
            // 字符串字面量原文（含引号）逐字输出
            Writes(s) => write!(f, "writes {}", s),
            Ujump(l) => write!(f, "ujump {}", l),
            Fjump(c, l) => write!(f, "fjump {}, {}", c, l),
            Label(l) => write!(f, "label {}:", l),
            Push(Some(s)) => write!(f, "push {}", s),
            Push(None) => write!(f, "push"),
            Pop(Some(d)) => write!(f, "pop {}", d),
            Pop(None) => write!(f, "pop"),
            Call(n) => write!(f, "call {}", n),
            Return => write!(f, "return"),
        }
    }
}

/// 指令序列，自底向上合成代码时的小代数：
/// `a.then(b)` 串接两段，`then` 也直接接受单条指令。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstrList {
    instrs: Vec<Instruction>,
}

impl InstrList {
    pub fn new() -> Self {
        InstrList::default()
    }

    /// 串接，消费两边并返回新的序列。
    pub fn then(mut self, tail: impl Into<InstrList>) -> Self {
        self.instrs.extend(tail.into().instrs);
        self
    }

    pub fn push(&mut self, instruction: Instruction) {
        self.instrs.push(instruction);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instrs.iter()
    }
}

impl From<Instruction> for InstrList {
    fn from(instruction: Instruction) -> Self {
        InstrList {
            instrs: vec![instruction],
        }
    }
}

/// 每个函数独立的新名字来源。临时名形如 `%T0, %T1, …`；
/// if 和 while 的标签计数互相独立，配对的标签共享同一个编号
/// （`else3`/`endif3`，`while1`/`endwhile1`），便于人工阅读产物。
/// 进入每个函数时整体复位。
#[derive(Debug, Default)]
pub struct CodeCounters {
    temps: u32,
    ifs: u32,
    whiles: u32,
}

impl CodeCounters {
    pub fn reset(&mut self) {
        *self = CodeCounters::default();
    }

    pub fn new_temp(&mut self) -> String {
        let temp = format!("%T{}", self.temps);
        self.temps += 1;
        temp
    }

    /// 下一对 if 标签的编号。
    pub fn new_if(&mut self) -> u32 {
        let n = self.ifs;
        self.ifs += 1;
        n
    }

    /// 下一对 while 标签的编号。
    pub fn new_while(&mut self) -> u32 {
        let n = self.whiles;
        self.whiles += 1;
        n
    }
}

/// 子程序的一个形参。数组参数按引用传递（`by_ref`），
/// 它的槽里放的是调用方数组的基地址。
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub repr: String,
    pub by_ref: bool,
}

/// 子程序的一个局部变量。数组的大小是元素个数。
#[derive(Debug, Clone, PartialEq)]
pub struct Local {
    pub name: String,
    pub repr: String,
    pub size: usize,
}

/// 一个编译好的子程序：名字、形参表、局部变量表和指令序列。
/// 挂进目标程序后不再修改。
#[derive(Debug, Clone, PartialEq)]
pub struct Subroutine {
    pub name: String,
    params: Vec<Param>,
    locals: Vec<Local>,
    body: InstrList,
}

impl Subroutine {
    pub fn new(name: &str) -> Self {
        Subroutine {
            name: name.to_string(),
            params: Vec::new(),
            locals: Vec::new(),
            body: InstrList::new(),
        }
    }

    pub fn add_param(&mut self, name: &str, repr: &str, by_ref: bool) {
        self.params.push(Param {
            name: name.to_string(),
            repr: repr.to_string(),
            by_ref,
        });
    }

    pub fn add_local(&mut self, name: &str, repr: &str, size: usize) {
        self.locals.push(Local {
            name: name.to_string(),
            repr: repr.to_string(),
            size,
        });
    }

    pub fn set_instructions(&mut self, body: InstrList) {
        self.body = body;
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn locals(&self) -> &[Local] {
        &self.locals
    }

    pub fn body(&self) -> &InstrList {
        &self.body
    }
}

impl fmt::Display for Subroutine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "subroutine {}", self.name)?;
        for param in &self.params {
            if param.by_ref {
                writeln!(f, "  param {} : {} byref", param.name, param.repr)?;
            } else {
                writeln!(f, "  param {} : {}", param.name, param.repr)?;
            }
        }
        for local in &self.locals {
            writeln!(f, "  var {} : {} : {}", local.name, local.repr, local.size)?;
        }
        for instruction in self.body.iter() {
            writeln!(f, "  {}", instruction)?;
        }
        Ok(())
    }
}

/// 发射完成的目标程序：按源文件顺序排列的子程序序列。
/// 入口是名为 `main` 的子程序。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TacProgram {
    subroutines: Vec<Subroutine>,
}

impl TacProgram {
    pub fn new() -> Self {
        TacProgram::default()
    }

    pub fn add_subroutine(&mut self, subroutine: Subroutine) {
        self.subroutines.push(subroutine);
    }

    pub fn subroutines(&self) -> &[Subroutine] {
        &self.subroutines
    }
}

impl fmt::Display for TacProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, subroutine) in self.subroutines.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", subroutine)?;
        }
        Ok(())
    }
}
