// In src/analyzer/symbol_pass.rs
//
// PASS 1：遍历语法树，建立作用域、注册符号、构建声明的类型。
// 不返回值；所有效果都落在符号表、类型目录和旁挂属性表里。
// 出错（重复声明）时记录诊断并继续扫描。

use super::symbols::GLOBAL_SCOPE_NAME;
use super::types::TypeId;
use super::Analyzer;
use crate::parser::ast;
use crate::reporter::SemanticError;

/// 入口：处理整个程序。
pub(super) fn run(an: &mut Analyzer, program: &ast::Program) {
    let sc = an.symbols.push_new_scope(GLOBAL_SCOPE_NAME);
    an.decor.put_scope(program.id, sc);

    for function in &program.functions {
        visit_function(an, function);
    }

    an.symbols.pop_scope();
}

fn visit_function(an: &mut Analyzer, function: &ast::Function) {
    // 函数自己的作用域：参数在前，局部变量在后
    let sc = an.symbols.push_new_scope(&function.name.name);
    an.decor.put_scope(function.id, sc);

    let mut param_types = Vec::new();
    for param in &function.params {
        param_types.push(visit_parameter(an, param));
    }

    for decl in &function.decls {
        visit_variable_decl(an, decl);
    }

    an.symbols.pop_scope();

    // 返回类型缺省为 void
    let ret_type = match &function.ret {
        Some(spec) => visit_type(an, spec),
        None => an.types.void(),
    };
    let func_type = an.types.function(param_types, ret_type);

    // 函数节点总是带上自己的签名类型，即使名字在外层重复；
    // 只有符号表的注册会被跳过
    an.decor.put_type(function.id, func_type);

    if an.symbols.find_in_current(&function.name.name).is_some() {
        an.error(SemanticError::DuplicateDeclaration {
            name: function.name.name.clone(),
            span: function.name.span.into(),
        });
    } else {
        an.symbols.add_function(&function.name.name, func_type);
    }
}

/// 处理一个参数声明；总是返回其声明类型，供函数签名使用。
fn visit_parameter(an: &mut Analyzer, param: &ast::Parameter) -> TypeId {
    let ty = visit_type(an, &param.ty);

    if an.symbols.find_in_current(&param.name.name).is_some() {
        an.error(SemanticError::DuplicateDeclaration {
            name: param.name.name.clone(),
            span: param.name.span.into(),
        });
    } else {
        an.decor.put_type(param.id, ty);
        an.symbols.add_parameter(&param.name.name, ty);
    }

    ty
}

fn visit_variable_decl(an: &mut Analyzer, decl: &ast::VarDecl) {
    let ty = visit_type(an, &decl.ty);
    an.decor.put_type(decl.id, ty);

    for name in &decl.names {
        if an.symbols.find_in_current(&name.name).is_some() {
            an.error(SemanticError::DuplicateDeclaration {
                name: name.name.clone(),
                span: name.span.into(),
            });
        } else {
            an.symbols.add_local(&name.name, ty);
        }
    }
}

/// 构建类型标注对应的 Type 并挂在标注节点上。
fn visit_type(an: &mut Analyzer, spec: &ast::TypeSpec) -> TypeId {
    let ty = match &spec.kind {
        ast::TypeSpecKind::Basic(basic) => basic_type(an, *basic),
        ast::TypeSpecKind::Array { size, elem } => {
            let elem = basic_type(an, *elem);
            an.types.array(*size, elem)
        }
    };
    an.decor.put_type(spec.id, ty);
    ty
}

fn basic_type(an: &Analyzer, basic: ast::BasicType) -> TypeId {
    match basic {
        ast::BasicType::Int => an.types.integer(),
        ast::BasicType::Float => an.types.float(),
        ast::BasicType::Bool => an.types.boolean(),
        ast::BasicType::Char => an.types.character(),
    }
}
