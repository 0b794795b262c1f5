//! Helper functions for AST node inspection.
//!
//! Pure functions with no state dependencies, shared by the symbol table and
//! the extraction passes.

use swc_ecma_ast::{CallExpr, Callee, Expr, Lit, MemberProp, ObjectPatProp, Pat};

/// Collect every identifier bound by a pattern.
pub fn extract_binding_names(pat: &Pat) -> Vec<String> {
    match pat {
        Pat::Ident(ident) => vec![ident.id.sym.to_string()],
        Pat::Object(obj) => obj
            .props
            .iter()
            .flat_map(|prop| match prop {
                ObjectPatProp::KeyValue(kv) => extract_binding_names(&kv.value),
                ObjectPatProp::Assign(assign) => vec![assign.key.sym.to_string()],
                ObjectPatProp::Rest(rest) => extract_binding_names(&rest.arg),
            })
            .collect(),
        Pat::Array(arr) => arr
            .elems
            .iter()
            .flatten()
            .flat_map(extract_binding_names)
            .collect(),
        Pat::Assign(assign) => extract_binding_names(&assign.left),
        Pat::Rest(rest) => extract_binding_names(&rest.arg),
        _ => vec![],
    }
}

/// Extract string argument from a call expression.
pub fn extract_string_arg(call: &CallExpr) -> Option<String> {
    call.args.first().and_then(|arg| match &*arg.expr {
        Expr::Lit(Lit::Str(s)) => s.value.as_str().map(|s| s.to_string()),
        Expr::Tpl(tpl) if tpl.exprs.is_empty() => tpl
            .quasis
            .first()
            .and_then(|q| q.cooked.as_ref())
            .and_then(|s| s.as_str().map(|s| s.to_string())),
        _ => None,
    })
}

/// Unwrap TypeScript-specific expression wrappers to get the inner expression.
pub fn unwrap_ts_expr(expr: &Expr) -> &Expr {
    match expr {
        Expr::TsAs(ts_as) => unwrap_ts_expr(&ts_as.expr),
        Expr::TsConstAssertion(ts_const) => unwrap_ts_expr(&ts_const.expr),
        Expr::TsSatisfies(ts_sat) => unwrap_ts_expr(&ts_sat.expr),
        Expr::TsNonNull(non_null) => unwrap_ts_expr(&non_null.expr),
        Expr::Paren(paren) => unwrap_ts_expr(&paren.expr),
        _ => expr,
    }
}

/// Module name of a `require("...")` call.
pub fn require_source(call: &CallExpr) -> Option<String> {
    match &call.callee {
        Callee::Expr(callee) => match &**callee {
            Expr::Ident(ident) if ident.sym.as_str() == "require" => extract_string_arg(call),
            _ => None,
        },
        _ => None,
    }
}

/// What a `require` initializer pulls in.
///
/// `require("pkg")` gives `("pkg", None)`, `require("pkg").graphql` gives
/// `("pkg", Some("graphql"))`.
pub fn require_binding(init: &Expr) -> Option<(String, Option<String>)> {
    match unwrap_ts_expr(init) {
        Expr::Call(call) => require_source(call).map(|source| (source, None)),
        Expr::Member(member) => {
            let Expr::Call(call) = unwrap_ts_expr(&member.obj) else {
                return None;
            };
            let MemberProp::Ident(prop) = &member.prop else {
                return None;
            };
            require_source(call).map(|source| (source, Some(prop.sym.to_string())))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::core::collect::helpers::*;
    use crate::core::parsers::jsx::parse_jsx_source;
    use pretty_assertions::assert_eq;
    use swc_ecma_ast::{Decl, ModuleItem, Stmt, VarDeclarator};

    fn first_declarator(code: &str, f: impl FnOnce(&VarDeclarator)) {
        let parsed = parse_jsx_source(code.to_string(), "test.js").unwrap();
        match &parsed.module.body[0] {
            ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) => f(&var.decls[0]),
            other => panic!("expected a variable declaration, got {other:?}"),
        }
    }

    #[test]
    fn test_extract_binding_names_nested() {
        first_declarator("const { a, b: { c }, ...rest } = obj;", |decl| {
            assert_eq!(extract_binding_names(&decl.name), vec!["a", "c", "rest"]);
        });
        first_declarator("const [x, , [y = 1]] = arr;", |decl| {
            assert_eq!(extract_binding_names(&decl.name), vec!["x", "y"]);
        });
    }

    #[test]
    fn test_require_binding() {
        first_declarator("const gatsby = require('gatsby');", |decl| {
            let init = decl.init.as_deref().unwrap();
            assert_eq!(require_binding(init), Some(("gatsby".to_string(), None)));
        });
        first_declarator("const graphql = require(`gatsby`).graphql;", |decl| {
            let init = decl.init.as_deref().unwrap();
            assert_eq!(
                require_binding(init),
                Some(("gatsby".to_string(), Some("graphql".to_string())))
            );
        });
        first_declarator("const x = load('gatsby');", |decl| {
            assert_eq!(require_binding(decl.init.as_deref().unwrap()), None);
        });
    }
}
