//! `useStaticQuery(...)` calls.

use swc_ecma_ast::{CallExpr, Callee, Expr, MemberProp};

use crate::core::collect::helpers::unwrap_ts_expr;
use crate::core::extract::tag::{GRAPHQL_TAG, Origin};
use crate::core::extract::visitor::PassVisitor;

pub(crate) const USE_STATIC_QUERY: &str = "useStaticQuery";

impl PassVisitor<'_, '_> {
    /// Whether a module-scope `name` comes from the framework package.
    fn references_package(&self, name: &str) -> bool {
        !self.scopes.is_local(name)
            && self
                .ctx
                .symbols
                .get(name)
                .is_some_and(|binding| binding.is_from_package(&self.ctx.options.framework_package))
    }

    /// `useStaticQuery(...)` or `pkg.useStaticQuery(...)` bound to the
    /// framework package.
    fn is_use_static_query(&self, call: &CallExpr) -> bool {
        let Callee::Expr(callee) = &call.callee else {
            return false;
        };
        match unwrap_ts_expr(callee) {
            Expr::Ident(ident) if ident.sym.as_str() == USE_STATIC_QUERY => {
                self.references_package(USE_STATIC_QUERY)
            }
            Expr::Member(member) => match (unwrap_ts_expr(&member.obj), &member.prop) {
                (Expr::Ident(object), MemberProp::Ident(prop))
                    if prop.sym.as_str() == USE_STATIC_QUERY =>
                {
                    self.references_package(object.sym.as_str())
                }
                _ => false,
            },
            _ => false,
        }
    }

    pub(super) fn hook_call(&mut self, call: &CallExpr) {
        if !self.is_use_static_query(call) {
            return;
        }
        let Some(arg) = call.args.first() else {
            return;
        };

        match unwrap_ts_expr(&arg.expr) {
            Expr::TaggedTpl(tagged) => {
                self.extract_here(tagged, &Origin::Hook);
            }
            Expr::Ident(ident) => {
                let name = ident.sym.as_str();
                if name == GRAPHQL_TAG || name == USE_STATIC_QUERY {
                    return;
                }
                let symbols = self.ctx.symbols;
                let declared = symbols.tagged_declarators(name);
                if declared.is_empty() {
                    self.warn_unresolved(name, USE_STATIC_QUERY);
                    return;
                }
                for tagged in declared {
                    self.extract_declared(tagged, &Origin::Hook);
                }
            }
            _ => {}
        }
    }
}
