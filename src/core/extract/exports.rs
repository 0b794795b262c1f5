//! Named exports: `export const query = graphql\`...\``, `export function
//! config() {}` and `export { query }` traced back to its declaration.

use swc_ecma_ast::{
    Decl, ExportDecl, ExportSpecifier, Expr, ModuleDecl, ModuleExportName, ModuleItem, NamedExport,
    Pat,
};
use swc_ecma_visit::VisitWith;

use crate::core::collect::Binding;
use crate::core::collect::helpers::unwrap_ts_expr;
use crate::core::extract::tag::{ConfigExport, Origin};
use crate::core::extract::visitor::PassVisitor;

const CONFIG_EXPORT: &str = "config";

fn is_async_function(expr: &Expr) -> bool {
    match unwrap_ts_expr(expr) {
        Expr::Arrow(arrow) => arrow.is_async,
        Expr::Fn(f) => f.function.is_async,
        _ => false,
    }
}

impl PassVisitor<'_, '_> {
    pub(super) fn export_item(&mut self, item: &ModuleItem) {
        match item {
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => self.export_decl(export),
            // Re-exports from other files are skipped.
            ModuleItem::ModuleDecl(ModuleDecl::ExportNamed(named)) if named.src.is_none() => {
                self.export_named(named)
            }
            _ => {}
        }
    }

    fn with_export(&mut self, origin: Origin, walk: impl FnOnce(&mut Self)) {
        let outer = self.export.replace(origin);
        walk(self);
        self.export = outer;
    }

    fn config_origin(&self, export: &ExportDecl, is_async: bool) -> Origin {
        Origin::Config(ConfigExport {
            name: CONFIG_EXPORT.to_string(),
            is_async,
            start: self.ctx.parsed.position(export.span.lo),
        })
    }

    fn export_decl(&mut self, export: &ExportDecl) {
        match &export.decl {
            Decl::Fn(f) => {
                let origin = if f.ident.sym.as_str() == CONFIG_EXPORT {
                    self.config_origin(export, f.function.is_async)
                } else {
                    Origin::Page
                };
                self.with_export(origin, |this| f.visit_with(this));
            }
            Decl::Var(var) => {
                for declarator in &var.decls {
                    let origin = match &declarator.name {
                        Pat::Ident(ident) if ident.id.sym.as_str() == CONFIG_EXPORT => {
                            let is_async = declarator.init.as_deref().is_some_and(is_async_function);
                            self.config_origin(export, is_async)
                        }
                        _ => Origin::Page,
                    };
                    self.with_export(origin, |this| declarator.visit_with(this));
                }
            }
            decl => self.with_export(Origin::Page, |this| decl.visit_with(this)),
        }
    }

    fn export_named(&mut self, named: &NamedExport) {
        if named.type_only {
            return;
        }
        let symbols = self.ctx.symbols;
        for specifier in &named.specifiers {
            let ExportSpecifier::Named(specifier) = specifier else {
                continue;
            };
            let ModuleExportName::Ident(local) = &specifier.orig else {
                continue;
            };
            match symbols.follow_variable_declarations(local.sym.as_str()) {
                Some(Binding::Var(declarator)) => {
                    self.with_export(Origin::Page, |this| declarator.visit_with(this));
                }
                Some(Binding::Fn(f)) => {
                    self.with_export(Origin::Page, |this| f.visit_with(this));
                }
                _ => {}
            }
        }
    }
}
