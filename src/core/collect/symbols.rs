//! Module-scope bindings of one file.
//!
//! Built once per file before the extraction passes run. Answers two
//! questions: where a top-level name comes from (an import, a `require`, a
//! local declaration), and which declarators anywhere in the file are
//! initialized with a tagged template.

use std::collections::HashMap;

use swc_ecma_ast::{
    Decl, DefaultDecl, Expr, FnDecl, ImportSpecifier, Module, ModuleDecl, ModuleExportName,
    ModuleItem, ObjectPatProp, Pat, PropName, Stmt, TaggedTpl, VarDeclarator,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::core::collect::helpers::{extract_binding_names, require_binding, unwrap_ts_expr};

/// Upper bound on `const a = b` hops followed when resolving an alias.
pub const MAX_ALIAS_HOPS: usize = 16;

/// How an import specifier brings a name into scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportKind {
    /// `import { imported as local }`; holds the imported name.
    Named(String),
    Default,
    Namespace,
}

/// What a module-scope name is bound to.
#[derive(Debug, Clone)]
pub enum Binding<'a> {
    Import { source: String, kind: ImportKind },
    /// `require(source)`, optionally narrowed to one property by destructuring
    /// or member access.
    Require {
        source: String,
        property: Option<String>,
    },
    Var(&'a VarDeclarator),
    Fn(&'a FnDecl),
    /// Classes, destructured variables and anything else that only shadows.
    Other,
}

impl Binding<'_> {
    /// Whether the binding is an import or `require` of `package`.
    pub fn is_from_package(&self, package: &str) -> bool {
        match self {
            Binding::Import { source, .. } | Binding::Require { source, .. } => source == package,
            _ => false,
        }
    }

    /// Whether the binding is `package`'s named export `export`.
    pub fn is_package_export(&self, package: &str, export: &str) -> bool {
        match self {
            Binding::Import {
                source,
                kind: ImportKind::Named(imported),
            } => source == package && imported == export,
            Binding::Require {
                source,
                property: Some(property),
            } => source == package && property == export,
            _ => false,
        }
    }

    /// Whether the binding is the package object itself: a default or
    /// namespace import, or a whole `require`.
    pub fn is_package_object(&self, package: &str) -> bool {
        match self {
            Binding::Import {
                source,
                kind: ImportKind::Default | ImportKind::Namespace,
            } => source == package,
            Binding::Require {
                source,
                property: None,
            } => source == package,
            _ => false,
        }
    }
}

#[derive(Debug, Default)]
pub struct SymbolTable<'a> {
    bindings: HashMap<String, Binding<'a>>,
    tagged_declarators: HashMap<String, Vec<TaggedTpl>>,
}

impl<'a> SymbolTable<'a> {
    pub fn build(module: &'a Module) -> Self {
        let mut table = Self::default();

        for item in &module.body {
            match item {
                ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => {
                    if import.type_only {
                        continue;
                    }
                    let Some(source) = import.src.value.as_str() else {
                        continue;
                    };
                    for specifier in &import.specifiers {
                        let (local, kind) = match specifier {
                            ImportSpecifier::Named(named) => {
                                if named.is_type_only {
                                    continue;
                                }
                                let local = named.local.sym.to_string();
                                let imported = named
                                    .imported
                                    .as_ref()
                                    .map(|i| match i {
                                        ModuleExportName::Ident(ident) => ident.sym.to_string(),
                                        ModuleExportName::Str(s) => {
                                            s.value.to_string_lossy().to_string()
                                        }
                                    })
                                    .unwrap_or_else(|| local.clone());
                                (local, ImportKind::Named(imported))
                            }
                            ImportSpecifier::Default(default) => {
                                (default.local.sym.to_string(), ImportKind::Default)
                            }
                            ImportSpecifier::Namespace(ns) => {
                                (ns.local.sym.to_string(), ImportKind::Namespace)
                            }
                        };
                        table.bindings.insert(
                            local,
                            Binding::Import {
                                source: source.to_string(),
                                kind,
                            },
                        );
                    }
                }
                ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => {
                    table.declare(&export.decl);
                }
                ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(export)) => {
                    let ident = match &export.decl {
                        DefaultDecl::Fn(f) => f.ident.as_ref(),
                        DefaultDecl::Class(c) => c.ident.as_ref(),
                        _ => None,
                    };
                    if let Some(ident) = ident {
                        table.bindings.insert(ident.sym.to_string(), Binding::Other);
                    }
                }
                ModuleItem::Stmt(Stmt::Decl(decl)) => table.declare(decl),
                _ => {}
            }
        }

        let mut collector = TaggedDeclaratorCollector::default();
        module.visit_with(&mut collector);
        table.tagged_declarators = collector.found;

        table
    }

    fn declare(&mut self, decl: &'a Decl) {
        match decl {
            Decl::Fn(f) => {
                self.bindings.insert(f.ident.sym.to_string(), Binding::Fn(f));
            }
            Decl::Class(c) => {
                self.bindings.insert(c.ident.sym.to_string(), Binding::Other);
            }
            Decl::Var(var) => {
                for declarator in &var.decls {
                    self.declare_var(declarator);
                }
            }
            _ => {}
        }
    }

    fn declare_var(&mut self, declarator: &'a VarDeclarator) {
        let required = declarator.init.as_deref().and_then(require_binding);

        match (&declarator.name, required) {
            (Pat::Ident(ident), Some((source, property))) => {
                self.bindings.insert(
                    ident.id.sym.to_string(),
                    Binding::Require { source, property },
                );
            }
            // const { graphql, useStaticQuery: useQuery } = require("gatsby")
            (Pat::Object(obj), Some((source, None))) => {
                for prop in &obj.props {
                    match prop {
                        ObjectPatProp::Assign(assign) => {
                            self.bindings.insert(
                                assign.key.sym.to_string(),
                                Binding::Require {
                                    source: source.clone(),
                                    property: Some(assign.key.sym.to_string()),
                                },
                            );
                        }
                        ObjectPatProp::KeyValue(kv) => {
                            let key = match &kv.key {
                                PropName::Ident(ident) => Some(ident.sym.to_string()),
                                PropName::Str(s) => s.value.as_str().map(|s| s.to_string()),
                                _ => None,
                            };
                            let binding = match (key, &*kv.value) {
                                (Some(key), Pat::Ident(_)) => Binding::Require {
                                    source: source.clone(),
                                    property: Some(key),
                                },
                                _ => Binding::Other,
                            };
                            for name in extract_binding_names(&kv.value) {
                                self.bindings.insert(name, binding.clone());
                            }
                        }
                        ObjectPatProp::Rest(rest) => {
                            for name in extract_binding_names(&rest.arg) {
                                self.bindings.insert(name, Binding::Other);
                            }
                        }
                    }
                }
            }
            (Pat::Ident(ident), None) => {
                self.bindings
                    .insert(ident.id.sym.to_string(), Binding::Var(declarator));
            }
            (pat, _) => {
                for name in extract_binding_names(pat) {
                    self.bindings.insert(name, Binding::Other);
                }
            }
        }
    }

    /// Module-scope binding of `name`.
    pub fn get(&self, name: &str) -> Option<&Binding<'a>> {
        self.bindings.get(name)
    }

    /// Tagged templates assigned to a declarator named `name`, anywhere in
    /// the file, in source order.
    pub fn tagged_declarators(&self, name: &str) -> &[TaggedTpl] {
        self.tagged_declarators
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Resolve `name` through chains of `const a = b` declarations.
    ///
    /// Returns the binding the chain ends at. A hop to a name without a
    /// module-scope binding, or a chain longer than [`MAX_ALIAS_HOPS`]
    /// (cycles included), resolves to nothing.
    pub fn follow_variable_declarations(&self, name: &str) -> Option<&Binding<'a>> {
        let mut binding = self.bindings.get(name)?;
        for _ in 0..MAX_ALIAS_HOPS {
            let Binding::Var(declarator) = binding else {
                return Some(binding);
            };
            match declarator.init.as_deref().map(unwrap_ts_expr) {
                Some(Expr::Ident(next)) => binding = self.bindings.get(next.sym.as_str())?,
                _ => return Some(binding),
            }
        }
        None
    }
}

#[derive(Default)]
struct TaggedDeclaratorCollector {
    found: HashMap<String, Vec<TaggedTpl>>,
}

impl Visit for TaggedDeclaratorCollector {
    fn visit_var_declarator(&mut self, node: &VarDeclarator) {
        if let Pat::Ident(ident) = &node.name
            && let Some(init) = node.init.as_deref()
            && let Expr::TaggedTpl(tagged) = unwrap_ts_expr(init)
        {
            self.found
                .entry(ident.id.sym.to_string())
                .or_default()
                .push(tagged.clone());
        }
        node.visit_children_with(self);
    }
}

#[cfg(test)]
mod tests {
    use crate::core::collect::symbols::*;
    use crate::core::parsers::jsx::parse_jsx_source;
    use pretty_assertions::assert_eq;

    fn parse(code: &str) -> Module {
        parse_jsx_source(code.to_string(), "test.js").unwrap().module
    }

    #[test]
    fn test_imports() {
        let module = parse(
            r#"
            import { graphql as gql, useStaticQuery } from "gatsby";
            import * as G from "gatsby";
            import Gatsby from "gatsby";
            import { graphql } from "other";
            "#,
        );
        let table = SymbolTable::build(&module);

        assert!(table.get("gql").unwrap().is_package_export("gatsby", "graphql"));
        assert!(table.get("useStaticQuery").unwrap().is_from_package("gatsby"));
        assert!(table.get("G").unwrap().is_package_object("gatsby"));
        assert!(table.get("Gatsby").unwrap().is_package_object("gatsby"));
        assert!(!table.get("graphql").unwrap().is_from_package("gatsby"));
    }

    #[test]
    fn test_requires() {
        let module = parse(
            r#"
            const { graphql, useStaticQuery: useQuery } = require("gatsby");
            const gatsby = require("gatsby");
            const tag = require("gatsby").graphql;
            "#,
        );
        let table = SymbolTable::build(&module);

        assert!(table.get("graphql").unwrap().is_package_export("gatsby", "graphql"));
        assert!(table.get("useQuery").unwrap().is_package_export("gatsby", "useStaticQuery"));
        assert!(table.get("gatsby").unwrap().is_package_object("gatsby"));
        assert!(table.get("tag").unwrap().is_package_export("gatsby", "graphql"));
    }

    #[test]
    fn test_follow_variable_declarations() {
        let module = parse(
            r#"
            const query = graphql`{ site { id } }`;
            const alias = query;
            export const pageQuery = alias;
            "#,
        );
        let table = SymbolTable::build(&module);

        let Some(Binding::Var(declarator)) = table.follow_variable_declarations("pageQuery") else {
            panic!("expected a variable binding");
        };
        match &declarator.name {
            Pat::Ident(ident) => assert_eq!(ident.id.sym.as_str(), "query"),
            other => panic!("unexpected pattern {other:?}"),
        }
    }

    #[test]
    fn test_follow_variable_declarations_cycle() {
        let module = parse("const a = b; const b = a;");
        let table = SymbolTable::build(&module);
        assert!(table.follow_variable_declarations("a").is_none());
    }

    #[test]
    fn test_follow_variable_declarations_unbound_hop() {
        let module = parse("const a = somewhereElse;");
        let table = SymbolTable::build(&module);
        assert!(table.follow_variable_declarations("a").is_none());
        assert!(table.follow_variable_declarations("missing").is_none());
    }

    #[test]
    fn test_tagged_declarators_include_nested_scopes() {
        let module = parse(
            r#"
            function Component() {
              const query = graphql`{ a }`;
              return null;
            }
            const query = graphql`{ b }`;
            const other = "not a template";
            "#,
        );
        let table = SymbolTable::build(&module);
        assert_eq!(table.tagged_declarators("query").len(), 2);
        assert!(table.tagged_declarators("other").is_empty());
    }
}
