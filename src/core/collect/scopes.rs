//! Names declared below module scope.
//!
//! A name found here shadows the module-scope binding of the same name, so a
//! local `graphql` or `useStaticQuery` is never mistaken for the imported one.
//!
//! # Example
//! ```ignore
//! import { useStaticQuery } from "gatsby"  // module scope, not tracked here
//! function Inner(useStaticQuery) {          // push scope: { useStaticQuery }
//!     useStaticQuery(query)                 // is_local -> true, not the hook
//! }                                         // pop
//! ```

use std::collections::HashSet;

use swc_ecma_ast::{ArrowExpr, BlockStmt, CatchClause, Decl, Function, Stmt};

use crate::core::collect::helpers::extract_binding_names;

#[derive(Debug, Default)]
pub struct Scopes {
    stack: Vec<HashSet<String>>,
}

impl Scopes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter_scope(&mut self, names: impl IntoIterator<Item = String>) {
        self.stack.push(names.into_iter().collect());
    }

    pub fn exit_scope(&mut self) {
        self.stack.pop();
    }

    /// Push the parameters of a function.
    pub fn enter_function(&mut self, function: &Function) {
        self.enter_scope(
            function
                .params
                .iter()
                .flat_map(|param| extract_binding_names(&param.pat)),
        );
    }

    /// Push the parameters of an arrow function.
    pub fn enter_arrow(&mut self, arrow: &ArrowExpr) {
        self.enter_scope(arrow.params.iter().flat_map(extract_binding_names));
    }

    /// Push the declarations made directly in a block.
    ///
    /// Declarations are hoisted to the start of the block, so a name used
    /// before its declaration is still local.
    pub fn enter_block(&mut self, block: &BlockStmt) {
        self.enter_scope(block.stmts.iter().flat_map(declared_names));
    }

    pub fn enter_catch(&mut self, clause: &CatchClause) {
        self.enter_scope(clause.param.iter().flat_map(extract_binding_names));
    }

    /// Whether `name` is declared in any scope below the module.
    pub fn is_local(&self, name: &str) -> bool {
        self.stack.iter().rev().any(|scope| scope.contains(name))
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

fn declared_names(stmt: &Stmt) -> Vec<String> {
    match stmt {
        Stmt::Decl(Decl::Var(var)) => var
            .decls
            .iter()
            .flat_map(|decl| extract_binding_names(&decl.name))
            .collect(),
        Stmt::Decl(Decl::Fn(f)) => vec![f.ident.sym.to_string()],
        Stmt::Decl(Decl::Class(c)) => vec![c.ident.sym.to_string()],
        _ => vec![],
    }
}
