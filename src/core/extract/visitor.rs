use swc_ecma_ast::{ArrowExpr, BlockStmt, CallExpr, CatchClause, Function, JSXElement, Module, TaggedTpl};
use swc_ecma_visit::{Visit, VisitWith};

use crate::core::collect::Scopes;
use crate::core::data::{LocationKey, QueryFragment, UnresolvedVariable};
use crate::core::error::ExtractError;
use crate::core::extract::FileContext;
use crate::core::extract::tag::{Origin, extract_fragment};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pass {
    StaticQuery,
    Hook,
    Export,
}

#[derive(Debug, Default)]
pub(crate) struct PassOutput {
    pub fragments: Vec<(LocationKey, QueryFragment)>,
    pub warnings: Vec<UnresolvedVariable>,
}

/// One traversal of a file for one pass.
///
/// Tracks nested scopes so local names shadow module bindings. The first
/// extraction error stops all further work; it is returned by [`Self::run`].
pub(crate) struct PassVisitor<'c, 'a> {
    pub(super) ctx: &'c FileContext<'a>,
    pass: Pass,
    pub(super) scopes: Scopes,
    /// Set while walking the subtree of an export; every query tag found is
    /// extracted with this origin.
    pub(super) export: Option<Origin>,
    output: PassOutput,
    error: Option<ExtractError>,
}

impl<'c, 'a> PassVisitor<'c, 'a> {
    pub fn run(ctx: &'c FileContext<'a>, pass: Pass) -> Result<PassOutput, ExtractError> {
        let mut visitor = Self {
            ctx,
            pass,
            scopes: Scopes::new(),
            export: None,
            output: PassOutput::default(),
            error: None,
        };
        match pass {
            Pass::Export => visitor.visit_exports(&ctx.parsed.module),
            Pass::StaticQuery | Pass::Hook => ctx.parsed.module.visit_with(&mut visitor),
        }
        match visitor.error {
            Some(err) => Err(err),
            None => Ok(visitor.output),
        }
    }

    pub(super) fn failed(&self) -> bool {
        self.error.is_some()
    }

    /// Extract `tagged` using the scopes at the current position.
    pub(super) fn extract_here(&mut self, tagged: &TaggedTpl, origin: &Origin) -> bool {
        let result = extract_fragment(self.ctx, &self.scopes, tagged, origin);
        self.record(result)
    }

    /// Extract a template found through a declarator elsewhere in the file.
    ///
    /// Its tag is resolved against module scope only.
    pub(super) fn extract_declared(&mut self, tagged: &TaggedTpl, origin: &Origin) -> bool {
        let result = extract_fragment(self.ctx, &Scopes::new(), tagged, origin);
        self.record(result)
    }

    /// Store the outcome of one extraction. Returns whether a fragment was
    /// produced.
    fn record(&mut self, result: Result<Option<(LocationKey, QueryFragment)>, ExtractError>) -> bool {
        match result {
            Ok(Some(found)) => {
                self.output.fragments.push(found);
                true
            }
            Ok(None) => false,
            Err(err) => {
                if self.error.is_none() {
                    self.error = Some(err);
                }
                false
            }
        }
    }

    pub(super) fn warn_unresolved(&mut self, variable: &str, consumer: &str) {
        self.output.warnings.push(UnresolvedVariable {
            variable: variable.to_string(),
            file_path: self.ctx.file_path.to_string(),
            consumer: consumer.to_string(),
        });
    }

    fn visit_exports(&mut self, module: &Module) {
        for item in &module.body {
            if self.failed() {
                return;
            }
            self.export_item(item);
        }
    }
}

impl Visit for PassVisitor<'_, '_> {
    fn visit_function(&mut self, node: &Function) {
        self.scopes.enter_function(node);
        node.visit_children_with(self);
        self.scopes.exit_scope();
    }

    fn visit_arrow_expr(&mut self, node: &ArrowExpr) {
        self.scopes.enter_arrow(node);
        node.visit_children_with(self);
        self.scopes.exit_scope();
    }

    fn visit_block_stmt(&mut self, node: &BlockStmt) {
        self.scopes.enter_block(node);
        node.visit_children_with(self);
        self.scopes.exit_scope();
    }

    fn visit_catch_clause(&mut self, node: &CatchClause) {
        self.scopes.enter_catch(node);
        node.visit_children_with(self);
        self.scopes.exit_scope();
    }

    fn visit_jsx_element(&mut self, node: &JSXElement) {
        if self.failed() {
            return;
        }
        if self.pass == Pass::StaticQuery {
            self.static_query_element(node);
        }
        node.visit_children_with(self);
    }

    fn visit_call_expr(&mut self, node: &CallExpr) {
        if self.failed() {
            return;
        }
        if self.pass == Pass::Hook {
            self.hook_call(node);
        }
        node.visit_children_with(self);
    }

    fn visit_tagged_tpl(&mut self, node: &TaggedTpl) {
        if self.failed() {
            return;
        }
        if let Some(origin) = self.export.clone()
            && self.extract_here(node, &origin)
        {
            return;
        }
        node.visit_children_with(self);
    }
}
