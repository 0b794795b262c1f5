//! `<StaticQuery query={...}>` elements.

use swc_ecma_ast::{
    Ident, JSXAttrName, JSXAttrOrSpread, JSXAttrValue, JSXElement, JSXElementName, JSXExpr,
    TaggedTpl,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::core::extract::tag::{GRAPHQL_TAG, Origin};
use crate::core::extract::visitor::PassVisitor;

const STATIC_QUERY_ELEMENT: &str = "StaticQuery";
const STATIC_QUERY_CONSUMER: &str = "<StaticQuery>";
const QUERY_ATTR: &str = "query";

/// Something in a `query` attribute that may hold a query.
enum QueryProp {
    Inline(TaggedTpl),
    Variable(String),
}

/// Collects, in source order, the tagged templates and identifiers of a
/// `query` attribute value. Tagged templates are not descended into.
#[derive(Default)]
struct QueryPropCollector {
    found: Vec<QueryProp>,
}

impl Visit for QueryPropCollector {
    fn visit_tagged_tpl(&mut self, node: &TaggedTpl) {
        self.found.push(QueryProp::Inline(node.clone()));
    }

    fn visit_ident(&mut self, node: &Ident) {
        if node.sym.as_str() != GRAPHQL_TAG {
            self.found.push(QueryProp::Variable(node.sym.to_string()));
        }
    }
}

impl PassVisitor<'_, '_> {
    pub(super) fn static_query_element(&mut self, element: &JSXElement) {
        let JSXElementName::Ident(name) = &element.opening.name else {
            return;
        };
        if name.sym.as_str() != STATIC_QUERY_ELEMENT {
            return;
        }

        let mut collector = QueryPropCollector::default();
        for attr in &element.opening.attrs {
            let JSXAttrOrSpread::JSXAttr(attr) = attr else {
                continue;
            };
            let JSXAttrName::Ident(attr_name) = &attr.name else {
                continue;
            };
            if attr_name.sym.as_str() != QUERY_ATTR {
                continue;
            }
            if let Some(JSXAttrValue::JSXExprContainer(container)) = &attr.value
                && let JSXExpr::Expr(expr) = &container.expr
            {
                expr.visit_with(&mut collector);
            }
        }

        for prop in collector.found {
            if self.failed() {
                return;
            }
            match prop {
                QueryProp::Inline(tagged) => {
                    self.extract_here(&tagged, &Origin::StaticQuery);
                }
                QueryProp::Variable(variable) => {
                    let symbols = self.ctx.symbols;
                    let declared = symbols.tagged_declarators(&variable);
                    if declared.is_empty() {
                        self.warn_unresolved(&variable, STATIC_QUERY_CONSUMER);
                        continue;
                    }
                    for tagged in declared {
                        self.extract_declared(tagged, &Origin::StaticQuery);
                    }
                }
            }
        }
    }
}
