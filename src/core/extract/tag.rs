//! Recognizing `graphql` tags and turning their templates into fragments.

use swc_ecma_ast::{Expr, MemberProp, TaggedTpl};

use crate::core::collect::Scopes;
use crate::core::collect::helpers::unwrap_ts_expr;
use crate::core::data::{LocationKey, Position, QueryFragment, QueryType, SourceRange};
use crate::core::error::ExtractError;
use crate::core::extract::FileContext;
use crate::core::parsers::graphql::{
    self, Document, document_start, first_definition_name, locate_in_template, name_definitions,
};
use crate::utils::generate_query_name;

pub const GRAPHQL_TAG: &str = "graphql";

/// Where a tagged template was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Origin {
    StaticQuery,
    Hook,
    Page,
    Config(ConfigExport),
}

/// The `config` export a template is nested in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ConfigExport {
    pub name: String,
    pub is_async: bool,
    pub start: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    /// The tag exported by the framework package.
    Package,
    /// A `graphql` name bound to something else in the file.
    Bound,
    /// An undeclared `graphql` name.
    Global,
}

/// Classify the tag expression of a tagged template.
fn tag_kind(ctx: &FileContext, scopes: &Scopes, tag: &Expr) -> Option<TagKind> {
    let package = ctx.options.framework_package.as_str();
    match unwrap_ts_expr(tag) {
        Expr::Ident(ident) => {
            let name = ident.sym.as_str();
            let is_graphql = name == GRAPHQL_TAG;
            if scopes.is_local(name) {
                return is_graphql.then_some(TagKind::Bound);
            }
            match ctx.symbols.get(name) {
                Some(binding) if binding.is_package_export(package, GRAPHQL_TAG) => {
                    Some(TagKind::Package)
                }
                Some(_) => is_graphql.then_some(TagKind::Bound),
                None => is_graphql.then_some(TagKind::Global),
            }
        }
        Expr::Member(member) => {
            let (Expr::Ident(object), MemberProp::Ident(prop)) = (&*member.obj, &member.prop) else {
                return None;
            };
            let is_package_object = !scopes.is_local(object.sym.as_str())
                && ctx
                    .symbols
                    .get(object.sym.as_str())
                    .is_some_and(|binding| binding.is_package_object(package));
            (is_package_object && prop.sym.as_str() == GRAPHQL_TAG).then_some(TagKind::Package)
        }
        _ => None,
    }
}

/// A recognized tag with its parsed document.
struct GraphQLTag {
    document: Document,
    text: String,
    hash: u32,
    template: SourceRange,
}

/// Parse the template of a recognized tag.
///
/// Returns `Ok(None)` when the tag is not a query tag at all.
fn get_graphql_tag(
    ctx: &FileContext,
    scopes: &Scopes,
    tagged: &TaggedTpl,
) -> Result<Option<GraphQLTag>, ExtractError> {
    let Some(kind) = tag_kind(ctx, scopes, &tagged.tag) else {
        return Ok(None);
    };
    if kind == TagKind::Global {
        return Err(ExtractError::DeprecatedAmbientTag {
            path: ctx.file_path.to_string(),
            package: ctx.options.framework_package.clone(),
        });
    }

    let quasis = &tagged.tpl.quasis;
    let [quasi] = quasis.as_slice() else {
        let (Some(first), Some(last)) = (quasis.first(), quasis.last()) else {
            return Ok(None);
        };
        return Err(ExtractError::InterpolationNotAllowed {
            start: ctx.parsed.position(first.span.hi),
            end: ctx.parsed.position(last.span.lo),
        });
    };

    let text = quasi.raw.to_string();
    let template = ctx.parsed.range(quasi.span);
    if graphql::normalize(&text).is_empty() {
        return Err(ExtractError::EmptyFragment {
            template: Some(template),
        });
    }

    let document = graphql::parse_document(&text).map_err(|err| {
        let location = err.line.zip(err.column).map(|(line, column)| {
            let offset = template.start.offset + locate_in_template(&text, line, column);
            ctx.parsed.position_at_offset(offset)
        });
        ExtractError::FragmentSyntax {
            message: err.message,
            template,
            location,
        }
    })?;

    Ok(Some(GraphQLTag {
        document,
        hash: graphql::document_hash(&text),
        text,
        template,
    }))
}

/// Turn a tagged template into a fragment, or nothing if it is not a query.
pub(crate) fn extract_fragment(
    ctx: &FileContext,
    scopes: &Scopes,
    tagged: &TaggedTpl,
    origin: &Origin,
) -> Result<Option<(LocationKey, QueryFragment)>, ExtractError> {
    let Some(tag) = get_graphql_tag(ctx, scopes, tagged)? else {
        return Ok(None);
    };

    let query_type = match origin {
        Origin::StaticQuery | Origin::Hook => QueryType::Static,
        Origin::Page => QueryType::Page,
        Origin::Config(export) => {
            if !export.is_async {
                return Err(ExtractError::ExportNotAsync {
                    export_name: export.name.clone(),
                    export_start: export.start,
                });
            }
            QueryType::Config
        }
    };

    let key = LocationKey {
        template_start: ctx.parsed.offset(tagged.span.lo),
        document_start: document_start(&tag.text, &tag.document),
    };

    let generated = generate_query_name(query_type, ctx.file_path, tag.hash);
    let mut document = tag.document;
    let is_auto_named = name_definitions(&mut document, &generated);
    let name = first_definition_name(&document)
        .map(str::to_string)
        .unwrap_or(generated);

    let fragment = QueryFragment {
        file_path: ctx.file_path.to_string(),
        name,
        document,
        text: tag.text,
        hash: tag.hash,
        template_loc: tag.template,
        is_static_query: matches!(origin, Origin::StaticQuery | Origin::Hook),
        is_hook: matches!(origin, Origin::Hook),
        is_config_query: matches!(origin, Origin::Config(_)),
        is_auto_named,
    };
    Ok(Some((key, fragment)))
}
