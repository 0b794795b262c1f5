//! Special named exports a component can declare.

use serde::Serialize;
use swc_ecma_ast::{Decl, ExportSpecifier, Module, ModuleDecl, ModuleExportName, ModuleItem, Pat};

pub const SERVER_DATA_EXPORT: &str = "getServerData";
pub const CONFIG_EXPORT: &str = "config";
pub const HEAD_EXPORT: &str = "Head";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlags {
    pub has_server_data_export: bool,
    pub has_config_export: bool,
    pub has_head_export: bool,
}

impl FeatureFlags {
    pub fn detect(module: &Module) -> Self {
        Self {
            has_server_data_export: find_api_export(module, SERVER_DATA_EXPORT),
            has_config_export: find_api_export(module, CONFIG_EXPORT),
            has_head_export: find_api_export(module, HEAD_EXPORT),
        }
    }
}

/// Whether the module has a named export called `api`.
///
/// Counts `export { x as api }` (with or without a source module),
/// `export function api() {}` and `export const api = ...` where `api` is the
/// first declarator.
pub fn find_api_export(module: &Module, api: &str) -> bool {
    module.body.iter().any(|item| match item {
        ModuleItem::ModuleDecl(ModuleDecl::ExportNamed(named)) => {
            named.specifiers.iter().any(|specifier| match specifier {
                ExportSpecifier::Named(named) => {
                    let exported = named.exported.as_ref().unwrap_or(&named.orig);
                    matches!(exported, ModuleExportName::Ident(ident) if ident.sym.as_str() == api)
                }
                _ => false,
            })
        }
        ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => match &export.decl {
            Decl::Fn(f) => f.ident.sym.as_str() == api,
            Decl::Var(var) => var.decls.first().is_some_and(|declarator| {
                matches!(&declarator.name, Pat::Ident(ident) if ident.id.sym.as_str() == api)
            }),
            _ => false,
        },
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use crate::core::features::*;
    use crate::core::parsers::jsx::parse_jsx_source;
    use pretty_assertions::assert_eq;

    fn detect(code: &str) -> FeatureFlags {
        let parsed = parse_jsx_source(code.to_string(), "src/pages/index.js").unwrap();
        FeatureFlags::detect(&parsed.module)
    }

    #[test]
    fn test_config_and_head_exports() {
        let flags = detect(
            r#"
            export async function config() { return () => ({ defer: true }) }
            export const Head = () => <title>Home</title>
            export default function Page() { return null }
            "#,
        );
        assert_eq!(
            flags,
            FeatureFlags {
                has_server_data_export: false,
                has_config_export: true,
                has_head_export: true,
            }
        );
    }

    #[test]
    fn test_specifier_exports_count() {
        let flags = detect(
            r#"
            async function loadData() { return { props: {} } }
            export { loadData as getServerData };
            export { Head } from "../components/head";
            "#,
        );
        assert!(flags.has_server_data_export);
        assert!(flags.has_head_export);
        assert!(!flags.has_config_export);
    }

    #[test]
    fn test_only_first_declarator_counts() {
        let flags = detect("export const a = 1, Head = () => null;");
        assert!(!flags.has_head_export);
    }

    #[test]
    fn test_no_exports() {
        assert_eq!(detect("const config = {};"), FeatureFlags::default());
    }

    #[test]
    fn test_default_export_is_ignored() {
        assert_eq!(detect("export default function Head() { return null }"), FeatureFlags::default());
    }
}
