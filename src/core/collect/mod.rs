//! Name resolution for one file.
//!
//! - `symbols`: module-scope bindings and tagged-template declarators
//! - `scopes`: nested scopes used to detect shadowing while visiting
//! - `helpers`: pure AST helpers shared by both

pub mod helpers;
pub mod scopes;
pub mod symbols;

pub use scopes::Scopes;
pub use symbols::{Binding, ImportKind, MAX_ALIAS_HOPS, SymbolTable};
