//! Procedural macros for kono-orm entities.

#![forbid(unsafe_code)]

mod entity;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Implements `kono_orm::Entity` for a struct with named fields.
///
/// Tag the primary key with `#[crud(primary_key)]`. The table name defaults
/// to the snake-cased struct name and can be overridden on the struct.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Entity)]
/// #[crud(table = "users")]
/// pub struct UserInfo {
///     #[crud(primary_key)]
///     pub id: i64,
///     pub user_name: String,
/// }
/// ```
#[proc_macro_derive(Entity, attributes(crud))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    entity::Entity::from_input(&input)
        .map_or_else(|err| err.to_compile_error(), |entity| entity::expand(&entity))
        .into()
}
