mod entity;
mod types;

use entity::derive_entity;
use proc_macro::TokenStream;
use proc_macro_error2::proc_macro_error;

/// Derive macro implementing the entity mapping for an annotated struct.
///
/// `#[persimmon(table = "...")]` on the struct overrides the table name,
/// `#[persimmon(id)]` marks the primary key field, and
/// `#[persimmon(column = "...")]` overrides a column name.
#[proc_macro_error]
#[proc_macro_derive(Entity, attributes(persimmon))]
pub fn entity(input: TokenStream) -> TokenStream {
    derive_entity(input.into()).into()
}
