use convert_case::{Case, Casing};
use darling::{FromDeriveInput, FromField, ast::Data, util::Flag};
use proc_macro_error2::{abort, emit_error};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Ident, Type, parse2};

use crate::types::{ColumnType, column_type};

#[derive(FromField, Clone)]
#[darling(attributes(persimmon))]
struct EntityField {
    ident: Option<Ident>,
    ty: Type,
    id: Flag,
    column: Option<String>,
}

#[derive(FromDeriveInput)]
#[darling(attributes(persimmon))]
struct EntityTarget {
    ident: Ident,
    table: Option<String>,
    data: Data<(), EntityField>,
}

struct TargetColumn {
    field_ident: Ident,
    db_name: String,
    ty: Type,
    sql_type: TokenStream,
    nullable: bool,
    primary_key: bool,
}

pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input: DeriveInput = parse2(input).expect("Failed to parse derive input");

    let target = match EntityTarget::from_derive_input(&input) {
        Ok(r) => r,
        Err(e) => return e.write_errors(),
    };

    let Some(struct_data) = target.data.take_struct() else {
        abort! {
            input, "Target is not a struct.";
            note = "This macro must be run on a struct.";
        };
    };

    let columns = struct_data
        .fields
        .iter()
        .map(|e| {
            let Some(ident) = &e.ident else {
                abort! {
                    e.ident, "Field has no ident.";
                    note = "This macro cannot be run on tuple structs.";
                };
            };

            let ColumnType { sql_type, nullable } = column_type(&e.ty);

            if e.id.is_present() && nullable {
                abort! {
                    ident, "Primary key columns cannot be nullable.";
                    note = "Use a plain type instead of `Option` for the id field.";
                };
            }

            TargetColumn {
                field_ident: ident.clone(),
                db_name: e.column.as_ref().cloned().unwrap_or(ident.to_string()),
                ty: e.ty.clone(),
                sql_type,
                nullable,
                primary_key: e.id.is_present(),
            }
        })
        .collect::<Vec<_>>();

    // Make sure all columns have unique names.
    if let Some(duplicate) = columns
        .iter()
        .find(|e| columns.iter().filter(|o| e.db_name.eq(&o.db_name)).count() > 1)
    {
        columns.iter().for_each(|e| {
            if columns.iter().filter(|o| e.db_name.eq(&o.db_name)).count() > 1 {
                emit_error! {
                    e.field_ident.span(), "Clashing occurrence of \"{}\" here.", e.db_name
                };
            }
        });

        abort! {
            duplicate.field_ident.span(), "Duplicate column definition \"{}\"", duplicate.db_name;
            note = "Columns must have unique names, if necessary use the #[persimmon(column = \"my_column_name\")] attribute to specify a unique name.";
        }
    }

    let id_count = columns.iter().filter(|e| e.primary_key).count();

    if id_count == 0 {
        abort! {
            input, "Missing primary key.";
            note = "Mark exactly one field with #[persimmon(id)].";
        }
    }

    if id_count > 1 {
        columns
            .iter()
            .filter(|e| e.primary_key)
            .for_each(|e| {
                emit_error! {
                    e.field_ident.span(), "Conflicting primary key declaration."
                };
            });

        abort! {
            input, "More than one primary key.";
            note = "Mark exactly one field with #[persimmon(id)].";
        }
    }

    // Checked above.
    #[allow(clippy::unwrap_used)]
    let id_column = columns.iter().find(|e| e.primary_key).unwrap();

    let struct_ident = &target.ident;
    let table_name = target
        .table
        .unwrap_or(target.ident.to_string().to_case(Case::Snake));

    let id_ty = &id_column.ty;
    let id_field = &id_column.field_ident;
    let id_db_name = &id_column.db_name;

    let column_defs = columns.iter().map(|e| {
        let db_name = &e.db_name;
        let sql_type = &e.sql_type;
        let nullable = e.nullable;
        let primary_key = e.primary_key;

        quote! {
            ::persimmon::entity::column::ColumnDef {
                name: #db_name,
                sql_type: #sql_type,
                nullable: #nullable,
                primary_key: #primary_key,
            }
        }
    });

    let row_assignments = columns.iter().map(|e| {
        let field_ident = &e.field_ident;
        let db_name = &e.db_name;

        quote! {
            #field_ident: row.try_get(#db_name)?,
        }
    });

    let insert_binds = columns.iter().map(|e| {
        let field_ident = &e.field_ident;

        quote! {
            .bind(::std::clone::Clone::clone(&self.#field_ident))
        }
    });

    let update_binds = columns.iter().filter(|e| !e.primary_key).map(|e| {
        let field_ident = &e.field_ident;

        quote! {
            .bind(::std::clone::Clone::clone(&self.#field_ident))
        }
    });

    quote! {
        impl ::persimmon::entity::Entity for #struct_ident {
            type Id = #id_ty;

            const TABLE_NAME: &'static str = #table_name;

            const ID_COLUMN: &'static str = #id_db_name;

            const COLUMNS: &'static [::persimmon::entity::column::ColumnDef] = &[
                #(#column_defs),*
            ];

            fn id(&self) -> Self::Id {
                ::std::clone::Clone::clone(&self.#id_field)
            }

            fn from_row(
                row: &::persimmon::sqlx::any::AnyRow,
            ) -> ::std::result::Result<Self, ::persimmon::sqlx::Error> {
                use ::persimmon::sqlx::Row as _;

                ::std::result::Result::Ok(Self {
                    #(#row_assignments)*
                })
            }

            fn bind_insert<'q>(
                &self,
                query: ::persimmon::entity::AnyQuery<'q>,
            ) -> ::persimmon::entity::AnyQuery<'q> {
                query #(#insert_binds)*
            }

            fn bind_update<'q>(
                &self,
                query: ::persimmon::entity::AnyQuery<'q>,
            ) -> ::persimmon::entity::AnyQuery<'q> {
                query #(#update_binds)* .bind(::std::clone::Clone::clone(&self.#id_field))
            }
        }
    }
}
