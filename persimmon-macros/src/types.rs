use proc_macro2::TokenStream;
use proc_macro_error2::abort;
use quote::quote;
use syn::{GenericArgument, PathArguments, Type};

/// The SQL shape of one struct field: the `SqlType` variant to record in the
/// column table, and whether the column is nullable.
pub struct ColumnType {
    pub sql_type: TokenStream,
    pub nullable: bool,
}

pub fn column_type(ty: &Type) -> ColumnType {
    option_inner(ty).map_or_else(
        || ColumnType {
            sql_type: scalar_sql_type(ty),
            nullable: false,
        },
        |inner| ColumnType {
            sql_type: scalar_sql_type(inner),
            nullable: true,
        },
    )
}

fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };

    let last = path.path.segments.last()?;

    if last.ident != "Option" {
        return None;
    }

    let PathArguments::AngleBracketed(args) = &last.arguments else {
        return None;
    };

    args.args.iter().find_map(|e| {
        if let GenericArgument::Type(inner) = e {
            Some(inner)
        } else {
            None
        }
    })
}

fn scalar_sql_type(ty: &Type) -> TokenStream {
    let Type::Path(path) = ty else {
        abort! {
            ty, "Unsupported column type.";
            note = "Supported column types are i16, i32, i64, f32, f64, bool, String, and Option of those.";
        };
    };

    let Some(last) = path.path.segments.last() else {
        abort! {
            ty, "Unsupported column type.";
            note = "Supported column types are i16, i32, i64, f32, f64, bool, String, and Option of those.";
        };
    };

    match last.ident.to_string().as_str() {
        "i16" => quote! { ::persimmon::entity::column::SqlType::SmallInt },
        "i32" => quote! { ::persimmon::entity::column::SqlType::Integer },
        "i64" => quote! { ::persimmon::entity::column::SqlType::BigInt },
        "f32" => quote! { ::persimmon::entity::column::SqlType::Real },
        "f64" => quote! { ::persimmon::entity::column::SqlType::Double },
        "bool" => quote! { ::persimmon::entity::column::SqlType::Boolean },
        "String" => quote! { ::persimmon::entity::column::SqlType::Text },
        "Option" => abort! {
            ty, "Nested `Option` columns are not supported."
        },
        other => abort! {
            ty, "Unsupported column type `{}`.", other;
            note = "Supported column types are i16, i32, i64, f32, f64, bool, String, and Option of those.";
        },
    }
}
