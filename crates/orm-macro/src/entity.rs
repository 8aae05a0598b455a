use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::ext::IdentExt;
use syn::{Attribute, Data, DeriveInput, Error, Fields, Generics, Ident, LitStr, Result, Type};

pub struct Entity {
    pub ident: Ident,
    pub generics: Generics,
    pub table: Option<LitStr>,
    pub fields: Vec<Field>,
}

pub struct Field {
    pub name: String,
    pub type_name: String,
    pub primary_key: bool,
}

impl Entity {
    pub fn from_input(input: &DeriveInput) -> Result<Self> {
        let Data::Struct(data) = &input.data else {
            return Err(Error::new_spanned(&input.ident, "`Entity` can only be derived for structs"));
        };
        let Fields::Named(named) = &data.fields else {
            return Err(Error::new_spanned(
                &input.ident,
                "`Entity` requires a struct with named fields",
            ));
        };

        let table = struct_table(&input.attrs)?;

        let mut fields = Vec::with_capacity(named.named.len());
        for field in &named.named {
            let Some(ident) = &field.ident else {
                return Err(Error::new_spanned(field, "expected a named field"));
            };
            fields.push(Field {
                name: ident.unraw().to_string(),
                type_name: type_name(&field.ty),
                primary_key: is_primary_key(&field.attrs)?,
            });
        }

        Ok(Self {
            ident: input.ident.clone(),
            generics: input.generics.clone(),
            table,
            fields,
        })
    }
}

fn struct_table(attrs: &[Attribute]) -> Result<Option<LitStr>> {
    let mut table = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("crud")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                if table.is_some() {
                    return Err(meta.error("cannot specify second `table`"));
                }
                table = Some(meta.value()?.parse::<LitStr>()?);
                Ok(())
            } else {
                Err(meta.error("unsupported `crud` struct attribute; expected `table = \"...\"`"))
            }
        })?;
    }
    Ok(table)
}

fn is_primary_key(attrs: &[Attribute]) -> Result<bool> {
    let mut primary_key = false;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("crud")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("primary_key") {
                primary_key = true;
                Ok(())
            } else {
                Err(meta.error("unsupported `crud` field attribute; expected `primary_key`"))
            }
        })?;
    }
    Ok(primary_key)
}

// Render a type as written, dropping the spaces `to_string` puts between tokens.
fn type_name(ty: &Type) -> String {
    let raw = ty.to_token_stream().to_string();
    let chars: Vec<char> = raw.chars().collect();
    let word = |ch: &char| ch.is_alphanumeric() || *ch == '_';

    let mut name = String::with_capacity(raw.len());
    for (i, ch) in chars.iter().enumerate() {
        if *ch == ' ' {
            let between_words =
                i > 0 && chars.get(i + 1).is_some_and(word) && chars.get(i - 1).is_some_and(word);
            if between_words {
                name.push(' ');
            }
            continue;
        }
        name.push(*ch);
    }
    name
}

pub fn expand(entity: &Entity) -> TokenStream {
    let ident = &entity.ident;
    let name = ident.unraw().to_string();
    let (impl_generics, ty_generics, where_clause) = entity.generics.split_for_impl();

    let table = entity.table.as_ref().map_or_else(
        || quote! { ::core::option::Option::None },
        |table| quote! { ::core::option::Option::Some(#table) },
    );

    let fields = entity.fields.iter().map(|field| {
        let name = &field.name;
        let type_name = &field.type_name;
        if field.primary_key {
            quote! { ::kono_orm::FieldDef::primary_key(#name, #type_name) }
        } else {
            quote! { ::kono_orm::FieldDef::column(#name, #type_name) }
        }
    });

    quote! {
        impl #impl_generics ::kono_orm::Entity for #ident #ty_generics #where_clause {
            const NAME: &'static str = #name;
            const TABLE: ::core::option::Option<&'static str> = #table;

            fn fields() -> &'static [::kono_orm::FieldDef] {
                const FIELDS: &[::kono_orm::FieldDef] = &[#(#fields),*];
                FIELDS
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use quote::quote;

    use super::*;

    fn parse(input: TokenStream) -> Result<Entity> {
        let input: DeriveInput = syn::parse2(input).expect("should parse");
        Entity::from_input(&input)
    }

    #[test]
    fn parse_fields() {
        let entity = parse(quote! {
            #[crud(table = "users")]
            pub struct UserInfo {
                #[crud(primary_key)]
                pub id: i64,
                pub user_name: Option<String>,
                pub created_at: chrono::DateTime<chrono::Utc>,
                pub r#type: String,
            }
        })
        .expect("should derive");

        assert_eq!(entity.ident, "UserInfo");
        assert_eq!(entity.table.expect("should have table").value(), "users");

        let names: Vec<_> = entity.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["id", "user_name", "created_at", "type"]);

        let keys: Vec<_> = entity.fields.iter().map(|f| f.primary_key).collect();
        assert_eq!(keys, [true, false, false, false]);

        assert_eq!(entity.fields[1].type_name, "Option<String>");
        assert_eq!(entity.fields[2].type_name, "chrono::DateTime<chrono::Utc>");
    }

    #[test]
    fn type_names() {
        let ty: Type = syn::parse2(quote!(&'static str)).expect("should parse");
        assert_eq!(type_name(&ty), "&'static str");

        let ty: Type = syn::parse2(quote!(Vec<(i32, u8)>)).expect("should parse");
        assert_eq!(type_name(&ty), "Vec<(i32,u8)>");
    }

    #[test]
    fn rejects_enums() {
        let Err(err) = parse(quote! { enum Kind { A, B } }) else {
            panic!("enums should be rejected");
        };
        assert!(err.to_string().contains("only be derived for structs"));
    }

    #[test]
    fn rejects_tuple_structs() {
        let Err(err) = parse(quote! { struct Pair(i64, i64); }) else {
            panic!("tuple structs should be rejected");
        };
        assert!(err.to_string().contains("named fields"));
    }

    #[test]
    fn rejects_unknown_attributes() {
        let Err(err) = parse(quote! {
            struct Row {
                #[crud(skip)]
                id: i64,
            }
        }) else {
            panic!("unknown attributes should be rejected");
        };
        assert!(err.to_string().contains("expected `primary_key`"));
    }

    #[test]
    fn expands_field_defs() {
        let entity = parse(quote! {
            struct Row {
                #[crud(primary_key)]
                id: i64,
                name: String,
            }
        })
        .expect("should derive");

        let tokens = expand(&entity).to_string();
        assert!(tokens.contains("FieldDef :: primary_key (\"id\" , \"i64\")"));
        assert!(tokens.contains("FieldDef :: column (\"name\" , \"String\")"));
        assert!(tokens.contains("const NAME : & 'static str = \"Row\""));
    }
}
