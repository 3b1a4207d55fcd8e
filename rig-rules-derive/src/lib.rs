use proc_macro::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::{Attribute, DeriveInput, Error, Expr, Ident, LitStr, Result, Token, parse_macro_input};

/// Derive `rig_rules::Annotated` from a `#[rule(...)]` attribute.
///
/// ```ignore
/// #[derive(Annotated)]
/// #[rule(name = "weather", description = "if it rains then take an umbrella", priority = 1, loop)]
/// struct WeatherRule;
/// ```
///
/// Every key is optional. The name defaults to the type's identifier, the
/// other attributes to the rule defaults.
#[proc_macro_derive(Annotated, attributes(rule))]
pub fn derive_annotated(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand_annotated(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_annotated(input: &DeriveInput) -> Result<proc_macro2::TokenStream> {
    let args = match find_rule_attr(&input.attrs)? {
        Some(attr) => attr.parse_args::<RuleArgs>()?,
        None => RuleArgs::default(),
    };

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let rule_name = args
        .name
        .unwrap_or_else(|| LitStr::new(&name.to_string(), name.span()));
    let description = match args.description {
        Some(lit) => quote! { ::std::string::String::from(#lit) },
        None => quote! { ::std::string::String::from(rig_rules::DEFAULT_DESCRIPTION) },
    };
    let priority = match args.priority {
        Some(expr) => quote! { #expr },
        None => quote! { rig_rules::DEFAULT_PRIORITY },
    };
    let is_loop = args.is_loop;

    Ok(quote! {
        impl #impl_generics rig_rules::Annotated for #name #ty_generics #where_clause {
            fn metadata() -> rig_rules::RuleMetadata {
                rig_rules::RuleMetadata {
                    name: ::std::string::String::from(#rule_name),
                    description: #description,
                    priority: #priority,
                    is_loop: #is_loop,
                }
            }
        }
    })
}

fn find_rule_attr(attrs: &[Attribute]) -> Result<Option<&Attribute>> {
    let mut found = attrs.iter().filter(|attr| attr.path().is_ident("rule"));
    let first = found.next();
    if let Some(extra) = found.next() {
        return Err(Error::new_spanned(extra, "duplicate #[rule(...)] attribute"));
    }
    Ok(first)
}

#[derive(Default)]
struct RuleArgs {
    name: Option<LitStr>,
    description: Option<LitStr>,
    priority: Option<Expr>,
    is_loop: bool,
}

impl Parse for RuleArgs {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let mut args = RuleArgs::default();

        while !input.is_empty() {
            // `loop` is a keyword, so keys are read with `parse_any`.
            let key = Ident::parse_any(input)?;

            match key.to_string().as_str() {
                "name" => {
                    input.parse::<Token![=]>()?;
                    args.name = Some(input.parse()?);
                }
                "description" => {
                    input.parse::<Token![=]>()?;
                    args.description = Some(input.parse()?);
                }
                "priority" => {
                    input.parse::<Token![=]>()?;
                    args.priority = Some(input.parse()?);
                }
                "loop" => args.is_loop = true,
                other => {
                    return Err(Error::new_spanned(
                        key,
                        format!(
                            "unsupported rule attribute `{other}`; expected name, description, priority, or loop"
                        ),
                    ));
                }
            }

            if input.is_empty() {
                break;
            }
            input.parse::<Token![,]>()?;
        }

        Ok(args)
    }
}
