//! Parsing of `#[callable(...)]` marker arguments.

use syn::parse::{Parse, ParseStream};
use syn::{Attribute, Ident, LitBool, LitStr, Meta, Path, Token};

/// Arguments of one `#[callable(...)]` attribute.
pub struct MarkerArgs {
    pub description: LitStr,
    pub read_only: bool,
    pub name: Option<LitStr>,
}

impl MarkerArgs {
    pub fn from_attribute(attr: &Attribute) -> syn::Result<Self> {
        if let Meta::Path(path) = &attr.meta {
            return Err(syn::Error::new_spanned(
                path,
                "#[callable] requires a description, e.g. #[callable(\"Reimport a user\")]",
            ));
        }
        attr.parse_args()
    }
}

impl Parse for MarkerArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let description: LitStr = input.parse()?;
        let mut read_only = false;
        let mut name = None;

        while !input.is_empty() {
            input.parse::<Token![,]>()?;
            if input.is_empty() {
                break;
            }

            if input.peek(LitBool) {
                read_only = input.parse::<LitBool>()?.value;
                continue;
            }

            let key: Ident = input.parse()?;
            if key == "read_only" {
                read_only = if input.peek(Token![=]) {
                    input.parse::<Token![=]>()?;
                    input.parse::<LitBool>()?.value
                } else {
                    true
                };
            } else if key == "name" {
                input.parse::<Token![=]>()?;
                let value: LitStr = input.parse()?;
                if value.value().trim().is_empty() {
                    return Err(syn::Error::new(value.span(), "callable name cannot be empty"));
                }
                name = Some(value);
            } else {
                return Err(syn::Error::new(
                    key.span(),
                    "unsupported callable option; expected `read_only` or `name`",
                ));
            }
        }

        Ok(Self {
            description,
            read_only,
            name,
        })
    }
}

/// Removes every `#[callable]` attribute from `attrs`, returning them.
pub fn take_markers(attrs: &mut Vec<Attribute>) -> Vec<Attribute> {
    let (markers, rest) = std::mem::take(attrs)
        .into_iter()
        .partition(|attr| is_marker(attr.path()));
    *attrs = rest;
    markers
}

/// Matches `callable` as well as qualified paths such as
/// `callable_catalog::callable`.
fn is_marker(path: &Path) -> bool {
    path.segments
        .last()
        .is_some_and(|segment| segment.ident == "callable")
}

#[cfg(test)]
mod tests {
    use super::*;

    use syn::parse_quote;

    fn parse(attr: Attribute) -> syn::Result<MarkerArgs> {
        MarkerArgs::from_attribute(&attr)
    }

    #[test]
    fn description_only() {
        let args = parse(parse_quote!(#[callable("Reimport a user")])).unwrap();
        assert_eq!(args.description.value(), "Reimport a user");
        assert!(!args.read_only);
        assert!(args.name.is_none());
    }

    #[test]
    fn read_only_forms() {
        assert!(parse(parse_quote!(#[callable("a", true)])).unwrap().read_only);
        assert!(parse(parse_quote!(#[callable("a", read_only)])).unwrap().read_only);
        assert!(!parse(parse_quote!(#[callable("a", read_only = false)])).unwrap().read_only);
    }

    #[test]
    fn name_override() {
        let args = parse(parse_quote!(#[callable("a", name = "GetUser", read_only)])).unwrap();
        assert_eq!(args.name.unwrap().value(), "GetUser");
        assert!(args.read_only);
    }

    #[test]
    fn rejects_missing_description_and_unknown_options() {
        assert!(parse(parse_quote!(#[callable])).is_err());
        assert!(parse(parse_quote!(#[callable(read_only)])).is_err());
        assert!(parse(parse_quote!(#[callable("a", hidden)])).is_err());
        assert!(parse(parse_quote!(#[callable("a", name = "")])).is_err());
    }

    #[test]
    fn take_markers_keeps_other_attributes() {
        let mut attrs: Vec<Attribute> = vec![
            parse_quote!(#[doc = "docs"]),
            parse_quote!(#[callable("a")]),
            parse_quote!(#[inline]),
        ];

        let markers = take_markers(&mut attrs);
        assert_eq!(markers.len(), 1);
        assert_eq!(attrs.len(), 2);
    }

    #[test]
    fn take_markers_accepts_qualified_paths() {
        let mut attrs: Vec<Attribute> = vec![
            parse_quote!(#[callable_catalog::callable("a", read_only)]),
            parse_quote!(#[::callable_catalog::callable("b")]),
            parse_quote!(#[callables]),
        ];

        let markers = take_markers(&mut attrs);
        assert_eq!(markers.len(), 2);
        assert!(parse(markers[0].clone()).unwrap().read_only);
        assert_eq!(attrs.len(), 1);
    }
}
