//! GitHub-flavored heading anchors for documented items.

/// In-page anchor for an item, e.g. `function-transferaddressuint256`.
///
/// The type label keeps an event and a function with the same signature
/// apart; the signature keeps overloads apart.
pub fn item_anchor(type_label: &str, ident: &str) -> String {
    github_slug(&format!("{} {}", type_label, ident))
}

/// GitHub heading anchor slug generation.
///
/// - lowercase
/// - drop everything that isn't alphanumeric, space, or hyphen
/// - replace spaces with hyphens
pub fn github_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        if c.is_alphanumeric() || c == ' ' || c == '-' {
            slug.push(c);
        }
    }
    slug.replace(' ', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_simple() {
        assert_eq!(github_slug("hello world"), "hello-world");
    }

    #[test]
    fn slug_strips_signature_punctuation() {
        assert_eq!(github_slug("transfer(address,uint256)"), "transferaddressuint256");
        assert_eq!(github_slug("_mint(address,uint256)"), "mintaddressuint256");
    }

    #[test]
    fn slug_uppercase() {
        assert_eq!(github_slug("Ownable Upgradeable"), "ownable-upgradeable");
    }

    #[test]
    fn anchor_separates_kinds() {
        assert_eq!(
            item_anchor("Function", "transfer(address,uint256)"),
            "function-transferaddressuint256"
        );
        assert_ne!(
            item_anchor("Event", "Transfer(address)"),
            item_anchor("Function", "transfer(address)")
        );
    }
}
