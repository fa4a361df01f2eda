//! Listing slug derivation.

use crate::models::{PropertyType, TransactionType};

/// Characters dropped outright rather than turned into separators.
const STRIPPED_CHARS: &[char] = &['*', '+', '~', '.', '(', ')', '\'', '"', '!', ':', '@'];

/// Length of the random suffix that keeps otherwise identical listings apart.
pub const DISAMBIGUATOR_LEN: usize = 6;

/// Build the public slug for a new listing.
///
/// `{type}-for-{action}-address-{address}-price-{price}-{random}`, normalized by [`slugify`].
pub fn listing_slug(
    property_type: PropertyType,
    transaction_type: TransactionType,
    address: &str,
    price: &str,
) -> String {
    slugify(&format!(
        "{}-for-{}-address-{}-price-{}-{}",
        property_type,
        transaction_type,
        address,
        price,
        random_token(DISAMBIGUATOR_LEN)
    ))
}

/// Lowercase, URL-safe token: whitespace and dashes collapse into single `-`,
/// everything outside `[a-z0-9_]` is removed.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    for ch in input.chars() {
        if ch.is_whitespace() || ch == '-' {
            if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        } else if STRIPPED_CHARS.contains(&ch) {
            continue;
        } else if ch.is_ascii_alphanumeric() || ch == '_' {
            slug.push(ch.to_ascii_lowercase());
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

fn random_token(len: usize) -> String {
    use rand::distr::Alphanumeric;
    use rand::Rng;

    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
