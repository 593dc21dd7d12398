//! Pairing keys
//!
//! `bind` pairs cause and result types that share a key. The key comes from a
//! [`KeyExtractor`]; the default, [`LeadingWord`], uses the naming convention
//! `FooCause` / `FooResult` and yields `"Foo"` for both. Any closure
//! `Fn(&TypeDescriptor) -> String` can be used instead when names are not a
//! reliable pairing source.

use deduce_domain::ports::TypeDescriptor;

/// Derives the pairing key of a discovered type
pub trait KeyExtractor: Send + Sync {
    /// Key shared by a cause type and the result type it pairs with
    fn key(&self, descriptor: &TypeDescriptor) -> String;
}

impl<F> KeyExtractor for F
where
    F: Fn(&TypeDescriptor) -> String + Send + Sync,
{
    fn key(&self, descriptor: &TypeDescriptor) -> String {
        self(descriptor)
    }
}

/// Leading capitalised word of the short type name
///
/// | Type | Key |
/// |------|-----|
/// | `app::events::FooCause` | `Foo` |
/// | `BarResult` | `Bar` |
/// | `quux_cause` | `quux` |
/// | `Single` | `Single` |
#[derive(Debug, Clone, Copy, Default)]
pub struct LeadingWord;

impl KeyExtractor for LeadingWord {
    fn key(&self, descriptor: &TypeDescriptor) -> String {
        leading_word(descriptor.key().short_name()).to_string()
    }
}

/// First word of a `CamelCase` or `snake_case` identifier
pub fn leading_word(name: &str) -> &str {
    let end = name
        .char_indices()
        .skip(1)
        .find(|(_, c)| c.is_uppercase() || *c == '_')
        .map_or(name.len(), |(i, _)| i);
    &name[..end]
}
