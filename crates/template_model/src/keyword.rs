//! Keyword-valued enums (CSS keywords, input types, alignments)
//!
//! Keywords serialize as their lowercase/kebab-case string. Deserialization is
//! total: an unrecognised or non-string value falls back to the enum's default
//! and logs a warning, so a stale template never fails to load over a keyword.

/// A closed set of string keywords with a default member.
pub trait Keyword: Sized + Copy + PartialEq + Default + 'static {
    /// Human-readable name of the keyword family, used in diagnostics
    const KIND: &'static str;

    /// Every keyword paired with its variant
    const VARIANTS: &'static [(&'static str, Self)];

    /// Get the wire string for this keyword
    fn as_str(&self) -> &'static str {
        Self::VARIANTS
            .iter()
            .find(|(_, variant)| variant == self)
            .map_or("", |(keyword, _)| *keyword)
    }

    /// Look up a keyword by its wire string
    fn from_keyword(s: &str) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .find(|(keyword, _)| *keyword == s)
            .map(|(_, variant)| *variant)
    }
}

/// Coerce an arbitrary JSON value into a keyword, defaulting on garbage
pub fn keyword_from_value<K: Keyword>(value: &serde_json::Value) -> K {
    match value.as_str().and_then(K::from_keyword) {
        Some(keyword) => keyword,
        None => {
            tracing::warn!(kind = K::KIND, value = %value, "Unrecognised keyword, using default");
            K::default()
        }
    }
}

/// Implements `Display`, `Serialize` and lenient `Deserialize` for a [`Keyword`] enum.
#[macro_export]
macro_rules! keyword_serde {
    ($ty:ty) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::Keyword::as_str(self))
            }
        }

        impl serde::Serialize for $ty {
            fn serialize<S: serde::Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str($crate::Keyword::as_str(self))
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(
                deserializer: D,
            ) -> std::result::Result<Self, D::Error> {
                let raw = <serde_json::Value as serde::Deserialize>::deserialize(deserializer)?;
                Ok($crate::keyword_from_value(&raw))
            }
        }
    };
}
