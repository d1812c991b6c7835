//! Recognizing locations that belong to injected, non-authored source.
//!
//! Preprocessing can inject implicit copybooks (predefined registers,
//! dialect helper storage). Their locations live under dedicated URI
//! prefixes and must never surface in navigation results.

/// Default prefix used for implicitly injected documents.
pub const DEFAULT_IMPLICIT_PREFIX: &str = "implicit:";

/// Whether `uri` starts with any of the implicit prefixes.
pub fn is_implicit_uri<S: AsRef<str>>(uri: &str, prefixes: &[S]) -> bool {
    prefixes
        .iter()
        .any(|prefix| !prefix.as_ref().is_empty() && uri.starts_with(prefix.as_ref()))
}
