/// Canonical form of a term or prefix: surrounding whitespace removed, lower-cased.
///
/// An empty result means the input was blank and must be treated as "nothing to do".
pub fn normalize(input: &str) -> String {
    input.trim().to_lowercase()
}
