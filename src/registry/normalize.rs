// Link normalization — the registry's comparison key.
//
// Lower-case everything, drop trailing slashes.
// No scheme rewriting, no host canonicalization, no whitespace trimming.
// Two links collide only if they are equal after this transform.

/// Map a raw link to its normalized key, or `None` if there is nothing to claim.
pub fn normalize(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    let lowered = raw.to_lowercase();
    let key = lowered.trim_end_matches('/');
    // A link made only of slashes leaves an empty key, which can't be claimed.
    if key.is_empty() {
        return None;
    }
    Some(key.to_string())
}
