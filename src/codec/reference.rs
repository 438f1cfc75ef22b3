use uuid::Uuid;

const REFERENCE_LEN: usize = 32;

/// Renders a transaction id as the gateway's 32 hex digit reference.
pub fn to_reference(id: Uuid) -> String {
    id.simple().to_string()
}

/// Reconstructs a transaction id from a gateway reference.
///
/// Returns `None` for anything that is not exactly 32 hex digits; an
/// unrecognized reference is not an error.
pub fn from_reference(reference: &str) -> Option<Uuid> {
    let r = reference.trim();
    if r.len() != REFERENCE_LEN || !r.is_ascii() {
        return None;
    }
    let hyphenated = format!(
        "{}-{}-{}-{}-{}",
        &r[0..8],
        &r[8..12],
        &r[12..16],
        &r[16..20],
        &r[20..]
    );
    Uuid::try_parse(&hyphenated).ok()
}
