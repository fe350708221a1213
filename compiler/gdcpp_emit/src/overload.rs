//! Overload keys.
//!
//! Same-named overloads are told apart by a short digest of their ordered
//! parameter-type spellings. Only raw spellings are hashed: two overloads
//! whose parameters are different aliases of one type get different keys.

use gdcpp_scan::Param;
use sha1::{Digest, Sha1};

/// Hex characters kept from the digest.
pub const SIG_HASH_LENGTH: usize = 8;

/// SHA-1 of the spellings joined with `\n`, truncated to
/// [`SIG_HASH_LENGTH`] lowercase hex characters.
pub fn signature_hash<I, S>(spellings: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut hasher = Sha1::new();
    for (index, spelling) in spellings.into_iter().enumerate() {
        if index > 0 {
            hasher.update(b"\n");
        }
        hasher.update(spelling.as_ref().as_bytes());
    }
    let mut digest = hex::encode(hasher.finalize());
    digest.truncate(SIG_HASH_LENGTH);
    digest
}

/// Key for a parameter list; `None` for zero parameters.
pub fn overload_key(params: &[Param]) -> Option<String> {
    if params.is_empty() {
        return None;
    }
    Some(signature_hash(params.iter().map(|param| param.ty.spelling())))
}

/// `name` with the overload key appended, if there is one.
pub fn suffixed(name: &str, params: &[Param]) -> String {
    match overload_key(params) {
        Some(key) => format!("{name}_{key}"),
        None => name.to_owned(),
    }
}
