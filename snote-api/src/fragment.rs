/// URL fragment addressing
///
/// A shared document is addressed by the part of its link after `#`. These
/// helpers pull that part out of whatever the user pasted (a full link, a
/// bare `#id`, or just the id) and build links for newly shared documents.

use crate::ids::validate_id;
use snote_core::{DocId, Result};

/// The fragment of `input`, without the `#`
///
/// Returns None when there is no `#` or nothing follows it.
pub fn fragment_of(input: &str) -> Option<&str> {
    let (_, fragment) = input.trim().split_once('#')?;
    let fragment = fragment.trim();
    if fragment.is_empty() {
        None
    } else {
        Some(fragment)
    }
}

/// Resolve user input to the document it addresses
///
/// `Ok(None)` means the input addresses no document at all (a link without a
/// fragment, or blank input). Input that names something that cannot be an
/// identifier is an `InvalidIdentifier` error.
pub fn parse_target(input: &str) -> Result<Option<DocId>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    if input.contains('#') {
        return match fragment_of(input) {
            Some(fragment) => validate_id(fragment).map(Some),
            None => Ok(None),
        };
    }

    // A link with no fragment opens the editor, not a document
    if input.contains('/') || input.contains(':') {
        return Ok(None);
    }

    validate_id(input).map(Some)
}

/// Link that opens `id`, built on `base` with any existing fragment dropped
pub fn share_url(base: &str, id: &DocId) -> String {
    let base = base.split('#').next().unwrap_or_default();
    format!("{}#{}", base, id)
}
