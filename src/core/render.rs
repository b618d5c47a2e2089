use crate::domain::model::{DocumentKind, OutputLayout, Revision};
use crate::utils::error::Result;
use std::fs;

/// Replaces the first occurrence of `token` with `revision`, leaving
/// everything else byte-for-byte as it was. Returns the new content and
/// whether a substitution happened.
///
/// Only one occurrence is ever replaced, even when the first matching line
/// holds the token more than once. The Python script this workflow replaced
/// rewrote every occurrence on that line; the single replacement is
/// intentional.
pub fn stamp_revision(content: &[u8], token: &str, revision: &str) -> (Vec<u8>, bool) {
    let token = token.as_bytes();
    if token.is_empty() {
        return (content.to_vec(), false);
    }

    match content.windows(token.len()).position(|w| w == token) {
        Some(at) => {
            let mut out = Vec::with_capacity(content.len() + revision.len());
            out.extend_from_slice(&content[..at]);
            out.extend_from_slice(revision.as_bytes());
            out.extend_from_slice(&content[at + token.len()..]);
            (out, true)
        }
        None => (content.to_vec(), false),
    }
}

/// Copies the source document of `kind` into the output directory, stamping
/// the revision over the placeholder token.
pub fn render_document(
    kind: DocumentKind,
    revision: &Revision,
    layout: &OutputLayout,
    token: &str,
) -> Result<bool> {
    let source = layout.source_document(kind);
    let target = layout.staged_document(kind);

    let content = fs::read(&source)?;
    let (rendered, stamped) = stamp_revision(&content, token, revision.as_str());
    fs::write(&target, rendered)?;

    if stamped {
        tracing::debug!("Stamped {} into {}", revision, target.display());
    } else {
        tracing::warn!(
            "No '{}' placeholder in {}, copied unchanged",
            token,
            source.display()
        );
    }

    Ok(stamped)
}
