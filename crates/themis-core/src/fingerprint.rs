use crate::model::Question;
use sha2::{Digest, Sha256};

pub fn sha256_hex(s: &str) -> String {
    let mut h = Sha256::new();
    h.update(s.as_bytes());
    hex::encode(h.finalize())
}

/// Stable identity of a question set, logged when a run starts so a
/// checkpoint reused with a different set is easy to spot.
pub fn question_set(questions: &[Question]) -> String {
    let mut h = Sha256::new();
    for q in questions {
        if let Some(id) = &q.id {
            h.update(id.as_bytes());
        }
        h.update(b"\t");
        h.update(q.text.as_bytes());
        h.update(b"\n");
    }
    hex::encode(h.finalize())
}
