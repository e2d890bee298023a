/// Resolving what the editor opens with
///
/// The editor is addressed by its URL fragment: a fragment naming a stored
/// document opens that document (and counts a view), no fragment restores
/// the draft. Problems with the link or with stored JSON never abort; they
/// fall back to an empty editor with a [`Notice`] for the user.

use crate::{fragment::parse_target, DocumentStore};
use snote_core::{DocId, DocumentRecord, DraftRecord, Error, KvStore, Result};
use std::fmt;
use tracing::{info, warn};

/// What the editor shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorState {
    /// A shared document, read from its link
    Shared { id: DocId, record: DocumentRecord },
    /// The restored working copy
    Draft(DraftRecord),
    /// Nothing to show
    Empty,
}

/// Transient message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    NotFound(DocId),
    InvalidLink(String),
    Malformed(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NotFound(id) => write!(f, "Document {} not found", id),
            Notice::InvalidLink(reason) => write!(f, "Invalid document link: {}", reason),
            Notice::Malformed(key) => write!(f, "Stored data for {} is damaged and was ignored", key),
        }
    }
}

/// Outcome of opening the editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opened {
    pub state: EditorState,
    pub notice: Option<Notice>,
}

impl Opened {
    fn show(state: EditorState) -> Self {
        Self { state, notice: None }
    }

    fn empty_with(notice: Notice) -> Self {
        Self {
            state: EditorState::Empty,
            notice: Some(notice),
        }
    }
}

impl<S: KvStore> DocumentStore<S> {
    /// Open the editor for `location` (a link, `#id`, bare id, or nothing)
    ///
    /// Storage failures still propagate; link and data problems become notices.
    pub fn open(&self, location: Option<&str>) -> Result<Opened> {
        let target = match location.map(parse_target).transpose() {
            Ok(target) => target.flatten(),
            Err(Error::InvalidIdentifier(reason)) => {
                warn!("Rejected link: {}", reason);
                return Ok(Opened::empty_with(Notice::InvalidLink(reason)));
            }
            Err(e) => return Err(e),
        };

        match target {
            Some(id) => self.open_shared(id),
            None => self.open_draft(),
        }
    }

    fn open_shared(&self, id: DocId) -> Result<Opened> {
        match self.load(&id) {
            Ok(Some(record)) => {
                info!("Opened shared document {} (view {})", id, record.views);
                Ok(Opened::show(EditorState::Shared { id, record }))
            }
            Ok(None) => Ok(Opened::empty_with(Notice::NotFound(id))),
            Err(Error::Malformed { key, reason }) => {
                warn!("Malformed document at {}: {}", key, reason);
                Ok(Opened::empty_with(Notice::Malformed(key)))
            }
            Err(e) => Err(e),
        }
    }

    fn open_draft(&self) -> Result<Opened> {
        match self.load_draft() {
            Ok(Some(draft)) if !draft.is_empty() => Ok(Opened::show(EditorState::Draft(draft))),
            Ok(_) => Ok(Opened::show(EditorState::Empty)),
            Err(Error::Malformed { key, reason }) => {
                warn!("Malformed draft at {}: {}", key, reason);
                Ok(Opened::empty_with(Notice::Malformed(key)))
            }
            Err(e) => Err(e),
        }
    }

    /// Share the editor contents and discard the draft they came from
    pub fn share(&self, title: &str, content: &str) -> Result<DocId> {
        let id = self.create(title, content)?;
        self.clear_draft()?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_shared_link_counts_view() {
        let docs = DocumentStore::in_memory();
        let id = docs.create("Shared", "<p>hi</p>").unwrap();
        let link = format!("http://localhost:3000/#{}", id);

        let opened = docs.open(Some(&link)).unwrap();
        assert!(opened.notice.is_none());
        match opened.state {
            EditorState::Shared { id: opened_id, record } => {
                assert_eq!(opened_id, id);
                assert_eq!(record.title, "Shared");
                assert_eq!(record.views, 1);
            }
            other => panic!("expected shared document, got {:?}", other),
        }
    }

    #[test]
    fn test_open_unknown_fragment() {
        let docs = DocumentStore::in_memory();
        docs.save_draft("draft", "not shown").unwrap();

        let opened = docs.open(Some("#missing123")).unwrap();
        assert_eq!(opened.state, EditorState::Empty);
        assert_eq!(opened.notice, Some(Notice::NotFound(DocId::from("missing123"))));
    }

    #[test]
    fn test_open_invalid_fragment() {
        let docs = DocumentStore::in_memory();
        let opened = docs.open(Some("http://localhost:3000/#<script>")).unwrap();

        assert_eq!(opened.state, EditorState::Empty);
        assert!(matches!(opened.notice, Some(Notice::InvalidLink(_))));
    }

    #[test]
    fn test_open_malformed_document() {
        let docs = DocumentStore::in_memory();
        docs.backend().set("doc#broken", "{oops".to_string()).unwrap();

        let opened = docs.open(Some("#broken")).unwrap();
        assert_eq!(opened.state, EditorState::Empty);
        assert_eq!(opened.notice, Some(Notice::Malformed("doc#broken".to_string())));
    }

    #[test]
    fn test_open_without_fragment_restores_draft() {
        let docs = DocumentStore::in_memory();
        let draft = docs.save_draft_at("Working", "<p>copy</p>", 3).unwrap();

        assert_eq!(docs.open(None).unwrap(), Opened::show(EditorState::Draft(draft.clone())));
        assert_eq!(
            docs.open(Some("http://localhost:3000/")).unwrap().state,
            EditorState::Draft(draft)
        );
    }

    #[test]
    fn test_open_blank_draft_is_empty() {
        let docs = DocumentStore::in_memory();
        assert_eq!(docs.open(None).unwrap().state, EditorState::Empty);

        docs.save_draft("", "  ").unwrap();
        assert_eq!(docs.open(None).unwrap().state, EditorState::Empty);
    }

    #[test]
    fn test_open_malformed_draft_falls_back() {
        let docs = DocumentStore::in_memory();
        docs.backend().set("draft#current", "nope".to_string()).unwrap();

        let opened = docs.open(None).unwrap();
        assert_eq!(opened.state, EditorState::Empty);
        assert!(matches!(opened.notice, Some(Notice::Malformed(_))));
    }

    #[test]
    fn test_share_clears_draft() {
        let docs = DocumentStore::in_memory();
        docs.save_draft("T", "C").unwrap();

        let id = docs.share("T", "C").unwrap();
        assert!(docs.load_draft().unwrap().is_none());
        assert_eq!(docs.peek(&id).unwrap().unwrap().views, 0);
    }

    #[test]
    fn test_notice_messages() {
        assert_eq!(
            Notice::NotFound(DocId::from("abc")).to_string(),
            "Document abc not found"
        );
        assert!(Notice::Malformed("doc#x".into()).to_string().contains("doc#x"));
    }
}
