use serde::{de::DeserializeOwned, Serialize};
use snote_core::{now_millis, Timestamp};
use tracing::{debug, info, warn};

pub use snote_core::{
    DocId, DocumentRecord, DraftRecord, Error as SharenoteError, FileStore, IdScheme, KvStore,
    MemoryStore, Result, StoreConfig,
};

pub mod ids;
pub use ids::{validate_id, IdGenerator, MAX_ID_LEN};

pub mod fragment;
pub use fragment::{fragment_of, parse_target, share_url};

pub mod draft;
pub use draft::{Debouncer, DraftAutosave};

pub mod session;
pub use session::{EditorState, Notice, Opened};

pub mod gallery;

/// Random identifiers tried before giving up on a free slot
const MINT_ATTEMPTS: usize = 8;

/// Shared documents and the draft slot over a key-value store
pub struct DocumentStore<S: KvStore> {
    store: S,
    config: StoreConfig,
    ids: IdGenerator,
}

impl<S: KvStore> DocumentStore<S> {
    /// Wrap `store` using `config` for key layout and identifier minting
    pub fn new(store: S, config: StoreConfig) -> Result<Self> {
        config.validate().map_err(SharenoteError::InvalidArgument)?;
        let ids = IdGenerator::new(config.id_scheme);
        Ok(Self { store, config, ids })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The underlying key-value store
    pub fn backend(&self) -> &S {
        &self.store
    }

    /// Share a document: mint an id and store the record with no views
    pub fn create(&self, title: &str, content: &str) -> Result<DocId> {
        self.create_at(title, content, now_millis())
    }

    /// Share a document with an explicit creation time
    pub fn create_at(&self, title: &str, content: &str, timestamp: Timestamp) -> Result<DocId> {
        let record = DocumentRecord::new(title, content, timestamp);
        let id = self.mint_id(&record)?;

        let key = self.config.document_key(id.as_str());
        self.write_json(&key, &record)?;

        info!("Shared document {} ({} bytes)", id, record.content.len());
        Ok(id)
    }

    /// Pick an identifier whose slot is free or already holds `record`'s payload
    ///
    /// Re-sharing an identical payload reuses its id. Any other occupant is
    /// never overwritten.
    fn mint_id(&self, record: &DocumentRecord) -> Result<DocId> {
        let (title, content, timestamp) = (&record.title, &record.content, record.timestamp);

        if let IdScheme::Encoded { length } = self.ids.scheme() {
            let encoded = ids::encode_payload(title, content, timestamp)?;
            let widest = encoded.len().min(MAX_ID_LEN);

            for width in length.min(widest)..=widest {
                let id = DocId::from(ids::encoded_window(&encoded, width));
                if self.slot_accepts(&id, record)? {
                    return Ok(id);
                }
                debug!("Identifier {} taken by another document, widening", id);
            }
            warn!("No free encoded identifier for this payload, using a random one");
        }

        let random = match self.ids.scheme() {
            IdScheme::Encoded { length } => IdGenerator::new(IdScheme::Random {
                length: length.min(64),
                timestamp_suffix: false,
            }),
            IdScheme::Random { .. } => self.ids,
        };

        for _ in 0..MINT_ATTEMPTS {
            let id = random.generate(title, content, timestamp)?;
            if !self.exists(&id)? {
                return Ok(id);
            }
            warn!("Identifier {} already in use, minting another", id);
        }

        Err(SharenoteError::Internal(format!(
            "no free identifier after {} attempts",
            MINT_ATTEMPTS
        )))
    }

    fn slot_accepts(&self, id: &DocId, record: &DocumentRecord) -> Result<bool> {
        match self.read_json::<DocumentRecord>(&self.config.document_key(id.as_str())) {
            Ok(None) => Ok(true),
            Ok(Some(stored)) => Ok(stored.title == record.title
                && stored.content == record.content
                && stored.timestamp == record.timestamp),
            Err(SharenoteError::Malformed { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Open a shared document, counting one view
    ///
    /// Returns `Ok(None)` when nothing is stored under `id`.
    pub fn load(&self, id: &DocId) -> Result<Option<DocumentRecord>> {
        let key = self.config.document_key(id.as_str());
        let Some(mut record) = self.read_json::<DocumentRecord>(&key)? else {
            debug!("Document {} not found", id);
            return Ok(None);
        };

        record.record_view();
        self.write_json(&key, &record)?;

        debug!("Document {} viewed {} times", id, record.views);
        Ok(Some(record))
    }

    /// Read a shared document without counting a view
    pub fn peek(&self, id: &DocId) -> Result<Option<DocumentRecord>> {
        self.read_json(&self.config.document_key(id.as_str()))
    }

    pub fn exists(&self, id: &DocId) -> Result<bool> {
        self.store.contains_key(&self.config.document_key(id.as_str()))
    }

    /// Every shared document, newest first
    ///
    /// Entries whose stored JSON does not parse are skipped.
    pub fn list(&self) -> Result<Vec<(DocId, DocumentRecord)>> {
        let mut documents = Vec::new();

        for key in self.store.keys()? {
            let Some(id) = self.config.document_id(&key) else {
                continue;
            };

            match self.read_json::<DocumentRecord>(&key) {
                Ok(Some(record)) => documents.push((DocId::from(id), record)),
                Ok(None) => {}
                Err(SharenoteError::Malformed { key, reason }) => {
                    warn!("Skipping malformed document at {}: {}", key, reason);
                }
                Err(e) => return Err(e),
            }
        }

        documents.sort_by(|(a_id, a), (b_id, b)| {
            b.timestamp.cmp(&a.timestamp).then_with(|| a_id.cmp(b_id))
        });
        Ok(documents)
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.store.get(key)? {
            Some(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|e| SharenoteError::malformed(key, e)),
            None => Ok(None),
        }
    }

    fn write_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let text = serde_json::to_string(value)?;
        self.store.set(key, text)
    }
}

impl DocumentStore<MemoryStore> {
    /// Store backed by memory, with default configuration
    pub fn in_memory() -> Self {
        let config = StoreConfig::default();
        let store = MemoryStore::with_quota(config.max_total_bytes);
        Self {
            store,
            ids: IdGenerator::new(config.id_scheme),
            config,
        }
    }
}

impl DocumentStore<FileStore> {
    /// Open a file-backed store, applying the configured quota
    pub fn open_file(path: impl AsRef<std::path::Path>, config: StoreConfig) -> Result<Self> {
        let store = FileStore::open_with_quota(path, config.max_total_bytes)?;
        Self::new(store, config)
    }
}
