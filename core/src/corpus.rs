use crate::error::MalformedRecord;
use crate::index::DocId;
use serde::Deserialize;
use std::collections::HashMap;

/// A page record as decoded from the corpus, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPage {
    #[serde(default)]
    pub id: Option<DocId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "text")]
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub id: DocId,
    pub title: String,
    pub body: String,
}

impl Page {
    pub fn new(id: DocId, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self { id, title: title.into(), body: body.into() }
    }
}

impl TryFrom<RawPage> for Page {
    type Error = MalformedRecord;

    fn try_from(raw: RawPage) -> Result<Self, Self::Error> {
        let id = raw.id.ok_or(MalformedRecord::MissingId)?;
        let title = raw.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
        let title = title.ok_or(MalformedRecord::MissingTitle { id })?;
        Ok(Page { id, title, body: raw.body.unwrap_or_default() })
    }
}

/// Bidirectional id/title map in corpus order. Titles and ids are both unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    order: Vec<DocId>,
    titles: HashMap<DocId, String>,
    ids: HashMap<String, DocId>,
}

impl Corpus {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, id: DocId, title: impl Into<String>) -> Result<(), MalformedRecord> {
        let title = title.into();
        if self.titles.contains_key(&id) {
            return Err(MalformedRecord::DuplicateId { id });
        }
        if self.ids.contains_key(&title) {
            return Err(MalformedRecord::DuplicateTitle { id, title });
        }
        self.order.push(id);
        self.ids.insert(title.clone(), id);
        self.titles.insert(id, title);
        Ok(())
    }

    /// Build the corpus from validated pages, dropping any page whose id or
    /// title collides with an earlier one. Returns the pages that were kept.
    pub fn from_pages(pages: Vec<Page>) -> (Self, Vec<Page>) {
        let mut corpus = Self::new();
        let mut kept = Vec::with_capacity(pages.len());
        for page in pages {
            match corpus.insert(page.id, page.title.clone()) {
                Ok(()) => kept.push(page),
                Err(err) => tracing::warn!(%err, "skipping page"),
            }
        }
        (corpus, kept)
    }

    pub fn len(&self) -> usize { self.order.len() }

    pub fn is_empty(&self) -> bool { self.order.is_empty() }

    /// Document ids in the order they were added.
    pub fn ids(&self) -> &[DocId] { &self.order }

    pub fn title(&self, id: DocId) -> Option<&str> { self.titles.get(&id).map(String::as_str) }

    pub fn id_of(&self, title: &str) -> Option<DocId> { self.ids.get(title).copied() }

    pub fn contains_title(&self, title: &str) -> bool { self.ids.contains_key(title) }

    /// `(id, title)` pairs in corpus order.
    pub fn iter(&self) -> impl Iterator<Item = (DocId, &str)> + '_ {
        self.order.iter().map(move |id| (*id, self.titles[id].as_str()))
    }
}
