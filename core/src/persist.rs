//! Load and save the three index tables.
//!
//! A path ending in `.bin` holds one bincode blob of records; any other path
//! holds JSON Lines, one record per line. Records are written in ascending
//! id / term order so identical tables produce identical files.

use crate::corpus::Corpus;
use crate::error::StoreError;
use crate::index::{DocId, Posting, TermWeights};
use crate::pipeline::IndexTables;
use crate::rank::AuthorityVector;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, create_dir_all, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempPath};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleRecord {
    pub id: DocId,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankRecord {
    pub id: DocId,
    pub rank: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordRecord {
    pub term: String,
    pub postings: Vec<Posting>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    JsonLines,
    Bincode,
}

impl TableFormat {
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("bin") => TableFormat::Bincode,
            _ => TableFormat::JsonLines,
        }
    }
}

/// Where the titles, docs (authority) and words tables live.
#[derive(Debug, Clone)]
pub struct TablePaths {
    pub titles: PathBuf,
    pub docs: PathBuf,
    pub words: PathBuf,
}

impl TablePaths {
    pub fn new<P: AsRef<Path>>(titles: P, docs: P, words: P) -> Self {
        Self { titles: titles.as_ref().to_path_buf(), docs: docs.as_ref().to_path_buf(), words: words.as_ref().to_path_buf() }
    }
}

/// Write all three tables. Nothing lands at the target paths unless every
/// table was encoded and written out in full; if a rename fails part way,
/// the tables already renamed are put back the way they were.
pub fn save_tables(paths: &TablePaths, tables: &IndexTables) -> Result<(), StoreError> {
    let staged = [
        stage(&paths.titles, &encode(&paths.titles, &title_records(&tables.corpus))?)?,
        stage(&paths.docs, &encode(&paths.docs, &rank_records(&tables.authority))?)?,
        stage(&paths.words, &encode(&paths.words, &word_records(&tables.weights))?)?,
    ];
    let mut committed = Vec::with_capacity(staged.len());
    for table in staged {
        match table.commit() {
            Ok(done) => committed.push(done),
            Err(err) => {
                for done in committed.into_iter().rev() {
                    done.roll_back();
                }
                return Err(err);
            }
        }
    }
    tracing::info!(titles = %paths.titles.display(), docs = %paths.docs.display(), words = %paths.words.display(), "saved tables");
    Ok(())
}

pub fn load_tables(paths: &TablePaths) -> Result<IndexTables, StoreError> {
    let corpus = load_titles(&paths.titles)?;
    let authority = load_authority(&paths.docs)?;
    let weights = load_words(&paths.words)?;
    if authority.len() != corpus.len() {
        tracing::warn!(titles = corpus.len(), ranks = authority.len(), "titles and docs tables disagree in size");
    }
    tracing::info!(num_docs = corpus.len(), num_terms = weights.num_terms(), "loaded tables");
    Ok(IndexTables { corpus, authority, weights })
}

pub fn load_titles(path: &Path) -> Result<Corpus, StoreError> {
    let mut corpus = Corpus::new();
    for (line, record) in decode::<TitleRecord>(path)?.into_iter().enumerate() {
        corpus
            .insert(record.id, record.title)
            .map_err(|err| StoreError::Corrupt { path: path.to_path_buf(), line: line + 1, reason: err.to_string() })?;
    }
    Ok(corpus)
}

pub fn load_authority(path: &Path) -> Result<AuthorityVector, StoreError> {
    Ok(decode::<RankRecord>(path)?.into_iter().map(|r| (r.id, r.rank)).collect())
}

pub fn load_words(path: &Path) -> Result<TermWeights, StoreError> {
    let mut weights = TermWeights::new();
    for record in decode::<WordRecord>(path)? {
        for p in record.postings {
            weights.insert(record.term.as_str(), p.doc_id, p.weight);
        }
    }
    Ok(weights)
}

fn title_records(corpus: &Corpus) -> Vec<TitleRecord> {
    let mut records: Vec<TitleRecord> =
        corpus.iter().map(|(id, title)| TitleRecord { id, title: title.to_string() }).collect();
    records.sort_by_key(|r| r.id);
    records
}

fn rank_records(authority: &AuthorityVector) -> Vec<RankRecord> {
    authority.iter().map(|(id, rank)| RankRecord { id, rank }).collect()
}

fn word_records(weights: &TermWeights) -> Vec<WordRecord> {
    weights
        .sorted_postings()
        .into_iter()
        .map(|(term, postings)| WordRecord { term: term.to_string(), postings })
        .collect()
}

fn encode<T: Serialize>(path: &Path, records: &[T]) -> Result<Vec<u8>, StoreError> {
    match TableFormat::for_path(path) {
        TableFormat::Bincode => bincode::serialize(records).map_err(|e| StoreError::Encode(e.to_string())),
        TableFormat::JsonLines => {
            let mut buf = Vec::new();
            for record in records {
                serde_json::to_writer(&mut buf, record).map_err(|e| StoreError::Encode(e.to_string()))?;
                buf.push(b'\n');
            }
            Ok(buf)
        }
    }
}

fn decode<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    let mut f = File::open(path).map_err(|e| StoreError::from_read(path, e))?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf).map_err(|e| StoreError::from_read(path, e))?;
    let corrupt = |line: usize, reason: String| StoreError::Corrupt { path: path.to_path_buf(), line, reason };
    match TableFormat::for_path(path) {
        TableFormat::Bincode => bincode::deserialize(&buf).map_err(|e| corrupt(0, e.to_string())),
        TableFormat::JsonLines => {
            let text = std::str::from_utf8(&buf).map_err(|e| corrupt(0, e.to_string()))?;
            let mut records = Vec::new();
            for (i, line) in text.lines().enumerate() {
                if line.trim().is_empty() { continue; }
                records.push(serde_json::from_str(line).map_err(|e| corrupt(i + 1, e.to_string()))?);
            }
            Ok(records)
        }
    }
}

/// A fully written temporary file waiting to be renamed over its target.
struct StagedTable {
    target: PathBuf,
    dir: PathBuf,
    file: NamedTempFile,
}

/// A table renamed into place, holding whatever file it replaced.
struct CommittedTable {
    target: PathBuf,
    previous: Option<TempPath>,
}

fn stage(target: &Path, bytes: &[u8]) -> Result<StagedTable, StoreError> {
    let dir = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let write_err = |e| StoreError::from_write(target, e);
    if target.is_dir() {
        return Err(write_err(io::Error::other("target is a directory")));
    }
    create_dir_all(&dir).map_err(write_err)?;
    let mut file = NamedTempFile::new_in(&dir).map_err(write_err)?;
    file.write_all(bytes).map_err(write_err)?;
    file.as_file().sync_all().map_err(write_err)?;
    Ok(StagedTable { target: target.to_path_buf(), dir, file })
}

impl StagedTable {
    fn commit(self) -> Result<CommittedTable, StoreError> {
        let write_err = |e| StoreError::from_write(&self.target, e);
        let previous = if self.target.is_file() {
            let aside = NamedTempFile::new_in(&self.dir).map_err(write_err)?.into_temp_path();
            fs::rename(&self.target, &aside).map_err(write_err)?;
            Some(aside)
        } else {
            None
        };
        if let Err(e) = self.file.persist(&self.target) {
            if let Some(aside) = previous {
                if let Err(restore) = aside.persist(&self.target) {
                    tracing::warn!(path = %self.target.display(), error = %restore.error, "could not restore previous table");
                }
            }
            return Err(StoreError::from_write(&self.target, e.error));
        }
        Ok(CommittedTable { target: self.target, previous })
    }
}

impl CommittedTable {
    /// Put back the file this table replaced, or remove it if there was none.
    fn roll_back(self) {
        let restored = match self.previous {
            Some(aside) => aside.persist(&self.target).map_err(|e| e.error),
            None => fs::remove_file(&self.target),
        };
        if let Err(error) = restored {
            tracing::warn!(path = %self.target.display(), %error, "could not roll back table");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(TableFormat::for_path(Path::new("words.bin")), TableFormat::Bincode);
        assert_eq!(TableFormat::for_path(Path::new("words.txt")), TableFormat::JsonLines);
        assert_eq!(TableFormat::for_path(Path::new("words")), TableFormat::JsonLines);
    }

    #[test]
    fn json_lines_are_one_record_per_line() {
        let records = vec![TitleRecord { id: 2, title: "B".into() }, TitleRecord { id: 5, title: "E".into() }];
        let bytes = encode(Path::new("titles.jsonl"), &records).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "{\"id\":2,\"title\":\"B\"}\n{\"id\":5,\"title\":\"E\"}\n");
    }

    #[test]
    fn roll_back_restores_replaced_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("titles");
        fs::write(&target, "old").unwrap();
        stage(&target, b"new").unwrap().commit().unwrap().roll_back();
        assert_eq!(fs::read_to_string(&target).unwrap(), "old");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn roll_back_removes_fresh_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("docs");
        let done = stage(&target, b"new").unwrap().commit().unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
        done.roll_back();
        assert!(!target.exists());
    }

    #[test]
    fn directory_target_is_refused_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let err = stage(dir.path(), b"x").err().unwrap();
        assert!(matches!(err, StoreError::Unwritable { .. }));
    }
}
