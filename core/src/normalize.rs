use lazy_static::lazy_static;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","can't","cannot","could","couldn't",
            "did","didn't","do","does","doesn't","doing","don't","down","during",
            "each","few","for","from","further",
            "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
            "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
            "let's","me","more","most","mustn't","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
            "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
            "under","until","up","very",
            "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
            "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

/// Turns raw tokens into index terms. Shared by indexing and querying so both
/// sides agree on what a term is.
pub trait Normalizer: Send + Sync {
    /// The term for one raw token, or `None` if the token is dropped.
    fn normalize_token(&self, token: &str) -> Option<String>;

    /// Normalize a token sequence, keeping order and duplicates.
    fn normalize(&self, tokens: &[String]) -> Vec<String> {
        tokens.iter().filter_map(|t| self.normalize_token(t)).collect()
    }
}

/// NFKC fold, lowercase, English stopword removal and Snowball stemming.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishNormalizer;

pub fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

impl Normalizer for EnglishNormalizer {
    fn normalize_token(&self, token: &str) -> Option<String> {
        let lowered = token.nfkc().collect::<String>().to_lowercase();
        if lowered.is_empty() || is_stopword(&lowered) {
            return None;
        }
        Some(STEMMER.stem(&lowered).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(words: &[&str]) -> Vec<String> { words.iter().map(|w| w.to_string()).collect() }

    #[test]
    fn keeps_order_and_duplicates() {
        let out = EnglishNormalizer.normalize(&owned(&["Running", "the", "dogs", "running"]));
        assert_eq!(out, vec!["run", "dog", "run"]);
    }

    #[test]
    fn stopwords_checked_after_lowercasing() {
        assert_eq!(EnglishNormalizer.normalize_token("THE"), None);
        assert_eq!(EnglishNormalizer.normalize_token("Don't"), None);
    }
}
