use crate::corpus::Corpus;
use crate::index::DocId;
use crate::tokenizer::CrossRef;
use std::collections::BTreeMap;

/// Outbound links of every page, as target titles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkGraph {
    links: BTreeMap<DocId, Vec<String>>,
}

impl LinkGraph {
    pub fn new() -> Self { Self::default() }

    /// Record the links of one page and return what was stored.
    pub fn record(&mut self, id: DocId, title: &str, refs: &[CrossRef], corpus: &Corpus) -> &[String] {
        let targets = extract_links(title, refs, corpus);
        self.links.insert(id, targets);
        &self.links[&id]
    }

    pub fn targets(&self, id: DocId) -> &[String] {
        self.links.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn out_degree(&self, id: DocId) -> usize { self.targets(id).len() }

    pub fn len(&self) -> usize { self.links.len() }

    pub fn is_empty(&self) -> bool { self.links.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (DocId, &[String])> + '_ {
        self.links.iter().map(|(id, targets)| (*id, targets.as_slice()))
    }

    pub fn edge_count(&self) -> usize { self.links.values().map(Vec::len).sum() }
}

/// Targets of a page's cross references that name another page of the corpus,
/// deduplicated in first-seen order.
///
/// A page left with no such target links to every other page instead, so no
/// page can trap rank.
pub fn extract_links(title: &str, refs: &[CrossRef], corpus: &Corpus) -> Vec<String> {
    let mut targets: Vec<String> = Vec::new();
    for r in refs {
        let target = r.target.as_str();
        if target != title && corpus.contains_title(target) && !targets.iter().any(|t| t == target) {
            targets.push(target.to_string());
        }
    }
    if targets.is_empty() {
        targets = corpus.iter().filter(|(_, t)| *t != title).map(|(_, t)| t.to_string()).collect();
    }
    targets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Corpus {
        let mut c = Corpus::new();
        for (id, t) in [(1, "A"), (2, "B"), (3, "C")] {
            c.insert(id, t).unwrap();
        }
        c
    }

    fn link(target: &str) -> CrossRef { CrossRef { target: target.into(), text: target.into() } }

    #[test]
    fn filters_unknown_self_and_repeated_targets() {
        let refs = [link("B"), link("A"), link("Nowhere"), link("B"), link("C")];
        assert_eq!(extract_links("A", &refs, &corpus()), vec!["B", "C"]);
    }

    #[test]
    fn linkless_page_links_to_all_others() {
        let refs = [link("C"), link("Nowhere")];
        assert_eq!(extract_links("C", &refs, &corpus()), vec!["A", "B"]);
    }

    #[test]
    fn graph_records_per_page() {
        let c = corpus();
        let mut g = LinkGraph::new();
        g.record(1, "A", &[link("B")], &c);
        g.record(3, "C", &[], &c);
        assert_eq!(g.targets(1), &["B".to_string()]);
        assert_eq!(g.out_degree(3), 2);
        assert_eq!(g.targets(2), &[] as &[String]);
        assert_eq!(g.edge_count(), 3);
    }
}
