use std::collections::HashMap;

use crate::{Term, Uri};

/// One subject-predicate-object triple. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Statement {
    pub subject: Uri,
    pub predicate: Uri,
    pub object: Term,
}

impl Statement {
    pub fn new(subject: Uri, predicate: Uri, object: impl Into<Term>) -> Self {
        Self {
            subject,
            predicate,
            object: object.into(),
        }
    }
}

/// An append-only, deduplicated statement set indexed by subject and by
/// predicate. Statements are kept in insertion order.
#[derive(Debug, Default)]
pub struct Graph {
    statements: Vec<Statement>,
    by_subject: HashMap<Uri, Vec<usize>>,
    by_predicate: HashMap<Uri, Vec<usize>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a statement, returning `false` when an identical statement
    /// is already present.
    pub fn insert(&mut self, statement: Statement) -> bool {
        if let Some(indexes) = self.by_subject.get(&statement.subject) {
            if indexes.iter().any(|&i| self.statements[i] == statement) {
                return false;
            }
        }
        let index = self.statements.len();
        self.by_subject
            .entry(statement.subject.clone())
            .or_default()
            .push(index);
        self.by_predicate
            .entry(statement.predicate.clone())
            .or_default()
            .push(index);
        self.statements.push(statement);
        true
    }

    /// Moves every statement of `other` into this graph, returning how
    /// many were not already present.
    pub fn merge(&mut self, other: Graph) -> usize {
        other
            .statements
            .into_iter()
            .filter(|statement| self.insert(statement.clone()))
            .count()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn statements(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter()
    }

    pub fn with_subject(&self, subject: &Uri) -> impl Iterator<Item = &Statement> + '_ {
        self.by_subject
            .get(subject)
            .into_iter()
            .flatten()
            .map(move |&i| &self.statements[i])
    }

    pub fn with_predicate(&self, predicate: &Uri) -> impl Iterator<Item = &Statement> + '_ {
        self.by_predicate
            .get(predicate)
            .into_iter()
            .flatten()
            .map(move |&i| &self.statements[i])
    }

    /// All objects of `(subject, predicate, _)` statements, in insertion
    /// order.
    pub fn objects<'g>(
        &'g self,
        subject: &Uri,
        predicate: &'g Uri,
    ) -> impl Iterator<Item = &'g Term> + 'g {
        self.with_subject(subject)
            .filter(move |statement| &statement.predicate == predicate)
            .map(|statement| &statement.object)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::Literal;

    fn uri(text: &str) -> Uri {
        Uri::parse(text).unwrap()
    }

    fn label_statement(subject: &str, label: &str) -> Statement {
        Statement::new(
            uri(subject),
            uri("http://www.w3.org/2000/01/rdf-schema#label"),
            Literal::new(label),
        )
    }

    #[test]
    fn duplicate_statements_are_not_inserted_twice() {
        let mut graph = Graph::new();
        assert!(graph.insert(label_statement("http://ex.org/amp", "Amp")));
        assert!(!graph.insert(label_statement("http://ex.org/amp", "Amp")));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn subject_index_finds_all_statements() {
        let mut graph = Graph::new();
        graph.insert(label_statement("http://ex.org/amp", "Amp"));
        graph.insert(label_statement("http://ex.org/amp", "Amplifier"));
        graph.insert(label_statement("http://ex.org/comp", "Comp"));
        let subject = uri("http://ex.org/amp");
        assert_eq!(graph.with_subject(&subject).count(), 2);
        assert_eq!(graph.with_subject(&uri("http://ex.org/none")).count(), 0);
    }

    #[test]
    fn objects_filters_by_predicate() {
        let mut graph = Graph::new();
        let subject = uri("http://ex.org/amp");
        let preset = uri("http://lv2plug.in/ns/ext/presets#preset");
        graph.insert(label_statement("http://ex.org/amp", "Amp"));
        graph.insert(Statement::new(
            subject.clone(),
            preset.clone(),
            uri("http://ex.org/amp#default"),
        ));
        let objects: Vec<_> = graph.objects(&subject, &preset).collect();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].lexical(), "http://ex.org/amp#default");
    }

    #[test]
    fn merge_deduplicates_across_graphs() {
        let mut left = Graph::new();
        left.insert(label_statement("http://ex.org/amp", "Amp"));
        let mut right = Graph::new();
        right.insert(label_statement("http://ex.org/amp", "Amp"));
        right.insert(label_statement("http://ex.org/comp", "Comp"));
        let added = left.merge(right);
        assert_eq!(added, 1);
        assert_eq!(left.len(), 2);
    }
}
