use std::fmt;

use crate::Uri;

/// A literal value with its optional language tag or datatype.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    pub value: String,
    pub language: Option<String>,
    pub datatype: Option<Uri>,
}

impl Literal {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: None,
            datatype: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_datatype(mut self, datatype: Uri) -> Self {
        self.datatype = Some(datatype);
        self
    }
}

/// The object position of a statement: a URI or a literal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Term {
    Uri(Uri),
    Literal(Literal),
}

impl Term {
    pub fn uri(&self) -> Option<&Uri> {
        match self {
            Term::Uri(uri) => Some(uri),
            Term::Literal(_) => None,
        }
    }

    /// The permissive textual form used for display: the URI text or the
    /// literal's lexical value, ignoring language and datatype.
    pub fn lexical(&self) -> &str {
        match self {
            Term::Uri(uri) => uri.as_str(),
            Term::Literal(literal) => &literal.value,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.lexical())
    }
}

impl From<Uri> for Term {
    fn from(uri: Uri) -> Self {
        Term::Uri(uri)
    }
}

impl From<Literal> for Term {
    fn from(literal: Literal) -> Self {
        Term::Literal(literal)
    }
}
