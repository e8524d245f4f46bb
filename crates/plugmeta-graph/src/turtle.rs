//! Parser for the Turtle subset LV2 manifests use.
//!
//! Supported: `@prefix` and `@base` directives, IRI references with
//! resolution against the document base, prefixed names, the `a` keyword,
//! predicate (`;`) and object (`,`) lists, string literals with language
//! tags or datatypes, numeric and boolean literals, and `#` comments.
//! Blank nodes, collections and multi-line literals are outside the subset
//! and fail the document; the loader downgrades that to a warning.

use std::collections::HashMap;

use thiserror::Error;

use crate::{Graph, Literal, Statement, Term, Uri};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";

/// Parses `source` into `graph`, resolving relative IRI references against
/// `base`. Returns the number of statements that were not already present.
pub fn parse_document(source: &str, base: &str, graph: &mut Graph) -> Result<usize, ParseError> {
    Parser::new(source, base).run(graph)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    base: String,
    prefixes: HashMap<String, String>,
}

impl Parser {
    fn new(source: &str, base: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            base: base.to_string(),
            prefixes: HashMap::new(),
        }
    }

    fn run(mut self, graph: &mut Graph) -> Result<usize, ParseError> {
        let mut added = 0;
        loop {
            self.skip_trivia();
            match self.peek() {
                None => break,
                Some('@') => self.directive()?,
                Some(_) => added += self.triples(graph)?,
            }
        }
        Ok(added)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn err(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            line: self.line,
            message: message.into(),
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('#') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                _ => break,
            }
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(self.err(format!("expected '{expected}', found '{c}'"))),
            None => Err(self.err(format!("expected '{expected}', found end of document"))),
        }
    }

    fn directive(&mut self) -> Result<(), ParseError> {
        self.expect('@')?;
        let word = self.read_word();
        match word.as_str() {
            "prefix" => {
                self.skip_trivia();
                let prefix = self.read_prefix_label();
                self.expect(':')?;
                self.skip_trivia();
                let target = self.iriref()?;
                let resolved = resolve(&self.base, &target);
                self.prefixes.insert(prefix, resolved);
            }
            "base" => {
                self.skip_trivia();
                let target = self.iriref()?;
                self.base = resolve(&self.base, &target);
            }
            other => return Err(self.err(format!("unknown directive '@{other}'"))),
        }
        self.skip_trivia();
        self.expect('.')
    }

    fn read_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphabetic() {
                word.push(c);
                self.bump();
            } else {
                break;
            }
        }
        word
    }

    fn read_prefix_label(&mut self) -> String {
        let mut label = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                label.push(c);
                self.bump();
            } else {
                break;
            }
        }
        label
    }

    fn triples(&mut self, graph: &mut Graph) -> Result<usize, ParseError> {
        let subject = self.iri()?;
        let mut added = 0;
        loop {
            self.skip_trivia();
            let predicate = self.verb()?;
            loop {
                self.skip_trivia();
                let object = self.object()?;
                if graph.insert(Statement::new(subject.clone(), predicate.clone(), object)) {
                    added += 1;
                }
                self.skip_trivia();
                if self.peek() == Some(',') {
                    self.bump();
                } else {
                    break;
                }
            }
            match self.peek() {
                Some(';') => {
                    while self.peek() == Some(';') {
                        self.bump();
                        self.skip_trivia();
                    }
                    if self.peek() == Some('.') {
                        break;
                    }
                }
                Some('.') => break,
                Some(c) => return Err(self.err(format!("expected ';', ',' or '.', found '{c}'"))),
                None => return Err(self.err("unterminated statement")),
            }
        }
        self.expect('.')?;
        Ok(added)
    }

    fn verb(&mut self) -> Result<Uri, ParseError> {
        if self.peek() == Some('a') {
            let next = self.peek_at(1);
            let is_keyword = match next {
                None => true,
                Some(c) => c.is_whitespace() || c == '<' || c == '#',
            };
            if is_keyword {
                self.bump();
                return Ok(Uri::new_unchecked(RDF_TYPE));
            }
        }
        self.iri()
    }

    fn iri(&mut self) -> Result<Uri, ParseError> {
        self.skip_trivia();
        match self.peek() {
            Some('<') => {
                let reference = self.iriref()?;
                Ok(Uri::new_unchecked(resolve(&self.base, &reference)))
            }
            Some('_') => Err(self.err("blank nodes are not supported")),
            Some(c) if c.is_ascii_alphabetic() || c == ':' => self.prefixed_name(),
            Some(c) => Err(self.err(format!("expected an IRI, found '{c}'"))),
            None => Err(self.err("expected an IRI, found end of document")),
        }
    }

    fn iriref(&mut self) -> Result<String, ParseError> {
        self.expect('<')?;
        let mut reference = String::new();
        loop {
            match self.bump() {
                Some('>') => return Ok(reference),
                Some(c) if c.is_whitespace() || c.is_control() || c == '<' || c == '"' => {
                    return Err(self.err(format!("invalid character '{c}' in IRI reference")));
                }
                Some(c) => reference.push(c),
                None => return Err(self.err("unterminated IRI reference")),
            }
        }
    }

    fn prefixed_name(&mut self) -> Result<Uri, ParseError> {
        let prefix = self.read_prefix_label();
        self.expect(':')?;
        let local = self.read_local_name();
        match self.prefixes.get(&prefix) {
            Some(namespace) => Ok(Uri::new_unchecked(format!("{namespace}{local}"))),
            None => Err(self.err(format!("undeclared prefix '{prefix}:'"))),
        }
    }

    fn read_local_name(&mut self) -> String {
        let mut local = String::new();
        while let Some(c) = self.peek() {
            let is_name_char = c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '%');
            if is_name_char {
                local.push(c);
                self.bump();
            } else if c == '.' {
                // A dot is part of the name only when more name follows;
                // otherwise it terminates the statement.
                match self.peek_at(1) {
                    Some(n) if n.is_ascii_alphanumeric() || matches!(n, '_' | '-' | '%') => {
                        local.push(c);
                        self.bump();
                    }
                    _ => break,
                }
            } else {
                break;
            }
        }
        local
    }

    fn object(&mut self) -> Result<Term, ParseError> {
        self.skip_trivia();
        match self.peek() {
            Some('"') => Ok(Term::Literal(self.string_literal()?)),
            Some('<') => {
                let reference = self.iriref()?;
                Ok(Term::Uri(Uri::new_unchecked(resolve(&self.base, &reference))))
            }
            Some('[') | Some('(') => Err(self.err("blank nodes and collections are not supported")),
            Some('_') => Err(self.err("blank nodes are not supported")),
            Some(c) if c.is_ascii_digit() => Ok(Term::Literal(self.numeric_literal()?)),
            Some(c) if matches!(c, '+' | '-') => Ok(Term::Literal(self.numeric_literal()?)),
            Some('.') if self.peek_at(1).is_some_and(|n| n.is_ascii_digit()) => {
                Ok(Term::Literal(self.numeric_literal()?))
            }
            Some(c) if c.is_ascii_alphabetic() || c == ':' => self.word_object(),
            Some(c) => Err(self.err(format!("expected an object, found '{c}'"))),
            None => Err(self.err("expected an object, found end of document")),
        }
    }

    /// An object starting with a bare word: a prefixed name, or the boolean
    /// keywords.
    fn word_object(&mut self) -> Result<Term, ParseError> {
        let start = self.pos;
        let word = self.read_prefix_label();
        if self.peek() == Some(':') {
            self.pos = start;
            return self.prefixed_name().map(Term::Uri);
        }
        match word.as_str() {
            "true" | "false" => Ok(Term::Literal(
                Literal::new(word).with_datatype(Uri::new_unchecked(XSD_BOOLEAN)),
            )),
            other => Err(self.err(format!("unexpected token '{other}'"))),
        }
    }

    fn string_literal(&mut self) -> Result<Literal, ParseError> {
        self.expect('"')?;
        let mut value = String::new();
        if self.peek() == Some('"') {
            self.bump();
            if self.peek() == Some('"') {
                return Err(self.err("multi-line literals are not supported"));
            }
            // Empty string; fall through to the suffix.
        } else {
            loop {
                match self.bump() {
                    Some('"') => break,
                    Some('\\') => match self.bump() {
                        Some('"') => value.push('"'),
                        Some('\\') => value.push('\\'),
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some('r') => value.push('\r'),
                        Some('u') => value.push(self.unicode_escape()?),
                        Some(c) => return Err(self.err(format!("invalid escape '\\{c}'"))),
                        None => return Err(self.err("unterminated string literal")),
                    },
                    Some('\n') => return Err(self.err("unterminated string literal")),
                    Some(c) => value.push(c),
                    None => return Err(self.err("unterminated string literal")),
                }
            }
        }
        let mut literal = Literal::new(value);
        match self.peek() {
            Some('@') => {
                self.bump();
                let mut tag = String::new();
                while let Some(c) = self.peek() {
                    if c.is_ascii_alphanumeric() || c == '-' {
                        tag.push(c);
                        self.bump();
                    } else {
                        break;
                    }
                }
                if tag.is_empty() {
                    return Err(self.err("empty language tag"));
                }
                literal = literal.with_language(tag);
            }
            Some('^') => {
                self.expect('^')?;
                self.expect('^')?;
                let datatype = self.iri()?;
                literal = literal.with_datatype(datatype);
            }
            _ => {}
        }
        Ok(literal)
    }

    fn unicode_escape(&mut self) -> Result<char, ParseError> {
        let mut code = 0u32;
        for _ in 0..4 {
            let digit = self
                .bump()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.err("invalid \\u escape"))?;
            code = code * 16 + digit;
        }
        char::from_u32(code).ok_or_else(|| self.err("invalid \\u escape"))
    }

    fn numeric_literal(&mut self) -> Result<Literal, ParseError> {
        let mut text = String::new();
        let mut digits = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' => {
                    digits = true;
                    text.push(c);
                    self.bump();
                }
                '+' | '-' | 'e' | 'E' => {
                    text.push(c);
                    self.bump();
                }
                // A dot is part of the number only when a digit follows;
                // otherwise it terminates the statement.
                '.' if self.peek_at(1).is_some_and(|n| n.is_ascii_digit()) => {
                    text.push(c);
                    self.bump();
                }
                _ => break,
            }
        }
        if !digits {
            return Err(self.err(format!("malformed number '{text}'")));
        }
        let datatype = if text.contains(['e', 'E']) {
            XSD_DOUBLE
        } else if text.contains('.') {
            XSD_DECIMAL
        } else {
            XSD_INTEGER
        };
        Ok(Literal::new(text).with_datatype(Uri::new_unchecked(datatype)))
    }
}

/// RFC 3986-style reference resolution, covering the cases manifest
/// documents need.
fn resolve(base: &str, reference: &str) -> String {
    if has_scheme(reference) {
        return reference.to_string();
    }
    let base = base.split('#').next().unwrap_or(base);
    if reference.is_empty() {
        return base.to_string();
    }
    if let Some(fragment) = reference.strip_prefix('#') {
        return format!("{base}#{fragment}");
    }
    if let Some(rest) = reference.strip_prefix("//") {
        let scheme = base.split(':').next().unwrap_or("");
        return format!("{scheme}://{rest}");
    }
    let (root, path) = split_base(base);
    if reference.starts_with('/') {
        return format!("{root}{}", remove_dot_segments(reference));
    }
    let directory = match path.rfind('/') {
        Some(i) => &path[..=i],
        None => "/",
    };
    format!("{root}{}", remove_dot_segments(&format!("{directory}{reference}")))
}

/// Splits an absolute URI into `scheme://authority` and the path part.
fn split_base(base: &str) -> (&str, &str) {
    match base.find("://") {
        Some(i) => {
            let after = i + 3;
            match base[after..].find('/') {
                Some(j) => base.split_at(after + j),
                None => (base, ""),
            }
        }
        None => match base.find(':') {
            Some(i) => base.split_at(i + 1),
            None => ("", base),
        },
    }
}

fn remove_dot_segments(path: &str) -> String {
    let mut output: Vec<&str> = vec![""];
    for segment in path.split('/').skip(1) {
        match segment {
            "." => {}
            ".." => {
                if output.len() > 1 {
                    output.pop();
                }
            }
            other => output.push(other),
        }
    }
    let mut joined = output.join("/");
    if (path.ends_with("/.") || path.ends_with("/..")) && !joined.ends_with('/') {
        joined.push('/');
    }
    joined
}

fn has_scheme(text: &str) -> bool {
    let mut chars = text.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    for (_, c) in chars {
        match c {
            ':' => return true,
            c if c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.') => {}
            _ => return false,
        }
    }
    false
}
