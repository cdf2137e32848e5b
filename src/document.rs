//! Generic document tree consumed by the spec builder.
//!
//! Parsing raw bytes into this tree is the job of a format crate (see
//! `specimen-yaml`); the engine only reads it. Scalars and alias-free
//! subtrees convert to [`serde_yaml::Value`], the value type carried by
//! tiles.

use crate::errors::AliasError;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Position of a node in its source text (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mark {
    pub line: usize,
    pub column: usize,
}

/// Source identity of a node, used only for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub file: Arc<str>,
    /// Path of the node within its document, e.g. `/content/0`.
    pub pointer: String,
    pub mark: Option<Mark>,
}

impl Location {
    /// Unmarked location of the node at `pointer` in `file`.
    pub fn new(file: impl Into<Arc<str>>, pointer: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            pointer: pointer.into(),
            mark: None,
        }
    }

    /// Same location with its line and column replaced.
    pub fn with_mark(mut self, mark: Option<Mark>) -> Self {
        self.mark = mark;
        self
    }

    /// Location of a node nested below this one.
    pub fn child(&self, segment: impl fmt::Display, mark: Option<Mark>) -> Self {
        Self {
            file: Arc::clone(&self.file),
            pointer: format!("{}/{}", self.pointer, segment),
            mark,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mark {
            Some(mark) => write!(f, "{}:{}:{}", self.file, mark.line, mark.column),
            None if self.pointer.is_empty() => write!(f, "{}", self.file),
            None => write!(f, "{}#{}", self.file, self.pointer),
        }
    }
}

/// Typed scalar literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    /// The scalar as a tile value.
    pub fn to_value(&self) -> Value {
        match self {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(*b),
            Scalar::Int(i) => Value::Number((*i).into()),
            Scalar::Float(x) => Value::Number((*x).into()),
            Scalar::Str(s) => Value::String(s.clone()),
        }
    }

    /// Textual form, as used for keys, names and flags.
    pub fn as_text(&self) -> String {
        match self {
            Scalar::Null => String::new(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(x) => x.to_string(),
            Scalar::Str(s) => s.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Mapping(Vec<(String, Node)>),
    Sequence(Vec<Node>),
    Scalar(Scalar),
    /// Reference to an anchored node of the same document.
    Alias(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub mark: Option<Mark>,
}

impl Node {
    /// Unmarked node of the given kind.
    pub fn new(kind: NodeKind) -> Self {
        Self { kind, mark: None }
    }

    /// Same node marked at `line` and `column`.
    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.mark = Some(Mark { line, column });
        self
    }

    /// Mapping node with entries in the given order.
    pub fn mapping<K: Into<String>>(entries: impl IntoIterator<Item = (K, Node)>) -> Self {
        Self::new(NodeKind::Mapping(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// Sequence node.
    pub fn sequence(items: impl IntoIterator<Item = Node>) -> Self {
        Self::new(NodeKind::Sequence(items.into_iter().collect()))
    }

    /// Scalar node.
    pub fn scalar(scalar: Scalar) -> Self {
        Self::new(NodeKind::Scalar(scalar))
    }

    /// String scalar node.
    pub fn str(text: impl Into<String>) -> Self {
        Self::scalar(Scalar::Str(text.into()))
    }

    /// Integer scalar node.
    pub fn int(value: i64) -> Self {
        Self::scalar(Scalar::Int(value))
    }

    /// Alias to the anchor called `name`.
    pub fn alias(name: impl Into<String>) -> Self {
        Self::new(NodeKind::Alias(name.into()))
    }

    /// The scalar held by this node, if it is one.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match &self.kind {
            NodeKind::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Value of `key` when this node is a mapping.
    pub fn get(&self, key: &str) -> Option<&Node> {
        match &self.kind {
            NodeKind::Mapping(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Human name of the node kind for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            NodeKind::Mapping(_) => "mapping",
            NodeKind::Sequence(_) => "sequence",
            NodeKind::Scalar(_) => "scalar",
            NodeKind::Alias(_) => "alias",
        }
    }

    /// Convert an alias-free subtree into a tile value.
    ///
    /// Returns `None` if an alias is still present.
    pub fn to_value(&self) -> Option<Value> {
        Some(match &self.kind {
            NodeKind::Scalar(s) => s.to_value(),
            NodeKind::Sequence(items) => Value::Sequence(
                items
                    .iter()
                    .map(Node::to_value)
                    .collect::<Option<Vec<_>>>()?,
            ),
            NodeKind::Mapping(entries) => {
                let mut mapping = Mapping::new();
                for (k, v) in entries {
                    mapping.insert(Value::String(k.clone()), v.to_value()?);
                }
                Value::Mapping(mapping)
            }
            NodeKind::Alias(_) => return None,
        })
    }
}

/// One parsed document: a root node plus its anchor table.
#[derive(Debug, Clone)]
pub struct Document {
    pub path: Arc<str>,
    pub root: Node,
    pub anchors: HashMap<String, Node>,
}

impl Document {
    /// Document without anchors.
    pub fn new(path: impl Into<Arc<str>>, root: Node) -> Self {
        Self {
            path: path.into(),
            root,
            anchors: HashMap::new(),
        }
    }

    /// Same document with one more anchor.
    pub fn with_anchor(mut self, name: impl Into<String>, node: Node) -> Self {
        self.anchors.insert(name.into(), node);
        self
    }

    /// Location of the document root.
    pub fn location(&self) -> Location {
        Location::new(Arc::clone(&self.path), "").with_mark(self.root.mark)
    }

    /// Follow alias chains starting at `node`, at most `depth` hops.
    pub fn resolve<'a>(&'a self, node: &'a Node, depth: usize) -> Result<&'a Node, AliasError> {
        let mut current = node;
        let mut hops = 0;
        while let NodeKind::Alias(name) = &current.kind {
            if hops >= depth {
                return Err(AliasError::DepthExceeded {
                    name: name.clone(),
                    depth,
                });
            }
            current = self
                .anchors
                .get(name)
                .ok_or_else(|| AliasError::Unknown { name: name.clone() })?;
            hops += 1;
        }
        Ok(current)
    }

    /// Deep copy of `node` with every alias replaced by its target.
    ///
    /// `depth` bounds both alias chains and the nesting of aliases inside
    /// aliased content, so self-referencing anchors terminate.
    pub fn expand(&self, node: &Node, depth: usize) -> Result<Node, AliasError> {
        self.expand_inner(node, depth, 0)
    }

    fn expand_inner(&self, node: &Node, depth: usize, used: usize) -> Result<Node, AliasError> {
        let kind = match &node.kind {
            NodeKind::Alias(name) => {
                if used >= depth {
                    return Err(AliasError::DepthExceeded {
                        name: name.clone(),
                        depth,
                    });
                }
                let target = self
                    .anchors
                    .get(name)
                    .ok_or_else(|| AliasError::Unknown { name: name.clone() })?;
                return self.expand_inner(target, depth, used + 1);
            }
            NodeKind::Mapping(entries) => NodeKind::Mapping(
                entries
                    .iter()
                    .map(|(k, v)| Ok((k.clone(), self.expand_inner(v, depth, used)?)))
                    .collect::<Result<_, AliasError>>()?,
            ),
            NodeKind::Sequence(items) => NodeKind::Sequence(
                items
                    .iter()
                    .map(|v| self.expand_inner(v, depth, used))
                    .collect::<Result<_, AliasError>>()?,
            ),
            NodeKind::Scalar(s) => NodeKind::Scalar(s.clone()),
        };

        Ok(Node {
            kind,
            mark: node.mark,
        })
    }
}
