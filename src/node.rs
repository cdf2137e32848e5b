//! Typed specification tree built from a generic document.

use crate::config::RunConfig;
use crate::diagnostics::DiagnosticSink;
use crate::document::{Document, Location, Node, NodeKind, Scalar};
use crate::errors::BuildError;
use crate::flag::{read_flag, Flag};
use crate::focus::FocusTree;
use crate::multimap::OrderedMultiMap;

/// A data-bearing entry of a node.
///
/// Declarations are applied in the order the document lists them, so the
/// most recently declared key varies fastest across tiles.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    /// A plain key holding a scalar or a sequence of candidate values.
    Data(String, Node),
    /// The `box` key.
    Box(Node),
    /// The `input` mapping; each entry is a single value.
    Input(Node),
    /// The `matrix` mapping; each entry is an axis.
    Matrix(Node),
}

/// One node of the specification tree: a group or a leaf test case.
#[derive(Debug, Clone)]
pub struct TestNode {
    pub location: Location,
    pub flag: Flag,
    pub name: Option<String>,
    /// Data entries in declaration order, aliases expanded.
    pub declarations: Vec<Declaration>,
    pub children: Vec<TestNode>,
    /// Inherited data matrix, filled by [`TestNode::populate`].
    pub resolved_matrix: OrderedMultiMap,
}

impl TestNode {
    /// A group node with no data of its own.
    pub fn group(location: Location, children: Vec<TestNode>) -> Self {
        Self {
            location,
            flag: Flag::None,
            name: None,
            declarations: Vec::new(),
            children,
            resolved_matrix: OrderedMultiMap::new(),
        }
    }

    /// True when the node has no children to run.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Plain data keys, without `box`, `input` and `matrix`.
    pub fn local_data(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Data(key, value) => Some((key.as_str(), value)),
            _ => None,
        })
    }

    /// Human label: the name when present, the location otherwise.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("{} ({})", name, self.location),
            None => self.location.to_string(),
        }
    }
}

impl FocusTree for TestNode {
    fn flag(&self) -> Flag {
        self.flag
    }

    fn children(&self) -> &[TestNode] {
        &self.children
    }

    fn warn(&self, sink: &mut dyn DiagnosticSink, message: &str) {
        match &self.name {
            Some(name) => sink.warn(Some(&self.location), &format!("{}: {}", name, message)),
            None => sink.warn(Some(&self.location), message),
        }
    }
}

/// Build the spec tree of a document.
///
/// The root must be a mapping. Children that fail to build are dropped
/// with a warning and their siblings are kept.
pub fn build(
    document: &Document,
    config: &RunConfig,
    sink: &mut dyn DiagnosticSink,
) -> Result<TestNode, BuildError> {
    let location = document.location();
    Builder {
        document,
        config,
        sink,
    }
    .build_node(&document.root, location)
}

struct Builder<'a> {
    document: &'a Document,
    config: &'a RunConfig,
    sink: &'a mut dyn DiagnosticSink,
}

impl<'a> Builder<'a> {
    fn resolve<'n>(&self, node: &'n Node, location: &Location) -> Result<&'n Node, BuildError>
    where
        'a: 'n,
    {
        self.document
            .resolve(node, self.config.alias_depth)
            .map_err(|source| BuildError::Alias {
                location: location.clone(),
                source,
            })
    }

    fn expand(&self, node: &Node, location: &Location) -> Result<Node, BuildError> {
        self.document
            .expand(node, self.config.alias_depth)
            .map_err(|source| BuildError::Alias {
                location: location.clone(),
                source,
            })
    }

    fn build_node(&mut self, node: &'a Node, location: Location) -> Result<TestNode, BuildError> {
        let node = self.resolve(node, &location)?;
        let location = if location.mark.is_none() {
            location.with_mark(node.mark)
        } else {
            location
        };
        let entries = match &node.kind {
            NodeKind::Mapping(entries) => entries,
            _ => return Err(BuildError::NotAMapping { location }),
        };

        let mut test_node = TestNode::group(location, Vec::new());
        let mut content = None;

        for (key, value) in entries {
            let declaration = match key.as_str() {
                "flag" => {
                    test_node.flag = self.read_flag(value, &test_node.location)?;
                    continue;
                }
                "name" => {
                    test_node.name = self.read_name(value, &test_node.location)?;
                    continue;
                }
                "about" => continue,
                "content" => {
                    content = Some(value);
                    continue;
                }
                "box" => Declaration::Box(self.expand(value, &test_node.location)?),
                "input" => Declaration::Input(self.expand(value, &test_node.location)?),
                "matrix" => Declaration::Matrix(self.expand(value, &test_node.location)?),
                _ => Declaration::Data(key.clone(), self.expand(value, &test_node.location)?),
            };
            test_node.declarations.push(declaration);
        }

        if test_node.flag == Flag::Skip {
            return Ok(test_node);
        }

        if let Some(content) = content {
            test_node.children = self.build_children(content, &test_node.location)?;
        }

        Ok(test_node)
    }

    fn build_children(
        &mut self,
        content: &'a Node,
        location: &Location,
    ) -> Result<Vec<TestNode>, BuildError> {
        let content = self.resolve(content, location)?;
        let items = match &content.kind {
            NodeKind::Sequence(items) => items,
            NodeKind::Scalar(Scalar::Null) => return Ok(Vec::new()),
            _ => {
                return Err(BuildError::ContentNotSequence {
                    location: location.clone(),
                })
            }
        };

        let mut children = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            let child_location = location.child("content", None).child(idx, item.mark);
            match self.build_node(item, child_location) {
                Ok(child) => children.push(child),
                // the error already names its location
                Err(e) => self.sink.warn(None, &format!("{} -- this has been ignored", e)),
            }
        }
        Ok(children)
    }

    fn read_flag(&mut self, value: &'a Node, location: &Location) -> Result<Flag, BuildError> {
        match self.resolve(value, location)?.as_scalar() {
            Some(Scalar::Str(text)) => Ok(read_flag(text, location, &mut *self.sink)),
            Some(Scalar::Null) => Ok(Flag::None),
            _ => Err(BuildError::FlagNotString {
                location: location.clone(),
            }),
        }
    }

    fn read_name(&self, value: &'a Node, location: &Location) -> Result<Option<String>, BuildError> {
        match self.resolve(value, location)?.as_scalar() {
            Some(Scalar::Null) => Ok(None),
            Some(scalar) => Ok(Some(scalar.as_text())),
            None => Err(BuildError::NameNotScalar {
                location: location.clone(),
            }),
        }
    }
}
