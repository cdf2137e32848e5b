//! YAML text to spec documents.

use crate::errors::LoadError;
use crate::file::File;
use specimen::{BuildError, Document, Location, Mark, Node, NodeKind, Scalar};
use std::collections::HashMap;
use std::fs;
use std::mem;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::{Marker, TScalarStyle};
use yaml_rust2::Yaml;

/// Parse every document of a (possibly multi-document) YAML stream.
///
/// Every node carries the line and column it starts at. Anchors are kept
/// in the document's anchor table and aliases stay alias nodes, so they
/// are resolved by the builder under the configured depth bound.
pub fn load_documents(file: &File) -> Result<Vec<Document>, LoadError> {
    let mut receiver = TreeReceiver::new(file.path.as_str());

    Parser::new(file.content.chars())
        .load(&mut receiver, true)
        .map_err(|source| LoadError::Yaml {
            path: file.path.clone(),
            source,
        })?;

    if let Some(error) = receiver.error {
        return Err(error);
    }

    log::debug!("{}: loaded {} document(s)", file.path, receiver.documents.len());
    Ok(receiver.documents)
}

enum Frame {
    Sequence {
        items: Vec<Node>,
        anchor: usize,
        mark: Mark,
    },
    Mapping {
        entries: Vec<(String, Node)>,
        key: Option<String>,
        anchor: usize,
        mark: Mark,
    },
}

/// Builds [`Node`] trees from parser events.
struct TreeReceiver {
    path: Arc<str>,
    stack: Vec<Frame>,
    root: Option<Node>,
    anchors: HashMap<String, Node>,
    documents: Vec<Document>,
    error: Option<LoadError>,
}

impl TreeReceiver {
    fn new(path: &str) -> Self {
        Self {
            path: Arc::from(path),
            stack: Vec::new(),
            root: None,
            anchors: HashMap::new(),
            documents: Vec::new(),
            error: None,
        }
    }

    /// True when the next complete node is a mapping key.
    fn expects_key(&self) -> bool {
        matches!(self.stack.last(), Some(Frame::Mapping { key: None, .. }))
    }

    fn reject_key(&mut self, mark: Mark) {
        let location = Location::new(Arc::clone(&self.path), "").with_mark(Some(mark));
        self.error = Some(BuildError::NonStringKey { location }.into());
    }

    fn finish(&mut self, node: Node, anchor: usize) {
        if anchor != 0 {
            self.anchors.insert(anchor.to_string(), node.clone());
        }

        match self.stack.last_mut() {
            None => self.root = Some(node),
            Some(Frame::Sequence { items, .. }) => items.push(node),
            Some(Frame::Mapping { entries, key, .. }) => {
                if let Some(key) = key.take() {
                    entries.push((key, node));
                }
            }
        }
    }
}

impl MarkedEventReceiver for TreeReceiver {
    fn on_event(&mut self, event: Event, marker: Marker) {
        if self.error.is_some() {
            return;
        }
        let mark = to_mark(marker);

        match event {
            Event::DocumentStart => {
                self.stack.clear();
                self.root = None;
                self.anchors.clear();
            }
            Event::DocumentEnd => {
                if let Some(root) = self.root.take() {
                    let mut document = Document::new(Arc::clone(&self.path), root);
                    document.anchors = mem::take(&mut self.anchors);
                    self.documents.push(document);
                }
            }
            Event::Scalar(text, style, anchor, ..) => {
                if self.expects_key() {
                    if let Some(Frame::Mapping { key, .. }) = self.stack.last_mut() {
                        *key = Some(text);
                    }
                    return;
                }
                let node = Node {
                    kind: NodeKind::Scalar(resolve_scalar(text, style)),
                    mark: Some(mark),
                };
                self.finish(node, anchor);
            }
            Event::Alias(anchor) => {
                if self.expects_key() {
                    self.reject_key(mark);
                    return;
                }
                let node = Node {
                    kind: NodeKind::Alias(anchor.to_string()),
                    mark: Some(mark),
                };
                self.finish(node, 0);
            }
            Event::SequenceStart(anchor, ..) => {
                if self.expects_key() {
                    self.reject_key(mark);
                    return;
                }
                self.stack.push(Frame::Sequence {
                    items: Vec::new(),
                    anchor,
                    mark,
                });
            }
            Event::MappingStart(anchor, ..) => {
                if self.expects_key() {
                    self.reject_key(mark);
                    return;
                }
                self.stack.push(Frame::Mapping {
                    entries: Vec::new(),
                    key: None,
                    anchor,
                    mark,
                });
            }
            Event::SequenceEnd | Event::MappingEnd => {
                let (kind, anchor, mark) = match self.stack.pop() {
                    Some(Frame::Sequence {
                        items,
                        anchor,
                        mark,
                    }) => (NodeKind::Sequence(items), anchor, mark),
                    Some(Frame::Mapping {
                        entries,
                        anchor,
                        mark,
                        ..
                    }) => (NodeKind::Mapping(entries), anchor, mark),
                    None => return,
                };
                self.finish(
                    Node {
                        kind,
                        mark: Some(mark),
                    },
                    anchor,
                );
            }
            _ => {}
        }
    }
}

/// Parser markers count lines from 1 and columns from 0.
fn to_mark(marker: Marker) -> Mark {
    Mark {
        line: marker.line(),
        column: marker.col() + 1,
    }
}

/// Core schema typing for plain scalars; quoted and block scalars stay text.
fn resolve_scalar(text: String, style: TScalarStyle) -> Scalar {
    if style != TScalarStyle::Plain {
        return Scalar::Str(text);
    }
    match Yaml::from_str(&text) {
        Yaml::Null => Scalar::Null,
        Yaml::Boolean(b) => Scalar::Bool(b),
        Yaml::Integer(i) => Scalar::Int(i),
        real @ Yaml::Real(_) => Scalar::Float(real.as_f64().unwrap_or(f64::NAN)),
        _ => Scalar::Str(text),
    }
}

/// Find every `*.yaml` / `*.yml` file below `dir`, sorted by path.
pub fn find_spec_files(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let mut paths = Vec::new();
    find_recursive(dir, &mut paths)?;
    paths.sort();
    Ok(paths)
}

fn find_recursive(dir: &Path, paths: &mut Vec<PathBuf>) -> Result<(), LoadError> {
    if !dir.is_dir() {
        return Ok(());
    }

    let io_error = |source: std::io::Error| LoadError::Io {
        path: dir.display().to_string(),
        source,
    };

    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();

        if path.is_dir() {
            find_recursive(&path, paths)?;
        } else if path
            .extension()
            .map_or(false, |e| e == "yaml" || e == "yml")
        {
            paths.push(path);
        }
    }

    Ok(())
}

/// Read every spec file below `dir`.
pub fn load_dir(dir: &Path) -> Result<Vec<File>, LoadError> {
    find_spec_files(dir)?
        .iter()
        .map(File::read_local)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(text: &str) -> Vec<Document> {
        load_documents(&File::virtual_dedent("spec.yaml", text)).unwrap()
    }

    fn kind<'a>(node: &'a Node, key: &str) -> Option<&'a NodeKind> {
        node.get(key).map(|n| &n.kind)
    }

    #[test]
    fn test_scalars_and_structure() {
        let documents = load(
            "
            name: zoo
            leg: 4
            weight: 1.5
            tame: true
            nothing: ~
            empty:
            quoted: '4'
            content:
              - animal: [deer, pony]
            ",
        );
        assert_eq!(documents.len(), 1);

        let root = &documents[0].root;
        assert_eq!(kind(root, "name"), Some(&NodeKind::Scalar(Scalar::Str("zoo".into()))));
        assert_eq!(kind(root, "leg"), Some(&NodeKind::Scalar(Scalar::Int(4))));
        assert_eq!(kind(root, "weight"), Some(&NodeKind::Scalar(Scalar::Float(1.5))));
        assert_eq!(kind(root, "tame"), Some(&NodeKind::Scalar(Scalar::Bool(true))));
        assert_eq!(kind(root, "nothing"), Some(&NodeKind::Scalar(Scalar::Null)));
        assert_eq!(kind(root, "empty"), Some(&NodeKind::Scalar(Scalar::Null)));
        assert_eq!(kind(root, "quoted"), Some(&NodeKind::Scalar(Scalar::Str("4".into()))));

        let content = root.get("content").unwrap().to_value().unwrap();
        let expected: serde_yaml::Value = serde_yaml::from_str("[{animal: [deer, pony]}]").unwrap();
        assert_eq!(content, expected);
    }

    #[test]
    fn test_nodes_carry_line_and_column() {
        let documents = load(
            "
            name: zoo
            content:
              - animal: deer
              - animal: pony
            ",
        );
        let root = &documents[0].root;
        assert_eq!(root.mark, Some(Mark { line: 1, column: 1 }));
        assert_eq!(root.get("name").unwrap().mark, Some(Mark { line: 1, column: 7 }));

        match &root.get("content").unwrap().kind {
            NodeKind::Sequence(items) => {
                assert_eq!(items[0].mark, Some(Mark { line: 3, column: 5 }));
                assert_eq!(items[1].mark, Some(Mark { line: 4, column: 5 }));
            }
            other => panic!("expected a sequence, got {:?}", other),
        }
    }

    #[test]
    fn test_key_order_is_kept() {
        let documents = load("z: 1\na: 2\nm: 3\n");
        match &documents[0].root.kind {
            NodeKind::Mapping(entries) => {
                let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
                assert_eq!(keys, vec!["z", "a", "m"]);
            }
            other => panic!("expected a mapping, got {:?}", other),
        }
    }

    #[test]
    fn test_multi_document_stream() {
        let documents = load("a: 1\n---\nb: 2\n");
        assert_eq!(documents.len(), 2);
        assert!(documents[1].root.get("b").is_some());
        assert_eq!(documents[1].root.mark.map(|m| m.line), Some(3));
    }

    #[test]
    fn test_aliases_resolve_through_anchor_table() {
        let documents = load(
            "
            base: &book {title: aleph, size: 90}
            copy: *book
            ",
        );
        let document = &documents[0];
        let copy = document.root.get("copy").unwrap();
        assert!(matches!(copy.kind, NodeKind::Alias(_)));
        assert_eq!(document.anchors.len(), 1);

        let expanded = document.expand(copy, 90).unwrap();
        assert_eq!(&expanded, document.root.get("base").unwrap());
    }

    #[test]
    fn test_non_scalar_key_is_rejected() {
        let result = load_documents(&File::virtual_file("spec.yaml", "a: 0\n? [a, b]\n: 1\n"));
        match result {
            Err(LoadError::Build(BuildError::NonStringKey { location })) => {
                assert_eq!(location.mark.map(|m| m.line), Some(2));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_yaml() {
        let result = load_documents(&File::virtual_file("spec.yaml", "a: [1, 2\n"));
        let error = result.unwrap_err();
        assert!(matches!(error, LoadError::Yaml { .. }));
        assert_eq!(error.path(), "spec.yaml");
    }

    #[test]
    fn test_load_dir_is_recursive_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.yaml"), "b: 1\n").unwrap();
        fs::write(dir.path().join("nested").join("a.yml"), "a: 1\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let files = load_dir(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|f| {
                Path::new(&f.path)
                    .strip_prefix(dir.path())
                    .unwrap()
                    .display()
                    .to_string()
            })
            .collect();
        assert_eq!(names.len(), 2);
        assert_eq!(files[0].content, "b: 1\n");
        assert!(names[1].ends_with("a.yml"));
    }
}
