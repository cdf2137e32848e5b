//! Inheritance of data down the spec tree.
//!
//! Each node clones its parent's matrix and applies its own declarations
//! on top, in the order the document lists them. `input` and `matrix`
//! contribute their entries at the position of the key itself.
//! Re-declaring a key replaces its values and moves it to the most recent
//! position.

use crate::document::{Node, NodeKind};
use crate::errors::{PopulateError, PopulateErrors};
use crate::flag::Flag;
use crate::multimap::OrderedMultiMap;
use crate::node::{Declaration, TestNode};
use serde_yaml::Value;

impl TestNode {
    /// Fill `resolved_matrix` for this node and its whole subtree.
    ///
    /// Errors are collected across keys and children rather than stopping
    /// at the first one. Skipped nodes are left untouched.
    pub fn populate(&mut self, inherited: &OrderedMultiMap) -> Result<(), PopulateErrors> {
        let mut errors = PopulateErrors::default();
        self.populate_into(inherited, &mut errors);
        errors.into_result()
    }

    fn populate_into(&mut self, inherited: &OrderedMultiMap, errors: &mut PopulateErrors) {
        if self.flag == Flag::Skip {
            return;
        }

        let mut matrix = inherited.clone();

        for declaration in &self.declarations {
            let messages = match declaration {
                Declaration::Data(key, value) => match data_values(key, value) {
                    Ok(values) => {
                        matrix.set(key.as_str(), values);
                        Vec::new()
                    }
                    Err(message) => vec![message],
                },
                Declaration::Box(codebox) => match codebox.as_scalar() {
                    Some(scalar) => {
                        matrix.set("box", vec![Value::String(scalar.as_text())]);
                        Vec::new()
                    }
                    None => vec![format!(
                        "unexpected value kind ({}) for key box: expected a scalar",
                        codebox.kind_name()
                    )],
                },
                Declaration::Input(input) => {
                    apply_input(&mut matrix, input).err().into_iter().collect()
                }
                Declaration::Matrix(axes) => apply_matrix(&mut matrix, axes),
            };
            for message in messages {
                errors.push(PopulateError::new(&self.location, message));
            }
        }

        self.resolved_matrix = matrix;

        let resolved = &self.resolved_matrix;
        for child in self.children.iter_mut() {
            child.populate_into(resolved, errors);
        }
    }
}

/// Candidate values of a plain data key.
fn data_values(key: &str, value: &Node) -> Result<Vec<Value>, String> {
    match &value.kind {
        NodeKind::Scalar(scalar) => Ok(vec![scalar.to_value()]),
        NodeKind::Sequence(items) => {
            if items.is_empty() {
                return Err(format!("empty sequence for key {}", key));
            }
            items
                .iter()
                .map(|item| match item.as_scalar() {
                    Some(scalar) => Ok(scalar.to_value()),
                    None => Err(format!(
                        "unexpected value kind ({}) in the sequence of key {}",
                        item.kind_name(),
                        key
                    )),
                })
                .collect()
        }
        _ => Err(format!(
            "unexpected value kind ({}) for key {}",
            value.kind_name(),
            key
        )),
    }
}

fn apply_input(matrix: &mut OrderedMultiMap, input: &Node) -> Result<(), String> {
    let entries = match &input.kind {
        NodeKind::Mapping(entries) => entries,
        NodeKind::Scalar(scalar) if scalar.to_value().is_null() => return Ok(()),
        _ => {
            return Err(format!(
                "unexpected value kind ({}) for key input: expected a mapping",
                input.kind_name()
            ))
        }
    };

    for (key, value) in entries {
        let value = value
            .to_value()
            .ok_or_else(|| format!("unresolved alias under input key {}", key))?;
        matrix.set(key.as_str(), vec![value]);
    }
    Ok(())
}

fn apply_matrix(matrix: &mut OrderedMultiMap, axes: &Node) -> Vec<String> {
    let entries = match &axes.kind {
        NodeKind::Mapping(entries) => entries,
        _ => {
            return vec![format!(
                "unexpected value kind ({}) for key matrix: expected a mapping",
                axes.kind_name()
            )]
        }
    };

    let mut messages = Vec::new();
    for (key, value) in entries {
        let items = match &value.kind {
            NodeKind::Sequence(items) if !items.is_empty() => items,
            _ => {
                messages.push(format!(
                    "matrix axis {} must be a non-empty sequence",
                    key
                ));
                continue;
            }
        };
        match items.iter().map(Node::to_value).collect::<Option<Vec<_>>>() {
            Some(values) => matrix.set(key.as_str(), values),
            None => messages.push(format!("unresolved alias in matrix axis {}", key)),
        }
    }
    messages
}
