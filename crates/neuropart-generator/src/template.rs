// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-type manifest templates
//!
//! A template is any XML document whose root has a `neuron` child holding
//! `start_id` and `end_id` elements:
//!
//! ```xml
//! <job>
//!   <neuron>
//!     <start_id/>
//!     <end_id/>
//!     <param_a>0.02</param_a>
//!   </neuron>
//! </job>
//! ```
//!
//! Stamping a partition replaces the text of both id elements and marks them
//! `channel="1"`. Everything else is carried through unchanged.

use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use neuropart_config::AppendMode;
use tracing::debug;
use xmltree::{Element, XMLNode};

use crate::partition::Partition;
use crate::{GeneratorError, Result};

const NEURON_ELEMENT: &str = "neuron";
const START_ID_ELEMENT: &str = "start_id";
const END_ID_ELEMENT: &str = "end_id";

/// Attribute set on both id elements
pub const CHANNEL_ATTRIBUTE: &str = "channel";
/// Only channel 1 ids are stamped; other channels are static template content
pub const STAMPED_CHANNEL: &str = "1";

/// `<type>_template.xml`
pub fn template_file_name(neuron_type: &str) -> String {
    format!("{}_template.xml", neuron_type)
}

/// `<type>_<start>to<end>.xml`
pub fn output_file_name(neuron_type: &str, partition: &Partition) -> String {
    format!("{}_{}to{}.xml", neuron_type, partition.start, partition.end)
}

/// Parsed template for one neuron type
#[derive(Debug, Clone)]
pub struct NeuronTemplate {
    neuron_type: String,
    path: PathBuf,
    root: Element,
}

impl NeuronTemplate {
    /// Load `<template_dir>/<neuron_type>_template.xml`
    ///
    /// # Errors
    ///
    /// `TemplateNotFound` if the file does not exist, `Xml` if it does not parse,
    /// `MalformedTemplate` if it lacks `neuron/start_id` or `neuron/end_id`.
    pub fn load(template_dir: &Path, neuron_type: &str) -> Result<Self> {
        let path = template_dir.join(template_file_name(neuron_type));
        debug!("Loading template {}", path.display());

        let file = File::open(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => GeneratorError::TemplateNotFound {
                neuron_type: neuron_type.to_string(),
                path: path.clone(),
            },
            _ => GeneratorError::io(&path, e),
        })?;

        let root = Element::parse(BufReader::new(file)).map_err(|e| GeneratorError::Xml {
            path: path.clone(),
            message: e.to_string(),
        })?;

        Self::from_element(neuron_type, path, root)
    }

    /// Wrap an already parsed document; `path` is only used in error messages
    pub fn from_element(neuron_type: &str, path: impl Into<PathBuf>, root: Element) -> Result<Self> {
        let path = path.into();
        check_structure(&root, &path)?;
        Ok(Self {
            neuron_type: neuron_type.to_string(),
            path,
            root,
        })
    }

    pub fn neuron_type(&self) -> &str {
        &self.neuron_type
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Fresh copy of the template with `partition` stamped on it
    pub fn stamp(&self, partition: &Partition) -> Result<Element> {
        let mut document = self.root.clone();
        stamp_in_place(&mut document, partition, &self.path)?;
        Ok(document)
    }

    /// Stamped copy with exactly one copy of `global_root` appended
    pub fn instantiate(&self, partition: &Partition, global_root: &Element) -> Result<Element> {
        let mut document = self.stamp(partition)?;
        document.children.push(XMLNode::Element(global_root.clone()));
        Ok(document)
    }

    /// Produces the manifests of one range under the given append mode
    pub fn instantiator<'a>(
        &'a self,
        mode: AppendMode,
        global_root: &'a Element,
    ) -> TemplateInstantiator<'a> {
        TemplateInstantiator {
            template: self,
            global_root,
            mode,
            document: self.root.clone(),
        }
    }
}

/// Builds successive partition manifests for one range
///
/// With [`AppendMode::Once`] every manifest is an independent copy of the
/// template. With [`AppendMode::Cumulative`] a single working tree is
/// re-stamped for each partition and the global root is appended again each
/// time, so the k-th manifest holds k copies of it.
pub struct TemplateInstantiator<'a> {
    template: &'a NeuronTemplate,
    global_root: &'a Element,
    mode: AppendMode,
    document: Element,
}

impl TemplateInstantiator<'_> {
    pub fn mode(&self) -> AppendMode {
        self.mode
    }

    /// Manifest for the next partition
    pub fn instantiate(&mut self, partition: &Partition) -> Result<&Element> {
        match self.mode {
            AppendMode::Once => {
                self.document = self.template.instantiate(partition, self.global_root)?;
            }
            AppendMode::Cumulative => {
                stamp_in_place(&mut self.document, partition, &self.template.path)?;
                self.document
                    .children
                    .push(XMLNode::Element(self.global_root.clone()));
            }
        }
        Ok(&self.document)
    }
}

fn check_structure(root: &Element, path: &Path) -> Result<()> {
    let neuron = root
        .get_child(NEURON_ELEMENT)
        .ok_or_else(|| missing(path, NEURON_ELEMENT))?;

    for name in [START_ID_ELEMENT, END_ID_ELEMENT] {
        if neuron.get_child(name).is_none() {
            return Err(missing(path, &format!("{}/{}", NEURON_ELEMENT, name)));
        }
    }
    Ok(())
}

fn stamp_in_place(root: &mut Element, partition: &Partition, path: &Path) -> Result<()> {
    let neuron = root
        .get_mut_child(NEURON_ELEMENT)
        .ok_or_else(|| missing(path, NEURON_ELEMENT))?;

    set_id_field(neuron, START_ID_ELEMENT, partition.start, path)?;
    set_id_field(neuron, END_ID_ELEMENT, partition.end, path)?;
    Ok(())
}

fn set_id_field(neuron: &mut Element, name: &str, value: i64, path: &Path) -> Result<()> {
    let field = neuron
        .get_mut_child(name)
        .ok_or_else(|| missing(path, &format!("{}/{}", NEURON_ELEMENT, name)))?;

    // Only the text ahead of the first child element is replaced; tails stay.
    let leading = field
        .children
        .iter()
        .take_while(|node| matches!(node, XMLNode::Text(_) | XMLNode::CData(_)))
        .count();
    field.children.drain(..leading);
    field.children.insert(0, XMLNode::Text(value.to_string()));
    field
        .attributes
        .insert(CHANNEL_ATTRIBUTE.to_string(), STAMPED_CHANNEL.to_string());
    Ok(())
}

fn missing(path: &Path, element: &str) -> GeneratorError {
    GeneratorError::MalformedTemplate {
        path: path.to_path_buf(),
        element: element.to_string(),
    }
}
