// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Global descriptor (`global.xml`) loading
//!
//! The descriptor looks like:
//!
//! ```xml
//! <global>
//!   <total>100</total>
//!   <channel>1</channel>
//!   <unit>40</unit>
//!   <range type="excitatory" start="0" end="79"/>
//!   <range type="inhibitory" start="80" end="99"/>
//! </global>
//! ```
//!
//! `total`, `channel` and `unit` are direct children of the root. `range`
//! elements are collected from anywhere in the tree, in document order.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::debug;
use xmltree::{Element, XMLNode};

use crate::{ConfigError, ConfigResult};

/// One declared range of neuron ids for a single neuron type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSpec {
    /// Selects `<neuron_type>_template.xml` and prefixes output file names
    pub neuron_type: String,
    pub start_id: i64,
    /// Inclusive
    pub end_id: i64,
}

impl RangeSpec {
    pub fn new(neuron_type: impl Into<String>, start_id: i64, end_id: i64) -> Self {
        Self {
            neuron_type: neuron_type.into(),
            start_id,
            end_id,
        }
    }

    /// Number of ids covered, or `None` when `end_id < start_id`
    pub fn id_count(&self) -> Option<i64> {
        if self.end_id < self.start_id {
            return None;
        }
        self.end_id.checked_sub(self.start_id)?.checked_add(1)
    }
}

/// Parsed global descriptor
#[derive(Debug, Clone)]
pub struct GlobalConfig {
    pub total_neurons: i64,
    pub num_channels: i64,
    /// Maximum number of neuron ids per partition
    pub partition_unit_size: i64,
    /// In declaration order
    pub ranges: Vec<RangeSpec>,
    /// The descriptor's root element, appended verbatim into every manifest
    pub root: Element,
}

/// Load and parse the global descriptor at `path`
///
/// # Errors
///
/// `ConfigError::IoError` if the file cannot be opened, `XmlError` if it is not
/// well-formed, `MissingRequired`/`InvalidValue` for absent or non-numeric fields.
pub fn load_global_config(path: impl AsRef<Path>) -> ConfigResult<GlobalConfig> {
    let path = path.as_ref();
    debug!("Loading global descriptor from {}", path.display());

    let file = File::open(path).map_err(|e| {
        ConfigError::IoError(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })?;
    parse_global_config(BufReader::new(file))
}

/// Parse a global descriptor from any reader
pub fn parse_global_config<R: Read>(reader: R) -> ConfigResult<GlobalConfig> {
    let root = Element::parse(reader)?;

    let total_neurons = scalar_child(&root, "total")?;
    let num_channels = scalar_child(&root, "channel")?;
    let partition_unit_size = scalar_child(&root, "unit")?;

    let mut range_elements = Vec::new();
    collect_descendants(&root, "range", &mut range_elements);

    let ranges = range_elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| parse_range(index, element))
        .collect::<ConfigResult<Vec<_>>>()?;

    debug!(
        "Parsed global descriptor: total={}, channel={}, unit={}, {} range(s)",
        total_neurons,
        num_channels,
        partition_unit_size,
        ranges.len()
    );

    Ok(GlobalConfig {
        total_neurons,
        num_channels,
        partition_unit_size,
        ranges,
        root,
    })
}

fn scalar_child(root: &Element, name: &str) -> ConfigResult<i64> {
    let child = root
        .get_child(name)
        .ok_or_else(|| ConfigError::MissingRequired(format!("<{}> element in global descriptor", name)))?;

    let text = child.get_text().unwrap_or_default();
    parse_integer(text.trim(), &format!("<{}>", name))
}

fn parse_range(index: usize, element: &Element) -> ConfigResult<RangeSpec> {
    let neuron_type = required_attribute(element, "type", index)?.to_string();
    let start = required_attribute(element, "start", index)?;
    let end = required_attribute(element, "end", index)?;

    let start_id = parse_integer(start.trim(), &format!("range #{} start", index))?;
    let end_id = parse_integer(end.trim(), &format!("range #{} end", index))?;

    Ok(RangeSpec {
        neuron_type,
        start_id,
        end_id,
    })
}

fn required_attribute<'a>(element: &'a Element, name: &str, index: usize) -> ConfigResult<&'a str> {
    element
        .attributes
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| ConfigError::MissingRequired(format!("attribute '{}' on range #{}", name, index)))
}

fn parse_integer(text: &str, field: &str) -> ConfigResult<i64> {
    text.parse::<i64>().map_err(|_| {
        ConfigError::InvalidValue(format!("{} must be an integer, got '{}'", field, text))
    })
}

/// Depth-first, document-order search for elements named `name`
fn collect_descendants<'a>(element: &'a Element, name: &str, out: &mut Vec<&'a Element>) {
    for child in &element.children {
        if let XMLNode::Element(child) = child {
            if child.name == name {
                out.push(child);
            }
            collect_descendants(child, name, out);
        }
    }
}
