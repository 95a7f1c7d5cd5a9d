//! Common test utilities and helpers

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use xmltree::{Element, XMLNode};

pub const EXCITATORY_TEMPLATE: &str = r#"<?xml version="1.0"?>
<job name="simulate">
    <executable>neuron_sim</executable>
    <neuron kind="excitatory">
        <start_id>-1</start_id>
        <end_id>-1</end_id>
    </neuron>
</job>"#;

pub const INHIBITORY_TEMPLATE: &str = r#"<job><neuron><start_id/><end_id/></neuron></job>"#;

/// A template directory and an output directory inside one temp dir
pub struct Fixture {
    pub dir: TempDir,
    pub template_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let template_dir = dir.path().join("xml_templates");
        let output_dir = dir.path().join("xml_input4Hadoop");
        fs::create_dir_all(&template_dir).expect("Failed to create template directory");
        Self {
            dir,
            template_dir,
            output_dir,
        }
    }

    pub fn with_template(self, neuron_type: &str, content: &str) -> Self {
        fs::write(
            self.template_dir.join(format!("{}_template.xml", neuron_type)),
            content,
        )
        .expect("Failed to write template");
        self
    }

    pub fn with_global(self, content: &str) -> Self {
        fs::write(self.template_dir.join("global.xml"), content).expect("Failed to write global.xml");
        self
    }

    pub fn global_path(&self) -> PathBuf {
        self.template_dir.join("global.xml")
    }
}

/// Descriptor with the given unit and `(type, start, end)` ranges
pub fn global_xml(unit: i64, ranges: &[(&str, i64, i64)]) -> String {
    let ranges: String = ranges
        .iter()
        .map(|(neuron_type, start, end)| {
            format!(
                r#"    <range type="{}" start="{}" end="{}"/>
"#,
                neuron_type, start, end
            )
        })
        .collect();
    format!(
        "<global>\n    <total>120</total>\n    <channel>2</channel>\n    <unit>{}</unit>\n{}</global>\n",
        unit, ranges
    )
}

/// Sorted file names in a directory
pub fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("Failed to list directory")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

pub fn parse_file(path: &Path) -> Element {
    let bytes = fs::read(path).expect("Failed to read manifest");
    Element::parse(bytes.as_slice()).expect("Manifest is not valid XML")
}

/// Text and `channel` attribute of `neuron/<field>`
pub fn neuron_field(document: &Element, field: &str) -> (String, Option<String>) {
    let element = document
        .get_child("neuron")
        .and_then(|neuron| neuron.get_child(field))
        .expect("Manifest lacks the neuron field");
    let text = element
        .get_text()
        .map(|t| t.into_owned())
        .unwrap_or_default();
    (text, element.attributes.get("channel").cloned())
}

/// Number of direct `<global>` children
pub fn global_count(document: &Element) -> usize {
    document
        .children
        .iter()
        .filter(|node| matches!(node, XMLNode::Element(e) if e.name == "global"))
        .count()
}
