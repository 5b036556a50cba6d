use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::graph::builder::VisualModel;
use crate::graph::graphml::{
    GraphDocument, KEY_AUTHOR, KEY_EDGE_TYPE, KEY_LABEL, KEY_NODE_TYPE, KEY_SUBSCRIBERS, KEY_TITLE,
};

/// Export the render-ready model to a JSON file
pub fn export_model_json(model: &VisualModel, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, model).context("Failed to write JSON")?;

    Ok(())
}

/// Export the cleaned document to GraphML, using the same data keys the
/// parser reads. Edges with an unknown endpoint are left out.
pub fn export_graphml(document: &GraphDocument, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_graphml(document, &mut writer)?;
    writer.flush()?;
    Ok(())
}

fn write_graphml(document: &GraphDocument, writer: &mut impl Write) -> Result<()> {
    writeln!(writer, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        writer,
        r#"<graphml xmlns="http://graphml.graphdrawing.org/xmlns">"#
    )?;

    let keys = [
        (KEY_NODE_TYPE, "node", "type", "string"),
        (KEY_LABEL, "node", "label", "string"),
        (KEY_SUBSCRIBERS, "node", "subscribers", "double"),
        (KEY_TITLE, "node", "title", "string"),
        (KEY_AUTHOR, "node", "author", "string"),
        (KEY_EDGE_TYPE, "edge", "type", "string"),
    ];
    for (id, target, name, kind) in keys {
        writeln!(
            writer,
            r#"  <key id="{}" for="{}" attr.name="{}" attr.type="{}"></key>"#,
            id, target, name, kind
        )?;
    }

    writeln!(writer, r#"  <graph id="G" edgedefault="directed">"#)?;

    for node in &document.nodes {
        writeln!(writer, r#"    <node id="{}">"#, escape_xml(&node.id))?;
        write_data(writer, KEY_NODE_TYPE, &node.node_type)?;
        write_data(writer, KEY_LABEL, &node.label)?;
        if let Some(weight) = node.weight {
            write_data(writer, KEY_SUBSCRIBERS, &weight.to_string())?;
        }
        if let Some(title) = &node.title {
            write_data(writer, KEY_TITLE, title)?;
        }
        if let Some(author) = &node.author {
            write_data(writer, KEY_AUTHOR, author)?;
        }
        writeln!(writer, r#"    </node>"#)?;
    }

    for (index, edge) in document.resolved_edges() {
        writeln!(
            writer,
            r#"    <edge id="e{}" source="{}" target="{}">"#,
            index,
            escape_xml(&edge.source),
            escape_xml(&edge.target)
        )?;
        write_data(writer, KEY_EDGE_TYPE, &edge.edge_type)?;
        writeln!(writer, r#"    </edge>"#)?;
    }

    writeln!(writer, r#"  </graph>"#)?;
    writeln!(writer, r#"</graphml>"#)?;

    Ok(())
}

fn write_data(writer: &mut impl Write, key: &str, value: &str) -> Result<()> {
    if !value.is_empty() {
        writeln!(
            writer,
            r#"      <data key="{}">{}</data>"#,
            key,
            escape_xml(value)
        )?;
    }
    Ok(())
}

/// Escape special characters for XML
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
