use std::fmt::Write;

use crate::document::{Document, NodeId, NodeKind};
use crate::escape::escape;

/// Serializes the subtree under `id` on a single line.
///
/// The synthetic root serializes as its children only. Empty attribute
/// values are written as bare (boolean) attribute names.
pub fn to_markup(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, id, None, 0, &mut out);
    out
}

/// Same as [`to_markup`], one element per line with two-space indentation.
pub fn to_pretty_markup(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, id, Some(2), 0, &mut out);
    out
}

fn write_node(doc: &Document, id: NodeId, indent: Option<usize>, depth: usize, out: &mut String) {
    let Some(kind) = doc.kind(id) else {
        return;
    };
    let (tag, attributes) = match kind {
        NodeKind::Text(text) => {
            pad(indent, depth, out);
            out.push_str(&escape(text));
            newline(indent, out);
            return;
        }
        NodeKind::Element { tag, attributes } => (tag, attributes),
    };

    if id == doc.root() {
        for child in doc.children(id) {
            write_node(doc, *child, indent, depth, out);
        }
        return;
    }

    pad(indent, depth, out);
    out.push('<');
    out.push_str(tag);
    for (name, value) in attributes {
        if value.is_empty() {
            let _ = write!(out, " {name}");
        } else {
            let _ = write!(out, " {name}=\"{}\"", escape(value));
        }
    }
    out.push('>');

    let children = doc.children(id);
    if !children.is_empty() {
        newline(indent, out);
        for child in children {
            write_node(doc, *child, indent, depth + 1, out);
        }
        pad(indent, depth, out);
    }
    let _ = write!(out, "</{tag}>");
    newline(indent, out);
}

fn pad(indent: Option<usize>, depth: usize, out: &mut String) {
    if let Some(n) = indent {
        out.extend(std::iter::repeat_n(' ', n * depth));
    }
}

fn newline(indent: Option<usize>, out: &mut String) {
    if indent.is_some() {
        out.push('\n');
    }
}
