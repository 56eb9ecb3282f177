// Copyright 2026 the Reflex Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer-tree dumps.

use std::fmt::Write as _;
use std::io::{self, Write};

use kurbo::Size;
use reflex_core::layer::{LayerContent, LayerId, LayerStore};
use serde_json::{Value, json};

/// Renders the subtree rooted at `root` as indented text, one layer per line.
///
/// Each line shows the slot index, content kind, bounds, local translation,
/// and opacity, plus replicator and gradient parameters where present.
#[must_use]
pub fn render(store: &LayerStore, root: LayerId) -> String {
    let mut out = String::new();
    for (id, depth) in store.descendants(root) {
        let t = store.local_transform(id).translation();
        let b = store.bounds(id);
        let _ = write!(
            out,
            "{:indent$}#{} {} {:.1}x{:.1} at ({:.2}, {:.2}) opacity={:.2}",
            "",
            id.index(),
            store.content(id).kind(),
            b.width,
            b.height,
            t.x,
            t.y,
            store.local_opacity(id),
            indent = depth * 2,
        );
        match store.content(id) {
            LayerContent::Replicator(r) => {
                let _ = write!(out, " instances={} spacing={:.2}", r.instance_count, r.spacing());
            }
            LayerContent::Gradient(g) => {
                let _ = write!(out, " stops={}", g.stops.len());
            }
            LayerContent::Group | LayerContent::Fill(_) => {}
        }
        if store.flags(id).hidden {
            out.push_str(" hidden");
        }
        out.push('\n');
    }
    out
}

/// Writes [`render`] output to `writer`.
pub fn dump(store: &LayerStore, root: LayerId, writer: &mut dyn Write) -> io::Result<()> {
    writer.write_all(render(store, root).as_bytes())
}

/// Returns the subtree rooted at `root` as a nested JSON object.
#[must_use]
pub fn to_json(store: &LayerStore, root: LayerId) -> Value {
    let t = store.local_transform(root).translation();
    let children: Vec<Value> = store
        .children(root)
        .map(|child| to_json(store, child))
        .collect();
    let mut node = json!({
        "index": root.index(),
        "kind": store.content(root).kind(),
        "bounds": size_json(store.bounds(root)),
        "translation": [t.x, t.y],
        "opacity": store.local_opacity(root),
        "hidden": store.flags(root).hidden,
        "children": children,
    });
    if let LayerContent::Replicator(r) = store.content(root) {
        node["instances"] = json!(r.instance_count);
        node["spacing"] = json!(r.spacing());
    }
    node
}

fn size_json(size: Size) -> Value {
    json!([size.width, size.height])
}
