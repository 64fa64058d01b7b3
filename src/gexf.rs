//! Reading and writing weighted graphs as GEXF documents.
//!
//! Only the subset of GEXF 1.2 needed for an undirected, weighted graph is produced: one `<node>`
//! per user (its label is the user's name) and one `<edge>` per relationship carrying a `weight`
//! attribute. Loading is more lenient and ignores anything it doesn't understand, so documents
//! written by other GEXF tools can be read as long as they describe an undirected graph.

use std::path::Path;

use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, Event},
    Reader, Writer,
};
use tracing::{info, warn};

use crate::{
    edge::Edge,
    error::{Error, Result},
    graph::WeightedGraph,
    persist,
};

const GEXF_NAMESPACE: &str = "http://gexf.net/1.2";
const GEXF_VERSION: &str = "1.2";

/// Edges without a `weight` attribute get GEXF's default weight.
const DEFAULT_WEIGHT: f64 = 1.0;

/// Serialises a graph as an indented GEXF document.
///
/// Nodes and edges are written in sorted order, so equal graphs always produce identical
/// documents.
pub fn to_string(graph: &WeightedGraph) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("gexf").with_attributes([
        ("xmlns", GEXF_NAMESPACE),
        ("version", GEXF_VERSION),
    ])))?;
    writer.write_event(Event::Start(BytesStart::new("graph").with_attributes([
        ("defaultedgetype", "undirected"),
        ("mode", "static"),
    ])))?;

    writer.write_event(Event::Start(BytesStart::new("nodes")))?;
    for node in graph.nodes() {
        writer.write_event(Event::Empty(
            BytesStart::new("node").with_attributes([("id", node), ("label", node)]),
        ))?;
    }
    writer.write_event(Event::End(BytesEnd::new("nodes")))?;

    writer.write_event(Event::Start(BytesStart::new("edges")))?;
    for (id, (edge, weight)) in graph.sorted_edges().into_iter().enumerate() {
        let (id, weight) = (id.to_string(), weight.to_string());
        writer.write_event(Event::Empty(BytesStart::new("edge").with_attributes([
            ("id", id.as_str()),
            ("source", edge.source().as_str()),
            ("target", edge.target().as_str()),
            ("weight", weight.as_str()),
        ])))?;
    }
    writer.write_event(Event::End(BytesEnd::new("edges")))?;

    writer.write_event(Event::End(BytesEnd::new("graph")))?;
    writer.write_event(Event::End(BytesEnd::new("gexf")))?;

    String::from_utf8(writer.into_inner()).map_err(|e| Error::InvalidGraph(e.to_string()))
}

/// Parses a GEXF document into a graph.
///
/// Edges may reference nodes that were never declared, those nodes are added implicitly. A pair
/// connected more than once keeps its first edge and self-loops are skipped, both with a warning.
/// Weights must be finite and non-negative.
///
/// # Examples
///
/// ```
/// use mutuals::gexf;
///
/// let graph = gexf::from_str(
///     r#"<gexf version="1.2">
///          <graph defaultedgetype="undirected">
///            <nodes><node id="a" label="a"/></nodes>
///            <edges><edge id="0" source="a" target="b" weight="0.5"/></edges>
///          </graph>
///        </gexf>"#,
/// )
/// .unwrap();
///
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.weight("a", "b"), Some(0.5));
/// ```
pub fn from_str(text: &str) -> Result<WeightedGraph> {
    let mut reader = Reader::from_str(text);
    reader.trim_text(true);

    let mut graph = WeightedGraph::new();
    let mut found_root = false;
    // Elements opened but not yet closed.
    let mut depth = 0usize;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                return Err(Error::InvalidGraph(format!(
                    "malformed XML at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
        };

        match event {
            Event::Start(_) => depth += 1,
            Event::End(_) => depth = depth.saturating_sub(1),
            _ => {}
        }

        match event {
            Event::Start(element) | Event::Empty(element) => match element.local_name().as_ref() {
                b"gexf" => found_root = true,
                b"graph" => {
                    if attribute(&element, "defaultedgetype")?.as_deref() == Some("directed") {
                        return Err(Error::InvalidGraph("directed graphs are not supported".into()));
                    }
                }
                b"node" => {
                    graph.add_node(identifier(&element, "id")?);
                }
                b"edge" => read_edge(&element, &mut graph)?,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    if !found_root {
        return Err(Error::InvalidGraph("missing <gexf> root element".into()));
    }
    if depth > 0 {
        return Err(Error::InvalidGraph(format!(
            "truncated document, {depth} element(s) left open"
        )));
    }

    Ok(graph)
}

/// Loads a graph from a GEXF file, failing with [`Error::GraphNotFound`] if it's absent.
pub fn load(path: impl AsRef<Path>) -> Result<WeightedGraph> {
    let path = path.as_ref();
    let text = persist::read_document(path, |path| Error::GraphNotFound { path })?;
    let graph = from_str(&text)?;

    info!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "loaded graph"
    );

    Ok(graph)
}

/// Writes a graph to a GEXF file, replacing any previous version in one step.
pub fn save(graph: &WeightedGraph, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    persist::write_document(path, to_string(graph)?.as_bytes())?;

    info!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "saved graph"
    );

    Ok(())
}

//
// Helpers
//

fn read_edge(element: &BytesStart, graph: &mut WeightedGraph) -> Result<()> {
    let source = identifier(element, "source")?;
    let target = identifier(element, "target")?;

    if attribute(element, "type")?.as_deref() == Some("directed") {
        return Err(Error::InvalidGraph(format!(
            "edge {source}-{target}: directed edges are not supported"
        )));
    }

    let weight = match attribute(element, "weight")? {
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::InvalidGraph(format!("edge {source}-{target}: bad weight {raw:?}")))?,
        None => DEFAULT_WEIGHT,
    };
    if !weight.is_finite() || weight < 0.0 {
        return Err(Error::InvalidGraph(format!(
            "edge {source}-{target}: weight {weight} is not a non-negative finite number"
        )));
    }

    let edge = Edge::new(source, target);
    if edge.is_loop() {
        warn!(node = %edge.source(), "skipping self-loop");
    } else if !graph.insert(edge.clone(), weight) {
        warn!(source = %edge.source(), target = %edge.target(), "skipping duplicate edge");
    }

    Ok(())
}

/// Returns a required, non-empty attribute.
fn identifier(element: &BytesStart, name: &str) -> Result<String> {
    match attribute(element, name)? {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::InvalidGraph(format!(
            "<{}> without a {name} attribute",
            String::from_utf8_lossy(element.local_name().as_ref())
        ))),
    }
}

/// Returns the unescaped value of an attribute, if present.
fn attribute(element: &BytesStart, name: &str) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| Error::InvalidGraph(e.to_string()))?;
        if attr.key.local_name().as_ref() == name.as_bytes() {
            let value = attr
                .unescape_value()
                .map_err(|e| Error::InvalidGraph(e.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }

    Ok(None)
}
