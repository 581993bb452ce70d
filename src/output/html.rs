//! Interactive HTML visualization of the link graph
//!
//! The page is a single standalone file: an SVG drawing of the laid-out graph
//! plus a short script for wheel zoom, drag pan and click-to-highlight.

use crate::output::graph::{LinkGraph, Point};
use crate::output::traits::OutputResult;
use serde::Serialize;

/// Drawing area side length, in SVG user units
const CANVAS_SIZE: f64 = 1000.0;

/// Margin kept free around the layout
const CANVAS_MARGIN: f64 = 60.0;

const NODE_RADIUS: f64 = 6.0;

/// Graph data embedded for the script
#[derive(Serialize)]
struct GraphData<'a> {
    nodes: Vec<&'a str>,
    edges: Vec<(usize, usize)>,
}

const STYLE: &str = r#"
body { margin: 0; font-family: sans-serif; background: #fafafa; }
h1 { font-size: 18px; margin: 12px 16px; }
#canvas { width: 100vw; height: calc(100vh - 52px); cursor: grab; }
#canvas.dragging { cursor: grabbing; }
line.edge { stroke: #9aa5b1; stroke-width: 1; }
line.edge.active { stroke: #d9480f; stroke-width: 2; }
circle.node { fill: #1c7ed6; stroke: #fff; stroke-width: 1.5; cursor: pointer; }
circle.node.active { fill: #d9480f; }
text.label { font-size: 9px; fill: #343a40; pointer-events: none; }
"#;

const SCRIPT: &str = r#"
(function () {
  const data = JSON.parse(document.getElementById('graph-data').textContent);
  const svg = document.getElementById('canvas');
  const view = { x: 0, y: 0, w: SIZE, h: SIZE };
  const apply = () => svg.setAttribute('viewBox', `${view.x} ${view.y} ${view.w} ${view.h}`);

  svg.addEventListener('wheel', (event) => {
    event.preventDefault();
    const factor = event.deltaY > 0 ? 1.1 : 0.9;
    const rect = svg.getBoundingClientRect();
    const px = view.x + (event.clientX - rect.left) / rect.width * view.w;
    const py = view.y + (event.clientY - rect.top) / rect.height * view.h;
    view.x = px - (px - view.x) * factor;
    view.y = py - (py - view.y) * factor;
    view.w *= factor;
    view.h *= factor;
    apply();
  }, { passive: false });

  let drag = null;
  svg.addEventListener('mousedown', (event) => {
    drag = { x: event.clientX, y: event.clientY };
    svg.classList.add('dragging');
  });
  window.addEventListener('mouseup', () => {
    drag = null;
    svg.classList.remove('dragging');
  });
  window.addEventListener('mousemove', (event) => {
    if (!drag) return;
    const rect = svg.getBoundingClientRect();
    view.x -= (event.clientX - drag.x) / rect.width * view.w;
    view.y -= (event.clientY - drag.y) / rect.height * view.h;
    drag = { x: event.clientX, y: event.clientY };
    apply();
  });

  const nodes = svg.querySelectorAll('circle.node');
  const edges = svg.querySelectorAll('line.edge');
  nodes.forEach((node) => node.addEventListener('click', (event) => {
    event.stopPropagation();
    const id = Number(node.dataset.id);
    nodes.forEach((n) => n.classList.toggle('active', Number(n.dataset.id) === id));
    edges.forEach((e, i) => {
      const [src, dst] = data.edges[i];
      e.classList.toggle('active', src === id || dst === id);
    });
  }));
})();
"#;

/// Renders the graph and its layout as a standalone HTML page
///
/// # Arguments
///
/// * `graph` - The graph to draw
/// * `layout` - One position per node, as returned by `LinkGraph::spring_layout`
/// * `run_id` - Run name shown in the page title
pub fn render_html(graph: &LinkGraph, layout: &[Point], run_id: &str) -> OutputResult<String> {
    let title = format!("Interactive Visualization of {}", run_id);
    let nodes = graph.nodes();
    let edges = graph.edge_indices();
    let positions: Vec<(f64, f64)> = layout.iter().map(to_canvas).collect();

    let data = GraphData {
        nodes: nodes.clone(),
        edges: edges.clone(),
    };
    // keep "</script>" inside URLs from closing the data block
    let json = serde_json::to_string(&data)?.replace("</", "<\\/");

    let mut svg: Vec<String> = Vec::new();
    svg.push(format!(
        r#"<svg id="canvas" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {size} {size}">"#,
        size = CANVAS_SIZE
    ));
    svg.push(
        r##"<defs><marker id="arrow" viewBox="0 0 10 10" refX="16" refY="5" markerWidth="6" markerHeight="6" orient="auto-start-reverse"><path d="M 0 0 L 10 5 L 0 10 z" fill="#9aa5b1"/></marker></defs>"##
            .to_string(),
    );

    for &(source, target) in &edges {
        let (Some(a), Some(b)) = (positions.get(source), positions.get(target)) else {
            continue;
        };
        svg.push(format!(
            r#"<line class="edge" x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" marker-end="url(#arrow)"/>"#,
            a.0, a.1, b.0, b.1
        ));
    }

    for (id, (url, position)) in nodes.iter().zip(&positions).enumerate() {
        let url = escape_html(url);
        svg.push(format!(
            r#"<circle class="node" data-id="{id}" cx="{x:.2}" cy="{y:.2}" r="{r}"><title>{url}</title></circle>"#,
            id = id,
            x = position.0,
            y = position.1,
            r = NODE_RADIUS,
            url = url
        ));
        svg.push(format!(
            r#"<text class="label" x="{:.2}" y="{:.2}">{}</text>"#,
            position.0 + NODE_RADIUS + 2.0,
            position.1 + 3.0,
            url
        ));
    }
    svg.push("</svg>".to_string());
    let svg = svg.join("\n");

    let script = SCRIPT.replace("SIZE", &CANVAS_SIZE.to_string());

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>{style}</style>
</head>
<body>
<h1>{title}</h1>
{svg}
<script type="application/json" id="graph-data">{json}</script>
<script>{script}</script>
</body>
</html>
"#,
        title = escape_html(&title),
        style = STYLE,
        svg = svg,
        json = json,
        script = script
    ))
}

fn to_canvas(point: &Point) -> (f64, f64) {
    let half = (CANVAS_SIZE - 2.0 * CANVAS_MARGIN) / 2.0;
    (
        CANVAS_SIZE / 2.0 + point.x * half,
        CANVAS_SIZE / 2.0 + point.y * half,
    )
}

/// Escapes text for use in HTML content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
