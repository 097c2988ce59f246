use crate::config::RenderConfig;
use crate::diagram::Diagram;
use crate::layout::{ConnectorKind, NodeType, Point};
use anyhow::Result;
use std::path::Path;

/// Render the arranged diagram to an SVG document. Connectors go down
/// first (child lines beneath spouse lines), then the node boxes.
pub fn render_svg(diagram: &Diagram, render: &RenderConfig) -> String {
    let theme = diagram.theme();
    let layout = diagram.logic().config();
    let margin = render.margin;
    let scale = diagram.scale();
    let total = diagram.total_size();
    let width = (total.width * scale + margin * 2.0).max(200.0);
    let height = (total.height * scale + margin * 2.0).max(200.0);

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.0}\" height=\"{height:.0}\" viewBox=\"0 0 {width:.0} {height:.0}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));
    svg.push_str(&format!(
        "<g transform=\"translate({margin:.2} {margin:.2}) scale({scale})\">"
    ));

    let rows = diagram.rows();
    for connector in diagram.connectors_in_draw_order() {
        let Some((start, end)) = connector.endpoints(rows) else {
            continue;
        };
        match &connector.kind {
            ConnectorKind::Child => {
                svg.push_str(&format!(
                    "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"1.2\" opacity=\"{}\"/>",
                    start.x, start.y, end.x, end.y, theme.child_line_color, connector.opacity
                ));
            }
            ConnectorKind::Spouse { former, .. } => {
                let color = if *former {
                    &theme.former_spouse_line_color
                } else {
                    &theme.spouse_line_color
                };
                let dash = if *former {
                    " stroke-dasharray=\"6 4\""
                } else {
                    ""
                };
                svg.push_str(&format!(
                    "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"1.6\"{} opacity=\"{}\"/>",
                    start.x, start.y, end.x, end.y, color, dash, connector.opacity
                ));
                if let Some(label) = spouse_date_label(connector.married_year(), connector.divorced_year(), *former) {
                    let mid = Point::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0);
                    svg.push_str(&format!(
                        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{:.1}\" fill=\"{}\" opacity=\"{}\">{}</text>",
                        mid.x,
                        mid.y - 4.0,
                        theme.font_family,
                        theme.font_size * 0.7,
                        theme.date_text_color,
                        connector.opacity,
                        escape_xml(&label)
                    ));
                }
            }
        }
    }

    for row in rows {
        for group in row.groups() {
            for node in group.nodes() {
                let origin = row.location.offset(group.location).offset(node.location);
                svg.push_str(&format!(
                    "<g transform=\"translate({:.2} {:.2}) scale({})\" opacity=\"{}\">",
                    origin.x, origin.y, node.scale, node.opacity
                ));

                let fill = match node.person.gender {
                    crate::family::Gender::Male => &theme.male_fill,
                    crate::family::Gender::Female => &theme.female_fill,
                };
                let (stroke, stroke_width) = if node.node_type == NodeType::Primary {
                    (&theme.primary_border_color, 2.2)
                } else {
                    (&theme.node_border_color, 1.4)
                };
                svg.push_str(&format!(
                    "<rect width=\"{:.2}\" height=\"{:.2}\" rx=\"{}\" ry=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
                    node.size.width,
                    node.size.height,
                    layout.node.corner_radius,
                    layout.node.corner_radius,
                    fill,
                    stroke,
                    stroke_width
                ));

                let center_x = node.size.width / 2.0;
                let name_y = layout.node.padding_y + theme.font_size;
                svg.push_str(&format!(
                    "<text x=\"{center_x:.2}\" y=\"{name_y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
                    theme.font_family,
                    theme.font_size,
                    theme.text_color,
                    escape_xml(&node.person.name)
                ));
                let age_size = theme.font_size * layout.node.age_font_scale;
                let age_y = name_y + age_size * 1.3;
                svg.push_str(&format!(
                    "<text x=\"{center_x:.2}\" y=\"{age_y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{age_size:.1}\" fill=\"{}\">{}</text>",
                    theme.font_family,
                    theme.age_text_color,
                    escape_xml(&node.age_text)
                ));

                if node.show_group_indicator {
                    let r = layout.node.group_indicator_radius;
                    svg.push_str(&format!(
                        "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{r}\" fill=\"{}\"/>",
                        node.size.width - r * 2.0,
                        r * 2.0,
                        theme.group_indicator_color
                    ));
                }

                svg.push_str("</g>");
            }
        }
    }

    svg.push_str("</g></svg>");
    svg
}

fn spouse_date_label(married: Option<i32>, divorced: Option<i32>, former: bool) -> Option<String> {
    match (married, divorced, former) {
        (Some(m), Some(d), true) => Some(format!("{m} - {d}")),
        (Some(m), None, true) => Some(format!("{m} -")),
        (Some(m), _, false) => Some(m.to_string()),
        (None, Some(d), true) => Some(format!("- {d}")),
        _ => None,
    }
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .unwrap_or(usvg::Size::from_wh(800.0, 600.0).unwrap());

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
