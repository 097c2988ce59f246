use crate::diagram::Diagram;
use crate::layout::ConnectorKind;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Flat, serializable snapshot of a built diagram, for debugging layout
/// regressions without rendering.
#[derive(Debug, Serialize)]
pub struct DiagramDump {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
    pub display_year: i32,
    pub minimum_year: i32,
    pub node_count: usize,
    pub rows: Vec<RowDump>,
    pub connectors: Vec<ConnectorDump>,
}

#[derive(Debug, Serialize)]
pub struct RowDump {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub group_space: f32,
    pub groups: Vec<GroupDump>,
}

#[derive(Debug, Serialize)]
pub struct GroupDump {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub nodes: Vec<NodeDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub person_id: String,
    pub name: String,
    pub node_type: String,
    pub scale: f32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub filtered: bool,
    pub opacity: f32,
    pub age: String,
}

#[derive(Debug, Serialize)]
pub struct ConnectorDump {
    pub kind: String,
    pub from: String,
    pub to: String,
    pub filtered: bool,
}

impl DiagramDump {
    pub fn from_diagram(diagram: &Diagram) -> Self {
        let rows = diagram
            .rows()
            .iter()
            .map(|row| RowDump {
                x: row.location.x,
                y: row.location.y,
                width: row.size.width,
                height: row.size.height,
                group_space: row.group_space,
                groups: row
                    .groups()
                    .iter()
                    .map(|group| GroupDump {
                        x: group.location.x,
                        y: group.location.y,
                        width: group.size.width,
                        height: group.size.height,
                        nodes: group
                            .nodes()
                            .iter()
                            .map(|node| NodeDump {
                                person_id: node.person.id.clone(),
                                name: node.person.name.clone(),
                                node_type: format!("{:?}", node.node_type),
                                scale: node.scale,
                                x: node.location.x,
                                y: node.location.y,
                                width: node.size.width,
                                height: node.size.height,
                                filtered: node.is_filtered,
                                opacity: node.opacity,
                                age: node.age_text.clone(),
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        let all_rows = diagram.rows();
        let connectors = diagram
            .connectors()
            .iter()
            .map(|connector| ConnectorDump {
                kind: match connector.kind {
                    ConnectorKind::Child => "child".to_string(),
                    ConnectorKind::Spouse { former: true, .. } => "former-spouse".to_string(),
                    ConnectorKind::Spouse { .. } => "spouse".to_string(),
                },
                from: connector
                    .start
                    .node(all_rows)
                    .map(|node| node.person.id.clone())
                    .unwrap_or_default(),
                to: connector
                    .end
                    .node(all_rows)
                    .map(|node| node.person.id.clone())
                    .unwrap_or_default(),
                filtered: connector.is_filtered,
            })
            .collect();

        DiagramDump {
            width: diagram.total_size().width,
            height: diagram.total_size().height,
            scale: diagram.scale(),
            display_year: diagram.display_year(),
            minimum_year: diagram.minimum_year(),
            node_count: diagram.node_count(),
            rows,
            connectors,
        }
    }
}

pub fn write_layout_dump(path: &Path, diagram: &Diagram) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = DiagramDump::from_diagram(diagram);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
