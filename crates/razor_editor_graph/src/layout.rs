// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node box layout.
//!
//! Runs once when a node is created. The title bar takes a multiple of the
//! title's line height, inputs stack down the left edge and outputs down the
//! right edge, each column with its own running height.

use crate::catalog::NodeTemplate;
use crate::connector::{Connector, ConnectorRole};
use crate::node::{Node, NodeId};
use crate::settings::LayoutSettings;
use egui::{Pos2, Vec2};

/// Text measurement supplied by the host
pub trait TextMetrics {
    /// Size of `text` laid out on a single line
    fn measure(&self, text: &str) -> Vec2;
}

/// Fixed-advance metrics for headless hosts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    /// Advance per character
    pub char_width: f32,
    /// Line height
    pub line_height: f32,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self {
            char_width: 7.0,
            line_height: 13.0,
        }
    }
}

impl TextMetrics for MonospaceMetrics {
    fn measure(&self, text: &str) -> Vec2 {
        Vec2::new(text.chars().count() as f32 * self.char_width, self.line_height)
    }
}

/// Lay out a node for `template` at `position`
pub fn layout_node(
    id: NodeId,
    template: &NodeTemplate,
    position: Pos2,
    metrics: &dyn TextMetrics,
    settings: &LayoutSettings,
) -> Node {
    let title_height = metrics.measure(&template.name).y * settings.title_height_factor;

    let mut inputs = Vec::with_capacity(template.inputs.len());
    let mut input_height = 0.0;
    let mut input_width: f32 = 0.0;

    for desc in &template.inputs {
        let text = metrics.measure(&desc.name);
        input_width = input_width.max(text.x);

        let anchor = Vec2::new(0.0, title_height + input_height + text.y / 2.0);
        inputs.push(Connector::new(desc.clone(), ConnectorRole::Input, anchor));

        input_height += text.y + settings.row_spacing;
    }

    let output_width = template
        .outputs
        .iter()
        .map(|desc| metrics.measure(&desc.name).x)
        .fold(0.0, f32::max);
    let width = input_width.max(input_width + output_width) + settings.horizontal_padding;

    let mut outputs = Vec::with_capacity(template.outputs.len());
    let mut output_height = 0.0;

    for desc in &template.outputs {
        let text = metrics.measure(&desc.name);

        let anchor = Vec2::new(width, title_height + output_height + text.y / 2.0);
        outputs.push(Connector::new(desc.clone(), ConnectorRole::Output, anchor));

        output_height += text.y + settings.row_spacing;
    }

    // Both columns count, so output-heavy nodes are not clipped
    let height = title_height + f32::max(input_height, output_height);

    Node {
        id,
        template: template.name.clone(),
        name: template.name.clone(),
        position,
        size: Vec2::new(width, height),
        title_height,
        inputs,
        outputs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::NodeCatalog;
    use crate::connector::ValueKind;

    fn layout(template: &NodeTemplate) -> Node {
        layout_node(
            NodeId(0),
            template,
            Pos2::new(100.0, 50.0),
            &MonospaceMetrics::default(),
            &LayoutSettings::default(),
        )
    }

    #[test]
    fn test_add_node_layout() {
        let catalog = NodeCatalog::builtin();
        let node = layout(catalog.find_template("Add").unwrap());

        // "Add" title: 13 * 3
        assert_eq!(node.title_height, 39.0);
        // "Input1" = 42 wide, "Out" = 21 wide, plus 40 padding
        assert_eq!(node.size.x, 42.0 + 21.0 + 40.0);
        assert_eq!(node.size.y, 39.0 + 2.0 * (13.0 + 4.0));

        assert_eq!(node.inputs[0].anchor, Vec2::new(0.0, 39.0 + 6.5));
        assert_eq!(node.inputs[1].anchor, Vec2::new(0.0, 39.0 + 17.0 + 6.5));
        assert_eq!(node.outputs[0].anchor, Vec2::new(103.0, 39.0 + 6.5));
        assert_eq!(node.name, "Add");
        assert_eq!(node.position, Pos2::new(100.0, 50.0));
    }

    #[test]
    fn test_layout_is_deterministic() {
        let catalog = NodeCatalog::builtin();
        let template = catalog.find_template("Multiply").unwrap();
        assert_eq!(layout(template), layout(template));
    }

    #[test]
    fn test_height_covers_output_column() {
        let template = NodeTemplate::new("Split")
            .with_input("In", ValueKind::Vector3)
            .with_output("X", ValueKind::Float)
            .with_output("Y", ValueKind::Float)
            .with_output("Z", ValueKind::Float);
        let node = layout(&template);

        let last = node.outputs.last().unwrap();
        assert!(last.anchor.y < node.size.y);
        assert_eq!(node.size.y, node.title_height + 3.0 * 17.0);
    }

    #[test]
    fn test_template_without_connectors() {
        let node = layout(&NodeTemplate::new("Empty"));
        assert_eq!(node.size, Vec2::new(40.0, 39.0));
        assert!(node.inputs.is_empty() && node.outputs.is_empty());
    }
}
