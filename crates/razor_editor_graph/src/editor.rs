// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editing session: one graph, its interaction state and view offset.

use crate::catalog::NodeCatalog;
use crate::graph::Graph;
use crate::interaction::{ConnectorInteraction, HitTest, InteractionEvent, PointerSample};
use crate::layout::TextMetrics;
use crate::node::{Node, NodeId};
use crate::presenter::{present, Canvas, NodeDrag};
use crate::settings::EditorSettings;
use egui::{Pos2, Vec2};

/// Graph editor session state.
///
/// Each open editor owns one of these; nothing is shared between sessions.
#[derive(Debug, Clone, Default)]
pub struct GraphEditorState {
    /// The edited graph
    pub graph: Graph,
    /// Editor settings
    pub settings: EditorSettings,
    /// Pan offset applied to every node position
    pub pan: Vec2,
    interaction: ConnectorInteraction,
    node_drag: NodeDrag,
}

impl GraphEditorState {
    /// Create a new session with an empty graph
    pub fn new(settings: EditorSettings) -> Self {
        Self {
            graph: Graph::new(),
            settings,
            pan: Vec2::ZERO,
            interaction: ConnectorInteraction::new(),
            node_drag: NodeDrag::default(),
        }
    }

    /// Connector interaction state
    pub fn interaction(&self) -> &ConnectorInteraction {
        &self.interaction
    }

    /// Node currently moved by a body drag
    pub fn dragged_node(&self) -> Option<NodeId> {
        self.node_drag.active()
    }

    /// Scroll the canvas
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Run the interaction for one frame.
    ///
    /// `origin` is the screen position of the canvas' top-left corner.
    pub fn frame(&mut self, pointer: &PointerSample, origin: Vec2) -> Option<InteractionEvent> {
        let offset = origin + self.pan;
        let hit_test = HitTest {
            offset,
            radius: self.settings.slot_radius,
        };

        let event = self
            .interaction
            .step(&mut self.graph, pointer, &hit_test, self.settings.link_policy);
        if let Some(event) = &event {
            tracing::debug!("Interaction: {event:?}");
        }

        self.node_drag
            .step(&mut self.graph, pointer, offset, self.interaction.state());

        event
    }

    /// Draw the graph for the current frame
    pub fn present(&self, pointer: Pos2, origin: Vec2, canvas: &mut dyn Canvas) {
        present(
            &self.graph,
            &self.interaction,
            pointer,
            origin + self.pan,
            &self.settings,
            canvas,
        );
    }

    /// Template names for the creation menu
    pub fn template_names<'a>(&self, catalog: &'a NodeCatalog) -> Vec<&'a str> {
        catalog.template_names().collect()
    }

    /// Create a node at a canvas position
    pub fn instantiate(
        &mut self,
        catalog: &NodeCatalog,
        name: &str,
        position: Pos2,
        metrics: &dyn TextMetrics,
    ) -> Option<NodeId> {
        self.graph
            .instantiate(catalog, name, position, metrics, &self.settings.layout)
    }

    /// Remove a node, dropping any gesture that involves it
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        if self
            .interaction
            .active()
            .is_some_and(|active| active.connector.node == node_id)
        {
            self.interaction.reset();
        }
        if self.node_drag.active() == Some(node_id) {
            self.node_drag.reset();
        }
        self.graph.remove_node(node_id)
    }

    /// Topmost node under a screen position
    pub fn node_at(&self, pos: Pos2, origin: Vec2) -> Option<NodeId> {
        let offset = origin + self.pan;
        self.graph
            .nodes()
            .filter(|node| node.rect().translate(offset).contains(pos))
            .last()
            .map(|node| node.id)
    }

    /// Convert a screen position to canvas space
    pub fn screen_to_canvas(&self, pos: Pos2, origin: Vec2) -> Pos2 {
        pos - origin - self.pan
    }

    /// Clear the graph and any gesture in progress
    pub fn reset(&mut self) {
        self.graph.clear();
        self.interaction.reset();
        self.node_drag.reset();
        self.pan = Vec2::ZERO;
    }
}
