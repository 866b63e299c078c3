// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph store containing node instances and their links.

use crate::catalog::{NodeCatalog, NodeTemplate};
use crate::connector::{Connector, ConnectorRef, ConnectorRole};
use crate::layout::{layout_node, TextMetrics};
use crate::node::{Node, NodeId};
use crate::settings::{LayoutSettings, LinkPolicy};
use egui::{Pos2, Vec2};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A material node graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    /// Nodes in creation order
    nodes: IndexMap<NodeId, Node>,
    /// Next ID to hand out; never decreases
    next_id: u32,
}

impl Graph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self {
            nodes: IndexMap::new(),
            next_id: 0,
        }
    }

    /// Create a node from a catalog entry.
    ///
    /// Returns `None` for unknown template names.
    pub fn instantiate(
        &mut self,
        catalog: &NodeCatalog,
        name: &str,
        position: Pos2,
        metrics: &dyn TextMetrics,
        layout: &LayoutSettings,
    ) -> Option<NodeId> {
        let Some(template) = catalog.find_template(name) else {
            tracing::debug!("Unknown node template: {name:?}");
            return None;
        };
        Some(self.insert_from_template(template, position, metrics, layout))
    }

    /// Lay out and add a node for `template`
    pub fn insert_from_template(
        &mut self,
        template: &NodeTemplate,
        position: Pos2,
        metrics: &dyn TextMetrics,
        layout: &LayoutSettings,
    ) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;

        let node = layout_node(id, template, position, metrics, layout);
        tracing::info!("Created node {} ({}) at {:?}", id, node.name, position);
        self.nodes.insert(id, node);
        id
    }

    /// Remove a node and scrub every link that referenced it
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        let node = self.nodes.shift_remove(&node_id)?;

        for other in self.nodes.values_mut() {
            for connector in other.inputs.iter_mut().chain(other.outputs.iter_mut()) {
                if connector.upstream.is_some_and(|r| r.node == node_id) {
                    connector.upstream = None;
                }
            }
        }

        tracing::info!("Removed node {} ({})", node_id, node.name);
        Some(node)
    }

    /// Remove all nodes. IDs are not reused afterwards.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get all nodes in creation order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get all node IDs in creation order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Move a node to `position`
    pub fn set_position(&mut self, node_id: NodeId, position: Pos2) -> bool {
        match self.nodes.get_mut(&node_id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Move a node by `delta`
    pub fn translate(&mut self, node_id: NodeId, delta: Vec2) -> bool {
        match self.nodes.get_mut(&node_id) {
            Some(node) => {
                node.position += delta;
                true
            }
            None => false,
        }
    }

    /// Resolve a connector handle
    pub fn connector(&self, connector: ConnectorRef) -> Option<&Connector> {
        self.nodes
            .get(&connector.node)?
            .connector(connector.role, connector.index)
    }

    /// Resolve a connector handle mutably
    pub fn connector_mut(&mut self, connector: ConnectorRef) -> Option<&mut Connector> {
        self.nodes
            .get_mut(&connector.node)?
            .connector_mut(connector.role, connector.index)
    }

    /// Node owning a connector, if the handle still resolves
    pub fn owner_of(&self, connector: ConnectorRef) -> Option<&Node> {
        let node = self.nodes.get(&connector.node)?;
        node.connector(connector.role, connector.index)?;
        Some(node)
    }

    /// Absolute position of a connector given the canvas offset
    pub fn connector_screen_pos(&self, connector: ConnectorRef, offset: Vec2) -> Option<Pos2> {
        let node = self.owner_of(connector)?;
        let anchor = node.connector(connector.role, connector.index)?.anchor;
        Some(node.position + offset + anchor)
    }

    /// Link two connectors according to `policy`.
    ///
    /// `origin` is where the drag started and `target` where it was released.
    /// Returns the `(upstream, downstream)` pair that was written.
    pub fn link(
        &mut self,
        origin: ConnectorRef,
        target: ConnectorRef,
        policy: LinkPolicy,
    ) -> Result<(ConnectorRef, ConnectorRef), ConnectionError> {
        let origin_connector = self
            .connector(origin)
            .ok_or(ConnectionError::ConnectorNotFound(origin))?;
        let target_connector = self
            .connector(target)
            .ok_or(ConnectionError::ConnectorNotFound(target))?;

        let (upstream, downstream) = match policy {
            LinkPolicy::Permissive => (origin, target),
            LinkPolicy::Strict => {
                if target.role != origin.role.opposite() {
                    return Err(ConnectionError::SameRole(origin.role));
                }

                let (upstream, downstream, from_kind, to_kind) = if origin.role == ConnectorRole::Output {
                    (origin, target, origin_connector.kind(), target_connector.kind())
                } else {
                    (target, origin, target_connector.kind(), origin_connector.kind())
                };

                if !from_kind.can_connect_to(to_kind) {
                    return Err(ConnectionError::IncompatibleKinds);
                }
                if upstream.node == downstream.node {
                    return Err(ConnectionError::SelfLoop);
                }
                if self.depends_on(upstream.node, downstream.node) {
                    return Err(ConnectionError::Cycle);
                }

                (upstream, downstream)
            }
        };

        let connector = self
            .connector_mut(downstream)
            .ok_or(ConnectionError::ConnectorNotFound(downstream))?;
        connector.upstream = Some(upstream);

        tracing::info!(
            "Linked {}:{:?}[{}] -> {}:{:?}[{}]",
            upstream.node,
            upstream.role,
            upstream.index,
            downstream.node,
            downstream.role,
            downstream.index
        );
        Ok((upstream, downstream))
    }

    /// Clear a connector's upstream link, returning the old value
    pub fn unlink(&mut self, connector: ConnectorRef) -> Option<ConnectorRef> {
        self.connector_mut(connector)?.upstream.take()
    }

    /// Every `(upstream, downstream)` link that resolves
    pub fn links(&self) -> impl Iterator<Item = (ConnectorRef, ConnectorRef)> + '_ {
        self.nodes
            .values()
            .flat_map(Node::connectors)
            .filter_map(|(downstream, connector)| {
                let upstream = connector.upstream?;
                self.connector(upstream)?;
                Some((upstream, downstream))
            })
    }

    /// Number of links
    pub fn link_count(&self) -> usize {
        self.links().count()
    }

    /// Connectors fed by `connector`
    pub fn downstream_of(&self, connector: ConnectorRef) -> impl Iterator<Item = ConnectorRef> + '_ {
        self.links()
            .filter(move |(upstream, _)| *upstream == connector)
            .map(|(_, downstream)| downstream)
    }

    /// Whether `node_id` reads (directly or transitively) from `source`
    pub fn depends_on(&self, node_id: NodeId, source: NodeId) -> bool {
        let mut visited = HashSet::new();
        let mut stack = vec![node_id];

        while let Some(current) = stack.pop() {
            if current == source {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            let Some(node) = self.nodes.get(&current) else {
                continue;
            };
            stack.extend(
                node.connectors()
                    .filter_map(|(_, c)| c.upstream)
                    .map(|r| r.node),
            );
        }

        false
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

/// Error when creating a link
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// Connector handle does not resolve
    #[error("Connector not found: {0:?}")]
    ConnectorNotFound(ConnectorRef),

    /// Both ends have the same role
    #[error("Cannot link two {0:?} connectors")]
    SameRole(ConnectorRole),

    /// Value kinds cannot be converted
    #[error("Incompatible connector kinds")]
    IncompatibleKinds,

    /// Both ends are on the same node
    #[error("Self-loop not allowed")]
    SelfLoop,

    /// The link would close a cycle
    #[error("Link would create a cycle")]
    Cycle,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::MonospaceMetrics;

    fn graph_with(names: &[&str]) -> Graph {
        let catalog = NodeCatalog::builtin();
        let mut graph = Graph::new();
        for (i, name) in names.iter().enumerate() {
            graph.instantiate(
                &catalog,
                name,
                Pos2::new(200.0 * i as f32, 0.0),
                &MonospaceMetrics::default(),
                &LayoutSettings::default(),
            );
        }
        graph
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut graph = graph_with(&["Add", "Multiply"]);
        assert_eq!(graph.node_ids().collect::<Vec<_>>(), [NodeId(0), NodeId(1)]);

        graph.remove_node(NodeId(1));
        let catalog = NodeCatalog::builtin();
        let id = graph.instantiate(
            &catalog,
            "Add",
            Pos2::ZERO,
            &MonospaceMetrics::default(),
            &LayoutSettings::default(),
        );
        assert_eq!(id, Some(NodeId(2)));

        graph.clear();
        let id = graph.instantiate(
            &catalog,
            "Add",
            Pos2::ZERO,
            &MonospaceMetrics::default(),
            &LayoutSettings::default(),
        );
        assert_eq!(id, Some(NodeId(3)));
    }

    #[test]
    fn test_unknown_template_is_noop() {
        let mut graph = Graph::new();
        let id = graph.instantiate(
            &NodeCatalog::builtin(),
            "Divide",
            Pos2::ZERO,
            &MonospaceMetrics::default(),
            &LayoutSettings::default(),
        );
        assert!(id.is_none());
        assert!(graph.is_empty());
    }

    #[test]
    fn test_strict_link_output_to_input() {
        let mut graph = graph_with(&["Add", "Multiply"]);
        let out = ConnectorRef::output(NodeId(0), 0);
        let input = ConnectorRef::input(NodeId(1), 0);

        let linked = graph.link(out, input, LinkPolicy::Strict).unwrap();
        assert_eq!(linked, (out, input));
        assert_eq!(graph.connector(input).unwrap().upstream, Some(out));
        assert_eq!(graph.connector(out).unwrap().upstream, None);
        assert_eq!(graph.downstream_of(out).collect::<Vec<_>>(), [input]);
    }

    #[test]
    fn test_strict_link_normalizes_direction() {
        let mut graph = graph_with(&["Add", "Multiply"]);
        let out = ConnectorRef::output(NodeId(0), 0);
        let input = ConnectorRef::input(NodeId(1), 1);

        graph.link(input, out, LinkPolicy::Strict).unwrap();
        assert_eq!(graph.connector(input).unwrap().upstream, Some(out));
        assert_eq!(graph.connector(out).unwrap().upstream, None);
    }

    #[test]
    fn test_strict_link_rejections() {
        let mut graph = graph_with(&["Add", "Multiply"]);
        let a_out = ConnectorRef::output(NodeId(0), 0);
        let a_in = ConnectorRef::input(NodeId(0), 0);
        let b_out = ConnectorRef::output(NodeId(1), 0);
        let b_in = ConnectorRef::input(NodeId(1), 0);

        assert!(matches!(
            graph.link(a_out, b_out, LinkPolicy::Strict),
            Err(ConnectionError::SameRole(ConnectorRole::Output))
        ));
        assert!(matches!(
            graph.link(a_out, a_in, LinkPolicy::Strict),
            Err(ConnectionError::SelfLoop)
        ));

        graph.link(a_out, b_in, LinkPolicy::Strict).unwrap();
        assert!(matches!(
            graph.link(b_out, a_in, LinkPolicy::Strict),
            Err(ConnectionError::Cycle)
        ));
        assert!(matches!(
            graph.link(a_out, ConnectorRef::input(NodeId(7), 0), LinkPolicy::Strict),
            Err(ConnectionError::ConnectorNotFound(_))
        ));
        assert_eq!(graph.link_count(), 1);
    }

    #[test]
    fn test_strict_link_rejects_kind_mismatch() {
        let mut graph = graph_with(&["Add"]);
        let template = NodeTemplate::new("Tint").with_input("Color", crate::connector::ValueKind::Color);
        let tint = graph.insert_from_template(
            &template,
            Pos2::ZERO,
            &MonospaceMetrics::default(),
            &LayoutSettings::default(),
        );

        let result = graph.link(
            ConnectorRef::output(NodeId(0), 0),
            ConnectorRef::input(tint, 0),
            LinkPolicy::Strict,
        );
        assert!(matches!(result, Err(ConnectionError::IncompatibleKinds)));
    }

    #[test]
    fn test_permissive_link_keeps_source_behavior() {
        let mut graph = graph_with(&["Add", "Multiply"]);
        let a_in = ConnectorRef::input(NodeId(0), 1);
        let b_out = ConnectorRef::output(NodeId(1), 0);

        graph.link(a_in, b_out, LinkPolicy::Permissive).unwrap();
        assert_eq!(graph.connector(b_out).unwrap().upstream, Some(a_in));
        assert_eq!(graph.connector(a_in).unwrap().upstream, None);
    }

    #[test]
    fn test_relink_replaces_upstream() {
        let mut graph = graph_with(&["Add", "Multiply", "Add"]);
        let input = ConnectorRef::input(NodeId(2), 0);

        graph.link(ConnectorRef::output(NodeId(0), 0), input, LinkPolicy::Strict).unwrap();
        graph.link(ConnectorRef::output(NodeId(1), 0), input, LinkPolicy::Strict).unwrap();
        assert_eq!(graph.connector(input).unwrap().upstream, Some(ConnectorRef::output(NodeId(1), 0)));
        assert_eq!(graph.link_count(), 1);

        assert_eq!(graph.unlink(input), Some(ConnectorRef::output(NodeId(1), 0)));
        assert_eq!(graph.link_count(), 0);
    }

    #[test]
    fn test_remove_node_scrubs_links() {
        let mut graph = graph_with(&["Add", "Multiply", "Add"]);
        let out = ConnectorRef::output(NodeId(0), 0);
        graph.link(out, ConnectorRef::input(NodeId(1), 0), LinkPolicy::Strict).unwrap();
        graph.link(out, ConnectorRef::input(NodeId(2), 1), LinkPolicy::Strict).unwrap();

        let removed = graph.remove_node(NodeId(0)).unwrap();
        assert_eq!(removed.name, "Add");
        assert!(graph.owner_of(out).is_none());
        assert_eq!(graph.link_count(), 0);
        assert!(graph.nodes().all(|n| n.inputs.iter().all(|c| c.upstream.is_none())));
        // Creation order of the rest is kept
        assert_eq!(graph.node_ids().collect::<Vec<_>>(), [NodeId(1), NodeId(2)]);
    }

    #[test]
    fn test_owner_and_positions() {
        let mut graph = graph_with(&["Add"]);
        let out = ConnectorRef::output(NodeId(0), 0);

        assert_eq!(graph.owner_of(out).map(|n| n.id), Some(NodeId(0)));
        assert!(graph.owner_of(ConnectorRef::output(NodeId(0), 3)).is_none());

        assert!(graph.translate(NodeId(0), Vec2::new(10.0, 5.0)));
        let anchor = graph.connector(out).unwrap().anchor;
        assert_eq!(
            graph.connector_screen_pos(out, Vec2::new(1.0, 1.0)),
            Some(Pos2::new(11.0, 6.0) + anchor)
        );
        assert!(!graph.set_position(NodeId(9), Pos2::ZERO));
    }
}
