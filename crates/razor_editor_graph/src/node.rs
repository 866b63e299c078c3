// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node instances placed on the graph canvas.

use crate::connector::{Connector, ConnectorRef, ConnectorRole};
use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a node, assigned in creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node instance in the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Template this node was created from
    pub template: String,
    /// Display name
    pub name: String,
    /// Top-left corner in canvas space
    pub position: Pos2,
    /// Box size computed at layout time
    pub size: Vec2,
    /// Title bar height computed at layout time
    pub title_height: f32,
    /// Input connectors
    pub inputs: Vec<Connector>,
    /// Output connectors
    pub outputs: Vec<Connector>,
}

impl Node {
    /// Connector column for a role
    pub fn connectors_of(&self, role: ConnectorRole) -> &[Connector] {
        match role {
            ConnectorRole::Input => &self.inputs,
            ConnectorRole::Output => &self.outputs,
        }
    }

    /// Get a connector by role and index
    pub fn connector(&self, role: ConnectorRole, index: usize) -> Option<&Connector> {
        self.connectors_of(role).get(index)
    }

    /// Get a mutable connector by role and index
    pub fn connector_mut(&mut self, role: ConnectorRole, index: usize) -> Option<&mut Connector> {
        match role {
            ConnectorRole::Input => self.inputs.get_mut(index),
            ConnectorRole::Output => self.outputs.get_mut(index),
        }
    }

    /// All connectors with their handles, inputs first
    pub fn connectors(&self) -> impl Iterator<Item = (ConnectorRef, &Connector)> {
        let id = self.id;
        let inputs = self
            .inputs
            .iter()
            .enumerate()
            .map(move |(i, c)| (ConnectorRef::input(id, i), c));
        let outputs = self
            .outputs
            .iter()
            .enumerate()
            .map(move |(i, c)| (ConnectorRef::output(id, i), c));
        inputs.chain(outputs)
    }

    /// Bounding box in canvas space
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.position, self.size)
    }
}
