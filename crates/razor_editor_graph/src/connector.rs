// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connector definitions for node inputs/outputs.

use crate::node::NodeId;
use egui::{Color32, Vec2};
use serde::{Deserialize, Serialize};

/// Connector role on its owning node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectorRole {
    /// Input connector (left column)
    Input,
    /// Output connector (right column)
    Output,
}

impl ConnectorRole {
    /// The role a link partner must have
    pub fn opposite(self) -> Self {
        match self {
            Self::Input => Self::Output,
            Self::Output => Self::Input,
        }
    }
}

/// Kind of value carried by a connector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// RGB color
    Color,
    /// 3D vector
    Vector3,
    /// Floating point value
    Float,
    /// Integer value
    Integer,
}

impl ValueKind {
    /// Marker fill for connectors of this kind
    pub fn color(self) -> Color32 {
        match self {
            Self::Color => Color32::from_rgb(230, 120, 160),
            Self::Vector3 => Color32::from_rgb(200, 150, 80),
            Self::Float => Color32::from_rgb(80, 200, 80),
            Self::Integer => Color32::from_rgb(80, 200, 200),
        }
    }

    /// Check if a value of this kind can feed a connector of `other` kind
    pub fn can_connect_to(self, other: ValueKind) -> bool {
        if self == other {
            return true;
        }

        // Numeric conversions
        matches!(
            (self, other),
            (Self::Integer, Self::Float) | (Self::Float, Self::Integer)
        )
    }
}

/// Immutable connector description, part of a node template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorDesc {
    /// Connector label
    pub name: String,
    /// Value kind
    pub kind: ValueKind,
}

impl ConnectorDesc {
    /// Create a new connector description
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Value stored in a connector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ConnectorValue {
    /// Color
    Color([f32; 3]),
    /// 3D vector
    Vector3([f32; 3]),
    /// Float
    Float(f32),
    /// Integer
    Integer(i32),
}

impl ConnectorValue {
    /// Zero value for a kind
    pub fn zero(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Color => Self::Color([0.0; 3]),
            ValueKind::Vector3 => Self::Vector3([0.0; 3]),
            ValueKind::Float => Self::Float(0.0),
            ValueKind::Integer => Self::Integer(0),
        }
    }

    /// Get the kind of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Color(_) => ValueKind::Color,
            Self::Vector3(_) => ValueKind::Vector3,
            Self::Float(_) => ValueKind::Float,
            Self::Integer(_) => ValueKind::Integer,
        }
    }
}

/// Stable handle to a connector: owning node, role and index within that role.
///
/// Handles are weak. They do not keep the node alive and are resolved
/// through [`Graph`](crate::graph::Graph) on every use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectorRef {
    /// Owning node
    pub node: NodeId,
    /// Input or output column
    pub role: ConnectorRole,
    /// Index within the column
    pub index: usize,
}

impl ConnectorRef {
    /// Handle to an input connector
    pub fn input(node: NodeId, index: usize) -> Self {
        Self {
            node,
            role: ConnectorRole::Input,
            index,
        }
    }

    /// Handle to an output connector
    pub fn output(node: NodeId, index: usize) -> Self {
        Self {
            node,
            role: ConnectorRole::Output,
            index,
        }
    }
}

/// A connector instance on a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    /// Copy of the template description
    pub desc: ConnectorDesc,
    /// Input or output
    pub role: ConnectorRole,
    /// Anchor relative to the owning node's top-left corner
    pub anchor: Vec2,
    /// Payload slot
    pub value: ConnectorValue,
    /// Connector supplying this connector's value
    pub upstream: Option<ConnectorRef>,
}

impl Connector {
    /// Create an unlinked connector from its description
    pub fn new(desc: ConnectorDesc, role: ConnectorRole, anchor: Vec2) -> Self {
        let value = ConnectorValue::zero(desc.kind);
        Self {
            desc,
            role,
            anchor,
            value,
            upstream: None,
        }
    }

    /// Label of this connector
    pub fn name(&self) -> &str {
        &self.desc.name
    }

    /// Value kind of this connector
    pub fn kind(&self) -> ValueKind {
        self.desc.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_slot_matches_kind() {
        for kind in [ValueKind::Color, ValueKind::Vector3, ValueKind::Float, ValueKind::Integer] {
            let connector = Connector::new(ConnectorDesc::new("In", kind), ConnectorRole::Input, Vec2::ZERO);
            assert_eq!(connector.value.kind(), kind);
            assert!(connector.upstream.is_none());
        }
    }

    #[test]
    fn test_kind_compatibility() {
        assert!(ValueKind::Float.can_connect_to(ValueKind::Float));
        assert!(ValueKind::Integer.can_connect_to(ValueKind::Float));
        assert!(!ValueKind::Color.can_connect_to(ValueKind::Float));
        assert!(!ValueKind::Vector3.can_connect_to(ValueKind::Color));
    }

    #[test]
    fn test_kind_colors_are_distinct() {
        let kinds = [ValueKind::Color, ValueKind::Vector3, ValueKind::Float, ValueKind::Integer];
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(a.color(), b.color(), "{a:?} and {b:?} share a marker color");
            }
        }
    }

    #[test]
    fn test_role_opposite() {
        assert_eq!(ConnectorRole::Input.opposite(), ConnectorRole::Output);
        assert_eq!(ConnectorRole::Output.opposite(), ConnectorRole::Input);
    }
}
