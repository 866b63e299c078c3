// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connector drag-to-connect interaction.
//!
//! One step per frame: hit test the pointer against every connector, then
//! advance `Idle -> Hovering -> Dragging -> Idle`. The graph is only touched
//! when a drag is released over a second connector.

use crate::connector::ConnectorRef;
use crate::graph::{ConnectionError, Graph};
use crate::settings::LinkPolicy;
use egui::{Pos2, Vec2};

/// Pointer state sampled once per frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerSample {
    /// Absolute pointer position
    pub pos: Pos2,
    /// Primary button is held
    pub primary_down: bool,
    /// Primary button went down this frame
    pub primary_clicked: bool,
    /// Movement since the previous frame
    pub delta: Vec2,
}

/// Connector tracked by the session, with its absolute position when it was picked up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveConnector {
    /// Tracked connector
    pub connector: ConnectorRef,
    /// Absolute anchor position
    pub pos: Pos2,
}

/// Interaction state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// Nothing under the pointer
    #[default]
    Idle,
    /// Pointer rests on a connector
    Hovering(ActiveConnector),
    /// A link is being dragged out of a connector
    Dragging(ActiveConnector),
}

/// What a step changed
#[derive(Debug)]
pub enum InteractionEvent {
    /// Pointer entered a connector
    HoverStarted(ConnectorRef),
    /// Pointer left the hovered connector
    HoverLost(ConnectorRef),
    /// A drag started on a connector
    DragStarted(ConnectorRef),
    /// A drag was released on another connector and the link was written
    Connected {
        /// Connector now supplying the value
        upstream: ConnectorRef,
        /// Connector whose upstream was set
        downstream: ConnectorRef,
    },
    /// A drag was released on its own connector or on empty canvas
    Cancelled(ConnectorRef),
    /// The link policy refused the drop target
    Rejected(ConnectionError),
}

/// Hit test parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitTest {
    /// Offset added to every node position
    pub offset: Vec2,
    /// Hit radius
    pub radius: f32,
}

impl HitTest {
    /// Whether `pointer` is strictly within the radius of `pos`
    pub fn hits(&self, pos: Pos2, pointer: Pos2) -> bool {
        let d = pointer - pos;
        d.x * d.x + d.y * d.y < self.radius * self.radius
    }

    /// First connector under `pointer`.
    ///
    /// Nodes are scanned in creation order, inputs before outputs.
    pub fn find(&self, graph: &Graph, pointer: Pos2) -> Option<ActiveConnector> {
        graph.nodes().find_map(|node| {
            let origin = node.position + self.offset;
            node.connectors().find_map(|(connector, c)| {
                let pos = origin + c.anchor;
                self.hits(pos, pointer)
                    .then_some(ActiveConnector { connector, pos })
            })
        })
    }
}

/// Transient drag-to-connect session
#[derive(Debug, Clone, Default)]
pub struct ConnectorInteraction {
    state: DragState,
}

impl ConnectorInteraction {
    /// Create an idle session
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> DragState {
        self.state
    }

    /// Connector held by the session while hovering or dragging
    pub fn active(&self) -> Option<ActiveConnector> {
        match self.state {
            DragState::Idle => None,
            DragState::Hovering(active) | DragState::Dragging(active) => Some(active),
        }
    }

    /// Whether a link is being dragged
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Endpoints of the live feedback curve
    pub fn preview(&self, pointer: Pos2) -> Option<(Pos2, Pos2)> {
        match self.state {
            DragState::Dragging(active) => Some((active.pos, pointer)),
            _ => None,
        }
    }

    /// Drop any hover or drag
    pub fn reset(&mut self) {
        self.state = DragState::Idle;
    }

    /// Advance one frame
    pub fn step(
        &mut self,
        graph: &mut Graph,
        pointer: &PointerSample,
        hit_test: &HitTest,
        policy: LinkPolicy,
    ) -> Option<InteractionEvent> {
        if let Some(active) = self.active() {
            if graph.connector(active.connector).is_none() {
                tracing::debug!("Tracked connector {:?} vanished", active.connector);
                self.reset();
                return None;
            }
        }

        match self.state {
            DragState::Idle => {
                let hit = hit_test.find(graph, pointer.pos)?;
                self.state = DragState::Hovering(hit);
                Some(InteractionEvent::HoverStarted(hit.connector))
            }

            DragState::Hovering(active) => {
                let still_hovered = hit_test
                    .find(graph, pointer.pos)
                    .is_some_and(|hit| hit.connector == active.connector);

                if !still_hovered {
                    self.reset();
                    return Some(InteractionEvent::HoverLost(active.connector));
                }

                if pointer.primary_clicked {
                    self.state = DragState::Dragging(active);
                    return Some(InteractionEvent::DragStarted(active.connector));
                }

                None
            }

            DragState::Dragging(active) => {
                if pointer.primary_down {
                    return None;
                }

                self.reset();
                match hit_test.find(graph, pointer.pos) {
                    Some(hit) if hit.connector != active.connector => {
                        match graph.link(active.connector, hit.connector, policy) {
                            Ok((upstream, downstream)) => {
                                Some(InteractionEvent::Connected { upstream, downstream })
                            }
                            Err(err) => {
                                tracing::warn!("Link rejected: {err}");
                                Some(InteractionEvent::Rejected(err))
                            }
                        }
                    }
                    _ => Some(InteractionEvent::Cancelled(active.connector)),
                }
            }
        }
    }
}
