// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-frame rendering of the graph and node-body dragging.

use crate::connector::ConnectorRole;
use crate::curve::hermite_with_tangent;
use crate::graph::Graph;
use crate::interaction::{ConnectorInteraction, DragState, HitTest, PointerSample};
use crate::node::{Node, NodeId};
use crate::settings::EditorSettings;
use egui::{Align2, Color32, Pos2, Rect, Stroke, Vec2};

/// Node visual parameters
const NODE_ROUNDING: f32 = 4.0;
const TITLE_PADDING: f32 = 8.0;

/// Node colors
const NODE_BG: Color32 = Color32::from_rgb(60, 60, 60);
const NODE_BG_HOVERED: Color32 = Color32::from_rgb(75, 75, 75);
const NODE_TITLE_BG: Color32 = Color32::from_rgb(100, 0, 0);
const NODE_OUTLINE: Color32 = Color32::from_rgb(100, 100, 100);
const TEXT_COLOR: Color32 = Color32::from_gray(220);
const STATUS_COLOR: Color32 = Color32::from_gray(150);

/// Hovered connector fill
const SLOT_COLOR_HOVERED: Color32 = Color32::from_rgb(200, 200, 200);

/// Link stroke
const LINK_COLOR: Color32 = Color32::from_rgb(200, 200, 100);
const LINK_THICKNESS: f32 = 3.0;

/// Drawing backend supplied by the host
pub trait Canvas {
    /// Filled rectangle with rounded corners
    fn rect_filled(&mut self, rect: Rect, rounding: f32, color: Color32);
    /// Rectangle outline
    fn rect_stroke(&mut self, rect: Rect, rounding: f32, stroke: Stroke);
    /// Filled circle
    fn circle_filled(&mut self, center: Pos2, radius: f32, color: Color32);
    /// Open stroked path through `points`
    fn polyline(&mut self, points: Vec<Pos2>, stroke: Stroke);
    /// Single line of text anchored at `pos`
    fn text(&mut self, pos: Pos2, anchor: Align2, text: &str, color: Color32);
}

/// A recorded draw primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// See [`Canvas::rect_filled`]
    RectFilled {
        /// Rectangle
        rect: Rect,
        /// Corner radius
        rounding: f32,
        /// Fill
        color: Color32,
    },
    /// See [`Canvas::rect_stroke`]
    RectStroke {
        /// Rectangle
        rect: Rect,
        /// Corner radius
        rounding: f32,
        /// Outline
        stroke: Stroke,
    },
    /// See [`Canvas::circle_filled`]
    CircleFilled {
        /// Center
        center: Pos2,
        /// Radius
        radius: f32,
        /// Fill
        color: Color32,
    },
    /// See [`Canvas::polyline`]
    Polyline {
        /// Path
        points: Vec<Pos2>,
        /// Stroke
        stroke: Stroke,
    },
    /// See [`Canvas::text`]
    Text {
        /// Anchor position
        pos: Pos2,
        /// Alignment relative to `pos`
        anchor: Align2,
        /// Text
        text: String,
        /// Color
        color: Color32,
    },
}

/// Canvas that records primitives instead of painting them
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    /// Primitives in emission order
    pub commands: Vec<DrawCommand>,
}

impl Canvas for RecordingCanvas {
    fn rect_filled(&mut self, rect: Rect, rounding: f32, color: Color32) {
        self.commands.push(DrawCommand::RectFilled { rect, rounding, color });
    }

    fn rect_stroke(&mut self, rect: Rect, rounding: f32, stroke: Stroke) {
        self.commands.push(DrawCommand::RectStroke { rect, rounding, stroke });
    }

    fn circle_filled(&mut self, center: Pos2, radius: f32, color: Color32) {
        self.commands.push(DrawCommand::CircleFilled { center, radius, color });
    }

    fn polyline(&mut self, points: Vec<Pos2>, stroke: Stroke) {
        self.commands.push(DrawCommand::Polyline { points, stroke });
    }

    fn text(&mut self, pos: Pos2, anchor: Align2, text: &str, color: Color32) {
        self.commands.push(DrawCommand::Text {
            pos,
            anchor,
            text: text.to_owned(),
            color,
        });
    }
}

/// Draw the whole graph, then the live drag curve on top
pub fn present(
    graph: &Graph,
    interaction: &ConnectorInteraction,
    pointer: Pos2,
    offset: Vec2,
    settings: &EditorSettings,
    canvas: &mut dyn Canvas,
) {
    let hit_test = HitTest {
        offset,
        radius: settings.slot_radius,
    };

    for node in graph.nodes() {
        draw_node(node, pointer, &hit_test, settings, canvas);
    }

    draw_links(graph, offset, settings, canvas);

    if let Some((from, to)) = interaction.preview(pointer) {
        draw_link(from, to, settings, canvas);
    }
}

fn draw_node(
    node: &Node,
    pointer: Pos2,
    hit_test: &HitTest,
    settings: &EditorSettings,
    canvas: &mut dyn Canvas,
) {
    let rect = node.rect().translate(hit_test.offset);

    let bg = if rect.contains(pointer) {
        NODE_BG_HOVERED
    } else {
        NODE_BG
    };
    canvas.rect_filled(rect, NODE_ROUNDING, bg);

    let title_rect = Rect::from_min_max(
        rect.min + Vec2::splat(1.0),
        Pos2::new(rect.max.x, rect.min.y + node.title_height),
    );
    canvas.rect_filled(title_rect, NODE_ROUNDING, NODE_TITLE_BG);
    canvas.rect_stroke(rect, NODE_ROUNDING, Stroke::new(1.0, NODE_OUTLINE));

    canvas.text(
        Pos2::new(rect.center().x, rect.min.y + TITLE_PADDING),
        Align2::CENTER_TOP,
        &node.name,
        TEXT_COLOR,
    );

    let margin = settings.layout.label_margin;
    for (_, connector) in node.connectors() {
        let pos = rect.min + connector.anchor;
        let color = if hit_test.hits(pos, pointer) {
            SLOT_COLOR_HOVERED
        } else {
            connector.kind().color()
        };
        canvas.circle_filled(pos, settings.slot_radius, color);

        match connector.role {
            ConnectorRole::Input => canvas.text(
                pos + Vec2::new(margin, 0.0),
                Align2::LEFT_CENTER,
                connector.name(),
                TEXT_COLOR,
            ),
            ConnectorRole::Output => canvas.text(
                pos - Vec2::new(margin, 0.0),
                Align2::RIGHT_CENTER,
                connector.name(),
                TEXT_COLOR,
            ),
        }
    }
}

fn draw_links(graph: &Graph, offset: Vec2, settings: &EditorSettings, canvas: &mut dyn Canvas) {
    for (upstream, downstream) in graph.links() {
        let from = graph.connector_screen_pos(upstream, offset);
        let to = graph.connector_screen_pos(downstream, offset);

        if let (Some(from), Some(to)) = (from, to) {
            draw_link(from, to, settings, canvas);
        }
    }
}

fn draw_link(from: Pos2, to: Pos2, settings: &EditorSettings, canvas: &mut dyn Canvas) {
    let points = hermite_with_tangent(
        from,
        to,
        Vec2::new(settings.curve_tangent, 0.0),
        settings.link_steps,
    );
    canvas.polyline(points, Stroke::new(LINK_THICKNESS, LINK_COLOR));
}

/// Draw a one-line summary at `pos`
pub fn draw_status(graph: &Graph, pos: Pos2, canvas: &mut dyn Canvas) {
    canvas.text(
        pos,
        Align2::LEFT_BOTTOM,
        &format!("Nodes: {} | Links: {}", graph.node_count(), graph.link_count()),
        STATUS_COLOR,
    );
}

/// Whole-node translation by pointer drag
#[derive(Debug, Clone, Default)]
pub struct NodeDrag {
    active: Option<NodeId>,
}

impl NodeDrag {
    /// Node currently being moved
    pub fn active(&self) -> Option<NodeId> {
        self.active
    }

    /// Stop moving
    pub fn reset(&mut self) {
        self.active = None;
    }

    /// Advance one frame.
    ///
    /// `connector` is the connector interaction state after its own step for
    /// this frame. A press on a connector never grabs the body, and the body
    /// stays put while a link is dragged. The grab only ends on release.
    pub fn step(&mut self, graph: &mut Graph, pointer: &PointerSample, offset: Vec2, connector: DragState) {
        if !pointer.primary_down {
            self.active = None;
            return;
        }

        if pointer.primary_clicked {
            self.active = match connector {
                // Topmost node is the last one drawn
                DragState::Idle => graph
                    .nodes()
                    .filter(|node| node.rect().translate(offset).contains(pointer.pos))
                    .last()
                    .map(|node| node.id),
                DragState::Hovering(_) | DragState::Dragging(_) => None,
            };
            return;
        }

        if matches!(connector, DragState::Dragging(_)) {
            return;
        }

        if let Some(node_id) = self.active {
            if !graph.translate(node_id, pointer.delta) {
                self.active = None;
            }
        }
    }
}
