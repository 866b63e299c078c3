// SPDX-License-Identifier: MIT OR Apache-2.0
//! egui host integration.
//!
//! Features:
//! - Text measurement through egui's font system
//! - Painting through `egui::Painter`
//! - Pointer sampling
//! - Middle-mouse panning
//! - Context menu for node creation and deletion

use crate::catalog::NodeCatalog;
use crate::editor::GraphEditorState;
use crate::interaction::PointerSample;
use crate::layout::TextMetrics;
use crate::node::NodeId;
use crate::presenter::{draw_status, Canvas};
use egui::{Align2, Color32, FontId, Pos2, Rect, Shape, Stroke, Vec2};

/// Canvas background
const BACKGROUND: Color32 = Color32::from_rgb(40, 40, 40);

/// Sample the pointer for one frame.
///
/// A press only counts as a click when it lands on the canvas, so presses on
/// menus or other panels do not start gestures.
fn pointer_sample(input: &egui::InputState, canvas_hovered: bool) -> PointerSample {
    PointerSample {
        pos: input
            .pointer
            .latest_pos()
            .unwrap_or(Pos2::new(f32::NEG_INFINITY, f32::NEG_INFINITY)),
        primary_down: input.pointer.primary_down(),
        primary_clicked: input.pointer.primary_pressed() && canvas_hovered,
        delta: input.pointer.delta(),
    }
}

/// Text metrics backed by egui fonts
pub struct EguiTextMetrics<'a> {
    ctx: &'a egui::Context,
    font_id: FontId,
}

impl<'a> EguiTextMetrics<'a> {
    /// Measure with the proportional font at `font_size`
    pub fn new(ctx: &'a egui::Context, font_size: f32) -> Self {
        Self {
            ctx,
            font_id: FontId::proportional(font_size),
        }
    }
}

impl TextMetrics for EguiTextMetrics<'_> {
    fn measure(&self, text: &str) -> Vec2 {
        self.ctx.fonts(|fonts| {
            fonts
                .layout_no_wrap(text.to_owned(), self.font_id.clone(), Color32::WHITE)
                .size()
        })
    }
}

/// Canvas painting through an egui painter
pub struct EguiCanvas<'a> {
    painter: &'a egui::Painter,
    font_id: FontId,
}

impl<'a> EguiCanvas<'a> {
    /// Paint with `painter`, drawing text at `font_size`
    pub fn new(painter: &'a egui::Painter, font_size: f32) -> Self {
        Self {
            painter,
            font_id: FontId::proportional(font_size),
        }
    }
}

impl Canvas for EguiCanvas<'_> {
    fn rect_filled(&mut self, rect: Rect, rounding: f32, color: Color32) {
        self.painter.rect_filled(rect, rounding, color);
    }

    fn rect_stroke(&mut self, rect: Rect, rounding: f32, stroke: Stroke) {
        self.painter.rect_stroke(rect, rounding, stroke);
    }

    fn circle_filled(&mut self, center: Pos2, radius: f32, color: Color32) {
        self.painter.circle_filled(center, radius, color);
    }

    fn polyline(&mut self, points: Vec<Pos2>, stroke: Stroke) {
        self.painter.add(Shape::line(points, stroke));
    }

    fn text(&mut self, pos: Pos2, anchor: Align2, text: &str, color: Color32) {
        self.painter
            .text(pos, anchor, text, self.font_id.clone(), color);
    }
}

/// What the context menu was opened on
#[derive(Debug, Clone, Copy, PartialEq)]
struct ContextMenuTarget {
    /// Screen position of the right click
    pos: Pos2,
    /// Node under the click, if any
    node: Option<NodeId>,
}

/// egui front end for a [`GraphEditorState`]
#[derive(Debug, Default)]
pub struct GraphEditorUi {
    context_menu: Option<ContextMenuTarget>,
}

impl GraphEditorUi {
    /// Create the front end
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the editor into the remaining space of `ui`
    pub fn show(&mut self, ui: &mut egui::Ui, state: &mut GraphEditorState, catalog: &NodeCatalog) {
        let rect = ui.available_rect_before_wrap();
        let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        let origin = rect.min.to_vec2();

        painter.rect_filled(rect, 0.0, BACKGROUND);

        let pointer = ui.input(|i| pointer_sample(i, response.hovered()));

        // Scrolling
        if response.dragged_by(egui::PointerButton::Middle) {
            state.pan_by(pointer.delta);
        }

        state.frame(&pointer, origin);

        let mut canvas = EguiCanvas::new(&painter, state.settings.font_size);
        state.present(pointer.pos, origin, &mut canvas);
        draw_status(
            &state.graph,
            Pos2::new(rect.left() + 5.0, rect.bottom() - 5.0),
            &mut canvas,
        );

        if response.secondary_clicked() {
            let pos = response.interact_pointer_pos().unwrap_or(pointer.pos);
            self.context_menu = Some(ContextMenuTarget {
                pos,
                node: state.node_at(pos, origin),
            });
        }

        response.context_menu(|ui| self.context_menu_ui(ui, state, catalog, origin));
    }

    fn context_menu_ui(
        &mut self,
        ui: &mut egui::Ui,
        state: &mut GraphEditorState,
        catalog: &NodeCatalog,
        origin: Vec2,
    ) {
        let Some(target) = self.context_menu else {
            ui.close_menu();
            return;
        };

        if let Some(node_id) = target.node {
            let name = state
                .graph
                .node(node_id)
                .map(|node| node.name.clone())
                .unwrap_or_default();
            ui.label(format!("Node '{name}'"));
            if ui.button("Delete").clicked() {
                state.remove_node(node_id);
                self.context_menu = None;
                ui.close_menu();
            }
            ui.separator();
        }

        let ctx = ui.ctx().clone();
        let metrics = EguiTextMetrics::new(&ctx, state.settings.font_size);
        for name in state.template_names(catalog) {
            if ui.button(name).clicked() {
                let position = state.screen_to_canvas(target.pos, origin);
                state.instantiate(catalog, name, position, &metrics);
                self.context_menu = None;
                ui.close_menu();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Event, Modifiers, PointerButton, RawInput};

    fn press_at(pos: Pos2) -> RawInput {
        RawInput {
            events: vec![
                Event::PointerMoved(pos),
                Event::PointerButton {
                    pos,
                    button: PointerButton::Primary,
                    pressed: true,
                    modifiers: Modifiers::default(),
                },
            ],
            ..RawInput::default()
        }
    }

    #[test]
    fn test_measure_with_egui_fonts() {
        let ctx = egui::Context::default();
        let mut sizes = None;
        let _ = ctx.run(RawInput::default(), |ctx| {
            let metrics = EguiTextMetrics::new(ctx, 13.0);
            sizes = Some((metrics.measure("Add"), metrics.measure("Multiply")));
        });

        let (short, long) = sizes.unwrap();
        assert!(short.x > 0.0 && short.y > 0.0);
        assert!(long.x > short.x);
        assert_eq!(long.y, short.y);
    }

    #[test]
    fn test_press_counts_only_over_canvas() {
        let ctx = egui::Context::default();
        let pos = Pos2::new(40.0, 30.0);
        let mut samples = Vec::new();
        let _ = ctx.run(press_at(pos), |ctx| {
            samples.push(ctx.input(|i| pointer_sample(i, true)));
            samples.push(ctx.input(|i| pointer_sample(i, false)));
        });

        assert_eq!(samples[0].pos, pos);
        assert!(samples[0].primary_down);
        assert!(samples[0].primary_clicked);
        assert!(samples[1].primary_down);
        assert!(!samples[1].primary_clicked);
    }

    #[test]
    fn test_pointer_outside_window_hits_nothing() {
        let ctx = egui::Context::default();
        let mut sample = None;
        let _ = ctx.run(RawInput::default(), |ctx| {
            sample = Some(ctx.input(|i| pointer_sample(i, true)));
        });

        let sample = sample.unwrap();
        assert!(!sample.primary_down);
        assert!(!sample.primary_clicked);
        assert!(sample.pos.x.is_infinite());
    }

    #[test]
    fn test_show_paints_graph() {
        let ctx = egui::Context::default();
        let catalog = NodeCatalog::builtin();
        let mut state = GraphEditorState::default();
        let mut editor_ui = GraphEditorUi::new();

        let output = ctx.run(RawInput::default(), |ctx| {
            let metrics = EguiTextMetrics::new(ctx, state.settings.font_size);
            state.instantiate(&catalog, "Add", Pos2::new(20.0, 20.0), &metrics);
            egui::CentralPanel::default().show(ctx, |ui| {
                editor_ui.show(ui, &mut state, &catalog);
            });
        });

        assert_eq!(state.graph.node_count(), 1);
        assert!(!output.shapes.is_empty());
    }
}
