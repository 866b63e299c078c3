// SPDX-License-Identifier: MIT OR Apache-2.0
//! Material node graph editor for the Razor editor.
//!
//! This crate provides the editing surface of the material graph:
//! - A compiled-in catalog of node templates
//! - Node layout from text metrics
//! - A graph store with stable connector handles
//! - Drag-to-connect interaction
//! - Hermite link curves
//! - Rendering through a host-supplied canvas
//!
//! ## Architecture
//!
//! Everything runs once per frame on the UI thread. The host samples the
//! pointer, [`GraphEditorState::frame`] advances the interaction and mutates
//! the graph, and [`GraphEditorState::present`] emits draw primitives. The
//! [`ui`] module wires this to egui.

pub mod catalog;
pub mod connector;
pub mod curve;
pub mod editor;
pub mod graph;
pub mod interaction;
pub mod layout;
pub mod node;
pub mod presenter;
pub mod settings;
pub mod ui;

pub use catalog::{NodeCatalog, NodeTemplate};
pub use connector::{Connector, ConnectorRef, ConnectorRole, ValueKind};
pub use editor::GraphEditorState;
pub use graph::Graph;
pub use interaction::{ConnectorInteraction, DragState, InteractionEvent, PointerSample};
pub use layout::TextMetrics;
pub use node::{Node, NodeId};
pub use presenter::Canvas;
pub use settings::{EditorSettings, LinkPolicy};
