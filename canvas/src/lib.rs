//! Editor core for composing decorative overlays on a smile photo.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! interaction model of the editing stage: placing catalog items as overlays,
//! selecting and moving them (alone or as a group), resizing and rotating a
//! single overlay, deleting, and undo/redo over the whole composition. The
//! host JavaScript layer wires DOM events to the engine, loads the images the
//! engine asks for, and persists the resulting [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`doc`] | Overlays, the ordered composition, and save/load wire shapes |
//! | [`history`] | Bounded undo/redo stacks over snapshots |
//! | [`selection`] | Selection set, marquee selection, group moves |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`hit`] | Hit-testing against overlays and their controls |
//! | [`render`] | Scene building and 2D canvas painting |
//! | [`catalog`] | Catalog items and image URL resolution |
//! | [`assets`] | Per-URL image load state |
//! | [`geometry`] | Points, rectangles, clamping, cover fit, rotation |
//! | [`consts`] | Shared numeric constants (minimum size, handle geometry) |
//! | [`error`] | Error type for payload parsing and painting |

pub mod assets;
pub mod catalog;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod history;
pub mod hit;
pub mod input;
pub mod render;
pub mod selection;
