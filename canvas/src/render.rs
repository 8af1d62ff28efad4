//! Rendering: turns engine state into a scene and paints it to a 2D context.
//!
//! Rendering is split in two. [`build_scene`] reads an [`EngineCore`] and
//! decides what is visible (which overlays have a resolved image, where the
//! selection chrome goes, whether the background is still loading). [`paint`]
//! is the only place that touches [`web_sys::CanvasRenderingContext2d`]; it
//! walks the scene and issues draw calls without mutating any application
//! state.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::collections::HashMap;
use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::assets::AssetState;
use crate::consts::{DELETE_BUTTON_RADIUS_PX, DROP_PREVIEW_OPACITY, HANDLE_RADIUS_PX};
use crate::doc::{ObjectId, Overlay};
use crate::engine::EngineCore;
use crate::geometry::{Point, Rect, Size, cover_fit, rotate_offset};
use crate::hit::{self, Corner};

/// Selection dash segment length in pixels.
const SELECTION_DASH_PX: f64 = 4.0;

const SELECTION_COLOR: &str = "#1E90FF";
const DELETE_COLOR: &str = "#E5484D";

/// How the background photo should be drawn.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum BackgroundLayer {
    /// No background set.
    #[default]
    Empty,
    /// Background requested but not decoded yet.
    Loading,
    /// Background decoded; draw `url` into `rect` (cover fit).
    Ready { url: String, rect: Rect },
    /// Background could not be loaded.
    Failed,
}

/// One image drawn as a rotated square.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    /// Overlay this sprite shows; `None` for the drop preview.
    pub id: Option<ObjectId>,
    pub url: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub rotation: f64,
    pub opacity: f64,
}

/// Selection chrome around one overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionFrame {
    /// The overlay as currently displayed.
    pub overlay: Overlay,
    /// Resize and rotate handles are shown only for a single selection.
    pub handles: bool,
}

/// Everything visible on the stage, bottom layer first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub stage: Size,
    pub background: BackgroundLayer,
    pub sprites: Vec<Sprite>,
    pub preview: Option<Sprite>,
    pub frames: Vec<SelectionFrame>,
    pub delete_button: Option<Point>,
    pub marquee: Option<Rect>,
}

/// Describe what the stage shows right now. A zero-area stage shows nothing.
#[must_use]
pub fn build_scene(core: &EngineCore) -> Scene {
    let stage = core.stage_size();
    if !stage.is_drawable() {
        return Scene { stage, ..Scene::default() };
    }

    let sprites = core
        .composition()
        .overlays()
        .iter()
        .filter_map(|o| {
            let shown = core.displayed_overlay(o);
            let url = ready_url(core, &shown.item_id)?;
            Some(Sprite {
                id: Some(shown.id),
                url,
                x: shown.x,
                y: shown.y,
                size: shown.size,
                rotation: shown.rotation,
                opacity: 1.0,
            })
        })
        .collect();

    let preview = core.drop_preview().and_then(|p| {
        let url = ready_url(core, &p.item_id)?;
        Some(Sprite { id: None, url, x: p.x, y: p.y, size: p.size, rotation: 0.0, opacity: DROP_PREVIEW_OPACITY })
    });

    let selection = core.selection();
    let handles = selection.len() == 1;
    let frames: Vec<SelectionFrame> = core
        .composition()
        .overlays()
        .iter()
        .filter(|o| selection.contains(&o.id))
        .map(|o| SelectionFrame { overlay: core.displayed_overlay(o), handles })
        .collect();
    let delete_button = frames
        .iter()
        .find(|f| f.handles)
        .map(|f| hit::delete_button_center(&f.overlay));

    Scene {
        stage,
        background: background_layer(core, stage),
        sprites,
        preview,
        frames,
        delete_button,
        marquee: core.input().marquee().filter(|r| !r.is_empty()),
    }
}

fn ready_url(core: &EngineCore, item_id: &str) -> Option<String> {
    let url = core.item_image_url(item_id)?;
    core.assets().is_ready(&url).then_some(url)
}

fn background_layer(core: &EngineCore, stage: Size) -> BackgroundLayer {
    let Some(url) = core.background() else {
        return BackgroundLayer::Empty;
    };
    match core.assets().state(url) {
        Some(AssetState::Ready { width, height }) => BackgroundLayer::Ready {
            url: url.to_string(),
            rect: cover_fit(stage.width, stage.height, width, height),
        },
        Some(AssetState::Failed) => BackgroundLayer::Failed,
        Some(AssetState::Pending) | None => BackgroundLayer::Loading,
    }
}

// =============================================================
// Painting
// =============================================================

/// Paint `scene` to `ctx`. Sprites whose image element is missing are skipped.
///
/// `dpr` is the device pixel ratio of the backing store.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn paint(
    ctx: &CanvasRenderingContext2d,
    scene: &Scene,
    images: &HashMap<String, HtmlImageElement>,
    dpr: f64,
) -> Result<(), JsValue> {
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, scene.stage.width, scene.stage.height);
    if !scene.stage.is_drawable() {
        return Ok(());
    }

    // Layer 1: background photo or its status.
    draw_background(ctx, scene, images)?;

    // Layer 2: overlays in paint order, then the drop preview on top.
    for sprite in scene.sprites.iter().chain(scene.preview.as_ref()) {
        if let Some(image) = images.get(&sprite.url) {
            draw_sprite(ctx, sprite, image)?;
        }
    }

    // Layer 3: selection chrome.
    for frame in &scene.frames {
        draw_frame(ctx, frame)?;
    }
    if let Some(center) = scene.delete_button {
        draw_delete_button(ctx, center)?;
    }
    if let Some(m) = scene.marquee {
        draw_marquee(ctx, m)?;
    }

    Ok(())
}

fn draw_background(
    ctx: &CanvasRenderingContext2d,
    scene: &Scene,
    images: &HashMap<String, HtmlImageElement>,
) -> Result<(), JsValue> {
    match &scene.background {
        BackgroundLayer::Empty => Ok(()),
        BackgroundLayer::Ready { url, rect } => match images.get(url) {
            Some(image) => {
                ctx.draw_image_with_html_image_element_and_dw_and_dh(image, rect.x, rect.y, rect.width, rect.height)
            }
            None => Ok(()),
        },
        BackgroundLayer::Loading => draw_status(ctx, scene.stage, "Loading canvas...", "#6B7280"),
        BackgroundLayer::Failed => draw_status(ctx, scene.stage, "Failed to load image", "#EF4444"),
    }
}

fn draw_status(ctx: &CanvasRenderingContext2d, stage: Size, text: &str, color: &str) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_fill_style_str("#F3F4F6");
    ctx.fill_rect(0.0, 0.0, stage.width, stage.height);
    ctx.set_fill_style_str(color);
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.set_font("14px sans-serif");
    ctx.fill_text(text, stage.width / 2.0, stage.height / 2.0)?;
    ctx.restore();
    Ok(())
}

fn draw_sprite(ctx: &CanvasRenderingContext2d, sprite: &Sprite, image: &HtmlImageElement) -> Result<(), JsValue> {
    let half = sprite.size / 2.0;
    ctx.save();
    ctx.set_global_alpha(sprite.opacity);
    ctx.translate(sprite.x + half, sprite.y + half)?;
    ctx.rotate(sprite.rotation.to_radians())?;
    ctx.draw_image_with_html_image_element_and_dw_and_dh(image, -half, -half, sprite.size, sprite.size)?;
    ctx.restore();
    Ok(())
}

fn draw_frame(ctx: &CanvasRenderingContext2d, frame: &SelectionFrame) -> Result<(), JsValue> {
    let o = &frame.overlay;
    let half = o.size / 2.0;
    let center = o.center();

    // Dashed outline (rotated with the overlay).
    ctx.save();
    ctx.translate(center.x, center.y)?;
    ctx.rotate(o.rotation.to_radians())?;
    ctx.set_stroke_style_str(SELECTION_COLOR);
    ctx.set_line_width(1.0);
    set_dash(ctx, SELECTION_DASH_PX)?;
    ctx.stroke_rect(-half, -half, o.size, o.size);
    set_dash(ctx, 0.0)?;
    ctx.restore();

    if !frame.handles {
        return Ok(());
    }

    ctx.save();
    ctx.set_fill_style_str("#fff");
    ctx.set_stroke_style_str(SELECTION_COLOR);
    ctx.set_line_width(1.0);

    // Stem from the middle of the top edge up to the rotate knob.
    let top_mid = center.offset(rotate_offset(0.0, -half, o.rotation));
    let knob = hit::rotate_handle_point(o);
    ctx.begin_path();
    ctx.move_to(top_mid.x, top_mid.y);
    ctx.line_to(knob.x, knob.y);
    ctx.stroke();

    let r = HANDLE_RADIUS_PX / 2.0;
    for corner in Corner::ALL {
        let p = hit::corner_point(o, corner);
        ctx.fill_rect(p.x - r, p.y - r, r * 2.0, r * 2.0);
        ctx.stroke_rect(p.x - r, p.y - r, r * 2.0, r * 2.0);
    }

    ctx.begin_path();
    ctx.arc(knob.x, knob.y, r, 0.0, 2.0 * PI)?;
    ctx.fill();
    ctx.stroke();

    ctx.restore();
    Ok(())
}

fn draw_delete_button(ctx: &CanvasRenderingContext2d, center: Point) -> Result<(), JsValue> {
    let arm = DELETE_BUTTON_RADIUS_PX * 0.4;
    ctx.save();
    ctx.begin_path();
    ctx.arc(center.x, center.y, DELETE_BUTTON_RADIUS_PX, 0.0, 2.0 * PI)?;
    ctx.set_fill_style_str(DELETE_COLOR);
    ctx.fill();

    ctx.set_stroke_style_str("#fff");
    ctx.set_line_width(2.0);
    ctx.begin_path();
    ctx.move_to(center.x - arm, center.y - arm);
    ctx.line_to(center.x + arm, center.y + arm);
    ctx.move_to(center.x + arm, center.y - arm);
    ctx.line_to(center.x - arm, center.y + arm);
    ctx.stroke();
    ctx.restore();
    Ok(())
}

fn draw_marquee(ctx: &CanvasRenderingContext2d, marquee: Rect) -> Result<(), JsValue> {
    ctx.save();
    set_dash(ctx, SELECTION_DASH_PX)?;
    ctx.set_stroke_style_str(SELECTION_COLOR);
    ctx.set_fill_style_str("rgba(30, 144, 255, 0.12)");
    ctx.set_line_width(1.0);
    ctx.fill_rect(marquee.x, marquee.y, marquee.width, marquee.height);
    ctx.stroke_rect(marquee.x, marquee.y, marquee.width, marquee.height);
    set_dash(ctx, 0.0)?;
    ctx.restore();
    Ok(())
}

// =============================================================
// Helpers
// =============================================================

/// Set an even dash pattern of `segment` pixels; `0.0` restores solid lines.
fn set_dash(ctx: &CanvasRenderingContext2d, segment: f64) -> Result<(), JsValue> {
    let dash_array = js_sys::Array::new();
    if segment > 0.0 {
        dash_array.push(&segment.into());
        dash_array.push(&segment.into());
    }
    ctx.set_line_dash(&dash_array)
}
