//! Viewport Controller - pan/zoom transform from simulation to screen space
//!
//! The transform is purely presentational: it never touches node positions.
//! Layout coordinates live in simulation space; the transform maps them to
//! widget-local screen coordinates (origin at the widget's top-left).
//!
//! # EGUI-RULES Compliance
//! - Viewport state is UI-only (not server data)
//! - No callbacks - gestures return whether the transform changed

use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Zoom limits and input sensitivity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportLimits {
    pub min_scale: f32,
    pub max_scale: f32,
    /// Factor applied per keyboard zoom step
    pub zoom_step: f32,
    /// Scroll delta to zoom factor conversion
    pub scroll_sensitivity: f32,
}

impl Default for ViewportLimits {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 8.0,
            zoom_step: 1.2,
            scroll_sensitivity: 0.001,
        }
    }
}

impl ViewportLimits {
    /// Clamp a scale into the limits. Unlike `f32::clamp` this never panics
    /// on inverted or NaN limits; `max_scale` wins.
    pub fn clamp_scale(&self, scale: f32) -> f32 {
        scale.max(self.min_scale).min(self.max_scale)
    }
}

/// Affine map `screen = world * scale + translate`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    pub translate: Vec2,
    pub scale: f32,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewportTransform {
    pub const IDENTITY: Self = Self {
        translate: Vec2::ZERO,
        scale: 1.0,
    };

    /// Simulation space → widget-local screen space
    pub fn apply(&self, world: Pos2) -> Pos2 {
        (world.to_vec2() * self.scale + self.translate).to_pos2()
    }

    /// Widget-local screen space → simulation space
    pub fn invert(&self, screen: Pos2) -> Pos2 {
        ((screen.to_vec2() - self.translate) / self.scale).to_pos2()
    }
}

/// Discrete viewport input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Drag by a screen-space delta
    Pan(Vec2),
    /// Multiply scale by `factor`, keeping `anchor` (widget-local) fixed
    Zoom { factor: f32, anchor: Pos2 },
    /// Back to the identity transform
    Reset,
}

/// Owns the viewport transform
#[derive(Debug, Clone, Default)]
pub struct ViewportController {
    transform: ViewportTransform,
    pub limits: ViewportLimits,
}

impl ViewportController {
    pub fn new(limits: ViewportLimits) -> Self {
        Self {
            transform: ViewportTransform::IDENTITY,
            limits,
        }
    }

    pub fn transform(&self) -> ViewportTransform {
        self.transform
    }

    /// Current zoom level
    pub fn scale(&self) -> f32 {
        self.transform.scale
    }

    /// Apply a gesture; returns true if the transform changed
    pub fn on_gesture(&mut self, gesture: Gesture) -> bool {
        match gesture {
            Gesture::Pan(delta) => self.pan(delta),
            Gesture::Zoom { factor, anchor } => self.zoom_at(factor, anchor),
            Gesture::Reset => {
                let changed = self.transform != ViewportTransform::IDENTITY;
                self.reset();
                changed
            }
        }
    }

    // =========================================================================
    // CAMERA CONTROLS
    // =========================================================================

    /// Pan by delta in screen coordinates
    pub fn pan(&mut self, screen_delta: Vec2) -> bool {
        if !screen_delta.is_finite() || screen_delta == Vec2::ZERO {
            return false;
        }
        self.transform.translate += screen_delta;
        true
    }

    /// Zoom by factor, keeping `anchor` fixed on screen
    pub fn zoom_at(&mut self, factor: f32, anchor: Pos2) -> bool {
        if !factor.is_finite() || factor <= 0.0 || !anchor.is_finite() {
            return false;
        }
        let old_scale = self.transform.scale;
        let new_scale = self.limits.clamp_scale(old_scale * factor);
        if !(new_scale > 0.0) || (new_scale - old_scale).abs() <= f32::EPSILON * old_scale {
            return false;
        }

        let anchor = anchor.to_vec2();
        self.transform.translate = anchor - (anchor - self.transform.translate) * (new_scale / old_scale);
        self.transform.scale = new_scale;
        true
    }

    /// Zoom in one keyboard step around `anchor`
    pub fn zoom_in(&mut self, anchor: Pos2) -> bool {
        self.zoom_at(self.limits.zoom_step, anchor)
    }

    /// Zoom out one keyboard step around `anchor`
    pub fn zoom_out(&mut self, anchor: Pos2) -> bool {
        self.zoom_at(1.0 / self.limits.zoom_step, anchor)
    }

    /// Zoom factor for a scroll delta
    pub fn scroll_factor(&self, scroll_y: f32) -> f32 {
        (scroll_y * self.limits.scroll_sensitivity).exp()
    }

    /// Fit a simulation-space bounding box into a viewport of `size`
    pub fn fit_to_bounds(&mut self, bounds: Rect, size: Vec2, padding: f32) {
        if !bounds.is_finite() || bounds.is_negative() {
            return;
        }

        let available = (size - Vec2::splat(2.0 * padding)).max(Vec2::splat(1.0));
        let scale = if bounds.width() < 1.0 && bounds.height() < 1.0 {
            self.transform.scale
        } else {
            let zoom_x = available.x / bounds.width().max(1.0);
            let zoom_y = available.y / bounds.height().max(1.0);
            zoom_x.min(zoom_y)
        };
        let scale = self.limits.clamp_scale(scale);

        self.transform.scale = scale;
        self.transform.translate = size / 2.0 - bounds.center().to_vec2() * scale;
    }

    /// Reset to the identity transform
    pub fn reset(&mut self) {
        self.transform = ViewportTransform::IDENTITY;
    }

    // =========================================================================
    // COORDINATE TRANSFORMS
    // =========================================================================

    /// Transform world position to screen position
    pub fn world_to_screen(&self, world_pos: Pos2, screen_rect: Rect) -> Pos2 {
        screen_rect.min + self.transform.apply(world_pos).to_vec2()
    }

    /// Transform screen position to world position
    pub fn screen_to_world(&self, screen_pos: Pos2, screen_rect: Rect) -> Pos2 {
        self.transform
            .invert((screen_pos - screen_rect.min).to_pos2())
    }

    /// Get the visible world bounds for the current screen rect
    pub fn visible_bounds(&self, screen_rect: Rect) -> Rect {
        Rect::from_min_max(
            self.screen_to_world(screen_rect.min, screen_rect),
            self.screen_to_world(screen_rect.max, screen_rect),
        )
    }
}
