//! Typed coordinate units and viewport scaling.
//!
//! Geometry in this system lives in two spaces: PDF-native points (origin
//! bottom-left, 1/72 inch) and viewport pixels (origin top-left, scaled by
//! the current fit/zoom factor). Each space has its own unit type; crossing
//! between them always requires an explicit [`Scale`].

use serde::{Deserialize, Serialize};

/// A coordinate or length in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Px(pub f64);

/// A coordinate or length in PDF points.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Pt(pub f64);

/// Pixels-per-point multiplier in effect for one render.
///
/// Non-finite or non-positive inputs collapse to 1.0 so a corrupted scale
/// can never produce infinities downstream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scale(f64);

impl Scale {
    pub fn new(value: f64) -> Self {
        if value.is_finite() && value > 0.0 {
            Scale(value)
        } else {
            Scale(1.0)
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Scale {
    fn default() -> Self {
        Scale(1.0)
    }
}

impl Px {
    /// Convert to point space at the given render scale.
    pub fn to_pt(self, scale: Scale) -> Pt {
        Pt(self.0 / scale.value())
    }
}

impl Pt {
    /// Convert to pixel space at the given render scale.
    pub fn to_px(self, scale: Scale) -> Px {
        Px(self.0 * scale.value())
    }
}

/// An axis-aligned rectangle in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PxRect {
    pub x: Px,
    pub y: Px,
    pub width: Px,
    pub height: Px,
}

impl PxRect {
    pub fn to_pt(self, scale: Scale) -> PtRect {
        PtRect {
            x: self.x.to_pt(scale),
            y: self.y.to_pt(scale),
            width: self.width.to_pt(scale),
            height: self.height.to_pt(scale),
        }
    }
}

/// An axis-aligned rectangle in PDF points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PtRect {
    pub x: Pt,
    pub y: Pt,
    pub width: Pt,
    pub height: Pt,
}

/// Horizontal breathing room the page keeps inside its container.
const FIT_GUTTER_PX: f64 = 16.0;

/// Floor for the fit factor; also covers zero-width containers.
const MIN_FIT: f64 = 0.25;

const MIN_ZOOM: f64 = 0.5;
const MAX_ZOOM: f64 = 3.0;
const ZOOM_STEP: f64 = 0.1;

/// The two multiplicative factors that map points onto screen pixels.
///
/// The fit factor makes the page width fill the container; the zoom factor
/// is the user-controlled multiplier on top. Their product is the effective
/// scale every pixel measurement is captured at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportScale {
    fit: f64,
    zoom: f64,
}

impl ViewportScale {
    pub fn new() -> Self {
        ViewportScale { fit: 1.0, zoom: 1.0 }
    }

    /// Recompute the fit factor for a container of the given pixel width and
    /// a page of the given point width. Must be called on every container
    /// resize; a degenerate container clamps to the floor instead of
    /// dividing by zero.
    pub fn fit_to_container(&mut self, container_width_px: f64, page_width_pt: f64) {
        let fit = if page_width_pt > 0.0 && container_width_px.is_finite() {
            (container_width_px - FIT_GUTTER_PX) / page_width_pt
        } else {
            MIN_FIT
        };
        self.fit = fit.max(MIN_FIT);
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - ZOOM_STEP);
    }

    pub fn fit(&self) -> f64 {
        self.fit
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// The effective pixels-per-point scale, fit x zoom.
    pub fn effective(&self) -> Scale {
        Scale::new(self.fit * self.zoom)
    }
}

impl Default for ViewportScale {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn px_to_pt_divides_by_scale() {
        let s = Scale::new(2.0);
        assert_eq!(Px(100.0).to_pt(s), Pt(50.0));
        assert_eq!(Pt(50.0).to_px(s), Px(100.0));
    }

    #[test]
    fn degenerate_scale_collapses_to_identity() {
        assert_eq!(Scale::new(0.0).value(), 1.0);
        assert_eq!(Scale::new(-3.0).value(), 1.0);
        assert_eq!(Scale::new(f64::NAN).value(), 1.0);
    }

    #[test]
    fn fit_fills_container_width() {
        let mut vs = ViewportScale::new();
        // 628px container over a Letter page: (628 - 16) / 612 = 1.0
        vs.fit_to_container(628.0, 612.0);
        assert!((vs.fit() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn fit_clamps_to_floor_for_tiny_or_zero_containers() {
        let mut vs = ViewportScale::new();
        vs.fit_to_container(0.0, 612.0);
        assert_eq!(vs.fit(), 0.25);

        vs.fit_to_container(100.0, 612.0);
        assert_eq!(vs.fit(), 0.25);

        // Zero-width page must not divide by zero either.
        vs.fit_to_container(800.0, 0.0);
        assert_eq!(vs.fit(), 0.25);
    }

    #[test]
    fn zoom_clamps_to_range() {
        let mut vs = ViewportScale::new();
        vs.set_zoom(10.0);
        assert_eq!(vs.zoom(), 3.0);
        vs.set_zoom(0.01);
        assert_eq!(vs.zoom(), 0.5);

        vs.set_zoom(0.5);
        vs.zoom_out();
        assert_eq!(vs.zoom(), 0.5);
        vs.zoom_in();
        assert!((vs.zoom() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn effective_scale_is_fit_times_zoom() {
        let mut vs = ViewportScale::new();
        vs.fit_to_container(628.0, 612.0);
        vs.set_zoom(1.5);
        assert!((vs.effective().value() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn rect_conversion_scales_every_field() {
        let rect = PxRect {
            x: Px(24.0),
            y: Px(48.0),
            width: Px(120.0),
            height: Px(30.0),
        };
        let pt = rect.to_pt(Scale::new(2.0));
        assert_eq!(pt.x, Pt(12.0));
        assert_eq!(pt.y, Pt(24.0));
        assert_eq!(pt.width, Pt(60.0));
        assert_eq!(pt.height, Pt(15.0));
    }
}
