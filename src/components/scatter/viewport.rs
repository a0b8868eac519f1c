/// Margin between the canvas edge and the plot area, in logical pixels.
pub const PADDING: f64 = 60.0;
pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 3.0;
/// Minimum scale applied when focusing a clicked point.
pub const FOCUS_ZOOM: f64 = 1.5;

/// The affine mapping between data space and screen space.
///
/// Owned exclusively by the scatter view; mutated only through the
/// interaction methods below.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
	pub scale: f64,
	pub offset_x: f64,
	pub offset_y: f64,
}

impl Default for Viewport {
	fn default() -> Self {
		Self {
			scale: 1.0,
			offset_x: 0.0,
			offset_y: 0.0,
		}
	}
}

impl Viewport {
	/// Map a data-space position into logical screen pixels.
	///
	/// Data-space y grows upward, screen y grows downward, so y is flipped.
	pub fn to_screen(&self, width: f64, height: f64, x: f64, y: f64) -> (f64, f64) {
		let plot_w = width - 2.0 * PADDING;
		let plot_h = height - 2.0 * PADDING;
		(
			PADDING + ((x + 1.0) / 2.0) * plot_w * self.scale + self.offset_x,
			PADDING + ((1.0 - y) / 2.0) * plot_h * self.scale + self.offset_y,
		)
	}

	/// Inverse of [`Viewport::to_screen`].
	pub fn to_data(&self, width: f64, height: f64, sx: f64, sy: f64) -> (f64, f64) {
		let plot_w = width - 2.0 * PADDING;
		let plot_h = height - 2.0 * PADDING;
		(
			((sx - PADDING - self.offset_x) / (plot_w * self.scale)) * 2.0 - 1.0,
			1.0 - ((sy - PADDING - self.offset_y) / (plot_h * self.scale)) * 2.0,
		)
	}

	/// Apply one zoom step, clamped to the view's zoom bounds.
	pub fn zoom(&mut self, factor: f64) {
		self.scale = (self.scale * factor).clamp(MIN_ZOOM, MAX_ZOOM);
	}

	/// Translate by a screen-space delta.
	pub fn pan(&mut self, dx: f64, dy: f64) {
		self.offset_x += dx;
		self.offset_y += dy;
	}

	/// Restore the identity transform.
	pub fn reset(&mut self) {
		*self = Self::default();
	}

	/// Center the view on a data-space position, raising the scale to the
	/// focus threshold when below it. Never zooms out.
	pub fn focus_on(&mut self, width: f64, height: f64, x: f64, y: f64) {
		if self.scale < FOCUS_ZOOM {
			self.scale = FOCUS_ZOOM;
		}
		let plot_w = width - 2.0 * PADDING;
		let plot_h = height - 2.0 * PADDING;
		self.offset_x = width / 2.0 - PADDING - ((x + 1.0) / 2.0) * plot_w * self.scale;
		self.offset_y = height / 2.0 - PADDING - ((1.0 - y) / 2.0) * plot_h * self.scale;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const W: f64 = 800.0;
	const H: f64 = 600.0;

	#[test]
	fn origin_maps_to_plot_center_under_identity() {
		let v = Viewport::default();
		assert_eq!(v.to_screen(W, H, 0.0, 0.0), (400.0, 300.0));
	}

	#[test]
	fn y_axis_is_flipped() {
		let v = Viewport::default();
		let (_, top) = v.to_screen(W, H, 0.0, 1.0);
		let (_, bottom) = v.to_screen(W, H, 0.0, -1.0);
		assert!(top < bottom);
		assert_eq!(top, PADDING);
		assert_eq!(bottom, H - PADDING);
	}

	#[test]
	fn screen_round_trips_back_to_data() {
		let v = Viewport {
			scale: 1.7,
			offset_x: -42.0,
			offset_y: 13.5,
		};
		for &(x, y) in &[(0.0, 0.0), (-1.0, 1.0), (0.33, -0.81), (2.5, -3.0)] {
			let (sx, sy) = v.to_screen(W, H, x, y);
			let (rx, ry) = v.to_data(W, H, sx, sy);
			assert!((rx - x).abs() < 1e-9, "x: {rx} vs {x}");
			assert!((ry - y).abs() < 1e-9, "y: {ry} vs {y}");
		}
	}

	#[test]
	fn zoom_out_clamps_at_minimum_after_seven_steps() {
		let mut v = Viewport::default();
		for step in 1..=9 {
			v.zoom(0.9);
			if step < 7 {
				assert!(v.scale > MIN_ZOOM);
			} else {
				assert_eq!(v.scale, MIN_ZOOM);
			}
		}
	}

	#[test]
	fn zoom_in_clamps_at_maximum() {
		let mut v = Viewport::default();
		for _ in 0..60 {
			v.zoom(1.1);
		}
		assert_eq!(v.scale, MAX_ZOOM);
	}

	#[test]
	fn focus_centers_the_point_and_raises_scale() {
		let mut v = Viewport::default();
		v.focus_on(W, H, 0.4, -0.2);
		assert_eq!(v.scale, FOCUS_ZOOM);
		let (sx, sy) = v.to_screen(W, H, 0.4, -0.2);
		assert!((sx - W / 2.0).abs() < 1e-9);
		assert!((sy - H / 2.0).abs() < 1e-9);
	}

	#[test]
	fn focus_never_zooms_out() {
		let mut v = Viewport {
			scale: 2.4,
			..Viewport::default()
		};
		v.focus_on(W, H, 0.0, 0.0);
		assert_eq!(v.scale, 2.4);
	}

	#[test]
	fn reset_restores_identity() {
		let mut v = Viewport {
			scale: 2.0,
			offset_x: 50.0,
			offset_y: -20.0,
		};
		v.reset();
		assert_eq!(v, Viewport::default());
	}
}
