use crate::components::projection::{self, DataPoint};
use crate::components::types::Thought;

use super::proximity::proximity_links;
use super::viewport::Viewport;

/// Drawn radius of a point, logical px.
pub const POINT_RADIUS: f64 = 5.0;
/// Drawn radius of the hovered point.
pub const HOVER_POINT_RADIUS: f64 = 8.0;
/// Screen-space radius within which a point takes hover.
pub const HOVER_RADIUS: f64 = 15.0;
/// Maximum pointer travel between down and up for a click, logical px.
const CLICK_SLOP: f64 = 3.0;

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub last_x: f64,
	pub last_y: f64,
	press_x: f64,
	press_y: f64,
}

/// Scatter view state: resolved points, derived proximity links, the
/// viewport transform, and the pointer state machine over it.
pub struct ScatterState {
	pub points: Vec<DataPoint>,
	pub links: Vec<(usize, usize)>,
	pub viewport: Viewport,
	pub drag: DragState,
	pub hover: Option<usize>,
	pub width: f64,
	pub height: f64,
}

impl ScatterState {
	pub fn new(thoughts: &[Thought], width: f64, height: f64) -> Self {
		let points = projection::resolve_all(thoughts);
		let links = proximity_links(&points);
		Self {
			points,
			links,
			viewport: Viewport::default(),
			drag: DragState::default(),
			hover: None,
			width,
			height,
		}
	}

	/// Swap in a refreshed thought collection.
	///
	/// Any ongoing drag and any hover are invalidated so nothing references a
	/// since-removed item; the viewport is view state and is kept.
	pub fn replace_thoughts(&mut self, thoughts: &[Thought]) {
		self.points = projection::resolve_all(thoughts);
		self.links = proximity_links(&self.points);
		self.drag = DragState::default();
		self.hover = None;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.drag = DragState::default();
		self.hover = None;
	}

	/// A zero-area surface is skipped rather than divided by.
	pub fn renderable(&self) -> bool {
		self.width > 0.0 && self.height > 0.0
	}

	/// First point within [`HOVER_RADIUS`] of a screen position, in input
	/// order. The fixed order is the tie-break when several are in range.
	pub fn hit_test(&self, sx: f64, sy: f64) -> Option<usize> {
		self.points.iter().position(|p| {
			let (px, py) = self.viewport.to_screen(self.width, self.height, p.x, p.y);
			let (dx, dy) = (px - sx, py - sy);
			(dx * dx + dy * dy).sqrt() < HOVER_RADIUS
		})
	}

	pub fn pointer_down(&mut self, x: f64, y: f64) {
		self.drag.active = true;
		self.drag.last_x = x;
		self.drag.last_y = y;
		self.drag.press_x = x;
		self.drag.press_y = y;
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		if self.drag.active {
			self.viewport.pan(x - self.drag.last_x, y - self.drag.last_y);
			self.drag.last_x = x;
			self.drag.last_y = y;
		} else {
			self.hover = self.hit_test(x, y);
		}
	}

	/// End the gesture. A release within the click slop of the press, while a
	/// point is hovered, is a click: the view focuses that point and its
	/// index is returned for the host's focus callback.
	pub fn pointer_up(&mut self, x: f64, y: f64) -> Option<usize> {
		if !self.drag.active {
			return None;
		}
		self.drag.active = false;
		let (dx, dy) = (x - self.drag.press_x, y - self.drag.press_y);
		if (dx * dx + dy * dy).sqrt() > CLICK_SLOP {
			return None;
		}
		let target = self.hover?;
		self.focus_index(target);
		Some(target)
	}

	pub fn pointer_leave(&mut self) {
		self.drag = DragState::default();
		self.hover = None;
	}

	pub fn wheel(&mut self, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		self.viewport.zoom(factor);
	}

	pub fn reset_view(&mut self) {
		self.viewport.reset();
	}

	/// Center the viewport on a point, zooming in to the focus threshold.
	pub fn focus_index(&mut self, index: usize) {
		if let Some(p) = self.points.get(index) {
			let (x, y) = (p.x, p.y);
			self.viewport.focus_on(self.width, self.height, x, y);
		}
	}

	pub fn hovered_id(&self) -> Option<&str> {
		self.hover
			.and_then(|i| self.points.get(i))
			.map(|p| p.id.as_str())
	}

	/// Cursor hint for the surrounding UI.
	pub fn cursor(&self) -> &'static str {
		if self.drag.active {
			"grabbing"
		} else if self.hover.is_some() {
			"pointer"
		} else {
			"grab"
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::scatter::viewport::FOCUS_ZOOM;

	const W: f64 = 800.0;
	const H: f64 = 600.0;

	fn thought_at(id: &str, x: f64, y: f64) -> Thought {
		Thought {
			id: id.into(),
			content: format!("thought {id}"),
			timestamp: 0,
			embedding: Vec::new(),
			projected: Some((x, y)),
			size_metric: None,
		}
	}

	fn state(points: &[(&str, f64, f64)]) -> ScatterState {
		let thoughts: Vec<Thought> = points
			.iter()
			.map(|&(id, x, y)| thought_at(id, x, y))
			.collect();
		ScatterState::new(&thoughts, W, H)
	}

	#[test]
	fn drag_pans_by_pointer_deltas() {
		let mut s = state(&[("a", 0.0, 0.0)]);
		s.pointer_down(100.0, 100.0);
		assert!(s.drag.active);
		s.pointer_move(130.0, 90.0);
		assert_eq!(s.viewport.offset_x, 30.0);
		assert_eq!(s.viewport.offset_y, -10.0);
		s.pointer_move(140.0, 95.0);
		assert_eq!(s.viewport.offset_x, 40.0);
		assert_eq!(s.viewport.offset_y, -5.0);
		assert_eq!(s.pointer_up(140.0, 95.0), None);
		assert!(!s.drag.active);
	}

	#[test]
	fn idle_move_sets_and_clears_hover() {
		let mut s = state(&[("a", 0.0, 0.0)]);
		// (0, 0) projects to the plot center under the identity transform.
		s.pointer_move(405.0, 305.0);
		assert_eq!(s.hovered_id(), Some("a"));
		s.pointer_move(700.0, 100.0);
		assert_eq!(s.hover, None);
	}

	#[test]
	fn hover_tie_break_is_input_order() {
		let mut s = state(&[("first", 0.0, 0.0), ("second", 0.0, 0.0)]);
		s.pointer_move(400.0, 300.0);
		assert_eq!(s.hovered_id(), Some("first"));
	}

	#[test]
	fn hover_is_not_updated_while_dragging() {
		let mut s = state(&[("a", 0.0, 0.0)]);
		s.pointer_down(100.0, 100.0);
		s.pointer_move(400.0, 300.0);
		assert_eq!(s.hover, None);
	}

	#[test]
	fn click_on_hovered_point_focuses_it() {
		let mut s = state(&[("a", 0.3, -0.4)]);
		let (sx, sy) = s.viewport.to_screen(W, H, 0.3, -0.4);
		s.pointer_move(sx, sy);
		s.pointer_down(sx, sy);
		let focused = s.pointer_up(sx + 1.0, sy);
		assert_eq!(focused, Some(0));
		assert_eq!(s.viewport.scale, FOCUS_ZOOM);
		let (cx, cy) = s.viewport.to_screen(W, H, 0.3, -0.4);
		assert!((cx - W / 2.0).abs() < 1e-9);
		assert!((cy - H / 2.0).abs() < 1e-9);
	}

	#[test]
	fn a_real_drag_is_not_a_click() {
		let mut s = state(&[("a", 0.0, 0.0)]);
		s.pointer_move(400.0, 300.0);
		s.pointer_down(400.0, 300.0);
		s.pointer_move(460.0, 300.0);
		assert_eq!(s.pointer_up(460.0, 300.0), None);
		assert_eq!(s.viewport.scale, 1.0);
	}

	#[test]
	fn wheel_zoom_respects_bounds_through_the_state_machine() {
		let mut s = state(&[("a", 0.0, 0.0)]);
		for _ in 0..20 {
			s.wheel(1.0);
		}
		assert_eq!(s.viewport.scale, 0.5);
		for _ in 0..40 {
			s.wheel(-1.0);
		}
		assert_eq!(s.viewport.scale, 3.0);
	}

	#[test]
	fn resize_cancels_drag_and_hover() {
		let mut s = state(&[("a", 0.0, 0.0)]);
		s.pointer_move(400.0, 300.0);
		s.pointer_down(400.0, 300.0);
		s.resize(1024.0, 768.0);
		assert!(!s.drag.active);
		assert_eq!(s.hover, None);
	}

	#[test]
	fn data_replacement_clears_hover_but_keeps_the_view() {
		let mut s = state(&[("a", 0.0, 0.0)]);
		s.wheel(-1.0);
		s.pointer_move(400.0, 300.0);
		let scale = s.viewport.scale;
		s.replace_thoughts(&[thought_at("b", 0.5, 0.5)]);
		assert_eq!(s.hover, None);
		assert!(!s.drag.active);
		assert_eq!(s.viewport.scale, scale);
		assert_eq!(s.points.len(), 1);
	}

	#[test]
	fn zero_area_surface_is_not_renderable() {
		let mut s = state(&[("a", 0.0, 0.0)]);
		assert!(s.renderable());
		s.resize(0.0, 600.0);
		assert!(!s.renderable());
	}

	#[test]
	fn cursor_tracks_the_state_machine() {
		let mut s = state(&[("a", 0.0, 0.0)]);
		assert_eq!(s.cursor(), "grab");
		s.pointer_move(400.0, 300.0);
		assert_eq!(s.cursor(), "pointer");
		s.pointer_down(400.0, 300.0);
		assert_eq!(s.cursor(), "grabbing");
	}
}
