use std::collections::HashMap;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::{debug, warn};

use crate::components::projection;
use crate::components::types::ThoughtGraph;

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 5.0;
/// Minimum camera zoom applied when focusing a clicked node.
pub const FOCUS_ZOOM: f64 = 1.5;
/// Base node radius, world units.
pub const NODE_RADIUS: f64 = 5.0;
/// Slack around the visual radius for pointer hits, so small nodes stay
/// easy to target.
pub const HIT_SLACK: f64 = 4.0;
/// Solver ticks granted back when a node drag begins.
const REHEAT_TICKS: u32 = 120;
/// World-units-per-data-unit used to seed the solver layout.
const LAYOUT_SCALE: f64 = 220.0;
/// Maximum pointer travel for a click, logical px.
const CLICK_SLOP: f64 = 3.0;

/// Per-node payload carried through the solver.
#[derive(Clone, Debug, Default)]
pub struct ThoughtInfo {
	pub id: String,
	pub content: String,
	pub timestamp: i64,
	pub radius: f64,
}

/// The camera over solver space: translation plus zoom. The solver owns the
/// node layout; this transform is the only mapping applied to it.
#[derive(Clone, Debug)]
pub struct Camera {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Camera {
	pub fn world_to_screen(&self, wx: f64, wy: f64) -> (f64, f64) {
		(wx * self.k + self.x, wy * self.k + self.y)
	}

	pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Zoom by a wheel factor about a screen position, clamped to this
	/// view's bounds.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = new_k;
	}
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub camera_start_x: f64,
	pub camera_start_y: f64,
}

/// Network view state: the force solver plus the camera and pointer state
/// layered over it.
pub struct NetworkState {
	pub graph: ForceGraph<ThoughtInfo, f32>,
	pub camera: Camera,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: Option<DefaultNodeIdx>,
	pub width: f64,
	pub height: f64,
	settle_budget: u32,
}

impl NetworkState {
	/// Build the solver from a thought graph. Similarity edges whose
	/// endpoints are not both present are dropped here, before anything is
	/// rendered. `settle_ticks` and `decay` configure the solver's cooldown
	/// once; the loop cadence itself belongs to the solver's host.
	pub fn new(data: &ThoughtGraph, width: f64, height: f64, settle_ticks: u32, decay: f32) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: decay,
		});
		let mut id_to_idx = HashMap::new();

		let points = projection::resolve_all(&data.thoughts);
		for (thought, point) in data.thoughts.iter().zip(&points) {
			let radius = thought
				.size_metric
				.map(|m| (NODE_RADIUS + 2.0 * m.max(0.0).sqrt()).min(18.0))
				.unwrap_or(NODE_RADIUS);
			let idx = graph.add_node(NodeData {
				x: (point.x * LAYOUT_SCALE) as f32,
				y: (-point.y * LAYOUT_SCALE) as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: ThoughtInfo {
					id: thought.id.clone(),
					content: thought.content.clone(),
					timestamp: thought.timestamp,
					radius,
				},
			});
			id_to_idx.insert(thought.id.clone(), idx);
		}

		let mut kept = 0usize;
		for link in &data.links {
			match (id_to_idx.get(&link.source), id_to_idx.get(&link.target)) {
				(Some(&src), Some(&tgt)) => {
					graph.add_edge(
						src,
						tgt,
						EdgeData {
							user_data: link.similarity as f32,
							..Default::default()
						},
					);
					kept += 1;
				}
				_ => {
					warn!(
						"dropping similarity edge {} -> {}: endpoint not in node set",
						link.source, link.target
					);
				}
			}
		}
		debug!(
			"network view: {} nodes, {} of {} edges",
			data.thoughts.len(),
			kept,
			data.links.len()
		);

		Self {
			graph,
			camera: Camera {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: None,
			width,
			height,
			settle_budget: settle_ticks,
		}
	}

	/// Whether the solver still has cooldown budget (or a drag keeps it hot).
	pub fn animating(&self) -> bool {
		self.settle_budget > 0 || self.drag.active
	}

	/// Advance the solver one tick, while budget remains.
	pub fn tick(&mut self, dt: f32) {
		if !self.animating() {
			return;
		}
		self.graph.update(dt);
		self.settle_budget = self.settle_budget.saturating_sub(1);
	}

	/// Topmost node whose hit disc (visual radius plus slack, world units)
	/// contains the screen position.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (wx, wy) = self.camera.screen_to_world(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - wx, node.y() as f64 - wy);
			if (dx * dx + dy * dy).sqrt() < node.data.user_data.radius + HIT_SLACK {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn pointer_down(&mut self, x: f64, y: f64) {
		if let Some(idx) = self.node_at_position(x, y) {
			self.drag.active = true;
			self.drag.node_idx = Some(idx);
			self.drag.start_x = x;
			self.drag.start_y = y;
			self.graph.visit_nodes(|node| {
				if node.index() == idx {
					self.drag.node_start_x = node.x();
					self.drag.node_start_y = node.y();
				}
			});
			// A fresh layout question was asked; let the solver answer it.
			self.settle_budget = self.settle_budget.max(REHEAT_TICKS);
		} else {
			self.pan.active = true;
			self.pan.start_x = x;
			self.pan.start_y = y;
			self.pan.camera_start_x = self.camera.x;
			self.pan.camera_start_y = self.camera.y;
		}
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		if !self.drag.active && !self.pan.active {
			self.hover = self.node_at_position(x, y);
			return;
		}

		if self.drag.active {
			if let Some(idx) = self.drag.node_idx {
				let (dx, dy) = (
					(x - self.drag.start_x) / self.camera.k,
					(y - self.drag.start_y) / self.camera.k,
				);
				let (nx, ny) = (
					self.drag.node_start_x + dx as f32,
					self.drag.node_start_y + dy as f32,
				);
				self.graph.visit_nodes_mut(|node| {
					if node.index() == idx {
						node.data.x = nx;
						node.data.y = ny;
						node.data.is_anchor = true;
					}
				});
			}
		} else if self.pan.active {
			self.camera.x = self.pan.camera_start_x + (x - self.pan.start_x);
			self.camera.y = self.pan.camera_start_y + (y - self.pan.start_y);
		}
	}

	/// End the gesture. A release within the click slop while over a node
	/// focuses it via the camera and returns its index; a real node drag
	/// pins the node as an anchor instead.
	pub fn pointer_up(&mut self, x: f64, y: f64) -> Option<DefaultNodeIdx> {
		let mut focused = None;
		if self.drag.active {
			let idx = self.drag.node_idx;
			let (dx, dy) = (x - self.drag.start_x, y - self.drag.start_y);
			if (dx * dx + dy * dy).sqrt() <= CLICK_SLOP {
				if let Some(idx) = idx {
					self.focus_node(idx);
					focused = Some(idx);
				}
			} else if let Some(idx) = idx {
				self.graph.visit_nodes_mut(|node| {
					if node.index() == idx {
						node.data.is_anchor = true;
					}
				});
			}
		}
		self.drag.active = false;
		self.drag.node_idx = None;
		self.pan.active = false;
		focused
	}

	pub fn pointer_leave(&mut self) {
		self.drag.active = false;
		self.drag.node_idx = None;
		self.pan.active = false;
		self.hover = None;
	}

	pub fn wheel(&mut self, x: f64, y: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		self.camera.zoom_at(x, y, factor);
	}

	/// Center the camera on a node, raising zoom to the focus threshold when
	/// below it.
	pub fn focus_node(&mut self, idx: DefaultNodeIdx) {
		if let Some((wx, wy)) = self.node_position(idx) {
			if self.camera.k < FOCUS_ZOOM {
				self.camera.k = FOCUS_ZOOM;
			}
			self.camera.x = self.width / 2.0 - wx * self.camera.k;
			self.camera.y = self.height / 2.0 - wy * self.camera.k;
		}
	}

	pub fn node_position(&self, idx: DefaultNodeIdx) -> Option<(f64, f64)> {
		let mut pos = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				pos = Some((node.x() as f64, node.y() as f64));
			}
		});
		pos
	}

	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<String> {
		let mut id = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				id = Some(node.data.user_data.id.clone());
			}
		});
		id
	}

	pub fn hovered_id(&self) -> Option<String> {
		self.hover.and_then(|idx| self.node_id(idx))
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.drag = DragState::default();
		self.pan = PanState::default();
		self.hover = None;
	}

	pub fn renderable(&self) -> bool {
		self.width > 0.0 && self.height > 0.0
	}

	/// Cursor hint for the surrounding UI.
	pub fn cursor(&self) -> &'static str {
		if self.drag.active || self.pan.active {
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
	use crate::components::types::{SimilarityLink, Thought};

	const W: f64 = 800.0;
	const H: f64 = 600.0;

	fn thought(id: &str, x: f64, y: f64) -> Thought {
		Thought {
			id: id.into(),
			content: format!("thought {id}"),
			timestamp: 0,
			embedding: Vec::new(),
			projected: Some((x, y)),
			size_metric: None,
		}
	}

	fn link(a: &str, b: &str, s: f64) -> SimilarityLink {
		SimilarityLink {
			source: a.into(),
			target: b.into(),
			similarity: s,
		}
	}

	fn graph_of(thoughts: Vec<Thought>, links: Vec<SimilarityLink>) -> ThoughtGraph {
		ThoughtGraph { thoughts, links }
	}

	fn edge_count(state: &NetworkState) -> usize {
		let mut n = 0;
		state.graph.visit_edges(|_, _, _| n += 1);
		n
	}

	fn nth_idx(state: &NetworkState, n: usize) -> DefaultNodeIdx {
		let mut idxs = Vec::new();
		state.graph.visit_nodes(|node| idxs.push(node.index()));
		idxs[n]
	}

	#[test]
	fn edges_with_absent_endpoints_are_dropped() {
		let data = graph_of(
			vec![thought("a", 0.0, 0.0), thought("b", 0.5, 0.0)],
			vec![link("a", "b", 0.9), link("a", "ghost", 0.8)],
		);
		let state = NetworkState::new(&data, W, H, 100, 0.9);
		assert_eq!(edge_count(&state), 1);
	}

	#[test]
	fn camera_zoom_is_clamped_to_this_views_bounds() {
		let data = graph_of(vec![thought("a", 0.0, 0.0)], Vec::new());
		let mut state = NetworkState::new(&data, W, H, 100, 0.9);
		for _ in 0..40 {
			state.wheel(400.0, 300.0, -1.0);
		}
		assert_eq!(state.camera.k, MAX_ZOOM);
		for _ in 0..80 {
			state.wheel(400.0, 300.0, 1.0);
		}
		assert_eq!(state.camera.k, MIN_ZOOM);
	}

	#[test]
	fn camera_round_trips_between_spaces() {
		let mut camera = Camera {
			x: 123.0,
			y: -40.0,
			k: 1.0,
		};
		camera.zoom_at(200.0, 150.0, 1.1);
		let (wx, wy) = camera.screen_to_world(321.0, 99.0);
		let (sx, sy) = camera.world_to_screen(wx, wy);
		assert!((sx - 321.0).abs() < 1e-9);
		assert!((sy - 99.0).abs() < 1e-9);
	}

	#[test]
	fn click_focuses_node_through_the_camera() {
		let data = graph_of(vec![thought("a", 0.4, 0.4)], Vec::new());
		let mut state = NetworkState::new(&data, W, H, 100, 0.9);
		let (wx, wy) = state.node_position(nth_idx(&state, 0)).unwrap();
		let (sx, sy) = state.camera.world_to_screen(wx, wy);
		state.pointer_down(sx, sy);
		let focused = state.pointer_up(sx, sy);
		assert!(focused.is_some());
		assert_eq!(state.camera.k, FOCUS_ZOOM);
		let (cx, cy) = state.camera.world_to_screen(wx, wy);
		assert!((cx - W / 2.0).abs() < 1e-6);
		assert!((cy - H / 2.0).abs() < 1e-6);
	}

	#[test]
	fn hit_region_is_larger_than_the_visual_radius() {
		let data = graph_of(vec![thought("a", 0.0, 0.0)], Vec::new());
		let state = NetworkState::new(&data, W, H, 100, 0.9);
		let idx = nth_idx(&state, 0);
		let (wx, wy) = state.node_position(idx).unwrap();
		let (sx, sy) = state.camera.world_to_screen(wx, wy);
		let hit = NODE_RADIUS + HIT_SLACK;
		assert_eq!(state.node_at_position(sx + hit - 0.5, sy), Some(idx));
		assert_eq!(state.node_at_position(sx + hit + 0.5, sy), None);
	}

	#[test]
	fn solver_settles_after_its_tick_budget() {
		let data = graph_of(
			vec![thought("a", -0.5, 0.0), thought("b", 0.5, 0.0)],
			vec![link("a", "b", 0.9)],
		);
		let mut state = NetworkState::new(&data, W, H, 3, 0.9);
		for _ in 0..5 {
			state.tick(0.016);
		}
		assert!(!state.animating());
		// Dragging a node reheats the budget.
		let idx = nth_idx(&state, 0);
		let (wx, wy) = state.node_position(idx).unwrap();
		let (sx, sy) = state.camera.world_to_screen(wx, wy);
		state.pointer_down(sx, sy);
		assert!(state.animating());
		state.pointer_up(sx, sy);
	}

	#[test]
	fn resize_cancels_gestures_and_hover() {
		let data = graph_of(vec![thought("a", 0.0, 0.0)], Vec::new());
		let mut state = NetworkState::new(&data, W, H, 100, 0.9);
		state.pointer_down(10.0, 10.0);
		assert!(state.pan.active);
		state.resize(1024.0, 768.0);
		assert!(!state.pan.active);
		assert_eq!(state.hover, None);
	}
}
