use web_sys::CanvasRenderingContext2d;

use crate::components::draw;

use super::state::NetworkState;

const LABEL_CHARS: usize = 25;
const NODE_FILL: &str = "#64b4ff";
const HOVER_FILL: &str = "#b4dcff";

/// Draw one frame of the network view.
///
/// Node and link positions come straight from the solver; the camera is the
/// only transform applied to them. Grid and axes stay in screen space, the
/// axes crossing at the camera translation (they follow panning, not zoom).
pub fn render(state: &NetworkState, ctx: &CanvasRenderingContext2d) {
	if !state.renderable() {
		return;
	}
	let (w, h) = (state.width, state.height);
	let cam = &state.camera;
	let k = cam.k;

	draw::clear(ctx, w, h);
	draw::grid(ctx, w, h);
	draw::axes(ctx, w, h, cam.x, cam.y);

	ctx.save();
	let _ = ctx.translate(cam.x, cam.y);
	let _ = ctx.scale(k, k);

	// Similarity-weighted links: stronger edges draw brighter and wider.
	state.graph.visit_edges(|a, b, edge| {
		let sim = edge.user_data as f64;
		ctx.set_stroke_style_str(&format!("rgba(100, 180, 255, {})", (sim * 0.6).max(0.2)));
		ctx.set_line_width((sim * 2.0).max(0.5));
		ctx.begin_path();
		ctx.move_to(a.x() as f64, a.y() as f64);
		ctx.line_to(b.x() as f64, b.y() as f64);
		ctx.stroke();
	});

	// Labels keep a near-constant apparent size under zoom.
	let font = 10.0 / k.max(0.5);
	let label_gap = 12.0 / k.max(0.5);

	state.graph.visit_nodes(|node| {
		if state.hover == Some(node.index()) {
			return;
		}
		let (x, y) = (node.x() as f64, node.y() as f64);
		let info = &node.data.user_data;
		draw::point(ctx, x, y, info.radius, NODE_FILL, false, k);
		draw::label(
			ctx,
			&info.content,
			LABEL_CHARS,
			x,
			y + info.radius + label_gap,
			font,
			0.7,
		);
	});

	// Hovered node last, so its glow sits above neighbors.
	let mut hovered: Option<(f64, f64, String, i64)> = None;
	if state.hover.is_some() {
		state.graph.visit_nodes(|node| {
			if state.hover != Some(node.index()) {
				return;
			}
			let (x, y) = (node.x() as f64, node.y() as f64);
			let info = &node.data.user_data;
			draw::point(ctx, x, y, info.radius * 1.4, HOVER_FILL, true, k);
			draw::label(
				ctx,
				&info.content,
				LABEL_CHARS,
				x,
				y + info.radius * 1.4 + label_gap,
				font,
				0.95,
			);
			hovered = Some((x, y, info.content.clone(), info.timestamp));
		});
	}

	ctx.restore();

	if let Some((x, y, content, timestamp)) = hovered {
		let (sx, sy) = cam.world_to_screen(x, y);
		draw::tooltip(ctx, w, h, sx, sy, &content, timestamp);
	}
}
