use web_sys::CanvasRenderingContext2d;

use crate::components::draw;

use super::state::{HOVER_POINT_RADIUS, POINT_RADIUS, ScatterState};

const LABEL_CHARS: usize = 20;
const LABEL_FONT_PX: f64 = 10.0;
const POINT_FILL: &str = "#64b4ff";
const HOVER_FILL: &str = "#b4dcff";

/// One synchronous render pass. Pure with respect to the state it reads;
/// always starts from a cleared surface, so it can be re-invoked on every
/// state change without accumulating anything.
pub fn render(state: &ScatterState, ctx: &CanvasRenderingContext2d) {
	if !state.renderable() {
		return;
	}
	let (w, h) = (state.width, state.height);
	let vp = &state.viewport;

	draw::clear(ctx, w, h);
	draw::grid(ctx, w, h);
	draw::axes(
		ctx,
		w,
		h,
		w / 2.0 + vp.offset_x,
		h / 2.0 + vp.offset_y,
	);

	// Faint connective lines between nearby points.
	ctx.set_stroke_style_str("rgba(100, 180, 255, 0.15)");
	ctx.set_line_width(1.0);
	for &(i, j) in &state.links {
		let a = &state.points[i];
		let b = &state.points[j];
		let (x1, y1) = vp.to_screen(w, h, a.x, a.y);
		let (x2, y2) = vp.to_screen(w, h, b.x, b.y);
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();
	}

	for (i, p) in state.points.iter().enumerate() {
		let hovered = state.hover == Some(i);
		let (sx, sy) = vp.to_screen(w, h, p.x, p.y);
		let (radius, fill) = if hovered {
			(HOVER_POINT_RADIUS, HOVER_FILL)
		} else {
			(POINT_RADIUS, POINT_FILL)
		};
		draw::point(ctx, sx, sy, radius, fill, hovered, 1.0);
		draw::label(
			ctx,
			&p.content,
			LABEL_CHARS,
			sx,
			sy + radius + 12.0,
			LABEL_FONT_PX,
			0.7,
		);
	}

	if let Some(p) = state.hover.and_then(|i| state.points.get(i)) {
		let (sx, sy) = vp.to_screen(w, h, p.x, p.y);
		draw::tooltip(ctx, w, h, sx, sy, &p.content, p.timestamp);
	}
}
