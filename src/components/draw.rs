use std::f64::consts::PI;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::types::format_timestamp;

const BACKGROUND: &str = "#1a1a2e";
const GRID_STEP: f64 = 50.0;
const TOOLTIP_PAD: f64 = 8.0;
const TOOLTIP_LINE_H: f64 = 16.0;
const TOOLTIP_TEXT_W: f64 = 240.0;

/// The 2d context of a canvas.
pub fn context_of(canvas: &HtmlCanvasElement) -> CanvasRenderingContext2d {
	canvas
		.get_context("2d")
		.unwrap()
		.unwrap()
		.dyn_into()
		.unwrap()
}

/// Size the backing store for the device pixel ratio. Density is handled
/// here, once per (re)size; all drawing math stays in logical pixels.
pub fn resize_surface(
	canvas: &HtmlCanvasElement,
	width: f64,
	height: f64,
) -> CanvasRenderingContext2d {
	let dpr = web_sys::window().unwrap().device_pixel_ratio();
	canvas.set_width((width * dpr) as u32);
	canvas.set_height((height * dpr) as u32);
	let ctx = context_of(canvas);
	let _ = ctx.scale(dpr, dpr);
	ctx
}

/// Clear the surface to the background color. Every frame starts here.
pub fn clear(ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, width, height);
}

/// Fixed-cell background grid. Screen-space: a static backdrop that never
/// pans or zooms with the content.
pub fn grid(ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
	ctx.set_stroke_style_str("rgba(255, 255, 255, 0.04)");
	ctx.set_line_width(1.0);
	let mut gx = GRID_STEP;
	while gx < width {
		ctx.begin_path();
		ctx.move_to(gx, 0.0);
		ctx.line_to(gx, height);
		ctx.stroke();
		gx += GRID_STEP;
	}
	let mut gy = GRID_STEP;
	while gy < height {
		ctx.begin_path();
		ctx.move_to(0.0, gy);
		ctx.line_to(width, gy);
		ctx.stroke();
		gy += GRID_STEP;
	}
}

/// Dashed axes crossing at the pan-adjusted center. They follow translation
/// but not scale.
pub fn axes(ctx: &CanvasRenderingContext2d, width: f64, height: f64, cx: f64, cy: f64) {
	ctx.set_stroke_style_str("rgba(255, 255, 255, 0.15)");
	ctx.set_line_width(1.0);
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(6.0),
		&JsValue::from_f64(6.0),
	));
	ctx.begin_path();
	ctx.move_to(0.0, cy);
	ctx.line_to(width, cy);
	ctx.stroke();
	ctx.begin_path();
	ctx.move_to(cx, 0.0);
	ctx.line_to(cx, height);
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

/// Draw one point. The hovered point gets a radial glow halo first, then a
/// brighter, thicker border. `line_scale` divides stroke widths so borders
/// keep their apparent size under a scaled context (1.0 when drawing in
/// screen space).
pub fn point(
	ctx: &CanvasRenderingContext2d,
	x: f64,
	y: f64,
	radius: f64,
	fill: &str,
	hovered: bool,
	line_scale: f64,
) {
	if hovered {
		if let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.3, x, y, radius * 2.2) {
			let _ = gradient.add_color_stop(0.0, "rgba(255, 255, 255, 0.35)");
			let _ = gradient.add_color_stop(0.6, "rgba(200, 220, 255, 0.12)");
			let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius * 2.2, 0.0, 2.0 * PI);
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
			ctx.fill();
		}
	}

	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(fill);
	ctx.fill();

	let (stroke, width) = if hovered {
		("rgba(255, 255, 255, 0.85)", 2.0)
	} else {
		("rgba(255, 255, 255, 0.25)", 1.0)
	};
	ctx.set_stroke_style_str(stroke);
	ctx.set_line_width(width / line_scale);
	ctx.stroke();
}

/// Truncate to a character budget, marking the cut with an ellipsis.
pub fn truncate_label(text: &str, max_chars: usize) -> String {
	if text.chars().count() <= max_chars {
		text.to_string()
	} else {
		let head: String = text.chars().take(max_chars).collect();
		format!("{head}…")
	}
}

/// Draw a truncated label centered at (x, y).
pub fn label(
	ctx: &CanvasRenderingContext2d,
	text: &str,
	max_chars: usize,
	x: f64,
	y: f64,
	font_px: f64,
	alpha: f64,
) {
	ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {alpha})"));
	ctx.set_font(&format!("{font_px}px sans-serif"));
	ctx.set_text_align("center");
	let _ = ctx.fill_text(&truncate_label(text, max_chars), x, y);
	ctx.set_text_align("start");
}

fn text_width(ctx: &CanvasRenderingContext2d, text: &str) -> f64 {
	ctx.measure_text(text).map(|m| m.width()).unwrap_or(0.0)
}

/// Greedy word wrap against the current canvas font.
fn wrap_text(ctx: &CanvasRenderingContext2d, text: &str, max_width: f64) -> Vec<String> {
	let mut lines = Vec::new();
	let mut line = String::new();
	for word in text.split_whitespace() {
		let candidate = if line.is_empty() {
			word.to_string()
		} else {
			format!("{line} {word}")
		};
		if !line.is_empty() && text_width(ctx, &candidate) > max_width {
			lines.push(std::mem::take(&mut line));
			line = word.to_string();
		} else {
			line = candidate;
		}
	}
	if !line.is_empty() {
		lines.push(line);
	}
	lines
}

/// Tooltip panel for the hovered item: full content plus a formatted
/// timestamp, anchored near the point and clamped to the canvas. Painted on
/// the canvas itself, so it can never intercept pointer events.
pub fn tooltip(
	ctx: &CanvasRenderingContext2d,
	width: f64,
	height: f64,
	anchor_x: f64,
	anchor_y: f64,
	content: &str,
	timestamp_ms: i64,
) {
	ctx.set_font("12px sans-serif");
	let lines = wrap_text(ctx, content, TOOLTIP_TEXT_W);
	let stamp = format_timestamp(timestamp_ms);

	let mut panel_w = text_width(ctx, &stamp);
	for line in &lines {
		panel_w = panel_w.max(text_width(ctx, line));
	}
	let panel_w = panel_w + 2.0 * TOOLTIP_PAD;
	let panel_h = (lines.len() as f64 + 1.0) * TOOLTIP_LINE_H + 2.0 * TOOLTIP_PAD;

	let x = (anchor_x + 14.0).min(width - panel_w - 4.0).max(4.0);
	let mut y = anchor_y - panel_h - 14.0;
	if y < 4.0 {
		y = anchor_y + 14.0;
	}
	let y = y.min(height - panel_h - 4.0).max(4.0);

	ctx.set_fill_style_str("rgba(26, 26, 46, 0.95)");
	ctx.fill_rect(x, y, panel_w, panel_h);
	ctx.set_stroke_style_str("rgba(100, 180, 255, 0.4)");
	ctx.set_line_width(1.0);
	ctx.stroke_rect(x, y, panel_w, panel_h);

	ctx.set_fill_style_str("rgba(255, 255, 255, 0.92)");
	for (i, line) in lines.iter().enumerate() {
		let _ = ctx.fill_text(
			line,
			x + TOOLTIP_PAD,
			y + TOOLTIP_PAD + (i as f64 + 0.8) * TOOLTIP_LINE_H,
		);
	}
	ctx.set_font("10px sans-serif");
	ctx.set_fill_style_str("rgba(160, 180, 210, 0.9)");
	let _ = ctx.fill_text(
		&stamp,
		x + TOOLTIP_PAD,
		y + TOOLTIP_PAD + (lines.len() as f64 + 0.8) * TOOLTIP_LINE_H,
	);
}

#[cfg(test)]
mod tests {
	use super::truncate_label;

	#[test]
	fn short_labels_pass_through() {
		assert_eq!(truncate_label("quick note", 20), "quick note");
	}

	#[test]
	fn long_labels_get_an_ellipsis() {
		let t = truncate_label("a thought that runs well past the budget", 20);
		assert_eq!(t, "a thought that runs …");
		assert_eq!(t.chars().count(), 21);
	}

	#[test]
	fn budget_counts_chars_not_bytes() {
		let t = truncate_label("ééééé", 3);
		assert_eq!(t, "ééé…");
	}
}
