use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use crate::components::draw;
use crate::components::types::Thought;

use super::render;
use super::state::ScatterState;

/// Projected scatter plot of a thought collection.
///
/// Renders synchronously inside the handler of whichever event changed the
/// state; there is no animation loop.
#[component]
pub fn ScatterPlotCanvas(
	#[prop(into)] data: Signal<Vec<Thought>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	/// Invoked with the thought id when a click focuses a point.
	#[prop(optional, into)]
	on_focus: Option<Callback<String>>,
	/// Invoked whenever the hovered thought changes.
	#[prop(optional, into)]
	on_hover: Option<Callback<Option<String>>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<ScatterState>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let cursor = RwSignal::new("grab");
	let surface = RwSignal::new((0.0_f64, 0.0_f64));
	let (state_init, resize_cb_init) = (state.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let thoughts = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		if let Some(ref mut s) = *state_init.borrow_mut() {
			// Data refresh: swap the collection, keep the viewport.
			s.replace_thoughts(&thoughts);
			cursor.set(s.cursor());
			render::render(s, &draw::context_of(&canvas));
			return;
		}

		let window: Window = web_sys::window().unwrap();
		let (w, h) = if fullscreen {
			(
				window.inner_width().unwrap().as_f64().unwrap(),
				window.inner_height().unwrap().as_f64().unwrap(),
			)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		let ctx = draw::resize_surface(&canvas, w, h);
		surface.set((w, h));

		let s = ScatterState::new(&thoughts, w, h);
		render::render(&s, &ctx);
		*state_init.borrow_mut() = Some(s);

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let win: Window = web_sys::window().unwrap();
				let (nw, nh) = (
					win.inner_width().unwrap().as_f64().unwrap(),
					win.inner_height().unwrap().as_f64().unwrap(),
				);
				let ctx = draw::resize_surface(&canvas_resize, nw, nh);
				surface.set((nw, nh));
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
					cursor.set(s.cursor());
					render::render(s, &ctx);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
	});

	let pointer_of = move |ev: &MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		(
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
			canvas,
		)
	};

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let (x, y, _) = pointer_of(&ev);
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(x, y);
			cursor.set(s.cursor());
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let (x, y, canvas) = pointer_of(&ev);
		let mut hover_change = None;
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			let was = s.hover;
			s.pointer_move(x, y);
			cursor.set(s.cursor());
			if was != s.hover {
				hover_change = Some(s.hovered_id().map(str::to_string));
			}
			if s.drag.active || was != s.hover {
				render::render(s, &draw::context_of(&canvas));
			}
		}
		if let Some(id) = hover_change
			&& let Some(cb) = on_hover
		{
			cb.run(id);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let (x, y, canvas) = pointer_of(&ev);
		let mut focused = None;
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			if let Some(i) = s.pointer_up(x, y) {
				focused = s.points.get(i).map(|p| p.id.clone());
				render::render(s, &draw::context_of(&canvas));
			}
			cursor.set(s.cursor());
		}
		if let Some(id) = focused
			&& let Some(cb) = on_focus
		{
			cb.run(id);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |ev: MouseEvent| {
		let (_, _, canvas) = pointer_of(&ev);
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_leave();
			cursor.set(s.cursor());
			render::render(s, &draw::context_of(&canvas));
		}
		if let Some(cb) = on_hover {
			cb.run(None);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.wheel(ev.delta_y());
			render::render(s, &draw::context_of(&canvas));
		}
	};

	let state_dc = state.clone();
	let on_dblclick = move |_: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		if let Some(ref mut s) = *state_dc.borrow_mut() {
			s.reset_view();
			render::render(s, &draw::context_of(&canvas));
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="scatter-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			on:dblclick=on_dblclick
			style=move || {
				let (w, h) = surface.get();
				if w > 0.0 {
					format!(
						"display: block; cursor: {}; width: {w}px; height: {h}px;",
						cursor.get(),
					)
				} else {
					format!("display: block; cursor: {};", cursor.get())
				}
			}
		/>
	}
}
