use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use crate::components::draw;
use crate::components::types::ThoughtGraph;

use super::render;
use super::state::NetworkState;

/// Similarity network of a thought collection, laid out by the force
/// solver. The solver animates under its tick budget; once settled, frames
/// are only drawn in response to interaction.
#[component]
pub fn ThoughtGraphCanvas(
	#[prop(into)] data: Signal<ThoughtGraph>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	/// Solver ticks before the layout settles.
	#[prop(default = 600)]
	cooldown_ticks: u32,
	/// Solver velocity damping per tick.
	#[prop(default = 0.9)]
	decay: f32,
	/// Invoked with the thought id when a click focuses a node.
	#[prop(optional, into)]
	on_focus: Option<Callback<String>>,
	/// Invoked whenever the hovered thought changes.
	#[prop(optional, into)]
	on_hover: Option<Callback<Option<String>>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<NetworkState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let stopped: Arc<AtomicBool> = Arc::new(AtomicBool::new(false));
	let cursor = RwSignal::new("grab");
	let surface = RwSignal::new((0.0_f64, 0.0_f64));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	let stopped_cleanup = stopped.clone();
	on_cleanup(move || stopped_cleanup.store(true, Ordering::Relaxed));

	Effect::new(move |_| {
		let graph_data = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		if let Some(ref mut s) = *state_init.borrow_mut() {
			// Data refresh: rebuild the solver over the same surface.
			let (w, h) = (s.width, s.height);
			*s = NetworkState::new(&graph_data, w, h, cooldown_ticks, decay);
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

		let s = NetworkState::new(&graph_data, w, h, cooldown_ticks, decay);
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

		let (state_anim, animate_inner, stopped_anim) =
			(state_init.clone(), animate_init.clone(), stopped.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if stopped_anim.load(Ordering::Relaxed) {
				return;
			}
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				if s.animating() {
					s.tick(0.016);
					render::render(s, &ctx);
				}
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
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
			let was_hover = s.hover;
			s.pointer_move(x, y);
			cursor.set(s.cursor());
			if was_hover != s.hover {
				hover_change = Some(s.hovered_id());
			}
			if s.drag.active || s.pan.active || was_hover != s.hover {
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
			if let Some(idx) = s.pointer_up(x, y) {
				focused = s.node_id(idx);
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
		let (x, y, canvas) = pointer_of(&ev);
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.wheel(x, y, ev.delta_y());
			render::render(s, &draw::context_of(&canvas));
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="thought-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
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
