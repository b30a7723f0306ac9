//! Leptos component wrapping the force-directed graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse handlers
//! for hover, node dragging and clicks. An animation loop runs via
//! `requestAnimationFrame` while the simulation is hot or a repaint is due,
//! and goes idle once the layout settles.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use send_wrapper::SendWrapper;
use log::{debug, error, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, MouseEvent, Window};

use super::render;
use super::simulation::SimulationConfig;
use super::state::ForceGraphState;
use super::theme::Theme;
use super::types::GraphData;

/// Bundles graph state with the canvas it draws to.
struct GraphContext {
	state: ForceGraphState,
	theme: Theme,
	ctx: CanvasRenderingContext2d,
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Self-rescheduling `requestAnimationFrame` loop that can go idle and be
/// woken again by input.
#[derive(Clone, Default)]
struct FrameLoop {
	callback: FrameCallback,
	active: Rc<Cell<bool>>,
	/// Handle of the frame request still waiting to fire.
	pending: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
	fn wake(&self) {
		if !self.active.replace(true) {
			self.request();
		}
	}

	fn request(&self) {
		let scheduled = match (web_sys::window(), self.callback.borrow().as_ref()) {
			(Some(window), Some(cb)) => window.request_animation_frame(cb.as_ref().unchecked_ref()).ok(),
			_ => None,
		};
		self.active.set(scheduled.is_some());
		self.pending.set(scheduled);
	}

	/// Cancel any queued frame and drop the callback, which also breaks the
	/// callback's reference back to this loop.
	fn shutdown(&self) {
		if let (Some(handle), Some(window)) = (self.pending.take(), web_sys::window()) {
			let _ = window.cancel_animation_frame(handle);
		}
		self.active.set(false);
		self.callback.borrow_mut().take();
	}
}

fn window_size(window: &Window) -> (f64, f64) {
	(
		window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0),
		window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0),
	)
}

fn pointer_position(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Renders an interactive force-directed graph on a canvas element.
///
/// Pass graph data via the reactive `data` signal; new data replaces the
/// running layout. The component sizes itself to its parent container by
/// default; set `fullscreen = true` to fill the viewport and resize with the
/// window. Explicit `width`/`height` override automatic sizing.
///
/// `on_node_click` receives the id of a node that was pressed and released
/// without being dragged.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(optional, into)] on_node_click: Option<Callback<String>>,
	#[prop(optional)] config: SimulationConfig,
	#[prop(optional)] theme: Theme,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let load_error = RwSignal::new(None::<String>);
	let context: Rc<RefCell<Option<GraphContext>>> = Rc::new(RefCell::new(None));
	let frames = FrameLoop::default();
	let resize_cb: FrameCallback = Rc::new(RefCell::new(None));

	let (context_anim, frames_anim) = (context.clone(), frames.clone());
	*frames.callback.borrow_mut() = Some(Closure::new(move || {
		frames_anim.pending.set(None);
		let keep_going = match context_anim.borrow_mut().as_mut() {
			Some(c) => {
				let running = c.state.tick();
				if c.state.take_redraw() {
					render::render(&mut c.ctx, &c.state, &c.theme);
				}
				running
			}
			None => false,
		};
		if keep_going {
			frames_anim.request();
		} else {
			frames_anim.active.set(false);
		}
	}));

	// Cleanup must be Send; the wrapped handles are only touched on the UI thread.
	let teardown = SendWrapper::new((context.clone(), frames.clone(), resize_cb.clone()));
	on_cleanup(move || {
		let (context, frames, resize_cb) = teardown.take();
		frames.shutdown();
		if let Some(c) = context.borrow_mut().take() {
			c.state.stop();
		}
		if let Some(cb) = resize_cb.borrow_mut().take() {
			if let Some(window) = web_sys::window() {
				let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
		debug!("force graph: unmounted");
	});

	let (context_init, frames_init, resize_cb_init) = (context.clone(), frames.clone(), resize_cb.clone());
	Effect::new(move |_| {
		let graph_data = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.filter(|w| *w > 0.0)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.filter(|h| *h > 0.0)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx = match canvas.get_context("2d") {
			Ok(Some(obj)) => obj.dyn_into::<CanvasRenderingContext2d>().ok(),
			_ => None,
		};
		let Some(ctx) = ctx else {
			warn!("force graph: canvas 2d context unavailable");
			return;
		};

		if let Some(old) = context_init.borrow_mut().take() {
			old.state.stop();
		}

		let state = match ForceGraphState::new(&graph_data, w, h, config.clone(), &theme) {
			Ok(state) => state,
			Err(err) => {
				error!("force graph: {err}");
				load_error.set(Some(err.to_string()));
				return;
			}
		};
		load_error.set(None);

		*context_init.borrow_mut() = Some(GraphContext {
			state,
			theme: theme.clone(),
			ctx,
		});
		frames_init.wake();

		if fullscreen && resize_cb_init.borrow().is_none() {
			let (context_resize, frames_resize) = (context_init.clone(), frames_init.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = window_size(&win);
				if let Some(c) = context_resize.borrow_mut().as_mut() {
					if let Some(canvas) = c.ctx.canvas() {
						canvas.set_width(nw as u32);
						canvas.set_height(nh as u32);
					}
					c.state.resize(nw, nh);
				}
				frames_resize.wake();
			}));
			if let Some(cb) = resize_cb_init.borrow().as_ref() {
				let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
	});

	let (context_md, frames_md) = (context.clone(), frames.clone());
	let on_mousedown = move |ev: MouseEvent| {
		if ev.button() != 0 {
			return;
		}
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = pointer_position(&canvas, &ev);
		if let Some(c) = context_md.borrow_mut().as_mut() {
			if c.state.pointer_down(x, y) {
				frames_md.wake();
			}
		}
	};

	let (context_mm, frames_mm) = (context.clone(), frames.clone());
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = pointer_position(&canvas, &ev);
		if let Some(c) = context_mm.borrow_mut().as_mut() {
			c.state.pointer_move(x, y);
			let _ = HtmlElement::style(&canvas).set_property("cursor", c.state.cursor());
		}
		frames_mm.wake();
	};

	let (context_mu, frames_mu) = (context.clone(), frames.clone());
	let on_mouseup = move |ev: MouseEvent| {
		if ev.button() != 0 {
			return;
		}
		let mut clicked = None;
		if let Some(c) = context_mu.borrow_mut().as_mut() {
			c.state.pointer_up(|id| clicked = Some(id.to_string()));
		}
		frames_mu.wake();
		if let (Some(id), Some(cb)) = (clicked, on_node_click) {
			cb.run(id);
		}
	};

	let (context_ml, frames_ml) = (context.clone(), frames.clone());
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(c) = context_ml.borrow_mut().as_mut() {
			c.state.pointer_leave();
		}
		frames_ml.wake();
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			style="display: block;"
		/>
		{move || load_error.get().map(|msg| view! { <p class="force-graph-error">{msg}</p> })}
	}
}
