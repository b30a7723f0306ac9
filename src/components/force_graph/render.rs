//! Canvas rendering for the force graph.
//!
//! Drawing goes through the small [`Surface`] trait so the same pass can
//! target a browser canvas or a recorder in tests. Passes run in z-order:
//! 1. Background
//! 2. Links, stroke width from the link value
//! 3. Nodes in input order, each followed by its label, so later nodes sit on top

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::geometry::{Point, Size};
use super::state::ForceGraphState;
use super::theme::{Color, Theme};

/// Minimal drawing target.
pub trait Surface {
	fn fill_background(&mut self, size: Size, color: Color);
	fn line(&mut self, from: Point, to: Point, width: f64, color: Color);
	fn circle(&mut self, center: Point, radius: f64, fill: Option<Color>, stroke: Option<(Color, f64)>);
	fn text(&mut self, at: Point, text: &str, font: &str, color: Color);
}

impl Surface for CanvasRenderingContext2d {
	fn fill_background(&mut self, size: Size, color: Color) {
		self.clear_rect(0.0, 0.0, size.width, size.height);
		self.set_fill_style_str(&color.to_css());
		self.fill_rect(0.0, 0.0, size.width, size.height);
	}

	fn line(&mut self, from: Point, to: Point, width: f64, color: Color) {
		self.set_stroke_style_str(&color.to_css());
		self.set_line_width(width);
		self.begin_path();
		self.move_to(from.x, from.y);
		self.line_to(to.x, to.y);
		self.stroke();
	}

	fn circle(&mut self, center: Point, radius: f64, fill: Option<Color>, stroke: Option<(Color, f64)>) {
		self.begin_path();
		let _ = self.arc(center.x, center.y, radius, 0.0, 2.0 * PI);
		if let Some(fill) = fill {
			self.set_fill_style_str(&fill.to_css());
			self.fill();
		}
		if let Some((color, width)) = stroke {
			self.set_stroke_style_str(&color.to_css());
			self.set_line_width(width);
			self.stroke();
		}
	}

	fn text(&mut self, at: Point, text: &str, font: &str, color: Color) {
		self.set_font(font);
		self.set_fill_style_str(&color.to_css());
		let _ = self.fill_text(text, at.x, at.y);
	}
}

/// Stroke width for a link. Grows with the square root of the value and never
/// drops below `min_width`, including for zero, negative or non-finite values.
pub fn link_width(value: f64, min_width: f64) -> f64 {
	if value.is_finite() && value > 0.0 {
		value.sqrt().max(min_width)
	} else {
		min_width
	}
}

/// Renders the complete graph.
pub fn render(surface: &mut impl Surface, state: &ForceGraphState, theme: &Theme) {
	surface.fill_background(Size::new(state.width, state.height), theme.background);

	let positions = state.sim.positions();
	for link in state.graph.links() {
		surface.line(
			positions.get(link.source),
			positions.get(link.target),
			link_width(link.value, theme.link.min_width),
			theme.link.color,
		);
	}

	let style = &theme.node;
	let border = (style.border_width > 0.0).then_some((style.border_color, style.border_width));
	for idx in state.graph.indices() {
		let meta = state.graph.node(idx);
		let at = positions.get(idx);

		surface.circle(at, style.radius, Some(theme.palette.for_group(meta.group)), border);
		if state.hovered == Some(idx) {
			surface.circle(at, style.radius + 3.0, None, Some((style.hover_ring, 1.5)));
		}
		surface.text(at + theme.label.offset, &meta.title, &theme.label.font, theme.label.color);
	}
}
