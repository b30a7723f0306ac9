//! Visual theming for the force graph.
//!
//! Provides colors, the per-group node palette and node/link/label styles.

use serde::Deserialize;

use super::geometry::Point;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with alpha in `[0, 1]`.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// CSS color string: `#rrggbb` when opaque, `rgba(..)` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Colors assigned to node groups.
#[derive(Clone, Debug, PartialEq)]
pub struct NodePalette {
	pub colors: Vec<Color>,
}

impl NodePalette {
	/// Neon pinks and violets on black (default)
	pub fn garden() -> Self {
		Self {
			colors: vec![
				Color::rgb(236, 72, 153),  // Pink
				Color::rgb(217, 70, 239),  // Fuchsia
				Color::rgb(168, 85, 247),  // Violet
				Color::rgb(244, 114, 182), // Rose
				Color::rgb(129, 140, 248), // Indigo
				Color::rgb(34, 211, 238),  // Cyan
			],
		}
	}

	/// Muted, harmonious palette - slate blues and teals
	pub fn slate() -> Self {
		Self {
			colors: vec![
				Color::rgb(94, 129, 172),  // Steel blue
				Color::rgb(129, 161, 193), // Light steel
				Color::rgb(100, 148, 160), // Teal gray
				Color::rgb(136, 160, 175), // Cadet blue
				Color::rgb(108, 142, 173), // Air force blue
				Color::rgb(119, 158, 165), // Desaturated cyan
			],
		}
	}

	/// Color for a node group. Any integer, including negatives, maps into the palette.
	pub fn for_group(&self, group: i32) -> Color {
		let len = self.colors.len() as i64;
		self.colors[(group as i64).rem_euclid(len) as usize]
	}
}

/// Link stroke style.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkStyle {
	pub color: Color,
	/// Stroke width floor for tiny or invalid link values.
	pub min_width: f64,
}

/// Node circle style.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeStyle {
	pub radius: f64,
	/// Extra hit-test slack beyond the drawn radius.
	pub hit_slop: f64,
	pub border_color: Color,
	pub border_width: f64,
	/// Ring drawn around the node under the pointer.
	pub hover_ring: Color,
}

/// Node label style.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelStyle {
	pub font: String,
	pub color: Color,
	/// Offset of the text baseline origin from the node center.
	pub offset: Point,
}

/// Complete visual theme.
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
	pub background: Color,
	pub link: LinkStyle,
	pub node: NodeStyle,
	pub label: LabelStyle,
	pub palette: NodePalette,
}

impl Theme {
	/// Pink-on-black garden look (default)
	pub fn garden() -> Self {
		Self {
			background: Color::rgb(10, 10, 12),
			link: LinkStyle {
				color: Color::rgba(236, 72, 153, 0.18),
				min_width: 0.5,
			},
			node: NodeStyle {
				radius: 10.0,
				hit_slop: 2.0,
				border_color: Color::rgb(0, 0, 0),
				border_width: 1.5,
				hover_ring: Color::rgba(255, 255, 255, 0.8),
			},
			label: LabelStyle {
				font: "10px 'Space Mono', monospace".to_string(),
				color: Color::rgb(255, 255, 255),
				offset: Point::new(12.0, 4.0),
			},
			palette: NodePalette::garden(),
		}
	}

	/// Clean slate-blue theme
	pub fn slate() -> Self {
		Self {
			background: Color::rgb(22, 27, 34),
			link: LinkStyle {
				color: Color::rgba(140, 160, 180, 0.5),
				min_width: 0.5,
			},
			node: NodeStyle {
				radius: 10.0,
				hit_slop: 2.0,
				border_color: Color::rgba(255, 255, 255, 0.3),
				border_width: 1.0,
				hover_ring: Color::rgba(255, 255, 255, 0.7),
			},
			label: LabelStyle {
				font: "10px sans-serif".to_string(),
				color: Color::rgba(255, 255, 255, 0.85),
				offset: Point::new(12.0, 4.0),
			},
			palette: NodePalette::slate(),
		}
	}

	/// Radius within which a pointer press grabs a node.
	pub fn hit_radius(&self) -> f64 {
		self.node.radius + self.node.hit_slop
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::garden()
	}
}

/// Theme selector for page configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeName {
	#[default]
	Garden,
	Slate,
}

impl From<ThemeName> for Theme {
	fn from(name: ThemeName) -> Self {
		match name {
			ThemeName::Garden => Theme::garden(),
			ThemeName::Slate => Theme::slate(),
		}
	}
}
