// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vector drawing contract used by widgets, plus a recording implementation.
//!
//! Widgets never talk to a renderer directly. They draw into a [`Canvas`],
//! which a backend implements over its own vector API. [`CommandList`] records
//! calls so tests and headless tools can inspect what a frame would draw.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{BezPath, Point, Rect, Shape as _, Size};

/// Straight-alpha RGBA color with components in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    /// Create a color from components.
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with alpha multiplied by `factor`.
    pub fn with_alpha_factor(self, factor: f32) -> Self {
        Self {
            a: self.a * factor,
            ..self
        }
    }
}

/// Backend-assigned font handle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FontId(pub u32);

/// Horizontal text alignment relative to the draw origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAlign {
    /// Origin is the left edge.
    #[default]
    Start,
    /// Origin is the horizontal center.
    Center,
    /// Origin is the right edge.
    End,
}

/// Text styling passed with every text call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Font handle.
    pub font: FontId,
    /// Font size in pixels.
    pub size: f32,
    /// Fill color.
    pub color: Color,
    /// Alignment.
    pub align: TextAlign,
    /// Blur radius, for shadows.
    pub blur: f32,
    /// Extra advance between characters.
    pub letter_spacing: f32,
    /// Line height as a multiple of the font size.
    pub line_height: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: FontId::default(),
            size: 14.0,
            color: Color::BLACK,
            align: TextAlign::Start,
            blur: 0.0,
            letter_spacing: 0.0,
            line_height: 1.0,
        }
    }
}

/// The drawing surface a widget paints on.
///
/// State (scissor and global alpha) is saved and restored as a stack.
/// [`intersect_scissor`](Canvas::intersect_scissor) only ever shrinks the clip;
/// global alpha is absolute, not multiplied.
pub trait Canvas {
    /// Push a copy of the current state.
    fn save(&mut self);
    /// Pop back to the state of the matching `save`.
    fn restore(&mut self);
    /// Intersect the clip with `rect`.
    fn intersect_scissor(&mut self, rect: Rect);
    /// Set the alpha applied to everything drawn until the next change.
    fn set_global_alpha(&mut self, alpha: f32);
    /// Fill a path.
    fn fill_path(&mut self, path: &BezPath, color: Color);
    /// Stroke a path.
    fn stroke_path(&mut self, path: &BezPath, color: Color, width: f64);
    /// Measure `text` as it would be drawn at the origin.
    fn text_bounds(&mut self, text: &str, style: &TextStyle) -> Size;
    /// Draw `text` with its baseline origin at `origin`.
    fn draw_text(&mut self, origin: Point, text: &str, style: &TextStyle);

    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.fill_path(&rect.to_path(0.1), color);
    }

    /// Stroke an axis-aligned rectangle.
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) {
        self.stroke_path(&rect.to_path(0.1), color, width);
    }
}

/// One recorded canvas call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// `save`.
    Save,
    /// `restore`.
    Restore,
    /// `intersect_scissor`, holding the effective clip after intersection.
    Scissor(Rect),
    /// `set_global_alpha`.
    GlobalAlpha(f32),
    /// `fill_path`, recorded by bounding box.
    Fill(Rect, Color),
    /// `stroke_path`, recorded by bounding box.
    Stroke(Rect, Color),
    /// `draw_text`.
    Text(Point, String),
}

/// A canvas that records commands instead of rasterizing.
///
/// Text is measured with a fixed advance of `0.6 * size` per character, which
/// is enough for layout tests.
#[derive(Clone, Debug)]
pub struct CommandList {
    /// Recorded commands in call order.
    pub commands: Vec<DrawCommand>,
    state: CanvasState,
    saved: Vec<CanvasState>,
}

#[derive(Clone, Copy, Debug)]
struct CanvasState {
    clip: Option<Rect>,
    alpha: f32,
}

impl Default for CommandList {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
            state: CanvasState {
                clip: None,
                alpha: 1.0,
            },
            saved: Vec::new(),
        }
    }
}

impl CommandList {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// The clip in effect, or `None` when unclipped.
    pub fn current_clip(&self) -> Option<Rect> {
        self.state.clip
    }

    /// The global alpha in effect.
    pub fn current_alpha(&self) -> f32 {
        self.state.alpha
    }

    /// Depth of the save stack.
    pub fn save_depth(&self) -> usize {
        self.saved.len()
    }

    /// Bounding boxes of all recorded fills, in order.
    pub fn fills(&self) -> impl Iterator<Item = (Rect, Color)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Fill(r, color) => Some((*r, *color)),
            _ => None,
        })
    }
}

impl Canvas for CommandList {
    fn save(&mut self) {
        self.saved.push(self.state);
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
        self.commands.push(DrawCommand::Restore);
    }

    fn intersect_scissor(&mut self, rect: Rect) {
        let clip = match self.state.clip {
            Some(current) => current.intersect(rect),
            None => rect,
        };
        self.state.clip = Some(clip);
        self.commands.push(DrawCommand::Scissor(clip));
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.state.alpha = alpha;
        self.commands.push(DrawCommand::GlobalAlpha(alpha));
    }

    fn fill_path(&mut self, path: &BezPath, color: Color) {
        self.commands
            .push(DrawCommand::Fill(path.bounding_box(), color));
    }

    fn stroke_path(&mut self, path: &BezPath, color: Color, _width: f64) {
        self.commands
            .push(DrawCommand::Stroke(path.bounding_box(), color));
    }

    fn text_bounds(&mut self, text: &str, style: &TextStyle) -> Size {
        #[allow(
            clippy::cast_precision_loss,
            reason = "Character counts of UI labels are far below f64 precision limits."
        )]
        let chars = text.chars().count() as f64;
        let size = f64::from(style.size);
        let spacing = f64::from(style.letter_spacing);
        Size::new(
            chars * (size * 0.6 + spacing),
            size * f64::from(style.line_height),
        )
    }

    fn draw_text(&mut self, origin: Point, text: &str, _style: &TextStyle) {
        self.commands
            .push(DrawCommand::Text(origin, String::from(text)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scissors_nest_by_intersection() {
        let mut list = CommandList::new();
        list.save();
        list.intersect_scissor(Rect::new(0.0, 0.0, 100.0, 100.0));
        list.save();
        list.intersect_scissor(Rect::new(50.0, 50.0, 200.0, 200.0));
        list.set_global_alpha(0.5);
        assert_eq!(
            list.current_clip(),
            Some(Rect::new(50.0, 50.0, 100.0, 100.0))
        );
        list.restore();
        assert_eq!(list.current_clip(), Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
        assert_eq!(list.current_alpha(), 1.0);
        list.restore();
        assert_eq!(list.current_clip(), None);
        assert_eq!(list.save_depth(), 0);
    }

    #[test]
    fn text_bounds_use_fixed_advance() {
        let mut list = CommandList::new();
        let style = TextStyle {
            size: 10.0,
            ..TextStyle::default()
        };
        assert_eq!(list.text_bounds("abcd", &style), Size::new(24.0, 10.0));
    }

    #[test]
    fn fill_rect_records_bounds() {
        let mut list = CommandList::new();
        list.fill_rect(Rect::new(1.0, 2.0, 3.0, 4.0), Color::WHITE);
        assert_eq!(
            list.fills().collect::<Vec<_>>(),
            [(Rect::new(1.0, 2.0, 3.0, 4.0), Color::WHITE)]
        );
    }
}
