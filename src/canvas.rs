//! The persistent drawing surface and its stroke history.

use std::path::Path;

use nalgebra::Point2;

use crate::image::{draw, Color, Image, Resolution};

const BACKGROUND: Color = Color::BLACK;

/// How strongly the canvas shows through the camera frame when compositing.
const OVERLAY_WEIGHT: f32 = 0.5;

/// One persisted line segment. Immutable once appended to a [`Canvas`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub start: Point2<f32>,
    pub end: Point2<f32>,
    pub color: Color,
    pub thickness: u32,
}

/// A raster drawing surface backed by an insertion-ordered stroke history.
///
/// The raster always equals the replay of the full history from a blank
/// background: appending draws only the newest segment, while undo rebuilds
/// the raster from scratch.
pub struct Canvas {
    image: Image,
    history: Vec<Stroke>,
}

impl Canvas {
    /// Creates an empty canvas of the given size.
    pub fn new(resolution: Resolution) -> Self {
        let mut image = Image::new(resolution.width(), resolution.height());
        image.clear(BACKGROUND);
        Self {
            image,
            history: Vec::new(),
        }
    }

    /// Appends a stroke to the history and draws it onto the raster.
    pub fn stroke(&mut self, stroke: Stroke) {
        draw_stroke(&mut self.image, &stroke);
        self.history.push(stroke);
    }

    /// Removes the most recently appended stroke and rebuilds the raster by
    /// replaying the remaining history.
    ///
    /// Returns the removed stroke, or `None` if the history was empty.
    pub fn undo(&mut self) -> Option<Stroke> {
        let removed = self.history.pop()?;
        self.replay();
        Some(removed)
    }

    /// Empties the history and resets the raster to the background color.
    pub fn clear(&mut self) {
        self.history.clear();
        self.image.clear(BACKGROUND);
    }

    /// Returns the strokes currently on the canvas, in insertion order.
    pub fn history(&self) -> &[Stroke] {
        &self.history
    }

    /// Returns the raster contents of the canvas.
    pub fn image(&self) -> &Image {
        &self.image
    }

    /// Writes the raster to the file system.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        self.image.save(path)
    }

    /// Blends the canvas over a camera frame for display.
    ///
    /// # Panics
    ///
    /// This will panic if `frame` does not have the canvas' resolution.
    pub fn composite(&self, frame: &Image) -> Image {
        frame.mix(&self.image, OVERLAY_WEIGHT)
    }

    fn replay(&mut self) {
        self.image.clear(BACKGROUND);
        for stroke in &self.history {
            draw_stroke(&mut self.image, stroke);
        }
    }
}

fn draw_stroke(image: &mut Image, stroke: &Stroke) {
    draw::line(
        image,
        stroke.start.x.round() as i32,
        stroke.start.y.round() as i32,
        stroke.end.x.round() as i32,
        stroke.end.y.round() as i32,
    )
    .color(stroke.color)
    .stroke_width(stroke.thickness);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        Canvas::new(Resolution::new(32, 32))
    }

    fn stroke(y: f32, color: Color) -> Stroke {
        Stroke {
            start: Point2::new(2.0, y),
            end: Point2::new(30.0, y),
            color,
            thickness: 1,
        }
    }

    #[test]
    fn starts_blank() {
        let canvas = canvas();
        assert!(canvas.history().is_empty());
        assert!(canvas
            .image()
            .data()
            .chunks_exact(4)
            .all(|px| px == [0, 0, 0, 255]));
    }

    #[test]
    fn stroke_draws_incrementally() {
        let mut canvas = canvas();
        canvas.stroke(stroke(4.0, Color::RED));

        assert_eq!(canvas.history().len(), 1);
        assert_eq!(canvas.image().get(10, 4), Color::RED);
        assert_eq!(canvas.image().get(10, 5), BACKGROUND);
    }

    #[test]
    fn undo_removes_only_the_newest_stroke() {
        let mut canvas = canvas();
        canvas.stroke(stroke(4.0, Color::RED));
        canvas.stroke(stroke(8.0, Color::GREEN));

        let removed = canvas.undo().unwrap();
        assert_eq!(removed.color, Color::GREEN);
        assert_eq!(canvas.history().len(), 1);

        // The older stroke is still there, the newer one is gone.
        assert_eq!(canvas.image().get(10, 4), Color::RED);
        assert_eq!(canvas.image().get(10, 8), BACKGROUND);
    }

    #[test]
    fn undo_rebuild_matches_fresh_replay() {
        let mut canvas = canvas();
        let strokes = [
            stroke(4.0, Color::RED),
            stroke(8.0, Color::GREEN),
            stroke(12.0, Color::BLUE),
        ];
        for s in strokes {
            canvas.stroke(s);
        }
        canvas.undo();

        // Replaying the remaining history into a fresh canvas must produce
        // identical pixel content.
        let mut fresh = Canvas::new(Resolution::new(32, 32));
        for s in canvas.history().to_vec() {
            fresh.stroke(s);
        }
        assert_eq!(canvas.image().data(), fresh.image().data());
    }

    #[test]
    fn undo_on_empty_canvas_is_a_no_op() {
        let mut canvas = canvas();
        assert_eq!(canvas.undo(), None);
    }

    #[test]
    fn clear_resets_history_and_raster() {
        let mut canvas = canvas();
        canvas.stroke(stroke(4.0, Color::RED));
        canvas.clear();

        assert!(canvas.history().is_empty());
        assert!(canvas
            .image()
            .data()
            .chunks_exact(4)
            .all(|px| px == [0, 0, 0, 255]));
    }

    #[test]
    fn save_writes_the_raster_contents() {
        let mut canvas = canvas();
        canvas.stroke(stroke(4.0, Color::YELLOW));

        let path = std::env::temp_dir().join("aircanvas-save-test.png");
        canvas.save(&path).unwrap();
        let loaded = Image::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.data(), canvas.image().data());
    }

    #[test]
    fn composite_blends_canvas_over_frame() {
        let mut canvas = canvas();
        canvas.stroke(stroke(4.0, Color::RED));

        let mut frame = Image::new(32, 32);
        frame.clear(Color::WHITE);
        let display = canvas.composite(&frame);

        // On the stroke: half red, half white.
        assert_eq!(display.get(10, 4), Color::from_rgb8(255, 128, 128));
        // Off the stroke: half black, half white.
        assert_eq!(display.get(10, 10), Color::from_rgb8(128, 128, 128));
    }
}
