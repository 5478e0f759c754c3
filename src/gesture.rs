//! Maps per-frame finger poses to drawing commands.

use std::time::{Duration, Instant};

use nalgebra::Point2;

use crate::canvas::Stroke;
use crate::filter::{Ema, Filter};
use crate::hand::pose::{Finger, FingerSet};
use crate::image::Color;

/// The drawing colors, cycled through by the two-finger gesture.
pub const PALETTE: [Color; 4] = [Color::RED, Color::GREEN, Color::BLUE, Color::YELLOW];

/// How long discrete gestures (color switch, undo) are ignored after one was
/// accepted, so that a pose held across consecutive frames triggers only once.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(300);

const DEFAULT_THICKNESS: u32 = 5;

/// EMA weight of 1.0 passes the fingertip through unfiltered, so strokes
/// connect the exact previous and current tip positions unless smoothing is
/// requested via [`GestureInterpreter::with_smoothing`].
const DEFAULT_SMOOTHING: f32 = 1.0;

/// A command for the canvas, produced by [`GestureInterpreter::update`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Append `Stroke` to the canvas.
    Stroke(Stroke),
    /// The active color changed to the contained value.
    CycleColor(Color),
    /// Remove the most recent stroke.
    Undo,
}

/// Interprets raised-finger sets as gestures.
///
/// State is deliberately minimal: the previous fingertip position (so strokes
/// connect across frames), the palette index, and the time of the last
/// discrete gesture for debouncing.
pub struct GestureInterpreter {
    prev: Option<Point2<f32>>,
    color_index: usize,
    thickness: u32,
    cooldown: Duration,
    last_discrete: Option<Instant>,
    tip_x: Ema,
    tip_y: Ema,
}

impl Default for GestureInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureInterpreter {
    pub fn new() -> Self {
        Self {
            prev: None,
            color_index: 0,
            thickness: DEFAULT_THICKNESS,
            cooldown: DEFAULT_COOLDOWN,
            last_discrete: None,
            tip_x: Ema::new(DEFAULT_SMOOTHING),
            tip_y: Ema::new(DEFAULT_SMOOTHING),
        }
    }

    /// Sets the cooldown applied after discrete gestures.
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Enables EMA smoothing of the drawing fingertip to suppress landmark
    /// jitter.
    ///
    /// Smaller `alpha` values smooth more strongly; the default of 1.0 leaves
    /// the fingertip unfiltered.
    pub fn with_smoothing(mut self, alpha: f32) -> Self {
        self.tip_x = Ema::new(alpha);
        self.tip_y = Ema::new(alpha);
        self
    }

    /// Sets the stroke thickness of drawn segments.
    pub fn with_thickness(mut self, thickness: u32) -> Self {
        self.thickness = thickness;
        self
    }

    /// Returns the active drawing color.
    pub fn color(&self) -> Color {
        PALETTE[self.color_index]
    }

    /// Forgets the previous fingertip position, breaking the current line.
    ///
    /// Called when no hand is detected in a frame.
    pub fn reset(&mut self) {
        self.prev = None;
        self.tip_x.reset();
        self.tip_y.reset();
    }

    /// Feeds one frame's finger pose into the interpreter.
    ///
    /// `index_tip` is the index fingertip position in frame coordinates. The
    /// returned command (if any) is meant to be applied to the canvas.
    pub fn update(&mut self, fingers: FingerSet, index_tip: Point2<f32>) -> Option<Command> {
        let mut command = None;

        // Only the index finger raised: draw.
        if fingers == FingerSet::of(&[Finger::Index]) {
            let tip = Point2::new(self.tip_x.push(index_tip.x), self.tip_y.push(index_tip.y));
            if let Some(prev) = self.prev {
                command = Some(Command::Stroke(Stroke {
                    start: prev,
                    end: tip,
                    color: self.color(),
                    thickness: self.thickness,
                }));
            }
            self.prev = Some(tip);
        } else {
            // Any other pose breaks the line.
            self.reset();
        }

        // Index + middle finger raised: advance the palette.
        if fingers == FingerSet::of(&[Finger::Index, Finger::Middle]) && self.debounce() {
            self.color_index = (self.color_index + 1) % PALETTE.len();
            command = Some(Command::CycleColor(self.color()));
        }

        // All three tracked fingers raised: undo.
        if fingers.count() == 3 && self.debounce() {
            command = Some(Command::Undo);
        }

        command
    }

    /// Returns whether a discrete gesture may trigger, and if so, restarts the
    /// cooldown window.
    fn debounce(&mut self) -> bool {
        let now = Instant::now();
        match self.last_discrete {
            Some(last) if now.duration_since(last) < self.cooldown => false,
            _ => {
                self.last_discrete = Some(now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpreter() -> GestureInterpreter {
        // Zero cooldown makes the tests deterministic.
        GestureInterpreter::new().with_cooldown(Duration::ZERO)
    }

    fn index_only() -> FingerSet {
        FingerSet::of(&[Finger::Index])
    }

    #[test]
    fn drawing_connects_consecutive_tips() {
        let mut interp = interpreter();

        // The first frame only seeds the previous position.
        assert_eq!(interp.update(index_only(), Point2::new(10.0, 10.0)), None);

        let command = interp.update(index_only(), Point2::new(20.0, 15.0));
        match command {
            Some(Command::Stroke(stroke)) => {
                assert_eq!(stroke.start, Point2::new(10.0, 10.0));
                assert_eq!(stroke.end, Point2::new(20.0, 15.0));
                assert_eq!(stroke.color, Color::RED);
            }
            other => panic!("expected stroke, got {:?}", other),
        }

        // The end of one segment is the start of the next.
        let command = interp.update(index_only(), Point2::new(30.0, 10.0));
        match command {
            Some(Command::Stroke(stroke)) => {
                assert_eq!(stroke.start, Point2::new(20.0, 15.0));
                assert_eq!(stroke.end, Point2::new(30.0, 10.0));
            }
            other => panic!("expected stroke, got {:?}", other),
        }
    }

    #[test]
    fn lowering_the_finger_breaks_the_line() {
        let mut interp = interpreter();
        interp.update(index_only(), Point2::new(10.0, 10.0));
        interp.update(FingerSet::EMPTY, Point2::new(50.0, 50.0));

        // After the break, the next index-only frame seeds a new line instead
        // of connecting to the old one.
        assert_eq!(interp.update(index_only(), Point2::new(90.0, 90.0)), None);
    }

    #[test]
    fn other_single_finger_does_not_draw() {
        let mut interp = interpreter();
        interp.update(index_only(), Point2::new(10.0, 10.0));
        let command = interp.update(FingerSet::of(&[Finger::Ring]), Point2::new(20.0, 20.0));
        assert_eq!(command, None);
    }

    #[test]
    fn color_cycles_and_wraps() {
        let mut interp = interpreter();
        let two = FingerSet::of(&[Finger::Index, Finger::Middle]);
        let tip = Point2::new(0.0, 0.0);

        let mut seen = Vec::new();
        for _ in 0..4 {
            match interp.update(two, tip) {
                Some(Command::CycleColor(color)) => seen.push(color),
                other => panic!("expected color switch, got {:?}", other),
            }
        }

        assert_eq!(seen, [Color::GREEN, Color::BLUE, Color::YELLOW, Color::RED]);
        assert_eq!(interp.color(), Color::RED);
    }

    #[test]
    fn cooldown_debounces_discrete_gestures() {
        let mut interp = GestureInterpreter::new().with_cooldown(Duration::from_secs(60));
        let two = FingerSet::of(&[Finger::Index, Finger::Middle]);
        let tip = Point2::new(0.0, 0.0);

        assert!(matches!(
            interp.update(two, tip),
            Some(Command::CycleColor(_))
        ));
        // Held across the next frames, the pose must not re-trigger.
        assert_eq!(interp.update(two, tip), None);
        assert_eq!(interp.update(two, tip), None);
    }

    #[test]
    fn three_fingers_undo() {
        let mut interp = interpreter();
        let three = FingerSet::of(&[Finger::Index, Finger::Middle, Finger::Ring]);
        assert_eq!(
            interp.update(three, Point2::new(0.0, 0.0)),
            Some(Command::Undo)
        );
    }

    #[test]
    fn default_strokes_end_at_the_raw_fingertip() {
        // Without opting into smoothing, segment endpoints must be exactly
        // the previous and current index-tip positions.
        let mut interp = GestureInterpreter::new();
        interp.update(index_only(), Point2::new(10.0, 10.0));
        match interp.update(index_only(), Point2::new(20.0, 20.0)) {
            Some(Command::Stroke(stroke)) => {
                assert_eq!(stroke.start, Point2::new(10.0, 10.0));
                assert_eq!(stroke.end, Point2::new(20.0, 20.0));
            }
            other => panic!("expected stroke, got {:?}", other),
        }
    }

    #[test]
    fn smoothing_damps_fingertip_jumps() {
        let mut interp = GestureInterpreter::new()
            .with_cooldown(Duration::ZERO)
            .with_smoothing(0.5);

        interp.update(index_only(), Point2::new(10.0, 10.0));
        match interp.update(index_only(), Point2::new(20.0, 20.0)) {
            Some(Command::Stroke(stroke)) => {
                // The raw tip jumped to 20, the smoothed one only moves halfway.
                approx::assert_relative_eq!(stroke.end.x, 15.0);
                approx::assert_relative_eq!(stroke.end.y, 15.0);
            }
            other => panic!("expected stroke, got {:?}", other),
        }
    }

    #[test]
    fn drawing_uses_the_active_color() {
        let mut interp = interpreter();
        let two = FingerSet::of(&[Finger::Index, Finger::Middle]);
        interp.update(two, Point2::new(0.0, 0.0));

        interp.update(index_only(), Point2::new(10.0, 10.0));
        match interp.update(index_only(), Point2::new(20.0, 20.0)) {
            Some(Command::Stroke(stroke)) => assert_eq!(stroke.color, Color::GREEN),
            other => panic!("expected stroke, got {:?}", other),
        }
    }
}
