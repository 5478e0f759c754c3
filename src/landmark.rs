//! Containers for visual landmark estimation results.

type Position = [f32; 3];

/// A fixed-size collection of landmark positions.
///
/// Positions are in the coordinate system of the image the landmarks were
/// estimated on, with Y pointing down.
#[derive(Clone)]
pub struct Landmarks {
    positions: Box<[Position]>,
}

impl Landmarks {
    /// Creates a new [`Landmarks`] collection containing `len` preallocated landmarks.
    ///
    /// All landmarks will start with all coordinates at `0.0`.
    pub fn new(len: usize) -> Self {
        Self {
            positions: vec![[0.0, 0.0, 0.0]; len].into_boxed_slice(),
        }
    }

    /// Returns a landmark's position.
    ///
    /// # Panics
    ///
    /// This will panic if `index` is out of bounds.
    #[inline]
    pub fn position(&self, index: usize) -> Position {
        self.positions[index]
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn positions_mut(&mut self) -> &mut [Position] {
        &mut self.positions
    }
}
