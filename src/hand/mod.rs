//! Hand landmark estimation.
//!
//! The heavy lifting is done by a pretrained MediaPipe-style hand landmark
//! network, treated as a black box: it maps a camera frame to 21 skeletal
//! keypoints plus a presence score. Everything downstream of it (finger pose
//! classification, gestures) lives in [`pose`] and [`crate::gesture`].

pub mod pose;

use std::{path::Path, sync::Arc};

use nalgebra::Point2;
use tract_onnx::prelude::{
    tvec, Framework, Graph, InferenceModelExt, SimplePlan, TValue, Tensor, TypedFact, TypedOp,
};

use crate::image::{draw, Color, Image, Resolution};
use crate::landmark::Landmarks;
use crate::timer::Timer;

type Model = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Minimum presence score at which a hand counts as "in view".
const PRESENCE_THRESHOLD: f32 = 0.5;

/// Names for the hand pose landmarks.
///
/// # Terminology
///
/// - **CMC**: [Carpometacarpal joint], the lowest joint of the thumb, located near the wrist.
/// - **MCP**: [Metacarpophalangeal joint], the lower joint forming the knuckles near the palm of
///   the hand.
/// - **PIP**: Proximal Interphalangeal joint, the joint between the MCP and DIP.
/// - **DIP**: Distal Interphalangeal joint, the highest joint of a finger.
/// - **Tip**: This landmark is just placed on the tip of the finger, above the DIP.
///
/// [Carpometacarpal joint]: https://en.wikipedia.org/wiki/Carpometacarpal_joint
/// [Metacarpophalangeal joint]: https://en.wikipedia.org/wiki/Metacarpophalangeal_joint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandmarkIdx {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexFingerMcp,
    IndexFingerPip,
    IndexFingerDip,
    IndexFingerTip,
    MiddleFingerMcp,
    MiddleFingerPip,
    MiddleFingerDip,
    MiddleFingerTip,
    RingFingerMcp,
    RingFingerPip,
    RingFingerDip,
    RingFingerTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

/// Number of landmarks estimated per hand.
pub const NUM_LANDMARKS: usize = 21;

const CONNECTIVITY: &[(LandmarkIdx, LandmarkIdx)] = {
    use LandmarkIdx::*;
    &[
        // Surround the palm:
        (Wrist, ThumbCmc),
        (ThumbCmc, IndexFingerMcp),
        (IndexFingerMcp, MiddleFingerMcp),
        (MiddleFingerMcp, RingFingerMcp),
        (RingFingerMcp, PinkyMcp),
        (PinkyMcp, Wrist),
        // Thumb:
        (ThumbCmc, ThumbMcp),
        (ThumbMcp, ThumbIp),
        (ThumbIp, ThumbTip),
        // Index:
        (IndexFingerMcp, IndexFingerPip),
        (IndexFingerPip, IndexFingerDip),
        (IndexFingerDip, IndexFingerTip),
        // Middle:
        (MiddleFingerMcp, MiddleFingerPip),
        (MiddleFingerPip, MiddleFingerDip),
        (MiddleFingerDip, MiddleFingerTip),
        // Ring:
        (RingFingerMcp, RingFingerPip),
        (RingFingerPip, RingFingerDip),
        (RingFingerDip, RingFingerTip),
        // Pinky:
        (PinkyMcp, PinkyPip),
        (PinkyPip, PinkyDip),
        (PinkyDip, PinkyTip),
    ]
};

/// Landmarks estimated by a [`Landmarker`], in input image coordinates.
#[derive(Clone)]
pub struct LandmarkResult {
    landmarks: Landmarks,
}

impl Default for LandmarkResult {
    fn default() -> Self {
        LandmarkResult {
            landmarks: Landmarks::new(NUM_LANDMARKS),
        }
    }
}

impl LandmarkResult {
    /// Returns the estimated landmark positions.
    pub fn landmarks(&self) -> &Landmarks {
        &self.landmarks
    }

    /// Returns a landmark's position in the input image's coordinate system.
    pub fn landmark_position(&self, idx: LandmarkIdx) -> Point2<f32> {
        let [x, y, _] = self.landmarks.position(idx as usize);
        Point2::new(x, y)
    }

    /// Returns the position of the tip of the index finger, the landmark that drives drawing.
    pub fn index_tip(&self) -> Point2<f32> {
        self.landmark_position(LandmarkIdx::IndexFingerTip)
    }

    /// Draws the hand skeleton onto `target`.
    pub fn draw(&self, target: &mut Image) {
        for (a, b) in CONNECTIVITY {
            let a = self.landmark_position(*a);
            let b = self.landmark_position(*b);

            draw::line(target, a.x as i32, a.y as i32, b.x as i32, b.y as i32)
                .color(Color::GREEN);
        }
        for &[x, y, _] in self.landmarks.positions() {
            draw::marker(target, x as i32, y as i32);
        }
    }
}

/// Describes in what order the landmark network expects its input image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputLayout {
    /// Shape is `[N, C, H, W]`.
    Nchw,
    /// Shape is `[N, H, W, C]`.
    Nhwc,
}

/// Hand landmark estimator wrapping a pretrained ONNX network.
///
/// The network is expected to take a single RGB image input (values in range
/// 0.0 to 1.0) and to produce at least two outputs: `[1, 63]` screen-space
/// landmark coordinates and a `[1, 1]` presence score. The MediaPipe
/// `hand_landmark_lite` and `hand_landmark_full` models follow this layout.
pub struct Landmarker {
    model: Model,
    input_res: Resolution,
    layout: InputLayout,
    result: LandmarkResult,
    t_infer: Timer,
}

impl Landmarker {
    /// Loads and optimizes a landmark network from an ONNX file path.
    ///
    /// Returns an error if the file cannot be read, if the network data is
    /// malformed, or if the network's input shape is not a single RGB image.
    pub fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Self::from_path_impl(path.as_ref())
    }

    fn from_path_impl(path: &Path) -> anyhow::Result<Self> {
        match path.extension() {
            Some(ext) if ext == "onnx" => {}
            _ => anyhow::bail!("hand landmark network must have `.onnx` extension"),
        }

        let model = tract_onnx::onnx()
            .model_for_path(path)?
            .into_optimized()?
            .into_runnable()?;

        let fact = model.model().input_fact(0)?;
        let shape = fact
            .shape
            .as_concrete()
            .ok_or_else(|| anyhow::anyhow!("network input has a symbolic shape"))?;
        let (layout, w, h) = match *shape {
            [1, 3, h, w] => (InputLayout::Nchw, w, h),
            [1, h, w, 3] => (InputLayout::Nhwc, w, h),
            _ => anyhow::bail!("invalid network input shape: {:?}", shape),
        };
        let input_res = Resolution::new(w.try_into()?, h.try_into()?);
        log::debug!(
            "loaded hand landmark network from '{}' ({} {:?} input)",
            path.display(),
            input_res,
            layout,
        );

        Ok(Self {
            model,
            input_res,
            layout,
            result: LandmarkResult::default(),
            t_infer: Timer::new("infer"),
        })
    }

    /// Returns profiling timers for this estimator.
    pub fn timers(&self) -> impl Iterator<Item = &Timer> + '_ {
        [&self.t_infer].into_iter()
    }

    /// Runs landmark estimation on a camera frame.
    ///
    /// The frame is sampled down to the network's input resolution (stretching
    /// it if the aspect ratios differ) and the estimated landmarks are mapped
    /// back to frame coordinates.
    ///
    /// Returns `None` when the presence score says no hand is in view.
    pub fn estimate(&mut self, image: &Image) -> anyhow::Result<Option<&LandmarkResult>> {
        let (w, h) = (
            self.input_res.width() as usize,
            self.input_res.height() as usize,
        );
        let sample = |x: usize, y: usize, c: usize| {
            let sx = (((x as f32 + 0.5) / w as f32) * image.width() as f32) as u32;
            let sy = (((y as f32 + 0.5) / h as f32) * image.height() as f32) as u32;
            let color = image.get(
                sx.min(image.width() - 1),
                sy.min(image.height() - 1),
            );
            color[c] as f32 / 255.0
        };
        let tensor: Tensor = match self.layout {
            InputLayout::Nchw => tract_onnx::prelude::tract_ndarray::Array4::from_shape_fn(
                (1, 3, h, w),
                |(_, c, y, x)| sample(x, y, c),
            )
            .into(),
            InputLayout::Nhwc => tract_onnx::prelude::tract_ndarray::Array4::from_shape_fn(
                (1, h, w, 3),
                |(_, y, x, c)| sample(x, y, c),
            )
            .into(),
        };

        let outputs = self
            .t_infer
            .time(|| self.model.run(tvec![TValue::from_const(Arc::new(tensor))]))?;
        anyhow::ensure!(
            outputs.len() >= 2,
            "expected at least 2 network outputs, got {}",
            outputs.len(),
        );

        let screen_landmarks = &outputs[0];
        let presence_flag = &outputs[1];
        anyhow::ensure!(screen_landmarks.shape() == [1, NUM_LANDMARKS * 3]);
        anyhow::ensure!(presence_flag.shape() == [1, 1]);

        let presence = presence_flag.as_slice::<f32>()?[0];
        if presence < PRESENCE_THRESHOLD {
            log::trace!("presence {presence} below threshold, no hand in view");
            return Ok(None);
        }

        let coords = screen_landmarks.as_slice::<f32>()?;
        let scale_x = image.width() as f32 / w as f32;
        let scale_y = image.height() as f32 / h as f32;
        for (chunk, out) in coords
            .chunks_exact(3)
            .zip(self.result.landmarks.positions_mut())
        {
            // Landmarks come out in network input coordinates; map them back
            // onto the frame.
            out[0] = chunk[0] * scale_x;
            out[1] = chunk[1] * scale_y;
            out[2] = chunk[2] * scale_x;
        }

        Ok(Some(&self.result))
    }
}
