//! V4L2 webcam access.
//!
//! Currently, only V4L2 `VIDEO_CAPTURE` devices yielding JFIF JPEG or Motion JPEG frames are
//! supported.

use std::env;

use crate::image::{Image, Resolution};
use crate::timer::Timer;
use anyhow::bail;
use linuxvideo::{
    format::{FrameIntervals, FrameSizes, PixFormat, Pixelformat},
    stream::ReadStream,
    BufType, CapabilityFlags, Device, Fract,
};

/// Format negotiation options.
#[derive(Default)]
pub struct WebcamOptions {
    name: Option<String>,
    resolution: Option<Resolution>,
    fps: Option<u32>,
}

impl WebcamOptions {
    /// Sets the name of the webcam device to open.
    ///
    /// If no webcam with the given name can be found, opening the webcam will result in an error.
    #[inline]
    pub fn name(self, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..self
        }
    }

    /// Sets the desired image resolution.
    ///
    /// A lower resolution might be selected if the webcam cannot deliver the desired resolution.
    #[inline]
    pub fn resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = Some(resolution);
        self
    }

    /// Sets the desired frame rate.
    ///
    /// A lower frame rate might be selected if the webcam cannot deliver the desired frame rate.
    #[inline]
    pub fn fps(mut self, fps: u32) -> Self {
        self.fps = Some(fps);
        self
    }
}

#[derive(Clone, Copy)]
struct FrameFormat {
    resolution: Resolution,
    frame_interval: Fract,
}

impl FrameFormat {
    fn fps(&self) -> f32 {
        1.0 / self.frame_interval.as_f32()
    }
}

fn negotiate_format(device: &Device, options: &WebcamOptions) -> anyhow::Result<(PixFormat, Fract)> {
    let mut pixel_format = None;
    for format in device.formats(BufType::VIDEO_CAPTURE) {
        let format = format?;
        if format.pixelformat() == Pixelformat::JPEG || format.pixelformat() == Pixelformat::MJPG {
            pixel_format = Some(format.pixelformat());
            break;
        }
    }

    let Some(pixel_format) = pixel_format else {
        bail!("no supported pixel format found");
    };

    let mut formats = Vec::new();
    match device.frame_sizes(pixel_format)? {
        FrameSizes::Discrete(sizes) => {
            for size in sizes {
                let intervals =
                    match device.frame_intervals(pixel_format, size.width(), size.height())? {
                        FrameIntervals::Discrete(intervals) => intervals,
                        FrameIntervals::Stepwise(_) | FrameIntervals::Continuous(_) => {
                            bail!("stepwise or continuous frame rates are not supported")
                        }
                    };
                for rate in intervals {
                    formats.push(FrameFormat {
                        resolution: Resolution::new(size.width(), size.height()),
                        frame_interval: *rate.fract(),
                    });
                }
            }
        }
        FrameSizes::Stepwise(_) | FrameSizes::Continuous(_) => {
            bail!("stepwise or continuous resolutions are not supported");
        }
    }

    if formats.is_empty() {
        bail!("device reports no frame formats");
    }

    // Among the formats that satisfy the requested resolution and frame rate,
    // pick the one with the most pixels. If nothing satisfies the request,
    // fall back to the closest the device can do.
    let matches_prefs = |fmt: &FrameFormat| {
        options.resolution.map_or(true, |res| {
            fmt.resolution.width() >= res.width() && fmt.resolution.height() >= res.height()
        }) && options.fps.map_or(true, |fps| fmt.fps().round() >= fps as f32)
    };

    let best = formats
        .iter()
        .filter(|fmt| matches_prefs(fmt))
        .max_by_key(|fmt| fmt.resolution.num_pixels())
        .or_else(|| {
            log::debug!("no format satisfies the requested parameters, taking the best available");
            formats
                .iter()
                .max_by(|a, b| {
                    (a.resolution.num_pixels(), a.fps())
                        .partial_cmp(&(b.resolution.num_pixels(), b.fps()))
                        .unwrap()
                })
        })
        .copied()
        .unwrap();

    Ok((
        PixFormat::new(
            best.resolution.width(),
            best.resolution.height(),
            pixel_format,
        ),
        best.frame_interval,
    ))
}

/// A webcam yielding a stream of [`Image`]s.
pub struct Webcam {
    stream: ReadStream,
    width: u32,
    height: u32,
    t_dequeue: Timer,
    t_decode: Timer,
}

const ENV_VAR_WEBCAM_NAME: &str = "AIRCANVAS_WEBCAM_NAME";

impl Webcam {
    /// Opens the first supported webcam found.
    ///
    /// This function can block for a significant amount of time while the webcam initializes (on
    /// the order of hundreds of milliseconds).
    pub fn open(options: WebcamOptions) -> anyhow::Result<Self> {
        if let Ok(name) = env::var(ENV_VAR_WEBCAM_NAME) {
            log::debug!(
                "webcam override: `{}` is set to '{}'",
                ENV_VAR_WEBCAM_NAME,
                name,
            );
        }
        for res in linuxvideo::list()? {
            match res {
                Ok(dev) => match Self::open_impl(dev, &options) {
                    Ok(Some(webcam)) => return Ok(webcam),
                    Ok(None) => {}
                    Err(e) => {
                        log::debug!("{}", e);
                    }
                },
                Err(e) => {
                    log::warn!("{}", e);
                }
            }
        }

        bail!("no supported webcam device found")
    }

    fn open_impl(dev: Device, options: &WebcamOptions) -> anyhow::Result<Option<Self>> {
        let caps = dev.capabilities()?;
        let cam_name_from_env = env::var(ENV_VAR_WEBCAM_NAME).ok();
        if let Some(name) = &options.name.as_deref().or(cam_name_from_env.as_deref()) {
            if caps.card() != *name {
                return Ok(None);
            }
        }

        let cap_flags = caps.device_capabilities();
        let path = dev.path()?;
        log::debug!(
            "device {} ({}) capabilities: {:?}",
            caps.card(),
            path.display(),
            cap_flags,
        );

        if !cap_flags.contains(CapabilityFlags::VIDEO_CAPTURE) {
            return Ok(None);
        }

        let (pixfmt, fract) = negotiate_format(&dev, options)?;

        let capture = dev.video_capture(pixfmt)?;

        let format = capture.format();
        let width = format.width();
        let height = format.height();

        let actual = capture.set_frame_interval(fract)?;

        log::info!(
            "opened {} ({}), {}x{} @ {:.1}Hz",
            caps.card(),
            path.display(),
            width,
            height,
            1.0 / actual.as_f32(),
        );

        let stream = capture.into_stream(2)?;

        Ok(Some(Self {
            stream,
            width,
            height,
            t_dequeue: Timer::new("dequeue"),
            t_decode: Timer::new("decode"),
        }))
    }

    /// Returns the size of the frames this webcam produces.
    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width, self.height)
    }

    /// Reads the next frame from the camera.
    ///
    /// If no frame is available, this method will block until one is.
    pub fn read(&mut self) -> anyhow::Result<Image> {
        let dequeue_guard = self.t_dequeue.start();
        self.stream
            .dequeue(|buf| {
                drop(dequeue_guard);
                let image = match self.t_decode.time(|| Image::decode_jpeg(&buf)) {
                    Ok(image) => image,
                    Err(e) => {
                        // Even high-quality webcams produce occasional corrupted MJPG frames,
                        // presumably due to USB data corruption. Hand back a blank image instead
                        // of skipping the frame, which would cause a 2x latency spike.
                        log::error!("webcam decode error: {}", e);

                        Image::new(self.width, self.height)
                    }
                };
                Ok(image)
            })
            .map_err(Into::into)
    }

    /// Returns profiling timers for webcam access and decoding.
    pub fn timers(&self) -> impl Iterator<Item = &Timer> + '_ {
        [&self.t_dequeue, &self.t_decode].into_iter()
    }
}
