use std::env;

use aircanvas::canvas::Canvas;
use aircanvas::gesture::{Command, GestureInterpreter};
use aircanvas::gui::{self, Key};
use aircanvas::hand::{pose, Landmarker};
use aircanvas::image::draw;
use aircanvas::timer::FpsCounter;
use aircanvas::video::webcam::{Webcam, WebcamOptions};

const ENV_VAR_HAND_MODEL: &str = "AIRCANVAS_HAND_MODEL";
const DEFAULT_MODEL_PATH: &str = "hand_landmark_lite.onnx";

const OUTPUT_PATH: &str = "drawing_output.png";

fn main() -> ! {
    aircanvas::init_logger!();
    gui::run(app)
}

fn app() -> anyhow::Result<()> {
    let model_path = env::args()
        .nth(1)
        .or_else(|| env::var(ENV_VAR_HAND_MODEL).ok())
        .unwrap_or_else(|| DEFAULT_MODEL_PATH.to_string());
    let mut landmarker = Landmarker::from_path(&model_path)?;

    let mut webcam = Webcam::open(WebcamOptions::default().fps(30))?;
    let mut canvas = Canvas::new(webcam.resolution());
    let mut gestures = GestureInterpreter::new();

    let mut fps = FpsCounter::new("aircanvas");
    loop {
        let mut frame = webcam.read()?;
        // Mirror the feed so that moving the hand right moves the cursor right.
        frame.flip_horizontal_in_place();

        match landmarker.estimate(&frame) {
            Ok(Some(result)) => {
                let fingers = pose::raised_fingers(result.landmarks());
                if let Some(command) = gestures.update(fingers, result.index_tip()) {
                    match command {
                        Command::Stroke(stroke) => canvas.stroke(stroke),
                        Command::CycleColor(color) => log::debug!("color -> {:?}", color),
                        Command::Undo => {
                            canvas.undo();
                        }
                    }
                }
                result.draw(&mut frame);
            }
            Ok(None) => gestures.reset(),
            Err(e) => {
                // A failed inference means no gesture this frame, nothing more.
                log::error!("landmark estimation failed: {}", e);
                gestures.reset();
            }
        }

        let mut display = canvas.composite(&frame);
        // Swatch showing the active drawing color.
        draw::rect(&mut display, 10, 10, 50, 50)
            .color(gestures.color())
            .fill();
        gui::show_frame(&display);

        for key in gui::poll_keys() {
            match key {
                Key::C => canvas.clear(),
                Key::S => {
                    canvas.save(OUTPUT_PATH)?;
                    log::info!("saved drawing to {}", OUTPUT_PATH);
                }
                Key::Escape => return Ok(()),
            }
        }

        fps.tick_with(webcam.timers().chain(landmarker.timers()));
    }
}
