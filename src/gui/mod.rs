//! The preview window showing the camera feed with the canvas blended in.
//!
//! The platform's windowing machinery insists on running on the main thread,
//! so [`run`] hands the main thread to the event loop and runs the
//! application on a second thread. Frames arrive as user events; key presses
//! travel the other way through a queue drained by [`poll_keys`].

mod renderer;

use std::{
    collections::VecDeque,
    panic::{catch_unwind, AssertUnwindSafe},
    process,
    rc::Rc,
    sync::{Mutex, OnceLock},
};

use winit::{
    event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopBuilder, EventLoopClosed, EventLoopProxy},
};

use crate::{
    image::{Image, Resolution},
    termination::Termination,
};

use self::renderer::{Gpu, Renderer, Window};

const WINDOW_TITLE: &str = "air canvas";

/// A key press the application cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// `c` – clear the canvas.
    C,
    /// `s` – save the drawing.
    S,
    /// Esc – exit. Also synthesized when the window is closed.
    Escape,
}

struct Gui {
    gpu: Rc<Gpu>,
    renderer: Option<Renderer>,
}

impl Gui {
    fn new() -> Self {
        Self {
            gpu: Rc::new(pollster::block_on(Gpu::open()).unwrap()),
            renderer: None,
        }
    }

    fn run(mut self, event_loop: EventLoop<Msg>) -> ! {
        event_loop.run(move |event, target, flow| {
            *flow = ControlFlow::Wait;
            match event {
                Event::UserEvent(Msg::Frame { res, data }) => {
                    if self.renderer.is_none() {
                        log::debug!("creating output window at {res}");

                        let win = Window::open(target, WINDOW_TITLE, res).unwrap();
                        self.renderer = Some(Renderer::new(win, self.gpu.clone()).unwrap());
                    }
                    let renderer = self.renderer.as_mut().unwrap();

                    renderer.update_texture(res, &data);
                    renderer.window().request_redraw();
                }
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::KeyboardInput {
                        input:
                            KeyboardInput {
                                state: ElementState::Pressed,
                                virtual_keycode: Some(keycode),
                                ..
                            },
                        ..
                    } => {
                        let key = match keycode {
                            VirtualKeyCode::C => Key::C,
                            VirtualKeyCode::S => Key::S,
                            VirtualKeyCode::Escape => Key::Escape,
                            _ => return,
                        };
                        KEYS.lock().unwrap().push_back(key);
                    }
                    WindowEvent::CloseRequested => {
                        KEYS.lock().unwrap().push_back(Key::Escape);
                    }
                    _ => {}
                },
                Event::RedrawRequested(_) => {
                    if let Some(renderer) = &mut self.renderer {
                        renderer.redraw();
                    }
                }
                _ => {}
            }
        });
    }
}

#[derive(Debug)]
enum Msg {
    Frame { res: Resolution, data: Vec<u8> },
}

static PROXY: OnceLock<Mutex<EventLoopProxy<Msg>>> = OnceLock::new();

static KEYS: Mutex<VecDeque<Key>> = Mutex::new(VecDeque::new());

fn send(msg: Msg) {
    PROXY
        .get()
        .expect("event loop not running")
        .lock()
        .unwrap()
        .send_event(msg)
        .map_err(|_closed| EventLoopClosed(()))
        .unwrap();
}

/// Takes over the main thread and runs `cb` on a separate thread.
///
/// The process exits when `cb` returns, reporting its result.
pub fn run<F, R>(cb: F) -> !
where
    F: FnOnce() -> R + Send + 'static,
    R: Termination + Send,
{
    let event_loop = EventLoopBuilder::with_user_event().build();
    let proxy = event_loop.create_proxy();
    PROXY
        .set(Mutex::new(proxy))
        .ok()
        .expect("event loop already running");

    // The event loop owns the main thread from here on; the application gets
    // its own.
    std::thread::spawn(move || {
        let result = catch_unwind(AssertUnwindSafe(cb));
        match result {
            Ok(r) => {
                if r.is_success() {
                    process::exit(0);
                } else {
                    r.report(); // may print the error message
                    process::exit(1);
                }
            }
            Err(_payload) => {
                // Panic handler has printed the panic message and backtrace already, exit with 101
                // to mimick libstd behavior.
                process::exit(101);
            }
        }
    });

    let gui = Gui::new();
    gui.run(event_loop);
}

/// Displays an image in the output window, opening it if necessary.
pub fn show_frame(image: &Image) {
    // Image data is RGBA8 internally so that no conversion before GPU upload is needed.
    let data = image.data().to_vec();

    send(Msg::Frame {
        res: Resolution::new(image.width(), image.height()),
        data,
    });
}

/// Drains the key presses received since the last call.
pub fn poll_keys() -> Vec<Key> {
    KEYS.lock().unwrap().drain(..).collect()
}
