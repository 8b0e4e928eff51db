//! Circle March entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use circle_march::Settings;
    use circle_march::platform::{Animation, FrameClock, KeyboardState, run_frame};
    use circle_march::renderer::{RenderState, VertexCanvas};
    use circle_march::sim::{Key, Viewport, World};

    type FrameCallback = Closure<dyn FnMut(f64)>;

    /// requestAnimationFrame-backed frame clock
    struct BrowserClock {
        callback: Rc<RefCell<Option<FrameCallback>>>,
    }

    impl FrameClock for BrowserClock {
        type Handle = i32;

        fn request_tick(&mut self) -> Option<i32> {
            let window = web_sys::window()?;
            let callback = self.callback.borrow();
            window
                .request_animation_frame(callback.as_ref()?.as_ref().unchecked_ref())
                .map_err(|e| log::error!("requestAnimationFrame failed: {:?}", e))
                .ok()
        }

        fn cancel_tick(&mut self, handle: i32) {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(handle);
            }
        }
    }

    /// App instance holding all state
    struct App {
        world: World,
        keyboard: KeyboardState,
        animation: Animation<BrowserClock>,
        canvas: VertexCanvas,
        render_state: Option<RenderState>,
    }

    impl App {
        /// Frame callback: tick, draw, present
        fn frame(&mut self) {
            let Self {
                world,
                keyboard,
                animation,
                canvas,
                render_state,
            } = self;

            animation.on_frame(|| {
                run_frame(world, keyboard, canvas);

                if let Some(render_state) = render_state.as_mut() {
                    match render_state.render(canvas) {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost) => {
                            let (w, h) = render_state.size;
                            let viewport = render_state.viewport;
                            render_state.resize(w, h, viewport);
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("Out of memory!");
                        }
                        Err(e) => log::warn!("Render error: {:?}", e),
                    }
                }
            });
        }

        /// Track a new canvas size in both the simulation and the surface
        fn resize(&mut self, canvas: &HtmlCanvasElement) {
            let (client_w, client_h, width, height) = measure(canvas);
            canvas.set_width(width);
            canvas.set_height(height);

            if let Err(e) = self.world.resize(client_w as f64, client_h as f64) {
                log::warn!("Ignoring resize: {}", e);
                return;
            }
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.resize(width, height, (client_w, client_h));
            }
        }
    }

    /// Logical (CSS) and physical canvas size
    fn measure(canvas: &HtmlCanvasElement) -> (f32, f32, u32, u32) {
        let dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0);
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        (
            client_w as f32,
            client_h as f32,
            (client_w as f64 * dpr) as u32,
            (client_h as f64 * dpr) as u32,
        )
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Circle March starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let (client_w, client_h, width, height) = measure(&canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let world = match Viewport::new(client_w as f64, client_h as f64)
            .and_then(|viewport| World::new(&settings, viewport))
        {
            Ok(world) => world,
            Err(e) => {
                log::error!("Failed to build world: {}", e);
                return;
            }
        };

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state =
            RenderState::new(surface, &adapter, width, height, (client_w, client_h)).await;

        let callback: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));
        let app = Rc::new(RefCell::new(App {
            world,
            keyboard: KeyboardState::new(),
            animation: Animation::new(BrowserClock {
                callback: callback.clone(),
            }),
            canvas: VertexCanvas::new(),
            render_state: Some(render_state),
        }));

        {
            let app = app.clone();
            *callback.borrow_mut() = Some(Closure::new(move |_time: f64| {
                app.borrow_mut().frame();
            }));
        }

        setup_input_handlers(app.clone());
        setup_resize(&canvas, app.clone());

        app.borrow_mut().animation.start();

        log::info!("Circle March running!");
    }

    fn setup_input_handlers(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();

        // Key down: mark held, keep arrows/WASD from scrolling the page
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                if let Some(key) = a.keyboard.press(&event.key()) {
                    if key.is_movement() {
                        event.prevent_default();
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up: release, pause toggles on release
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                let key = a
                    .keyboard
                    .release(&event.key())
                    .or_else(|| (event.code() == "Space").then_some(Key::Pause));
                if key == Some(Key::Pause) {
                    let running = a.animation.toggle();
                    log::info!("Animation {}", if running { "running" } else { "paused" });
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur: keys released elsewhere never reach us
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().keyboard.clear();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().resize(&canvas);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Circle March (native) starting...");
    log::info!("Native mode runs a scripted headless session - run with `trunk serve` for the web version");

    if let Err(e) = headless::run() {
        log::error!("Headless session failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use circle_march::consts::DEFAULT_VIEWPORT;
    use circle_march::platform::{Animation, KeyboardState, StepClock, run_frame};
    use circle_march::renderer::Recorder;
    use circle_march::sim::{Viewport, World};
    use circle_march::{Result, Settings};

    /// Scripted session: (frames to fire, keys held, toggle pause first)
    const SCRIPT: &[(u32, &[&str], bool)] = &[
        (90, &["arrowleft"], false),
        (60, &["arrowup"], false),
        (30, &["arrowup"], true),
        (30, &["d", "s"], true),
        (45, &["arrowright", "arrowdown"], false),
    ];

    pub fn run() -> Result<()> {
        let settings = Settings::load();
        let (w, h) = DEFAULT_VIEWPORT;
        let mut world = World::new(&settings, Viewport::new(w, h)?)?;
        let mut keyboard = KeyboardState::new();
        let mut animation = Animation::new(StepClock::new());
        let mut canvas = Recorder::new();

        animation.start();

        for &(frames, keys, toggle) in SCRIPT {
            if toggle {
                let running = animation.toggle();
                log::info!("Animation {}", if running { "running" } else { "paused" });
            }

            keyboard.clear();
            for key in keys {
                keyboard.press(key);
            }

            for _ in 0..frames {
                // While paused nothing is pending and no frame runs
                if !animation.clock_mut().fire() {
                    continue;
                }
                animation.on_frame(|| run_frame(&mut world, &keyboard, &mut canvas));
            }
        }

        let hit = world
            .ray
            .hit_obstacle(&world.field)
            .map(|c| format!("{:?}", c.tint))
            .unwrap_or_else(|| "none".to_string());

        println!("\nHeadless session complete");
        println!("  ticks:        {}", world.ticks);
        println!("  hero:         {} @ {:.1} deg", world.hero.position(), world.hero.angle_degrees());
        println!("  march steps:  {}", world.ray.steps.len());
        println!("  termination:  {:?}", world.ray.termination);
        println!("  hit:          {}", hit);
        println!("  draw ops:     {}", canvas.ops.len());

        Ok(())
    }
}
