pub mod config;
pub mod engine;
pub mod error;
pub mod sim;
pub mod ui;
pub mod world;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{WebGlRenderingContext, HtmlCanvasElement, MouseEvent, WheelEvent, Request, RequestInit, RequestMode, Response, Window};
use std::cell::RefCell;
use std::rc::Rc;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use crate::config::ViewerConfig;
use crate::engine::mesh::Mesh;
use crate::engine::renderer::Renderer;
use crate::engine::scene::Scene;
use crate::error::ViewerError;
use crate::sim::clock::SimulationClock;
use crate::sim::picker::PointerState;
use crate::sim::port::PickableScene;
use crate::sim::Simulation;
use crate::ui::label::{HoverLabel, HoverUpdate};
use crate::world::Assets;

const CONFIG_PATH: &str = "/assets/config.json";

/// Everything one running view owns. Browser callbacks reach it through `VIEWER`.
struct Viewer {
    renderer: Renderer,
    sim: Simulation<Scene>,
    clock: SimulationClock,
    label: HoverLabel,
    viewport: (f32, f32),
}

impl Viewer {
    fn frame(&mut self, wall_ms: f64) {
        let now = self.clock.advance(wall_ms);
        self.sim.frame(now);
        self.sim.scene_mut().update_controls();

        self.renderer.clear(0.0, 0.0, 0.0);
        self.renderer.enable_depth_test();
        self.renderer.enable_blend();
        self.sim.scene().render(&self.renderer);
    }

    fn pointer_move(&mut self, x: f32, y: f32) -> Result<(), JsValue> {
        self.sim.scene_mut().controls.pointer_move(x, y);

        let (width, height) = self.viewport;
        let body = PointerState::from_pixels(x, y, width, height).and_then(|pointer| self.sim.pick(pointer));
        self.label.apply(&HoverUpdate::for_pick(body, x, y))
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.viewport = (width, height);
        self.sim.scene_mut().camera.set_viewport(width, height);
        self.renderer.resize(width as i32, height as i32);
    }
}

thread_local! {
    static VIEWER: RefCell<Option<Viewer>> = RefCell::new(None);
}

fn with_viewer<R>(f: impl FnOnce(&mut Viewer) -> R) -> Option<R> {
    VIEWER.with(|v| v.borrow_mut().as_mut().map(f))
}

#[wasm_bindgen]
pub async fn init_viewer() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let window = web_sys::window().ok_or("No window")?;
    let document = window.document().ok_or("No document")?;
    let canvas = document.get_element_by_id("canvas")
        .ok_or("No canvas")?
        .dyn_into::<HtmlCanvasElement>()?;

    let gl = canvas
        .get_context("webgl")?
        .ok_or("No WebGL")?
        .dyn_into::<WebGlRenderingContext>()?;

    let renderer = Renderer::new(gl)?;

    let config = load_config(&window).await;
    log::set_max_level(config.level_filter());

    let station_model = match &config.station_model {
        Some(model) => match fetch_bytes(&window, &model.path).await.and_then(|bytes| Mesh::from_gltf(&bytes)) {
            Ok(mesh) => Some((mesh, model.scale)),
            Err(err) => {
                log::warn!("station model {} unavailable, using procedural station: {}", model.path, err);
                None
            }
        },
        None => None,
    };

    let (width, height) = window_size(&window);
    renderer.resize(width as i32, height as i32);

    let mut scene = Scene::new(&config.camera, width / height.max(1.0));
    let assets = Assets {
        load_texture: |url: &str| renderer.create_texture(url).ok(),
        station_model,
    };
    let mut rng = SmallRng::from_entropy();
    let world = world::build(&mut scene, &config, assets, &mut rng)?;

    let sim = Simulation::new(scene, world.registry, &config);
    ui::legend::render(&document, sim.registry().names(), Rc::new(teleport_to_planet))?;
    let label = HoverLabel::create(&document)?;

    let viewer = Viewer {
        renderer,
        sim,
        clock: SimulationClock::new(js_sys::Date::now()),
        label,
        viewport: (width, height),
    };
    VIEWER.with(|v| *v.borrow_mut() = Some(viewer));

    // Legend links and page scripts call this by name
    let global = Closure::wrap(Box::new(|name: String| teleport_to_planet(&name)) as Box<dyn FnMut(String)>);
    js_sys::Reflect::set(&window, &JsValue::from_str("teleportToPlanet"), global.as_ref())?;
    global.forget();

    register_listeners(&window, &canvas)?;

    // Render loop
    let f = Rc::new(RefCell::new(None));
    let g = f.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        with_viewer(|viewer| viewer.frame(js_sys::Date::now()));
        if let Some(callback) = f.borrow().as_ref() {
            request_animation_frame(callback);
        }
    }) as Box<dyn FnMut()>));

    if let Some(callback) = g.borrow().as_ref() {
        request_animation_frame(callback);
    }

    log::info!("orrery: initialized");
    Ok(())
}

fn register_listeners(window: &Window, canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    let on_move = Closure::wrap(Box::new(move |event: MouseEvent| {
        let result = with_viewer(|viewer| {
            viewer.pointer_move(event.client_x() as f32, event.client_y() as f32)
        });
        if let Some(Err(err)) = result {
            log::error!("hover update failed: {:?}", err);
        }
    }) as Box<dyn FnMut(_)>);
    window.add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;
    on_move.forget();

    let on_down = Closure::wrap(Box::new(move |event: MouseEvent| {
        with_viewer(|viewer| {
            viewer.sim.scene_mut().controls.pointer_down(event.client_x() as f32, event.client_y() as f32)
        });
    }) as Box<dyn FnMut(_)>);
    canvas.add_event_listener_with_callback("mousedown", on_down.as_ref().unchecked_ref())?;
    on_down.forget();

    let on_up = Closure::wrap(Box::new(move |_event: MouseEvent| {
        with_viewer(|viewer| viewer.sim.scene_mut().controls.pointer_up());
    }) as Box<dyn FnMut(_)>);
    window.add_event_listener_with_callback("mouseup", on_up.as_ref().unchecked_ref())?;
    on_up.forget();

    let on_wheel = Closure::wrap(Box::new(move |event: WheelEvent| {
        event.prevent_default();
        with_viewer(|viewer| viewer.sim.scene_mut().controls.wheel(event.delta_y() as f32));
    }) as Box<dyn FnMut(_)>);
    canvas.add_event_listener_with_callback("wheel", on_wheel.as_ref().unchecked_ref())?;
    on_wheel.forget();

    let on_resize = Closure::wrap(Box::new(move || {
        if let Some(window) = web_sys::window() {
            let (width, height) = window_size(&window);
            with_viewer(|viewer| viewer.resize(width, height));
        }
    }) as Box<dyn FnMut()>);
    window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
    on_resize.forget();

    Ok(())
}

fn request_animation_frame(f: &Closure<dyn FnMut()>) {
    if let Some(window) = web_sys::window() {
        if let Err(err) = window.request_animation_frame(f.as_ref().unchecked_ref()) {
            log::error!("requestAnimationFrame failed: {:?}", err);
        }
    }
}

fn window_size(window: &Window) -> (f32, f32) {
    let dimension = |value: Result<JsValue, JsValue>| {
        value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
    };
    (dimension(window.inner_width()), dimension(window.inner_height()))
}

async fn load_config(window: &Window) -> ViewerConfig {
    match fetch_text(window, CONFIG_PATH).await.and_then(|text| ViewerConfig::from_json(&text)) {
        Ok(config) => {
            log::info!("config loaded from {}", CONFIG_PATH);
            config
        }
        Err(err) => {
            log::warn!("using default config: {}", err);
            ViewerConfig::default()
        }
    }
}

async fn fetch(window: &Window, path: &str) -> error::Result<Response> {
    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let request = Request::new_with_str_and_init(path, &opts)?;
    let resp: Response = JsFuture::from(window.fetch_with_request(&request)).await?.dyn_into()?;
    if !resp.ok() {
        return Err(ViewerError::Js(format!("{} returned {}", path, resp.status())));
    }
    Ok(resp)
}

async fn fetch_text(window: &Window, path: &str) -> error::Result<String> {
    let resp = fetch(window, path).await?;
    JsFuture::from(resp.text()?)
        .await?
        .as_string()
        .ok_or_else(|| ViewerError::Js(format!("{} is not text", path)))
}

async fn fetch_bytes(window: &Window, path: &str) -> error::Result<Vec<u8>> {
    let resp = fetch(window, path).await?;
    let buffer = JsFuture::from(resp.array_buffer()?).await?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

/// Cuts the camera to the named planet. Unknown names are ignored.
#[wasm_bindgen(js_name = teleportToPlanet)]
pub fn teleport_to_planet(name: &str) {
    with_viewer(|viewer| viewer.sim.teleport(name));
}

/// Speeds up or slows down simulated time. 1.0 follows the wall clock.
#[wasm_bindgen]
pub fn set_time_scale(scale: f64) {
    with_viewer(|viewer| viewer.clock.set_time_scale(scale));
}
