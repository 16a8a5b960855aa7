mod components;
mod config;
mod model;
mod state;
mod storage;
mod util;

use components::App;

fn main() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
    yew::Renderer::<App>::new().render();
}
