use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::HtmlElement;
use yew::prelude::*;

use crate::config::Config;
use crate::model::{PlacedItem, Player};
use crate::state::Camera;
use crate::util::{FrameLoop, now_ms};

const AVATAR_PX: f64 = 24.0;

#[derive(Properties, PartialEq, Clone)]
pub struct MapViewProps {
    pub config: Config,
    pub placed: Vec<PlacedItem>,
    pub player: Player,
    /// Bumped to re-centre the camera on the avatar.
    pub recenter: u32,
    pub on_tile_click: Callback<usize>,
}

/// Plot grid seen through a viewport that pans after the avatar.
#[function_component(MapView)]
pub fn map_view(props: &MapViewProps) -> Html {
    let viewport_ref = use_node_ref();
    let map = props.config.map;
    let camera = {
        let camera_cfg = props.config.camera;
        use_mut_ref(move || Camera::new(&camera_cfg, map.world_width(), map.world_height()))
    };
    let offset = use_state(|| (0.0_f64, 0.0_f64));

    // Mount: measure viewport, follow resizes, run the pan loop
    {
        let camera = camera.clone();
        let viewport_ref = viewport_ref.clone();
        let setter = offset.setter();
        use_effect_with((), move |_| {
            let measure = {
                let camera = camera.clone();
                let setter = setter.clone();
                move || {
                    let Some(el) = viewport_ref.cast::<HtmlElement>() else {
                        return;
                    };
                    let w = el.client_width() as f64;
                    let h = el.client_height() as f64;
                    if w > 0.0 && h > 0.0 {
                        let mut cam = camera.borrow_mut();
                        cam.set_viewport(w, h);
                        setter.set((cam.offset_x, cam.offset_y));
                    }
                }
            };
            measure();
            let window = web_sys::window();
            let resize_cb = Closure::wrap(Box::new(measure) as Box<dyn FnMut()>);
            if let Some(win) = &window {
                let _ = win.add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref());
            }
            let frames = FrameLoop::start(move || {
                let mut cam = camera.borrow_mut();
                if cam.is_panning() && cam.update(now_ms()) {
                    setter.set((cam.offset_x, cam.offset_y));
                }
            });
            move || {
                if let Some(win) = window {
                    let _ = win.remove_event_listener_with_callback(
                        "resize",
                        resize_cb.as_ref().unchecked_ref(),
                    );
                }
                drop(frames);
            }
        });
    }
    // Follow the avatar; the first placement snaps instead of panning
    {
        let camera = camera.clone();
        let setter = offset.setter();
        use_effect_with((props.player, props.recenter), move |(player, _)| {
            let mut cam = camera.borrow_mut();
            if cam.initialized {
                cam.center_on(player.x, player.y, now_ms());
            } else {
                cam.snap_to(player.x, player.y);
                setter.set((cam.offset_x, cam.offset_y));
            }
            || ()
        });
    }

    let (ox, oy) = *offset;
    let (bg_x, bg_y) = camera.borrow().parallax();
    let tile = map.tile_px;
    let tiles = (0..map.total_tiles()).map(|i| {
        let col = (i as u32 % map.cols) as f64;
        let row = (i as u32 / map.cols) as f64;
        let placed = props.placed.iter().find(|p| p.index == i);
        let onclick = {
            let cb = props.on_tile_click.clone();
            Callback::from(move |_| cb.emit(i))
        };
        let fill = if placed.is_some() { "rgba(14,165,164,0.25)" } else { "rgba(22,27,34,0.55)" };
        html! {
            <div class={classes!("map-tile", placed.is_some().then_some("placed"))} key={i} data-index={i.to_string()} {onclick}
                style={format!("position:absolute; left:{}px; top:{}px; width:{}px; height:{}px; box-sizing:border-box; border:1px solid #2f3641; background:{}; cursor:pointer; padding:6px; font-size:12px;", col * tile, row * tile, tile, tile, fill)}>
                <div class="tile-label" style="opacity:0.7;">{ format!("Plot {}", i + 1) }</div>
                <div class="tile-item" style="margin-top:6px; font-weight:600;">{ placed.map(|p| p.item.name.clone()).unwrap_or_default() }</div>
            </div>
        }
    });

    html! {
        <div id="mapGrid" ref={viewport_ref}
            style={format!("position:relative; overflow:hidden; width:100%; max-width:{}px; height:{}px; border:1px solid #30363d; border-radius:8px; background-color:#0e1116; background-image:radial-gradient(#1f3b2d 2px, transparent 2px); background-size:32px 32px; background-position:{:.1}px {:.1}px;",
                props.config.camera.viewport_width, props.config.camera.viewport_height, bg_x, bg_y)}>
            <div style={format!("position:absolute; left:0; top:0; width:{}px; height:{}px; transform:translate({:.1}px, {:.1}px);", map.world_width(), map.world_height(), -ox, -oy)}>
                { for tiles }
                <div class="player"
                    style={format!("position:absolute; left:{}px; top:{}px; width:{}px; height:{}px; border-radius:50%; background:#f59e0b; border:2px solid #fff; pointer-events:none;", props.player.x - AVATAR_PX / 2.0, props.player.y - AVATAR_PX / 2.0, AVATAR_PX, AVATAR_PX)}>
                </div>
            </div>
        </div>
    }
}
