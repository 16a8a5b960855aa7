use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use yew::prelude::*;

use crate::config::Config;
use crate::model::{GameAction, GameState, ShopItem, shop_catalogue};

use super::{
    camera_controls::CameraControls, controls_panel::ControlsPanel,
    inventory_panel::InventoryPanel, map_view::MapView, mission_report::MissionReport,
    shop_panel::ShopPanel, stats_panel::StatsPanel, time_display::TimeDisplay,
};

#[derive(Properties, PartialEq, Clone)]
pub struct GameViewProps {
    pub game: UseReducerHandle<GameState>,
    pub config: Config,
    pub on_back: Callback<()>,
    pub on_show_help: Callback<()>,
    pub on_open_settings: Callback<()>,
}

fn move_action(config: &Config, dx: f64, dy: f64) -> GameAction {
    GameAction::MovePlayer {
        dx,
        dy,
        max_x: config.map.world_width(),
        max_y: config.map.world_height(),
    }
}

/// Arrow keys and WASD to a unit direction.
fn key_direction(key: &str) -> Option<(f64, f64)> {
    match key {
        "ArrowLeft" | "a" | "A" => Some((-1.0, 0.0)),
        "ArrowRight" | "d" | "D" => Some((1.0, 0.0)),
        "ArrowUp" | "w" | "W" => Some((0.0, -1.0)),
        "ArrowDown" | "s" | "S" => Some((0.0, 1.0)),
        _ => None,
    }
}

#[function_component(GameView)]
pub fn game_view(props: &GameViewProps) -> Html {
    let shop = use_memo((), |_| shop_catalogue());
    let recenter = use_state(|| 0_u32);
    let game = props.game.clone();
    let config = props.config;

    // Mount effect: movement keys + mission clock
    {
        let game = game.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window();
            let keydown_cb = {
                let game = game.clone();
                Closure::wrap(Box::new(move |e: web_sys::KeyboardEvent| {
                    if let Some((dx, dy)) = key_direction(&e.key()) {
                        e.prevent_default();
                        let step = config.map.player_step_px;
                        game.dispatch(move_action(&config, dx * step, dy * step));
                    }
                }) as Box<dyn FnMut(_)>)
            };
            let second_tick = Closure::wrap(Box::new(move || {
                game.dispatch(GameAction::TickSecond);
            }) as Box<dyn FnMut()>);
            let mut second_tick_id = None;
            if let Some(win) = &window {
                win.add_event_listener_with_callback("keydown", keydown_cb.as_ref().unchecked_ref())
                    .ok();
                second_tick_id = win
                    .set_interval_with_callback_and_timeout_and_arguments_0(
                        second_tick.as_ref().unchecked_ref(),
                        1000,
                    )
                    .ok();
            }
            move || {
                if let Some(win) = window {
                    let _ = win.remove_event_listener_with_callback(
                        "keydown",
                        keydown_cb.as_ref().unchecked_ref(),
                    );
                    if let Some(id) = second_tick_id {
                        win.clear_interval_with_handle(id);
                    }
                }
                let _keep_alive = (&keydown_cb, &second_tick);
            }
        });
    }

    let on_select = {
        let game = game.clone();
        Callback::from(move |item: ShopItem| game.dispatch(GameAction::SelectTool(item)))
    };
    let on_tile_click = {
        let game = game.clone();
        Callback::from(move |index: usize| game.dispatch(GameAction::ClickTile { index }))
    };
    let on_deliver = {
        let game = game.clone();
        Callback::from(move |_| game.dispatch(GameAction::DeliverWater))
    };
    let on_start_mission = {
        let game = game.clone();
        Callback::from(move |_| game.dispatch(GameAction::StartMission))
    };
    let on_close_report = {
        let game = game.clone();
        Callback::from(move |_| game.dispatch(GameAction::DismissReport))
    };
    let on_move = {
        let game = game.clone();
        Callback::from(move |(dx, dy): (f64, f64)| game.dispatch(move_action(&config, dx, dy)))
    };
    let on_center = {
        let recenter = recenter.clone();
        Callback::from(move |_| recenter.set(recenter.wrapping_add(1)))
    };

    html! {
        <div id="screen-2" style="display:flex; flex-wrap:wrap; gap:14px; padding:14px; align-items:flex-start; justify-content:center;">
            <div style="display:flex; flex-direction:column; gap:12px;">
                <StatsPanel funds={game.funds} water_delivered={game.water_delivered} achievements={game.achievements.len()} />
                <ShopPanel items={(*shop).clone()} selected={game.selected_tool.as_ref().map(|t| t.id.clone())} {on_select} />
                <InventoryPanel placed={game.placed_items.clone()} />
            </div>
            <div style="display:flex; flex-direction:column; gap:10px; align-items:center; flex:1; min-width:300px; max-width:520px;">
                <TimeDisplay mission_active={game.mission_active} time_left={game.mission_time_left} on_start_mission={on_start_mission.clone()} />
                <MapView config={config} placed={game.placed_items.clone()} player={game.player} recenter={*recenter} {on_tile_click} />
                <CameraControls {on_move} step={config.map.player_step_px} {on_center} />
            </div>
            <ControlsPanel
                delivery_yield={game.delivery_yield()}
                status={game.status.clone()}
                {on_deliver}
                on_back={props.on_back.clone()}
                on_show_help={props.on_show_help.clone()}
                on_open_settings={props.on_open_settings.clone()}
            />
            <MissionReport
                delivered={game.mission_report}
                total_delivered={game.water_delivered}
                on_close={on_close_report}
                on_restart={on_start_mission}
            />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_keys_map_to_directions() {
        assert_eq!(key_direction("ArrowUp"), Some((0.0, -1.0)));
        assert_eq!(key_direction("d"), Some((1.0, 0.0)));
        assert_eq!(key_direction("Escape"), None);
    }

    #[test]
    fn move_action_is_bounded_by_world() {
        let cfg = Config::default();
        assert_eq!(
            move_action(&cfg, 24.0, 0.0),
            GameAction::MovePlayer { dx: 24.0, dy: 0.0, max_x: 960.0, max_y: 640.0 }
        );
    }
}
