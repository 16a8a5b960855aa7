use super::{
    game_view::GameView, help_overlay::HelpOverlay, loading_overlay::LoadingOverlay,
    settings_modal::SettingsModal, title_screen::TitleScreen,
};
use crate::config::{LoaderStyle, Settings};
use crate::model::{GameAction, GameState};
use crate::state::{Choreographer, Runtime};
use crate::storage::GameStore;
use futures_util::future;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::info;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(PartialEq, Clone, Copy)]
enum Screen {
    Title,
    Game,
}

#[function_component(App)]
pub fn app() -> Html {
    let config = use_state(|| GameStore::browser().load_config());
    let settings = use_state(|| GameStore::browser().load_settings());
    let choreographer = {
        let loader_cfg = config.loader;
        let style = settings.loader_style;
        use_memo((), move |_| Choreographer::new(loader_cfg, style, Runtime::browser()))
    };
    let screen = use_state(|| Screen::Title);
    let show_help = use_state(|| false);
    let show_settings = use_state(|| false);
    let game = use_reducer(GameState::default);

    // Load the saved record; resume straight into the game when items were placed
    {
        let game = game.clone();
        let screen = screen.clone();
        let choreographer = (*choreographer).clone();
        use_effect_with((), move |_| {
            let saved = GameStore::browser().load_or_default();
            let resume = !saved.placed_items.is_empty();
            game.dispatch(GameAction::Replace(saved));
            if resume {
                let done = choreographer.begin("Restoring saved game...", None, None::<future::Ready<()>>);
                spawn_local(async move {
                    if done.await.should_proceed() {
                        info!("restored saved game");
                        screen.set(Screen::Game);
                    }
                });
            }
            || ()
        });
    }
    // Persist every revision of the record
    {
        let game = game.clone();
        use_effect_with(game.revision, move |revision| {
            if *revision > 0 {
                GameStore::browser().save_logged(&game);
            }
            || ()
        });
    }

    let on_start = {
        let game = game.clone();
        let screen = screen.clone();
        Callback::from(move |_| {
            screen.set(Screen::Game);
            game.dispatch(GameAction::SetStatus(
                "Mission started. Select an item from the shop.".into(),
            ));
        })
    };
    let on_load = {
        let game = game.clone();
        let screen = screen.clone();
        let choreographer = (*choreographer).clone();
        Callback::from(move |_| {
            let loaded: Rc<RefCell<Option<GameState>>> = Rc::new(RefCell::new(None));
            let task = {
                let loaded = loaded.clone();
                async move {
                    *loaded.borrow_mut() = Some(GameStore::browser().load_or_default());
                }
            };
            let done = choreographer.begin("Loading saved game...", None, Some(task));
            let game = game.clone();
            let screen = screen.clone();
            spawn_local(async move {
                if !done.await.should_proceed() {
                    return;
                }
                let state = loaded
                    .borrow_mut()
                    .take()
                    .unwrap_or_else(|| GameStore::browser().load_or_default());
                game.dispatch(GameAction::Replace(state));
                game.dispatch(GameAction::SetStatus("Loaded saved game state.".into()));
                screen.set(Screen::Game);
            });
        })
    };
    let on_back = {
        let game = game.clone();
        let screen = screen.clone();
        Callback::from(move |_| {
            screen.set(Screen::Title);
            game.dispatch(GameAction::SetStatus("Returned to the main menu.".into()));
        })
    };
    let open_help = {
        let show_help = show_help.clone();
        Callback::from(move |_| show_help.set(true))
    };
    let close_help = {
        let show_help = show_help.clone();
        Callback::from(move |_| show_help.set(false))
    };
    let open_settings = {
        let show_settings = show_settings.clone();
        Callback::from(move |_| show_settings.set(true))
    };
    let close_settings = {
        let show_settings = show_settings.clone();
        Callback::from(move |_| show_settings.set(false))
    };
    let on_loader_style = {
        let settings = settings.clone();
        let choreographer = (*choreographer).clone();
        Callback::from(move |style: LoaderStyle| {
            let next = Settings { loader_style: style };
            GameStore::browser().save_settings(&next);
            choreographer.set_style(style);
            settings.set(next);
        })
    };
    let on_preview_loader = {
        let choreographer = (*choreographer).clone();
        Callback::from(move |_| {
            let done = choreographer.begin("Filling the jerrycan...", Some(1200), None::<future::Ready<()>>);
            spawn_local(async move {
                let _ = done.await;
            });
        })
    };
    let on_hard_reset = {
        let game = game.clone();
        let screen = screen.clone();
        let settings = settings.clone();
        let show_settings = show_settings.clone();
        let choreographer = (*choreographer).clone();
        Callback::from(move |_| {
            GameStore::browser().clear();
            choreographer.abandon();
            choreographer.set_style(LoaderStyle::default());
            settings.set(Settings::default());
            game.dispatch(GameAction::Reset);
            show_settings.set(false);
            screen.set(Screen::Title);
            info!("progress wiped");
        })
    };

    let content = match *screen {
        Screen::Title => html! { <TitleScreen on_start={on_start} on_load={on_load} on_show_help={open_help.clone()} /> },
        Screen::Game => html! { <GameView
            game={game.clone()}
            config={*config}
            on_back={on_back}
            on_show_help={open_help.clone()}
            on_open_settings={open_settings}
        /> },
    };

    html! {
        <>
            { content }
            <HelpOverlay show={*show_help} on_close={close_help} />
            <SettingsModal
                show={*show_settings}
                on_close={close_settings}
                loader_style={settings.loader_style}
                {on_loader_style}
                {on_preview_loader}
                {on_hard_reset}
            />
            <LoadingOverlay choreographer={(*choreographer).clone()} />
        </>
    }
}
