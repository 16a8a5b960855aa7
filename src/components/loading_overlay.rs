use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use yew::prelude::*;

use crate::config::LoaderStyle;
use crate::state::{Choreographer, LoaderSnapshot, Phase};
use crate::util::FrameLoop;

#[derive(Properties, PartialEq, Clone)]
pub struct LoadingOverlayProps {
    pub choreographer: Choreographer,
}

/// The single loading indicator. Stays mounted; renders nothing while hidden.
#[function_component(LoadingOverlay)]
pub fn loading_overlay(props: &LoadingOverlayProps) -> Html {
    let snapshot = use_state(|| props.choreographer.snapshot());

    // Register with the choreographer for as long as we are mounted
    {
        let choreographer = props.choreographer.clone();
        let setter = snapshot.setter();
        use_effect_with(choreographer, move |choreographer| {
            choreographer.attach(Callback::from(move |s: LoaderSnapshot| setter.set(s)));
            let choreographer = choreographer.clone();
            move || choreographer.detach()
        });
    }
    // Percent readout: one frame loop per animating session
    {
        let choreographer = props.choreographer.clone();
        let animating = snapshot.phase == Phase::Animating;
        use_effect_with((snapshot.session, animating), move |(_, animating)| {
            let frames = if *animating {
                let choreographer = choreographer.clone();
                FrameLoop::start(move || choreographer.tick())
            } else {
                None
            };
            move || drop(frames)
        });
    }
    // Escape dismisses while visible
    {
        let choreographer = props.choreographer.clone();
        use_effect_with(snapshot.visible(), move |visible| {
            let window = web_sys::window();
            let listener = match (&window, *visible) {
                (Some(win), true) => {
                    let cb = Closure::wrap(Box::new(move |e: web_sys::KeyboardEvent| {
                        if e.key() == "Escape" {
                            choreographer.dismiss();
                        }
                    }) as Box<dyn FnMut(_)>);
                    win.add_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref())
                        .ok()
                        .map(|_| cb)
                }
                _ => None,
            };
            move || {
                if let (Some(win), Some(cb)) = (window, listener) {
                    let _ = win.remove_event_listener_with_callback(
                        "keydown",
                        cb.as_ref().unchecked_ref(),
                    );
                }
            }
        });
    }

    if !snapshot.visible() {
        return html! {};
    }
    let percent = snapshot.percent.min(100);
    let finishing = snapshot.phase == Phase::Settling;
    let label = format!("{}%", percent);
    let indicator = match snapshot.style {
        LoaderStyle::FillBar => html! {
            <div style="width:260px; height:14px; background:#1c2128; border:1px solid #30363d; border-radius:7px; overflow:hidden;">
                <div style={format!("width:{}%; height:100%; background:#0ea5a4;", percent)}></div>
            </div>
        },
        LoaderStyle::Inline => html! {
            <span style="display:inline-block; width:14px; height:14px; border:2px solid #0ea5a4; border-right-color:transparent; border-radius:50%; animation:spin 0.8s linear infinite;"></span>
        },
        LoaderStyle::Jerrycan => html! {
            <div class={classes!("jerrycan", finishing.then_some("finish"))}
                style="position:relative; width:72px; height:96px; border:3px solid #e5e7eb; border-radius:10px 10px 8px 8px; overflow:hidden; background:#111827;">
                <div class="water"
                    style={format!("position:absolute; left:0; right:0; bottom:0; height:{}%; background:#38bdf8;", percent)}></div>
            </div>
        },
    };
    let inline = snapshot.style == LoaderStyle::Inline;
    html! {
        <div id="loadingOverlay" role="status" aria-live="polite"
            style={if inline {
                "position:fixed; right:16px; bottom:16px; background:rgba(22,27,34,0.95); border:1px solid #30363d; border-radius:8px; padding:8px 12px; display:flex; align-items:center; gap:10px; z-index:100;"
            } else {
                "position:fixed; inset:0; background:rgba(0,0,0,0.7); display:flex; flex-direction:column; align-items:center; justify-content:center; gap:14px; z-index:100;"
            }}>
            { indicator }
            <div class="loader-text" style="font-size:15px;">{ snapshot.message.clone() }</div>
            <div id="loaderPercent" style="font-variant-numeric:tabular-nums; font-weight:600;">{ label }</div>
            { if inline { html!{} } else { html!{ <div style="font-size:11px; opacity:0.6;">{"Press Esc to skip"}</div> } } }
        </div>
    }
}
