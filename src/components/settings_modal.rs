use crate::config::LoaderStyle;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct SettingsModalProps {
    pub show: bool,
    pub on_close: Callback<()>,
    pub loader_style: LoaderStyle,
    pub on_loader_style: Callback<LoaderStyle>,
    pub on_preview_loader: Callback<()>,
    pub on_hard_reset: Callback<()>,
}

#[function_component]
pub fn SettingsModal(props: &SettingsModalProps) -> Html {
    if !props.show {
        return html! {};
    }

    let close_cb = {
        let cb = props.on_close.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let preview_cb = {
        let cb = props.on_preview_loader.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let hard_reset_cb = {
        let cb = props.on_hard_reset.clone();
        Callback::from(move |_| {
            if let Some(win) = web_sys::window() {
                if win
                    .confirm_with_message(
                        "This will WIPE all progress (funds, placed items, achievements, settings) and start fresh. Are you sure?",
                    )
                    .unwrap_or(false)
                {
                    cb.emit(());
                }
            } else {
                cb.emit(());
            }
        })
    };

    html! {<div style="position:fixed; inset:0; display:flex; align-items:center; justify-content:center; background:rgba(0,0,0,0.55); z-index:50;">
        <div style="background:#161b22; border:1px solid #30363d; border-radius:12px; padding:16px 20px; min-width:340px; max-width:480px; display:flex; flex-direction:column; gap:14px;">
            <div style="display:flex; justify-content:space-between; align-items:center;">
                <h3 style="margin:0; font-size:18px;">{"Settings"}</h3>
                <button onclick={close_cb.clone()} style="padding:4px 8px;">{"Close"}</button>
            </div>
            <div style="display:flex; flex-direction:column; gap:10px;">
                <span style="font-weight:500;">{"Loading indicator"}</span>
                { for LoaderStyle::ALL.iter().map(|style| {
                    let style = *style;
                    let pick = {
                        let cb = props.on_loader_style.clone();
                        Callback::from(move |_| cb.emit(style))
                    };
                    html! {
                        <label style="display:flex; align-items:center; gap:8px; cursor:pointer;">
                            <input type="radio" name="loader-style" checked={props.loader_style == style} onclick={pick} />
                            <span>{ style.label() }</span>
                        </label>
                    }
                }) }
                <button onclick={preview_cb} style="align-self:flex-start;">{"Preview"}</button>
            </div>
            <div style="display:flex; gap:8px; flex-wrap:wrap;">
                <button onclick={hard_reset_cb} style="background:#f85149; border:1px solid #b62324; color:#fff; flex:1;">{"Hard Reset (Wipe Progress)"}</button>
                <button onclick={close_cb} style="flex:0 0 auto;">{"Done"}</button>
            </div>
            <div style="font-size:11px; line-height:1.4; opacity:0.7;">{"Hard Reset removes the saved game and settings from this browser."}</div>
        </div>
    </div>}
}
