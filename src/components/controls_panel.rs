use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ControlsPanelProps {
    pub delivery_yield: u64,
    pub status: String,
    pub on_deliver: Callback<()>,
    pub on_back: Callback<()>,
    pub on_show_help: Callback<()>,
    pub on_open_settings: Callback<()>,
}

#[function_component]
pub fn ControlsPanel(props: &ControlsPanelProps) -> Html {
    let deliver_cb = {
        let cb = props.on_deliver.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let back_cb = {
        let cb = props.on_back.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let help_cb = {
        let cb = props.on_show_help.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let settings_cb = {
        let cb = props.on_open_settings.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {<div style="background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; min-width:200px; display:flex; flex-direction:column; gap:6px;">
        <button id="deliverWater" onclick={deliver_cb}>{ format!("Deliver Water (+{} L)", props.delivery_yield) }</button>
        <button onclick={settings_cb}>{"Settings"}</button>
        <button onclick={help_cb}>{"Help"}</button>
        <button id="backBtn" onclick={back_cb}>{"Main Menu"}</button>
        <div style="font-size:11px; opacity:0.7;">{"Move: arrows / WASD"}</div>
        { if !props.status.is_empty() { html!{ <div id="statusText" style="font-size:12px; line-height:1.3; background:#1c2128; border:1px solid #30363d; padding:4px 6px; border-radius:6px;">{ props.status.clone() }</div> } } else { html!{} } }
    </div>}
}
