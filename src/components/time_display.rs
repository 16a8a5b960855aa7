use crate::util::format_time;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct TimeDisplayProps {
    pub mission_active: bool,
    pub time_left: u64,
    pub on_start_mission: Callback<()>,
}

#[function_component(TimeDisplay)]
pub fn time_display(props: &TimeDisplayProps) -> Html {
    if !props.mission_active {
        let start_cb = {
            let cb = props.on_start_mission.clone();
            Callback::from(move |_| cb.emit(()))
        };
        return html! {<div style="display:flex; flex-direction:column; align-items:center; gap:6px;">
            <button onclick={start_cb} style="padding:4px 10px; font-size:12px;">{"Start Mission"}</button>
        </div>};
    }
    html! {<div style="display:flex; flex-direction:column; align-items:center; gap:6px;">
        <div style="font-size:12px; opacity:0.7;">{"Mission time left"}</div>
        <div style="font-size:20px; font-weight:600;">{ format_time(props.time_left) }</div>
    </div>}
}
