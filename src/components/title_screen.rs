use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct TitleScreenProps {
    pub on_start: Callback<()>,
    pub on_load: Callback<()>,
    pub on_show_help: Callback<()>,
}

#[function_component]
pub fn TitleScreen(props: &TitleScreenProps) -> Html {
    let start_cb = {
        let cb = props.on_start.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let load_cb = {
        let cb = props.on_load.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let help_cb = {
        let cb = props.on_show_help.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {
        <div id="screen-1" style="display:flex; flex-direction:column; align-items:center; justify-content:center; gap:16px; min-height:100vh; text-align:center;">
            <h1 style="margin:0; font-size:34px; color:#38bdf8;">{"Charity Well"}</h1>
            <p style="margin:0; max-width:420px; opacity:0.85;">{"Buy buckets, pumps and pipes, place them around the village and deliver clean water."}</p>
            <div style="display:flex; gap:12px;">
                <button id="startBtn" onclick={start_cb}>{"Start"}</button>
                <button id="loadBtn" onclick={load_cb}>{"Load"}</button>
                <button id="helpBtn" onclick={help_cb}>{"Help"}</button>
            </div>
        </div>
    }
}
