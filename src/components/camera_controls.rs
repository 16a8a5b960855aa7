use yew::prelude::*;

/// On-screen movement pad for the avatar (the camera follows it).
#[derive(Properties, PartialEq, Clone)]
pub struct CameraControlsProps {
    pub on_move: Callback<(f64, f64)>,
    pub step: f64,
    pub on_center: Callback<()>,
}

#[function_component(CameraControls)]
pub fn camera_controls(props: &CameraControlsProps) -> Html {
    let mv = |dx: f64, dy: f64| {
        let cb = props.on_move.clone();
        let step = props.step;
        Callback::from(move |_| cb.emit((dx * step, dy * step)))
    };
    let cc = {
        let cb = props.on_center.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {<div style="background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; display:flex; gap:6px; align-items:center;">
        <button onclick={mv(-1.0, 0.0)}> {"←"} </button>
        <button onclick={mv(0.0, -1.0)}> {"↑"} </button>
        <button onclick={mv(0.0, 1.0)}> {"↓"} </button>
        <button onclick={mv(1.0, 0.0)}> {"→"} </button>
        <span style="width:8px;"></span>
        <button onclick={cc}> {"Center"} </button>
    </div>}
}
