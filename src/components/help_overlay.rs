use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct HelpOverlayProps {
    pub show: bool,
    pub on_close: Callback<()>,
}

#[function_component(HelpOverlay)]
pub fn help_overlay(props: &HelpOverlayProps) -> Html {
    if !props.show {
        return html! {};
    }
    let close_cb = props.on_close.clone();
    let close_btn = Callback::from(move |_| close_cb.emit(()));
    html! {
        <div style="position:fixed; top:50%; left:50%; transform:translate(-50%, -50%); background:rgba(0,0,0,0.87); border:2px solid #30363d; padding:28px 36px; border-radius:14px; max-width:520px; width:90%; box-shadow:0 0 0 1px #1a1f24, 0 6px 18px rgba(0,0,0,0.6); font-size:14px; line-height:1.4; z-index:60;">
            <h2 style="margin:0 0 12px 0; font-size:22px; color:#38bdf8; text-align:center;">{"How to help"}</h2>
            <ul style="margin:0 0 12px 18px; padding:0; list-style:decimal; display:flex; flex-direction:column; gap:4px;">
                <li>{"Select an item from the shop."}</li>
                <li>{"Click a plot on the map to place it (click again to remove it for a partial refund)."}</li>
                <li>{"Press Deliver Water to deliver resources and earn money."}</li>
                <li>{"Walk around the village with the arrow keys or WASD; the view follows you."}</li>
                <li>{"Start a mission to see how much water you can deliver in a minute."}</li>
            </ul>
            <div style="display:flex; gap:12px; justify-content:center; margin-top:8px;">
                <button onclick={close_btn}>{"Close"}</button>
            </div>
            <div style="margin-top:12px; font-size:11px; opacity:0.6; text-align:center;">{"Tip: a Hand Pump delivers four times as much as a Bucket."}</div>
        </div>
    }
}
