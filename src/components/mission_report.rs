use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct MissionReportProps {
    /// Litres delivered during the finished mission; `None` hides the report.
    pub delivered: Option<u64>,
    pub total_delivered: u64,
    pub on_close: Callback<()>,
    pub on_restart: Callback<()>,
}

#[function_component]
pub fn MissionReport(props: &MissionReportProps) -> Html {
    let Some(delivered) = props.delivered else {
        return html! {};
    };
    let close_btn = {
        let cb = props.on_close.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let restart_btn = {
        let cb = props.on_restart.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {
        <div style="position:absolute; top:50%; left:50%; transform:translate(-50%, -50%); background:rgba(0,0,0,0.85); border:2px solid #0ea5a4; padding:24px 32px; border-radius:12px; text-align:center; min-width:320px; z-index:40;">
            <h2 style="margin:0 0 12px 0; color:#0ea5a4;">{"Mission Complete"}</h2>
            <p style="margin:4px 0;">{ format!("Water delivered this mission: {} L", delivered) }</p>
            <p style="margin:4px 0;">{ format!("Total delivered: {} L", props.total_delivered) }</p>
            <div style="margin-top:16px; display:flex; gap:12px; justify-content:center;">
                <button onclick={restart_btn}>{"New Mission"}</button>
                <button onclick={close_btn}>{"Close"}</button>
            </div>
        </div>
    }
}
