use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct StatsPanelProps {
    pub funds: u64,
    pub water_delivered: u64,
    pub achievements: usize,
}

#[function_component]
pub fn StatsPanel(props: &StatsPanelProps) -> Html {
    let row_style = "display:flex; align-items:center; gap:8px;"; // icon | label | value
    let icon_style = "width:20px; text-align:center; flex-shrink:0;";
    let label_style = "flex:1; font-weight:500;";
    let value_style =
        "min-width:70px; text-align:right; font-variant-numeric:tabular-nums; font-weight:600;";
    html! {
        <div style="background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:10px 14px; min-width:230px; display:flex; flex-direction:column; gap:10px; font-size:14px;">
            <div style={row_style}>
                <span style={format!("{} color:#d4af37;", icon_style)}>{"$"}</span>
                <span style={format!("{} color:#d4af37;", label_style)}>{"Funds"}</span>
                <span id="funds" style={format!("{} color:#d4af37;", value_style)}>{ props.funds }</span>
            </div>
            <div style={row_style}>
                <span style={format!("{} color:#38bdf8;", icon_style)}>{"💧"}</span>
                <span style={format!("{} color:#38bdf8;", label_style)}>{"Water delivered (L)"}</span>
                <span id="waterDelivered" style={format!("{} color:#38bdf8;", value_style)}>{ props.water_delivered }</span>
            </div>
            <div style={row_style}>
                <span style={format!("{} color:#a5d6a7;", icon_style)}>{"★"}</span>
                <span style={format!("{} color:#a5d6a7;", label_style)}>{"Achievements"}</span>
                <span style={format!("{} color:#a5d6a7;", value_style)}>{ props.achievements }</span>
            </div>
        </div>
    }
}
