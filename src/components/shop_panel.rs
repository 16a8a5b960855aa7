use crate::model::ShopItem;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ShopPanelProps {
    pub items: Vec<ShopItem>,
    pub selected: Option<String>,
    pub on_select: Callback<ShopItem>,
}

#[function_component]
pub fn ShopPanel(props: &ShopPanelProps) -> Html {
    html! {
        <div id="shopList" style="background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:10px; display:flex; flex-direction:column; gap:8px;">
            <h3 style="margin:0; font-size:15px;">{"Shop"}</h3>
            { for props.items.iter().map(|item| {
                let selected = props.selected.as_deref() == Some(item.id.as_str());
                let select_cb = {
                    let cb = props.on_select.clone();
                    let item = item.clone();
                    Callback::from(move |_| cb.emit(item.clone()))
                };
                let shadow = if selected { "box-shadow:0 0 0 2px rgba(14,165,164,0.6);" } else { "" };
                html! {
                    <div class="shop-item" key={item.id.clone()}
                        style={format!("display:flex; align-items:center; justify-content:space-between; gap:8px; padding:6px 8px; border:1px solid #30363d; border-radius:6px; {}", shadow)}>
                        <div class="meta">
                            <strong>{ item.name.clone() }</strong>
                            <div style="font-size:0.85rem; color:#6b7280;">{ format!("${}", item.cost) }</div>
                            { if item.effect.water > 0 {
                                html!{ <div style="font-size:0.75rem; color:#38bdf8;">{ format!("+{} L per delivery", item.effect.water) }</div> }
                            } else { html!{} } }
                        </div>
                        <button class="btn" onclick={select_cb}>{ if selected { "Selected" } else { "Select" } }</button>
                    </div>
                }
            }) }
        </div>
    }
}
