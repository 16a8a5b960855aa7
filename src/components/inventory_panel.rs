use crate::model::PlacedItem;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct InventoryPanelProps {
    pub placed: Vec<PlacedItem>,
}

#[function_component]
pub fn InventoryPanel(props: &InventoryPanelProps) -> Html {
    let mut placed = props.placed.clone();
    placed.sort_by_key(|p| p.index);
    html! {
        <div style="background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:10px;">
            <h3 style="margin:0 0 6px 0; font-size:15px;">{"Placed items"}</h3>
            <ul id="inventoryList" style="margin:0; padding-left:18px; font-size:13px; line-height:1.5;">
                { if placed.is_empty() {
                    html!{ <li>{"No items placed yet."}</li> }
                } else {
                    placed.iter().map(|p| html!{
                        <li key={p.index}>{ format!("Plot {}: {}", p.index + 1, p.item.name) }</li>
                    }).collect::<Html>()
                } }
            </ul>
        </div>
    }
}
