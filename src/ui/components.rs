/// Reusable UI components

use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct StatCardProps {
    pub label: AttrValue,
    pub value: AttrValue,
}

#[function_component(StatCard)]
pub fn stat_card(props: &StatCardProps) -> Html {
    html! {
        <div class="stat-card" style="flex: 1; padding: 10px; border-radius: 6px; background-color: #f3f4fd; text-align: center;">
            <div class="stat-value" style="font-size: 20px; font-weight: bold; color: #667eea;">
                {props.value.clone()}
            </div>
            <div class="stat-label" style="font-size: 12px; color: #666;">
                {props.label.clone()}
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ToggleRowProps {
    /// Element id, also the settings field name
    pub id: AttrValue,
    pub label: AttrValue,
    pub checked: bool,
    pub node_ref: NodeRef,
    pub onchange: Callback<Event>,
}

#[function_component(ToggleRow)]
pub fn toggle_row(props: &ToggleRowProps) -> Html {
    html! {
        <label class="toggle-row" for={props.id.clone()} style="display: flex; justify-content: space-between; align-items: center; padding: 6px 0; cursor: pointer;">
            <span>{props.label.clone()}</span>
            <input
                type="checkbox"
                id={props.id.clone()}
                ref={props.node_ref.clone()}
                checked={props.checked}
                onchange={props.onchange.clone()}
            />
        </label>
    }
}
