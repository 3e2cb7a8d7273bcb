use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event};

pub const LEGEND_TITLE: &str = "Légende";

/// Fills `#legend` with one link per planet, in the order given. Clicking a
/// link calls `on_select` with the planet's name.
pub fn render<'a>(
    document: &Document,
    names: impl Iterator<Item = &'a str>,
    on_select: Rc<dyn Fn(&str)>,
) -> Result<(), JsValue> {
    let Some(legend) = document.get_element_by_id("legend") else {
        log::warn!("no #legend element, skipping legend");
        return Ok(());
    };

    legend.set_inner_html("");
    let title = document.create_element("h3")?;
    title.set_text_content(Some(LEGEND_TITLE));
    legend.append_child(&title)?;

    for name in names {
        let row = document.create_element("div")?;
        let link = document.create_element("a")?;
        link.set_attribute("href", "#")?;
        link.set_text_content(Some(name));

        let name = name.to_string();
        let on_select = on_select.clone();
        let closure = Closure::wrap(Box::new(move |event: Event| {
            event.prevent_default();
            on_select(&name);
        }) as Box<dyn FnMut(_)>);
        link.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();

        row.append_child(&link)?;
        legend.append_child(&row)?;
    }

    Ok(())
}
