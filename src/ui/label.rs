use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use crate::sim::body::CelestialBody;

/// Pixel offset from the pointer to the label's top-left corner.
const POINTER_OFFSET: f32 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub enum HoverUpdate {
    Show { text: String, left: f32, top: f32 },
    Hide,
}

impl HoverUpdate {
    pub fn for_pick(body: Option<&CelestialBody>, px: f32, py: f32) -> Self {
        match body {
            Some(body) => HoverUpdate::Show {
                text: format!("Planète : {}", body.name()),
                left: px + POINTER_OFFSET,
                top: py + POINTER_OFFSET,
            },
            None => HoverUpdate::Hide,
        }
    }
}

/// Floating div naming the planet under the pointer.
pub struct HoverLabel {
    element: HtmlElement,
}

impl HoverLabel {
    pub fn create(document: &Document) -> Result<Self, JsValue> {
        let element = document.create_element("div")?.dyn_into::<HtmlElement>()?;
        let style = element.style();
        style.set_property("position", "absolute")?;
        style.set_property("color", "white")?;
        style.set_property("background-color", "rgba(0, 0, 0, 0.7)")?;
        style.set_property("padding", "5px")?;
        style.set_property("pointer-events", "none")?;
        style.set_property("display", "none")?;

        document.body().ok_or("No body")?.append_child(&element)?;
        Ok(HoverLabel { element })
    }

    pub fn apply(&self, update: &HoverUpdate) -> Result<(), JsValue> {
        let style = self.element.style();
        match update {
            HoverUpdate::Show { text, left, top } => {
                self.element.set_text_content(Some(text.as_str()));
                style.set_property("left", &format!("{}px", left))?;
                style.set_property("top", &format!("{}px", top))?;
                style.set_property("display", "block")?;
            }
            HoverUpdate::Hide => style.set_property("display", "none")?,
        }
        Ok(())
    }
}
