use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlCanvasElement, HtmlElement, HtmlImageElement, PointerEvent};

use doodleboard_shared::DrawingRecord;

use crate::gallery::{card_byline, card_title, Gallery, GRID_COLUMNS};
use crate::geometry::{normalize_point, Point};

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

pub fn set_button_enabled(button: &web_sys::HtmlButtonElement, enabled: bool) {
    button.set_disabled(!enabled);
}

/// Converts a pointer position to canvas-local pixels.
pub fn event_to_point(canvas: &HtmlCanvasElement, event: &PointerEvent) -> Option<Point> {
    let rect = canvas.get_bounding_client_rect();
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return None;
    }
    normalize_point(Point {
        x: event.client_x() as f64 - rect.left(),
        y: event.client_y() as f64 - rect.top(),
    })
}

fn format_timestamp(millis: u64) -> String {
    let date = js_sys::Date::new(&JsValue::from_f64(millis as f64));
    date.to_locale_string("default", &JsValue::UNDEFINED).into()
}

fn create_div(document: &Document, class: &str) -> Option<Element> {
    let element = document.create_element("div").ok()?;
    element.set_class_name(class);
    Some(element)
}

fn render_card(document: &Document, record: &DrawingRecord) -> Option<Element> {
    let card = create_div(document, "card")?;

    let image = document
        .create_element("img")
        .ok()?
        .dyn_into::<HtmlImageElement>()
        .ok()?;
    image.set_src(&record.image);
    image.set_alt(&format!("Drawing {}", record.id));
    let _ = card.append_child(&image);

    let title = create_div(document, "card-title")?;
    title.set_text_content(Some(card_title(record)));
    if record.title.trim().is_empty() {
        title.set_class_name("card-title untitled");
    }
    let _ = card.append_child(&title);

    if let Some(byline) = card_byline(record) {
        let author = create_div(document, "card-author")?;
        author.set_text_content(Some(&byline));
        let _ = card.append_child(&author);
    }

    let date = create_div(document, "card-date")?;
    date.set_text_content(Some(&format_timestamp(record.created_at)));
    let _ = card.append_child(&date);
    Some(card)
}

pub fn render_gallery(document: &Document, grid: &HtmlElement, page_label: &Element, gallery: &Gallery) {
    grid.set_inner_html("");
    let _ = grid.style().set_property(
        "grid-template-columns",
        &format!("repeat({GRID_COLUMNS}, 1fr)"),
    );
    for record in gallery.page_items() {
        if let Some(card) = render_card(document, record) {
            let _ = grid.append_child(&card);
        }
    }
    for _ in 0..gallery.empty_slots() {
        if let Some(filler) = create_div(document, "card empty") {
            let _ = grid.append_child(&filler);
        }
    }
    let label = if gallery.is_empty() {
        "No drawings yet".to_string()
    } else {
        format!("Page {} of {}", gallery.page() + 1, gallery.total_pages())
    };
    page_label.set_text_content(Some(&label));
}
