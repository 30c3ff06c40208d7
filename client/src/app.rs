use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, Event, HtmlButtonElement, HtmlCanvasElement,
    HtmlElement, HtmlInputElement, PointerEvent, Window,
};

use doodleboard_shared::NewDrawing;

use crate::dom::{event_to_point, get_element, render_gallery, set_button_enabled};
use crate::net::{fetch_drawings, post_drawing, PostError};
use crate::render::CanvasSurface;
use crate::state::{State, View, CANVAS_HEIGHT, CANVAS_WIDTH, SAVE_FAILED_MESSAGE};

/// Handles to every element the app reads or updates.
#[derive(Clone)]
struct Ui {
    document: Document,
    canvas: HtmlCanvasElement,
    title_input: HtmlInputElement,
    author_input: HtmlInputElement,
    title_error: HtmlElement,
    save_button: HtmlButtonElement,
    clear_button: HtmlButtonElement,
    undo_button: HtmlButtonElement,
    draw_view: HtmlElement,
    gallery_view: HtmlElement,
    show_gallery_button: HtmlButtonElement,
    show_draw_button: HtmlButtonElement,
    gallery_grid: HtmlElement,
    prev_button: HtmlButtonElement,
    next_button: HtmlButtonElement,
    page_label: Element,
}

impl Ui {
    fn lookup(document: &Document) -> Result<Self, JsValue> {
        Ok(Self {
            document: document.clone(),
            canvas: get_element(document, "board")?,
            title_input: get_element(document, "title")?,
            author_input: get_element(document, "author")?,
            title_error: get_element(document, "titleError")?,
            save_button: get_element(document, "save")?,
            clear_button: get_element(document, "clear")?,
            undo_button: get_element(document, "undo")?,
            draw_view: get_element(document, "drawView")?,
            gallery_view: get_element(document, "galleryView")?,
            show_gallery_button: get_element(document, "showGallery")?,
            show_draw_button: get_element(document, "showDraw")?,
            gallery_grid: get_element(document, "galleryGrid")?,
            prev_button: get_element(document, "prevPage")?,
            next_button: get_element(document, "nextPage")?,
            page_label: document
                .get_element_by_id("pageLabel")
                .ok_or_else(|| JsValue::from_str("Missing page label"))?,
        })
    }

    /// Mirrors the drawing controls and form after a state change.
    fn sync_controls(&self, state: &State) {
        let form = state.session.form();
        if self.title_input.value() != form.title {
            self.title_input.set_value(&form.title);
        }
        if self.author_input.value() != form.author {
            self.author_input.set_value(&form.author);
        }
        match &form.error {
            Some(message) => {
                self.title_error.set_text_content(Some(message));
                self.title_error.set_hidden(false);
            }
            None => {
                self.title_error.set_text_content(None);
                self.title_error.set_hidden(true);
            }
        }
        set_button_enabled(&self.undo_button, state.session.can_undo());
        set_button_enabled(&self.save_button, !state.saving);
    }

    fn sync_gallery(&self, state: &State) {
        render_gallery(
            &self.document,
            &self.gallery_grid,
            &self.page_label,
            &state.gallery,
        );
        set_button_enabled(&self.prev_button, state.gallery.has_prev());
        set_button_enabled(&self.next_button, state.gallery.has_next());
    }

    fn sync_view(&self, state: &State) {
        self.draw_view.set_hidden(state.view != View::Draw);
        self.gallery_view.set_hidden(state.view != View::Gallery);
    }
}

fn add_click(
    button: &HtmlButtonElement,
    handler: impl 'static + FnMut(Event),
) -> Result<(), JsValue> {
    let onclick = Closure::<dyn FnMut(Event)>::new(handler);
    button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
    onclick.forget();
    Ok(())
}

fn refresh_gallery(window: Window, state: Rc<RefCell<State>>, ui: Ui) {
    wasm_bindgen_futures::spawn_local(async move {
        let records = fetch_drawings(&window).await;
        log::debug!("Loaded {} drawings", records.len());
        let mut state = state.borrow_mut();
        state.gallery.replace(records);
        ui.sync_gallery(&state);
    });
}

#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    if let Err(err) = start_app() {
        log::error!("Failed to start: {err:?}");
        return Err(err);
    }
    Ok(())
}

fn start_app() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;
    let ui = Ui::lookup(&document)?;

    ui.canvas.set_width(CANVAS_WIDTH);
    ui.canvas.set_height(CANVAS_HEIGHT);
    let state = Rc::new(RefCell::new(State::new()));
    match ui.canvas.get_context("2d")? {
        Some(ctx) => {
            let ctx = ctx.dyn_into::<CanvasRenderingContext2d>()?;
            state
                .borrow_mut()
                .session
                .attach(CanvasSurface::new(ui.canvas.clone(), ctx));
        }
        None => log::warn!("Canvas has no 2d context, drawing will not be painted"),
    }

    {
        let state = state.borrow();
        ui.sync_controls(&state);
        ui.sync_gallery(&state);
        ui.sync_view(&state);
    }

    {
        let down_state = state.clone();
        let down_ui = ui.clone();
        let ondown = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            if event.button() != 0 {
                return;
            }
            let Some(point) = event_to_point(&down_ui.canvas, &event) else {
                return;
            };
            {
                let mut state = down_state.borrow_mut();
                if !state.claim_pointer(event.pointer_id()) {
                    return;
                }
                event.prevent_default();
                state.session.press(point);
            }
            let _ = down_ui.canvas.set_pointer_capture(event.pointer_id());
        });
        ui.canvas
            .add_event_listener_with_callback("pointerdown", ondown.as_ref().unchecked_ref())?;
        ondown.forget();
    }

    {
        let move_state = state.clone();
        let move_canvas = ui.canvas.clone();
        let onmove = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let mut state = move_state.borrow_mut();
            if !state.session.is_drawing() || !state.owns_pointer(event.pointer_id()) {
                return;
            }
            event.prevent_default();
            if let Some(point) = event_to_point(&move_canvas, &event) {
                state.session.drag(point);
            }
        });
        ui.canvas
            .add_event_listener_with_callback("pointermove", onmove.as_ref().unchecked_ref())?;
        onmove.forget();
    }

    {
        let stop_state = state.clone();
        let stop_ui = ui.clone();
        let onstop = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            {
                let mut state = stop_state.borrow_mut();
                if !state.release_pointer(event.pointer_id()) || !state.session.is_drawing() {
                    return;
                }
                event.prevent_default();
                // Releases that cannot be mapped (zero-sized canvas) end where the gesture began.
                let point = event_to_point(&stop_ui.canvas, &event)
                    .or_else(|| state.session.gesture_origin())
                    .unwrap_or_default();
                state.session.release(point);
                stop_ui.sync_controls(&state);
            }
            if stop_ui.canvas.has_pointer_capture(event.pointer_id()) {
                let _ = stop_ui.canvas.release_pointer_capture(event.pointer_id());
            }
        });
        for name in ["pointerup", "pointercancel", "pointerleave", "lostpointercapture"] {
            ui.canvas
                .add_event_listener_with_callback(name, onstop.as_ref().unchecked_ref())?;
        }
        onstop.forget();
    }

    {
        let input_state = state.clone();
        let title_input = ui.title_input.clone();
        let oninput = Closure::<dyn FnMut(Event)>::new(move |_| {
            input_state.borrow_mut().session.set_title(title_input.value());
        });
        ui.title_input
            .add_event_listener_with_callback("input", oninput.as_ref().unchecked_ref())?;
        oninput.forget();
    }

    {
        let input_state = state.clone();
        let author_input = ui.author_input.clone();
        let oninput = Closure::<dyn FnMut(Event)>::new(move |_| {
            input_state
                .borrow_mut()
                .session
                .set_author(author_input.value());
        });
        ui.author_input
            .add_event_listener_with_callback("input", oninput.as_ref().unchecked_ref())?;
        oninput.forget();
    }

    {
        let clear_state = state.clone();
        let clear_ui = ui.clone();
        add_click(&ui.clear_button, move |_| {
            let mut state = clear_state.borrow_mut();
            state.session.clear();
            clear_ui.sync_controls(&state);
        })?;
    }

    {
        let undo_state = state.clone();
        let undo_ui = ui.clone();
        add_click(&ui.undo_button, move |_| {
            let mut state = undo_state.borrow_mut();
            state.session.undo();
            undo_ui.sync_controls(&state);
        })?;
    }

    {
        let save_state = state.clone();
        let save_ui = ui.clone();
        let save_window = window.clone();
        add_click(&ui.save_button, move |_| {
            let drawing = {
                let mut state = save_state.borrow_mut();
                if state.saving {
                    return;
                }
                let request = match state.session.prepare_save() {
                    Ok(request) => request,
                    Err(_) => {
                        save_ui.sync_controls(&state);
                        return;
                    }
                };
                let image = match save_ui.canvas.to_data_url_with_type("image/png") {
                    Ok(image) => image,
                    Err(error) => {
                        log::error!("Failed to export canvas: {error:?}");
                        state.session.save_failed(SAVE_FAILED_MESSAGE);
                        save_ui.sync_controls(&state);
                        return;
                    }
                };
                state.saving = true;
                save_ui.sync_controls(&state);
                NewDrawing {
                    image,
                    title: request.title,
                    author: request.author,
                }
            };

            let state = save_state.clone();
            let ui = save_ui.clone();
            let window = save_window.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = post_drawing(&window, &drawing).await;
                let saved = {
                    let mut state = state.borrow_mut();
                    state.saving = false;
                    let saved = match result {
                        Ok(created) => {
                            log::info!("Saved drawing {}", created.id);
                            state.session.save_succeeded();
                            true
                        }
                        Err(PostError::Rejected(message)) => {
                            log::info!("Server rejected drawing: {message}");
                            state.session.save_failed(message);
                            false
                        }
                        Err(PostError::Failed(error)) => {
                            log::warn!("Failed to save drawing: {error:?}");
                            state.session.save_failed(SAVE_FAILED_MESSAGE);
                            false
                        }
                    };
                    ui.sync_controls(&state);
                    saved
                };
                if saved {
                    refresh_gallery(window, state, ui);
                }
            });
        })?;
    }

    {
        let view_state = state.clone();
        let view_ui = ui.clone();
        let view_window = window.clone();
        add_click(&ui.show_gallery_button, move |_| {
            {
                let mut state = view_state.borrow_mut();
                state.view = View::Gallery;
                view_ui.sync_view(&state);
            }
            refresh_gallery(view_window.clone(), view_state.clone(), view_ui.clone());
        })?;
    }

    {
        let view_state = state.clone();
        let view_ui = ui.clone();
        add_click(&ui.show_draw_button, move |_| {
            let mut state = view_state.borrow_mut();
            state.view = View::Draw;
            view_ui.sync_view(&state);
        })?;
    }

    {
        let page_state = state.clone();
        let page_ui = ui.clone();
        add_click(&ui.prev_button, move |_| {
            let mut state = page_state.borrow_mut();
            if state.gallery.prev() {
                page_ui.sync_gallery(&state);
            }
        })?;
    }

    {
        let page_state = state.clone();
        let page_ui = ui.clone();
        add_click(&ui.next_button, move |_| {
            let mut state = page_state.borrow_mut();
            if state.gallery.next() {
                page_ui.sync_gallery(&state);
            }
        })?;
    }

    refresh_gallery(window, state, ui);
    Ok(())
}
