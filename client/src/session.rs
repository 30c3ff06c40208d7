use doodleboard_shared::{validate_author, validate_title, FormError};

use crate::capture::{Stroke, StrokeCapture};
use crate::geometry::Point;
use crate::render::{render, Surface};

/// What the save button sends once the form checks out.
#[derive(Clone, Debug, PartialEq)]
pub struct SaveRequest {
    pub title: String,
    pub author: Option<String>,
}

#[derive(Default)]
pub struct SaveForm {
    pub title: String,
    pub author: String,
    pub error: Option<String>,
}

/// Owns the strokes, the surface they are painted on and the save form.
///
/// Every mutation that changes the strokes repaints the full surface before
/// returning. Without a mounted surface the bookkeeping still happens and
/// painting is skipped.
pub struct DrawingSession<S: Surface> {
    capture: StrokeCapture,
    surface: Option<S>,
    form: SaveForm,
}

impl<S: Surface> Default for DrawingSession<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Surface> DrawingSession<S> {
    pub fn new() -> Self {
        Self {
            capture: StrokeCapture::new(),
            surface: None,
            form: SaveForm::default(),
        }
    }

    pub fn attach(&mut self, surface: S) {
        self.surface = Some(surface);
        self.redraw();
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn strokes(&self) -> &[Stroke] {
        self.capture.strokes()
    }

    pub fn is_drawing(&self) -> bool {
        self.capture.is_drawing()
    }

    pub fn can_undo(&self) -> bool {
        self.capture.can_undo()
    }

    /// Where the gesture in flight was pressed.
    pub fn gesture_origin(&self) -> Option<Point> {
        self.capture.origin()
    }

    pub fn form(&self) -> &SaveForm {
        &self.form
    }

    pub fn press(&mut self, point: Point) {
        let changed = self.capture.begin(point);
        self.after_mutation(changed);
    }

    pub fn drag(&mut self, point: Point) {
        let changed = self.capture.extend(point);
        self.after_mutation(changed);
    }

    pub fn release(&mut self, point: Point) {
        let changed = self.capture.end(point);
        self.after_mutation(changed);
    }

    pub fn undo(&mut self) {
        let changed = self.capture.undo_last();
        self.after_mutation(changed);
    }

    pub fn clear(&mut self) {
        let changed = self.capture.clear_all();
        self.after_mutation(changed);
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.form.title = title.into();
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.form.author = author.into();
    }

    /// Validates the form. A bad title or author is kept in the error slot
    /// and the drawing is left alone so the user can fix it and retry.
    pub fn prepare_save(&mut self) -> Result<SaveRequest, FormError> {
        let checked = validate_title(&self.form.title)
            .map_err(FormError::from)
            .and_then(|title| {
                let author = validate_author(Some(&self.form.author))?;
                Ok(SaveRequest {
                    title: title.to_string(),
                    author,
                })
            });
        match &checked {
            Ok(_) => self.form.error = None,
            Err(error) => {
                log::debug!("save rejected: {error}");
                self.form.error = Some(error.to_string());
            }
        }
        checked
    }

    pub fn save_failed(&mut self, message: impl Into<String>) {
        self.form.error = Some(message.into());
    }

    pub fn save_succeeded(&mut self) {
        self.form = SaveForm::default();
        self.clear();
    }

    pub fn redraw(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        render(surface, self.capture.strokes(), self.capture.in_progress());
    }

    fn after_mutation(&mut self, changed: bool) {
        if changed {
            self.redraw();
        }
    }
}
