use crate::gallery::Gallery;
use crate::render::CanvasSurface;
use crate::session::DrawingSession;

pub const CANVAS_WIDTH: u32 = 250;
pub const CANVAS_HEIGHT: u32 = 300;
pub const SAVE_FAILED_MESSAGE: &str = "Could not save your drawing. Please try again.";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum View {
    Draw,
    Gallery,
}

pub struct State {
    pub session: DrawingSession<CanvasSurface>,
    pub gallery: Gallery,
    pub view: View,
    /// An upload is in flight; further saves are ignored until it settles.
    pub saving: bool,
    active_pointer: Option<i32>,
}

impl State {
    pub fn new() -> Self {
        Self {
            session: DrawingSession::new(),
            gallery: Gallery::default(),
            view: View::Draw,
            saving: false,
            active_pointer: None,
        }
    }

    /// Claims the board for `pointer_id`. Fails while another pointer draws.
    pub fn claim_pointer(&mut self, pointer_id: i32) -> bool {
        match self.active_pointer {
            Some(active) if active != pointer_id && self.session.is_drawing() => false,
            _ => {
                self.active_pointer = Some(pointer_id);
                true
            }
        }
    }

    pub fn owns_pointer(&self, pointer_id: i32) -> bool {
        self.active_pointer == Some(pointer_id)
    }

    /// Gives the board back if `pointer_id` holds it.
    pub fn release_pointer(&mut self, pointer_id: i32) -> bool {
        if self.owns_pointer(pointer_id) {
            self.active_pointer = None;
            true
        } else {
            false
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    #[test]
    fn second_pointer_cannot_join_a_gesture() {
        let mut state = State::new();
        assert!(state.claim_pointer(1));
        state.session.press(Point::new(0.0, 0.0));

        assert!(!state.claim_pointer(2));
        assert!(!state.owns_pointer(2));
        assert!(!state.release_pointer(2));
        assert!(state.session.is_drawing());

        assert!(state.owns_pointer(1));
        state.session.release(Point::new(0.0, 0.0));
        assert!(state.release_pointer(1));
        assert!(!state.owns_pointer(1));
    }

    #[test]
    fn board_is_free_once_the_gesture_ends() {
        let mut state = State::new();
        assert!(state.claim_pointer(1));
        state.session.press(Point::new(0.0, 0.0));
        state.session.release(Point::new(0.0, 0.0));
        assert!(state.claim_pointer(2));
        assert!(state.owns_pointer(2));
    }
}
