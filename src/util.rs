// Small browser helpers and formatting.
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

pub fn format_time(secs: u64) -> String {
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    if h > 0 {
        format!("{:01}:{:02}:{:02}", h, m, s)
    } else if m > 0 {
        format!("{:02}:{:02}", m, s)
    } else {
        format!("{}s", s)
    }
}

/// Monotonic milliseconds from `performance.now()`, falling back to wall time.
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

type FrameCell = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// A `requestAnimationFrame` loop that runs until dropped.
pub struct FrameLoop {
    id: Rc<Cell<Option<i32>>>,
    closure: FrameCell,
}

impl FrameLoop {
    /// Calls `frame` once per display frame. `None` outside a browser window.
    pub fn start(mut frame: impl FnMut() + 'static) -> Option<Self> {
        let window = web_sys::window()?;
        let id = Rc::new(Cell::new(None));
        let closure_cell: FrameCell = Rc::new(RefCell::new(None));
        {
            let id_loop = id.clone();
            let window_loop = window.clone();
            // weak so the closure does not keep itself alive
            let cell_loop = Rc::downgrade(&closure_cell);
            *closure_cell.borrow_mut() = Some(Closure::wrap(Box::new(move || {
                frame();
                let Some(cell) = cell_loop.upgrade() else {
                    return;
                };
                if let Some(cb) = cell.borrow().as_ref() {
                    if let Ok(next) = window_loop.request_animation_frame(cb.as_ref().unchecked_ref()) {
                        id_loop.set(Some(next));
                    }
                }
            }) as Box<dyn FnMut()>));
        }
        let first = {
            let cell = closure_cell.borrow();
            let cb = cell.as_ref()?;
            window.request_animation_frame(cb.as_ref().unchecked_ref()).ok()?
        };
        id.set(Some(first));
        Some(Self { id, closure: closure_cell })
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if let (Some(id), Some(win)) = (self.id.take(), web_sys::window()) {
            let _ = win.cancel_animation_frame(id);
        }
        self.closure.borrow_mut().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_mission_clock() {
        assert_eq!(format_time(9), "9s");
        assert_eq!(format_time(60), "01:00");
        assert_eq!(format_time(3725), "1:02:05");
    }
}
