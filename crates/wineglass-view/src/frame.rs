use std::cell::Cell;
use std::rc::Rc;

#[derive(Clone, Debug, Default)]
pub struct FrameRequester {
    pending: Rc<Cell<bool>>,
}

impl FrameRequester {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) -> bool {
        !self.pending.replace(true)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    pub fn take(&self) -> bool {
        self.pending.replace(false)
    }

    pub fn cancel(&self) {
        self.pending.set(false);
    }
}
