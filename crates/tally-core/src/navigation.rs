use std::cell::RefCell;
use std::rc::Rc;

pub trait Navigation {
    fn fragment(&self) -> String;
}

#[derive(Debug, Clone, Default)]
pub struct FragmentCell {
    fragment: Rc<RefCell<String>>,
}

impl FragmentCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, fragment: &str) {
        *self.fragment.borrow_mut() = fragment.to_string();
    }
}

impl Navigation for FragmentCell {
    fn fragment(&self) -> String {
        self.fragment.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::{FragmentCell, Navigation};

    #[test]
    fn clones_observe_the_same_fragment() {
        let cell = FragmentCell::new();
        let handle = cell.clone();

        assert_eq!(cell.fragment(), "");
        handle.set("/active");
        assert_eq!(cell.fragment(), "/active");
    }
}
