use std::{cell::Cell, rc::Rc};

/// Element that counts how often it was dropped
#[derive(Debug)]
pub(crate) struct DropCounter {
    drops:     Rc<Cell<usize>>,
    pub value: i32,
}

impl DropCounter {
    pub fn new(drops: &Rc<Cell<usize>>, value: i32) -> Self {
        Self { drops: drops.clone(), value }
    }
}

impl Clone for DropCounter {
    fn clone(&self) -> Self {
        Self::new(&self.drops, self.value)
    }
}

impl PartialEq for DropCounter {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

/// Element whose `clone` panics once the shared budget of clones runs out
pub(crate) struct PanicOnClone {
    clones_left: Rc<Cell<usize>>,
    drops:       Rc<Cell<usize>>,
}

impl PanicOnClone {
    pub fn new(clones_left: &Rc<Cell<usize>>, drops: &Rc<Cell<usize>>) -> Self {
        Self { clones_left: clones_left.clone(), drops: drops.clone() }
    }
}

impl Clone for PanicOnClone {
    fn clone(&self) -> Self {
        let left = self.clones_left.get();
        if left == 0 {
            panic!("clone budget exhausted");
        }
        self.clones_left.set(left - 1);
        Self::new(&self.clones_left, &self.drops)
    }
}

impl Drop for PanicOnClone {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}
