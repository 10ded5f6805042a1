#![allow(dead_code)]

use rowdeque::{AllocError, Global, RowAlloc};
use std::alloc::Layout;
use std::cell::{Cell, RefCell};
use std::ptr::NonNull;
use std::rc::Rc;

#[derive(Debug, Default)]
struct Ledger {
    live: usize,
    total: usize,
    budget: Option<usize>,
}

/// A row allocator that counts live blocks and can be told to start failing.
///
/// Clones share one ledger and therefore share storage.
#[derive(Debug, Clone, Default)]
pub struct CountingAlloc {
    ledger: Rc<RefCell<Ledger>>,
}

impl CountingAlloc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks currently allocated and not yet released.
    pub fn live(&self) -> usize {
        self.ledger.borrow().live
    }

    /// Successful allocations over the allocator's lifetime.
    pub fn total(&self) -> usize {
        self.ledger.borrow().total
    }

    /// Lets the next `n` allocations succeed and fails every one after.
    pub fn fail_after(&self, n: usize) {
        self.ledger.borrow_mut().budget = Some(n);
    }

    pub fn allow_all(&self) {
        self.ledger.borrow_mut().budget = None;
    }
}

impl RowAlloc for CountingAlloc {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        let mut ledger = self.ledger.borrow_mut();
        if let Some(budget) = ledger.budget {
            if budget == 0 {
                return Err(AllocError::new(layout));
            }
            ledger.budget = Some(budget - 1);
        }
        let ptr = Global.allocate(layout)?;
        ledger.live += 1;
        ledger.total += 1;
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.ledger.borrow_mut().live -= 1;
        Global.deallocate(ptr, layout);
    }

    fn shares_storage_with(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.ledger, &other.ledger)
    }
}

/// Counts drops through a shared cell. Clones panic once `clone_budget`
/// reaches zero.
#[derive(Debug)]
pub struct Tracked {
    pub value: u32,
    drops: Rc<Cell<usize>>,
    clone_budget: Rc<Cell<usize>>,
}

impl Tracked {
    pub fn new(value: u32, drops: &Rc<Cell<usize>>, clone_budget: &Rc<Cell<usize>>) -> Self {
        Self {
            value,
            drops: Rc::clone(drops),
            clone_budget: Rc::clone(clone_budget),
        }
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        let left = self.clone_budget.get();
        if left == 0 {
            panic!("clone budget exhausted");
        }
        self.clone_budget.set(left - 1);
        Self {
            value: self.value,
            drops: Rc::clone(&self.drops),
            clone_budget: Rc::clone(&self.clone_budget),
        }
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}
