/// Runs a closure exactly once when dropped.
///
/// Used to guarantee connection cleanup however the owning task ends (normal
/// return, early return, or abort).
pub struct DropGuard<F: FnOnce()> {
    on_drop: Option<F>,
}

impl<F: FnOnce()> DropGuard<F> {
    pub fn new(on_drop: F) -> Self {
        Self { on_drop: Some(on_drop) }
    }
}

impl<F: FnOnce()> Drop for DropGuard<F> {
    fn drop(&mut self) {
        if let Some(on_drop) = self.on_drop.take() {
            on_drop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DropGuard;
    use std::cell::Cell;

    #[test]
    fn test_runs_once_on_drop() {
        let runs = Cell::new(0);
        {
            let _guard = DropGuard::new(|| runs.set(runs.get() + 1));
            assert_eq!(runs.get(), 0);
        }
        assert_eq!(runs.get(), 1);
    }
}
