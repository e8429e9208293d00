/// Runs a cleanup closure when dropped.
///
/// Drop also runs while unwinding, so the cleanup happens on both normal exit
/// and panic. Used to hand the terminal back to the shell.
///
/// # Examples
///
/// ```
/// use ctf_toolkit::utils::guard::OnDrop;
///
/// let _guard = OnDrop::new(|| println!("restored"));
/// // "restored" is printed when _guard goes out of scope
/// ```
pub struct OnDrop<F: FnOnce()> {
    cleanup: Option<F>,
}

impl<F: FnOnce()> OnDrop<F> {
    pub fn new(cleanup: F) -> Self {
        Self {
            cleanup: Some(cleanup),
        }
    }
}

impl<F: FnOnce()> Drop for OnDrop<F> {
    fn drop(&mut self) {
        if let Some(f) = self.cleanup.take() {
            f()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_cleanup_runs_once_on_drop() {
        let count = Cell::new(0);
        {
            let _guard = OnDrop::new(|| count.set(count.get() + 1));
            assert_eq!(count.get(), 0);
        }
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_cleanup_runs_on_panic() {
        let ran = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
        let flag = ran.clone();
        let result = std::panic::catch_unwind(move || {
            let _guard = OnDrop::new(move || flag.store(true, std::sync::atomic::Ordering::SeqCst));
            panic!("boom");
        });
        assert!(result.is_err());
        assert!(ran.load(std::sync::atomic::Ordering::SeqCst));
    }
}
