//! Small cross-cutting helpers.

use std::time::Instant;

/// A scoped timer that logs elapsed wall-clock time when dropped, used to
/// bracket the render call and the PNG write.
pub struct ScopedTimer {
    label: &'static str,
    start: Instant,
}

impl ScopedTimer {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
        }
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        log::info!("{} took {:.3}s", self.label, self.start.elapsed().as_secs_f64());
    }
}
