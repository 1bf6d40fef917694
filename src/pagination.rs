//! Pagination – splits the virtual canvas into physical pages.
//!
//! Templates are authored against one infinitely tall page. Whenever a
//! primitive reaches below the printable height accumulated so far, a new
//! page is opened and every later y-coordinate is rebased by the height of
//! the pages before it. Shapes are never split: one that crosses the limit
//! moves to the next page as a whole.

use crate::backend::PdfBackend;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paginator {
    /// Printable height of all pages opened so far.
    limit_height: f32,
    /// `limit_height` before the most recent page was added.
    adjust_height: f32,
}

impl Paginator {
    /// Start tracking a backend that already has its first page.
    pub fn new<B: PdfBackend>(backend: &B) -> Self {
        let mut paginator = Self {
            limit_height: 0.0,
            adjust_height: 0.0,
        };
        paginator.update_limit(backend);
        paginator
    }

    pub fn limit_height(&self) -> f32 {
        self.limit_height
    }

    pub fn adjust_height(&self) -> f32 {
        self.adjust_height
    }

    fn update_limit<B: PdfBackend>(&mut self, backend: &B) {
        self.adjust_height = self.limit_height;
        self.limit_height =
            backend.page_count() as f32 * (backend.page_height() - backend.top_margin());
    }

    /// Map a virtual-canvas `y` onto the current page.
    ///
    /// Opens at most one new page per call, when `y + extra_height` exceeds
    /// the current limit.
    pub fn adjust_y<B: PdfBackend>(&mut self, backend: &mut B, y: f32, extra_height: f32) -> f32 {
        if y + extra_height > self.limit_height {
            backend.add_page();
            self.update_limit(backend);
            log::debug!(
                "page {} opened at y={y}: limit={} offset={}",
                backend.page_count(),
                self.limit_height,
                self.adjust_height
            );
        }

        if backend.page_count() > 1 {
            y - self.adjust_height
        } else {
            y
        }
    }
}
