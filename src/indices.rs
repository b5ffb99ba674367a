//! These indices are for library internal use only.

/// Index of a page within a document's flattened page list (0-based).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct PdfPageIndex(pub(crate) usize);

impl PdfPageIndex {
    pub fn new(i: usize) -> Self {
        PdfPageIndex(i)
    }

    pub fn get(self) -> usize {
        self.0
    }
}
