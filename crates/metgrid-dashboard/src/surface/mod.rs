//! Document abstraction the grid controller renders into.
//!
//! A `Document` locates a `Container` by selector; a container either shows
//! plain text or mounts a `Fragment` of image cells in one mutation and
//! hands back one owned `ImageHandle` per cell. Handles stay valid until the
//! element is removed, after which `set_src` reports `false`.

mod memory;

pub use memory::{ImageSnapshot, MemoryContainer, MemoryDocument, MemoryImage};

/// Grid cell wrapper class (responsive three-column layout).
pub const CELL_CLASS: &str = "col-lg-4 col-md-6 col-sm-12";
/// Class applied to every chart image.
pub const IMAGE_CLASS: &str = "image-responsive";

/// One image cell to be mounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellSpec {
    /// Element identity (`{name}-{op}`).
    pub id: String,
    /// Alt text (`{name} {op}`).
    pub alt: String,
    pub src: String,
    pub lazy: bool,
}

/// Batch of cells built off-document and attached at once.
#[derive(Debug, Clone, Default)]
pub struct Fragment {
    cells: Vec<CellSpec>,
}

impl Fragment {
    pub fn with_capacity(n: usize) -> Self {
        Self { cells: Vec::with_capacity(n) }
    }

    pub fn push(&mut self, cell: CellSpec) {
        self.cells.push(cell);
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn into_cells(self) -> Vec<CellSpec> {
        self.cells
    }
}

pub trait Document: Send + Sync {
    type Container: Container;

    /// `None` when nothing matches.
    fn query_selector(&self, selector: &str) -> Option<Self::Container>;
}

pub trait Container: Send + Sync + 'static {
    type Image: ImageHandle;

    /// Remove every child.
    fn clear(&self);

    /// Replace every child with a single text node.
    fn set_text(&self, text: &str);

    /// Append the whole fragment in one mutation. Handles come back in fragment order.
    fn append(&self, fragment: Fragment) -> Vec<Self::Image>;
}

pub trait ImageHandle: Send + Sync + 'static {
    /// Rewrite the image source. Returns `false` if the element is gone.
    fn set_src(&self, src: &str) -> bool;
}
