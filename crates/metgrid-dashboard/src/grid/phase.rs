use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridPhase {
    Uninitialized,
    Loading,
    Failed,
    Rendered,
}

impl GridPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            GridPhase::Uninitialized => "uninitialized",
            GridPhase::Loading => "loading",
            GridPhase::Failed => "failed",
            GridPhase::Rendered => "rendered",
        }
    }

    /// Loading has finished one way or the other.
    pub fn is_settled(self) -> bool {
        matches!(self, GridPhase::Failed | GridPhase::Rendered)
    }
}

/// Shared, lock-free view of the current phase.
#[derive(Clone, Default)]
pub struct PhaseCell(Arc<AtomicU8>);

impl PhaseCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> GridPhase {
        match self.0.load(Ordering::Acquire) {
            1 => GridPhase::Loading,
            2 => GridPhase::Failed,
            3 => GridPhase::Rendered,
            _ => GridPhase::Uninitialized,
        }
    }

    pub fn set(&self, phase: GridPhase) {
        let v = match phase {
            GridPhase::Uninitialized => 0,
            GridPhase::Loading => 1,
            GridPhase::Failed => 2,
            GridPhase::Rendered => 3,
        };
        self.0.store(v, Ordering::Release);
    }
}
