//! # Size Descriptors
//!
//! Items are sized in grid units: width is a column count, height is a row
//! count or `auto` (derived from content). A size is always defined for `xl`;
//! the smaller breakpoints are either explicit or derived from `xl`.

use crate::breakpoint::Breakpoint;
use serde::{Deserialize, Serialize};

/// Column count of the standard dashboard grid
pub const GRID_COLUMNS: u32 = 12;

/// Width and height of an item at one breakpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSize {
    /// Width in grid columns
    pub grid_width: u32,

    /// Height in grid rows; `None` means auto
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_height: Option<u32>,
}

impl GridSize {
    pub fn new(grid_width: u32, grid_height: u32) -> Self {
        Self {
            grid_width,
            grid_height: Some(grid_height),
        }
    }

    /// Size with auto height
    pub fn auto(grid_width: u32) -> Self {
        Self {
            grid_width,
            grid_height: None,
        }
    }

    pub fn is_auto_height(&self) -> bool {
        self.grid_height.is_none()
    }

    /// Height used when comparing rows; auto counts as zero
    pub fn height_or_zero(&self) -> u32 {
        self.grid_height.unwrap_or(0)
    }

    pub fn with_width(mut self, grid_width: u32) -> Self {
        self.grid_width = grid_width;
        self
    }

    pub fn with_height(mut self, grid_height: Option<u32>) -> Self {
        self.grid_height = grid_height;
        self
    }
}

/// Per-breakpoint size of a layout item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSize {
    pub xl: GridSize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lg: Option<GridSize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md: Option<GridSize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sm: Option<GridSize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xs: Option<GridSize>,
}

impl ItemSize {
    /// Size defined only for `xl`; other breakpoints are implicit
    pub fn new(xl: GridSize) -> Self {
        Self {
            xl,
            lg: None,
            md: None,
            sm: None,
            xs: None,
        }
    }

    pub fn from_xl(grid_width: u32, grid_height: Option<u32>) -> Self {
        Self::new(GridSize {
            grid_width,
            grid_height,
        })
    }

    /// Explicitly stored size for the breakpoint
    pub fn explicit(&self, breakpoint: Breakpoint) -> Option<&GridSize> {
        match breakpoint {
            Breakpoint::Xl => Some(&self.xl),
            Breakpoint::Lg => self.lg.as_ref(),
            Breakpoint::Md => self.md.as_ref(),
            Breakpoint::Sm => self.sm.as_ref(),
            Breakpoint::Xs => self.xs.as_ref(),
        }
    }

    /// Effective size at the breakpoint (explicit or derived from `xl`)
    pub fn get(&self, breakpoint: Breakpoint) -> GridSize {
        self.explicit(breakpoint)
            .copied()
            .unwrap_or_else(|| implicit_size_from_xl(&self.xl, breakpoint))
    }

    pub fn set(&mut self, breakpoint: Breakpoint, size: GridSize) {
        match breakpoint {
            Breakpoint::Xl => self.xl = size,
            Breakpoint::Lg => self.lg = Some(size),
            Breakpoint::Md => self.md = Some(size),
            Breakpoint::Sm => self.sm = Some(size),
            Breakpoint::Xs => self.xs = Some(size),
        }
    }

    /// Copy with every breakpoint made explicit
    pub fn with_implicit_breakpoints(&self) -> Self {
        let mut size = self.clone();
        for breakpoint in Breakpoint::ALL {
            size.set(breakpoint, self.get(breakpoint));
        }
        size
    }
}

/// Derive a breakpoint size from the `xl` size.
///
/// Narrow items widen on small screens so content stays readable; height is
/// inherited unchanged.
pub fn implicit_size_from_xl(xl: &GridSize, breakpoint: Breakpoint) -> GridSize {
    let (lg, md, sm, xs) = match xl.grid_width {
        0 => return GridSize::auto(0).with_height(xl.grid_height.map(|_| 0)),
        1 => (1, 2, 6, 12),
        2 => (2, 4, 6, 12),
        w @ 3..=9 => (w, 6, 12, 12),
        w => (w.min(GRID_COLUMNS), 12, 12, 12),
    };

    let grid_width = match breakpoint {
        Breakpoint::Xl => xl.grid_width,
        Breakpoint::Lg => lg,
        Breakpoint::Md => md,
        Breakpoint::Sm => sm,
        Breakpoint::Xs => xs,
    };

    GridSize {
        grid_width,
        grid_height: xl.grid_height,
    }
}
