//! Tetromino definitions and shapes
//!
//! The seven canonical pieces, each stored as a small boolean matrix
//! together with its palette color. Identity is the catalog entry itself,
//! so shape and color can never drift apart.

use rand::Rng;
use ratatui::style::Color;

/// Largest matrix any catalog shape (or its rotation) can occupy
pub const MAX_SHAPE_SIZE: usize = 4;

/// The 7 tetromino types, in catalog order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrominoType {
    T,
    O,
    S,
    Z,
    I,
    L,
    J,
}

impl TetrominoType {
    /// All types in catalog order
    pub fn all() -> [TetrominoType; 7] {
        [
            TetrominoType::T,
            TetrominoType::O,
            TetrominoType::S,
            TetrominoType::Z,
            TetrominoType::I,
            TetrominoType::L,
            TetrominoType::J,
        ]
    }

    /// The catalog entry for this type
    pub fn entry(&self) -> &'static CatalogEntry {
        &CATALOG[*self as usize]
    }

    pub fn shape(&self) -> Shape {
        self.entry().shape
    }

    pub fn color(&self) -> Color {
        self.entry().color
    }
}

/// An immutable occupancy matrix, `rows x cols`, both at least 1.
///
/// Cells outside `rows x cols` are always `false`, so derived equality
/// compares dimensions and contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
    rows: usize,
    cols: usize,
}

impl Shape {
    /// Build a shape from a literal 0/1 matrix
    pub const fn from_matrix<const R: usize, const C: usize>(matrix: [[u8; C]; R]) -> Self {
        assert!(R >= 1 && C >= 1 && R <= MAX_SHAPE_SIZE && C <= MAX_SHAPE_SIZE);
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut r = 0;
        while r < R {
            let mut c = 0;
            while c < C {
                cells[r][c] = matrix[r][c] != 0;
                c += 1;
            }
            r += 1;
        }
        Self {
            cells,
            rows: R,
            cols: C,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether the cell at (row, col) of the matrix is occupied
    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && self.cells[row][col]
    }

    /// Occupied cells as (row, col) offsets from the top-left corner
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.rows).flat_map(move |r| {
            (0..self.cols).filter_map(move |c| self.cells[r][c].then_some((r, c)))
        })
    }

    /// 90 degree clockwise rotation: `new[c][rows - 1 - r] = old[r][c]`
    pub fn rotated_cw(&self) -> Shape {
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for r in 0..self.rows {
            for c in 0..self.cols {
                cells[c][self.rows - 1 - r] = self.cells[r][c];
            }
        }
        Shape {
            cells,
            rows: self.cols,
            cols: self.rows,
        }
    }
}

/// One catalog record: a piece identity with its shape and color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub kind: TetrominoType,
    pub shape: Shape,
    pub color: Color,
}

/// The fixed piece catalog
pub const CATALOG: [CatalogEntry; 7] = [
    CatalogEntry {
        kind: TetrominoType::T,
        shape: Shape::from_matrix([[1, 1, 1], [0, 1, 0]]),
        color: Color::Rgb(0xFF, 0x0D, 0x72),
    },
    CatalogEntry {
        kind: TetrominoType::O,
        shape: Shape::from_matrix([[1, 1], [1, 1]]),
        color: Color::Rgb(0x0D, 0xC2, 0xFF),
    },
    CatalogEntry {
        kind: TetrominoType::S,
        shape: Shape::from_matrix([[1, 1, 0], [0, 1, 1]]),
        color: Color::Rgb(0x0D, 0xFF, 0x72),
    },
    CatalogEntry {
        kind: TetrominoType::Z,
        shape: Shape::from_matrix([[0, 1, 1], [1, 1, 0]]),
        color: Color::Rgb(0xF5, 0x38, 0xFF),
    },
    CatalogEntry {
        kind: TetrominoType::I,
        shape: Shape::from_matrix([[1, 1, 1, 1]]),
        color: Color::Rgb(0xFF, 0x8E, 0x0D),
    },
    CatalogEntry {
        kind: TetrominoType::L,
        shape: Shape::from_matrix([[1, 0, 0], [1, 1, 1]]),
        color: Color::Rgb(0xFF, 0xE1, 0x38),
    },
    CatalogEntry {
        kind: TetrominoType::J,
        shape: Shape::from_matrix([[0, 0, 1], [1, 1, 1]]),
        color: Color::Rgb(0x38, 0x77, 0xFF),
    },
];

/// All catalog entries in order
pub fn shapes() -> &'static [CatalogEntry; 7] {
    &CATALOG
}

/// Uniform pick with replacement; immediate repeats are allowed
pub fn random_entry<R: Rng + ?Sized>(rng: &mut R) -> CatalogEntry {
    CATALOG[rng.gen_range(0..CATALOG.len())]
}
