//! Tic-tac-toe board

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Player,
    Neuro,
}

impl Mark {
    fn symbol(self) -> char {
        match self {
            Mark::Player => 'X',
            Mark::Neuro => 'O',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Winner(Mark),
    Draw,
}

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Mark>; 9],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `mark` on `cell` if it is on the board and empty
    pub fn place(&mut self, cell: usize, mark: Mark) -> bool {
        if !self.is_free(cell) {
            return false;
        }
        self.cells[cell] = Some(mark);
        true
    }

    pub fn is_free(&self, cell: usize) -> bool {
        matches!(self.cells.get(cell), Some(None))
    }

    pub fn free_cells(&self) -> Vec<usize> {
        (0..9).filter(|&cell| self.is_free(cell)).collect()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        for [a, b, c] in LINES {
            if let Some(mark) = self.cells[a] {
                if self.cells[b] == Some(mark) && self.cells[c] == Some(mark) {
                    return Some(Outcome::Winner(mark));
                }
            }
        }
        if self.cells.iter().all(Option::is_some) {
            Some(Outcome::Draw)
        } else {
            None
        }
    }

    /// Single-line description for the agent's context
    pub fn describe(&self) -> String {
        let cells: Vec<String> = self
            .cells
            .iter()
            .enumerate()
            .map(|(i, cell)| match cell {
                Some(mark) => mark.symbol().to_string(),
                None => i.to_string(),
            })
            .collect();
        format!(
            "Board (X = player, O = you, digits = free cells): {} | {} | {}",
            cells[0..3].join(" "),
            cells[3..6].join(" "),
            cells[6..9].join(" ")
        )
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            let symbols: Vec<String> = (0..3)
                .map(|col| {
                    let symbol = self.cells[row * 3 + col].map_or(' ', Mark::symbol);
                    format!(" {} ", symbol)
                })
                .collect();
            writeln!(f, "{}", symbols.join("|"))?;
            if row < 2 {
                writeln!(f, "---+---+---")?;
            }
        }
        Ok(())
    }
}
