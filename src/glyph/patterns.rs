// patterns.rs - 5x3 dot-matrix digits
//
// Only the digits the countdown needs are defined.

pub const ROWS: usize = 5;
pub const COLS: usize = 3;

pub type Pattern = [[u8; COLS]; ROWS];

const ZERO: Pattern = [[1, 1, 1], [1, 0, 1], [1, 0, 1], [1, 0, 1], [1, 1, 1]];
const TWO: Pattern = [[1, 1, 1], [0, 0, 1], [1, 1, 1], [1, 0, 0], [1, 1, 1]];
const FIVE: Pattern = [[1, 1, 1], [1, 0, 0], [1, 1, 1], [0, 0, 1], [1, 1, 1]];
const SIX: Pattern = [[1, 1, 1], [1, 0, 0], [1, 1, 1], [1, 0, 1], [1, 1, 1]];

#[inline]
pub fn pattern(c: char) -> Option<&'static Pattern> {
    match c {
        '0' => Some(&ZERO),
        '2' => Some(&TWO),
        '5' => Some(&FIVE),
        '6' => Some(&SIX),
        _ => None,
    }
}

/// Number of lit cells in a pattern.
pub fn lit(p: &Pattern) -> usize {
    p.iter().flatten().filter(|&&on| on != 0).count()
}
