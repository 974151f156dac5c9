//! Scoring: a flat 100 points per cleared row, no multi-line bonus

/// Points awarded for each cleared row
pub const POINTS_PER_LINE: u64 = 100;

/// Scoring state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Total lines cleared
    pub lines: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    /// Award rows cleared by a single lock. Returns the points added.
    pub fn add_lines(&mut self, count: usize) -> u64 {
        let gained = POINTS_PER_LINE * count as u64;
        self.points += gained;
        self.lines += count as u32;
        gained
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_clear() {
        let mut score = Score::new();
        assert_eq!(score.add_lines(1), 100);
        assert_eq!(score.points, 100);
        assert_eq!(score.lines, 1);
    }

    #[test]
    fn test_no_multi_line_bonus() {
        let mut score = Score::new();
        score.add_lines(4);
        assert_eq!(score.points, 400);
        score.add_lines(2);
        assert_eq!(score.points, 600);
        assert_eq!(score.lines, 6);
    }

    #[test]
    fn test_zero_lines_adds_nothing() {
        let mut score = Score::new();
        assert_eq!(score.add_lines(0), 0);
        assert_eq!(score, Score::new());
    }
}
