use crate::matrix::ScoreMatrix;
use owo_colors::OwoColorize;
use std::io::{self, Write};

/// Fraction of the best score at and above which a cell is emphasized,
/// making the fastest-pair cluster easy to spot.
pub const BOLD_THRESHOLD: f64 = 0.96;

/// Renders a normalized score matrix as a tab-separated table.
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    /// Cells at or above this value render in bold.
    pub bold_threshold: f64,
    /// Disables the terminal escapes when false.
    pub color: bool,
}

impl Default for Reporter {
    fn default() -> Reporter {
        Reporter {
            bold_threshold: BOLD_THRESHOLD,
            color: true,
        }
    }
}

impl Reporter {
    /// Writes a header row of core indices, then one row per core.
    /// Unmeasured cells (diagonal and lower triangle) render as `-`.
    pub fn render<W: Write>(&self, matrix: &ScoreMatrix, out: &mut W) -> io::Result<()> {
        write!(out, "*")?;
        for j in 0..matrix.cores() {
            write!(out, "\t{j}")?;
        }
        writeln!(out)?;

        for i in 0..matrix.cores() {
            write!(out, "{i}")?;
            for j in 0..matrix.cores() {
                match matrix.get(i, j) {
                    Some(score) => {
                        // ceil so a populated cell never renders as 0.00
                        let cell = (score * 100.0).ceil() / 100.0;
                        if self.color && score >= self.bold_threshold {
                            write!(out, "\t{:.2}", cell.bold())?;
                        } else {
                            write!(out, "\t{cell:.2}")?;
                        }
                    }
                    None => write!(out, "\t-")?,
                }
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::Reporter;
    use crate::matrix::ScoreMatrix;

    fn sample_matrix() -> ScoreMatrix {
        let mut matrix = ScoreMatrix::new(3);
        matrix.set(0, 1, 0.5);
        matrix.set(0, 2, 1.0);
        matrix.set(1, 2, 0.97);
        matrix
    }

    #[test]
    fn renders_header_rows_and_placeholders() {
        let reporter = Reporter {
            bold_threshold: 0.96,
            color: false,
        };
        let mut out = Vec::new();
        reporter.render(&sample_matrix(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let expected = "*\t0\t1\t2\n\
                        0\t-\t0.50\t1.00\n\
                        1\t-\t-\t0.97\n\
                        2\t-\t-\t-\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn near_extremal_cells_are_emphasized() {
        let reporter = Reporter {
            bold_threshold: 0.96,
            color: true,
        };
        let mut out = Vec::new();
        reporter.render(&sample_matrix(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\u{1b}[1m1.00\u{1b}[0m"));
        assert!(text.contains("\u{1b}[1m0.97\u{1b}[0m"));
        assert!(!text.contains("\u{1b}[1m0.50"));
    }

    #[test]
    fn empty_matrix_renders_all_placeholders() {
        let reporter = Reporter {
            bold_threshold: 0.96,
            color: false,
        };
        let mut out = Vec::new();
        reporter.render(&ScoreMatrix::new(2), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "*\t0\t1\n0\t-\t-\n1\t-\t-\n");
    }
}
