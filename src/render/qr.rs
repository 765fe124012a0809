//! QR code module matrices.

use qrcode::{Color, QrCode};

use crate::error::{LabelError, Result};

/// Light modules kept around the symbol so scanners can find it
pub const QUIET_ZONE: usize = 4;

/// Square grid of QR modules including the quiet zone; row 0 is the top
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrMatrix {
    width: usize,
    dark: Vec<bool>,
}

impl QrMatrix {
    /// Encode a label value
    pub fn encode(value: &str) -> Result<Self> {
        let code = QrCode::new(value.as_bytes()).map_err(|source| LabelError::QrEncode {
            value: value.to_string(),
            source,
        })?;

        let inner = code.width();
        let width = inner + 2 * QUIET_ZONE;
        let mut dark = vec![false; width * width];
        for (idx, color) in code.to_colors().into_iter().enumerate() {
            if color == Color::Dark {
                let (row, col) = (idx / inner, idx % inner);
                dark[(row + QUIET_ZONE) * width + col + QUIET_ZONE] = true;
            }
        }

        Ok(QrMatrix { width, dark })
    }

    /// Number of modules per side, quiet zone included
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_dark(&self, row: usize, col: usize) -> bool {
        row < self.width && col < self.width && self.dark[row * self.width + col]
    }

    /// Horizontal runs of dark modules as `(row, first_col, len)`
    pub fn dark_runs(&self) -> Vec<(usize, usize, usize)> {
        let mut runs = Vec::new();
        for row in 0..self.width {
            let mut col = 0;
            while col < self.width {
                if self.is_dark(row, col) {
                    let start = col;
                    while col < self.width && self.is_dark(row, col) {
                        col += 1;
                    }
                    runs.push((row, start, col - start));
                } else {
                    col += 1;
                }
            }
        }
        runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_zone_is_light() {
        let matrix = QrMatrix::encode("P-001").unwrap();
        // Version 1 symbol is 21 modules wide
        assert_eq!(matrix.width(), 21 + 2 * QUIET_ZONE);
        for i in 0..matrix.width() {
            for q in 0..QUIET_ZONE {
                assert!(!matrix.is_dark(q, i));
                assert!(!matrix.is_dark(i, q));
                assert!(!matrix.is_dark(matrix.width() - 1 - q, i));
                assert!(!matrix.is_dark(i, matrix.width() - 1 - q));
            }
        }
    }

    #[test]
    fn test_finder_pattern_corner() {
        let matrix = QrMatrix::encode("P-001").unwrap();
        // Top-left finder pattern: 7-module dark border starting after the quiet zone
        for i in 0..7 {
            assert!(matrix.is_dark(QUIET_ZONE, QUIET_ZONE + i));
            assert!(matrix.is_dark(QUIET_ZONE + i, QUIET_ZONE));
        }
        assert!(!matrix.is_dark(QUIET_ZONE + 1, QUIET_ZONE + 1));
    }

    #[test]
    fn test_dark_runs_cover_all_dark_modules() {
        let matrix = QrMatrix::encode("https://example.org/plants/P-001").unwrap();
        let dark_count = (0..matrix.width())
            .flat_map(|r| (0..matrix.width()).map(move |c| (r, c)))
            .filter(|&(r, c)| matrix.is_dark(r, c))
            .count();
        let run_total: usize = matrix.dark_runs().iter().map(|&(_, _, len)| len).sum();
        assert_eq!(run_total, dark_count);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        assert_eq!(QrMatrix::encode("P-042").unwrap(), QrMatrix::encode("P-042").unwrap());
    }

    #[test]
    fn test_oversized_value_fails() {
        let value = "x".repeat(8000);
        assert!(matches!(
            QrMatrix::encode(&value),
            Err(LabelError::QrEncode { .. })
        ));
    }
}
