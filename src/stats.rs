//! Statistics describing one encoding session.

use std::fmt;

use serde::Serialize;

/// How well one input compressed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodeReport {
    /// Size of the raw input
    pub input_bytes: usize,
    /// Size of the encoded stream, header included
    pub output_bytes: usize,
    /// Number of distinct byte values in the input
    pub distinct_symbols: usize,
    /// Shannon entropy of the input's byte distribution, in bits per symbol
    pub entropy: f64,
    /// Output bits per input byte, header and padding included. `None` for empty input.
    pub average_code_length: Option<f64>,
    /// Input size over output size. `None` for empty input.
    pub compression_ratio: Option<f64>,
}

impl EncodeReport {
    /// Build the report for `input` and the `output` it was encoded to
    pub fn new(input: &[u8], output: &[u8]) -> Self {
        let counts = symbol_counts(input);
        let (average_code_length, compression_ratio) = if input.is_empty() {
            (None, None)
        } else {
            (
                Some((output.len() * 8) as f64 / input.len() as f64),
                Some(input.len() as f64 / output.len() as f64),
            )
        };

        Self {
            input_bytes: input.len(),
            output_bytes: output.len(),
            distinct_symbols: counts.iter().filter(|&&count| count > 0).count(),
            entropy: entropy(&counts),
            average_code_length,
            compression_ratio,
        }
    }
}

impl fmt::Display for EncodeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Input size: {} bytes", self.input_bytes)?;
        writeln!(f, "Output size: {} bytes", self.output_bytes)?;
        writeln!(f, "Distinct symbols: {}", self.distinct_symbols)?;
        writeln!(f, "Entropy: {:.4} bits/symbol", self.entropy)?;
        match self.average_code_length {
            Some(length) => writeln!(f, "Average code length: {length:.4} bits/symbol")?,
            None => writeln!(f, "Average code length: n/a")?,
        }
        match self.compression_ratio {
            Some(ratio) => writeln!(f, "Compression ratio: {ratio:.4}"),
            None => writeln!(f, "Compression ratio: n/a"),
        }
    }
}

/// Occurrences of each byte value
pub fn symbol_counts(input: &[u8]) -> [u64; 256] {
    let mut counts = [0_u64; 256];
    for &byte in input {
        counts[byte as usize] += 1;
    }
    counts
}

/// Shannon entropy, in bits per symbol, of the distribution given by `counts`
pub fn entropy(counts: &[u64]) -> f64 {
    let total: u64 = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;

    counts
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let count = count as f64;
            (count / total) * (total.log2() - count.log2())
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn entropy_of_uniform_bytes() {
        let input: Vec<u8> = (0..=255).collect();
        assert!(approx_eq!(f64, entropy(&symbol_counts(&input)), 8.0, ulps = 4));
    }

    #[test]
    fn entropy_of_constant_input_is_zero() {
        assert_eq!(entropy(&symbol_counts(b"aaaaaaa")), 0.0);
        assert_eq!(entropy(&symbol_counts(b"")), 0.0);
    }

    #[test]
    fn entropy_of_two_symbols() {
        assert!(approx_eq!(f64, entropy(&symbol_counts(b"abab")), 1.0, ulps = 4));
    }

    #[test]
    fn report_for_empty_input() {
        let report = EncodeReport::new(b"", &[0x80]);
        assert_eq!(report.output_bytes, 1);
        assert_eq!(report.average_code_length, None);
        assert_eq!(report.compression_ratio, None);
        assert!(report.to_string().contains("Compression ratio: n/a"));
    }

    #[test]
    fn report_ratios() {
        let report = EncodeReport::new(b"AAAA", &[0x85, 0x41, 0xe0]);
        assert_eq!(report.distinct_symbols, 1);
        assert!(approx_eq!(f64, report.average_code_length.unwrap(), 6.0, ulps = 2));
        assert!(approx_eq!(f64, report.compression_ratio.unwrap(), 4.0 / 3.0, ulps = 2));
    }
}
