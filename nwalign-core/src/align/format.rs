use crate::error::{NwError, NwResult};
use crate::seq::{GappedSeq, GAP};

/// Marker under an identical pair.
pub const MATCH_MARK: char = '|';
/// Marker under a differing pair.
pub const MISMATCH_MARK: char = 'x';

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormatType {
    /// Blocks of row 1, a marker line, and row 2, separated by blank lines.
    Text,
    /// Two FASTA records named `seq1` and `seq2`, gaps kept.
    Fasta,
}

/// Render two gapped rows of equal length.
pub fn format_alignment(
    row1: &GappedSeq,
    row2: &GappedSeq,
    kind: FormatType,
    line_width: usize,
) -> NwResult<String> {
    if line_width == 0 {
        return Err(NwError::bad_parameter("line_width must be positive"));
    }
    if row1.len() != row2.len() {
        return Err(NwError::TranscriptMismatch {
            msg: format!("gapped rows differ in length: {} vs {}", row1.len(), row2.len()),
        });
    }
    Ok(match kind {
        FormatType::Text => text(row1.as_bytes(), row2.as_bytes(), line_width),
        FormatType::Fasta => {
            let mut out = String::new();
            fasta_record(&mut out, "seq1", row1.as_bytes(), line_width);
            fasta_record(&mut out, "seq2", row2.as_bytes(), line_width);
            out
        }
    })
}

fn marker(a: u8, b: u8) -> char {
    if a == GAP || b == GAP {
        ' '
    } else if a.eq_ignore_ascii_case(&b) {
        MATCH_MARK
    } else {
        MISMATCH_MARK
    }
}

fn text(a: &[u8], b: &[u8], width: usize) -> String {
    let mut out = String::with_capacity(a.len() * 3 + a.len() / width * 4 + 4);
    for (n, (ca, cb)) in a.chunks(width).zip(b.chunks(width)).enumerate() {
        if n > 0 {
            out.push('\n');
        }
        out.extend(ca.iter().map(|&c| c as char));
        out.push('\n');
        out.extend(ca.iter().zip(cb).map(|(&x, &y)| marker(x, y)));
        out.push('\n');
        out.extend(cb.iter().map(|&c| c as char));
        out.push('\n');
    }
    out
}

fn fasta_record(out: &mut String, name: &str, row: &[u8], width: usize) {
    out.push('>');
    out.push_str(name);
    out.push('\n');
    for line in row.chunks(width) {
        out.extend(line.iter().map(|&c| c as char));
        out.push('\n');
    }
}
