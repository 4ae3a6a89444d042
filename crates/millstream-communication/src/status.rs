//! GRBL status report parsing
//!
//! Decodes the compact positional status line the firmware emits for `?`
//! queries and unsolicited reports:
//!
//! ```text
//! <Run|MPos:-0.950,-4.887,-2.500|FS:1010,1000>
//! ```
//!
//! Only the machine state and the three axis positions are consumed; the
//! feed/speed group and any other fields are ignored. Parsing never fails:
//! malformed numeric tokens default to `0.0` and missing fields leave the
//! previous value in place, so a garbled report can degrade the display but
//! never halt the session.
//!
//! The implementation is split into a tokenizer producing `(delimiter,
//! token)` pairs and a table-driven mapping from field index to status
//! field, so the scan is testable without the surrounding state machine.

use millstream_core::MachineStatus;

/// One token of a status report, tagged with the delimiter that ended it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportToken {
    /// The delimiter character that terminated this token (`|`, `:`, `,`, `>`)
    pub delimiter: char,
    /// The token text accumulated before the delimiter
    pub text: String,
}

/// Split a status report into delimiter-tagged tokens
///
/// `<` marks the start and is skipped; `>` terminates the scan. Every other
/// delimiter ends the current token.
pub fn tokenize(report: &str) -> Vec<ReportToken> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for ch in report.chars() {
        match ch {
            '<' => {}
            '|' | ':' | ',' => {
                tokens.push(ReportToken {
                    delimiter: ch,
                    text: std::mem::take(&mut current),
                });
            }
            '>' => {
                tokens.push(ReportToken {
                    delimiter: ch,
                    text: std::mem::take(&mut current),
                });
                break;
            }
            _ => current.push(ch),
        }
    }

    tokens
}

/// Fields of interest, in the order their tokens appear in a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    State,
    X,
    Y,
    Z,
}

/// Which delimiter consumes each field: the state and the final Z token end
/// at a group delimiter, the X and Y tokens end inside the position group.
const FIELD_TABLE: [(Field, &[char]); 4] = [
    (Field::State, &['|', ':']),
    (Field::X, &[',']),
    (Field::Y, &[',']),
    (Field::Z, &['|', ':', '>']),
];

/// Apply a status report to a machine status record
///
/// Tokens that do not line up with a field of interest (the `MPos` label,
/// the feed/speed group) are discarded without advancing the field index.
pub fn apply_report(report: &str, status: &mut MachineStatus) {
    let mut field_index = 0;

    for token in tokenize(report) {
        if field_index >= FIELD_TABLE.len() {
            break;
        }

        let (field, delimiters) = FIELD_TABLE[field_index];
        if !delimiters.contains(&token.delimiter) {
            continue;
        }

        match field {
            Field::State => status.state = token.text,
            Field::X => status.x = parse_axis(&token.text),
            Field::Y => status.y = parse_axis(&token.text),
            Field::Z => status.z = parse_axis(&token.text),
        }
        field_index += 1;
    }
}

/// Parse a status report into a fresh record
pub fn parse_report(report: &str) -> MachineStatus {
    let mut status = MachineStatus::default();
    apply_report(report, &mut status);
    status
}

/// Check whether a completed frame is a status report
pub fn is_status_report(frame: &str) -> bool {
    frame.starts_with('<')
}

fn parse_axis(text: &str) -> f64 {
    text.trim().parse::<f64>().unwrap_or(0.0)
}
