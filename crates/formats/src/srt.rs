//! Parser for SubRip (`.srt`) files.
//!
//! Each block is an index line, a `start --> end` timing line, and one or
//! more text lines, terminated by a blank line. A final block without a
//! trailing blank line is still emitted.

use submerge_subtitle_model::Timestamp;

use crate::error::ParseError;

const BYTE_ORDER_MARK: char = '\u{feff}';
const TIMING_SEPARATOR: &str = "-->";

/// One SubRip block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrtEntry {
    pub number: u32,
    pub start: Timestamp,
    pub end: Timestamp,

    /// Text lines joined with `\n`.
    pub text: String,
}

enum BlockState<'a> {
    ExpectIndex,
    ExpectTiming {
        number: u32,
    },
    ExpectText {
        number: u32,
        start: Timestamp,
        end: Timestamp,
        lines: Vec<&'a str>,
    },
}

/// Parse SubRip content into entries in file order.
///
/// # Errors
/// Fails when an index line is not an integer, when a timing line lacks
/// `-->` or holds a timestamp other than `HH:MM:SS,mmm`, or when a block
/// ends before its timing line.
pub fn parse(data: &str) -> Result<Vec<SrtEntry>, ParseError> {
    let data = data.strip_prefix(BYTE_ORDER_MARK).unwrap_or(data);

    let mut entries = vec![];
    let mut state = BlockState::ExpectIndex;
    let mut last_line = 0;

    for (index, raw_line) in data.lines().enumerate() {
        let line_number = index + 1;
        last_line = line_number;
        let line = raw_line.trim();

        state = match state {
            BlockState::ExpectIndex if line.is_empty() => BlockState::ExpectIndex,
            BlockState::ExpectIndex => {
                let number = line.parse::<u32>().map_err(|_| ParseError::InvalidIndex {
                    line: line_number,
                    value: line.to_string(),
                })?;
                BlockState::ExpectTiming { number }
            }
            BlockState::ExpectTiming { number } if line.is_empty() => {
                return Err(ParseError::UnterminatedBlock {
                    line: line_number,
                    index: number,
                });
            }
            BlockState::ExpectTiming { number } => {
                let (start, end) = parse_timing(line, line_number)?;
                BlockState::ExpectText {
                    number,
                    start,
                    end,
                    lines: vec![],
                }
            }
            BlockState::ExpectText {
                number,
                start,
                end,
                lines,
            } if line.is_empty() => {
                entries.push(finish_block(number, start, end, &lines));
                BlockState::ExpectIndex
            }
            BlockState::ExpectText {
                number,
                start,
                end,
                mut lines,
            } => {
                lines.push(raw_line.trim_end());
                BlockState::ExpectText {
                    number,
                    start,
                    end,
                    lines,
                }
            }
        };
    }

    match state {
        BlockState::ExpectIndex => {}
        BlockState::ExpectTiming { number } => {
            return Err(ParseError::UnterminatedBlock {
                line: last_line,
                index: number,
            });
        }
        BlockState::ExpectText {
            number,
            start,
            end,
            lines,
        } => entries.push(finish_block(number, start, end, &lines)),
    }

    tracing::debug!(entries = entries.len(), "parsed SubRip file");

    Ok(entries)
}

fn parse_timing(line: &str, line_number: usize) -> Result<(Timestamp, Timestamp), ParseError> {
    let (start, end) = line
        .split_once(TIMING_SEPARATOR)
        .ok_or(ParseError::MissingTimingSeparator { line: line_number })?;

    // Some encoders append position hints (`X1:... Y1:...`) after the end time.
    let end = end.split_whitespace().next().unwrap_or_default();

    let parse = |raw: &str| {
        Timestamp::parse_srt(raw.trim()).map_err(|source| ParseError::InvalidTimestamp {
            line: line_number,
            source,
        })
    };

    Ok((parse(start)?, parse(end)?))
}

fn finish_block(number: u32, start: Timestamp, end: Timestamp, lines: &[&str]) -> SrtEntry {
    SrtEntry {
        number,
        start,
        end,
        text: lines.join("\n").trim().to_string(),
    }
}
