//! Lenient line-oriented reader for the NMR-STAR subset the scanner needs.
//!
//! Handles `data_`/`save_` framing, free `_Tag value` pairs, `loop_` ...
//! `stop_` tables and the `'...'`, `"..."` and `;`-delimited value forms.
//! `#` comment lines and trailing comments are dropped. Structural
//! impossibilities (ragged loops, values with no owner, unterminated text
//! blocks) are reported with their line number.

use std::io::BufRead;

use super::{Entry, Loop, Saveframe, StarError};

struct LoopBuilder {
    tags: Vec<String>,
    cells: Vec<String>,
    header_done: bool,
}

fn syntax(line: usize, message: impl Into<String>) -> StarError {
    StarError::Syntax {
        line,
        message: message.into(),
    }
}

pub(super) fn parse_entry<R: BufRead>(reader: R) -> Result<Entry, StarError> {
    let mut entry = Entry::default();
    let mut frame: Option<Saveframe> = None;
    let mut table: Option<LoopBuilder> = None;
    let mut pending_tag: Option<String> = None;
    // (first line of the block, accumulated text) while inside `;` ... `;`
    let mut text_block: Option<(usize, String)> = None;
    let mut lineno = 0;

    for line in reader.lines() {
        lineno += 1;
        let line = line?;

        // `;`-delimited text blocks consume raw lines until the closing `;`
        if let Some((_, text)) = text_block.as_mut() {
            if line.starts_with(';') {
                let (_, text) = text_block.take().unwrap_or_default();
                push_value(
                    text.trim().to_string(),
                    &mut pending_tag,
                    &mut table,
                    &mut frame,
                    lineno,
                )?;
            } else {
                if !text.is_empty() {
                    text.push('\n');
                }
                text.push_str(&line);
            }
            continue;
        }
        if line.starts_with(';') {
            text_block = Some((lineno, line[1..].trim().to_string()));
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let lower = trimmed.to_ascii_lowercase();

        if lower.starts_with("data_") {
            entry.name = first_token(trimmed)["data_".len()..].to_string();
            continue;
        }

        if lower == "save_" {
            if pending_tag.is_some() {
                return Err(syntax(lineno, "saveframe ends with a tag awaiting its value"));
            }
            if table.is_some() {
                return Err(syntax(lineno, "saveframe ends inside loop_"));
            }
            match frame.take() {
                Some(done) => entry.saveframes.push(done),
                None => return Err(syntax(lineno, "save_ without an open saveframe")),
            }
            continue;
        }
        if lower.starts_with("save_") {
            if let Some(done) = frame.take() {
                // implicit close; real files always terminate with save_
                entry.saveframes.push(done);
            }
            frame = Some(Saveframe {
                name: first_token(trimmed)["save_".len()..].to_string(),
                ..Default::default()
            });
            continue;
        }

        if lower == "loop_" {
            if table.is_some() {
                return Err(syntax(lineno, "nested loop_"));
            }
            if pending_tag.is_some() {
                return Err(syntax(lineno, "loop_ while a tag awaits its value"));
            }
            table = Some(LoopBuilder {
                tags: Vec::new(),
                cells: Vec::new(),
                header_done: false,
            });
            continue;
        }
        if lower == "stop_" {
            let done = table
                .take()
                .ok_or_else(|| syntax(lineno, "stop_ outside loop_"))?;
            let owner = frame
                .as_mut()
                .ok_or_else(|| syntax(lineno, "loop_ outside saveframe"))?;
            owner.loops.push(finish_loop(done, lineno)?);
            continue;
        }

        if trimmed.starts_with('_') {
            let tag = first_token(trimmed);
            let rest = trimmed[tag.len()..].trim_start();
            if let Some(building) = table.as_mut() {
                if building.header_done {
                    return Err(syntax(lineno, "tag after loop values without stop_"));
                }
                building.tags.push(tag.to_string());
                continue;
            }
            if pending_tag.is_some() {
                return Err(syntax(lineno, "tag while the previous tag awaits its value"));
            }
            if rest.is_empty() {
                pending_tag = Some(tag.to_string());
            } else {
                let mut cells = tokenize(rest, lineno)?;
                let value = if cells.is_empty() {
                    // the rest of the line was a comment
                    pending_tag = Some(tag.to_string());
                    continue;
                } else {
                    cells.swap_remove(0)
                };
                let owner = frame
                    .as_mut()
                    .ok_or_else(|| syntax(lineno, "tag outside saveframe"))?;
                owner.tags.push((tag.to_string(), value));
            }
            continue;
        }

        // plain value line: the pending tag's value or loop row cells
        let cells = tokenize(trimmed, lineno)?;
        if cells.is_empty() {
            continue;
        }
        if pending_tag.is_some() {
            let mut cells = cells;
            push_value(
                cells.swap_remove(0),
                &mut pending_tag,
                &mut table,
                &mut frame,
                lineno,
            )?;
        } else if let Some(building) = table.as_mut() {
            if building.tags.is_empty() {
                return Err(syntax(lineno, "loop values before any loop tag"));
            }
            building.header_done = true;
            building.cells.extend(cells);
        } else {
            return Err(syntax(lineno, format!("unexpected value '{}'", cells[0])));
        }
    }

    if let Some((start, _)) = text_block {
        return Err(syntax(start, "unterminated `;` text block"));
    }
    if pending_tag.is_some() {
        return Err(syntax(lineno, "file ends with a tag awaiting its value"));
    }
    if table.is_some() {
        return Err(syntax(lineno, "file ends inside loop_"));
    }
    if let Some(done) = frame.take() {
        entry.saveframes.push(done);
    }
    Ok(entry)
}

fn push_value(
    value: String,
    pending_tag: &mut Option<String>,
    table: &mut Option<LoopBuilder>,
    frame: &mut Option<Saveframe>,
    lineno: usize,
) -> Result<(), StarError> {
    if let Some(tag) = pending_tag.take() {
        let owner = frame
            .as_mut()
            .ok_or_else(|| syntax(lineno, "tag outside saveframe"))?;
        owner.tags.push((tag, value));
    } else if let Some(building) = table.as_mut() {
        building.header_done = true;
        building.cells.push(value);
    } else {
        return Err(syntax(lineno, "value with no owning tag or loop"));
    }
    Ok(())
}

fn finish_loop(building: LoopBuilder, lineno: usize) -> Result<Loop, StarError> {
    let width = building.tags.len();
    if width == 0 {
        return Err(syntax(lineno, "loop_ without tags"));
    }
    if building.cells.len() % width != 0 {
        return Err(syntax(
            lineno,
            format!(
                "loop has {} values, not a multiple of its {} tags",
                building.cells.len(),
                width
            ),
        ));
    }
    let mut rows = Vec::with_capacity(building.cells.len() / width);
    let mut cells = building.cells.into_iter();
    while cells.len() > 0 {
        rows.push(cells.by_ref().take(width).collect());
    }
    Ok(Loop {
        tags: building.tags,
        rows,
    })
}

fn first_token(line: &str) -> &str {
    line.split_whitespace().next().unwrap_or(line)
}

/// Splits one line into cells, honoring `'...'`/`"..."` quoting and
/// stopping at a trailing comment. A quote ends the cell only when
/// followed by whitespace or the end of the line. Unquoted `$framecode`
/// references lose the `$`.
fn tokenize(line: &str, lineno: usize) -> Result<Vec<String>, StarError> {
    let mut cells = Vec::new();
    let mut rest = line.trim_start();
    while !rest.is_empty() {
        if rest.starts_with('#') {
            break;
        }
        let first = rest.chars().next().unwrap_or_default();
        if first == '\'' || first == '"' {
            let inner = &rest[1..];
            let mut close = None;
            let mut chars = inner.char_indices().peekable();
            while let Some((i, c)) = chars.next() {
                if c == first {
                    match chars.peek() {
                        None => {
                            close = Some(i);
                            break;
                        }
                        Some((_, next)) if next.is_whitespace() => {
                            close = Some(i);
                            break;
                        }
                        _ => {}
                    }
                }
            }
            let close =
                close.ok_or_else(|| syntax(lineno, format!("unterminated quoted value in '{line}'")))?;
            cells.push(inner[..close].to_string());
            rest = inner[close + 1..].trim_start();
        } else {
            let end = rest
                .find(char::is_whitespace)
                .unwrap_or(rest.len());
            cells.push(rest[..end].trim_start_matches('$').to_string());
            rest = rest[end..].trim_start();
        }
    }
    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::tokenize;

    #[test]
    fn splits_plain_and_quoted_cells() {
        let cells = tokenize("ubiquitin 1 '[U-100% 15N]' \"a b\"", 1).unwrap();
        assert_eq!(cells, vec!["ubiquitin", "1", "[U-100% 15N]", "a b"]);
    }

    #[test]
    fn embedded_quotes_stay_inside_the_cell() {
        let cells = tokenize("'it''s fine' x", 1).unwrap();
        assert_eq!(cells, vec!["it''s fine", "x"]);
    }

    #[test]
    fn trailing_comments_are_dropped() {
        let cells = tokenize("alpha beta # the rest", 1).unwrap();
        assert_eq!(cells, vec!["alpha", "beta"]);
    }

    #[test]
    fn framecode_references_lose_the_dollar() {
        let cells = tokenize("$sample_1 42", 1).unwrap();
        assert_eq!(cells, vec!["sample_1", "42"]);
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        assert!(tokenize("'never closed", 3).is_err());
    }
}
