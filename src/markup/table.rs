//! Laying out tables in a fixed number of columns

use std::borrow::Cow;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::formatting::Syntax;
use crate::profile::TableSettings;
use crate::sizing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justify {
    Left,
    Center,
    Right,
}

/// A table as collected from the markup: plain text cells, with the first
/// `header` rows being column headings.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub justify: Vec<Justify>,
    pub rows: Vec<Vec<String>>,
    pub header: usize,
}

impl Table {
    fn width(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
            .max(self.justify.len())
    }

    /// Render with box drawing borders into the given terminal width.
    pub fn fragments(&self, settings: &TableSettings, columns: usize) -> Vec<(Syntax, Cow<'static, str>)> {
        let count = self.width();
        if count == 0 {
            return Vec::new();
        }

        let natural: Vec<usize> = (0..count)
            .map(|i| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.width())
                    .max()
                    .unwrap_or(0)
                    .max(1)
            })
            .collect();

        // each cell has a space of padding on either side plus a border.
        let budget = sizing::columns_for_width(columns, settings.width_percent).saturating_sub(3 * count + 1);
        let widths = if settings.word_wrap {
            shrink(natural, budget)
        } else {
            natural
        };

        let mut output = Vec::new();
        border(&mut output, &widths, '┌', '┬', '┐');

        for (r, row) in self
            .rows
            .iter()
            .enumerate()
        {
            let cells: Vec<Vec<String>> = widths
                .iter()
                .enumerate()
                .map(|(i, width)| {
                    let text = row
                        .get(i)
                        .map(String::as_str)
                        .unwrap_or("");
                    if settings.word_wrap {
                        wrap(text, *width, settings.wrap_on_word_boundary)
                    } else {
                        vec![text.to_string()]
                    }
                })
                .collect();

            let height = cells
                .iter()
                .map(Vec::len)
                .max()
                .unwrap_or(1);
            let syntax = if r < self.header {
                Syntax::TableHeader
            } else {
                Syntax::Neutral
            };

            for line in 0..height {
                output.push((Syntax::TableBorder, Cow::Borrowed("│")));
                for (i, width) in widths
                    .iter()
                    .enumerate()
                {
                    let text = cells[i]
                        .get(line)
                        .map(String::as_str)
                        .unwrap_or("");
                    let justify = self
                        .justify
                        .get(i)
                        .copied()
                        .unwrap_or(Justify::Left);

                    let (left, right) = pad(text.width(), *width, justify);
                    output.push((Syntax::Neutral, Cow::Owned(" ".repeat(left + 1))));
                    output.push((syntax, Cow::Owned(text.to_string())));
                    output.push((Syntax::Neutral, Cow::Owned(" ".repeat(right + 1))));
                    output.push((Syntax::TableBorder, Cow::Borrowed("│")));
                }
                output.push((Syntax::Neutral, Cow::Borrowed("\n")));
            }

            if r + 1 == self.header && self.rows.len() > self.header {
                border(&mut output, &widths, '├', '┼', '┤');
            }
        }

        border(&mut output, &widths, '└', '┴', '┘');
        output
    }
}

fn border(output: &mut Vec<(Syntax, Cow<'static, str>)>, widths: &[usize], left: char, middle: char, right: char) {
    let mut line = String::new();
    line.push(left);
    for (i, width) in widths
        .iter()
        .enumerate()
    {
        if i > 0 {
            line.push(middle);
        }
        line.push_str(&"─".repeat(width + 2));
    }
    line.push(right);

    output.push((Syntax::TableBorder, Cow::Owned(line)));
    output.push((Syntax::Neutral, Cow::Borrowed("\n")));
}

fn pad(used: usize, width: usize, justify: Justify) -> (usize, usize) {
    let slack = width.saturating_sub(used);
    match justify {
        Justify::Left => (0, slack),
        Justify::Right => (slack, 0),
        Justify::Center => (slack / 2, slack - slack / 2),
    }
}

/// Narrow column widths until they fit the budget, always taking from the
/// widest column. Columns don't go below three characters unless the
/// budget leaves no choice.
pub fn shrink(mut widths: Vec<usize>, budget: usize) -> Vec<usize> {
    let floor = if budget >= 3 * widths.len() { 3 } else { 1 };

    while widths
        .iter()
        .sum::<usize>()
        > budget
    {
        let Some((i, widest)) = widths
            .iter()
            .copied()
            .enumerate()
            .max_by_key(|(_, width)| *width)
        else {
            break;
        };
        if widest <= floor {
            break;
        }
        widths[i] = widest - 1;
    }
    widths
}

/// Break text into lines no wider than width. On word boundaries if asked
/// (words longer than the width are still split), otherwise anywhere.
pub fn wrap(text: &str, width: usize, on_words: bool) -> Vec<String> {
    let width = width.max(1);

    if text.width() <= width {
        return vec![text.to_string()];
    }

    if !on_words {
        return split(text, width);
    }

    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.width()
        } else {
            current.width() + 1 + word.width()
        };

        if needed <= width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if word.width() <= width {
            current.push_str(word);
        } else {
            let mut pieces = split(word, width);
            current = pieces
                .pop()
                .unwrap_or_default();
            lines.extend(pieces);
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

// hard wrap by display width, never splitting a character.
fn split(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut used = 0;

    for c in text.chars() {
        let w = c
            .width()
            .unwrap_or(0);
        if used + w > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            used = 0;
        }
        current.push(c);
        used += w;
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod check {
    use super::*;
    use crate::formatting::Identity;
    use crate::rendering;

    #[test]
    fn wrapping_on_words() {
        assert_eq!(wrap("the quick brown fox", 10, true), vec!["the quick", "brown fox"]);
        assert_eq!(wrap("short", 10, true), vec!["short"]);
        assert_eq!(wrap("abcdefghij klm", 4, true), vec!["abcd", "efgh", "ij", "klm"]);
    }

    #[test]
    fn wrapping_anywhere() {
        assert_eq!(wrap("the quick brown", 6, false), vec!["the qu", "ick br", "own"]);
    }

    #[test]
    fn wide_characters_counted_by_width() {
        assert_eq!(wrap("日本語です", 4, false), vec!["日本", "語で", "す"]);
    }

    #[test]
    fn shrinking_takes_from_widest() {
        assert_eq!(shrink(vec![10, 4, 6], 20), vec![10, 4, 6]);
        assert_eq!(shrink(vec![10, 4, 6], 16), vec![6, 4, 6]);
        assert_eq!(shrink(vec![10, 10], 4), vec![2, 2]);
    }

    #[test]
    fn table_layout() {
        let table = Table {
            justify: vec![Justify::Left, Justify::Right],
            rows: vec![
                vec!["Name".to_string(), "Qty".to_string()],
                vec!["apple".to_string(), "3".to_string()],
            ],
            header: 1,
        };
        let settings = TableSettings {
            word_wrap: true,
            wrap_on_word_boundary: true,
            width_percent: 1.0,
        };

        let result = rendering::render(&Identity, table.fragments(&settings, 80));
        assert_eq!(
            result,
            "┌───────┬─────┐\n\
             │ Name  │ Qty │\n\
             ├───────┼─────┤\n\
             │ apple │   3 │\n\
             └───────┴─────┘\n"
        );
    }
}
