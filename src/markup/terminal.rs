//! Markdown to styled terminal text

use pulldown_cmark::{Alignment as ColumnAlignment, CodeBlockKind, Event, HeadingLevel, Parser, Tag, TagEnd};
use std::borrow::Cow;

use super::table::{Justify, Table};
use crate::formatting::Syntax;
use crate::highlighting;
use crate::profile::TableSettings;

type Fragment = (Syntax, Cow<'static, str>);

/// Convert markdown into tagged fragments for a terminal of the given
/// width. Code blocks are highlighted; tables are laid out to fit.
pub fn fragments(text: &str, settings: &TableSettings, columns: usize) -> Vec<Fragment> {
    let mut writer = Writer::new(settings, columns);

    for event in Parser::new_ext(text, super::options()) {
        writer.event(event);
    }

    writer.finish()
}

struct Code {
    language: Option<String>,
    body: String,
}

struct Writer<'s> {
    settings: &'s TableSettings,
    columns: usize,
    output: Vec<Fragment>,
    styles: Vec<Syntax>,
    lists: Vec<Option<u64>>,
    quotes: usize,
    line_start: bool,
    code: Option<Code>,
    table: Option<Table>,
    cell: Option<String>,
    image: Option<String>,
    in_item: usize,
    indent: bool,
}

impl<'s> Writer<'s> {
    fn new(settings: &'s TableSettings, columns: usize) -> Writer<'s> {
        Writer {
            settings,
            columns,
            output: Vec::new(),
            styles: Vec::new(),
            lists: Vec::new(),
            quotes: 0,
            line_start: true,
            code: None,
            table: None,
            cell: None,
            image: None,
            in_item: 0,
            indent: false,
        }
    }

    fn event(&mut self, event: Event) {
        // everything inside a code block is collected for the highlighter.
        if let Some(code) = &mut self.code {
            match event {
                Event::Text(text) => code
                    .body
                    .push_str(&text),
                Event::End(TagEnd::CodeBlock) => self.code_block(),
                _ => {}
            }
            return;
        }

        // image alt text, and table cells, are gathered as plain text.
        if let Some(alt) = &mut self.image {
            match event {
                Event::Text(text) | Event::Code(text) => alt.push_str(&text),
                Event::End(TagEnd::Image) => {
                    let alt = self
                        .image
                        .take()
                        .unwrap_or_default();
                    self.push(Syntax::Link, format!("[Image: {}]", alt));
                }
                _ => {}
            }
            return;
        }

        if let Some(cell) = &mut self.cell {
            match &event {
                Event::Text(text) | Event::Code(text) => {
                    cell.push_str(text);
                    return;
                }
                Event::SoftBreak | Event::HardBreak => {
                    cell.push(' ');
                    return;
                }
                _ => {}
            }
        }

        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                let syntax = self.current();
                self.text(syntax, &text);
            }
            Event::Code(code) => self.push(Syntax::InlineCode, code.to_string()),
            Event::Html(html) | Event::InlineHtml(html) => self.text(Syntax::Neutral, &html),
            Event::SoftBreak | Event::HardBreak => self.newline(),
            Event::Rule => {
                self.blank();
                let width = self.columns.clamp(1, 80);
                self.push(Syntax::Rule, "─".repeat(width));
                self.newline();
                self.newline();
            }
            Event::TaskListMarker(done) => {
                let marker = if done { "[x] " } else { "[ ] " };
                self.push(Syntax::ListMarker, marker.to_string());
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag) {
        match tag {
            Tag::Paragraph => {}
            Tag::Heading { level, .. } => {
                self.blank();
                let hashes = "#".repeat(heading_depth(level));
                self.push(Syntax::Heading, format!("{} ", hashes));
                self.styles
                    .push(Syntax::Heading);
            }
            Tag::BlockQuote(_) => {
                self.blank();
                self.quotes += 1;
            }
            Tag::CodeBlock(kind) => {
                self.blank();
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(str::to_string),
                    CodeBlockKind::Indented => None,
                };
                self.code = Some(Code {
                    language,
                    body: String::new(),
                });
            }
            Tag::List(start) => {
                if self.lists.is_empty() {
                    self.blank();
                } else if !self.line_start {
                    self.newline();
                }
                self.lists
                    .push(start);
            }
            Tag::Item => {
                if !self.line_start {
                    self.newline();
                }
                self.in_item += 1;
                let depth = self
                    .lists
                    .len()
                    .saturating_sub(1);
                let marker = match self
                    .lists
                    .last_mut()
                {
                    Some(Some(number)) => {
                        let marker = format!("{}. ", number);
                        *number += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.push(Syntax::Neutral, "  ".repeat(depth));
                self.push(Syntax::ListMarker, marker);
            }
            Tag::Emphasis => self
                .styles
                .push(Syntax::Emphasis),
            Tag::Strong => self
                .styles
                .push(Syntax::Strong),
            Tag::Strikethrough => self
                .styles
                .push(Syntax::Strikethrough),
            Tag::Link { .. } => self
                .styles
                .push(Syntax::Link),
            Tag::Image { .. } => self.image = Some(String::new()),
            Tag::Table(alignments) => {
                self.blank();
                self.table = Some(Table {
                    justify: alignments
                        .iter()
                        .map(justify)
                        .collect(),
                    rows: Vec::new(),
                    header: 0,
                });
            }
            Tag::TableHead | Tag::TableRow => {
                if let Some(table) = &mut self.table {
                    table
                        .rows
                        .push(Vec::new());
                }
            }
            Tag::TableCell => self.cell = Some(String::new()),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.newline();
                if self.in_item == 0 {
                    self.newline();
                }
            }
            TagEnd::Heading(_) => {
                self.styles
                    .pop();
                self.newline();
                self.newline();
            }
            TagEnd::BlockQuote(_) => {
                self.quotes = self
                    .quotes
                    .saturating_sub(1);
            }
            TagEnd::List(_) => {
                self.lists
                    .pop();
                if self
                    .lists
                    .is_empty()
                {
                    self.blank();
                }
            }
            TagEnd::Item => {
                self.in_item = self
                    .in_item
                    .saturating_sub(1);
                if !self.line_start {
                    self.newline();
                }
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link => {
                self.styles
                    .pop();
            }
            TagEnd::TableHead => {
                if let Some(table) = &mut self.table {
                    table.header = table
                        .rows
                        .len();
                }
            }
            TagEnd::TableCell => {
                let cell = self
                    .cell
                    .take()
                    .unwrap_or_default();
                if let Some(row) = self
                    .table
                    .as_mut()
                    .and_then(|table| {
                        table
                            .rows
                            .last_mut()
                    })
                {
                    row.push(
                        cell.trim()
                            .to_string(),
                    );
                }
            }
            TagEnd::Table => {
                if let Some(table) = self.table.take() {
                    let fragments = table.fragments(self.settings, self.columns);
                    self.output
                        .extend(fragments);
                    self.line_start = true;
                    self.newline();
                }
            }
            _ => {}
        }
    }

    fn code_block(&mut self) {
        let Some(code) = self.code.take() else {
            return;
        };

        let language = match &code.language {
            Some(language) if !language.is_empty() => Some(language.as_str()),
            _ => highlighting::detect_language(&code.body, None),
        };

        self.indent = true;
        for (syntax, content) in highlighting::fragments(&code.body, language) {
            // indent every line of the block, including ones that start
            // partway through a fragment.
            for (i, piece) in content
                .split('\n')
                .enumerate()
            {
                if i > 0 {
                    self.newline();
                }
                if !piece.is_empty() {
                    self.push(syntax, piece.to_string());
                }
            }
        }

        self.indent = false;

        if !self.line_start {
            self.newline();
        }
        self.newline();
    }

    fn current(&self) -> Syntax {
        self.styles
            .last()
            .copied()
            .unwrap_or(Syntax::Neutral)
    }

    // text may carry embedded newlines (from inline HTML for instance).
    fn text(&mut self, syntax: Syntax, text: &str) {
        for (i, piece) in text
            .split('\n')
            .enumerate()
        {
            if i > 0 {
                self.newline();
            }
            if !piece.is_empty() {
                self.push(syntax, piece.to_string());
            }
        }
    }

    fn push(&mut self, syntax: Syntax, content: String) {
        if self.line_start {
            self.line_start = false;
            if self.quotes > 0 {
                self.output
                    .push((Syntax::Quote, Cow::Owned("│ ".repeat(self.quotes))));
            }
            if self.indent {
                self.output
                    .push((Syntax::Neutral, Cow::Borrowed("    ")));
            }
        }
        let syntax = if self.quotes > 0 && syntax == Syntax::Neutral {
            Syntax::Quote
        } else {
            syntax
        };
        self.output
            .push((syntax, Cow::Owned(content)));
    }

    fn newline(&mut self) {
        self.output
            .push((Syntax::Neutral, Cow::Borrowed("\n")));
        self.line_start = true;
    }

    // ensure there's a blank line separating what follows from what came
    // before, unless we're at the very start.
    fn blank(&mut self) {
        if self
            .output
            .is_empty()
        {
            return;
        }
        if !self.line_start {
            self.newline();
        }
        if trailing_newlines(&self.output) < 2 {
            self.newline();
        }
    }

    fn finish(mut self) -> Vec<Fragment> {
        while let Some((Syntax::Neutral, content)) = self
            .output
            .last()
        {
            if content == "\n" {
                self.output
                    .pop();
            } else {
                break;
            }
        }
        if !self
            .output
            .is_empty()
        {
            self.output
                .push((Syntax::Neutral, Cow::Borrowed("\n")));
        }
        self.output
    }
}

fn trailing_newlines(output: &[Fragment]) -> usize {
    output
        .iter()
        .rev()
        .take_while(|(_, content)| content == "\n")
        .count()
}

fn heading_depth(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn justify(alignment: &ColumnAlignment) -> Justify {
    match alignment {
        ColumnAlignment::None | ColumnAlignment::Left => Justify::Left,
        ColumnAlignment::Center => Justify::Center,
        ColumnAlignment::Right => Justify::Right,
    }
}
