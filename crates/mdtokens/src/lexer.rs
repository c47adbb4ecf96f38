//! Markdown lexing.
//!
//! The [`Lexer`] trait turns Markdown source into the flat token sequence of
//! [`mdtokens_core::Token`]. [`MarkdownLexer`] is the default implementation,
//! built on `pulldown-cmark`: the parser's nested event stream is walked once
//! and flattened into block tokens, with container blocks (lists, items,
//! blockquotes) expressed as start/end token pairs.

use std::ops::Range;

use mdtokens_core::{Align, Token};
use pulldown_cmark::{Alignment, CodeBlockKind, Event, Parser, Tag, TagEnd};
use thiserror::Error;

use crate::config::LexOptions;

/// Error type for lexing failures.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct LexError {
    pub message: String,
}

impl LexError {
    pub fn new(message: impl Into<String>) -> Self {
        LexError {
            message: message.into(),
        }
    }
}

/// Converts Markdown source text into block tokens.
///
/// Implementations must be deterministic: the same text always produces the
/// same token sequence.
pub trait Lexer {
    fn lex(&self, text: &str) -> Result<Vec<Token>, LexError>;
}

/// The default lexer, backed by `pulldown-cmark`.
///
/// Every string is valid CommonMark, so this lexer never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownLexer {
    options: LexOptions,
}

impl MarkdownLexer {
    pub fn new(options: LexOptions) -> Self {
        MarkdownLexer { options }
    }

    pub fn options(&self) -> &LexOptions {
        &self.options
    }
}

impl Lexer for MarkdownLexer {
    fn lex(&self, text: &str) -> Result<Vec<Token>, LexError> {
        let events = Parser::new_ext(text, self.options.to_parser_options())
            .into_offset_iter()
            .collect();
        let mut flattener = Flattener {
            source: text,
            events,
            pos: 0,
            tokens: Vec::new(),
        };
        flattener.run();
        Ok(flattener.tokens)
    }
}

/// What the next event starts, for dispatch inside list items.
enum Next {
    Inline,
    TaskMarker,
    End,
    Block,
    Done,
}

/// Walks the parser events, emitting tokens in document order.
struct Flattener<'a> {
    source: &'a str,
    events: Vec<(Event<'a>, Range<usize>)>,
    pos: usize,
    tokens: Vec<Token>,
}

impl<'a> Flattener<'a> {
    fn run(&mut self) {
        while self.pos < self.events.len() {
            self.block();
        }
    }

    fn advance(&mut self) -> Option<(Event<'a>, Range<usize>)> {
        let item = self.events.get(self.pos).cloned();
        if item.is_some() {
            self.pos += 1;
        }
        item
    }

    fn peek(&self) -> Option<&Event<'a>> {
        self.events.get(self.pos).map(|(event, _)| event)
    }

    /// Consume one block-level event together with everything it contains.
    fn block(&mut self) {
        let Some((event, _)) = self.advance() else {
            return;
        };

        match event {
            Event::Start(Tag::Paragraph) => {
                let text = self.inline_until_end();
                self.tokens.push(Token::Paragraph { text });
            }
            Event::Start(Tag::Heading { level, .. }) => {
                let text = self.inline_until_end();
                self.tokens.push(Token::Heading {
                    depth: level as u8,
                    text,
                });
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().map(str::to_string)
                    }
                    CodeBlockKind::Indented => None,
                };
                let text = self.raw_until_end();
                self.tokens.push(Token::Code {
                    lang,
                    text: text.trim_end_matches('\n').to_string(),
                });
            }
            Event::Start(Tag::HtmlBlock) => {
                let text = self.raw_until_end();
                self.push_html(&text);
            }
            Event::Html(html) => self.push_html(&html),
            Event::Rule => self.tokens.push(Token::Hr),
            Event::Start(Tag::BlockQuote(_)) => {
                self.tokens.push(Token::BlockquoteStart);
                self.blocks_until_end();
                self.tokens.push(Token::BlockquoteEnd);
            }
            Event::Start(Tag::List(start)) => {
                self.tokens.push(Token::ListStart {
                    ordered: start.is_some(),
                    start,
                });
                self.list();
                self.tokens.push(Token::ListEnd);
            }
            Event::Start(Tag::Item) => self.item(),
            Event::Start(Tag::Table(alignments)) => self.table(&alignments),
            event if is_inline(&event) => {
                // Inline content outside a paragraph, e.g. the title of a
                // definition list entry.
                self.pos -= 1;
                let text = self.inline_run();
                if !text.is_empty() {
                    self.tokens.push(Token::Text { text });
                }
            }
            Event::Start(_) => self.blocks_until_end(),
            _ => {}
        }
    }

    /// Emit nested blocks until the end of the current container.
    fn blocks_until_end(&mut self) {
        loop {
            match self.peek() {
                None => return,
                Some(Event::End(_)) => {
                    self.pos += 1;
                    return;
                }
                Some(_) => self.block(),
            }
        }
    }

    fn list(&mut self) {
        loop {
            match self.advance() {
                None | Some((Event::End(_), _)) => return,
                Some((Event::Start(Tag::Item), _)) => self.item(),
                Some(_) => {}
            }
        }
    }

    /// Emit one list item; the `Start(Item)` event has been consumed.
    fn item(&mut self) {
        let loose = self.item_is_loose();
        let checked = self.item_checked();
        self.tokens.push(if loose {
            Token::LooseItemStart { checked }
        } else {
            Token::ListItemStart { checked }
        });

        loop {
            let next = match self.peek() {
                None => Next::Done,
                Some(Event::End(_)) => Next::End,
                Some(Event::TaskListMarker(_)) => Next::TaskMarker,
                Some(event) if is_inline(event) => Next::Inline,
                Some(_) => Next::Block,
            };
            match next {
                Next::Done => break,
                Next::End => {
                    self.pos += 1;
                    break;
                }
                Next::TaskMarker => self.pos += 1,
                Next::Inline => {
                    let text = self.inline_run();
                    self.tokens.push(Token::Text { text });
                }
                Next::Block => self.block(),
            }
        }

        self.tokens.push(Token::ListItemEnd);
    }

    /// An item is loose when its direct children include a paragraph.
    fn item_is_loose(&self) -> bool {
        let mut depth = 0usize;
        for (event, _) in &self.events[self.pos..] {
            match event {
                Event::Start(Tag::Paragraph) if depth == 0 => return true,
                Event::Start(_) => depth += 1,
                Event::End(_) if depth == 0 => return false,
                Event::End(_) => depth -= 1,
                _ => {}
            }
        }
        false
    }

    /// The task marker is the first event of the item, or of its first paragraph.
    fn item_checked(&self) -> Option<bool> {
        let mut candidates = self.events[self.pos..].iter().map(|(event, _)| event);
        match candidates.next() {
            Some(Event::TaskListMarker(checked)) => Some(*checked),
            Some(Event::Start(Tag::Paragraph)) => match candidates.next() {
                Some(Event::TaskListMarker(checked)) => Some(*checked),
                _ => None,
            },
            _ => None,
        }
    }

    fn table(&mut self, alignments: &[Alignment]) {
        let align = alignments
            .iter()
            .map(|alignment| match alignment {
                Alignment::None => None,
                Alignment::Left => Some(Align::Left),
                Alignment::Center => Some(Align::Center),
                Alignment::Right => Some(Align::Right),
            })
            .collect();
        let mut header = Vec::new();
        let mut cells = Vec::new();
        let mut row = Vec::new();

        while let Some((event, _)) = self.advance() {
            match event {
                Event::Start(Tag::TableCell) => row.push(self.inline_until_end()),
                Event::End(TagEnd::TableHead) => header = std::mem::take(&mut row),
                Event::End(TagEnd::TableRow) => cells.push(std::mem::take(&mut row)),
                Event::End(TagEnd::Table) => break,
                _ => {}
            }
        }

        self.tokens.push(Token::Table {
            header,
            align,
            cells,
        });
    }

    fn push_html(&mut self, text: &str) {
        let text = text.trim_end_matches('\n');
        self.tokens.push(Token::Html {
            pre: is_pre_html(text),
            text: text.to_string(),
        });
    }

    /// Concatenate the literal text of a leaf block and consume its end event.
    fn raw_until_end(&mut self) -> String {
        let mut text = String::new();
        while let Some((event, _)) = self.advance() {
            match event {
                Event::End(_) => break,
                Event::Text(t) | Event::Html(t) => text.push_str(&t),
                _ => {}
            }
        }
        text
    }

    /// Collect inline text and consume the end event of the enclosing block.
    fn inline_until_end(&mut self) -> String {
        let text = self.inline_run();
        if let Some(Event::End(_)) = self.peek() {
            self.pos += 1;
        }
        text
    }

    /// Collect a run of inline events as text.
    ///
    /// Text is taken as parsed, so entities and escapes are decoded. Inline
    /// markup (emphasis, links, code spans, images) keeps its delimiters
    /// around the rendered content.
    fn inline_run(&mut self) -> String {
        let mut text = String::new();
        while self.peek().is_some_and(is_inline) {
            let Some((event, range)) = self.advance() else {
                break;
            };
            self.push_inline(&mut text, event, range);
        }
        text
    }

    fn push_inline(&mut self, text: &mut String, event: Event<'a>, range: Range<usize>) {
        match event {
            Event::Start(_) => {
                let span = self.inline_span(range);
                text.push_str(&span);
            }
            Event::Text(t) | Event::InlineHtml(t) => text.push_str(&t),
            Event::Code(code) => text.push_str(&self.code_span(&code, range)),
            Event::SoftBreak | Event::HardBreak => text.push('\n'),
            Event::TaskListMarker(_) | Event::End(_) => {}
            _ => text.push_str(self.slice(range)),
        }
    }

    /// Render an inline tag whose `Start` event has been consumed.
    ///
    /// The opening and closing delimiters are the source between the tag's
    /// bounds and its first and last children; the children are rendered
    /// recursively, so container prefixes on continuation lines are dropped.
    fn inline_span(&mut self, range: Range<usize>) -> String {
        let mut inner = String::new();
        let mut children: Option<Range<usize>> = None;

        while let Some((event, child)) = self.advance() {
            if let Event::End(_) = event {
                break;
            }
            children = Some(match children {
                Some(c) => c.start.min(child.start)..c.end.max(child.end),
                None => child.clone(),
            });
            self.push_inline(&mut inner, event, child);
        }

        let delimiters = children.and_then(|c| {
            let open = self.source.get(range.start..c.start)?;
            let close = self.source.get(c.end..range.end)?;
            Some((open, close))
        });
        match delimiters {
            Some((open, close)) => format!("{open}{inner}{close}"),
            None => self.slice(range).to_string(),
        }
    }

    /// A code span with its original backtick fence; line endings inside the
    /// span have already been normalized by the parser.
    fn code_span(&self, code: &str, range: Range<usize>) -> String {
        let fence: String = self.slice(range).chars().take_while(|c| *c == '`').collect();
        let fence = if fence.is_empty() { "`".to_string() } else { fence };
        let pad = if code.starts_with('`') || code.ends_with('`') {
            " "
        } else {
            ""
        };
        format!("{fence}{pad}{code}{pad}{fence}")
    }

    fn slice(&self, range: Range<usize>) -> &'a str {
        self.source.get(range).unwrap_or_default()
    }
}

fn is_inline_tag(tag: &Tag<'_>) -> bool {
    matches!(
        tag,
        Tag::Emphasis | Tag::Strong | Tag::Strikethrough | Tag::Link { .. } | Tag::Image { .. }
    )
}

fn is_inline(event: &Event<'_>) -> bool {
    match event {
        Event::Start(tag) => is_inline_tag(tag),
        Event::Text(_)
        | Event::Code(_)
        | Event::InlineHtml(_)
        | Event::InlineMath(_)
        | Event::DisplayMath(_)
        | Event::FootnoteReference(_)
        | Event::SoftBreak
        | Event::HardBreak
        | Event::TaskListMarker(_) => true,
        _ => false,
    }
}

fn is_pre_html(text: &str) -> bool {
    let lower = text.trim_start().to_ascii_lowercase();
    ["<pre", "<script", "<style"].iter().any(|tag| {
        lower
            .strip_prefix(tag)
            .is_some_and(|rest| rest.starts_with(['>', ' ', '\t', '\n', '/']) || rest.is_empty())
    })
}
