//! # Prose Rendering
//!
//! Flattens markdown into styled lines the terminal view can print directly.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// Visual role of a prose line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProseStyle {
    Heading,
    Paragraph,
    Bullet,
    Code,
    Rule,
    Blank,
}

/// One printable line of formatted prose
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProseLine {
    pub style: ProseStyle,
    pub text: String,
}

impl ProseLine {
    fn new(style: ProseStyle, text: impl Into<String>) -> Self {
        Self {
            style,
            text: text.into(),
        }
    }

    fn blank() -> Self {
        Self::new(ProseStyle::Blank, "")
    }
}

/// Render markdown text into prose lines
pub fn render_prose(markdown: &str) -> Vec<ProseLine> {
    let parser = Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH);
    let mut builder = ProseBuilder::default();
    for event in parser {
        builder.handle_event(event);
    }
    builder.finish()
}

#[derive(Default)]
struct ProseBuilder {
    lines: Vec<ProseLine>,
    current: String,
    style: Option<ProseStyle>,
    list_stack: Vec<Option<u64>>,
    in_code_block: bool,
}

impl ProseBuilder {
    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.push_text(&text),
            Event::Code(code) => {
                self.current.push('`');
                self.current.push_str(&code);
                self.current.push('`');
            }
            Event::Html(html) | Event::InlineHtml(html) => self.push_text(&html),
            Event::SoftBreak => self.current.push(' '),
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.flush();
                self.lines.push(ProseLine::new(ProseStyle::Rule, ""));
            }
            _ => {}
        }
    }

    fn start_tag(&mut self, tag: Tag) {
        match tag {
            Tag::Heading { .. } => {
                self.flush();
                self.style = Some(ProseStyle::Heading);
            }
            Tag::Paragraph => {
                if self.list_stack.is_empty() {
                    self.style = Some(ProseStyle::Paragraph);
                }
            }
            Tag::List(start) => {
                self.flush();
                self.list_stack.push(start);
            }
            Tag::Item => {
                self.flush();
                self.style = Some(ProseStyle::Bullet);
                let indent = "  ".repeat(self.list_stack.len().saturating_sub(1));
                let marker = match self.list_stack.last_mut() {
                    Some(Some(index)) => {
                        let marker = format!("{indent}{index}. ");
                        *index += 1;
                        marker
                    }
                    _ => format!("{indent}• "),
                };
                self.current.push_str(&marker);
            }
            Tag::CodeBlock(_) => {
                self.flush();
                self.in_code_block = true;
            }
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) => {
                self.flush();
                self.lines.push(ProseLine::blank());
            }
            TagEnd::Paragraph => {
                self.flush();
                if self.list_stack.is_empty() {
                    self.lines.push(ProseLine::blank());
                }
            }
            TagEnd::Item => self.flush(),
            TagEnd::List(_) => {
                self.list_stack.pop();
                if self.list_stack.is_empty() {
                    self.lines.push(ProseLine::blank());
                }
            }
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                self.lines.push(ProseLine::blank());
            }
            _ => {}
        }
    }

    fn push_text(&mut self, text: &str) {
        if self.in_code_block {
            for line in text.lines() {
                self.lines.push(ProseLine::new(ProseStyle::Code, line));
            }
        } else {
            self.current.push_str(text);
        }
    }

    fn flush(&mut self) {
        if !self.current.trim().is_empty() {
            let style = self.style.unwrap_or(ProseStyle::Paragraph);
            self.lines.push(ProseLine::new(style, self.current.trim_end()));
        }
        self.current.clear();
    }

    fn finish(mut self) -> Vec<ProseLine> {
        self.flush();
        // Collapse blank runs and trim the ends
        let mut lines: Vec<ProseLine> = Vec::with_capacity(self.lines.len());
        for line in self.lines {
            let is_blank = line.style == ProseStyle::Blank;
            let last_blank = lines.last().map_or(true, |l| l.style == ProseStyle::Blank);
            if is_blank && last_blank {
                continue;
            }
            lines.push(line);
        }
        while lines.last().is_some_and(|l| l.style == ProseStyle::Blank) {
            lines.pop();
        }
        lines
    }
}
