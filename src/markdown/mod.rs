//! Markdown to HTML conversion using `pulldown-cmark`.
//!
//! Raw HTML in the source passes through untouched, which is how the
//! caption and reference markup produced by [`crate::resolve`] reaches the
//! page.

pub mod highlight;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, html};

/// Options for markdown conversion
#[derive(Debug, Clone, Default)]
pub struct MarkdownOptions {
    /// Enable tables extension
    pub tables: bool,
    /// Enable footnotes extension
    pub footnotes: bool,
    /// Enable strikethrough extension
    pub strikethrough: bool,
    /// Enable task lists extension
    pub task_lists: bool,
    /// Enable heading attributes extension (e.g., `# Heading {#custom-id}`)
    pub heading_attributes: bool,
    /// Highlight fenced code blocks that name a language
    pub highlight: bool,
}

impl MarkdownOptions {
    /// Create options with all extensions enabled
    pub fn all() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            task_lists: true,
            heading_attributes: true,
            highlight: false,
        }
    }

    pub fn with_highlight(mut self, highlight: bool) -> Self {
        self.highlight = highlight;
        self
    }

    /// Convert to pulldown-cmark Options
    fn to_pulldown_options(&self) -> Options {
        let mut opts = Options::empty();
        if self.tables {
            opts.insert(Options::ENABLE_TABLES);
        }
        if self.footnotes {
            opts.insert(Options::ENABLE_FOOTNOTES);
        }
        if self.strikethrough {
            opts.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.task_lists {
            opts.insert(Options::ENABLE_TASKLISTS);
        }
        if self.heading_attributes {
            opts.insert(Options::ENABLE_HEADING_ATTRIBUTES);
        }
        opts
    }
}

/// Fenced code block being collected for highlighting
struct PendingCode {
    lang: String,
    code: String,
}

/// Event rewriter that swaps highlightable code blocks for rendered HTML
struct Converter<'a> {
    events: Vec<Event<'a>>,
    pending: Option<PendingCode>,
    highlight: bool,
}

impl<'a> Converter<'a> {
    fn new(highlight: bool) -> Self {
        Self {
            events: Vec::new(),
            pending: None,
            highlight,
        }
    }

    fn handle_event(&mut self, event: Event<'a>) {
        if let Some(pending) = self.pending.as_mut() {
            match event {
                Event::Text(text) => pending.code.push_str(&text),
                Event::End(TagEnd::CodeBlock) => {
                    if let Some(PendingCode { lang, code }) = self.pending.take() {
                        let html = highlight::render_block(&lang, &code);
                        self.events.push(Event::Html(CowStr::from(html)));
                    }
                }
                _ => {}
            }
            return;
        }

        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(ref info)))
                if self.highlight && !highlight::fence_language(info).is_empty() =>
            {
                self.pending = Some(PendingCode {
                    lang: highlight::fence_language(info).to_owned(),
                    code: String::new(),
                });
            }
            event => self.events.push(event),
        }
    }
}

/// Convert markdown text to an HTML fragment.
pub fn to_html(markdown: &str, options: &MarkdownOptions) -> String {
    let parser = Parser::new_ext(markdown, options.to_pulldown_options());

    let mut converter = Converter::new(options.highlight);
    for event in parser {
        converter.handle_event(event);
    }

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, converter.events.into_iter());
    out
}
