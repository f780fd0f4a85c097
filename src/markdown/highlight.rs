//! Lexical syntax highlighting for fenced code blocks.
//!
//! Tokens are classified as comments, strings, numbers and keywords and
//! wrapped in `hl-*` spans; `highlight.css` gives them colors. There is no
//! grammar here, only enough lexing to make listings readable in print.

use crate::utils::html::escape;

/// Lexical rules for a family of languages.
struct Syntax {
    line_comments: &'static [&'static str],
    block_comment: Option<(&'static str, &'static str)>,
    quotes: &'static [char],
    keywords: &'static [&'static str],
}

const C_LIKE: Syntax = Syntax {
    line_comments: &["//"],
    block_comment: Some(("/*", "*/")),
    quotes: &['"', '\'', '`'],
    keywords: &[
        "as", "async", "await", "break", "case", "catch", "class", "const", "continue", "default",
        "do", "else", "enum", "export", "extends", "false", "final", "finally", "fn", "for",
        "func", "function", "if", "impl", "import", "in", "interface", "let", "loop", "match",
        "mod", "mut", "new", "null", "package", "private", "protected", "pub", "public", "return",
        "self", "static", "struct", "super", "switch", "this", "throw", "trait", "true", "try",
        "type", "typeof", "use", "var", "void", "where", "while", "yield",
    ],
};

const HASH: Syntax = Syntax {
    line_comments: &["#"],
    block_comment: None,
    quotes: &['"', '\''],
    keywords: &[
        "and", "as", "case", "class", "def", "do", "done", "elif", "else", "end", "esac", "except",
        "export", "false", "fi", "for", "from", "function", "if", "import", "in", "lambda",
        "local", "module", "None", "not", "or", "pass", "raise", "require", "return", "then",
        "True", "False", "true", "try", "unless", "while", "with", "yield",
    ],
};

const SQL: Syntax = Syntax {
    line_comments: &["--"],
    block_comment: Some(("/*", "*/")),
    quotes: &['"', '\''],
    keywords: &[
        "and", "as", "by", "create", "delete", "desc", "distinct", "do", "else", "end", "from",
        "function", "group", "having", "if", "in", "insert", "into", "is", "join", "left",
        "limit", "local", "not", "null", "on", "or", "order", "return", "select", "set", "table",
        "then", "update", "values", "where", "with",
    ],
};

const PLAIN: Syntax = Syntax {
    line_comments: &[],
    block_comment: None,
    quotes: &['"'],
    keywords: &[],
};

fn syntax_for(lang: &str) -> &'static Syntax {
    match lang.to_ascii_lowercase().as_str() {
        "c" | "h" | "cpp" | "c++" | "cc" | "cs" | "csharp" | "java" | "kotlin" | "kt" | "js"
        | "javascript" | "jsx" | "ts" | "typescript" | "tsx" | "rust" | "rs" | "go" | "swift"
        | "scala" | "dart" | "php" => &C_LIKE,
        "python" | "py" | "sh" | "bash" | "zsh" | "shell" | "ruby" | "rb" | "yaml" | "yml"
        | "toml" | "perl" | "r" | "make" | "makefile" | "dockerfile" | "elixir" => &HASH,
        "sql" | "lua" | "haskell" | "hs" => &SQL,
        _ => &PLAIN,
    }
}

/// Language name from a fence info string (`rust,ignore` -> `rust`).
pub fn fence_language(info: &str) -> &str {
    info.split(|c: char| c.is_whitespace() || c == ',')
        .next()
        .unwrap_or_default()
}

/// Render a highlighted `<pre><code>` block.
pub fn render_block(lang: &str, code: &str) -> String {
    format!(
        "<pre><code class=\"language-{} hl\">{}</code></pre>\n",
        escape(lang),
        highlight(lang, code)
    )
}

/// Highlight `code` as `lang`, returning escaped markup.
pub fn highlight(lang: &str, code: &str) -> String {
    let syntax = syntax_for(lang);
    let mut out = String::with_capacity(code.len() * 2);
    let mut rest = code;

    while let Some(c) = rest.chars().next() {
        let (class, len) = next_token(syntax, rest, c);
        let (token, tail) = rest.split_at(len);
        match class {
            Some(class) => {
                out.push_str("<span class=\"hl-");
                out.push_str(class);
                out.push_str("\">");
                out.push_str(&escape(token));
                out.push_str("</span>");
            }
            None => out.push_str(&escape(token)),
        }
        rest = tail;
    }

    out
}

/// Classify the token at the start of `rest` and return its byte length.
fn next_token(syntax: &Syntax, rest: &str, first: char) -> (Option<&'static str>, usize) {
    if let Some(marker) = syntax.line_comments.iter().find(|m| rest.starts_with(**m)) {
        let end = rest.find('\n').unwrap_or(rest.len());
        return (Some("comment"), end.max(marker.len()));
    }

    if let Some((open, close)) = syntax.block_comment
        && rest.starts_with(open)
    {
        let end = rest[open.len()..]
            .find(close)
            .map_or(rest.len(), |i| open.len() + i + close.len());
        return (Some("comment"), end);
    }

    if syntax.quotes.contains(&first) {
        return (Some("string"), string_len(rest, first));
    }

    if first.is_ascii_digit() {
        let end = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '.'))
            .unwrap_or(rest.len());
        return (Some("number"), end);
    }

    if first.is_alphabetic() || first == '_' {
        let end = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        let word = &rest[..end];
        let class = syntax.keywords.contains(&word).then_some("keyword");
        return (class, end);
    }

    (None, first.len_utf8())
}

/// Length of a quoted string starting at `rest`, honoring backslash escapes.
/// Unterminated strings run to the end of the line.
fn string_len(rest: &str, quote: char) -> usize {
    let mut escaped = false;
    for (i, c) in rest.char_indices().skip(1) {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '\n' => return i,
            c if c == quote => return i + c.len_utf8(),
            _ => {}
        }
    }
    rest.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rust_tokens() {
        let out = highlight("rust", "let x = 42; // answer");
        assert_eq!(
            out,
            concat!(
                "<span class=\"hl-keyword\">let</span> x = ",
                "<span class=\"hl-number\">42</span>; ",
                "<span class=\"hl-comment\">// answer</span>",
            )
        );
    }

    #[test]
    fn test_strings_are_escaped_and_honor_escapes() {
        let out = highlight("js", r#"f("<a \"b\">")"#);
        assert_eq!(
            out,
            "f(<span class=\"hl-string\">&quot;&lt;a \\&quot;b\\&quot;&gt;&quot;</span>)"
        );
    }

    #[test]
    fn test_hash_comments() {
        let out = highlight("python", "def f():  # doc\n    pass");
        assert!(out.starts_with("<span class=\"hl-keyword\">def</span> f():  "));
        assert!(out.contains("<span class=\"hl-comment\"># doc</span>\n"));
        assert!(out.ends_with("<span class=\"hl-keyword\">pass</span>"));
    }

    #[test]
    fn test_block_comment_spans_lines() {
        let out = highlight("c", "/* a\n b */ int");
        assert_eq!(out, "<span class=\"hl-comment\">/* a\n b */</span> int");
    }

    #[test]
    fn test_keywords_inside_identifiers_are_plain() {
        assert_eq!(highlight("rust", "letter"), "letter");
    }

    #[test]
    fn test_unknown_language_only_marks_strings_and_numbers() {
        let out = highlight("brainfuck", "if 1 \"s\"");
        assert_eq!(
            out,
            "if <span class=\"hl-number\">1</span> <span class=\"hl-string\">&quot;s&quot;</span>"
        );
    }

    #[test]
    fn test_unterminated_string_stops_at_newline() {
        let out = highlight("js", "'open\nnext");
        assert_eq!(out, "<span class=\"hl-string\">&#39;open</span>\nnext");
    }

    #[test]
    fn test_fence_language() {
        assert_eq!(fence_language("rust"), "rust");
        assert_eq!(fence_language("rust,ignore"), "rust");
        assert_eq!(fence_language("python title=x"), "python");
        assert_eq!(fence_language(""), "");
    }
}
