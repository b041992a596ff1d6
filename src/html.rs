use super::*;

/// Elements whose body is raw text up to the matching end tag.
const RAW_TEXT_TAGS: &[&str] = &["script", "style", "textarea", "title"];

/// Start tags that close an open `<p>`.
const PARAGRAPH_CLOSERS: &[&str] = &[
    "address", "article", "aside", "blockquote", "details", "div", "dl", "fieldset", "footer",
    "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "main", "nav", "ol", "p", "pre",
    "section", "table", "ul",
];

pub(crate) fn is_void_tag(tag: &str) -> bool {
    matches!(
        tag,
        "area" | "base" | "br" | "col" | "embed" | "hr" | "img" | "input" | "link" | "meta"
            | "source" | "track" | "wbr"
    )
}

fn parse_error(message: &str) -> Error {
    Error::HtmlParse(message.to_string())
}

pub(crate) fn parse_html(source: &str) -> Result<Dom> {
    let mut tokens = Tokenizer { src: source, pos: 0 };
    let mut tree = TreeBuilder::new();

    while let Some(token) = tokens.next_token()? {
        match token {
            Token::Ignored => {}
            Token::Text(text) => tree.text(text),
            Token::End(name) => tree.close(&name),
            Token::Start {
                name,
                attrs,
                self_closing,
            } => {
                tree.close_implied(&name);
                let parent = tree.current();
                let node = tree.dom.create_element(parent, name.clone(), attrs);
                if self_closing || is_void_tag(&name) {
                    continue;
                }
                if !RAW_TEXT_TAGS.contains(&name.as_str()) {
                    tree.open.push(node);
                    continue;
                }
                let body = tokens.raw_text(&name)?;
                if !body.is_empty() {
                    let text = match name.as_str() {
                        "script" | "style" => body.to_string(),
                        _ => decode_entities(body),
                    };
                    tree.dom.create_text(node, text);
                }
            }
        }
    }

    let mut dom = tree.dom;
    dom.rebuild_id_index();
    dom.initialize_form_control_values()?;
    Ok(dom)
}

#[derive(Debug)]
enum Token {
    Start {
        name: String,
        attrs: HashMap<String, String>,
        self_closing: bool,
    },
    End(String),
    Text(String),
    /// Comments and declarations.
    Ignored,
}

struct Tokenizer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_whitespace()).len();
    }

    fn take_while(&mut self, accept: fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest.find(|c: char| !accept(c)).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        let rest = self.rest();
        if rest.is_empty() {
            return Ok(None);
        }
        if let Some(body) = rest.strip_prefix("<!--") {
            let end = body
                .find("-->")
                .ok_or_else(|| parse_error("unclosed HTML comment"))?;
            self.pos += "<!--".len() + end + "-->".len();
            return Ok(Some(Token::Ignored));
        }
        if rest.starts_with("</") {
            return self.end_tag().map(|name| Some(Token::End(name)));
        }
        if rest.starts_with("<!") {
            self.declaration()?;
            return Ok(Some(Token::Ignored));
        }
        if rest.starts_with('<') {
            return self.start_tag().map(Some);
        }

        let len = rest.find('<').unwrap_or(rest.len());
        self.pos += len;
        Ok(Some(Token::Text(decode_entities(&rest[..len]))))
    }

    fn start_tag(&mut self) -> Result<Token> {
        self.pos += 1;
        self.skip_whitespace();
        let name = self.take_while(is_tag_char).to_ascii_lowercase();
        if name.is_empty() {
            return Err(parse_error("empty tag name"));
        }

        let mut attrs = HashMap::new();
        loop {
            self.skip_whitespace();
            let rest = self.rest();
            let self_closing = rest.starts_with("/>");
            if self_closing || rest.starts_with('>') {
                self.pos += if self_closing { 2 } else { 1 };
                return Ok(Token::Start {
                    name,
                    attrs,
                    self_closing,
                });
            }
            if rest.is_empty() {
                return Err(parse_error("unclosed start tag"));
            }

            let attr_name = self.take_while(is_attr_name_char).to_ascii_lowercase();
            if attr_name.is_empty() {
                // Junk up to the next boundary is dropped, as browsers do.
                self.pos += unquoted_len(rest).max(1);
                continue;
            }
            self.skip_whitespace();
            let value = if self.rest().starts_with('=') {
                self.pos += 1;
                self.skip_whitespace();
                self.attr_value()?
            } else {
                String::new()
            };
            // First occurrence wins.
            attrs.entry(attr_name).or_insert(value);
        }
    }

    fn attr_value(&mut self) -> Result<String> {
        let rest = self.rest();
        match rest.chars().next() {
            None => Err(parse_error("missing attribute value")),
            Some(quote @ ('"' | '\'')) => {
                let body = &rest[1..];
                let end = body
                    .find(quote)
                    .ok_or_else(|| parse_error("unclosed quoted attribute value"))?;
                self.pos += end + 2;
                Ok(decode_entities(&body[..end]))
            }
            Some(_) => {
                let len = unquoted_len(rest);
                self.pos += len;
                Ok(decode_entities(&rest[..len]))
            }
        }
    }

    fn end_tag(&mut self) -> Result<String> {
        self.pos += "</".len();
        self.skip_whitespace();
        let name = self.take_while(is_tag_char).to_ascii_lowercase();
        let close = self
            .rest()
            .find('>')
            .ok_or_else(|| parse_error("unclosed end tag"))?;
        self.pos += close + 1;
        Ok(name)
    }

    /// Skips `<!DOCTYPE ...>` and friends, honouring quotes and `[...]` subsets.
    fn declaration(&mut self) -> Result<()> {
        let mut quote = None;
        let mut depth = 0usize;
        for (offset, ch) in self.rest().char_indices().skip(2) {
            match (quote, ch) {
                (Some(open), _) if ch == open => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'') => quote = Some(ch),
                (None, '[') => depth += 1,
                (None, ']') => depth = depth.saturating_sub(1),
                (None, '>') if depth == 0 => {
                    self.pos += offset + 1;
                    return Ok(());
                }
                (None, _) => {}
            }
        }
        Err(parse_error("unclosed declaration tag"))
    }

    /// Returns the body of a raw-text element and consumes its end tag.
    fn raw_text(&mut self, tag: &str) -> Result<&'a str> {
        let rest = self.rest();
        let lowered = rest.to_ascii_lowercase();
        let needle = format!("</{tag}");
        let mut from = 0;
        let body_len = loop {
            let at = lowered[from..]
                .find(&needle)
                .map(|found| from + found)
                .ok_or_else(|| Error::HtmlParse(format!("unclosed <{tag}>")))?;
            from = at + needle.len();
            if !lowered[from..].starts_with(|c: char| c.is_ascii_alphanumeric()) {
                break at;
            }
        };
        self.pos += body_len;
        self.end_tag()?;
        Ok(&rest[..body_len])
    }
}

/// Length of an unquoted attribute value or junk token.
fn unquoted_len(rest: &str) -> usize {
    rest.char_indices()
        .find(|(at, c)| c.is_ascii_whitespace() || *c == '>' || rest[*at..].starts_with("/>"))
        .map_or(rest.len(), |(at, _)| at)
}

fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn is_attr_name_char(c: char) -> bool {
    is_tag_char(c) || c == ':'
}

struct TreeBuilder {
    dom: Dom,
    /// Open elements, with the document at the bottom.
    open: Vec<NodeId>,
}

impl TreeBuilder {
    fn new() -> Self {
        let dom = Dom::new();
        let open = vec![dom.root];
        Self { dom, open }
    }

    fn current(&self) -> NodeId {
        self.open.last().copied().unwrap_or(self.dom.root)
    }

    fn text(&mut self, text: String) {
        if !text.is_empty() {
            let parent = self.current();
            self.dom.create_text(parent, text);
        }
    }

    /// Pops back to the nearest open `name`; stray end tags are ignored.
    fn close(&mut self, name: &str) {
        if let Some(at) = self.open.iter().rposition(|node| self.dom.is_tag(*node, name)) {
            if at > 0 {
                self.open.truncate(at);
            }
        }
    }

    /// Implied end tags for `li`, `option`, `optgroup` and `p`.
    fn close_implied(&mut self, name: &str) {
        let (closes, boundaries): (&[&str], &[&str]) = match name {
            "li" => (&["li"], &["ol", "ul", "menu"]),
            "option" => (&["option"], &["optgroup", "select", "datalist"]),
            "optgroup" => (&["option", "optgroup"], &["select"]),
            _ if PARAGRAPH_CLOSERS.contains(&name) => (&["p"], &[]),
            _ => return,
        };

        for at in (1..self.open.len()).rev() {
            let Some(open_tag) = self.dom.tag_name(self.open[at]) else {
                continue;
            };
            if closes.contains(&open_tag) {
                self.open.truncate(at);
                return;
            }
            if boundaries.contains(&open_tag) {
                return;
            }
        }
    }
}

fn decode_entities(raw: &str) -> String {
    let mut pieces = raw.split('&');
    let mut out = pieces.next().unwrap_or_default().to_string();
    for piece in pieces {
        let decoded = piece
            .split_once(';')
            .and_then(|(name, tail)| Some((decode_reference(name)?, tail)));
        match decoded {
            Some((ch, tail)) => {
                out.push(ch);
                out.push_str(tail);
            }
            None => {
                out.push('&');
                out.push_str(piece);
            }
        }
    }
    out
}

fn decode_reference(name: &str) -> Option<char> {
    if let Some(numeric) = name.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse().ok()?,
        };
        return char::from_u32(code);
    }
    Some(match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{00A0}',
        "copy" => '©',
        "pound" => '£',
        "euro" => '€',
        "hellip" => '…',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "lsquo" => '‘',
        "rsquo" => '’',
        "ldquo" => '“',
        "rdquo" => '”',
        _ => return None,
    })
}
