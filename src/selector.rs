use super::*;

/// Attribute test inside `[...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AttrOperator {
    Exists,
    Equals(String),
    Prefix(String),
    Suffix(String),
    Substring(String),
    /// `~=`: one of the whitespace-separated tokens.
    Word(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AttrMatch {
    pub(crate) key: String,
    pub(crate) op: AttrOperator,
}

impl AttrMatch {
    pub(crate) fn matches(&self, actual: Option<&str>) -> bool {
        let Some(actual) = actual else {
            return false;
        };
        match &self.op {
            AttrOperator::Exists => true,
            AttrOperator::Equals(value) => actual == value,
            AttrOperator::Prefix(value) => actual.starts_with(value.as_str()),
            AttrOperator::Suffix(value) => actual.ends_with(value.as_str()),
            AttrOperator::Substring(value) => actual.contains(value.as_str()),
            AttrOperator::Word(value) => actual.split_ascii_whitespace().any(|t| t == value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SelectorPseudoClass {
    FirstChild,
    LastChild,
    Disabled,
    Enabled,
    Empty,
    Focus,
}

impl SelectorPseudoClass {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "first-child" => Self::FirstChild,
            "last-child" => Self::LastChild,
            "disabled" => Self::Disabled,
            "enabled" => Self::Enabled,
            "empty" => Self::Empty,
            "focus" => Self::Focus,
            _ => return None,
        })
    }
}

/// One compound selector: `tag#id.class[attr]:pseudo`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SelectorStep {
    pub(crate) tag: Option<String>,
    pub(crate) universal: bool,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attrs: Vec<AttrMatch>,
    pub(crate) pseudo_classes: Vec<SelectorPseudoClass>,
}

impl SelectorStep {
    /// `#id` and nothing else, which the DOM answers from its id index.
    pub(crate) fn id_only(&self) -> Option<&str> {
        let bare = !self.universal
            && self.tag.is_none()
            && self.classes.is_empty()
            && self.attrs.is_empty()
            && self.pseudo_classes.is_empty();
        if bare { self.id.as_deref() } else { None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SelectorCombinator {
    Descendant,
    Child,
    AdjacentSibling,
    GeneralSibling,
}

impl SelectorCombinator {
    fn from_char(ch: char) -> Option<Self> {
        match ch {
            '>' => Some(Self::Child),
            '+' => Some(Self::AdjacentSibling),
            '~' => Some(Self::GeneralSibling),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectorPart {
    pub(crate) step: SelectorStep,
    /// How this part relates to the part on its left; `None` for the first part.
    pub(crate) combinator: Option<SelectorCombinator>,
}

fn unsupported(selector: &str) -> Error {
    Error::UnsupportedSelector(selector.to_string())
}

/// Parses a comma-separated selector list.
pub(crate) fn parse_selector_groups(selector: &str) -> Result<Vec<Vec<SelectorPart>>> {
    split_outside_brackets(selector, |ch| ch == ',')?
        .iter()
        .map(|group| parse_selector_chain(group))
        .collect()
}

pub(crate) fn parse_selector_chain(selector: &str) -> Result<Vec<SelectorPart>> {
    let selector = selector.trim();
    if selector.is_empty() {
        return Err(unsupported(selector));
    }

    let mut parts: Vec<SelectorPart> = Vec::new();
    let mut pending = None;
    for token in tokenize_chain(selector)? {
        if let ChainToken::Combinator(combinator) = token {
            if pending.is_some() || parts.is_empty() {
                return Err(unsupported(selector));
            }
            pending = Some(combinator);
            continue;
        }
        let ChainToken::Compound(text) = token else {
            continue;
        };
        let combinator = if parts.is_empty() {
            None
        } else {
            Some(pending.take().unwrap_or(SelectorCombinator::Descendant))
        };
        parts.push(SelectorPart {
            step: parse_selector_step(&text)?,
            combinator,
        });
    }

    if parts.is_empty() || pending.is_some() {
        return Err(unsupported(selector));
    }
    Ok(parts)
}

enum ChainToken {
    Compound(String),
    Combinator(SelectorCombinator),
}

fn tokenize_chain(selector: &str) -> Result<Vec<ChainToken>> {
    fn flush(current: &mut String, tokens: &mut Vec<ChainToken>) {
        if !current.is_empty() {
            tokens.push(ChainToken::Compound(std::mem::take(current)));
        }
    }

    let mut tokens = Vec::new();
    let mut current = String::new();

    let mut in_brackets = false;
    let mut quote = None;
    for ch in selector.chars() {
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            current.push(ch);
            continue;
        }
        if in_brackets {
            match ch {
                '"' | '\'' => quote = Some(ch),
                ']' => in_brackets = false,
                _ => {}
            }
            current.push(ch);
            continue;
        }
        if ch == '[' {
            in_brackets = true;
            current.push(ch);
        } else if let Some(combinator) = SelectorCombinator::from_char(ch) {
            flush(&mut current, &mut tokens);
            tokens.push(ChainToken::Combinator(combinator));
        } else if ch.is_ascii_whitespace() {
            flush(&mut current, &mut tokens);
        } else {
            current.push(ch);
        }
    }
    if in_brackets || quote.is_some() {
        return Err(unsupported(selector));
    }
    flush(&mut current, &mut tokens);
    Ok(tokens)
}

/// Splits on `is_separator` characters that sit outside `[...]` and quotes.
pub(crate) fn split_outside_brackets(
    selector: &str,
    is_separator: impl Fn(char) -> bool,
) -> Result<Vec<String>> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut in_brackets = false;
    let mut quote = None;

    for ch in selector.chars() {
        match (quote, in_brackets) {
            (Some(q), _) => {
                if ch == q {
                    quote = None;
                }
            }
            (None, true) => match ch {
                '"' | '\'' => quote = Some(ch),
                ']' => in_brackets = false,
                _ => {}
            },
            (None, false) if ch == '[' => in_brackets = true,
            (None, false) if ch == ']' => return Err(unsupported(selector)),
            (None, false) if is_separator(ch) => {
                let piece = current.trim();
                if piece.is_empty() {
                    return Err(unsupported(selector));
                }
                pieces.push(piece.to_string());
                current.clear();
                continue;
            }
            (None, false) => {}
        }
        current.push(ch);
    }

    let piece = current.trim();
    if in_brackets || quote.is_some() || piece.is_empty() {
        return Err(unsupported(selector));
    }
    pieces.push(piece.to_string());
    Ok(pieces)
}

/// Scanner over one compound selector.
struct StepScanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> StepScanner<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|ch| ch.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn take_while(&mut self, accept: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&accept) {
            self.pos += self.peek().map_or(0, char::len_utf8);
        }
        &self.src[start..self.pos]
    }

    fn ident(&mut self) -> Result<String> {
        let ident = self.take_while(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
        if ident.is_empty() {
            return Err(unsupported(self.src));
        }
        Ok(ident.to_string())
    }

    fn attr_match(&mut self) -> Result<AttrMatch> {
        self.skip_whitespace();
        let key = self
            .take_while(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | ':'))
            .to_ascii_lowercase();
        if key.is_empty() {
            return Err(unsupported(self.src));
        }
        self.skip_whitespace();
        if self.eat(']') {
            return Ok(AttrMatch {
                key,
                op: AttrOperator::Exists,
            });
        }

        let make: fn(String) -> AttrOperator = match self.bump() {
            Some('=') => AttrOperator::Equals,
            Some(prefix @ ('^' | '$' | '*' | '~')) if self.eat('=') => match prefix {
                '^' => AttrOperator::Prefix,
                '$' => AttrOperator::Suffix,
                '*' => AttrOperator::Substring,
                _ => AttrOperator::Word,
            },
            _ => return Err(unsupported(self.src)),
        };
        self.skip_whitespace();
        let value = self.attr_value()?;
        self.skip_whitespace();
        if !self.eat(']') {
            return Err(unsupported(self.src));
        }
        Ok(AttrMatch {
            key,
            op: make(value),
        })
    }

    fn attr_value(&mut self) -> Result<String> {
        let quote = match self.peek() {
            Some(q @ ('"' | '\'')) => {
                self.pos += 1;
                Some(q)
            }
            Some(_) => None,
            None => return Err(unsupported(self.src)),
        };

        let mut value = String::new();
        loop {
            let Some(ch) = self.peek() else {
                return match quote {
                    Some(_) => Err(unsupported(self.src)),
                    None => Ok(value),
                };
            };
            match (quote, ch) {
                (Some(q), c) if c == q => {
                    self.pos += 1;
                    return Ok(value);
                }
                (None, c) if c == ']' || c.is_ascii_whitespace() => return Ok(value),
                (_, '\\') => {
                    self.pos += 1;
                    if let Some(escaped) = self.bump() {
                        value.push(escaped);
                    }
                }
                (_, c) => {
                    self.pos += c.len_utf8();
                    value.push(c);
                }
            }
        }
    }
}

pub(crate) fn parse_selector_step(part: &str) -> Result<SelectorStep> {
    let part = part.trim();
    if part.is_empty() {
        return Err(unsupported(part));
    }

    let mut scanner = StepScanner { src: part, pos: 0 };
    let mut step = SelectorStep::default();
    while let Some(ch) = scanner.peek() {
        match ch {
            '*' if !step.universal && step.tag.is_none() => {
                scanner.pos += 1;
                step.universal = true;
            }
            '#' => {
                scanner.pos += 1;
                if step.id.replace(scanner.ident()?).is_some() {
                    return Err(unsupported(part));
                }
            }
            '.' => {
                scanner.pos += 1;
                step.classes.push(scanner.ident()?);
            }
            '[' => {
                scanner.pos += 1;
                step.attrs.push(scanner.attr_match()?);
            }
            ':' => {
                scanner.pos += 1;
                let name = scanner.ident()?;
                let pseudo = SelectorPseudoClass::from_name(&name.to_ascii_lowercase())
                    .ok_or_else(|| unsupported(part))?;
                step.pseudo_classes.push(pseudo);
            }
            _ if scanner.pos == 0 => step.tag = Some(scanner.ident()?.to_ascii_lowercase()),
            _ => return Err(unsupported(part)),
        }
    }
    Ok(step)
}
