//! `{name}` placeholder templates for URLs and output paths.
//!
//! ```text
//! "blog/{slug}.html"     slug=hello  ->  "blog/hello.html"
//! "feeds/all-{lang}.xml" lang=de     ->  "feeds/all-de.xml"
//! "{{raw}}/{slug}"       slug=x      ->  "{raw}/x"
//! ```

use std::fmt;

use thiserror::Error;

use crate::core::ContentItem;

/// Template failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// Placeholder the item kind does not supply.
    #[error("template `{template}` uses `{{{variable}}}`, which {item} does not supply")]
    Render {
        template: String,
        variable: String,
        item: Box<ContentItem>,
    },

    /// Unclosed or unmatched brace, or an empty placeholder.
    #[error("malformed template `{template}` at byte {position}: {reason}")]
    Malformed {
        template: String,
        position: usize,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Var(String),
}

/// A parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl UrlTemplate {
    /// Parse `template`, resolving `{{` / `}}` escapes.
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        let malformed = |position, reason| TemplateError::Malformed {
            template: template.to_string(),
            position,
            reason,
        };

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = template.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' if chars.next_if(|(_, c)| *c == '{').is_some() => literal.push('{'),
                '}' if chars.next_if(|(_, c)| *c == '}').is_some() => literal.push('}'),
                '}' => return Err(malformed(pos, "unmatched `}`")),
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some((_, '}')) => break,
                            Some((at, '{')) => return Err(malformed(at, "nested `{`")),
                            Some((_, c)) => name.push(c),
                            None => return Err(malformed(pos, "unclosed `{`")),
                        }
                    }
                    if !is_variable_name(&name) {
                        return Err(malformed(pos, "placeholder name must be [A-Za-z0-9_]+"));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Var(name));
                }
                c => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: template.to_string(),
            segments,
        })
    }

    /// The template as written.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Placeholder names in order of appearance.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Var(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Substitute `vars` verbatim; `item` is named in the error when a
    /// placeholder has no value.
    pub fn render(&self, vars: &[(&str, &str)], item: &ContentItem) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.source.len() + 16);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Var(name) => {
                    let value = vars
                        .iter()
                        .find(|(var, _)| var == name)
                        .map(|(_, value)| *value)
                        .ok_or_else(|| TemplateError::Render {
                            template: self.source.clone(),
                            variable: name.clone(),
                            item: Box::new(item.clone()),
                        })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

impl fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn is_variable_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
