//! Column name templates such as `a_due(x{life})[n{term_id}]`
//!
//! A template is literal text with `{name}` placeholders (`{{` and `}}` are
//! literal braces). The same template renders a concrete column name from
//! parameters and recognises a concrete name, recovering the parameter text.
//!
//! Matching is anchored and case-sensitive. Each placeholder captures a
//! non-empty substring, as short as possible while still letting the whole
//! name match, so `a(x{life})` accepts `a(x12)` but also `a(x1)(x2)` with
//! `life = "1)(x2"`. The registry relies on registration order to keep such
//! overlaps from biting.

use super::params::{ParamValue, Params};
use crate::error::{CalcError, CalcResult};
use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

#[derive(Debug, Clone)]
pub struct NameTemplate {
    text: String,
    segments: Vec<Segment>,
    pattern: Regex,
}

impl NameTemplate {
    pub fn parse(text: &str) -> CalcResult<Self> {
        let segments = segments(text)?;

        let mut seen: Vec<&str> = Vec::new();
        let mut pattern = String::from("^");
        for segment in &segments {
            match segment {
                Segment::Literal(literal) => pattern.push_str(&regex::escape(literal)),
                Segment::Placeholder(name) => {
                    if seen.contains(&name.as_str()) {
                        return Err(invalid(text, format!("placeholder {{{}}} appears twice", name)));
                    }
                    seen.push(name);
                    pattern.push_str(&format!("(?P<{}>.+?)", name));
                }
            }
        }
        pattern.push('$');

        let pattern = Regex::new(&format!("(?s){}", pattern))
            .map_err(|e| invalid(text, e.to_string()))?;

        Ok(Self {
            text: text.to_string(),
            segments,
            pattern,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Placeholder names in declaration order
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// True when the template has no placeholders
    pub fn is_literal(&self) -> bool {
        self.placeholders().next().is_none()
    }

    /// Substitute `params` into the template
    pub fn instantiate(&self, params: &Params) -> CalcResult<String> {
        fill(&self.text, &self.segments, params)
    }

    /// Recover placeholder values from a concrete column name
    pub fn try_parse(&self, name: &str) -> Option<Params> {
        let captures = self.pattern.captures(name)?;
        Some(
            self.placeholders()
                .filter_map(|placeholder| {
                    captures
                        .name(placeholder)
                        .map(|m| (placeholder, ParamValue::Text(m.as_str().to_string())))
                })
                .collect(),
        )
    }
}

impl PartialEq for NameTemplate {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

/// Render `template` with `params` without building a matcher.
///
/// Formula code uses this to name the columns it reads.
pub fn render(template: &str, params: &Params) -> CalcResult<String> {
    fill(template, &segments(template)?, params)
}

fn fill(template: &str, segments: &[Segment], params: &Params) -> CalcResult<String> {
    let mut name = String::with_capacity(template.len());
    for segment in segments {
        match segment {
            Segment::Literal(literal) => name.push_str(literal),
            Segment::Placeholder(placeholder) => {
                let value = params
                    .get(placeholder)
                    .ok_or_else(|| CalcError::MissingPlaceholder {
                        template: template.to_string(),
                        placeholder: placeholder.clone(),
                    })?;
                name.push_str(&value.to_string());
            }
        }
    }
    Ok(name)
}

fn segments(text: &str) -> CalcResult<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                literal.push('}');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) => name.push(ch),
                        None => return Err(invalid(text, "unclosed placeholder")),
                    }
                }
                if !is_identifier(&name) {
                    return Err(invalid(text, format!("bad placeholder name {:?}", name)));
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Placeholder(name));
            }
            '}' => return Err(invalid(text, "unmatched '}'")),
            other => literal.push(other),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn invalid(template: &str, reason: impl Into<String>) -> CalcError {
    CalcError::InvalidTemplate {
        template: template.to_string(),
        reason: reason.into(),
    }
}
