use crate::types::{KeycodesError, MergeMode, Result};

/// One `file(map):modifier` element of an include chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeLink {
    /// Absent together with `map` for the "self" link
    pub file: Option<String>,
    pub map: Option<String>,
    pub modifier: Option<String>,
    /// How this link merges with the result of the links before it
    pub merge: MergeMode,
}

impl IncludeLink {
    pub fn is_self(&self) -> bool {
        self.file.is_none() && self.map.is_none()
    }

    /// Text used when reporting this link, e.g. `evdev(pc105)`
    pub fn describe(&self) -> String {
        match (&self.file, &self.map) {
            (Some(file), Some(map)) => format!("{}({})", file, map),
            (Some(file), None) => file.clone(),
            (None, Some(map)) => format!("({})", map),
            (None, None) => "(self)".to_string(),
        }
    }
}

/// `include "evdev+aliases(qwerty)"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeStmt {
    /// Original directive text, kept for labelling the included result
    pub stmt: Option<String>,
    pub links: Vec<IncludeLink>,
}

/// One element split off the front of an include specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeSpec<'a> {
    pub file: Option<String>,
    pub map: Option<String>,
    pub modifier: Option<String>,
    /// `'+'`, `'|'` or `None` at the end of the specification
    pub next_op: Option<char>,
    pub rest: Option<&'a str>,
}

/// Splits one `file(map):modifier` element off the front of `text`.
/// A leading separator yields the "self" element. Returns `None` when the
/// element is malformed.
pub fn parse_include_map(text: &str) -> Option<IncludeSpec<'_>> {
    let first = text.chars().next()?;

    if first == '+' || first == '|' {
        return Some(IncludeSpec {
            file: None,
            map: None,
            modifier: None,
            next_op: Some(first),
            rest: Some(&text[1..]),
        });
    }
    if first == '%' {
        return None;
    }

    let (element, next_op, rest) = match text.find(['+', '|']) {
        Some(pos) => (
            &text[..pos],
            text[pos..].chars().next(),
            Some(&text[pos + 1..]),
        ),
        None => (text, None, None),
    };

    let (element, modifier) = match element.split_once(':') {
        Some((element, modifier)) => (element, Some(modifier.to_string())),
        None => (element, None),
    };

    let (file, map) = match element.find('(') {
        None => (element.to_string(), None),
        Some(0) => return None,
        Some(open) => {
            let inner = &element[open + 1..];
            // the map must close the element
            let close = inner.find(')')?;
            if close + 1 != inner.len() {
                return None;
            }
            (element[..open].to_string(), Some(inner[..close].to_string()))
        }
    };

    Some(IncludeSpec {
        file: Some(file),
        map,
        modifier,
        next_op,
        rest,
    })
}

impl IncludeStmt {
    /// Builds the link chain for `text`. The first link carries `merge`;
    /// every later link carries the operator that preceded it. At most one
    /// link may be "self". Any malformed element rejects the whole directive.
    pub fn parse(text: &str, merge: MergeMode) -> Result<Self> {
        let mut links = Vec::new();
        let mut have_self = false;
        let mut merge = merge;
        let mut remaining = Some(text);

        while let Some(tail) = remaining.filter(|t| !t.is_empty()) {
            let spec = parse_include_map(tail)
                .ok_or_else(|| KeycodesError::IllegalInclude(text.to_string()))?;

            if spec.file.is_none() && spec.map.is_none() {
                if have_self {
                    return Err(KeycodesError::IllegalInclude(text.to_string()));
                }
                have_self = true;
            }

            links.push(IncludeLink {
                file: spec.file,
                map: spec.map,
                modifier: spec.modifier,
                merge,
            });

            merge = spec.next_op.map_or(MergeMode::Override, MergeMode::from_separator);
            remaining = spec.rest;
        }

        Ok(Self {
            stmt: if links.is_empty() { None } else { Some(text.to_string()) },
            links,
        })
    }

    pub fn first(&self) -> Option<&IncludeLink> {
        self.links.first()
    }
}
