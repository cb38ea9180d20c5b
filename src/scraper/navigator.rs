//! Positional navigation over a parsed page.
//!
//! SAFER pages are table soup without ids or classes worth selecting on, so fields
//! are addressed by where they sit: `tbody/tr[11]/td[2]/font/b`. A path is a list of
//! `/`-separated element steps, each either `tag` (every child element with that
//! tag) or `tag[n]` (the n-th such child, counting from 1). Paths are relative to the
//! element the navigator wraps; the empty path addresses that element itself.

use scraper::{ElementRef, Html};

#[derive(Debug, Clone, Copy)]
struct Step<'p> {
    tag: &'p str,
    position: Option<usize>,
}

impl<'p> Step<'p> {
    fn parse(raw: &'p str) -> Self {
        match raw.split_once('[') {
            Some((tag, rest)) => Step {
                tag,
                // A malformed index selects nothing rather than everything.
                position: Some(
                    rest.strip_suffix(']')
                        .and_then(|n| n.trim().parse().ok())
                        .unwrap_or(0),
                ),
            },
            None => Step { tag: raw, position: None },
        }
    }

    fn apply<'a>(&self, parent: ElementRef<'a>, out: &mut Vec<ElementRef<'a>>) {
        let mut matching = parent
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|child| child.value().name() == self.tag);

        match self.position {
            Some(n) => out.extend(n.checked_sub(1).and_then(|i| matching.nth(i))),
            None => out.extend(matching),
        }
    }
}

fn steps(path: &str) -> impl Iterator<Item = Step<'_>> {
    path.split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Step::parse)
}

/// Direct text children of an element, trimmed, skipping whitespace-only nodes.
fn own_texts<'a>(element: ElementRef<'a>) -> impl Iterator<Item = &'a str> {
    element
        .children()
        .filter_map(|node| node.value().as_text())
        .map(|text| text.trim())
        .filter(|text| !text.is_empty())
}

#[derive(Debug, Clone, Copy)]
pub struct Navigator<'a> {
    root: ElementRef<'a>,
}

impl<'a> Navigator<'a> {
    pub fn new(root: ElementRef<'a>) -> Self {
        Self { root }
    }

    /// Navigator rooted at the `<html>` element, so paths start with `head` or `body`.
    pub fn document(doc: &'a Html) -> Self {
        Self::new(doc.root_element())
    }

    pub fn element(&self) -> ElementRef<'a> {
        self.root
    }

    pub fn find_all(&self, path: &str) -> Vec<ElementRef<'a>> {
        let mut current = vec![self.root];
        for step in steps(path) {
            let mut next = Vec::new();
            for element in current {
                step.apply(element, &mut next);
            }
            if next.is_empty() {
                return next;
            }
            current = next;
        }
        current
    }

    pub fn find_one(&self, path: &str) -> Option<ElementRef<'a>> {
        self.find_all(path).into_iter().next()
    }

    /// Navigator for the first element at `path`.
    pub fn at(&self, path: &str) -> Option<Navigator<'a>> {
        self.find_one(path).map(Navigator::new)
    }

    /// First text under the elements at `path`, or "" when there is none.
    pub fn text(&self, path: &str) -> String {
        self.find_all(path)
            .into_iter()
            .flat_map(own_texts)
            .next()
            .map(str::to_string)
            .unwrap_or_default()
    }

    /// Every text under the elements at `path`, in document order.
    pub fn texts(&self, path: &str) -> Vec<String> {
        self.find_all(path)
            .into_iter()
            .flat_map(own_texts)
            .map(str::to_string)
            .collect()
    }

    /// Attribute of the first element at `path`, trimmed, or "".
    pub fn attr(&self, path: &str, name: &str) -> String {
        self.find_one(path)
            .and_then(|el| el.value().attr(name))
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    }
}
