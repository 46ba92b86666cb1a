//! Minimal element tree built from `quick-xml` events.

use std::collections::BTreeMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

#[derive(Clone, Debug, Default)]
pub(crate) struct XmlNode {
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    text: String,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    fn open(start: &BytesStart<'_>) -> Self {
        let attributes = start
            .attributes()
            .flatten()
            .map(|attr| {
                (
                    String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned(),
                    unescape_xml(&String::from_utf8_lossy(&attr.value)),
                )
            })
            .collect();
        XmlNode {
            name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
            attributes,
            text: String::new(),
            children: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// Text content exactly as written, surrounding whitespace included.
    pub fn raw_text(&self) -> &str {
        &self.text
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Follows a `/`-separated chain of child element names.
    pub fn descend(&self, path: &str) -> Option<&XmlNode> {
        path.split('/')
            .try_fold(self, |node, segment| node.child(segment))
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }
}

#[derive(Debug)]
pub(crate) enum XmlDocumentError {
    Xml(quick_xml::Error),
    Malformed(String),
}

/// Parses `contents` and returns the root element.
pub(crate) fn parse_document(contents: &str) -> Result<XmlNode, XmlDocumentError> {
    let mut reader = Reader::from_str(contents);
    let mut buf = Vec::new();
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => stack.push(XmlNode::open(e)),
            Ok(Event::Empty(ref e)) => attach(&mut stack, &mut root, XmlNode::open(e))?,
            Ok(Event::End(_)) => {
                let node = stack.pop().ok_or_else(|| {
                    XmlDocumentError::Malformed("unexpected closing tag".to_owned())
                })?;
                attach(&mut stack, &mut root, node)?;
            }
            Ok(Event::Text(ref e)) => {
                if let Some(open) = stack.last_mut() {
                    open.text
                        .push_str(&unescape_xml(&String::from_utf8_lossy(e)));
                }
            }
            Ok(Event::CData(ref e)) => {
                if let Some(open) = stack.last_mut() {
                    open.text.push_str(&String::from_utf8_lossy(e));
                }
            }
            Ok(Event::GeneralRef(ref e)) => {
                if let Some(open) = stack.last_mut() {
                    let name = String::from_utf8_lossy(e);
                    open.text.push_str(&resolve_reference(&name));
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(XmlDocumentError::Xml(err)),
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(XmlDocumentError::Malformed(
            "unexpected end of document".to_owned(),
        ));
    }
    root.ok_or_else(|| XmlDocumentError::Malformed("document has no root element".to_owned()))
}

fn attach(
    stack: &mut [XmlNode],
    root: &mut Option<XmlNode>,
    node: XmlNode,
) -> Result<(), XmlDocumentError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None if root.is_none() => *root = Some(node),
        None => {
            return Err(XmlDocumentError::Malformed(
                "multiple root elements".to_owned(),
            ))
        }
    }
    Ok(())
}

/// Unescape the predefined XML entities and numeric character references.
fn unescape_xml(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find('&') {
        result.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        match tail.find(';') {
            Some(end) => {
                result.push_str(&resolve_reference(&tail[..end]));
                rest = &tail[end + 1..];
            }
            None => {
                result.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    result.push_str(rest);
    result
}

fn resolve_reference(name: &str) -> String {
    let resolved = match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => name
            .strip_prefix("#x")
            .or_else(|| name.strip_prefix("#X"))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .or_else(|| name.strip_prefix('#').and_then(|dec| dec.parse().ok()))
            .and_then(char::from_u32),
    };
    match resolved {
        Some(ch) => ch.to_string(),
        None => format!("&{name};"),
    }
}
