//! Minimal XML element tree for `.transform` merges.
//!
//! Only elements, attributes and text are kept. Comments and processing
//! instructions are dropped on rewrite.

use anyhow::{Result, bail};
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.children.is_empty() && self.text.is_none()
    }

    /// Same name, and every attribute both elements define has the same value.
    fn matches(&self, other: &Element) -> bool {
        self.name == other.name
            && other
                .attributes
                .iter()
                .all(|(key, value)| self.attribute(key).is_none_or(|v| v == value))
    }

    pub fn parse(text: &str) -> Result<Element> {
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => stack.push(element_from(&start)?),
                Event::Empty(start) => {
                    let element = element_from(&start)?;
                    close(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let Some(element) = stack.pop() else {
                        bail!("unexpected closing tag");
                    };
                    close(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    if let Some(current) = stack.last_mut() {
                        current.text = Some(text.unescape()?.into_owned());
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = stack.last_mut() {
                        current.text = Some(String::from_utf8_lossy(&data).into_owned());
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            bail!("unclosed element '{}'", stack[stack.len() - 1].name);
        }
        root.ok_or_else(|| anyhow::anyhow!("document has no root element"))
    }

    /// Serialize as an indented document with an XML declaration.
    pub fn to_document(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        write_element(&mut writer, self)?;
        Ok(writer.into_inner())
    }

    /// Add what `fragment` has and `self` lacks.
    ///
    /// Missing attributes are added. A fragment child is merged into the first
    /// child that matches it, otherwise appended.
    pub fn merge_with(&mut self, fragment: &Element) {
        for (key, value) in &fragment.attributes {
            if self.attribute(key).is_none() {
                self.attributes.push((key.clone(), value.clone()));
            }
        }
        if self.text.is_none() {
            self.text = fragment.text.clone();
        }
        for child in &fragment.children {
            match self.children.iter_mut().find(|c| c.matches(child)) {
                Some(existing) => existing.merge_with(child),
                None => self.children.push(child.clone()),
            }
        }
    }

    /// Remove what `other` contributed: equal attributes go, matching children
    /// are reduced recursively and dropped once empty. `self` itself stays.
    pub fn except(&mut self, other: &Element) {
        self.attributes
            .retain(|(key, value)| other.attribute(key) != Some(value.as_str()));
        if self.text.is_some() && self.text == other.text {
            self.text = None;
        }
        for other_child in &other.children {
            if let Some(index) = self.children.iter().position(|c| c.matches(other_child)) {
                self.children[index].except(other_child);
                if self.children[index].is_empty() {
                    self.children.remove(index);
                }
            }
        }
    }
}

fn element_from(start: &BytesStart<'_>) -> Result<Element> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn close(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => bail!("multiple root elements"),
    }
    Ok(())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() && element.text.is_none() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    if let Some(text) = &element.text {
        writer.write_event(Event::Text(BytesText::new(text)))?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}
