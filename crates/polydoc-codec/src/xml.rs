//! XML mapping of the canonical tree.
//!
//! One root element wraps the root mapping. Mapping keys become element
//! names, sequences become repeated elements with the same name, and scalars
//! are element text. Data is never written as attributes; when a foreign
//! producer wrote some, they are read back as leading fields of their element.
//!
//! Element text that reads as a number or boolean decodes as one. A string
//! whose text would read that way is written with a [`TYPE_HINT`] attribute
//! so it decodes as a string again.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde_json::{Map, Number, Value};

use crate::encoding::Encoding;
use crate::error::{CodecError, CodecResult};
use crate::Tree;

/// Root element name written when none is configured.
pub const DEFAULT_ROOT: &str = "database";

/// Field that receives text found next to child elements or attributes.
pub const TEXT_KEY: &str = "_";

/// Attribute marking element text that must decode as a string. The colon
/// keeps it apart from data keys, which are plain element names.
pub const TYPE_HINT: &str = "polydoc:type";

const STRING_TYPE: &str = "string";

pub fn decode(bytes: &[u8]) -> CodecResult<Tree> {
    let source = std::str::from_utf8(bytes).map_err(|e| CodecError::parse(Encoding::Xml, e))?;
    let mut reader = Reader::from_str(source);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<Value> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| CodecError::parse(Encoding::Xml, format!("at byte {}: {e}", reader.buffer_position())))?;
        match event {
            Event::Start(ref e) => {
                if root.is_some() {
                    return Err(CodecError::parse(Encoding::Xml, "multiple root elements"));
                }
                stack.push(Frame::open(e)?);
            }
            Event::Empty(ref e) => {
                if root.is_some() {
                    return Err(CodecError::parse(Encoding::Xml, "multiple root elements"));
                }
                let frame = Frame::open(e)?;
                let name = frame.name.clone();
                let value = if frame.fields.is_empty() && !frame.string {
                    Value::Null
                } else {
                    frame.finish()
                };
                match stack.last_mut() {
                    Some(parent) => parent.fields.push((name, value)),
                    None => root = Some(root_value(value)),
                }
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| CodecError::parse(Encoding::Xml, "unbalanced closing tag"))?;
                let name = frame.name.clone();
                let value = frame.finish();
                match stack.last_mut() {
                    Some(parent) => parent.fields.push((name, value)),
                    None => root = Some(root_value(value)),
                }
            }
            Event::Text(ref e) => {
                let text = e.unescape().map_err(|e| CodecError::parse(Encoding::Xml, e))?;
                match stack.last_mut() {
                    Some(frame) => frame.text.push_str(&text),
                    None if text.trim().is_empty() => {}
                    None => {
                        return Err(CodecError::parse(Encoding::Xml, "text outside the root element"));
                    }
                }
            }
            Event::CData(e) => {
                let text = String::from_utf8(e.into_inner().into_owned())
                    .map_err(|e| CodecError::parse(Encoding::Xml, e))?;
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(CodecError::parse(Encoding::Xml, "unexpected end of document"));
    }
    root.ok_or_else(|| CodecError::parse(Encoding::Xml, "no root element"))
}

struct Frame {
    name: String,
    fields: Vec<(String, Value)>,
    text: String,
    string: bool,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> CodecResult<Self> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| CodecError::parse(Encoding::Xml, e))?
            .to_string();
        let mut fields = Vec::new();
        let mut string = false;
        for attr in start.attributes() {
            let attr = attr.map_err(|e| CodecError::parse(Encoding::Xml, e))?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| CodecError::parse(Encoding::Xml, e))?
                .to_string();
            let value = attr
                .unescape_value()
                .map_err(|e| CodecError::parse(Encoding::Xml, e))?;
            if key == TYPE_HINT {
                string = value == STRING_TYPE;
                continue;
            }
            fields.push((key, infer_scalar(value.into_owned())));
        }
        Ok(Self { name, fields, text: String::new(), string })
    }

    fn finish(self) -> Value {
        if self.fields.is_empty() {
            return if self.string { Value::String(self.text) } else { infer_scalar(self.text) };
        }
        let mut map = Map::new();
        for (key, value) in self.fields {
            match map.get_mut(&key) {
                // Element values are never sequences, so an existing sequence
                // means the name already repeated.
                Some(Value::Array(items)) => items.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
                None => {
                    map.insert(key, value);
                }
            }
        }
        let text = self.text.trim();
        if !text.is_empty() {
            map.insert(TEXT_KEY.to_string(), infer_scalar(text.to_string()));
        }
        Value::Object(map)
    }
}

/// The root element always yields a mapping unless it carries bare text.
fn root_value(value: Value) -> Value {
    match value {
        Value::Null => Value::Object(Map::new()),
        Value::String(s) if s.trim().is_empty() => Value::Object(Map::new()),
        other => other,
    }
}

/// Parse element text back into a typed scalar.
///
/// A number or boolean is only recognised when its canonical rendering is
/// exactly the input, so `"007"` or `"1.50"` stay strings.
fn infer_scalar(text: String) -> Value {
    match text.as_str() {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(n) = text.parse::<i64>() {
        if n.to_string() == text {
            return Value::from(n);
        }
    }
    if let Ok(n) = text.parse::<u64>() {
        if n.to_string() == text {
            return Value::from(n);
        }
    }
    if let Ok(f) = text.parse::<f64>() {
        if let Some(n) = Number::from_f64(f) {
            if n.to_string() == text {
                return Value::Number(n);
            }
        }
    }
    Value::String(text)
}

pub fn encode(tree: &Tree, root: &str) -> CodecResult<Vec<u8>> {
    let map = tree
        .as_object()
        .ok_or_else(|| unrepresentable("document root must be a mapping"))?;
    check_name(root)?;

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    write(&mut writer, Event::Start(BytesStart::new(root)))?;
    write_fields(&mut writer, map)?;
    write(&mut writer, Event::End(BytesEnd::new(root)))?;

    let mut out = writer.into_inner();
    out.push(b'\n');
    Ok(out)
}

fn write_fields(writer: &mut Writer<Vec<u8>>, map: &Map<String, Value>) -> CodecResult<()> {
    for (key, value) in map {
        check_name(key)?;
        match value {
            Value::Array(items) if items.is_empty() => {
                write(writer, Event::Empty(BytesStart::new(key.as_str())))?;
            }
            Value::Array(items) => {
                for item in items {
                    write_element(writer, key, item)?;
                }
            }
            other => write_element(writer, key, other)?,
        }
    }
    Ok(())
}

fn write_element(writer: &mut Writer<Vec<u8>>, key: &str, value: &Value) -> CodecResult<()> {
    match value {
        Value::Null => write(writer, Event::Empty(BytesStart::new(key))),
        Value::Object(map) if map.is_empty() => write_text(writer, key, ""),
        Value::Object(map) => {
            write(writer, Event::Start(BytesStart::new(key)))?;
            write_fields(writer, map)?;
            write(writer, Event::End(BytesEnd::new(key)))
        }
        Value::Array(_) => Err(unrepresentable(format!("sequence nested directly in sequence `{key}`"))),
        Value::Bool(b) => write_text(writer, key, if *b { "true" } else { "false" }),
        Value::Number(n) => write_text(writer, key, &n.to_string()),
        Value::String(s) if !infer_scalar(s.clone()).is_string() => {
            let start = BytesStart::new(key).with_attributes([(TYPE_HINT, STRING_TYPE)]);
            write_start_text(writer, start, key, s)
        }
        Value::String(s) => write_text(writer, key, s),
    }
}

fn write_text(writer: &mut Writer<Vec<u8>>, key: &str, text: &str) -> CodecResult<()> {
    write_start_text(writer, BytesStart::new(key), key, text)
}

fn write_start_text(writer: &mut Writer<Vec<u8>>, start: BytesStart<'_>, key: &str, text: &str) -> CodecResult<()> {
    // Always emit the text event, even empty, so the indenting writer keeps
    // the closing tag on the same line.
    write(writer, Event::Start(start))?;
    write(writer, Event::Text(BytesText::new(text)))?;
    write(writer, Event::End(BytesEnd::new(key)))
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> CodecResult<()> {
    writer
        .write_event(event)
        .map_err(|e| CodecError::encode(Encoding::Xml, e))
}

fn check_name(name: &str) -> CodecResult<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_alphabetic() || first == '_')
                && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(unrepresentable(format!("`{name}` is not a valid element name")))
    }
}

fn unrepresentable(reason: impl Into<String>) -> CodecError {
    CodecError::Unrepresentable { encoding: Encoding::Xml, reason: reason.into() }
}
