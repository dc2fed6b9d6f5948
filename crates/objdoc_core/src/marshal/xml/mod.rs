use std::fmt;

use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::marshal::{Body, MarshalError, Node, Result};

/// Layout switches for XML output.
#[derive(Debug, Clone)]
pub struct WriteOptions {
	/// Spaces per nesting level; `None` writes everything on one line.
	pub indent: Option<usize>,
	/// Emit the `<?xml ...?>` declaration.
	pub declaration: bool,
}

impl Default for WriteOptions {
	fn default() -> Self {
		Self {
			indent: Some(2),
			declaration: true,
		}
	}
}

impl WriteOptions {
	/// Preset for single-line output without a declaration.
	pub fn compact() -> Self {
		Self {
			indent: None,
			declaration: false,
		}
	}
}

/// Render a document tree as XML text.
///
/// Empty nodes are written self-closing and leaves as start tag, text, end tag, so a null
/// value (`<Name/>`) and an empty string (`<Name></Name>`) stay distinguishable. A node whose
/// name is not a valid element name fails with [`MarshalError::InvalidName`] rather than
/// producing text that cannot be read back.
pub fn to_xml_string(root: &Node, options: &WriteOptions) -> Result<String> {
	let mut writer = match options.indent {
		Some(size) => Writer::new_with_indent(Vec::new(), b' ', size),
		None => Writer::new(Vec::new()),
	};

	if options.declaration {
		writer
			.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
			.map_err(write_error)?;
	}
	write_node(&mut writer, root)?;

	Ok(String::from_utf8(writer.into_inner())?)
}

fn write_node(writer: &mut Writer<Vec<u8>>, root: &Node) -> Result<()> {
	enum Step<'n> {
		Open(&'n Node),
		Close(&'n str),
	}

	let mut stack = vec![Step::Open(root)];
	while let Some(step) = stack.pop() {
		let node = match step {
			Step::Open(node) => node,
			Step::Close(name) => {
				writer.write_event(Event::End(BytesEnd::new(name))).map_err(write_error)?;
				continue;
			}
		};
		if !is_element_name(node.name()) {
			return Err(MarshalError::InvalidName {
				name: node.name().to_owned(),
			});
		}
		match node.body() {
			Body::Empty => writer.write_event(Event::Empty(BytesStart::new(node.name()))).map_err(write_error)?,
			Body::Text(text) => {
				writer.write_event(Event::Start(BytesStart::new(node.name()))).map_err(write_error)?;
				writer.write_event(Event::Text(BytesText::new(text))).map_err(write_error)?;
				writer.write_event(Event::End(BytesEnd::new(node.name()))).map_err(write_error)?;
			}
			Body::Children(children) => {
				writer.write_event(Event::Start(BytesStart::new(node.name()))).map_err(write_error)?;
				stack.push(Step::Close(node.name()));
				stack.extend(children.iter().rev().map(Step::Open));
			}
		}
	}
	Ok(())
}

/// Whether `name` is an XML element name the reader will accept back.
///
/// Letters, `_` and `:` may start a name; digits, `-` and `.` may also follow.
pub fn is_element_name(name: &str) -> bool {
	let mut chars = name.chars();
	let Some(first) = chars.next() else {
		return false;
	};
	let start = |c: char| c.is_alphabetic() || c == '_' || c == ':';
	start(first) && chars.all(|c| start(c) || c.is_alphanumeric() || matches!(c, '-' | '.'))
}

fn write_error(err: impl fmt::Display) -> MarshalError {
	MarshalError::Xml {
		message: err.to_string(),
		position: 0,
	}
}

/// Element being read, before its end tag decides leaf versus composite.
struct Frame {
	name: String,
	text: String,
	children: Vec<Node>,
}

impl Frame {
	fn finish(self) -> Result<Node> {
		if self.children.is_empty() {
			return Ok(Node::leaf(self.name, self.text));
		}
		// Whitespace between child elements is layout, anything else is mixed content.
		if !self.text.trim().is_empty() {
			return Err(MarshalError::MixedContent { name: self.name });
		}
		Ok(Node::composite(self.name, self.children))
	}
}

/// Parse XML text into a document tree.
///
/// Attributes, comments, processing instructions, and declarations are ignored. A
/// self-closing element reads as an empty node; a start/end pair without child elements
/// reads as a leaf holding its verbatim text.
pub fn from_xml_str(text: &str) -> Result<Node> {
	let mut reader = Reader::from_str(text);
	let mut stack: Vec<Frame> = Vec::new();
	let mut root: Option<Node> = None;

	loop {
		let event = reader.read_event().map_err(|err| MarshalError::Xml {
			message: err.to_string(),
			position: reader.error_position(),
		})?;

		match event {
			Event::Start(ref e) => {
				stack.push(Frame {
					name: element_name(e, &reader)?,
					text: String::new(),
					children: Vec::new(),
				});
			}
			Event::Empty(ref e) => {
				let node = Node::empty(element_name(e, &reader)?);
				attach(&mut stack, &mut root, node, &reader)?;
			}
			Event::End(_) => {
				let frame = stack.pop().ok_or_else(|| parse_error("unbalanced end tag", &reader))?;
				let node = frame.finish()?;
				attach(&mut stack, &mut root, node, &reader)?;
			}
			Event::Text(e) => {
				let content = e.decode().map_err(|err| parse_error(err, &reader))?;
				push_text(&mut stack, &content, &reader)?;
			}
			Event::CData(e) => {
				let content = std::str::from_utf8(e.as_ref()).map_err(|err| parse_error(err, &reader))?;
				push_text(&mut stack, content, &reader)?;
			}
			Event::GeneralRef(e) => {
				let raw = e.decode().map_err(|err| parse_error(err, &reader))?;
				let resolved = resolve_entity(&raw).ok_or_else(|| parse_error(format_args!("unknown entity &{raw};"), &reader))?;
				push_text(&mut stack, &resolved, &reader)?;
			}
			Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
			Event::Eof => break,
		}
	}

	if !stack.is_empty() {
		return Err(parse_error("unexpected end of document", &reader));
	}
	root.ok_or_else(|| parse_error("document has no root element", &reader))
}

fn element_name(start: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<String> {
	let name = start.name();
	let name = std::str::from_utf8(name.as_ref()).map_err(|err| parse_error(err, reader))?;
	Ok(name.to_owned())
}

fn attach(stack: &mut [Frame], root: &mut Option<Node>, node: Node, reader: &Reader<&[u8]>) -> Result<()> {
	if let Some(parent) = stack.last_mut() {
		parent.children.push(node);
		return Ok(());
	}
	if root.is_some() {
		return Err(parse_error("document has more than one root element", reader));
	}
	*root = Some(node);
	Ok(())
}

fn push_text(stack: &mut [Frame], content: &str, reader: &Reader<&[u8]>) -> Result<()> {
	match stack.last_mut() {
		Some(frame) => {
			frame.text.push_str(content);
			Ok(())
		}
		None if content.trim().is_empty() => Ok(()),
		None => Err(parse_error("text outside the root element", reader)),
	}
}

fn resolve_entity(raw: &str) -> Option<String> {
	if let Some(resolved) = resolve_xml_entity(raw) {
		return Some(resolved.to_owned());
	}

	let rest = raw.strip_prefix('#')?;
	let code = match rest.strip_prefix('x').or_else(|| rest.strip_prefix('X')) {
		Some(hex) => u32::from_str_radix(hex, 16).ok()?,
		None => rest.parse::<u32>().ok()?,
	};
	char::from_u32(code).map(String::from)
}

fn parse_error(message: impl fmt::Display, reader: &Reader<&[u8]>) -> MarshalError {
	MarshalError::Xml {
		message: message.to_string(),
		position: reader.buffer_position(),
	}
}
