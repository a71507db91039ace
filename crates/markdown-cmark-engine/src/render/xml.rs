//! CommonMark XML: a writer for structural introspection and a reader that
//! rebuilds a [`Tree`] from the writer's output.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{TreeError, XmlError};
use crate::options::Options;
use crate::tree::{DelimType, ListType, NodeEdge, NodeId, NodeType, NodeValue, Sourcepos, Tree};

use super::escape::escape_html;

const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
                          <!DOCTYPE document SYSTEM \"CommonMark.dtd\">\n";
const XMLNS: &str = "http://commonmark.org/xml/1.0";

/// Renders the subtree at `root` as CommonMark XML.
///
/// With [`Options::NORMALIZE`], runs of adjacent text nodes are written as
/// a single `<text>` element.
pub fn render_xml(tree: &Tree, root: NodeId, options: Options) -> String {
    let mut out = String::from(XML_HEADER);
    let normalize = options.contains(Options::NORMALIZE);
    let mut depth = 0usize;
    for edge in tree.traverse(root) {
        match edge {
            NodeEdge::Start(id) => {
                if normalize && merged_into_previous(tree, id) {
                    continue;
                }
                out.push_str(&"  ".repeat(depth));
                out.push('<');
                out.push_str(tree.type_string(id));
                write_attributes(tree, id, options, &mut out);

                let literal = if normalize && tree.node_type(id) == NodeType::Text {
                    Some(merged_text(tree, id))
                } else {
                    tree.get(id)
                        .and_then(|n| n.value.literal())
                        .map(str::to_string)
                };
                if let Some(literal) = literal {
                    out.push('>');
                    escape_html(&literal, &mut out);
                    out.push_str(&format!("</{}>\n", tree.type_string(id)));
                } else if tree.first_child(id).is_some() {
                    out.push_str(">\n");
                    depth += 1;
                } else {
                    out.push_str(" />\n");
                }
            }
            NodeEdge::End(id) => {
                if tree.first_child(id).is_some() {
                    depth = depth.saturating_sub(1);
                    out.push_str(&"  ".repeat(depth));
                    out.push_str(&format!("</{}>\n", tree.type_string(id)));
                }
            }
        }
    }
    out
}

fn merged_into_previous(tree: &Tree, id: NodeId) -> bool {
    tree.node_type(id) == NodeType::Text
        && tree
            .previous_sibling(id)
            .is_some_and(|prev| tree.node_type(prev) == NodeType::Text)
}

fn merged_text(tree: &Tree, first: NodeId) -> String {
    let mut text = String::new();
    let mut next = Some(first);
    while let Some(id) = next.filter(|&id| tree.node_type(id) == NodeType::Text) {
        text.push_str(tree.literal(id));
        next = tree.next_sibling(id);
    }
    text
}

fn attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    escape_html(value, out);
    out.push('"');
}

fn write_attributes(tree: &Tree, id: NodeId, options: Options, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    if options.contains(Options::SOURCEPOS)
        && let Some(pos) = node.sourcepos
    {
        attribute(out, "sourcepos", &pos.to_string());
    }
    match &node.value {
        NodeValue::Document => attribute(out, "xmlns", XMLNS),
        NodeValue::List(list) => {
            match list.list_type {
                ListType::Bullet => attribute(out, "type", "bullet"),
                ListType::Ordered => {
                    attribute(out, "type", "ordered");
                    attribute(out, "start", &list.start.to_string());
                    attribute(out, "delim", delim_name(list.delimiter));
                }
            }
            attribute(out, "tight", if list.tight { "true" } else { "false" });
        }
        NodeValue::Header(level) => attribute(out, "level", &level.to_string()),
        NodeValue::CodeBlock(cb) if !cb.info.is_empty() => attribute(out, "info", &cb.info),
        NodeValue::Link(link) | NodeValue::Image(link) => {
            attribute(out, "destination", &link.url);
            attribute(out, "title", &link.title);
        }
        _ => {}
    }
}

fn delim_name(delim: DelimType) -> &'static str {
    match delim {
        DelimType::None => "none",
        DelimType::Period => "period",
        DelimType::Paren => "paren",
    }
}

/// Rebuilds a tree from CommonMark XML as written by [`render_xml`].
///
/// Whitespace between elements is ignored; the text of literal-bearing
/// elements is kept exactly.
pub fn parse_xml(xml: &str) -> Result<Tree, XmlError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut tree = Tree::new();
    // open elements below the document, with the literal collected so far
    let mut stack: Vec<(NodeId, String)> = Vec::new();
    let mut seen_document = false;
    let mut closed_document = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if closed_document => {
                return Err(XmlError::UnknownElement(element_name(&e)));
            }
            Event::Start(e) => {
                let id = open_element(&mut tree, &e, &stack, &mut seen_document)?;
                stack.push((id, String::new()));
            }
            Event::Empty(e) => {
                let id = open_element(&mut tree, &e, &stack, &mut seen_document)?;
                if id == tree.root() {
                    closed_document = true;
                }
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let Some((id, literal)) = stack.pop() else {
                    return Err(XmlError::UnbalancedTag(name));
                };
                if tree.type_string(id) != name {
                    return Err(XmlError::UnbalancedTag(name));
                }
                if let Some(slot) = tree.get_mut(id).and_then(|n| n.value.literal_mut()) {
                    *slot = literal;
                }
                if id == tree.root() {
                    closed_document = true;
                }
            }
            Event::Text(e) => {
                let text = String::from_utf8_lossy(e.as_ref());
                append_text(&tree, &mut stack, &text);
            }
            Event::GeneralRef(e) => {
                let entity = format!("&{};", String::from_utf8_lossy(e.as_ref()));
                let text = quick_xml::escape::unescape(&entity)?;
                append_text(&tree, &mut stack, &text);
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                append_text(&tree, &mut stack, &text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_document {
        return Err(XmlError::MissingDocument);
    }
    if let Some((id, _)) = stack.last() {
        return Err(XmlError::UnbalancedTag(tree.type_string(*id).to_string()));
    }
    log::debug!("read XML document with {} nodes", tree.descendants(tree.root()).count());
    Ok(tree)
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn append_text(tree: &Tree, stack: &mut [(NodeId, String)], text: &str) {
    match stack.last_mut() {
        Some((id, literal)) if literal_bearing(tree.node_type(*id)) => literal.push_str(text),
        _ if text.trim().is_empty() => {}
        _ => log::debug!("ignoring stray XML text {text:?}"),
    }
}

fn literal_bearing(ty: NodeType) -> bool {
    matches!(
        ty,
        NodeType::Text
            | NodeType::Code
            | NodeType::InlineHtml
            | NodeType::CodeBlock
            | NodeType::HtmlBlock
    )
}

/// Creates the node for an opening tag and attaches it to the innermost
/// open element. The first element must be `<document>`.
fn open_element(
    tree: &mut Tree,
    e: &BytesStart<'_>,
    stack: &[(NodeId, String)],
    seen_document: &mut bool,
) -> Result<NodeId, XmlError> {
    let name = element_name(e);
    let ty = NodeType::from_type_str(&name).ok_or_else(|| XmlError::UnknownElement(name.clone()))?;
    if !*seen_document {
        if ty != NodeType::Document {
            return Err(XmlError::MissingDocument);
        }
        *seen_document = true;
        let root = tree.root();
        let (value, sourcepos) = read_attributes(e, NodeValue::Document)?;
        if let Some(node) = tree.get_mut(root) {
            node.value = value;
            node.sourcepos = sourcepos;
        }
        return Ok(root);
    }

    let default = NodeValue::default_for(ty).ok_or_else(|| XmlError::UnknownElement(name.clone()))?;
    let (value, sourcepos) = read_attributes(e, default)?;
    let id = tree.new_node(value)?;
    tree.set_sourcepos(id, sourcepos)?;
    let parent = stack.last().map_or(tree.root(), |(parent, _)| *parent);
    if let Err(err) = tree.append_child(parent, id) {
        tree.free(id)?;
        return Err(err.into());
    }
    Ok(id)
}

fn read_attributes(
    e: &BytesStart<'_>,
    mut value: NodeValue,
) -> Result<(NodeValue, Option<Sourcepos>), XmlError> {
    let mut sourcepos = None;
    for attr in e.attributes().flatten() {
        let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attr.value).into_owned();
        let text = quick_xml::escape::unescape(&raw)?.into_owned();
        let invalid = || XmlError::InvalidAttribute {
            name: name.clone(),
            value: text.clone(),
        };

        match (name.as_str(), &mut value) {
            ("sourcepos", _) => sourcepos = Some(parse_sourcepos(&text).ok_or_else(invalid)?),
            ("xmlns", NodeValue::Document) => {}
            ("type", NodeValue::List(list)) => {
                list.list_type = match text.as_str() {
                    "bullet" => ListType::Bullet,
                    "ordered" => ListType::Ordered,
                    _ => return Err(invalid()),
                }
            }
            ("start", NodeValue::List(list)) => list.start = text.parse().map_err(|_| invalid())?,
            ("delim", NodeValue::List(list)) => {
                list.delimiter = match text.as_str() {
                    "none" => DelimType::None,
                    "period" => DelimType::Period,
                    "paren" => DelimType::Paren,
                    _ => return Err(invalid()),
                }
            }
            ("tight", NodeValue::List(list)) => list.tight = text.parse().map_err(|_| invalid())?,
            ("level", NodeValue::Header(level)) => {
                let parsed: u8 = text.parse().map_err(|_| invalid())?;
                if !(1..=6).contains(&parsed) {
                    return Err(TreeError::InvalidHeaderLevel(parsed).into());
                }
                *level = parsed;
            }
            ("info", NodeValue::CodeBlock(cb)) => cb.info = text.clone(),
            ("destination", NodeValue::Link(link) | NodeValue::Image(link)) => link.url = text.clone(),
            ("title", NodeValue::Link(link) | NodeValue::Image(link)) => link.title = text.clone(),
            _ => return Err(invalid()),
        }
    }
    Ok((value, sourcepos))
}

fn parse_sourcepos(s: &str) -> Option<Sourcepos> {
    let (start, end) = s.split_once('-')?;
    let (start_line, start_column) = start.split_once(':')?;
    let (end_line, end_column) = end.split_once(':')?;
    Some(Sourcepos {
        start_line: start_line.parse().ok()?,
        start_column: start_column.parse().ok()?,
        end_line: end_line.parse().ok()?,
        end_column: end_column.parse().ok()?,
    })
}
