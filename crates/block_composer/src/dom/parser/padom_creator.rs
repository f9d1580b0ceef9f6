// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use super::{
    paqual_name, PaDom, PaDomCreationError, PaDomHandle, PaDomNode,
    PaNodeContainer, PaNodeText,
};
use html5ever::interface::NextParserState;
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{parse_fragment, Attribute, QualName};
use std::cell::{Ref, RefCell};

pub(crate) type DomCreationResult = Result<PaDom, PaDomCreationError>;

/// Placeholder element name for comments and processing instructions.
/// Nothing maps it to a block, so they vanish on conversion.
const IGNORED_NODE: &str = "#ignored";

pub(crate) struct PaDomCreator {
    state: RefCell<PaDomCreationError>,
}

impl PaDomCreator {
    pub fn parse(html: &str) -> DomCreationResult {
        parse_fragment(
            PaDomCreator::default(),
            Default::default(),
            paqual_name("body"),
            vec![],
        )
        .from_utf8()
        .one(html.as_bytes())
    }

    fn append_text_to(dom: &mut PaDom, parent: &PaDomHandle, at: usize, text: &str) {
        let neighbour = at
            .checked_sub(1)
            .and_then(|i| dom.get_node(parent).children().get(i).cloned());
        if let Some(handle) = neighbour {
            if let PaDomNode::Text(existing) = dom.get_mut_node(&handle) {
                existing.content += text;
                return;
            }
        }
        let new_handle = dom.add_node(PaDomNode::Text(PaNodeText {
            content: text.to_owned(),
        }));
        if let Some(children) = dom.get_mut_node(parent).children_mut() {
            children.insert(at.min(children.len()), new_handle);
        }
    }

    fn insert_child(
        dom: &mut PaDom,
        parent: &PaDomHandle,
        at: usize,
        child: NodeOrText<PaDomHandle>,
    ) {
        match child {
            NodeOrText::AppendNode(node) => {
                dom.detach(&node);
                if let Some(children) = dom.get_mut_node(parent).children_mut() {
                    children.insert(at.min(children.len()), node);
                }
            }
            NodeOrText::AppendText(tendril) => {
                Self::append_text_to(dom, parent, at, tendril.as_ref())
            }
        }
    }
}

impl Default for PaDomCreator {
    fn default() -> Self {
        Self {
            state: RefCell::new(PaDomCreationError::new()),
        }
    }
}

impl TreeSink for PaDomCreator {
    type Handle = PaDomHandle;
    type Output = DomCreationResult;
    type ElemName<'a> = Ref<'a, QualName>;

    fn finish(self) -> Self::Output {
        let state = self.state.into_inner();
        if state.parse_errors.is_empty() {
            Ok(state.dom)
        } else {
            Err(state)
        }
    }

    fn parse_error(&self, msg: std::borrow::Cow<'static, str>) {
        self.state.borrow_mut().parse_errors.push(String::from(msg));
    }

    fn get_document(&self) -> Self::Handle {
        self.state.borrow().dom.document_handle().clone()
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        Ref::map(self.state.borrow(), |map| map.dom.get_node(target).name())
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        flags: ElementFlags,
    ) -> Self::Handle {
        self.state
            .borrow_mut()
            .dom
            .create_element(name, attrs, flags)
    }

    fn create_comment(&self, _text: StrTendril) -> Self::Handle {
        self.state.borrow_mut().dom.add_node(PaDomNode::Container(
            PaNodeContainer {
                name: paqual_name(IGNORED_NODE),
                attrs: Vec::new(),
                children: Vec::new(),
            },
        ))
    }

    fn create_pi(
        &self,
        text: StrTendril,
        _data: StrTendril,
    ) -> Self::Handle {
        self.create_comment(text)
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let dom = &mut self.state.borrow_mut().dom;
        let at = dom.get_node(parent).children().len();
        Self::insert_child(dom, parent, at, child);
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let has_parent = self.state.borrow().dom.parent_of(element).is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        // Doctypes carry nothing we keep
    }

    fn mark_script_already_started(&self, _node: &Self::Handle) {}

    fn pop(&self, _node: &Self::Handle) {}

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        target.clone()
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(
        &self,
        sibling: &Self::Handle,
        new_node: NodeOrText<Self::Handle>,
    ) {
        let dom = &mut self.state.borrow_mut().dom;
        let Some(parent) = dom.parent_of(sibling) else {
            return;
        };
        let at = dom
            .get_node(&parent)
            .children()
            .iter()
            .position(|child| child == sibling)
            .unwrap_or(0);
        Self::insert_child(dom, &parent, at, new_node);
    }

    fn add_attrs_if_missing(
        &self,
        target: &Self::Handle,
        attrs: Vec<Attribute>,
    ) {
        let dom = &mut self.state.borrow_mut().dom;
        if let PaDomNode::Container(node) = dom.get_mut_node(target) {
            for attr in attrs {
                let attr_name = attr.name.local.as_ref();
                if !node.attrs.iter().any(|(name, _)| name == attr_name) {
                    node.attrs
                        .push((attr_name.to_owned(), attr.value.as_ref().to_owned()));
                }
            }
        }
    }

    fn associate_with_form(
        &self,
        _target: &Self::Handle,
        _form: &Self::Handle,
        _nodes: (&Self::Handle, Option<&Self::Handle>),
    ) {
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        self.state.borrow_mut().dom.detach(target);
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let dom = &mut self.state.borrow_mut().dom;
        let moved = dom
            .get_mut_node(node)
            .children_mut()
            .map(std::mem::take)
            .unwrap_or_default();
        if let Some(children) = dom.get_mut_node(new_parent).children_mut() {
            children.extend(moved);
        }
    }

    fn is_mathml_annotation_xml_integration_point(
        &self,
        _handle: &Self::Handle,
    ) -> bool {
        false
    }

    fn set_current_line(&self, _line_number: u64) {}

    fn complete_script(&self, _node: &Self::Handle) -> NextParserState {
        NextParserState::Continue
    }

    fn allow_declarative_shadow_roots(
        &self,
        _intended_parent: &Self::Handle,
    ) -> bool {
        false
    }

    fn attach_declarative_shadow(
        &self,
        _location: &Self::Handle,
        _template: &Self::Handle,
        _attrs: Vec<Attribute>,
    ) -> Result<(), String> {
        Err("declarative shadow roots are not supported".to_owned())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// Render the reachable part of a dom as nested tags, for comparison.
    fn d(dom: &PaDom) -> String {
        fn walk(dom: &PaDom, handle: &PaDomHandle, out: &mut String) {
            match dom.get_node(handle) {
                PaDomNode::Text(t) => out.push_str(&format!("{:?}", t.content)),
                PaDomNode::Document(c) => {
                    for child in &c.children {
                        walk(dom, child, out);
                    }
                }
                PaDomNode::Container(c) => {
                    out.push('(');
                    out.push_str(c.tag());
                    for (name, value) in &c.attrs {
                        out.push_str(&format!(" {name}={value:?}"));
                    }
                    for child in &c.children {
                        out.push(' ');
                        walk(dom, child, out);
                    }
                    out.push(')');
                }
            }
        }
        let mut out = String::new();
        walk(dom, dom.document_handle(), &mut out);
        out
    }

    fn parse(input: &str) -> PaDom {
        match PaDomCreator::parse(input) {
            Ok(dom) => dom,
            Err(err) => err.dom,
        }
    }

    #[test]
    fn parsing_an_empty_string_creates_an_empty_root() {
        assert_eq!(d(&parse("")), "(html)");
    }

    #[test]
    fn parsing_nested_structures_produces_them() {
        assert_eq!(
            d(&parse("A<i>B<b>C</b>D</i>E")),
            r#"(html "A" (i "B" (b "C") "D") "E")"#
        );
    }

    #[test]
    fn parsing_tags_with_attributes_preserves_them() {
        assert_eq!(
            d(&parse("<span class='foo'>txt</span>")),
            r#"(html (span class="foo" "txt"))"#
        );
    }

    #[test]
    fn parsing_text_node_with_escaped_html_entities() {
        assert_eq!(
            d(&parse("aaa&lt;strong&gt;bbb&lt;/strong&gt;ccc")),
            r#"(html "aaa<strong>bbb</strong>ccc")"#
        );
    }

    #[test]
    fn comments_become_ignored_nodes() {
        assert_eq!(d(&parse("a<!-- hi -->b")), r#"(html "a" (#ignored) "b")"#);
    }

    #[test]
    fn misnested_formatting_is_repaired_without_panicking() {
        // Adoption agency: requires append_before_sibling and reparenting.
        let dom = parse("<b>1<p>2</b>3</p>");
        assert_eq!(d(&dom), r#"(html (b "1") (p (b "2") "3"))"#);
    }

    #[test]
    fn tables_with_stray_text_are_foster_parented() {
        let dom = parse("<table>x<tr><td>1</td></tr></table>");
        assert!(d(&dom).starts_with(r#"(html "x" (table"#));
    }
}
