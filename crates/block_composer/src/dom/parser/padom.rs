// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use html5ever::tree_builder::ElementFlags;
use html5ever::{Attribute, QualName};
use once_cell::sync::Lazy;

use super::{paqual_name, PaNodeContainer};

/// Index of a node inside its [`PaDom`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct PaDomHandle(pub(crate) usize);

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PaNodeText {
    pub(crate) content: String,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum PaDomNode {
    Container(PaNodeContainer),
    Document(PaNodeContainer),
    Text(PaNodeText),
}

static NO_NAME: Lazy<QualName> = Lazy::new(|| paqual_name(""));

impl PaDomNode {
    pub(crate) fn name(&self) -> &QualName {
        match self {
            PaDomNode::Container(c) | PaDomNode::Document(c) => &c.name,
            PaDomNode::Text(_) => &NO_NAME,
        }
    }

    pub(crate) fn children(&self) -> &[PaDomHandle] {
        match self {
            PaDomNode::Container(c) | PaDomNode::Document(c) => &c.children,
            PaDomNode::Text(_) => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<PaDomHandle>> {
        match self {
            PaDomNode::Container(c) | PaDomNode::Document(c) => {
                Some(&mut c.children)
            }
            PaDomNode::Text(_) => None,
        }
    }
}

/// Parse-time DOM.
///
/// Nodes are owned by one flat list and refer to their children by handle,
/// which is the shape html5ever's tree sink wants. Nodes detached during
/// parsing stay in the list but are unreachable from the document node.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PaDom {
    pub(crate) nodes: Vec<PaDomNode>,
    pub(crate) document_handle: PaDomHandle,
}

impl PaDom {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![PaDomNode::Document(PaNodeContainer {
                name: paqual_name(""),
                attrs: Vec::new(),
                children: Vec::new(),
            })],
            document_handle: PaDomHandle(0),
        }
    }

    pub(crate) fn document_handle(&self) -> &PaDomHandle {
        &self.document_handle
    }

    pub(crate) fn add_node(&mut self, node: PaDomNode) -> PaDomHandle {
        self.nodes.push(node);
        PaDomHandle(self.nodes.len() - 1)
    }

    pub(crate) fn get_node(&self, handle: &PaDomHandle) -> &PaDomNode {
        &self.nodes[handle.0]
    }

    pub(crate) fn get_mut_node(&mut self, handle: &PaDomHandle) -> &mut PaDomNode {
        &mut self.nodes[handle.0]
    }

    pub(crate) fn create_element(
        &mut self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> PaDomHandle {
        self.add_node(PaDomNode::Container(PaNodeContainer {
            name,
            attrs: attrs
                .into_iter()
                .map(|attr| {
                    (attr.name.local.as_ref().to_owned(), attr.value.as_ref().to_owned())
                })
                .collect(),
            children: Vec::new(),
        }))
    }

    /// Detach `target` from whichever node currently holds it.
    pub(crate) fn detach(&mut self, target: &PaDomHandle) {
        for node in &mut self.nodes {
            if let Some(children) = node.children_mut() {
                children.retain(|child| child != target);
            }
        }
    }

    /// The node holding `target` as a child, if any.
    pub(crate) fn parent_of(&self, target: &PaDomHandle) -> Option<PaDomHandle> {
        self.nodes
            .iter()
            .position(|node| node.children().contains(target))
            .map(PaDomHandle)
    }
}

/// What html5ever left behind when it finished.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PaDomCreationError {
    pub(crate) dom: PaDom,
    pub(crate) parse_errors: Vec<String>,
}

impl PaDomCreationError {
    pub(crate) fn new() -> Self {
        Self {
            dom: PaDom::new(),
            parse_errors: Vec::new(),
        }
    }
}
