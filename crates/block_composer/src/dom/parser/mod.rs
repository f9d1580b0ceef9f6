// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! HTML to blocks.
//!
//! html5ever builds a throwaway handle-based DOM ([`PaDom`]) which
//! [`to_blocks`] then maps onto the block grammar, discarding every tag
//! and attribute the grammar has no place for.

mod padom;
mod padom_creator;
mod panode_container;
mod to_blocks;

use html5ever::{LocalName, Namespace, QualName};

pub(crate) use padom::{PaDom, PaDomCreationError, PaDomHandle, PaDomNode, PaNodeText};
pub(crate) use padom_creator::PaDomCreator;
pub(crate) use panode_container::PaNodeContainer;
pub use to_blocks::parse_html;

const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

pub(crate) fn paqual_name(local_name: &str) -> QualName {
    QualName::new(
        None,
        Namespace::from(XHTML_NAMESPACE),
        LocalName::from(local_name),
    )
}
