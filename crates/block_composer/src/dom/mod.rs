// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Conversion between the block model and HTML.

pub(crate) mod parser;
mod to_html;
mod to_tree;

pub use parser::parse_html;
pub use to_html::to_html;
pub use to_tree::to_tree;
