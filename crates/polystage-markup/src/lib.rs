//! Element tree, parser and serializer for declarative scene markup.
//!
//! The XR back-end builds its scene as a tree of `a-*` elements with
//! string attributes. This crate provides that tree without any browser:
//! an arena [`Document`], a small tag parser for host pages and a
//! serializer for inspection.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`document`] | `Document`, `NodeId`, `NodeKind`, loaded callbacks |
//! | [`component`] | `Component`, the `key: value; ...` attribute form |
//! | [`error`] | `ParseError` |
//! | [`lexer`] | `Lexer`, `Token` |
//! | [`parser`] | `parse_document`, `parse_into` |
//! | [`serialize`] | `to_markup`, `to_pretty_markup` |
//!
//! # Quick start
//!
//! ```rust
//! use polystage_markup::{parse_document, to_markup};
//!
//! let doc = parse_document(r#"<body><div id="app"></div></body>"#).unwrap();
//! let app = doc.element_by_id("app").unwrap();
//! assert_eq!(doc.tag(app), Some("div"));
//! assert_eq!(to_markup(&doc, doc.root()), r#"<body><div id="app"></div></body>"#);
//! ```

pub mod component;
pub mod document;
pub mod error;
pub mod escape;
pub mod lexer;
pub mod parser;
pub mod serialize;

pub use component::Component;
pub use document::{Document, NodeId, NodeKind};
pub use error::ParseError;
pub use parser::{parse_document, parse_into};
pub use serialize::{to_markup, to_pretty_markup};
