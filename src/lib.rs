//! # pdf2svg
//!
//! A library for rendering PDF pages to standalone SVG documents.
//!
//! `pdf2svg` opens a PDF (via [`lopdf`], the same object-model crate this library has always
//! depended on for tokenizing, cross-reference resolution, and filter decoding), walks its page
//! tree, and interprets each page's content stream into a flat list of draw calls which are then
//! serialized to SVG markup. Embedded fonts are subset-aware only in the sense that glyph
//! identifiers are remapped to avoid collisions (see [`charmap`]); full subsetting of the
//! embedded font program itself is out of scope.
//!
//! ## Getting started
//!
//! ```no_run
//! use pdf2svg::{Document, ConversionOptions};
//!
//! let doc = Document::open_file("assets/sample.pdf").unwrap();
//! let options = ConversionOptions::new().with_min_stroke_width(0.1);
//!
//! for i in 0..doc.page_count() {
//!     let page = doc.load_page(pdf2svg::PdfPageIndex::new(i), &options).unwrap();
//!     let svg = page.to_svg(&options).unwrap();
//!     println!("page {} is {} bytes of SVG", i, svg.len());
//! }
//! ```
//!
//! ## Reading PDF
//!
//! [`Document::open`] and [`Document::open_file`] parse an existing PDF; there is no writer
//! half to this crate's API (see the Non-goals in each module's documentation for the authoring
//! features this library intentionally does not implement).

#![allow(dead_code)]

#[cfg(feature = "logging")]
#[macro_use]
extern crate log;

extern crate lopdf;

pub mod charmap;
pub mod cmap;
pub mod color;
pub mod date;
pub mod document;
pub mod errors;
pub mod filters;
pub mod font;
pub mod glob_defines;
pub mod graphics;
pub mod image_decode;
pub mod indices;
pub mod interpreter;
pub mod matrix;
pub mod objects;
pub mod options;
pub mod page;
pub mod svg_emitter;
pub mod text;
pub mod units;

pub use color::{Cmyk, Color, ColorBits, ColorSpace, Greyscale, Rgb};
pub use document::{Document, DocumentMetadata};
pub use errors::{ConversionWarning, Error, IndexError, PdfError};
pub use indices::PdfPageIndex;
pub use options::{CancellationSignal, ConversionOptions, FontResolver};
pub use page::Page;
