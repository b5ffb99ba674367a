//! A single resolved page (§4.4/§4.7): its content stream, resolved resources, and device-space
//! transform, ready to be interpreted and rendered to SVG on demand.
//!
//! Grounded on the teacher's `pdf_page.rs`/`PdfPageReference` for the idea of a lightweight
//! per-page handle exposing `width()`/`height()`/an SVG-producing method, generalized from a
//! write-side page builder into a read-side resolved view over already-parsed PDF content.

use std::collections::BTreeMap;

use lopdf::content::Content;

use crate::document::render_page_svg;
use crate::errors::{ConversionWarning, Error};
use crate::graphics::Rect;
use crate::interpreter::{ExtGState, PreparedImage, ResourceFont};
use crate::options::ConversionOptions;

/// One page, with its content stream already decoded and its fonts/images/forms already
/// resolved against the owning document. Interpretation (and therefore SVG rendering) happens
/// lazily in [`Page::to_svg`], not at construction time.
pub struct Page {
    index: usize,
    width: f32,
    height: f32,
    base_ctm: [f32; 6],
    content: Content,
    fonts: BTreeMap<String, ResourceFont>,
    images: BTreeMap<String, PreparedImage>,
    forms: BTreeMap<String, lopdf::Stream>,
    ext_gstates: BTreeMap<String, ExtGState>,
    warnings: Vec<ConversionWarning>,
}

impl Page {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        index: usize,
        _media_box: Rect,
        crop_box: Rect,
        rotate: i64,
        content: Content,
        fonts: BTreeMap<String, ResourceFont>,
        images: BTreeMap<String, PreparedImage>,
        forms: BTreeMap<String, lopdf::Stream>,
        ext_gstates: BTreeMap<String, ExtGState>,
        warnings: Vec<ConversionWarning>,
    ) -> Result<Self, Error> {
        let (base_ctm, width, height) = base_ctm_for(&crop_box, rotate);
        Ok(Self {
            index,
            width,
            height,
            base_ctm,
            content,
            fonts,
            images,
            forms,
            ext_gstates,
            warnings,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Recoverable issues noticed while resolving this page's resources (unreadable font
    /// program, unsupported image color space, ...). Interpretation-time warnings are
    /// surfaced separately through [`Error`] only when fatal; non-fatal ones are folded in here
    /// by [`Page::to_svg`]'s caller if needed via [`crate::interpreter::InterpreterWarning`].
    pub fn warnings(&self) -> &[ConversionWarning] {
        &self.warnings
    }

    pub(crate) fn content(&self) -> &Content {
        &self.content
    }

    pub(crate) fn base_ctm(&self) -> [f32; 6] {
        self.base_ctm
    }

    pub(crate) fn fonts(&self) -> &BTreeMap<String, ResourceFont> {
        &self.fonts
    }

    pub(crate) fn images(&self) -> &BTreeMap<String, PreparedImage> {
        &self.images
    }

    pub(crate) fn forms(&self) -> &BTreeMap<String, lopdf::Stream> {
        &self.forms
    }

    pub(crate) fn ext_gstates(&self) -> &BTreeMap<String, ExtGState> {
        &self.ext_gstates
    }

    /// Interprets the content stream and serializes the result to an SVG string.
    pub fn to_svg(&self, options: &ConversionOptions) -> Result<String, Error> {
        render_page_svg(self, options)
    }

    /// Convenience wrapper over [`Page::to_svg`] writing the result to `sink`.
    pub fn save_svg(&self, sink: &mut impl std::io::Write, options: &ConversionOptions) -> Result<(), Error> {
        let svg = self.to_svg(options)?;
        sink.write_all(svg.as_bytes()).map_err(Error::Io)
    }
}

/// Builds the device-space base CTM for a page's CropBox under its `/Rotate` value, plus the
/// resulting (width, height) of the rendered viewBox (swapped for the 90/270 cases).
///
/// The unrotated transform is a plain y-flip anchored at the CropBox's lower-left corner
/// (`x' = x - llx`, `y' = ury - y`), matching PDF's bottom-up user space against SVG's top-down
/// device space. Each 90-degree step is the same y-flip pre-composed with a clockwise rotation
/// of the render box, derived directly in closed form rather than via [`crate::matrix`]'s
/// generic 4x4 composition, since only these four fixed angles are legal here.
fn base_ctm_for(crop: &Rect, rotate: i64) -> ([f32; 6], f32, f32) {
    let llx = crop.x.0;
    let lly = crop.y.0;
    let urx = crop.x.0 + crop.width.0;
    let ury = crop.y.0 + crop.height.0;
    let w = crop.width.0;
    let h = crop.height.0;

    match rotate {
        90 => ([0.0, 1.0, 1.0, 0.0, -lly, -llx], h, w),
        180 => ([-1.0, 0.0, 0.0, 1.0, urx, -lly], w, h),
        270 => ([0.0, -1.0, -1.0, 0.0, ury, urx], h, w),
        _ => ([1.0, 0.0, 0.0, -1.0, -llx, ury], w, h),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Pt;

    fn rect(w: f32, h: f32) -> Rect {
        Rect::from_xywh(Pt(0.0), Pt(0.0), Pt(w), Pt(h))
    }

    #[test]
    fn unrotated_page_keeps_dimensions_and_flips_y() {
        let (ctm, w, h) = base_ctm_for(&rect(200.0, 100.0), 0);
        assert_eq!((w, h), (200.0, 100.0));
        // top-left of PDF space (0, 100) should map to device-space (0, 0).
        let x = 0.0 * ctm[0] + 100.0 * ctm[2] + ctm[4];
        let y = 0.0 * ctm[1] + 100.0 * ctm[3] + ctm[5];
        assert_eq!((x, y), (0.0, 0.0));
    }

    #[test]
    fn rotate_90_swaps_dimensions() {
        let (ctm, w, h) = base_ctm_for(&rect(200.0, 100.0), 90);
        assert_eq!((w, h), (100.0, 200.0));
        // PDF-space top-left (0, 100) should land at device-space top-right (100, 0).
        let x = 0.0 * ctm[0] + 100.0 * ctm[2] + ctm[4];
        let y = 0.0 * ctm[1] + 100.0 * ctm[3] + ctm[5];
        assert_eq!((x, y), (100.0, 0.0));
    }

    #[test]
    fn rotate_180_keeps_dimensions() {
        let (_, w, h) = base_ctm_for(&rect(200.0, 100.0), 180);
        assert_eq!((w, h), (200.0, 100.0));
    }

    #[test]
    fn rotate_270_swaps_dimensions() {
        let (ctm, w, h) = base_ctm_for(&rect(200.0, 100.0), 270);
        assert_eq!((w, h), (100.0, 200.0));
        // PDF-space top-left (0, 100) should land at device-space bottom-left (0, 200).
        let x = 0.0 * ctm[0] + 100.0 * ctm[2] + ctm[4];
        let y = 0.0 * ctm[1] + 100.0 * ctm[3] + ctm[5];
        assert_eq!((x, y), (0.0, 200.0));
    }
}
