//! Errors for printpdf
//!
//! error_chain and failure are certainly nice, but completely overengineered
//! for this use-case. For example, neither of them allow error localization.
//! Additionally, debugging macros can get hairy really quick and matching with
//! `*e.kind()` or doing From conversions for other errors is really hard to do.
//!
//! So in this case, the best form of error handling is to use the simple Rust-native
//! way: Just enums, `From` + pattern matching. No macros, except for this one.
//!
//! What this macro does is (simplified): `impl From<$a> for $b { $b::$variant(error) }`

use std::error::Error as IError;
use std::fmt;
use std::io::Error as IoError;

macro_rules! impl_from {
    ($from:ident, $to:ident::$variant:ident) => {
        impl From<$from> for $to {
            fn from(err: $from) -> Self {
                $to::$variant(err.into())
            }
        }
    };
}

/// Top-level error returned by every fallible operation in this crate.
///
/// Each variant corresponds to one of the error kinds a PDF-to-SVG conversion can raise; see
/// the module-level documentation of [`ConversionWarning`] for the recoverable counterpart.
#[derive(Debug)]
pub enum Error {
    /// External: std::io::Error
    Io(IoError),
    /// External: allsorts table-parsing error (corrupt or unsupported font program)
    FaceParsing(allsorts::error::ParseError),
    /// PDF error
    Pdf(PdfError),
    /// Indexing error (please report if this happens, shouldn't happen)
    Index(IndexError),
    /// The input could not be parsed as a PDF, even after a recovery scan.
    MalformedPdf(String),
    /// The document's trailer declares an `/Encrypt` dictionary; encrypted PDFs are rejected.
    Encrypted,
    /// The caller asked for (or the document requires on a mandatory path) a feature this
    /// crate does not implement, e.g. a color space outside DeviceGray/RGB/CMYK/Indexed.
    UnsupportedFeature(String),
    /// A stream's declared filter chain could not be applied to its bytes.
    FilterError(String),
    /// The caller's cancellation signal was raised.
    Cancelled,
    /// A caller-supplied argument (path, stream, or option) was invalid.
    InvalidArgument(String),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PdfError {
    FontFaceError,
}

impl fmt::Display for PdfError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Invalid or corrupt font face")
    }
}

impl IError for PdfError {}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum IndexError {
    PdfPageIndexError,
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::IndexError::*;
        write!(
            f,
            "{}",
            match *self {
                PdfPageIndexError => "Page index out of bounds",
            }
        )
    }
}

impl IError for IndexError {}

impl_from!(IoError, Error::Io);
impl_from!(PdfError, Error::Pdf);
impl_from!(IndexError, Error::Index);

impl From<allsorts::error::ParseError> for Error {
    fn from(err: allsorts::error::ParseError) -> Self {
        Error::FaceParsing(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::Error::*;
        match self {
            Io(e) => write!(f, "{e}"),
            FaceParsing(e) => write!(f, "invalid or corrupt font face: {e:?}"),
            Pdf(e) => write!(f, "{e}"),
            Index(e) => write!(f, "{e}"),
            MalformedPdf(msg) => write!(f, "malformed PDF: {msg}"),
            Encrypted => write!(f, "document is encrypted, refusing to open"),
            UnsupportedFeature(msg) => write!(f, "unsupported feature: {msg}"),
            FilterError(msg) => write!(f, "filter error: {msg}"),
            Cancelled => write!(f, "conversion was cancelled"),
            InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
        }
    }
}

impl IError for Error {}

/// A recoverable condition noticed during conversion. The page or document is still usable;
/// the caller is only informed so it can decide whether to surface the degradation.
///
/// Mirrors the shape of the teacher's own `PdfWarnMsg` (see `deserialize.rs`): a short,
/// human-readable message plus the page it occurred on, where known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionWarning {
    pub page: Option<usize>,
    pub message: String,
}

impl ConversionWarning {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            page: None,
            message: message.into(),
        }
    }

    pub fn on_page(page: usize, message: impl Into<String>) -> Self {
        Self {
            page: Some(page),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.page {
            Some(p) => write!(f, "page {p}: {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}
