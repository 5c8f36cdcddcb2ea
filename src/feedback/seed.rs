//! Seed input driving a feedback request.

/// The kind of seed driving a request.
///
/// Selects which field-boost table applies (`rf.qf` for document seeds,
/// `stream.qf` for content streams).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedKind {
    /// Seed documents already present in the host index.
    Documents,
    /// Free text supplied with the request.
    Stream,
}

/// One section of a content-stream seed, with the similarity fields its
/// text is analyzed against.
///
/// The original handler exposed two fixed sections (head and body); a
/// section list generalizes that mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSection {
    /// The raw text of this section.
    pub text: String,
    /// The similarity fields this section's text targets.
    pub fields: Vec<String>,
}

impl TextSection {
    /// Create a new text section.
    pub fn new<T: Into<String>>(text: T, fields: Vec<String>) -> Self {
        TextSection {
            text: text.into(),
            fields,
        }
    }
}

/// The seed of a feedback request: existing documents or free text.
///
/// Request-scoped; never persisted beyond the request.
#[derive(Debug, Clone, PartialEq)]
pub enum Seed {
    /// Internal ids of seed documents in the host index.
    Documents(Vec<u64>),
    /// Content-stream sections, each targeting similarity fields.
    Text(Vec<TextSection>),
}

impl Seed {
    /// Create a document seed.
    pub fn documents(ids: Vec<u64>) -> Self {
        Seed::Documents(ids)
    }

    /// Create a single-section text seed targeting the given fields.
    pub fn text<T: Into<String>>(text: T, fields: Vec<String>) -> Self {
        Seed::Text(vec![TextSection::new(text, fields)])
    }

    /// Get the seed kind.
    pub fn kind(&self) -> SeedKind {
        match self {
            Seed::Documents(_) => SeedKind::Documents,
            Seed::Text(_) => SeedKind::Stream,
        }
    }

    /// Check whether the seed carries no input at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Seed::Documents(ids) => ids.is_empty(),
            Seed::Text(sections) => sections.iter().all(|s| s.text.trim().is_empty()),
        }
    }
}
