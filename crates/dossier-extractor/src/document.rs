//! Document layout detection

use crate::preprocess::BULLET;
use crate::values::split_label;
use dossier_domain::{DocumentStructure, DocumentType};

/// Longest document, in non-blank lines, that can be a brief
const MAX_BRIEF_LINES: usize = 15;

/// Share of labeled lines for a structured layout
const STRUCTURED_LABEL_RATIO: f64 = 0.5;

/// Share of labeled lines for a semi-structured layout
const SEMI_STRUCTURED_LABEL_RATIO: f64 = 0.2;

/// Headed sections that alone make a document structured
const STRUCTURED_HEADERS: usize = 3;

/// Classify the layout of normalized text
///
/// Short and mostly labeled is a brief; mostly labeled or three headed
/// sections is structured; some labels, bullets or headers make it
/// semi-structured; anything else is narrative.
pub fn detect_document_type(text: &str, structure: &DocumentStructure) -> DocumentType {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return DocumentType::Narrative;
    }

    let labeled = lines.iter().filter(|l| split_label(l).is_some()).count();
    let bullets = lines.iter().filter(|l| l.starts_with(BULLET)).count();
    let headers = structure.header_count();
    let label_ratio = labeled as f64 / lines.len() as f64;

    if lines.len() <= MAX_BRIEF_LINES && label_ratio >= STRUCTURED_LABEL_RATIO {
        DocumentType::Brief
    } else if label_ratio >= STRUCTURED_LABEL_RATIO || headers >= STRUCTURED_HEADERS {
        DocumentType::Structured
    } else if label_ratio >= SEMI_STRUCTURED_LABEL_RATIO || bullets > 0 || headers > 0 {
        DocumentType::SemiStructured
    } else {
        DocumentType::Narrative
    }
}
