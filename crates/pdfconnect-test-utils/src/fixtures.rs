//! Canned backend payloads.

use pdfconnect_common::Section;
use serde_json::{json, Value};

pub fn section(text: &str, document: &str, page: u32) -> Section {
    Section {
        text: text.to_string(),
        document: document.to_string(),
        page,
        importance: None,
        is_uploaded: None,
    }
}

/// The single-section reply used across the App view scenarios.
pub fn packing_list_json() -> Value {
    json!({
        "sections": [
            { "text": "Packing List", "document": "trip.pdf", "page": 2 }
        ]
    })
}

pub fn empty_result_json() -> Value {
    json!({ "sections": [], "connections": [] })
}

/// Three sections across two documents, two of them linked.
pub fn travel_result_json() -> Value {
    json!({
        "sections": [
            { "text": "Itinerary Overview", "document": "south_of_france.pdf", "page": 1 },
            { "text": "Accommodation Options", "document": "south_of_france.pdf", "page": 4 },
            { "text": "Local Transport", "document": "getting_around.pdf", "page": 2 }
        ],
        "connections": [
            { "source": 0, "target": 2, "strength": 0.82 }
        ]
    })
}

/// Mixed reply from an upload plus a collection.
pub fn upload_result_json() -> Value {
    json!({
        "sections": [
            { "text": "Onboarding Checklist", "document": "handbook.pdf", "page": 3,
              "importance": 0.91, "is_uploaded": true },
            { "text": "Fill and Sign Forms", "document": "acrobat_forms.pdf", "page": 7,
              "importance": 0.64, "is_uploaded": false }
        ]
    })
}

/// Smallest byte string that still looks like a PDF to a sniffing backend.
pub fn sample_pdf(name: &str) -> (String, Vec<u8>) {
    let body = format!("%PDF-1.4\n% {name}\n%%EOF\n");
    (name.to_string(), body.into_bytes())
}
