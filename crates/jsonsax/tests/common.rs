#![allow(missing_docs, dead_code)]

pub const DOCUMENT: &str = r#"
{
    "moderation": {
        "decision": "allow",
        "reason": null
    },
    "request": {
        "filename": "example.rs",
        "language": "rust",
        "options": {
            "opt_level": 2,
            "features": [
                "serde",
                "tokio"
            ]
        }
    },
    "snippets": [
        "fn main() {}",
        "println!(\"hi\")"
    ],
    "entities": [
        {
            "type": "function",
            "name": "main",
            "score": 0.75
        },
        {
            "type": "macro",
            "name": "println",
            "score": -1.5e-2
        }
    ],
    "matrix": [
        [
            "a"
        ],
        []
    ],
    "escapes": "tab\t newline\n quote\" slash\/ e\u0301 clef\uD834\uDD1E",
    "flags": [true, false, null]
}
"#;

/// The contexts under test, built over the same input.
#[derive(Debug, Clone, Copy)]
pub enum Kind {
    InPlace,
    Const,
    Stream,
}
