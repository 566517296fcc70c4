// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Extraction of drawable markup from individual SVG icon files.
//!
//! Extraction is pattern based rather than a full XML parse. The contract is
//! narrow: strip any XML prolog, take the first `viewBox` attribute found in
//! the document, and capture everything between the outermost `<svg>` opening
//! tag and the last `</svg>` closing tag. Files that do not match produce an
//! empty fragment and a warning instead of an error, so one broken icon never
//! aborts a batch.

use regex::Regex;
use tracing::warn;

use crate::{error::Error, scan::IconSource};

/// View box applied when an icon declares none or declares a malformed one.
pub const DEFAULT_VIEW_BOX: &str = "0 0 24 24";

const XML_PROLOG_PATTERN: &str = r"<\?xml[^>]*\?>";
const VIEW_BOX_PATTERN: &str = r#"viewBox="([^"]*)""#;
const WRAPPER_PATTERN: &str = r"(?s)<svg[^>]*>(.*)</svg>";

/// Parsed representation of one icon source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconFragment {
    /// Icon identifier derived from the source file name.
    pub name:     String,
    /// Geometry bounding box copied into the sprite symbol.
    pub view_box: String,
    /// Inner drawable markup, empty when extraction failed.
    pub content:  String
}

impl IconFragment {
    /// Returns `true` when the fragment carries drawable markup.
    ///
    /// Fragments without content are excluded from the sprite and from the
    /// identifier enumeration.
    pub fn is_extracted(&self) -> bool {
        !self.content.is_empty()
    }
}

/// Compiled extraction patterns reused across every icon of a pipeline run.
#[derive(Debug, Clone)]
pub struct Extractor {
    prolog:   Regex,
    view_box: Regex,
    wrapper:  Regex
}

impl Extractor {
    /// Compiles the extraction patterns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if a pattern fails to compile.
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            prolog:   compile(XML_PROLOG_PATTERN)?,
            view_box: compile(VIEW_BOX_PATTERN)?,
            wrapper:  compile(WRAPPER_PATTERN)?
        })
    }

    /// Extracts the fragment for a source read by the scanner.
    pub fn extract_source(&self, source: &IconSource) -> IconFragment {
        let mut fragment = self.extract(&source.contents, &source.file_name);
        fragment.name.clone_from(&source.name);
        fragment
    }

    /// Extracts the view box and inner markup of `raw`.
    ///
    /// `file_name` is used for diagnostics and to derive the fragment name.
    ///
    /// # Examples
    ///
    /// ```
    /// use icon_sprite::Extractor;
    ///
    /// let extractor = Extractor::new().expect("patterns compile");
    /// let fragment = extractor.extract(
    ///     r#"<?xml version="1.0"?><svg viewBox="0 0 16 16"><path d="M1 1"/></svg>"#,
    ///     "board.svg"
    /// );
    /// assert_eq!(fragment.name, "board");
    /// assert_eq!(fragment.view_box, "0 0 16 16");
    /// assert_eq!(fragment.content, r#"<path d="M1 1"/>"#);
    /// ```
    pub fn extract(&self, raw: &str, file_name: &str) -> IconFragment {
        let name = crate::scan::icon_name(file_name)
            .unwrap_or(file_name)
            .to_owned();
        let document = self.prolog.replace_all(raw, "");

        let view_box = match self
            .view_box
            .captures(&document)
            .and_then(|captures| captures.get(1))
        {
            Some(value) if is_valid_view_box(value.as_str()) => value.as_str().to_owned(),
            Some(value) => {
                warn!(
                    "Malformed viewBox \"{}\" in {file_name}, using {DEFAULT_VIEW_BOX}",
                    value.as_str()
                );
                DEFAULT_VIEW_BOX.to_owned()
            }
            None => DEFAULT_VIEW_BOX.to_owned()
        };

        let content = match self
            .wrapper
            .captures(&document)
            .and_then(|captures| captures.get(1))
        {
            Some(inner) => inner.as_str().trim().to_owned(),
            None => {
                warn!("Could not extract content from {file_name}");
                String::new()
            }
        };

        IconFragment {
            name,
            view_box,
            content
        }
    }
}

fn compile(pattern: &str) -> Result<Regex, Error> {
    Regex::new(pattern).map_err(|e| Error::validation(format!("invalid regex: {e}")))
}

/// A view box is four finite numbers separated by whitespace and/or commas.
fn is_valid_view_box(value: &str) -> bool {
    let parts: Vec<&str> = value
        .split(|character: char| character.is_whitespace() || character == ',')
        .filter(|part| !part.is_empty())
        .collect();

    parts.len() == 4
        && parts
            .iter()
            .all(|part| part.parse::<f64>().is_ok_and(f64::is_finite))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn extractor() -> Extractor {
        Extractor::new().expect("patterns must compile")
    }

    #[test]
    fn strips_prolog_and_wrapper_tags() {
        let raw = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 24 24\">\n  <path d=\"M1 1\"/>\n</svg>\n";
        let fragment = extractor().extract(raw, "board.svg");

        assert_eq!(fragment.name, "board");
        assert_eq!(fragment.view_box, "0 0 24 24");
        assert_eq!(fragment.content, "<path d=\"M1 1\"/>");
        assert!(fragment.is_extracted());
    }

    #[test]
    fn missing_view_box_falls_back_to_default() {
        let fragment = extractor().extract("<svg><circle r=\"2\"/></svg>", "dot.svg");
        assert_eq!(fragment.view_box, DEFAULT_VIEW_BOX);
        assert_eq!(fragment.content, "<circle r=\"2\"/>");
    }

    #[test]
    fn malformed_view_box_falls_back_to_default() {
        let fragment =
            extractor().extract("<svg viewBox=\"0 0 wide\"><g/></svg>", "wide.svg");
        assert_eq!(fragment.view_box, DEFAULT_VIEW_BOX);
    }

    #[test]
    fn comma_separated_view_box_is_kept_verbatim() {
        let fragment =
            extractor().extract("<svg viewBox=\"0,0,32,32\"><g/></svg>", "grid.svg");
        assert_eq!(fragment.view_box, "0,0,32,32");
    }

    #[test]
    fn first_view_box_wins_even_inside_children() {
        let raw = "<svg><symbol viewBox=\"0 0 8 8\"/><svg viewBox=\"0 0 99 99\"></svg></svg>";
        let fragment = extractor().extract(raw, "nested.svg");
        assert_eq!(fragment.view_box, "0 0 8 8");
    }

    #[test]
    fn content_spans_outermost_wrapper() {
        let raw = "<svg viewBox=\"0 0 24 24\"><svg x=\"2\"><rect/></svg><path/></svg>";
        let fragment = extractor().extract(raw, "stacked.svg");
        assert_eq!(fragment.content, "<svg x=\"2\"><rect/></svg><path/>");
    }

    #[test]
    fn unclosed_wrapper_yields_empty_content() {
        let fragment = extractor().extract("<svg viewBox=\"0 0 24 24\"><path/>", "broken.svg");
        assert_eq!(fragment.name, "broken");
        assert!(fragment.content.is_empty());
        assert!(!fragment.is_extracted());
    }

    #[test]
    fn whitespace_only_body_counts_as_failure() {
        let fragment = extractor().extract("<svg>\n   \n</svg>", "blank.svg");
        assert!(!fragment.is_extracted());
    }

    #[test]
    fn extract_source_keeps_scanner_identifier() {
        let source = IconSource {
            name:      "board".to_owned(),
            file_name: "board.svg".to_owned(),
            contents:  "<svg><path/></svg>".to_owned()
        };
        let fragment = extractor().extract_source(&source);
        assert_eq!(fragment.name, "board");
        assert_eq!(fragment.content, "<path/>");
    }

    fn element() -> impl Strategy<Value = String> {
        (0_u16..100, 0_u16..100, prop::sample::select(vec!["path", "circle", "rect"]))
            .prop_map(|(x, y, tag)| format!("<{tag} d=\"M{x} {y}\"/>"))
    }

    proptest! {
        #[test]
        fn extracted_content_never_contains_wrapper_or_prolog(
            body in prop::collection::vec(element(), 1..6),
            with_prolog in any::<bool>(),
            with_view_box in any::<bool>(),
        ) {
            let inner = body.join("\n");
            let prolog = if with_prolog { "<?xml version=\"1.0\"?>\n" } else { "" };
            let view_box = if with_view_box { " viewBox=\"0 0 48 48\"" } else { "" };
            let raw = format!("{prolog}<svg xmlns=\"http://www.w3.org/2000/svg\"{view_box}>\n{inner}\n</svg>");

            let fragment = extractor().extract(&raw, "generated.svg");

            prop_assert_eq!(&fragment.content, &inner);
            prop_assert!(!fragment.content.contains("<svg"));
            prop_assert!(!fragment.content.contains("</svg>"));
            prop_assert!(!fragment.content.contains("<?xml"));
            let expected_view_box = if with_view_box { "0 0 48 48" } else { DEFAULT_VIEW_BOX };
            prop_assert_eq!(fragment.view_box.as_str(), expected_view_box);
        }
    }
}
