//! Groups release notes into categories and renders them as a markdown
//! document.
use regex::Regex;
use serde::Serialize;
use std::{collections::BTreeMap, io::Write, sync::LazyLock};

use crate::{
    error::Result,
    notes::{ReleaseNote, labels::prettify_sig_list},
};

/// Default markdown document template.
pub const DEFAULT_TEMPLATE: &str = r#"{% if action_required -%}
## Action Required

{% for note in action_required -%}
- {{ note }}
{% endfor %}
{% endif -%}
{% if new_features -%}
## New Features

{% for note in new_features -%}
- {{ note }}
{% endfor %}
{% endif -%}
{% if duplicates -%}
## Notes From Multiple SIGs

{% for sig_list, notes in duplicates -%}
### {{ sig_list }}

{% for note in notes -%}
- {{ note }}
{% endfor %}
{% endfor %}
{% endif -%}
{% if bug_fixes -%}
## Bug Fixes

{% for note in bug_fixes -%}
- {{ note }}
{% endfor %}
{% endif -%}
{% if sigs -%}
## Notes From Individual SIGs

{% for sig, notes in sigs -%}
### SIG {{ sig | replace(from="-", to=" ") | title }}

{% for note in notes -%}
- {{ note }}
{% endfor %}
{% endfor %}
{% endif -%}
{% if uncategorized -%}
## Other Notable Changes

{% for note in uncategorized -%}
- {{ note }}
{% endfor %}
{% endif -%}
"#;

const BUG_KIND: &str = "bug";

/// Matches 3 or more consecutive new lines
static EXTRA_NEW_LINES_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Release notes grouped by category. Every note lands in exactly one
/// bucket; values are the notes' markdown lines in commit order.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Document {
    pub action_required: Vec<String>,
    pub new_features: Vec<String>,
    /// Keyed by the prettified list of SIGs the note is duplicated across
    pub duplicates: BTreeMap<String, Vec<String>>,
    pub bug_fixes: Vec<String>,
    /// Keyed by SIG name
    pub sigs: BTreeMap<String, Vec<String>>,
    pub uncategorized: Vec<String>,
}

/// Sort notes into document categories. The first matching rule wins:
/// action required, feature, duplicate, bug fix, per-SIG, uncategorized.
pub fn create_document(notes: &[ReleaseNote]) -> Document {
    let mut doc = Document::default();

    for note in notes {
        let line = note.markdown.clone();

        if note.action_required {
            doc.action_required.push(line);
        } else if note.feature {
            doc.new_features.push(line);
        } else if note.duplicate {
            doc.duplicates
                .entry(prettify_sig_list(&note.sigs))
                .or_default()
                .push(line);
        } else if note.kinds.iter().any(|k| k == BUG_KIND) {
            doc.bug_fixes.push(line);
        } else if note.sigs.is_empty() {
            doc.uncategorized.push(line);
        } else {
            for sig in note.sigs.iter() {
                doc.sigs.entry(sig.clone()).or_default().push(line.clone());
            }
        }
    }

    doc
}

/// Render `doc` through `template` (or [`DEFAULT_TEMPLATE`]) and write the
/// markdown to `writer`.
pub fn render_markdown(
    doc: &Document,
    template: Option<&str>,
    writer: &mut impl Write,
) -> Result<()> {
    let context = tera::Context::from_serialize(doc)?;
    let rendered = tera::Tera::one_off(
        template.unwrap_or(DEFAULT_TEMPLATE),
        &context,
        false,
    )?;

    let markdown = EXTRA_NEW_LINES_REGEX.replace_all(rendered.trim(), "\n\n");

    writeln!(writer, "{markdown}")?;
    writer.flush()?;

    Ok(())
}

/// Write the notes as a pretty printed JSON array.
pub fn render_json(notes: &[ReleaseNote], writer: &mut impl Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, notes)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReleaseNotesError;
    use std::io;

    fn note(text: &str) -> ReleaseNote {
        ReleaseNote {
            commit: format!("sha-{text}"),
            text: text.into(),
            markdown: format!("{text} ([#1](https://github.com/o/r/pull/1))"),
            author: "alice".into(),
            author_url: "https://github.com/alice".into(),
            pr_url: "https://github.com/o/r/pull/1".into(),
            pr_number: 1,
            areas: vec![],
            kinds: vec![],
            sigs: vec![],
            feature: false,
            duplicate: false,
            action_required: false,
        }
    }

    fn sample_notes() -> Vec<ReleaseNote> {
        vec![
            ReleaseNote {
                action_required: true,
                feature: true,
                sigs: vec!["api".into()],
                ..note("Rename flag")
            },
            ReleaseNote {
                feature: true,
                ..note("Dark mode")
            },
            ReleaseNote {
                duplicate: true,
                sigs: vec!["api".into(), "ui".into()],
                ..note("Shared fix")
            },
            ReleaseNote {
                kinds: vec!["bug".into()],
                sigs: vec!["ui".into()],
                ..note("Chart legend")
            },
            ReleaseNote {
                sigs: vec!["cloud-sync".into()],
                ..note("Faster sync")
            },
            note("Docs tweak"),
        ]
    }

    #[test]
    fn test_create_document_groups_notes() {
        let doc = create_document(&sample_notes());

        assert_eq!(doc.action_required.len(), 1);
        assert!(doc.action_required[0].starts_with("Rename flag"));
        assert_eq!(doc.new_features.len(), 1);
        assert!(doc.new_features[0].starts_with("Dark mode"));
        assert_eq!(
            doc.duplicates.keys().collect::<Vec<_>>(),
            vec!["sig/api, sig/ui"]
        );
        assert_eq!(doc.bug_fixes.len(), 1);
        assert_eq!(doc.sigs.keys().collect::<Vec<_>>(), vec!["cloud-sync"]);
        assert_eq!(doc.uncategorized.len(), 1);
        assert!(doc.uncategorized[0].starts_with("Docs tweak"));
    }

    #[test]
    fn test_note_with_several_sigs_listed_under_each() {
        let notes = vec![ReleaseNote {
            sigs: vec!["ui".into(), "api".into()],
            ..note("Shared tweak")
        }];

        let doc = create_document(&notes);

        assert_eq!(doc.sigs.len(), 2);
        assert_eq!(doc.sigs["api"], doc.sigs["ui"]);
        assert!(doc.uncategorized.is_empty());
    }

    #[test]
    fn test_render_markdown_default_template() {
        let doc = create_document(&sample_notes());
        let mut out: Vec<u8> = vec![];

        render_markdown(&doc, None, &mut out).unwrap();

        let markdown = String::from_utf8(out).unwrap();
        assert!(markdown.starts_with("## Action Required\n\n- Rename flag"));
        assert!(markdown.contains("## New Features\n\n- Dark mode"));
        assert!(markdown.contains("### sig/api, sig/ui\n\n- Shared fix"));
        assert!(markdown.contains("## Bug Fixes\n\n- Chart legend"));
        assert!(markdown.contains("### SIG Cloud Sync\n\n- Faster sync"));
        assert!(markdown.contains("## Other Notable Changes\n\n- Docs tweak"));
        assert!(!markdown.contains("\n\n\n"));
    }

    #[test]
    fn test_render_markdown_skips_empty_sections() {
        let doc = create_document(&[note("Docs tweak")]);
        let mut out: Vec<u8> = vec![];

        render_markdown(&doc, None, &mut out).unwrap();

        let markdown = String::from_utf8(out).unwrap();
        assert_eq!(
            markdown,
            "## Other Notable Changes\n\n- Docs tweak ([#1](https://github.com/o/r/pull/1))\n"
        );
    }

    #[test]
    fn test_render_markdown_custom_template() {
        let doc = create_document(&sample_notes());
        let mut out: Vec<u8> = vec![];

        render_markdown(
            &doc,
            Some("{{ new_features | length }} features"),
            &mut out,
        )
        .unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "1 features\n");
    }

    #[test]
    fn test_render_markdown_invalid_template() {
        let doc = Document::default();
        let mut out: Vec<u8> = vec![];

        let result = render_markdown(&doc, Some("{% for %}"), &mut out);

        assert!(matches!(result, Err(ReleaseNotesError::TemplateError(_))));
    }

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_render_markdown_reports_write_failure() {
        let doc = create_document(&[note("Docs tweak")]);
        let result = render_markdown(&doc, None, &mut BrokenWriter);
        assert!(result.is_err());
    }

    #[test]
    fn test_render_json_omits_empty_fields() {
        let notes = vec![ReleaseNote {
            feature: true,
            sigs: vec!["ui".into()],
            ..note("Dark mode")
        }];
        let mut out: Vec<u8> = vec![];

        render_json(&notes, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let first = &value[0];
        assert_eq!(first["text"], "Dark mode");
        assert_eq!(first["feature"], true);
        assert_eq!(first["sigs"][0], "ui");
        assert!(first.get("areas").is_none());
        assert!(first.get("duplicate").is_none());
        assert!(first.get("action_required").is_none());
    }
}
