//! Literal-aware comment stripping for staged source files
//!
//! Implemented as a single left-to-right scan with an explicit region
//! state, never as regex substitution: comment-open sequences inside string
//! or pattern literals must survive byte-for-byte.

use crate::core::error::PublishError;
use std::path::Path;
use tokio::fs;
use walkdir::WalkDir;

/// Extensions of files rewritten by the stripper
pub const SOURCE_EXTENSIONS: &[&str] = &["js", "mjs", "cjs", "jsx", "ts", "mts", "cts", "tsx"];

/// Lexical region the scanner is currently inside
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Code,
    LineComment,
    BlockComment,
    StringLiteral(char),
    PatternLiteral,
}

/// Strip line and block comments from a source text
///
/// Characters in code and literal regions are emitted verbatim; characters
/// in comment regions are dropped, except a line comment's terminating line
/// boundary is kept so line numbers of subsequent code are unaffected.
/// An unterminated literal or block comment at end of input is not an
/// error; the remainder is treated as part of that region.
pub fn strip_comments(source: &str) -> String {
    let mut output = String::with_capacity(source.len());
    let mut region = Region::Code;
    let mut escaped = false;
    let mut chars = source.chars().peekable();

    while let Some(ch) = chars.next() {
        match region {
            Region::Code => {
                if ch == '/' {
                    match chars.peek() {
                        Some('/') => {
                            chars.next();
                            region = Region::LineComment;
                        }
                        Some('*') => {
                            chars.next();
                            region = Region::BlockComment;
                        }
                        _ => {
                            output.push(ch);
                            region = Region::PatternLiteral;
                            escaped = false;
                        }
                    }
                } else if ch == '"' || ch == '\'' || ch == '`' {
                    output.push(ch);
                    region = Region::StringLiteral(ch);
                    escaped = false;
                } else {
                    output.push(ch);
                }
            }
            Region::LineComment => {
                // The line boundary itself belongs to the code that follows
                if ch == '\n' {
                    output.push(ch);
                    region = Region::Code;
                }
            }
            Region::BlockComment => {
                if ch == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    region = Region::Code;
                }
            }
            Region::StringLiteral(delimiter) => {
                output.push(ch);
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == delimiter {
                    region = Region::Code;
                }
            }
            Region::PatternLiteral => {
                output.push(ch);
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == '/' {
                    region = Region::Code;
                }
            }
        }
    }

    output
}

/// Rewrite every staged source file in place, returning how many were
/// processed
pub async fn strip_staged_sources(staging_dir: &Path) -> Result<usize, PublishError> {
    let mut processed = 0;

    for entry in WalkDir::new(staging_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| PublishError::filesystem("comments", e))?;

        if !entry.file_type().is_file() || !is_source_file(entry.path()) {
            continue;
        }

        let content = fs::read_to_string(entry.path()).await.map_err(|e| {
            PublishError::filesystem("comments", format!("{}: {}", entry.path().display(), e))
        })?;

        let stripped = strip_comments(&content);
        if stripped != content {
            fs::write(entry.path(), stripped).await.map_err(|e| {
                PublishError::filesystem("comments", format!("{}: {}", entry.path().display(), e))
            })?;
        }
        processed += 1;
    }

    Ok(processed)
}

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_comment_removed_newline_kept() {
        let source = "const a = 1 // the answer\nconst b = 2\n";

        assert_eq!(strip_comments(source), "const a = 1 \nconst b = 2\n");
    }

    #[test]
    fn test_block_comment_removed() {
        let source = "const a = /* inline */ 1\n";

        assert_eq!(strip_comments(source), "const a =  1\n");
    }

    #[test]
    fn test_comment_at_file_start_and_end() {
        let source = "/* header */\nconst a = 1\n// trailer";

        assert_eq!(strip_comments(source), "\nconst a = 1\n");
    }

    #[test]
    fn test_comment_sequence_inside_string_survives() {
        let source = "const url = 'https://example.com' // real comment\n";

        assert_eq!(
            strip_comments(source),
            "const url = 'https://example.com' \n"
        );
    }

    #[test]
    fn test_block_open_inside_double_quoted_string_survives() {
        let source = "const s = \"/* not a comment */\"\n";

        assert_eq!(strip_comments(source), source);
    }

    #[test]
    fn test_template_literal_survives() {
        let source = "const s = `// still text\n/* also text */`\n";

        assert_eq!(strip_comments(source), source);
    }

    #[test]
    fn test_pattern_literal_with_escaped_slashes_survives() {
        let source = "const re = /ab\\/\\/cd/\n";

        assert_eq!(strip_comments(source), source);
    }

    #[test]
    fn test_escaped_delimiter_does_not_end_string() {
        let source = "const s = 'it\\'s // fine'\nconst t = 1\n";

        assert_eq!(strip_comments(source), source);
    }

    #[test]
    fn test_double_backslash_before_delimiter_ends_string() {
        let source = "const s = 'x\\\\' // gone\n";

        assert_eq!(strip_comments(source), "const s = 'x\\\\' \n");
    }

    #[test]
    fn test_multiline_block_comment_collapses() {
        let source = "a\n/* one\ntwo\nthree */\nb\n";

        assert_eq!(strip_comments(source), "a\n\nb\n");
    }

    #[test]
    fn test_unterminated_block_comment_drops_remainder() {
        let source = "const a = 1\n/* never closed";

        assert_eq!(strip_comments(source), "const a = 1\n");
    }

    #[test]
    fn test_unterminated_string_emits_remainder() {
        let source = "const s = 'open // not a comment";

        assert_eq!(strip_comments(source), source);
    }

    #[test]
    fn test_is_source_file() {
        assert!(is_source_file(Path::new("index.js")));
        assert!(is_source_file(Path::new("lib/mod.mjs")));
        assert!(is_source_file(Path::new("types.d.ts")));
        assert!(!is_source_file(Path::new("README.md")));
        assert!(!is_source_file(Path::new("package.json")));
    }

    #[tokio::test]
    async fn test_strip_staged_sources_rewrites_in_place() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("lib")).unwrap();
        std::fs::write(
            temp_dir.path().join("index.js"),
            "// entry\nmodule.exports = 1\n",
        )
        .unwrap();
        std::fs::write(
            temp_dir.path().join("lib/util.js"),
            "/* util */ exports.id = x => x\n",
        )
        .unwrap();
        std::fs::write(temp_dir.path().join("README.md"), "# pkg // keep\n").unwrap();

        let processed = strip_staged_sources(temp_dir.path()).await.unwrap();

        assert_eq!(processed, 2);
        assert_eq!(
            std::fs::read_to_string(temp_dir.path().join("index.js")).unwrap(),
            "\nmodule.exports = 1\n"
        );
        assert_eq!(
            std::fs::read_to_string(temp_dir.path().join("lib/util.js")).unwrap(),
            " exports.id = x => x\n"
        );
        assert_eq!(
            std::fs::read_to_string(temp_dir.path().join("README.md")).unwrap(),
            "# pkg // keep\n"
        );
    }
}
