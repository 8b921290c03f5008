//! Statement and image checks run before publishing

use std::fmt;
use std::sync::LazyLock;

use judge_fs::NormalizedPath;
use regex::Regex;
use walkdir::WalkDir;

/// `![alt](target)`
static IMAGE_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").unwrap());

/// At least one of these must exist for a problem to be publishable.
pub const STATEMENT_FILES: [&str; 2] = ["statements/es.markdown", "statements/en.markdown"];

/// A content defect found in a problem directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentIssue {
    MissingDirectory { problem: String },
    MissingStatement { problem: String },
    /// `markdown` is relative to the problem directory
    MissingImage {
        problem: String,
        image: String,
        markdown: String,
    },
    UnreadableMarkdown { problem: String, markdown: String },
}

impl ContentIssue {
    /// File the issue points at, relative to the problem directory.
    pub fn file(&self) -> Option<&str> {
        match self {
            Self::MissingImage { markdown, .. } | Self::UnreadableMarkdown { markdown, .. } => {
                Some(markdown)
            }
            Self::MissingDirectory { .. } | Self::MissingStatement { .. } => None,
        }
    }
}

impl fmt::Display for ContentIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDirectory { problem } => {
                write!(f, "Problem '{problem}': problem directory does not exist")
            }
            Self::MissingStatement { problem } => write!(
                f,
                "Problem '{problem}': missing at least one statement file (es or en)"
            ),
            Self::MissingImage {
                problem,
                image,
                markdown,
            } => write!(
                f,
                "Problem '{problem}': image not found: {image} (in {markdown})"
            ),
            Self::UnreadableMarkdown { problem, markdown } => write!(
                f,
                "Problem '{problem}': cannot read {markdown} (encoding issue)"
            ),
        }
    }
}

/// Check the statements and image references under `problem_dir`.
///
/// `title` only labels the issues. An empty result means the content is
/// publishable.
pub fn validate_problem_content(problem_dir: &NormalizedPath, title: &str) -> Vec<ContentIssue> {
    if !problem_dir.is_dir() {
        return vec![ContentIssue::MissingDirectory {
            problem: title.to_string(),
        }];
    }

    let mut issues = Vec::new();
    if !STATEMENT_FILES
        .iter()
        .any(|rel| problem_dir.join(rel).is_file())
    {
        issues.push(ContentIssue::MissingStatement {
            problem: title.to_string(),
        });
    }

    let mut markdown_files: Vec<NormalizedPath> = WalkDir::new(problem_dir.to_native())
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| NormalizedPath::new(entry.path()))
        .filter(|path| matches!(path.extension(), Some("md" | "markdown")))
        .collect();
    markdown_files.sort();

    for markdown in &markdown_files {
        issues.extend(check_images(problem_dir, markdown, title));
    }

    issues
}

fn check_images(problem_dir: &NormalizedPath, markdown: &NormalizedPath, title: &str) -> Vec<ContentIssue> {
    let display = markdown
        .relative_to(problem_dir)
        .unwrap_or_else(|| markdown.as_str().to_string());

    let content = match std::fs::read(markdown.to_native()).map(String::from_utf8) {
        Ok(Ok(content)) => content,
        Ok(Err(_)) | Err(_) => {
            tracing::debug!(file = %markdown.as_str(), "Markdown file is not readable UTF-8");
            return vec![ContentIssue::UnreadableMarkdown {
                problem: title.to_string(),
                markdown: display,
            }];
        }
    };

    let Some(base) = markdown.parent() else {
        return Vec::new();
    };

    IMAGE_REFERENCE
        .captures_iter(&content)
        .filter_map(|caps| caps.get(2).map(|m| m.as_str().trim()))
        .filter(|target| !target.starts_with("http") && !target.starts_with('/'))
        .map(|target| target.strip_prefix("./").unwrap_or(target))
        .filter(|target| !base.join(target).exists())
        .map(|target| ContentIssue::MissingImage {
            problem: title.to_string(),
            image: target.to_string(),
            markdown: display.clone(),
        })
        .collect()
}
