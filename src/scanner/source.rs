//! Line-oriented header sources.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::ops::Range;
use std::path::Path;

use crate::core::Guard;

use super::dialect::Dialect;
use super::error::ScanError;
use super::recognize;

/// A header file split into lines.
#[derive(Debug, Clone)]
pub struct HeaderSource {
    name: String,
    lines: Vec<String>,
}

/// A line inside a struct body together with the condition it lives under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardedLine {
    /// 1-based line number
    pub number: usize,
    /// Line text with comments removed and whitespace trimmed
    pub text: String,
    pub guard: Option<Guard>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Branch {
    Normal,
    Condition,
    Skip,
}

impl HeaderSource {
    pub fn open(path: &Path) -> Result<Self, ScanError> {
        let io_error = |source| ScanError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(io_error)?;
        let lines = read_lines(BufReader::new(file)).map_err(io_error)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(HeaderSource { name, lines })
    }

    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        HeaderSource {
            name: name.into(),
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    pub fn from_reader(name: impl Into<String>, reader: impl BufRead) -> Result<Self, ScanError> {
        let name = name.into();
        let lines = read_lines(reader).map_err(|source| ScanError::Io {
            path: name.clone().into(),
            source,
        })?;
        Ok(HeaderSource { name, lines })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Index of the first line containing `needle`.
    pub fn find(&self, needle: &str) -> Option<usize> {
        self.lines.iter().position(|l| l.contains(needle))
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.find(needle).is_some()
    }

    /// Body of the struct or enum introduced by the first line mentioning
    /// `name`.
    ///
    /// The range starts after the first `{` line and ends before the next
    /// `}` line. Braces are not counted, so bodies must not nest.
    pub fn struct_range(&self, name: &str) -> Result<Range<usize>, ScanError> {
        let start = self.find(name).ok_or_else(|| ScanError::StructureNotFound {
            file: self.name.clone(),
            name: name.to_string(),
        })?;
        self.struct_range_at(start, name)
    }

    /// Same as [`HeaderSource::struct_range`], starting from a known line.
    pub fn struct_range_at(&self, line: usize, name: &str) -> Result<Range<usize>, ScanError> {
        let unbalanced = |expected: char, at: usize| ScanError::UnbalancedBrace {
            file: self.name.clone(),
            name: name.to_string(),
            line: at + 1,
            expected,
        };

        let open = (line..self.lines.len())
            .find(|&i| self.lines[i].contains('{'))
            .ok_or_else(|| unbalanced('{', line))?;

        let brace_line = &self.lines[open];
        if let Some(pos) = brace_line.find('{') {
            if brace_line[pos..].contains('}') {
                return Ok(open + 1..open + 1);
            }
        }

        let start = open + 1;
        let end = (start..self.lines.len())
            .find(|&i| self.lines[i].contains('}'))
            .ok_or_else(|| unbalanced('}', open))?;

        Ok(start..end)
    }

    /// Lines of a body with their active guard.
    ///
    /// One flat level of `#if`/`#ifdef`/`#ifndef` is understood. Lines of an
    /// `#else` branch are dropped. Blank lines, comments and other
    /// preprocessor directives are skipped.
    pub fn guarded_lines(&self, range: Range<usize>) -> Result<Vec<GuardedLine>, ScanError> {
        let mut out = Vec::new();
        let mut branch = Branch::Normal;
        let mut guard: Option<Guard> = None;
        let mut opened_at = 0;
        let mut in_comment = false;

        for i in range {
            let text = strip_comments(&self.lines[i], &mut in_comment);
            let text = text.trim();
            if text.is_empty() {
                continue;
            }

            if let Some(directive) = text.strip_prefix('#') {
                let directive = directive.trim_start();
                let (keyword, rest) = directive
                    .split_once(char::is_whitespace)
                    .map(|(k, r)| (k, r.trim()))
                    .unwrap_or((directive, ""));

                let unbalanced = |message: &'static str| ScanError::UnbalancedConditional {
                    file: self.name.clone(),
                    line: i + 1,
                    text: text.to_string(),
                    message,
                };

                match keyword {
                    "if" | "ifdef" | "ifndef" => {
                        if branch != Branch::Normal {
                            return Err(unbalanced("nested conditional"));
                        }
                        if rest.is_empty() {
                            return Err(unbalanced("conditional without expression"));
                        }
                        guard = Some(match keyword {
                            "ifdef" => Guard::defined(rest),
                            "ifndef" => Guard::not_defined(rest),
                            _ => Guard::new(rest),
                        });
                        branch = Branch::Condition;
                        opened_at = i;
                    }
                    "else" => {
                        if branch != Branch::Condition {
                            return Err(unbalanced("`#else` without `#if`"));
                        }
                        branch = Branch::Skip;
                    }
                    "elif" => return Err(unbalanced("`#elif` is not supported")),
                    "endif" => {
                        if branch == Branch::Normal {
                            return Err(unbalanced("`#endif` without `#if`"));
                        }
                        branch = Branch::Normal;
                        guard = None;
                    }
                    _ => {}
                }
                continue;
            }

            if branch == Branch::Skip {
                continue;
            }

            out.push(GuardedLine {
                number: i + 1,
                text: text.to_string(),
                guard: guard.clone(),
            });
        }

        if branch != Branch::Normal {
            return Err(ScanError::UnbalancedConditional {
                file: self.name.clone(),
                line: opened_at + 1,
                text: self.lines[opened_at].trim().to_string(),
                message: "unterminated conditional",
            });
        }

        Ok(out)
    }

    /// Business names of every callback typedef, in declaration order.
    pub fn callback_functions(&self, dialect: &Dialect) -> Result<Vec<String>, ScanError> {
        let mut functions = Vec::new();
        for (i, line) in self.lines.iter().enumerate() {
            match recognize::callback_typedef(line, dialect) {
                Ok(Some(name)) => functions.push(name),
                Ok(None) => {}
                Err(mismatch) => {
                    return Err(ScanError::UnrecognizedDeclaration {
                        file: self.name.clone(),
                        line: i + 1,
                        text: line.trim().to_string(),
                        expected: mismatch.0,
                    })
                }
            }
        }
        Ok(functions)
    }

    /// The header version line, without comment decoration.
    pub fn version_line(&self, marker: &str) -> Option<String> {
        let index = self.find(marker)?;
        let line = self.lines[index]
            .trim()
            .trim_start_matches(|c: char| c == '/' || c == '*' || c.is_whitespace());
        Some(line.to_string())
    }
}

/// Remove `//` and `/* */` comments from one line. `in_comment` carries an
/// open block comment across lines.
fn strip_comments(line: &str, in_comment: &mut bool) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;

    loop {
        if *in_comment {
            match rest.find("*/") {
                Some(end) => {
                    rest = &rest[end + 2..];
                    *in_comment = false;
                }
                None => return out,
            }
        }

        let line_comment = rest.find("//");
        let block_comment = rest.find("/*");
        match (line_comment, block_comment) {
            (Some(l), Some(b)) if l < b => {
                out.push_str(&rest[..l]);
                return out;
            }
            (Some(l), None) => {
                out.push_str(&rest[..l]);
                return out;
            }
            (_, Some(b)) => {
                out.push_str(&rest[..b]);
                out.push(' ');
                rest = &rest[b + 2..];
                *in_comment = true;
            }
            (None, None) => {
                out.push_str(rest);
                return out;
            }
        }
    }
}

fn read_lines(reader: impl BufRead) -> io::Result<Vec<String>> {
    reader.lines().collect()
}
