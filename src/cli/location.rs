//! Cursor location parsing for CLI commands
//!
//! Lines are 1-based and columns are 0-based byte offsets, the convention
//! editors use when they send a hover position.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Where the source text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceInput {
    Stdin,
    File(PathBuf),
}

impl SourceInput {
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            Self::Stdin
        } else {
            Self::File(PathBuf::from(arg))
        }
    }

    pub async fn read(&self) -> Result<String> {
        match self {
            Self::Stdin => {
                use tokio::io::AsyncReadExt;
                let mut source = String::new();
                tokio::io::stdin()
                    .read_to_string(&mut source)
                    .await
                    .context("Failed to read source from stdin")?;
                Ok(source)
            }
            Self::File(path) => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display())),
        }
    }
}

impl std::fmt::Display for SourceInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdin => f.write_str("-"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLocation {
    pub input: SourceInput,
    pub line: u32,
    pub column: u32,
}

impl ParsedLocation {
    /// Build from a source argument plus optional explicit position
    ///
    /// Without `--line`/`--column` the argument itself must carry the
    /// position as `file:line:column`.
    pub fn resolve(target: &str, line: Option<u32>, column: Option<u32>) -> Result<Self> {
        match (line, column) {
            (Some(line), Some(column)) => {
                if line == 0 {
                    bail!("Line number must be >= 1 (got 0). Line numbers are 1-indexed.");
                }
                Ok(Self {
                    input: SourceInput::from_arg(target),
                    line,
                    column,
                })
            }
            (None, None) => Self::parse(target),
            _ => bail!("--line and --column must be given together"),
        }
    }

    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            bail!("Location cannot be empty");
        }

        let (file_part, rest) = Self::split_path_and_position(input)?;
        let (line, column) = Self::parse_position(rest)?;

        Ok(Self {
            input: SourceInput::from_arg(file_part),
            line,
            column,
        })
    }

    fn split_path_and_position(input: &str) -> Result<(&str, &str)> {
        let is_windows = input.len() > 2
            && input.as_bytes().get(1) == Some(&b':')
            && input.as_bytes().first().map(|b| b.is_ascii_alphabetic()) == Some(true);

        let search_start = if is_windows { 2 } else { 0 };

        let split = input[search_start..]
            .char_indices()
            .map(|(idx, _)| search_start + idx)
            .find(|&pos| {
                input.as_bytes()[pos] == b':'
                    && input[pos + 1..]
                        .chars()
                        .next()
                        .is_some_and(|c| c.is_ascii_digit() || c == '-')
            });

        let Some(pos) = split else {
            bail!("Invalid location format. Expected: file:line:column\nExample: app.py:10:4")
        };
        if input[pos + 1..].starts_with('-') {
            bail!(
                "Invalid line number: negative values not allowed. Line numbers are 1-indexed positive integers.\nExample: app.py:10:4"
            )
        }

        Ok((&input[..pos], &input[pos + 1..]))
    }

    fn parse_position(rest: &str) -> Result<(u32, u32)> {
        let Some((line_str, col_str)) = rest.split_once(':') else {
            bail!("Missing column. Expected: file:line:column (column is 0-indexed)");
        };

        let line: u32 = line_str.parse().map_err(|_| {
            anyhow::anyhow!(
                "Invalid line number '{}': must be a positive integer (1-indexed)",
                line_str
            )
        })?;
        let column: u32 = col_str.parse().map_err(|_| {
            anyhow::anyhow!(
                "Invalid column number '{}': must be a non-negative integer (0-indexed)",
                col_str
            )
        })?;

        if line == 0 {
            bail!("Line number must be >= 1 (got 0). Line numbers are 1-indexed.");
        }

        Ok((line, column))
    }
}

impl std::fmt::Display for ParsedLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.input, self.line, self.column)
    }
}
