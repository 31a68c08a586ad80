// SPDX-License-Identifier: MIT

//! Interactive input - prompts for each request field in turn
//!
//! Produces the same [`ArticleRequest`] the command-line flags would.

use crate::scribe::error::ScribeError;
use crate::scribe::state::{parse_tags, ArticleRequest};
use std::io::{BufRead, Write};

/// Prompt for every field on `output` and read answers from `input`
pub fn prompt_request<R, W>(
    input: &mut R,
    output: &mut W,
    default_category: &str,
) -> Result<ArticleRequest, ScribeError>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "\n{}", "=".repeat(60))?;
    writeln!(output, "ARTICLE GENERATOR - Interactive Mode")?;
    writeln!(output, "{}\n", "=".repeat(60))?;

    let topic = ask(input, output, "Article Topic (required): ")?;
    if topic.is_empty() {
        return Err(ScribeError::input("topic is required"));
    }
    let mut request = ArticleRequest::new(topic);

    let url = ask(input, output, "Research URL (optional, press Enter to skip): ")?;
    if !url.is_empty() {
        request = request.with_source_url(url);
    }

    let category = ask(
        input,
        output,
        &format!("Category (default: {}): ", default_category),
    )?;
    request = request.with_category(if category.is_empty() {
        default_category.to_string()
    } else {
        category
    });

    let tags = ask(input, output, "Tags (comma-separated, optional): ")?;
    request = request.with_tags(parse_tags(&tags));

    let requirements = ask(input, output, "Additional requirements (optional): ")?;
    request = request.with_requirements(requirements);

    let filename = ask(
        input,
        output,
        "Custom filename (optional, press Enter to auto-generate): ",
    )?;
    if !filename.is_empty() {
        request = request.with_filename(filename);
    }

    Ok(request)
}

/// Print a prompt and read one trimmed line; end of input reads as empty
fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> Result<String, ScribeError> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_full_answers() {
        let mut input = Cursor::new(
            "S-Corp Election Deadline\nhttps://www.irs.gov/x\nEntity Planning\n\
             s-corp, deadlines\nInclude late election relief\nscorp.mdx\n",
        );
        let mut output = Vec::new();

        let request = prompt_request(&mut input, &mut output, "Tax Planning").unwrap();

        assert_eq!(request.topic, "S-Corp Election Deadline");
        assert_eq!(request.source_url.as_deref(), Some("https://www.irs.gov/x"));
        assert_eq!(request.category, "Entity Planning");
        assert_eq!(request.tags, vec!["s-corp", "deadlines"]);
        assert_eq!(request.requirements, "Include late election relief");
        assert_eq!(request.filename.as_deref(), Some("scorp.mdx"));

        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("Article Topic (required): "));
        assert!(shown.contains("Category (default: Tax Planning): "));
    }

    #[test]
    fn test_blank_answers_use_defaults() {
        let mut input = Cursor::new("Home Office Deduction\n\n\n\n\n\n");
        let request = prompt_request(&mut input, &mut Vec::new(), "Bookkeeping").unwrap();

        assert_eq!(
            request,
            ArticleRequest::new("Home Office Deduction").with_category("Bookkeeping")
        );
    }

    #[test]
    fn test_end_of_input_after_topic() {
        let mut input = Cursor::new("Payroll basics\n");
        let request = prompt_request(&mut input, &mut Vec::new(), "Tax Planning").unwrap();
        assert_eq!(request.topic, "Payroll basics");
        assert!(request.source_url.is_none());
    }

    #[test]
    fn test_empty_topic_is_rejected() {
        let mut input = Cursor::new("   \n");
        let err = prompt_request(&mut input, &mut Vec::new(), "Tax Planning").unwrap_err();
        assert!(matches!(err, ScribeError::Input(_)));
    }
}
