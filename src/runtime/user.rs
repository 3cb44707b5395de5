//! User interaction operations (line prompts).

use anyhow::Result;

use super::RealRuntime;

use std::io::{self, BufRead, Write};

/// Core, testable implementation that reads from any BufRead and writes to any Write.
/// Returns `None` when the input is exhausted.
pub(crate) fn prompt_with_io<R: BufRead, W: Write>(
    message: &str,
    default: Option<&str>,
    input: &mut R,
    output: &mut W,
) -> Result<Option<String>> {
    match default {
        Some(d) if !d.is_empty() => write!(output, "{} [{}] ", message, d)?,
        _ => write!(output, "{} ", message)?,
    }
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }

    let answer = line.trim_end_matches(['\r', '\n']);
    if answer.trim().is_empty() {
        if let Some(d) = default {
            return Ok(Some(d.to_string()));
        }
    }
    Ok(Some(answer.to_string()))
}

impl RealRuntime {
    pub(crate) fn prompt_impl(&self, message: &str, default: Option<&str>) -> Result<Option<String>> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut stdin_lock = stdin.lock();
        prompt_with_io(message, default, &mut stdin_lock, &mut stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::prompt_with_io;
    use anyhow::Result;
    use std::io::Cursor;

    #[test]
    fn returns_answer_without_newline() -> Result<()> {
        let mut input = Cursor::new(b"classify\r\n".to_vec());
        let mut output = Vec::new();
        let answer = prompt_with_io("Mode?", None, &mut input, &mut output)?;
        assert_eq!(answer.as_deref(), Some("classify"));
        assert_eq!(String::from_utf8(output)?, "Mode? ");
        Ok(())
    }

    #[test]
    fn empty_answer_uses_default() -> Result<()> {
        let mut input = Cursor::new(b"  \n".to_vec());
        let mut output = Vec::new();
        let answer = prompt_with_io("Mode?", Some("stats"), &mut input, &mut output)?;
        assert_eq!(answer.as_deref(), Some("stats"));
        assert_eq!(String::from_utf8(output)?, "Mode? [stats] ");
        Ok(())
    }

    #[test]
    fn end_of_input_is_none() -> Result<()> {
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();
        let answer = prompt_with_io("Text:", Some("hola"), &mut input, &mut output)?;
        assert!(answer.is_none());
        Ok(())
    }
}
