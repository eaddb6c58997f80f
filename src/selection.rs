// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Interactive model selection
//!
//! The advisor asks questions through [`ModelChooser`] so the flow can be
//! driven by a terminal, a script, or a test double.

use std::io::{BufRead, Write};

use crate::error::Result;
use crate::matcher::Recommendation;

/// Invalid answers tolerated before a prompt counts as cancelled
pub const MAX_ATTEMPTS: usize = 3;

/// Request/response interface for user decisions
#[cfg_attr(test, mockall::automock)]
pub trait ModelChooser {
    /// Pick one of `candidates`; `None` means the user cancelled
    fn choose(&mut self, candidates: &[Recommendation]) -> Result<Option<usize>>;

    /// Yes/no question
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

/// Numbered menus over any reader/writer pair
pub struct TerminalChooser<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalChooser<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_answer(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl TerminalChooser<std::io::StdinLock<'static>, std::io::Stdout> {
    /// Chooser on the process's stdin/stdout
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> ModelChooser for TerminalChooser<R, W> {
    fn choose(&mut self, candidates: &[Recommendation]) -> Result<Option<usize>> {
        if candidates.is_empty() {
            return Ok(None);
        }

        writeln!(self.output)?;
        writeln!(self.output, "Select a model to install:")?;
        for (i, rec) in candidates.iter().enumerate() {
            writeln!(
                self.output,
                "  {}) {} (context {}, {})",
                i + 1,
                rec.name(),
                rec.adjusted_context,
                rec.note
            )?;
        }
        writeln!(self.output, "  0) Cancel")?;

        for _ in 0..MAX_ATTEMPTS {
            write!(self.output, "Choice [1-{}]: ", candidates.len())?;
            self.output.flush()?;

            let answer = match self.read_answer()? {
                Some(answer) => answer,
                None => return Ok(None),
            };
            if answer.is_empty() || answer == "0" || answer.eq_ignore_ascii_case("q") {
                return Ok(None);
            }

            match answer.parse::<usize>() {
                Ok(n) if (1..=candidates.len()).contains(&n) => return Ok(Some(n - 1)),
                _ => writeln!(
                    self.output,
                    "Please enter a number between 1 and {}, or 0 to cancel.",
                    candidates.len()
                )?,
            }
        }

        tracing::debug!("selection cancelled after {} invalid answers", MAX_ATTEMPTS);
        Ok(None)
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        for _ in 0..MAX_ATTEMPTS {
            write!(self.output, "{} [y/N]: ", question)?;
            self.output.flush()?;

            let answer = match self.read_answer()? {
                Some(answer) => answer.to_ascii_lowercase(),
                None => return Ok(false),
            };
            match answer.as_str() {
                "y" | "yes" => return Ok(true),
                "" | "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "Please answer y or n.")?,
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::FitNote;
    use crate::models::ModelDescriptor;
    use std::io::Cursor;

    fn candidates() -> Vec<Recommendation> {
        vec![
            Recommendation {
                descriptor: ModelDescriptor::new("qwen2.5-coder:7b", 5, 6, 32768),
                adjusted_context: 32768,
                note: FitNote::FullContext,
            },
            Recommendation {
                descriptor: ModelDescriptor::new("qwen2.5-coder:14b", 12, 16, 32768),
                adjusted_context: 28672,
                note: FitNote::SlowerPerformance,
            },
        ]
    }

    fn chooser(input: &str) -> TerminalChooser<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalChooser::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_choose_valid_index() {
        let mut c = chooser("2\n");
        assert_eq!(c.choose(&candidates()).unwrap(), Some(1));
        let shown = String::from_utf8(c.output).unwrap();
        assert!(shown.contains("1) qwen2.5-coder:7b (context 32768, full context usable)"));
        assert!(shown.contains("0) Cancel"));
    }

    #[test]
    fn test_choose_cancel_variants() {
        for input in ["0\n", "q\n", "Q\n", "\n", ""] {
            let mut c = chooser(input);
            assert_eq!(c.choose(&candidates()).unwrap(), None, "input {:?}", input);
        }
    }

    #[test]
    fn test_choose_reprompts_on_invalid() {
        let mut c = chooser("9\nabc\n1\n");
        assert_eq!(c.choose(&candidates()).unwrap(), Some(0));
        let shown = String::from_utf8(c.output).unwrap();
        assert_eq!(shown.matches("Please enter a number").count(), 2);
    }

    #[test]
    fn test_choose_gives_up_after_max_attempts() {
        let mut c = chooser("7\n8\n9\n1\n");
        assert_eq!(c.choose(&candidates()).unwrap(), None);
    }

    #[test]
    fn test_choose_empty_candidates() {
        let mut c = chooser("1\n");
        assert_eq!(c.choose(&[]).unwrap(), None);
    }

    #[test]
    fn test_confirm() {
        assert!(chooser("y\n").confirm("Launch?").unwrap());
        assert!(chooser("YES\n").confirm("Launch?").unwrap());
        assert!(!chooser("n\n").confirm("Launch?").unwrap());
        assert!(!chooser("\n").confirm("Launch?").unwrap());
        assert!(!chooser("").confirm("Launch?").unwrap());
        assert!(chooser("maybe\ny\n").confirm("Launch?").unwrap());
    }
}
