//! Terminal ports: the orchestrator reads answers through a [`Prompter`] and
//! writes progress through a [`Console`], so both can be scripted in tests.

use crate::error::RunError;
use colored::*;
use dialoguer::{theme::ColorfulTheme, Input};
use std::collections::VecDeque;
use std::io::{self, Stdout, Write};

pub const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";
pub const WIDE_RULE: &str =
    "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

pub trait Prompter {
    /// Asks one question and returns the raw answer, untrimmed.
    fn ask(&mut self, question: &str) -> Result<String, RunError>;
}

pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Prompter for DialoguerPrompter {
    fn ask(&mut self, question: &str) -> Result<String, RunError> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(question)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| RunError::Prompt(e.to_string()))
    }
}

/// Answers questions from a fixed list, in order. Running out of answers is
/// a prompt failure, like a closed stdin.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, question: &str) -> Result<String, RunError> {
        self.asked.push(question.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| RunError::Prompt(format!("no answer for '{}'", question)))
    }
}

/// Colored line-oriented output. Write errors are ignored, as with `println!`
/// on a closed pipe there is nobody left to tell.
pub struct Console<W: Write = Stdout> {
    out: W,
}

impl Console<Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn line(&mut self, text: impl AsRef<str>) {
        let _ = writeln!(self.out, "{}", text.as_ref());
    }

    pub fn blank(&mut self) {
        let _ = writeln!(self.out);
    }

    pub fn banner(&mut self, title: &str) {
        self.blank();
        self.line(RULE.cyan().bold().to_string());
        self.line(format!("{:^51}", title).cyan().bold().to_string());
        self.line(RULE.cyan().bold().to_string());
    }

    pub fn section(&mut self, title: &str) {
        self.blank();
        self.line(RULE.cyan().bold().to_string());
        self.line(format!(" 🚀 {}", title).cyan().to_string());
        self.line(RULE.cyan().bold().to_string());
    }

    /// `label: value` with the value highlighted.
    pub fn field(&mut self, label: &str, value: impl std::fmt::Display) {
        self.line(format!("{}: {}", label, value.to_string().yellow()));
    }

    pub fn success(&mut self, text: &str) {
        self.line(format!("✅ {}", text).green().to_string());
    }

    pub fn warn(&mut self, text: &str) {
        self.line(format!("⚠ {}", text).yellow().to_string());
    }

    pub fn error(&mut self, text: &str) {
        self.line(format!("❌ {}", text).red().to_string());
    }

    /// Writes a row without a newline so [`Console::resolve`] can replace it.
    pub fn pending(&mut self, text: &str) {
        let _ = write!(self.out, "{}", text);
        let _ = self.out.flush();
    }

    /// Clears the current terminal line and writes the final row.
    pub fn resolve(&mut self, text: &str) {
        let _ = writeln!(self.out, "\r\x1b[2K{}", text);
    }
}
