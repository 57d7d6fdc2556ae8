use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::{OrganizeError, Result};

/// Line-based question/answer over any `BufRead`.
///
/// EOF is an abort signal, not an answer: every ask returns `InputClosed`
/// when the stream ends, and the caller maps that to exit code 1.
pub struct Prompter {
    input: Box<dyn BufRead>,
}

impl Prompter {
    pub fn stdin() -> Self {
        Self {
            input: Box::new(io::BufReader::new(io::stdin())),
        }
    }

    pub fn from_reader(reader: impl BufRead + 'static) -> Self {
        Self {
            input: Box::new(reader),
        }
    }

    pub fn ask(&mut self, prompt: &str) -> Result<String> {
        print!("{}", prompt);
        io::stdout().flush()?;

        let mut line = String::new();
        let bytes = self.input.read_line(&mut line)?;
        if bytes == 0 {
            return Err(OrganizeError::InputClosed);
        }
        Ok(line.trim().to_string())
    }

    pub fn ask_yes_no(&mut self, prompt: &str, default: bool) -> Result<bool> {
        loop {
            let answer = self.ask(prompt)?;
            if answer.is_empty() {
                return Ok(default);
            }
            match answer.to_ascii_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => println!("Please answer y or n."),
            }
        }
    }

    pub fn ask_path(&mut self, prompt: &str) -> Result<PathBuf> {
        loop {
            let answer = self.ask(prompt)?;
            if !answer.is_empty() {
                return Ok(PathBuf::from(normalize_pasted_path(&answer)));
            }
            println!("A path is required.");
        }
    }

    /// Comma-separated list, at least one entry.
    pub fn ask_paths(&mut self, prompt: &str) -> Result<Vec<PathBuf>> {
        loop {
            let paths = self.ask_optional_paths(prompt)?;
            if !paths.is_empty() {
                return Ok(paths);
            }
            println!("At least one path is required.");
        }
    }

    /// Comma-separated list, possibly empty.
    pub fn ask_optional_paths(&mut self, prompt: &str) -> Result<Vec<PathBuf>> {
        let answer = self.ask(prompt)?;
        Ok(answer
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| PathBuf::from(normalize_pasted_path(s)))
            .collect())
    }

    /// Comma-separated extensions; empty answer falls back to `default`.
    pub fn ask_extensions(&mut self, prompt: &str, default: &[&str]) -> Result<Vec<String>> {
        let answer = self.ask(prompt)?;
        let picked: Vec<String> = answer
            .split(',')
            .map(|s| s.trim().trim_start_matches('.').to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        if picked.is_empty() {
            Ok(default.iter().map(|e| (*e).to_string()).collect())
        } else {
            Ok(picked)
        }
    }
}

/// Undoes the escaping shells add when a path is copy-pasted from a
/// terminal. CLI-boundary concern only; the engine sees clean paths.
fn normalize_pasted_path(raw: &str) -> String {
    let trimmed = raw
        .trim()
        .trim_start_matches(['\'', '"'])
        .trim_end_matches(['\'', '"']);
    trimmed
        .replace("\\ ", " ")
        .replace("\\(", "(")
        .replace("\\)", ")")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn prompter(script: &str) -> Prompter {
        Prompter::from_reader(Cursor::new(script.to_string()))
    }

    #[test]
    fn eof_is_input_closed_not_an_answer() {
        let mut p = prompter("");
        assert!(matches!(p.ask("? "), Err(OrganizeError::InputClosed)));
    }

    #[test]
    fn yes_no_honors_default_on_empty_answer() {
        let mut p = prompter("\n\n");
        assert!(p.ask_yes_no("? ", true).unwrap());
        assert!(!p.ask_yes_no("? ", false).unwrap());
    }

    #[test]
    fn yes_no_reprompts_on_garbage() {
        let mut p = prompter("maybe\nn\n");
        assert!(!p.ask_yes_no("? ", true).unwrap());
    }

    #[test]
    fn paths_are_split_on_commas() {
        let mut p = prompter("/a, /b/c ,\n");
        let paths = p.ask_paths("? ").unwrap();
        assert_eq!(paths, vec![PathBuf::from("/a"), PathBuf::from("/b/c")]);
    }

    #[test]
    fn pasted_shell_escapes_are_normalized() {
        assert_eq!(
            normalize_pasted_path(r"/music/My\ Albums\ \(2020\)"),
            "/music/My Albums (2020)"
        );
        assert_eq!(normalize_pasted_path("\"/music/quoted\""), "/music/quoted");
    }

    #[test]
    fn extensions_fall_back_to_defaults() {
        let mut p = prompter("\n.MP3, flac\n");
        let defaults = p.ask_extensions("? ", &["mp3", "m4a"]).unwrap();
        assert_eq!(defaults, vec!["mp3".to_string(), "m4a".to_string()]);

        let picked = p.ask_extensions("? ", &["mp3"]).unwrap();
        assert_eq!(picked, vec!["mp3".to_string(), "flac".to_string()]);
    }
}
