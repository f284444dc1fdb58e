//!
//! Interactive, localised belt drive calculator
//!

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;

use beltdrive::config::SolverConfig;
use beltdrive::drive::{self, Wheel};
use beltdrive::drive::error::SolveError;
use beltdrive::geometry::{self, BeltSolution};
use beltdrive::locale::{self, Language, Message};
use beltdrive::preview;

///
/// Command line flags of the calculator.
///
#[derive(Parser, Debug)]
#[command(name = "beltdrive", version, about = "Solves the belt length, center distance or wheel size of a two-wheel belt drive")]
struct Args {
    /// Display language (zh, en or ru). Without it, a language menu is shown
    #[arg(long)]
    lang: Option<Language>,

    /// JSON file with solver settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Save a PNG of each solved drive to this path
    #[arg(long)]
    preview: Option<String>,

    /// Print solutions as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("beltdrive=warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SolverConfig::from_json_file(path).with_context(|| format!("loading {}", path.display()))?,
        None => SolverConfig::default(),
    };
    tracing::debug!(?config, "solver configuration");

    let stdin = io::stdin();
    let mut session = Session {
        input: stdin.lock(),
        output: io::stdout(),
        config,
        preview: args.preview,
        json: args.json,
    };

    session.run(args.lang)?;
    Ok(())
}

///
/// One interactive run of the calculator over an input and output stream.
///
/// # Fields:
/// - `input`: Where answers are read from
/// - `output`: Where prompts and results are written to
/// - `config`: The solver configuration
/// - `preview`: An optional path to save a preview image of every solved drive to
/// - `json`: Whether to print solutions as JSON
///
struct Session<R: BufRead, W: Write> {
    input: R,
    output: W,
    config: SolverConfig,
    preview: Option<String>,
    json: bool,
}

impl<R: BufRead, W: Write> Session<R, W> {
    ///
    /// Loops over the language menu (skipped when a language is fixed) and the calculation menu,
    /// until the user declines to continue or the input ends.
    ///
    /// # Parameters:
    /// - `fixed_language`: The language from the command line, if any
    ///
    fn run(&mut self, fixed_language: Option<Language>) -> io::Result<()> {
        loop {
            let language = match fixed_language {
                Some(language) => language,
                None => {
                    for line in locale::LANGUAGE_MENU {
                        writeln!(self.output, "{}", line)?;
                    }
                    let Some(choice) = self.prompt(locale::LANGUAGE_PROMPT)? else {
                        return Ok(());
                    };

                    match Language::from_menu_choice(&choice) {
                        Some(language) => language,
                        None => {
                            writeln!(self.output, "{}", locale::LANGUAGE_INVALID)?;
                            if !self.wants_to_continue()? {
                                return Ok(());
                            }
                            continue;
                        }
                    }
                }
            };

            if !self.menu(language)? {
                return Ok(());
            }

            if fixed_language.is_some() && !self.wants_to_continue()? {
                return Ok(());
            }
        }
    }

    ///
    /// Shows the calculation menu once and performs the chosen calculation.
    ///
    /// # Returns:
    /// - `false` if the input ended
    ///
    fn menu(&mut self, language: Language) -> io::Result<bool> {
        for message in [Message::MenuTitle, Message::MenuForward, Message::MenuDistance, Message::MenuCircumference] {
            writeln!(self.output, "{}", locale::text(language, message))?;
        }

        let Some(choice) = self.prompt(locale::text(language, Message::MenuPrompt))? else {
            return Ok(false);
        };

        match choice.as_str() {
            "1" => self.forward(language),
            "2" => self.center_distance(language),
            "3" => self.circumference(language),
            _ => {
                writeln!(self.output, "{}", locale::text(language, Message::InvalidOption))?;
                Ok(true)
            }
        }
    }

    fn forward(&mut self, language: Language) -> io::Result<bool> {
        let Some(c1) = self.number(language, Message::PromptC1)? else { return Ok(self.has_input()) };
        let Some(c2) = self.number(language, Message::PromptC2)? else { return Ok(self.has_input()) };
        let Some(distance) = self.number(language, Message::PromptDistance)? else { return Ok(self.has_input()) };

        match geometry::forward_belt_length(c1, c2, distance) {
            Ok(solution) => {
                self.report(language, &solution, &solution, Message::ResultLength, "")?;
                self.save_preview(language, c1, c2, distance)?;
            }
            Err(err) => writeln!(self.output, "{}", locale::describe_error(language, &SolveError::from(err)))?,
        }

        Ok(true)
    }

    fn center_distance(&mut self, language: Language) -> io::Result<bool> {
        let Some(c1) = self.number(language, Message::PromptC1)? else { return Ok(self.has_input()) };
        let Some(c2) = self.number(language, Message::PromptC2)? else { return Ok(self.has_input()) };
        let Some(length) = self.number(language, Message::PromptLength)? else { return Ok(self.has_input()) };

        match drive::solve_center_distance(c1, c2, length, &self.config) {
            Ok(solution) => {
                if !solution.converged() {
                    writeln!(self.output, "{}", locale::text(language, Message::BestEffort))?;
                }
                self.report(language, &solution, &solution.as_solution(), Message::ResultDistance, "")?;
                self.save_preview(language, c1, c2, solution.distance)?;
            }
            Err(err) => writeln!(self.output, "{}", locale::describe_error(language, &err))?,
        }

        Ok(true)
    }

    fn circumference(&mut self, language: Language) -> io::Result<bool> {
        let Some(known_c) = self.number(language, Message::PromptKnownC)? else { return Ok(self.has_input()) };
        let Some(length) = self.number(language, Message::PromptLength)? else { return Ok(self.has_input()) };
        let Some(distance) = self.number(language, Message::PromptDistance)? else { return Ok(self.has_input()) };

        let Some(answer) = self.prompt(locale::text(language, Message::PromptUnknownWheel))? else {
            return Ok(false);
        };
        let unknown = match answer.as_str() {
            "1" => Wheel::First,
            "2" => Wheel::Second,
            _ => {
                writeln!(self.output, "{}", locale::text(language, Message::InvalidOption))?;
                return Ok(true);
            }
        };

        match drive::solve_unknown_circumference(known_c, length, distance, unknown, &self.config) {
            Ok(solution) => {
                let suffix = format!("{} = ", unknown.label());
                self.report(language, &solution, &solution, Message::ResultCircumference, &suffix)?;

                let (c1, c2) = match unknown {
                    Wheel::First => (solution.value, known_c),
                    Wheel::Second => (known_c, solution.value),
                };
                self.save_preview(language, c1, c2, distance)?;
            }
            Err(err) => writeln!(self.output, "{}", locale::describe_error(language, &err))?,
        }

        Ok(true)
    }

    ///
    /// Prints a solution, either as JSON or as the wrap angles followed by the labelled result.
    ///
    /// # Parameters:
    /// - `language`: The display language
    /// - `full`: The full solution, used for JSON output
    /// - `solution`: The value and wrap angles to print
    /// - `label`: The message naming the result
    /// - `suffix`: Text between the label and the value
    ///
    fn report<S: Serialize>(&mut self, language: Language, full: &S, solution: &BeltSolution, label: Message, suffix: &str) -> io::Result<()> {
        if self.json {
            let json = serde_json::to_string_pretty(full).map_err(io::Error::other)?;
            return writeln!(self.output, "{}", json);
        }

        let wrap = locale::text(language, Message::WrapAngle);
        writeln!(self.output, "{}1 = {:.2}°", wrap, solution.wrap_angles.first_degrees())?;
        writeln!(self.output, "{}2 = {:.2}°", wrap, solution.wrap_angles.second_degrees())?;
        writeln!(self.output, "{}{}{:.2}", locale::text(language, label), suffix, solution.value)
    }

    fn save_preview(&mut self, language: Language, c1: f64, c2: f64, distance: f64) -> io::Result<()> {
        let Some(path) = self.preview.clone() else {
            return Ok(());
        };

        match preview::generate_preview(c1, c2, distance, &path) {
            Ok(()) => writeln!(self.output, "{}{}", locale::text(language, Message::PreviewSaved), path),
            Err(err) => writeln!(self.output, "{}{}", locale::text(language, Message::ErrorPrefix), err),
        }
    }

    ///
    /// Asks for a number. Answers which are not numbers are reported to the user.
    ///
    /// # Returns:
    /// - The number, or `None` if the answer was not a number or the input ended
    ///
    fn number(&mut self, language: Language, message: Message) -> io::Result<Option<f64>> {
        let Some(answer) = self.prompt(locale::text(language, message))? else {
            return Ok(None);
        };

        match answer.parse::<f64>() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                writeln!(self.output, "{}{}", locale::text(language, Message::ErrorPrefix), locale::text(language, Message::InvalidNumber))?;
                Ok(None)
            }
        }
    }

    fn wants_to_continue(&mut self) -> io::Result<bool> {
        Ok(matches!(self.prompt(locale::CONTINUE_PROMPT)?, Some(answer) if answer != "n"))
    }

    ///
    /// Writes a prompt and reads one trimmed line.
    ///
    /// # Returns:
    /// - The answer, or `None` once the input has ended
    ///
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }

        Ok(Some(line.trim().to_owned()))
    }

    fn has_input(&mut self) -> bool {
        self.input.fill_buf().map(|buf| !buf.is_empty()).unwrap_or(false)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn run_session(script: &str, language: Option<Language>, json: bool) -> String {
        let mut session = Session {
            input: script.as_bytes(),
            output: Vec::new(),
            config: SolverConfig::default(),
            preview: None,
            json,
        };

        session.run(language).unwrap();
        String::from_utf8(session.output).unwrap()
    }

    #[test]
    fn english_belt_length() {
        let c1 = 2. * std::f64::consts::PI * 10.;
        let c2 = c1 / 2.;
        let output = run_session(&format!("2\n1\n{}\n{}\n20\n", c1, c2), None, false);

        assert!(output.contains("Wrap angle 1 = 208.96°"));
        assert!(output.contains("Wrap angle 2 = 151.04°"));
        assert!(output.contains("The belt length L = 88.38"));
    }

    #[test]
    fn chinese_center_distance() {
        let output = run_session("2\n40\n40\n100\n", Some(Language::Chinese), false);

        // equal wheels: D = (L - C) / 2
        assert!(output.contains("圆心距 D = 30.00"));
        assert!(output.contains("带包角1 = 180.00°"));
    }

    #[test]
    fn russian_unknown_first_wheel() {
        let c1 = 2. * std::f64::consts::PI * 10.;
        let c2 = c1 / 2.;
        let length = geometry::forward_belt_length(c1, c2, 20.).unwrap().value;
        let output = run_session(&format!("3\n{}\n{}\n20\n1\n", c2, length), Some(Language::Russian), false);

        assert!(output.contains(&format!("Длина окружности другого колеса C1 = {:.2}", c1)));
    }

    #[test]
    fn infeasible_drive_is_reported() {
        let output = run_session("1\n100\n10\n1\nn\n", Some(Language::English), false);
        assert!(output.contains("Error: The center distance D cannot be smaller than the difference of the wheel radii."));
    }

    #[test]
    fn invalid_number_is_reported() {
        let output = run_session("2\n1\nabc\n", None, false);
        assert!(output.contains("Error: Please enter a number."));
    }

    #[test]
    fn invalid_language_then_quit() {
        let output = run_session("9\nn\n", None, false);
        assert!(output.contains(locale::LANGUAGE_INVALID));
        assert!(!output.contains("Please select"));
    }

    #[test]
    fn json_output() {
        let output = run_session("1\n40\n40\n10\nn\n", Some(Language::English), true);
        assert!(output.contains("\"value\""));
        assert!(output.contains("\"wrap_angles\""));
    }

    #[test]
    fn json_center_distance_keeps_report() {
        let output = run_session("2
40
40
100
n
", Some(Language::English), true);
        assert!(output.contains("\"distance\""));
        assert!(output.contains("\"report\""));
        assert!(output.contains("\"Converged\""));
    }
}
