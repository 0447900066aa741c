// 💬 REPL - line-oriented command loop around the Calculator
//
// Reads commands from any BufRead and writes to any Write, so the loop can be
// driven from stdin/stdout or from a script in tests.

use crate::calculation::format_decimal;
use crate::calculator::Calculator;
use crate::operation::Operation;
use colored::Colorize;
use std::io::{self, BufRead, Write};

pub struct Repl<'a, R, W> {
    calculator: &'a mut Calculator,
    input: R,
    output: W,
    use_color: bool,
}

enum Style {
    Info,
    Success,
    Error,
}

impl<'a, R: BufRead, W: Write> Repl<'a, R, W> {
    pub fn new(calculator: &'a mut Calculator, input: R, output: W, use_color: bool) -> Self {
        Repl {
            calculator,
            input,
            output,
            use_color,
        }
    }

    /// Run until `exit` or end of input. Hands the writer back when done.
    pub fn run(mut self) -> io::Result<W> {
        self.say(Style::Info, "Calculator started. Type 'help' for commands.")?;

        loop {
            let Some(command) = self.prompt("\nEnter command: ")? else {
                self.exit()?;
                break;
            };
            let command = command.to_lowercase();

            match command.as_str() {
                "" => continue,
                "help" => self.help()?,
                "exit" => {
                    self.exit()?;
                    break;
                }
                "history" => self.history()?,
                "clear" => {
                    self.calculator.clear_history();
                    self.say(Style::Info, "History cleared")?;
                }
                "undo" => {
                    if self.calculator.undo() {
                        self.say(Style::Info, "Operation undone")?;
                    } else {
                        self.say(Style::Info, "Nothing to undo")?;
                    }
                }
                "redo" => {
                    if self.calculator.redo() {
                        self.say(Style::Info, "Operation redone")?;
                    } else {
                        self.say(Style::Info, "Nothing to redo")?;
                    }
                }
                "save" => match self.calculator.save_history() {
                    Ok(()) => self.say(Style::Success, "History saved successfully")?,
                    Err(e) => self.say(Style::Error, &format!("Error saving history: {}", e))?,
                },
                "load" => match self.calculator.load_history() {
                    Ok(()) => self.say(Style::Success, "History loaded successfully")?,
                    Err(e) => self.say(Style::Error, &format!("Error loading history: {}", e))?,
                },
                other => match Operation::from_command(other) {
                    Ok(operation) => {
                        if !self.calculate(operation)? {
                            self.exit()?;
                            break;
                        }
                    }
                    Err(_) => self.say(
                        Style::Error,
                        &format!("Unknown command: '{}'. Type 'help' for available commands.", other),
                    )?,
                },
            }
        }

        self.output.flush()?;
        Ok(self.output)
    }

    /// Returns false if input ran out mid-prompt
    fn calculate(&mut self, operation: Operation) -> io::Result<bool> {
        self.say(Style::Info, "\nEnter numbers (or 'cancel' to abort):")?;

        let Some(a) = self.prompt("First number: ")? else {
            return Ok(false);
        };
        if a.eq_ignore_ascii_case("cancel") {
            self.say(Style::Info, "Operation cancelled")?;
            return Ok(true);
        }

        let Some(b) = self.prompt("Second number: ")? else {
            return Ok(false);
        };
        if b.eq_ignore_ascii_case("cancel") {
            self.say(Style::Info, "Operation cancelled")?;
            return Ok(true);
        }

        match self.calculator.perform(operation, &a, &b) {
            Ok(result) => {
                let precision = self.calculator.config().precision;
                let line = format!("\nResult: {}", format_decimal(result, precision));
                self.say(Style::Success, &line)?;
            }
            Err(e) => self.say(Style::Error, &format!("{}: {}", e.kind(), e))?,
        }
        Ok(true)
    }

    fn help(&mut self) -> io::Result<()> {
        let words: Vec<&str> = Operation::ALL.iter().map(|op| op.command()).collect();
        let lines = [
            "\nAvailable commands:".to_string(),
            format!("  {} - Perform calculations", words.join(", ")),
            "  history - Show calculation history".to_string(),
            "  clear - Clear calculation history".to_string(),
            "  undo - Undo the last calculation".to_string(),
            "  redo - Redo the last undone calculation".to_string(),
            "  save - Save calculation history to file".to_string(),
            "  load - Load calculation history from file".to_string(),
            "  exit - Exit the calculator".to_string(),
        ];
        for line in lines {
            self.say(Style::Info, &line)?;
        }
        Ok(())
    }

    fn history(&mut self) -> io::Result<()> {
        let entries = self.calculator.show_history();
        if entries.is_empty() {
            return self.say(Style::Info, "No calculations in history");
        }
        self.say(Style::Info, "\nCalculation History:")?;
        for (i, entry) in entries.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, entry)?;
        }
        Ok(())
    }

    fn exit(&mut self) -> io::Result<()> {
        match self.calculator.save_history() {
            Ok(()) => self.say(Style::Success, "History saved successfully.")?,
            Err(e) => self.say(Style::Error, &format!("Warning: Could not save history: {}", e))?,
        }
        self.say(Style::Info, "Goodbye!")
    }

    /// Print `label`, read one trimmed line. None at end of input.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn say(&mut self, style: Style, text: &str) -> io::Result<()> {
        if !self.use_color {
            return writeln!(self.output, "{}", text);
        }
        let painted = match style {
            Style::Info => text.cyan(),
            Style::Success => text.green(),
            Style::Error => text.red(),
        };
        writeln!(self.output, "{}", painted)
    }
}
