// src/app/prompt.rs
use crate::kubeconfig::{CollisionPolicy, Decision};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io::{self, Write};

pub struct ForceOverwrite;

impl CollisionPolicy for ForceOverwrite {
    fn decide(&mut self, _name: &str) -> io::Result<Decision> {
        Ok(Decision::Overwrite)
    }
}

/// Asks on the terminal with a `[y/N]` prompt. `y` overwrites; `n`, Enter,
/// Esc and Ctrl-C decline. Other keys are ignored.
pub struct PromptConfirmation;

impl CollisionPolicy for PromptConfirmation {
    fn decide(&mut self, name: &str) -> io::Result<Decision> {
        let mut stderr = io::stderr();
        write!(
            stderr,
            "Do you want to overwrite the context '{}'? [y/N] ",
            name
        )?;
        stderr.flush()?;

        enable_raw_mode()?;
        let decision = read_decision();
        disable_raw_mode()?;

        let decision = decision?;
        writeln!(
            stderr,
            "{}",
            if decision == Decision::Overwrite { "y" } else { "n" }
        )?;
        Ok(decision)
    }
}

fn read_decision() -> io::Result<Decision> {
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(decision) = decision_for_key(key) {
                return Ok(decision);
            }
        }
    }
}

// Esc and Ctrl-C cancel the prompt, which counts as declining
pub fn decision_for_key(key: KeyEvent) -> Option<Decision> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Decision::Skip)
        }
        KeyCode::Char('y') | KeyCode::Char('Y') => Some(Decision::Overwrite),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Enter | KeyCode::Esc => {
            Some(Decision::Skip)
        }
        _ => None,
    }
}
