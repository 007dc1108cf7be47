use std::io::{Stderr, Write};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    style::Print,
    terminal::{self, ClearType},
};
use spedilo_client::{AppError, Result};

/// Restores cooked mode on drop, including on early returns.
struct RawMode;

impl RawMode {
    fn enable() -> Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

enum Edit {
    Push(char),
    Pop,
    Clear,
    Done,
    Cancel,
    Ignore,
}

fn edit_for(key: KeyEvent) -> Edit {
    if key.kind == KeyEventKind::Release {
        return Edit::Ignore;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => Edit::Done,
        KeyCode::Esc => Edit::Cancel,
        KeyCode::Char('c') if ctrl => Edit::Cancel,
        KeyCode::Char('u') if ctrl => Edit::Clear,
        KeyCode::Backspace => Edit::Pop,
        KeyCode::Char(ch) if !ctrl => Edit::Push(ch),
        _ => Edit::Ignore,
    }
}

fn redraw(out: &mut Stderr, prompt: &str, len: usize) -> Result<()> {
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt),
        Print("*".repeat(len))
    )?;
    out.flush()?;
    Ok(())
}

/// Reads a password from the terminal, echoing `*` per character.
///
/// Esc or Ctrl-C aborts, Ctrl-U clears the input.
pub fn password(prompt: &str) -> Result<String> {
    let _raw = RawMode::enable()?;
    let mut out = std::io::stderr();
    let mut buf = String::new();
    redraw(&mut out, prompt, 0)?;

    let accepted = loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        match edit_for(key) {
            Edit::Push(ch) => buf.push(ch),
            Edit::Pop => {
                buf.pop();
            }
            Edit::Clear => buf.clear(),
            Edit::Done => break true,
            Edit::Cancel => break false,
            Edit::Ignore => continue,
        }
        redraw(&mut out, prompt, buf.chars().count())?;
    };

    execute!(out, Print("\r\n"))?;
    out.flush()?;
    if !accepted {
        return Err(AppError::Terminal("cancelled".to_string()));
    }
    Ok(buf)
}

/// Asks for a new password and its confirmation, three attempts at most.
pub fn new_password() -> Result<String> {
    let mut out = std::io::stderr();
    for _ in 0..3 {
        let first = password("Password: ")?;
        if first.is_empty() {
            writeln!(out, "Password must not be empty.")?;
            continue;
        }
        if password("Confirm password: ")? == first {
            return Ok(first);
        }
        writeln!(out, "Passwords do not match. Try again.")?;
    }
    Err(AppError::Terminal("too many attempts".to_string()))
}
