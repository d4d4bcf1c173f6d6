//! Rendering of solver results and wall-clock timing of a solver call.
use crate::{Literal, SatResult};
use std::io::{self, Write};
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Runs `f`, returning its result and the elapsed wall-clock time.
pub fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OutputFormat {
    /// One JSON record per instance: name, time, result and solution.
    Json,
    /// SAT competition output: an `s` status line and `v` model lines.
    Dimacs,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "dimacs" => Ok(OutputFormat::Dimacs),
            _ => Err(format!("unknown output format '{}'", s)),
        }
    }
}

#[derive(Debug)]
pub struct Report<'a> {
    pub instance: &'a str,
    pub elapsed: Duration,
    pub result: &'a SatResult,
}

impl Report<'_> {
    pub fn write(&self, format: OutputFormat, writer: &mut impl Write) -> io::Result<()> {
        match format {
            OutputFormat::Json => self.write_json(writer),
            OutputFormat::Dimacs => write_dimacs(self.result, writer),
        }
    }

    fn write_json(&self, writer: &mut impl Write) -> io::Result<()> {
        let status = if self.result.is_satisfiable() { "SAT" } else { "UNSAT" };
        write!(
            writer,
            "{{\"Instance\": \"{}\", \"Time\": {:.2}, \"Result\": \"{}\"",
            escape(self.instance),
            self.elapsed.as_secs_f64(),
            status
        )?;
        if let Some(model) = self.result.model() {
            write!(writer, ", \"Solution\": \"{}\"", format_solution(model))?;
        }
        writeln!(writer, "}}")
    }
}

/// `"1 true 2 false ..."`, one entry per variable in ascending order.
pub fn format_solution(model: &[Literal]) -> String {
    let mut model = model.to_vec();
    model.sort_by_key(|literal| literal.idx());
    model
        .iter()
        .map(|literal| format!("{} {}", literal.idx(), literal.is_positive()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn write_dimacs(result: &SatResult, writer: &mut impl Write) -> io::Result<()> {
    match result.model() {
        None => writeln!(writer, "s UNSATISFIABLE"),
        Some(model) => {
            writeln!(writer, "s SATISFIABLE")?;
            const PER_LINE: usize = 10;
            for chunk in model.chunks(PER_LINE) {
                let line = chunk.iter().map(Literal::to_string).collect::<Vec<_>>().join(" ");
                writeln!(writer, "v {}", line)?;
            }
            writeln!(writer, "v 0")
        }
    }
}

/// Escapes `s` for use inside a JSON string literal.
fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                escaped.push_str(&format!("\\u{:04x}", c as u32))
            }
            c => escaped.push(c),
        }
    }
    escaped
}
