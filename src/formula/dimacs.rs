//! Loader for the line-oriented DIMACS CNF format.
//!
//! The accepted dialect is slightly stricter than plain DIMACS: every clause sits on its own line
//! and that line ends with the `0` terminator. A line holding only `0` is an empty clause. A line
//! starting with `%` ends the clause section, as in the SATLIB benchmark files.
use crate::formula::{Clause, Formula, Literal};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DimacsParseError {
    #[error("failed to read input")]
    Io(#[from] std::io::Error),
    #[error("cannot open '{}'", .path.display())]
    FileUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("missing 'p cnf' header before clauses")]
    MissingHeader,
    #[error("line {line}: '{content}' is an invalid header")]
    InvalidHeader { line: usize, content: String },
    #[error("line {line}: multiple dimacs headers found")]
    DuplicateHeader { line: usize },
    #[error("line {line}: clause '{content}' is not terminated by a single '0'")]
    MalformedClauseLine { line: usize, content: String },
    #[error("line {line}: '{token}' is an invalid literal")]
    InvalidLiteral { line: usize, token: String },
    #[error("line {line}: variable {variable} exceeds the {declared} declared variables")]
    VariableOutOfRange {
        line: usize,
        variable: usize,
        declared: usize,
    },
    #[error("expected to parse {expected} clauses, but parsed {parsed}")]
    ClauseCountMismatch { expected: usize, parsed: usize },
}

#[derive(Clone, Copy, Debug)]
struct Header {
    num_variables: usize,
    num_clauses: usize,
}

pub fn parse_file(path: impl AsRef<Path>) -> Result<Formula, DimacsParseError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DimacsParseError::FileUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    parse(file)
}

pub fn parse<R: Read>(reader: R) -> Result<Formula, DimacsParseError> {
    let reader = BufReader::new(reader);

    let mut clauses = vec![];
    let mut header = None;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let number = idx + 1;
        let mut tokens = line.split_whitespace().peekable();

        match tokens.peek() {
            None => continue,
            Some(token) if token.starts_with('c') => continue,
            Some(&"%") => break,
            Some(&"p") => {
                if header.is_some() {
                    return Err(DimacsParseError::DuplicateHeader { line: number });
                }
                header = Some(parse_header(number, &line)?);
            }
            Some(_) => {
                let header = header.ok_or(DimacsParseError::MissingHeader)?;
                clauses.push(parse_clause(number, &line, header.num_variables)?);
            }
        }
    }

    let header = header.ok_or(DimacsParseError::MissingHeader)?;
    if clauses.len() != header.num_clauses {
        return Err(DimacsParseError::ClauseCountMismatch {
            expected: header.num_clauses,
            parsed: clauses.len(),
        });
    }

    log::debug!(
        "parsed {} clauses over {} variables",
        clauses.len(),
        header.num_variables
    );
    Ok(Formula::new(clauses))
}

fn parse_header(line: usize, content: &str) -> Result<Header, DimacsParseError> {
    let invalid = || DimacsParseError::InvalidHeader {
        line,
        content: content.trim().to_string(),
    };

    match content.split_whitespace().collect::<Vec<_>>()[..] {
        ["p", "cnf", num_variables, num_clauses] => Ok(Header {
            num_variables: num_variables.parse().map_err(|_| invalid())?,
            num_clauses: num_clauses.parse().map_err(|_| invalid())?,
        }),
        _ => Err(invalid()),
    }
}

fn parse_clause(
    line: usize,
    content: &str,
    num_variables: usize,
) -> Result<Clause, DimacsParseError> {
    let malformed = || DimacsParseError::MalformedClauseLine {
        line,
        content: content.trim().to_string(),
    };

    let tokens: Vec<&str> = content.split_whitespace().collect();
    let (terminator, body) = tokens.split_last().ok_or_else(malformed)?;
    if parse_literal(line, terminator)?.is_some() {
        return Err(malformed());
    }

    let mut literals = Vec::with_capacity(body.len());
    for token in body {
        let literal = parse_literal(line, token)?.ok_or_else(malformed)?;
        if literal.idx() > num_variables {
            return Err(DimacsParseError::VariableOutOfRange {
                line,
                variable: literal.idx(),
                declared: num_variables,
            });
        }
        literals.push(literal);
    }

    Ok(Clause::new(literals))
}

fn parse_literal(line: usize, token: &str) -> Result<Option<Literal>, DimacsParseError> {
    let l = token.parse::<isize>().map_err(|_| DimacsParseError::InvalidLiteral {
        line,
        token: token.to_string(),
    })?;
    Ok(Literal::from_dimacs(l))
}
