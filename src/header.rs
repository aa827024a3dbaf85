//! The configuration macros of a header, each allowed once.
//!
//! `build.rs` compiles this file next to `defines` and `field`, so nothing
//! beyond `core` and those two modules is used.

use core::fmt;

use crate::defines::{defines, DefineError, Value};
use crate::field::Field;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderError {
    Syntax(DefineError),
    Duplicate { field: Field, line: usize },
}

impl fmt::Display for HeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderError::Syntax(e) => write!(f, "{}", e),
            HeaderError::Duplicate { field, line } => {
                write!(f, "line {}: {} is defined more than once", line, field)
            }
        }
    }
}

/// Values of the known macros, indexed by field.
#[derive(Debug, Clone, Copy)]
pub struct Definitions<'a> {
    values: [Option<Value<'a>>; Field::ALL.len()],
    /// Macros that are not configuration keys
    pub ignored: usize,
}

impl<'a> Definitions<'a> {
    pub fn get(&self, field: Field) -> Option<Value<'a>> {
        self.values[field as usize]
    }
}

/// Collects the known macros of `text`; a second definition of the same key
/// is an error wherever it appears.
pub fn scan(text: &str) -> Result<Definitions<'_>, HeaderError> {
    let mut found = Definitions {
        values: [None; Field::ALL.len()],
        ignored: 0,
    };

    for define in defines(text) {
        let define = define.map_err(HeaderError::Syntax)?;

        let Some(field) = Field::from_define_name(define.name) else {
            found.ignored += 1;
            continue;
        };

        let slot = &mut found.values[field as usize];
        if slot.is_some() {
            return Err(HeaderError::Duplicate {
                field,
                line: define.line,
            });
        }
        *slot = Some(define.value);
    }

    Ok(found)
}
