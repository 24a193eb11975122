use std::fmt::Display;

#[derive(Debug)]
pub enum PeridotError {
    Input(String),
    Geometry(String),
    Solver(String),
    MaterialLaw(String),
}

impl Display for PeridotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (err_name, value) = match self {
            PeridotError::Input(v) => ("Input", v),
            PeridotError::Geometry(v) => ("Geometry", v),
            PeridotError::Solver(v) => ("Solver", v),
            PeridotError::MaterialLaw(v) => ("Material Law", v),
        };

        write!(f, "{} error: {}", err_name, value)
    }
}
