use thiserror::Error;

/// Failures of the load → filter → reshape/aggregate pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// No row with a usable year survived the load.
    #[error("no usable rows in the source table")]
    DataUnavailable,

    /// The year column is not among the headers.
    #[error("year column '{column}' not found in the source table")]
    MissingYearColumn { column: String },

    /// Start year after end year.
    #[error("start year {start} is after end year {end}")]
    InvalidRange { start: i32, end: i32 },

    /// None of the requested roles is a column of the table (or none requested).
    #[error("none of the selected roles exist in the table: {requested:?}")]
    InvalidColumns { requested: Vec<String> },

    /// A cell that should be numeric is not.
    #[error("non-numeric value {raw:?} in column '{column}' for year {year}")]
    MalformedValue {
        year: i32,
        column: String,
        raw: String,
    },
}

impl PipelineError {
    /// Whether the user can recover by changing the filter selection.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PipelineError::InvalidRange { .. } | PipelineError::InvalidColumns { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_errors_are_recoverable() {
        assert!(PipelineError::InvalidRange { start: 2022, end: 2021 }.is_recoverable());
        assert!(PipelineError::InvalidColumns { requested: vec![] }.is_recoverable());
        assert!(!PipelineError::DataUnavailable.is_recoverable());
        assert!(!PipelineError::MalformedValue {
            year: 2020,
            column: "PROMOTOR_A".into(),
            raw: "x".into(),
        }
        .is_recoverable());
    }

    #[test]
    fn messages_name_the_offending_input() {
        let msg = PipelineError::InvalidRange { start: 2023, end: 2020 }.to_string();
        assert_eq!(msg, "start year 2023 is after end year 2020");
    }
}
