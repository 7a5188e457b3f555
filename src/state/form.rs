//! Submission form: the editable draft and its validated form

use std::path::PathBuf;

use crate::data::BuildRequest;
use crate::error::{FieldError, FormField};

/// What the file picker handed back
#[derive(Debug, Clone, PartialEq)]
pub enum FilePick {
    Single(PathBuf),
    Many(Vec<PathBuf>),
}

impl FilePick {
    /// The path to use; the first entry of a list
    pub fn into_path(self) -> Option<PathBuf> {
        match self {
            FilePick::Single(path) => Some(path),
            FilePick::Many(paths) => paths.into_iter().next(),
        }
    }
}

/// Form contents as typed, possibly incomplete
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormDraft {
    pub rated_capacity: String,
    pub is_primary_load: Option<bool>,
    pub factor: String,
    pub filepath: String,
}

/// A draft that passed every rule
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub rated_capacity: f64,
    pub is_primary_load: bool,
    pub factor: Option<f64>,
    pub filepath: PathBuf,
}

impl FormDraft {
    pub fn apply_pick(&mut self, pick: FilePick) {
        if let Some(path) = pick.into_path() {
            self.filepath = path.display().to_string();
        }
    }

    /// Does the factor field apply to the current draft
    pub fn factor_enabled(&self) -> bool {
        self.is_primary_load == Some(true)
    }

    /// Check every rule, collecting all failures
    pub fn validate(&self) -> Result<FormState, Vec<FieldError>> {
        let mut errors = Vec::new();

        let rated_capacity = match parse_number(&self.rated_capacity) {
            Field::Missing => {
                errors.push(FieldError::new(
                    FormField::RatedCapacity,
                    "Rated capacity is required",
                ));
                None
            }
            Field::Invalid => {
                errors.push(FieldError::new(
                    FormField::RatedCapacity,
                    "Rated capacity must be a number",
                ));
                None
            }
            Field::Value(v) => Some(v),
        };

        if self.is_primary_load.is_none() {
            errors.push(FieldError::new(
                FormField::IsPrimaryLoad,
                "Choose whether this is a primary load",
            ));
        }

        // factor only matters for a primary load
        let factor = if self.factor_enabled() {
            match parse_number(&self.factor) {
                Field::Missing => {
                    errors.push(FieldError::new(
                        FormField::Factor,
                        "Factor is required for a primary load",
                    ));
                    None
                }
                Field::Invalid => {
                    errors.push(FieldError::new(FormField::Factor, "Factor must be a number"));
                    None
                }
                Field::Value(v) => Some(v),
            }
        } else {
            None
        };

        let filepath = self.filepath.trim();
        if filepath.is_empty() {
            errors.push(FieldError::new(FormField::Filepath, "Choose a source file"));
        }

        match (rated_capacity, self.is_primary_load) {
            (Some(rated_capacity), Some(is_primary_load)) if errors.is_empty() => Ok(FormState {
                rated_capacity,
                is_primary_load,
                factor,
                filepath: PathBuf::from(filepath),
            }),
            _ => Err(errors),
        }
    }
}

impl From<FormState> for BuildRequest {
    fn from(form: FormState) -> Self {
        BuildRequest {
            rated_capacity: form.rated_capacity,
            is_primary_load: form.is_primary_load,
            factor: form.factor,
            filepath: form.filepath,
        }
    }
}

enum Field {
    Missing,
    Invalid,
    Value(f64),
}

fn parse_number(text: &str) -> Field {
    let text = text.trim();
    if text.is_empty() {
        return Field::Missing;
    }
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Field::Value(v),
        _ => Field::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> FormDraft {
        FormDraft {
            rated_capacity: "800".to_string(),
            is_primary_load: Some(true),
            factor: "1.2".to_string(),
            filepath: "/data/meter.csv".to_string(),
        }
    }

    fn fields(errors: &[FieldError]) -> Vec<FormField> {
        errors.iter().map(|e| e.field).collect()
    }

    #[test]
    fn test_valid_draft() {
        let form = complete().validate().unwrap();
        assert_eq!(form.rated_capacity, 800.0);
        assert!(form.is_primary_load);
        assert_eq!(form.factor, Some(1.2));
        assert_eq!(form.filepath, PathBuf::from("/data/meter.csv"));
    }

    #[test]
    fn test_empty_draft_reports_every_field() {
        let errors = FormDraft::default().validate().unwrap_err();
        assert_eq!(
            fields(&errors),
            vec![FormField::RatedCapacity, FormField::IsPrimaryLoad, FormField::Filepath]
        );
    }

    #[test]
    fn test_factor_required_for_primary_load() {
        let draft = FormDraft { factor: "  ".to_string(), ..complete() };
        assert_eq!(fields(&draft.validate().unwrap_err()), vec![FormField::Factor]);

        let draft = FormDraft { factor: "abc".to_string(), ..complete() };
        assert_eq!(fields(&draft.validate().unwrap_err()), vec![FormField::Factor]);
    }

    #[test]
    fn test_factor_ignored_without_primary_load() {
        let draft = FormDraft {
            is_primary_load: Some(false),
            factor: "not a number".to_string(),
            ..complete()
        };
        let form = draft.validate().unwrap();
        assert_eq!(form.factor, None);
    }

    #[test]
    fn test_rated_capacity_must_be_finite() {
        let draft = FormDraft { rated_capacity: "inf".to_string(), ..complete() };
        assert_eq!(fields(&draft.validate().unwrap_err()), vec![FormField::RatedCapacity]);
    }

    #[test]
    fn test_empty_filepath_rejected() {
        let draft = FormDraft { filepath: String::new(), ..complete() };
        assert_eq!(fields(&draft.validate().unwrap_err()), vec![FormField::Filepath]);
    }

    #[test]
    fn test_file_pick_uses_first_entry() {
        let mut draft = FormDraft::default();
        draft.apply_pick(FilePick::Many(vec![
            PathBuf::from("first.csv"),
            PathBuf::from("second.csv"),
        ]));
        assert_eq!(draft.filepath, "first.csv");

        draft.apply_pick(FilePick::Many(Vec::new()));
        assert_eq!(draft.filepath, "first.csv");

        draft.apply_pick(FilePick::Single(PathBuf::from("other.parquet")));
        assert_eq!(draft.filepath, "other.parquet");
    }

    #[test]
    fn test_into_request() {
        let request = BuildRequest::from(complete().validate().unwrap());
        assert_eq!(request.rated_capacity, 800.0);
        assert_eq!(request.factor, Some(1.2));
    }
}
