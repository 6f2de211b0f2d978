//! TOML induction definition parser.
//!
//! Loads inductions from TOML files and directories, and validates them for
//! authoring mistakes.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Induction, OptionIndex, Question, QuestionBody, QuestionKind};

/// Intermediate TOML structure for parsing induction files.
#[derive(Debug, Deserialize)]
struct TomlInductionFile {
    induction: TomlInductionHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlInductionHeader {
    id: String,
    name: String,
    #[serde(default)]
    department: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    question: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    correct_options: Option<Vec<OptionIndex>>,
    #[serde(default)]
    correct_option: Option<OptionIndex>,
}

/// Parse a single TOML file into an `Induction`.
pub fn parse_induction(path: &Path) -> Result<Induction> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read induction file: {}", path.display()))?;

    parse_induction_str(&content, path)
}

/// Parse a TOML string into an `Induction` (useful for testing).
pub fn parse_induction_str(content: &str, source_path: &Path) -> Result<Induction> {
    let parsed: TomlInductionFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(convert_question)
        .collect::<Result<Vec<_>>>()?;

    Ok(Induction {
        id: parsed.induction.id,
        name: parsed.induction.name,
        department: parsed.induction.department,
        description: parsed.induction.description,
        questions,
    })
}

fn convert_question(raw: TomlQuestion) -> Result<Question> {
    let TomlQuestion {
        id,
        kind,
        question,
        description,
        options,
        correct_options,
        correct_option,
    } = raw;

    let kind: QuestionKind = kind
        .parse()
        .map_err(|e: String| anyhow::anyhow!("question '{id}': {e}"))?;

    let require_correct_option = |value: Option<OptionIndex>| {
        value.ok_or_else(|| anyhow::anyhow!("{kind} question '{id}' is missing correct_option"))
    };

    let body = match kind {
        QuestionKind::Multichoice => QuestionBody::Multichoice {
            options,
            correct_options: correct_options
                .ok_or_else(|| {
                    anyhow::anyhow!("multichoice question '{id}' is missing correct_options")
                })?
                .into_iter()
                .collect(),
        },
        QuestionKind::TrueFalse => QuestionBody::TrueFalse {
            options,
            correct_option: require_correct_option(correct_option)?,
        },
        QuestionKind::Dropdown => QuestionBody::Dropdown {
            options,
            correct_option: require_correct_option(correct_option)?,
        },
        QuestionKind::YesNo => QuestionBody::YesNo {
            options,
            correct_option: require_correct_option(correct_option)?,
        },
        QuestionKind::ShortAnswer => QuestionBody::ShortAnswer,
        QuestionKind::FileUpload => QuestionBody::FileUpload,
        QuestionKind::Information => QuestionBody::Information,
    };

    Ok(Question {
        id,
        question,
        description,
        body,
    })
}

/// Recursively load all `.toml` induction files from a directory.
pub fn load_induction_directory(dir: &Path) -> Result<Vec<Induction>> {
    let mut inductions = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            inductions.extend(load_induction_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_induction(&path) {
                Ok(induction) => inductions.push(induction),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(inductions)
}

/// A warning from induction validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question id (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate an induction for common authoring issues.
pub fn validate_induction(induction: &Induction) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // Check for duplicate question ids
    let mut seen_ids = HashSet::new();
    for question in &induction.questions {
        if !seen_ids.insert(&question.id) {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: format!("duplicate question id: {}", question.id),
            });
        }
    }

    // Check for empty prompts
    for question in &induction.questions {
        if question.question.trim().is_empty() {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: "prompt is empty".into(),
            });
        }
    }

    // Per-kind option and answer-key checks
    for question in &induction.questions {
        match &question.body {
            QuestionBody::Multichoice {
                options,
                correct_options,
            } => {
                if options.len() < 2 {
                    warnings.push(ValidationWarning {
                        question_id: Some(question.id.clone()),
                        message: "multichoice question has fewer than two options".into(),
                    });
                }
                if correct_options.is_empty() {
                    warnings.push(ValidationWarning {
                        question_id: Some(question.id.clone()),
                        message: "no correct options; every submission will grade incorrect"
                            .into(),
                    });
                }
                for index in correct_options {
                    if index.0 as usize >= options.len() {
                        warnings.push(ValidationWarning {
                            question_id: Some(question.id.clone()),
                            message: format!(
                                "correct option {index} is out of range for {} option(s)",
                                options.len()
                            ),
                        });
                    }
                }
            }
            QuestionBody::Dropdown {
                options,
                correct_option,
            } => {
                if options.len() < 2 {
                    warnings.push(ValidationWarning {
                        question_id: Some(question.id.clone()),
                        message: "dropdown question has fewer than two options".into(),
                    });
                }
                if correct_option.0 as usize >= options.len() {
                    warnings.push(ValidationWarning {
                        question_id: Some(question.id.clone()),
                        message: format!(
                            "correct option {correct_option} is out of range for {} option(s)",
                            options.len()
                        ),
                    });
                }
            }
            QuestionBody::TrueFalse {
                options,
                correct_option,
            }
            | QuestionBody::YesNo {
                options,
                correct_option,
            } => {
                // An empty option list implies the canonical two choices.
                let limit = if options.is_empty() { 2 } else { options.len() };
                if correct_option.0 as usize >= limit {
                    warnings.push(ValidationWarning {
                        question_id: Some(question.id.clone()),
                        message: format!(
                            "correct option {correct_option} is out of range for {limit} option(s)"
                        ),
                    });
                }
            }
            QuestionBody::ShortAnswer | QuestionBody::FileUpload | QuestionBody::Information => {}
        }
    }

    if !induction.questions.iter().any(|q| q.kind().is_gradable()) {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "no gradable questions; assignments can complete immediately".into(),
        });
    }

    warnings
}
