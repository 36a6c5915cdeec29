//! Client-held consultation session.
//!
//! A student picks a PMP, browses its question categories and "asks" the
//! virtual patient questions. The session keeps the asked questions, the
//! running score and the medical images unlocked so far. Nothing here is
//! persisted: the state lives for one student run and is handed to the results
//! view by [`Consultation::end_session`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{CategoryId, PmpId, QuestionId, QuestionScore, QuestionType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PmpSummary {
    pub id: PmpId,
    pub title: String,
    pub annonce_of_the_problem: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub id: CategoryId,
    pub name: String,
    pub pmp_id: PmpId,
}

/// A question as the student client sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationQuestion {
    pub id: QuestionId,
    pub question_text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub response: String,
    pub medical_picture_url: Option<String>,
    pub score: QuestionScore,
    pub question_category_id: CategoryId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskedQuestion {
    pub question: ConsultationQuestion,
    pub asked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AskOutcome {
    Recorded,
    /// A normal question that was already asked; nothing changed.
    AlreadyAsked,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsultationError {
    #[error("the consultation has ended")]
    SessionEnded,

    #[error("no PMP is selected")]
    NoPmpSelected,

    #[error("category {category} does not belong to PMP {pmp}")]
    CategoryOutsidePmp { category: CategoryId, pmp: PmpId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    NeedsPractice,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::Excellent
        } else if score >= 60.0 {
            Self::Good
        } else if score >= 40.0 {
            Self::Fair
        } else {
            Self::NeedsPractice
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent work! Your diagnostic skills are impressive.",
            Self::Good => "Good job! You're on the right track.",
            Self::Fair => "Not bad! Keep practicing to improve your skills.",
            Self::NeedsPractice => "Keep studying! Practice makes perfect.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationResult {
    pub pmp_title: Option<String>,
    pub score: f64,
    pub questions_asked: usize,
    pub band: ScoreBand,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consultation {
    selected_pmp: Option<PmpSummary>,
    selected_category: Option<CategorySummary>,
    asked_questions: Vec<AskedQuestion>,
    current_score: f64,
    medical_images: Vec<String>,
    ended: bool,
}

impl Consultation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_pmp(&self) -> Option<&PmpSummary> {
        self.selected_pmp.as_ref()
    }

    pub fn selected_category(&self) -> Option<&CategorySummary> {
        self.selected_category.as_ref()
    }

    pub fn asked_questions(&self) -> &[AskedQuestion] {
        &self.asked_questions
    }

    pub fn current_score(&self) -> f64 {
        self.current_score
    }

    pub fn medical_images(&self) -> &[String] {
        &self.medical_images
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn is_asked(&self, question_id: QuestionId) -> bool {
        self.asked_questions
            .iter()
            .any(|asked| asked.question.id == question_id)
    }

    /// Selects the case to work on. Switching to another PMP starts over.
    pub fn select_pmp(&mut self, pmp: PmpSummary) -> Result<(), ConsultationError> {
        self.ensure_open()?;

        let same_pmp = self
            .selected_pmp
            .as_ref()
            .is_some_and(|current| current.id == pmp.id);
        if !same_pmp {
            self.asked_questions.clear();
            self.current_score = 0.0;
            self.medical_images.clear();
        }

        self.selected_pmp = Some(pmp);
        self.selected_category = None;
        Ok(())
    }

    pub fn select_category(&mut self, category: CategorySummary) -> Result<(), ConsultationError> {
        self.ensure_open()?;

        let pmp = self
            .selected_pmp
            .as_ref()
            .ok_or(ConsultationError::NoPmpSelected)?;
        if category.pmp_id != pmp.id {
            return Err(ConsultationError::CategoryOutsidePmp {
                category: category.id,
                pmp: pmp.id,
            });
        }

        self.selected_category = Some(category);
        Ok(())
    }

    /// Questions of the selected category; every question when none is selected.
    pub fn questions_in_selected_category<'a>(
        &self,
        questions: &'a [ConsultationQuestion],
    ) -> Vec<&'a ConsultationQuestion> {
        match &self.selected_category {
            Some(category) => questions
                .iter()
                .filter(|question| question.question_category_id == category.id)
                .collect(),
            None => questions.iter().collect(),
        }
    }

    pub fn ask_question(
        &mut self,
        question: &ConsultationQuestion,
    ) -> Result<AskOutcome, ConsultationError> {
        self.ask_question_at(question, Utc::now())
    }

    /// Records `question` as asked at `asked_at`.
    ///
    /// Normal questions count once per session. Picture requests are recorded
    /// every time they are asked, and each ask appends the picture url again,
    /// so repeated asks add the score again and duplicate the image entry.
    pub fn ask_question_at(
        &mut self,
        question: &ConsultationQuestion,
        asked_at: DateTime<Utc>,
    ) -> Result<AskOutcome, ConsultationError> {
        self.ensure_open()?;

        if question.question_type == QuestionType::NormalQuestion && self.is_asked(question.id) {
            return Ok(AskOutcome::AlreadyAsked);
        }

        self.asked_questions.push(AskedQuestion {
            question: question.clone(),
            asked_at,
        });
        self.current_score += question.score.value();
        if let Some(url) = &question.medical_picture_url {
            self.medical_images.push(url.clone());
        }

        Ok(AskOutcome::Recorded)
    }

    /// Clears the session back to its initial state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Ends the session and returns what the results view displays.
    ///
    /// The state stays readable afterwards but no further questions are taken.
    pub fn end_session(&mut self) -> ConsultationResult {
        self.ended = true;

        ConsultationResult {
            pmp_title: self.selected_pmp.as_ref().map(|pmp| pmp.title.clone()),
            score: self.current_score,
            questions_asked: self.asked_questions.len(),
            band: ScoreBand::from_score(self.current_score),
        }
    }

    fn ensure_open(&self) -> Result<(), ConsultationError> {
        if self.ended {
            Err(ConsultationError::SessionEnded)
        } else {
            Ok(())
        }
    }
}
