use std::io::{self, Write};

use client_core::{scoring, ControllerError, ControllerEvent, GamePhase, GameSummary};
use shared::domain::{AnswerResult, GameVariant, Language, Scenario};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::warn;

use crate::locale::Message;

/// Writes localized game screens for controller events.
pub struct TerminalRenderer<W: Write> {
    out: W,
    language: Language,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, language: Language) -> Self {
        Self { out, language }
    }

    /// Renders everything queued on `events` without waiting.
    pub fn drain(&mut self, events: &mut broadcast::Receiver<ControllerEvent>) -> io::Result<()> {
        loop {
            match events.try_recv() {
                Ok(event) => self.render(&event)?,
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "render: event receiver lagged");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        self.out.flush()
    }

    pub fn render(&mut self, event: &ControllerEvent) -> io::Result<()> {
        match event {
            ControllerEvent::PhaseChanged(GamePhase::AwaitingScenario) => {
                writeln!(self.out, "{}", Message::Starting.text(self.language))
            }
            ControllerEvent::FallbackActivated { .. } => {
                writeln!(self.out, "{}", Message::FallbackActive.text(self.language))
            }
            ControllerEvent::ScenarioPresented {
                index,
                total,
                scenario,
            } => self.scenario(*index, *total, scenario),
            ControllerEvent::SelectionRequired => {
                writeln!(self.out, "{}", Message::SelectionRequired.text(self.language))
            }
            ControllerEvent::AnswerEvaluated { result, .. } => self.answer(result),
            ControllerEvent::Completed(summary) => self.summary(summary),
            ControllerEvent::PhaseChanged(_)
            | ControllerEvent::OptionSelected(_)
            | ControllerEvent::Reset => Ok(()),
        }
    }

    pub fn welcome(&mut self, variant: GameVariant) -> io::Result<()> {
        writeln!(self.out, "{} {}", Message::Welcome.text(self.language), variant.title())
    }

    fn scenario(&mut self, index: usize, total: usize, scenario: &Scenario) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(
            self.out,
            "{} {} {} {}",
            Message::Scenario.text(self.language),
            index + 1,
            Message::Of.text(self.language),
            total
        )?;
        if let Some(category) = &scenario.category {
            writeln!(self.out, "{}: {category}", Message::Category.text(self.language))?;
        }
        if let Some(difficulty) = &scenario.difficulty {
            writeln!(self.out, "{}: {difficulty}", Message::Difficulty.text(self.language))?;
        }
        writeln!(self.out, "{}", scenario.content)?;
        for option in &scenario.options {
            writeln!(self.out, "  {}) {}", option.label, option.text)?;
        }
        Ok(())
    }

    fn answer(&mut self, result: &AnswerResult) -> io::Result<()> {
        let (verdict, default_feedback) = if result.is_correct {
            (Message::Correct, Message::DefaultCorrectFeedback)
        } else {
            (Message::Incorrect, Message::DefaultIncorrectFeedback)
        };
        writeln!(self.out, "{}", verdict.text(self.language))?;
        if !result.is_correct && !result.correct_answer.is_empty() {
            writeln!(
                self.out,
                "{}: {}",
                Message::CorrectAnswer.text(self.language),
                result.correct_answer
            )?;
        }
        let explanation = if result.explanation.trim().is_empty() {
            default_feedback.text(self.language)
        } else {
            result.explanation.as_str()
        };
        writeln!(self.out, "{explanation}")?;
        writeln!(self.out, "{}: {}", Message::Score.text(self.language), result.score)
    }

    fn summary(&mut self, summary: &GameSummary) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(
            self.out,
            "{}, {}!",
            Message::GameComplete.text(self.language),
            summary.player_name
        )?;
        writeln!(
            self.out,
            "{}: {}/{} ({:.0}%)",
            Message::FinalScore.text(self.language),
            summary.score,
            summary.max_score,
            scoring::percentage(summary.score, summary.max_score)
        )?;
        writeln!(
            self.out,
            "{}: {}/{}",
            Message::CorrectAnswers.text(self.language),
            summary.correct_answers,
            summary.total_scenarios
        )?;
        writeln!(
            self.out,
            "{}: {}",
            Message::Rating.text(self.language),
            Message::Band(summary.band).text(self.language)
        )?;
        writeln!(
            self.out,
            "{}: {}m {:02}s",
            Message::PlayTime.text(self.language),
            summary.elapsed_seconds / 60,
            summary.elapsed_seconds % 60
        )
    }

    pub fn prompt(&mut self, message: Message) -> io::Result<()> {
        write!(self.out, "{}: ", message.text(self.language))?;
        self.out.flush()
    }

    pub fn line(&mut self, message: Message) -> io::Result<()> {
        writeln!(self.out, "{}", message.text(self.language))
    }

    pub fn controller_error(&mut self, err: &ControllerError) -> io::Result<()> {
        match err {
            ControllerError::UnknownOption(label) => {
                writeln!(self.out, "{}: {label}", Message::UnknownOption.text(self.language))
            }
            other => writeln!(self.out, "{}: {other}", Message::CannotContinue.text(self.language)),
        }
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
