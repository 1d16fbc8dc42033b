use std::io::Write;

use anyhow::Result;
use client_core::{GamePhase, GameSessionController, StartOptions, SubmitOutcome};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::debug;

use crate::{
    locale::{self, Message},
    render::TerminalRenderer,
};

const QUIT_COMMAND: &str = "q";

/// Runs games until the player quits, declines a rematch or closes input.
pub async fn run<R, W>(
    controller: &mut GameSessionController,
    renderer: &mut TerminalRenderer<W>,
    input: &mut Lines<R>,
    options: StartOptions,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut events = controller.subscribe_events();
    let language = options.language;

    loop {
        renderer.welcome(controller.variant())?;
        let started = controller.start(options.clone()).await;
        renderer.drain(&mut events)?;
        if let Err(err) = started {
            renderer.controller_error(&err)?;
            return Ok(());
        }

        if !play_one(controller, renderer, input, &mut events).await? {
            renderer.line(Message::Goodbye)?;
            return Ok(());
        }

        renderer.prompt(Message::PlayAgain)?;
        match input.next_line().await? {
            Some(answer) if locale::is_affirmative(&answer, language) => continue,
            _ => {
                renderer.line(Message::Goodbye)?;
                return Ok(());
            }
        }
    }
}

/// Returns `false` when the player quit before the results screen.
async fn play_one<R, W>(
    controller: &mut GameSessionController,
    renderer: &mut TerminalRenderer<W>,
    input: &mut Lines<R>,
    events: &mut tokio::sync::broadcast::Receiver<client_core::ControllerEvent>,
) -> Result<bool>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    loop {
        match controller.phase() {
            GamePhase::ScenarioPresented => {
                renderer.prompt(Message::AnswerPrompt)?;
                let Some(line) = input.next_line().await? else {
                    return Ok(false);
                };
                let line = line.trim();
                if is_quit(controller, line) {
                    return Ok(false);
                }
                if !line.is_empty() {
                    if let Err(err) = controller.select_option(line) {
                        renderer.controller_error(&err)?;
                        continue;
                    }
                }
                let outcome = controller.submit().await?;
                if outcome == SubmitOutcome::AlreadySubmitted {
                    debug!("play: answer already submitted");
                }
                renderer.drain(events)?;
            }
            GamePhase::AnswerSubmitted => {
                renderer.prompt(Message::ContinuePrompt)?;
                if input.next_line().await?.is_none() {
                    return Ok(false);
                }
                let advanced = controller.advance();
                renderer.drain(events)?;
                if let Err(err) = advanced {
                    renderer.controller_error(&err)?;
                    return Ok(false);
                }
            }
            GamePhase::Completed => return Ok(true),
            GamePhase::Idle | GamePhase::AwaitingScenario => return Ok(false),
        }
    }
}

/// An option labelled like the quit command is an answer, not a quit.
fn is_quit(controller: &GameSessionController, line: &str) -> bool {
    line.eq_ignore_ascii_case(QUIT_COMMAND)
        && !controller
            .current_scenario()
            .is_some_and(|scenario| scenario.option(line).is_some())
}

#[cfg(test)]
#[path = "tests/play_tests.rs"]
mod tests;
