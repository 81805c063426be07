//! Dice and coin rolls.
//!
//! Every successful roll re-arms the redo glyph with the original
//! input, so a bare 🔄 repeats the exact same roll.

use bot_core::{glyphs, IncomingMessage, OutgoingMessage};
use database::{ConversationState, ReplayTemplates};

use crate::context::{CommandContext, CommandOutcome};
use crate::dice;
use crate::error::{CommandError, Result};

/// Which randomizer surface was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollKind {
    Dice,
    Coin,
}

/// Face count used when none is given (or a zero is).
const DEFAULT_FACES: u64 = 6;

pub async fn execute(
    ctx: &mut CommandContext<'_>,
    msg: &IncomingMessage,
    token: &str,
    raw_remainder: &str,
    kind: RollKind,
) -> Result<CommandOutcome> {
    let input = raw_remainder.trim();

    let body = match kind {
        RollKind::Coin => {
            let sides = ["Heads", "Tails"];
            let result = sides[(ctx.rng.pick(2) - 1) as usize];
            format!("The coin shows: {result}")
        }
        RollKind::Dice => {
            if input.is_empty() {
                format!("The die shows: {}", ctx.rng.pick(DEFAULT_FACES))
            } else if let Some(faces) = parse_faces(input) {
                format!("The die shows: {}", ctx.rng.pick(faces))
            } else if let Some(terms) = dice::parse_expression(input) {
                let outcome = dice::evaluate(&terms, &mut *ctx.rng);
                if outcome.parts.len() >= 4 {
                    format!(
                        "The dice show:\n\n{}\n\nResult: {}",
                        outcome.parts.join(" + \n"),
                        outcome.total
                    )
                } else {
                    format!(
                        "The dice show: {}\nResult: {}",
                        outcome.parts.join(" + "),
                        outcome.total
                    )
                }
            } else {
                // Not numeric at all: a comma-separated option list.
                let options: Vec<&str> = input
                    .split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .collect();
                if options.len() < 2 {
                    return Err(CommandError::Malformed);
                }
                let choice = options[(ctx.rng.pick(options.len() as u64) - 1) as usize];
                format!("I choose: {choice}")
            }
        }
    };

    let redo = if input.is_empty() {
        token.to_string()
    } else {
        format!("{token} {input}")
    };

    let reply = OutgoingMessage::reply_to(msg, body)
        .with_keyboard(vec![glyphs::REDO.to_string(), ctx.help_label()]);

    Ok(CommandOutcome::message(reply).with_state(ConversationState::DynamicReplay(
        ReplayTemplates {
            redo: Some(redo),
            ..Default::default()
        },
    )))
}

/// A bare integer is a face count; zero falls back to the default die.
fn parse_faces(input: &str) -> Option<u64> {
    if input.is_empty() || !input.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let faces: u64 = input.parse().ok()?;
    Some(if faces < 1 { DEFAULT_FACES } else { faces })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{self, test_ctx};

    #[tokio::test]
    async fn bare_roll_defaults_to_six_faces() {
        let db = testutil::db().await;
        test_ctx!(ctx, &db, rng = [4]);
        let msg = testutil::msg("alice", "dice");

        let outcome = execute(&mut ctx, &msg, "dice", "", RollKind::Dice).await.unwrap();
        assert_eq!(outcome.messages[0].body, "The die shows: 4");

        match &outcome.state {
            ConversationState::DynamicReplay(t) => {
                assert_eq!(t.redo, Some("dice".to_string()));
            }
            other => panic!("expected replay state, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn zero_faces_fall_back_to_default() {
        let db = testutil::db().await;
        test_ctx!(ctx, &db, rng = [6]);
        let msg = testutil::msg("alice", "dice 0");

        let outcome = execute(&mut ctx, &msg, "dice", "0", RollKind::Dice).await.unwrap();
        assert_eq!(outcome.messages[0].body, "The die shows: 6");
        assert_eq!(parse_faces("0"), Some(6));
        assert_eq!(parse_faces("20"), Some(20));
        assert_eq!(parse_faces("2D6"), None);
    }

    #[tokio::test]
    async fn expression_reports_parts_and_total() {
        let db = testutil::db().await;
        test_ctx!(ctx, &db, rng = [2, 5]);
        let msg = testutil::msg("alice", "dice 2D6+3");

        let outcome = execute(&mut ctx, &msg, "dice", "2D6+3", RollKind::Dice).await.unwrap();
        assert_eq!(
            outcome.messages[0].body,
            "The dice show: 2×D6: (2, 5) + 3\nResult: 10"
        );

        match &outcome.state {
            ConversationState::DynamicReplay(t) => {
                assert_eq!(t.redo, Some("dice 2D6+3".to_string()));
            }
            other => panic!("expected replay state, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn option_list_picks_one() {
        let db = testutil::db().await;
        test_ctx!(ctx, &db, rng = [3]);
        let msg = testutil::msg("alice", "dice red, green, blue");

        let outcome = execute(&mut ctx, &msg, "dice", "red, green, blue", RollKind::Dice)
            .await
            .unwrap();
        assert_eq!(outcome.messages[0].body, "I choose: blue");
    }

    #[tokio::test]
    async fn single_option_is_malformed() {
        let db = testutil::db().await;
        test_ctx!(ctx, &db);
        let msg = testutil::msg("alice", "dice onlyone");

        assert!(matches!(
            execute(&mut ctx, &msg, "dice", "onlyone", RollKind::Dice).await,
            Err(CommandError::Malformed)
        ));
    }

    #[tokio::test]
    async fn coin_shows_heads_or_tails() {
        let db = testutil::db().await;
        test_ctx!(ctx, &db, rng = [1, 2]);
        let msg = testutil::msg("alice", "coin");

        let outcome = execute(&mut ctx, &msg, "coin", "", RollKind::Coin).await.unwrap();
        assert_eq!(outcome.messages[0].body, "The coin shows: Heads");

        let outcome = execute(&mut ctx, &msg, "coin", "", RollKind::Coin).await.unwrap();
        assert_eq!(outcome.messages[0].body, "The coin shows: Tails");
    }
}
