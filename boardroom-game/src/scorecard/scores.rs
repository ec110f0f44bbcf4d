use super::{ScorecardLevel, Scores};
use crate::constants::LOG_TARGET_REPLAY;
use crate::data::{ChoiceId, ReplayError, check_replay_len};

/// Sum the chosen deltas for `choices`, starting from an all-zero scorecard.
///
/// # Errors
///
/// Returns [`ReplayError::UnknownLevel`] when there are more choices than levels.
pub fn calculate_scores(
    levels: &[ScorecardLevel],
    choices: &[ChoiceId],
) -> Result<Scores, ReplayError> {
    check_replay_len(choices.len(), levels.len())?;
    let scores = levels
        .iter()
        .zip(choices)
        .fold(Scores::default(), |acc, (level, choice)| {
            let next = acc + level.delta(*choice);
            log::trace!(
                target: LOG_TARGET_REPLAY,
                "scorecard level {} choice {choice} -> {next:?}",
                level.id
            );
            next
        });
    Ok(scores)
}
