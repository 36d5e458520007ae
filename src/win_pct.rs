use tracing::error;

use crate::error::{EtlError, Result};
use crate::record::{Context, NO_GAMES, RuleEra, Tally};

/// Winning percentage for one tally, rounded to three places.
///
/// Tie era: a win is worth two points and a tie one, out of two per game.
/// Overtime era: plain wins over games, overtime losses counting as losses.
/// A context with no games yields [`NO_GAMES`]. A tally with neither ties
/// nor overtime losses recorded is a data integrity fault.
pub fn winning_percentage(tally: &Tally, ctx: Context, row: usize) -> Result<f64> {
    let Some(era) = tally.era() else {
        error!(
            target: "transform",
            context = ctx.label(),
            row,
            wins = tally.wins,
            losses = tally.losses,
            ties = tally.ties,
            overtime_losses = tally.overtime_losses,
            "row has neither ties nor overtime losses"
        );
        return Err(EtlError::DataIntegrity {
            context: ctx.label(),
            row,
            wins: tally.wins,
            losses: tally.losses,
            ties: tally.ties,
            overtime_losses: tally.overtime_losses,
        });
    };

    let wins = f64::from(tally.wins);
    let losses = f64::from(tally.losses);
    let pct = match era {
        RuleEra::Tie(ties) => {
            let ties = f64::from(ties);
            let games = wins + losses + ties;
            if games == 0.0 {
                return Ok(NO_GAMES);
            }
            (2.0 * wins + ties) / (2.0 * games)
        }
        RuleEra::Overtime(otl) => {
            let games = wins + losses + f64::from(otl);
            if games == 0.0 {
                return Ok(NO_GAMES);
            }
            wins / games
        }
    };
    Ok(round3(pct))
}

/// Positional winning percentages for one context; output `i` belongs to
/// input row `i`.
pub fn winning_percentages(tallies: &[Tally], ctx: Context) -> Result<Vec<f64>> {
    tallies
        .iter()
        .enumerate()
        .map(|(row, tally)| winning_percentage(tally, ctx, row))
        .collect()
}

/// Half away from zero.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round3_half_away_from_zero() {
        assert_eq!(round3(0.0625), 0.063);
        assert_eq!(round3(0.5714285), 0.571);
        assert_eq!(round3(-1.0), -1.0);
    }
}
