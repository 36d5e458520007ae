use hockey_etl::error::EtlError;
use hockey_etl::record::{Context, NO_GAMES, SENTINEL, Tally};
use hockey_etl::win_pct::{winning_percentage, winning_percentages};

fn pct(w: i32, l: i32, t: i32, o: i32) -> f64 {
    winning_percentage(&Tally::new(w, l, t, o), Context::Split, 0).expect("valid tally")
}

#[test]
fn tie_era_counts_ties_as_half_wins() {
    assert_eq!(pct(10, 5, 3, SENTINEL), 0.639);
}

#[test]
fn tie_era_without_games_is_sentinel() {
    assert_eq!(pct(0, 0, 0, SENTINEL), NO_GAMES);
}

#[test]
fn overtime_era_is_plain_win_fraction() {
    assert_eq!(pct(20, 10, SENTINEL, 5), 0.571);
}

#[test]
fn overtime_era_without_games_is_sentinel() {
    assert_eq!(pct(0, 0, SENTINEL, 0), NO_GAMES);
}

#[test]
fn ties_take_precedence_when_both_recorded() {
    // 1999-2004 seasons carry both columns; the tie formula applies.
    assert_eq!(pct(30, 30, 10, 2), 0.5);
}

#[test]
fn rounds_half_away_from_zero() {
    // (80 + 10) / 160 = 0.5625
    assert_eq!(pct(40, 30, 10, SENTINEL), 0.563);
}

#[test]
fn missing_both_eras_is_an_integrity_fault() {
    let err = winning_percentage(&Tally::new(3, 2, SENTINEL, SENTINEL), Context::Home, 7)
        .expect_err("must not produce a number");
    match err {
        EtlError::DataIntegrity {
            context,
            row,
            wins,
            losses,
            ..
        } => {
            assert_eq!(context, "home");
            assert_eq!(row, 7);
            assert_eq!((wins, losses), (3, 2));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn output_follows_input_positions() {
    let tallies = [
        Tally::new(20, 10, SENTINEL, 5),
        Tally::new(0, 0, 0, SENTINEL),
        Tally::new(10, 5, 3, SENTINEL),
    ];
    let values = winning_percentages(&tallies, Context::TeamVsTeam).unwrap();
    assert_eq!(values, vec![0.571, NO_GAMES, 0.639]);
}

#[test]
fn positional_fault_reports_row() {
    let tallies = [
        Tally::new(1, 0, 0, SENTINEL),
        Tally::new(1, 0, SENTINEL, SENTINEL),
    ];
    let err = winning_percentages(&tallies, Context::Road).unwrap_err();
    assert!(matches!(err, EtlError::DataIntegrity { row: 1, .. }));
}
