mod common;

use hockey_etl::config::TransformConfig;
use hockey_etl::error::EtlError;
use hockey_etl::record::{NO_GAMES, SENTINEL};
use hockey_etl::transform::{
    DROPPED_COLUMNS, SENTINEL_COLUMNS, drop_unwanted_cols, replace_missing_data,
    specify_column_types, transform,
};

use common::{Season, boston_1980, boston_2010, wide_table};

fn cfg() -> TransformConfig {
    TransformConfig::default()
}

fn whalers_wha() -> Season {
    Season {
        league: "WHA",
        team: "NEW",
        tvt: ["1", "1", "", ""],
        conference: "",
        ..boston_1980()
    }
}

fn boston_1970() -> Season {
    Season {
        year: "1970",
        ..boston_1980()
    }
}

#[test]
fn drop_removes_every_named_column() {
    let table = drop_unwanted_cols(wide_table(&[boston_1980()])).unwrap();
    for name in DROPPED_COLUMNS {
        assert!(!table.has_column(name), "{name} still present");
    }
    assert!(table.has_column("W_TvT"));
}

#[test]
fn drop_fails_when_expected_column_absent() {
    let mut table = wide_table(&[boston_1980()]);
    let idx = table.column_index("playoff").unwrap();
    table.headers[idx] = "post_season".to_string();

    let err = drop_unwanted_cols(table).unwrap_err();
    assert!(matches!(err, EtlError::Schema { ref column, .. } if column == "playoff"));
}

#[test]
fn missing_counts_become_sentinels() {
    let table = drop_unwanted_cols(wide_table(&[boston_1980(), boston_2010()])).unwrap();
    let table = replace_missing_data(table).unwrap();
    for name in SENTINEL_COLUMNS {
        let col = table.column_index(name).unwrap();
        for row in 0..table.len() {
            assert!(table.cell(row, col).is_some(), "{name} missing at {row}");
        }
    }
    let t_split = table.column_index("T_split").unwrap();
    let otl_split = table.column_index("OTL_split").unwrap();
    assert_eq!(table.cell(0, t_split), Some("10"));
    assert_eq!(table.cell(0, otl_split), Some("-1"));
    assert_eq!(table.cell(1, t_split), Some("-1"));
}

#[test]
fn coercion_rejects_non_numeric_residue() {
    let season = Season {
        goals_for: "3O6",
        ..boston_1980()
    };
    let table = drop_unwanted_cols(wide_table(&[season])).unwrap();
    let table = replace_missing_data(table).unwrap();
    let err = specify_column_types(&table).unwrap_err();
    match err {
        EtlError::TypeCoercion { column, value, .. } => {
            assert_eq!(column, "GF");
            assert_eq!(value.as_deref(), Some("3O6"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn coercion_rejects_missing_wins() {
    let season = Season {
        home: ["", "10", "5", ""],
        ..boston_1980()
    };
    let err = transform(wide_table(&[season]), &cfg()).unwrap_err();
    assert!(matches!(err, EtlError::TypeCoercion { ref column, value: None, .. } if column == "hW"));
}

#[test]
fn filters_to_league_and_year_and_reindexes() {
    let table = wide_table(&[
        boston_1970(),
        boston_1980(),
        whalers_wha(),
        boston_2010(),
    ]);
    let rows = transform(table, &cfg()).unwrap();

    assert_eq!(rows.len(), 2);
    for (pos, row) in rows.iter().enumerate() {
        assert_eq!(row.season.index, pos);
        assert_eq!(row.season.league, "NHL");
        assert!(row.season.year >= 1974);
    }
    assert_eq!(rows[0].season.year, 1980);
    assert_eq!(rows[1].season.year, 2010);
}

#[test]
fn rows_dropped_by_filters_never_reach_the_integrity_check() {
    // The WHA row has neither ties nor overtime losses in its TvT context.
    let rows = transform(wide_table(&[whalers_wha(), boston_1980()]), &cfg()).unwrap();
    assert_eq!(rows.len(), 1);
}

#[test]
fn retained_row_without_division_is_rejected() {
    let season = Season {
        division: "",
        ..boston_1980()
    };
    let err = transform(wide_table(&[boston_2010(), season]), &cfg()).unwrap_err();
    match err {
        EtlError::TypeCoercion { column, row, value, .. } => {
            assert_eq!(column, "divID");
            assert_eq!(row, 1);
            assert_eq!(value, None);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn filtered_rows_may_lack_labels() {
    let early = Season {
        division: "",
        ..boston_1970()
    };
    let rows = transform(wide_table(&[whalers_wha(), early, boston_1980()]), &cfg()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].season.conference, "WA");
    assert_eq!(rows[0].season.division, "AD");
    assert_eq!(rows[0].season.name, "Boston Bruins");
}

#[test]
fn integrity_fault_aborts_transform() {
    let season = Season {
        road: ["15", "20", "", ""],
        ..boston_1980()
    };
    let err = transform(wide_table(&[season]), &cfg()).unwrap_err();
    assert!(matches!(err, EtlError::DataIntegrity { context: "road", .. }));
}

#[test]
fn derives_percentages_for_both_eras() {
    let rows = transform(wide_table(&[boston_1980(), boston_2010()]), &cfg()).unwrap();

    let tie = &rows[0];
    assert_eq!(tie.win_pct.tvt, 0.583);
    assert_eq!(tie.win_pct.split, 0.563);
    assert_eq!(tie.win_pct.home, 0.688);
    assert_eq!(tie.win_pct.road, 0.438);
    assert_eq!(tie.season.split.overtime_losses, SENTINEL);
    assert_eq!(tie.season.shootout_wins, SENTINEL);

    let ot = &rows[1];
    assert_eq!(ot.win_pct.tvt, 0.667);
    assert_eq!(ot.win_pct.split, 0.476);
    assert_eq!(ot.win_pct.home, 0.537);
    assert_eq!(ot.win_pct.road, 0.415);
    assert_eq!(ot.season.split.ties, SENTINEL);
}

#[test]
fn no_games_context_yields_sentinel() {
    let season = Season {
        tvt: ["0", "0", "0", ""],
        ..boston_1980()
    };
    let rows = transform(wide_table(&[season]), &cfg()).unwrap();
    assert_eq!(rows[0].win_pct.tvt, NO_GAMES);
}

#[test]
fn same_input_same_output() {
    let table = wide_table(&[boston_1980(), boston_2010(), whalers_wha()]);
    let first = transform(table.clone(), &cfg()).unwrap();
    let second = transform(table, &cfg()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn configured_cutoff_and_league_apply() {
    let cfg = TransformConfig {
        league: "NHL".to_string(),
        first_year: 2000,
    };
    let rows = transform(wide_table(&[boston_1980(), boston_2010()]), &cfg).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].season.year, 2010);
    assert_eq!(rows[0].season.index, 0);
}

#[test]
fn empty_result_is_legal() {
    let cfg = TransformConfig {
        league: "AHL".to_string(),
        first_year: 1974,
    };
    let rows = transform(wide_table(&[boston_1980()]), &cfg).unwrap();
    assert!(rows.is_empty());
}
