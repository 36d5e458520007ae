/// Marks a count category that did not exist in a season's rule era.
pub const SENTINEL: i32 = -1;

/// Winning percentage reported when a context has no games at all.
pub const NO_GAMES: f64 = -1.0;

/// The four win/loss contexts carried on every row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    TeamVsTeam,
    Split,
    Home,
    Road,
}

impl Context {
    pub const ALL: [Context; 4] = [
        Context::TeamVsTeam,
        Context::Split,
        Context::Home,
        Context::Road,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Context::TeamVsTeam => "TvT",
            Context::Split => "split",
            Context::Home => "home",
            Context::Road => "road",
        }
    }
}

/// Which extra outcome the league recorded: ties up to 2004, overtime
/// losses from 1999 on. When both are present ties win.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleEra {
    Tie(u32),
    Overtime(u32),
}

/// Wins, losses, ties and overtime losses for one context. Ties and
/// overtime losses hold [`SENTINEL`] when the category was not recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tally {
    pub wins: i32,
    pub losses: i32,
    pub ties: i32,
    pub overtime_losses: i32,
}

impl Tally {
    pub fn new(wins: i32, losses: i32, ties: i32, overtime_losses: i32) -> Self {
        Self {
            wins,
            losses,
            ties,
            overtime_losses,
        }
    }

    /// `None` when neither ties nor overtime losses were recorded.
    pub fn era(&self) -> Option<RuleEra> {
        if let Ok(ties) = u32::try_from(self.ties) {
            return Some(RuleEra::Tie(ties));
        }
        u32::try_from(self.overtime_losses)
            .ok()
            .map(RuleEra::Overtime)
    }
}

/// One joined season-team-opponent row after type coercion. `L` is the
/// type of the descriptive labels (`franchID confID divID rank name`):
/// optional straight out of coercion, required once the filters have run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TeamSeason<L = String> {
    pub index: usize,
    pub year: i32,
    pub league: String,
    pub team: String,
    pub opponent: String,
    pub tvt: Tally,
    pub franchise: L,
    pub conference: L,
    pub division: L,
    pub rank: L,
    pub games: i32,
    pub split: Tally,
    pub points: i32,
    pub shootout_wins: i32,
    pub shootout_losses: i32,
    pub goals_for: i32,
    pub goals_against: i32,
    pub name: L,
    pub home: Tally,
    pub road: Tally,
}

/// A coerced row whose labels may still be blank.
pub type RawSeason = TeamSeason<Option<String>>;

impl<L> TeamSeason<L> {
    pub fn tally(&self, ctx: Context) -> &Tally {
        match ctx {
            Context::TeamVsTeam => &self.tvt,
            Context::Split => &self.split,
            Context::Home => &self.home,
            Context::Road => &self.road,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WinningPercentages {
    pub tvt: f64,
    pub split: f64,
    pub home: f64,
    pub road: f64,
}

impl WinningPercentages {
    pub fn get(&self, ctx: Context) -> f64 {
        match ctx {
            Context::TeamVsTeam => self.tvt,
            Context::Split => self.split,
            Context::Home => self.home,
            Context::Road => self.road,
        }
    }

    pub fn set(&mut self, ctx: Context, value: f64) {
        match ctx {
            Context::TeamVsTeam => self.tvt = value,
            Context::Split => self.split = value,
            Context::Home => self.home = value,
            Context::Road => self.road = value,
        }
    }
}

/// A fully transformed row, ready to persist.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CleanedRow {
    pub season: TeamSeason,
    pub win_pct: WinningPercentages,
}
