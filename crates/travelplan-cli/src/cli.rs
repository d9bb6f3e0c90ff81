//! Command-line arguments.

use clap::{Args, Parser, Subcommand};
use travelplan_core::config::TokenBackend;

#[derive(Debug, Parser)]
#[command(name = "travelplan", version, about = "Plan travel itineraries from the terminal")]
pub struct Cli {
    /// API base URL (overrides TRAVELPLAN_API_URL and the config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Where the session token is kept: file, keyring or memory
    #[arg(long, global = true)]
    pub store: Option<TokenBackend>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and remember the session token
    Login {
        /// Defaults to the last email used
        #[arg(long)]
        email: Option<String>,
    },
    /// Create an account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// Forget the session token
    Logout,
    /// Show the resolved configuration and login state
    Status,
    /// Check the backend health endpoint
    Health,
    /// List attractions
    Attractions(AttractionArgs),
    /// Show one or more attractions by id
    Attraction {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// List saved itineraries (your own unless --user is given)
    Itineraries {
        #[arg(long)]
        user: Option<String>,
    },
    /// Save a hand-built itinerary
    Create {
        #[arg(long)]
        title: String,
        /// Itinerary item as JSON; repeat for several
        #[arg(long = "item")]
        items: Vec<String>,
        /// Free-form metadata as a JSON object
        #[arg(long)]
        metadata: Option<String>,
    },
    /// Delete one saved itinerary
    Delete { id: String },
    /// Delete all saved itineraries
    Clear {
        /// Required; there is no undo
        #[arg(long)]
        yes: bool,
    },
    /// Generate an itinerary plan
    Plan(PlanArgs),
    /// Suggest attractions that match your preferences
    Recommend(TripArgs),
}

#[derive(Debug, Args)]
pub struct AttractionArgs {
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub region: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub limit: Option<u32>,
}

/// Traveller preferences shared by `plan` and `recommend`
#[derive(Debug, Args)]
pub struct TripArgs {
    #[arg(long)]
    pub user_id: String,
    /// Trip length in days
    #[arg(long)]
    pub duration: Option<u32>,
    /// Preferred activity type; repeat for several
    #[arg(long = "activity")]
    pub activities: Vec<String>,
    /// Budget range as MIN MAX
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"])]
    pub budget: Option<Vec<f64>>,
    #[arg(long)]
    pub style: Option<String>,
    #[arg(long)]
    pub difficulty: Option<String>,
    /// Maximum travel distance in km
    #[arg(long)]
    pub max_distance: Option<f64>,
    #[arg(long)]
    pub group_size: Option<u32>,
    /// Starting point latitude (requires --lng)
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    pub lat: Option<f64>,
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lng: Option<f64>,
    /// Attraction id to leave out; repeat for several
    #[arg(long = "exclude")]
    pub exclude: Vec<String>,
    #[arg(long)]
    pub top_k: Option<u32>,
}

#[derive(Debug, Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub trip: TripArgs,
    /// Do not save the generated plan
    #[arg(long)]
    pub no_save: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_plan_args() {
        let cli = Cli::parse_from([
            "travelplan",
            "--store",
            "memory",
            "plan",
            "--user-id",
            "u1",
            "--duration",
            "3",
            "--activity",
            "nature",
            "--activity",
            "adventure",
            "--budget",
            "50",
            "500",
            "--lat",
            "-45.03",
            "--lng",
            "168.66",
        ]);
        assert_eq!(cli.store, Some(TokenBackend::Memory));
        match cli.command {
            Command::Plan(args) => {
                assert_eq!(args.trip.user_id, "u1");
                assert_eq!(args.trip.duration, Some(3));
                assert_eq!(args.trip.activities, vec!["nature", "adventure"]);
                assert_eq!(args.trip.budget, Some(vec![50.0, 500.0]));
                assert_eq!(args.trip.lat, Some(-45.03));
                assert!(!args.no_save);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_recommend_rejects_save_flag() {
        assert!(Cli::try_parse_from(["travelplan", "recommend", "--user-id", "u1"]).is_ok());
        assert!(
            Cli::try_parse_from(["travelplan", "recommend", "--user-id", "u1", "--no-save"])
                .is_err()
        );
    }

    #[test]
    fn test_attraction_requires_id() {
        assert!(Cli::try_parse_from(["travelplan", "attraction"]).is_err());
    }
}
