//! Command handlers. Each one is a thin mapping onto the endpoint helpers.

use anyhow::{bail, Context as _, Result};
use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use travelplan_core::config::TokenBackend;
use travelplan_core::models::{
    AttractionQuery, Credentials, ItineraryPlanRequest, LocationInfo, NewItinerary,
    RecommendationRequest, Registration, UserPreferences,
};
use travelplan_core::{ApiClient, Config, Session};

use crate::cli::{AttractionArgs, Command, PlanArgs, TripArgs};

pub struct Context {
    session: Session,
    config: Config,
    backend: TokenBackend,
}

impl Context {
    pub fn new(client: ApiClient, config: Config, backend: TokenBackend) -> Self {
        Self {
            session: Session::new(client),
            config,
            backend,
        }
    }

    fn client(&self) -> &ApiClient {
        self.session.client()
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_json(raw: &str, what: &str) -> Result<Value> {
    serde_json::from_str(raw).with_context(|| format!("{} is not valid JSON: {}", what, raw))
}

pub async fn run(command: Command, ctx: &mut Context) -> Result<()> {
    match command {
        Command::Login { email } => login(ctx, email).await,
        Command::Register { email, name } => register(ctx, email, name).await,
        Command::Logout => {
            ctx.session.logout();
            eprintln!("Logged out.");
            Ok(())
        }
        Command::Status => status(ctx),
        Command::Health => print_json(&ctx.client().health().await?),
        Command::Attractions(args) => print_json(
            &ctx.client()
                .attractions()
                .get_all(&attraction_query(args))
                .await?,
        ),
        Command::Attraction { ids } => attractions_by_id(ctx, &ids).await,
        Command::Itineraries { user } => {
            let itineraries = ctx.client().itineraries();
            let list = match user {
                Some(user_id) => itineraries.get_by_user(&user_id).await?,
                None => itineraries.get_mine().await?,
            };
            print_json(&list)
        }
        Command::Create {
            title,
            items,
            metadata,
        } => {
            let itinerary = NewItinerary {
                title,
                items: items
                    .iter()
                    .map(|raw| parse_json(raw, "--item"))
                    .collect::<Result<_>>()?,
                metadata: metadata
                    .as_deref()
                    .map(|raw| parse_json(raw, "--metadata"))
                    .transpose()?,
            };
            print_json(&ctx.client().itineraries().create(&itinerary).await?)
        }
        Command::Delete { id } => print_json(&ctx.client().itineraries().remove(&id).await?),
        Command::Clear { yes } => {
            if !yes {
                bail!("Refusing to delete every itinerary without --yes");
            }
            print_json(&ctx.client().itineraries().clear().await?)
        }
        Command::Plan(args) => {
            let request = plan_request(args)?;
            print_json(&ctx.client().itineraries().plan(&request).await?)
        }
        Command::Recommend(trip) => {
            let request = recommendation_request(trip)?;
            print_json(&ctx.client().recommendations().get(&request).await?)
        }
    }
}

async fn login(ctx: &mut Context, email: Option<String>) -> Result<()> {
    let email = match email.or_else(|| ctx.config.last_email.clone()) {
        Some(email) => email,
        None => bail!("No email given and none remembered; pass --email"),
    };
    let password = rpassword::prompt_password(format!("Password for {}: ", email))
        .context("Failed to read password")?;

    let response = ctx
        .session
        .login(&Credentials::new(email.clone(), password))
        .await?;

    let who = response
        .user
        .as_ref()
        .map(|u| u.display_name().to_string())
        .unwrap_or_else(|| email.clone());
    eprintln!("Logged in as {}.", who);

    ctx.config.last_email = Some(email);
    if let Err(e) = ctx.config.save() {
        warn!(error = %e, "Could not save config");
    }
    Ok(())
}

async fn register(ctx: &mut Context, email: String, name: Option<String>) -> Result<()> {
    let password = rpassword::prompt_password("Choose a password: ")
        .context("Failed to read password")?;
    let confirm = rpassword::prompt_password("Repeat password: ")
        .context("Failed to read password")?;
    if password != confirm {
        bail!("Passwords do not match");
    }

    let user = ctx
        .client()
        .auth()
        .register(&Registration {
            email,
            password,
            name,
        })
        .await?;
    eprintln!("Registered {}. Run `travelplan login` to sign in.", user.email);
    print_json(&user)
}

fn status(ctx: &Context) -> Result<()> {
    #[derive(Serialize)]
    struct Status<'a> {
        api_url: &'a str,
        token_store: TokenBackend,
        authenticated: bool,
        last_email: Option<&'a str>,
    }

    print_json(&Status {
        api_url: ctx.client().base_url().as_str(),
        token_store: ctx.backend,
        authenticated: ctx.session.is_authenticated(),
        last_email: ctx.config.last_email.as_deref(),
    })
}

/// Fetch several attractions concurrently; each request reads the token
/// on its own.
async fn attractions_by_id(ctx: &Context, ids: &[String]) -> Result<()> {
    let api = ctx.client().attractions();
    let results = join_all(ids.iter().map(|id| api.get_by_id(id))).await;

    let mut found = Vec::new();
    let mut first_error = None;
    for (id, result) in ids.iter().zip(results) {
        match result {
            Ok(attraction) => found.push(attraction),
            Err(e) => {
                eprintln!("{}: {}", id, e);
                first_error.get_or_insert(e);
            }
        }
    }

    print_json(&found)?;
    match first_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

fn attraction_query(args: AttractionArgs) -> AttractionQuery {
    AttractionQuery {
        city: args.city,
        region: args.region,
        category: args.category,
        limit: args.limit,
    }
}

fn preferences(trip: &mut TripArgs) -> Result<UserPreferences> {
    let budget_range = match trip.budget.as_deref() {
        None => None,
        Some([min, max]) if min <= max => Some([*min, *max]),
        Some([min, max]) => bail!("Budget minimum {} exceeds maximum {}", min, max),
        Some(_) => bail!("--budget takes exactly two values"),
    };
    let activities = std::mem::take(&mut trip.activities);

    Ok(UserPreferences {
        activity_types: (!activities.is_empty()).then_some(activities),
        budget_range,
        travel_style: trip.style.take(),
        difficulty_preference: trip.difficulty.take(),
        max_travel_distance: trip.max_distance,
        group_size: trip.group_size,
        duration: trip.duration,
    })
}

fn current_location(trip: &TripArgs) -> Option<LocationInfo> {
    match (trip.lat, trip.lng) {
        (Some(lat), Some(lng)) => Some(LocationInfo {
            lat,
            lng,
            address: None,
        }),
        _ => None,
    }
}

fn plan_request(args: PlanArgs) -> Result<ItineraryPlanRequest> {
    let mut trip = args.trip;
    let mut request = ItineraryPlanRequest::new(trip.user_id.clone(), preferences(&mut trip)?);
    request.current_location = current_location(&trip);
    request.exclude_visited = trip.exclude;
    request.top_k = trip.top_k;
    if args.no_save {
        request.save = Some(false);
    }
    Ok(request)
}

fn recommendation_request(mut trip: TripArgs) -> Result<RecommendationRequest> {
    let mut request = RecommendationRequest::new(trip.user_id.clone(), preferences(&mut trip)?);
    request.current_location = current_location(&trip);
    request.exclude_visited = trip.exclude;
    request.top_k = trip.top_k;
    Ok(request)
}
