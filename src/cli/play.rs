//! Simulated play
//!
//! Stands in for a shopper: points arrive at a steady rhythm with the occasional miss, and
//! misses cost a point or, in lives-based games, a life.

use std::{fs, io, sync::Arc, time::Duration};

use jiff::{SignedDuration, Timestamp};
use rand::{Rng, SeedableRng, rngs::StdRng};
use tokio::time;

use arcade::{
    catalog::Catalog,
    games::GameType,
    persistence::FileStore,
    products::{Product, ProductVariant},
    scoring::TierTable,
    session::{GameRunner, GameSession, LivesSession, SessionOutcome, TimedSession, TokioClock},
    store::CartStore,
    summary::{write_award, write_cart},
};

use crate::cli::{
    CliError,
    config::{PlayArgs, StorageConfig},
};

const INPUT_INTERVAL: Duration = Duration::from_millis(250);
const MISS_PROBABILITY: f64 = 0.15;
const MAX_POINTS_PER_HIT: u32 = 4;

/// Play a game for a product, then add it to the cart with whatever was earned.
pub(super) async fn run(storage: &StorageConfig, args: &PlayArgs) -> Result<(), CliError> {
    let catalog = Catalog::load(&storage.catalog)?;

    let product = catalog
        .find(&args.product)
        .cloned()
        .ok_or_else(|| CliError::UnknownProduct(args.product.clone()))?;

    let variant = select_variant(&product, args.variant.as_deref())?;

    let game = GameType::from(args.game.as_str());

    let table = match &args.tiers {
        Some(path) => TierTable::from_yaml(&fs::read_to_string(path)?)?,
        None => TierTable::for_game(&game),
    };

    let duration = SignedDuration::try_from(Duration::from_secs(args.duration_secs))
        .map_err(|_err| CliError::InvalidDuration)?;

    let rng = args.seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
    let tick = Duration::from_millis(args.tick_ms);

    tracing::info!(%game, product = %product.name, ?duration, "starting game");

    let outcome = if game.has_lives() {
        simulate(
            LivesSession::new(game, duration, args.lives),
            tick,
            rng,
            |session, now| {
                session.lose_life(now);
            },
        )
        .await?
    } else {
        simulate(
            TimedSession::new(game, duration),
            tick,
            rng,
            |session, now| {
                session.subtract_points(1, now);
            },
        )
        .await?
    };

    let mut store = CartStore::open(
        FileStore::new(&storage.storage_dir),
        catalog.currency(),
        outcome.finished_at,
    );

    let award = store.record_game_result(&outcome, product.id, &table);

    let mut out = io::stdout().lock();

    write_award(&mut out, &outcome, &product, &award)?;

    let now = Timestamp::now();

    if !store.add_product(Arc::clone(&product), variant.id, args.quantity, now) {
        tracing::warn!(product = %product.name, "product was not added to the cart");
    }

    write_cart(&mut out, store.cart(), &store.totals(), now)?;

    Ok(())
}

fn select_variant(product: &Product, query: Option<&str>) -> Result<ProductVariant, CliError> {
    let variant = match query {
        Some(query) => product
            .variants
            .iter()
            .find(|variant| {
                variant.name.eq_ignore_ascii_case(query) || variant.id.to_string() == query
            })
            .ok_or_else(|| CliError::UnknownVariant {
                product: product.name.clone(),
                variant: query.to_string(),
            })?,
        None => product
            .variants
            .iter()
            .find(|variant| variant.in_stock)
            .ok_or_else(|| CliError::OutOfStock(product.name.clone()))?,
    };

    Ok(variant.clone())
}

async fn simulate<S>(
    session: S,
    tick: Duration,
    mut rng: StdRng,
    miss: fn(&mut S, Timestamp),
) -> Result<SessionOutcome, CliError>
where
    S: GameSession + Send + 'static,
{
    let mut runner = GameRunner::new(session, TokioClock::new()).with_tick_interval(tick);
    let mut outcome = runner.start().await.ok_or(CliError::SessionNotStarted)?;
    let mut input = time::interval(INPUT_INTERVAL);

    loop {
        tokio::select! {
            result = &mut outcome => return Ok(result?),

            _ = input.tick() => {
                if rng.gen_bool(MISS_PROBABILITY) {
                    runner.update(miss).await;
                } else {
                    runner.add_points(rng.gen_range(1..=MAX_POINTS_PER_HIT)).await;
                }
            }
        }
    }
}
