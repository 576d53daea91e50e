use clap::Parser;
use movie_review::clients::TmdbClient;
use movie_review::config::Cli;
use movie_review::events::global_broker;
use movie_review::lifecycle::MovieReviewApp;
use movie_review::model::StarScore;
use movie_review::ReviewError;
use std::rc::Rc;
use tokio::task::LocalSet;
use tracing::info;
use view_framework::tracing::setup_tracing;
use view_framework::{Element, FileStore};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ReviewError> {
    setup_tracing();
    let cli = Cli::parse();

    LocalSet::new().run_until(run(cli)).await
}

async fn run(cli: Cli) -> Result<(), ReviewError> {
    let api_key = cli.validate()?;
    let api = TmdbClient::new(api_key)
        .with_base_url(&cli.base_url)
        .with_language(&cli.language);
    let store = FileStore::open(&cli.storage_dir)?;
    info!(storage = %store.dir().display(), "Starting");

    let document = Element::document();
    let app = MovieReviewApp::new(&document, Rc::new(api), Rc::new(store), global_broker())?;

    if let Some(term) = &cli.search {
        app.search_form().submit(term);
    }
    app.settled().await;
    for _ in 1..cli.pages {
        if !app.load_more() {
            break;
        }
        app.settled().await;
    }
    check_error_modal(&app)?;
    if !cli.html {
        print_listing(&app);
    }

    if let Some(movie_id) = cli.select {
        app.select_movie(movie_id)?;
        app.settled().await;
        check_error_modal(&app)?;

        if let Some(score) = cli.rate {
            rate_displayed(&app, score);
        }
        if !cli.html {
            print_detail(&app);
        }
    }

    if cli.html {
        println!("{}", document.outer_html());
    }
    print_toasts(&app);
    app.shutdown();
    Ok(())
}

fn check_error_modal(app: &MovieReviewApp) -> Result<(), ReviewError> {
    if app.error_modal().is_open() {
        return Err(ReviewError::Config(app.error_modal().message()));
    }
    Ok(())
}

fn print_listing(app: &MovieReviewApp) {
    let doc = app.document();
    if let Some(heading) = doc.query("#movie-review-section > h2") {
        println!("{}", heading.text());
    }
    if doc.query("img.no-result-image").is_some() {
        println!("  (no results)");
        return;
    }
    for card in doc.query_all("#movie-list-container li.item-card[data-movie-id]") {
        let id = card.attr("data-movie-id").unwrap_or_default();
        let title = card.query(".item-title").map(|e| e.text()).unwrap_or_default();
        let score = card.query(".item-score").map(|e| e.text()).unwrap_or_default();
        println!("  {id:>8}  {score:>4}  {title}");
    }
    if doc.query("#more-button").is_some() {
        println!("  ... more available (--pages)");
    }
}

fn rate_displayed(app: &MovieReviewApp, score: StarScore) {
    let selector = format!("label.star[data-value={}]", score.value());
    match app.document().query(&selector) {
        Some(label) => {
            label.click();
        }
        None => eprintln!("warning: no movie detail to rate"),
    }
}

fn print_detail(app: &MovieReviewApp) {
    let Some(detail) = app.detail().detail() else {
        if let Some(message) = app.document().query(".error-message") {
            eprintln!("error: {}", message.text());
        }
        return;
    };
    println!();
    println!("{} [{}]", detail.title, detail.movie_id);
    println!("  Genres:    {}", detail.genre_names());
    println!("  Vote:      {:.1}", detail.vote_average);
    println!(
        "  My rating: {} ({})",
        detail.star_score(),
        detail.star_score().description()
    );
    if let Some(overview) = &detail.overview {
        println!("  {overview}");
    }
}

fn print_toasts(app: &MovieReviewApp) {
    for message in app.toasts().messages() {
        eprintln!("warning: {message}");
    }
}
