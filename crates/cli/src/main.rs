use clap::{Parser, Subcommand};
use gistly_core::bundle::GistPayload;
use gistly_core::document::{embed_page, Document, EmbedOptions, EmbedOutcome};
use gistly_core::dom::place::Placement;
use gistly_core::embed::ResolveOptions;
use gistly_core::fetch::{fetch_payload, FetchConfig, HttpGistSource};

#[derive(Parser)]
#[command(name = "gistly", about = "Headless Gist embedding engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a gist and print the embedded page HTML
    Fetch {
        /// Gist id or gist.github.com URL
        id_or_url: String,

        /// File to display as the main file
        #[arg(long)]
        file: Option<String>,

        /// Print the raw gist payload as JSON instead of rendering
        #[arg(long)]
        json: bool,

        /// Collect script embeds and print them to stderr
        #[arg(long)]
        scripts: bool,

        /// Placement mode for the gist container (before, after, replace,
        /// first, last, fill)
        #[arg(long, default_value = "replace")]
        placement: String,
    },
    /// Render a gist payload from a local JSON file (use - for stdin)
    Render {
        /// The payload file to render (use - for stdin)
        path: String,

        /// File to display as the main file
        #[arg(long)]
        file: Option<String>,

        /// Collect script embeds and print them to stderr
        #[arg(long)]
        scripts: bool,

        /// Placement mode for the gist container (before, after, replace,
        /// first, last, fill)
        #[arg(long, default_value = "replace")]
        placement: String,
    },
    /// Embed every script[data-gistly] target in a host HTML page (use - for
    /// stdin) and print the resulting page
    Page {
        /// The host HTML file to process (use - for stdin)
        path: String,

        /// Collect script embeds and print them to stderr
        #[arg(long)]
        scripts: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            id_or_url,
            file,
            json,
            scripts,
            placement,
        } => {
            let payload = match fetch_payload(&id_or_url, &FetchConfig::default()) {
                Ok(payload) => payload,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&payload).unwrap());
                return;
            }
            render(&payload, file, scripts, Placement::from_keyword(&placement));
        }
        Commands::Render {
            path,
            file,
            scripts,
            placement,
        } => {
            let body = read_input(&path);
            let payload: GistPayload = match serde_json::from_str(&body) {
                Ok(payload) => payload,
                Err(e) => {
                    eprintln!("Error: invalid payload: {}", e);
                    std::process::exit(1);
                }
            };
            render(&payload, file, scripts, Placement::from_keyword(&placement));
        }
        Commands::Page { path, scripts } => {
            let html = read_input(&path);
            let mut doc = Document::parse(&html);
            let source = HttpGistSource::default();
            let options = ResolveOptions {
                allow_script_embeds: scripts,
            };
            let reports = embed_page(&mut doc, &source, &options);
            println!("{}", doc.to_html());
            for report in &reports {
                match &report.result {
                    Ok(outcome) => report_outcome(outcome, scripts),
                    Err(e) => eprintln!("warning: gist {}: {}", report.gist, e),
                }
            }
        }
    }
}

fn read_input(path: &str) -> String {
    if path == "-" {
        use std::io::Read;
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .expect("Failed to read stdin");
        buf
    } else {
        std::fs::read_to_string(path).expect("Failed to read file")
    }
}

fn render(payload: &GistPayload, file: Option<String>, scripts: bool, placement: Placement) {
    let options = EmbedOptions {
        file,
        placement,
        allow_script_embeds: scripts,
    };
    match gistly_core::render_page(payload, &options) {
        Ok((doc, outcome)) => {
            println!("{}", doc.to_html());
            report_outcome(&outcome, scripts);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn report_outcome(outcome: &EmbedOutcome, scripts: bool) {
    for failure in &outcome.failures {
        eprintln!("warning: embed {:?}: {}", failure.name, failure.reason);
    }
    if scripts {
        for script in &outcome.scripts {
            eprintln!("--- script embed: {} ---", script.name);
            eprintln!("{}", script.code);
        }
    }
}
