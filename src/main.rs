use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, warn};

use kol_scout::evaluation::{EvaluationDraft, EvaluationScores};
use kol_scout::influencer::{BrandProfile, InfluencerProfile, Platform, RecentPost};
use kol_scout::output;
use kol_scout::random::{RandomSource, SeededRandom, ThreadRandom};
use kol_scout::scoring::{BaselineConfig, ScoringEngine};
use kol_scout::service::ScoutService;
use kol_scout::store::{self, JsonFileStore, MemoryStore, RepositoryError, Store};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_CONFIG: i32 = 4;
const EXIT_STORAGE: i32 = 5;
const EXIT_NOT_FOUND: i32 = 6;

#[derive(Subcommand, Debug)]
enum ProjectCommands {
    /// Create a project, optionally with a brand profile
    Create {
        name: String,
        #[command(flatten)]
        brand: BrandArgs,
    },
    /// List projects
    List,
}

#[derive(Args, Debug)]
struct BrandArgs {
    /// Brand name. Enables brand-weighted scoring and brand ranking
    #[arg(long)]
    brand: Option<String>,
    #[arg(long, requires = "brand")]
    industry: Option<String>,
    /// Brand keyword (repeatable)
    #[arg(long = "keyword", requires = "brand")]
    keywords: Vec<String>,
    /// Target audience segment (repeatable)
    #[arg(long = "audience", requires = "brand")]
    audience: Vec<String>,
    /// Campaign goal (repeatable)
    #[arg(long = "goal", requires = "brand")]
    goals: Vec<String>,
}

impl BrandArgs {
    fn into_profile(self) -> Option<BrandProfile> {
        self.brand.map(|name| BrandProfile {
            name,
            industry: self.industry,
            target_audience: self.audience,
            keywords: self.keywords,
            campaign_goals: self.goals,
        })
    }
}

#[derive(Args, Debug)]
struct CriterionArgs {
    #[arg(long, allow_negative_numbers = true)]
    brand_fit: f64,
    #[arg(long, allow_negative_numbers = true)]
    content_quality: f64,
    #[arg(long, allow_negative_numbers = true)]
    engagement_rate: f64,
    #[arg(long, allow_negative_numbers = true)]
    audience_profile: f64,
    #[arg(long, allow_negative_numbers = true)]
    professionalism: f64,
    #[arg(long, allow_negative_numbers = true)]
    business_ability: f64,
    #[arg(long, allow_negative_numbers = true)]
    brand_safety: f64,
    #[arg(long, allow_negative_numbers = true)]
    stability: f64,
}

impl From<CriterionArgs> for EvaluationScores {
    fn from(a: CriterionArgs) -> Self {
        EvaluationScores {
            brand_fit: a.brand_fit,
            content_quality: a.content_quality,
            engagement_rate: a.engagement_rate,
            audience_profile: a.audience_profile,
            professionalism: a.professionalism,
            business_ability: a.business_ability,
            brand_safety: a.brand_safety,
            stability: a.stability,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage projects
    #[command(subcommand)]
    Project(ProjectCommands),
    /// Add an influencer to a project and estimate a baseline score
    Add {
        /// Project id, id prefix, or name
        project: String,
        name: String,
        /// Instagram, YouTube, TikTok, Facebook, Twitter, or any other name
        #[arg(short, long)]
        platform: String,
        #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
        followers: i64,
        #[arg(long, default_value = "")]
        bio: String,
        #[arg(long)]
        verified: bool,
        #[arg(long)]
        category: Option<String>,
        /// Profile keyword (repeatable)
        #[arg(long = "keyword")]
        keywords: Vec<String>,
        /// Engagement text of a recent post, e.g. "1.2k" (repeatable)
        #[arg(long = "post")]
        posts: Vec<String>,
        #[arg(long)]
        avatar_url: Option<String>,
    },
    /// Score an influencer on the eight criteria (0-100 each)
    Evaluate {
        /// Influencer id, id prefix, or name
        influencer: String,
        #[command(flatten)]
        scores: CriterionArgs,
        #[arg(long, default_value = "")]
        notes: String,
        #[arg(long, default_value = "anonymous")]
        evaluator: String,
        /// Show the breakdown without saving
        #[arg(long)]
        dry_run: bool,
    },
    /// Show an influencer's evaluations, newest first
    History {
        influencer: String,
    },
    /// Show brand fit for an influencer against its project's brand
    Match {
        influencer: String,
    },
    /// Rank a project's influencers
    Rank {
        project: String,
        /// Only show the first N entries
        #[arg(long)]
        top: Option<usize>,
        /// Tab-separated output with a header row
        #[arg(long)]
        tsv: bool,
    },
    /// Print the active weight profiles
    Profiles,
}

#[derive(Parser, Debug)]
#[command(name = "kol-scout")]
#[command(about = "Influencer evaluation and ranking CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/kol-scout/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the data file (defaults to ~/.config/kol-scout/data.json)
    #[arg(long, global = true, conflicts_with = "ephemeral")]
    data: Option<PathBuf>,

    /// Keep everything in memory for this run
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Seed for baseline jitter
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Disable baseline jitter
    #[arg(long, global = true)]
    no_jitter: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Storage failures exit with EXIT_STORAGE; lookups and bad input with EXIT_NOT_FOUND
fn exit_code_for(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if let Some(repo_err) = cause.downcast_ref::<RepositoryError>() {
            return match repo_err {
                RepositoryError::NotFound(_) => EXIT_NOT_FOUND,
                _ => EXIT_STORAGE,
            };
        }
    }
    EXIT_NOT_FOUND
}

fn main() {
    let cli = Cli::parse();
    let start_time = Instant::now();

    // Load config
    let config = match kol_scout::config::load_config(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(e) = kol_scout::telemetry::init(cli.verbose, config.log_level()) {
        eprintln!("Config error: {}", e);
        std::process::exit(EXIT_CONFIG);
    }

    // Validate scoring config at startup
    let mut scoring = config.scoring();
    if let Err(errors) = kol_scout::scoring::validate_scoring(&scoring) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }
    for warning in kol_scout::scoring::weight_warnings(&scoring) {
        warn!("{}", warning);
    }

    if cli.no_jitter {
        scoring.baseline = Some(BaselineConfig {
            jitter: false,
            ..scoring.baseline()
        });
    }
    let engine = ScoringEngine::from_config(&scoring);

    let mut rng: Box<dyn RandomSource> = match cli.seed {
        Some(seed) => Box::new(SeededRandom::new(seed)),
        None => Box::new(ThreadRandom),
    };

    let result = if cli.ephemeral {
        debug!("using in-memory store");
        let svc = ScoutService::new(MemoryStore::new(), engine);
        run(&svc, cli.command, rng.as_mut())
    } else {
        let path = cli
            .data
            .clone()
            .or_else(|| config.data_path())
            .unwrap_or_else(store::default_data_path);
        let file_store = match JsonFileStore::open(&path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Storage error: {}: {}", path.display(), e);
                std::process::exit(EXIT_STORAGE);
            }
        };
        let svc = ScoutService::new(file_store, engine);
        run(&svc, cli.command, rng.as_mut())
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code_for(&e));
    }

    debug!(elapsed = ?start_time.elapsed(), "done");
    std::process::exit(EXIT_SUCCESS);
}

fn run<S: Store>(
    svc: &ScoutService<S>,
    command: Commands,
    rng: &mut dyn RandomSource,
) -> anyhow::Result<()> {
    let use_colors = output::should_use_colors();

    match command {
        Commands::Project(ProjectCommands::Create { name, brand }) => {
            let project = svc.create_project(&name, brand.into_profile())?;
            let profile = svc.engine().weights.select(project.brand_ranking_active());
            println!("Created project {} ({})", project.name, project.id);
            println!("Weight profile: {}", profile.name);
        }
        Commands::Project(ProjectCommands::List) => {
            let projects = svc.projects()?;
            if projects.is_empty() {
                println!("No projects found.");
            }
            for project in projects {
                let count = svc.influencers(&project.id)?.len();
                let brand = project
                    .brand
                    .as_ref()
                    .map(|b| b.name.as_str())
                    .unwrap_or("-");
                let id = project.id.to_string();
                println!(
                    "{}  {:<24}  {:<16}  {} influencers",
                    &id[..8],
                    project.name,
                    brand,
                    count
                );
            }
        }
        Commands::Add {
            project,
            name,
            platform,
            followers,
            bio,
            verified,
            category,
            keywords,
            posts,
            avatar_url,
        } => {
            let project = svc.find_project(&project)?;
            let mut profile = InfluencerProfile::new(name, Platform::parse(&platform), followers);
            profile.bio = bio;
            profile.verified = verified;
            profile.category = category;
            profile.keywords = keywords;
            profile.avatar_url = avatar_url;
            profile.recent_posts = posts
                .into_iter()
                .map(|engagement| RecentPost {
                    caption: String::new(),
                    engagement,
                })
                .collect();
            let influencer = svc.add_influencer(&project.id, profile, rng)?;
            println!("{}", output::format_influencer_detail(&influencer, use_colors));
        }
        Commands::Evaluate {
            influencer,
            scores,
            notes,
            evaluator,
            dry_run,
        } => {
            let influencer = svc.find_influencer(&influencer)?;
            let draft = EvaluationDraft {
                scores: scores.into(),
                notes,
                evaluator,
            };
            let breakdown = svc.preview_evaluation(&influencer.id, &draft)?;
            println!("{}", output::format_breakdown(&breakdown));
            if dry_run {
                println!("Dry run, nothing saved.");
            } else {
                let evaluation = svc.submit_evaluation(&influencer.id, draft)?;
                println!(
                    "Saved evaluation for {}: {}",
                    influencer.profile.name,
                    output::format_score(Some(evaluation.total_score))
                );
            }
        }
        Commands::History { influencer } => {
            let influencer = svc.find_influencer(&influencer)?;
            println!("{}", output::format_influencer_detail(&influencer, use_colors));
            println!();
            let evaluations = svc.history(&influencer.id)?;
            println!("{}", output::format_history(&evaluations, use_colors));
        }
        Commands::Match { influencer } => {
            let influencer = svc.find_influencer(&influencer)?;
            let fit = svc.brand_fit(&influencer)?;
            println!("{}", output::format_brand_fit(&fit, use_colors));
        }
        Commands::Rank { project, top, tsv } => {
            let project = svc.find_project(&project)?;
            let entries = svc.leaderboard(&project.id, top)?;
            if tsv {
                println!("{}", output::format_tsv(&entries));
            } else {
                println!("{}", output::format_leaderboard(&entries, use_colors));
            }
        }
        Commands::Profiles => {
            let weights = &svc.engine().weights;
            println!("{}", output::format_weight_profile(&weights.canonical));
            println!();
            println!("{}", output::format_weight_profile(&weights.brand_weighted));
        }
    }

    Ok(())
}
