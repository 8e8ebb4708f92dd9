//! Parli CLI - parliamentary debate practice against AI opponents.
//!
//! A terminal front end for the parli-core library: pick a motion and a
//! speaking role, debate seven AI opponents, get adjudicated, and review
//! saved debates.

use clap::{Parser, Subcommand};
use colored::Colorize;
use parli_core::{
    catalog, Config, DebateOrchestrator, DebatePhase, Difficulty, GenerationClient, HistoryStore,
    Motion, NullVoice, SkillLevel, VoiceIo,
};
use std::env;
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "parli",
    version,
    about = "Parliamentary debate practice against AI opponents",
    long_about = "Practice British Parliamentary debate: you take one of the eight speaking \
roles, AI debaters fill the rest, and an AI adjudicator scores the result."
)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the built-in debate motions
    Motions,
    /// List the eight speaking roles in turn order
    Roles,
    /// Run an interactive debate
    Debate {
        /// Motion id from `parli motions`, or omit with --topic for a custom motion
        #[arg(short, long, value_name = "ID")]
        motion: Option<String>,
        /// Custom motion text (used when --motion is not given)
        #[arg(long, value_name = "TEXT")]
        topic: Option<String>,
        /// Context for a custom motion
        #[arg(long, default_value = "", value_name = "TEXT")]
        context: String,
        /// The role you will speak (pm, lo, dpm, do, gw, ow, gr, or)
        #[arg(short, long, default_value = "pm", value_name = "ROLE")]
        role: String,
        /// AI opponent skill: beginner, intermediate, advanced
        /// (defaults to the config file's setting)
        #[arg(short, long, value_name = "SKILL")]
        skill: Option<String>,
        /// Generate a case preparation for your side before the debate
        #[arg(long)]
        prep: bool,
        /// Request personalized coaching feedback after the debate
        #[arg(long)]
        feedback: bool,
    },
    /// Saved debate history
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },
    /// Verify the API credential and endpoint
    Check,
}

#[derive(Subcommand)]
enum HistoryCommand {
    /// List saved debates
    List,
    /// Print the transcript of a saved debate
    Show {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Delete a saved debate
    Delete {
        #[arg(value_name = "ID")]
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let mut client = GenerationClient::unconfigured();
    if let Some(api_config) = config.api_config(env::var("GEMINI_API_KEY").ok()) {
        client = GenerationClient::new(api_config);
    }
    if let Some(base_url) = &config.api.base_url {
        client = client.with_base_url(base_url.clone());
    }

    match cli.command {
        Command::Motions => {
            println!("{}", "Available motions:".bold());
            for motion in catalog::sample_motions() {
                println!(
                    "  {}  [{}] {}",
                    motion.id.bright_cyan(),
                    motion.difficulty.to_string().yellow(),
                    motion.motion
                );
                println!("      {}", motion.context.dimmed());
            }
        }
        Command::Roles => {
            println!("{}", "Speaking order:".bold());
            for role in catalog::roles() {
                println!(
                    "  {}. {} ({}) - {} - {}s",
                    role.order,
                    role.name.bright_cyan(),
                    role.id,
                    role.side.to_string().yellow(),
                    role.time_limit
                );
                println!("     {}", role.description.dimmed());
            }
        }
        Command::Debate {
            motion,
            topic,
            context,
            role,
            skill,
            prep,
            feedback,
        } => {
            let motion = resolve_motion(motion.as_deref(), topic, context)?;
            let skill = parse_skill(skill.as_deref().unwrap_or(&config.debate.ai_skill))?;
            let role = catalog::role_by_id(&role)
                .ok_or_else(|| format!("unknown role '{role}', see `parli roles`"))?;
            let history = HistoryStore::open_default()?;
            let mut orchestrator = DebateOrchestrator::new(client, history);
            run_debate(
                &mut orchestrator,
                motion,
                &config.debate.human_name,
                role.clone(),
                skill,
                prep,
                feedback,
            )
            .await?;
        }
        Command::History { command } => {
            let mut history = HistoryStore::open_default()?;
            match command {
                HistoryCommand::List => {
                    if history.list().is_empty() {
                        println!("No saved debates.");
                    }
                    for entry in history.list() {
                        let result = entry
                            .session
                            .result
                            .as_ref()
                            .map(|r| format!("winner: {}", r.winner))
                            .unwrap_or_else(|| "no result".to_string());
                        println!(
                            "  {}  {}  {}  ({})",
                            entry.id.bright_cyan(),
                            entry.saved_at.format("%Y-%m-%d %H:%M"),
                            entry.session.motion.motion,
                            result.dimmed()
                        );
                    }
                }
                HistoryCommand::Show { id } => {
                    let entry = history
                        .get(&id)
                        .ok_or_else(|| format!("no history entry '{id}'"))?;
                    println!("{}", entry.transcript);
                    if let Some(feedback) = &entry.personalized_feedback {
                        println!("{}", "PERSONALIZED FEEDBACK".bold());
                        for (criterion, advice) in &feedback.criteria {
                            println!("  {}: {}", criterion.bright_cyan(), advice);
                        }
                        if !feedback.summary.is_empty() {
                            println!();
                            println!("{}", feedback.summary);
                        }
                    }
                }
                HistoryCommand::Delete { id } => {
                    history.delete(&id)?;
                    println!("Deleted {id}.");
                }
            }
        }
        Command::Check => match client.test_connection().await {
            Ok(()) => println!("{}", "API connection OK.".bright_green()),
            Err(err) => {
                eprintln!("{} {}", "Connection failed:".red().bold(), err);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

fn resolve_motion(
    id: Option<&str>,
    topic: Option<String>,
    context: String,
) -> Result<Motion, Box<dyn Error>> {
    match (id, topic) {
        (Some(id), _) => Ok(catalog::motion_by_id(id)
            .ok_or_else(|| format!("unknown motion '{id}', see `parli motions`"))?
            .clone()),
        (None, Some(topic)) => Ok(Motion::custom(topic, context, Difficulty::Intermediate)),
        (None, None) => Err("pass --motion <id> or --topic <text>".into()),
    }
}

fn parse_skill(skill: &str) -> Result<SkillLevel, Box<dyn Error>> {
    match skill.to_lowercase().as_str() {
        "beginner" => Ok(SkillLevel::Beginner),
        "intermediate" => Ok(SkillLevel::Intermediate),
        "advanced" => Ok(SkillLevel::Advanced),
        other => Err(format!("unknown skill '{other}'").into()),
    }
}

async fn run_debate(
    orchestrator: &mut DebateOrchestrator,
    motion: Motion,
    human_name: &str,
    role: parli_core::Role,
    skill: SkillLevel,
    prep: bool,
    feedback: bool,
) -> Result<(), Box<dyn Error>> {
    let side = role.side;
    println!();
    println!("{}", "═".repeat(70).bright_blue());
    println!("{}", "  Parli - Parliamentary Debate Practice".bright_blue().bold());
    println!("{}", "═".repeat(70).bright_blue());
    println!();
    println!("{} {}", "Motion:".bold(), motion.motion.bright_white());
    println!("{} {}", "Context:".bold(), motion.context.dimmed());
    println!(
        "{} {} ({}, speech {} of 8)",
        "Your role:".bold(),
        role.name.bright_cyan(),
        side.to_string().yellow(),
        role.order
    );
    println!();

    if !NullVoice.is_available() {
        println!("{}", "Voice input unavailable; type your speeches.".dimmed());
        println!();
    }

    if prep {
        println!("{}", "Preparing your case...".dimmed());
        match orchestrator.prepare_case(&motion, side, skill).await {
            Ok(case) => print_case_prep(&case),
            Err(err) => eprintln!("{} {}", "Case prep failed:".red().bold(), err),
        }
    }

    orchestrator.create_session(motion, human_name, side, &role, skill)?;

    loop {
        let (speaker, human_turn, done) = {
            let session = orchestrator
                .session()
                .ok_or("session disappeared mid-debate")?;
            match session.current_speaker() {
                Some(role) => (role.clone(), session.is_human_turn(), false),
                None => (role.clone(), false, true),
            }
        };
        if done {
            break;
        }

        println!("{}", "─".repeat(70).dimmed());
        println!(
            "{} {} {}",
            "▶".bright_cyan(),
            speaker.name.bright_cyan().bold(),
            format!("({})", speaker.side).yellow()
        );

        if human_turn {
            let started = Instant::now();
            let content = read_speech(&speaker.name)?;
            let time_used = started.elapsed().as_secs().min(u64::from(speaker.time_limit)) as u32;
            if content.is_empty() {
                println!("{}", "Turn skipped.".dimmed());
            }
            orchestrator.submit_speech(content, time_used)?;
        } else {
            println!("{}", "Generating speech...".dimmed());
            match orchestrator.generate_ai_speech().await {
                Ok(()) => {
                    let session = orchestrator.session().ok_or("session disappeared")?;
                    if let Some(speech) = session.speeches().last() {
                        let name = session.participants.speaker_name(&speech.speaker_id);
                        println!("{}", name.bold());
                        println!("{}", speech.content);
                    }
                }
                Err(err) => {
                    eprintln!("{} {}", "Generation failed:".red().bold(), err);
                    if !confirm("Retry this speech?")? {
                        return Err(err.into());
                    }
                }
            }
        }
    }

    println!();
    println!("{}", "═".repeat(70).bright_magenta());
    println!("{}", "  All speeches delivered. Requesting adjudication...".bright_magenta());
    println!("{}", "═".repeat(70).bright_magenta());

    loop {
        match orchestrator.complete_debate().await {
            Ok(()) => break,
            Err(err) => {
                eprintln!("{} {}", "Adjudication failed:".red().bold(), err);
                if !confirm("Retry adjudication?")? {
                    return Err(err.into());
                }
            }
        }
    }

    {
        let session = orchestrator
            .session()
            .ok_or("session disappeared after judging")?;
        debug_assert_eq!(session.phase(), DebatePhase::Completed);
        print_result(session);
    }

    let entry_id = orchestrator.save_to_history()?;
    println!("{} {}", "Saved to history as".dimmed(), entry_id.bright_cyan());

    if feedback {
        println!();
        println!("{}", "Requesting personalized feedback...".dimmed());
        match orchestrator.request_feedback(&entry_id).await {
            Ok(feedback) => {
                println!("{}", "PERSONALIZED FEEDBACK".bold());
                for (criterion, advice) in &feedback.criteria {
                    println!("  {}: {}", criterion.bright_cyan(), advice);
                }
                if !feedback.summary.is_empty() {
                    println!();
                    println!("{}", feedback.summary);
                }
            }
            Err(err) => {
                eprintln!("{} {}", "Feedback failed:".red().bold(), err);
                if let Some(raw) = err.raw_output() {
                    eprintln!("{}", "Raw model output:".dimmed());
                    eprintln!("{}", raw.dimmed());
                }
            }
        }
    }

    Ok(())
}

/// Read a multi-line speech from stdin, terminated by a lone "." line.
/// An immediate "." forfeits the turn.
fn read_speech(role_name: &str) -> Result<String, Box<dyn Error>> {
    println!(
        "Deliver your {} speech. End with a single '.' on its own line (or '.' alone to skip).",
        role_name.bold()
    );
    let stdin = io::stdin();
    let mut lines = Vec::new();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim() == "." {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n").trim().to_string())
}

fn confirm(question: &str) -> Result<bool, Box<dyn Error>> {
    print!("{question} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

fn print_case_prep(case: &parli_core::CasePrep) {
    println!();
    println!("{}", "CASE PREPARATION".bold());
    println!("{}", "Main arguments:".bold());
    for argument in &case.main_arguments {
        println!(
            "  - {} {}",
            argument.claim.bright_white(),
            format!("(weight {:.1})", argument.weight).dimmed()
        );
        println!("    {}", argument.reasoning.dimmed());
    }
    println!("{}", "Likely rebuttals to prepare for:".bold());
    for rebuttal in &case.rebuttals {
        println!("  - {rebuttal}");
    }
    println!("{} {}", "Strategy:".bold(), case.strategy);
    println!();
}

fn print_result(session: &parli_core::DebateSession) {
    let Some(result) = &session.result else {
        return;
    };
    println!();
    println!("{}", "═".repeat(70).bright_green());
    println!(
        "{}",
        format!("  Winner: {}", result.winner).bright_green().bold()
    );
    println!(
        "  Government {:.1} - {:.1} Opposition",
        result.score.government, result.score.opposition
    );
    println!("{}", "═".repeat(70).bright_green());
    println!();
    println!("{}", result.feedback);

    if !result.clashes.is_empty() {
        println!();
        println!("{}", "Clashes:".bold());
        for clash in &result.clashes {
            println!(
                "  - {} {} {}",
                clash.topic.bright_white(),
                format!("(weight {:.1})", clash.weight).dimmed(),
                format!("-> {:?}", clash.winner).yellow()
            );
        }
    }

    let human_id = session.participants.human_speaker_id();
    if let Some(scores) = result.individual_scores.get(human_id) {
        println!();
        println!(
            "{} {:.1}/10 average",
            "Your scores:".bold(),
            scores.average()
        );
        if let Some(feedback) = &scores.feedback {
            println!("  {feedback}");
        }
    }

    if !result.key_moments.is_empty() {
        println!();
        println!("{}", "Key moments:".bold());
        for moment in &result.key_moments {
            println!("  - {moment}");
        }
    }
    if !result.improvement_areas.is_empty() {
        println!();
        println!("{}", "Areas for improvement:".bold());
        for area in &result.improvement_areas {
            println!("  - {area}");
        }
    }
}
