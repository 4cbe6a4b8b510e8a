use std::fmt;
use std::io::{self, Write as _};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::info;

use feynman_core::Clock;
use feynman_core::model::{Level, historical_guides};
use feynman_services::{
    ControllerError, DEFAULT_AUDIENCE, DEFAULT_PRACTICE_COUNT, EndReason, FlowError,
    LearningSession, NoopSpeaker, Outcome, PersonaSelection, SpeechOptions, Speaker, TutorClient,
};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    MissingTopic,
    InvalidLevel { raw: String },
    UnknownGuide { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::MissingTopic => write!(f, "a topic is required (--topic or FEYNMAN_TOPIC)"),
            ArgsError::InvalidLevel { raw } => write!(f, "invalid --level value: {raw}"),
            ArgsError::UnknownGuide { raw } => write!(f, "unknown --guide value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  feynman --topic <topic> [--level <level>] [--guide <id>] [--audience <a>]");
    eprintln!("          [--practice] [--speak]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --level beginner");
    eprintln!("  --guide albert_einstein");
    eprintln!("  --audience {DEFAULT_AUDIENCE}");
    eprintln!();
    eprintln!("Guides:");
    for guide in historical_guides() {
        eprintln!("  {:<16} {}", guide.id, guide.tagline);
    }
    eprintln!();
    eprintln!("While answering: /hint /skip /restart /guide <id> /done /quit");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  FEYNMAN_TOPIC, FEYNMAN_LEVEL, FEYNMAN_GUIDE");
    eprintln!("  FEYNMAN_AI_API_KEY (or OPENAI_API_KEY), FEYNMAN_AI_BASE_URL,");
    eprintln!("  FEYNMAN_AI_MODEL, FEYNMAN_AI_TIMEOUT_SECS, RUST_LOG");
}

struct Args {
    topic: String,
    level: Level,
    guide: Option<String>,
    audience: String,
    practice: bool,
    speak: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut topic = std::env::var("FEYNMAN_TOPIC").ok();
        let mut level = std::env::var("FEYNMAN_LEVEL")
            .ok()
            .map(|raw| parse_level(&raw))
            .transpose()?
            .unwrap_or_default();
        let mut guide = std::env::var("FEYNMAN_GUIDE").ok();
        let mut audience = DEFAULT_AUDIENCE.to_owned();
        let mut practice = false;
        let mut speak = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--topic" => topic = Some(require_value(args, "--topic")?),
                "--level" => level = parse_level(&require_value(args, "--level")?)?,
                "--guide" => guide = Some(require_value(args, "--guide")?),
                "--audience" => audience = require_value(args, "--audience")?,
                "--practice" => practice = true,
                "--speak" => speak = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let topic = topic
            .filter(|t| !t.trim().is_empty())
            .ok_or(ArgsError::MissingTopic)?;
        Ok(Self {
            topic,
            level,
            guide: guide.filter(|g| !g.trim().is_empty()),
            audience,
            practice,
            speak,
        })
    }
}

fn parse_level(raw: &str) -> Result<Level, ArgsError> {
    raw.parse()
        .map_err(|_| ArgsError::InvalidLevel { raw: raw.to_owned() })
}

/// Prints what a voice front-end would say.
struct ConsoleSpeaker;

impl Speaker for ConsoleSpeaker {
    fn speak(&self, text: &str, options: &SpeechOptions) {
        let lang = options.lang.as_deref().unwrap_or("default");
        println!("  [voice {lang} @ {:.2}] {text}", options.rate);
    }
}

enum Command<'a> {
    Answer(&'a str),
    Hint,
    Skip,
    Restart,
    Guide(&'a str),
    Done,
    Quit,
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Self {
        let line = line.trim();
        match line.split_once(' ').map_or((line, ""), |(c, rest)| (c, rest.trim())) {
            ("/hint", _) => Self::Hint,
            ("/skip", _) => Self::Skip,
            ("/restart", _) => Self::Restart,
            ("/guide", id) => Self::Guide(id),
            ("/done", _) => Self::Done,
            ("/quit", _) => Self::Quit,
            _ => Self::Answer(line),
        }
    }
}

fn prompt() -> io::Result<()> {
    print!("> ");
    io::stdout().flush()
}

fn show_question(session: &LearningSession) {
    if let Some(question) = session.controller().current_question() {
        println!();
        println!("Q{}: {}", session.controller().question_count(), question.question);
    }
}

/// Runs step 2 until the learner finishes or the question source stops, then
/// runs gap analysis.
///
/// Returns the gap analysis, or `None` if the learner left early.
async fn guided_questions(
    session: &mut LearningSession,
    selection: &PersonaSelection,
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let question = session.begin_questions().await?;
    println!();
    println!("Q1: {}", question.question);

    loop {
        prompt()?;
        let Some(line) = lines.next_line().await? else {
            return match session.finish_questions(None).await {
                Ok(gaps) => Ok(Some(gaps.to_owned())),
                Err(FlowError::NotEndEligible) => Ok(None),
                Err(err) => Err(err.into()),
            };
        };

        let outcome = match Command::parse(&line) {
            Command::Quit => return Ok(None),
            Command::Done => match session.finish_questions(None).await {
                Ok(gaps) => return Ok(Some(gaps.to_owned())),
                Err(FlowError::NotEndEligible) => {
                    println!("Answer a few more questions before finishing (or /quit).");
                    continue;
                }
                Err(err) => return Err(err.into()),
            },
            Command::Hint => {
                match session.reveal_hint() {
                    Some(hint) => println!("Hint: {hint}"),
                    None => println!("No hint for this one."),
                }
                continue;
            }
            Command::Guide(id) => {
                match selection.select_by_id(id) {
                    Ok(()) => println!("{}", selection.current().intro_message),
                    Err(err) => println!("{err}"),
                }
                continue;
            }
            Command::Restart => {
                session.restart_questions()?;
                show_question(session);
                continue;
            }
            Command::Skip => session.skip().await?,
            Command::Answer(text) => match session.answer(text).await {
                Ok(outcome) => outcome,
                Err(FlowError::Controller(ControllerError::EmptyAnswer)) => continue,
                Err(err) => return Err(err.into()),
            },
        };

        match outcome {
            Outcome::Continued => {
                show_question(session);
                if session.controller().end_eligible() {
                    println!("(type /done whenever you feel ready)");
                }
            }
            Outcome::Restarted { reason } => {
                println!();
                println!("{}", reason.notice());
                show_question(session);
            }
            Outcome::SessionEnded {
                reason: EndReason::TopicCovered,
            } => {
                println!();
                println!("That covers the topic.");
                return Ok(Some(session.finish_questions(None).await?.to_owned()));
            }
            Outcome::SessionEnded {
                reason: EndReason::FetchFailed,
            } => {
                let cause = session.controller().last_fetch_error().unwrap_or("unknown");
                println!();
                println!("Couldn't get another question ({cause}). Moving on with what you have.");
                return Ok(Some(session.finish_questions(None).await?.to_owned()));
            }
            Outcome::Stale => {}
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let tutor = TutorClient::from_env();
    if !tutor.enabled() {
        return Err("no tutor backend configured; set FEYNMAN_AI_API_KEY".into());
    }

    let selection = PersonaSelection::default();
    if let Some(id) = &args.guide {
        selection
            .select_by_id(id)
            .map_err(|_| ArgsError::UnknownGuide { raw: id.clone() })?;
    }
    let speaker: Arc<dyn Speaker> = if args.speak {
        Arc::new(ConsoleSpeaker)
    } else {
        Arc::new(NoopSpeaker)
    };

    let mut session = LearningSession::new(
        Arc::new(tutor),
        speaker,
        selection.clone(),
        args.topic,
        args.level,
        Clock::default(),
    )?;
    info!(topic = session.topic(), level = %session.level(), "session started");

    let guide = selection.current();
    println!("{} ({})", guide.name, guide.tagline);
    println!("{}", guide.intro_message);
    println!();
    println!("1. Simple explanation");
    println!("{}", session.explain().await?);


    if args.practice {
        println!();
        println!("Practice questions");
        for (n, item) in session
            .practice_questions(DEFAULT_PRACTICE_COUNT)
            .await?
            .iter()
            .enumerate()
        {
            println!("  {}. {}", n + 1, item.question);
        }
    }

    println!();
    println!("2. Explain it back");
    println!("Type your own explanation, or press Enter for guided questions.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;
    let own = lines.next_line().await?.unwrap_or_default();
    let gaps = if own.trim().is_empty() {
        match guided_questions(&mut session, &selection, &mut lines).await? {
            Some(gaps) => gaps,
            None => return Ok(()),
        }
    } else {
        session.submit_explanation(&own).await?.to_owned()
    };

    println!();
    println!("3. Gaps");
    println!("{gaps}");

    println!();
    println!("4. Refined explanation ({})", args.audience);
    println!("{}", session.refine(&args.audience).await?);
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        Args::parse(&mut args.iter().map(|s| (*s).to_owned()))
    }

    #[test]
    fn parses_flags() {
        let args = parse(&["--topic", "Tides", "--level", "Advanced", "--guide", "ada_lovelace"])
            .unwrap();
        assert_eq!(args.topic, "Tides");
        assert_eq!(args.level, Level::Advanced);
        assert_eq!(args.guide.as_deref(), Some("ada_lovelace"));
        assert_eq!(args.audience, DEFAULT_AUDIENCE);
        assert!(!args.speak);
        assert!(!args.practice);
        assert!(parse(&["--topic", "Tides", "--practice"]).unwrap().practice);
    }

    #[test]
    fn rejects_bad_level_and_missing_values() {
        assert!(matches!(
            parse(&["--topic", "Tides", "--level", "expert"]),
            Err(ArgsError::InvalidLevel { .. })
        ));
        assert!(matches!(
            parse(&["--topic"]),
            Err(ArgsError::MissingValue { flag: "--topic" })
        ));
        assert!(matches!(
            parse(&["--topic", "Tides", "--verbose"]),
            Err(ArgsError::UnknownArg(_))
        ));
    }

    #[test]
    fn commands_are_recognized() {
        assert!(matches!(Command::parse(" /skip "), Command::Skip));
        assert!(matches!(Command::parse("/guide isaac_newton"), Command::Guide("isaac_newton")));
        assert!(matches!(
            Command::parse("the moon pulls the water"),
            Command::Answer("the moon pulls the water")
        ));
    }
}
