use crate::cli::opts::*;

use anyhow::{anyhow, bail, Result};
use chrono::{NaiveDate, Utc};
use fiszki_core::{
    daily_streak, select_due, select_on, session::order_queue, set_pool, split_sets, BandTable,
    Card, Folder, Outcome, Progress, Repository, SeededRng, StudyMode, StudySession, DEFAULT_SEED,
    SET_SIZE,
};
use fiszki_json::JsonStore;
use std::io::{stdin, stdout, Write};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

pub async fn run_cli(args: Cli) -> Result<()> {
    let repo = open_repo(args.store_path).await?;
    match args.cmd {
        Command::Folder(cmd) => folder_cmd(repo, cmd).await,
        Command::Card(cmd) => card_cmd(repo, cmd).await,
        Command::Due(cmd) => due_cmd(repo, cmd).await,
        Command::Study(cmd) => study_cmd(repo, cmd).await,
        Command::Spread(cmd) => spread_cmd(repo, cmd).await,
    }
}

pub async fn open_repo(path: Option<PathBuf>) -> Result<Arc<dyn Repository>> {
    let store = match path {
        Some(p) => {
            let backups = p.with_extension("backups");
            JsonStore::open_with(p, backups, 10).await?
        }
        None => JsonStore::open_default().await?,
    };
    Ok(Arc::new(store))
}

async fn folder_cmd(repo: Arc<dyn Repository>, cmd: FolderCmd) -> Result<()> {
    match cmd {
        FolderCmd::Add { name } => {
            let f = repo.create_folder(&name).await?;
            println!("{}", f.id);
        }
        FolderCmd::List => {
            let mut v = repo.list_folders().await?;
            v.sort_by_key(|f| f.created_at);
            for f in v {
                println!("{}\t{}", f.id, f.name);
            }
        }
        FolderCmd::Rm { folder } => {
            let f = resolve_folder(&*repo, &folder).await?;
            repo.delete_folder(f.id).await?;
            println!("ok");
        }
    }
    Ok(())
}

async fn card_cmd(repo: Arc<dyn Repository>, cmd: CardCmd) -> Result<()> {
    match cmd {
        CardCmd::Add(a) => {
            let folder = resolve_folder(&*repo, &a.folder).await?;
            let c = repo.add_card(folder.id, &a.front, &a.back, &a.tags).await?;
            println!("{}", c.id);
        }
        CardCmd::List { folder } => {
            let folder_id = if let Some(sel) = folder {
                Some(resolve_folder(&*repo, &sel).await?.id)
            } else {
                None
            };
            let mut cards = repo.list_cards(folder_id).await?;
            cards.sort_by_key(|c| c.created_at);
            for c in cards {
                let tags = if c.tags.is_empty() { "-".to_string() } else { c.tags.join(";") };
                println!(
                    "{}\t{}\t{}\tstreak={}\tdue={}\ttags={}",
                    c.id, c.front, c.back, c.streak, c.next_study, tags
                );
            }
        }
        CardCmd::Rm { card_id } => {
            let id = parse_uuid(&card_id)?;
            repo.delete_card(id).await?;
            println!("ok");
        }
        CardCmd::Edit(e) => {
            let id = parse_uuid(&e.card_id)?;
            let mut card = repo.get_card(id).await?;

            if let Some(f) = e.front { card.front = f; }
            if let Some(b) = e.back { card.back = b; }

            if !e.add_tags.is_empty() || !e.rm_tags.is_empty() {
                let mut tags = card.tags.clone();
                for t in e.add_tags { if !tags.iter().any(|x| x.eq_ignore_ascii_case(&t)) { tags.push(t); } }
                if !e.rm_tags.is_empty() {
                    tags.retain(|x| !e.rm_tags.iter().any(|r| x.eq_ignore_ascii_case(r)));
                }
                card.tags = tags;
            }

            let _ = repo.update_card(&card).await?;
            println!("ok");
        }
    }
    Ok(())
}

async fn due_cmd(repo: Arc<dyn Repository>, cmd: DueCmd) -> Result<()> {
    let folder_id = if let Some(sel) = cmd.folder {
        Some(resolve_folder(&*repo, &sel).await?.id)
    } else {
        None
    };
    let cards = repo.list_cards(folder_id).await?;

    let bucket = match cmd.date {
        Some(s) => select_on(&cards, parse_day(&s)?),
        None => select_due(&cards, Utc::now().date_naive()),
    };

    if bucket.is_empty() {
        println!("no cards due");
        return Ok(());
    }
    for c in &bucket {
        let seen = c.last_seen.map(|t| t.to_rfc3339()).unwrap_or_else(|| "-".into());
        println!("{}\t{}\tstreak={}\tdue={}\tseen={}", c.id, c.front, c.streak, c.next_study, seen);
    }
    println!("{} card(s)", bucket.len());
    Ok(())
}

async fn spread_cmd(repo: Arc<dyn Repository>, cmd: SpreadCmd) -> Result<()> {
    if cmd.days == 0 {
        bail!("--days must be at least 1");
    }
    let folder_id = if let Some(sel) = cmd.folder {
        Some(resolve_folder(&*repo, &sel).await?.id)
    } else {
        None
    };
    let today = Utc::now().date_naive();
    let cards = repo.list_cards(folder_id).await?;
    let due = select_due(&cards, today);
    if due.is_empty() {
        println!("no cards due");
        return Ok(());
    }

    let updates = fiszki_core::spread_over_days(&due, today, cmd.days);
    repo.reschedule_batch(&updates).await?;
    println!("rescheduled {} card(s) across {} day(s)", updates.len(), cmd.days);
    Ok(())
}

async fn study_cmd(repo: Arc<dyn Repository>, cmd: StudyCmd) -> Result<()> {
    let folder_id = if let Some(sel) = cmd.folder.clone() {
        Some(resolve_folder(&*repo, &sel).await?.id)
    } else {
        None
    };
    let cards = repo.list_cards(folder_id).await?;

    let bucket = match &cmd.date {
        Some(s) => select_on(&cards, parse_day(s)?),
        None => select_due(&cards, Utc::now().date_naive()),
    };
    let seed = cmd.seed.unwrap_or(DEFAULT_SEED);
    let queue = order_queue(&bucket, seed);

    if queue.is_empty() {
        println!("no cards due today");
        return Ok(());
    }

    let mode = if cmd.reverse { StudyMode::BackToFront } else { StudyMode::FrontToBack };
    let bands = BandTable::default();
    // Jitter source; seeded off the clock so cohorts spread out, while
    // the study order itself stays on the fixed shuffle seed.
    let mut rng = SeededRng::new(Utc::now().timestamp());

    let mut total = Progress::default();
    let mut quit = false;

    if cmd.sets {
        let pool = set_pool(&queue);
        let sets = split_sets(&pool, SET_SIZE);
        let n_sets = sets.len();
        for (i, set) in sets.into_iter().enumerate() {
            println!("\n== set {}/{} ({} cards) ==", i + 1, n_sets, set.len());
            let (p, q) = run_pass(&repo, set, mode, &bands, &mut rng).await?;
            merge(&mut total, p);
            if q {
                quit = true;
                break;
            }
            if i + 1 < n_sets {
                let line = read_line("next set? [enter=yes, q=quit] ")?;
                if line.trim().eq_ignore_ascii_case("q") {
                    quit = true;
                    break;
                }
            }
        }
    } else {
        let (p, q) = run_pass(&repo, queue, mode, &bands, &mut rng).await?;
        merge(&mut total, p);
        quit = q;
    }

    println!(
        "\n{}: {} correct, {} wrong, {} skipped",
        if quit { "stopped" } else { "session complete" },
        total.correct,
        total.wrong,
        total.skipped
    );

    let reviews = repo.list_reviews().await?;
    let summary = fiszki_core::summarize(&reviews);
    println!(
        "all-time accuracy {:.0}%, daily streak {} day(s)",
        summary.totals.accuracy() * 100.0,
        daily_streak(&reviews, Utc::now().date_naive())
    );
    Ok(())
}

/// One pass of the study state machine over `queue`. Returns the pass
/// totals and whether the user quit early.
async fn run_pass(
    repo: &Arc<dyn Repository>,
    queue: Vec<Card>,
    mode: StudyMode,
    bands: &BandTable,
    rng: &mut SeededRng,
) -> Result<(Progress, bool)> {
    let mut session = StudySession::new(queue, mode);

    while !session.is_completed() {
        let prompt = session
            .prompt()
            .ok_or_else(|| anyhow!("no current card"))?
            .to_string();
        println!("\n[{} left] Q: {}", session.remaining(), prompt);
        session.begin()?;

        let line = read_line("answer (:s=skip, :q=quit)> ")?;
        match line.trim() {
            ":q" => return Ok((session.progress(), true)),
            ":s" => {
                session.skip()?;
                session.advance()?;
                continue;
            }
            guess => {
                let verdict = session.check(guess)?;
                let expected = session.expected().unwrap_or_default().to_string();
                match verdict {
                    Outcome::Success => println!("correct! A: {expected}"),
                    Outcome::Failure => {
                        println!("wrong. A: {expected}");
                        println!("   you typed: {}", session.guess());
                    }
                }

                // Enter accepts the verdict; anything else must parse as
                // an explicit outcome ("good"/"wrong") or is re-asked.
                let outcome = loop {
                    let choice = read_line("[enter=accept, good, wrong] ")?;
                    let t = choice.trim();
                    if t.is_empty() {
                        break verdict;
                    }
                    match t.parse::<Outcome>() {
                        Ok(o) => break o,
                        Err(e) => println!("{e}"),
                    }
                };

                let out = session.confirm(outcome, Utc::now(), bands, rng)?;
                // Advancement is gated on the write: a failed persist
                // leaves the machine parked in Advancing for a retry.
                let c = &out.updated_card;
                repo.update_schedule(c.id, c.streak, c.next_study, c.last_seen).await?;
                repo.insert_review(&out.review).await?;
                if let Some(d) = out.review.interval_applied {
                    println!("→ next due in {} day(s)", d);
                } else {
                    println!("→ stays in today's pile");
                }
                session.advance()?;
            }
        }
    }

    Ok((session.progress(), false))
}

fn merge(total: &mut Progress, p: Progress) {
    total.correct += p.correct;
    total.wrong += p.wrong;
    total.skipped += p.skipped;
}

// ===== Helpers =====
fn parse_uuid(s: &str) -> Result<Uuid> { Uuid::parse_str(s).map_err(|_| anyhow!("invalid uuid")) }

fn parse_day(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| anyhow!("expected date as YYYY-MM-DD"))
}

async fn resolve_folder<R: Repository + ?Sized>(repo: &R, sel: &str) -> Result<Folder> {
    if let Ok(id) = Uuid::parse_str(sel) { if let Ok(f) = repo.get_folder(id).await { return Ok(f); } }
    let folders = repo.list_folders().await?;
    if let Some(f) = folders.into_iter().find(|f| f.name.eq_ignore_ascii_case(sel)) { return Ok(f); }
    bail!("folder not found: {}", sel)
}

fn read_line(prompt: &str) -> Result<String> { print!("{prompt}"); stdout().flush().ok(); let mut s = String::new(); stdin().read_line(&mut s)?; Ok(s) }
